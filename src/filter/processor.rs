use crate::midi::{cc, Event, Message, MessageKind, NOTE_COUNT};

use super::{FilterConfig, NoteOnState};

const PEDAL_DOWN: u8 = 127;
const PEDAL_UP: u8 = 0;
// Inverted note-offs may carry a zero release velocity, which would encode
// as another note-off on the wire.
const FALLBACK_VELOCITY: u8 = 64;

pub struct Filter {
    notes: NoteOnState,
    // Channel that most recently turned each note on, so synthesized
    // note-offs land on the channel that is actually sounding.
    note_channels: [u8; NOTE_COUNT],
    dropped_malformed: u64,
}

impl Filter {
    pub fn new() -> Self {
        Self {
            notes: NoteOnState::new(),
            note_channels: [0; NOTE_COUNT],
            dropped_malformed: 0,
        }
    }

    pub fn note_state(&self) -> &NoteOnState {
        &self.notes
    }

    pub fn dropped_malformed(&self) -> u64 {
        self.dropped_malformed
    }

    pub fn reset(&mut self) {
        self.notes.clear();
    }

    // The configuration snapshot is fixed for the whole block; flag changes
    // land on the next call.
    pub fn process_block(&mut self, config: &FilterConfig, input: &[Event], out: &mut Vec<Event>) {
        out.clear();
        if !config.enabled {
            out.extend_from_slice(input);
            return;
        }
        if config.all_notes_off {
            self.sweep_all_notes_off(out);
        }
        for event in input {
            self.process_event(config, event, out);
        }
    }

    fn sweep_all_notes_off(&mut self, out: &mut Vec<Event>) {
        let notes = self.notes;
        for note in notes.on_notes() {
            let channel = self.note_channels[note as usize];
            out.push(Event::new(0, Message::note_off(channel, note, 0)));
        }
        self.notes.clear();
    }

    fn process_event(&mut self, config: &FilterConfig, event: &Event, out: &mut Vec<Event>) {
        if let Some(note) = event.message.kind.note() {
            if note as usize >= NOTE_COUNT {
                self.dropped_malformed += 1;
                return;
            }
        }
        if config.all_notes_off {
            // Standing condition: nothing passes until the flag is released.
            return;
        }
        match event.message.kind {
            MessageKind::NoteOn { note, velocity } => {
                self.process_note_on(config, event, note, velocity, out);
            }
            MessageKind::NoteOff { note, velocity } => {
                self.process_note_off(config, event, note, velocity, out);
            }
            MessageKind::ControlChange { controller, value }
                if controller == cc::SUSTAIN_PEDAL =>
            {
                self.process_sustain_pedal(config, event, value, out);
            }
            _ => out.push(*event),
        }
    }

    fn process_note_on(
        &mut self,
        config: &FilterConfig,
        event: &Event,
        note: u8,
        velocity: u8,
        out: &mut Vec<Event>,
    ) {
        if let Some(controller) = pedal_reinterpretation(config) {
            out.push(retag(event, MessageKind::ControlChange {
                controller,
                value: PEDAL_DOWN,
            }));
            return;
        }
        if config.toggle_note_messages {
            if self.notes.is_on(note) {
                out.push(retag(event, MessageKind::NoteOff { note, velocity }));
                self.notes.set_off(note);
            } else {
                out.push(*event);
                self.mark_on(note, event.message.channel);
            }
            return;
        }
        if config.ignore_note_on {
            return;
        }
        if config.invert_note_on_off {
            out.push(retag(event, MessageKind::NoteOff { note, velocity }));
            self.notes.set_off(note);
            return;
        }
        out.push(*event);
        self.mark_on(note, event.message.channel);
    }

    fn process_note_off(
        &mut self,
        config: &FilterConfig,
        event: &Event,
        note: u8,
        velocity: u8,
        out: &mut Vec<Event>,
    ) {
        if let Some(controller) = pedal_reinterpretation(config) {
            out.push(retag(event, MessageKind::ControlChange {
                controller,
                value: PEDAL_UP,
            }));
            return;
        }
        if config.toggle_note_messages {
            // Toggling manufactures its own note-offs.
            return;
        }
        if config.ignore_note_off {
            return;
        }
        if config.invert_note_on_off {
            let velocity = if velocity == 0 {
                FALLBACK_VELOCITY
            } else {
                velocity
            };
            out.push(retag(event, MessageKind::NoteOn { note, velocity }));
            self.mark_on(note, event.message.channel);
            return;
        }
        out.push(*event);
        self.notes.set_off(note);
    }

    fn process_sustain_pedal(
        &self,
        config: &FilterConfig,
        event: &Event,
        value: u8,
        out: &mut Vec<Event>,
    ) {
        if config.ignore_sustain_pedal {
            return;
        }
        if config.notes_are_sustain_pedal {
            // Keys drive sustain in this mode; an incoming pedal message is
            // unclaimed and passes through untouched.
            out.push(*event);
            return;
        }
        if config.sostenuto_mode {
            out.push(retag(event, MessageKind::ControlChange {
                controller: cc::SOSTENUTO_PEDAL,
                value,
            }));
            return;
        }
        out.push(*event);
    }

    fn mark_on(&mut self, note: u8, channel: u8) {
        self.notes.set_on(note);
        self.note_channels[note as usize] = channel;
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

// Sustain wins when both reinterpretation flags are set.
fn pedal_reinterpretation(config: &FilterConfig) -> Option<u8> {
    if config.notes_are_sustain_pedal {
        Some(cc::SUSTAIN_PEDAL)
    } else if config.notes_are_sostenuto_pedal {
        Some(cc::SOSTENUTO_PEDAL)
    } else {
        None
    }
}

fn retag(event: &Event, kind: MessageKind) -> Event {
    Event::new(
        event.offset,
        Message {
            kind,
            channel: event.message.channel,
        },
    )
}
