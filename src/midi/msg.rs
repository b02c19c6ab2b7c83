// Resources:
// https://www.songstuff.com/recording/article/midi_message_format/
// https://midi.org/expanded-midi-1-0-messages-list

use serde::{Deserialize, Serialize};

pub const NOTE_COUNT: usize = 128;

pub mod cc {
    pub const SUSTAIN_PEDAL: u8 = 64;
    pub const SOSTENUTO_PEDAL: u8 = 66;
    pub const SOFT_PEDAL: u8 = 67;
    pub const ALL_SOUND_OFF: u8 = 120;
    pub const ALL_NOTES_OFF: u8 = 123;
}

#[derive(Debug, Clone, PartialEq, Copy, Serialize, Deserialize)]
pub enum MessageKind {
    NoteOff { note: u8, velocity: u8 },
    NoteOn { note: u8, velocity: u8 },
    PolyphonicAftertouch { note: u8, pressure: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    ChannelAftertouch { pressure: u8 },
    PitchWheel { value: u16 },
}

impl MessageKind {
    pub fn as_number(&self) -> u8 {
        match *self {
            MessageKind::NoteOff { .. } => 0x80,
            MessageKind::NoteOn { .. } => 0x90,
            MessageKind::PolyphonicAftertouch { .. } => 0xA0,
            MessageKind::ControlChange { .. } => 0xB0,
            MessageKind::ProgramChange { .. } => 0xC0,
            MessageKind::ChannelAftertouch { .. } => 0xD0,
            MessageKind::PitchWheel { .. } => 0xE0,
        }
    }

    pub fn note(&self) -> Option<u8> {
        match *self {
            MessageKind::NoteOff { note, .. } => Some(note),
            MessageKind::NoteOn { note, .. } => Some(note),
            MessageKind::PolyphonicAftertouch { note, .. } => Some(note),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Copy, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub channel: u8,
}

impl Message {
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            kind: MessageKind::NoteOn { note, velocity },
            channel,
        }
    }

    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            kind: MessageKind::NoteOff { note, velocity },
            channel,
        }
    }

    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self {
            kind: MessageKind::ControlChange { controller, value },
            channel,
        }
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            decode_non_empty_message(bytes)
        }
    }

    pub fn encode(&self) -> ([u8; 3], usize) {
        let status = self.kind.as_number() | (self.channel & 0x0F);
        match self.kind {
            MessageKind::NoteOff { note, velocity } => ([status, note, velocity], 3),
            MessageKind::NoteOn { note, velocity } => ([status, note, velocity], 3),
            MessageKind::PolyphonicAftertouch { note, pressure } => ([status, note, pressure], 3),
            MessageKind::ControlChange { controller, value } => ([status, controller, value], 3),
            MessageKind::ProgramChange { program } => ([status, program, 0], 2),
            MessageKind::ChannelAftertouch { pressure } => ([status, pressure, 0], 2),
            MessageKind::PitchWheel { value } => {
                ([status, (value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8], 3)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Copy, Serialize, Deserialize)]
pub struct Event {
    pub offset: u32,
    pub message: Message,
}

impl Event {
    pub fn new(offset: u32, message: Message) -> Self {
        Self { offset, message }
    }
}

fn decode_non_empty_message(bytes: &[u8]) -> Option<Message> {
    let cmd = bytes[0] & 0xF0;
    let channel = bytes[0] & 0x0F;
    let kind = match cmd {
        0x80 => parse_note_off(bytes)?,
        0x90 => parse_note_on(bytes)?,
        0xA0 => parse_polyphonic_aftertouch(bytes)?,
        0xB0 => parse_control_change(bytes)?,
        0xC0 => parse_program_change(bytes)?,
        0xD0 => parse_channel_aftertouch(bytes)?,
        0xE0 => parse_pitch_wheel(bytes)?,
        _ => None?,
    };
    Some(Message { kind, channel })
}

fn parse_note_on(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 3 {
        None
    } else {
        let velocity = bytes[2];
        if velocity == 0 {
            Some(MessageKind::NoteOff {
                note: bytes[1],
                velocity,
            })
        } else {
            Some(MessageKind::NoteOn {
                note: bytes[1],
                velocity,
            })
        }
    }
}

fn parse_note_off(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 3 {
        None
    } else {
        Some(MessageKind::NoteOff {
            note: bytes[1],
            velocity: bytes[2],
        })
    }
}

fn parse_polyphonic_aftertouch(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 3 {
        None
    } else {
        Some(MessageKind::PolyphonicAftertouch {
            note: bytes[1],
            pressure: bytes[2],
        })
    }
}

fn parse_control_change(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 3 {
        None
    } else {
        Some(MessageKind::ControlChange {
            controller: bytes[1] & 0x7F,
            value: bytes[2],
        })
    }
}

fn parse_program_change(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 2 {
        None
    } else {
        Some(MessageKind::ProgramChange { program: bytes[1] })
    }
}

fn parse_channel_aftertouch(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 2 {
        None
    } else {
        Some(MessageKind::ChannelAftertouch { pressure: bytes[1] })
    }
}

fn parse_pitch_wheel(bytes: &[u8]) -> Option<MessageKind> {
    if bytes.len() < 3 {
        None
    } else {
        let value = ((bytes[1] as u16) & 0x7F) | (((bytes[2] as u16) & 0x7F) << 7);
        Some(MessageKind::PitchWheel { value })
    }
}
