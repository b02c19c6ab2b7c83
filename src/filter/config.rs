use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct FilterConfig {
    pub enabled: bool,
    pub all_notes_off: bool,
    pub toggle_note_messages: bool,
    pub ignore_note_on: bool,
    pub ignore_note_off: bool,
    pub invert_note_on_off: bool,
    pub ignore_sustain_pedal: bool,
    pub sostenuto_mode: bool,
    pub notes_are_sustain_pedal: bool,
    pub notes_are_sostenuto_pedal: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            all_notes_off: false,
            toggle_note_messages: false,
            ignore_note_on: false,
            ignore_note_off: false,
            invert_note_on_off: false,
            ignore_sustain_pedal: false,
            sostenuto_mode: false,
            notes_are_sustain_pedal: false,
            notes_are_sostenuto_pedal: false,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum UpdateKind {
    Enabled(bool),
    AllNotesOff(bool),
    ToggleNoteMessages(bool),
    IgnoreNoteOn(bool),
    IgnoreNoteOff(bool),
    InvertNoteOnOff(bool),
    IgnoreSustainPedal(bool),
    SostenutoMode(bool),
    NotesAreSustainPedal(bool),
    NotesAreSostenutoPedal(bool),
    Replace(FilterConfig),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Conflict {
    SustainAndSostenutoPedalNotes,
    SostenutoModeWithPedalNotes,
}

impl FilterConfig {
    pub fn apply(&mut self, kind: &UpdateKind) {
        match *kind {
            UpdateKind::Enabled(flag) => self.enabled = flag,
            UpdateKind::AllNotesOff(flag) => self.all_notes_off = flag,
            UpdateKind::ToggleNoteMessages(flag) => self.toggle_note_messages = flag,
            UpdateKind::IgnoreNoteOn(flag) => self.ignore_note_on = flag,
            UpdateKind::IgnoreNoteOff(flag) => self.ignore_note_off = flag,
            UpdateKind::InvertNoteOnOff(flag) => self.invert_note_on_off = flag,
            UpdateKind::IgnoreSustainPedal(flag) => self.ignore_sustain_pedal = flag,
            UpdateKind::SostenutoMode(flag) => self.sostenuto_mode = flag,
            UpdateKind::NotesAreSustainPedal(flag) => self.notes_are_sustain_pedal = flag,
            UpdateKind::NotesAreSostenutoPedal(flag) => self.notes_are_sostenuto_pedal = flag,
            UpdateKind::Replace(config) => *self = config,
        }
    }

    // Flag combinations are accepted as-is; the filter resolves them with a
    // fixed precedence. These are the combinations worth warning about.
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts = vec![];
        if self.notes_are_sustain_pedal && self.notes_are_sostenuto_pedal {
            conflicts.push(Conflict::SustainAndSostenutoPedalNotes);
        }
        if self.sostenuto_mode && (self.notes_are_sustain_pedal || self.notes_are_sostenuto_pedal) {
            conflicts.push(Conflict::SostenutoModeWithPedalNotes);
        }
        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates() {
        let mut config = FilterConfig::default();
        assert!(config.enabled);

        config.apply(&UpdateKind::ToggleNoteMessages(true));
        config.apply(&UpdateKind::IgnoreSustainPedal(true));
        assert!(config.toggle_note_messages);
        assert!(config.ignore_sustain_pedal);

        config.apply(&UpdateKind::ToggleNoteMessages(false));
        assert!(!config.toggle_note_messages);

        config.apply(&UpdateKind::Replace(FilterConfig::default()));
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn conflicts() {
        let config = FilterConfig::default();
        assert!(config.conflicts().is_empty());

        let config = FilterConfig {
            notes_are_sustain_pedal: true,
            notes_are_sostenuto_pedal: true,
            ..Default::default()
        };
        assert_eq!(
            config.conflicts(),
            vec![Conflict::SustainAndSostenutoPedalNotes]
        );

        let config = FilterConfig {
            sostenuto_mode: true,
            notes_are_sustain_pedal: true,
            ..Default::default()
        };
        assert_eq!(
            config.conflicts(),
            vec![Conflict::SostenutoModeWithPedalNotes]
        );
    }
}
