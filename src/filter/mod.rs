pub mod config;
mod note_state;
mod processor;
mod shared;

pub use config::Conflict;
pub use config::FilterConfig;
pub use config::UpdateKind;
pub use note_state::NoteOnState;
pub use processor::Filter;
pub use shared::SharedConfig;
