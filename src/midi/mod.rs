mod msg;

pub use msg::cc;
pub use msg::Event;
pub use msg::Message;
pub use msg::MessageKind;
pub use msg::NOTE_COUNT;
use tokio::sync::broadcast;

pub type Sender = broadcast::Sender<msg::Message>;
pub type Receiver = broadcast::Receiver<msg::Message>;

pub fn create_channel(buffer: usize) -> (Sender, Receiver) {
    broadcast::channel(buffer)
}
