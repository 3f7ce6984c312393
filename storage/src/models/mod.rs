mod last_message;
mod message_record;

pub use last_message::LastMessagePointer;
pub use message_record::{MessageRecord, NewMessage};
