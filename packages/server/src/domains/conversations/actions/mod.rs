mod open_conversation;
mod send_message;

pub use open_conversation::open_conversation;
pub use send_message::{mark_conversation_read, send_message};
