//! Subscriber channel: a TCP endpoint speaking length-prefixed JSON frames.
//! It includes the `console_endpoint` module for accepting subscribers and
//! framing, the `console_messenger` module for the outbound half of a
//! connection, and the `console_messages` module for the downstream messages.

mod console_endpoint;
mod console_messages;
mod console_messenger;


pub use console_endpoint::{ConsoleEndpoint, read_frame, write_frame};
pub use console_messages::DownstreamMessage;
pub use console_messenger::ConsoleMessenger;
