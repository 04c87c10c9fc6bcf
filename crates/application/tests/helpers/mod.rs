#![allow(dead_code)]

mod mock_handlers;
mod messages;

pub use messages::*;
pub use mock_handlers::{FailingHandler, RecordingWriter, StaticHandler};
