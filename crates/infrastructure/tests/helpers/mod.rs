#![allow(dead_code)]
mod handlers;
mod messages;
mod mock_upstream;

pub use handlers::{AnswerHandler, FailingHandler, SilentHandler};
pub use messages::*;
pub use mock_upstream::{MockUpstream, UpstreamMode, ANSWER_IP};
