use super::{classify, minimal_ttl, ResponseType};
use crate::ports::ResponseClassifier;
use chrono::{DateTime, Utc};
use hickory_proto::op::Message;
use std::time::Duration;

/// Classifier backed by [`classify`] and [`minimal_ttl`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardClassifier;

impl ResponseClassifier for StandardClassifier {
    fn classify(&self, msg: &Message, now: DateTime<Utc>) -> ResponseType {
        classify(msg, now)
    }

    fn minimal_ttl(&self, msg: &Message, response_type: ResponseType) -> Duration {
        minimal_ttl(msg, response_type)
    }
}
