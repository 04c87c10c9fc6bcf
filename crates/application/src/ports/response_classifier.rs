use crate::services::ResponseType;
use chrono::{DateTime, Utc};
use hickory_proto::op::Message;
use std::time::Duration;

pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, msg: &Message, now: DateTime<Utc>) -> ResponseType;

    /// Lifetime a cache may keep `msg` for.
    fn minimal_ttl(&self, msg: &Message, response_type: ResponseType) -> Duration;
}
