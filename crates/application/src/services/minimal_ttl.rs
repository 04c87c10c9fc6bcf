use super::ResponseType;
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use std::time::Duration;

/// Fallback lifetime for responses that carry nothing cacheable.
pub const MINIMAL_DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Upper bound for any derived lifetime.
pub const MAXIMUM_DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Smallest TTL across the answer, authority and additional sections.
///
/// OPT pseudo-records are skipped: their TTL field holds EDNS flags.
pub fn minimal_ttl(msg: &Message, response_type: ResponseType) -> Duration {
    if !matches!(
        response_type,
        ResponseType::NoError | ResponseType::NameError | ResponseType::NoData
    ) {
        return MINIMAL_DEFAULT_TTL;
    }

    let extras = msg
        .additionals()
        .iter()
        .filter(|r| r.record_type() != RecordType::OPT);

    if msg.answers().is_empty() && msg.name_servers().is_empty() && extras.clone().count() == 0 {
        return MINIMAL_DEFAULT_TTL;
    }

    let min_secs = msg
        .answers()
        .iter()
        .chain(msg.name_servers())
        .chain(extras)
        .map(|r| u64::from(r.ttl()))
        .fold(MAXIMUM_DEFAULT_TTL.as_secs(), u64::min);

    Duration::from_secs(min_secs)
}
