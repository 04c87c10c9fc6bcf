use chrono::{DateTime, Utc};
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::op::{Message, OpCode, ResponseCode};
use hickory_proto::rr::{RData, Record, RecordType};
use std::fmt;

/// RFC 1982 serial arithmetic window for RRSIG timestamps.
const YEAR68: i64 = 1 << 31;

/// Coarse bucket a DNS response falls into, used to pick its cache lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Positive answer
    NoError,
    /// NXDOMAIN with an SOA in the authority section
    NameError,
    /// SERVFAIL or NOTIMP
    ServerError,
    /// NOERROR without answers but with an SOA
    NoData,
    /// Referral to other name servers
    Delegation,
    /// Zone transfers and NOTIFY
    Meta,
    /// Dynamic updates
    Update,
    /// Anything else, including expired signatures
    OtherError,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponseType::NoError => "NOERROR",
            ResponseType::NameError => "NXDOMAIN",
            ResponseType::ServerError => "SERVERERROR",
            ResponseType::NoData => "NODATA",
            ResponseType::Delegation => "DELEGATION",
            ResponseType::Meta => "META",
            ResponseType::Update => "UPDATE",
            ResponseType::OtherError => "OTHERERROR",
        };
        f.write_str(s)
    }
}

pub fn classify(msg: &Message, now: DateTime<Utc>) -> ResponseType {
    match msg.op_code() {
        OpCode::Update => return ResponseType::Update,
        OpCode::Notify => return ResponseType::Meta,
        _ => {}
    }

    if let Some(query) = msg.queries().first() {
        if matches!(query.query_type(), RecordType::AXFR | RecordType::IXFR) {
            return ResponseType::Meta;
        }
    }

    if has_expired_signature(msg, now.timestamp()) {
        return ResponseType::OtherError;
    }

    let rcode = msg.response_code();
    if !msg.answers().is_empty() && rcode == ResponseCode::NoError {
        return ResponseType::NoError;
    }

    let mut soa = false;
    let mut ns = 0usize;
    for record in msg.name_servers() {
        match record.record_type() {
            RecordType::SOA => soa = true,
            RecordType::NS => ns += 1,
            _ => {}
        }
    }

    match rcode {
        ResponseCode::NoError if soa => ResponseType::NoData,
        ResponseCode::NXDomain if soa => ResponseType::NameError,
        ResponseCode::ServFail | ResponseCode::NotImp => ResponseType::ServerError,
        ResponseCode::NoError if ns > 0 => ResponseType::Delegation,
        ResponseCode::NoError => ResponseType::NoError,
        _ => ResponseType::OtherError,
    }
}

fn has_expired_signature(msg: &Message, now: i64) -> bool {
    msg.answers()
        .iter()
        .chain(msg.name_servers())
        .chain(msg.additionals())
        .any(|record| signature_expired(record, now))
}

fn signature_expired(record: &Record, now: i64) -> bool {
    match record.data() {
        RData::DNSSEC(DNSSECRData::RRSIG(rrsig)) => {
            let input = rrsig.input();
            !signature_valid_at(input.sig_inception.get(), input.sig_expiration.get(), now)
        }
        _ => false,
    }
}

/// Whether `now` (unix seconds) lies within a signature's validity period.
///
/// Inception and expiration are 32-bit serials and wrap every 136 years.
pub fn signature_valid_at(inception: u32, expiration: u32, now: i64) -> bool {
    let modi = (i64::from(inception) - now) / YEAR68;
    let mode = (i64::from(expiration) - now) / YEAR68;
    let ti = i64::from(inception) + modi * YEAR68;
    let te = i64::from(expiration) + mode * YEAR68;
    ti <= now && now <= te
}
