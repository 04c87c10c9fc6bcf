//! RFC 8484 wire mapping between HTTP requests and DNS messages.
//!
//! ```text
//! GET  /dns-query?dns=<base64url, unpadded>
//! POST /dns-query            Content-Type: application/dns-message
//! ```

use axum::body::{to_bytes, Body};
use axum::extract::Query;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use http::{header, Method, Request};
use thiserror::Error;

/// Fixed endpoint every DoH request must target.
pub const DOH_PATH: &str = "/dns-query";

/// Media type of DNS wire-format payloads (RFC 8484 §6).
pub const MIME_TYPE: &str = "application/dns-message";

/// Largest POST body read from a client.
pub const MAX_BODY_SIZE: usize = 65_536;

const DNS_PARAM: &str = "dns";

#[derive(Debug, Error)]
pub enum DohRequestError {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(Method),

    #[error("no 'dns' query parameter found")]
    MissingDnsParam,

    #[error("multiple 'dns' query values found")]
    MultipleDnsParams,

    #[error("malformed query string: {0}")]
    InvalidQueryString(String),

    #[error("illegal base64url data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("failed to unpack DNS message: {0}")]
    Unpack(String),

    #[error("failed to pack DNS message: {0}")]
    Pack(String),

    #[error("failed to build request: {0}")]
    Build(String),
}

/// Extracts the DNS query carried by a DoH request.
pub async fn request_to_msg(req: Request<Body>) -> Result<Message, DohRequestError> {
    let method = req.method().clone();
    let buf = match method {
        Method::GET => {
            let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
                .map_err(|e| DohRequestError::InvalidQueryString(e.body_text()))?;
            let mut values = pairs.into_iter().filter(|(k, _)| k == DNS_PARAM);
            let (_, encoded) = values.next().ok_or(DohRequestError::MissingDnsParam)?;
            if values.next().is_some() {
                return Err(DohRequestError::MultipleDnsParams);
            }
            URL_SAFE_NO_PAD.decode(encoded.as_bytes())?
        }
        Method::POST => to_bytes(req.into_body(), MAX_BODY_SIZE)
            .await
            .map_err(|e| DohRequestError::Body(e.to_string()))?
            .to_vec(),
        other => return Err(DohRequestError::MethodNotAllowed(other)),
    };

    Message::from_vec(&buf).map_err(|e| DohRequestError::Unpack(e.to_string()))
}

/// Serializes `msg` to DNS wire format.
pub fn msg_to_bytes(msg: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    msg.emit(&mut encoder)
        .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;
    Ok(buf)
}

/// Builds a client-side DoH request for `msg` against `authority`
/// (`host[:port]`).
pub fn new_request(
    method: &Method,
    authority: &str,
    msg: &Message,
) -> Result<Request<Body>, DohRequestError> {
    let buf = msg_to_bytes(msg).map_err(|e| DohRequestError::Pack(e.to_string()))?;

    let builder = match *method {
        Method::GET => {
            let encoded = URL_SAFE_NO_PAD.encode(&buf);
            Request::get(format!(
                "https://{}{}?{}={}",
                authority, DOH_PATH, DNS_PARAM, encoded
            ))
            .header(header::ACCEPT, MIME_TYPE)
            .body(Body::empty())
        }
        Method::POST => Request::post(format!("https://{}{}", authority, DOH_PATH))
            .header(header::CONTENT_TYPE, MIME_TYPE)
            .header(header::ACCEPT, MIME_TYPE)
            .body(Body::from(buf)),
        ref other => return Err(DohRequestError::MethodNotAllowed(other.clone())),
    };

    builder.map_err(|e| DohRequestError::Build(e.to_string()))
}
