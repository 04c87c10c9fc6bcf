//! DNS-over-HTTPS (RFC 8484) transport: wire codec, per-request response
//! writer and the HTTP server adapter that feeds the zone server.

pub mod codec;
pub mod server;
pub mod writer;

pub use codec::{
    msg_to_bytes, new_request, request_to_msg, DohRequestError, DOH_PATH, MAX_BODY_SIZE,
    MIME_TYPE,
};
pub use server::{router, DohHandler, ServerHttp, ServerHttpOptions};
pub use writer::DohWriter;
