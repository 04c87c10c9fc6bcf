mod dns_handler;
mod response_classifier;
mod response_writer;
mod stream_server;

pub use dns_handler::DnsHandler;
pub use response_classifier::ResponseClassifier;
pub use response_writer::ResponseWriter;
pub use stream_server::StreamServer;
