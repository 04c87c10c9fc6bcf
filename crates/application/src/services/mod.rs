mod classifier;
mod minimal_ttl;
mod response_type;

pub use classifier::StandardClassifier;
pub use minimal_ttl::{minimal_ttl, MAXIMUM_DEFAULT_TTL, MINIMAL_DEFAULT_TTL};
pub use response_type::{classify, signature_valid_at, ResponseType};
