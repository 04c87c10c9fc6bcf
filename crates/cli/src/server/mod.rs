pub mod doh;

pub use doh::run_doh_server;
