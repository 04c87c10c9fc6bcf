pub mod doh;
pub mod plugins;
