mod zones;

pub use zones::build_sites;
