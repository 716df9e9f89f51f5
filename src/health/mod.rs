//! Connectivity checks

pub mod probe;

pub use probe::{ConnectivityProbe, HttpProbe};
