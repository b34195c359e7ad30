//! Common code shared between `classify_server` and `scan_sender`.
pub mod classes;

pub use classes::{Classification, Prediction, TumorClass};

/// Error type.
pub type Error = Box<dyn std::error::Error>;
