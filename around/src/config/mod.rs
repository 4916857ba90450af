//! Configuration and dependency initialization for the around service.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ConnectionMode, Settings, DEFAULT_MAX_UPLOAD_BYTES};
