//! Configuration module for secret-drop
//!
//! - Path resolution for the settings and data files
//! - Immutable settings (iteration count, lifetime, size bound) passed
//!   explicitly to the services that need them

pub mod paths;
pub mod settings;

pub use paths::SecretDropPaths;
pub use settings::Settings;
