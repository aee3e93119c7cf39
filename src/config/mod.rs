//! Configuration loading for the attendance engine.
//!
//! This module loads a reporting program's metadata and scoring policy from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sotsuken").unwrap();
//! println!("Loaded program: {}", config.program().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ProgramConfig, ProgramMetadata};
