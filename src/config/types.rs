//! Configuration types for a reporting program.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};

use crate::models::Policy;

/// Metadata about the reporting program.
///
/// Identifies which report service and which term a policy applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Short program code (e.g., "SOTSUKEN").
    pub code: String,
    /// The human-readable name of the program.
    pub name: String,
    /// The academic term the policy covers.
    pub term: String,
    /// URL of the report service the records are fetched from.
    pub source_url: String,
}

/// The complete program configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    metadata: ProgramMetadata,
    policy: Policy,
}

impl ProgramConfig {
    /// Creates a new ProgramConfig from its component parts.
    pub fn new(metadata: ProgramMetadata, policy: Policy) -> Self {
        Self { metadata, policy }
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        &self.metadata
    }

    /// Returns the validated scoring policy.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}
