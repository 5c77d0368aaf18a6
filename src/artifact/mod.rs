//! Artifact module - the persisted result of a run

pub mod adcp;

pub use adcp::{ADCP_VERSION, DEFAULT_OUTPUT_PATH, OutputArtifact, TASK};
