//! Prompt System - directive text and rendering
//!
//! The generator and the critic each receive one directive string per call.

mod directive;
pub mod templates;

pub use directive::{critic_directive, generation_directive, render};
pub use templates::{CRITIC_SYSTEM, GENERATOR_SYSTEM, REGENERATION_NOTE};
