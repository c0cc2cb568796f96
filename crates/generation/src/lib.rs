//! Unit generation for Stride progression graphs.
//!
//! The engine treats generation as an opaque collaborator: a description goes
//! in, an ordered, validated unit list comes out. This crate defines that
//! seam ([`UnitGenerator`]), a deterministic [`TemplateGenerator`] fallback,
//! and an [`HttpGenerator`] client for the platform's content service.

#![warn(missing_docs)]

pub mod plan;
pub mod template;
pub mod http;

pub use http::HttpGenerator;
pub use plan::{GeneratedPlan, GenerationError, UnitDraft};
pub use template::TemplateGenerator;

use async_trait::async_trait;

/// Produces the initial unit set for a new progression graph.
///
/// Implementations are pure from the engine's point of view: the same
/// description yields a plan, and the engine owns everything after that.
#[async_trait]
pub trait UnitGenerator: Send + Sync {
    /// Generate an ordered unit plan for a subject or task description.
    async fn generate(&self, description: &str) -> Result<GeneratedPlan, GenerationError>;
}
