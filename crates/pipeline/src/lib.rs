//! Robovid Pipeline
//!
//! Sequences the stages of one invocation over the content document:
//!
//! - **Text invocation:** fetch source, sanitize, split sentences, limit,
//!   fetch keywords
//! - **Render invocation:** sentence images, render script, video
//!
//! Content is loaded once at the start and saved only when every stage
//! succeeds.

pub mod coordinator;
pub mod stage;
pub mod stages;

pub use coordinator::{
    layout_for, PipelineCoordinator, RenderServices, RendererOutput, TextServices,
};
pub use stage::Stage;
