//! The unit of work the coordinator sequences.

use async_trait::async_trait;
use robovid_common::error::RobovidResult;
use robovid_content_model::{Content, ContentField};

/// One step of an invocation.
///
/// A stage receives the document exclusively for the duration of `run` and
/// may only change the fields it lists in [`Stage::writes`].
#[async_trait]
pub trait Stage: Send {
    /// Stage name for logs and errors.
    fn name(&self) -> &'static str;

    /// Content fields this stage is allowed to change.
    fn writes(&self) -> &'static [ContentField];

    async fn run(&mut self, content: &mut Content) -> RobovidResult<()>;
}
