//! Robovid Content Model
//!
//! Defines the data contracts shared by every pipeline stage:
//! - **Content:** the search term, source text, and ordered sentence records
//! - **Store:** atomic persistence of the content snapshot and render script
//! - **Assets:** deterministic file names keyed by role and sentence index
//! - **Templates:** per-index caption layout
//! - **Script:** the descriptor handed to the external renderer
//!
//! Sentence indices are the only addressing key used downstream: file
//! names and template lookup are both derived from them.

pub mod assets;
pub mod content;
pub mod script;
pub mod store;
pub mod template;

pub use assets::*;
pub use content::*;
pub use script::*;
pub use store::*;
pub use template::*;
