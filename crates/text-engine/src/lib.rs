//! Robovid Text Engine
//!
//! Turns a search term into enriched sentence records:
//! - **Source:** fetch raw article text ([`TextSource`])
//! - **Sanitize:** drop blank and markup lines, strip parentheticals
//! - **Sentences:** split into narration units and apply the sentence cap
//! - **Keywords:** enrich each sentence ([`KeywordExtractor`])

pub mod keywords;
pub mod sanitize;
pub mod sentences;
pub mod source;
pub mod stage;

pub use keywords::*;
pub use sanitize::*;
pub use sentences::*;
pub use source::*;
pub use stage::*;
