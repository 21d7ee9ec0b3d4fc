//! Robovid Render Engine
//!
//! Produces the visual assets for each sentence and drives the external
//! renderer that assembles them into the final video.
//!
//! # Pipeline Architecture
//!
//! ```text
//! {i}-original.png ──► BlurredBackground ──► {i}-converted.png ──┐
//!                                                                ├──► renderer ──► output.mov
//! sentences[i].text ─► Caption (template i) ─► {i}-sentence.png ─┤        ▲
//!                                                                │        │
//! 0-converted.png ───► Thumbnail ──────────► youtube-thumbnail ──┘   render script
//! ```

pub mod compositor;
pub mod images;
pub mod supervisor;

pub use compositor::*;
pub use images::*;
pub use supervisor::*;
