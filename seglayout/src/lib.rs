// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-fitting text segments.
//!
//! A layout client feeds a paragraph of styled text to a [`RenderEngine`] which, one call
//! at a time, finds the best place to end the next [`TextSegment`]: a single-script piece
//! of text that fits a maximum width and can then be measured, drawn, hit-tested and
//! navigated on its own.
//!
//! Two engines are provided:
//!
//! - [`SimpleEngine`] measures raw characters through the [`GraphicsContext`].
//! - [`ShapedEngine`] delegates glyph shaping to a [`Shaper`] and searches for breaks
//!   over the shaped clusters.
//!
//! Both share one break search, driven by [`BreakRequest`].
//!
//! ## Features
//!
//! - `harfrust`: enables [`shape::HarfrustShaper`], a [`Shaper`] backed by `harfrust`.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analysis;
pub mod context;
pub mod engine;
mod error;
pub mod geom;
mod search;
pub mod segment;
pub mod shape;
pub mod source;
mod util;

#[cfg(test)]
mod testing;

pub use analysis::{BreakClassifier, BreakWeight};
pub use context::{FontMetrics, FontRequest, GraphicsContext, PositionedGlyph};
pub use engine::{BreakResult, EngineConfig, RenderEngine, ShapedEngine, SimpleEngine};
pub use error::{Error, ErrorKind};
pub use geom::{Point, Rect, Transform};
pub use search::{BreakRequest, EndReason, TrailingWhitespace};
pub use segment::{
    Caret, ClusterBoundaries, DirectionDepth, DrawMode, HitTest, InsertionPoint, Navigation,
    SegmentMetrics, TextSegment,
};
pub use shape::{GlyphSlot, ShapeRequest, ShapedText, Shaper};
pub use source::{Color, Paragraph, ParagraphBuilder, RunProps, TextSource, WritingSystem};
