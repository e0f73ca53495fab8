// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engines that find segment breaks.

mod shaped;
mod simple;

pub use shaped::ShapedEngine;
pub use simple::SimpleEngine;

use crate::context::GraphicsContext;
use crate::search::{BreakRequest, EndReason, Fit, Outcome};
use crate::segment::TextSegment;
use crate::source::TextSource;
use crate::Error;

/// Tuning shared by both engines.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Number of code units fetched and measured by the first round of a search.
    pub initial_fetch: usize,
    /// Number of code units fetched past the measured text, so the break at its end can
    /// be classified.
    pub lookahead: usize,
    /// Distance in points above or below a segment within which a click still hits its
    /// text; clicks further away snap to the segment's start or end.
    pub hit_slop: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_fetch: 32,
            lookahead: 8,
            hit_slop: 15.0,
        }
    }
}

/// The result of [`RenderEngine::find_break`].
#[derive(Debug)]
pub struct BreakResult {
    /// The new segment, or `None` when nothing could be placed.
    pub segment: Option<Box<dyn TextSegment>>,
    /// Number of code units covered by the segment.
    pub consumed: usize,
    /// Width of the segment on its line, in context units.
    pub width: i32,
    /// Why the segment ends where it does.
    pub reason: EndReason,
}

impl BreakResult {
    fn empty(reason: EndReason) -> Self {
        Self {
            segment: None,
            consumed: 0,
            width: 0,
            reason,
        }
    }

    /// Measures a newly built segment.
    pub(crate) fn new(
        outcome: Outcome,
        ctx: &mut dyn GraphicsContext,
        build: impl FnOnce(Fit) -> Box<dyn TextSegment>,
    ) -> Result<Self, Error> {
        let Some(fit) = outcome.fit else {
            return Ok(Self::empty(outcome.reason));
        };
        let consumed = fit.range.len();
        let mut segment = build(fit);
        let width = segment.width(ctx)?;
        Ok(Self {
            segment: Some(segment),
            consumed,
            width,
            reason: outcome.reason,
        })
    }
}

/// Produces segments for a line-layout client.
///
/// Clients call [`find_break`](Self::find_break) repeatedly, each time starting at the end
/// of the previous segment.
pub trait RenderEngine: core::fmt::Debug {
    /// Finds the best segment starting at `request.min` that fits `request.max_width`.
    fn find_break(
        &mut self,
        source: &dyn TextSource,
        ctx: &mut dyn GraphicsContext,
        request: &BreakRequest,
    ) -> Result<BreakResult, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Paragraph, RunProps, WritingSystem};
    use crate::testing::TestContext;

    #[test]
    fn null_results_are_empty() {
        let paragraph = Paragraph::new("abc", RunProps::new(WritingSystem(1), 10.0));
        let mut engine = SimpleEngine::new();
        let mut ctx = TestContext::new();
        let request = BreakRequest::new(1, 3, 100).with_backtrack_limit(1, true);
        let result = engine.find_break(&paragraph, &mut ctx, &request).unwrap();
        assert!(result.segment.is_none(), "no segment");
        assert_eq!(result.consumed, 0, "nothing consumed");
        assert_eq!(result.width, 0, "no width");
        assert_eq!(result.reason, EndReason::NoMore, "backtrack limit at min");
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_fetch, 32, "first fetch");
        assert_eq!(config.lookahead, 8, "lookahead");
        assert_eq!(config.hit_slop, 15.0, "slop in points");
    }
}
