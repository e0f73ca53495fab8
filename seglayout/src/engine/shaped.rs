// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use crate::context::{FontRequest, GraphicsContext};
use crate::engine::{BreakResult, EngineConfig, RenderEngine};
use crate::search::{find_break, BreakRequest, Measurable, MeasuredCluster};
use crate::segment::{SegmentCore, ShapedSegment, TextSegment};
use crate::shape::{ShapeRequest, Shaper};
use crate::source::{RunProps, TextSource};
use crate::{BreakClassifier, Error};

/// Measures shaped clusters.
///
/// A cluster is the union of the character clusters and the spans of the glyphs shaped
/// from them, so a ligature is never split.
struct ClusterMeasurer<'a> {
    shaper: &'a dyn Shaper,
    classifier: BreakClassifier,
}

impl Measurable for ClusterMeasurer<'_> {
    fn measure(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        props: &RunProps,
        start: usize,
        text: &[u16],
        out: &mut Vec<MeasuredCluster>,
    ) -> Result<(), Error> {
        let font = FontRequest::from(props);
        let shaped = self.shaper.shape(&ShapeRequest {
            font: &font,
            text,
            rtl: props.rtl,
            dpi: ctx.dpi().0,
        })?;
        let boundaries = shaped.merge_boundaries(&self.classifier.cluster_starts(text));
        let groups = shaped.group(&boundaries);
        out.extend(
            boundaries
                .windows(2)
                .zip(&groups)
                .map(|(pair, group)| MeasuredCluster {
                    range: start + pair[0]..start + pair[1],
                    advance: group.iter().map(|&slot| shaped.slots[slot].advance).sum(),
                    hint: group
                        .iter()
                        .map(|&slot| &shaped.slots[slot])
                        .find(|slot| slot.chars.start == pair[0])
                        .and_then(|slot| slot.break_before),
                }),
        );
        Ok(())
    }
}

/// An engine that shapes text with a [`Shaper`] and breaks between shaped clusters.
#[derive(Debug)]
pub struct ShapedEngine {
    config: EngineConfig,
    classifier: BreakClassifier,
    shaper: Rc<dyn Shaper>,
}

impl ShapedEngine {
    /// Creates an engine shaping with `shaper`.
    pub fn new(shaper: Rc<dyn Shaper>) -> Self {
        Self::with_config(shaper, EngineConfig::default())
    }

    /// Creates an engine shaping with `shaper`, configured by `config`.
    pub fn with_config(shaper: Rc<dyn Shaper>, config: EngineConfig) -> Self {
        Self {
            config,
            classifier: BreakClassifier::new(),
            shaper,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shaper shared with the segments this engine creates.
    pub fn shaper(&self) -> &Rc<dyn Shaper> {
        &self.shaper
    }
}

impl RenderEngine for ShapedEngine {
    fn find_break(
        &mut self,
        source: &dyn TextSource,
        ctx: &mut dyn GraphicsContext,
        request: &BreakRequest,
    ) -> Result<BreakResult, Error> {
        let mut measurer = ClusterMeasurer {
            shaper: self.shaper.as_ref(),
            classifier: self.classifier,
        };
        let outcome = find_break(
            &mut measurer,
            source,
            ctx,
            &self.classifier,
            &self.config,
            request,
        )?;
        let classifier = self.classifier;
        let hit_slop = self.config.hit_slop;
        let shaper = Rc::clone(&self.shaper);
        BreakResult::new(outcome, ctx, |fit| {
            Box::new(ShapedSegment::new(
                SegmentCore::new(fit, classifier, hit_slop),
                shaper,
            )) as Box<dyn TextSegment>
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::EndReason;
    use crate::source::{Paragraph, WritingSystem};
    use crate::testing::{TestContext, TestShaper};

    fn engine() -> ShapedEngine {
        ShapedEngine::new(Rc::new(TestShaper::default()))
    }

    #[test]
    fn ligature_is_one_cluster() {
        let paragraph = Paragraph::new("fit", RunProps::new(WritingSystem(1), 10.0));
        let mut ctx = TestContext::new();
        let result = engine()
            .find_break(&paragraph, &mut ctx, &BreakRequest::new(0, 3, 100))
            .unwrap();
        assert_eq!(result.reason, EndReason::NoMore, "fits");
        let segment = result.segment.unwrap();
        assert_eq!(segment.cluster_boundaries().as_slice(), [0, 2, 3], "fi ligature");
    }

    #[test]
    fn ligature_is_never_clipped() {
        let paragraph = Paragraph::new("fit", RunProps::new(WritingSystem(1), 10.0));
        let mut ctx = TestContext::new();
        let request = BreakRequest::new(0, 3, 9).with_weights(
            crate::BreakWeight::Word,
            crate::BreakWeight::Clip,
        );
        let result = engine().find_break(&paragraph, &mut ctx, &request).unwrap();
        assert_eq!(result.consumed, 2, "the whole ligature");
        assert_eq!(result.width, 8, "ligature advance");
    }
}
