// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::context::{FontRequest, FontScope, GraphicsContext};
use crate::engine::{BreakResult, EngineConfig, RenderEngine};
use crate::search::{find_break, BreakRequest, Measurable, MeasuredCluster};
use crate::segment::{SegmentCore, SimpleSegment, TextSegment};
use crate::source::{RunProps, TextSource};
use crate::{BreakClassifier, Error};

/// Measures raw characters through the graphics context.
pub(crate) struct CharMeasurer {
    classifier: BreakClassifier,
    partial: Vec<i32>,
}

impl CharMeasurer {
    pub(crate) fn new(classifier: BreakClassifier) -> Self {
        Self {
            classifier,
            partial: Vec::new(),
        }
    }
}

impl Measurable for CharMeasurer {
    fn measure(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        props: &RunProps,
        start: usize,
        text: &[u16],
        out: &mut Vec<MeasuredCluster>,
    ) -> Result<(), Error> {
        let mut scope = FontScope::install(ctx, &FontRequest::from(props))?;
        scope.text_extent(text, &mut self.partial)?;
        let width_at = |offset: usize| {
            offset
                .checked_sub(1)
                .and_then(|index| self.partial.get(index).copied())
                .unwrap_or(0)
        };
        let starts = self.classifier.cluster_starts(text);
        out.extend(starts.windows(2).map(|pair| MeasuredCluster {
            range: start + pair[0]..start + pair[1],
            advance: width_at(pair[1]) - width_at(pair[0]),
            hint: None,
        }));
        Ok(())
    }
}

/// An engine for scripts that need no shaping.
///
/// Characters are measured one by one with
/// [`GraphicsContext::text_extent`]; clusters follow
/// [`BreakClassifier::cluster_starts`].
#[derive(Debug, Default)]
pub struct SimpleEngine {
    config: EngineConfig,
    classifier: BreakClassifier,
}

impl SimpleEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            classifier: BreakClassifier::new(),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl RenderEngine for SimpleEngine {
    fn find_break(
        &mut self,
        source: &dyn TextSource,
        ctx: &mut dyn GraphicsContext,
        request: &BreakRequest,
    ) -> Result<BreakResult, Error> {
        let mut measurer = CharMeasurer::new(self.classifier);
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
        BreakResult::new(outcome, ctx, |fit| {
            Box::new(SimpleSegment::new(SegmentCore::new(fit, classifier, hit_slop)))
                as Box<dyn TextSegment>
        })
    }
}
