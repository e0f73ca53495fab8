// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use crate::analysis::BreakWeight;
use crate::context::{FontScope, GraphicsContext};
use crate::geom::{Point, Rect, Transform};
use crate::segment::{
    Caret, ClusterBoundaries, DirectionDepth, DrawMode, HitTest, Layout, Navigation,
    SegmentCore, SegmentMetrics, TextSegment,
};
use crate::source::RunProps;
use crate::Error;

/// A segment measured character by character through the graphics context.
#[derive(Debug)]
pub struct SimpleSegment {
    core: SegmentCore,
    layout: Option<Layout>,
}

impl SimpleSegment {
    pub(crate) fn new(core: SegmentCore) -> Self {
        Self { core, layout: None }
    }

    fn layout(&mut self, ctx: &mut dyn GraphicsContext) -> Result<&Layout, Error> {
        let layout = match self.layout.take() {
            Some(layout) => layout,
            None => build_layout(&self.core, ctx)?,
        };
        Ok(self.layout.insert(layout))
    }
}

/// Splits `extra` units over `slots`, giving the remainder to the first ones.
fn spread(advances: &mut [i32], slots: &[usize], extra: i32) {
    let Ok(count) = i32::try_from(slots.len()) else {
        return;
    };
    if count == 0 {
        return;
    }
    let share = extra / count;
    let mut remainder = extra % count;
    for &slot in slots {
        advances[slot] += share;
        if remainder > 0 {
            advances[slot] += 1;
            remainder -= 1;
        }
    }
}

fn build_layout(core: &SegmentCore, ctx: &mut dyn GraphicsContext) -> Result<Layout, Error> {
    let (font, offset) = core.font_metrics(ctx)?;
    let mut partial = Vec::with_capacity(core.text.len());
    if !core.text.is_empty() {
        let mut scope = FontScope::install(ctx, &core.font)?;
        scope.text_extent(&core.text, &mut partial)?;
    }
    let min = core.range.start;
    let width_before = |offset: usize| {
        offset
            .checked_sub(min + 1)
            .and_then(|index| partial.get(index).copied())
            .unwrap_or(0)
    };
    let clusters: Vec<Range<usize>> = core.boundaries.clusters().collect();
    let mut advances: Vec<i32> = clusters
        .iter()
        .map(|cluster| width_before(cluster.end) - width_before(cluster.start))
        .collect();

    let trailing_start = core.trailing_whitespace_start();
    let trailing = clusters
        .iter()
        .position(|cluster| cluster.start >= trailing_start)
        .unwrap_or(clusters.len());
    if core.stretch > 0 {
        let interior: Vec<usize> = (0..trailing)
            .filter(|&index| core.is_space_at(clusters[index].start))
            .collect();
        if !interior.is_empty() {
            spread(&mut advances, &interior, core.stretch);
        } else if let Some(last) = trailing.checked_sub(1).or(clusters.len().checked_sub(1)) {
            advances[last] += core.stretch;
        }
    }
    let total_width: i32 = advances.iter().sum();
    let visible_width: i32 = advances[..trailing].iter().sum();
    if core.end_of_line {
        for advance in &mut advances[trailing..] {
            *advance = 0;
        }
    }

    let mut layout = Layout::new(font, offset, core.is_rtl());
    layout.metrics.total_width = total_width;
    layout.metrics.visible_width = visible_width;
    layout.place(clusters.into_iter().zip(advances));
    Ok(layout)
}

impl TextSegment for SimpleSegment {
    fn range(&self) -> Range<usize> {
        self.core.range.clone()
    }

    fn text(&self) -> &[u16] {
        &self.core.text
    }

    fn props(&self) -> &RunProps {
        &self.core.props
    }

    fn cluster_boundaries(&self) -> &ClusterBoundaries {
        &self.core.boundaries
    }

    fn direction_depth(&self) -> DirectionDepth {
        self.core.depth
    }

    fn set_direction_depth(&mut self, depth: u8) -> Result<(), Error> {
        if self.core.set_direction_depth(depth)? {
            self.layout = None;
        }
        Ok(())
    }

    fn start_break_weight(&self) -> Option<BreakWeight> {
        self.core.start_weight
    }

    fn end_break_weight(&self) -> Option<BreakWeight> {
        self.core.end_weight
    }

    fn start_of_line(&self) -> bool {
        self.core.start_of_line
    }

    fn end_of_line(&self) -> bool {
        self.core.end_of_line
    }

    fn set_start_of_line(&mut self, start_of_line: bool) {
        if self.core.start_of_line != start_of_line {
            self.core.start_of_line = start_of_line;
            self.layout = None;
        }
    }

    fn set_end_of_line(&mut self, end_of_line: bool) {
        if self.core.end_of_line != end_of_line {
            self.core.end_of_line = end_of_line;
            self.layout = None;
        }
    }

    fn stretch(&self) -> i32 {
        self.core.stretch
    }

    fn set_stretch(&mut self, amount: i32) -> Result<(), Error> {
        self.core.set_stretch(amount)?;
        self.layout = None;
        Ok(())
    }

    fn recompute(&mut self) {
        self.layout = None;
    }

    fn metrics(&mut self, ctx: &mut dyn GraphicsContext) -> Result<SegmentMetrics, Error> {
        Ok(self.layout(ctx)?.metrics)
    }

    fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        mode: DrawMode,
    ) -> Result<i32, Error> {
        let end_of_line = self.core.end_of_line;
        let layout = self.layout(ctx)?.clone();
        let core = &self.core;
        let width = layout.metrics.width(end_of_line);
        let left = transform.map_x(0);
        let background = core.props.background;
        if mode == DrawMode::Opaque && !background.is_transparent() {
            let rect = Rect::from_size(width, layout.metrics.height);
            ctx.fill_rect(transform.map_rect(rect), background)?;
        }
        let mut units = Vec::with_capacity(core.text.len());
        let mut advances = Vec::with_capacity(core.text.len());
        for cluster in &layout.clusters {
            let chars = cluster.chars.start - core.range.start..cluster.chars.end - core.range.start;
            let advance = transform.map_x(cluster.x + cluster.advance) - transform.map_x(cluster.x);
            units.extend_from_slice(&core.text[chars.clone()]);
            advances.push(advance);
            advances.extend(std::iter::repeat_n(0, chars.len() - 1));
        }
        if !units.is_empty() {
            let origin = Point::new(left, transform.map_y(layout.baseline));
            let mut scope = FontScope::install(ctx, &core.font)?;
            let passes = if mode == DrawMode::NoBackground { 2 } else { 1 };
            for _ in 0..passes {
                scope.draw_text(origin, &units, &advances, core.props.foreground)?;
            }
        }
        Ok(transform.map_x(width) - left)
    }

    fn point_to_char(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        point: Point,
    ) -> Result<HitTest, Error> {
        let dpi_y = ctx.dpi().1;
        let layout = self.layout(ctx)?.clone();
        Ok(self.core.hit_test(&layout, dpi_y, transform, point))
    }

    fn arrow_key_position(
        &self,
        offset: usize,
        assoc_prev: bool,
        move_right: bool,
        entering: bool,
    ) -> Result<Navigation, Error> {
        self.core
            .navigate(offset, assoc_prev, move_right, entering, false)
    }

    fn extend_selection_position(
        &self,
        offset: usize,
        assoc_prev: bool,
        move_right: bool,
        entering: bool,
    ) -> Result<Navigation, Error> {
        self.core
            .navigate(offset, assoc_prev, move_right, entering, true)
    }

    fn caret_position(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        offset: usize,
        assoc_prev: bool,
    ) -> Result<Option<Caret>, Error> {
        let layout = self.layout(ctx)?.clone();
        Ok(self.core.caret(&layout, transform, offset, assoc_prev))
    }

    fn selection_rect(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        range: Range<usize>,
    ) -> Result<Option<Rect>, Error> {
        let layout = self.layout(ctx)?.clone();
        Ok(self.core.selection(&layout, transform, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Fit;
    use crate::source::WritingSystem;
    use crate::testing::TestContext;
    use crate::BreakClassifier;

    fn segment(text: &str, end_of_line: bool) -> SimpleSegment {
        let classifier = BreakClassifier::new();
        let units: Vec<u16> = text.encode_utf16().collect();
        let boundaries = classifier.cluster_starts(&units);
        let fit = Fit {
            range: 0..units.len(),
            text: units,
            props: RunProps::new(WritingSystem(1), 10.0),
            boundaries,
            depth: DirectionDepth::default(),
            paragraph_rtl: false,
            start_weight: Some(BreakWeight::Word),
            end_weight: Some(BreakWeight::Word),
            start_of_line: true,
            end_of_line,
        };
        SimpleSegment::new(SegmentCore::new(fit, classifier, 15.0))
    }

    #[test]
    fn trailing_whitespace_hangs_at_end_of_line() {
        let mut ctx = TestContext::new();
        let mut segment = segment("cat  ", true);
        assert_eq!(segment.width(&mut ctx).unwrap(), 15, "visible width");
        segment.set_end_of_line(false);
        assert_eq!(segment.width(&mut ctx).unwrap(), 19, "total width");
    }

    #[test]
    fn stretch_goes_to_interior_spaces() {
        let mut ctx = TestContext::new();
        let mut segment = segment("a b c", true);
        segment.set_stretch(5).unwrap();
        assert_eq!(segment.width(&mut ctx).unwrap(), 24, "19 plus 5");
        let err = segment.set_stretch(2).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::AlreadyStretched, "stretched once");
        segment.set_stretch(0).unwrap();
        assert_eq!(segment.width(&mut ctx).unwrap(), 19, "cleared");
    }

    #[test]
    fn stretch_without_spaces_goes_to_last_cluster() {
        let mut ctx = TestContext::new();
        let mut segment = segment("abc", true);
        segment.set_stretch(4).unwrap();
        assert_eq!(segment.width(&mut ctx).unwrap(), 19, "15 plus 4");
    }

    #[test]
    fn direction_of_strong_segment_is_fixed() {
        let mut segment = segment("abc", true);
        segment.set_direction_depth(2).unwrap();
        let err = segment.set_direction_depth(1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DirectionFixed, "parity flip");
    }
}
