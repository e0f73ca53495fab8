// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;
use std::rc::Rc;

use crate::analysis::BreakWeight;
use crate::context::{FontScope, GraphicsContext, PositionedGlyph};
use crate::geom::{Point, Rect, Transform};
use crate::segment::{
    Caret, ClusterBoundaries, DirectionDepth, DrawMode, HitTest, Layout, Navigation,
    SegmentCore, SegmentMetrics, TextSegment, VisualCluster,
};
use crate::shape::{ShapeRequest, ShapedText, Shaper};
use crate::source::RunProps;
use crate::Error;

/// A glyph placed relative to the segment origin and baseline, in source units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PlacedGlyph {
    id: u32,
    x: i32,
    y: i32,
}

#[derive(Clone, Debug)]
struct ShapedLayout {
    layout: Layout,
    glyphs: Vec<PlacedGlyph>,
}

/// A segment whose glyphs come from a [`Shaper`].
///
/// Trailing whitespace is not shaped while the segment ends its line. Both the
/// line-ending and the inner variant are cached, so toggling
/// [`set_end_of_line`](TextSegment::set_end_of_line) back and forth does not reshape.
#[derive(Debug)]
pub struct ShapedSegment {
    core: SegmentCore,
    shaper: Rc<dyn Shaper>,
    /// Cached layouts, indexed by the end-of-line flag.
    variants: [Option<ShapedLayout>; 2],
}

impl ShapedSegment {
    pub(crate) fn new(core: SegmentCore, shaper: Rc<dyn Shaper>) -> Self {
        Self {
            core,
            shaper,
            variants: [None, None],
        }
    }

    fn invalidate(&mut self) {
        self.variants = [None, None];
    }

    fn layout(&mut self, ctx: &mut dyn GraphicsContext) -> Result<&ShapedLayout, Error> {
        let slot = &mut self.variants[usize::from(self.core.end_of_line)];
        let layout = match slot.take() {
            Some(layout) => layout,
            None => {
                log::trace!(
                    "shaping segment {:?} (end of line: {})",
                    self.core.range,
                    self.core.end_of_line
                );
                build_layout(&self.core, self.shaper.as_ref(), ctx)?
            }
        };
        Ok(slot.insert(layout))
    }
}

fn shape(
    core: &SegmentCore,
    shaper: &dyn Shaper,
    dpi: u32,
    text: &[u16],
) -> Result<ShapedText, Error> {
    if text.is_empty() {
        return Ok(ShapedText::default());
    }
    shaper.shape(&ShapeRequest {
        font: &core.font,
        text,
        rtl: core.is_rtl(),
        dpi,
    })
}

fn build_layout(
    core: &SegmentCore,
    shaper: &dyn Shaper,
    ctx: &mut dyn GraphicsContext,
) -> Result<ShapedLayout, Error> {
    let (font, offset) = core.font_metrics(ctx)?;
    let dpi = ctx.dpi().0;
    let min = core.range.start;
    let trailing_start = core.trailing_whitespace_start();
    let shaped_end = if core.end_of_line {
        trailing_start
    } else {
        core.range.end
    };
    let mut shaped = shape(core, shaper, dpi, &core.text[..shaped_end - min])?;
    if core.stretch > 0 {
        shaper.justify(&mut shaped, core.stretch)?;
    }
    let shaped_width = shaped.width();
    let hanging = if core.end_of_line {
        shape(core, shaper, dpi, &core.text[trailing_start - min..])?.width()
    } else {
        0
    };

    let boundaries: Vec<usize> = core
        .boundaries
        .as_slice()
        .iter()
        .map(|&boundary| boundary - min)
        .collect();
    let groups = shaped.group(&boundaries);
    let mut pen = Vec::with_capacity(shaped.slots.len());
    let mut x = 0;
    let mut glyphs = Vec::with_capacity(shaped.slots.len());
    for slot in &shaped.slots {
        pen.push(x);
        glyphs.push(PlacedGlyph {
            id: slot.glyph_id,
            x: x + slot.offset.x,
            y: slot.offset.y,
        });
        x += slot.advance;
    }

    let rtl = core.is_rtl();
    let mut clusters: Vec<(usize, VisualCluster)> = Vec::with_capacity(groups.len());
    let mut previous: Option<(i32, i32)> = None;
    for (index, (chars, group)) in core.boundaries.clusters().zip(&groups).enumerate() {
        let placed = group.iter().map(|&slot| pen[slot]).min().map(|left| {
            let advance: i32 = group.iter().map(|&slot| shaped.slots[slot].advance).sum();
            (left, advance)
        });
        let (left, advance) = match (placed, previous) {
            (Some(placed), _) => placed,
            // Unshaped clusters sit at the logical end of their predecessor.
            (None, Some((left, advance))) => (if rtl { left } else { left + advance }, 0),
            (None, None) => (if rtl { shaped_width } else { 0 }, 0),
        };
        previous = Some((left, advance));
        clusters.push((
            index,
            VisualCluster {
                chars,
                x: left,
                advance,
            },
        ));
    }
    clusters.sort_by_key(|(index, cluster)| {
        let order = if rtl {
            usize::MAX - index
        } else {
            *index
        };
        (cluster.x, order)
    });

    let mut layout = Layout::new(font, offset, rtl);
    layout.clusters = clusters.into_iter().map(|(_, cluster)| cluster).collect();
    let trailing_width: i32 = layout
        .clusters
        .iter()
        .filter(|cluster| cluster.chars.start >= trailing_start)
        .map(|cluster| cluster.advance)
        .sum();
    layout.metrics.total_width = shaped_width + hanging;
    layout.metrics.visible_width = shaped_width - trailing_width;
    Ok(ShapedLayout { layout, glyphs })
}

impl TextSegment for ShapedSegment {
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
            self.invalidate();
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
        self.core.start_of_line = start_of_line;
    }

    fn set_end_of_line(&mut self, end_of_line: bool) {
        self.core.end_of_line = end_of_line;
    }

    fn stretch(&self) -> i32 {
        self.core.stretch
    }

    fn set_stretch(&mut self, amount: i32) -> Result<(), Error> {
        self.core.set_stretch(amount)?;
        self.invalidate();
        Ok(())
    }

    fn recompute(&mut self) {
        self.invalidate();
    }

    fn metrics(&mut self, ctx: &mut dyn GraphicsContext) -> Result<SegmentMetrics, Error> {
        Ok(self.layout(ctx)?.layout.metrics)
    }

    fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        mode: DrawMode,
    ) -> Result<i32, Error> {
        let end_of_line = self.core.end_of_line;
        let shaped = self.layout(ctx)?.clone();
        let core = &self.core;
        let metrics = shaped.layout.metrics;
        let width = metrics.width(end_of_line);
        let left = transform.map_x(0);
        let background = core.props.background;
        if mode == DrawMode::Opaque && !background.is_transparent() {
            let rect = Rect::from_size(width, metrics.height);
            ctx.fill_rect(transform.map_rect(rect), background)?;
        }
        if !shaped.glyphs.is_empty() {
            let baseline = shaped.layout.baseline;
            let origin = Point::new(left, transform.map_y(baseline));
            let glyphs: Vec<PositionedGlyph> = shaped
                .glyphs
                .iter()
                .map(|glyph| PositionedGlyph {
                    id: glyph.id,
                    x: transform.map_x(glyph.x) - left,
                    y: transform.map_y(baseline - glyph.y) - origin.y,
                })
                .collect();
            let mut scope = FontScope::install(ctx, &core.font)?;
            let passes = if mode == DrawMode::NoBackground { 2 } else { 1 };
            for _ in 0..passes {
                scope.draw_glyphs(origin, &glyphs, core.props.foreground)?;
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
        let shaped = self.layout(ctx)?.clone();
        Ok(self.core.hit_test(&shaped.layout, dpi_y, transform, point))
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
        let shaped = self.layout(ctx)?.clone();
        Ok(self.core.caret(&shaped.layout, transform, offset, assoc_prev))
    }

    fn selection_rect(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        range: Range<usize>,
    ) -> Result<Option<Rect>, Error> {
        let shaped = self.layout(ctx)?.clone();
        Ok(self.core.selection(&shaped.layout, transform, range))
    }
}
