// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segments: single-script pieces of a line.

mod layout;
mod shaped;
mod simple;

pub use shaped::ShapedSegment;
pub use simple::SimpleSegment;

use std::ops::Range;

pub(crate) use layout::{Layout, VisualCluster};

use crate::analysis::BreakWeight;
use crate::context::{FontMetrics, FontRequest, FontScope, GraphicsContext};
use crate::geom::{Point, Rect, Transform};
use crate::search::Fit;
use crate::source::RunProps;
use crate::util::{char_at, points_to_units};
use crate::{BreakClassifier, Error};

/// How many bidi embedding reversals separate a segment from its paragraph direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionDepth {
    /// The depth; even means the paragraph direction, odd the reverse.
    pub depth: u8,
    /// Whether the depth may still change parity (whitespace-only segments).
    pub weak: bool,
}

/// Whether [`TextSegment::draw`] paints the background.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Fill the background, then draw the text.
    #[default]
    Opaque,
    /// Leave the background alone and paint the text twice, so segments that overlap
    /// their neighbours keep the same stroke weight.
    NoBackground,
}

/// Whether an offset is a valid insertion point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsertionPoint {
    /// A cluster boundary of this segment.
    Ok,
    /// Inside a cluster.
    Bad,
    /// Outside this segment; ask a neighbouring segment.
    Unknown,
}

/// The result of hit-testing a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HitTest {
    /// The insertion point closest to the point.
    pub offset: usize,
    /// Whether the insertion point is associated with the character before it.
    pub assoc_prev: bool,
}

/// The result of moving an insertion point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Navigation {
    /// The new insertion point, or the old one when not handled.
    pub offset: usize,
    /// Whether the new insertion point is associated with the character before it.
    pub assoc_prev: bool,
    /// False when the move leaves the segment and a neighbour should handle it.
    pub handled: bool,
}

/// Where an insertion point is drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Caret {
    /// The caret rectangle, in destination units.
    pub rect: Rect,
    /// Whether the cluster the caret is attached to runs right-to-left.
    pub rtl: bool,
}

/// Cached measurements of a segment, in context units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SegmentMetrics {
    /// Width including trailing whitespace and stretch.
    pub total_width: i32,
    /// Width without trailing whitespace.
    pub visible_width: i32,
    /// Height of the segment.
    pub height: i32,
    /// Distance from the top of the segment to its baseline.
    pub ascent: i32,
}

impl SegmentMetrics {
    /// The width the segment occupies on its line.
    pub fn width(&self, end_of_line: bool) -> i32 {
        if end_of_line {
            self.visible_width
        } else {
            self.total_width
        }
    }
}

/// The sorted cluster boundaries of a segment, from its start to its end inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterBoundaries(Vec<usize>);

impl ClusterBoundaries {
    /// Wraps a strictly increasing list of offsets.
    pub fn new(offsets: Vec<usize>) -> Self {
        debug_assert!(
            offsets.windows(2).all(|pair| pair[0] < pair[1]),
            "cluster boundaries must be strictly increasing"
        );
        Self(offsets)
    }

    /// The boundaries as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Returns true if `offset` is a boundary.
    pub fn contains(&self, offset: usize) -> bool {
        self.0.binary_search(&offset).is_ok()
    }

    /// The first boundary after `offset`.
    pub fn next_after(&self, offset: usize) -> Option<usize> {
        let index = self.0.partition_point(|&boundary| boundary <= offset);
        self.0.get(index).copied()
    }

    /// The last boundary before `offset`.
    pub fn prev_before(&self, offset: usize) -> Option<usize> {
        let index = self.0.partition_point(|&boundary| boundary < offset);
        index.checked_sub(1).map(|index| self.0[index])
    }

    /// The index of the cluster containing `offset`.
    pub(crate) fn cluster_index(&self, offset: usize) -> Option<usize> {
        let index = self.0.partition_point(|&boundary| boundary <= offset);
        (index > 0 && index < self.0.len()).then(|| index - 1)
    }

    /// Iterates the clusters as ranges, in logical order.
    pub fn clusters(&self) -> impl DoubleEndedIterator<Item = Range<usize>> + '_ {
        self.0.windows(2).map(|pair| pair[0]..pair[1])
    }

    /// Number of clusters.
    pub fn cluster_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

/// A line-fitting, single-script piece of text.
///
/// Segments are produced by a [`RenderEngine`](crate::RenderEngine). Measurements are
/// made in the units of the [`GraphicsContext`] and are cached; call
/// [`recompute`](Self::recompute) when the context's resolution or fonts change. Drawing
/// and hit-testing take a [`Transform`] whose source origin is the top-left corner of the
/// segment.
pub trait TextSegment: core::fmt::Debug {
    /// The paragraph range of the segment.
    fn range(&self) -> Range<usize>;

    /// The text of the segment.
    fn text(&self) -> &[u16];

    /// The run properties shared by the whole segment.
    fn props(&self) -> &RunProps;

    /// The sorted cluster boundaries of the segment.
    fn cluster_boundaries(&self) -> &ClusterBoundaries;

    /// The direction depth and whether it may still change parity.
    fn direction_depth(&self) -> DirectionDepth;

    /// Changes the direction depth.
    ///
    /// A change that keeps the parity always succeeds; flipping the parity fails with
    /// [`ErrorKind::DirectionFixed`](crate::ErrorKind::DirectionFixed) unless the segment is
    /// weak.
    fn set_direction_depth(&mut self, depth: u8) -> Result<(), Error>;

    /// The weight of the break at the logical start of the segment.
    fn start_break_weight(&self) -> Option<BreakWeight>;

    /// The weight of the break at the logical end of the segment.
    fn end_break_weight(&self) -> Option<BreakWeight>;

    /// Whether the segment starts its line.
    fn start_of_line(&self) -> bool;

    /// Whether the segment ends its line.
    fn end_of_line(&self) -> bool;

    /// Marks the segment as starting its line or not.
    fn set_start_of_line(&mut self, start_of_line: bool);

    /// Marks the segment as ending its line or not.
    ///
    /// Trailing whitespace only counts towards the width of segments that do not end
    /// their line.
    fn set_end_of_line(&mut self, end_of_line: bool);

    /// The extra width added by justification.
    fn stretch(&self) -> i32;

    /// Adds `amount` units of justification.
    ///
    /// Fails with [`ErrorKind::AlreadyStretched`](crate::ErrorKind::AlreadyStretched) if
    /// the segment is already stretched. Zero clears the stretch.
    fn set_stretch(&mut self, amount: i32) -> Result<(), Error>;

    /// Discards cached measurements.
    fn recompute(&mut self);

    /// Measures the segment, reusing cached metrics when possible.
    fn metrics(&mut self, ctx: &mut dyn GraphicsContext) -> Result<SegmentMetrics, Error>;

    /// The width the segment occupies on its line.
    fn width(&mut self, ctx: &mut dyn GraphicsContext) -> Result<i32, Error> {
        let end_of_line = self.end_of_line();
        Ok(self.metrics(ctx)?.width(end_of_line))
    }

    /// The height of the segment.
    fn height(&mut self, ctx: &mut dyn GraphicsContext) -> Result<i32, Error> {
        Ok(self.metrics(ctx)?.height)
    }

    /// The distance from the top of the segment to its baseline.
    fn ascent(&mut self, ctx: &mut dyn GraphicsContext) -> Result<i32, Error> {
        Ok(self.metrics(ctx)?.ascent)
    }

    /// Draws the segment and returns the destination width it consumed.
    fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        mode: DrawMode,
    ) -> Result<i32, Error>;

    /// Classifies `offset` as an insertion point.
    fn is_valid_insertion_point(&self, offset: usize) -> InsertionPoint {
        let range = self.range();
        if offset < range.start || offset > range.end {
            InsertionPoint::Unknown
        } else if self.cluster_boundaries().contains(offset) {
            InsertionPoint::Ok
        } else {
            InsertionPoint::Bad
        }
    }

    /// Finds the insertion point closest to a destination point.
    fn point_to_char(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        point: Point,
    ) -> Result<HitTest, Error>;

    /// Moves an insertion point by one cluster in a physical direction.
    ///
    /// When `entering`, the insertion point comes from a neighbouring segment and
    /// `offset` is ignored. The association is kept, except when entering, where it
    /// follows the traversed cluster.
    fn arrow_key_position(
        &self,
        offset: usize,
        assoc_prev: bool,
        move_right: bool,
        entering: bool,
    ) -> Result<Navigation, Error>;

    /// Moves the free end of a selection by one cluster in a physical direction.
    ///
    /// The resulting insertion point is associated with the traversed cluster.
    fn extend_selection_position(
        &self,
        offset: usize,
        assoc_prev: bool,
        move_right: bool,
        entering: bool,
    ) -> Result<Navigation, Error>;

    /// Where the insertion point at `offset` is drawn, or `None` if it is not a valid
    /// insertion point of this segment.
    fn caret_position(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        offset: usize,
        assoc_prev: bool,
    ) -> Result<Option<Caret>, Error>;

    /// The destination rectangle covering the part of `range` inside the segment.
    fn selection_rect(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        range: Range<usize>,
    ) -> Result<Option<Rect>, Error>;

    /// Inverts the caret rectangle of `offset`; returns false if nothing was drawn.
    fn draw_insertion_point(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        offset: usize,
        assoc_prev: bool,
    ) -> Result<bool, Error> {
        match self.caret_position(ctx, transform, offset, assoc_prev)? {
            Some(caret) => {
                ctx.invert_rect(caret.rect)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Inverts the selection rectangle of `range`; returns false if nothing was drawn.
    fn draw_range(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        transform: &Transform,
        range: Range<usize>,
    ) -> Result<bool, Error> {
        match self.selection_rect(ctx, transform, range)? {
            Some(rect) => {
                ctx.invert_rect(rect)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// State shared by every segment implementation.
#[derive(Clone, Debug)]
pub(crate) struct SegmentCore {
    pub(crate) range: Range<usize>,
    pub(crate) text: Vec<u16>,
    pub(crate) props: RunProps,
    pub(crate) font: FontRequest,
    pub(crate) boundaries: ClusterBoundaries,
    pub(crate) depth: DirectionDepth,
    pub(crate) paragraph_rtl: bool,
    pub(crate) start_weight: Option<BreakWeight>,
    pub(crate) end_weight: Option<BreakWeight>,
    pub(crate) start_of_line: bool,
    pub(crate) end_of_line: bool,
    pub(crate) stretch: i32,
    pub(crate) hit_slop: f32,
    pub(crate) classifier: BreakClassifier,
}

impl SegmentCore {
    pub(crate) fn new(fit: Fit, classifier: BreakClassifier, hit_slop: f32) -> Self {
        Self {
            font: FontRequest::from(&fit.props),
            range: fit.range,
            text: fit.text,
            props: fit.props,
            boundaries: ClusterBoundaries::new(fit.boundaries),
            depth: fit.depth,
            paragraph_rtl: fit.paragraph_rtl,
            start_weight: fit.start_weight,
            end_weight: fit.end_weight,
            start_of_line: fit.start_of_line,
            end_of_line: fit.end_of_line,
            stretch: 0,
            hit_slop,
            classifier,
        }
    }

    /// Whether the segment is laid out right to left.
    pub(crate) fn is_rtl(&self) -> bool {
        (self.depth.depth + u8::from(self.paragraph_rtl)) % 2 == 1
    }

    /// Updates the depth; returns true if the visual order changed.
    pub(crate) fn set_direction_depth(&mut self, depth: u8) -> Result<bool, Error> {
        let flips = depth % 2 != self.depth.depth % 2;
        if flips && !self.depth.weak {
            return Err(Error::direction_fixed(self.range.clone()));
        }
        self.depth.depth = depth;
        Ok(flips)
    }

    pub(crate) fn set_stretch(&mut self, amount: i32) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::invalid_argument("stretch must not be negative"));
        }
        if amount != 0 && self.stretch != 0 {
            return Err(Error::already_stretched());
        }
        self.stretch = amount;
        Ok(())
    }

    /// Whether the cluster starting at `offset` is whitespace.
    pub(crate) fn is_space_at(&self, offset: usize) -> bool {
        offset < self.range.end
            && self
                .classifier
                .is_whitespace(char_at(&self.text, offset - self.range.start).0)
    }

    /// The offset where trailing whitespace starts.
    pub(crate) fn trailing_whitespace_start(&self) -> usize {
        let mut start = self.range.end;
        for cluster in self.boundaries.clusters().rev() {
            if !self.is_space_at(cluster.start) {
                break;
            }
            start = cluster.start;
        }
        start
    }

    /// Installs the segment font and reads its metrics.
    ///
    /// Returns the font metrics together with the baseline offset in context units.
    pub(crate) fn font_metrics(
        &self,
        ctx: &mut dyn GraphicsContext,
    ) -> Result<(FontMetrics, i32), Error> {
        let mut scope = FontScope::install(ctx, &self.font)?;
        let metrics = scope.font_metrics()?;
        let offset = points_to_units(self.props.baseline_offset, scope.dpi().1);
        Ok((metrics, offset))
    }

    pub(crate) fn navigate(
        &self,
        offset: usize,
        assoc_prev: bool,
        move_right: bool,
        entering: bool,
        extend: bool,
    ) -> Result<Navigation, Error> {
        let forward = move_right != self.is_rtl();
        let unhandled = Navigation {
            offset,
            assoc_prev,
            handled: false,
        };
        if entering {
            let target = if forward {
                self.boundaries.next_after(self.range.start)
            } else {
                self.boundaries.prev_before(self.range.end)
            };
            return Ok(target.map_or(unhandled, |offset| Navigation {
                offset,
                assoc_prev: forward,
                handled: true,
            }));
        }
        if offset < self.range.start || offset > self.range.end {
            return Err(Error::out_of_range(offset..offset, self.range.end));
        }
        let target = if forward {
            self.boundaries.next_after(offset)
        } else {
            self.boundaries.prev_before(offset)
        };
        Ok(target.map_or(unhandled, |offset| Navigation {
            offset,
            assoc_prev: if extend { forward } else { assoc_prev },
            handled: true,
        }))
    }

    pub(crate) fn hit_test(
        &self,
        layout: &Layout,
        dpi_y: u32,
        transform: &Transform,
        point: Point,
    ) -> HitTest {
        let point = transform.unmap_point(point);
        let slop = points_to_units(self.hit_slop, dpi_y);
        if point.y < -slop {
            HitTest {
                offset: self.range.start,
                assoc_prev: false,
            }
        } else if point.y > layout.metrics.height + slop {
            HitTest {
                offset: self.range.end,
                assoc_prev: true,
            }
        } else {
            layout.hit_test(point.x, self.range.start)
        }
    }

    pub(crate) fn caret(
        &self,
        layout: &Layout,
        transform: &Transform,
        offset: usize,
        assoc_prev: bool,
    ) -> Option<Caret> {
        if !self.boundaries.contains(offset) {
            return None;
        }
        let x = layout.edge_x(offset, assoc_prev)?;
        let left = transform.map_x(x);
        let rect = Rect::new(
            left,
            transform.map_y(0),
            left + 1,
            transform.map_y(layout.metrics.height),
        );
        Some(Caret {
            rect,
            rtl: layout.rtl,
        })
    }

    pub(crate) fn selection(
        &self,
        layout: &Layout,
        transform: &Transform,
        range: Range<usize>,
    ) -> Option<Rect> {
        let rect = layout.range_rect(range)?;
        let rect = transform.map_rect(rect);
        (!rect.is_empty()).then_some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_lookups() {
        let boundaries = ClusterBoundaries::new(vec![4, 5, 7, 10]);
        assert!(boundaries.contains(7), "boundary");
        assert!(!boundaries.contains(6), "inside a cluster");
        assert_eq!(boundaries.next_after(5), Some(7), "next");
        assert_eq!(boundaries.next_after(6), Some(7), "next from inside");
        assert_eq!(boundaries.next_after(10), None, "at the end");
        assert_eq!(boundaries.prev_before(7), Some(5), "previous");
        assert_eq!(boundaries.prev_before(4), None, "at the start");
        assert_eq!(boundaries.cluster_index(6), Some(1), "second cluster");
        assert_eq!(boundaries.cluster_index(10), None, "end is not in a cluster");
        assert_eq!(boundaries.clusters().collect::<Vec<_>>(), [4..5, 5..7, 7..10]);
    }

    #[test]
    fn metrics_width_depends_on_line_end() {
        let metrics = SegmentMetrics {
            total_width: 20,
            visible_width: 15,
            height: 10,
            ascent: 8,
        };
        assert_eq!(metrics.width(true), 15, "trailing whitespace hangs");
        assert_eq!(metrics.width(false), 20, "trailing whitespace counts");
    }
}
