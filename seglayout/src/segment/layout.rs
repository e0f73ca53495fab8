// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use crate::context::FontMetrics;
use crate::geom::Rect;
use crate::segment::{HitTest, SegmentMetrics};

/// A cluster placed on the line, in segment source units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VisualCluster {
    pub(crate) chars: Range<usize>,
    pub(crate) x: i32,
    pub(crate) advance: i32,
}

/// The measured and ordered clusters of a segment.
#[derive(Clone, Debug, Default)]
pub(crate) struct Layout {
    /// Clusters from left to right.
    pub(crate) clusters: Vec<VisualCluster>,
    pub(crate) metrics: SegmentMetrics,
    pub(crate) rtl: bool,
    /// Vertical position of the text baseline.
    pub(crate) baseline: i32,
}

impl Layout {
    /// Creates a layout with the vertical metrics of `font` shifted by `offset` units.
    pub(crate) fn new(font: FontMetrics, offset: i32, rtl: bool) -> Self {
        let ascent = font.ascent + offset.max(0);
        let descent = font.descent + (-offset).max(0);
        Self {
            clusters: Vec::new(),
            metrics: SegmentMetrics {
                ascent,
                height: ascent + descent,
                ..SegmentMetrics::default()
            },
            rtl,
            baseline: ascent - offset,
        }
    }

    /// Places clusters given in logical order with their advances.
    pub(crate) fn place(&mut self, logical: impl DoubleEndedIterator<Item = (Range<usize>, i32)>) {
        let ordered: Vec<(Range<usize>, i32)> = if self.rtl {
            logical.rev().collect()
        } else {
            logical.collect()
        };
        let mut x = 0;
        self.clusters = ordered
            .into_iter()
            .map(|(chars, advance)| {
                let cluster = VisualCluster { chars, x, advance };
                x += advance;
                cluster
            })
            .collect();
    }

    /// The insertion point nearest to the source x coordinate `x`.
    pub(crate) fn hit_test(&self, x: i32, start: usize) -> HitTest {
        let last = self.clusters.len().saturating_sub(1);
        for (index, cluster) in self.clusters.iter().enumerate() {
            if x >= cluster.x + cluster.advance && index < last {
                continue;
            }
            let left_half = 2 * (x - cluster.x) < cluster.advance;
            return match (left_half, self.rtl) {
                (true, false) | (false, true) => HitTest {
                    offset: cluster.chars.start,
                    assoc_prev: false,
                },
                (true, true) | (false, false) => HitTest {
                    offset: cluster.chars.end,
                    assoc_prev: true,
                },
            };
        }
        HitTest {
            offset: start,
            assoc_prev: false,
        }
    }

    /// The source x coordinate of the insertion point at `offset`.
    ///
    /// The edge of the cluster the insertion point is associated with is preferred.
    pub(crate) fn edge_x(&self, offset: usize, assoc_prev: bool) -> Option<i32> {
        if self.clusters.is_empty() {
            return Some(0);
        }
        let trailing = || {
            self.clusters
                .iter()
                .find(|cluster| cluster.chars.end == offset)
                .map(|cluster| {
                    if self.rtl {
                        cluster.x
                    } else {
                        cluster.x + cluster.advance
                    }
                })
        };
        let leading = || {
            self.clusters
                .iter()
                .find(|cluster| cluster.chars.start == offset)
                .map(|cluster| {
                    if self.rtl {
                        cluster.x + cluster.advance
                    } else {
                        cluster.x
                    }
                })
        };
        if assoc_prev {
            trailing().or_else(leading)
        } else {
            leading().or_else(trailing)
        }
    }

    /// The source rectangle covering the clusters that intersect `range`.
    pub(crate) fn range_rect(&self, range: Range<usize>) -> Option<Rect> {
        self.clusters
            .iter()
            .filter(|cluster| cluster.chars.start < range.end && cluster.chars.end > range.start)
            .map(|cluster| {
                Rect::new(
                    cluster.x,
                    0,
                    cluster.x + cluster.advance,
                    self.metrics.height,
                )
            })
            .reduce(|a, b| a.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rtl: bool) -> Layout {
        let mut layout = Layout::new(
            FontMetrics {
                ascent: 8,
                descent: 2,
            },
            0,
            rtl,
        );
        layout.place([(0..1, 10), (1..3, 10), (3..4, 10)].into_iter());
        layout
    }

    #[test]
    fn ltr_hit_test_and_edges() {
        let layout = layout(false);
        assert_eq!(layout.hit_test(12, 0).offset, 1, "left half of second cluster");
        assert_eq!(layout.hit_test(17, 0).offset, 3, "right half of second cluster");
        assert_eq!(layout.hit_test(-5, 0).offset, 0, "before the start");
        assert_eq!(layout.hit_test(99, 0), HitTest { offset: 4, assoc_prev: true });
        assert_eq!(layout.edge_x(3, true), Some(20), "trailing edge");
        assert_eq!(layout.edge_x(3, false), Some(20), "leading edge of next");
    }

    #[test]
    fn rtl_clusters_run_right_to_left() {
        let layout = layout(true);
        assert_eq!(layout.clusters[0].chars, 3..4, "logical end on the left");
        assert_eq!(layout.hit_test(2, 0), HitTest { offset: 4, assoc_prev: true });
        assert_eq!(layout.hit_test(28, 0), HitTest { offset: 0, assoc_prev: false });
        assert_eq!(layout.edge_x(0, false), Some(30), "start on the right");
    }

    #[test]
    fn baseline_offset_grows_ascent() {
        let layout = Layout::new(
            FontMetrics {
                ascent: 8,
                descent: 2,
            },
            3,
            false,
        );
        assert_eq!(layout.metrics.ascent, 11, "raised");
        assert_eq!(layout.metrics.height, 13, "taller");
        assert_eq!(layout.baseline, 8, "text baseline stays at font ascent");
    }

    #[test]
    fn selection_covers_intersecting_clusters() {
        let layout = layout(false);
        assert_eq!(layout.range_rect(2..4), Some(Rect::new(10, 0, 30, 10)));
        assert_eq!(layout.range_rect(4..6), None, "outside");
    }
}
