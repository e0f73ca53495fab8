// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shaping backend consumed by [`ShapedEngine`](crate::ShapedEngine).

#[cfg(feature = "harfrust")]
mod harfrust;

#[cfg(feature = "harfrust")]
pub use self::harfrust::HarfrustShaper;

use std::ops::Range;

use smallvec::SmallVec;

use crate::analysis::BreakWeight;
use crate::context::FontRequest;
use crate::geom::Point;
use crate::Error;

/// A request to shape a run of text in one font.
#[derive(Clone, Debug)]
pub struct ShapeRequest<'a> {
    /// The font to shape with.
    pub font: &'a FontRequest,
    /// The text, as UTF-16 code units.
    pub text: &'a [u16],
    /// Whether the run is laid out right to left.
    pub rtl: bool,
    /// Horizontal resolution of the measuring context; glyph advances are reported in
    /// units of `1 / dpi` inch.
    pub dpi: u32,
}

/// One shaped glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSlot {
    /// Glyph identifier in the font.
    pub glyph_id: u32,
    /// Advance width in context units.
    pub advance: i32,
    /// Offset of the glyph from its pen position; positive `y` moves up.
    pub offset: Point,
    /// The code units of the request text this glyph was shaped from.
    pub chars: Range<usize>,
    /// The weight of a break before this glyph's characters, if the backend knows one.
    pub break_before: Option<BreakWeight>,
}

/// Shaped glyphs in visual order, left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapedText {
    /// The glyphs.
    pub slots: Vec<GlyphSlot>,
}

impl ShapedText {
    /// Total advance of every glyph.
    pub fn width(&self) -> i32 {
        self.slots.iter().map(|slot| slot.advance).sum()
    }

    /// Distributes `extra` units of advance evenly between glyphs.
    ///
    /// Every glyph but the visually last one receives a share; a single glyph takes
    /// everything. The remainder goes to the leftmost glyphs.
    pub fn distribute(&mut self, extra: i32) {
        let receivers = self.slots.len().saturating_sub(1).max(1);
        let Ok(gaps) = i32::try_from(receivers) else {
            return;
        };
        let share = extra / gaps;
        let mut remainder = extra % gaps;
        for slot in self.slots.iter_mut().take(receivers) {
            slot.advance += share;
            if remainder > 0 {
                slot.advance += 1;
                remainder -= 1;
            }
        }
    }

    /// Removes boundaries that fall strictly inside a glyph's characters.
    ///
    /// `starts` are offsets into the shaped text, as returned by
    /// [`BreakClassifier::cluster_starts`](crate::BreakClassifier::cluster_starts).
    pub(crate) fn merge_boundaries(&self, starts: &[usize]) -> Vec<usize> {
        starts
            .iter()
            .copied()
            .filter(|&offset| {
                !self
                    .slots
                    .iter()
                    .any(|slot| slot.chars.start < offset && offset < slot.chars.end)
            })
            .collect()
    }

    /// Groups glyph indices by the cluster containing their first character.
    ///
    /// `boundaries` are offsets into the shaped text, starting at zero.
    pub(crate) fn group(&self, boundaries: &[usize]) -> Vec<SmallVec<[usize; 2]>> {
        let mut groups = vec![SmallVec::new(); boundaries.len().saturating_sub(1)];
        for (index, slot) in self.slots.iter().enumerate() {
            let cluster = boundaries
                .partition_point(|&boundary| boundary <= slot.chars.start)
                .saturating_sub(1);
            if let Some(group) = groups.get_mut(cluster) {
                group.push(index);
            }
        }
        groups
    }
}

/// A font shaping backend.
pub trait Shaper: core::fmt::Debug {
    /// Shapes `request.text` in `request.font`.
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<ShapedText, Error>;

    /// Adds `extra` units of width to shaped text.
    fn justify(&self, shaped: &mut ShapedText, extra: i32) -> Result<(), Error> {
        shaped.distribute(extra);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(glyph_id: u32, advance: i32, chars: Range<usize>) -> GlyphSlot {
        GlyphSlot {
            glyph_id,
            advance,
            offset: Point::default(),
            chars,
            break_before: None,
        }
    }

    #[test]
    fn distribute_skips_the_last_glyph() {
        let mut shaped = ShapedText {
            slots: vec![slot(1, 5, 0..1), slot(2, 5, 1..2), slot(3, 5, 2..3)],
        };
        shaped.distribute(5);
        let advances: Vec<i32> = shaped.slots.iter().map(|slot| slot.advance).collect();
        assert_eq!(advances, [8, 7, 5], "remainder to the left");
        assert_eq!(shaped.width(), 20, "all extra width added");
    }

    #[test]
    fn ligatures_merge_clusters() {
        let shaped = ShapedText {
            slots: vec![slot(1, 9, 0..2), slot(2, 5, 2..3)],
        };
        assert_eq!(shaped.merge_boundaries(&[0, 1, 2, 3]), [0, 2, 3], "fi ligature");
        let groups = shaped.group(&[0, 2, 3]);
        assert_eq!(groups.len(), 2, "two clusters");
        assert_eq!(groups[0].as_slice(), [0], "ligature glyph");
        assert_eq!(groups[1].as_slice(), [1], "single glyph");
    }
}
