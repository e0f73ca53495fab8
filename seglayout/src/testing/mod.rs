// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test doubles for unit tests.
//!
//! Every context and shaper here measures with the same rules: an em is the font size in
//! device units, ordinary characters advance half an em, spaces a quarter, combining marks
//! nothing and CJK ideographs or Hangul syllables a full em. Ascent is four fifths of an
//! em and descent one fifth.

use std::cell::Cell;

use crate::context::{FontMetrics, FontRequest, GraphicsContext, PositionedGlyph};
use crate::geom::{Point, Rect};
use crate::search::{Measurable, MeasuredCluster};
use crate::shape::{GlyphSlot, ShapeRequest, ShapedText, Shaper};
use crate::source::{Color, RunProps, WritingSystem};
use crate::util::{char_indices, points_to_units};
use crate::{BreakClassifier, Error};

fn is_wide(ch: char) -> bool {
    matches!(ch, '\u{3040}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7A3}' | '\u{F900}'..='\u{FAFF}')
}

pub(crate) fn advance(classifier: &BreakClassifier, ch: char, em: i32) -> i32 {
    if classifier.is_combining_mark(ch) {
        0
    } else if classifier.is_whitespace(ch) {
        em / 4
    } else if is_wide(ch) {
        em
    } else {
        em / 2
    }
}

/// A graphics context with fixed metrics that draws nothing.
#[derive(Debug)]
pub(crate) struct TestContext {
    dpi: (u32, u32),
    font: Option<FontRequest>,
    rejected: Vec<WritingSystem>,
    classifier: BreakClassifier,
    pub(crate) draws: usize,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        Self::with_dpi(72, 72)
    }

    pub(crate) fn with_dpi(x: u32, y: u32) -> Self {
        Self {
            dpi: (x, y),
            font: None,
            rejected: Vec::new(),
            classifier: BreakClassifier::new(),
            draws: 0,
        }
    }

    /// Makes fonts of `ws` fail to install.
    pub(crate) fn reject(&mut self, ws: WritingSystem) {
        self.rejected.push(ws);
    }

    fn installed(&self) -> Result<&FontRequest, Error> {
        self.font
            .as_ref()
            .ok_or_else(|| Error::context("no font installed"))
    }
}

impl GraphicsContext for TestContext {
    fn dpi(&self) -> (u32, u32) {
        self.dpi
    }

    fn font(&self) -> Option<FontRequest> {
        self.font.clone()
    }

    fn set_font(&mut self, font: Option<&FontRequest>) -> Result<(), Error> {
        if let Some(font) = font {
            if self.rejected.contains(&font.ws) {
                return Err(Error::font("rejected writing system"));
            }
        }
        self.font = font.cloned();
        Ok(())
    }

    fn font_metrics(&mut self) -> Result<FontMetrics, Error> {
        let em = points_to_units(self.installed()?.size, self.dpi.1);
        Ok(FontMetrics {
            ascent: em * 4 / 5,
            descent: em / 5,
        })
    }

    fn text_extent(&mut self, text: &[u16], partial: &mut Vec<i32>) -> Result<i32, Error> {
        let em = points_to_units(self.installed()?.size, self.dpi.0);
        partial.clear();
        let mut width = 0;
        for (_, ch) in char_indices(text) {
            width += advance(&self.classifier, ch, em);
            partial.extend(std::iter::repeat_n(width, ch.len_utf16()));
        }
        Ok(width)
    }

    fn draw_text(
        &mut self,
        _origin: Point,
        _text: &[u16],
        _advances: &[i32],
        _color: Color,
    ) -> Result<(), Error> {
        self.installed()?;
        self.draws += 1;
        Ok(())
    }

    fn draw_glyphs(
        &mut self,
        _origin: Point,
        _glyphs: &[PositionedGlyph],
        _color: Color,
    ) -> Result<(), Error> {
        self.installed()?;
        self.draws += 1;
        Ok(())
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Color) -> Result<(), Error> {
        Ok(())
    }

    fn invert_rect(&mut self, _rect: Rect) -> Result<(), Error> {
        Ok(())
    }
}

/// Measures characters at 72 dpi without a graphics context.
pub(crate) struct TestMeasurer {
    classifier: BreakClassifier,
}

impl TestMeasurer {
    pub(crate) fn new(classifier: BreakClassifier) -> Self {
        Self { classifier }
    }
}

impl Measurable for TestMeasurer {
    fn measure(
        &mut self,
        _ctx: &mut dyn GraphicsContext,
        props: &RunProps,
        start: usize,
        text: &[u16],
        out: &mut Vec<MeasuredCluster>,
    ) -> Result<(), Error> {
        let em = points_to_units(props.font_size, 72);
        let starts = self.classifier.cluster_starts(text);
        for pair in starts.windows(2) {
            let advance: i32 = char_indices(&text[pair[0]..pair[1]])
                .map(|(_, ch)| advance(&self.classifier, ch, em))
                .sum();
            out.push(MeasuredCluster {
                range: start + pair[0]..start + pair[1],
                advance,
                hint: None,
            });
        }
        Ok(())
    }
}

/// Shapes one glyph per character, except that "fi" becomes a ligature of four fifths
/// of an em.
#[derive(Debug, Default)]
pub(crate) struct TestShaper {
    calls: Cell<usize>,
}

impl TestShaper {
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Shaper for TestShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<ShapedText, Error> {
        self.calls.set(self.calls.get() + 1);
        let classifier = BreakClassifier::new();
        let em = points_to_units(request.font.size, request.dpi);
        let chars: Vec<(usize, char)> = char_indices(request.text).collect();
        let mut slots = Vec::with_capacity(chars.len());
        let mut index = 0;
        while let Some(&(offset, ch)) = chars.get(index) {
            let ligature = ch == 'f' && chars.get(index + 1).is_some_and(|&(_, next)| next == 'i');
            let (end, advance, consumed) = if ligature {
                (offset + 2, em * 4 / 5, 2)
            } else {
                (offset + ch.len_utf16(), advance(&classifier, ch, em), 1)
            };
            slots.push(GlyphSlot {
                glyph_id: if ligature { 0xFB01 } else { u32::from(ch) },
                advance,
                offset: Point::default(),
                chars: offset..end,
                break_before: None,
            });
            index += consumed;
        }
        if request.rtl {
            slots.reverse();
        }
        Ok(ShapedText { slots })
    }
}
