// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Seglayout Dev
//!
//! This crate provides utilities for developing Seglayout: a [`MockContext`] that records
//! everything drawn through it, a [`MockShaper`] with predictable glyphs and a set of
//! [`TextSamples`].
//!
//! Both mocks measure with the same rules. An em is the font size converted to device
//! units (`size * dpi / 72`, rounded). Ordinary characters advance half an em, whitespace a
//! quarter, combining marks nothing and CJK or Hangul characters a full em. The ascent is
//! four fifths of an em and the descent one fifth.
//!
//! Real fonts for exercising shaping backends live under `assets/fonts`.

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use seglayout::{
    BreakClassifier, Color, Error, FontMetrics, FontRequest, GlyphSlot, GraphicsContext, Point,
    PositionedGlyph, Rect, ShapeRequest, ShapedText, Shaper, WritingSystem,
};

/// The directories that contain the font files.
pub fn font_dirs() -> impl Iterator<Item = PathBuf> {
    let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    [assets_dir.join("dejavu_fonts")].into_iter()
}

/// DejaVu Sans, which covers Latin and Arabic.
pub const DEJAVU_SANS: &str = "DejaVuSans.ttf";

/// Reads the font file `name` from the first font directory that has it.
pub fn font_data(name: &str) -> io::Result<Vec<u8>> {
    let path = font_dirs()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no font file {name}")))?;
    std::fs::read(path)
}

/// A sample to be used for development.
#[derive(Debug)]
pub struct Sample {
    /// The name of the sample.
    pub name: &'static str,
    /// The text of the sample.
    pub text: &'static str,
}

/// A collection of text samples.
#[derive(Debug)]
pub struct TextSamples {
    /// The Arabic text sample.
    pub arabic: Sample,
    /// The Latin text sample.
    pub latin: Sample,
    /// The Japanese text sample.
    pub japanese: Sample,
}

impl TextSamples {
    /// Creates a new collection of text samples.
    pub const fn new() -> Self {
        Self {
            arabic: Sample {
                name: "arabic",
                text: "مرحبا بالعالم. هذا نص تجريبي قصير لاختبار تقسيم الأسطر.",
            },
            latin: Sample {
                name: "latin",
                text: "The quick brown fox jumps over the lazy dog. Supercalifragilistic words \
                       need clipping when nothing else fits.",
            },
            japanese: Sample {
                name: "japanese",
                text: "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。",
            },
        }
    }
}

impl Default for TextSamples {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts points to device units.
#[allow(
    clippy::cast_possible_truncation,
    reason = "font sizes are far inside the i32 range"
)]
pub fn em(size: f32, dpi: u32) -> i32 {
    (size * dpi as f32 / 72.0).round() as i32
}

/// The advance of `ch` in an em of `em` units, without overrides.
pub fn default_advance(classifier: &BreakClassifier, ch: char, em: i32) -> i32 {
    if classifier.is_combining_mark(ch) {
        0
    } else if classifier.is_whitespace(ch) {
        em / 4
    } else if matches!(
        ch,
        '\u{3040}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7A3}' | '\u{F900}'..='\u{FAFF}'
    ) {
        em
    } else {
        em / 2
    }
}

/// One call recorded by [`MockContext`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// [`GraphicsContext::draw_text`].
    Text {
        /// Baseline origin.
        origin: Point,
        /// The drawn text.
        text: String,
        /// Destination advance of every code unit.
        advances: Vec<i32>,
        /// Text colour.
        color: Color,
        /// The font installed when drawing.
        font: FontRequest,
    },
    /// [`GraphicsContext::draw_glyphs`].
    Glyphs {
        /// Baseline origin.
        origin: Point,
        /// The drawn glyphs.
        glyphs: Vec<PositionedGlyph>,
        /// Glyph colour.
        color: Color,
        /// The font installed when drawing.
        font: FontRequest,
    },
    /// [`GraphicsContext::fill_rect`].
    Fill {
        /// The filled rectangle.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// [`GraphicsContext::invert_rect`].
    Invert(Rect),
}

/// A [`GraphicsContext`] with deterministic metrics that records draw calls.
#[derive(Debug)]
pub struct MockContext {
    dpi: (u32, u32),
    font: Option<FontRequest>,
    rejected: Vec<WritingSystem>,
    /// Advance overrides in thousandths of an em.
    overrides: HashMap<char, i32>,
    classifier: BreakClassifier,
    font_changes: usize,
    /// Every draw call, in order.
    pub ops: Vec<DrawOp>,
}

impl Default for MockContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContext {
    /// Creates a context at 72 dpi in both directions.
    pub fn new() -> Self {
        Self::with_dpi(72, 72)
    }

    /// Creates a context with the given resolution.
    pub fn with_dpi(x: u32, y: u32) -> Self {
        Self {
            dpi: (x, y),
            font: None,
            rejected: Vec::new(),
            overrides: HashMap::new(),
            classifier: BreakClassifier::new(),
            font_changes: 0,
            ops: Vec::new(),
        }
    }

    /// Makes `ch` advance `per_mille` thousandths of an em.
    pub fn set_advance(&mut self, ch: char, per_mille: i32) {
        self.overrides.insert(ch, per_mille);
    }

    /// Makes installing any font of `ws` fail.
    pub fn reject(&mut self, ws: WritingSystem) {
        self.rejected.push(ws);
    }

    /// Number of successful [`GraphicsContext::set_font`] calls.
    pub fn font_changes(&self) -> usize {
        self.font_changes
    }

    /// Discards recorded draw calls.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// The advance of `ch` in an em of `em` units.
    pub fn advance(&self, ch: char, em: i32) -> i32 {
        match self.overrides.get(&ch) {
            Some(&per_mille) => em * per_mille / 1000,
            None => default_advance(&self.classifier, ch, em),
        }
    }

    fn installed(&self) -> Result<FontRequest, Error> {
        self.font
            .clone()
            .ok_or_else(|| Error::context("no font installed"))
    }
}

impl GraphicsContext for MockContext {
    fn dpi(&self) -> (u32, u32) {
        self.dpi
    }

    fn font(&self) -> Option<FontRequest> {
        self.font.clone()
    }

    fn set_font(&mut self, font: Option<&FontRequest>) -> Result<(), Error> {
        if let Some(font) = font {
            if self.rejected.contains(&font.ws) {
                return Err(Error::font(format!(
                    "no font for writing system {}",
                    font.ws.0
                )));
            }
        }
        self.font = font.cloned();
        self.font_changes += 1;
        Ok(())
    }

    fn font_metrics(&mut self) -> Result<FontMetrics, Error> {
        let em = em(self.installed()?.size, self.dpi.1);
        Ok(FontMetrics {
            ascent: em * 4 / 5,
            descent: em / 5,
        })
    }

    fn text_extent(&mut self, text: &[u16], partial: &mut Vec<i32>) -> Result<i32, Error> {
        let em = em(self.installed()?.size, self.dpi.0);
        partial.clear();
        let mut width = 0;
        for ch in char::decode_utf16(text.iter().copied()) {
            let ch = ch.map_err(|_| Error::context("unpaired surrogate"))?;
            width += self.advance(ch, em);
            partial.extend(std::iter::repeat_n(width, ch.len_utf16()));
        }
        Ok(width)
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &[u16],
        advances: &[i32],
        color: Color,
    ) -> Result<(), Error> {
        let font = self.installed()?;
        if advances.len() != text.len() {
            return Err(Error::context("one advance per code unit expected"));
        }
        self.ops.push(DrawOp::Text {
            origin,
            text: String::from_utf16_lossy(text),
            advances: advances.to_vec(),
            color,
            font,
        });
        Ok(())
    }

    fn draw_glyphs(
        &mut self,
        origin: Point,
        glyphs: &[PositionedGlyph],
        color: Color,
    ) -> Result<(), Error> {
        let font = self.installed()?;
        self.ops.push(DrawOp::Glyphs {
            origin,
            glyphs: glyphs.to_vec(),
            color,
            font,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Error> {
        self.ops.push(DrawOp::Fill { rect, color });
        Ok(())
    }

    fn invert_rect(&mut self, rect: Rect) -> Result<(), Error> {
        self.ops.push(DrawOp::Invert(rect));
        Ok(())
    }
}

/// The glyph id [`MockShaper`] uses for the "fi" ligature.
pub const FI_LIGATURE: u32 = 0xFB01;

/// A [`Shaper`] producing one glyph per character.
///
/// "fi" becomes the single glyph [`FI_LIGATURE`] advancing four fifths of an em; other
/// glyph ids are the character's scalar value. Right-to-left runs come back reversed.
#[derive(Debug, Default)]
pub struct MockShaper {
    fail: Cell<bool>,
    calls: Cell<usize>,
}

impl MockShaper {
    /// Creates a shaper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following [`Shaper::shape`] call fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Number of [`Shaper::shape`] calls so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Shaper for MockShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Result<ShapedText, Error> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(Error::shaping("mock shaper failure"));
        }
        let classifier = BreakClassifier::new();
        let em = em(request.font.size, request.dpi);
        let mut chars = Vec::with_capacity(request.text.len());
        let mut offset = 0;
        for ch in char::decode_utf16(request.text.iter().copied()) {
            let ch = ch.map_err(|_| Error::shaping("unpaired surrogate"))?;
            chars.push((offset, ch));
            offset += ch.len_utf16();
        }
        let mut slots = Vec::with_capacity(chars.len());
        let mut iter = chars.iter().peekable();
        while let Some(&(offset, ch)) = iter.next() {
            let slot = if ch == 'f' && iter.peek().is_some_and(|&&(_, next)| next == 'i') {
                iter.next();
                GlyphSlot {
                    glyph_id: FI_LIGATURE,
                    advance: em * 4 / 5,
                    offset: Point::default(),
                    chars: offset..offset + 2,
                    break_before: None,
                }
            } else {
                GlyphSlot {
                    glyph_id: u32::from(ch),
                    advance: default_advance(&classifier, ch, em),
                    offset: Point::default(),
                    chars: offset..offset + ch.len_utf16(),
                    break_before: None,
                }
            };
            slots.push(slot);
        }
        if request.rtl {
            slots.reverse();
        }
        Ok(ShapedText { slots })
    }
}
