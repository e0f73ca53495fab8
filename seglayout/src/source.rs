// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character and run property sources.
//!
//! Engines never own paragraph text; they read it through [`TextSource`]. [`Paragraph`] is
//! a small in-memory implementation for clients that do not have a rich text store of
//! their own.

use std::ops::Range;

use unicode_bidi::{BidiInfo, Level};

use crate::Error;

/// Identifies a writing system: the script, language and font choice of a run.
///
/// Segments never span a change of writing system.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WritingSystem(pub u32);

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component; zero means nothing is painted.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Returns true if painting with this color has no effect.
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Rendering properties shared by every character of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunProps {
    /// The writing system of the run.
    pub ws: WritingSystem,
    /// Font size in points.
    pub font_size: f32,
    /// Baseline offset in points; positive values raise the text.
    pub baseline_offset: f32,
    /// Whether the font is bold.
    pub bold: bool,
    /// Whether the font is italic.
    pub italic: bool,
    /// Text color.
    pub foreground: Color,
    /// Background color; transparent means no background is painted.
    pub background: Color,
    /// Whether the writing system reads right to left.
    pub rtl: bool,
    /// The bidi embedding level of the run (even is left-to-right).
    pub embedding_level: u8,
}

impl RunProps {
    /// Creates properties for `ws` at `font_size` points with default styling.
    pub fn new(ws: WritingSystem, font_size: f32) -> Self {
        Self {
            ws,
            font_size,
            ..Self::default()
        }
    }

    /// Marks the writing system as right-to-left.
    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Sets the foreground and background colors.
    pub fn with_colors(mut self, foreground: Color, background: Color) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Sets the baseline offset in points.
    pub fn with_baseline_offset(mut self, offset: f32) -> Self {
        self.baseline_offset = offset;
        self
    }
}

impl Default for RunProps {
    fn default() -> Self {
        Self {
            ws: WritingSystem::default(),
            font_size: 10.0,
            baseline_offset: 0.0,
            bold: false,
            italic: false,
            foreground: Color::BLACK,
            background: Color::TRANSPARENT,
            rtl: false,
            embedding_level: 0,
        }
    }
}

/// Supplies paragraph characters and per-offset run properties.
///
/// All offsets are UTF-16 code unit offsets from the start of the paragraph.
pub trait TextSource {
    /// Length of the paragraph in code units.
    fn len(&self) -> usize;

    /// Returns true if the paragraph is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the properties at `offset` and the range of the run containing it.
    ///
    /// `offset == len()` must be accepted and report the last run (or the default run of
    /// an empty paragraph).
    fn run_props(&self, offset: usize) -> Result<(RunProps, Range<usize>), Error>;

    /// Appends the code units in `range` to `out`.
    fn fetch(&self, range: Range<usize>, out: &mut Vec<u16>) -> Result<(), Error>;
}

/// An in-memory paragraph of styled text.
#[derive(Clone, Debug)]
pub struct Paragraph {
    text: Vec<u16>,
    runs: Vec<(Range<usize>, RunProps)>,
    default_props: RunProps,
}

impl Paragraph {
    /// Creates a paragraph with a single run.
    pub fn new(text: &str, props: RunProps) -> Self {
        let mut builder = ParagraphBuilder::new(props.clone());
        builder.push(text, props);
        builder.build()
    }

    /// Returns a builder whose empty paragraph reports `default_props`.
    pub fn builder(default_props: RunProps) -> ParagraphBuilder {
        ParagraphBuilder::new(default_props)
    }

    /// The paragraph text.
    pub fn text(&self) -> &[u16] {
        &self.text
    }

    /// The runs of the paragraph, in order.
    pub fn runs(&self) -> impl Iterator<Item = (Range<usize>, &RunProps)> + '_ {
        self.runs.iter().map(|(range, props)| (range.clone(), props))
    }
}

impl TextSource for Paragraph {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn run_props(&self, offset: usize) -> Result<(RunProps, Range<usize>), Error> {
        if offset > self.text.len() {
            return Err(Error::out_of_range(offset..offset, self.text.len()));
        }
        let index = self.runs.partition_point(|(range, _)| range.end <= offset);
        match self.runs.get(index).or_else(|| self.runs.last()) {
            Some((range, props)) => Ok((props.clone(), range.clone())),
            None => Ok((self.default_props.clone(), 0..0)),
        }
    }

    fn fetch(&self, range: Range<usize>, out: &mut Vec<u16>) -> Result<(), Error> {
        if range.start > range.end || range.end > self.text.len() {
            return Err(Error::out_of_range(range, self.text.len()));
        }
        out.extend_from_slice(&self.text[range]);
        Ok(())
    }
}

/// Builds a [`Paragraph`] run by run.
#[derive(Clone, Debug)]
pub struct ParagraphBuilder {
    utf8: String,
    // (UTF-8 range, UTF-16 range, props)
    runs: Vec<(Range<usize>, Range<usize>, RunProps)>,
    utf16_len: usize,
    default_props: RunProps,
    bidi: Option<bool>,
}

impl ParagraphBuilder {
    /// Creates an empty builder.
    pub fn new(default_props: RunProps) -> Self {
        Self {
            utf8: String::new(),
            runs: Vec::new(),
            utf16_len: 0,
            default_props,
            bidi: None,
        }
    }

    /// Appends `text` styled with `props`. Empty text is ignored.
    pub fn push(&mut self, text: &str, props: RunProps) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        let utf8_start = self.utf8.len();
        let utf16_start = self.utf16_len;
        self.utf8.push_str(text);
        self.utf16_len += text.encode_utf16().count();
        self.runs.push((
            utf8_start..self.utf8.len(),
            utf16_start..self.utf16_len,
            props,
        ));
        self
    }

    /// Resolves embedding levels with the Unicode bidi algorithm when building.
    ///
    /// Runs are split wherever the resolved level changes and each piece receives its
    /// level in [`RunProps::embedding_level`].
    pub fn resolve_bidi(&mut self, paragraph_rtl: bool) -> &mut Self {
        self.bidi = Some(paragraph_rtl);
        self
    }

    /// Finishes the paragraph.
    pub fn build(&self) -> Paragraph {
        let text: Vec<u16> = self.utf8.encode_utf16().collect();
        let mut runs: Vec<(Range<usize>, RunProps)> = Vec::with_capacity(self.runs.len());
        match self.bidi {
            Some(paragraph_rtl) => {
                let base = if paragraph_rtl {
                    Level::rtl()
                } else {
                    Level::ltr()
                };
                let info = BidiInfo::new(&self.utf8, Some(base));
                for (utf8_range, utf16_range, props) in &self.runs {
                    let mut utf16 = utf16_range.start;
                    let mut piece_start = utf16;
                    let mut piece_level = None;
                    for (byte, ch) in self.utf8[utf8_range.clone()].char_indices() {
                        let level = info.levels[utf8_range.start + byte].number();
                        if piece_level.is_some_and(|current| current != level) {
                            push_run(&mut runs, piece_start..utf16, props, piece_level);
                            piece_start = utf16;
                        }
                        piece_level = Some(level);
                        utf16 += ch.len_utf16();
                    }
                    push_run(&mut runs, piece_start..utf16, props, piece_level);
                }
            }
            None => {
                for (_, utf16_range, props) in &self.runs {
                    push_run(&mut runs, utf16_range.clone(), props, None);
                }
            }
        }
        Paragraph {
            text,
            runs,
            default_props: self.default_props.clone(),
        }
    }
}

/// Pushes a run, merging it into the previous one when the properties agree.
fn push_run(
    runs: &mut Vec<(Range<usize>, RunProps)>,
    range: Range<usize>,
    props: &RunProps,
    level: Option<u8>,
) {
    if range.is_empty() {
        return;
    }
    let mut props = props.clone();
    if let Some(level) = level {
        props.embedding_level = level;
    }
    if let Some((last_range, last_props)) = runs.last_mut() {
        if last_range.end == range.start && *last_props == props {
            last_range.end = range.end;
            return;
        }
    }
    runs.push((range, props));
}
