// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measuring and drawing context consumed by segments.

use std::ops::{Deref, DerefMut};

use crate::geom::{Point, Rect};
use crate::source::{Color, RunProps, WritingSystem};
use crate::Error;

/// The font a segment installs in a [`GraphicsContext`] before measuring or drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct FontRequest {
    /// Writing system whose font is requested.
    pub ws: WritingSystem,
    /// Size in points.
    pub size: f32,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

impl From<&RunProps> for FontRequest {
    fn from(props: &RunProps) -> Self {
        Self {
            ws: props.ws,
            size: props.font_size,
            bold: props.bold,
            italic: props.italic,
        }
    }
}

/// Vertical metrics of the installed font, in context units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the line.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line.
    pub descent: i32,
}

/// A glyph placed relative to a drawing origin, in destination units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionedGlyph {
    /// Glyph identifier in the installed font.
    pub id: u32,
    /// Horizontal position relative to the origin.
    pub x: i32,
    /// Vertical position relative to the baseline origin.
    pub y: i32,
}

/// Device-independent text measurement and drawing.
///
/// Measurements are reported in the context's own units, which are also the source space
/// of every [`Transform`](crate::Transform) passed to segments. Drawing coordinates are
/// destination units.
pub trait GraphicsContext {
    /// Horizontal and vertical resolution in units per inch.
    fn dpi(&self) -> (u32, u32);

    /// The currently installed font, if any.
    fn font(&self) -> Option<FontRequest>;

    /// Installs `font`, or clears the font when `None`.
    fn set_font(&mut self, font: Option<&FontRequest>) -> Result<(), Error>;

    /// Vertical metrics of the installed font.
    fn font_metrics(&mut self) -> Result<FontMetrics, Error>;

    /// Measures `text` with the installed font and returns its width.
    ///
    /// `partial` is cleared and then receives, for every code unit, the width of the text
    /// up to and including that unit.
    fn text_extent(&mut self, text: &[u16], partial: &mut Vec<i32>) -> Result<i32, Error>;

    /// Draws `text` with its baseline origin at `origin`.
    ///
    /// `advances` holds the destination advance of every code unit.
    fn draw_text(
        &mut self,
        origin: Point,
        text: &[u16],
        advances: &[i32],
        color: Color,
    ) -> Result<(), Error>;

    /// Draws glyphs from the installed font relative to the baseline origin `origin`.
    fn draw_glyphs(
        &mut self,
        origin: Point,
        glyphs: &[PositionedGlyph],
        color: Color,
    ) -> Result<(), Error>;

    /// Fills `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), Error>;

    /// Inverts the pixels of `rect`, used for selection and caret highlighting.
    fn invert_rect(&mut self, rect: Rect) -> Result<(), Error>;
}

/// Installs a font in a borrowed context and restores the caller's font on drop.
pub(crate) struct FontScope<'a> {
    ctx: &'a mut dyn GraphicsContext,
    saved: Option<FontRequest>,
}

impl<'a> FontScope<'a> {
    pub(crate) fn install(
        ctx: &'a mut dyn GraphicsContext,
        font: &FontRequest,
    ) -> Result<Self, Error> {
        let saved = ctx.font();
        if saved.as_ref() != Some(font) {
            ctx.set_font(Some(font))?;
        }
        Ok(Self { ctx, saved })
    }
}

impl<'a> Deref for FontScope<'a> {
    type Target = dyn GraphicsContext + 'a;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for FontScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for FontScope<'_> {
    fn drop(&mut self) {
        if self.ctx.font() == self.saved {
            return;
        }
        if let Err(err) = self.ctx.set_font(self.saved.as_ref()) {
            log::warn!("failed to restore the caller's font: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[test]
    fn font_scope_restores_previous_font() {
        let mut ctx = TestContext::new();
        let caller = FontRequest::from(&RunProps::new(WritingSystem(9), 12.0));
        ctx.set_font(Some(&caller)).unwrap();
        {
            let scoped = FontRequest::from(&RunProps::new(WritingSystem(1), 10.0));
            let mut scope = FontScope::install(&mut ctx, &scoped).unwrap();
            assert_eq!(scope.font(), Some(scoped.clone()), "installed");
            assert!(scope.font_metrics().is_ok(), "usable while scoped");
        }
        assert_eq!(ctx.font(), Some(caller), "restored after drop");
    }

    #[test]
    fn font_scope_propagates_install_failure() {
        let mut ctx = TestContext::new();
        ctx.reject(WritingSystem(3));
        let font = FontRequest::from(&RunProps::new(WritingSystem(3), 10.0));
        let err = FontScope::install(&mut ctx, &font).err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Font, "unusable font");
        assert_eq!(ctx.font(), None, "nothing installed");
    }
}
