// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests of the `harfrust` shaping backend with a real font.

use std::rc::Rc;

use seglayout::shape::HarfrustShaper;
use seglayout::{
    BreakRequest, EndReason, ErrorKind, FontRequest, Paragraph, RenderEngine, RunProps,
    ShapeRequest, ShapedEngine, ShapedText, Shaper, TextSource, WritingSystem,
};
use seglayout_dev::{font_data, MockContext, DEJAVU_SANS};

use crate::util::{arabic, latin, utf16, ARABIC_WS, LATIN_WS};

fn shaper() -> HarfrustShaper {
    let data = font_data(DEJAVU_SANS).unwrap();
    let mut shaper = HarfrustShaper::new();
    shaper.add_font(LATIN_WS, data.clone(), 0).unwrap();
    shaper.add_font(ARABIC_WS, data, 0).unwrap();
    shaper
}

fn shape(shaper: &HarfrustShaper, text: &str, props: &RunProps) -> ShapedText {
    let font = FontRequest::from(props);
    let text = utf16(text);
    let request = ShapeRequest {
        font: &font,
        text: &text,
        rtl: props.rtl,
        dpi: 72,
    };
    shaper.shape(&request).unwrap()
}

/// Asserts that the character spans of the glyphs tile `0..len`.
fn assert_covers(shaped: &ShapedText, len: usize, case: &str) {
    let mut spans: Vec<_> = shaped.slots.iter().map(|slot| slot.chars.clone()).collect();
    assert!(
        spans.iter().all(|span| span.start < span.end),
        "empty span in {case}: {spans:?}"
    );
    spans.sort_by_key(|span| span.start);
    spans.dedup();
    assert_eq!(spans.first().map(|span| span.start), Some(0), "starts at zero in {case}");
    assert_eq!(spans.last().map(|span| span.end), Some(len), "ends at {len} in {case}");
    for pair in spans.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap or overlap in {case}: {spans:?}");
    }
}

#[test]
fn harfrust_latin_in_logical_order() {
    let shaper = shaper();
    let shaped = shape(&shaper, "fit office", &latin());
    assert_covers(&shaped, 10, "latin");
    assert!(
        shaped.slots.windows(2).all(|pair| pair[0].chars.start <= pair[1].chars.start),
        "left to right follows the text"
    );
    assert!(shaped.slots.iter().all(|slot| slot.advance > 0), "every glyph advances");
}

#[test]
fn harfrust_arabic_in_visual_order() {
    let shaper = shaper();
    let shaped = shape(&shaper, "مرحبا", &arabic());
    assert_covers(&shaped, 5, "arabic");
    assert!(
        shaped.slots.windows(2).all(|pair| pair[0].chars.start >= pair[1].chars.start),
        "right to left runs against the text"
    );
    let first = shaped.slots.last().unwrap();
    assert_eq!(first.chars.start, 0, "logical start is drawn rightmost");
}

#[test]
fn harfrust_reuses_its_buffer() {
    let shaper = shaper();
    let first = shape(&shaper, "fit office", &latin());
    shape(&shaper, "مرحبا", &arabic());
    let again = shape(&shaper, "fit office", &latin());
    assert_eq!(first, again, "same glyphs after shaping other text");
}

#[test]
fn harfrust_scales_with_resolution() {
    let shaper = shaper();
    let font = FontRequest::from(&latin());
    let text = utf16("office");
    let width = |dpi| {
        let request = ShapeRequest {
            font: &font,
            text: &text,
            rtl: false,
            dpi,
        };
        shaper.shape(&request).unwrap().width()
    };
    let low = width(72);
    let high = width(144);
    assert!(low > 0, "measured");
    // Each glyph rounds on its own.
    assert!((high - 2 * low).abs() <= 12, "{high} is about twice {low}");
}

#[test]
fn harfrust_missing_face_is_a_font_error() {
    let shaper = shaper();
    let font = FontRequest::from(&RunProps::new(WritingSystem(9), 10.0));
    let text = utf16("abc");
    let request = ShapeRequest {
        font: &font,
        text: &text,
        rtl: false,
        dpi: 72,
    };
    let err = shaper.shape(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Font, "no face for the writing system");
}

#[test]
fn harfrust_drives_the_shaped_engine() {
    let paragraph = Paragraph::new("The quick fox", latin());
    let mut engine = ShapedEngine::new(Rc::new(shaper()));
    let mut ctx = MockContext::new();
    let whole = engine
        .find_break(&paragraph, &mut ctx, &BreakRequest::new(0, 13, 100_000))
        .unwrap();
    assert_eq!(whole.reason, EndReason::NoMore, "everything fits");
    assert_eq!(whole.consumed, paragraph.len(), "every unit");

    let max_width = whole.width / 2;
    let half = engine
        .find_break(&paragraph, &mut ctx, &BreakRequest::new(0, 13, max_width))
        .unwrap();
    assert_eq!(half.reason, EndReason::MoreLines, "wrapped");
    assert!(half.consumed > 0, "something fits");
    assert!(half.width <= max_width, "{} in {max_width}", half.width);
}
