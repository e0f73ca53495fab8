// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

mod asserts;
pub(crate) mod samples;

pub(crate) use asserts::{assert_partition, assert_surrogate_safe};

use seglayout::{
    BreakRequest, BreakResult, EndReason, GraphicsContext, Paragraph, RenderEngine, RunProps,
    TextSource, WritingSystem,
};

pub(crate) const LATIN_WS: WritingSystem = WritingSystem(1);
pub(crate) const ARABIC_WS: WritingSystem = WritingSystem(2);

/// Properties of a 10pt left-to-right run.
pub(crate) fn latin() -> RunProps {
    RunProps::new(LATIN_WS, 10.0)
}

/// Properties of a 10pt right-to-left run.
pub(crate) fn arabic() -> RunProps {
    RunProps::new(ARABIC_WS, 10.0).with_rtl(true)
}

pub(crate) fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Breaks a whole paragraph into segments the way a line-layout client would.
///
/// Hard-break characters are skipped by the client, so they are not covered by any
/// segment.
pub(crate) fn break_paragraph(
    engine: &mut dyn RenderEngine,
    paragraph: &Paragraph,
    ctx: &mut dyn GraphicsContext,
    max_width: i32,
) -> Vec<BreakResult> {
    let len = paragraph.len();
    let mut results = Vec::new();
    let mut min = 0;
    let mut start_of_line = true;
    while min < len {
        let request = BreakRequest::new(min, len, max_width).with_start_of_line(start_of_line);
        let result = engine.find_break(paragraph, ctx, &request).unwrap();
        match (&result.segment, result.reason) {
            (Some(_), reason) => {
                min += result.consumed;
                start_of_line = reason.ends_line();
                results.push(result);
            }
            (None, EndReason::HardBreak) => {
                min += 1;
                start_of_line = true;
            }
            (None, reason) => panic!("no segment at {min} in {max_width} units: {reason:?}"),
        }
    }
    results
}
