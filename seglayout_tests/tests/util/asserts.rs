// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helper functions to assert truths during testing.

use seglayout::{BreakResult, InsertionPoint, Paragraph, TextSource};

/// Assert that `results` cover the paragraph from start to end without gaps or overlaps.
///
/// Only hard-break characters may sit between two segments.
pub(crate) fn assert_partition(paragraph: &Paragraph, results: &[BreakResult], case: &str) {
    let text = paragraph.text();
    let mut expected = 0;
    for (i, result) in results.iter().enumerate() {
        let segment = result.segment.as_ref().unwrap();
        let range = segment.range();
        if range.start == expected + 1 && matches!(text[expected], 0x0A | 0x0D | 0x2028) {
            expected += 1;
        }
        assert_eq!(range.start, expected, "segment {i} start with {case}");
        assert_eq!(range.len(), result.consumed, "segment {i} length with {case}");
        assert_eq!(segment.text(), &text[range.clone()], "segment {i} text with {case}");
        expected = range.end;
    }
    assert_eq!(expected, paragraph.len(), "end of paragraph with {case}");
}

/// Assert that no segment boundary splits a surrogate pair or a cluster.
pub(crate) fn assert_surrogate_safe(paragraph: &Paragraph, results: &[BreakResult], case: &str) {
    let text = paragraph.text();
    for (i, result) in results.iter().enumerate() {
        let segment = result.segment.as_ref().unwrap();
        for &offset in segment.cluster_boundaries().as_slice() {
            if let Some(&unit) = text.get(offset) {
                assert!(
                    !(0xDC00..=0xDFFF).contains(&unit),
                    "segment {i} boundary {offset} splits a surrogate pair with {case}"
                );
            }
            assert_eq!(
                segment.is_valid_insertion_point(offset),
                InsertionPoint::Ok,
                "segment {i} boundary {offset} with {case}"
            );
        }
    }
}
