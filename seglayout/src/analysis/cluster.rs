// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character cluster boundaries.
//!
//! A cluster is the smallest run of code units an insertion point may not split: an
//! extended grapheme cluster, widened where neighbouring graphemes compose under NFC.

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::analysis::BreakClassifier;
use crate::util::char_indices;

/// Number of characters in the NFC form of `text`.
fn nfc_len(normalizer: &ComposingNormalizerBorrowed<'_>, text: &[u16]) -> usize {
    let decoded: String = char_indices(text).map(|(_, ch)| ch).collect();
    normalizer.normalize(&decoded).chars().count()
}

pub(crate) fn cluster_starts(classifier: &BreakClassifier, text: &[u16]) -> Vec<usize> {
    let mut starts = vec![0];
    if text.is_empty() {
        return starts;
    }
    let normalizer = ComposingNormalizerBorrowed::new_nfc();
    let graphemes: Vec<usize> = classifier.grapheme_segmenter().segment_utf16(text).collect();
    let mut base = 0;
    for pair in graphemes.windows(2) {
        let (offset, next) = (pair[0], pair[1]);
        if offset == 0 {
            continue;
        }
        let composes = nfc_len(&normalizer, &text[base..next])
            < nfc_len(&normalizer, &text[base..offset]) + nfc_len(&normalizer, &text[offset..next]);
        if !composes {
            starts.push(offset);
            base = offset;
        }
    }
    starts.push(text.len());
    starts
}
