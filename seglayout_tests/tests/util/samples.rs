// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Simple Latin text, the baseline for most tests.
pub(crate) const LATIN: &str = "The quick fox";

/// A word too long for most lines.
pub(crate) const LONG_WORD: &str = "Supercalifragilistic";

/// Text with ligatures the mock shaper knows about.
pub(crate) const LIGATURES: &str = "fit office fifty";

/// Latin text with astral-plane characters that take two code units each.
pub(crate) const ASTRAL: &str = "a\u{1F600}b \u{1D49C}\u{1D49E} \u{1F600}\u{1F601}\u{1F602} cd";

/// Text with combining marks and a decomposed Hangul syllable.
pub(crate) const MARKS: &str = "re\u{301}sume\u{301} \u{1100}\u{1161}\u{11A8} cafe\u{301}";

pub(crate) const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Integer cursus interdum dui, in gravida ligula aliquam in. Vivamus vitae metus pharetra, ultricies metus quis, consectetur augue.";
