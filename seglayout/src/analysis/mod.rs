// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Break-severity classification and character property queries.

pub(crate) mod cluster;

use icu_properties::props::{BidiClass, GeneralCategory, LineBreak, WhiteSpace};
use icu_properties::{
    CodePointMapData, CodePointMapDataBorrowed, CodePointSetData, CodePointSetDataBorrowed,
};
use icu_segmenter::options::LineBreakOptions;
use icu_segmenter::{
    GraphemeClusterSegmenter, GraphemeClusterSegmenterBorrowed, LineSegmenter,
    LineSegmenterBorrowed,
};

use crate::util::{char_at, char_before};

/// How disruptive a line break at some position is.
///
/// Lower weights are preferred. The discriminants are the raw values exchanged with
/// shaping backends; see [`BreakWeight::from_raw`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BreakWeight {
    /// A change of writing system.
    Ws = 10,
    /// A word boundary, such as after a space.
    Word = 15,
    /// After an existing hyphen character.
    Hyphen = 20,
    /// Between letters of scripts that break between characters, such as CJK.
    Letter = 30,
    /// Any other cluster boundary; only used when nothing better fits.
    Clip = 40,
}

impl BreakWeight {
    /// Every weight, from most to least preferred.
    pub const ALL: [Self; 5] = [Self::Ws, Self::Word, Self::Hyphen, Self::Letter, Self::Clip];

    /// Converts a raw weight, returning `None` ("no break here") for unknown values.
    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|weight| weight.raw() == raw)
    }

    /// The raw value of this weight.
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// The next more disruptive weight.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Ws => Some(Self::Word),
            Self::Word => Some(Self::Hyphen),
            Self::Hyphen => Some(Self::Letter),
            Self::Letter => Some(Self::Clip),
            Self::Clip => None,
        }
    }
}

const SOFT_HYPHEN: char = '\u{00AD}';
const HYPHEN: char = '\u{2010}';

/// Classifies line-break opportunities and answers character property queries.
///
/// Backed by ICU4X compiled data; constructing one is cheap and it can be copied freely.
#[derive(Copy, Clone)]
pub struct BreakClassifier {
    segmenter: LineSegmenterBorrowed<'static>,
    graphemes: GraphemeClusterSegmenterBorrowed<'static>,
    line_break: CodePointMapDataBorrowed<'static, LineBreak>,
    general_category: CodePointMapDataBorrowed<'static, GeneralCategory>,
    bidi_class: CodePointMapDataBorrowed<'static, BidiClass>,
    white_space: CodePointSetDataBorrowed<'static>,
}

impl core::fmt::Debug for BreakClassifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BreakClassifier").finish_non_exhaustive()
    }
}

impl Default for BreakClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakClassifier {
    /// Creates a classifier using the auto line-break model.
    pub fn new() -> Self {
        Self {
            segmenter: LineSegmenter::new_auto(LineBreakOptions::default()),
            graphemes: GraphemeClusterSegmenter::new(),
            line_break: CodePointMapData::<LineBreak>::new(),
            general_category: CodePointMapData::<GeneralCategory>::new(),
            bidi_class: CodePointMapData::<BidiClass>::new(),
            white_space: CodePointSetData::new::<WhiteSpace>(),
        }
    }

    /// Returns the weight of a break before the code unit at `offset`.
    ///
    /// Offset zero is never a break and the end of the text is always a
    /// [`BreakWeight::Word`] break. Offsets past the end have no break.
    pub fn classify(&self, text: &[u16], offset: usize) -> Option<BreakWeight> {
        if offset == 0 || offset > text.len() {
            return None;
        }
        self.analyze(text).get(offset).copied().flatten()
    }

    /// Returns the weight of a break before every code unit of `text`, and at its end.
    ///
    /// The result has `text.len() + 1` entries. Offsets that are not cluster boundaries
    /// have no break.
    pub fn analyze(&self, text: &[u16]) -> Vec<Option<BreakWeight>> {
        let mut weights = vec![None; text.len() + 1];
        if text.is_empty() {
            return weights;
        }
        let starts = self.cluster_starts(text);
        for &boundary in &starts[1..starts.len() - 1] {
            weights[boundary] = Some(if self.inside_whitespace_run(text, boundary) {
                BreakWeight::Word
            } else {
                BreakWeight::Clip
            });
        }
        for boundary in self.segmenter.segment_utf16(text) {
            if boundary == 0 || boundary >= text.len() {
                continue;
            }
            // ICU breaks always fall on cluster boundaries, but be strict about it.
            if weights[boundary].is_none() {
                continue;
            }
            let weight = self.opportunity_weight(text, boundary);
            weights[boundary] = weights[boundary].map(|current| current.min(weight));
        }
        weights[text.len()] = Some(BreakWeight::Word);
        weights
    }

    /// Returns the offsets at which clusters start, followed by the end of the text.
    ///
    /// The result always starts with zero and is strictly increasing.
    pub fn cluster_starts(&self, text: &[u16]) -> Vec<usize> {
        cluster::cluster_starts(self, text)
    }

    /// The Unicode general category of `ch`.
    pub fn general_category(&self, ch: char) -> GeneralCategory {
        self.general_category.get(ch)
    }

    /// The Unicode bidi class of `ch`.
    pub fn bidi_class(&self, ch: char) -> BidiClass {
        self.bidi_class.get(ch)
    }

    /// Returns true for characters that hang at the end of a line.
    ///
    /// Hard-break characters are excluded.
    pub fn is_whitespace(&self, ch: char) -> bool {
        self.white_space.contains(ch) && !self.is_hard_break(ch)
    }

    /// Returns true for nonspacing, spacing and enclosing marks.
    pub fn is_combining_mark(&self, ch: char) -> bool {
        matches!(
            self.general_category(ch),
            GeneralCategory::NonspacingMark
                | GeneralCategory::SpacingMark
                | GeneralCategory::EnclosingMark
        )
    }

    /// Returns true for characters that always end a segment.
    pub fn is_hard_break(&self, ch: char) -> bool {
        matches!(
            ch,
            '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{2028}' | '\u{2029}' | '\u{FFFC}'
        )
    }

    pub(crate) fn grapheme_segmenter(&self) -> GraphemeClusterSegmenterBorrowed<'static> {
        self.graphemes
    }

    fn inside_whitespace_run(&self, text: &[u16], offset: usize) -> bool {
        self.is_whitespace(char_before(text, offset).0) && self.is_whitespace(char_at(text, offset).0)
    }

    fn opportunity_weight(&self, text: &[u16], offset: usize) -> BreakWeight {
        let (before, _) = char_before(text, offset);
        let (after, _) = char_at(text, offset);
        if self.is_whitespace(before) {
            return BreakWeight::Word;
        }
        let before_class = self.line_break.get(before);
        if before_class == LineBreak::Hyphen
            || (before_class == LineBreak::BreakAfter && matches!(before, SOFT_HYPHEN | HYPHEN))
        {
            return BreakWeight::Hyphen;
        }
        if breaks_between_letters(before_class) || breaks_between_letters(self.line_break.get(after))
        {
            return BreakWeight::Letter;
        }
        BreakWeight::Word
    }
}

fn breaks_between_letters(class: LineBreak) -> bool {
    matches!(
        class,
        LineBreak::Ideographic
            | LineBreak::ConditionalJapaneseStarter
            | LineBreak::H2
            | LineBreak::H3
            | LineBreak::JL
            | LineBreak::JV
            | LineBreak::JT
            | LineBreak::ComplexContext
    )
}
