// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The break search shared by every engine.
//!
//! Engines differ only in how they turn text into measured clusters, which they express
//! by implementing [`Measurable`]. Everything else (span restriction, incremental
//! fetching, hard breaks, weight levels and trailing whitespace) lives here.

use std::ops::Range;

use crate::analysis::BreakWeight;
use crate::context::GraphicsContext;
use crate::engine::EngineConfig;
use crate::segment::DirectionDepth;
use crate::source::{RunProps, TextSource};
use crate::util::{char_at, is_high_surrogate, is_low_surrogate};
use crate::{BreakClassifier, Error};

/// Why a break search stopped where it did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The segment reaches the end of the text the caller asked about.
    NoMore,
    /// The segment was broken because the rest does not fit; more lines follow.
    MoreLines,
    /// The segment stops before a hard-break character.
    HardBreak,
    /// The segment stops at the backtrack limit, where no valid break exists.
    BadBreak,
    /// The segment stops at a valid break at the backtrack limit or at a change of
    /// writing system.
    OkayBreak,
    /// The segment stops at a change of writing system that is not a linguistic break.
    WsBreak,
    /// Trailing whitespace was left out of the segment and remains to be laid out.
    MoreWhitespace,
    /// Nothing could be broken off within the maximum width and weight.
    NothingFit,
}

impl EndReason {
    /// Returns true if a segment that stops for this reason ends its line.
    pub fn ends_line(self) -> bool {
        matches!(self, Self::NoMore | Self::MoreLines | Self::HardBreak)
    }
}

/// What to do with whitespace at the end of a segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrailingWhitespace {
    /// Trailing whitespace is part of the segment but hangs: it does not count towards
    /// the fitted width.
    #[default]
    Include,
    /// The segment never ends with whitespace.
    Strip,
    /// The segment holds only the whitespace run at the start of the search, and ends its
    /// line so that the whole run hangs.
    OnlyWhitespace,
}

/// The parameters of one break search.
///
/// Offsets are UTF-16 code unit offsets into the paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakRequest {
    /// Where the segment starts.
    pub min: usize,
    /// The end of the text to lay out; reaching it ends the search with
    /// [`EndReason::NoMore`].
    pub text_limit: usize,
    /// The segment may not extend past this offset.
    pub backtrack_limit: usize,
    /// Whether a segment that reaches `backtrack_limit` must end at a valid break.
    pub need_final_break: bool,
    /// Whether the segment starts a line.
    pub start_of_line: bool,
    /// The widest segment the caller can accept, in context units.
    pub max_width: i32,
    /// The most preferred break weight to look for first.
    pub preferred: BreakWeight,
    /// The least preferred break weight that is still acceptable.
    pub max_weight: BreakWeight,
    /// Handling of whitespace at the end of the segment.
    pub trailing_whitespace: TrailingWhitespace,
    /// Whether the paragraph's base direction is right-to-left.
    pub paragraph_rtl: bool,
}

impl BreakRequest {
    /// Creates a request for the text `min..text_limit` that accepts any break.
    pub fn new(min: usize, text_limit: usize, max_width: i32) -> Self {
        Self {
            min,
            text_limit,
            backtrack_limit: text_limit,
            need_final_break: true,
            start_of_line: true,
            max_width,
            preferred: BreakWeight::Word,
            max_weight: BreakWeight::Clip,
            trailing_whitespace: TrailingWhitespace::Include,
            paragraph_rtl: false,
        }
    }

    /// Sets the range of acceptable break weights.
    pub fn with_weights(mut self, preferred: BreakWeight, max_weight: BreakWeight) -> Self {
        self.preferred = preferred;
        self.max_weight = max_weight;
        self
    }

    /// Sets the backtrack limit and whether a valid break is needed there.
    pub fn with_backtrack_limit(mut self, limit: usize, need_final_break: bool) -> Self {
        self.backtrack_limit = limit;
        self.need_final_break = need_final_break;
        self
    }

    /// Sets the trailing whitespace mode.
    pub fn with_trailing_whitespace(mut self, mode: TrailingWhitespace) -> Self {
        self.trailing_whitespace = mode;
        self
    }

    /// Sets whether the segment starts a line.
    pub fn with_start_of_line(mut self, start_of_line: bool) -> Self {
        self.start_of_line = start_of_line;
        self
    }

    /// Sets the paragraph direction.
    pub fn with_paragraph_rtl(mut self, rtl: bool) -> Self {
        self.paragraph_rtl = rtl;
        self
    }
}

/// One measured cluster, in logical order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MeasuredCluster {
    /// Paragraph range of the cluster.
    pub(crate) range: Range<usize>,
    /// Advance width in context units.
    pub(crate) advance: i32,
    /// Break weight before the cluster reported by the measurer, if any.
    pub(crate) hint: Option<BreakWeight>,
}

/// Turns a run of text into measured clusters.
pub(crate) trait Measurable {
    /// Measures `text`, which starts at paragraph offset `start` and is styled by
    /// `props`, appending clusters that exactly cover it to `out`.
    fn measure(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        props: &RunProps,
        start: usize,
        text: &[u16],
        out: &mut Vec<MeasuredCluster>,
    ) -> Result<(), Error>;
}

/// Everything an engine needs to build the segment a search settled on.
#[derive(Clone, Debug)]
pub(crate) struct Fit {
    pub(crate) range: Range<usize>,
    pub(crate) text: Vec<u16>,
    pub(crate) props: RunProps,
    /// Cluster boundaries, from `range.start` to `range.end` inclusive.
    pub(crate) boundaries: Vec<usize>,
    pub(crate) depth: DirectionDepth,
    pub(crate) paragraph_rtl: bool,
    pub(crate) start_weight: Option<BreakWeight>,
    pub(crate) end_weight: Option<BreakWeight>,
    pub(crate) start_of_line: bool,
    pub(crate) end_of_line: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Outcome {
    pub(crate) fit: Option<Fit>,
    pub(crate) reason: EndReason,
}

impl Outcome {
    fn nothing(reason: EndReason) -> Self {
        Self { fit: None, reason }
    }
}

/// The depth of a run relative to the paragraph direction.
pub(crate) fn direction_depth(props: &RunProps, paragraph_rtl: bool, weak: bool) -> DirectionDepth {
    let mut level = props.embedding_level;
    if props.rtl != (level % 2 == 1) {
        level += 1;
    }
    let base = u8::from(paragraph_rtl);
    let depth = if level >= base {
        level - base
    } else {
        level + 2 - base
    };
    DirectionDepth { depth, weak }
}

/// Paragraph text around the measured range, with its break weights.
struct Window {
    start: usize,
    units: Vec<u16>,
    weights: Vec<Option<BreakWeight>>,
    starts: Vec<usize>,
}

impl Window {
    fn fetch(
        source: &dyn TextSource,
        classifier: &BreakClassifier,
        min: usize,
        end: usize,
        lookahead: usize,
    ) -> Result<Self, Error> {
        let len = source.len();
        let mut start = min.saturating_sub(lookahead);
        let stop = (end + lookahead).min(len);
        let mut units = Vec::with_capacity(stop - start);
        source.fetch(start..stop, &mut units)?;
        if start < min && units.first().copied().is_some_and(is_low_surrogate) {
            units.remove(0);
            start += 1;
        }
        if stop < len && units.last().copied().is_some_and(is_high_surrogate) {
            units.pop();
        }
        let weights = classifier.analyze(&units);
        let starts = classifier.cluster_starts(&units);
        Ok(Self {
            start,
            units,
            weights,
            starts,
        })
    }

    fn end(&self) -> usize {
        self.start + self.units.len()
    }

    fn slice(&self, range: Range<usize>) -> &[u16] {
        &self.units[range.start - self.start..range.end - self.start]
    }

    fn weight(&self, offset: usize) -> Option<BreakWeight> {
        offset
            .checked_sub(self.start)
            .and_then(|index| self.weights.get(index).copied().flatten())
    }

    fn char_at(&self, offset: usize) -> char {
        char_at(&self.units, offset - self.start).0
    }

    /// The first cluster start at or after `offset`.
    fn align(&self, offset: usize) -> usize {
        let relative = offset - self.start;
        let index = self.starts.partition_point(|&start| start < relative);
        self.starts
            .get(index)
            .map_or(self.end(), |&start| self.start + start)
    }

    fn hard_break(&self, classifier: &BreakClassifier, range: Range<usize>) -> Option<usize> {
        crate::util::char_indices(self.slice(range.clone()))
            .find(|&(_, ch)| classifier.is_hard_break(ch))
            .map(|(offset, _)| range.start + offset)
    }
}

/// Running widths over a list of clusters.
struct Widths {
    /// Total width after each cluster.
    total: Vec<i32>,
    /// Index of the first cluster that does not fit, if any.
    overflow: Option<usize>,
}

impl Widths {
    fn compute(
        clusters: &[MeasuredCluster],
        space: &[bool],
        mode: TrailingWhitespace,
        max_width: i32,
    ) -> Self {
        let mut total = Vec::with_capacity(clusters.len());
        let mut running = 0_i32;
        let mut overflow = None;
        for (index, cluster) in clusters.iter().enumerate() {
            running = running.saturating_add(cluster.advance);
            total.push(running);
            // Hanging whitespace never makes a segment too wide.
            let counts = mode == TrailingWhitespace::Strip || !space[index];
            if overflow.is_none() && counts && running > max_width {
                overflow = Some(index);
            }
        }
        Self { total, overflow }
    }
}

/// Finds the best place to end a segment starting at `request.min`.
pub(crate) fn find_break<M: Measurable>(
    measurer: &mut M,
    source: &dyn TextSource,
    ctx: &mut dyn GraphicsContext,
    classifier: &BreakClassifier,
    config: &EngineConfig,
    request: &BreakRequest,
) -> Result<Outcome, Error> {
    let len = source.len();
    let min = request.min;
    if min > request.text_limit || request.text_limit > len {
        return Err(Error::out_of_range(min..request.text_limit, len));
    }
    if request.max_width < 0 {
        return Err(Error::invalid_argument("max width must not be negative"));
    }
    if request.preferred > request.max_weight {
        return Err(Error::invalid_argument(
            "preferred break weight exceeds the maximum weight",
        ));
    }
    if len == 0 {
        let (props, _) = source.run_props(0)?;
        log::debug!("empty paragraph, degenerate segment");
        return Ok(Outcome {
            fit: Some(Fit {
                range: 0..0,
                text: Vec::new(),
                depth: direction_depth(&props, request.paragraph_rtl, true),
                props,
                boundaries: vec![0],
                paragraph_rtl: request.paragraph_rtl,
                start_weight: Some(BreakWeight::Word),
                end_weight: Some(BreakWeight::Word),
                start_of_line: request.start_of_line,
                end_of_line: true,
            }),
            reason: EndReason::NoMore,
        });
    }
    let backtrack_limit = request.backtrack_limit.min(request.text_limit);
    if backtrack_limit <= min {
        return Ok(Outcome::nothing(EndReason::NoMore));
    }

    let (props, run) = source.run_props(min)?;
    let mut span_end = run.end.max(min + 1);
    while span_end < backtrack_limit {
        let (next, next_run) = source.run_props(span_end)?;
        if next != props || next_run.end <= span_end {
            break;
        }
        span_end = next_run.end;
    }
    let mut end = span_end.min(backtrack_limit);
    let mode = request.trailing_whitespace;
    let lookahead = config.lookahead.max(1);

    let mut want = config.initial_fetch.max(1);
    let mut hard_break = None;
    let mut clusters = Vec::new();
    let mut space = Vec::new();
    let (window, widths) = loop {
        let target = min.saturating_add(want).min(end);
        let window = Window::fetch(source, classifier, min, target, lookahead)?;
        let mut measure_end = window.align(target).min(end);
        if let Some(pos) = window.hard_break(classifier, min..measure_end) {
            hard_break = Some(pos);
            end = pos;
            measure_end = pos;
        }
        if measure_end == min {
            log::debug!("hard break at {min}");
            return Ok(Outcome::nothing(EndReason::HardBreak));
        }
        clusters.clear();
        measurer.measure(ctx, &props, min, window.slice(min..measure_end), &mut clusters)?;
        space.clear();
        space.extend(
            clusters
                .iter()
                .map(|cluster| classifier.is_whitespace(window.char_at(cluster.range.start))),
        );
        let widths = Widths::compute(&clusters, &space, mode, request.max_width);
        let whitespace_done = mode == TrailingWhitespace::OnlyWhitespace && space.contains(&false);
        if widths.overflow.is_some() || measure_end == end || whitespace_done {
            break (window, widths);
        }
        let measured = measure_end - min;
        let width = widths.total.last().copied().unwrap_or(0).max(1);
        let estimate = i64::from(request.max_width) * measured as i64 / i64::from(width);
        want = usize::try_from(estimate)
            .unwrap_or(usize::MAX)
            .max(measured + 8);
        log::trace!("measured {measured} units at width {width}, now trying {want}");
    };

    let weight_at = |index: usize| -> Option<BreakWeight> {
        let offset = if index == 0 {
            min
        } else {
            clusters[index - 1].range.end
        };
        let hint = clusters.get(index).and_then(|cluster| cluster.hint);
        window
            .weight(offset)
            .map(|weight| hint.map_or(weight, |hint| weight.min(hint)))
    };
    let measured_end = clusters.last().map_or(min, |cluster| cluster.range.end);

    // Reason for a segment that runs all the way to `end`, or `None` to backtrack.
    let reason_at_end = || -> Option<EndReason> {
        if hard_break == Some(end) {
            Some(EndReason::HardBreak)
        } else if end == request.text_limit {
            Some(EndReason::NoMore)
        } else if end == span_end {
            match window.weight(end) {
                Some(weight) if weight < BreakWeight::Clip => Some(EndReason::OkayBreak),
                _ => Some(EndReason::WsBreak),
            }
        } else if window
            .weight(end)
            .is_some_and(|weight| weight <= request.max_weight)
        {
            Some(EndReason::OkayBreak)
        } else if !request.need_final_break {
            Some(EndReason::BadBreak)
        } else {
            None
        }
    };

    let (mut count, mut reason) = if mode == TrailingWhitespace::OnlyWhitespace {
        let count = space.iter().take_while(|&&is_space| is_space).count();
        if count == 0 {
            return Ok(Outcome::nothing(EndReason::NothingFit));
        }
        let reason = if clusters[count - 1].range.end == end {
            reason_at_end().unwrap_or(EndReason::BadBreak)
        } else {
            EndReason::OkayBreak
        };
        (count, reason)
    } else {
        let fitted = match widths.overflow {
            None if measured_end == end => reason_at_end().map(|reason| (clusters.len(), reason)),
            _ => None,
        };
        match fitted {
            Some(fitted) => fitted,
            None => {
                let fill = widths.overflow.unwrap_or(clusters.len());
                let mut level = Some(request.preferred);
                let mut chosen = None;
                while let Some(weight) = level.filter(|&weight| weight <= request.max_weight) {
                    chosen = (1..=fill)
                        .rev()
                        .find(|&index| weight_at(index).is_some_and(|at| at <= weight));
                    if chosen.is_some() {
                        break;
                    }
                    level = weight.next();
                }
                let Some(mut count) = chosen else {
                    log::debug!("nothing fits in {} units at {min}", request.max_width);
                    return Ok(Outcome::nothing(EndReason::NothingFit));
                };
                if mode == TrailingWhitespace::Include {
                    while count < clusters.len() && space[count] {
                        count += 1;
                    }
                }
                (count, EndReason::MoreLines)
            }
        }
    };

    // Whitespace only hangs at the end of a line; elsewhere it counts towards the width.
    let hangs = mode == TrailingWhitespace::OnlyWhitespace;
    if !hangs && !reason.ends_line() && widths.total[count - 1] > request.max_width {
        while count > 0 && space[count - 1] && widths.total[count - 1] > request.max_width {
            count -= 1;
        }
        if count == 0 {
            log::debug!("whitespace at {min} does not fit in {} units", request.max_width);
            return Ok(Outcome::nothing(EndReason::NothingFit));
        }
        reason = EndReason::MoreWhitespace;
    }

    if mode == TrailingWhitespace::Strip {
        let before = count;
        while count > 0 && space[count - 1] {
            count -= 1;
        }
        if count == 0 {
            return Ok(Outcome::nothing(EndReason::MoreWhitespace));
        }
        if count < before {
            reason = EndReason::MoreWhitespace;
        }
    }

    let lim = clusters[count - 1].range.end;
    let start_weight = if min == 0 {
        Some(BreakWeight::Word)
    } else if source.run_props(min - 1)?.0 != props {
        Some(BreakWeight::Ws)
    } else {
        window.weight(min)
    };
    let end_weight = if lim == len {
        Some(BreakWeight::Word)
    } else if lim == span_end {
        Some(BreakWeight::Ws)
    } else {
        weight_at(count)
    };
    let weak = space[..count].iter().all(|&is_space| is_space);
    let mut boundaries = Vec::with_capacity(count + 1);
    boundaries.push(min);
    boundaries.extend(clusters[..count].iter().map(|cluster| cluster.range.end));
    log::debug!("segment {min}..{lim}: {reason:?}");
    Ok(Outcome {
        fit: Some(Fit {
            range: min..lim,
            text: window.slice(min..lim).to_vec(),
            depth: direction_depth(&props, request.paragraph_rtl, weak),
            props,
            boundaries,
            paragraph_rtl: request.paragraph_rtl,
            start_weight,
            end_weight,
            start_of_line: request.start_of_line,
            end_of_line: hangs || reason.ends_line(),
        }),
        reason,
    })
}
