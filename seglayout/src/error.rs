// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::borrow::Cow;
use std::ops::Range;

/// Error type for faults reported by engines, segments and their collaborators.
///
/// Expected negative outcomes ("nothing fits", "not an insertion point") are never
/// reported through this type; they are ordinary return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The offending offset or range, when the error concerns one.
    range: Option<Range<usize>>,

    /// The length of the text the range was checked against.
    len: Option<usize>,

    /// Free-form detail, usually supplied by a backend.
    message: Option<Cow<'static, str>>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending range, if the error concerns one.
    pub fn range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    /// Additional detail supplied when the error was raised.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Creates an error for a font that cannot be installed or used.
    pub fn font(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorKind::Font, message)
    }

    /// Creates an error for a failure inside a shaping backend.
    pub fn shaping(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorKind::Shaping, message)
    }

    /// Creates an error for a failure inside a graphics context.
    pub fn context(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorKind::Context, message)
    }

    /// Creates an error for a failure inside a text source.
    pub fn text_source(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(ErrorKind::Source, message)
    }

    /// Creates an error for an offset or range outside `0..=len`.
    pub fn out_of_range(range: Range<usize>, len: usize) -> Self {
        Self {
            kind: ErrorKind::OutOfRange,
            range: Some(range),
            len: Some(len),
            message: None,
        }
    }

    pub(crate) fn invalid_argument(message: &'static str) -> Self {
        Self::with_message(ErrorKind::InvalidArgument, message)
    }

    pub(crate) fn already_stretched() -> Self {
        Self {
            kind: ErrorKind::AlreadyStretched,
            range: None,
            len: None,
            message: None,
        }
    }

    pub(crate) fn direction_fixed(range: Range<usize>) -> Self {
        Self {
            kind: ErrorKind::DirectionFixed,
            range: Some(range),
            len: None,
            message: None,
        }
    }

    fn with_message(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            range: None,
            len: None,
            message: Some(message.into()),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self.kind, &self.range) {
            (ErrorKind::OutOfRange, Some(range)) => {
                if let Some(len) = self.len {
                    write!(
                        f,
                        "range {}..{} out of bounds for len {}",
                        range.start, range.end, len
                    )?;
                } else {
                    write!(f, "range {}..{} out of bounds", range.start, range.end)?;
                }
            }
            (ErrorKind::DirectionFixed, Some(range)) => write!(
                f,
                "direction of segment {}..{} is fixed",
                range.start, range.end
            )?,
            (kind, _) => f.write_str(match kind {
                ErrorKind::OutOfRange => "argument out of range",
                ErrorKind::InvalidArgument => "invalid argument",
                ErrorKind::AlreadyStretched => "segment is already stretched",
                ErrorKind::DirectionFixed => "segment direction is fixed",
                ErrorKind::Font => "unusable font",
                ErrorKind::Shaping => "shaping failed",
                ErrorKind::Context => "graphics context failure",
                ErrorKind::Source => "text source failure",
            })?,
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An offset or range fell outside the text or segment it refers to.
    OutOfRange,

    /// An argument was rejected, such as a negative width or stretch.
    InvalidArgument,

    /// Stretch was requested for a segment that has already been stretched.
    AlreadyStretched,

    /// A direction change was requested for a segment whose direction is fixed.
    DirectionFixed,

    /// The font could not be installed in, or used by, the graphics context.
    Font,

    /// The shaping backend failed.
    Shaping,

    /// The graphics context failed to measure or draw.
    Context,

    /// The text source failed to supply properties or characters.
    Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_range() {
        let error = Error::out_of_range(4..9, 6);
        assert_eq!(error.kind(), ErrorKind::OutOfRange, "kind");
        assert_eq!(error.to_string(), "range 4..9 out of bounds for len 6");
    }

    #[test]
    fn display_with_message() {
        let error = Error::font("no face for writing system 7");
        assert_eq!(error.to_string(), "unusable font: no face for writing system 7");
        assert_eq!(error.message(), Some("no face for writing system 7"), "message");
    }
}
