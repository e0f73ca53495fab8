// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

/// Computes `value * num / den` in 64-bit, rounding half away from zero.
///
/// A zero denominator yields zero.
pub(crate) fn mul_div(value: i32, num: i32, den: i32) -> i32 {
    if den == 0 {
        return 0;
    }
    let product = i64::from(value) * i64::from(num);
    let den = i64::from(den);
    let mut quotient = product / den;
    let remainder = product % den;
    if 2 * remainder.abs() >= den.abs() {
        quotient += product.signum() * den.signum();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the result is clamped into the i32 range first"
    )]
    let result = quotient.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    result
}

/// Converts a length in points to units at the given resolution.
pub(crate) fn points_to_units(points: f32, dpi: u32) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "font sizes and offsets are small; rounding to whole units is intended"
    )]
    let units = (points * dpi as f32 / 72.0).round() as i32;
    units
}

/// Returns true if `unit` is a UTF-16 high surrogate.
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

/// Returns true if `unit` is a UTF-16 low surrogate.
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Decodes the character starting at `index`, returning it and its length in code units.
///
/// Unpaired surrogates decode as U+FFFD with length one.
pub(crate) fn char_at(text: &[u16], index: usize) -> (char, usize) {
    let unit = text[index];
    if is_high_surrogate(unit) {
        if let Some(&next) = text.get(index + 1) {
            if is_low_surrogate(next) {
                let ch = char::decode_utf16([unit, next])
                    .next()
                    .and_then(Result::ok)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return (ch, 2);
            }
        }
        return (char::REPLACEMENT_CHARACTER, 1);
    }
    (
        char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
        1,
    )
}

/// Decodes the character that ends at `index` (exclusive).
pub(crate) fn char_before(text: &[u16], index: usize) -> (char, usize) {
    if index >= 2 && is_low_surrogate(text[index - 1]) && is_high_surrogate(text[index - 2]) {
        return char_at(text, index - 2);
    }
    char_at(text, index - 1)
}

/// Iterates the characters of `text` together with their code unit offsets.
pub(crate) fn char_indices(text: &[u16]) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut index = 0;
    core::iter::from_fn(move || {
        if index >= text.len() {
            return None;
        }
        let (ch, len) = char_at(text, index);
        let start = index;
        index += len;
        Some((start, ch))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_half_away_from_zero() {
        assert_eq!(mul_div(3, 1, 2), 2, "1.5 rounds up");
        assert_eq!(mul_div(-3, 1, 2), -2, "-1.5 rounds down");
        assert_eq!(mul_div(10, 96, 72), 13, "13.33 rounds to 13");
        assert_eq!(mul_div(7, 5, 0), 0, "zero denominator");
    }

    #[test]
    fn decode_surrogate_pair() {
        let text: Vec<u16> = "a\u{1F600}b".encode_utf16().collect();
        assert_eq!(char_at(&text, 1), ('\u{1F600}', 2), "pair at 1");
        assert_eq!(char_before(&text, 3), ('\u{1F600}', 2), "pair ending at 3");
        let offsets: Vec<usize> = char_indices(&text).map(|(i, _)| i).collect();
        assert_eq!(offsets, [0, 1, 3], "offsets skip the low surrogate");
    }
}
