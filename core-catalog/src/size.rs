//! Human-readable sizes.
//!
//! Sizes are written as `<number><unit>` where the unit is `KB`, `MB` or
//! `GB` (case-insensitive, optional space before the unit). Units are binary:
//! 1 KB is 1024 bytes.
//!
//! ```
//! use core_catalog::size::{canonicalize, parse};
//!
//! let bytes = parse("1.5GB").unwrap();
//! assert_eq!(bytes, 1_610_612_736);
//! assert_eq!(canonicalize(bytes), "1.5gb");
//! ```

use crate::error::SizeError;

/// Most fractional digits accepted in a size string.
const MAX_FRACTION_DIGITS: usize = 12;

/// Size unit, in binary powers of 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeUnit {
    Kb,
    Mb,
    Gb,
}

impl SizeUnit {
    /// Largest unit first, the order canonicalization prefers.
    const DESCENDING: [SizeUnit; 3] = [SizeUnit::Gb, SizeUnit::Mb, SizeUnit::Kb];

    /// Number of bytes in one unit.
    pub const fn bytes(self) -> u64 {
        match self {
            SizeUnit::Kb => 1024,
            SizeUnit::Mb => 1024 * 1024,
            SizeUnit::Gb => 1024 * 1024 * 1024,
        }
    }

    /// Lowercase suffix used in canonical names.
    pub const fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Kb => "kb",
            SizeUnit::Mb => "mb",
            SizeUnit::Gb => "gb",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::DESCENDING
            .into_iter()
            .find(|unit| unit.suffix().eq_ignore_ascii_case(suffix))
    }

    /// The largest unit in which `bytes` is at least 1, falling back to KB.
    fn for_bytes(bytes: u64) -> Self {
        Self::DESCENDING
            .into_iter()
            .find(|unit| bytes >= unit.bytes())
            .unwrap_or(SizeUnit::Kb)
    }
}

/// Parses a human-readable size into a byte count.
///
/// Fractional magnitudes are converted exactly and rounded down to whole
/// bytes, so `"1.1KB"` is 1126 bytes.
///
/// # Errors
///
/// Returns [`SizeError::InvalidFormat`] when `raw` is not `<number><unit>`
/// and [`SizeError::TooLarge`] when the result overflows `u64`.
pub fn parse(raw: &str) -> Result<u64, SizeError> {
    let invalid = || SizeError::InvalidFormat {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim();
    let split = trimmed
        .len()
        .checked_sub(2)
        .filter(|&at| trimmed.is_char_boundary(at))
        .ok_or_else(invalid)?;
    let (magnitude, suffix) = trimmed.split_at(split);
    let unit = SizeUnit::from_suffix(suffix).ok_or_else(invalid)?;

    let magnitude = magnitude.trim_end();
    let (whole, fraction) = match magnitude.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (magnitude, ""),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) {
        return Err(invalid());
    }
    if magnitude.contains('.') && !all_digits(fraction) {
        return Err(invalid());
    }
    if fraction.len() > MAX_FRACTION_DIGITS {
        return Err(invalid());
    }

    let too_large = || SizeError::TooLarge {
        raw: raw.to_string(),
    };
    let unit_bytes = u128::from(unit.bytes());

    let whole: u128 = whole.parse().map_err(|_| too_large())?;
    let mut total = whole.checked_mul(unit_bytes).ok_or_else(too_large)?;

    if !fraction.is_empty() {
        // at most 12 digits, so neither value overflows u128
        let numerator: u128 = fraction.parse().map_err(|_| invalid())?;
        let denominator = 10u128.pow(fraction.len() as u32);
        total += numerator * unit_bytes / denominator;
    }

    u64::try_from(total).map_err(|_| too_large())
}

/// Renders a byte count as its canonical size name.
///
/// Picks the largest unit in which the magnitude is at least 1, keeps at most
/// one fractional digit, and drops a trailing `.0`: `1_610_612_736` becomes
/// `"1.5gb"` and `1_073_741_824` becomes `"1gb"`.
///
/// Only byte counts produced by parsing a canonical name are guaranteed to
/// round-trip; anything else is rounded to the nearest tenth.
pub fn canonicalize(bytes: u64) -> String {
    let unit = SizeUnit::for_bytes(bytes);
    let unit_bytes = u128::from(unit.bytes());
    let tenths = (u128::from(bytes) * 10 + unit_bytes / 2) / unit_bytes;

    let (whole, tenth) = (tenths / 10, tenths % 10);
    if tenth == 0 {
        format!("{}{}", whole, unit.suffix())
    } else {
        format!("{}.{}{}", whole, tenth, unit.suffix())
    }
}

/// Formats a byte count for display with two decimals, e.g. `"1.50GB"`.
pub fn format_bytes(bytes: u64) -> String {
    let unit = SizeUnit::for_bytes(bytes);
    format!(
        "{:.2}{}",
        bytes as f64 / unit.bytes() as f64,
        unit.suffix().to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse("100KB").unwrap(), 100 * KB);
        assert_eq!(parse("1MB").unwrap(), MB);
        assert_eq!(parse("2GB").unwrap(), 2 * GB);
        assert_eq!(parse("1.5GB").unwrap(), 1_610_612_736);
    }

    #[test]
    fn test_parse_is_case_insensitive_with_optional_space() {
        assert_eq!(parse("512 kb").unwrap(), 512 * KB);
        assert_eq!(parse("512Kb").unwrap(), 512 * KB);
        assert_eq!(parse("  1 Mb  ").unwrap(), MB);
    }

    #[test]
    fn test_parse_rounds_fractions_down() {
        assert_eq!(parse("1.1KB").unwrap(), 1126);
        assert_eq!(parse("0.5MB").unwrap(), 512 * KB);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for raw in [
            "", "KB", "1", "1.5", "1TB", "1.5.0GB", ".5GB", "1.GB", "-1MB", "1e3KB", "one MB",
            "1_000KB", "1,5GB", "1.1234567890123KB", "1ĸb",
        ] {
            assert_eq!(
                parse(raw),
                Err(SizeError::InvalidFormat { raw: raw.to_string() }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert!(matches!(
            parse("99999999999999GB"),
            Err(SizeError::TooLarge { .. })
        ));
        assert!(matches!(
            parse("999999999999999999999999999999999999999999KB"),
            Err(SizeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_canonicalize_prefers_largest_unit() {
        assert_eq!(canonicalize(GB), "1gb");
        assert_eq!(canonicalize(1_610_612_736), "1.5gb");
        assert_eq!(canonicalize(1024 * KB), "1mb");
        assert_eq!(canonicalize(512 * KB), "512kb");
        assert_eq!(canonicalize(100 * KB), "100kb");
        assert_eq!(canonicalize(2 * GB), "2gb");
    }

    #[test]
    fn test_canonicalize_below_one_kb() {
        assert_eq!(canonicalize(512), "0.5kb");
        assert_eq!(canonicalize(0), "0kb");
    }

    #[test]
    fn test_canonical_round_trip() {
        for canonical in ["100kb", "1.1kb", "512kb", "1mb", "2.5mb", "10mb", "1gb", "1.5gb", "2gb"] {
            let bytes = parse(canonical).unwrap();
            assert_eq!(canonicalize(bytes), canonical);
            assert_eq!(parse(&canonicalize(bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1_610_612_736), "1.50GB");
        assert_eq!(format_bytes(512 * MB), "512.00MB");
        assert_eq!(format_bytes(100 * KB), "100.00KB");
        assert_eq!(format_bytes(0), "0.00KB");
    }
}
