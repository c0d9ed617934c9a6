//! Serial number rendering and reverse parsing.
//!
//! Rendering is pure: the only side-effecting step (allocating the count)
//! already happened in the allocator. Reverse parsing recovers the
//! positional components of an issued number, which hosts denormalize
//! onto stored documents.

use super::error::SerialNumberError;
use super::format::{FieldKind, FormatSpec, Segment};
use super::types::{ResolvedFields, SerialNumber, SerialNumberParts};

/// Renders the final serial number string.
///
/// Fields are emitted in template order with no separators beyond the
/// template's own literal segments. Numeric fields are zero-padded to
/// exactly the field width; a prefix longer than its field is truncated
/// to the leftmost `width` characters. The count is guaranteed to fit by
/// the allocator's overflow check.
#[must_use]
pub fn render(spec: &FormatSpec, fields: &ResolvedFields, count: u64) -> SerialNumber {
    let mut out = String::with_capacity(spec.total_width());

    for segment in spec.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(field) => match field.kind {
                FieldKind::Prefix => out.extend(fields.prefix.chars().take(field.width)),
                FieldKind::Serie => {
                    push_padded(&mut out, u64::from(fields.serie.unwrap_or(0)), field.width);
                }
                FieldKind::Month => push_padded(&mut out, u64::from(fields.month), field.width),
                FieldKind::Year => {
                    push_padded(&mut out, fields.year_last_digits(field.width), field.width);
                }
                FieldKind::Count => push_padded(&mut out, count, field.width),
            },
        }
    }

    SerialNumber::new(out)
}

/// Zero-pads a value to exactly `width` digits, keeping the trailing
/// digits of values that are too wide.
fn push_padded(out: &mut String, value: u64, width: usize) {
    let digits = value.to_string();
    if digits.len() > width {
        out.push_str(&digits[digits.len() - width..]);
    } else {
        for _ in digits.len()..width {
            out.push('0');
        }
        out.push_str(&digits);
    }
}

/// Parses an issued serial number back into its positional components.
///
/// The exact positional inverse of [`render`]: the serial is sliced by
/// segment widths and literal text. Two-digit year fields come back as
/// the printed digits (24, not 2024).
///
/// # Errors
///
/// Returns `SerialMismatch` when the serial's length, literals, or
/// numeric fields do not line up with the template.
pub fn parse(spec: &FormatSpec, serial: &str) -> Result<SerialNumberParts, SerialNumberError> {
    let mismatch = || SerialNumberError::SerialMismatch {
        serial: serial.to_string(),
        template: spec.template().to_string(),
    };

    let mut parts = SerialNumberParts::default();
    let mut rest = serial;

    for segment in spec.segments() {
        match segment {
            Segment::Literal(text) => {
                rest = rest.strip_prefix(text.as_str()).ok_or_else(mismatch)?;
            }
            Segment::Field(field) => {
                let (value, tail) = split_width(rest, field.width).ok_or_else(mismatch)?;
                match field.kind {
                    FieldKind::Prefix => parts.prefix = Some(value.to_string()),
                    FieldKind::Serie => {
                        parts.serie = Some(value.parse().map_err(|_| mismatch())?);
                    }
                    FieldKind::Month => {
                        parts.month = Some(value.parse().map_err(|_| mismatch())?);
                    }
                    FieldKind::Year => {
                        parts.year = Some(value.parse().map_err(|_| mismatch())?);
                    }
                    FieldKind::Count => {
                        parts.count = value.parse().map_err(|_| mismatch())?;
                    }
                }
                rest = tail;
            }
        }
    }

    if !rest.is_empty() {
        return Err(mismatch());
    }

    Ok(parts)
}

/// Splits off the first `width` characters, or None if too short.
fn split_width(s: &str, width: usize) -> Option<(&str, &str)> {
    match s.char_indices().nth(width) {
        Some((index, _)) => Some(s.split_at(index)),
        None if s.chars().count() == width => Some((s, "")),
        None => None,
    }
}
