//! Scope key derivation for sequence counters.
//!
//! A scope key identifies one counter bucket. Every field present in the
//! format except the count contributes its resolved value, so a format
//! with a year but no month shares one counter across all months of that
//! year, and a format with neither runs a single ever-increasing counter.

use super::format::{FieldKind, FormatSpec, Segment};
use super::types::ResolvedFields;

/// Separator between resolved values inside a scope key.
///
/// U+001F (unit separator) cannot appear in any resolved value, so two
/// semantically different contexts can never concatenate to the same key.
const SCOPE_SEPARATOR: char = '\u{1f}';

/// Identity of a counter bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Derives the scope key for a format and resolved context.
    ///
    /// Pure function of its inputs: no configuration or clock access
    /// happens here. Values are concatenated in template order.
    #[must_use]
    pub fn derive(spec: &FormatSpec, fields: &ResolvedFields) -> Self {
        let mut parts: Vec<String> = Vec::new();

        for segment in spec.segments() {
            let Segment::Field(field) = segment else {
                continue;
            };
            match field.kind {
                FieldKind::Prefix => parts.push(fields.prefix.clone()),
                // An absent serie resolves to the empty string: one global
                // scope on that axis.
                FieldKind::Serie => {
                    parts.push(fields.serie.map(|serie| serie.to_string()).unwrap_or_default());
                }
                FieldKind::Month => {
                    if field.width == 2 {
                        parts.push(format!("{:02}", fields.month));
                    } else {
                        parts.push(fields.month.to_string());
                    }
                }
                FieldKind::Year => {
                    let digits = fields.year_last_digits(field.width);
                    parts.push(format!("{digits:0width$}", width = field.width));
                }
                FieldKind::Count => {}
            }
        }

        Self(parts.join(&SCOPE_SEPARATOR.to_string()))
    }

    /// Returns the raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a key from its raw string form.
    #[cfg(test)]
    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The separator is a control character; print ':' instead.
        let mut first = true;
        for part in self.0.split(SCOPE_SEPARATOR) {
            if !first {
                write!(f, ":")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}
