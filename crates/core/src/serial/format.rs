//! Serial number format templates.
//!
//! A format template is a small positional language over the letters
//! P (prefix), S (serie), M (month), Y (year) and C (count). The length of
//! a letter run sets the width of that field, so `"PPYYCCCC"` describes a
//! two-character prefix, a two-digit year, and a four-digit count.
//!
//! Parsing produces a typed field list shared by the scope deriver, the
//! renderer, and validation, so invariants like "at least one count field"
//! are checked in one place.

use std::sync::Arc;

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use super::error::SerialNumberError;

/// The kind of information a format field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Document type prefix, e.g. "IN".
    Prefix,
    /// Custom serie the document belongs to.
    Serie,
    /// Issuance month.
    Month,
    /// Issuance year.
    Year,
    /// The allocated count; the only field guaranteeing uniqueness.
    Count,
}

impl FieldKind {
    /// Maps a template letter to its field kind.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Self::Prefix),
            'S' => Some(Self::Serie),
            'M' => Some(Self::Month),
            'Y' => Some(Self::Year),
            'C' => Some(Self::Count),
            _ => None,
        }
    }

    /// The template letter for this kind.
    #[must_use]
    pub const fn letter(&self) -> char {
        match self {
            Self::Prefix => 'P',
            Self::Serie => 'S',
            Self::Month => 'M',
            Self::Year => 'Y',
            Self::Count => 'C',
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One typed field of a format template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatField {
    /// What the field renders.
    pub kind: FieldKind,
    /// Number of repeated letters, which bounds the rendered width exactly.
    pub width: usize,
}

/// One segment of a parsed format template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// A typed field.
    Field(FormatField),
    /// Literal text passed through unchanged.
    Literal(String),
}

/// A parsed, validated format template.
///
/// Field order follows the template and determines render order.
/// Invariants enforced by [`FormatSpec::parse`]:
/// - at least one count field is present
/// - a field kind appears in at most one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    template: String,
    segments: Vec<Segment>,
}

impl FormatSpec {
    /// Parses a template into a typed field list.
    ///
    /// Characters in `literals` become opaque literal segments; any other
    /// character outside `PSMYC` is a malformed format.
    ///
    /// # Errors
    ///
    /// Returns `SerialNumberError` when the template is empty, contains an
    /// unrecognized character, repeats a field kind in two separate runs,
    /// or lacks a count field.
    pub fn parse(template: &str, literals: &str) -> Result<Self, SerialNumberError> {
        if template.is_empty() {
            return Err(SerialNumberError::EmptyFormat);
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut seen: Vec<FieldKind> = Vec::new();

        for (position, character) in template.chars().enumerate() {
            if let Some(kind) = FieldKind::from_letter(character) {
                let extends_run = match segments.last_mut() {
                    Some(Segment::Field(field)) if field.kind == kind => {
                        field.width += 1;
                        true
                    }
                    _ => false,
                };
                if !extends_run {
                    if seen.contains(&kind) {
                        return Err(SerialNumberError::RepeatedField(kind));
                    }
                    seen.push(kind);
                    segments.push(Segment::Field(FormatField { kind, width: 1 }));
                }
            } else if literals.contains(character) {
                let extends_literal = match segments.last_mut() {
                    Some(Segment::Literal(text)) => {
                        text.push(character);
                        true
                    }
                    _ => false,
                };
                if !extends_literal {
                    segments.push(Segment::Literal(character.to_string()));
                }
            } else {
                return Err(SerialNumberError::UnrecognizedCharacter {
                    character,
                    position,
                });
            }
        }

        if !seen.contains(&FieldKind::Count) {
            return Err(SerialNumberError::MissingCountField);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The source template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The parsed segments, in template order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the field of the given kind, if the template has one.
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> Option<&FormatField> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Field(field) if field.kind == kind => Some(field),
            _ => None,
        })
    }

    /// Returns true if the template has a field of the given kind.
    #[must_use]
    pub fn has_field(&self, kind: FieldKind) -> bool {
        self.field(kind).is_some()
    }

    /// Width of the count field.
    #[must_use]
    pub fn count_width(&self) -> usize {
        self.field(FieldKind::Count).map_or(0, |field| field.width)
    }

    /// Largest count representable by the count field (`10^width - 1`).
    #[must_use]
    pub fn count_capacity(&self) -> u64 {
        count_capacity(self.count_width())
    }

    /// Total rendered length: field widths plus literal lengths.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Field(field) => field.width,
                Segment::Literal(text) => text.chars().count(),
            })
            .sum()
    }
}

/// Largest value that fits in `width` decimal digits.
#[must_use]
pub(crate) fn count_capacity(width: usize) -> u64 {
    match u32::try_from(width) {
        Ok(exponent) if exponent < 20 => 10u64.saturating_pow(exponent).saturating_sub(1),
        _ => u64::MAX,
    }
}

/// Default capacity of the format cache.
const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Cache of parsed format templates.
///
/// The same template is parsed on every allocation otherwise; entries are
/// keyed by the template string. The literal set comes from configuration
/// and is assumed stable for the lifetime of the cache.
#[derive(Clone)]
pub struct FormatCache {
    cache: Cache<String, Arc<FormatSpec>>,
}

impl FormatCache {
    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(DEFAULT_CACHE_CAPACITY).build(),
        }
    }

    /// Returns the parsed spec for a template, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns `SerialNumberError` when the template fails to parse.
    pub fn get(
        &self,
        template: &str,
        literals: &str,
    ) -> Result<Arc<FormatSpec>, SerialNumberError> {
        if let Some(spec) = self.cache.get(template) {
            return Ok(spec);
        }
        let spec = Arc::new(FormatSpec::parse(template, literals)?);
        self.cache.insert(template.to_string(), Arc::clone(&spec));
        Ok(spec)
    }
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new()
    }
}
