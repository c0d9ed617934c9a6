//! Property-based tests for serial number rendering and scope derivation.

use std::sync::Arc;

use proptest::prelude::*;

use super::allocator::{InMemoryCounterStore, SequenceAllocator};
use super::format::{FieldKind, FormatSpec};
use super::render;
use super::scope::ScopeKey;
use super::types::ResolvedFields;

/// Templates covering every field kind and a literal separator.
const TEMPLATES: &[&str] = &[
    "PPYYCCCC",
    "PPPYYCCCC",
    "PPSSSS-YYCCCC",
    "SSSS-CCCC",
    "YYCCCC",
    "PPMMYYCC",
    "MMYYYYCCCC",
];

fn template_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(TEMPLATES)
}

fn fields_strategy() -> impl Strategy<Value = (Option<u32>, u32, i32)> {
    (
        proptest::option::of(1u32..10_000),
        1u32..=12,
        1970i32..=2999,
    )
}

proptest! {
    /// Rendered length equals the sum of field widths plus literal
    /// segments, for any count within the count field's range.
    #[test]
    fn prop_render_length_is_fixed(
        template in template_strategy(),
        (serie, month, year) in fields_strategy(),
        count in 1u64..=99,
    ) {
        let spec = FormatSpec::parse(template, "-").unwrap();
        // A prefix exactly as wide as its field, so width bounds apply.
        let prefix_width = spec.field(FieldKind::Prefix).map_or(0, |field| field.width);
        let fields = ResolvedFields {
            prefix: "X".repeat(prefix_width),
            serie,
            month,
            year,
        };

        let serial = render::render(&spec, &fields, count);
        prop_assert_eq!(serial.as_str().chars().count(), spec.total_width());
    }

    /// The count comes back out of a rendered serial unchanged.
    #[test]
    fn prop_parse_recovers_count(
        template in template_strategy(),
        (serie, month, year) in fields_strategy(),
        count in 1u64..=99,
    ) {
        let spec = FormatSpec::parse(template, "-").unwrap();
        let prefix_width = spec.field(FieldKind::Prefix).map_or(0, |field| field.width);
        let fields = ResolvedFields {
            prefix: "X".repeat(prefix_width),
            serie,
            month,
            year,
        };

        let serial = render::render(&spec, &fields, count);
        let parts = render::parse(&spec, serial.as_str()).unwrap();
        prop_assert_eq!(parts.count, count);
    }

    /// Contexts that differ only in fields the format omits map to the
    /// same scope key.
    #[test]
    fn prop_scope_ignores_omitted_month(
        month_a in 1u32..=12,
        month_b in 1u32..=12,
        year in 2000i32..2100,
    ) {
        let spec = FormatSpec::parse("PPYYCCCC", "-").unwrap();
        let a = ResolvedFields { prefix: "IN".to_string(), serie: None, month: month_a, year };
        let b = ResolvedFields { prefix: "IN".to_string(), serie: None, month: month_b, year };

        prop_assert_eq!(ScopeKey::derive(&spec, &a), ScopeKey::derive(&spec, &b));
    }

    /// Distinct years within one century produce distinct scopes when the
    /// format has a two-digit year field.
    #[test]
    fn prop_scope_distinguishes_years(
        year_a in 2000i32..2100,
        year_b in 2000i32..2100,
    ) {
        prop_assume!(year_a != year_b);

        let spec = FormatSpec::parse("PPYYCCCC", "-").unwrap();
        let a = ResolvedFields { prefix: "IN".to_string(), serie: None, month: 1, year: year_a };
        let b = ResolvedFields { prefix: "IN".to_string(), serie: None, month: 1, year: year_b };

        prop_assert_ne!(ScopeKey::derive(&spec, &a), ScopeKey::derive(&spec, &b));
    }

    /// Repeated allocations for one scope are strictly increasing and
    /// gap-free, starting at 1.
    #[test]
    fn prop_allocator_gap_free(total in 1u64..60) {
        let allocator = SequenceAllocator::new(Arc::new(InMemoryCounterStore::new()));
        let scope = ScopeKey::from_raw("IN\u{1f}24");

        for expected in 1..=total {
            prop_assert_eq!(allocator.allocate(&scope, 6).unwrap(), expected);
        }
    }
}
