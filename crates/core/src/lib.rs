//! Core billing logic for Facto.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `serial` - Serial number formats, scoped sequences, and rendering
//! - `totals` - Discount resolution and document totals

pub mod serial;
pub mod totals;
