//! Crate-level tests: end-to-end render scenarios and property-based invariants.

mod invariant_tests;
