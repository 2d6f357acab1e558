//! Integration tests for the projection engine
//!
//! Tests are organized by topic:
//! - `scenarios` - Reference scenarios with known outcomes
//! - `invariants` - Properties that must hold for every run
//! - `validation` - Fail-fast parameter checks
//! - `builder_dsl` - Builder DSL for fluent parameter setup

mod invariants;
