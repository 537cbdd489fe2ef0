//! Property-based tests for the layout passes.
