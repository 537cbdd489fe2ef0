//! Property-based tests for unit values and materialization.
