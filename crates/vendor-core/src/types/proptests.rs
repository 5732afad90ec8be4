//! Property-based tests for the intake rules.
