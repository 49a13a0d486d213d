//! Unit tests for identity primitives.
