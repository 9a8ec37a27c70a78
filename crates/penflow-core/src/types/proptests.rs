//! Property-based tests for the codec and stroke model.
