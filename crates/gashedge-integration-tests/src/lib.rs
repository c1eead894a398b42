//! Cross-crate scenario tests. See the `tests/` directory.
