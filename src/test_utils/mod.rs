//! Canned registries and prebuilt worlds for the concrete scenarios in
//! spec.md §8. Kept as an ordinary, unconditionally-compiled module
//! (not `#[cfg(test)]`) so integration tests under `tests/` can import
//! it too, matching the teacher's own `test_utils` convention.
pub mod fixtures;
