//! Property-based tests for the copy filter.
//!
//! These tests use proptest to generate random relative paths and verify
//! that `should_skip` depends only on whole path components.

#[cfg(test)]
mod proptest_tests {
    use crate::filesystem::should_skip;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,12}".prop_filter("not a skipped name", |s| {
            s != ".git" && s != ".terraform" && s != "." && s != ".."
        })
    }

    proptest! {
        /// Property: paths built only from ordinary names are never skipped
        #[test]
        fn ordinary_paths_are_kept(parts in prop::collection::vec(segment(), 1..6)) {
            let path: PathBuf = parts.iter().collect();
            prop_assert!(!should_skip(&path), "unexpectedly skipped {:?}", path);
        }

        /// Property: inserting a .git or .terraform component anywhere skips the path
        #[test]
        fn skipped_component_anywhere_is_skipped(
            parts in prop::collection::vec(segment(), 0..6),
            position in 0usize..6,
            terraform in any::<bool>(),
        ) {
            let mut parts = parts;
            let name = if terraform { ".terraform" } else { ".git" };
            let position = position.min(parts.len());
            parts.insert(position, name.to_string());
            let path: PathBuf = parts.iter().collect();
            prop_assert!(should_skip(&path), "expected {:?} to be skipped", path);
        }

        /// Property: should_skip is deterministic
        #[test]
        fn should_skip_is_deterministic(input in ".*") {
            let path = PathBuf::from(&input);
            prop_assert_eq!(should_skip(&path), should_skip(&path));
        }
    }
}
