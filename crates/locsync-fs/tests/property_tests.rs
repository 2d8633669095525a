use locsync_fs::{NormalizedPath, compute_content_checksum};
use pretty_assertions::assert_ne;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);

        // No backslashes survive normalization
        prop_assert!(!path.as_str().contains('\\'));

        // Normalizing twice changes nothing
        let again = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, again);
    }

    #[test]
    fn test_join_then_file_name(dir in "[a-z]{1,8}(/[a-z]{1,8}){0,3}", name in "[a-z]{1,8}\\.json") {
        let joined = NormalizedPath::new(&dir).join(&name);

        prop_assert!(joined.as_str().starts_with(&dir));
        prop_assert_eq!(joined.file_name(), Some(name.as_str()));
        prop_assert_eq!(joined.extension(), Some("json"));
        prop_assert_eq!(joined.parent(), Some(NormalizedPath::new(&dir)));
    }

    #[test]
    fn test_checksum_is_deterministic_and_prefixed(content in "\\PC*") {
        let first = compute_content_checksum(&content);
        let second = compute_content_checksum(&content);

        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with("sha256:"));
        prop_assert_eq!(first.len(), "sha256:".len() + 64);
    }
}

#[test]
fn test_checksum_distinguishes_whitespace() {
    assert_ne!(
        compute_content_checksum("Hello"),
        compute_content_checksum("Hello ")
    );
}
