//! Property tests for search-path amendment.

use hostprep_cli::domain::search_path::{SEPARATOR, amend, contains_dir};
use proptest::prelude::*;

const CHOCO: &str = r"C:\ProgramData\chocolatey\bin";

fn entry() -> impl Strategy<Value = String> {
    r"[A-Za-z]:\\[A-Za-z0-9 _.\\]{0,20}"
}

fn path_value() -> impl Strategy<Value = String> {
    prop::collection::vec(entry(), 0..8).prop_map(|entries| entries.join(";"))
}

fn occurrences(path: &str, dir: &str) -> usize {
    let wanted = dir.trim_end_matches('\\').to_ascii_lowercase();
    path.split(SEPARATOR)
        .filter(|e| e.trim().trim_end_matches('\\').to_ascii_lowercase() == wanted)
        .count()
}

proptest! {
    /// The directory is always present after amending.
    #[test]
    fn prop_amend_makes_dir_present(path in path_value()) {
        let amended = amend(&path, CHOCO);
        prop_assert!(contains_dir(&amended, CHOCO));
    }

    /// An absent directory is added exactly once, at the end.
    #[test]
    fn prop_absent_dir_appended_once(path in path_value()) {
        prop_assume!(!contains_dir(&path, CHOCO));
        let amended = amend(&path, CHOCO);
        prop_assert_eq!(occurrences(&amended, CHOCO), 1);
        prop_assert!(amended.ends_with(CHOCO));
        prop_assert!(amended.starts_with(&path));
    }

    /// A present directory leaves the value untouched.
    #[test]
    fn prop_present_dir_is_unchanged(path in path_value(), upper in any::<bool>()) {
        let dir = if upper { CHOCO.to_ascii_uppercase() } else { format!("{CHOCO}\\") };
        let with_dir = amend(&path, &dir);
        prop_assert_eq!(amend(&with_dir, CHOCO), with_dir);
    }

    /// Amending twice equals amending once.
    #[test]
    fn prop_amend_is_idempotent(path in path_value()) {
        let once = amend(&path, CHOCO);
        prop_assert_eq!(amend(&once, CHOCO), once);
    }
}
