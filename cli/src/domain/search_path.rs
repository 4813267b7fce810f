//! Windows search-path (`PATH`) manipulation.
//!
//! The amended value is handed to a single child process; the ambient
//! process environment is never modified.

/// Entry separator in a Windows `PATH` value.
pub const SEPARATOR: char = ';';

/// Returns `true` if `dir` is one of the entries of `path`.
///
/// Entries compare case-insensitively and ignore a trailing `\`, matching
/// how Windows resolves them.
#[must_use]
pub fn contains_dir(path: &str, dir: &str) -> bool {
    let wanted = normalize(dir);
    path.split(SEPARATOR).any(|entry| normalize(entry) == wanted)
}

/// Returns `path` with `dir` appended, unless it is already present.
///
/// An empty `path` yields `dir` alone.
#[must_use]
pub fn amend(path: &str, dir: &str) -> String {
    if contains_dir(path, dir) {
        return path.to_string();
    }
    if path.is_empty() {
        return dir.to_string();
    }
    if path.ends_with(SEPARATOR) {
        format!("{path}{dir}")
    } else {
        format!("{path}{SEPARATOR}{dir}")
    }
}

fn normalize(entry: &str) -> String {
    entry.trim().trim_end_matches('\\').to_ascii_lowercase()
}
