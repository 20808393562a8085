use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Whether `c` is a path separator on any supported platform.
///
/// Both `/` and `\` are accepted so that paths written for another platform
/// still trim cleanly.
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strip trailing separators from `path`.
///
/// A path made only of separators collapses to its first character so the
/// filesystem root survives (`"//"` becomes `"/"`).
pub fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() && !path.is_empty() {
        &path[..1]
    } else {
        trimmed
    }
}

/// Join `suffix` onto `base` with exactly one separator between them.
///
/// The result never ends in a separator. An empty suffix (or one made only of
/// separators) returns `base` with its trailing separators removed.
pub fn join_paths(base: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let base = base.as_ref().to_string_lossy();
    let base = trim_trailing_separators(&base);
    let suffix = suffix.trim_matches(is_separator);

    if suffix.is_empty() {
        return PathBuf::from(base);
    }
    if base.is_empty() {
        return PathBuf::from(suffix);
    }
    if base.ends_with(is_separator) {
        // Root: "/" + "etc" must not become "//etc".
        return PathBuf::from(format!("{}{}", base, suffix));
    }
    PathBuf::from(format!("{}{}{}", base, MAIN_SEPARATOR, suffix))
}
