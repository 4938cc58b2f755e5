//! Path resolution for settings values.
//!
//! Paths in the settings file are relative to the file itself, so a VM
//! folder can be moved around as a unit.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Resolve a file path from settings against `base_dir`.
pub fn resolve_path(raw: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand_home(raw);
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

/// Resolve an executable name.
///
/// Anything that looks like a path is resolved like [`resolve_path`]. A bare
/// name prefers a binary sitting next to the settings file and otherwise
/// stays bare for `PATH` lookup.
pub fn resolve_program(raw: &str, base_dir: &Path) -> PathBuf {
    let looks_like_path = raw.starts_with('~') || raw.contains('/') || raw.contains(MAIN_SEPARATOR);
    if looks_like_path {
        return resolve_path(raw, base_dir);
    }

    let local = base_dir.join(raw);
    if local.is_file() {
        local
    } else {
        PathBuf::from(raw)
    }
}
