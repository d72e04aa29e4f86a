//! Logical path helpers.
//!
//! Logical paths are always absolute, `/`-separated, with no trailing slash
//! (except the root itself) and no `.`/`..` segments.

/// Normalize a logical path: ensure a leading `/`, collapse repeated
/// separators, and resolve `.` and `..` (never above the root).
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Join two logical path fragments and normalize the result.
pub fn join_paths(base: &str, name: &str) -> String {
    normalize_path(&format!("{}/{}", base, name))
}
