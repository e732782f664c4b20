//! POSIX-style path arithmetic on page names and hrefs.
//!
//! Page names (`guide/install`) and relative hrefs (`../img/logo.png`) are
//! always `/`-separated regardless of host platform, so these helpers work on
//! plain strings instead of [`std::path::Path`].

/// Normalize a `/`-separated path, collapsing `.`, `..` and repeated slashes.
///
/// Mirrors the usual POSIX rules: leading `..` components survive on relative
/// paths, `..` above the root of an absolute path is dropped, and an empty
/// result becomes `.`. Exactly two leading slashes are kept, so
/// protocol-relative URLs (`//cdn.example.org/x`) stay intact.
///
/// # Examples
/// ```ignore
/// assert_eq!(normpath("a/./b/../c"), "a/c");
/// assert_eq!(normpath("../a//b/"), "../a/b");
/// assert_eq!(normpath(""), ".");
/// assert_eq!(normpath("//cdn/./x"), "//cdn/x");
/// ```
pub fn normpath(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    let double = path.starts_with("//") && !path.starts_with("///");
    match (absolute, joined.is_empty()) {
        (true, _) if double => format!("//{joined}"),
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join two paths; an absolute `tail` replaces `base`.
pub fn join(base: &str, tail: &str) -> String {
    if tail.starts_with('/') || base.is_empty() {
        tail.to_string()
    } else if base.ends_with('/') {
        format!("{base}{tail}")
    } else {
        format!("{base}/{tail}")
    }
}

/// Directory part of a path (`a/b/c` -> `a/b`, `c` -> ``, `/c` -> `/`).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(idx) => {
            let head = &path[..=idx];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() { head } else { trimmed }
        }
    }
}

/// Path of `path` relative to the directory `start`.
///
/// Both arguments are site-relative; an empty `start` means the site root.
///
/// # Examples
/// ```ignore
/// assert_eq!(relpath("a/c", "a"), "c");
/// assert_eq!(relpath("x/y", "a/b"), "../../x/y");
/// assert_eq!(relpath("a", "a"), ".");
/// ```
pub fn relpath(path: &str, start: &str) -> String {
    let path = normpath(path);
    let start = normpath(if start.is_empty() { "." } else { start });

    let path_parts = components(&path);
    let start_parts = components(&start);

    let common = path_parts
        .iter()
        .zip(&start_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel: Vec<&str> = vec![".."; start_parts.len() - common];
    rel.extend_from_slice(&path_parts[common..]);

    if rel.is_empty() {
        ".".to_string()
    } else {
        rel.join("/")
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}
