// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slugify tenant and project names for use as workspace path components.

/// Maximum length of a single path-component slug.
pub const MAX_SLUG_LEN: usize = 64;

/// Slugify a string for use as one path component.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single hyphen, trims hyphens, and truncates to `max_len` characters at a
/// word boundary when possible. The result never contains `/` or `.` and so
/// can never escape its parent directory.
pub fn slugify(input: &str, max_len: usize) -> String {
    let lower = input.to_lowercase();

    let mut slug = String::with_capacity(lower.len());
    let mut last_was_hyphen = true; // suppresses a leading hyphen
    for ch in lower.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let mut result = slug.trim_end_matches('-').to_string();

    if result.len() > max_len {
        if let Some(pos) = result[..max_len].rfind('-') {
            result.truncate(pos);
        } else {
            result.truncate(max_len);
        }
    }

    result.trim_end_matches('-').to_string()
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
