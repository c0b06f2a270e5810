// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

use std::time::Duration;

pub mod exec;
pub mod fs;
pub mod git;
pub mod workspace;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Seconds, integer or fractional. Zero is rejected.
pub(crate) fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("invalid number of seconds: {}", s))?;
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() => Ok(d),
        _ => Err(format!("timeout must be a positive number of seconds, got {}", s)),
    }
}

/// `KEY=VALUE`; the value may be empty or contain `=`.
pub(crate) fn parse_env(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {}", s)),
    }
}

/// Octal permission bits, with or without a leading `0o` or `0`.
pub(crate) fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: {}", s))
}
