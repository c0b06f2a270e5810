// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as pretty JSON, or run `text` for human output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => text(),
        OutputFormat::Json => println!("{}", to_json(value)?),
    }
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a one-line confirmation, or `{"ok": true, ...fields}` as JSON.
pub fn print_done(format: OutputFormat, message: &str, fields: serde_json::Value) -> anyhow::Result<()> {
    let mut obj = serde_json::json!({ "ok": true });
    if let (Some(obj), serde_json::Value::Object(extra)) = (obj.as_object_mut(), fields) {
        obj.extend(extra);
    }
    format_or_json(format, &obj, || println!("{}", message))
}
