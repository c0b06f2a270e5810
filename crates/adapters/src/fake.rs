// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory stand-in for a host reached through sudo.
//!
//! [`FakeExecutor`] records every invocation and simulates the handful of
//! commands the helpers issue (`test`, `mkdir`, `rm`, `chown`, `chmod`,
//! `chgrp`, `git clone`, `git remote`) against an in-memory directory tree.
//! Anything else exits 127, as `env` does for an unknown command.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use runas_core::{ExecError, ExecErrorKind, ExecOutput, Invocation, Target};

use crate::executor::PrivilegedExecutor;

/// Recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub target: Target,
    pub argv: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub timeout: Duration,
    pub capture: bool,
}

impl ExecCall {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// True if `pattern` matches this call (see [`FakeExecutor::fail`]).
    pub fn matches(&self, pattern: &[String]) -> bool {
        matches_pattern(&self.argv, pattern)
    }
}

#[derive(Debug, Clone)]
enum Response {
    Exit { code: i32, stdout: String, stderr: String },
    Timeout,
    NotFound,
}

#[derive(Debug, Default)]
struct FakeHost {
    calls: Vec<ExecCall>,
    dirs: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    owners: BTreeMap<PathBuf, String>,
    modes: BTreeMap<PathBuf, u32>,
    remotes: Vec<String>,
    rules: Vec<(Vec<String>, Response)>,
}

/// Fake privileged executor for testing
#[derive(Clone)]
pub struct FakeExecutor {
    inner: Arc<Mutex<FakeHost>>,
}

impl Default for FakeExecutor {
    fn default() -> Self {
        let host = FakeHost { remotes: vec!["origin".to_string()], ..FakeHost::default() };
        let fake = Self { inner: Arc::new(Mutex::new(host)) };
        fake.add_dir("/");
        fake
    }
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and all of its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut host = self.inner.lock();
        for ancestor in path.as_ref().ancestors() {
            host.dirs.insert(ancestor.to_path_buf());
        }
    }

    /// Create a regular file (and its parent directories).
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.inner.lock().files.insert(path.to_path_buf());
    }

    /// Remotes reported by `git remote` (default: `origin`).
    pub fn set_remotes<I, S>(&self, remotes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.lock().remotes = remotes.into_iter().map(Into::into).collect();
    }

    /// Make matching invocations exit with `code` and `stderr`.
    ///
    /// A pattern matches when its first element equals the program and the
    /// remaining elements appear in the argument vector in order, so
    /// `["git", "clone"]` matches every clone. Later rules take precedence.
    pub fn fail<I, S>(&self, pattern: I, code: i32, stderr: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(pattern, Response::Exit { code, stdout: String::new(), stderr: stderr.into() });
    }

    /// Make matching invocations succeed with `stdout` without simulating them.
    pub fn respond<I, S>(&self, pattern: I, stdout: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(pattern, Response::Exit { code: 0, stdout: stdout.into(), stderr: String::new() });
    }

    /// Make matching invocations time out.
    pub fn time_out<I, S>(&self, pattern: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(pattern, Response::Timeout);
    }

    /// Make matching invocations report a missing binary.
    pub fn not_found<I, S>(&self, pattern: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(pattern, Response::NotFound);
    }

    pub fn clear_rules(&self) {
        self.inner.lock().rules.clear();
    }

    /// Get all recorded invocations
    pub fn calls(&self) -> Vec<ExecCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded invocations whose program is `program`.
    pub fn calls_to(&self, program: &str) -> Vec<ExecCall> {
        self.calls().into_iter().filter(|c| c.program() == program).collect()
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let host = self.inner.lock();
        host.dirs.contains(path.as_ref()) || host.files.contains(path.as_ref())
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner.lock().dirs.contains(path.as_ref())
    }

    /// Last `chown`/`chgrp` spec applied to `path`, e.g. `alice:staff` or `:staff`.
    pub fn owner(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.lock().owners.get(path.as_ref()).cloned()
    }

    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        self.inner.lock().modes.get(path.as_ref()).copied()
    }

    fn rule<I, S>(&self, pattern: I, response: Response)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern = pattern.into_iter().map(Into::into).collect();
        self.inner.lock().rules.push((pattern, response));
    }
}

#[async_trait]
impl PrivilegedExecutor for FakeExecutor {
    async fn execute(&self, invocation: Invocation) -> Result<ExecOutput, ExecError> {
        let response = {
            let mut host = self.inner.lock();
            host.calls.push(ExecCall {
                target: invocation.target().clone(),
                argv: invocation.argv().to_vec(),
                env: invocation.env().clone(),
                timeout: invocation.timeout(),
                capture: invocation.capture(),
            });
            let scripted = host
                .rules
                .iter()
                .rev()
                .find(|(pattern, _)| matches_pattern(invocation.argv(), pattern))
                .map(|(_, response)| response.clone());
            match scripted {
                Some(response) => response,
                None => host.simulate(invocation.argv()),
            }
        };

        let (code, stdout, stderr) = match response {
            Response::Exit { code, stdout, stderr } => (code, stdout, stderr),
            Response::Timeout => {
                return Err(invocation.error(ExecErrorKind::Timeout(invocation.timeout())))
            }
            Response::NotFound => return Err(invocation.error(ExecErrorKind::NotFound)),
        };
        let output = if invocation.capture() {
            ExecOutput::new(code, stdout, stderr)
        } else {
            ExecOutput::new(code, "", "")
        };
        invocation.settle(output)
    }
}

impl FakeHost {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains(path)
    }

    fn has_children(&self, path: &Path) -> bool {
        let below = |p: &&PathBuf| p.as_path() != path && p.starts_with(path);
        self.dirs.iter().any(|p| below(&p)) || self.files.iter().any(|p| below(&p))
    }

    fn simulate(&mut self, argv: &[String]) -> Response {
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["test", "-e", path] => exit_status(self.exists(Path::new(path))),
            ["test", "-d", path] => exit_status(self.dirs.contains(Path::new(path))),
            ["mkdir", "-p", path] => self.mkdir(Path::new(path), true),
            ["mkdir", path] => self.mkdir(Path::new(path), false),
            ["rm", "-rf", "--", path] => {
                self.remove(Path::new(path));
                ok("")
            }
            ["chown", spec, path] | ["chgrp", spec, path] => {
                let spec = if args[0] == "chgrp" { format!(":{}", spec) } else { spec.to_string() };
                self.with_existing(path, |host, path| {
                    host.owners.insert(path.to_path_buf(), spec);
                })
            }
            ["chmod", mode, path] => match u32::from_str_radix(mode, 8) {
                Ok(mode) => self.with_existing(path, |host, path| {
                    host.modes.insert(path.to_path_buf(), mode);
                }),
                Err(_) => fail(1, format!("chmod: invalid mode: '{}'", mode)),
            },
            ["git", "clone", .., path] => self.clone_into(Path::new(path)),
            ["git", "-C", path, "remote"] => {
                if !self.dirs.contains(&Path::new(path).join(".git")) {
                    return fail(128, "fatal: not a git repository".to_string());
                }
                let mut out = self.remotes.join("\n");
                if !out.is_empty() {
                    out.push('\n');
                }
                ok(&out)
            }
            ["git", "-C", path, ..] => {
                if self.dirs.contains(&Path::new(path).join(".git")) {
                    ok("")
                } else {
                    fail(128, "fatal: not a git repository".to_string())
                }
            }
            [program, ..] => fail(127, format!("env: '{}': No such file or directory", program)),
            [] => fail(127, String::new()),
        }
    }

    fn mkdir(&mut self, path: &Path, parents: bool) -> Response {
        if self.files.contains(path) {
            return fail(1, "mkdir: cannot create directory: File exists".to_string());
        }
        if self.dirs.contains(path) {
            return if parents {
                ok("")
            } else {
                fail(1, "mkdir: cannot create directory: File exists".to_string())
            };
        }
        let parent_ok = match path.parent() {
            Some(parent) => self.dirs.contains(parent),
            None => true,
        };
        if !parents && !parent_ok {
            return fail(1, "mkdir: cannot create directory: No such file or directory".to_string());
        }
        if path.ancestors().skip(1).any(|a| self.files.contains(a)) {
            return fail(1, "mkdir: cannot create directory: Not a directory".to_string());
        }
        for ancestor in path.ancestors() {
            self.dirs.insert(ancestor.to_path_buf());
        }
        ok("")
    }

    fn remove(&mut self, path: &Path) {
        self.dirs.retain(|p| !p.starts_with(path));
        self.files.retain(|p| !p.starts_with(path));
        self.owners.retain(|p, _| !p.starts_with(path));
        self.modes.retain(|p, _| !p.starts_with(path));
    }

    fn with_existing(&mut self, path: &str, apply: impl FnOnce(&mut Self, &Path)) -> Response {
        let path = Path::new(path);
        if !self.exists(path) {
            return fail(1, "cannot access: No such file or directory".to_string());
        }
        apply(self, path);
        ok("")
    }

    fn clone_into(&mut self, path: &Path) -> Response {
        if self.files.contains(path) || self.has_children(path) {
            return fail(
                128,
                "fatal: destination path already exists and is not an empty directory".to_string(),
            );
        }
        for ancestor in path.ancestors() {
            self.dirs.insert(ancestor.to_path_buf());
        }
        self.dirs.insert(path.join(".git"));
        ok("")
    }
}

fn matches_pattern(argv: &[String], pattern: &[String]) -> bool {
    let (Some(program), Some(wanted)) = (argv.first(), pattern.first()) else {
        return false;
    };
    if program != wanted {
        return false;
    }
    let mut rest = argv[1..].iter();
    pattern[1..].iter().all(|token| rest.any(|arg| arg == token))
}

fn exit_status(success: bool) -> Response {
    if success {
        ok("")
    } else {
        fail(1, String::new())
    }
}

fn ok(stdout: &str) -> Response {
    Response::Exit { code: 0, stdout: stdout.to_string(), stderr: String::new() }
}

fn fail(code: i32, stderr: String) -> Response {
    Response::Exit { code, stdout: String::new(), stderr }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
