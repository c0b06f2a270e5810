// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use runas_adapters::FakeExecutor;
use runas_core::Config;
use runas_engine::{GitActions, GitError, WorkspaceManager};

use super::*;
use crate::output::OutputFormat;

#[derive(Parser)]
struct Harness {
    #[command(subcommand)]
    command: GitCommand,
}

fn parse(argv: &[&str]) -> GitCommand {
    Harness::try_parse_from(std::iter::once("git").chain(argv.iter().copied())).unwrap().command
}

const WS: &str = "/home/alice/workspace/acme/site";

fn setup() -> (FakeExecutor, WorkspaceManager<FakeExecutor>, GitActions<FakeExecutor>) {
    let config = Config::default();
    let fake = FakeExecutor::new();
    fake.add_dir(format!("{}/.git", WS));
    let manager = WorkspaceManager::new(fake.clone(), &config);
    let git = GitActions::new(fake.clone(), &config);
    (fake, manager, git)
}

fn git_subcommands(fake: &FakeExecutor) -> Vec<String> {
    fake.calls_to("git").iter().filter_map(|c| c.argv.get(3).cloned()).collect()
}

#[test]
fn pull_defaults() {
    let GitCommand::Pull { branch, clean, .. } = parse(&["pull", "-u", "alice", "--path", WS]) else {
        panic!("expected pull");
    };
    assert_eq!(branch, "main");
    assert!(!clean);
}

#[tokio::test]
async fn pull_with_clean_resets_first() {
    let (fake, manager, git) = setup();
    let cmd = parse(&["pull", "-u", "alice", "--path", WS, "-b", "dev", "--clean"]);
    handle(cmd, &manager, &git, OutputFormat::Text).await.unwrap();

    assert_eq!(git_subcommands(&fake), vec!["remote", "reset", "clean", "pull", "status"]);
}

#[tokio::test]
async fn push_uses_branch() {
    let (fake, manager, git) = setup();
    handle(parse(&["push", "-u", "alice", "--path", WS, "-b", "feature"]), &manager, &git, OutputFormat::Json)
        .await
        .unwrap();

    let push = fake.calls_to("git").into_iter().find(|c| c.argv.get(3).map(String::as_str) == Some("push"));
    assert_eq!(push.unwrap().argv[4..], ["origin".to_string(), "feature".to_string()]);
}

#[tokio::test]
async fn outside_a_workspace_is_an_error() {
    let (_fake, manager, git) = setup();
    let cmd = parse(&["status", "-u", "alice", "--path", "/home/alice/elsewhere"]);
    let err = handle(cmd, &manager, &git, OutputFormat::Text).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<GitError>(), Some(GitError::NotAWorkspace { .. })));
}
