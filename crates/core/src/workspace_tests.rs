// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn path_is_home_dir_tenant_project() {
    let config = WorkspaceConfig::default();
    let path = workspace_path(&config, Path::new("/home/alice"), "Acme Corp", "AI Ops");
    assert_eq!(path, Some(PathBuf::from("/home/alice/workspace/acme-corp/ai-ops")));
}

#[test]
fn path_components_cannot_escape_home() {
    let config = WorkspaceConfig::default();
    let path = workspace_path(&config, Path::new("/home/alice"), "tenant/..", "../../etc").unwrap();
    assert_eq!(path, PathBuf::from("/home/alice/workspace/tenant/etc"));
    assert!(!path.components().any(|c| matches!(c, std::path::Component::ParentDir)));
}

#[test]
fn empty_slug_has_no_path() {
    let config = WorkspaceConfig::default();
    assert_eq!(workspace_path(&config, Path::new("/home/alice"), "..", "proj"), None);
    assert_eq!(workspace_path(&config, Path::new("/home/alice"), "acme", "@@"), None);
}

#[test]
fn custom_dir_name() {
    let config = WorkspaceConfig { dir_name: "src".to_string(), ..WorkspaceConfig::default() };
    let path = workspace_path(&config, Path::new("/srv/homes/bob"), "t", "p");
    assert_eq!(path, Some(PathBuf::from("/srv/homes/bob/src/t/p")));
}

#[test]
fn rooted_home_joins_username() {
    assert_eq!(rooted_home(Path::new("/srv/homes"), "bob"), PathBuf::from("/srv/homes/bob"));
}

#[yare::parameterized(
    absent              = { false, false, WorkspaceState::Absent },
    absent_stale_flag   = { false, true,  WorkspaceState::Absent },
    partial             = { true,  false, WorkspaceState::Partial },
    valid               = { true,  true,  WorkspaceState::Valid },
)]
fn state(exists: bool, has_metadata: bool, expected: WorkspaceState) {
    let status = WorkspaceStatus { path: PathBuf::from("/w"), exists, has_metadata };
    assert_eq!(status.state(), expected);
    assert_eq!(status.is_valid(), expected == WorkspaceState::Valid);
}

#[test]
fn state_display() {
    assert_eq!(WorkspaceState::Partial.to_string(), "partial");
}
