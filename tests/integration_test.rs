//! Integration tests for git-courier
//!
//! These tests require git to be installed and available.
//! All repositories live in temp directories to avoid polluting user data.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use git_courier::config::{Config, SideEffectPolicy};
use git_courier::error::{Error, GitError};
use git_courier::git::{GitConfig, PUSH_DEFAULT_KEY};
use git_courier::ops::{
    CloneOptions, Courier, FetchOptions, FormatPatchOptions, PullOptions, PushOptions,
};
use git_courier::prompt::PresetPrompter;
use git_courier::runner::GitFlag;

/// Run git in a directory, asserting success
async fn git(dir: &Path, args: &[&str]) {
    let output = tokio::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .await
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run git in a directory, returning whether it succeeded
async fn git_ok(dir: &Path, args: &[&str]) -> bool {
    tokio::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Helper to create a test git repository with one commit
async fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init"]).await;
    git(&repo_path, &["config", "user.email", "test@test.com"]).await;
    git(&repo_path, &["config", "user.name", "Test User"]).await;

    let readme_path = repo_path.join("README.md");
    tokio::fs::write(&readme_path, "# Test Repository\n")
        .await
        .unwrap();

    git(&repo_path, &["add", "README.md"]).await;
    git(&repo_path, &["commit", "-m", "Initial commit"]).await;

    (temp_dir, repo_path)
}

/// Courier with fixed policies and a canned prompt answer
fn courier(
    set_push_default: SideEffectPolicy,
    keep_remote_head: SideEffectPolicy,
    prompt_answer: bool,
) -> Courier {
    let config = Config {
        set_push_default,
        keep_remote_head,
        ..Config::default()
    };
    Courier::new(config, Arc::new(PresetPrompter::new(prompt_answer)))
}

#[tokio::test]
async fn test_clone_applies_push_default_under_always() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Always, SideEffectPolicy::Always, false);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };

    let target = courier.clone(work.path(), opts).await.unwrap();
    assert!(target.join("README.md").exists(), "clone should check out files");

    let config = GitConfig::new(&target);
    let push_default = config.get(PUSH_DEFAULT_KEY).await.unwrap();
    assert_eq!(push_default.as_deref(), Some("origin"));
}

#[tokio::test]
async fn test_clone_never_policy_leaves_push_default_unset() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Always, true);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };

    let target = courier.clone(work.path(), opts).await.unwrap();

    let config = GitConfig::new(&target);
    assert_eq!(config.get(PUSH_DEFAULT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_clone_ask_policy_follows_answer() {
    let (_src_temp, src) = create_test_repo().await;

    // Confirmed
    let work = TempDir::new().unwrap();
    let yes = courier(SideEffectPolicy::Ask, SideEffectPolicy::Always, true);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("yes-clone")),
        flags: vec![],
    };
    let target = yes.clone(work.path(), opts).await.unwrap();
    let config = GitConfig::new(&target);
    assert_eq!(
        config.get(PUSH_DEFAULT_KEY).await.unwrap().as_deref(),
        Some("origin")
    );

    // Declined
    let no = courier(SideEffectPolicy::Ask, SideEffectPolicy::Always, false);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("no-clone")),
        flags: vec![],
    };
    let target = no.clone(work.path(), opts).await.unwrap();
    let config = GitConfig::new(&target);
    assert_eq!(config.get(PUSH_DEFAULT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_clone_deletes_remote_head_when_not_kept() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };

    let target = courier.clone(work.path(), opts).await.unwrap();

    let head_exists = git_ok(&target, &["symbolic-ref", "refs/remotes/origin/HEAD"]).await;
    assert!(!head_exists, "remote HEAD should have been deleted");
}

#[tokio::test]
async fn test_clone_keeps_remote_head_when_kept() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Always, false);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };

    let target = courier.clone(work.path(), opts).await.unwrap();

    let head_exists = git_ok(&target, &["symbolic-ref", "refs/remotes/origin/HEAD"]).await;
    assert!(head_exists, "remote HEAD should still point somewhere");
}

#[tokio::test]
async fn test_bare_clone_attempts_no_side_effects() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    // Policies say always, but bare clones must not be touched.
    let courier = courier(SideEffectPolicy::Always, SideEffectPolicy::Always, true);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("bare.git")),
        flags: vec![GitFlag::Bare],
    };

    let target = courier.clone(work.path(), opts).await.unwrap();
    assert!(target.join("HEAD").exists(), "bare clone should exist");

    let config = GitConfig::new(&target);
    assert_eq!(config.get(PUSH_DEFAULT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_clone_surfaces_and_mutates_nothing() {
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Always, SideEffectPolicy::Always, true);
    let opts = CloneOptions {
        url: work.path().join("no-such-source").display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };

    let err = courier.clone(work.path(), opts).await.err().unwrap();
    assert!(matches!(err, Error::Process(_)), "got: {err}");
    assert!(
        !work.path().join("cloned").join(".git").exists(),
        "no repository should be left behind"
    );
}

#[tokio::test]
async fn test_fetch_nonexistent_remote_aborts_before_spawn() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    let err = courier
        .fetch(
            &repo,
            FetchOptions {
                remote: Some("upstream".to_string()),
                ..FetchOptions::default()
            },
        )
        .await
        .err()
        .unwrap();

    assert!(matches!(
        err,
        Error::Git(GitError::RemoteNotFound(ref name)) if name == "upstream"
    ));
}

#[tokio::test]
async fn test_remote_add_fetch_and_prune() {
    let (_src_temp, src) = create_test_repo().await;
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Always, SideEffectPolicy::Never, false);
    courier
        .remote_add(&repo, "origin", &src.display().to_string(), false)
        .await
        .unwrap();

    // The add seeded the push default under the always policy.
    let config = GitConfig::new(&repo);
    assert_eq!(
        config.get(PUSH_DEFAULT_KEY).await.unwrap().as_deref(),
        Some("origin")
    );

    courier
        .fetch(&repo, FetchOptions::default())
        .await
        .unwrap();

    courier.remote_prune(&repo, "origin").await.unwrap();
}

#[tokio::test]
async fn test_fetch_all_with_refspec_rejected() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    let err = courier
        .fetch(
            &repo,
            FetchOptions {
                all: true,
                refspec: Some("main".to_string()),
                ..FetchOptions::default()
            },
        )
        .await
        .err()
        .unwrap();

    assert!(matches!(err, Error::Aborted(_)), "got: {err}");
}

#[tokio::test]
async fn test_remote_add_with_immediate_fetch() {
    let (_src_temp, src) = create_test_repo().await;
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .remote_add(&repo, "origin", &src.display().to_string(), true)
        .await
        .unwrap();

    // The fetch ran as part of the add, so remote-tracking refs exist.
    let refs = tokio::process::Command::new("git")
        .current_dir(&repo)
        .args(["for-each-ref", "refs/remotes/origin"])
        .output()
        .await
        .unwrap();
    let listing = String::from_utf8_lossy(&refs.stdout).to_string();
    assert!(
        !listing.trim().is_empty(),
        "remote add -f should have fetched tracking refs"
    );
}

#[tokio::test]
async fn test_remote_remove_unsets_matching_push_default() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Always, SideEffectPolicy::Never, false);
    courier
        .remote_add(&repo, "origin", "https://example.com/repo.git", false)
        .await
        .unwrap();

    let config = GitConfig::new(&repo);
    assert_eq!(
        config.get(PUSH_DEFAULT_KEY).await.unwrap().as_deref(),
        Some("origin")
    );

    courier.remote_remove(&repo, "origin").await.unwrap();
    assert_eq!(config.get(PUSH_DEFAULT_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_remote_add_duplicate_rejected() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .remote_add(&repo, "origin", "https://example.com/repo.git", false)
        .await
        .unwrap();

    let err = courier
        .remote_add(&repo, "origin", "https://example.com/other.git", false)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::Git(GitError::RemoteExists(_))));
}

#[tokio::test]
async fn test_remote_rename_same_name_is_noop() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);

    // No remote named "origin" exists, and none is needed: the rename
    // short-circuits before touching the repository.
    let renamed = courier
        .remote_rename(&repo, "origin", "origin")
        .await
        .unwrap();
    assert!(!renamed);
}

#[tokio::test]
async fn test_remote_rename_and_set_url() {
    let (_temp, repo) = create_test_repo().await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .remote_add(&repo, "origin", "https://example.com/repo.git", false)
        .await
        .unwrap();

    let renamed = courier
        .remote_rename(&repo, "origin", "upstream")
        .await
        .unwrap();
    assert!(renamed);

    let err = courier
        .remote_rename(&repo, "origin", "upstream")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::Git(GitError::RemoteNotFound(_))));

    courier
        .remote_set_url(&repo, "upstream", "https://example.com/moved.git")
        .await
        .unwrap();
    let url = GitConfig::new(&repo)
        .get("remote.upstream.url")
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/moved.git"));

    courier.remote_remove(&repo, "upstream").await.unwrap();
    let err = courier.remote_remove(&repo, "upstream").await.err().unwrap();
    assert!(matches!(err, Error::Git(GitError::RemoteNotFound(_))));
}

#[tokio::test]
async fn test_push_to_local_bare_remote() {
    let (_temp, repo) = create_test_repo().await;

    // A bare repository standing in for the server side.
    let remote_temp = TempDir::new().unwrap();
    git(remote_temp.path(), &["init", "--bare"]).await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .remote_add(
            &repo,
            "origin",
            &remote_temp.path().display().to_string(),
            false,
        )
        .await
        .unwrap();

    courier
        .push(&repo, PushOptions::default())
        .await
        .unwrap();

    // The current branch must now exist on the remote.
    let branches = tokio::process::Command::new("git")
        .current_dir(remote_temp.path())
        .args(["branch", "--list"])
        .output()
        .await
        .unwrap();
    let listing = String::from_utf8_lossy(&branches.stdout).to_string();
    assert!(!listing.trim().is_empty(), "push should create a branch");
}

#[tokio::test]
async fn test_push_uses_configured_push_default() {
    let (_temp, repo) = create_test_repo().await;

    let remote_temp = TempDir::new().unwrap();
    git(remote_temp.path(), &["init", "--bare"]).await;

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .remote_add(
            &repo,
            "mirror",
            &remote_temp.path().display().to_string(),
            false,
        )
        .await
        .unwrap();
    GitConfig::new(&repo)
        .set(PUSH_DEFAULT_KEY, "mirror")
        .await
        .unwrap();

    // No explicit remote: remote.pushDefault decides.
    courier
        .push(&repo, PushOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pull_from_origin_in_fresh_clone() {
    let (_src_temp, src) = create_test_repo().await;
    let work = TempDir::new().unwrap();

    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Always, false);
    let opts = CloneOptions {
        url: src.display().to_string(),
        directory: Some(PathBuf::from("cloned")),
        flags: vec![],
    };
    let target = courier.clone(work.path(), opts).await.unwrap();

    let branch = tokio::process::Command::new("git")
        .current_dir(&target)
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .await
        .unwrap();
    let branch = String::from_utf8_lossy(&branch.stdout).trim().to_string();

    // Already up to date, but the whole invocation path must succeed.
    courier
        .pull(
            &target,
            PullOptions {
                remote: Some("origin".to_string()),
                branch: Some(branch),
                flags: vec![],
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_format_patch_writes_patch_files() {
    let (_temp, repo) = create_test_repo().await;

    // Second commit so HEAD~1..HEAD is non-empty
    tokio::fs::write(repo.join("CHANGES.md"), "change\n")
        .await
        .unwrap();
    git(&repo, &["add", "CHANGES.md"]).await;
    git(&repo, &["commit", "-m", "Add changes"]).await;

    let patches = TempDir::new().unwrap();
    let courier = courier(SideEffectPolicy::Never, SideEffectPolicy::Never, false);
    courier
        .format_patch(
            &repo,
            FormatPatchOptions {
                range: Some("HEAD~1..HEAD".to_string()),
                output_dir: Some(patches.path().to_path_buf()),
                flags: vec![],
            },
        )
        .await
        .unwrap();

    let mut entries = tokio::fs::read_dir(patches.path()).await.unwrap();
    let mut found_patch = false;
    while let Some(entry) = entries.next_entry().await.unwrap() {
        if entry.path().extension().is_some_and(|e| e == "patch") {
            found_patch = true;
        }
    }
    assert!(found_patch, "format-patch should write a .patch file");
}
