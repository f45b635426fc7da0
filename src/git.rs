//! Git metadata for the job payload, read through libgit2.

use crate::errors::Result;
use git2::Repository;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The HEAD revision of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub author_email: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub committer_name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub committer_email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    pub head: Head,
    pub branch: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub remotes: Vec<Remote>,
}

/// Work tree root of the repository containing `path`, if any.
pub fn repository_root(path: &Path) -> Option<PathBuf> {
    let repo = Repository::discover(path).ok()?;
    repo.workdir().map(Path::to_path_buf)
}

/// Collect HEAD, branch and remotes for the repository containing `path`.
///
/// `branch_override` (normally `$GIT_BRANCH`) replaces the branch read from
/// HEAD; CI systems often check out a detached HEAD.
pub fn collect_git_info(path: &Path, branch_override: Option<&str>) -> Result<GitInfo> {
    let repo = Repository::discover(path)?;
    let head_ref = repo.head()?;
    let commit = head_ref.peel_to_commit()?;

    let author = commit.author();
    let committer = commit.committer();
    let head = Head {
        id: commit.id().to_string(),
        author_name: author.name().unwrap_or_default().to_string(),
        author_email: author.email().unwrap_or_default().to_string(),
        committer_name: committer.name().unwrap_or_default().to_string(),
        committer_email: committer.email().unwrap_or_default().to_string(),
        message: commit.summary().unwrap_or_default().to_string(),
    };

    let branch = match branch_override.filter(|b| !b.is_empty()) {
        Some(branch) => branch.to_string(),
        None if head_ref.is_branch() => head_ref.shorthand().unwrap_or("HEAD").to_string(),
        None => "HEAD".to_string(),
    };

    let mut remotes = Vec::new();
    for name in repo.remotes()?.iter().flatten() {
        let remote = repo.find_remote(name)?;
        if let Some(url) = remote.url() {
            remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }

    log::debug!("Collected git info for {} on {}", head.id, branch);
    Ok(GitInfo {
        head,
        branch,
        remotes,
    })
}
