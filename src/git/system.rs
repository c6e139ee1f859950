//! [`GitClient`] backed by the local repository.
//!
//! Reads (change enumeration, HEAD state) go through git2. Mutations shell
//! out to the `git` binary so hooks, signing config and credential helpers
//! behave exactly as they would for the user.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use git2::{ErrorCode, Repository, Status, StatusOptions, SubmoduleIgnore, SubmoduleStatus};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::GitError;
use crate::git::client::{ChangeSet, GitClient};
use crate::git::settings::GitSettings;

const INDEX_FLAGS: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

const WORKTREE_FLAGS: Status = Status::WT_NEW
    .union(Status::WT_MODIFIED)
    .union(Status::WT_DELETED)
    .union(Status::WT_RENAMED)
    .union(Status::WT_TYPECHANGE);

const SUBMODULE_INDEX_FLAGS: SubmoduleStatus = SubmoduleStatus::INDEX_ADDED
    .union(SubmoduleStatus::INDEX_DELETED)
    .union(SubmoduleStatus::INDEX_MODIFIED);

const SUBMODULE_WORKTREE_FLAGS: SubmoduleStatus = SubmoduleStatus::WD_ADDED
    .union(SubmoduleStatus::WD_DELETED)
    .union(SubmoduleStatus::WD_MODIFIED);

/// Global option making every pathspec match a single literal path.
/// Without it `pages/[id].tsx` is a glob that also matches `pages/i.tsx`.
const LITERAL_PATHSPECS: &str = "--literal-pathspecs";

/// Git client for a real repository on disk.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    settings: GitSettings,
}

impl SystemGit {
    pub fn new(settings: GitSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GitSettings {
        &self.settings
    }

    /// Run `git <args>` in `workdir`, returning stdout on success.
    async fn run_git(&self, workdir: &Path, args: &[&str], operation: &str) -> Result<String, GitError> {
        if which::which(&self.settings.binary).is_err() {
            return Err(GitError::NotInstalled(self.settings.binary.clone()));
        }

        debug!("git {} (in {})", args.join(" "), workdir.display());

        let mut cmd = Command::new(&self.settings.binary);
        cmd.args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.settings.timeout, cmd.output())
            .await
            .map_err(|_| GitError::Timeout {
                operation: operation.to_string(),
                secs: self.settings.timeout.as_secs(),
            })?
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            // `git commit` reports "nothing to commit" on stdout.
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(GitError::NonZeroExit {
                operation: operation.to_string(),
                code: output.status.code(),
                stderr: detail,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Open the repository containing `repo` and return it with its working directory.
fn open_repository(repo: &Path) -> Result<(Repository, PathBuf), GitError> {
    let repository = Repository::discover(repo)?;
    let workdir = repository
        .workdir()
        .ok_or(GitError::BareRepository)?
        .to_path_buf();
    Ok((repository, workdir))
}

/// Whether HEAD points at an existing commit.
fn has_head(repository: &Repository) -> Result<bool, GitError> {
    match repository.head() {
        Ok(_) => Ok(true),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(false)
        }
        Err(e) => Err(GitError::Repository(e)),
    }
}

fn list_changes(repository: &Repository, include_unstaged: bool) -> Result<ChangeSet, GitError> {
    let submodules = submodule_names(repository)?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(include_unstaged)
        .recurse_untracked_dirs(include_unstaged)
        .include_ignored(false)
        .include_unmodified(false)
        .exclude_submodules(false);

    let statuses = repository.statuses(Some(&mut opts))?;

    let mut staged = Vec::new();
    let mut unstaged = Vec::new();

    for entry in statuses.iter() {
        let Some(path) = entry.path() else {
            return Err(GitError::InvalidOutput(
                "changed file path is not valid UTF-8".to_string(),
            ));
        };

        let (in_index, in_worktree) = match submodules.get(path) {
            // Only pointer changes count; dirty content inside a submodule
            // cannot be committed from here.
            Some(name) => {
                let status = repository.submodule_status(name, SubmoduleIgnore::Dirty)?;
                (
                    status.intersects(SUBMODULE_INDEX_FLAGS),
                    status.intersects(SUBMODULE_WORKTREE_FLAGS),
                )
            }
            None => {
                let status = entry.status();
                (
                    status.intersects(INDEX_FLAGS),
                    status.intersects(WORKTREE_FLAGS),
                )
            }
        };

        if in_index {
            staged.push(path.to_string());
        }
        if include_unstaged && in_worktree {
            unstaged.push(path.to_string());
        }
    }

    staged.sort();
    unstaged.sort();
    Ok(ChangeSet::new(staged, unstaged))
}

/// Map each registered submodule's path to its name.
fn submodule_names(repository: &Repository) -> Result<HashMap<String, String>, GitError> {
    let mut names = HashMap::new();
    for submodule in repository.submodules()? {
        let (Some(path), Some(name)) = (submodule.path().to_str(), submodule.name()) else {
            continue;
        };
        names.insert(path.replace('\\', "/"), name.to_string());
    }
    Ok(names)
}

#[async_trait]
impl GitClient for SystemGit {
    async fn changed_files(
        &self,
        repo: &Path,
        include_unstaged: bool,
    ) -> Result<ChangeSet, GitError> {
        // git2 status walks the whole working tree; keep it off the async workers.
        let repo = repo.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let (repository, _) = open_repository(&repo)?;
            list_changes(&repository, include_unstaged)
        })
        .await?
    }

    async fn reset_index(&self, repo: &Path) -> Result<(), GitError> {
        let (repository, workdir) = open_repository(repo)?;
        if has_head(&repository)? {
            self.run_git(
                &workdir,
                &[LITERAL_PATHSPECS, "reset", "-q", "HEAD", "--"],
                "reset",
            )
            .await?;
        } else {
            self.run_git(
                &workdir,
                &[
                    LITERAL_PATHSPECS,
                    "rm",
                    "-r",
                    "-q",
                    "--cached",
                    "--ignore-unmatch",
                    "--",
                    ".",
                ],
                "reset",
            )
            .await?;
        }
        Ok(())
    }

    async fn stage(&self, repo: &Path, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let (_, workdir) = open_repository(repo)?;

        let mut args = vec![LITERAL_PATHSPECS, "add", "--all", "--"];
        args.extend(paths.iter().map(String::as_str));

        self.run_git(&workdir, &args, "add").await?;
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str, signoff: bool) -> Result<String, GitError> {
        let (_, workdir) = open_repository(repo)?;

        let mut args = vec!["commit", "-q", "-m", message];
        if signoff {
            args.push("--signoff");
        }
        self.run_git(&workdir, &args, "commit").await?;

        let sha = self
            .run_git(&workdir, &["rev-parse", "HEAD"], "rev-parse")
            .await?;
        let sha = sha.trim();
        if sha.is_empty() {
            return Err(GitError::InvalidOutput(
                "git rev-parse HEAD returned nothing".to_string(),
            ));
        }
        Ok(sha.to_string())
    }

    async fn push(&self, repo: &Path) -> Result<(), GitError> {
        let (_, workdir) = open_repository(repo)?;
        self.run_git(&workdir, &["push", "-q"], "push").await?;
        Ok(())
    }
}
