//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, with a local
    /// identity so commits made through the git binary succeed.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable commit signing");

        Self { dir, repo }
    }

    /// Create a repository that already has one commit, so HEAD exists.
    pub fn with_initial_commit() -> Self {
        let repo = Self::new();
        repo.write("init.txt", "init\n");
        repo.stage(&["init.txt"]);
        repo.commit("chore: init");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Add paths to the index.
    pub fn stage(&self, paths: &[&str]) {
        let mut index = self.repo.index().expect("Failed to get index");
        for p in paths {
            index.add_path(Path::new(p)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
    }

    /// Commit the current index. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// HEAD commit id, or None on an unborn branch.
    pub fn head(&self) -> Option<Oid> {
        self.repo.head().ok().and_then(|h| h.target())
    }

    /// Messages from HEAD back to the root, newest first.
    pub fn log(&self) -> Vec<String> {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        if walk.push_head().is_err() {
            return Vec::new();
        }
        walk.map(|oid| {
            let oid = oid.expect("Failed to walk");
            let commit = self.repo.find_commit(oid).expect("Failed to find commit");
            commit.message().unwrap_or("").to_string()
        })
        .collect()
    }

    /// Paths touched by a commit relative to its first parent.
    pub fn files_in_commit(&self, sha: &str) -> Vec<String> {
        let oid = Oid::from_str(sha).expect("Invalid sha");
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        let tree = commit.tree().expect("Failed to get tree");
        let parent_tree = commit.parent(0).ok().and_then(|p| p.tree().ok());

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .expect("Failed to diff commit");

        let mut files: Vec<String> = diff
            .deltas()
            .filter_map(|d| d.new_file().path().or_else(|| d.old_file().path()))
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        files.sort();
        files
    }

    /// Contents of `path` as recorded in commit `sha`.
    pub fn file_at(&self, sha: &str, path: &str) -> String {
        let oid = Oid::from_str(sha).expect("Invalid sha");
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        let tree = commit.tree().expect("Failed to get tree");
        let entry = tree.get_path(Path::new(path)).expect("Path not in commit");
        let blob = entry
            .to_object(&self.repo)
            .and_then(|o| o.peel_to_blob())
            .expect("Entry is not a blob");
        String::from_utf8_lossy(blob.content()).to_string()
    }

    /// Run the git binary in the repository with a test identity.
    /// Panics on a non-zero exit; returns stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = std::process::Command::new("git")
            .args([
                "-c",
                "user.name=Test User",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "protocol.file.allow=always",
            ])
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Register `upstream` as a submodule at `path` and commit it, then
    /// advance the submodule checkout by one commit and stage the new pointer.
    pub fn stage_submodule_bump(&self, upstream: &TestRepo, path: &str) {
        let url = upstream.path().to_str().expect("Invalid upstream path");
        self.git(&["submodule", "add", "-q", url, path]);
        self.git(&["commit", "-q", "-m", "chore: add submodule"]);
        self.git(&["-C", path, "commit", "-q", "--allow-empty", "-m", "chore: bump"]);
        self.git(&["add", path]);
    }

    /// Install a hook script (Unix only).
    #[cfg(unix)]
    pub fn install_hook(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let hooks = self.repo.path().join("hooks");
        std::fs::create_dir_all(&hooks).expect("Failed to create hooks dir");
        let hook = hooks.join(name);
        std::fs::write(&hook, script).expect("Failed to write hook");
        std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make hook executable");
    }

    /// Add a bare repository as `origin` and set it as upstream of the current branch.
    pub fn add_bare_remote(&self) -> tempfile::TempDir {
        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");
        self.repo
            .remote(
                "origin",
                remote_dir.path().to_str().expect("Invalid remote path"),
            )
            .expect("Failed to add origin remote");

        let branch = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(|s| s.to_string()))
            .unwrap_or_else(|| "master".to_string());

        let mut config = self.repo.config().expect("Failed to open repo config");
        config
            .set_str(&format!("branch.{}.remote", branch), "origin")
            .expect("Failed to set branch remote");
        config
            .set_str(
                &format!("branch.{}.merge", branch),
                &format!("refs/heads/{}", branch),
            )
            .expect("Failed to set branch merge");

        remote_dir
    }
}
