use crate::error::{ReleaseError, Result};
use crate::git::format_log_record;
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    /// Commit a tag points to, peeling annotated tags
    fn tag_commit_oid(&self, tag_name: &str) -> Result<Oid> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .map_err(|e| ReleaseError::tag(format!("Cannot find tag '{}': {}", tag_name, e)))?;

        Ok(reference.peel_to_commit()?.id())
    }

    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("Repository has no work tree"))?;

        path.strip_prefix(workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ReleaseError::Git(git2::Error::from_str(&format!(
                    "Path '{}' is outside the work tree",
                    path.display()
                )))
            })
    }

    fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
        let mut callbacks = git2::RemoteCallbacks::new();

        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    #[instrument(skip(self))]
    fn version_tags(&self) -> Result<Vec<String>> {
        let head = self.head_oid()?;
        let names = self.repo.tag_names(None)?;
        let mut reachable = Vec::new();

        for name in names.iter().flatten() {
            let Ok(oid) = self.tag_commit_oid(name) else {
                debug!(tag = name, "skipping tag that does not point to a commit");
                continue;
            };

            if oid == head || self.repo.graph_descendant_of(head, oid)? {
                reachable.push(name.to_string());
            }
        }

        debug!(count = reachable.len(), "listed tags reachable from HEAD");
        Ok(reachable)
    }

    #[instrument(skip(self))]
    fn log_lines(&self, since: Option<&str>) -> Result<Vec<String>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.head_oid()?)?;

        if let Some(tag) = since {
            revwalk.hide(self.tag_commit_oid(tag)?)?;
        }

        let mut lines = Vec::new();
        let mut count = 0usize;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;

            if commit.parent_count() > 1 {
                continue;
            }

            let author = commit.author();
            lines.extend(format_log_record(
                &commit.id().to_string(),
                commit.summary().unwrap_or(""),
                author.name().unwrap_or("unknown"),
                commit.body().unwrap_or(""),
            ));
            count += 1;
        }

        debug!(commits = count, "collected log lines");
        Ok(lines)
    }

    #[instrument(skip(self, paths))]
    fn commit_files(&self, paths: &[&Path], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;

        for path in paths {
            index.add_path(&self.relative_to_workdir(path)?)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        info!(commit = %oid, "committed release files");
        Ok(())
    }

    #[instrument(skip(self))]
    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;

        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        info!(tag = name, "created tag");
        Ok(())
    }

    #[instrument(skip(self))]
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        let mut remote_handle = self.repo.find_remote(remote).map_err(|_| {
            ReleaseError::remote(format!("No remote named '{}' found", remote))
        })?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        let refspecs = [
            format!("refs/heads/{0}:refs/heads/{0}", branch),
            format!("refs/tags/{0}:refs/tags/{0}", tag),
        ];

        remote_handle
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                } else {
                    ReleaseError::remote(format!("Failed to push to '{}': {}", remote, e))
                }
            })?;

        info!(remote, branch, tag, "pushed release");
        Ok(())
    }
}
