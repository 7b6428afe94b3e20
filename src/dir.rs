use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tracing::debug;
use walkdir::WalkDir;
use crate::config::Config;
use crate::error::Error;
use crate::repo::RepoConfig;

/// Which installation a command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    User,
    System,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User => write!(f, "user"),
            Scope::System => write!(f, "system"),
        }
    }
}

/// Kind of a deployed ref, and the subdirectory it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    App,
    Runtime,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::App => "app",
            RefKind::Runtime => "runtime",
        }
    }
}

/// An app or runtime deployed at `<dir>/<kind>/<id>/<arch>/<branch>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub kind: RefKind,
    pub id: String,
    pub arch: String,
    pub branch: String,
    pub path: PathBuf,
}

impl Deployment {
    /// Full ref, e.g. `app/org.example.App/x86_64/stable`.
    pub fn full_ref(&self) -> String {
        format!("{}/{}/{}/{}", self.kind.as_str(), self.id, self.arch, self.branch)
    }
}

/// Handle on the on-disk state of one installation scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDir {
    scope: Scope,
    path: PathBuf,
}

impl InstallDir {
    pub fn get(scope: Scope, config: &Config) -> Self {
        let path = match scope {
            Scope::User => config.user_dir.clone(),
            Scope::System => config.system_dir.clone(),
        };
        InstallDir { scope, path }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo_path(&self) -> PathBuf {
        self.path.join("repo")
    }

    pub fn repo_config_path(&self) -> PathBuf {
        self.repo_path().join("config.toml")
    }

    /// Creates the installation directory if it does not exist yet.
    pub fn ensure_path(&self) -> Result<(), Error> {
        create_dir(&self.path)
    }

    /// Creates the repository and its default configuration if missing.
    pub fn ensure_repo(&self) -> Result<(), Error> {
        self.ensure_path()?;
        let repo = self.repo_path();
        create_dir(&repo)?;
        let config = self.repo_config_path();
        if !config.exists() {
            debug!(path = %config.display(), "writing default repository config");
            RepoConfig::default().save(&config).map_err(|e| {
                Error::DirectorySetup(format!("Unable to create repository at {}: {:#}", repo.display(), e))
            })?;
        }
        Ok(())
    }

    pub fn load_repo_config(&self) -> Result<RepoConfig> {
        RepoConfig::load(self.repo_config_path())
    }

    pub fn save_repo_config(&self, config: &RepoConfig) -> Result<()> {
        config.save(self.repo_config_path())
    }

    /// Lists deployments of the given kind, sorted by ref.
    pub fn deployed(&self, kind: RefKind) -> Result<Vec<Deployment>> {
        let base = self.path.join(kind.as_str());
        if !base.exists() {
            return Ok(Vec::new());
        }
        let mut deployments = Vec::new();
        for entry in WalkDir::new(&base).min_depth(3).max_depth(3).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let relative = entry.path().strip_prefix(&base)?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if let [id, arch, branch] = parts.as_slice() {
                deployments.push(Deployment {
                    kind,
                    id: id.clone(),
                    arch: arch.clone(),
                    branch: branch.clone(),
                    path: entry.path().to_path_buf(),
                });
            }
        }
        Ok(deployments)
    }
}

fn create_dir(path: &Path) -> Result<(), Error> {
    if path.is_dir() {
        return Ok(());
    }
    debug!(path = %path.display(), "creating directory");
    std::fs::create_dir_all(path)
        .map_err(|e| Error::DirectorySetup(format!("Unable to create {}: {}", path.display(), e)))
}
