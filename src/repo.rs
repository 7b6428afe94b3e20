use std::collections::BTreeMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use anyhow::{bail, Context, Result};

/// Represents the contents of a repository's `config.toml`.
///
/// This holds the repository format and the remotes configured for the installation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RepoConfig {
    /// Repository format settings.
    pub core: Core,
    /// Remotes keyed by name.
    #[serde(default)]
    pub remotes: BTreeMap<String, Remote>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Core {
    pub mode: String,
    pub version: u32,
}

/// A configured remote repository.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Remote {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub gpg_verify: bool,
    #[serde(default)]
    pub no_enumerate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RepoConfig {
    fn default() -> Self {
        RepoConfig {
            core: Core {
                mode: String::from("bare-user"),
                version: 1,
            },
            remotes: BTreeMap::new(),
        }
    }
}

impl RepoConfig {
    /// Loads the config from `path`, or returns the default one if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or deserialized.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RepoConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(RepoConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid repository config {}", path.display()))
    }

    /// Saves the config to the given file path in pretty TOML format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Adds a new remote.
    ///
    /// # Errors
    /// Returns an error if the name is not a valid remote name or the remote already exists.
    pub fn add_remote(&mut self, name: &str, remote: Remote) -> Result<()> {
        validate_remote_name(name)?;
        if self.remotes.contains_key(name) {
            bail!("Remote {} already exists", name);
        }
        self.remotes.insert(name.to_string(), remote);
        Ok(())
    }

    pub fn remote_mut(&mut self, name: &str) -> Result<&mut Remote> {
        self.remotes
            .get_mut(name)
            .ok_or_else(|| anyhow::anyhow!("Remote '{}' not found", name))
    }

    /// Removes a remote, failing if it is not configured.
    pub fn remove_remote(&mut self, name: &str) -> Result<Remote> {
        self.remotes
            .remove(name)
            .ok_or_else(|| anyhow::anyhow!("Remote '{}' not found", name))
    }
}

/// Remote names become path components and option-like tokens are ambiguous on the command line.
pub fn validate_remote_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('-') || name.contains('/') {
        bail!("'{}' is not a valid remote name", name);
    }
    Ok(())
}
