//! Job configuration types and loading

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::JobSpec;

/// Verification jobs configured per repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `org/repo` to its presubmit jobs, in configured order
    pub presubmits: BTreeMap<String, Vec<JobSpec>>,
}

impl Config {
    /// Presubmits configured for `org/repo`; empty when the repo is unknown
    pub fn presubmits_for(&self, org: &str, repo: &str) -> &[JobSpec] {
        self.presubmits
            .get(&format!("{org}/{repo}"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Keeps the job configuration current
///
/// The file is read once at start, then re-read whenever its modification
/// time changes. A reload that fails keeps serving the previous config.
#[derive(Debug)]
pub struct ConfigAgent {
    path: Option<PathBuf>,
    modified: Option<SystemTime>,
    config: Config,
}

impl ConfigAgent {
    /// Load `path`; failure here is fatal to the caller
    pub fn start(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!(?path, "ConfigAgent::start: called");
        let config =
            Config::load_from_file(&path).context(format!("Failed to load config from {}", path.display()))?;
        let modified = modified_time(&path);
        Ok(Self {
            path: Some(path),
            modified,
            config,
        })
    }

    /// Serve a fixed config that is never reloaded
    pub fn from_config(config: Config) -> Self {
        Self {
            path: None,
            modified: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reload when the file changed since the last load; returns whether it did
    pub fn refresh(&mut self) -> bool {
        let Some(path) = &self.path else {
            return false;
        };
        let modified = modified_time(path);
        if modified.is_none() || modified == self.modified {
            return false;
        }

        match Config::load_from_file(path) {
            Ok(config) => {
                self.config = config;
                self.modified = modified;
                true
            }
            Err(e) => {
                warn!("Failed to reload config from {}: {:#}", path.display(), e);
                false
            }
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
presubmits:
  kubernetes/kubernetes:
    - name: pull-kubernetes-unit
      context: Jenkins unit/integration
      always-run: true
    - name: pull-kubernetes-e2e-gce
      context: Jenkins GCE e2e
      always-run: true
    - name: pull-kubernetes-kubemark
      context: Jenkins Kubemark GCE e2e
    - name: pull-kubernetes-verify
      context: Jenkins verification
      always-run: true
      skip-report: true
  kubernetes/test-infra:
    - name: pull-test-infra-bazel
      context: Bazel test
      always-run: true
"#;

    #[test]
    fn test_parse_config() {
        let config: Config = serde_yaml::from_str(CONFIG).unwrap();
        let jobs = config.presubmits_for("kubernetes", "kubernetes");
        assert_eq!(jobs.len(), 4);
        assert_eq!(jobs[0].name, "pull-kubernetes-unit");
        assert!(jobs[0].always_run);
        assert!(!jobs[2].always_run);
        assert!(jobs[3].skip_report);
    }

    #[test]
    fn test_unknown_repo_has_no_presubmits() {
        let config: Config = serde_yaml::from_str(CONFIG).unwrap();
        assert!(config.presubmits_for("kubernetes", "charts").is_empty());
        assert!(Config::default().presubmits_for("o", "r").is_empty());
    }

    #[test]
    fn test_start_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(ConfigAgent::start(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_start_invalid_yaml_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "presubmits: [not, a, map]").unwrap();
        assert!(ConfigAgent::start(&path).is_err());
    }

    #[test]
    fn test_refresh_reloads_changed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, CONFIG).unwrap();

        let mut agent = ConfigAgent::start(&path).unwrap();
        assert!(!agent.refresh());

        let updated = "presubmits:\n  kubernetes/kubernetes:\n    - name: only\n      context: only\n      always-run: true\n";
        fs::write(&path, updated).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();

        assert!(agent.refresh());
        assert_eq!(agent.config().presubmits_for("kubernetes", "kubernetes").len(), 1);
    }

    #[test]
    fn test_refresh_keeps_config_on_bad_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, CONFIG).unwrap();
        let mut agent = ConfigAgent::start(&path).unwrap();

        fs::write(&path, "presubmits: {{{").unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(10)).unwrap();

        assert!(!agent.refresh());
        assert_eq!(agent.config().presubmits_for("kubernetes", "kubernetes").len(), 4);
    }

    #[test]
    fn test_fixed_config_never_refreshes() {
        let mut agent = ConfigAgent::from_config(Config::default());
        assert!(!agent.refresh());
    }
}
