//! Configuration file lookup.
//!
//! Priority order:
//!
//! 1. `--config` flag (trusted as-is, even if missing)
//! 2. `demeter-lint.toml` or `.demeter-lint.toml` in the checked directory
//!    or the nearest ancestor holding one
//! 3. `config.toml` in `$DEMETER_LINT_CONFIG_DIR`, else `~/.demeter-lint/`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order within each directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["demeter-lint.toml", ".demeter-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

const GLOBAL_DIR_ENV: &str = "DEMETER_LINT_CONFIG_DIR";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project tree.
    Project(PathBuf),
    /// Found in the per-user directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for a per-user config.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Resolves the configuration for a check of `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let project_dir =
        std::fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    resolve_with(&project_dir, explicit, global_config_dir().as_deref())
}

/// Per-user config directory.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(GLOBAL_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".demeter-lint")),
    }
}

fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Searches `start` and then each ancestor; the nearest directory wins.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("demeter-lint.toml"));

        let missing = Path::new("/nonexistent/demeter.toml");
        assert_eq!(
            resolve_with(tmp.path(), Some(missing), None),
            ConfigSource::Explicit(missing.to_path_buf())
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_name() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("demeter-lint.toml"));
        touch(&tmp.path().join(".demeter-lint.toml"));

        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("demeter-lint.toml"))
        );
    }

    #[test]
    fn dot_name_found() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join(".demeter-lint.toml"));

        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".demeter-lint.toml"))
        );
    }

    #[test]
    fn nearest_ancestor_config_is_used() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("ast/app/views");
        fs::create_dir_all(&nested).unwrap();
        touch(&tmp.path().join("demeter-lint.toml"));
        touch(&tmp.path().join("ast/.demeter-lint.toml"));

        assert_eq!(
            resolve_with(&nested, None, None),
            ConfigSource::Project(tmp.path().join("ast/.demeter-lint.toml"))
        );
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        touch(&global.path().join("config.toml"));

        assert_eq!(
            resolve_with(project.path(), None, Some(global.path())),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        touch(&project.path().join("demeter-lint.toml"));
        assert!(matches!(
            resolve_with(project.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn empty_global_dir_falls_back_to_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_with(project.path(), None, Some(global.path())),
            ConfigSource::Default
        );
        assert_eq!(resolve_with(project.path(), None, None), ConfigSource::Default);
    }

    #[test]
    fn source_accessors() {
        let p = PathBuf::from("/tmp/demeter-lint.toml");
        assert_eq!(ConfigSource::Project(p.clone()).path(), Some(p.as_path()));
        assert!(ConfigSource::Default.path().is_none());
        assert!(ConfigSource::Global(p).is_global());
        assert!(!ConfigSource::Default.is_global());
    }
}
