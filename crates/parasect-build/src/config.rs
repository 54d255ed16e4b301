//! Location of the meals menu, dishes and default parameters.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BuildError, BuildResult};

/// Environment variable naming the configuration directory.
pub const PATH_ENV: &str = "PARASECT_PATH";
/// Environment variable naming the global default parameters file.
pub const DEFAULTS_ENV: &str = "PARASECT_DEFAULTS";

pub const MEALS_FILE: &str = "meals.yaml";
pub const CUSTOM_DISHES_DIR: &str = "custom_dishes";
pub const STAPLE_DISHES_DIR: &str = "staple_dishes";

/// Resolved configuration locations.
///
/// Explicit overrides win over the environment. Environment values are
/// captured once by [`ConfigPaths::from_env`]; [`ConfigPaths::default`]
/// carries none, which keeps tests independent of the process environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigPaths {
    custom_path: Option<PathBuf>,
    default_params_path: Option<PathBuf>,
    env_path: Option<String>,
    env_defaults: Option<String>,
}

impl ConfigPaths {
    /// Capture `PARASECT_PATH` and `PARASECT_DEFAULTS` from the environment.
    pub fn from_env() -> Self {
        Self {
            env_path: std::env::var(PATH_ENV).ok(),
            env_defaults: std::env::var(DEFAULTS_ENV).ok(),
            ..Self::default()
        }
    }

    /// Override the configuration directory.
    pub fn with_custom_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_path = Some(path.into());
        self
    }

    /// Override the global default parameters file.
    pub fn with_default_params(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_params_path = Some(path.into());
        self
    }

    /// Drop the explicit overrides, keeping what was read from the environment.
    pub fn reset(&mut self) {
        self.custom_path = None;
        self.default_params_path = None;
    }

    /// The configuration directory.
    pub fn path(&self) -> BuildResult<PathBuf> {
        if let Some(custom) = &self.custom_path {
            let custom = expand_tilde(custom);
            if !custom.is_dir() {
                return Err(BuildError::ConfigPathNotADirectory(custom));
            }
            debug!(path = %custom.display(), "pointing configurations to custom path");
            return Ok(custom);
        }

        match &self.env_path {
            Some(raw) => {
                let path = expand_tilde(Path::new(raw));
                if !path.is_dir() {
                    return Err(BuildError::ConfigPathNotADirectory(path));
                }
                debug!(path = %path.display(), env = PATH_ENV, "pointing configurations to environment path");
                Ok(path)
            }
            None => Err(BuildError::ConfigPathNotSet),
        }
    }

    pub fn meals(&self) -> BuildResult<PathBuf> {
        Ok(self.path()?.join(MEALS_FILE))
    }

    pub fn custom_dishes(&self) -> BuildResult<PathBuf> {
        Ok(self.path()?.join(CUSTOM_DISHES_DIR))
    }

    pub fn staple_dishes(&self) -> BuildResult<PathBuf> {
        Ok(self.path()?.join(STAPLE_DISHES_DIR))
    }

    /// The global default parameters file, if one is configured.
    pub fn default_parameters(&self) -> Option<PathBuf> {
        let path = self
            .default_params_path
            .as_deref()
            .map(expand_tilde)
            .or_else(|| self.env_defaults.as_deref().map(|raw| expand_tilde(Path::new(raw))));
        match &path {
            Some(p) => debug!(path = %p.display(), "using global default parameter file"),
            None => debug!("no global default parameter file configured"),
        }
        path
    }

    /// Names of the `*.yaml` documents in the custom dishes folder.
    pub fn custom_dish_names(&self) -> BuildResult<Vec<String>> {
        yaml_stems(&self.custom_dishes()?)
    }

    /// Names of the `*.yaml` documents in the staple dishes folder.
    pub fn staple_dish_names(&self) -> BuildResult<Vec<String>> {
        yaml_stems(&self.staple_dishes()?)
    }
}

fn yaml_stems(dir: &Path) -> BuildResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::Io {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "yaml") {
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    Ok(names)
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_path_is_a_named_error() {
        let paths = ConfigPaths::default();
        assert!(matches!(paths.path(), Err(BuildError::ConfigPathNotSet)));
    }

    #[test]
    fn custom_path_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("meals.yaml");
        std::fs::write(&file, "{}").unwrap();

        let paths = ConfigPaths::default().with_custom_path(&file);
        assert!(matches!(
            paths.path(),
            Err(BuildError::ConfigPathNotADirectory(_))
        ));
    }

    #[test]
    fn custom_path_wins_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths {
            env_path: Some("/nonexistent/parasect".into()),
            ..ConfigPaths::default()
        }
        .with_custom_path(dir.path());

        assert_eq!(paths.path().unwrap(), dir.path());
        assert_eq!(paths.meals().unwrap(), dir.path().join("meals.yaml"));
        assert_eq!(paths.custom_dishes().unwrap(), dir.path().join("custom_dishes"));
        assert_eq!(paths.staple_dishes().unwrap(), dir.path().join("staple_dishes"));
    }

    #[test]
    fn environment_path_is_checked() {
        let paths = ConfigPaths {
            env_path: Some("/nonexistent/parasect".into()),
            ..ConfigPaths::default()
        };
        assert!(matches!(
            paths.path(),
            Err(BuildError::ConfigPathNotADirectory(_))
        ));
    }

    #[test]
    fn default_parameters_precedence() {
        let mut paths = ConfigPaths {
            env_defaults: Some("/env/defaults.params".into()),
            ..ConfigPaths::default()
        };
        assert_eq!(
            paths.default_parameters(),
            Some(PathBuf::from("/env/defaults.params"))
        );

        paths = paths.with_default_params("/cli/defaults.params");
        assert_eq!(
            paths.default_parameters(),
            Some(PathBuf::from("/cli/defaults.params"))
        );

        paths.reset();
        assert_eq!(
            paths.default_parameters(),
            Some(PathBuf::from("/env/defaults.params"))
        );
        assert!(ConfigPaths::default().default_parameters().is_none());
    }

    #[test]
    fn lists_yaml_documents_only() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join(CUSTOM_DISHES_DIR);
        std::fs::create_dir(&custom).unwrap();
        std::fs::write(custom.join("battery.yaml"), "").unwrap();
        std::fs::write(custom.join("airframe.yaml"), "").unwrap();
        std::fs::write(custom.join("notes.txt"), "").unwrap();

        let paths = ConfigPaths::default().with_custom_path(dir.path());
        assert_eq!(paths.custom_dish_names().unwrap(), vec!["airframe", "battery"]);
        assert!(paths.staple_dish_names().unwrap().is_empty());
    }
}
