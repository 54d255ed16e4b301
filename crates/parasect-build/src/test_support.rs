//! On-disk configuration fixtures for resolver tests.

use std::path::Path;

use tempfile::TempDir;

use crate::config::{ConfigPaths, CUSTOM_DISHES_DIR, MEALS_FILE, STAPLE_DISHES_DIR};
use crate::error::BuildResult;
use crate::helper::load_menu;
use crate::meal::{Meal, MealResolver};

/// A throwaway configuration directory with a meals menu and dishes.
pub(crate) struct Kitchen {
    dir: TempDir,
    paths: ConfigPaths,
}

impl Kitchen {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CUSTOM_DISHES_DIR)).unwrap();
        std::fs::create_dir(dir.path().join(STAPLE_DISHES_DIR)).unwrap();
        let paths = ConfigPaths::default().with_custom_path(dir.path());
        Self { dir, paths }
    }

    pub(crate) fn file(self, name: &str, text: &str) -> Self {
        std::fs::write(self.dir.path().join(name), text).unwrap();
        self
    }

    pub(crate) fn menu(self, text: &str) -> Self {
        self.file(MEALS_FILE, text)
    }

    pub(crate) fn dish(self, name: &str, text: &str) -> Self {
        let path = Path::new(CUSTOM_DISHES_DIR).join(format!("{name}.yaml"));
        self.file(&path.to_string_lossy(), text)
    }

    pub(crate) fn staple(self, name: &str, text: &str) -> Self {
        let path = Path::new(STAPLE_DISHES_DIR).join(format!("{name}.yaml"));
        self.file(&path.to_string_lossy(), text)
    }

    /// Write a global default parameters file and point the configuration at it.
    pub(crate) fn defaults(mut self, text: &str) -> Self {
        let path = self.dir.path().join("global_defaults.params");
        std::fs::write(&path, text).unwrap();
        self.paths = self.paths.with_default_params(path);
        self
    }

    pub(crate) fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub(crate) fn resolve(&self, name: &str) -> BuildResult<Meal> {
        let menu = load_menu(&self.paths)?;
        MealResolver::new(&self.paths, &menu).resolve(name)
    }
}
