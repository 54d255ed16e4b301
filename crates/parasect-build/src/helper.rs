//! Entry points used by the command line: build meals and write them out.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parasect_formats::Format;
use tracing::{debug, info};

use crate::config::ConfigPaths;
use crate::error::{BuildError, BuildResult};
use crate::export::export_lines;
use crate::meal::{Meal, MealResolver};
use crate::model::MealsMenu;

/// Load and validate the meals menu of a configuration.
pub fn load_menu(paths: &ConfigPaths) -> BuildResult<MealsMenu> {
    MealsMenu::load(
        &paths.meals()?,
        &paths.custom_dish_names()?,
        &paths.staple_dish_names()?,
    )
}

/// Resolve the named meals, or every meal of the menu when `names` is `None`.
pub fn build_meals(paths: &ConfigPaths, names: Option<&[String]>) -> BuildResult<IndexMap<String, Meal>> {
    let menu = load_menu(paths)?;
    let resolver = MealResolver::new(paths, &menu);

    let selected: Vec<String> = match names {
        Some(names) => names.to_vec(),
        None => menu.names().map(str::to_string).collect(),
    };

    let mut meals = IndexMap::new();
    for name in selected {
        if !menu.contains(&name) {
            return Err(BuildError::MissingMeal(name));
        }
        let meal = resolver.resolve(&name)?;
        meals.insert(name, meal);
    }
    Ok(meals)
}

/// What to build and where to put it.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// A single meal to build; `None` builds the whole menu.
    pub meal: Option<String>,
    pub format: Format,
    pub output_folder: Option<PathBuf>,
    /// When building the whole menu, build only SITL meals if set and only
    /// non-SITL meals otherwise.
    pub sitl: bool,
}

/// Build meals and export them.
///
/// A single meal goes to `output_folder` if given, otherwise to `stdout`.
/// The whole menu requires an output folder. Returns the files written.
pub fn build_helper<W: Write>(
    paths: &ConfigPaths,
    options: &BuildOptions,
    stdout: &mut W,
) -> BuildResult<Vec<PathBuf>> {
    debug!(meal = ?options.meal, format = %options.format, "building configuration");

    let Some(name) = &options.meal else {
        let folder = options
            .output_folder
            .as_deref()
            .ok_or(BuildError::OutputFolderRequired)?;
        let meals = build_meals(paths, None)?;
        let mut written = Vec::new();
        for meal in meals.values().filter(|m| m.sitl == options.sitl) {
            if let Some(path) = export_meal(meal, options.format, paths, Some(folder), stdout)? {
                written.push(path);
            }
        }
        info!(files = written.len(), folder = %folder.display(), "meals exported");
        return Ok(written);
    };

    let meals = build_meals(paths, Some(std::slice::from_ref(name)))?;
    let meal = meals
        .get(name)
        .ok_or_else(|| BuildError::MissingMeal(name.clone()))?;
    let written = export_meal(meal, options.format, paths, options.output_folder.as_deref(), stdout)?;
    Ok(written.into_iter().collect())
}

/// Export one meal to a file in `output_folder`, or to `stdout` when no
/// folder is given. Returns the path written, if any.
pub fn export_meal<W: Write>(
    meal: &Meal,
    format: Format,
    paths: &ConfigPaths,
    output_folder: Option<&Path>,
    stdout: &mut W,
) -> BuildResult<Option<PathBuf>> {
    let lines = export_lines(meal, format, paths)?;

    let Some(folder) = output_folder else {
        write_lines(lines, stdout, Path::new("<stdout>"))?;
        return Ok(None);
    };

    fs::create_dir_all(folder).map_err(|source| BuildError::Io {
        path: folder.to_path_buf(),
        source,
    })?;
    let path = folder.join(format.filename(&meal.name, meal.frame_id, meal.hitl));
    let file = File::create(&path).map_err(|source| BuildError::Io {
        path: path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_lines(lines, &mut writer, &path)?;
    writer.flush().map_err(|source| BuildError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(meal = %meal.name, path = %path.display(), "meal written");
    Ok(Some(path))
}

fn write_lines<W: Write>(
    lines: impl Iterator<Item = BuildResult<String>>,
    out: &mut W,
    path: &Path,
) -> BuildResult<()> {
    for line in lines {
        writeln!(out, "{}", line?).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
