//! Meal resolution for Parasect.
//!
//! A meals menu (`meals.yaml`) names vehicle configurations. Each meal
//! starts from a default parameter file or from its parent meal, applies the
//! edits of the dishes it orders, strips blacklisted, calibration and
//! operator parameters, and is finally exported in one of the
//! [`Format`](parasect_formats::Format)s.
//!
//! # Key Types
//!
//! - [`ConfigPaths`] -- Where the menu, dishes and default parameters live
//! - [`MealsMenu`] -- The validated catalog of meals
//! - [`Dish`] -- A resolved dish: parameters plus name and group blacklists
//! - [`MealResolver`] -- Resolves a meal, recursing into its parents
//! - [`Meal`] -- A resolved meal, ready for export

pub mod config;
pub mod dish;
pub mod error;
pub mod export;
pub mod helper;
pub mod meal;
pub mod model;

#[cfg(test)]
mod test_support;

pub use config::ConfigPaths;
pub use dish::{Dish, NamePatterns};
pub use error::{BuildError, BuildResult};
pub use export::{boilerplate_lines, export_lines};
pub use helper::{build_helper, build_meals, export_meal, load_menu, BuildOptions};
pub use meal::{Meal, MealResolver, AUTOSTART_PARAM};
pub use model::{BoilerplateText, DishModel, MealSpec, MealsMenu};
