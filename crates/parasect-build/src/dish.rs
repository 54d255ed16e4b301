//! Dish resolution: flatten a dish document for a model/submodel selection.

use std::path::Path;

use parasect_types::{Parameter, ParameterList, Value};
use regex::{RegexSet, RegexSetBuilder};
use tracing::debug;

use crate::config::ConfigPaths;
use crate::error::{BuildError, BuildResult};
use crate::model::{load_dish, DishModel, Recipe, Substances};

/// Staple dish listing calibration parameters.
pub const CALIBRATION: &str = "calibration";
/// Staple dish listing operator-defined parameters.
pub const OPERATOR: &str = "operator";

/// A resolved dish: its parameters and the names and groups it blacklists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dish {
    pub name: String,
    pub params: ParameterList,
    pub black_params: ParameterList,
    pub black_groups: ParameterList,
}

impl Dish {
    /// Resolve `model` for the common section and, optionally, a variant and
    /// one of its subvariants.
    ///
    /// A variant requested from a document without variants is ignored.
    /// Variant ingredients merge over the common ones.
    pub fn from_model(
        name: &str,
        model: &DishModel,
        variant: Option<&str>,
        submodel: Option<&str>,
    ) -> BuildResult<Self> {
        debug!(dish = name, ?variant, ?submodel, "resolving dish");
        let mut dish = Dish {
            name: name.to_string(),
            ..Dish::default()
        };
        if let Some(common) = &model.common {
            dish.parse_recipe(common)?;
        }

        let (Some(variant), Some(variants)) = (variant, &model.variants) else {
            return Ok(dish);
        };
        let selected = variants
            .get(variant)
            .ok_or_else(|| BuildError::MissingVariant {
                dish: name.to_string(),
                variant: variant.to_string(),
            })?;
        if let Some(common) = &selected.common {
            dish.parse_recipe(common)?;
        }

        if let Some(submodel) = submodel {
            let subvariants = selected
                .variants
                .as_ref()
                .ok_or_else(|| BuildError::NoSubvariants {
                    dish: name.to_string(),
                    model: variant.to_string(),
                })?;
            let sub = subvariants
                .get(submodel)
                .ok_or_else(|| BuildError::MissingSubmodel {
                    dish: name.to_string(),
                    model: variant.to_string(),
                    submodel: submodel.to_string(),
                })?;
            if let Some(common) = &sub.common {
                dish.parse_recipe(common)?;
            }
        }
        Ok(dish)
    }

    /// Load `{dir}/{name}.yaml` and resolve it.
    pub fn load(
        dir: &Path,
        name: &str,
        variant: Option<&str>,
        submodel: Option<&str>,
    ) -> BuildResult<Self> {
        let model = load_dish(dir, name)?;
        Self::from_model(name, &model, variant, submodel)
    }

    /// The calibration staple dish.
    pub fn calibration(paths: &ConfigPaths) -> BuildResult<Self> {
        Self::load(&paths.staple_dishes()?, CALIBRATION, None, None)
    }

    /// The operator (user-defined) staple dish.
    pub fn operator(paths: &ConfigPaths) -> BuildResult<Self> {
        Self::load(&paths.staple_dishes()?, OPERATOR, None, None)
    }

    fn parse_recipe(&mut self, recipe: &Recipe) -> BuildResult<()> {
        if let Some(allergens) = &recipe.allergens {
            parse_substances(allergens.groups.as_ref(), &mut self.black_groups)?;
            parse_substances(allergens.substances.as_ref(), &mut self.black_params)?;
        }
        parse_substances(recipe.ingredients.as_ref(), &mut self.params)
    }
}

/// Anchored name patterns taken from the ingredients of a staple dish.
///
/// Staple names are matched verbatim as regular expressions, so a
/// calibration dish can list `CAL_ACC.*` instead of every sensor slot.
#[derive(Clone, Debug)]
pub struct NamePatterns {
    set: RegexSet,
}

impl NamePatterns {
    /// Compile patterns from the common ingredients of `{staple}.yaml`.
    pub fn load(paths: &ConfigPaths, staple: &str) -> BuildResult<Self> {
        let model = load_dish(&paths.staple_dishes()?, staple)?;
        let names = model
            .common
            .iter()
            .filter_map(|recipe| recipe.ingredients.as_ref())
            .flatten()
            .map(|(name, _, _)| name.as_str());
        Self::new(names)
    }

    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> BuildResult<Self> {
        let anchored: Vec<String> = names.into_iter().map(|n| format!("^(?:{n})$")).collect();
        let set = RegexSetBuilder::new(anchored).case_insensitive(true).build()?;
        Ok(Self { set })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Add every substance of one list to `storage`. A name listed twice in the
/// same list is an error; later lists merge over earlier ones.
fn parse_substances(substances: Option<&Substances>, storage: &mut ParameterList) -> BuildResult<()> {
    let Some(substances) = substances else {
        return Ok(());
    };
    let mut batch = ParameterList::new();
    for (name, value, reasoning) in substances {
        let mut param = Parameter::new(name, value.unwrap_or(Value::Int(0)));
        param.set_reasoning(reasoning.clone());
        batch.insert_new(param)?;
    }
    storage.extend(batch);
    Ok(())
}
