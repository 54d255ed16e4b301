//! YAML document models: dishes, boilerplate text and the meals menu.

use std::path::Path;

use indexmap::IndexMap;
use parasect_types::Value;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value as Yaml;
use tracing::debug;

use crate::error::{BuildError, BuildResult};

/// One `[name, value, reasoning]` entry. A null value marks an identifier
/// with no real value, as used by allergen lists.
pub type Substance = (String, Option<Value>, Option<String>);

pub type Substances = Vec<Substance>;

/// Parameters and groups a dish removes from a meal.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Allergens {
    pub substances: Option<Substances>,
    pub groups: Option<Substances>,
}

/// A set of ingredients and allergens.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Recipe {
    pub ingredients: Option<Substances>,
    pub allergens: Option<Allergens>,
}

/// A dish document: a common recipe plus named variants of the same shape.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DishModel {
    pub common: Option<Recipe>,
    pub variants: Option<IndexMap<String, DishModel>>,
}

/// Boilerplate lines for one output format, with per-meal variants.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FormatText {
    pub common: Option<Vec<String>>,
    pub variants: Option<IndexMap<String, FormatText>>,
}

/// A header or footer document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BoilerplateText {
    pub common: Option<Vec<String>>,
    #[serde(default)]
    pub formats: IndexMap<String, FormatText>,
}

/// Read and deserialize a YAML document.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> BuildResult<T> {
    debug!(path = %path.display(), "loading YAML document");
    let text = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| BuildError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `{dir}/{name}.yaml` as a dish.
pub fn load_dish(dir: &Path, name: &str) -> BuildResult<DishModel> {
    let model: Option<DishModel> = load_yaml(&dir.join(format!("{name}.yaml")))?;
    Ok(model.unwrap_or_default())
}

/// Load `{dir}/{name}.yaml` as boilerplate text.
pub fn load_boilerplate(dir: &Path, name: &str) -> BuildResult<BoilerplateText> {
    let model: Option<BoilerplateText> = load_yaml(&dir.join(format!("{name}.yaml")))?;
    Ok(model.unwrap_or_default())
}

/// Catalog keys that configure a meal rather than name a dish.
pub const RESERVED_OPTIONS: [&str; 10] = [
    "frame_id",
    "parent",
    "sitl",
    "hitl",
    "header",
    "footer",
    "defaults",
    "add_new",
    "remove_calibration",
    "remove_operator",
];

/// A dish selection inside a meal: `dish: model/submodel`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DishOrder {
    pub dish: String,
    pub model: Option<String>,
    pub submodel: Option<String>,
}

impl DishOrder {
    /// Split a `model` or `model/submodel` designation.
    pub fn new(dish: &str, designation: Option<&str>) -> Self {
        let (model, submodel) = match designation {
            Some(d) => match d.split_once('/') {
                Some((model, sub)) => (Some(model.to_string()), Some(sub.to_string())),
                None => (Some(d.to_string()), None),
            },
            None => (None, None),
        };
        Self {
            dish: dish.to_string(),
            model,
            submodel,
        }
    }
}

/// A validated meals menu entry.
///
/// Options are `None` when the entry does not mention them; the nested
/// `Option` of `header`, `footer` and `defaults` distinguishes an explicit
/// null from an absent key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MealSpec {
    pub frame_id: Option<i64>,
    pub parent: Option<String>,
    pub sitl: Option<bool>,
    pub hitl: Option<bool>,
    pub header: Option<Option<String>>,
    pub footer: Option<Option<String>>,
    pub defaults: Option<Option<String>>,
    pub add_new: Option<bool>,
    pub remove_calibration: Option<bool>,
    pub remove_operator: Option<bool>,
    /// Custom dishes in catalog order.
    pub dishes: Vec<DishOrder>,
}

/// The meals catalog, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MealsMenu {
    meals: IndexMap<String, MealSpec>,
}

impl MealsMenu {
    /// Load `meals.yaml` and validate every entry against the available
    /// dishes.
    pub fn load(path: &Path, custom_dishes: &[String], staple_dishes: &[String]) -> BuildResult<Self> {
        let raw: Option<IndexMap<String, Option<IndexMap<String, Yaml>>>> = load_yaml(path)?;
        let mut meals = IndexMap::new();
        for (name, entry) in raw.unwrap_or_default() {
            let spec = validate_entry(&name, entry.unwrap_or_default(), custom_dishes, staple_dishes)?;
            meals.insert(name, spec);
        }
        debug!(path = %path.display(), meals = meals.len(), "loaded meals menu");
        Ok(Self { meals })
    }

    pub fn get(&self, name: &str) -> Option<&MealSpec> {
        self.meals.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.meals.contains_key(name)
    }

    /// Meal names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.meals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

fn validate_entry(
    meal: &str,
    entry: IndexMap<String, Yaml>,
    custom_dishes: &[String],
    staple_dishes: &[String],
) -> BuildResult<MealSpec> {
    let invalid = |option: &str, expected: &'static str| BuildError::InvalidOption {
        meal: meal.to_string(),
        option: option.to_string(),
        expected,
    };
    let as_bool = |key: &str, value: &Yaml| value.as_bool().ok_or_else(|| invalid(key, "a boolean"));
    let as_text = |key: &str, value: &Yaml| match value {
        Yaml::Null => Ok(None),
        Yaml::String(s) => Ok(Some(s.clone())),
        _ => Err(invalid(key, "a string or null")),
    };

    let mut spec = MealSpec::default();
    for (key, value) in &entry {
        match key.as_str() {
            "frame_id" => spec.frame_id = Some(value.as_i64().ok_or_else(|| invalid(key, "an integer"))?),
            "parent" => spec.parent = as_text(key, value)?,
            "sitl" => spec.sitl = Some(as_bool(key, value)?),
            "hitl" => spec.hitl = Some(as_bool(key, value)?),
            "add_new" => spec.add_new = Some(as_bool(key, value)?),
            "remove_calibration" => spec.remove_calibration = Some(as_bool(key, value)?),
            "remove_operator" => spec.remove_operator = Some(as_bool(key, value)?),
            "header" => spec.header = Some(as_text(key, value)?),
            "footer" => spec.footer = Some(as_text(key, value)?),
            "defaults" => spec.defaults = Some(as_text(key, value)?),
            dish if custom_dishes.iter().any(|d| d == dish) => {
                let designation = as_text(key, value)?;
                spec.dishes.push(DishOrder::new(dish, designation.as_deref()));
            }
            staple if staple_dishes.iter().any(|d| d == staple) => {
                debug!(meal, staple, "ignoring staple dish key");
            }
            _ => {
                return Err(BuildError::InvalidDish {
                    meal: meal.to_string(),
                    key: key.clone(),
                })
            }
        }
    }
    Ok(spec)
}
