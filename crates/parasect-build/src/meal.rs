//! Meal resolution: parent inheritance, default parameters, dish edits and
//! blacklist removal for one meals menu entry.

use std::fmt;
use std::path::{Path, PathBuf};

use parasect_formats::read_params;
use parasect_types::{ParamType, Parameter, ParameterList};
use tracing::{debug, info};

use crate::config::ConfigPaths;
use crate::dish::{Dish, NamePatterns, CALIBRATION, OPERATOR};
use crate::error::{BuildError, BuildResult};
use crate::model::{MealSpec, MealsMenu};

/// Name of the parameter carrying the airframe id on PX4 targets.
pub const AUTOSTART_PARAM: &str = "SYS_AUTOSTART";

/// A fully resolved meals menu entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Meal {
    pub name: String,
    pub frame_id: i64,
    pub sitl: bool,
    pub hitl: bool,
    /// Boilerplate variant used for the header.
    pub header: Option<String>,
    /// Boilerplate variant used for the footer.
    pub footer: Option<String>,
    /// Whether parameters absent from the base set may be added.
    pub add_new: bool,
    pub remove_calibration: bool,
    pub remove_operator: bool,
    pub params: ParameterList,
}

impl Meal {
    /// The parameters exported for a target, with `SYS_AUTOSTART` set to the
    /// frame id when `autostart` is requested.
    pub fn export_params(&self, autostart: bool) -> BuildResult<ParameterList> {
        let mut params = self.params.clone();
        if autostart {
            let param = Parameter::new(AUTOSTART_PARAM, self.frame_id).with_type(ParamType::Int32);
            if self.add_new {
                params.add(param);
            } else {
                params
                    .add_existing(param)
                    .map_err(|_| self.rejected(AUTOSTART_PARAM))?;
            }
        }
        Ok(params)
    }

    fn rejected(&self, param: &str) -> BuildError {
        BuildError::NewParameterRejected {
            meal: self.name.clone(),
            param: param.to_string(),
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.params, f)
    }
}

/// Resolves meals of one menu against one configuration.
pub struct MealResolver<'a> {
    paths: &'a ConfigPaths,
    menu: &'a MealsMenu,
}

impl<'a> MealResolver<'a> {
    pub fn new(paths: &'a ConfigPaths, menu: &'a MealsMenu) -> Self {
        Self { paths, menu }
    }

    /// Resolve the entry `name`, recursing into its parents.
    pub fn resolve(&self, name: &str) -> BuildResult<Meal> {
        let mut chain = Vec::new();
        self.resolve_in(name, &mut chain)
    }

    fn resolve_in(&self, name: &str, chain: &mut Vec<String>) -> BuildResult<Meal> {
        if chain.iter().any(|n| n == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(BuildError::ParentCycle(cycle));
        }
        let spec = self
            .menu
            .get(name)
            .ok_or_else(|| BuildError::MissingMeal(name.to_string()))?;
        chain.push(name.to_string());
        let meal = self.resolve_spec(name, spec, chain);
        chain.pop();
        meal
    }

    fn resolve_spec(&self, name: &str, spec: &MealSpec, chain: &mut Vec<String>) -> BuildResult<Meal> {
        debug!(meal = name, depth = chain.len(), "resolving meal");

        let defaults_file = self.defaults_file(spec)?;
        let defaults = match &defaults_file {
            Some(path) => read_params(path)?,
            None => ParameterList::new(),
        };

        let parent = match &spec.parent {
            Some(parent) => {
                if !self.menu.contains(parent) {
                    return Err(BuildError::MissingParent {
                        meal: name.to_string(),
                        parent: parent.clone(),
                    });
                }
                debug!(meal = name, parent = %parent, "reading parent meal");
                Some(self.resolve_in(parent, chain)?)
            }
            None => None,
        };

        let mut meal = Meal {
            name: name.to_string(),
            frame_id: spec.frame_id.unwrap_or(0),
            sitl: spec.sitl.unwrap_or(false),
            hitl: spec.hitl.unwrap_or(false),
            header: parent.as_ref().and_then(|p| p.header.clone()),
            footer: parent.as_ref().and_then(|p| p.footer.clone()),
            add_new: spec
                .add_new
                .unwrap_or(defaults_file.is_none() && parent.is_none()),
            remove_calibration: spec.remove_calibration.unwrap_or(false),
            remove_operator: spec.remove_operator.unwrap_or(false),
            params: match parent {
                Some(parent) => parent.params,
                None => defaults.clone(),
            },
        };
        if let Some(header) = &spec.header {
            meal.header = header.clone();
        }
        if let Some(footer) = &spec.footer {
            meal.footer = footer.clone();
        }

        let dishes = self.collect_dishes(spec)?;
        let (edited, black_params, black_groups) = flatten_dishes(&dishes);

        self.apply_edits(&mut meal, edited, &defaults)?;
        remove_blacklisted(&mut meal.params, &black_params, &black_groups);

        if meal.remove_calibration {
            let removed = remove_matching(&mut meal.params, &NamePatterns::load(self.paths, CALIBRATION)?);
            debug!(meal = name, removed, "removed calibration parameters");
        }
        if meal.remove_operator {
            let removed = remove_matching(&mut meal.params, &NamePatterns::load(self.paths, OPERATOR)?);
            debug!(meal = name, removed, "removed operator parameters");
        }

        info!(meal = name, params = meal.params.len(), add_new = meal.add_new, "meal resolved");
        Ok(meal)
    }

    /// The default parameters file in effect for an entry. An explicit
    /// `defaults: ~` disables the global file.
    fn defaults_file(&self, spec: &MealSpec) -> BuildResult<Option<PathBuf>> {
        match &spec.defaults {
            Some(Some(path)) => Ok(Some(relative_to(&self.paths.path()?, Path::new(path)))),
            Some(None) => Ok(None),
            None => Ok(self.paths.default_parameters()),
        }
    }

    fn collect_dishes(&self, spec: &MealSpec) -> BuildResult<Vec<Dish>> {
        if spec.dishes.is_empty() {
            return Ok(Vec::new());
        }
        let dir = self.paths.custom_dishes()?;
        spec.dishes
            .iter()
            .map(|order| {
                Dish::load(
                    &dir,
                    &order.dish,
                    order.model.as_deref(),
                    order.submodel.as_deref(),
                )
            })
            .collect()
    }

    fn apply_edits(
        &self,
        meal: &mut Meal,
        edited: ParameterList,
        defaults: &ParameterList,
    ) -> BuildResult<()> {
        for mut param in edited {
            if !meal.add_new {
                debug!(meal = %meal.name, param = %param, "modifying parameter from edit list");
                if !meal.params.contains(&param) {
                    return Err(meal.rejected(param.name()));
                }
                meal.params.add_existing(param)?;
                continue;
            }
            if param.param_type.is_none() {
                param.param_type = defaults.get_by_key(&param.key()).and_then(|d| d.param_type);
            }
            debug!(meal = %meal.name, param = %param, "adding parameter from edit list");
            meal.params.add(param);
        }
        Ok(())
    }
}

/// Merge the dishes of one meal. The first dish to define a name wins.
fn flatten_dishes(dishes: &[Dish]) -> (ParameterList, ParameterList, ParameterList) {
    let mut edited = ParameterList::new();
    let mut black_params = ParameterList::new();
    let mut black_groups = ParameterList::new();
    for dish in dishes {
        for (source, target) in [
            (&dish.params, &mut edited),
            (&dish.black_params, &mut black_params),
            (&dish.black_groups, &mut black_groups),
        ] {
            for param in source {
                if !target.insert_if_absent(param.clone()) {
                    debug!(dish = %dish.name, param = %param.name(), "already defined by an earlier dish");
                }
            }
        }
    }
    (edited, black_params, black_groups)
}

fn remove_blacklisted(
    params: &mut ParameterList,
    black_params: &ParameterList,
    black_groups: &ParameterList,
) {
    let removed = params.retain(|p| {
        let by_group = p
            .group
            .as_deref()
            .is_some_and(|g| black_groups.contains_name(g));
        let blacklisted = by_group || black_params.contains(p);
        if blacklisted {
            debug!(param = %p.name(), "removing blacklisted parameter");
        }
        !blacklisted
    });
    debug!(removed, "blacklist applied");
}

fn remove_matching(params: &mut ParameterList, patterns: &NamePatterns) -> usize {
    params.retain(|p| !patterns.is_match(p.name()))
}

fn relative_to(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Kitchen;
    use parasect_types::Value;

    #[test]
    fn simple_meal_adds_new_parameters() {
        let kitchen = Kitchen::new()
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  add_new: true\n  kitchen: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        assert!(meal.add_new);
        assert_eq!(meal.params.len(), 1);
        assert_eq!(meal.params.get("OIL").unwrap().value(), Value::Float(0.5));
        assert_eq!(meal.frame_id, 0);
    }

    #[test]
    fn without_defaults_or_parent_new_parameters_are_allowed() {
        let kitchen = Kitchen::new()
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  kitchen: ~\n");
        assert!(kitchen.resolve("snack").unwrap().add_new);
    }

    #[test]
    fn global_defaults_form_the_base_set() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tOIL\t0.2\t9\n1\t1\tSALT\t3\t6\n")
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  kitchen: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        assert!(!meal.add_new);
        assert_eq!(meal.params.len(), 2);
        let oil = meal.params.get("OIL").unwrap();
        assert_eq!(oil.param_type, Some(ParamType::Float));
        assert_eq!(oil.value(), Value::Float(0.5));
    }

    #[test]
    fn new_parameter_rejected_without_add_new() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tSALT\t3\t6\n")
            .dish("kitchen", "common:\n  ingredients:\n    - [UNOBTAINIUM, -1, ~]\n")
            .menu("snack:\n  kitchen: ~\n");
        let err = kitchen.resolve("snack").unwrap_err();
        assert!(matches!(
            err,
            BuildError::NewParameterRejected { param, .. } if param == "UNOBTAINIUM"
        ));
    }

    #[test]
    fn add_new_takes_type_from_defaults() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tSALT\t3\t6\n")
            .dish(
                "kitchen",
                "common:\n  ingredients:\n    - [SALT, 4.7, ~]\n    - [PEPPER, 2, ~]\n",
            )
            .menu("snack:\n  add_new: true\n  kitchen: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        let salt = meal.params.get("SALT").unwrap();
        assert_eq!(salt.param_type, Some(ParamType::Int32));
        assert_eq!(salt.value(), Value::Int(4));
        assert_eq!(meal.params.get("PEPPER").unwrap().param_type, None);
    }

    #[test]
    fn null_defaults_override_global_file() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tSALT\t3\t6\n")
            .menu("snack:\n  defaults: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        assert!(meal.params.is_empty());
        assert!(meal.add_new);
    }

    #[test]
    fn entry_defaults_resolve_relative_to_menu() {
        let kitchen = Kitchen::new()
            .file("px4_defaults.params", "1\t1\tSALT\t3\t6\n1\t1\tOIL\t0.2\t9\n")
            .menu("snack:\n  defaults: px4_defaults.params\n");
        let meal = kitchen.resolve("snack").unwrap();
        assert_eq!(meal.params.len(), 2);
        assert!(!meal.add_new);
    }

    #[test]
    fn blacklist_removes_names_and_groups_in_one_pass() {
        let kitchen = Kitchen::new()
            .defaults(
                "1\t1\tBEEF\t1\t6\n1\t1\tCHILLI\t2\t6\n1\t1\tJALLAPENOS\t3\t6\n1\t1\tRICE\t4\t6\n",
            )
            .dish(
                "allergies",
                "common:\n  allergens:\n    substances:\n      - [CHILLI, ~, ~]\n      - [JALLAPENOS, ~, ~]\n",
            )
            .menu("mild:\n  allergies: ~\n");
        let meal = kitchen.resolve("mild").unwrap();
        let names: Vec<_> = meal.params.names().collect();
        assert_eq!(names, vec!["BEEF", "RICE"]);
    }

    #[test]
    fn group_blacklist_uses_parameter_groups() {
        let kitchen = Kitchen::new()
            .file(
                "defaults.xml",
                r#"<parameters>
  <group name="Spices"><parameter name="CHILLI" default="2" type="INT32"/></group>
  <group name="Mains"><parameter name="BEEF" default="1" type="INT32"/></group>
</parameters>"#,
            )
            .dish(
                "allergies",
                "common:\n  allergens:\n    groups:\n      - [spices, ~, ~]\n",
            )
            .menu("mild:\n  defaults: defaults.xml\n  allergies: ~\n");
        let meal = kitchen.resolve("mild").unwrap();
        assert!(meal.params.contains_name("BEEF"));
        assert!(!meal.params.contains_name("CHILLI"));
    }

    #[test]
    fn child_overrides_parent_and_parent_blacklist_is_not_inherited() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tBEEF\t1\t6\n1\t1\tCHILLI\t2\t6\n")
            .dish(
                "allergies",
                "common:\n  allergens:\n    substances:\n      - [CHILLI, ~, ~]\n",
            )
            .dish(
                "spicy",
                "common:\n  ingredients:\n    - [CHILLI, 10, ~]\n    - [BEEF, 5, ~]\n",
            )
            .menu(
                "mild:\n  allergies: ~\n\
                 hot:\n  parent: mild\n  add_new: true\n  spicy: ~\n",
            );
        let mild = kitchen.resolve("mild").unwrap();
        assert!(!mild.params.contains_name("CHILLI"));

        let hot = kitchen.resolve("hot").unwrap();
        assert_eq!(hot.params.get("CHILLI").unwrap().value(), Value::Int(10));
        assert_eq!(hot.params.get("BEEF").unwrap().value(), Value::Int(5));
    }

    #[test]
    fn first_dish_wins_on_conflicts() {
        let kitchen = Kitchen::new()
            .dish("first", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .dish("second", "common:\n  ingredients:\n    - [OIL, 0.9, ~]\n")
            .menu("snack:\n  first: ~\n  second: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        assert_eq!(meal.params.get("OIL").unwrap().value(), Value::Float(0.5));
    }

    #[test]
    fn header_footer_and_flags() {
        let kitchen = Kitchen::new().menu(
            "base:\n  header: base\n  footer: base\n  sitl: true\n  frame_id: 4001\n\
             child:\n  parent: base\n  footer: ~\n  hitl: true\n",
        );
        let child = kitchen.resolve("child").unwrap();
        assert_eq!(child.header.as_deref(), Some("base"));
        assert_eq!(child.footer, None);
        assert!(!child.sitl);
        assert!(child.hitl);
        assert_eq!(child.frame_id, 0);
        assert!(!child.add_new);
    }

    #[test]
    fn calibration_and_operator_removal() {
        let kitchen = Kitchen::new()
            .defaults(
                "1\t1\tCAL_ACC0_ID\t1\t6\n1\t1\tCAL_GYRO0_ID\t2\t6\n1\t1\tCOM_FLTMODE1\t3\t6\n1\t1\tMC_ROLL_P\t6.5\t9\n",
            )
            .staple("calibration", "common:\n  ingredients:\n    - [CAL_.*, ~, ~]\n")
            .staple("operator", "common:\n  ingredients:\n    - [COM_FLTMODE1, ~, ~]\n")
            .menu(
                "clean:\n  remove_calibration: true\n  remove_operator: true\n\
                 child:\n  parent: clean\n\
                 dirty:\n  remove_calibration: false\n",
            );
        let clean = kitchen.resolve("clean").unwrap();
        let names: Vec<_> = clean.params.names().collect();
        assert_eq!(names, vec!["MC_ROLL_P"]);

        let child = kitchen.resolve("child").unwrap();
        assert!(!child.remove_calibration);
        assert_eq!(child.params.len(), 1);

        assert_eq!(kitchen.resolve("dirty").unwrap().params.len(), 4);
    }

    #[test]
    fn missing_parent_is_named() {
        let kitchen = Kitchen::new().menu("orphan:\n  parent: nobody\n");
        let err = kitchen.resolve("orphan").unwrap_err();
        assert!(matches!(err, BuildError::MissingParent { parent, .. } if parent == "nobody"));
    }

    #[test]
    fn parent_cycles_are_detected() {
        let kitchen = Kitchen::new().menu("a:\n  parent: b\nb:\n  parent: a\n");
        let err = kitchen.resolve("a").unwrap_err();
        match err {
            BuildError::ParentCycle(chain) => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected ParentCycle, got {other:?}"),
        }
    }

    #[test]
    fn missing_dish_variant_propagates() {
        let kitchen = Kitchen::new()
            .dish("kitchen", "variants:\n  quad:\n    common: ~\n")
            .menu("snack:\n  kitchen: hexa\n");
        assert!(matches!(
            kitchen.resolve("snack"),
            Err(BuildError::MissingVariant { .. })
        ));
    }

    #[test]
    fn autostart_follows_add_new() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tSALT\t3\t6\n")
            .menu("strict:\n  frame_id: 4001\nloose:\n  frame_id: 4001\n  add_new: true\n");

        let strict = kitchen.resolve("strict").unwrap();
        assert!(matches!(
            strict.export_params(true),
            Err(BuildError::NewParameterRejected { .. })
        ));
        assert!(!strict.export_params(false).unwrap().contains_name(AUTOSTART_PARAM));

        let loose = kitchen.resolve("loose").unwrap();
        let params = loose.export_params(true).unwrap();
        let autostart = params.get(AUTOSTART_PARAM).unwrap();
        assert_eq!(autostart.value(), Value::Int(4001));
        assert_eq!(autostart.param_type, Some(ParamType::Int32));
    }

    #[test]
    fn resolution_is_repeatable() {
        let kitchen = Kitchen::new()
            .defaults("1\t1\tSALT\t3\t6\n1\t1\tOIL\t0.2\t9\n")
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  kitchen: ~\n");
        assert_eq!(kitchen.resolve("snack").unwrap(), kitchen.resolve("snack").unwrap());
    }
}
