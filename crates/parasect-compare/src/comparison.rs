//! Per-component comparison of two parameter lists.
//!
//! Parameters are grouped by `(vehicle id, component id)`. Within a group a
//! parameter is either present in one list only, or present in both with
//! values that differ beyond [`PARAM_EPS_PCT`]. Equal parameters are dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use parasect_build::{ConfigPaths, Dish};
use parasect_formats::read_params;
use parasect_types::{ParamKey, Parameter, ParameterList};
use serde::Serialize;
use tracing::debug;

use crate::error::CompareResult;

/// Relative tolerance below which two values are reported as equal. Allows a
/// displayed precision of three digits.
pub const PARAM_EPS_PCT: f64 = 0.006;
/// Guards the relative difference against division by zero.
pub const EPS: f64 = 1e-6;

/// Label used for the first list when it was not read from a file.
pub const FIRST_LABEL: &str = "List 1";
/// Label used for the second list when it was not read from a file.
pub const SECOND_LABEL: &str = "List 2";

/// Whether two values differ beyond the display precision.
pub fn values_differ(v1: f64, v2: f64) -> bool {
    (v1 - v2).abs() / (v1.abs().max(v2.abs()) + EPS) > PARAM_EPS_PCT
}

/// Vehicle ids seen in either list, each with the component ids seen under it.
///
/// Never empty unless both lists are, since every parameter carries ids.
pub fn collect_vid_cid(list1: &ParameterList, list2: &ParameterList) -> BTreeMap<u8, BTreeSet<u8>> {
    let mut ids: BTreeMap<u8, BTreeSet<u8>> = BTreeMap::new();
    for param in list1.iter().chain(list2.iter()) {
        ids.entry(param.vid).or_default().insert(param.cid);
    }
    ids
}

/// One differing parameter. At least one side is present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParamDiff {
    pub name: String,
    pub first: Option<Parameter>,
    pub second: Option<Parameter>,
}

impl ParamDiff {
    /// `>` when only the first list has the parameter, `<` when only the
    /// second does, `|` when both do.
    pub fn divider(&self) -> char {
        match (&self.first, &self.second) {
            (None, _) => '<',
            (_, None) => '>',
            _ => '|',
        }
    }
}

/// The differences found for one `(vehicle id, component id)` pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentComparison {
    pub vid: u8,
    pub cid: u8,
    pub diffs: Vec<ParamDiff>,
}

impl ComponentComparison {
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Compare the parameters of both lists that belong to `(vid, cid)`.
///
/// A parameter is considered only when its own ids match the pair, so a
/// parameter present in one list only shows up in the group of its own ids.
/// Names are visited in sorted order.
pub fn compare_parameter_lists(
    list1: &ParameterList,
    list2: &ParameterList,
    vid: u8,
    cid: u8,
) -> ComponentComparison {
    let names: BTreeSet<&str> = list1.names().chain(list2.names()).collect();

    let mut diffs = Vec::new();
    for name in names {
        let key = ParamKey::new(name, cid);
        let first = list1.get_by_key(&key).filter(|p| p.vid == vid);
        let second = list2.get_by_key(&key).filter(|p| p.vid == vid);
        let differs = match (first, second) {
            (None, None) => continue,
            (Some(p1), Some(p2)) => values_differ(p1.value().as_f64(), p2.value().as_f64()),
            _ => true,
        };
        if differs {
            diffs.push(ParamDiff {
                name: name.to_string(),
                first: first.cloned(),
                second: second.cloned(),
            });
        }
    }
    debug!(vid, cid, differing = diffs.len(), "compared component");
    ComponentComparison { vid, cid, diffs }
}

/// What to leave out of a comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Drop the parameters of the calibration staple dish from both lists.
    pub nocal: bool,
    /// Drop the parameters of the operator staple dish from both lists.
    pub noop: bool,
    /// Compare only this component id.
    pub component: Option<u8>,
}

/// Compare two lists, one [`ComponentComparison`] per id pair found in them.
///
/// Id pairs are collected before calibration and operator parameters are
/// stripped, so a pair may come back empty. Staple dishes are only loaded
/// when the matching option is set.
pub fn get_vehicles_comparison(
    list1: &ParameterList,
    list2: &ParameterList,
    options: &CompareOptions,
    paths: &ConfigPaths,
) -> CompareResult<Vec<ComponentComparison>> {
    let ids = collect_vid_cid(list1, list2);

    let mut list1 = list1.clone();
    let mut list2 = list2.clone();
    if options.nocal {
        let calibration = Dish::calibration(paths)?;
        list1 = &list1 - &calibration.params;
        list2 = &list2 - &calibration.params;
    }
    if options.noop {
        let operator = Dish::operator(paths)?;
        list1 = &list1 - &operator.params;
        list2 = &list2 - &operator.params;
    }

    let mut groups = Vec::new();
    for (vid, cids) in ids {
        for cid in cids {
            if options.component.is_some_and(|c| c != cid) {
                continue;
            }
            groups.push(compare_parameter_lists(&list1, &list2, vid, cid));
        }
    }
    Ok(groups)
}

/// A full comparison of two labelled lists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub components: Vec<ComponentComparison>,
}

impl Comparison {
    /// Compare two lists, labelling them with their source file names.
    pub fn new(
        list1: &ParameterList,
        list2: &ParameterList,
        options: &CompareOptions,
        paths: &ConfigPaths,
    ) -> CompareResult<Self> {
        Ok(Self {
            first: list1.source_file().unwrap_or(FIRST_LABEL).to_string(),
            second: list2.source_file().unwrap_or(SECOND_LABEL).to_string(),
            components: get_vehicles_comparison(list1, list2, options, paths)?,
        })
    }

    /// Total number of differing parameters across all components.
    pub fn differing(&self) -> usize {
        self.components.iter().map(ComponentComparison::len).sum()
    }
}

/// Read two parameter files in any supported dialect and compare them.
pub fn compare_files(
    file1: &Path,
    file2: &Path,
    paths: &ConfigPaths,
    options: &CompareOptions,
) -> CompareResult<Comparison> {
    debug!(
        file1 = %file1.display(),
        file2 = %file2.display(),
        component = ?options.component,
        "comparing parameter files"
    );
    let list1 = read_params(file1)?;
    let list2 = read_params(file2)?;
    Comparison::new(&list1, &list2, options, paths)
}
