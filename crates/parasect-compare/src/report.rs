//! Fixed-width text rendering of a comparison.

use std::fmt::{self, Write as _};
use std::path::Path;

use parasect_build::ConfigPaths;
use parasect_types::Parameter;

use crate::comparison::{
    compare_files, CompareOptions, Comparison, ComponentComparison, ParamDiff, FIRST_LABEL,
    SECOND_LABEL,
};
use crate::error::CompareResult;

const TITLE: &str = "File comparison";
const MISSING: &str = "X";
const RULE_WIDTH: usize = 80;

struct Widths {
    name: usize,
    first: usize,
    second: usize,
}

impl Widths {
    fn measure(components: &[ComponentComparison], file1: &str, file2: &str) -> Self {
        let mut widths = Widths {
            name: 1,
            first: file1.chars().count(),
            second: file2.chars().count(),
        };
        for diff in components.iter().flat_map(|c| &c.diffs) {
            widths.name = widths.name.max(diff.name.chars().count());
            widths.first = widths.first.max(pretty_len(&diff.first));
            widths.second = widths.second.max(pretty_len(&diff.second));
        }
        widths
    }
}

fn pretty_len(param: &Option<Parameter>) -> usize {
    param.as_ref().map_or(1, |p| p.pretty_value().chars().count())
}

fn pretty(param: &Option<Parameter>) -> String {
    param
        .as_ref()
        .map_or_else(|| MISSING.to_string(), Parameter::pretty_value)
}

fn write_row(out: &mut String, diff: &ParamDiff, widths: &Widths) -> fmt::Result {
    writeln!(
        out,
        "{:nw$} : {:w1$} {} {:w2$}",
        diff.name,
        pretty(&diff.first),
        diff.divider(),
        pretty(&diff.second),
        nw = widths.name,
        w1 = widths.first,
        w2 = widths.second,
    )
}

fn write_report(
    out: &mut String,
    components: &[ComponentComparison],
    file1: &str,
    file2: &str,
) -> fmt::Result {
    let widths = Widths::measure(components, file1, file2);
    let equals = "=".repeat(RULE_WIDTH);
    let dashes = "-".repeat(RULE_WIDTH);

    writeln!(
        out,
        "{:nw$} : {:w1$} | {:w2$}",
        TITLE,
        file1,
        file2,
        nw = widths.name,
        w1 = widths.first,
        w2 = widths.second,
    )?;
    writeln!(out, "{equals}")?;

    for component in components.iter().filter(|c| !c.is_empty()) {
        writeln!(out, "{dashes}")?;
        writeln!(out, "Component {}-{}:", component.vid, component.cid)?;
        writeln!(out, "{dashes}")?;
        for diff in &component.diffs {
            write_row(out, diff, &widths)?;
        }
    }

    let differing: usize = components.iter().map(ComponentComparison::len).sum();
    writeln!(out, "{equals}")?;
    writeln!(out, "{differing} parameters differ")
}

/// Render comparison groups as a table.
///
/// Columns are as wide as their widest cell, with the file labels counting
/// towards the value columns. Groups without differences are omitted, but
/// the trailing count always appears.
pub fn build_comparison_string(
    components: &[ComponentComparison],
    file1: Option<&str>,
    file2: Option<&str>,
) -> String {
    let file1 = file1.filter(|f| !f.is_empty()).unwrap_or(FIRST_LABEL);
    let file2 = file2.filter(|f| !f.is_empty()).unwrap_or(SECOND_LABEL);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, components, file1, file2);
    out
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_comparison_string(
            &self.components,
            Some(&self.first),
            Some(&self.second),
        ))
    }
}

/// Compare two parameter files and render the report.
pub fn compare_helper(
    file1: &Path,
    file2: &Path,
    paths: &ConfigPaths,
    options: &CompareOptions,
) -> CompareResult<String> {
    Ok(compare_files(file1, file2, paths, options)?.to_string())
}
