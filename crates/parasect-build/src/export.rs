//! Rendering a meal as the lines of a parameter file.

use parasect_formats::Format;
use parasect_types::ParameterList;
use tracing::debug;

use crate::config::ConfigPaths;
use crate::error::{BuildError, BuildResult};
use crate::meal::Meal;
use crate::model::{load_boilerplate, BoilerplateText};

pub const HEADER: &str = "header";
pub const FOOTER: &str = "footer";

/// Boilerplate lines of a header or footer document for one format.
///
/// Lines come from the document's common section, then the format's common
/// section, then the format variant named `variant`.
pub fn boilerplate_lines(
    document: &str,
    text: &BoilerplateText,
    format: Format,
    variant: Option<&str>,
) -> BuildResult<Vec<String>> {
    let mut lines: Vec<String> = text.common.iter().flatten().cloned().collect();

    let missing_variant = |variant: &str| BuildError::MissingBoilerplateVariant {
        document: document.to_string(),
        format: format.to_string(),
        variant: variant.to_string(),
    };

    let Some(section) = text.formats.get(format.as_str()) else {
        debug!(document, %format, "no boilerplate for format");
        return match variant {
            Some(v) => Err(missing_variant(v)),
            None => Ok(lines),
        };
    };
    lines.extend(section.common.iter().flatten().cloned());

    if let (Some(variant), Some(variants)) = (variant, &section.variants) {
        let selected = variants.get(variant).ok_or_else(|| missing_variant(variant))?;
        lines.extend(selected.common.iter().flatten().cloned());
    }
    Ok(lines)
}

/// Lines of a meal exported in one format, header to footer.
///
/// Boilerplate is loaded up front; parameter lines are rendered lazily as
/// the iterator advances.
pub fn export_lines(
    meal: &Meal,
    format: Format,
    paths: &ConfigPaths,
) -> BuildResult<impl Iterator<Item = BuildResult<String>>> {
    let staples = paths.staple_dishes()?;
    let header = boilerplate_lines(
        HEADER,
        &load_boilerplate(&staples, HEADER)?,
        format,
        meal.header.as_deref(),
    )?;
    let footer = boilerplate_lines(
        FOOTER,
        &load_boilerplate(&staples, FOOTER)?,
        format,
        meal.footer.as_deref(),
    )?;
    let params: ParameterList = meal.export_params(format.is_px4())?;
    debug!(meal = %meal.name, %format, params = params.len(), "exporting meal");

    let sitl = meal.sitl;
    let body = params
        .into_iter()
        .map(move |param| format.param_line(&param, sitl).map_err(BuildError::from));

    Ok(header
        .into_iter()
        .map(Ok)
        .chain(body)
        .chain(footer.into_iter().map(Ok)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Kitchen;

    const HEADER_YAML: &str = r##"
common:
  - "# Generated by parasect"
formats:
  px4afv2:
    common:
      - "#!/bin/sh"
    variants:
      vtol:
        common:
          - ". ${R}etc/init.d/rc.vtol_defaults"
  csv:
    common: ~
"##;

    const FOOTER_YAML: &str = r##"
formats:
  px4afv2:
    variants:
      vtol:
        common:
          - "set MIXER vtol"
"##;

    fn text(yaml: &str) -> BoilerplateText {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn boilerplate_order_is_common_format_variant() {
        let lines = boilerplate_lines(HEADER, &text(HEADER_YAML), Format::Px4afv2, Some("vtol")).unwrap();
        assert_eq!(
            lines,
            vec![
                "# Generated by parasect",
                "#!/bin/sh",
                ". ${R}etc/init.d/rc.vtol_defaults"
            ]
        );
    }

    #[test]
    fn boilerplate_without_format_section() {
        let lines = boilerplate_lines(HEADER, &text(HEADER_YAML), Format::Apm, None).unwrap();
        assert_eq!(lines, vec!["# Generated by parasect"]);
        assert!(matches!(
            boilerplate_lines(HEADER, &text(HEADER_YAML), Format::Apm, Some("vtol")),
            Err(BuildError::MissingBoilerplateVariant { .. })
        ));
    }

    #[test]
    fn boilerplate_missing_variant_is_named() {
        let err = boilerplate_lines(HEADER, &text(HEADER_YAML), Format::Px4afv2, Some("rover"))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingBoilerplateVariant { variant, .. } if variant == "rover"
        ));
    }

    #[test]
    fn simple_csv_export() {
        let kitchen = Kitchen::new()
            .staple("header", HEADER_YAML)
            .staple("footer", FOOTER_YAML)
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  add_new: true\n  kitchen: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        let lines: Vec<String> = export_lines(&meal, Format::Csv, kitchen.paths())
            .unwrap()
            .collect::<BuildResult<_>>()
            .unwrap();
        assert_eq!(lines, vec!["# Generated by parasect", "OIL,0.5"]);
    }

    #[test]
    fn airframe_export_with_autostart_and_boilerplate() {
        let kitchen = Kitchen::new()
            .staple("header", HEADER_YAML)
            .staple("footer", FOOTER_YAML)
            .dish("tuning", "common:\n  ingredients:\n    - [MC_ROLL_P, 6.5, ~]\n")
            .menu("my_vtol:\n  frame_id: 13000\n  header: vtol\n  footer: vtol\n  tuning: ~\n");
        let meal = kitchen.resolve("my_vtol").unwrap();
        let lines: Vec<String> = export_lines(&meal, Format::Px4afv2, kitchen.paths())
            .unwrap()
            .collect::<BuildResult<_>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "# Generated by parasect",
                "#!/bin/sh",
                ". ${R}etc/init.d/rc.vtol_defaults",
                "\tparam set-default MC_ROLL_P 6.5",
                "\tparam set-default SYS_AUTOSTART 13000",
                "set MIXER vtol",
            ]
        );
    }

    #[test]
    fn px4_export_fails_on_untyped_parameters() {
        let kitchen = Kitchen::new()
            .staple("header", "common: ~\n")
            .staple("footer", "common: ~\n")
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  kitchen: ~\n");
        let meal = kitchen.resolve("snack").unwrap();
        let result: BuildResult<Vec<String>> = export_lines(&meal, Format::Px4, kitchen.paths())
            .unwrap()
            .collect();
        assert!(matches!(result, Err(BuildError::Format(_))));
    }

    #[test]
    fn export_is_repeatable() {
        let kitchen = Kitchen::new()
            .staple("header", HEADER_YAML)
            .staple("footer", FOOTER_YAML)
            .defaults("1\t1\tSALT\t3\t6\n1\t1\tOIL\t0.2\t9\n1\t1\tSYS_AUTOSTART\t0\t6\n")
            .dish("kitchen", "common:\n  ingredients:\n    - [OIL, 0.5, ~]\n")
            .menu("snack:\n  frame_id: 4001\n  kitchen: ~\n");
        let render = || -> Vec<String> {
            let meal = kitchen.resolve("snack").unwrap();
            export_lines(&meal, Format::Px4, kitchen.paths())
                .unwrap()
                .collect::<BuildResult<_>>()
                .unwrap()
        };
        let first = render();
        assert_eq!(first, render());
        assert!(first.contains(&"1\t1\tOIL\t0.5\t9".to_string()));
        assert!(first.contains(&"1\t1\tSYS_AUTOSTART\t4001\t6".to_string()));
    }
}
