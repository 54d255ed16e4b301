//! Parameter file readers and the dialect dispatcher.
//!
//! Each reader is a plain function from file contents to a non-empty
//! [`ParameterList`], returning [`FormatError::Mismatch`] when the text is not
//! in its dialect. [`dispatch`] runs an explicit, ordered list of readers and
//! accepts the input only if exactly one of them recognizes it.

pub mod apm;
pub mod csv;
pub mod qgc;
pub mod xml;

use std::path::Path;

use parasect_types::ParameterList;
use tracing::debug;

use crate::error::{FormatError, FormatResult};

/// Signature shared by every dialect reader.
pub type ReaderFn = fn(&str) -> FormatResult<ParameterList>;

/// The known dialects, in the order they are tried.
pub const READERS: [(&str, ReaderFn); 4] = [
    ("xml", xml::read),
    ("qgc", qgc::read),
    ("csv", csv::read),
    ("apm", apm::read),
];

/// Read a parameter file of any known dialect.
///
/// The resulting list is tagged with the file's base name.
pub fn read_params(path: &Path) -> FormatResult<ParameterList> {
    debug!(path = %path.display(), "reading parameter file");
    let bytes = std::fs::read(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = String::from_utf8(bytes).map_err(|_| FormatError::Unrecognized {
        source_name: source_name.clone(),
    })?;

    let mut list = dispatch(&source_name, &text, &READERS)?;
    list.set_source_file(source_name);
    Ok(list)
}

/// Run `readers` against `text` and require exactly one to succeed.
///
/// Mismatches are expected and skipped; any other reader error is fatal and
/// returned immediately.
pub fn dispatch(
    source_name: &str,
    text: &str,
    readers: &[(&'static str, ReaderFn)],
) -> FormatResult<ParameterList> {
    let mut matched: Vec<(&'static str, ParameterList)> = Vec::new();
    for (dialect, reader) in readers {
        match reader(text) {
            Ok(list) => {
                debug!(source = source_name, dialect, params = list.len(), "dialect matched");
                matched.push((dialect, list));
            }
            Err(FormatError::Mismatch(reason)) => {
                debug!(source = source_name, dialect, %reason, "dialect rejected");
            }
            Err(e) => return Err(e),
        }
    }

    match matched.len() {
        0 => Err(FormatError::Unrecognized {
            source_name: source_name.to_string(),
        }),
        1 => Ok(matched.pop().map(|(_, list)| list).unwrap_or_default()),
        _ => Err(FormatError::Ambiguous {
            source_name: source_name.to_string(),
            dialects: matched.into_iter().map(|(d, _)| d).collect(),
        }),
    }
}

/// Non-blank, non-comment lines of a text file, with their 1-based numbers.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

/// Reject rows whose name field is numeric or not an identifier.
pub(crate) fn check_name(name: &str, line_no: usize) -> FormatResult<()> {
    if name.parse::<f64>().is_ok() {
        return Err(FormatError::mismatch(format!(
            "line {line_no}: parameter name {name:?} is numeric"
        )));
    }
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FormatError::mismatch(format!(
            "line {line_no}: {name:?} is not a parameter name"
        )));
    }
    Ok(())
}

/// Every text dialect rejects files that yield no parameters.
pub(crate) fn non_empty(list: ParameterList) -> FormatResult<ParameterList> {
    if list.is_empty() {
        return Err(FormatError::mismatch("no parameters found"));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parasect_types::Parameter;
    use proptest::prelude::*;

    const QGC: &str = "# Onboard parameters for Vehicle 1\n\
                       #\n\
                       # Vehicle-Id Component-Id Name Value Type\n\
                       1\t1\tBAT_CRIT_THR\t0.070000\t9\n\
                       1\t1\tSYS_AUTOSTART\t4001\t6\n";

    fn always(_: &str) -> FormatResult<ParameterList> {
        Ok([Parameter::new("P", 1)].into_iter().collect())
    }

    fn never(_: &str) -> FormatResult<ParameterList> {
        Err(FormatError::mismatch("never"))
    }

    fn broken(_: &str) -> FormatResult<ParameterList> {
        Err(FormatError::UnknownFormat("broken".into()))
    }

    #[test]
    fn single_match_is_accepted() {
        let list = dispatch("f", "", &[("never", never), ("always", always)]).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn no_match_is_unrecognized() {
        let err = dispatch("f", "", &[("never", never)]).unwrap_err();
        assert!(matches!(err, FormatError::Unrecognized { .. }));
    }

    #[test]
    fn two_matches_are_ambiguous() {
        let err = dispatch("f", "", &[("a", always), ("b", always)]).unwrap_err();
        match err {
            FormatError::Ambiguous { dialects, .. } => assert_eq!(dialects, vec!["a", "b"]),
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn fatal_reader_errors_propagate() {
        let err = dispatch("f", "", &[("always", always), ("broken", broken)]).unwrap_err();
        assert!(matches!(err, FormatError::UnknownFormat(_)));
    }

    #[test]
    fn each_dialect_is_recognized_by_exactly_its_reader() {
        let samples = [
            (
                "xml",
                r#"<parameters><parameter name="P" default="1" type="INT32"/></parameters>"#,
            ),
            ("qgc", QGC),
            ("csv", "BAT1_A_PER_V,36.364\nBAT1_N_CELLS,4\n"),
            ("apm", "ACRO_BAL_PITCH 1.000000\nARMING_CHECK 1 @READONLY\n"),
        ];
        for (expected, text) in samples {
            let hits: Vec<_> = READERS
                .iter()
                .filter(|(_, reader)| reader(text).is_ok())
                .map(|(name, _)| *name)
                .collect();
            assert_eq!(hits, vec![expected], "sample for {expected}");
        }
    }

    #[test]
    fn read_params_tags_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazebo.params");
        std::fs::write(&path, QGC).unwrap();

        let list = read_params(&path).unwrap();
        assert_eq!(list.source_file(), Some("gazebo.params"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn read_params_rejects_unknown_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "this is not a parameter file at all\n").unwrap();
        assert!(matches!(
            read_params(&path),
            Err(FormatError::Unrecognized { .. })
        ));
    }

    #[test]
    fn read_params_missing_file_is_io_error() {
        let err = read_params(Path::new("/definitely/not/here.params")).unwrap_err();
        assert!(matches!(err, FormatError::Io { .. }));
    }

    proptest! {
        #[test]
        fn at_most_one_dialect_accepts_any_input(text in "[A-Z0-9_ ,\t#\n.]{0,80}") {
            let hits = READERS
                .iter()
                .filter(|(_, reader)| reader(&text).is_ok())
                .count();
            prop_assert!(hits <= 1);
        }
    }
}
