//! ArduPilot whitespace-separated parameter files.
//!
//! Rows are `NAME value [reasoning]`; a reasoning token carrying
//! `@READONLY` marks the parameter read-only.

use parasect_types::{Parameter, ParameterList, Value};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::reader::{check_name, content_lines, non_empty};

/// Parse the whitespace-separated dialect.
pub fn read(text: &str) -> FormatResult<ParameterList> {
    let mut list = ParameterList::new();
    for (line_no, line) in content_lines(text) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, value, reasoning) = match tokens[..] {
            [name, value] => (name, value, None),
            [name, value, reasoning] => (name, value, Some(reasoning.to_string())),
            _ => {
                return Err(FormatError::mismatch(format!(
                    "line {line_no}: expected 2 or 3 tokens, found {}",
                    tokens.len()
                )))
            }
        };
        check_name(name, line_no)?;
        let value = Value::parse(value).map_err(|_| {
            FormatError::mismatch(format!("line {line_no}: invalid value {value:?}"))
        })?;

        let mut param = Parameter::new(name, value);
        param.set_reasoning(reasoning);
        debug!(line = line_no, param = %param, readonly = param.readonly, "parsed APM row");
        list.add(param);
    }
    non_empty(list)
}
