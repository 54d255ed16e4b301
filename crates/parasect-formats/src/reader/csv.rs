//! Two-column `NAME,value` files, as printed by `ulog_params`.

use parasect_types::{Parameter, ParameterList, Value};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::reader::{check_name, content_lines, non_empty};

/// Parse the comma-separated dialect.
pub fn read(text: &str) -> FormatResult<ParameterList> {
    let mut list = ParameterList::new();
    for (line_no, line) in content_lines(text) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [name, value] = fields[..] else {
            return Err(FormatError::mismatch(format!(
                "line {line_no}: expected 2 comma-separated fields, found {}",
                fields.len()
            )));
        };
        check_name(name, line_no)?;
        let value = Value::parse(value).map_err(|_| {
            FormatError::mismatch(format!("line {line_no}: invalid value {value:?}"))
        })?;

        let param = Parameter::new(name, value);
        debug!(line = line_no, param = %param, "parsed CSV row");
        list.add(param);
    }
    non_empty(list)
}
