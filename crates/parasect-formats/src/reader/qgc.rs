//! QGroundControl tab-separated parameter dumps.
//!
//! Each row is `vehicle-id \t component-id \t NAME \t value \t type-code`,
//! with the type code taken from MAVLink `MAV_PARAM_TYPE`.

use parasect_types::{ParamType, Parameter, ParameterList, TypeError, Value};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::reader::{check_name, content_lines, non_empty};

/// Parse the tab-separated dialect.
pub fn read(text: &str) -> FormatResult<ParameterList> {
    let mut list = ParameterList::new();
    for (line_no, line) in content_lines(text) {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let [vid, cid, name, value, code] = fields[..] else {
            return Err(FormatError::mismatch(format!(
                "line {line_no}: expected 5 tab-separated fields, found {}",
                fields.len()
            )));
        };
        check_name(name, line_no)?;

        let vid: u8 = parse_id(vid, line_no)?;
        let cid: u8 = parse_id(cid, line_no)?;
        let code: i64 = code.parse().map_err(|_| {
            FormatError::mismatch(format!("line {line_no}: type code {code:?} is not an integer"))
        })?;
        let param_type = ParamType::from_mavlink_code(code)?;

        let value = Value::parse(value).map_err(|e| match e {
            TypeError::InvalidValue(v) => {
                FormatError::mismatch(format!("line {line_no}: invalid value {v:?}"))
            }
            other => other.into(),
        })?;
        let value = if param_type.is_integer() {
            value.truncated()
        } else {
            value.widened()
        };

        let param = Parameter::new(name, value)
            .with_type(param_type)
            .with_ids(vid, cid);
        debug!(line = line_no, param = %param, "parsed QGC row");
        list.add(param);
    }
    non_empty(list)
}

fn parse_id(field: &str, line_no: usize) -> FormatResult<u8> {
    field.parse().map_err(|_| {
        FormatError::mismatch(format!("line {line_no}: {field:?} is not a valid id"))
    })
}
