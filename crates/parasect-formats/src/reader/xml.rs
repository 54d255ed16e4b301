//! PX4 parameter metadata XML.
//!
//! ```xml
//! <parameters>
//!   <group name="Battery Calibration">
//!     <parameter name="BAT1_N_CELLS" default="0" type="INT32">
//!       <short_desc>Number of cells</short_desc>
//!       <reboot_required>true</reboot_required>
//!     </parameter>
//!   </group>
//!   <parameter name="LOOSE" default="1.5" type="FLOAT"/>
//! </parameters>
//! ```

use parasect_types::{ParamType, Parameter, ParameterList, Value};
use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::reader::non_empty;

/// Parse the XML dialect.
pub fn read(text: &str) -> FormatResult<ParameterList> {
    let doc = Document::parse(text)
        .map_err(|e| FormatError::mismatch(format!("not well-formed XML: {e}")))?;
    let root = doc.root_element();

    let mut list = ParameterList::new();
    for group in root.children().filter(|n| n.has_tag_name("group")) {
        let group_name = group.attribute("name").unwrap_or_default().to_uppercase();
        for node in group.children().filter(|n| n.has_tag_name("parameter")) {
            let mut param = parse_parameter(node)?;
            param.group = Some(group_name.clone());
            debug!(param = %param, group = %group_name, "parsed grouped XML parameter");
            list.add(param);
        }
    }

    for node in root.children().filter(|n| n.has_tag_name("parameter")) {
        let param = parse_parameter(node)?;
        debug!(param = %param, "parsed loose XML parameter");
        list.add(param);
    }

    non_empty(list)
}

fn parse_parameter(node: Node<'_, '_>) -> FormatResult<Parameter> {
    let name = required_attr(node, "name")?;
    let type_name = required_attr(node, "type")?;
    let default = required_attr(node, "default")?;

    let param_type: ParamType = type_name.parse()?;
    let value = if param_type.is_integer() {
        Value::parse(default)?.truncated()
    } else {
        Value::parse_float(default)?
    };

    let mut param = Parameter::new(name, value).with_type(param_type);
    param.default_value = Some(value);

    for child in node.children().filter(Node::is_element) {
        let Some(text) = child.text().map(str::trim).filter(|t| !t.is_empty()) else {
            continue;
        };
        match child.tag_name().name() {
            "short_desc" => param.short_desc = Some(text.to_string()),
            "long_desc" => param.long_desc = Some(text.to_string()),
            "unit" => param.unit = Some(text.to_string()),
            "min" => param.min_value = text.parse().ok(),
            "max" => param.max_value = text.parse().ok(),
            "increment" => param.increment = text.parse().ok(),
            "reboot_required" => param.reboot_required = text.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }
    Ok(param)
}

fn required_attr<'a>(node: Node<'a, '_>, attr: &str) -> FormatResult<&'a str> {
    node.attribute(attr).ok_or_else(|| {
        FormatError::mismatch(format!(
            "<{}> element without a `{attr}` attribute",
            node.tag_name().name()
        ))
    })
}
