//! Device configuration templates keyed by resource id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigField {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<ConfigField>,
}

/// Configuration form for one device model. The same shape is used for the
/// per-unit configs stored in wizard data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTemplate {
    /// Device family page: `firewall`, `switch` or `accesspoint`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub sections: Vec<ConfigSection>,
}

pub type DeviceTemplates = BTreeMap<String, DeviceTemplate>;

impl DeviceTemplate {
    /// Free-form config for a device model without a template.
    pub fn placeholder(kind: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            display_name: display_name.into(),
            sections: vec![ConfigSection {
                title: "Custom Configuration".to_string(),
                fields: vec![ConfigField {
                    label: "Configuration".to_string(),
                    value: Value::from(""),
                    extra: Map::new(),
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse_from_keyed_object() {
        let raw = r#"{
            "FG100F": {
                "type": "firewall",
                "displayName": "FortiGate 100F",
                "sections": [{"title": "WAN", "fields": [{"label": "IP", "value": "", "placeholder": "x.x.x.x"}]}]
            }
        }"#;
        let tpls: DeviceTemplates = serde_json::from_str(raw).unwrap();
        let fg = &tpls["FG100F"];
        assert_eq!(fg.kind, "firewall");
        assert_eq!(fg.sections[0].fields[0].extra["placeholder"], "x.x.x.x");
    }

    #[test]
    fn placeholder_has_one_empty_field() {
        let p = DeviceTemplate::placeholder("switch", "FortiSwitch");
        assert_eq!(p.sections.len(), 1);
        assert_eq!(p.sections[0].title, "Custom Configuration");
        assert_eq!(p.sections[0].fields[0].label, "Configuration");
        assert_eq!(p.sections[0].fields[0].value, "");
    }
}
