//! Plugin configuration and settings-document handling.
//!
//! The settings document is JSON in one of three shapes:
//! - nested: `{ "replace-go-import": { "enabled": .., "rules": [..] } }`
//! - flat editor keys: `{ "replace-go-import.rules": [..], .. }`
//! - bare section: `{ "enabled": .., "rules": [..] }`

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::rule::{Rule, validate_rules};

/// Settings namespace shared with the editor host.
pub const SETTINGS_SECTION: &str = "replace-go-import";

const SECTION_KEYS: [&str; 3] = ["enabled", "rules", "showNotifications"];

/// Snapshot of the engine configuration.
///
/// Replaced wholesale on every refresh; rule order is application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Master switch.
    pub enabled: bool,
    /// Validated rules in declaration order.
    pub rules: Vec<Rule>,
    /// Whether the presentation layer is notified.
    pub show_notifications: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: Vec::new(),
            show_notifications: true,
        }
    }
}

impl PluginConfig {
    /// Build a config from an untyped settings section.
    ///
    /// Rules go through [`validate_rules`]; flags that are not booleans
    /// keep their defaults.
    #[must_use]
    pub fn from_value(section: &Value) -> Self {
        let defaults = Self::default();
        Self {
            enabled: section
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.enabled),
            rules: section
                .get("rules")
                .map(validate_rules)
                .unwrap_or_default(),
            show_notifications: section
                .get("showNotifications")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.show_notifications),
        }
    }

    /// Resolve the section from a whole settings document and build a config.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the document is not a JSON object.
    pub fn from_settings(document: &Value) -> Result<Self, EngineError> {
        let (_, section) = settings_section(document)?;
        Ok(Self::from_value(&section))
    }

    /// Enabled rules in declaration order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| rule.enabled)
    }
}

/// Where the section lives inside a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsShape {
    /// Object stored under [`SETTINGS_SECTION`].
    Nested,
    /// Dotted keys prefixed with [`SETTINGS_SECTION`].
    Flat,
    /// The document is the section.
    Section,
}

/// Detect the layout of a settings document.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the document is not a JSON object.
pub fn detect_shape(document: &Value) -> Result<SettingsShape, EngineError> {
    let obj = as_object(document)?;
    if obj.get(SETTINGS_SECTION).is_some_and(Value::is_object) {
        return Ok(SettingsShape::Nested);
    }
    if SECTION_KEYS.iter().any(|key| obj.contains_key(*key)) {
        return Ok(SettingsShape::Section);
    }
    Ok(SettingsShape::Flat)
}

/// Extract the section object together with the detected shape.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the document is not a JSON object.
pub fn settings_section(document: &Value) -> Result<(SettingsShape, Value), EngineError> {
    let shape = detect_shape(document)?;
    let obj = as_object(document)?;
    let section = match shape {
        SettingsShape::Nested => obj.get(SETTINGS_SECTION).cloned().unwrap_or_default(),
        SettingsShape::Section => document.clone(),
        SettingsShape::Flat => {
            let prefix = format!("{SETTINGS_SECTION}.");
            let flat: Map<String, Value> = obj
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix)
                        .map(|field| (field.to_string(), value.clone()))
                })
                .collect();
            Value::Object(flat)
        }
    };
    Ok((shape, section))
}

/// Outcome of preparing user-edited rules for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesUpdate {
    /// Rules that passed validation, in order.
    pub kept: Vec<Rule>,
    /// Number of entries dropped as malformed.
    pub dropped: usize,
}

/// Validate user-edited rules before they are written back.
#[must_use]
pub fn prepare_rules_update(raw: &Value) -> RulesUpdate {
    let submitted = raw.as_array().map_or(0, Vec::len);
    let kept = validate_rules(raw);
    RulesUpdate {
        dropped: submitted.saturating_sub(kept.len()),
        kept,
    }
}

/// Write `rules` into a settings document, keeping its shape.
///
/// # Errors
///
/// Returns [`EngineError::Config`] when the document is not a JSON object or
/// the rules cannot be serialized.
pub fn write_rules(document: &mut Value, rules: &[Rule]) -> Result<(), EngineError> {
    let shape = detect_shape(document)?;
    let encoded = serde_json::to_value(rules).map_err(|e| EngineError::Config(e.to_string()))?;
    let obj = as_object_mut(document)?;
    match shape {
        SettingsShape::Nested => {
            if let Some(Value::Object(section)) = obj.get_mut(SETTINGS_SECTION) {
                section.insert("rules".to_string(), encoded);
            }
        }
        SettingsShape::Flat => {
            obj.insert(format!("{SETTINGS_SECTION}.rules"), encoded);
        }
        SettingsShape::Section => {
            obj.insert("rules".to_string(), encoded);
        }
    }
    Ok(())
}

fn as_object(document: &Value) -> Result<&Map<String, Value>, EngineError> {
    document
        .as_object()
        .ok_or_else(|| EngineError::Config("settings document must be a JSON object".to_string()))
}

fn as_object_mut(document: &mut Value) -> Result<&mut Map<String, Value>, EngineError> {
    document
        .as_object_mut()
        .ok_or_else(|| EngineError::Config("settings document must be a JSON object".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_missing_and_mistyped_flags() {
        let config = PluginConfig::from_value(&json!({"enabled": "no", "showNotifications": 0}));
        assert!(config.enabled);
        assert!(config.show_notifications);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_shapes() {
        let nested = json!({"replace-go-import": {"enabled": false}});
        let flat = json!({"replace-go-import.enabled": false, "editor.tabSize": 4});
        let section = json!({"enabled": false});
        assert_eq!(detect_shape(&nested).unwrap(), SettingsShape::Nested);
        assert_eq!(detect_shape(&flat).unwrap(), SettingsShape::Flat);
        assert_eq!(detect_shape(&section).unwrap(), SettingsShape::Section);
        assert_eq!(detect_shape(&json!({})).unwrap(), SettingsShape::Flat);

        for doc in [nested, flat, section] {
            assert!(!PluginConfig::from_settings(&doc).unwrap().enabled);
        }
    }

    #[test]
    fn test_non_object_document_is_error() {
        assert!(matches!(
            PluginConfig::from_settings(&json!([1, 2])),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_write_rules_keeps_shape() {
        let rules = vec![Rule::new("local", "github.com/co/repo", "./local/repo")];

        let mut flat = json!({"editor.tabSize": 4});
        write_rules(&mut flat, &rules).unwrap();
        assert_eq!(flat["replace-go-import.rules"][0]["from"], "github.com/co/repo");
        assert_eq!(flat["editor.tabSize"], 4);

        let mut nested = json!({"replace-go-import": {"enabled": true}});
        write_rules(&mut nested, &rules).unwrap();
        assert_eq!(nested["replace-go-import"]["rules"][0]["exemptPaths"], json!([]));

        let reread = PluginConfig::from_settings(&nested).unwrap();
        assert_eq!(reread.rules, rules);
    }

    #[test]
    fn test_prepare_rules_update_counts_drops() {
        let update = prepare_rules_update(&json!([
            {"name": "a", "from": "x", "to": "y", "enabled": true},
            {"name": "", "from": "x", "to": "y"},
            "junk"
        ]));
        assert_eq!(update.kept.len(), 1);
        assert_eq!(update.dropped, 2);
    }
}
