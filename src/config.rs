use serde::Deserialize;
use swc_core::ecma::ast::Ident;

use crate::error::ConfigError;

/// Plugin options, deserialized from the host's JSON config.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed handed to the title resolver.
    pub title: String,
    #[serde(default)]
    pub rename_default_exports_to: Option<String>,
    #[serde(default)]
    pub if_title_found: IfTitleFound,
    #[serde(default)]
    pub wrap_default_export_as_component: bool,
}

/// What to do when the default export object already carries a `title`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfTitleFound {
    #[default]
    Strict,
    Skip,
    Transform,
}

/// How a default export that is not an object literal gets handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonObjectPolicy<'a> {
    Reject,
    /// Move the value to a named export and put a fresh meta object in its place.
    Rename(&'a str),
    /// Keep the value as the meta object's `component`.
    Wrap,
}

impl Config {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rename_default_exports_to: None,
            if_title_found: IfTitleFound::default(),
            wrap_default_export_as_component: false,
        }
    }

    pub fn with_rename_target(mut self, target: impl Into<String>) -> Self {
        self.rename_default_exports_to = Some(target.into());
        self
    }

    pub fn with_if_title_found(mut self, policy: IfTitleFound) -> Self {
        self.if_title_found = policy;
        self
    }

    pub fn with_component_wrapping(mut self) -> Self {
        self.wrap_default_export_as_component = true;
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(target) = &self.rename_default_exports_to {
            if self.wrap_default_export_as_component {
                return Err(ConfigError::ConflictingPolicies);
            }
            if target.is_empty() || Ident::verify_symbol(target).is_err() {
                return Err(ConfigError::InvalidRenameTarget {
                    name: target.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn non_object_policy(&self) -> NonObjectPolicy<'_> {
        match (&self.rename_default_exports_to, self.wrap_default_export_as_component) {
            (Some(target), _) => NonObjectPolicy::Rename(target),
            (None, true) => NonObjectPolicy::Wrap,
            (None, false) => NonObjectPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = Config::from_json(r#"{ "title": "bar" }"#).unwrap();
        assert_eq!(config.title, "bar");
        assert_eq!(config.if_title_found, IfTitleFound::Strict);
        assert_eq!(config.non_object_policy(), NonObjectPolicy::Reject);
    }

    #[test]
    fn parses_camel_case_options() {
        let config = Config::from_json(
            r#"{ "title": "bar", "renameDefaultExportsTo": "Default", "ifTitleFound": "transform" }"#,
        )
        .unwrap();
        assert_eq!(config.if_title_found, IfTitleFound::Transform);
        assert_eq!(config.non_object_policy(), NonObjectPolicy::Rename("Default"));
    }

    #[test]
    fn wrap_policy_from_json() {
        let config =
            Config::from_json(r#"{ "title": "bar", "wrapDefaultExportAsComponent": true }"#).unwrap();
        assert_eq!(config.non_object_policy(), NonObjectPolicy::Wrap);
    }

    #[test]
    fn title_is_required() {
        let err = Config::from_json(r#"{ "ifTitleFound": "skip" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_title_policy() {
        let err = Config::from_json(r#"{ "title": "bar", "ifTitleFound": "merge" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_both_non_object_policies() {
        let err = Config::new("bar")
            .with_rename_target("Default")
            .with_component_wrapping()
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingPolicies));
    }

    #[test]
    fn rejects_invalid_rename_targets() {
        for name in ["class", "", "1Story", "my-story"] {
            let err = Config::new("bar").with_rename_target(name).validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidRenameTarget { .. }),
                "{name} should be rejected"
            );
        }
        assert!(Config::new("bar").with_rename_target("Primary").validate().is_ok());
    }
}
