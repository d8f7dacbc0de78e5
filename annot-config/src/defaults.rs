use annot_core::{AnnotError, Result};
use annot_plugin::{Catalog, GroupRegistry, GroupTag, PluginArguments};
use serde::Serialize;
use std::collections::HashSet;

/// A pre-configured annotation the tool enables by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultAnnotation {
    pub name: String,
    pub arguments: PluginArguments,
}

impl DefaultAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: PluginArguments::new(),
        }
    }

    pub fn with_argument(mut self, argument: &str, value: impl Into<String>) -> Self {
        self.arguments.push(argument, value);
        self
    }
}

/// What the host tool enables when the user says nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolDefaults {
    pub annotations: Vec<DefaultAnnotation>,
    pub groups: Vec<GroupTag>,
}

impl ToolDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotation(mut self, annotation: DefaultAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn group(mut self, tag: impl Into<GroupTag>) -> Self {
        self.groups.push(tag.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.groups.is_empty()
    }

    /// Startup check: every default names a selectable plugin at most once
    /// with well-formed arguments, and every default group is valid.
    pub fn validate(&self, catalog: &Catalog, groups: &GroupRegistry) -> Result<()> {
        let mut seen = HashSet::new();

        for annotation in &self.annotations {
            let class =
                catalog
                    .selectable(&annotation.name)
                    .ok_or_else(|| AnnotError::UnknownPlugin {
                        name: annotation.name.clone(),
                    })?;
            if !seen.insert(annotation.name.as_str()) {
                return Err(AnnotError::Config(format!(
                    "Tool default annotation '{}' is listed more than once",
                    annotation.name
                )));
            }
            class.check_arguments(&annotation.arguments)?;
        }

        groups.validate(&self.groups)
    }
}
