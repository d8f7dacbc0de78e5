use annot_plugin::GroupTag;
use serde::Serialize;

/// One user request about which annotations to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Directive {
    IncludeByName(String),
    ExcludeByName(String),
    IncludeByGroup(GroupTag),
    DisableToolDefaults,
}

/// A plugin-specific argument value, routed by plugin display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationArgument {
    pub plugin: String,
    pub argument: String,
    pub value: String,
}

impl ConfigurationArgument {
    pub fn new(
        plugin: impl Into<String>,
        argument: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            argument: argument.into(),
            value: value.into(),
        }
    }
}

/// Everything the user asked for in one invocation.
///
/// Directives of different kinds are applied in a fixed precedence order by
/// the resolver; the order within one kind has no effect on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Directives {
    directives: Vec<Directive>,
    arguments: Vec<ConfigurationArgument>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, name: impl Into<String>) -> Self {
        self.directives.push(Directive::IncludeByName(name.into()));
        self
    }

    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.directives.push(Directive::ExcludeByName(name.into()));
        self
    }

    pub fn include_group(mut self, tag: impl Into<GroupTag>) -> Self {
        self.directives.push(Directive::IncludeByGroup(tag.into()));
        self
    }

    pub fn disable_tool_defaults(mut self) -> Self {
        self.directives.push(Directive::DisableToolDefaults);
        self
    }

    pub fn argument(
        mut self,
        plugin: impl Into<String>,
        argument: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.arguments
            .push(ConfigurationArgument::new(plugin, argument, value));
        self
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn push_argument(&mut self, argument: ConfigurationArgument) {
        self.arguments.push(argument);
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn arguments(&self) -> &[ConfigurationArgument] {
        &self.arguments
    }

    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            Directive::IncludeByName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            Directive::ExcludeByName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupTag> {
        self.directives.iter().filter_map(|d| match d {
            Directive::IncludeByGroup(tag) => Some(tag),
            _ => None,
        })
    }

    pub fn defaults_disabled(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d, Directive::DisableToolDefaults))
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.arguments.is_empty()
    }
}
