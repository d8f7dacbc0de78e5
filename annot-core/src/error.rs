use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotError {
    /// `-A NAME` names nothing selectable in the catalog.
    UnknownPlugin { name: String },
    /// `-AX NAME` names nothing selectable in the catalog.
    UnknownExcludedPlugin { name: String },
    DuplicateExplicitInclusion { name: String },
    /// An argument was supplied for a plugin that does not end up enabled.
    DanglingArgument { plugin: String, argument: String },
    MissingRequiredArgument { plugin: String, argument: String },
    UnknownArgument { plugin: String, argument: String },
    InvalidArgumentValue {
        plugin: String,
        argument: String,
        value: String,
        expected: String,
    },
    InvalidGroup { group: String, reason: String },
    DuplicatePlugin { name: String },
    DuplicateArgumentName {
        argument: String,
        first: String,
        second: String,
    },
    PluginConstruction { plugin: String, reason: String },
    Config(String),
    Serialization(String),
    Other(#[from] anyhow::Error),
}

impl AnnotError {
    /// Short machine-readable category, used for structured output.
    pub fn category(&self) -> &'static str {
        match self {
            AnnotError::UnknownPlugin { .. } | AnnotError::UnknownExcludedPlugin { .. } => {
                "unknown_plugin"
            }
            AnnotError::DuplicateExplicitInclusion { .. } => "duplicate_explicit_inclusion",
            AnnotError::DanglingArgument { .. } => "dangling_argument",
            AnnotError::MissingRequiredArgument { .. } => "missing_required_argument",
            AnnotError::UnknownArgument { .. } => "unknown_argument",
            AnnotError::InvalidArgumentValue { .. } => "invalid_argument_value",
            AnnotError::InvalidGroup { .. } => "invalid_group",
            AnnotError::DuplicatePlugin { .. } => "duplicate_plugin",
            AnnotError::DuplicateArgumentName { .. } => "duplicate_argument_name",
            AnnotError::PluginConstruction { .. } => "plugin_construction",
            AnnotError::Config(_) => "config",
            AnnotError::Serialization(_) => "serialization",
            AnnotError::Other(_) => "other",
        }
    }
}

impl Display for AnnotError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AnnotError::UnknownPlugin { name } => {
                writeln!(f, "Unknown annotation '{}'\n", name)?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Run: annot list")
            }
            AnnotError::UnknownExcludedPlugin { name } => {
                writeln!(f, "Cannot exclude unknown annotation '{}'\n", name)?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Check the spelling of --annotationsToExclude {}", name)
            }
            AnnotError::DuplicateExplicitInclusion { name } => write!(
                f,
                "Annotation '{}' was requested more than once with --annotation",
                name
            ),
            AnnotError::DanglingArgument { plugin, argument } => {
                writeln!(
                    f,
                    "Argument '--{}' was supplied but annotation '{}' is not enabled\n",
                    argument, plugin
                )?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Enable it: --annotation {}\n", plugin)?;
                write!(f, "  • Or drop --{}", argument)
            }
            AnnotError::MissingRequiredArgument { plugin, argument } => write!(
                f,
                "Annotation '{}' is enabled but its required argument '--{}' was not supplied",
                plugin, argument
            ),
            AnnotError::UnknownArgument { plugin, argument } => write!(
                f,
                "Annotation '{}' does not declare an argument named '{}'",
                plugin, argument
            ),
            AnnotError::InvalidArgumentValue {
                plugin,
                argument,
                value,
                expected,
            } => write!(
                f,
                "Invalid value '{}' for '--{}' of annotation '{}': expected {}",
                value, argument, plugin, expected
            ),
            AnnotError::InvalidGroup { group, reason } => {
                write!(f, "Invalid annotation group '{}': {}", group, reason)
            }
            AnnotError::DuplicatePlugin { name } => {
                write!(f, "Annotation '{}' is registered more than once", name)
            }
            AnnotError::DuplicateArgumentName {
                argument,
                first,
                second,
            } => write!(
                f,
                "Argument '--{}' is declared by both '{}' and '{}'",
                argument, first, second
            ),
            AnnotError::PluginConstruction { plugin, reason } => {
                write!(f, "Failed to construct annotation '{}': {}", plugin, reason)
            }
            AnnotError::Config(s) => write!(f, "Configuration error: {}", s),
            AnnotError::Serialization(s) => write!(f, "Serialization error: {}", s),
            AnnotError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_yaml_ng::Error> for AnnotError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        AnnotError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for AnnotError {
    fn from(err: serde_json::Error) -> Self {
        AnnotError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnnotError>;
