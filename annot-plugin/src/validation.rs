use std::collections::HashSet;
use std::fmt;

use crate::class::PluginClass;
use crate::types::ArgumentKind;

/// Validation error with actionable fix suggestion
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub fix_suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            fix_suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.fix_suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(fix) = &self.fix_suggestion {
            write!(f, " ({})", fix)?;
        }
        Ok(())
    }
}

/// Result of plugin class validation
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// All errors joined on one line.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validate a plugin class's metadata and argument schema before it is
/// registered.
pub fn validate_class(class: &PluginClass) -> ValidationResult {
    let mut result = ValidationResult::new();

    validate_name(class, &mut result);
    validate_groups(class, &mut result);
    validate_arguments(class, &mut result);

    if class.is_executable() && class.description().is_empty() {
        result.add_warning(format!("Annotation '{}' has no description", class.name()));
    }

    result
}

fn validate_name(class: &PluginClass, result: &mut ValidationResult) {
    if class.name().is_empty() {
        result.add_error(
            ValidationError::new("name", "Annotation name cannot be empty")
                .with_suggestion("Use the display name users pass to --annotation"),
        );
    } else if !is_identifier(class.name()) {
        result.add_error(
            ValidationError::new(
                "name",
                format!("Annotation name '{}' contains invalid characters", class.name()),
            )
            .with_suggestion("Use only alphanumeric characters, hyphens, and underscores"),
        );
    }
}

fn validate_groups(class: &PluginClass, result: &mut ValidationResult) {
    for group in class.groups() {
        if !is_identifier(group.as_str()) {
            result.add_error(
                ValidationError::new(
                    "groups",
                    format!("Group tag '{}' contains invalid characters", group),
                )
                .with_suggestion("Use only alphanumeric characters, hyphens, and underscores"),
            );
        }
        if group.as_str() == class.name() {
            result.add_error(ValidationError::new(
                "groups",
                format!("Annotation '{}' cannot be a member of itself", class.name()),
            ));
        }
    }
}

/// Long flags the host command line already owns. A plugin argument with one
/// of these names would be unreachable, or would swallow the host flag.
pub const RESERVED_ARGUMENT_NAMES: &[&str] = &[
    "annotation",
    "annotation-group",
    "annotationsToExclude",
    "debug",
    "disable-tool-default-annotations",
    "format",
    "help",
    "profile",
    "record",
    "version",
];

fn validate_arguments(class: &PluginClass, result: &mut ValidationResult) {
    let mut seen = HashSet::new();

    for spec in class.arguments() {
        if !is_identifier(&spec.name) {
            result.add_error(
                ValidationError::new(
                    "arguments",
                    format!("Argument name '{}' contains invalid characters", spec.name),
                )
                .with_suggestion("Argument names become --flags; keep them to [A-Za-z0-9_-]"),
            );
        }

        if RESERVED_ARGUMENT_NAMES.contains(&spec.name.as_str()) {
            result.add_error(
                ValidationError::new(
                    "arguments",
                    format!("Argument name '--{}' is reserved by the host tool", spec.name),
                )
                .with_suggestion("Prefix the argument with the annotation name"),
            );
        }

        if !seen.insert(spec.name.as_str()) {
            result.add_error(ValidationError::new(
                "arguments",
                format!("Argument '{}' is declared twice", spec.name),
            ));
        }

        if spec.kind == ArgumentKind::Flag && spec.required {
            result.add_warning(format!(
                "Required flag '--{}' on '{}' can only ever be true",
                spec.name,
                class.name()
            ));
        }
    }

    if !class.is_executable() && !class.arguments().is_empty() {
        result.add_error(ValidationError::new(
            "arguments",
            format!("Marker '{}' cannot declare arguments", class.name()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Attributes, InfoAnnotation};
    use crate::record::VariantRecord;
    use crate::types::{ArgumentSpec, PluginArguments};

    #[derive(Debug)]
    struct Noop;

    impl InfoAnnotation for Noop {
        fn annotate(&self, _record: &VariantRecord) -> Attributes {
            Attributes::new()
        }
    }

    fn noop(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
        Ok(Box::new(Noop))
    }

    #[test]
    fn test_valid_class() {
        let class = PluginClass::info("Coverage", noop)
            .describe("Read depth")
            .in_group("StandardAnnotation");
        let result = validate_class(&class);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_name() {
        let class = PluginClass::info("Bad Name", noop);
        let result = validate_class(&class);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_duplicate_argument_in_one_class() {
        let class = PluginClass::info("Dup", noop)
            .describe("x")
            .with_argument(ArgumentSpec::optional("a", ArgumentKind::Text))
            .with_argument(ArgumentSpec::optional("a", ArgumentKind::Integer));
        let result = validate_class(&class);
        assert!(!result.is_valid);
        assert!(result.summary().contains("declared twice"));
    }

    #[test]
    fn test_host_flag_names_are_reserved() {
        for name in ["profile", "format", "debug", "record", "annotation"] {
            let class = PluginClass::info("Shadow", noop)
                .describe("x")
                .with_argument(ArgumentSpec::optional(name, ArgumentKind::Text));
            let result = validate_class(&class);
            assert!(!result.is_valid, "--{name} must be rejected");
            assert!(result.summary().contains("reserved"));
        }
    }

    #[test]
    fn test_self_membership_rejected() {
        let class = PluginClass::info("Loop", noop).describe("x").in_group("Loop");
        assert!(!validate_class(&class).is_valid);
    }

    #[test]
    fn test_missing_description_is_only_a_warning() {
        let result = validate_class(&PluginClass::info("Quiet", noop));
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
