use annot_core::{AnnotError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Classification label shared by any number of plugin classes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupTag(String);

impl GroupTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GroupTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for GroupTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// What an executable plugin annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// One set of attributes per record.
    Info,
    /// One set of attributes per sample genotype.
    Genotype,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Info => f.write_str("info"),
            Capability::Genotype => f.write_str("genotype"),
        }
    }
}

/// Value type accepted by a plugin argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    Flag,
    Integer,
    Float,
    Text,
}

impl ArgumentKind {
    fn expected(&self) -> &'static str {
        match self {
            ArgumentKind::Flag => "true or false",
            ArgumentKind::Integer => "an integer",
            ArgumentKind::Float => "a number",
            ArgumentKind::Text => "text",
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            ArgumentKind::Flag => matches!(value, "true" | "false"),
            ArgumentKind::Integer => value.parse::<i64>().is_ok(),
            ArgumentKind::Float => value.parse::<f64>().map(f64::is_finite).unwrap_or(false),
            ArgumentKind::Text => true,
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArgumentKind::Flag => "flag",
            ArgumentKind::Integer => "int",
            ArgumentKind::Float => "float",
            ArgumentKind::Text => "text",
        };
        f.write_str(s)
    }
}

/// One entry of a plugin's argument schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgumentKind,
    pub required: bool,
    pub multiple: bool,
    pub description: String,
}

impl ArgumentSpec {
    pub fn optional(name: impl Into<String>, kind: ArgumentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            multiple: false,
            description: String::new(),
        }
    }

    pub fn required(name: impl Into<String>, kind: ArgumentKind) -> Self {
        Self {
            required: true,
            ..Self::optional(name, kind)
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the values collected for this argument on `plugin`.
    pub fn check(&self, plugin: &str, values: &[String]) -> Result<()> {
        if !self.multiple && values.len() > 1 {
            return Err(AnnotError::InvalidArgumentValue {
                plugin: plugin.to_string(),
                argument: self.name.clone(),
                value: values.join(","),
                expected: "a single value".to_string(),
            });
        }

        if let Some(bad) = values.iter().find(|v| !self.kind.accepts(v)) {
            return Err(AnnotError::InvalidArgumentValue {
                plugin: plugin.to_string(),
                argument: self.name.clone(),
                value: bad.clone(),
                expected: self.kind.expected().to_string(),
            });
        }

        Ok(())
    }
}

/// Argument values bound to one plugin instance, keyed by argument name.
///
/// Values stay as the strings the CLI layer produced; the schema has already
/// checked that they parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginArguments(IndexMap<String, Vec<String>>);

impl PluginArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| !v.is_empty())
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// A flag is on when given without `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.values(name).iter().any(|v| v != "false")
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.first(name).and_then(|v| v.parse().ok())
    }

    pub fn parse_all<T: FromStr>(&self, name: &str) -> Vec<T> {
        self.values(name)
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Replaces every value of `name`.
    pub fn set(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keys sorted and each value list sorted and deduplicated, so that two
    /// argument maps built in different orders compare and print identically.
    /// Values of a repeatable argument form a set.
    pub fn normalized(mut self) -> Self {
        self.0.sort_keys();
        for values in self.0.values_mut() {
            values.sort();
            values.dedup();
        }
        self
    }
}

impl fmt::Display for PluginArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, values) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", name, values.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_kind_validation() {
        let spec = ArgumentSpec::optional("minDepth", ArgumentKind::Integer);
        assert!(spec.check("Coverage", &["10".to_string()]).is_ok());

        let err = spec
            .check("Coverage", &["ten".to_string()])
            .expect_err("non-integer must be rejected");
        assert!(matches!(err, AnnotError::InvalidArgumentValue { ref value, .. } if value == "ten"));
    }

    #[test]
    fn test_single_valued_argument_rejects_repeats() {
        let spec = ArgumentSpec::optional("threshold", ArgumentKind::Float);
        let err = spec
            .check("X", &["0.1".to_string(), "0.2".to_string()])
            .expect_err("two values for a single-valued argument");
        assert!(matches!(err, AnnotError::InvalidArgumentValue { ref expected, .. } if expected == "a single value"));

        let many = ArgumentSpec::optional("founderID", ArgumentKind::Text).multiple();
        assert!(many.check("X", &["s1".to_string(), "s2".to_string()]).is_ok());
    }

    #[test]
    fn test_float_rejects_nan() {
        let spec = ArgumentSpec::optional("threshold", ArgumentKind::Float);
        assert!(spec.check("X", &["NaN".to_string()]).is_err());
        assert!(spec.check("X", &["1e-3".to_string()]).is_ok());
    }

    #[test]
    fn test_plugin_arguments_accessors() {
        let mut args = PluginArguments::new();
        args.push("founderID", "s1");
        args.push("founderID", "s2");
        args.push("strict", "true");
        args.push("minDepth", "7");

        assert_eq!(args.values("founderID"), &["s1".to_string(), "s2".to_string()]);
        assert!(args.flag("strict"));
        assert!(!args.flag("missing"));
        assert_eq!(args.parse::<u32>("minDepth"), Some(7));
        assert!(args.values("missing").is_empty());

        args.set("founderID", vec!["s9".to_string()]);
        assert_eq!(args.first("founderID"), Some("s9"));
    }

    #[test]
    fn test_normalized_ignores_insertion_order() {
        let mut a = PluginArguments::new();
        a.push("x", "1");
        a.push("y", "2");
        let mut b = PluginArguments::new();
        b.push("y", "2");
        b.push("x", "1");

        assert_eq!(a.normalized().to_string(), b.normalized().to_string());
    }

    #[test]
    fn test_normalized_treats_repeated_values_as_a_set() {
        let mut a = PluginArguments::new();
        a.push("founderID", "s2");
        a.push("founderID", "s1");
        a.push("founderID", "s2");
        let mut b = PluginArguments::new();
        b.push("founderID", "s1");
        b.push("founderID", "s2");

        let (a, b) = (a.normalized(), b.normalized());
        assert_eq!(a, b);
        assert_eq!(a.values("founderID"), ["s1", "s2"]);
        assert_eq!(a.to_string(), "founderID=s1,s2");
    }

    #[test]
    fn test_deserialize_arguments_from_yaml() {
        let yaml = r#"
founderID:
  - s1
  - s2
"#;
        let args: PluginArguments =
            serde_yaml_ng::from_str(yaml).expect("should deserialize arguments");
        assert_eq!(args.values("founderID").len(), 2);
    }
}
