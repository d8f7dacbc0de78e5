use annot_core::{AnnotError, Result};
use annot_plugin::{Catalog, GroupTag, PluginArguments};
use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::context::ResolutionContext;
use crate::defaults::{DefaultAnnotation, ToolDefaults};
use crate::embedded_profiles;

/// Argument values exactly as written in YAML.
///
/// `founderID: [s1, s2]` keeps the text of every list element, so `007` and
/// `1.10` stay `"007"` and `"1.10"`. A single unlisted value must be text or
/// a boolean; numbers have to be quoted or listed to keep their spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileValues(Vec<String>);

impl ProfileValues {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ProfileValues {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = ProfileValues;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, a boolean, or a list of values")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProfileValues(vec![value.to_string()]))
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProfileValues(vec![value.to_string()]))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(unlisted_number(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(unlisted_number(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(unlisted_number(value))
            }

            // List elements are read as strings, which keeps the scalar text.
            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element::<String>()? {
                    values.push(value);
                }
                Ok(ProfileValues(values))
            }
        }

        deserializer.deserialize_any(ValuesVisitor)
    }
}

fn unlisted_number<E: de::Error>(value: impl fmt::Display) -> E {
    E::custom(format!(
        "numeric argument value {} must be quoted or written as a list, e.g. [{}]",
        value, value
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnnotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub arguments: IndexMap<String, ProfileValues>,
}

/// A named tool default configuration, as shipped in the embedded profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub annotations: Vec<ProfileAnnotation>,
    #[serde(default)]
    pub groups: Vec<GroupTag>,
    /// When present, only these groups may be requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable_groups: Option<Vec<GroupTag>>,
}

impl ToolProfile {
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Loads one of the embedded profiles by name.
    pub fn load(name: &str) -> Result<Self> {
        let content = embedded_profiles::get_profile_content(name).ok_or_else(|| {
            AnnotError::Config(format!(
                "Unknown profile '{}' (available: {})",
                name,
                embedded_profiles::get_profile_names().join(", ")
            ))
        })?;
        Self::parse(content)
    }

    pub fn to_defaults(&self) -> ToolDefaults {
        let annotations = self
            .annotations
            .iter()
            .map(|annotation| {
                let mut arguments = PluginArguments::new();
                for (name, values) in &annotation.arguments {
                    arguments.set(name.clone(), values.as_slice().to_vec());
                }
                DefaultAnnotation {
                    name: annotation.name.clone(),
                    arguments,
                }
            })
            .collect();

        ToolDefaults {
            annotations,
            groups: self.groups.clone(),
        }
    }

    /// Validates the profile against `catalog` and returns a context ready
    /// to resolve user directives.
    pub fn into_context(self, catalog: &Catalog) -> Result<ResolutionContext<'_>> {
        let defaults = self.to_defaults();
        match self.selectable_groups {
            Some(allowed) => ResolutionContext::restricted(catalog, defaults, allowed),
            None => ResolutionContext::new(catalog, defaults),
        }
    }
}
