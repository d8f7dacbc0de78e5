use annot_core::{AnnotError, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::catalog::Catalog;
use crate::types::GroupTag;

/// Tag every annotation implicitly carries; requesting it would enable the
/// whole catalog, so it is never a valid group.
pub const ROOT_GROUP: &str = "Annotation";

/// Group tag -> executable member names, derived from a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    members: BTreeMap<GroupTag, Vec<String>>,
    /// Tags carried only by classification markers.
    marker_only: BTreeSet<GroupTag>,
    plugin_names: HashSet<String>,
    selectable: Option<BTreeSet<GroupTag>>,
}

impl GroupRegistry {
    /// Indexes the catalog's group tags. Fails when a plugin carries a tag
    /// that can never be valid: the root tag, or another plugin's name.
    pub fn build(catalog: &Catalog) -> Result<Self> {
        let plugin_names: HashSet<String> =
            catalog.classes().map(|c| c.name().to_string()).collect();
        let mut members: BTreeMap<GroupTag, Vec<String>> = BTreeMap::new();
        let mut tagged_by_marker = BTreeSet::new();

        for class in catalog.classes() {
            for tag in class.groups() {
                if tag.as_str() == ROOT_GROUP {
                    return Err(AnnotError::InvalidGroup {
                        group: tag.to_string(),
                        reason: format!(
                            "'{}' is reserved and cannot be declared by '{}'",
                            ROOT_GROUP,
                            class.name()
                        ),
                    });
                }
                if plugin_names.contains(tag.as_str()) {
                    return Err(AnnotError::InvalidGroup {
                        group: tag.to_string(),
                        reason: format!(
                            "declared by '{}' but it is also the name of an annotation",
                            class.name()
                        ),
                    });
                }

                if class.is_executable() {
                    members
                        .entry(tag.clone())
                        .or_default()
                        .push(class.name().to_string());
                } else {
                    tagged_by_marker.insert(tag.clone());
                }
            }
        }

        let marker_only = tagged_by_marker
            .into_iter()
            .filter(|tag| !members.contains_key(tag))
            .collect();

        Ok(Self {
            members,
            marker_only,
            plugin_names,
            selectable: None,
        })
    }

    /// Limits which groups may be requested, by the tool's defaults or by
    /// the user.
    pub fn restrict(mut self, allowed: impl IntoIterator<Item = GroupTag>) -> Self {
        self.selectable = Some(allowed.into_iter().collect());
        self
    }

    pub fn restriction(&self) -> Option<&BTreeSet<GroupTag>> {
        self.selectable.as_ref()
    }

    /// Executable member names of `tag`, in catalog order. Empty for
    /// unknown tags.
    pub fn members(&self, tag: &str) -> &[String] {
        self.members.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tags(&self) -> impl Iterator<Item = &GroupTag> {
        self.members.keys()
    }

    /// Checks one requested tag and returns its members.
    pub fn check(&self, tag: &GroupTag) -> Result<&[String]> {
        let invalid = |reason: String| AnnotError::InvalidGroup {
            group: tag.to_string(),
            reason,
        };

        if tag.as_str() == ROOT_GROUP {
            return Err(invalid(
                "the root classification covers every annotation and cannot be requested"
                    .to_string(),
            ));
        }
        if self.plugin_names.contains(tag.as_str()) {
            return Err(invalid(format!(
                "'{}' is an annotation, not a group; use --annotation {}",
                tag, tag
            )));
        }
        if self.marker_only.contains(tag) {
            return Err(invalid(
                "its only members are classification markers".to_string(),
            ));
        }

        let members = self.members(tag.as_str());
        if members.is_empty() {
            return Err(invalid("no annotation belongs to this group".to_string()));
        }

        if let Some(allowed) = &self.selectable {
            if !allowed.contains(tag) {
                let allowed: Vec<&str> = allowed.iter().map(GroupTag::as_str).collect();
                return Err(invalid(format!(
                    "not selectable by this tool (allowed: {})",
                    allowed.join(", ")
                )));
            }
        }

        Ok(members)
    }

    /// Validates a list of requested tags, stopping at the first bad one.
    pub fn validate<'a>(&self, tags: impl IntoIterator<Item = &'a GroupTag>) -> Result<()> {
        for tag in tags {
            self.check(tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Attributes, InfoAnnotation};
    use crate::class::PluginClass;
    use crate::record::VariantRecord;
    use crate::types::PluginArguments;

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

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for class in [
            PluginClass::info("Coverage", noop)
                .in_group("Standard")
                .in_group("StandardHC"),
            PluginClass::info("RMSMappingQuality", noop).in_group("Standard"),
            PluginClass::info("Lonely", noop),
            PluginClass::marker("Reducible").in_group("ReducibleGroup"),
        ] {
            catalog.register(class).expect("test class should register");
        }
        catalog
    }

    #[test]
    fn test_members_follow_catalog_order() -> Result<()> {
        let groups = GroupRegistry::build(&catalog())?;
        assert_eq!(groups.members("Standard"), ["Coverage", "RMSMappingQuality"]);
        assert_eq!(groups.members("StandardHC"), ["Coverage"]);
        assert!(groups.members("Nope").is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_requested_groups() -> Result<()> {
        let groups = GroupRegistry::build(&catalog())?;

        for bad in ["RMSMappingQuality", ROOT_GROUP, "Object", "ReducibleGroup"] {
            let err = groups.check(&GroupTag::from(bad)).expect_err(bad);
            assert!(matches!(err, AnnotError::InvalidGroup { .. }), "{bad}");
        }
        assert!(groups.validate(&[GroupTag::from("Standard")]).is_ok());
        Ok(())
    }

    #[test]
    fn test_restriction() -> Result<()> {
        let groups = GroupRegistry::build(&catalog())?.restrict([GroupTag::from("StandardHC")]);
        assert!(groups.check(&GroupTag::from("StandardHC")).is_ok());
        let err = groups
            .check(&GroupTag::from("Standard"))
            .expect_err("outside restriction");
        assert!(err.to_string().contains("not selectable"));
        Ok(())
    }

    #[test]
    fn test_declaring_root_group_is_fatal() {
        let catalog = Catalog::new()
            .with(PluginClass::info("Everything", noop).in_group(ROOT_GROUP))
            .expect("registration does not know about groups");
        assert!(GroupRegistry::build(&catalog).is_err());
    }

    #[test]
    fn test_tag_naming_a_plugin_is_fatal() {
        let catalog = Catalog::new()
            .with(PluginClass::info("Coverage", noop))
            .and_then(|c| c.with(PluginClass::info("Other", noop).in_group("Coverage")))
            .expect("catalog builds");
        let err = GroupRegistry::build(&catalog).expect_err("tag collides with plugin");
        assert!(err.to_string().contains("also the name of an annotation"));
    }
}
