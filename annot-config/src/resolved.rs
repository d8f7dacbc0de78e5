use annot_plugin::{
    Annotator, Attributes, Capability, GenotypeAnnotation, GroupTag, InfoAnnotation,
    PluginArguments, VariantRecord,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// How a plugin got into the resolved set. Informational only: two sets
/// with the same members and configuration are equal whatever the origins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "group", rename_all = "snake_case")]
pub enum Origin {
    ToolDefault,
    DefaultGroup(GroupTag),
    UserGroup(GroupTag),
    Explicit,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::ToolDefault => f.write_str("tool default"),
            Origin::DefaultGroup(tag) => write!(f, "default group {}", tag),
            Origin::UserGroup(tag) => write!(f, "group {}", tag),
            Origin::Explicit => f.write_str("--annotation"),
        }
    }
}

/// A configured, runnable annotation.
#[derive(Debug)]
pub struct PluginInstance {
    name: String,
    arguments: PluginArguments,
    origin: Origin,
    annotator: Annotator,
}

impl PluginInstance {
    pub(crate) fn new(
        name: String,
        arguments: PluginArguments,
        origin: Origin,
        annotator: Annotator,
    ) -> Self {
        Self {
            name,
            arguments,
            origin,
            annotator,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &PluginArguments {
        &self.arguments
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn capability(&self) -> Capability {
        self.annotator.capability()
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    pub fn summary(&self) -> InstanceSummary {
        InstanceSummary {
            name: self.name.clone(),
            capability: self.capability(),
            origin: self.origin.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

/// Serializable view of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSummary {
    pub name: String,
    pub capability: Capability,
    pub origin: Origin,
    pub arguments: PluginArguments,
}

/// Output of applying a resolved set to one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotatedRecord {
    pub info: Attributes,
    pub genotypes: BTreeMap<String, Attributes>,
}

/// The final annotation set, sorted by display name. Built once by the
/// resolver and never modified afterwards.
#[derive(Debug, Default)]
pub struct ResolvedSet {
    instances: IndexMap<String, PluginInstance>,
}

impl ResolvedSet {
    pub(crate) fn from_instances(instances: impl IntoIterator<Item = PluginInstance>) -> Self {
        let mut map: IndexMap<String, PluginInstance> = instances
            .into_iter()
            .map(|instance| (instance.name.clone(), instance))
            .collect();
        map.sort_keys();
        Self { instances: map }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PluginInstance> {
        self.instances.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginInstance> {
        self.instances.values()
    }

    /// Per-record partition.
    pub fn info_annotations(&self) -> impl Iterator<Item = (&str, &dyn InfoAnnotation)> {
        self.iter()
            .filter_map(|i| i.annotator.as_info().map(|a| (i.name(), a)))
    }

    /// Per-genotype partition.
    pub fn genotype_annotations(&self) -> impl Iterator<Item = (&str, &dyn GenotypeAnnotation)> {
        self.iter()
            .filter_map(|i| i.annotator.as_genotype().map(|a| (i.name(), a)))
    }

    /// Runs every annotation over `record`. Later annotations win when two
    /// write the same key; the set is name-sorted so this is deterministic.
    pub fn annotate(&self, record: &VariantRecord) -> AnnotatedRecord {
        let mut out = AnnotatedRecord::default();

        for (_, annotation) in self.info_annotations() {
            out.info.extend(annotation.annotate(record));
        }

        for genotype in &record.genotypes {
            let mut attributes = Attributes::new();
            for (_, annotation) in self.genotype_annotations() {
                attributes.extend(annotation.annotate(record, genotype));
            }
            if !attributes.is_empty() {
                out.genotypes.insert(genotype.sample.clone(), attributes);
            }
        }

        out
    }

    pub fn summary(&self) -> Vec<InstanceSummary> {
        self.iter().map(PluginInstance::summary).collect()
    }

    pub fn into_instances(self) -> impl Iterator<Item = PluginInstance> {
        self.instances.into_values()
    }
}

impl PartialEq for ResolvedSet {
    /// Same members with the same configuration.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|mine| {
                other
                    .get(mine.name())
                    .is_some_and(|theirs| theirs.arguments == mine.arguments)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annot_plugin::{Allele, Genotype};

    #[derive(Debug)]
    struct Fixed(&'static str, &'static str);

    impl InfoAnnotation for Fixed {
        fn annotate(&self, _record: &VariantRecord) -> Attributes {
            Attributes::from([(self.0.to_string(), self.1.to_string())])
        }
    }

    #[derive(Debug)]
    struct SampleName;

    impl GenotypeAnnotation for SampleName {
        fn annotate(&self, _record: &VariantRecord, genotype: &Genotype) -> Attributes {
            Attributes::from([("SN".to_string(), genotype.sample.clone())])
        }
    }

    fn instance(name: &str, annotator: Annotator) -> PluginInstance {
        PluginInstance::new(
            name.to_string(),
            PluginArguments::new(),
            Origin::Explicit,
            annotator,
        )
    }

    fn set() -> ResolvedSet {
        ResolvedSet::from_instances([
            instance("Zeta", Annotator::Info(Box::new(Fixed("Z", "1")))),
            instance("Alpha", Annotator::Info(Box::new(Fixed("A", "2")))),
            instance("Sample", Annotator::Genotype(Box::new(SampleName))),
        ])
    }

    #[test]
    fn test_sorted_and_partitioned() {
        let set = set();
        assert_eq!(set.names().collect::<Vec<_>>(), ["Alpha", "Sample", "Zeta"]);
        assert_eq!(set.info_annotations().count(), 2);
        assert_eq!(
            set.genotype_annotations().map(|(n, _)| n).collect::<Vec<_>>(),
            ["Sample"]
        );
    }

    #[test]
    fn test_annotate_record() {
        let record = VariantRecord::new("1", 1, vec![Allele::reference("A")]).with_genotypes(vec![
            Genotype::new("s1", vec![Allele::reference("A"), Allele::reference("A")]),
        ]);
        let out = set().annotate(&record);
        assert_eq!(out.info.len(), 2);
        assert_eq!(out.genotypes["s1"]["SN"], "s1");
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = set();
        let b = ResolvedSet::from_instances([
            PluginInstance::new(
                "Alpha".to_string(),
                PluginArguments::new(),
                Origin::ToolDefault,
                Annotator::Info(Box::new(Fixed("A", "2"))),
            ),
            instance("Sample", Annotator::Genotype(Box::new(SampleName))),
            instance("Zeta", Annotator::Info(Box::new(Fixed("Z", "1")))),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, ResolvedSet::default());
    }

    #[test]
    fn test_origin_serialization() {
        let json = serde_json::to_value(Origin::UserGroup(GroupTag::from("StandardAnnotation")))
            .expect("origin serializes");
        assert_eq!(json["source"], "user_group");
        assert_eq!(json["group"], "StandardAnnotation");
    }
}
