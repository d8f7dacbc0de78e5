use annot_core::{AnnotError, Result};
use std::collections::BTreeSet;
use std::fmt;

use crate::annotation::{Annotator, GenotypeAnnotation, InfoAnnotation};
use crate::types::{ArgumentSpec, Capability, GroupTag, PluginArguments};

pub type InfoFactory = fn(&PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>>;
pub type GenotypeFactory = fn(&PluginArguments) -> anyhow::Result<Box<dyn GenotypeAnnotation>>;

#[derive(Clone, Copy)]
enum ClassKind {
    Info(InfoFactory),
    Genotype(GenotypeFactory),
    /// Classification only; never instantiated.
    Marker,
}

/// A registered annotation plugin: identity, groups, argument schema and
/// factory. Immutable once placed in a [`crate::Catalog`].
#[derive(Clone)]
pub struct PluginClass {
    name: String,
    description: String,
    groups: BTreeSet<GroupTag>,
    arguments: Vec<ArgumentSpec>,
    kind: ClassKind,
}

impl PluginClass {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            groups: BTreeSet::new(),
            arguments: Vec::new(),
            kind,
        }
    }

    pub fn info(name: impl Into<String>, factory: InfoFactory) -> Self {
        Self::with_kind(name, ClassKind::Info(factory))
    }

    pub fn genotype(name: impl Into<String>, factory: GenotypeFactory) -> Self {
        Self::with_kind(name, ClassKind::Genotype(factory))
    }

    pub fn marker(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Marker)
    }

    pub fn in_group(mut self, tag: impl Into<GroupTag>) -> Self {
        self.groups.insert(tag.into());
        self
    }

    pub fn with_argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn groups(&self) -> &BTreeSet<GroupTag> {
        &self.groups
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// `None` for marker classes.
    pub fn capability(&self) -> Option<Capability> {
        match self.kind {
            ClassKind::Info(_) => Some(Capability::Info),
            ClassKind::Genotype(_) => Some(Capability::Genotype),
            ClassKind::Marker => None,
        }
    }

    pub fn is_executable(&self) -> bool {
        !matches!(self.kind, ClassKind::Marker)
    }

    pub fn is_member_of(&self, tag: &str) -> bool {
        self.groups.contains(tag)
    }

    /// Rejects argument names outside the schema and values of the wrong
    /// shape. Required arguments are not checked here.
    pub fn check_arguments(&self, args: &PluginArguments) -> Result<()> {
        for (name, values) in args.iter() {
            let spec = self
                .argument(name)
                .ok_or_else(|| AnnotError::UnknownArgument {
                    plugin: self.name.clone(),
                    argument: name.to_string(),
                })?;
            spec.check(&self.name, values)?;
        }
        Ok(())
    }

    /// First required argument with no value in `args`.
    pub fn missing_required<'a>(&'a self, args: &PluginArguments) -> Option<&'a ArgumentSpec> {
        self.arguments
            .iter()
            .find(|spec| spec.required && !args.contains(&spec.name))
    }

    /// Builds a runnable instance configured with `args`.
    pub fn instantiate(&self, args: &PluginArguments) -> Result<Annotator> {
        let built = match self.kind {
            ClassKind::Info(factory) => factory(args).map(Annotator::Info),
            ClassKind::Genotype(factory) => factory(args).map(Annotator::Genotype),
            ClassKind::Marker => {
                return Err(AnnotError::PluginConstruction {
                    plugin: self.name.clone(),
                    reason: "classification marker cannot be instantiated".to_string(),
                })
            }
        };

        built.map_err(|e| AnnotError::PluginConstruction {
            plugin: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for PluginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginClass")
            .field("name", &self.name)
            .field("capability", &self.capability())
            .field("groups", &self.groups)
            .field("arguments", &self.arguments)
            .finish()
    }
}
