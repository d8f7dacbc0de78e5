use std::collections::BTreeMap;
use std::fmt;

use crate::record::{Genotype, VariantRecord};
use crate::types::Capability;

/// Key/value output of one annotation. Empty when the annotation does not
/// apply to the record.
pub type Attributes = BTreeMap<String, String>;

/// Annotation computed once per record.
pub trait InfoAnnotation: Send + Sync + fmt::Debug {
    fn annotate(&self, record: &VariantRecord) -> Attributes;
}

/// Annotation computed once per sample genotype.
pub trait GenotypeAnnotation: Send + Sync + fmt::Debug {
    fn annotate(&self, record: &VariantRecord, genotype: &Genotype) -> Attributes;
}

/// A runnable annotation produced by a plugin class factory.
#[derive(Debug)]
pub enum Annotator {
    Info(Box<dyn InfoAnnotation>),
    Genotype(Box<dyn GenotypeAnnotation>),
}

impl Annotator {
    pub fn capability(&self) -> Capability {
        match self {
            Annotator::Info(_) => Capability::Info,
            Annotator::Genotype(_) => Capability::Genotype,
        }
    }

    pub fn as_info(&self) -> Option<&dyn InfoAnnotation> {
        match self {
            Annotator::Info(a) => Some(a.as_ref()),
            Annotator::Genotype(_) => None,
        }
    }

    pub fn as_genotype(&self) -> Option<&dyn GenotypeAnnotation> {
        match self {
            Annotator::Genotype(a) => Some(a.as_ref()),
            Annotator::Info(_) => None,
        }
    }
}
