//! Minimal in-memory variant record handed to annotations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allele {
    pub bases: String,
    pub reference: bool,
}

impl Allele {
    pub fn reference(bases: impl Into<String>) -> Self {
        Self {
            bases: bases.into(),
            reference: true,
        }
    }

    pub fn alternate(bases: impl Into<String>) -> Self {
        Self {
            bases: bases.into(),
            reference: false,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    pub sample: String,
    pub alleles: Vec<Allele>,
    /// Phred-scaled genotype likelihoods in VCF `PL` order.
    #[serde(default)]
    pub likelihoods: Option<Vec<u32>>,
    #[serde(default)]
    pub allele_depths: Option<Vec<u32>>,
}

impl Genotype {
    pub fn new(sample: impl Into<String>, alleles: Vec<Allele>) -> Self {
        Self {
            sample: sample.into(),
            alleles,
            likelihoods: None,
            allele_depths: None,
        }
    }

    pub fn with_likelihoods(mut self, pl: Vec<u32>) -> Self {
        self.likelihoods = Some(pl);
        self
    }

    pub fn with_allele_depths(mut self, ad: Vec<u32>) -> Self {
        self.allele_depths = Some(ad);
        self
    }

    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_called(&self) -> bool {
        !self.alleles.is_empty()
    }

    pub fn is_het(&self) -> bool {
        self.alleles.windows(2).any(|w| w[0] != w[1])
    }

    /// Heterozygous with no reference allele, e.g. `T/C` at an `A` site.
    pub fn is_het_non_ref(&self) -> bool {
        self.is_het() && self.alleles.iter().all(|a| !a.is_reference())
    }
}

/// Per-read evidence used by the rank-sum and mapping-quality annotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadEvidence {
    pub supports_reference: bool,
    pub base_quality: u8,
    pub mapping_quality: u8,
    pub clipped_bases: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub contig: String,
    pub position: u64,
    pub alleles: Vec<Allele>,
    #[serde(default)]
    pub genotypes: Vec<Genotype>,
    #[serde(default)]
    pub reads: Vec<ReadEvidence>,
}

impl VariantRecord {
    pub fn new(contig: impl Into<String>, position: u64, alleles: Vec<Allele>) -> Self {
        Self {
            contig: contig.into(),
            position,
            alleles,
            genotypes: Vec::new(),
            reads: Vec::new(),
        }
    }

    pub fn with_genotypes(mut self, genotypes: Vec<Genotype>) -> Self {
        self.genotypes = genotypes;
        self
    }

    pub fn with_reads(mut self, reads: Vec<ReadEvidence>) -> Self {
        self.reads = reads;
        self
    }

    pub fn allele_index(&self, allele: &Allele) -> Option<usize> {
        self.alleles.iter().position(|a| a == allele)
    }

    pub fn is_biallelic(&self) -> bool {
        self.alleles.len() == 2
    }

    /// Indices of the `ref/ref`, `ref/alt` and `alt/alt` entries in a
    /// diploid `PL` vector for the allele at `alt_index`.
    pub fn likelihood_indices(alt_index: usize) -> [usize; 3] {
        let diploid = |j: usize, k: usize| k * (k + 1) / 2 + j;
        [diploid(0, 0), diploid(0, alt_index), diploid(alt_index, alt_index)]
    }
}
