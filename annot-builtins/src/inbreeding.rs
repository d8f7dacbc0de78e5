//! Inbreeding coefficient from genotype likelihoods.

use annot_core::Result;
use annot_plugin::{
    ArgumentKind, ArgumentSpec, Attributes, Catalog, Genotype, InfoAnnotation, PluginArguments,
    PluginClass, VariantRecord,
};
use std::collections::BTreeSet;

use crate::STANDARD_ANNOTATION;

pub const INBREEDING_COEFFICIENT_KEY: &str = "InbreedingCoeff";
pub const FOUNDER_ARGUMENT: &str = "founderID";

/// Fewer founders than this and the estimate is too noisy to report.
const MIN_SAMPLES: usize = 10;

/// Likelihood-based inbreeding coefficient `F = 1 - het / (2pqN)` over the
/// founder samples, or over every sample when no founders are configured.
#[derive(Debug, Default)]
pub struct InbreedingCoeff {
    founders: BTreeSet<String>,
}

impl InbreedingCoeff {
    pub fn new(founders: impl IntoIterator<Item = String>) -> Self {
        Self {
            founders: founders.into_iter().collect(),
        }
    }

    pub fn founders(&self) -> &BTreeSet<String> {
        &self.founders
    }

    fn samples<'a>(&self, record: &'a VariantRecord) -> Vec<&'a Genotype> {
        if self.founders.is_empty() {
            record.genotypes.iter().collect()
        } else {
            record
                .genotypes
                .iter()
                .filter(|g| self.founders.contains(&g.sample))
                .collect()
        }
    }

    /// `(samples used, F)`, or `None` when no diploid sample has likelihoods.
    fn coefficient(record: &VariantRecord, genotypes: &[&Genotype]) -> Option<(usize, f64)> {
        let multiallelic = !record.is_biallelic();
        let mut ref_count = 0.0;
        let mut het_count = 0.0;
        let mut hom_count = 0.0;
        let mut n = 0usize;

        for genotype in genotypes {
            let Some(pl) = genotype.likelihoods.as_ref() else {
                continue;
            };
            if !genotype.is_called() || genotype.ploidy() != 2 {
                continue;
            }
            n += 1;

            let mut idx = VariantRecord::likelihood_indices(1);
            if multiallelic {
                // Hets between two alternates say nothing about ref/alt balance.
                if genotype.is_het_non_ref() {
                    hom_count += 1.0;
                    continue;
                }
                let alt = genotype.alleles.iter().find(|a| !a.is_reference());
                if let Some(alt_index) = alt.and_then(|a| record.allele_index(a)) {
                    idx = VariantRecord::likelihood_indices(alt_index);
                }
            }

            let normalized = normalize_phred(pl);
            let get = |i: usize| normalized.get(i).copied().unwrap_or(0.0);
            ref_count += get(idx[0]);
            het_count += get(idx[1]);
            hom_count += get(idx[2]);
        }

        if n == 0 {
            return None;
        }

        let total = ref_count + het_count + hom_count;
        let p = (2.0 * ref_count + het_count) / (2.0 * total);
        let q = 1.0 - p;
        let f = 1.0 - het_count / (2.0 * p * q * n as f64);
        f.is_finite().then_some((n, f))
    }
}

/// Phred-scaled likelihoods to probabilities summing to one.
fn normalize_phred(pl: &[u32]) -> Vec<f64> {
    let log10: Vec<f64> = pl.iter().map(|&p| -f64::from(p) / 10.0).collect();
    let max = log10.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let linear: Vec<f64> = log10.iter().map(|l| 10f64.powf(l - max)).collect();
    let sum: f64 = linear.iter().sum();
    linear.into_iter().map(|v| v / sum).collect()
}

impl InfoAnnotation for InbreedingCoeff {
    fn annotate(&self, record: &VariantRecord) -> Attributes {
        let genotypes = self.samples(record);
        if genotypes.len() < MIN_SAMPLES {
            return Attributes::new();
        }

        match Self::coefficient(record, &genotypes) {
            Some((_, f)) => Attributes::from([(
                INBREEDING_COEFFICIENT_KEY.to_string(),
                format!("{:.4}", f),
            )]),
            None => Attributes::new(),
        }
    }
}

fn build(args: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
    Ok(Box::new(InbreedingCoeff::new(
        args.values(FOUNDER_ARGUMENT).iter().cloned(),
    )))
}

pub fn register(catalog: &mut Catalog) -> Result<()> {
    catalog.register(
        PluginClass::info(INBREEDING_COEFFICIENT_KEY, build)
            .describe("Likelihood-based test for the consanguinity of a population")
            .in_group(STANDARD_ANNOTATION)
            .with_argument(
                ArgumentSpec::optional(FOUNDER_ARGUMENT, ArgumentKind::Text)
                    .multiple()
                    .describe("Sample to use as a founder; repeat for each founder"),
            ),
    )
}


#[cfg(test)]
mod tests {
    use super::fixtures::{founders, population};
    use super::*;

    fn value(out: &Attributes) -> f64 {
        out[INBREEDING_COEFFICIENT_KEY]
            .parse()
            .expect("coefficient should be numeric")
    }

    #[test]
    fn test_ten_founders() {
        let out = InbreedingCoeff::new(founders()).annotate(&population());
        assert!((value(&out) - (-0.3333)).abs() < 0.001, "{out:?}");
    }

    #[test]
    fn test_too_few_founders_yields_nothing() {
        let out = InbreedingCoeff::new(["s1".to_string()]).annotate(&population());
        assert!(out.is_empty());
    }

    #[test]
    fn test_all_samples_when_no_founders() {
        let out = InbreedingCoeff::default().annotate(&population());
        let f = value(&out);
        assert!((f - (-0.3333)).abs() > 0.01, "hom-alt samples shift the estimate");
    }

    #[test]
    fn test_factory_reads_founders() -> anyhow::Result<()> {
        let mut args = PluginArguments::new();
        args.push(FOUNDER_ARGUMENT, "s1");
        args.push(FOUNDER_ARGUMENT, "s2");
        let annotation = build(&args)?;
        assert!(annotation.annotate(&population()).is_empty());
        Ok(())
    }

    #[test]
    fn test_normalize_phred() {
        let p = normalize_phred(&[0, 10, 20]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }
}
