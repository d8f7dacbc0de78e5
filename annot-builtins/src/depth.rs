//! Read-depth annotations.

use annot_core::Result;
use annot_plugin::{
    Attributes, Catalog, Genotype, GenotypeAnnotation, InfoAnnotation, PluginArguments,
    PluginClass, VariantRecord,
};

use crate::{STANDARD_ANNOTATION, STANDARD_HC_ANNOTATION};

pub const DEPTH_KEY: &str = "DP";
pub const ALLELE_DEPTH_KEY: &str = "AD";

/// Total depth over the site: the number of reads when read evidence is
/// present, otherwise the sum of per-sample allele depths.
#[derive(Debug, Default)]
pub struct Coverage;

impl InfoAnnotation for Coverage {
    fn annotate(&self, record: &VariantRecord) -> Attributes {
        let depth: u64 = if record.reads.is_empty() {
            record
                .genotypes
                .iter()
                .filter_map(|g| g.allele_depths.as_ref())
                .flatten()
                .map(|&d| u64::from(d))
                .sum()
        } else {
            record.reads.len() as u64
        };

        if depth == 0 {
            return Attributes::new();
        }
        Attributes::from([(DEPTH_KEY.to_string(), depth.to_string())])
    }
}

/// Per-sample depth as the sum of that sample's allele depths.
#[derive(Debug, Default)]
pub struct DepthPerSampleHC;

impl GenotypeAnnotation for DepthPerSampleHC {
    fn annotate(&self, _record: &VariantRecord, genotype: &Genotype) -> Attributes {
        match &genotype.allele_depths {
            Some(ad) => {
                let depth: u64 = ad.iter().map(|&d| u64::from(d)).sum();
                Attributes::from([(DEPTH_KEY.to_string(), depth.to_string())])
            }
            None => Attributes::new(),
        }
    }
}

/// Per-sample allele depths, comma separated in allele order.
#[derive(Debug, Default)]
pub struct DepthPerAlleleBySample;

impl GenotypeAnnotation for DepthPerAlleleBySample {
    fn annotate(&self, record: &VariantRecord, genotype: &Genotype) -> Attributes {
        match &genotype.allele_depths {
            Some(ad) if ad.len() == record.alleles.len() => {
                let joined = ad
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                Attributes::from([(ALLELE_DEPTH_KEY.to_string(), joined)])
            }
            _ => Attributes::new(),
        }
    }
}

fn coverage(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
    Ok(Box::new(Coverage))
}

fn depth_per_sample(_: &PluginArguments) -> anyhow::Result<Box<dyn GenotypeAnnotation>> {
    Ok(Box::new(DepthPerSampleHC))
}

fn depth_per_allele(_: &PluginArguments) -> anyhow::Result<Box<dyn GenotypeAnnotation>> {
    Ok(Box::new(DepthPerAlleleBySample))
}

pub fn register(catalog: &mut Catalog) -> Result<()> {
    catalog.register(
        PluginClass::info("Coverage", coverage)
            .describe("Total depth of coverage at the site")
            .in_group(STANDARD_ANNOTATION)
            .in_group(STANDARD_HC_ANNOTATION),
    )?;
    catalog.register(
        PluginClass::genotype("DepthPerSampleHC", depth_per_sample)
            .describe("Depth of informative reads for each sample")
            .in_group(STANDARD_HC_ANNOTATION),
    )?;
    catalog.register(
        PluginClass::genotype("DepthPerAlleleBySample", depth_per_allele)
            .describe("Depth of coverage of each allele per sample")
            .in_group(STANDARD_ANNOTATION)
            .in_group(STANDARD_HC_ANNOTATION),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annot_plugin::{Allele, ReadEvidence};

    fn read(supports_reference: bool) -> ReadEvidence {
        ReadEvidence {
            supports_reference,
            base_quality: 30,
            mapping_quality: 60,
            clipped_bases: 0,
        }
    }

    fn record() -> VariantRecord {
        VariantRecord::new(
            "1",
            100,
            vec![Allele::reference("A"), Allele::alternate("T")],
        )
        .with_genotypes(vec![
            Genotype::new("s1", vec![Allele::reference("A"), Allele::alternate("T")])
                .with_allele_depths(vec![3, 4]),
            Genotype::new("s2", vec![Allele::alternate("T"), Allele::alternate("T")])
                .with_allele_depths(vec![0, 5]),
        ])
    }

    #[test]
    fn test_coverage_prefers_reads() {
        let with_reads = record().with_reads(vec![read(true), read(false), read(false)]);
        assert_eq!(Coverage.annotate(&with_reads)[DEPTH_KEY], "3");
        assert_eq!(Coverage.annotate(&record())[DEPTH_KEY], "12");
    }

    #[test]
    fn test_coverage_empty_without_depth() {
        let bare = VariantRecord::new("1", 1, vec![Allele::reference("A")]);
        assert!(Coverage.annotate(&bare).is_empty());
    }

    #[test]
    fn test_genotype_depths() {
        let rec = record();
        let s1 = &rec.genotypes[0];
        assert_eq!(DepthPerSampleHC.annotate(&rec, s1)[DEPTH_KEY], "7");
        assert_eq!(DepthPerAlleleBySample.annotate(&rec, s1)[ALLELE_DEPTH_KEY], "3,4");

        let no_ad = Genotype::new("s3", vec![Allele::reference("A"), Allele::reference("A")]);
        assert!(DepthPerSampleHC.annotate(&rec, &no_ad).is_empty());
    }
}
