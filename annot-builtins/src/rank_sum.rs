//! Mann-Whitney rank-sum comparisons of alt-supporting versus ref-supporting
//! reads.

use annot_core::Result;
use annot_plugin::{
    Attributes, Catalog, InfoAnnotation, PluginArguments, PluginClass, ReadEvidence,
    VariantRecord,
};

use crate::{STANDARD_ANNOTATION, STANDARD_HC_ANNOTATION};

pub const BASE_QUALITY_RANK_SUM_KEY: &str = "BaseQRankSum";
pub const CLIPPING_RANK_SUM_KEY: &str = "ClippingRankSum";

/// Positive z when alt reads score higher than ref reads on `feature`.
#[derive(Debug, Clone, Copy)]
pub struct RankSumTest {
    key: &'static str,
    feature: fn(&ReadEvidence) -> f64,
}

impl RankSumTest {
    pub fn base_quality() -> Self {
        Self {
            key: BASE_QUALITY_RANK_SUM_KEY,
            feature: |r| f64::from(r.base_quality),
        }
    }

    pub fn clipping() -> Self {
        Self {
            key: CLIPPING_RANK_SUM_KEY,
            feature: |r| f64::from(r.clipped_bases),
        }
    }
}

impl InfoAnnotation for RankSumTest {
    fn annotate(&self, record: &VariantRecord) -> Attributes {
        let (refs, alts): (Vec<&ReadEvidence>, Vec<&ReadEvidence>) =
            record.reads.iter().partition(|r| r.supports_reference);
        let refs: Vec<f64> = refs.into_iter().map(self.feature).collect();
        let alts: Vec<f64> = alts.into_iter().map(self.feature).collect();

        match mann_whitney_z(&alts, &refs) {
            Some(z) => Attributes::from([(self.key.to_string(), format!("{:.3}", z))]),
            None => Attributes::new(),
        }
    }
}

/// Normal approximation of the Mann-Whitney U statistic of `first` against
/// `second`, ties given their average rank.
pub fn mann_whitney_z(first: &[f64], second: &[f64]) -> Option<f64> {
    if first.is_empty() || second.is_empty() {
        return None;
    }

    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum_first = 0.0;
    let mut i = 0;
    while i < pooled.len() {
        let mut j = i;
        while j + 1 < pooled.len() && pooled[j + 1].0 == pooled[i].0 {
            j += 1;
        }
        // ranks are 1-based: positions i..=j share the mean of (i+1)..=(j+1)
        let rank = (i + j) as f64 / 2.0 + 1.0;
        rank_sum_first += pooled[i..=j].iter().filter(|p| p.1).count() as f64 * rank;
        i = j + 1;
    }

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;
    let u = rank_sum_first - n1 * (n1 + 1.0) / 2.0;
    let mean = n1 * n2 / 2.0;
    let sd = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    if sd == 0.0 {
        return None;
    }
    Some((u - mean) / sd)
}

fn base_quality(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
    Ok(Box::new(RankSumTest::base_quality()))
}

fn clipping(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
    Ok(Box::new(RankSumTest::clipping()))
}

pub fn register(catalog: &mut Catalog) -> Result<()> {
    catalog.register(
        PluginClass::info("BaseQualityRankSumTest", base_quality)
            .describe("Rank sum test of alt versus ref base qualities")
            .in_group(STANDARD_ANNOTATION)
            .in_group(STANDARD_HC_ANNOTATION),
    )?;
    catalog.register(
        PluginClass::info("ClippingRankSumTest", clipping)
            .describe("Rank sum test for hard-clipped bases on alt versus ref reads")
            .in_group(STANDARD_ANNOTATION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use annot_plugin::Allele;

    fn read(supports_reference: bool, base_quality: u8, clipped_bases: u32) -> ReadEvidence {
        ReadEvidence {
            supports_reference,
            base_quality,
            mapping_quality: 60,
            clipped_bases,
        }
    }

    #[test]
    fn test_separated_samples() {
        let z = mann_whitney_z(&[30.0, 40.0], &[10.0, 20.0]).expect("both sides present");
        assert!((z - 1.549).abs() < 0.001, "{z}");
    }

    #[test]
    fn test_ties_are_neutral() {
        let z = mann_whitney_z(&[5.0, 5.0], &[5.0, 5.0]).expect("both sides present");
        assert_eq!(z, 0.0);
    }

    #[test]
    fn test_needs_both_sides() {
        assert!(mann_whitney_z(&[], &[1.0]).is_none());
    }

    #[test]
    fn test_annotations_pick_their_feature() {
        let record = VariantRecord::new("1", 5, vec![Allele::reference("A"), Allele::alternate("G")])
            .with_reads(vec![
                read(true, 10, 5),
                read(true, 20, 5),
                read(false, 30, 0),
                read(false, 40, 0),
            ]);
        let bq = RankSumTest::base_quality().annotate(&record);
        assert_eq!(bq[BASE_QUALITY_RANK_SUM_KEY], "1.549");

        let clip = RankSumTest::clipping().annotate(&record);
        assert!(clip[CLIPPING_RANK_SUM_KEY].starts_with('-'));
    }
}
