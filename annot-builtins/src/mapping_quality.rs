use annot_core::Result;
use annot_plugin::{Attributes, Catalog, InfoAnnotation, PluginArguments, PluginClass, VariantRecord};

use crate::{STANDARD_ANNOTATION, STANDARD_HC_ANNOTATION};

pub const RMS_MAPPING_QUALITY_KEY: &str = "MQ";

/// Root mean square of the mapping qualities of all reads at the site.
#[derive(Debug, Default)]
pub struct RmsMappingQuality;

impl InfoAnnotation for RmsMappingQuality {
    fn annotate(&self, record: &VariantRecord) -> Attributes {
        if record.reads.is_empty() {
            return Attributes::new();
        }
        let sum_of_squares: f64 = record
            .reads
            .iter()
            .map(|r| f64::from(r.mapping_quality).powi(2))
            .sum();
        let rms = (sum_of_squares / record.reads.len() as f64).sqrt();
        Attributes::from([(RMS_MAPPING_QUALITY_KEY.to_string(), format!("{:.2}", rms))])
    }
}

fn build(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
    Ok(Box::new(RmsMappingQuality))
}

pub fn register(catalog: &mut Catalog) -> Result<()> {
    catalog.register(
        PluginClass::info("RMSMappingQuality", build)
            .describe("Root mean square of the mapping quality of reads across all samples")
            .in_group(STANDARD_ANNOTATION)
            .in_group(STANDARD_HC_ANNOTATION),
    )
}
