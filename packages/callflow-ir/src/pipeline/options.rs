//! `PipelineOptions`: the validated, immutable bundle of CLI-level
//! configuration passed into `pipeline::run` (SPEC_FULL.md §10).

use std::path::PathBuf;

use crate::errors::Result;
use crate::features::filters::FilterParams;
use crate::features::parsing::{LanguageParams, SourceType};
use crate::features::subset::SubsetParams;
use crate::shared::ports::LanguageId;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
    pub language: Option<LanguageId>,
    pub filters: FilterParams,
    pub subset: SubsetParams,
    pub language_params: LanguageParams,
    pub no_grouping: bool,
    pub no_trimming: bool,
    pub hide_legend: bool,
    pub skip_parse_errors: bool,
    pub skip_lib_files: bool,
}

impl PipelineOptions {
    /// Eagerly validates every `ConfigError` check that can be caught before
    /// any file I/O (§7).
    pub fn validate(&self) -> Result<()> {
        self.subset.validate()?;
        crate::features::projector::OutputFormat::from_path(&self.output)?;
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            sources: Vec::new(),
            output: PathBuf::from("out.png"),
            language: None,
            filters: FilterParams::default(),
            subset: SubsetParams::default(),
            language_params: LanguageParams {
                source_type: SourceType::Script,
                ruby_version: "27".to_string(),
                exclude_lib_files: false,
            },
            no_grouping: false,
            no_trimming: false,
            hide_legend: false,
            skip_parse_errors: false,
            skip_lib_files: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_validate() {
        assert!(PipelineOptions::default().validate().is_ok());
    }

    #[test]
    fn unrecognized_output_extension_is_rejected() {
        let mut options = PipelineOptions::default();
        options.output = PathBuf::from("out.bmp");
        assert!(options.validate().is_err());
    }

    #[test]
    fn depth_without_target_is_rejected() {
        let mut options = PipelineOptions::default();
        options.subset.upstream_depth = 1;
        assert!(options.validate().is_err());
    }
}
