//! Orchestrates the pipeline end to end, in the dependency order from
//! SPEC_FULL.md §2: source enumeration → per-file parse/build → Filters →
//! Resolver → Trimmer → Subset → Projector. Trimming runs before subsetting
//! (matching `engine.py`'s `map_it()`/`code2flow()` split) so a subset target
//! that is itself fully disconnected is trimmed away first, surfacing as a
//! config error rather than a trivially-empty subset.

mod options;
mod source;

pub use options::PipelineOptions;

use tracing::{debug, info};

use crate::errors::Result;
use crate::features::builder::build_file_group;
use crate::features::filters::apply_filters;
use crate::features::parsing::adapter_for;
use crate::features::projector::{assert_dot_available, emit, OutputFormat, ProjectorOptions};
use crate::features::resolver::resolve;
use crate::features::subset::{apply_subset, trim_orphans};
use crate::shared::models::CallGraph;

/// Runs the full pipeline and writes the result to `options.output`.
pub fn run(options: &PipelineOptions) -> Result<()> {
    options.validate()?;

    let output_format = OutputFormat::from_path(&options.output)?;
    if output_format.is_image() {
        assert_dot_available()?;
    }

    let files = source::enumerate_sources(&options.sources, options.language)?;
    info!(count = files.paths.len(), language = %files.language.name(), "resolved source files");

    let adapter = adapter_for(files.language);
    let mut graph = CallGraph::new();
    for path in &files.paths {
        if options.skip_lib_files && adapter.is_library_file(path, &options.language_params) {
            debug!(path = %path.display(), "skipping library file");
            continue;
        }
        build_file_group(
            &mut graph,
            adapter.as_ref(),
            path,
            &options.language_params,
            options.skip_parse_errors,
        )?;
    }

    apply_filters(&mut graph, &options.filters);
    resolve(&mut graph);

    if !options.no_trimming {
        trim_orphans(&mut graph);
    }

    apply_subset(&mut graph, &options.subset)?;

    let projector_options = ProjectorOptions {
        hide_legend: options.hide_legend,
        no_grouping: options.no_grouping,
    };
    emit(&graph, &options.output, &projector_options)?;

    Ok(())
}
