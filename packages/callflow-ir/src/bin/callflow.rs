//! `callflow`: CLI entry point, one flat argument surface over `pipeline::run`
//! (SPEC_FULL.md §6/§10 — no subcommands, mirroring the pipeline option
//! surface one-to-one).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use callflow_ir::errors::CallflowError;
use callflow_ir::features::filters::FilterParams;
use callflow_ir::features::parsing::{LanguageParams, SourceType};
use callflow_ir::features::subset::SubsetParams;
use callflow_ir::shared::ports::LanguageId;
use callflow_ir::PipelineOptions;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "callflow", version, about = "Static call-flow graph extraction")]
struct Cli {
    /// Source files or directories to scan (directories are walked recursively).
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Output path; suffix (json, dot, gv, png, svg) determines emission.
    #[arg(long, short = 'o', default_value = "out.png")]
    output: PathBuf,

    /// Source language; auto-detected from the first source file when omitted.
    #[arg(long, value_enum)]
    language: Option<CliLanguage>,

    #[arg(long)]
    target_function: Option<String>,
    #[arg(long, default_value_t = 0)]
    upstream_depth: u32,
    #[arg(long, default_value_t = 0)]
    downstream_depth: u32,

    #[arg(long, value_delimiter = ',')]
    exclude_functions: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    exclude_namespaces: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    include_only_functions: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    include_only_namespaces: Vec<String>,

    #[arg(long)]
    no_grouping: bool,
    #[arg(long)]
    no_trimming: bool,
    #[arg(long)]
    hide_legend: bool,
    #[arg(long)]
    skip_parse_errors: bool,
    #[arg(long)]
    skip_lib_files: bool,

    #[arg(long, value_enum, default_value = "script")]
    source_type: CliSourceType,
    #[arg(long, default_value = "27")]
    ruby_version: String,

    #[command(flatten)]
    verbosity: Verbosity,
}

/// `--quiet`/`--verbose` are mutually exclusive (clap enforces it); neither
/// selects `INFO`.
#[derive(Parser, Debug)]
#[group(multiple = false)]
struct Verbosity {
    #[arg(long, short = 'q')]
    quiet: bool,
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Verbosity {
    fn tracing_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliLanguage {
    Py,
    Js,
    Rb,
    Php,
}

impl From<CliLanguage> for LanguageId {
    fn from(value: CliLanguage) -> Self {
        match value {
            CliLanguage::Py => LanguageId::Python,
            CliLanguage::Js => LanguageId::JavaScript,
            CliLanguage::Rb => LanguageId::Ruby,
            CliLanguage::Php => LanguageId::Php,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliSourceType {
    Script,
    Module,
}

impl From<CliSourceType> for SourceType {
    fn from(value: CliSourceType) -> Self {
        match value {
            CliSourceType::Script => SourceType::Script,
            CliSourceType::Module => SourceType::Module,
        }
    }
}

impl From<Cli> for PipelineOptions {
    fn from(cli: Cli) -> Self {
        PipelineOptions {
            sources: cli.sources,
            output: cli.output,
            language: cli.language.map(LanguageId::from),
            filters: FilterParams {
                exclude_namespaces: cli.exclude_namespaces,
                exclude_functions: cli.exclude_functions,
                include_only_namespaces: cli.include_only_namespaces,
                include_only_functions: cli.include_only_functions,
            },
            subset: SubsetParams {
                target_function: cli.target_function,
                upstream_depth: cli.upstream_depth,
                downstream_depth: cli.downstream_depth,
            },
            language_params: LanguageParams {
                source_type: cli.source_type.into(),
                ruby_version: cli.ruby_version,
                exclude_lib_files: cli.skip_lib_files,
            },
            no_grouping: cli.no_grouping,
            no_trimming: cli.no_trimming,
            hide_legend: cli.hide_legend,
            skip_parse_errors: cli.skip_parse_errors,
            skip_lib_files: cli.skip_lib_files,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity.tracing_level());

    let options = PipelineOptions::from(cli);
    match callflow_ir::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let payload = serde_json::json!({
                "error": {
                    "kind": err.kind(),
                    "message": err.to_string(),
                }
            });
            println!("{}", serde_json::to_string_pretty(&payload).unwrap());
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn exit_code_for(err: &CallflowError) -> u8 {
    match err.kind() {
        "config" => 2,
        "dependency" => 3,
        "parse" => 4,
        "io" => 5,
        _ => 1,
    }
}

fn init_tracing(level: tracing::Level) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_and_verbose_together_is_rejected() {
        let result = Cli::try_parse_from(["callflow", "src", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn upstream_depth_without_target_parses_but_pipeline_validation_rejects_it() {
        // clap itself has no cross-field validation here; PipelineOptions::validate does.
        let cli = Cli::try_parse_from(["callflow", "src", "--upstream-depth", "2"]).unwrap();
        let options = PipelineOptions::from(cli);
        assert!(options.validate().is_err());
    }

    #[test]
    fn target_function_with_zero_depths_is_rejected_by_pipeline_validation() {
        let cli = Cli::try_parse_from(["callflow", "src", "--target-function", "foo"]).unwrap();
        let options = PipelineOptions::from(cli);
        assert!(options.validate().is_err());
    }

    #[test]
    fn minimal_invocation_parses() {
        let cli = Cli::try_parse_from(["callflow", "src"]).unwrap();
        assert_eq!(cli.sources, vec![PathBuf::from("src")]);
        assert_eq!(cli.output, PathBuf::from("out.png"));
    }

    #[test]
    fn comma_separated_lists_split() {
        let cli = Cli::try_parse_from([
            "callflow",
            "src",
            "--exclude-functions",
            "a,b,c",
        ])
        .unwrap();
        assert_eq!(cli.exclude_functions, vec!["a", "b", "c"]);
    }
}
