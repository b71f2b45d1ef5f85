//! The `lumen process` command for running a batch through the pipeline.

mod batch;
mod setup;
pub mod types;

pub use types::OutputFormat;

use clap::{ArgAction, Args};
use lumen_core::{Config, DestinationPlanner, FileDiscovery, OutputFormat as CoreOutputFormat};
use std::path::PathBuf;

use batch::process_batch;
use setup::setup_context;

/// Arguments for the `process` command.
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Image file or directory to process (defaults to `processing.input_dir`)
    pub input: Option<PathBuf>,

    /// Directory the transformed images are written to
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Run one concurrent worker per stage (`false` runs images one at a time)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub concurrent: Option<bool>,

    /// Resize factor applied to both dimensions
    #[arg(long)]
    pub scale: Option<f64>,

    /// Amount added to each colour channel
    #[arg(long, allow_negative_numbers = true)]
    pub brightness: Option<i32>,

    /// Factor applied to the alpha channel (0.0 - 1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Also write a Gaussian-blurred copy of every image
    #[arg(long)]
    pub blur: bool,

    /// Status report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Status report file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Everything a batch run needs, assembled by `setup_context()`.
pub(crate) struct ProcessContext {
    pub input: PathBuf,
    pub planner: DestinationPlanner,
    pub output_format: CoreOutputFormat,
    pub config: Config,
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs) -> anyhow::Result<()> {
    let ctx = setup_context(&args)?;

    let files = FileDiscovery::new(&ctx.config).discover(&ctx.input)?;
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", ctx.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to process", files.len());

    process_batch(ctx, &args, files).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lumen_core::ExecutionMode;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: ProcessArgs,
    }

    fn parse(argv: &[&str]) -> ProcessArgs {
        TestCli::parse_from(std::iter::once("lumen").chain(argv.iter().copied())).args
    }

    #[test]
    fn process_args_default_leaves_config_alone() {
        let args = ProcessArgs::default();
        let mut config = Config::default();
        setup::apply_overrides(&mut config, &args);
        assert!(config.pipeline.concurrent);
        assert!(!config.blur.enabled);
        assert_eq!(config.transforms.resize_scale, 0.5);
    }

    #[test]
    fn concurrent_flag_takes_explicit_value() {
        let args = parse(&["photos", "--concurrent", "false"]);
        assert_eq!(args.input, Some(PathBuf::from("photos")));
        assert_eq!(args.concurrent, Some(false));

        let mut config = Config::default();
        setup::apply_overrides(&mut config, &args);
        assert_eq!(
            ExecutionMode::from_concurrent_flag(config.pipeline.concurrent),
            ExecutionMode::Sequential
        );
    }

    #[test]
    fn transform_overrides_are_applied() {
        let args = parse(&[
            "--scale",
            "0.25",
            "--brightness",
            "-10",
            "--alpha",
            "1.0",
            "--blur",
            "-d",
            "out",
        ]);
        let mut config = Config::default();
        setup::apply_overrides(&mut config, &args);
        assert_eq!(config.transforms.resize_scale, 0.25);
        assert_eq!(config.transforms.brightness_delta, -10);
        assert_eq!(config.transforms.alpha_factor, 1.0);
        assert!(config.blur.enabled);
        assert_eq!(config.processing.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn format_parses_value_enum() {
        let args = parse(&["--format", "jsonl"]);
        assert_eq!(args.format, Some(OutputFormat::Jsonl));
        assert_eq!(
            CoreOutputFormat::from(OutputFormat::Jsonl),
            CoreOutputFormat::JsonLines
        );
    }

    #[test]
    fn invalid_override_fails_validation() {
        let args = parse(&["--alpha", "1.5"]);
        let mut config = Config::default();
        setup::apply_overrides(&mut config, &args);
        assert!(config.validate().is_err());
    }
}
