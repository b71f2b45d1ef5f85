//! Process setup: config overrides, validation and input resolution.

use std::path::{Path, PathBuf};

use lumen_core::{Config, DestinationPlanner, OutputFormat as CoreOutputFormat};

use super::{ProcessArgs, ProcessContext};

/// Load config, apply CLI overrides and assemble everything needed for a run.
pub(crate) fn setup_context(args: &ProcessArgs) -> anyhow::Result<ProcessContext> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let input = args
        .input
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| config.input_dir());
    if !input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            input
        );
    }

    let output_format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Text),
    };
    let planner = DestinationPlanner::for_input(&input, config.output_dir());

    Ok(ProcessContext {
        input,
        planner,
        output_format,
        config,
    })
}

/// Apply command-line overrides on top of the loaded configuration.
pub(crate) fn apply_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(dir) = &args.output_dir {
        config.processing.output_dir = dir.clone();
    }
    if let Some(concurrent) = args.concurrent {
        config.pipeline.concurrent = concurrent;
    }
    if let Some(scale) = args.scale {
        config.transforms.resize_scale = scale;
    }
    if let Some(delta) = args.brightness {
        config.transforms.brightness_delta = delta;
    }
    if let Some(factor) = args.alpha {
        config.transforms.alpha_factor = factor;
    }
    if args.blur {
        config.blur.enabled = true;
    }
}

/// Expand a leading `~` in a path given on the command line.
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
