//! Batch processing: progress tracking, streamed status output and the
//! optional blur pass.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use lumen_core::{
    BlurPass, DiscoveredFile, Driver, FileDiscovery, OutputFormat as CoreOutputFormat,
    OutputWriter, RunSummary,
};

use super::{ProcessArgs, ProcessContext};

/// Run every discovered file through the pipeline, reporting as items finish.
pub(crate) async fn process_batch(
    ctx: ProcessContext,
    args: &ProcessArgs,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let total_bytes = FileDiscovery::total_size(&files);
    let paths: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();

    let progress = create_progress_bar(paths.len() as u64);
    let mut writer = open_writer(
        args.output.as_deref(),
        ctx.output_format,
        ctx.config.output.pretty,
    )?;
    // A JSON array needs every status, everything else streams.
    let stream = ctx.output_format != CoreOutputFormat::Json;
    let mut write_error: Option<io::Error> = None;

    let driver = Driver::new(&ctx.config, ctx.planner.clone());
    let summary = driver
        .run_with(paths.clone(), |status| {
            if stream && write_error.is_none() {
                if let Err(e) = progress.suspend(|| writer.write(status)) {
                    write_error = Some(e);
                }
            }
            if !status.succeeded {
                tracing::warn!(
                    "Failed: {:?} - {}",
                    status.source_path,
                    status.error.as_deref().unwrap_or("unknown error")
                );
            }
            progress.inc(1);
            let elapsed = progress.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.1} img/sec", progress.position() as f64 / elapsed));
            }
        })
        .await;
    progress.finish_and_clear();

    if let Some(e) = write_error {
        return Err(e.into());
    }
    if !stream {
        writer.write_all(&summary.statuses)?;
    }
    writer.flush()?;
    if let Some(output_path) = &args.output {
        tracing::info!("Output written to {:?}", output_path);
    }

    if ctx.config.blur.enabled {
        run_blur_pass(&ctx, paths).await?;
    }

    print_summary(&summary, total_bytes);
    Ok(())
}

/// Blur every input on a blocking worker once the main batch is done.
async fn run_blur_pass(ctx: &ProcessContext, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let pass = BlurPass::new(&ctx.config.blur, ctx.planner.clone());
    tracing::info!(
        "Blurring {} image(s) (kernel {}, sigma {})",
        paths.len(),
        ctx.config.blur.kernel_size,
        ctx.config.blur.sigma
    );
    let statuses = tokio::task::spawn_blocking(move || pass.run(&paths)).await?;
    let blurred = statuses.iter().filter(|s| s.succeeded).count();
    tracing::info!("Blurred {} of {} image(s)", blurred, statuses.len());
    Ok(())
}

/// Status writer over stdout or the requested file.
fn open_writer(
    path: Option<&Path>,
    format: CoreOutputFormat,
    pretty: bool,
) -> anyhow::Result<OutputWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };
    Ok(OutputWriter::new(sink, format, pretty))
}

fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(summary: &RunSummary, total_bytes: u64) {
    let elapsed = summary.elapsed;
    let mb_processed = total_bytes as f64 / 1_000_000.0;
    let throughput = if elapsed.as_secs_f64() > 0.0 {
        mb_processed / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Mode:         {:>8}", summary.mode.to_string());
    eprintln!("    Succeeded:    {:>8}", summary.succeeded());
    if summary.failed() > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", summary.total());
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", summary.images_per_second());
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}
