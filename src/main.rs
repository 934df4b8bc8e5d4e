use anyhow::{bail, Context};
use clap::Parser;
use framiq::{
    compute_layout, detect_in_directory, format_file_size, single_output_path, spawn_batch,
    AspectRatioSpec, BatchPipeline, BatchRunState, BorderPercent, Cli, Commands, Dimensions,
    ImageCrateCodec, ProcessConfig, RunOutcome,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Frame {
            input,
            frame,
            encode,
        } => {
            let border = BorderPercent::new(frame.border)?;
            let config = encode.to_config(1);
            config.validate()?;
            process_frame(input, frame.ratio, border, &config)?;
        }
        Commands::Batch {
            input,
            output,
            frame,
            encode,
            threads,
        } => {
            let border = BorderPercent::new(frame.border)?;
            let config = encode.to_config(threads);
            config.validate()?;
            process_batch(input, output, frame.ratio, border, &config)?;
        }
        Commands::Detect { input } => {
            process_detect(input)?;
        }
        Commands::Layout {
            width,
            height,
            frame,
        } => {
            if !(width > 0.0 && height > 0.0) {
                bail!("Width and height must be positive");
            }
            let border = BorderPercent::new(frame.border)?;
            let layout = compute_layout(Dimensions::new(width, height), frame.ratio, border);
            let (x, y) = layout.offset();

            println!("Target ratio: {} ({})", frame.ratio, frame.ratio.display_name());
            println!(
                "Canvas:       {:.1} x {:.1}",
                layout.canvas_size.width, layout.canvas_size.height
            );
            println!(
                "Final canvas: {:.1} x {:.1}",
                layout.final_canvas_size.width, layout.final_canvas_size.height
            );
            println!(
                "Image:        {:.1} x {:.1} at ({:.1}, {:.1})",
                layout.placed_image_size.width, layout.placed_image_size.height, x, y
            );
        }
    }

    Ok(())
}

fn process_frame(
    input: PathBuf,
    ratio: AspectRatioSpec,
    border: BorderPercent,
    config: &ProcessConfig,
) -> anyhow::Result<()> {
    if !input.is_file() {
        bail!("File does not exist: {}", input.display());
    }

    let output_path = single_output_path(&input)?;
    let pipeline = BatchPipeline::new(ImageCrateCodec::new(config));
    pipeline.process_single_image(&input, ratio, border);

    let state = pipeline.snapshot();
    if state.processed_files.is_empty() {
        bail!("Could not frame {}", input.display());
    }

    let size = std::fs::metadata(&output_path)
        .with_context(|| format!("Missing output {}", output_path.display()))?
        .len();
    println!(
        "Framed image saved to: {} ({})",
        output_path.display(),
        format_file_size(size)
    );

    Ok(())
}

fn process_batch(
    input: PathBuf,
    output: PathBuf,
    ratio: AspectRatioSpec,
    border: BorderPercent,
    config: &ProcessConfig,
) -> anyhow::Result<()> {
    if !input.is_dir() {
        bail!("Input path is not a directory: {}", input.display());
    }
    if input == output {
        bail!("Input and output directories cannot be the same");
    }

    let pipeline = Arc::new(
        BatchPipeline::new(ImageCrateCodec::new(config)).with_threads(config.threads)?,
    );
    let handle = spawn_batch(Arc::clone(&pipeline), input, output.clone(), ratio, border);

    let pb = create_progress_bar();
    while !handle.is_finished() {
        render_progress(&pb, &pipeline.snapshot());
        std::thread::sleep(POLL_INTERVAL);
    }

    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("Batch worker panicked"))?;
    let state = pipeline.snapshot();
    render_progress(&pb, &state);
    pb.finish_and_clear();

    match outcome {
        RunOutcome::Aborted => bail!("Batch aborted, see log for details"),
        RunOutcome::Cancelled => println!("Batch cancelled."),
        RunOutcome::Completed | RunOutcome::Rejected => {}
    }

    println!(
        "Batch processing complete. Framed {} of {} images to: {}",
        state.processed_files.len(),
        state.total_count,
        output.display()
    );
    if !state.skipped_files.is_empty() {
        println!("Skipped {} file(s):", state.skipped_files.len());
        for name in &state.skipped_files {
            println!("  {}", name);
        }
    }

    Ok(())
}

fn process_detect(input: PathBuf) -> anyhow::Result<()> {
    let codec = ImageCrateCodec::default();
    let groups = detect_in_directory(&input, codec.loader())
        .with_context(|| format!("Cannot scan {}", input.display()))?;

    if groups.is_empty() {
        println!("No readable images in {}", input.display());
        return Ok(());
    }

    println!("=== Aspect Ratios ===");
    for group in &groups {
        println!(
            "{:>5} x {:<8} {:<20} e.g. {}",
            group.member_count,
            group.representative_ratio.to_string(),
            group.display_name(),
            group.sample_file_name
        );
    }

    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn render_progress(pb: &ProgressBar, state: &BatchRunState) {
    pb.set_length(state.total_count as u64);
    pb.set_position(state.processed_count as u64);
    pb.set_message(state.current_file_name.clone());
}
