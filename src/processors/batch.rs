// framiq/src/processors/batch.rs
use crate::core::{
    compute_layout, AspectRatioSpec, BatchRunState, BorderPercent, CancelToken, FramiqError,
    OutputFormat, Result, RunOutcome, RunStateHandle,
};
use crate::processors::codec::ImageCodec;
use crate::utils::{batch_output_path, file_name_of, list_supported_files, single_output_path};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

enum Workers {
    Sequential,
    GlobalPool,
    Pool(rayon::ThreadPool),
}

/// Frames every supported image of a directory, one run at a time.
///
/// The pipeline is the single writer of its [`BatchRunState`]; observers
/// poll [`BatchPipeline::snapshot`] or hold a [`RunStateHandle`]. Per-file
/// failures never surface as errors, they land in `skipped_files`.
pub struct BatchPipeline<C: ImageCodec> {
    codec: C,
    state: RunStateHandle,
    cancel: CancelToken,
    workers: Workers,
}

impl<C: ImageCodec> BatchPipeline<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            state: RunStateHandle::new(),
            cancel: CancelToken::new(),
            workers: Workers::Sequential,
        }
    }

    /// `1` keeps the strictly sequential order, `0` uses rayon's global
    /// pool, anything else builds a dedicated pool of that size. With more
    /// than one worker the result lists are in completion order.
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        self.workers = match threads {
            1 => Workers::Sequential,
            0 => Workers::GlobalPool,
            n => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| {
                        FramiqError::ProcessingError(format!("Failed to create thread pool: {}", e))
                    })?;
                Workers::Pool(pool)
            }
        };
        Ok(self)
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn state(&self) -> RunStateHandle {
        self.state.clone()
    }

    pub fn snapshot(&self) -> BatchRunState {
        self.state.snapshot()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Ask the active run to stop before its next file. The published
    /// `is_cancelled` flips at once; the run itself stops at the next check.
    pub fn cancel(&self) {
        log::info!("Cancellation requested");
        self.cancel.cancel();
        self.state.update(|state| {
            if state.is_running {
                state.is_cancelled = true;
            }
        });
    }

    /// Clear all state including the last run's results. Ignored while a
    /// run is active.
    pub fn reset_all(&self) -> bool {
        let cleared = self.state.update(|state| {
            if state.is_running {
                return false;
            }
            state.reset_all();
            true
        });
        if cleared {
            self.cancel.reset();
        } else {
            log::warn!("Ignoring reset while a run is active");
        }
        cleared
    }

    /// Clear the live fields but keep counts and result lists. Ignored
    /// while a run is active.
    pub fn clear_active_only(&self) -> bool {
        self.state.update(|state| {
            if state.is_running {
                log::warn!("Ignoring clear while a run is active");
                return false;
            }
            state.clear_active_only();
            true
        })
    }

    /// Frame every supported image in `input_dir` into `output_dir`.
    pub fn start(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> RunOutcome {
        if !self.begin() {
            log::warn!("A run is already active, ignoring start for {}", input_dir.display());
            return RunOutcome::Rejected;
        }
        self.run_batch(input_dir, output_dir, target, border)
    }

    /// Idle -> Running: claim the run and clear a stale cancel request.
    /// Runs on the caller's thread so a cancel sent right after a spawned
    /// start is kept.
    fn begin(&self) -> bool {
        if !self.state.try_begin() {
            return false;
        }
        self.cancel.reset();
        true
    }

    /// Body of a batch run; the caller must have won [`Self::begin`].
    fn run_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> RunOutcome {
        let files = match list_supported_files(input_dir) {
            Ok(files) => files,
            Err(e) => {
                log::error!("Cannot read input directory {}: {}", input_dir.display(), e);
                return self.finish(RunOutcome::Aborted);
            }
        };

        self.state.update(|state| state.total_count = files.len());

        if files.is_empty() {
            log::warn!("No supported images found in {}", input_dir.display());
            return self.finish(RunOutcome::Completed);
        }

        if let Err(e) = std::fs::create_dir_all(output_dir) {
            let e = FramiqError::write(output_dir, e);
            log::error!("Cannot create output directory: {}", e);
            return self.finish(RunOutcome::Aborted);
        }

        log::info!(
            "Framing {} images from {} to {} ({}, border {}%)",
            files.len(),
            input_dir.display(),
            output_dir.display(),
            target,
            border.value()
        );

        let outcome = match &self.workers {
            Workers::Sequential => self.run_sequential(&files, output_dir, target, border),
            Workers::GlobalPool => self.run_parallel(&files, output_dir, target, border),
            Workers::Pool(pool) => {
                pool.install(|| self.run_parallel(&files, output_dir, target, border))
            }
        };

        let outcome = self.finish(outcome);
        let summary = self.snapshot();
        log::info!(
            "Run {:?}: {} of {} visited, {} framed, {} skipped",
            outcome,
            summary.processed_count,
            summary.total_count,
            summary.processed_files.len(),
            summary.skipped_files.len()
        );
        outcome
    }

    /// Frame one image next to itself as `<stem>_framiq.<ext>`. A failure
    /// marks the file as skipped; the run still completes.
    pub fn process_single_image(
        &self,
        input_path: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> RunOutcome {
        if !self.begin() {
            log::warn!("A run is already active, ignoring {}", input_path.display());
            return RunOutcome::Rejected;
        }

        let name = display_name_of(input_path);
        self.state.update(|state| {
            state.total_count = 1;
            state.current_file_name = name.clone();
        });

        let result = single_output_path(input_path)
            .and_then(|output| self.process_file(input_path, &output, target, border));
        self.record(name, result);

        self.finish(RunOutcome::Completed)
    }

    fn run_sequential(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> RunOutcome {
        for path in files {
            if self.cancel.is_cancelled() {
                log::info!("Run cancelled before {}", path.display());
                self.state.update(|state| state.is_cancelled = true);
                return RunOutcome::Cancelled;
            }
            self.visit(path, output_dir, target, border);
        }
        RunOutcome::Completed
    }

    fn run_parallel(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> RunOutcome {
        files.par_iter().for_each(|path| {
            if !self.cancel.is_cancelled() {
                self.visit(path, output_dir, target, border);
            }
        });

        let snapshot = self.snapshot();
        if snapshot.processed_count < snapshot.total_count {
            self.state.update(|state| state.is_cancelled = true);
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        }
    }

    fn visit(
        &self,
        path: &Path,
        output_dir: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) {
        let name = display_name_of(path);
        self.state
            .update(|state| state.current_file_name = name.clone());

        let output = batch_output_path(output_dir, &name);
        let result = self.process_file(path, &output, target, border);
        self.record(name, result);
    }

    fn record(&self, name: String, result: Result<()>) {
        if let Err(e) = &result {
            log::warn!("Skipping {}: {}", name, e);
        }
        self.state.update(|state| {
            match result {
                Ok(()) => state.processed_files.push(name),
                Err(_) => state.skipped_files.push(name),
            }
            state.record_visit();
        });
    }

    fn process_file(
        &self,
        input: &Path,
        output: &Path,
        target: AspectRatioSpec,
        border: BorderPercent,
    ) -> Result<()> {
        let (dimensions, raster) = self.codec.decode(input)?;
        if !(dimensions.width > 0.0 && dimensions.height > 0.0) {
            return Err(FramiqError::decode(input, "image has zero width or height"));
        }

        let layout = compute_layout(dimensions, target, border);
        log::debug!(
            "{}: {}x{} -> canvas {:.0}x{:.0}",
            input.display(),
            dimensions.width,
            dimensions.height,
            layout.final_canvas_size.width,
            layout.final_canvas_size.height
        );

        let bytes = self
            .codec
            .encode(&raster, &layout, OutputFormat::from_path(output))?;
        self.codec.write(&bytes, output)
    }

    fn finish(&self, outcome: RunOutcome) -> RunOutcome {
        self.state.update(|state| {
            state.is_running = false;
            state.is_cancelled = outcome == RunOutcome::Cancelled;
            state.current_file_name.clear();
        });
        outcome
    }
}

fn display_name_of(path: &Path) -> String {
    file_name_of(path).unwrap_or_else(|_| path.display().to_string())
}

/// Start a batch on a background thread so the caller can keep observing
/// state. The run is claimed before this returns, so an immediate
/// [`BatchPipeline::cancel`] applies to it.
pub fn spawn_batch<C>(
    pipeline: Arc<BatchPipeline<C>>,
    input_dir: PathBuf,
    output_dir: PathBuf,
    target: AspectRatioSpec,
    border: BorderPercent,
) -> JoinHandle<RunOutcome>
where
    C: ImageCodec + Send + 'static,
{
    if !pipeline.begin() {
        log::warn!("A run is already active, ignoring start for {}", input_dir.display());
        return std::thread::spawn(|| RunOutcome::Rejected);
    }
    std::thread::spawn(move || pipeline.run_batch(&input_dir, &output_dir, target, border))
}
