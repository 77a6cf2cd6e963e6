// THEORY:
// The batch driver is the outermost collaborator. It enumerates a directory of
// images, runs each one through the edge pipeline and writes the result beside its
// siblings, timing the three host-visible phases for every item:
//
//   load    decode the file and pack it into transport words
//   kernel  run the three-stage pipeline
//   store   unpack the result and encode it to disk
//
// Items are independent, so several run at once (one convolver per item, never
// shared). A failing item is logged with its path, counted and skipped; it never
// aborts the rest of the batch. Only problems with the directories themselves are
// fatal.

use crate::config::BatchConfig;
use crate::core_modules::geometry::FrameGeometry;
use crate::error::EdgeError;
use crate::frame_io::{load_packed, save_edges};
use crate::pipeline::EdgePipeline;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Timing for one processed image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageMetrics {
    pub pixels_processed: usize,
    pub load: Duration,
    pub kernel: Duration,
    pub store: Duration,
}

impl ImageMetrics {
    pub fn total(&self) -> Duration {
        self.load + self.kernel + self.store
    }
}

/// Accumulated results of a batch run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    pub images_processed: usize,
    pub images_failed: usize,
    pub total_pixels: usize,
    pub total_load: Duration,
    pub total_kernel: Duration,
    pub total_store: Duration,
    /// Paths that were skipped, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn record(&mut self, metrics: &ImageMetrics) {
        self.images_processed += 1;
        self.total_pixels += metrics.pixels_processed;
        self.total_load += metrics.load;
        self.total_kernel += metrics.kernel;
        self.total_store += metrics.store;
    }

    pub fn record_failure(&mut self, path: PathBuf, reason: String) {
        self.images_failed += 1;
        self.failures.push((path, reason));
    }

    pub fn total_end_to_end(&self) -> Duration {
        self.total_load + self.total_kernel + self.total_store
    }

    fn average(&self, total: Duration) -> Duration {
        if self.images_processed == 0 {
            return Duration::ZERO;
        }
        total / self.images_processed as u32
    }

    pub fn average_load(&self) -> Duration {
        self.average(self.total_load)
    }

    pub fn average_kernel(&self) -> Duration {
        self.average(self.total_kernel)
    }

    pub fn average_store(&self) -> Duration {
        self.average(self.total_store)
    }

    pub fn average_end_to_end(&self) -> Duration {
        self.average(self.total_end_to_end())
    }

    /// Megapixels per second through the pipeline alone.
    pub fn kernel_throughput_mpps(&self) -> f64 {
        mpps(self.total_pixels, self.total_kernel)
    }

    /// Megapixels per second including load and store.
    pub fn end_to_end_throughput_mpps(&self) -> f64 {
        mpps(self.total_pixels, self.total_end_to_end())
    }
}

fn mpps(pixels: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if pixels == 0 || seconds <= 0.0 {
        return 0.0;
    }
    pixels as f64 / seconds / 1_000_000.0
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=================================================";
        writeln!(f, "{rule}")?;
        writeln!(f, "          EDGE BATCH PERFORMANCE SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "IMAGES PROCESSED: {}", self.images_processed)?;
        writeln!(f, "IMAGES SKIPPED:   {}", self.images_failed)?;
        writeln!(f, "--- TOTAL TIMES ---")?;
        writeln!(f, "{:<25}{:.3} MS", "TOTAL LOAD TIME:", ms(self.total_load))?;
        writeln!(f, "{:<25}{:.3} MS", "TOTAL KERNEL TIME:", ms(self.total_kernel))?;
        writeln!(f, "{:<25}{:.3} MS", "TOTAL STORE TIME:", ms(self.total_store))?;
        writeln!(f, "{:<25}{:.3} MS", "TOTAL END-TO-END TIME:", ms(self.total_end_to_end()))?;
        writeln!(f, "--- AVERAGE TIMES PER IMAGE ---")?;
        writeln!(f, "{:<25}{:.3} MS", "AVG LOAD TIME:", ms(self.average_load()))?;
        writeln!(f, "{:<25}{:.3} MS", "AVG KERNEL TIME:", ms(self.average_kernel()))?;
        writeln!(f, "{:<25}{:.3} MS", "AVG STORE TIME:", ms(self.average_store()))?;
        writeln!(f, "{:<25}{:.3} MS", "AVG END-TO-END TIME:", ms(self.average_end_to_end()))?;
        writeln!(f, "--- THROUGHPUT (MPPS) ---")?;
        writeln!(f, "{:<25}{:.3} MPPS", "KERNEL THROUGHPUT:", self.kernel_throughput_mpps())?;
        writeln!(f, "{:<25}{:.3} MPPS", "END-TO-END THROUGHPUT:", self.end_to_end_throughput_mpps())?;
        write!(f, "{rule}")
    }
}

/// Lists the regular files in `dir` with an accepted extension, sorted by path.
pub fn collect_inputs(dir: impl AsRef<Path>, extensions: &[String]) -> Result<Vec<PathBuf>, EdgeError> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if accepted {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// `output_dir/<prefix><input file name>`.
pub fn output_path_for(input: &Path, output_dir: &Path, prefix: &str) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    output_dir.join(format!("{prefix}{name}"))
}

/// Loads, processes and stores a single image.
pub async fn process_image_file(pipeline: &EdgePipeline, input: &Path, output: &Path) -> Result<ImageMetrics, EdgeError> {
    let load_start = Instant::now();
    let source = input.to_path_buf();
    let frame = tokio::task::spawn_blocking(move || load_packed(source)).await??;
    let load = load_start.elapsed();

    let geometry = frame.geometry;
    let kernel_start = Instant::now();
    let words = pipeline.run(frame.words, geometry).await?;
    let kernel = kernel_start.elapsed();

    let store_start = Instant::now();
    let destination = output.to_path_buf();
    let written = tokio::task::spawn_blocking(move || save_edges(&words, geometry, destination)).await??;
    let store = store_start.elapsed();
    if !written {
        warn!("{}", skipped_save_notice(input, geometry));
    }

    Ok(ImageMetrics {
        pixels_processed: geometry.input_pixels(),
        load,
        kernel,
        store,
    })
}

fn skipped_save_notice(input: &Path, geometry: FrameGeometry) -> String {
    format!(
        "{} is {}x{}, too small for a 3x3 window; no output written",
        input.display(),
        geometry.height,
        geometry.width
    )
}

/// Runs the whole batch described by `config`.
pub async fn run_batch(config: &BatchConfig) -> Result<BatchReport, EdgeError> {
    config.validate()?;
    std::fs::create_dir_all(&config.output_dir)?;
    let inputs = collect_inputs(&config.input_dir, &config.extensions)?;
    let mut report = BatchReport::default();
    if inputs.is_empty() {
        warn!("no images found in input directory {}", config.input_dir.display());
        return Ok(report);
    }
    info!(
        "starting batch of {} images from {} with {} workers ({:?} mode)",
        inputs.len(),
        config.input_dir.display(),
        config.workers,
        config.pipeline.mode
    );

    let pipeline = EdgePipeline::new(config.pipeline.clone());
    let mut results = stream::iter(inputs)
        .map(|input| {
            let pipeline = &pipeline;
            let output = output_path_for(&input, &config.output_dir, &config.output_prefix);
            async move {
                let result = process_image_file(pipeline, &input, &output).await;
                (input, result)
            }
        })
        .buffer_unordered(config.workers);

    while let Some((input, result)) = results.next().await {
        match result {
            Ok(metrics) => {
                info!("processed {} in {:.3} ms", input.display(), ms(metrics.total()));
                report.record(&metrics);
            }
            Err(err) => {
                warn!("skipping {}: {}", input.display(), err);
                report.record_failure(input, err.to_string());
            }
        }
    }
    Ok(report)
}
