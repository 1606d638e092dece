//! CLI binary for imgb64.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConverterConfig`, resolves inputs and prints per-file results.

use anyhow::{Context, Result};
use clap::Parser;
use imgb64::pipeline::input::{scan_input_dir, ScannedInputs};
use imgb64::{
    inspect, BatchSummary, ConversionOutcome, ConversionProgressCallback, Converter, ConverterConfig,
    Direction, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Terminal progress callback: one status line per finished file, plus an
/// optional [indicatif] bar. Files may finish out of order when running
/// concurrently; every line carries its own `[i/N]` position.
struct CliProgressCallback {
    /// `None` when the bar is disabled; lines then go straight to stderr.
    bar: Option<ProgressBar>,
    /// Per-file wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new(with_bar: bool) -> Arc<Self> {
        let bar = with_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn line(&self, msg: String) {
        match self.bar {
            Some(ref bar) => bar.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total as u64);
            bar.reset_eta();
        }
    }

    fn on_file_start(&self, index: usize, _total: usize, path: &Path, _direction: Option<Direction>) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(index, Instant::now());
        }
        if let Some(ref bar) = self.bar {
            bar.set_message(file_name(path));
        }
    }

    fn on_file_complete(&self, index: usize, total: usize, outcome: &ConversionOutcome) {
        let elapsed = dim(&format!("{:.2}s", self.elapsed_secs(index)));
        let label = outcome.direction.map(|d| d.label()).unwrap_or("Skipped");
        let head = format!("[{}/{}] {}: {}", index + 1, total, label, outcome.input_name());

        if outcome.success {
            let out = outcome
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            self.line(format!("  {}  {} {}  {}", head, green("✓"), dim(&out), elapsed));
        } else {
            let err = outcome.error.as_deref().unwrap_or("unknown error");
            // Keep multi-line hints out of the status line.
            let first_line = err.lines().next().unwrap_or(err);
            self.line(format!("  {}  {} {}  {}", head, red("✗"), red(first_line), elapsed));
        }

        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _total: usize, _succeeded: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Batch mode: convert everything in ./Inputs into ./Outputs
  imgb64

  # Encode images into base64 HTML documents
  imgb64 logo.png photo.jpg -o embedded/

  # Decode the first data URI in each file back into an image
  imgb64 page.html styles.txt -o images/

  # Mix files and directories, 8 conversions at a time
  imgb64 assets/ extra.gif -c 8

  # Show MIME type, size and pixel dimensions without converting
  imgb64 --inspect-only assets/

  # Machine-readable results
  imgb64 --json Inputs/ > report.json

SUPPORTED FILES:
  Direction               Extensions
  ──────────────────────  ──────────────────────
  Image → Base64 HTML     .png .jpg .jpeg .gif .bmp   (writes <stem>.txt)
  Base64 HTML → Image     .txt .html .htm             (writes <stem>.<ext>)

  The output extension of a decoded image follows the data URI's MIME type:
  image/png → .png, image/jpeg → .jpg, image/gif → .gif, image/bmp → .bmp,
  anything else → .png. Existing outputs are overwritten.

ENVIRONMENT VARIABLES:
  IMGB64_OUTPUT_DIR       Output directory (default: Outputs)
  IMGB64_INPUT_DIR        Directory scanned when no inputs are given (default: Inputs)
  IMGB64_CONCURRENCY      Conversions in flight (default: 4)
  RUST_LOG                Override the log filter (e.g. imgb64=debug)
"#;

/// Convert images to base64 HTML documents and back.
#[derive(Parser, Debug)]
#[command(
    name = "imgb64",
    version,
    about = "Convert images to base64 HTML documents and back",
    long_about = "Encode PNG, JPEG, GIF and BMP images into self-contained HTML documents \
carrying a base64 data URI, or decode the first data URI found in a text/HTML file back \
into an image. The direction is chosen per file from its extension.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image or text files, or directories to scan. Defaults to --input-dir.
    inputs: Vec<PathBuf>,

    /// Directory receiving converted files (created if missing).
    #[arg(short, long, env = "IMGB64_OUTPUT_DIR", default_value = "Outputs")]
    output_dir: PathBuf,

    /// Directory scanned when no inputs are given.
    #[arg(long, env = "IMGB64_INPUT_DIR", default_value = "Inputs")]
    input_dir: PathBuf,

    /// Number of conversions in flight.
    #[arg(short, long, env = "IMGB64_CONCURRENCY", default_value_t = 4,
          value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,

    /// Output structured JSON ({ outcomes, summary }) on stdout.
    #[arg(long, env = "IMGB64_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMGB64_NO_PROGRESS")]
    no_progress: bool,

    /// Print image metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMGB64_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMGB64_QUIET")]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    outcomes: &'a [ConversionOutcome],
    summary: BatchSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the status lines already say everything the library would.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve inputs ───────────────────────────────────────────────────
    let base_config = ConverterConfig::default();
    let inputs = collect_inputs(&cli, &base_config)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        return run_inspect(&cli, &base_config, &inputs);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let status_lines = !cli.quiet && !cli.json;
    let progress_cb: Option<ProgressCallback> = if status_lines {
        let cb = CliProgressCallback::new(show_progress);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let mut builder = ConverterConfig::builder().concurrency(cli.concurrency as usize);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;
    let converter = Converter::new(config);

    if status_lines {
        print_banner(&converter, &inputs, &cli.output_dir);
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let started = Instant::now();
    let outcomes = converter
        .convert_batch_concurrent(&inputs, &cli.output_dir)
        .await;
    let summary = BatchSummary::from_outcomes(&outcomes);

    if cli.json {
        let report = JsonReport {
            outcomes: &outcomes,
            summary,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise outcomes")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&summary, &cli.output_dir, started.elapsed());
    }

    if summary.total > 0 && summary.succeeded == 0 {
        anyhow::bail!("All {} file(s) failed to convert", summary.total);
    }
    Ok(())
}

/// Expand CLI inputs into a flat file list. Directories are scanned (not
/// recursively); with no inputs at all, `--input-dir` is scanned.
fn collect_inputs(cli: &Cli, config: &ConverterConfig) -> Result<Vec<PathBuf>> {
    if cli.inputs.is_empty() {
        let found = scan_input_dir(&cli.input_dir, config)
            .with_context(|| format!("Failed to scan {}", cli.input_dir.display()))?;
        if found.is_empty() {
            anyhow::bail!(
                "No convertible files found in '{}' and no inputs given.\n\
                 Interactive file selection is not available; pass files or directories, \
                 or place them in the input directory.\n\
                 Accepted: images (.{}) and text files (.{})",
                cli.input_dir.display(),
                config.image_extensions.join(" ."),
                config.text_extensions.join(" ."),
            );
        }
        return Ok(found.into_paths());
    }

    let mut paths = Vec::new();
    for input in &cli.inputs {
        if input.is_dir() {
            let found: ScannedInputs = scan_input_dir(input, config)
                .with_context(|| format!("Failed to scan {}", input.display()))?;
            paths.extend(found.into_paths());
        } else {
            paths.push(input.clone());
        }
    }
    if paths.is_empty() {
        anyhow::bail!("No convertible files found in the given directories");
    }
    Ok(paths)
}

fn print_banner(converter: &Converter, inputs: &[PathBuf], output_dir: &Path) {
    let mut images = 0;
    let mut texts = 0;
    let mut other = 0;
    for p in inputs {
        match converter.classify(p) {
            Some(Direction::Encode) => images += 1,
            Some(Direction::Decode) => texts += 1,
            None => other += 1,
        }
    }

    let mode = match (images > 0, texts > 0) {
        (true, false) => Direction::Encode.label(),
        (false, true) => Direction::Decode.label(),
        _ => "Mixed batch",
    };
    eprintln!("{} {}", cyan("◆"), bold(mode));
    eprintln!(
        "   {} image(s), {} text file(s){}  →  {}",
        images,
        texts,
        if other > 0 {
            format!(", {} unsupported", other)
        } else {
            String::new()
        },
        bold(&output_dir.display().to_string()),
    );
}

fn print_summary(summary: &BatchSummary, output_dir: &Path, elapsed: Duration) {
    let mark = if summary.failed == 0 {
        green("✔")
    } else if summary.succeeded == 0 {
        red("✘")
    } else {
        cyan("⚠")
    };
    eprintln!(
        "{} {}/{} converted  ({} encoded, {} decoded)  {}",
        mark,
        bold(&summary.succeeded.to_string()),
        summary.total,
        summary.encoded,
        summary.decoded,
        dim(&format!("{:.2}s", elapsed.as_secs_f64())),
    );
    if summary.failed > 0 {
        eprintln!(
            "   {} failed{}",
            red(&summary.failed.to_string()),
            if summary.unsupported > 0 {
                format!(" ({} unsupported)", summary.unsupported)
            } else {
                String::new()
            }
        );
    }
    if summary.succeeded > 0 {
        eprintln!("   Output files saved to {}", bold(&output_dir.display().to_string()));
    }
}

fn run_inspect(cli: &Cli, config: &ConverterConfig, inputs: &[PathBuf]) -> Result<()> {
    let converter = Converter::new(config.clone());
    let images: Vec<&PathBuf> = inputs
        .iter()
        .filter(|p| converter.classify(p) == Some(Direction::Encode))
        .collect();
    if images.is_empty() {
        anyhow::bail!("No image files to inspect");
    }

    let mut infos = Vec::with_capacity(images.len());
    for path in images {
        let info = inspect(path).with_context(|| format!("Failed to inspect {}", path.display()))?;
        infos.push(info);
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&infos).context("Failed to serialise image info")?
        );
    } else {
        for info in &infos {
            println!("File:         {}", info.file_name);
            println!("Type:         {}", info.mime_type);
            println!("Size:         {} ({} bytes)", info.size_human, info.size_bytes);
            println!("Dimensions:   {}", info.dimensions);
            println!();
        }
    }
    Ok(())
}
