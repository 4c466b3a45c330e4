//! CLI binary for slidecut.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SegmentationConfig`, prints detected units and writes split bundles.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use slidecut::{
    detect_async, input::read_pdf, split_async, write_bundles, Backend, BundleManifestEntry,
    DetectionReport, ProgressCallback, SegmentationConfig, SplitProgressCallback, SplitSpec,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the units of a split plus a log
/// line per finished unit.
struct CliProgressCallback {
    bar: ProgressBar,
    unit_started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_split_start` tells us how many units there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            unit_started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} units  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Splitting");
    }

    /// Remove the bar unless a callback already finished or abandoned it.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }

    fn unit_elapsed_ms(&self) -> u128 {
        self.unit_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0)
    }
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_split_start(&self, total_units: usize) {
        self.activate_bar(total_units);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Splitting into {total_units} units…"))
        ));
    }

    fn on_unit_start(&self, _ordinal: usize, _total: usize, name: &str) {
        if let Ok(mut started) = self.unit_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_unit_complete(&self, ordinal: usize, total: usize, page_count: usize) {
        let elapsed_ms = self.unit_elapsed_ms();
        self.bar.println(format!(
            "  {} Unit {:>2}/{:<2}  {:<10}  {}",
            green("✓"),
            ordinal,
            total,
            dim(&format!("{page_count:>3} pages")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_unit_error(&self, ordinal: usize, total: usize, error: &str) {
        let elapsed_ms = self.unit_elapsed_ms();
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Unit {:>2}/{:<2}  {}  {}",
            red("✗"),
            ordinal,
            total,
            red(&msg),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.abandon();
    }

    fn on_split_complete(&self, total_units: usize) {
        self.bar.finish_and_clear();
        if self.errors.load(Ordering::SeqCst) == 0 {
            eprintln!(
                "{} {} units split successfully",
                green("✔"),
                bold(&total_units.to_string())
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Propose units for a deck
  slidecut detect lecture.pdf

  # Same, as JSON (edit it, then feed it back with --spec)
  slidecut detect --json lecture.pdf > units.json

  # Split along the detected units, dropping one break slide per unit
  slidecut split lecture.pdf --remove-break-slides -o units/

  # Split along confirmed units
  slidecut split lecture.pdf --spec units.json -o units/

  # German decks
  slidecut --outline-marker Gliederung --break-marker Pause detect vorlesung.pdf

  # No native pdfium available
  slidecut --backend lopdf detect lecture.pdf

ENVIRONMENT VARIABLES:
  SLIDECUT_BACKEND          Engine: pdfium (default) or lopdf
  SLIDECUT_PDFIUM_LIB       Path to libpdfium (file or directory)
  PDFIUM_LIB_PATH           Fallback path to libpdfium
  SLIDECUT_PASSWORD         User password for encrypted decks
  SLIDECUT_OUTLINE_MARKERS  Comma-separated outline markers
  SLIDECUT_BREAK_MARKERS    Comma-separated break markers
  RUST_LOG                  Overrides the log filter
"#;

/// Split lecture slide decks into one PDF per teaching unit.
#[derive(Parser, Debug)]
#[command(
    name = "slidecut",
    version,
    about = "Split lecture slide decks into one PDF per teaching unit",
    long_about = "Detect teaching units in a lecture slide deck from its repeated outline \
slides, then split the deck into one PDF per unit, optionally dropping a break slide \
from each.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// PDF engine.
    #[arg(long, global = true, env = "SLIDECUT_BACKEND", value_enum, default_value = "pdfium")]
    backend: BackendArg,

    /// Path to the pdfium shared library, or the directory holding it.
    #[arg(long, global = true, env = "SLIDECUT_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// PDF user password for encrypted decks.
    #[arg(long, global = true, env = "SLIDECUT_PASSWORD")]
    password: Option<String>,

    /// Text that marks an outline page (repeatable).
    #[arg(long = "outline-marker", global = true, env = "SLIDECUT_OUTLINE_MARKERS", value_delimiter = ',')]
    outline_markers: Vec<String>,

    /// Text that marks a break slide (repeatable).
    #[arg(long = "break-marker", global = true, env = "SLIDECUT_BREAK_MARKERS", value_delimiter = ',')]
    break_markers: Vec<String>,

    /// Disable progress bar.
    #[arg(long, global = true, env = "SLIDECUT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SLIDECUT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SLIDECUT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Propose unit names and page ranges.
    Detect {
        /// Lecture deck.
        input: PathBuf,

        /// Print the detection report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Split a deck into one PDF per unit.
    Split {
        /// Lecture deck.
        input: PathBuf,

        /// Confirmed units as JSON (the `detect --json` format). Without it
        /// the deck is split along the detected units.
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Drop the first break slide of every unit.
        #[arg(long)]
        remove_break_slides: bool,

        /// Output directory.
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print a JSON manifest of the written units.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Pdfium,
    Lopdf,
}

impl From<BackendArg> for Backend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Pdfium => Backend::Pdfium,
            BackendArg::Lopdf => Backend::Lopdf,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = &cli.global;
    let json = match &cli.command {
        Command::Detect { json, .. } | Command::Split { json, .. } => *json,
    };

    // ── Logging setup ────────────────────────────────────────────
    // The progress bar replaces INFO logs while it is shown.
    let show_progress = matches!(cli.command, Command::Split { .. })
        && !global.quiet
        && !global.no_progress
        && !json;
    let filter = if global.verbose {
        "debug"
    } else if global.quiet || show_progress {
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

    match &cli.command {
        Command::Detect { input, json } => {
            let config = build_config(global, None)?;
            let bytes = read_pdf(input).with_context(|| format!("Failed to read {}", input.display()))?;
            let report = detect_async(bytes, &config)
                .await
                .context("Detection failed")?;

            if *json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialise report")?
                );
            } else {
                print_report(&report);
            }
        }
        Command::Split {
            input,
            spec,
            remove_break_slides,
            output,
            json,
        } => {
            let cli_progress = show_progress.then(CliProgressCallback::new_dynamic);
            let progress_cb: Option<ProgressCallback> = cli_progress
                .clone()
                .map(|cb| cb as Arc<dyn SplitProgressCallback>);

            let outcome = async {
                let config = build_config(global, progress_cb)?;
                let bytes = read_pdf(input)
                    .with_context(|| format!("Failed to read {}", input.display()))?;

                let split_spec = match spec {
                    Some(path) => {
                        let text = tokio::fs::read_to_string(path)
                            .await
                            .with_context(|| format!("Failed to read split spec from {:?}", path))?;
                        let mut parsed: SplitSpec =
                            serde_json::from_str(&text).context("Invalid split spec JSON")?;
                        parsed.remove_break_slides |= *remove_break_slides;
                        parsed
                    }
                    None => detect_async(bytes.clone(), &config)
                        .await
                        .context("Detection failed")?
                        .into_split_spec(*remove_break_slides),
                };

                if split_spec.units.is_empty() {
                    anyhow::bail!("No units to split: no outline pages found and no --spec given");
                }

                let bundles = split_async(bytes, split_spec, &config)
                    .await
                    .context("Split failed")?;
                let paths = write_bundles(output, &bundles).context("Failed to write units")?;
                Ok::<_, anyhow::Error>((bundles, paths))
            }
            .await;

            // The spinner runs from before the deck is read; a failure ahead
            // of `on_split_start` would otherwise leave it on screen.
            if outcome.is_err() {
                if let Some(cb) = &cli_progress {
                    cb.clear();
                }
            }
            let (bundles, paths) = outcome?;

            if *json {
                let manifest: Vec<BundleManifestEntry<'_>> = bundles
                    .iter()
                    .zip(paths)
                    .map(|(bundle, file)| BundleManifestEntry {
                        bundle,
                        file,
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&manifest).context("Failed to serialise manifest")?
                );
            } else if !global.quiet {
                for (bundle, path) in bundles.iter().zip(&paths) {
                    eprintln!(
                        "  {:>2}  {:<32}  {}  →  {}",
                        bundle.ordinal,
                        bundle.name,
                        dim(&format!("{:>3} pages", bundle.page_count)),
                        bold(&path.display().to_string()),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `SegmentationConfig`.
fn build_config(global: &GlobalArgs, progress: Option<ProgressCallback>) -> Result<SegmentationConfig> {
    let mut builder = SegmentationConfig::builder().backend(global.backend.into());

    if let Some(ref path) = global.pdfium_lib {
        builder = builder.pdfium_library(path);
    }
    if let Some(ref pwd) = global.password {
        builder = builder.password(pwd);
    }
    if !global.outline_markers.is_empty() {
        builder = builder.outline_markers(global.outline_markers.iter().cloned());
    }
    if !global.break_markers.is_empty() {
        builder = builder.break_markers(global.break_markers.iter().cloned());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_report(report: &DetectionReport) {
    if report.units.is_empty() {
        println!("No outline pages found in {} pages.", report.number_of_pages);
        return;
    }

    println!("{}", bold(&format!("{} units in {} pages", report.units.len(), report.number_of_pages)));
    for (i, unit) in report.units.iter().enumerate() {
        let name = if unit.unit_name.is_empty() {
            red("(no name)")
        } else {
            unit.unit_name.clone()
        };
        println!(
            "  {:>2}  {:<32}  pages {:>3}-{:<3}  {}",
            i + 1,
            name,
            unit.start_page,
            unit.end_page,
            dim(&unit.release_date.format("%Y-%m-%d").to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_removes_spinner_before_split_start() {
        let cb = CliProgressCallback::new_dynamic();
        assert!(!cb.bar.is_finished());

        cb.clear();

        assert!(cb.bar.is_finished());
        cb.clear();
    }

    #[test]
    fn clear_leaves_abandoned_bar_alone() {
        let cb = CliProgressCallback::new_dynamic();
        cb.on_split_start(3);
        cb.on_unit_start(1, 3, "Recursion");
        cb.on_unit_error(1, 3, "Failed to extract pages 1-5");
        assert!(cb.bar.is_finished());

        cb.clear();

        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
    }
}
