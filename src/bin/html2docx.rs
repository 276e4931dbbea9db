//! CLI binary for edgequake-html2docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and writes the resulting document.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_html2docx::{
    convert_to_file, extract_blocks, read_html, ConversionConfig, ConversionProgressCallback,
    ConversionStats, Html2DocxError, HttpImageResolver, ImageError, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
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

/// Terminal progress callback: a spinner that reports image fetches as they
/// settle. Sibling images resolve concurrently, so events arrive in any order.
struct CliProgressCallback {
    bar: ProgressBar,
    resolved: AtomicUsize,
    failed: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Loading letterhead…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            resolved: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        })
    }

    fn refresh(&self) {
        self.bar.set_message(format!(
            "{} images embedded, {} dropped",
            self.resolved.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst)
        ));
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, top_level_nodes: usize) {
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Walking {top_level_nodes} top-level nodes…"))
        ));
        self.refresh();
    }

    fn on_image_start(&self, source: &str) {
        self.bar.set_message(format!("fetching {}", ellipsize(source, 60)));
    }

    fn on_image_resolved(&self, source: &str, bytes: usize) {
        self.resolved.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            ellipsize(source, 60),
            dim(&format!("{bytes} bytes")),
        ));
        self.refresh();
    }

    fn on_image_failed(&self, source: &str, error: &ImageError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {}  {}",
            red("✗"),
            ellipsize(source, 60),
            red(&ellipsize(&error.to_string(), 80)),
        ));
        self.refresh();
    }

    fn on_conversion_complete(&self, total_blocks: usize, images_failed: usize) {
        self.bar.finish_and_clear();
        if images_failed == 0 {
            eprintln!(
                "{} {} blocks converted",
                green("✔"),
                bold(&total_blocks.to_string())
            );
        } else {
            eprintln!(
                "{} {} blocks converted  ({} images dropped)",
                cyan("⚠"),
                bold(&total_blocks.to_string()),
                red(&images_failed.to_string()),
            );
        }
    }
}

/// Shorten `s` to at most `max` characters, on a char boundary.
fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert an HTML file; writes "Weekly Meeting.docx"
  html2docx notes.html --title "Weekly Meeting"

  # Explicit output path
  html2docx notes.html --title "Weekly Meeting" -o minutes/2024-05-06.docx

  # Read HTML from stdin
  cat notes.html | html2docx - --title "Weekly Meeting"

  # Custom letterhead and a shorter image timeout
  html2docx notes.html --title Memo --letterhead /srv/assets/letterhead.png --image-timeout 5

  # Inspect the block list without writing a document
  html2docx notes.html --title Memo --blocks-only

ENVIRONMENT VARIABLES:
  HTML2DOCX_LETTERHEAD     Letterhead image path (default assets/letterhead.png)
  HTML2DOCX_IMAGE_TIMEOUT  Per-image download timeout in seconds
  HTML2DOCX_CREATOR        Author written to the document properties
  RUST_LOG                 Overrides the log filter (e.g. edgequake_html2docx=debug)
"#;

/// Convert rich-text HTML into a letterheaded Word document.
#[derive(Parser, Debug)]
#[command(
    name = "html2docx",
    version,
    about = "Convert rich-text HTML into a letterheaded Word document",
    long_about = "Convert an HTML fragment (as produced by a rich-text editor) into a .docx \
document. Headings, paragraphs with bold/italic/underline runs, lists, tables and images are \
kept; the letterhead image is placed in the header of every page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file to convert, or `-` to read stdin.
    input: String,

    /// Document title, inserted as the first heading.
    #[arg(short, long, env = "HTML2DOCX_TITLE")]
    title: String,

    /// Write the document to this file. Default: `<title>.docx`.
    #[arg(short, long, env = "HTML2DOCX_OUTPUT")]
    output: Option<PathBuf>,

    /// Letterhead image placed in the page header.
    #[arg(long, env = "HTML2DOCX_LETTERHEAD")]
    letterhead: Option<PathBuf>,

    /// Per-image download timeout in seconds.
    #[arg(long, env = "HTML2DOCX_IMAGE_TIMEOUT", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    image_timeout: u64,

    /// Author recorded in the document properties.
    #[arg(long, env = "HTML2DOCX_CREATOR")]
    creator: Option<String>,

    /// Print the mapped block list as JSON; no document is written.
    #[arg(long, env = "HTML2DOCX_BLOCKS_ONLY")]
    blocks_only: bool,

    /// Print conversion statistics as JSON.
    #[arg(long, env = "HTML2DOCX_JSON")]
    json: bool,

    /// Disable progress spinner.
    #[arg(long, env = "HTML2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HTML2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "HTML2DOCX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already reports every image; keep library logs quiet
    // while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.blocks_only;
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

    let html = read_input(&cli.input).await?;

    // ── Blocks-only mode ─────────────────────────────────────────────────
    if cli.blocks_only {
        let resolver =
            HttpImageResolver::new(cli.image_timeout).context("Failed to build HTTP client")?;
        let blocks = extract_blocks(&html, &resolver).await;
        println!(
            "{}",
            serde_json::to_string_pretty(&blocks).context("Failed to serialise blocks")?
        );
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let (output_path, stats) = write_document(&cli, &html, &config).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} blocks  {} images  {}ms  →  {}",
            if stats.images_failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.total_blocks,
            stats.images_embedded,
            stats.duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.images_failed > 0 && !show_progress {
            eprintln!("  {} images dropped", stats.images_failed);
        }
    }

    Ok(())
}

/// Convert `html` and write it atomically to `-o` or `<title>.docx`.
async fn write_document(
    cli: &Cli,
    html: &str,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionStats)> {
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.title));
    let stats = convert_to_file(html, &cli.title, &output_path, config)
        .await
        .context("Conversion failed")?;
    Ok((output_path, stats))
}

async fn read_input(input: &str) -> Result<String, Html2DocxError> {
    if input == "-" {
        let mut html = String::new();
        tokio::io::stdin()
            .read_to_string(&mut html)
            .await
            .map_err(|e| Html2DocxError::InputReadFailed {
                path: PathBuf::from("-"),
                source: e,
            })?;
        Ok(html)
    } else {
        read_html(input).await
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().image_timeout_secs(cli.image_timeout);

    if let Some(ref path) = cli.letterhead {
        builder = builder.letterhead_path(path);
    }
    if let Some(ref creator) = cli.creator {
        builder = builder.creator(creator);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `<title>.docx`, with characters unsafe in file names replaced.
fn default_output_path(title: &str) -> PathBuf {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let stem = if stem.is_empty() { "document" } else { stem };
    PathBuf::from(format!("{stem}.docx"))
}
