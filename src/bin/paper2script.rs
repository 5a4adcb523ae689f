//! CLI binary for paper2script.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and renders the resulting script.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use paper2script::{
    AnalysisClient, AnalysisConfig, AnalysisProgress, AnalysisSettings, DetailLevel,
    DialogueScript, Emotion, Personality, ProgressHook,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

// ── CLI progress display using indicatif ─────────────────────────────────────

/// Terminal progress: a spinner for the upload and inference phases,
/// switching to a bounded bar while polling for server-side processing.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(Self::spinner_style());
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"])
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} checks  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"])
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl AnalysisProgress for CliProgress {
    fn on_upload_start(&self, bytes: u64) {
        self.bar.set_style(Self::spinner_style());
        self.bar.set_prefix("Uploading");
        self.bar
            .set_message(format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0)));
    }

    fn on_poll(&self, attempt: u32, max_attempts: u32) {
        // First poll: the upload reply said "not ready yet", so switch from
        // the spinner to a bar bounded by the attempt ceiling.
        if attempt == 1 {
            self.bar.set_style(Self::bar_style());
            self.bar.set_length(u64::from(max_attempts));
            self.bar.set_prefix("Processing");
        }
        self.bar.set_position(u64::from(attempt));
    }

    fn on_file_ready(&self) {
        self.bar.println(format!("  {} file processed", green("✓")));
    }

    fn on_inference_start(&self) {
        self.bar.set_style(Self::spinner_style());
        self.bar.set_prefix("Narrating");
        self.bar.set_message("丛雨 is reading the paper…");
    }

    fn on_script_ready(&self, line_count: usize) {
        self.bar
            .println(format!("  {} script ready ({line_count} lines)", green("✓")));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Read a paper as a dialogue transcript (stdout)
  paper2script paper.pdf

  # Longer lecture, gentler narrator
  paper2script --detail academic --personality gentle paper.pdf

  # Structured JSON for a reader UI
  paper2script --json paper.pdf > script.json

  # Write the script JSON to a file
  paper2script paper.pdf -o script.json

  # Fail with a typed error instead of the in-character fallback
  paper2script --strict paper.pdf

  # Point at a different model or deployment
  paper2script --model doubao-1-5-pro-32k paper.pdf

OUTPUT:
  Default    human-readable transcript: 【丛雨】(emotion) line
  --json     the full script as pretty-printed JSON {title, script: [...]}
  -o FILE    write the script JSON to FILE, print a summary to stderr

  On failure the default mode still prints a script: an in-character
  fallback whose second line embeds the error message. Use --strict to
  get a non-zero exit code instead.

ENVIRONMENT VARIABLES:
  ARK_API_KEY               Volcengine Ark API key (bearer token)
  ARK_MODEL                 Override the model ID
  ARK_BASE_URL              Override the API base URL
  PAPER2SCRIPT_DETAIL       Default for --detail
  PAPER2SCRIPT_PERSONALITY  Default for --personality

SETUP:
  1. Create an API key in the Volcengine Ark console
  2. export ARK_API_KEY=...
  3. paper2script paper.pdf

  Uploads are capped at 512 MB (the Files API limit). Server-side
  processing is polled every 2 s for up to 30 attempts before timing out.
"#;

/// Turn an academic paper (PDF) into a dialogue script narrated by 丛雨.
#[derive(Parser, Debug)]
#[command(
    name = "paper2script",
    version,
    about = "Turn an academic paper (PDF) into a dialogue script narrated by 丛雨",
    long_about = "Upload a paper PDF to Doubao (Volcengine Ark), let a vision-capable model \
read it whole, and print a staged dialogue lecture — opening, background, method, experiments, \
summary and gossip — as a transcript or as structured JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local paper PDF file.
    input: PathBuf,

    /// Write the script JSON to this file instead of printing a transcript.
    #[arg(short, long, env = "PAPER2SCRIPT_OUTPUT")]
    output: Option<PathBuf>,

    /// Lecture depth: brief, detailed, academic.
    #[arg(long, env = "PAPER2SCRIPT_DETAIL", value_enum, default_value = "brief")]
    detail: DetailArg,

    /// Narrator register: tsundere, gentle, strict.
    #[arg(
        long,
        env = "PAPER2SCRIPT_PERSONALITY",
        value_enum,
        default_value = "tsundere"
    )]
    personality: PersonalityArg,

    /// Model ID on the Ark deployment.
    #[arg(long, env = "ARK_MODEL")]
    model: Option<String>,

    /// API base URL (regional endpoint or proxy).
    #[arg(long, env = "ARK_BASE_URL")]
    base_url: Option<String>,

    /// Ark API key.
    #[arg(long, env = "ARK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the script as pretty JSON instead of a transcript.
    #[arg(long, env = "PAPER2SCRIPT_JSON")]
    json: bool,

    /// Exit non-zero on failure instead of printing the fallback script.
    #[arg(long, env = "PAPER2SCRIPT_STRICT")]
    strict: bool,

    /// Upload timeout in seconds.
    #[arg(long, env = "PAPER2SCRIPT_UPLOAD_TIMEOUT", default_value_t = 600)]
    upload_timeout: u64,

    /// Status-poll and inference timeout in seconds.
    #[arg(long, env = "PAPER2SCRIPT_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// Disable the progress display.
    #[arg(long, env = "PAPER2SCRIPT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPER2SCRIPT_VERBOSE")]
    verbose: bool,

    /// Suppress everything except the script itself and errors.
    #[arg(short, long, env = "PAPER2SCRIPT_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum DetailArg {
    Brief,
    Detailed,
    Academic,
}

impl From<DetailArg> for DetailLevel {
    fn from(v: DetailArg) -> Self {
        match v {
            DetailArg::Brief => DetailLevel::Brief,
            DetailArg::Detailed => DetailLevel::Detailed,
            DetailArg::Academic => DetailLevel::Academic,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PersonalityArg {
    Tsundere,
    Gentle,
    Strict,
}

impl From<PersonalityArg> for Personality {
    fn from(v: PersonalityArg) -> Self {
        match v {
            PersonalityArg::Tsundere => Personality::Tsundere,
            PersonalityArg::Gentle => Personality::Gentle,
            PersonalityArg::Strict => Personality::Strict,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress display is active;
    // the bar provides all the feedback that matters to the user.
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

    // ── Build config and client ──────────────────────────────────────────
    let progress = if show_progress {
        Some(CliProgress::new())
    } else {
        None
    };
    let hook = progress
        .as_ref()
        .map(|p| Arc::clone(p) as Arc<dyn AnalysisProgress>);

    let config = build_config(&cli, hook)?;
    let client = AnalysisClient::new(config).context("Failed to initialise the client")?;
    let settings = AnalysisSettings::new(
        cli.detail.clone().into(),
        cli.personality.clone().into(),
    );

    // ── Analyze ──────────────────────────────────────────────────────────
    let script = if cli.strict {
        client
            .try_analyze(&cli.input, &settings)
            .await
            .context("Analysis failed")?
    } else {
        client.analyze(&cli.input, &settings).await
    };

    if let Some(ref p) = progress {
        p.finish();
    }

    // ── Emit ─────────────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let json =
            serde_json::to_string_pretty(&script).context("Failed to serialise the script")?;
        tokio::fs::write(output_path, json.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} lines  →  {}",
                if script.is_fallback() {
                    cyan("⚠")
                } else {
                    green("✔")
                },
                bold(&script.lines.len().to_string()),
                bold(&output_path.display().to_string()),
            );
        }
    } else if cli.json {
        let json =
            serde_json::to_string_pretty(&script).context("Failed to serialise the script")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(render_transcript(&script).as_bytes())
            .context("Failed to write to stdout")?;

        if !cli.quiet {
            if script.is_fallback() {
                eprintln!(
                    "{} analysis failed; printed the fallback script (use --strict for a hard error)",
                    cyan("⚠")
                );
            } else {
                eprintln!(
                    "{} {} lines  {}",
                    green("✔"),
                    bold(&script.lines.len().to_string()),
                    dim(&script.title),
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressHook>) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .upload_timeout_secs(cli.upload_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(hook) = progress {
        builder = builder.progress(hook);
    }

    builder.build().context("Invalid configuration")
}

/// Render the script as a plain-text transcript.
///
/// No ANSI codes here: stdout stays pipeable, colour is reserved for the
/// progress display and summaries on stderr.
fn render_transcript(script: &DialogueScript) -> String {
    let mut out = String::new();
    out.push_str(&format!("《{}》\n\n", script.title));
    for line in &script.lines {
        if line.emotion == Emotion::Normal {
            out.push_str(&format!("【{}】{}\n", line.speaker, line.text));
        } else {
            out.push_str(&format!(
                "【{}】({}) {}\n",
                line.speaker,
                line.emotion.as_str(),
                line.text
            ));
        }
        if let Some(ref note) = line.note {
            out.push_str(&format!("    └ {note}\n"));
        }
    }
    out
}
