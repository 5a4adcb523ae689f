//! # paper2script
//!
//! Turn an academic paper (PDF) into a staged dialogue script, narrated by
//! 丛雨 — an ancient, erudite, none-too-patient spirit.
//!
//! ## Why this crate?
//!
//! Dense papers are a chore to read cover to cover. Instead of extracting
//! text locally, this crate uploads the PDF to Doubao (Volcengine Ark),
//! lets a vision-capable model read the document whole — figures, tables,
//! and equations included — and asks for a structured lecture: opening,
//! background and pain points, core method, experiments, then summary and
//! gossip. The reply is decoded into a typed script of speaker/text/emotion
//! lines ready for a reader UI or a TTS stage.
//!
//! Failures never escape [`AnalysisClient::analyze`]: every error path
//! returns an in-character fallback script with the diagnostic embedded as
//! a dialogue line, so downstream rendering needs no error state.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Guard    size ≤ 512 MB and %PDF magic, before any network
//!  ├─ 2. Upload   multipart POST /files (purpose=user_data)
//!  ├─ 3. Poll     GET /files/{id} until processed (2 s × 30 attempts)
//!  ├─ 4. Infer    POST /responses with input_file + persona prompt
//!  └─ 5. Decode   strip ``` fences, parse and validate the script JSON
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paper2script::{AnalysisClient, AnalysisConfig, AnalysisSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential resolved from ARK_API_KEY when not set explicitly
//!     let client = AnalysisClient::new(AnalysisConfig::default())?;
//!     let script = client.analyze("paper.pdf", &AnalysisSettings::default()).await;
//!     println!("{}", script.title);
//!     for line in &script.lines {
//!         println!("{} ({}): {}", line.speaker, line.emotion.as_str(), line.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `paper2script` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! paper2script = { version = "0.2", default-features = false }
//! ```
//!
//! ## Tuning the Lecture
//!
//! | Detail level | Length | What you get |
//! |--------------|--------|--------------|
//! | `brief`    | ~15 rounds | The paper's story: what, why, how well |
//! | `detailed` | 25+ rounds | Every section covered, no technical detail skipped |
//! | `academic` | ~30 rounds | Terminology unpacked, weaknesses and open questions called out |
//!
//! Personality (`tsundere` / `gentle` / `strict`) changes the narrator's
//! register, never the coverage.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod script;
pub mod settings;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api::{ArkBackend, ArkClient};
pub use client::AnalysisClient;
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::AnalysisError;
pub use progress::{AnalysisProgress, NoopProgress, ProgressHook};
pub use script::{DialogueLine, DialogueScript, Emotion};
pub use settings::{AnalysisSettings, DetailLevel, Personality};
