//! Pipeline stages for one paper analysis.
//!
//! Each submodule implements exactly one phase. Keeping phases separate
//! makes each independently testable and keeps the orchestration in
//! [`crate::client`] readable as a straight sequence.
//!
//! ## Data Flow
//!
//! ```text
//! guard ──▶ upload ──▶ poll ──▶ infer ──▶ decode
//! (local)  (/files)  (status)  (/responses)  (serde)
//! ```
//!
//! 1. [`upload`] — multipart upload plus the bounded status-poll loop;
//!    returns the file id once the server reports it ready
//! 2. [`inference`] — the model call referencing that file id; returns the
//!    concatenated reply text
//! 3. [`decode`] — deterministic fence stripping and JSON decoding into
//!    the validated script
//!
//! The size and magic-byte guards run before any of these, in the client,
//! so a rejected file never touches the network.

pub mod decode;
pub mod inference;
pub mod upload;
