//! # credentialforge
//!
//! Synthetic business-document generator that embeds regex-conformant
//! decoy credentials for DLP and detector benchmarking.
//!
//! `credentialforge` produces realistic-looking emails, office documents,
//! presentations, spreadsheets, images, and diagrams, each carrying one
//! or more decoy credentials that conform to a caller-supplied regex
//! pattern database. Nothing it emits is a real secret; the point is to
//! exercise a downstream detector (DLP scanner, secret scanner, SIEM
//! rule) against documents shaped like the real thing.
//!
//! ## Components
//!
//! - [`core`]: the request/response data model and shared domain types.
//! - [`pattern_db`]: the regex catalog driving credential generation and
//!   validation.
//! - [`credential`]: the credential factory (pattern-conformant,
//!   process-unique decoy values).
//! - [`assembler`]: builds a document's content structure from a topic,
//!   company, language, and set of credentials.
//! - [`binder`]: serializes a content structure to a concrete file per
//!   format.
//! - [`neural`]: optional LLM-backed content/credential generation,
//!   behind the `neural` feature.
//! - [`worker`] / [`memory_governor`] / [`orchestrator`]: the concurrent
//!   batch pipeline that ties everything together.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]

pub mod assembler;
pub mod binder;
pub mod cli;
pub mod config;
pub mod core;
pub mod credential;
pub mod error;
pub mod memory_governor;
pub mod neural;
pub mod orchestrator;
pub mod pattern_db;
pub mod worker;

pub use error::{Error, Result};

pub use core::{EmbedStrategy, Request, RequestBuilder};
pub use orchestrator::{Orchestrator, RunResult};
pub use pattern_db::PatternDatabase;
