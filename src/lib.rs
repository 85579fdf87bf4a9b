//! Candidate research - automated background research on job candidates
//!
//! This crate hands a research brief to an autonomous engine that can search
//! the web and fetch pages, watches the engine's event stream, and turns its
//! final free-form answer into a structured [`ResearchRecord`] that renders
//! as a markdown dossier or as JSON.
//!
//! # Quick Start
//!
//! ```ignore
//! use candidate_research::{render_markdown, ResearchConfig, Researcher, Subject};
//!
//! #[tokio::main]
//! async fn main() -> candidate_research::Result<()> {
//!     let researcher = Researcher::new(ResearchConfig::new().verbose(true));
//!     let subject = Subject::name("Jane Doe").at("Acme Corp");
//!
//!     let record = researcher.run(&subject).await?;
//!     println!("{}", render_markdown(&record));
//!     Ok(())
//! }
//! ```
//!
//! The reduction, extraction and rendering steps are plain functions
//! ([`reduce`], [`extract`], [`render_markdown`]) and can be used without an
//! engine.

pub mod agent;
pub mod engine;
mod error;
pub mod extract;
pub mod record;
pub mod render;
mod subject;

pub use agent::{EngineEvent, ResearchCallbacks, ResearchConfig, Researcher, reduce};
pub use engine::{ClaudeCli, EngineRequest, EventStream, ReasoningEngine};
pub use error::{Error, Result};
pub use extract::extract;
pub use record::{CareerRole, PublicPresence, ResearchRecord};
pub use render::{Format, render, render_json, render_markdown};
pub use subject::Subject;
