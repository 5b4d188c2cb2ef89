//! Dossier Probes - Probe registry, orchestration and the built-in probes.
//!
//! A probe gathers one category of information about the identifiers in a
//! [`Context`](dossier_core::Context). Probes are registered by name in a
//! [`ProbeRegistry`], and the [`Orchestrator`] runs a selection of them one
//! after another, isolating each failure into that probe's slot of the
//! resulting [`Report`].
//!
//! # Architecture
//!
//! - **Probe** ([`probe`]): the capability every module implements
//! - **Registry** ([`registry`]): name to constructor mapping, built at startup
//! - **Orchestrator** ([`orchestrator`]): sequential runner with failure isolation
//! - **Report** ([`report`]): the aggregate result of one run
//! - **Command** ([`command`]): templated subprocess invocation with a timeout
//! - **Artifacts** ([`artifacts`]): email/hostname extraction from tool output
//! - **Probes** ([`probes`]): breach, username, domain, external command, sherlock
//! - **Sources** ([`sources`]): network collaborators the probes delegate to
//!
//! # Example
//!
//! ```rust,ignore
//! use dossier_core::{AppConfig, Context};
//! use dossier_probes::{builtin, Orchestrator};
//!
//! let config = AppConfig::default();
//! let registry = builtin::default_registry(&config)?;
//! let orchestrator = Orchestrator::new(registry);
//!
//! let ctx = Context::builder().domain("example.org").build();
//! let report = orchestrator.run_all(&ctx, &[]).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod artifacts;
pub mod builtin;
pub mod command;
pub mod error;
pub mod orchestrator;
pub mod probe;
pub mod probes;
pub mod registry;
pub mod report;
pub mod sources;

// Re-export commonly used types
pub use artifacts::{extract_artifacts, Artifacts};
pub use command::{CommandError, CommandOutput, CommandRunner, CommandTemplate, ResolvedCommand};
pub use error::{ProbeError, Result};
pub use orchestrator::Orchestrator;
pub use probe::{Probe, ProbeResult};
pub use registry::{ProbeConstructor, ProbeRegistry};
pub use report::{ModuleResults, Report};
