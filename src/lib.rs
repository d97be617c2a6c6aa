//! Pull request gate for the OpenPublishing build.
//!
//! A gate invocation classifies the triggering event ([`event`]), polls the
//! commit's status list until the tracked context settles ([`gate`]), and
//! hands the resulting [`gate::Verdict`] to the runner's reporter
//! ([`report`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod gate;
pub mod github;
pub mod report;
pub mod runner;
pub mod telemetry;
pub mod ui;
