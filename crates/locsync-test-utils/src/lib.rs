//! Shared test utilities for the locsync workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a locsync project on disk
//! - [`server`]: [`StubServer`] local HTTP endpoint with canned responses

pub mod project;
pub mod server;

pub use project::TestProject;
pub use server::{RecordedRequest, StubResponse, StubServer};
