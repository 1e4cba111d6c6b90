//! Shared test utilities for the resolve-kit workspace.
//!
//! This crate provides fixtures for exercising the resolver factory. It is
//! a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`creator`]: [`CountingCreator`], a creation collaborator that records
//!   every call
//! - [`recorder`]: [`HookRecorder`], an ordered log of hook invocations

pub mod creator;
pub mod recorder;

pub use creator::{CountingCreator, FakeResolver};
pub use recorder::HookRecorder;
