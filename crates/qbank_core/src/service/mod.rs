//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing, normalization and repository calls into
//!   operator-level use cases.
//! - Keep CLI callers decoupled from storage details.

pub mod bulk;
pub mod interchange;
pub mod record_service;
