//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep boundary layers (HTTP controllers) decoupled from storage details.

pub mod achievement_service;
pub mod feed_service;
pub mod submission_service;
pub mod task_service;
