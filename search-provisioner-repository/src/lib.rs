//! # Search Provisioner Repository
//!
//! This crate provides traits and implementations for managing the resources
//! of a search service: data sources, synonym maps, indexes, skillsets and
//! indexers. It includes definitions for errors, the provider interface, JSON
//! template rendering, and a concrete implementation for Azure Cognitive
//! Search.

pub mod azure;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod response;
pub mod service;
pub mod template;
pub mod types;

pub use azure::AzureSearchProvider;
pub use config::{ResourceServiceConfig, SearchServiceConfig};
pub use errors::ManagementError;
pub use interfaces::SearchServiceProvider;
pub use service::ResourceService;
pub use template::{Placeholder, TemplateParameters};
pub use types::{DeleteOutcome, SkillsetParameters};
