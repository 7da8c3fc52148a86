//! Azure Cognitive Search implementation of the search service provider.
//!
//! This module provides a concrete implementation of `SearchServiceProvider`
//! that talks to the versioned REST management API with reqwest.

mod provider;

pub use provider::AzureSearchProvider;
