//! Interface definitions for the management API provider.
//!
//! This module defines the abstract `SearchServiceProvider` trait that allows
//! for dependency injection and swappable transports (the live HTTP client in
//! production, in-memory mocks in tests).

mod search_service_provider;

pub use search_service_provider::SearchServiceProvider;
