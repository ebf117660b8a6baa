//! Gather AWS API Gateway resource facts.
//!
//! Fetches the resource tree of a REST API with one bounded `GetResources`
//! call, retrying throttled requests with jittered exponential backoff, and
//! returns the result with every key normalized to snake_case.
//!
//! # Modules
//!
//! - [`params`] - Argument validation
//! - [`retry`] - Retry policy
//! - [`transform`] - camelCase to snake_case key conversion
//! - [`aws`] - API Gateway client
//! - [`resource`] - The fetcher and result presentation
//! - [`config`] - Persistent defaults
//! - [`error`] - Error types

pub mod aws;
pub mod config;
pub mod error;
pub mod params;
pub mod resource;
pub mod retry;
pub mod transform;

pub use aws::{ApiGatewayClient, ClientSettings, ResourceApi};
pub use error::{ApiError, FetchError, ParamsError};
pub use params::ResourcesParams;
pub use resource::{fetch_from_args, fetch_resources, Resource, ResourcesFacts};
pub use retry::{Jitter, RetryPolicy};
