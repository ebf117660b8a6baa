//! Resource layer
//!
//! Fetching the API Gateway resource tree and presenting it.
//!
//! # Architecture
//!
//! - [`fetcher`] - Retried GetResources call plus key normalization
//! - [`display`] - Fixed-width table rendering of fetched resources
//!
//! # Example
//!
//! ```ignore
//! use apigw_resources::resource::fetch_resources;
//! use apigw_resources::{ApiGatewayClient, ResourcesParams, RetryPolicy};
//!
//! async fn list(client: &ApiGatewayClient) -> anyhow::Result<()> {
//!     let params = ResourcesParams::new("hlji08")?;
//!     let facts = fetch_resources(client, &params, &RetryPolicy::default()).await?;
//!     println!("{}", serde_json::to_string_pretty(&facts)?);
//!     Ok(())
//! }
//! ```

pub mod display;
mod fetcher;

pub use display::render_table;
pub use fetcher::{fetch_from_args, fetch_resources, Resource, ResourcesFacts, PAGE_LIMIT};
