//! AWS API interaction module
//!
//! This module wraps the API Gateway SDK client behind a small trait so the
//! fetcher can be driven by the real service or by a scripted stand-in.
//!
//! # Module Structure
//!
//! - [`client`] - [`ResourceApi`] seam, SDK-backed client and error formatting
//! - [`convert`] - Typed SDK output to the camelCase wire JSON shape
//!
//! # Example
//!
//! ```ignore
//! use apigw_resources::aws::{ApiGatewayClient, ClientSettings, ResourceApi};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiGatewayClient::new(&ClientSettings::default()).await?;
//!     let page = client.get_resources("hlji08", 500).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod convert;

pub use client::{format_api_error, ApiGatewayClient, ClientSettings, ResourceApi};
