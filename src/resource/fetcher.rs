//! Resource Fetcher
//!
//! Fetches the resource tree of a REST API, one bounded page, and returns
//! it with snake_case keys.

use crate::aws::ResourceApi;
use crate::error::FetchError;
use crate::params::ResourcesParams;
use crate::retry::RetryPolicy;
use crate::transform::camel_dict_to_snake_dict;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Page size requested from GetResources; the maximum the service accepts
pub const PAGE_LIMIT: i32 = 500;

/// A node in the API Gateway resource tree, as emitted (snake_case)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_part: Option<String>,
    /// HTTP method name (lower-cased by normalization) to method details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_methods: Option<BTreeMap<String, Value>>,
}

/// Result of a fetch, ready to be emitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourcesFacts {
    /// `{items: [...], response_metadata: {...}}`
    pub resources: Value,
    /// Always false; this is a read-only query
    pub changed: bool,
}

impl ResourcesFacts {
    /// Typed view of `resources.items`
    pub fn items(&self) -> Result<Vec<Resource>, serde_json::Error> {
        match self.resources.get("items") {
            Some(items) => Vec::<Resource>::deserialize(items),
            None => Ok(Vec::new()),
        }
    }

    /// Number of entries in `resources.items`
    pub fn item_count(&self) -> usize {
        self.resources
            .get("items")
            .and_then(|v| v.as_array())
            .map_or(0, Vec::len)
    }
}

/// Fetch one page of resources for a validated parameter set
pub async fn fetch_resources<A>(
    api: &A,
    params: &ResourcesParams,
    policy: &RetryPolicy,
) -> Result<ResourcesFacts, FetchError>
where
    A: ResourceApi + ?Sized,
{
    let id = params.id.as_str();
    tracing::debug!("Fetching resources for REST API {}", id);

    // The page is passed through untouched; retries are only logged
    let (page, retries) = policy
        .run("get_resources", move || api.get_resources(id, PAGE_LIMIT))
        .await?;

    let facts = ResourcesFacts {
        resources: camel_dict_to_snake_dict(&page, false, &[]),
        changed: false,
    };

    tracing::info!(
        "Fetched {} resources for REST API {} ({} retries)",
        facts.item_count(),
        id,
        retries
    );

    Ok(facts)
}

/// Validate raw module arguments, then fetch.
///
/// The API is not touched when validation fails.
pub async fn fetch_from_args<A>(
    api: &A,
    args: &Value,
    policy: &RetryPolicy,
) -> Result<ResourcesFacts, FetchError>
where
    A: ResourceApi + ?Sized,
{
    let params = ResourcesParams::from_json(args)?;
    fetch_resources(api, &params, policy).await
}
