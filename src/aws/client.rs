//! API Gateway client
//!
//! SDK-backed implementation of [`ResourceApi`]. The SDK's own retry layer
//! is turned off; throttling is handled by [`crate::retry::RetryPolicy`].

use super::convert::get_resources_output_to_json;
use crate::error::ApiError;
use anyhow::Result;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_apigateway::config::http::HttpResponse;
use aws_sdk_apigateway::config::retry::RetryConfig;
use aws_sdk_apigateway::config::Region;
use aws_sdk_apigateway::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_apigateway::operation::get_resources::GetResourcesError;
use aws_sdk_apigateway::Client;
use serde_json::Value;

/// Maximum length of an error message to log
const MAX_LOG_MESSAGE_LENGTH: usize = 200;

/// Truncate and strip non-printable characters before logging
fn sanitize_for_log(message: &str) -> String {
    let truncated = if message.chars().count() > MAX_LOG_MESSAGE_LENGTH {
        let head: String = message.chars().take(MAX_LOG_MESSAGE_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, message.len())
    } else {
        message.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Read-only access to the API Gateway resource listing
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Fetch one page of resources for a REST API.
    ///
    /// The returned document uses the service's camelCase keys:
    /// `{"items": [...], "position"?, "ResponseMetadata": {...}}`.
    async fn get_resources(&self, rest_api_id: &str, limit: i32) -> Result<Value, ApiError>;
}

/// Overrides applied on top of the SDK's default configuration chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

/// API Gateway client
#[derive(Clone, Debug)]
pub struct ApiGatewayClient {
    client: Client,
}

impl ApiGatewayClient {
    /// Resolve configuration (env, profile files, IMDS) and build a client
    pub async fn new(settings: &ClientSettings) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;

        let Some(region) = sdk_config.region() else {
            return Err(anyhow::anyhow!(
                "No AWS region configured. Set AWS_REGION or use --region"
            ));
        };
        tracing::info!("Using region: {}", region);

        Ok(Self::from_sdk_config(&sdk_config))
    }

    /// Build from an already loaded shared configuration
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        let conf = aws_sdk_apigateway::config::Builder::from(sdk_config)
            .retry_config(RetryConfig::disabled())
            .build();
        Self::from_conf(conf)
    }

    /// Build from a service configuration, used as-is
    pub fn from_conf(conf: aws_sdk_apigateway::Config) -> Self {
        Self {
            client: Client::from_conf(conf),
        }
    }
}

#[async_trait]
impl ResourceApi for ApiGatewayClient {
    async fn get_resources(&self, rest_api_id: &str, limit: i32) -> Result<Value, ApiError> {
        tracing::debug!("GetResources restApiId={} limit={}", rest_api_id, limit);

        let output = self
            .client
            .get_resources()
            .rest_api_id(rest_api_id)
            .limit(limit)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(get_resources_output_to_json(&output))
    }
}

fn map_sdk_error(err: SdkError<GetResourcesError, HttpResponse>) -> ApiError {
    let api_error = match &err {
        SdkError::ServiceError(context) => ApiError::Service {
            code: err.code().unwrap_or("Unknown").to_string(),
            message: err.message().unwrap_or_default().to_string(),
            status: Some(context.raw().status().as_u16()),
        },
        _ => ApiError::Transport(DisplayErrorContext(&err).to_string()),
    };

    tracing::error!("API error: {}", sanitize_for_log(&api_error.to_string()));
    api_error
}

/// Format an API error for display
pub fn format_api_error(error: &ApiError) -> String {
    let code = match error {
        ApiError::Service { code, .. } => code.as_str(),
        ApiError::Transport(_) => {
            return "Request failed. Check your network connection and endpoint URL.".to_string()
        }
    };

    match code {
        "NotFoundException" => "REST API not found. Check the id and region.".to_string(),
        "UnauthorizedException" | "UnrecognizedClientException" | "InvalidClientTokenId" => {
            "Authentication failed. Check your AWS credentials.".to_string()
        }
        "AccessDeniedException" => {
            "Permission denied. The caller needs apigateway:GET on the REST API.".to_string()
        }
        "BadRequestException" => "Invalid request. Check your parameters.".to_string(),
        "TooManyRequestsException" | "Throttling" | "ThrottlingException" => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        _ => format!("{}: {}", code, sanitize_for_log(error.message())),
    }
}
