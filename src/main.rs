/// Version injected at compile time via APIGW_RESOURCES_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("APIGW_RESOURCES_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use apigw_resources::aws::format_api_error;
use apigw_resources::config::{Config, APP_NAME};
use apigw_resources::resource::render_table;
use apigw_resources::{
    fetch_resources, ApiGatewayClient, FetchError, ResourcesFacts, ResourcesParams,
};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Get AWS API Gateway resource facts for a REST API
#[derive(Parser, Debug)]
#[command(name = "apigw-resources", version, about, long_about = None)]
struct Args {
    /// Identifier of the REST API
    #[arg(long)]
    id: Option<String>,

    /// JSON file holding module arguments, e.g. {"id": "hlji08"}
    #[arg(long, conflicts_with = "id")]
    args_file: Option<PathBuf>,

    /// AWS region to use
    #[arg(short, long)]
    region: Option<String>,

    /// AWS shared-config profile to use
    #[arg(short, long)]
    profile: Option<String>,

    /// Custom API Gateway endpoint URL
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Persist region, profile and endpoint as defaults
    #[arg(long)]
    save_defaults: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Stdout carries the result document, so logs go to a file
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("{} {} started with log level: {:?}", APP_NAME, VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(APP_NAME).join(format!("{}.log", APP_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        return home
            .join(format!(".{}", APP_NAME))
            .join(format!("{}.log", APP_NAME));
    }
    PathBuf::from(format!("{}.log", APP_NAME))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let result = match run(&args).await {
        Ok(facts) => render(args.output, &facts),
        Err(err) => Err(err),
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Invocation failed: {:#}", err);
            println!("{}", failure_document(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<ResourcesFacts> {
    // Parameters are validated before any AWS configuration is resolved
    let module_args = match &args.args_file {
        Some(path) => Some(read_args_file(path)?),
        None => None,
    };
    let params = ResourcesParams::resolve(args.id.as_deref(), module_args.as_ref())
        .map_err(FetchError::from)?;

    let mut config = Config::load();
    let settings = config.client_settings(
        args.region.as_deref(),
        args.profile.as_deref(),
        args.endpoint_url.as_deref(),
    );

    if args.save_defaults {
        config.remember(&settings);
        config.save().context("Failed to save config")?;
    }

    let client = ApiGatewayClient::new(&settings)
        .await
        .context("Failed to initialize API Gateway client")?;

    let policy = config.retry_policy();
    let facts = fetch_resources(&client, &params, &policy).await?;

    Ok(facts)
}

fn read_args_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read arguments file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Arguments file {:?} is not valid JSON", path))
}

fn render(format: OutputFormat, facts: &ResourcesFacts) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(facts).context("Failed to serialize result")
        }
        OutputFormat::Yaml => serde_yaml::to_string(facts).context("Failed to serialize result"),
        OutputFormat::Table => {
            let items = facts
                .items()
                .context("Response items do not have the expected shape")?;
            Ok(render_table(&items))
        }
    }
}

/// Result document for a failed invocation
fn failure_document(err: &anyhow::Error) -> Value {
    let fetch_error = err.downcast_ref::<FetchError>();

    match fetch_error.and_then(FetchError::api_error) {
        Some(api_error) => json!({
            "failed": true,
            "changed": false,
            "msg": format_api_error(api_error),
            "exception": err.to_string(),
            "error": {
                "code": api_error.code(),
                "message": api_error.message(),
            },
        }),
        None => json!({
            "failed": true,
            "changed": false,
            "msg": format!("{:#}", err),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigw_resources::{ApiError, ParamsError};

    #[test]
    fn test_failure_document_throttled() {
        let err = anyhow::Error::from(FetchError::Throttled {
            attempts: 10,
            source: ApiError::service("TooManyRequestsException", "Too Many Requests"),
        });

        let doc = failure_document(&err);

        assert_eq!(doc["failed"], true);
        assert_eq!(doc["changed"], false);
        assert_eq!(doc["msg"], "Rate limit exceeded. Please try again later.");
        assert_eq!(
            doc["exception"],
            "gave up after 10 attempts: TooManyRequestsException: Too Many Requests"
        );
        assert_eq!(
            doc["error"],
            json!({"code": "TooManyRequestsException", "message": "Too Many Requests"})
        );
    }

    #[test]
    fn test_failure_document_service_error() {
        let err = anyhow::Error::from(FetchError::Api(ApiError::Service {
            code: "NotFoundException".to_string(),
            message: "Invalid API identifier specified 123456789012:hlji08".to_string(),
            status: Some(404),
        }));

        let doc = failure_document(&err);

        assert_eq!(doc["failed"], true);
        assert_eq!(doc["msg"], "REST API not found. Check the id and region.");
        assert_eq!(
            doc["exception"],
            "Couldn't get resources: NotFoundException: Invalid API identifier specified 123456789012:hlji08"
        );
        assert_eq!(doc["error"]["code"], "NotFoundException");
        assert_eq!(
            doc["error"]["message"],
            "Invalid API identifier specified 123456789012:hlji08"
        );
    }

    #[test]
    fn test_failure_document_transport_error() {
        let err = anyhow::Error::from(FetchError::Api(ApiError::Transport(
            "connection refused".to_string(),
        )));

        let doc = failure_document(&err);

        assert_eq!(
            doc["msg"],
            "Request failed. Check your network connection and endpoint URL."
        );
        assert_eq!(doc["error"], json!({"code": null, "message": "connection refused"}));
    }

    #[test]
    fn test_failure_document_invalid_params_has_no_error_block() {
        let err = anyhow::Error::from(FetchError::from(ParamsError::Missing("id")));

        let doc = failure_document(&err);

        assert_eq!(
            doc,
            json!({
                "failed": true,
                "changed": false,
                "msg": "missing required arguments: id",
            })
        );
    }

    #[test]
    fn test_failure_document_keeps_context_chain() {
        let err = anyhow::anyhow!("file not found").context("Failed to read arguments file");

        let doc = failure_document(&err);

        assert_eq!(doc["msg"], "Failed to read arguments file: file not found");
        assert!(doc.get("error").is_none());
        assert!(doc.get("exception").is_none());
    }
}
