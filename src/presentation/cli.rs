use crate::application::builders::request_builder::RequestBuilder;
use crate::application::executor::{RetryExecutor, RetryPolicy};
use crate::application::resolver::{CallArgs, RequestResolver};
use crate::application::services::{HttpClient, ProfileStore};
use crate::domain::value_objects::HeaderSet;
use crate::infrastructure::config::JsonFileProfileStore;
use crate::infrastructure::files::{read_payload_file, write_output_file};
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::output::{DisplayOptions, ResponseRenderer, render_request_preview};
use crate::presentation::profile::ProfileCommand;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// CLI configuration for restcall
#[derive(Parser, Debug)]
#[command(name = "restcall", version)]
#[command(about = "restcall: run one REST call with profiles, auth and retries", long_about = None)]
pub struct Cli {
    /// Profile file location (default: per-user config directory)
    #[arg(long, global = true, env = "RESTCALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging and a preview of the outgoing request on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a REST API call
    Call(CallCommand),
    /// Manage saved profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Args, Debug, Clone)]
pub struct CallCommand {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH...)
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request URL (absolute, or relative when using --profile)
    #[arg(short, long)]
    pub url: String,

    /// Profile name to use from config
    #[arg(short, long)]
    pub profile: Option<String>,

    /// HTTP header 'Key: Value' (can be repeated)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Inline JSON body
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Path to a JSON file with extra payload; --data wins on key collision
    #[arg(long = "json-file")]
    pub json_file: Option<PathBuf>,

    /// Timeout in seconds for each attempt
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Skip TLS verification (NOT recommended for prod)
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Auth: none|basic|bearer
    #[arg(long = "auth", default_value = "none")]
    pub auth_type: String,

    /// Username for basic auth
    #[arg(long, default_value = "")]
    pub user: String,

    /// Password for basic auth
    #[arg(long, default_value = "")]
    pub pass: String,

    /// Bearer token
    #[arg(long, default_value = "")]
    pub token: String,

    /// Pretty-print JSON responses
    #[arg(long)]
    pub pretty: bool,

    /// Print only the response body (no status/headers)
    #[arg(long)]
    pub raw: bool,

    /// Print only the response body; takes precedence over --raw
    #[arg(long = "json-only")]
    pub json_only: bool,

    /// Write the displayed response body to a file
    #[arg(short, long = "out")]
    pub output: Option<PathBuf>,

    /// Number of retries on network failures and 5xx responses
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub retries: i32,

    /// Delay between retries in seconds
    #[arg(long = "retry-delay", default_value_t = 1)]
    pub retry_delay: u64,
}

/// Parses a `Key: Value` header flag. Splits on the first colon.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{raw}', expected 'Key: Value'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("header key cannot be empty".to_string());
    }
    Ok((key.to_string(), value.trim().to_string()))
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let store = match &self.config {
            Some(path) => {
                debug!(config = %path.display(), "using profile store");
                JsonFileProfileStore::new(path)
            }
            None => JsonFileProfileStore::at_default_location(),
        };

        match &self.command {
            Command::Call(call) => {
                let client = HyperHttpClient::new();
                let mut stdout = std::io::stdout().lock();
                call.run(&store, &client, self.verbose, &mut stdout).await
            }
            Command::Profile(profile) => profile.run(&store, &mut std::io::stdout().lock()),
        }
    }
}

impl CallCommand {
    pub async fn run<W: Write>(
        &self,
        store: &dyn ProfileStore,
        client: &dyn HttpClient,
        verbose: bool,
        out: &mut W,
    ) -> Result<()> {
        let args = self.call_args()?;
        let config = RequestResolver::new(store).resolve(&args)?;

        if verbose {
            let preview = RequestBuilder::new().build(&config)?;
            render_request_preview(&preview.request, config.body.as_ref(), &mut std::io::stderr())
                .context("writing request preview")?;
        }

        let response = RetryExecutor::new(client, self.retry_policy())
            .execute(&config)
            .await?;

        let shown = ResponseRenderer::new(self.display_options())
            .render(&response, out)
            .context("writing response")?;

        if let Some(path) = &self.output {
            write_output_file(path, &shown)?;
            info!(path = %path.display(), bytes = shown.len(), "saved response");
        }
        Ok(())
    }

    fn call_args(&self) -> Result<CallArgs> {
        let file_data = self
            .json_file
            .as_deref()
            .map(read_payload_file)
            .transpose()?;

        Ok(CallArgs {
            method: self.method.clone(),
            url: self.url.clone(),
            profile: self.profile.clone(),
            headers: self.headers.iter().cloned().collect::<HeaderSet>(),
            data: self.data.clone(),
            file_data,
            timeout: Duration::from_secs(self.timeout),
            insecure: self.insecure,
            auth_type: self.auth_type.clone(),
            user: self.user.clone(),
            pass: self.pass.clone(),
            token: self.token.clone(),
        })
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_secs(self.retry_delay))
    }

    fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            pretty: self.pretty,
            raw: self.raw,
            json_only: self.json_only,
        }
    }
}
