use crate::application::payload::PayloadMerger;
use crate::application::services::ProfileStore;
use crate::domain::auth::AuthStrategy;
use crate::domain::entities::{Profile, RequestConfig};
use crate::domain::errors::CallError;
use crate::domain::value_objects::HeaderSet;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw request inputs as supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub method: String,
    pub url: String,
    pub profile: Option<String>,
    pub headers: HeaderSet,
    /// Inline JSON text
    pub data: Option<String>,
    /// Contents of the JSON file, already read
    pub file_data: Option<String>,
    pub timeout: Duration,
    pub insecure: bool,
    pub auth_type: String,
    pub user: String,
    pub pass: String,
    pub token: String,
}

/// Combines profile defaults, CLI overrides and payload into a [`RequestConfig`]
pub struct RequestResolver<'a> {
    store: &'a dyn ProfileStore,
}

impl<'a> RequestResolver<'a> {
    pub fn new(store: &'a dyn ProfileStore) -> Self {
        Self { store }
    }

    pub fn resolve(&self, args: &CallArgs) -> Result<RequestConfig, CallError> {
        let profile = self.lookup_profile(args.profile.as_deref())?;
        let profile = profile.as_ref();

        let url = resolve_url(&args.url, profile)?;
        let body = PayloadMerger::body(args.file_data.as_deref(), args.data.as_deref())?;
        let headers = merge_headers(profile, &args.headers, body.is_some());
        let auth = resolve_auth(args, profile)?;

        debug!(
            method = %args.method.to_uppercase(),
            %url,
            headers = headers.len(),
            body_bytes = body.as_ref().map_or(0, Vec::len),
            auth = auth.kind(),
            "resolved request"
        );

        Ok(RequestConfig {
            method: args.method.to_uppercase(),
            url,
            headers,
            body: body.map(Bytes::from),
            timeout: args.timeout,
            auth,
            skip_tls_verify: args.insecure,
        })
    }

    fn lookup_profile(&self, name: Option<&str>) -> Result<Option<Profile>, CallError> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        let profiles = self.store.load()?;
        profiles
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| CallError::ProfileNotFound(name.to_string()))
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Absolute URLs win; relative paths are joined onto the profile base URL.
pub fn resolve_url(url: &str, profile: Option<&Profile>) -> Result<String, CallError> {
    if has_http_scheme(url) {
        return Ok(url.to_string());
    }
    match profile {
        Some(p) if !p.base_url.is_empty() => Ok(format!(
            "{}/{}",
            p.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )),
        _ => Err(CallError::MissingUrl(url.to_string())),
    }
}

fn merge_headers(profile: Option<&Profile>, cli: &HeaderSet, has_body: bool) -> HeaderSet {
    let mut headers = profile.map(|p| p.headers.clone()).unwrap_or_default();
    headers.overlay(cli);

    if has_body && !headers.contains_ignore_case(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    headers
}

fn resolve_auth(args: &CallArgs, profile: Option<&Profile>) -> Result<AuthStrategy, CallError> {
    let mut kind = args.auth_type.to_lowercase();
    let mut user = args.user.as_str();
    let mut pass = args.pass.as_str();
    let mut token = args.token.as_str();

    if let Some(p) = profile {
        let profile_kind = p.auth_type.to_lowercase();
        if (kind.is_empty() || kind == "none") && !profile_kind.is_empty() && profile_kind != "none"
        {
            kind = profile_kind;
        }
        if user.is_empty() {
            user = &p.user;
        }
        if pass.is_empty() {
            pass = &p.pass;
        }
        if token.is_empty() {
            token = &p.token;
        }
    }

    AuthStrategy::select(&kind, user, pass, token)
}
