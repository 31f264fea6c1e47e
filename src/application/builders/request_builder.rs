use crate::application::services::HttpRequest;
use crate::domain::entities::{RequestConfig, TransportSettings};
use crate::domain::errors::CallError;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Method, Request, Uri};

/// One executable unit: a fresh request plus the transport it should go through
#[derive(Debug)]
pub struct Attempt {
    pub request: HttpRequest,
    pub transport: TransportSettings,
}

/// Turns a resolved [`RequestConfig`] into an [`Attempt`].
///
/// Every call produces an independent request; nothing is shared between
/// attempts built from the same config. No network I/O happens here.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, config: &RequestConfig) -> Result<Attempt, CallError> {
        let method = Method::from_bytes(config.method.as_bytes())
            .map_err(|_| CallError::InvalidMethod(config.method.clone()))?;
        let uri = config
            .url
            .parse::<Uri>()
            .map_err(|e| CallError::InvalidUrl {
                url: config.url.clone(),
                reason: e.to_string(),
            })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(CallError::InvalidUrl {
                url: config.url.clone(),
                reason: "missing scheme or host".to_string(),
            });
        }

        let body = match &config.body {
            Some(bytes) => Full::new(bytes.clone()),
            None => Full::new(Bytes::new()),
        };

        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .map_err(|e| CallError::InvalidUrl {
                url: config.url.clone(),
                reason: e.to_string(),
            })?;

        for (name, value) in config.headers.iter() {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| CallError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| CallError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            request.headers_mut().insert(header_name, header_value);
        }

        config.auth.apply(&mut request)?;

        Ok(Attempt {
            request,
            transport: TransportSettings {
                timeout: config.timeout,
                verify_tls: !config.skip_tls_verify,
            },
        })
    }
}
