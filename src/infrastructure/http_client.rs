use crate::application::services::{HttpClient, HttpRequest};
use crate::domain::entities::{Response, TransportSettings};
use crate::domain::errors::TransportError;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tokio_native_tls::native_tls;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Infrastructure implementation of HttpClient using Hyper
///
/// A new client (and connection pool) is assembled for every call so that
/// attempts never share transport state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HyperHttpClient;

impl HyperHttpClient {
    pub fn new() -> Self {
        Self
    }

    fn transport(settings: TransportSettings) -> Result<HttpsClient, TransportError> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(settings.timeout));

        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(!settings.verify_tls)
            .danger_accept_invalid_hostnames(!settings.verify_tls)
            .build()
            .map_err(|e| TransportError::Tls(e.to_string()))?;
        let https = HttpsConnector::from((http, tokio_native_tls::TlsConnector::from(tls)));

        Ok(Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https))
    }

    async fn execute_http_request(
        client: &HttpsClient,
        request: HttpRequest,
    ) -> Result<Response, TransportError> {
        let hyper_response = client
            .request(request)
            .await
            .map_err(|e| TransportError::Request(error_chain(&e)))?;
        ResponseAdapter::to_domain_response(hyper_response).await
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(
        &self,
        request: HttpRequest,
        transport: TransportSettings,
    ) -> Result<Response, TransportError> {
        let client = Self::transport(transport)?;
        tokio::time::timeout(
            transport.timeout,
            Self::execute_http_request(&client, request),
        )
        .await
        .map_err(|_| TransportError::Timeout(transport.timeout))?
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
    ) -> Result<Response, TransportError> {
        let (parts, body) = hyper_response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_bytes();

        Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }
}

/// hyper-util wraps the interesting cause; surface the whole chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
