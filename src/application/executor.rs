use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpClient;
use crate::domain::entities::{RequestConfig, Response};
use crate::domain::errors::CallError;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bounded retry policy applied to network failures and 5xx responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: i32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: i32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// `retries + 1`, never less than one.
    pub fn max_attempts(&self) -> u32 {
        u32::try_from(self.retries).unwrap_or(0).saturating_add(1)
    }
}

/// Classification of a single attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Response),
    Retryable(String),
    Terminal(CallError),
}

impl AttemptOutcome {
    fn classify(result: Result<Response, impl std::fmt::Display>) -> Self {
        match result {
            Err(e) => AttemptOutcome::Retryable(e.to_string()),
            Ok(response) if response.status.is_server_error() => {
                AttemptOutcome::Retryable(format!("received HTTP {}", response.status.as_u16()))
            }
            Ok(response) => AttemptOutcome::Success(response),
        }
    }
}

/// Drives the attempt loop for a single logical request
pub struct RetryExecutor<'a> {
    client: &'a dyn HttpClient,
    builder: RequestBuilder,
    policy: RetryPolicy,
}

impl<'a> RetryExecutor<'a> {
    pub fn new(client: &'a dyn HttpClient, policy: RetryPolicy) -> Self {
        Self {
            client,
            builder: RequestBuilder::new(),
            policy,
        }
    }

    pub async fn execute(&self, config: &RequestConfig) -> Result<Response, CallError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            match self.attempt(config).await {
                AttemptOutcome::Success(response) => {
                    info!(attempt, status = response.status.as_u16(), "request completed");
                    return Ok(response);
                }
                AttemptOutcome::Terminal(err) => return Err(err),
                AttemptOutcome::Retryable(reason) if attempt >= max_attempts => {
                    warn!(attempt, %reason, "giving up");
                    return Err(CallError::RetriesExhausted {
                        attempts: max_attempts,
                        reason,
                    });
                }
                AttemptOutcome::Retryable(reason) => {
                    warn!(
                        attempt,
                        max_attempts,
                        %reason,
                        delay = ?self.policy.delay,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, config: &RequestConfig) -> AttemptOutcome {
        let attempt = match self.builder.build(config) {
            Ok(attempt) => attempt,
            Err(err) => return AttemptOutcome::Terminal(err),
        };
        debug!(method = %attempt.request.method(), uri = %attempt.request.uri(), "sending request");

        let result = self.client.send(attempt.request, attempt.transport).await;
        AttemptOutcome::classify(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::MockHttpClient;
    use crate::domain::auth::AuthStrategy;
    use crate::domain::errors::TransportError;
    use bytes::Bytes;
    use hyper::header::AUTHORIZATION;
    use hyper::{HeaderMap, StatusCode};
    use mockall::Sequence;
    use tokio::time::Instant;

    fn config() -> RequestConfig {
        RequestConfig {
            method: "GET".to_string(),
            url: "https://api.example.com/health".to_string(),
            headers: Default::default(),
            body: None,
            timeout: Duration::from_secs(30),
            auth: AuthStrategy::Bearer {
                token: "secret".to_string(),
            },
            skip_tls_verify: false,
        }
    }

    fn response(status: u16) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn max_attempts_is_at_least_one() {
        assert_eq!(RetryPolicy::new(-3, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::new(2, Duration::ZERO).max_attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_on_repeated_server_errors() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .times(3)
            .returning(|_, _| Ok(response(503)));

        let executor = RetryExecutor::new(&client, RetryPolicy::new(2, Duration::from_secs(1)));
        let started = Instant::now();
        let err = executor.execute(&config()).await.unwrap_err();

        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert!(matches!(err, CallError::RetriesExhausted { attempts: 3, .. }));
        let message = err.to_string();
        assert!(message.contains("3 attempt(s)"), "{message}");
        assert!(message.contains("503"), "{message}");
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_non_server_error() {
        let mut seq = Sequence::new();
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(response(503)));
        client
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(response(200)));

        let executor = RetryExecutor::new(&client, RetryPolicy::new(2, Duration::from_secs(1)));
        let started = Instant::now();
        let response = executor.execute(&config()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .times(1)
            .returning(|_, _| Ok(response(404)));

        let executor = RetryExecutor::new(&client, RetryPolicy::new(5, Duration::from_secs(1)));
        let response = executor.execute(&config()).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failures_are_retried() {
        let mut seq = Sequence::new();
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(TransportError::Request("connection refused".to_string())));
        client
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, t| Err(TransportError::Timeout(t.timeout)));

        let executor = RetryExecutor::new(&client, RetryPolicy::new(1, Duration::from_millis(250)));
        let err = executor.execute(&config()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("request failed after 2 attempt(s)"), "{message}");
        assert!(message.contains("timed out"), "{message}");
    }

    #[tokio::test(start_paused = true)]
    async fn negative_retries_still_make_one_attempt() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .times(1)
            .returning(|_, _| Ok(response(500)));

        let executor = RetryExecutor::new(&client, RetryPolicy::new(-1, Duration::from_secs(1)));
        let started = Instant::now();
        let err = executor.execute(&config()).await.unwrap_err();

        assert!(err.to_string().contains("1 attempt(s)"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn build_errors_are_terminal_and_consume_no_attempt() {
        let mut client = MockHttpClient::new();
        client.expect_send().never();

        let executor = RetryExecutor::new(&client, RetryPolicy::new(3, Duration::from_secs(1)));
        let err = executor
            .execute(&RequestConfig {
                url: "not a url".to_string(),
                ..config()
            })
            .await
            .unwrap_err();

        assert!(err.is_configuration());
    }

    #[tokio::test(start_paused = true)]
    async fn every_attempt_carries_exactly_one_authorization_header() {
        let mut client = MockHttpClient::new();
        client.expect_send().times(3).returning(|request, _| {
            let values: Vec<_> = request.headers().get_all(AUTHORIZATION).iter().collect();
            assert_eq!(values, ["Bearer secret"]);
            Ok(response(502))
        });

        let executor = RetryExecutor::new(&client, RetryPolicy::new(2, Duration::ZERO));
        assert!(executor.execute(&config()).await.is_err());
    }
}
