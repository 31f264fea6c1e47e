use crate::domain::entities::{ProfileSet, Response, TransportSettings};
use crate::domain::errors::{StoreError, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;

pub type HttpRequest = hyper::Request<Full<Bytes>>;

/// Trait for HTTP transports to enable mocking and dependency inversion
///
/// Implementations must read the response body completely before returning,
/// and treat every call as an independent transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        request: HttpRequest,
        transport: TransportSettings,
    ) -> Result<Response, TransportError>;
}

/// Persistent storage for named profiles
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore {
    /// Loads every profile. A store that does not exist yet is empty.
    fn load(&self) -> Result<ProfileSet, StoreError>;

    fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError>;
}
