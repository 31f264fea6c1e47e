use crate::domain::auth::AuthStrategy;
use crate::domain::value_objects::HeaderSet;
use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A named bundle of request defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "HeaderSet::is_empty")]
    pub headers: HeaderSet,
    /// none | basic | bearer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pass: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl Profile {
    /// Auth type for display, `none` when unset.
    pub fn auth_label(&self) -> &str {
        if self.auth_type.is_empty() {
            "none"
        } else {
            &self.auth_type
        }
    }
}

/// All stored profiles, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSet {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl ProfileSet {
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn upsert(&mut self, profile: Profile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        self.profiles.remove(name)
    }
}

/// Fully resolved description of the request to execute.
///
/// Built once per invocation and never mutated; every attempt derives a
/// fresh request from it.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Upper-cased method token
    pub method: String,
    pub url: String,
    pub headers: HeaderSet,
    pub body: Option<Bytes>,
    pub timeout: Duration,
    pub auth: AuthStrategy,
    pub skip_tls_verify: bool,
}

/// Per-attempt transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    pub timeout: Duration,
    pub verify_tls: bool,
}

/// Represents an HTTP response with its body fully read
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}
