// Test helpers: an in-memory `Fetch` that records every request.

use crate::api::Fetch;
use crate::config::ClientConfig;
use crate::error::ApiError;
use serde_json::Value;
use std::cell::RefCell;

pub(crate) fn test_config() -> ClientConfig {
    ClientConfig::new("http://box.test", "test-token").unwrap()
}

/// Canned answer for one route.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16, String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

impl Call {
    /// All values sent for `key`, in order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Routes are matched by URL suffix; unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeFetcher {
    routes: Vec<(String, Reply)>,
    calls: RefCell<Vec<Call>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, suffix: &str, reply: Reply) -> Self {
        self.routes.push((suffix.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, suffix: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.url.ends_with(suffix))
            .collect()
    }
}

impl Fetch for FakeFetcher {
    fn get_json(&self, url: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError> {
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            query: query.to_vec(),
        });

        let reply = self
            .routes
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Status(404, "no such route".to_string()));

        match reply {
            Reply::Json(body) => Ok(body),
            Reply::Status(status, body) => Err(ApiError::Status {
                url: url.to_string(),
                status,
                body,
            }),
        }
    }
}
