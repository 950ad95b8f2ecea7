use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::client::{SourceClient, SourceClientError, SourceClientResult};

pub enum Canned {
    Items(Vec<Value>),
    Status(u16),
    Body(&'static str),
}

/// Answers every fetch with the same canned outcome.
pub struct StaticSourceClient {
    canned: Canned,
    pub fetch_count: AtomicUsize,
}

impl StaticSourceClient {
    pub fn new(canned: Canned) -> Self {
        Self {
            canned,
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn with_items(count: usize) -> Self {
        Self::new(Canned::Items(
            (0..count).map(|i| serde_json::json!({ "id": i })).collect(),
        ))
    }
}

#[async_trait]
impl SourceClient for StaticSourceClient {
    async fn fetch_items(&self, _source: &str) -> SourceClientResult<Vec<Value>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        match &self.canned {
            Canned::Items(items) => Ok(items.clone()),
            Canned::Status(status) => Err(SourceClientError::Status(*status)),
            Canned::Body(body) => Ok(serde_json::from_str(body)?),
        }
    }
}
