// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake query adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{QueryAdapter, QueryError, QueryRequest, QueryResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Recorded query call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCall {
    pub executable: String,
    pub script: String,
    pub request: QueryRequest,
}

#[derive(Default)]
struct FakeQueryState {
    replies: VecDeque<Result<QueryResponse, String>>,
    calls: Vec<QueryCall>,
    delay: Option<Duration>,
}

/// Fake query adapter for testing.
///
/// Replies are consumed in order; with none queued the call fails.
#[derive(Clone, Default)]
pub struct FakeQueryAdapter {
    inner: Arc<Mutex<FakeQueryState>>,
}

impl FakeQueryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<QueryCall> {
        self.inner.lock().calls.clone()
    }

    /// Queue a response document
    pub fn push_response(&self, response: QueryResponse) {
        self.inner.lock().replies.push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, message: &str) {
        self.inner
            .lock()
            .replies
            .push_back(Err(message.to_string()));
    }

    /// Hold each call for `delay` before replying
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = Some(delay);
    }
}

#[async_trait]
impl QueryAdapter for FakeQueryAdapter {
    async fn query(
        &self,
        executable: &str,
        script: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError> {
        let (reply, delay) = {
            let mut inner = self.inner.lock();
            inner.calls.push(QueryCall {
                executable: executable.to_string(),
                script: script.to_string(),
                request: request.clone(),
            });
            (inner.replies.pop_front(), inner.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(QueryError::Failed(message)),
            None => Err(QueryError::Failed("no reply scripted".to_string())),
        }
    }
}
