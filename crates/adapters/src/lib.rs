// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: tool processes and the query tool

mod env;
pub mod process;
pub mod query;
pub mod subprocess;
pub mod traced;

pub use process::{LocalProcessAdapter, ProcessAdapter, ProcessError};
pub use query::{Pagination, PhpQueryAdapter, QueryAdapter, QueryError, QueryRequest, QueryResponse};
pub use traced::{TracedProcess, TracedQuery};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessAdapter, ProcessCall};
#[cfg(any(test, feature = "test-support"))]
pub use query::{FakeQueryAdapter, QueryCall};
