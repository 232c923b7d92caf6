// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Savedeck engine: tool supervision, query gateway, configuration

mod audit;
mod config;
pub mod env;
mod error;
mod gateway;
mod supervisor;

pub use audit::{AuditLevel, AuditLog};
pub use config::{AppConfig, DEFAULT_VIEWER_HOST, DEFAULT_VIEWER_PORT};
pub use error::{ConfigError, LaunchError, QueryFailure, StopError};
pub use gateway::{QueryGateway, QueryOptions};
pub use supervisor::{Supervisor, SupervisorDeps};
