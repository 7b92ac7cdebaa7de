// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod config;
pub mod http_server;
pub mod search;

pub use config::{ServerConfig, DEFAULT_LISTEN_ADDR};
pub use http_server::{router, start_server, AppState};
pub use search::{search_handler, SearchApiError, SearchApiRequest, SearchApiResponse, TargetResult};
