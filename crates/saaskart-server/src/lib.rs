// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod app;
pub mod config;
mod http;

pub use app::{build_router, AppState};
pub use config::ServerConfig;

pub const CRATE_NAME: &str = "saaskart-server";
