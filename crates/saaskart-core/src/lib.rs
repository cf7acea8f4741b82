// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod canonical;
mod config;
mod errors;

pub use config::{resolve_saaskart_config_path, resolve_policy_root, ConfigPathScope};
pub use errors::{ErrorCode, ErrorContext, ExitCode, MachineError, ResultExt};

pub const CRATE_NAME: &str = "saaskart-core";

pub const ENV_SAASKART_LOG_LEVEL: &str = "SAASKART_LOG_LEVEL";
pub const ENV_SAASKART_POLICY_ROOT: &str = "SAASKART_POLICY_ROOT";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    canonical::stable_hash_hex(bytes)
}
