// SPDX-License-Identifier: Apache-2.0

pub const MAX_ALLOWED_LIMIT: u32 = 500;
pub const MAX_TEXT_LEN_HARD: u32 = 256;
pub const MAX_CACHE_AGE_SECS: u64 = 86_400;
