// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use serde::Deserialize;

/// Policy knobs for parsing and integrity checks.
///
/// The crate never loads configuration on its own. Embedders build a `Config` directly or
/// deserialize one from whatever format they already use; missing fields fall back to
/// [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Permit key descriptor version 1 (HMAC-MD5). Disable for FIPS-like deployments.
    pub allow_hmac_md5: bool,
    /// Log ignored and duplicated elements at warning level instead of trace level.
    pub show_errors: bool,
    /// Upper bound on PMKIDs handed out by `RsnData::pmkids`.
    pub max_pmkids: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { allow_hmac_md5: true, show_errors: true, max_pmkids: 16 }
    }
}

impl Config {
    pub fn fips() -> Self {
        Self { allow_hmac_md5: false, ..Default::default() }
    }
}

/// Logs a message about an ignored element at the level selected by `Config::show_errors`.
macro_rules! log_ignored {
    ($cfg:expr, $($arg:tt)+) => {
        if $cfg.show_errors {
            log::warn!($($arg)+);
        } else {
            log::trace!($($arg)+);
        }
    };
}
pub(crate) use log_ignored;
