// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod akm;
pub mod cipher;
pub mod rsne;
pub mod suite_selector;

pub use self::rsne::{parse_rsn, ErrorCode, Proto, RsnCapabilities, RsnData};

pub const PMKID_LEN: usize = 16;
