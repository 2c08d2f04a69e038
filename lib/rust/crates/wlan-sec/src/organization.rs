// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;
use std::ops::Deref;

/// Organizationally unique identifier, used by suite selectors and vendor specific elements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oui([u8; 3]);

impl Oui {
    pub const DOT11: Self = Self([0x00, 0x0F, 0xAC]);
    pub const MSFT: Self = Self([0x00, 0x50, 0xF2]);
    pub const WFA: Self = Self([0x50, 0x6F, 0x9A]);
    pub const BROADCOM: Self = Self([0x00, 0x90, 0x4C]);
    pub const QCA: Self = Self([0x00, 0x13, 0x74]);

    pub const fn new(oui: [u8; 3]) -> Self {
        Self(oui)
    }

    /// Reads an OUI from the first three octets of `bytes`.
    pub fn from_prefix(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [a, b, c, ..] => Some(Self([*a, *b, *c])),
            _ => None,
        }
    }
}

impl Deref for Oui {
    type Target = [u8; 3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}-{:02X}-{:02X}", self.0[0], self.0[1], self.0[2])
    }
}
