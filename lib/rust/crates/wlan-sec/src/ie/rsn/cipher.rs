// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use super::suite_selector::{suite_set, SuiteSelector};
use crate::organization::Oui;

// IEEE Std 802.11-2020, 9.4.2.24.2, Table 9-149
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CipherSuite {
    /// "Use group cipher suite" as pairwise, "none" in legacy WPA.
    None,
    Wep40,
    Wep104,
    Tkip,
    Ccmp128,
    BipCmac128,
    Gcmp128,
    Gcmp256,
    Ccmp256,
    BipGmac128,
    BipGmac256,
    BipCmac256,
    /// Group addressed traffic not allowed.
    GtkNotUsed,
}

impl CipherSuite {
    pub const ALL: [CipherSuite; 13] = [
        CipherSuite::None,
        CipherSuite::Wep40,
        CipherSuite::Wep104,
        CipherSuite::Tkip,
        CipherSuite::Ccmp128,
        CipherSuite::BipCmac128,
        CipherSuite::Gcmp128,
        CipherSuite::Gcmp256,
        CipherSuite::Ccmp256,
        CipherSuite::BipGmac128,
        CipherSuite::BipGmac256,
        CipherSuite::BipCmac256,
        CipherSuite::GtkNotUsed,
    ];

    /// Maps an RSNE cipher suite selector. WEP suites are not accepted in an RSNE.
    pub fn from_rsn_selector(selector: SuiteSelector) -> Option<Self> {
        if selector.oui != Oui::DOT11 {
            return None;
        }
        match selector.suite_type {
            0 => Some(CipherSuite::None),
            2 => Some(CipherSuite::Tkip),
            4 => Some(CipherSuite::Ccmp128),
            6 => Some(CipherSuite::BipCmac128),
            7 => Some(CipherSuite::GtkNotUsed),
            8 => Some(CipherSuite::Gcmp128),
            9 => Some(CipherSuite::Gcmp256),
            10 => Some(CipherSuite::Ccmp256),
            11 => Some(CipherSuite::BipGmac128),
            12 => Some(CipherSuite::BipGmac256),
            13 => Some(CipherSuite::BipCmac256),
            _ => None,
        }
    }

    /// Maps a legacy WPA cipher suite selector (OUI 00-50-F2).
    pub fn from_wpa_selector(selector: SuiteSelector) -> Option<Self> {
        if selector.oui != Oui::MSFT {
            return None;
        }
        match selector.suite_type {
            0 => Some(CipherSuite::None),
            1 => Some(CipherSuite::Wep40),
            2 => Some(CipherSuite::Tkip),
            4 => Some(CipherSuite::Ccmp128),
            5 => Some(CipherSuite::Wep104),
            _ => None,
        }
    }

    pub fn rsn_selector(self) -> SuiteSelector {
        let suite_type = match self {
            CipherSuite::None => 0,
            CipherSuite::Wep40 => 1,
            CipherSuite::Tkip => 2,
            CipherSuite::Ccmp128 => 4,
            CipherSuite::Wep104 => 5,
            CipherSuite::BipCmac128 => 6,
            CipherSuite::GtkNotUsed => 7,
            CipherSuite::Gcmp128 => 8,
            CipherSuite::Gcmp256 => 9,
            CipherSuite::Ccmp256 => 10,
            CipherSuite::BipGmac128 => 11,
            CipherSuite::BipGmac256 => 12,
            CipherSuite::BipCmac256 => 13,
        };
        SuiteSelector::new(Oui::DOT11, suite_type)
    }

    /// Length of the temporal key installed for this cipher. Zero for suites which carry no
    /// key.
    // IEEE Std 802.11-2020, 12.7.2, Table 12-8
    pub fn tk_len(self) -> usize {
        match self {
            CipherSuite::Ccmp256
            | CipherSuite::Gcmp256
            | CipherSuite::BipGmac256
            | CipherSuite::BipCmac256
            | CipherSuite::Tkip => 32,
            CipherSuite::Ccmp128
            | CipherSuite::Gcmp128
            | CipherSuite::BipGmac128
            | CipherSuite::BipCmac128 => 16,
            CipherSuite::Wep104 => 13,
            CipherSuite::Wep40 => 5,
            CipherSuite::None | CipherSuite::GtkNotUsed => 0,
        }
    }

    pub fn is_valid_pairwise(self) -> bool {
        matches!(
            self,
            CipherSuite::Ccmp256
                | CipherSuite::Gcmp256
                | CipherSuite::Ccmp128
                | CipherSuite::Gcmp128
                | CipherSuite::Tkip
        )
    }

    pub fn is_valid_group(self) -> bool {
        self.is_valid_pairwise() || self == CipherSuite::GtkNotUsed
    }

    pub fn is_valid_mgmt_group(self) -> bool {
        matches!(
            self,
            CipherSuite::BipCmac128
                | CipherSuite::BipGmac128
                | CipherSuite::BipGmac256
                | CipherSuite::BipCmac256
        )
    }

    pub(crate) fn bit(self) -> u32 {
        match self {
            CipherSuite::None => 1 << 0,
            CipherSuite::Wep40 => 1 << 1,
            CipherSuite::Wep104 => 1 << 2,
            CipherSuite::Tkip => 1 << 3,
            CipherSuite::Ccmp128 => 1 << 4,
            CipherSuite::BipCmac128 => 1 << 5,
            CipherSuite::Gcmp128 => 1 << 6,
            CipherSuite::Gcmp256 => 1 << 8,
            CipherSuite::Ccmp256 => 1 << 9,
            CipherSuite::BipGmac128 => 1 << 11,
            CipherSuite::BipGmac256 => 1 << 12,
            CipherSuite::BipCmac256 => 1 << 13,
            CipherSuite::GtkNotUsed => 1 << 14,
        }
    }
}

suite_set!(
    /// Set of cipher suites, e.g. every pairwise cipher offered by an RSNE.
    CipherSet,
    CipherSuite
);
