// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use super::suite_selector::{suite_set, SuiteSelector};
use crate::organization::Oui;

// IEEE Std 802.11-2020, 9.4.2.24.3, Table 9-151
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AkmSuite {
    Ieee8021x,
    Psk,
    WpaNone,
    FtIeee8021x,
    FtPsk,
    Ieee8021xSha256,
    PskSha256,
    Sae,
    FtSae,
    Osen,
    Ieee8021xSuiteB,
    Ieee8021xSuiteB192,
    FilsSha256,
    FilsSha384,
    FtFilsSha256,
    FtFilsSha384,
    Owe,
    Dpp,
    FtIeee8021xSha384,
    Pasn,
    SaeExtKey,
    FtSaeExtKey,
    Ieee8021xSha384,
}

impl AkmSuite {
    pub const ALL: [AkmSuite; 23] = [
        AkmSuite::Ieee8021x,
        AkmSuite::Psk,
        AkmSuite::WpaNone,
        AkmSuite::FtIeee8021x,
        AkmSuite::FtPsk,
        AkmSuite::Ieee8021xSha256,
        AkmSuite::PskSha256,
        AkmSuite::Sae,
        AkmSuite::FtSae,
        AkmSuite::Osen,
        AkmSuite::Ieee8021xSuiteB,
        AkmSuite::Ieee8021xSuiteB192,
        AkmSuite::FilsSha256,
        AkmSuite::FilsSha384,
        AkmSuite::FtFilsSha256,
        AkmSuite::FtFilsSha384,
        AkmSuite::Owe,
        AkmSuite::Dpp,
        AkmSuite::FtIeee8021xSha384,
        AkmSuite::Pasn,
        AkmSuite::SaeExtKey,
        AkmSuite::FtSaeExtKey,
        AkmSuite::Ieee8021xSha384,
    ];

    /// Maps an RSNE AKM suite selector. OSEN and DPP live in the WFA OUI space.
    pub fn from_rsn_selector(selector: SuiteSelector) -> Option<Self> {
        match selector.oui {
            Oui::DOT11 => match selector.suite_type {
                1 => Some(AkmSuite::Ieee8021x),
                2 => Some(AkmSuite::Psk),
                3 => Some(AkmSuite::FtIeee8021x),
                4 => Some(AkmSuite::FtPsk),
                5 => Some(AkmSuite::Ieee8021xSha256),
                6 => Some(AkmSuite::PskSha256),
                8 => Some(AkmSuite::Sae),
                9 => Some(AkmSuite::FtSae),
                11 => Some(AkmSuite::Ieee8021xSuiteB),
                12 => Some(AkmSuite::Ieee8021xSuiteB192),
                13 => Some(AkmSuite::FtIeee8021xSha384),
                14 => Some(AkmSuite::FilsSha256),
                15 => Some(AkmSuite::FilsSha384),
                16 => Some(AkmSuite::FtFilsSha256),
                17 => Some(AkmSuite::FtFilsSha384),
                18 => Some(AkmSuite::Owe),
                21 => Some(AkmSuite::Pasn),
                23 => Some(AkmSuite::Ieee8021xSha384),
                24 => Some(AkmSuite::SaeExtKey),
                25 => Some(AkmSuite::FtSaeExtKey),
                _ => None,
            },
            Oui::WFA => match selector.suite_type {
                1 => Some(AkmSuite::Osen),
                2 => Some(AkmSuite::Dpp),
                _ => None,
            },
            _ => None,
        }
    }

    /// Maps a legacy WPA AKM suite selector (OUI 00-50-F2).
    pub fn from_wpa_selector(selector: SuiteSelector) -> Option<Self> {
        if selector.oui != Oui::MSFT {
            return None;
        }
        match selector.suite_type {
            0 => Some(AkmSuite::WpaNone),
            1 => Some(AkmSuite::Ieee8021x),
            2 => Some(AkmSuite::Psk),
            _ => None,
        }
    }

    pub fn rsn_selector(self) -> Option<SuiteSelector> {
        let (oui, suite_type) = match self {
            AkmSuite::Ieee8021x => (Oui::DOT11, 1),
            AkmSuite::Psk => (Oui::DOT11, 2),
            AkmSuite::FtIeee8021x => (Oui::DOT11, 3),
            AkmSuite::FtPsk => (Oui::DOT11, 4),
            AkmSuite::Ieee8021xSha256 => (Oui::DOT11, 5),
            AkmSuite::PskSha256 => (Oui::DOT11, 6),
            AkmSuite::Sae => (Oui::DOT11, 8),
            AkmSuite::FtSae => (Oui::DOT11, 9),
            AkmSuite::Ieee8021xSuiteB => (Oui::DOT11, 11),
            AkmSuite::Ieee8021xSuiteB192 => (Oui::DOT11, 12),
            AkmSuite::FtIeee8021xSha384 => (Oui::DOT11, 13),
            AkmSuite::FilsSha256 => (Oui::DOT11, 14),
            AkmSuite::FilsSha384 => (Oui::DOT11, 15),
            AkmSuite::FtFilsSha256 => (Oui::DOT11, 16),
            AkmSuite::FtFilsSha384 => (Oui::DOT11, 17),
            AkmSuite::Owe => (Oui::DOT11, 18),
            AkmSuite::Pasn => (Oui::DOT11, 21),
            AkmSuite::Ieee8021xSha384 => (Oui::DOT11, 23),
            AkmSuite::SaeExtKey => (Oui::DOT11, 24),
            AkmSuite::FtSaeExtKey => (Oui::DOT11, 25),
            AkmSuite::Osen => (Oui::WFA, 1),
            AkmSuite::Dpp => (Oui::WFA, 2),
            AkmSuite::WpaNone => return None,
        };
        Some(SuiteSelector::new(oui, suite_type))
    }

    pub fn is_ft(self) -> bool {
        matches!(
            self,
            AkmSuite::FtIeee8021x
                | AkmSuite::FtPsk
                | AkmSuite::FtSae
                | AkmSuite::FtSaeExtKey
                | AkmSuite::FtIeee8021xSha384
                | AkmSuite::FtFilsSha256
                | AkmSuite::FtFilsSha384
        )
    }

    pub fn is_fils(self) -> bool {
        matches!(
            self,
            AkmSuite::FilsSha256
                | AkmSuite::FilsSha384
                | AkmSuite::FtFilsSha256
                | AkmSuite::FtFilsSha384
        )
    }

    pub fn is_sae(self) -> bool {
        matches!(self, AkmSuite::Sae | AkmSuite::FtSae) || self.is_sae_ext_key()
    }

    pub fn is_sae_ext_key(self) -> bool {
        matches!(self, AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey)
    }

    pub(crate) fn bit(self) -> u32 {
        match self {
            AkmSuite::Ieee8021x => 1 << 0,
            AkmSuite::Psk => 1 << 1,
            AkmSuite::WpaNone => 1 << 4,
            AkmSuite::FtIeee8021x => 1 << 5,
            AkmSuite::FtPsk => 1 << 6,
            AkmSuite::Ieee8021xSha256 => 1 << 7,
            AkmSuite::PskSha256 => 1 << 8,
            AkmSuite::Sae => 1 << 10,
            AkmSuite::FtSae => 1 << 11,
            AkmSuite::Osen => 1 << 15,
            AkmSuite::Ieee8021xSuiteB => 1 << 16,
            AkmSuite::Ieee8021xSuiteB192 => 1 << 17,
            AkmSuite::FilsSha256 => 1 << 18,
            AkmSuite::FilsSha384 => 1 << 19,
            AkmSuite::FtFilsSha256 => 1 << 20,
            AkmSuite::FtFilsSha384 => 1 << 21,
            AkmSuite::Owe => 1 << 22,
            AkmSuite::Dpp => 1 << 23,
            AkmSuite::FtIeee8021xSha384 => 1 << 24,
            AkmSuite::Pasn => 1 << 25,
            AkmSuite::SaeExtKey => 1 << 26,
            AkmSuite::FtSaeExtKey => 1 << 27,
            AkmSuite::Ieee8021xSha384 => 1 << 28,
        }
    }
}

suite_set!(
    /// Set of AKM suites offered by an RSNE or WPA IE.
    AkmSet,
    AkmSuite
);
