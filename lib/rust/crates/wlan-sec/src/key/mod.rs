// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Derivation of the RSN key hierarchy.
//!
//! All functions are pure: they take the master secret and negotiated parameters and return
//! freshly allocated [`SecretBytes`](crate::SecretBytes) values. Nothing is cached.

pub mod fils;
pub mod ft;
pub mod pasn;
pub mod pmkid;
pub mod prf;
pub mod psk;
pub mod ptk;
pub mod sae;

use crate::{ie::rsn::akm::AkmSuite, Error};

pub const NONCE_LEN: usize = 32;
pub const PMK_LEN_MAX: usize = 64;

/// Hash function underlying an AKM's PRF, MIC and naming functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashClass {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashClass {
    pub fn output_len(self) -> usize {
        match self {
            HashClass::Sha1 => 20,
            HashClass::Sha256 => 32,
            HashClass::Sha384 => 48,
            HashClass::Sha512 => 64,
        }
    }

    /// Selects a hash by the length of the key it protects (32, 48 or 64 octets).
    pub fn for_key_len(len: usize) -> Result<Self, Error> {
        match len {
            32 => Ok(HashClass::Sha256),
            48 => Ok(HashClass::Sha384),
            64 => Ok(HashClass::Sha512),
            _ => Err(Error::UnsupportedKeyLength(len)),
        }
    }
}

/// AKMs whose key lengths and hash follow the length of the PMK rather than the AKM itself.
pub fn akm_uses_pmk_len(akm: AkmSuite) -> bool {
    matches!(akm, AkmSuite::Owe | AkmSuite::Dpp | AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey)
}

/// AKMs fixed to SHA-384 regardless of key lengths.
pub fn akm_is_sha384(akm: AkmSuite) -> bool {
    matches!(
        akm,
        AkmSuite::Ieee8021xSuiteB192
            | AkmSuite::Ieee8021xSha384
            | AkmSuite::FtIeee8021xSha384
            | AkmSuite::FilsSha384
            | AkmSuite::FtFilsSha384
    )
}

/// The one place deciding which hash an AKM uses.
///
/// OWE, DPP and both SAE-EXT-KEY AKMs select purely by `pmk_len`; every other AKM ignores it.
// IEEE Std 802.11-2020, 12.7.1.2, Table 9-151
pub fn akm_hash_class(akm: AkmSuite, pmk_len: usize) -> Result<HashClass, Error> {
    if akm_uses_pmk_len(akm) {
        return HashClass::for_key_len(pmk_len);
    }
    if akm_is_sha384(akm) {
        return Ok(HashClass::Sha384);
    }
    Ok(match akm {
        AkmSuite::PskSha256
        | AkmSuite::Ieee8021xSha256
        | AkmSuite::Sae
        | AkmSuite::FtSae
        | AkmSuite::Osen
        | AkmSuite::Ieee8021xSuiteB
        | AkmSuite::FilsSha256
        | AkmSuite::FtFilsSha256 => HashClass::Sha256,
        _ => HashClass::Sha1,
    })
}

/// Hash used by the FT key hierarchy. FT never uses SHA-1; AKMs which would select it use
/// SHA-256.
pub fn ft_hash_class(akm: AkmSuite, xxkey_len: usize) -> Result<HashClass, Error> {
    match akm_hash_class(akm, xxkey_len)? {
        HashClass::Sha1 => Ok(HashClass::Sha256),
        class => Ok(class),
    }
}

fn check_pmk_len(akm: AkmSuite, pmk_len: usize) -> Result<(), Error> {
    if akm_uses_pmk_len(akm) {
        HashClass::for_key_len(pmk_len)?;
    }
    Ok(())
}

// IEEE Std 802.11-2020, 12.7.3, Table 12-11
pub fn kck_len(akm: AkmSuite, pmk_len: usize) -> Result<usize, Error> {
    check_pmk_len(akm, pmk_len)?;
    Ok(match akm {
        AkmSuite::Ieee8021xSuiteB192 | AkmSuite::Ieee8021xSha384 | AkmSuite::FtIeee8021xSha384 => {
            24
        }
        AkmSuite::FilsSha256
        | AkmSuite::FilsSha384
        | AkmSuite::FtFilsSha256
        | AkmSuite::FtFilsSha384 => 0,
        AkmSuite::Dpp | AkmSuite::Owe | AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey => pmk_len / 2,
        _ => 16,
    })
}

pub fn kek_len(akm: AkmSuite, pmk_len: usize) -> Result<usize, Error> {
    check_pmk_len(akm, pmk_len)?;
    Ok(match akm {
        AkmSuite::FilsSha384 | AkmSuite::FtFilsSha384 => 64,
        AkmSuite::Ieee8021xSuiteB192
        | AkmSuite::FilsSha256
        | AkmSuite::FtFilsSha256
        | AkmSuite::Ieee8021xSha384
        | AkmSuite::FtIeee8021xSha384 => 32,
        AkmSuite::Dpp | AkmSuite::Owe | AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey => {
            if pmk_len <= 32 {
                16
            } else {
                32
            }
        }
        _ => 16,
    })
}

/// Second KCK, present only in the FT-FILS PTK.
pub fn kck2_len(akm: AkmSuite) -> usize {
    match akm {
        AkmSuite::FtFilsSha256 => 16,
        AkmSuite::FtFilsSha384 => 24,
        _ => 0,
    }
}

/// Second KEK, present only in the FT-FILS PTK.
pub fn kek2_len(akm: AkmSuite) -> usize {
    match akm {
        AkmSuite::FtFilsSha256 => 16,
        AkmSuite::FtFilsSha384 => 32,
        _ => 0,
    }
}

/// Length of the EAPOL-Key MIC field.
pub fn mic_len(akm: AkmSuite, pmk_len: usize) -> Result<usize, Error> {
    check_pmk_len(akm, pmk_len)?;
    Ok(match akm {
        AkmSuite::Ieee8021xSuiteB192 | AkmSuite::Ieee8021xSha384 | AkmSuite::FtIeee8021xSha384 => {
            24
        }
        AkmSuite::FilsSha256
        | AkmSuite::FilsSha384
        | AkmSuite::FtFilsSha256
        | AkmSuite::FtFilsSha384 => 0,
        AkmSuite::Dpp | AkmSuite::Owe | AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey => pmk_len / 2,
        _ => 16,
    })
}

/// Orders two byte strings, smaller first, for the PTK derivation context.
pub(crate) fn min_max<'a>(a: &'a [u8], b: &'a [u8]) -> (&'a [u8], &'a [u8]) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
