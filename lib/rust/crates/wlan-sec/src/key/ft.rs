// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Fast BSS Transition key hierarchy: PMK-R0, PMK-R1 and the FT PTK.

use {
    super::{
        ft_hash_class, kck2_len, kck_len, kek2_len, kek_len, prf,
        ptk::{pairwise_tk_len, require, PtkLayout, WpaPtk},
        HashClass,
    },
    crate::{
        ie::rsn::{akm::AkmSuite, cipher::CipherSuite},
        secret::SecretBytes,
        Error, MacAddr,
    },
    log::debug,
};

pub const PMK_NAME_LEN: usize = 16;
pub const MOBILITY_DOMAIN_ID_LEN: usize = 2;
pub const R1KH_ID_LEN: usize = 6;
pub const R0KH_ID_MAX_LEN: usize = 48;
const SALT_LEN: usize = 16;

pub type PmkName = [u8; PMK_NAME_LEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmkR0 {
    pub key: SecretBytes,
    pub name: PmkName,
    pub salt: SecretBytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmkR1 {
    pub key: SecretBytes,
    pub name: PmkName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtPtk {
    pub ptk: WpaPtk,
    pub name: PmkName,
}

/// Source of PMK-R0s held by an R0 key holder. The cache and its lifetime policy belong to
/// the caller.
pub trait R0khStore {
    fn pmk_r0(
        &self,
        r0kh_id: &[u8],
        s0kh_id: &MacAddr,
        mdid: &[u8; MOBILITY_DOMAIN_ID_LEN],
    ) -> Option<PmkR0>;
}

fn truncated_name(class: HashClass, parts: &[&[u8]]) -> PmkName {
    let digest = prf::hash(class, parts);
    let mut name = [0u8; PMK_NAME_LEN];
    name.copy_from_slice(&digest[..PMK_NAME_LEN]);
    name
}

// IEEE Std 802.11-2020, 12.7.1.7.3
pub fn derive_pmk_r0(
    xxkey: &[u8],
    ssid: &[u8],
    mdid: &[u8; MOBILITY_DOMAIN_ID_LEN],
    r0kh_id: &[u8],
    s0kh_id: &MacAddr,
    akm: AkmSuite,
) -> Result<PmkR0, Error> {
    require(xxkey, "XXKey")?;
    if !akm.is_ft() {
        return Err(Error::UnsupportedAkm(Some(akm)));
    }
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(Error::InvalidSsidLen(ssid.len()));
    }
    if r0kh_id.is_empty() || r0kh_id.len() > R0KH_ID_MAX_LEN {
        return Err(Error::InvalidLength("R0KH-ID", r0kh_id.len()));
    }
    let class = ft_hash_class(akm, xxkey.len())?;
    let q = class.output_len();

    let context = [
        &[ssid.len() as u8][..],
        ssid,
        &mdid[..],
        &[r0kh_id.len() as u8][..],
        r0kh_id,
        &s0kh_id[..],
    ]
    .concat();
    let material = prf::kdf(class, xxkey, "FT-R0", &context[..], q + SALT_LEN)?;
    let mut parts = prf::split(&material, &[q, SALT_LEN]).into_iter();
    let key = parts.next().unwrap_or_default();
    let salt = parts.next().unwrap_or_default();
    let name = truncated_name(class, &[b"FT-R0N", salt.as_bytes()]);
    debug!("derived PMK-R0 with {:?}", class);
    Ok(PmkR0 { key, name, salt })
}

// IEEE Std 802.11-2020, 12.7.1.7.4
pub fn derive_pmk_r1_name(
    pmk_r0_name: &PmkName,
    r1kh_id: &[u8; R1KH_ID_LEN],
    s1kh_id: &MacAddr,
    class: HashClass,
) -> PmkName {
    truncated_name(class, &[b"FT-R1N", &pmk_r0_name[..], &r1kh_id[..], &s1kh_id[..]])
}

/// Derives a PMK-R1 of the same length as the PMK-R0. The hash follows the key length.
pub fn derive_pmk_r1(
    pmk_r0: &PmkR0,
    r1kh_id: &[u8; R1KH_ID_LEN],
    s1kh_id: &MacAddr,
) -> Result<PmkR1, Error> {
    require(pmk_r0.key.as_bytes(), "PMK-R0")?;
    let class = HashClass::for_key_len(pmk_r0.key.len())?;
    let context = [&r1kh_id[..], &s1kh_id[..]].concat();
    let key = prf::kdf(class, pmk_r0.key.as_bytes(), "FT-R1", &context[..], pmk_r0.key.len())?;
    let name = derive_pmk_r1_name(&pmk_r0.name, r1kh_id, s1kh_id, class);
    Ok(PmkR1 { key, name })
}

/// Looks up the PMK-R0 for `(r0kh_id, s0kh_id, mdid)` and derives the PMK-R1 for `r1kh_id`.
pub fn derive_pmk_r1_from_store(
    store: &dyn R0khStore,
    r0kh_id: &[u8],
    s0kh_id: &MacAddr,
    mdid: &[u8; MOBILITY_DOMAIN_ID_LEN],
    r1kh_id: &[u8; R1KH_ID_LEN],
) -> Result<PmkR1, Error> {
    let pmk_r0 = store.pmk_r0(r0kh_id, s0kh_id, mdid).ok_or(Error::MissingSecret("PMK-R0"))?;
    derive_pmk_r1(&pmk_r0, r1kh_id, s0kh_id)
}

/// Derives the PTK and PTKName after an FT authentication.
///
/// PTKName always uses SHA-256, independent of the hash used for the PTK itself.
// IEEE Std 802.11-2020, 12.7.1.7.5
#[allow(clippy::too_many_arguments)]
pub fn derive_ptk(
    pmk_r1: &PmkR1,
    snonce: &[u8],
    anonce: &[u8],
    sta_addr: &MacAddr,
    bssid: &MacAddr,
    akm: AkmSuite,
    cipher: CipherSuite,
    kdk_len: usize,
) -> Result<FtPtk, Error> {
    let pmk_len = pmk_r1.key.len();
    require(pmk_r1.key.as_bytes(), "PMK-R1")?;
    require(snonce, "SNonce")?;
    require(anonce, "ANonce")?;
    if !akm.is_ft() {
        return Err(Error::UnsupportedAkm(Some(akm)));
    }
    let layout = PtkLayout {
        kck: kck_len(akm, pmk_len)?,
        kek: kek_len(akm, pmk_len)?,
        tk: pairwise_tk_len(cipher)?,
        kck2: kck2_len(akm),
        kek2: kek2_len(akm),
        kdk: kdk_len,
    };
    let class = HashClass::for_key_len(pmk_len)?;
    let context = [snonce, anonce, &bssid[..], &sta_addr[..]].concat();
    let material = prf::kdf(class, pmk_r1.key.as_bytes(), "FT-PTK", &context[..], layout.total())?;
    let ptk = layout.split(&material).with_ltf_keyseed(akm, cipher)?;
    let name = truncated_name(
        HashClass::Sha256,
        &[&pmk_r1.name[..], b"FT-PTKN", snonce, anonce, &bssid[..], &sta_addr[..]],
    );
    Ok(FtPtk { ptk, name })
}
