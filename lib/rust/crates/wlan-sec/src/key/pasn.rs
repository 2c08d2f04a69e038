// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        akm_is_sha384, prf,
        ptk::{pairwise_tk_len, require, PtkLayout, WpaPtk},
        HashClass,
    },
    crate::{
        ie::rsn::{akm::AkmSuite, cipher::CipherSuite},
        secret::SecretBytes,
        Error, MacAddr,
    },
    zeroize::Zeroizing,
};

pub const PASN_KCK_LEN: usize = 32;
const PASN_PTK_DERIVATION: &str = "PASN PTK Derivation";
const SECURE_LTF_KEY_SEED: &str = "Secure LTF key seed";

/// SHA-384 for PASN with a 256-bit cipher or for a SHA-384 AKM, SHA-256 otherwise.
pub fn pasn_hash_class(akm: AkmSuite, cipher: CipherSuite) -> HashClass {
    let wide_cipher = matches!(cipher, CipherSuite::Ccmp256 | CipherSuite::Gcmp256);
    if (akm == AkmSuite::Pasn && wide_cipher) || akm_is_sha384(akm) {
        HashClass::Sha384
    } else {
        HashClass::Sha256
    }
}

/// PASN-PTK = KDF-Hash(PMK, "PASN PTK Derivation", SPA || BSSID || DHss), taken as KCK, TK
/// and KDK.
// IEEE Std 802.11az-2022, 12.13.8
pub fn pmk_to_ptk(
    pmk: &[u8],
    spa: &MacAddr,
    bssid: &MacAddr,
    dh_ss: &[u8],
    akm: AkmSuite,
    cipher: CipherSuite,
    kdk_len: usize,
) -> Result<WpaPtk, Error> {
    require(pmk, "PMK")?;
    require(dh_ss, "DHss")?;
    let class = pasn_hash_class(akm, cipher);
    let layout = PtkLayout {
        kck: PASN_KCK_LEN,
        tk: pairwise_tk_len(cipher)?,
        kdk: kdk_len,
        ..Default::default()
    };
    let context = Zeroizing::new([&spa[..], &bssid[..], dh_ss].concat());
    let material = prf::kdf(class, pmk, PASN_PTK_DERIVATION, &context[..], layout.total())?;
    layout.split(&material).with_ltf_keyseed(akm, cipher)
}

/// Hash over a complete PASN Authentication frame, used as the PASN context.
pub fn frame_hash(akm: AkmSuite, cipher: CipherSuite, frame: &[u8]) -> Vec<u8> {
    prf::hash(pasn_hash_class(akm, cipher), &[frame])
}

/// Derives the secure LTF key seed from a KDK. The seed is 48 octets where PASN selects
/// SHA-384, 32 otherwise.
pub fn ltf_keyseed(kdk: &[u8], akm: AkmSuite, cipher: CipherSuite) -> Result<SecretBytes, Error> {
    require(kdk, "KDK")?;
    let class = pasn_hash_class(akm, cipher);
    prf::kdf(class, kdk, SECURE_LTF_KEY_SEED, &[], class.output_len())
}
