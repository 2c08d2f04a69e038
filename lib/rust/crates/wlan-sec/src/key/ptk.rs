// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{akm_hash_class, kck_len, kek_len, min_max, pasn, prf},
    crate::{
        ie::rsn::{akm::AkmSuite, cipher::CipherSuite},
        secret::SecretBytes,
        Error, MacAddr,
    },
    log::debug,
};

const PAIRWISE_KEY_EXPANSION: &str = "Pairwise key expansion";

/// Pairwise Transient Key, split into its component keys.
///
/// Every component is an independently sized [`SecretBytes`] and is zeroed when the PTK is
/// dropped. Components an AKM does not define are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpaPtk {
    pub(crate) kck: SecretBytes,
    pub(crate) kek: SecretBytes,
    pub(crate) tk: SecretBytes,
    pub(crate) kck2: SecretBytes,
    pub(crate) kek2: SecretBytes,
    pub(crate) kdk: SecretBytes,
    pub(crate) ltf_keyseed: SecretBytes,
}

impl WpaPtk {
    pub fn kck(&self) -> &[u8] {
        self.kck.as_bytes()
    }

    pub fn kek(&self) -> &[u8] {
        self.kek.as_bytes()
    }

    pub fn tk(&self) -> &[u8] {
        self.tk.as_bytes()
    }

    pub fn kck2(&self) -> &[u8] {
        self.kck2.as_bytes()
    }

    pub fn kek2(&self) -> &[u8] {
        self.kek2.as_bytes()
    }

    pub fn kdk(&self) -> &[u8] {
        self.kdk.as_bytes()
    }

    pub fn ltf_keyseed(&self) -> &[u8] {
        self.ltf_keyseed.as_bytes()
    }

    /// Derives the secure LTF key seed if a KDK was derived. Without a KDK this is a no-op.
    pub(crate) fn with_ltf_keyseed(
        mut self,
        akm: AkmSuite,
        cipher: CipherSuite,
    ) -> Result<Self, Error> {
        if !self.kdk.is_empty() {
            self.ltf_keyseed = pasn::ltf_keyseed(self.kdk(), akm, cipher)?;
        }
        Ok(self)
    }
}

/// Lengths of the PTK components, in the order they are taken from the KDF output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PtkLayout {
    pub kck: usize,
    pub kek: usize,
    pub tk: usize,
    pub kck2: usize,
    pub kek2: usize,
    pub kdk: usize,
}

impl PtkLayout {
    pub fn total(&self) -> usize {
        self.kck + self.kek + self.tk + self.kck2 + self.kek2 + self.kdk
    }

    /// Slices KDF output as KCK, KEK, TK, KCK2, KEK2, KDK.
    pub fn split(&self, material: &SecretBytes) -> WpaPtk {
        let mut parts = prf::split(
            material,
            &[self.kck, self.kek, self.tk, self.kck2, self.kek2, self.kdk],
        )
        .into_iter();
        let mut next = || parts.next().unwrap_or_default();
        WpaPtk {
            kck: next(),
            kek: next(),
            tk: next(),
            kck2: next(),
            kek2: next(),
            kdk: next(),
            ltf_keyseed: SecretBytes::empty(),
        }
    }
}

pub(crate) fn pairwise_tk_len(cipher: CipherSuite) -> Result<usize, Error> {
    if cipher.is_valid_pairwise() {
        Ok(cipher.tk_len())
    } else {
        Err(Error::UnsupportedCipher(Some(cipher)))
    }
}

pub(crate) fn require(value: &[u8], what: &'static str) -> Result<(), Error> {
    if value.is_empty() {
        Err(Error::MissingSecret(what))
    } else {
        Ok(())
    }
}

/// Derives the PTK from a PMK after a 4-Way Handshake.
///
/// `z` is the optional DPP shared secret appended to the KDF context. `kdk_len` requests a key
/// derivation key for secure ranging; pass 0 if none is wanted.
// IEEE Std 802.11-2020, 12.7.1.3
#[allow(clippy::too_many_arguments)]
pub fn derive(
    pmk: &[u8],
    aa: &MacAddr,
    spa: &MacAddr,
    anonce: &[u8],
    snonce: &[u8],
    akm: AkmSuite,
    cipher: CipherSuite,
    z: Option<&[u8]>,
    kdk_len: usize,
) -> Result<WpaPtk, Error> {
    require(pmk, "PMK")?;
    require(anonce, "ANonce")?;
    require(snonce, "SNonce")?;
    if akm == AkmSuite::WpaNone {
        return Err(Error::UnsupportedAkm(Some(akm)));
    }
    let layout = PtkLayout {
        kck: kck_len(akm, pmk.len())?,
        kek: kek_len(akm, pmk.len())?,
        tk: pairwise_tk_len(cipher)?,
        kdk: kdk_len,
        ..Default::default()
    };
    let class = akm_hash_class(akm, pmk.len())?;

    let (addr_lo, addr_hi) = min_max(&aa[..], &spa[..]);
    let (nonce_lo, nonce_hi) = min_max(anonce, snonce);
    let z = z.unwrap_or(&[]);
    let mut context = SecretBytes::zeroed(2 * 6 + nonce_lo.len() + nonce_hi.len() + z.len());
    {
        let buf = context.as_mut_bytes();
        let mut offset = 0;
        for part in [addr_lo, addr_hi, nonce_lo, nonce_hi, z] {
            buf[offset..offset + part.len()].copy_from_slice(part);
            offset += part.len();
        }
    }

    debug!("deriving PTK for {:?}/{:?} with {:?}, {} octets", akm, cipher, class, layout.total());
    let material =
        prf::kdf(class, pmk, PAIRWISE_KEY_EXPANSION, context.as_bytes(), layout.total())?;
    layout.split(&material).with_ltf_keyseed(akm, cipher)
}
