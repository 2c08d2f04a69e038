// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod eapol;
pub mod ft;
pub mod pasn;

use {
    crate::{
        key::{prf, HashClass},
        secret::ct_eq,
        Error,
    },
    aes::Aes128,
    cmac::{Cmac, Mac},
    hmac::Hmac,
    md5::Md5,
    zeroize::Zeroizing,
};

pub trait Algorithm {
    fn verify(&self, key: &[u8], data: &[u8], expected: &[u8]) -> bool;
    fn compute(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error>;
}

/// MIC primitive. HMAC outputs are truncated to the MIC length of the [`Mic`] using them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicAlgorithm {
    HmacMd5,
    HmacSha1,
    CmacAes128,
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

/// A MIC algorithm together with the length of the MIC field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mic {
    pub algorithm: MicAlgorithm,
    pub len: usize,
}

impl Mic {
    pub const fn new(algorithm: MicAlgorithm, len: usize) -> Self {
        Self { algorithm, len }
    }

    /// HMAC-SHA-2 selected by key length (16, 24 or 32 octets), MIC length equal to the key
    /// length.
    pub(crate) fn hmac_sha2_for_key_len(key_len: usize) -> Result<Self, Error> {
        let algorithm = match key_len {
            16 => MicAlgorithm::HmacSha256,
            24 => MicAlgorithm::HmacSha384,
            32 => MicAlgorithm::HmacSha512,
            _ => return Err(Error::UnsupportedKeyLength(key_len)),
        };
        Ok(Self::new(algorithm, key_len))
    }
}

fn raw_hmac<M: Mac + hmac::digest::KeyInit>(key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|_| Error::UnsupportedKeyLength(key.len()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl Algorithm for Mic {
    fn verify(&self, key: &[u8], data: &[u8], expected: &[u8]) -> bool {
        match self.compute(key, data) {
            Ok(mic) => ct_eq(&mic[..], expected),
            Err(_) => false,
        }
    }

    fn compute(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
        if key.is_empty() {
            return Err(Error::MissingInput("MIC key"));
        }
        let full = Zeroizing::new(match self.algorithm {
            MicAlgorithm::HmacMd5 => raw_hmac::<Hmac<Md5>>(key, data)?,
            MicAlgorithm::CmacAes128 => {
                if key.len() != 16 {
                    return Err(Error::UnsupportedKeyLength(key.len()));
                }
                raw_hmac::<Cmac<Aes128>>(key, data)?
            }
            MicAlgorithm::HmacSha1 => prf::hmac(HashClass::Sha1, key, &[data])?,
            MicAlgorithm::HmacSha256 => prf::hmac(HashClass::Sha256, key, &[data])?,
            MicAlgorithm::HmacSha384 => prf::hmac(HashClass::Sha384, key, &[data])?,
            MicAlgorithm::HmacSha512 => prf::hmac(HashClass::Sha512, key, &[data])?,
        });
        if full.len() < self.len {
            return Err(Error::InvalidLength("MIC", self.len));
        }
        Ok(full[..self.len].to_vec())
    }
}

/// Copies `frame` with `len` octets at `offset` zeroed, as MICs are computed over the frame
/// with its own MIC field cleared.
pub(crate) fn zero_mic_field(
    frame: &[u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<Vec<u8>, Error> {
    let end = offset.checked_add(len).filter(|&end| end <= frame.len());
    match end {
        Some(end) => {
            let mut buf = frame.to_vec();
            buf[offset..end].iter_mut().for_each(|b| *b = 0);
            Ok(buf)
        }
        None => Err(Error::InvalidLength(what, frame.len())),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, hex::FromHex, test_case::test_case};

    // RFC 2202 and RFC 4231, test case 2; RFC 4493, example 2.
    #[test_case(MicAlgorithm::HmacMd5, b"Jefe", 16, "750c783e6ab0b503eaa86e310a5db738")]
    #[test_case(MicAlgorithm::HmacSha1, b"Jefe", 16, "effcdf6ae5eb2fa2d27416d5f184df9c")]
    #[test_case(MicAlgorithm::HmacSha256, b"Jefe", 16, "5bdcc146bf60754e6a042426089575c7")]
    fn known_answers(algorithm: MicAlgorithm, key: &[u8], len: usize, expected: &str) {
        let mic = Mic::new(algorithm, len)
            .compute(key, b"what do ya want for nothing?")
            .expect("error computing MIC");
        assert_eq!(mic, Vec::from_hex(expected).expect("invalid hex"));
    }

    #[test]
    fn cmac_aes128_rfc4493() {
        let key = Vec::from_hex("2b7e151628aed2a6abf7158809cf4f3c").expect("invalid hex");
        let msg = Vec::from_hex("6bc1bee22e409f96e93d7e117393172a").expect("invalid hex");
        let mic = Mic::new(MicAlgorithm::CmacAes128, 16)
            .compute(&key[..], &msg[..])
            .expect("error computing MIC");
        assert_eq!(mic, Vec::from_hex("070a16b46b4d4144f79bdd9dd04a287c").expect("invalid hex"));
    }

    #[test]
    fn cmac_rejects_other_key_lengths() {
        let mic = Mic::new(MicAlgorithm::CmacAes128, 16);
        assert_eq!(mic.compute(&[0u8; 24], b"data"), Err(Error::UnsupportedKeyLength(24)));
        assert_eq!(mic.compute(&[], b"data"), Err(Error::MissingInput("MIC key")));
    }

    #[test]
    fn verify_is_exact() {
        let mic = Mic::new(MicAlgorithm::HmacSha384, 24);
        let tag = mic.compute(&[1u8; 24], b"data").expect("error computing MIC");
        assert_eq!(tag.len(), 24);
        assert!(mic.verify(&[1u8; 24], b"data", &tag[..]));
        assert!(!mic.verify(&[1u8; 24], b"data", &tag[..16]));
        let mut bad = tag.clone();
        bad[23] ^= 1;
        assert!(!mic.verify(&[1u8; 24], b"data", &bad[..]));
    }

    #[test]
    fn hmac_sha2_by_key_len() {
        assert_eq!(Mic::hmac_sha2_for_key_len(24), Ok(Mic::new(MicAlgorithm::HmacSha384, 24)));
        assert_eq!(Mic::hmac_sha2_for_key_len(20), Err(Error::UnsupportedKeyLength(20)));
    }

    #[test]
    fn zero_mic_field_bounds() {
        assert_eq!(zero_mic_field(&[1, 2, 3, 4], 1, 2, "frame"), Ok(vec![1, 0, 0, 4]));
        assert_eq!(
            zero_mic_field(&[1, 2, 3, 4], 3, 2, "frame"),
            Err(Error::InvalidLength("frame", 4))
        );
    }
}
