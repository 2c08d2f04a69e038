// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::HashClass,
    crate::{secret::SecretBytes, Error},
    hmac::{Hmac, Mac},
    sha1::Sha1,
    sha2::{Digest, Sha256, Sha384, Sha512},
    zeroize::Zeroizing,
};

macro_rules! mac_parts {
    ($mac:ty, $key:expr, $parts:expr) => {{
        let key: &[u8] = $key;
        let mut mac =
            <$mac as Mac>::new_from_slice(key).map_err(|_| Error::UnsupportedKeyLength(key.len()))?;
        for part in $parts {
            mac.update(part);
        }
        mac.finalize().into_bytes().to_vec()
    }};
}

macro_rules! digest_parts {
    ($digest:ty, $parts:expr) => {{
        let mut hasher = <$digest>::new();
        for part in $parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }};
}

/// HMAC over the concatenation of `parts`.
pub fn hmac(class: HashClass, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, Error> {
    Ok(match class {
        HashClass::Sha1 => mac_parts!(Hmac<Sha1>, key, parts),
        HashClass::Sha256 => mac_parts!(Hmac<Sha256>, key, parts),
        HashClass::Sha384 => mac_parts!(Hmac<Sha384>, key, parts),
        HashClass::Sha512 => mac_parts!(Hmac<Sha512>, key, parts),
    })
}

/// Longest output either PRF produces. The KDF encodes its output length in bits as a 16-bit
/// field.
pub const MAX_OUTPUT_LEN: usize = 8191;

/// Output length in bits, rejecting anything over [`MAX_OUTPUT_LEN`].
fn output_bits(len: usize) -> Result<u16, Error> {
    if len > MAX_OUTPUT_LEN {
        return Err(Error::UnsupportedKeyLength(len));
    }
    len.checked_mul(8)
        .and_then(|bits| u16::try_from(bits).ok())
        .ok_or(Error::UnsupportedKeyLength(len))
}

/// Plain digest over the concatenation of `parts`.
pub fn hash(class: HashClass, parts: &[&[u8]]) -> Vec<u8> {
    match class {
        HashClass::Sha1 => digest_parts!(Sha1, parts),
        HashClass::Sha256 => digest_parts!(Sha256, parts),
        HashClass::Sha384 => digest_parts!(Sha384, parts),
        HashClass::Sha512 => digest_parts!(Sha512, parts),
    }
}

/// IEEE Std 802.11-2020, 12.7.1.2: PRF-Length based on HMAC-SHA1.
pub fn prf_sha1(key: &[u8], label: &str, data: &[u8], len: usize) -> Result<SecretBytes, Error> {
    if key.is_empty() {
        return Err(Error::MissingSecret("PRF key"));
    }
    output_bits(len)?;
    let mut out = SecretBytes::zeroed(len);
    let mut filled = 0;
    let mut counter = 0u8;
    while filled < len {
        let block = Zeroizing::new(hmac(
            HashClass::Sha1,
            key,
            &[label.as_bytes(), &[0u8], data, &[counter]],
        )?);
        let n = std::cmp::min(block.len(), len - filled);
        out.as_mut_bytes()[filled..filled + n].copy_from_slice(&block[..n]);
        filled += n;
        counter = counter.wrapping_add(1);
    }
    Ok(out)
}

/// IEEE Std 802.11-2020, 12.7.1.6.2: KDF-Hash-Length. SHA-1 falls back to [`prf_sha1`].
pub fn kdf(
    class: HashClass,
    key: &[u8],
    label: &str,
    data: &[u8],
    len: usize,
) -> Result<SecretBytes, Error> {
    if class == HashClass::Sha1 {
        return prf_sha1(key, label, data, len);
    }
    if key.is_empty() {
        return Err(Error::MissingSecret("KDF key"));
    }
    let len_bits = output_bits(len)?;
    let mut out = SecretBytes::zeroed(len);
    let mut filled = 0;
    let mut counter = 1u16;
    while filled < len {
        let block = Zeroizing::new(hmac(
            class,
            key,
            &[&counter.to_le_bytes()[..], label.as_bytes(), data, &len_bits.to_le_bytes()[..]],
        )?);
        let n = std::cmp::min(block.len(), len - filled);
        out.as_mut_bytes()[filled..filled + n].copy_from_slice(&block[..n]);
        filled += n;
        counter += 1;
    }
    Ok(out)
}

/// KDF output split into consecutive secrets of the given lengths.
pub(crate) fn split(material: &SecretBytes, lens: &[usize]) -> Vec<SecretBytes> {
    let mut offset = 0;
    lens.iter()
        .map(|&len| {
            let part = SecretBytes::copy_from(&material.as_bytes()[offset..offset + len]);
            offset += len;
            part
        })
        .collect()
}
