// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An owned buffer of secret key material with an explicit length.
///
/// The backing allocation is sized exactly once and zeroed when the value is dropped, so no
/// unused tail or stale reallocation ever holds secret bytes. Equality is constant-time and
/// `Debug` never prints the contents.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn copy_from(bytes: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(bytes.len());
        buf.extend_from_slice(bytes);
        Self(buf)
    }

    /// Allocates `len` zeroed octets to be filled in place.
    pub(crate) fn zeroed(len: usize) -> Self {
        Self(vec![0u8; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0[..]
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for SecretBytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for SecretBytes {}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes({} octets)", self.0.len())
    }
}

/// Constant-time comparison for MICs and PMKIDs received from a peer.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let secret = SecretBytes::copy_from(&[0xAB; 16]);
        let printed = format!("{:?}", secret);
        assert_eq!(printed, "SecretBytes(16 octets)");
        assert!(!printed.contains("ab") && !printed.contains("AB"));
    }

    #[test]
    fn zeroize_clears_contents() {
        let mut secret = SecretBytes::copy_from(&[7; 32]);
        secret.zeroize();
        assert!(secret.is_empty());
    }

    #[test]
    fn equality() {
        assert_eq!(SecretBytes::copy_from(&[1, 2, 3]), SecretBytes::copy_from(&[1, 2, 3]));
        assert_ne!(SecretBytes::copy_from(&[1, 2, 3]), SecretBytes::copy_from(&[1, 2, 4]));
        assert_ne!(SecretBytes::copy_from(&[1, 2]), SecretBytes::copy_from(&[1, 2, 3]));
    }

    #[test]
    fn ct_eq_slices() {
        assert!(ct_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!ct_eq(&[1, 2, 3], &[1, 2]));
        assert!(!ct_eq(&[1, 2, 3], &[3, 2, 1]));
    }
}
