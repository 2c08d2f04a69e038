// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::{secret::SecretBytes, Error},
    sha1::Sha1,
};

const PSK_LEN: usize = 32;
const PBKDF2_ROUNDS: u32 = 4096;

/// Derives a PSK from a passphrase and SSID. The PSK serves as PMK for the PSK AKMs.
// IEEE Std 802.11-2020, J.4.1
pub fn compute(passphrase: &[u8], ssid: &[u8]) -> Result<SecretBytes, Error> {
    // The passphrase is described as 8 to 63 ASCII characters. The character range is not
    // enforced since the standard does not refer to it outside the reference implementation.
    if passphrase.len() < 8 || passphrase.len() > 63 {
        return Err(Error::InvalidPassphraseLen(passphrase.len()));
    }
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(Error::InvalidSsidLen(ssid.len()));
    }

    let mut psk = SecretBytes::zeroed(PSK_LEN);
    pbkdf2::pbkdf2_hmac::<Sha1>(passphrase, ssid, PBKDF2_ROUNDS, psk.as_mut_bytes());
    Ok(psk)
}

#[cfg(test)]
mod tests {
    use {super::*, hex::FromHex};

    fn assert_psk(password: &str, ssid: &str, expected: &str) {
        let psk = compute(password.as_bytes(), ssid.as_bytes()).expect("computing PSK failed");
        let expected = Vec::from_hex(expected).expect("invalid hex");
        assert_eq!(psk.as_bytes(), &expected[..]);
    }

    // IEEE Std 802.11-2020, J.4.2, Test case 1
    #[test]
    fn test_psk_test_case_1() {
        assert_psk(
            "password",
            "IEEE",
            "f42c6fc52df0ebef9ebb4b90b38a5f902e83fe1b135a70e23aed762e9710a12e",
        );
    }

    #[test]
    fn test_psk_fixture() {
        assert_psk(
            "ThisIsAPassword",
            "ThisIsASSID",
            "0dc0d6eb90555ed6419756b9a15ec3e3209b63df707dd508d14581f8982721af",
        );
    }

    #[test]
    fn test_psk_too_short_password() {
        assert_eq!(compute(b"short", b"Some SSID"), Err(Error::InvalidPassphraseLen(5)));
    }

    #[test]
    fn test_psk_too_long_password() {
        let password = [b'1'; 64];
        assert_eq!(compute(&password[..], b"Some SSID"), Err(Error::InvalidPassphraseLen(64)));
    }

    #[test]
    fn test_psk_ssid_bounds() {
        assert_eq!(compute(b"ThisIsAPassword", b""), Err(Error::InvalidSsidLen(0)));
        let ssid = [b'1'; 33];
        assert_eq!(compute(b"ThisIsAPassword", &ssid[..]), Err(Error::InvalidSsidLen(33)));
        assert!(compute(b"ThisIsAPassword", &ssid[..32]).is_ok());
    }
}
