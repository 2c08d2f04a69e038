// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{akm_hash_class, prf, ptk::require},
    crate::{ie::rsn::{akm::AkmSuite, PMKID_LEN}, Error, MacAddr},
};

const PMK_NAME: &[u8] = b"PMK Name";

/// PMKID = Truncate-128(HMAC-Hash(PMK, "PMK Name" || AA || SPA)).
// IEEE Std 802.11-2020, 12.7.1.3
pub fn rsn_pmkid(
    pmk: &[u8],
    aa: &MacAddr,
    spa: &MacAddr,
    akm: AkmSuite,
) -> Result<[u8; PMKID_LEN], Error> {
    require(pmk, "PMK")?;
    let class = akm_hash_class(akm, pmk.len())?;
    let mac = prf::hmac(class, pmk, &[PMK_NAME, &aa[..], &spa[..]])?;
    let mut pmkid = [0u8; PMKID_LEN];
    pmkid.copy_from_slice(&mac[..PMKID_LEN]);
    Ok(pmkid)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{pmk, A_ADDR, S_ADDR},
        hmac::{Hmac, Mac},
        sha1::Sha1,
        sha2::Sha384,
    };

    #[test]
    fn psk_uses_hmac_sha1() {
        let pmk = pmk();
        let pmkid = rsn_pmkid(&pmk[..], &A_ADDR, &S_ADDR, AkmSuite::Psk).expect("PMKID");
        let mut mac = Hmac::<Sha1>::new_from_slice(&pmk[..]).expect("HMAC key");
        mac.update(b"PMK Name");
        mac.update(&A_ADDR);
        mac.update(&S_ADDR);
        assert_eq!(&pmkid[..], &mac.finalize().into_bytes()[..16]);
    }

    #[test]
    fn suite_b_192_uses_hmac_sha384() {
        let pmk = [3u8; 48];
        let pmkid =
            rsn_pmkid(&pmk[..], &A_ADDR, &S_ADDR, AkmSuite::Ieee8021xSuiteB192).expect("PMKID");
        let mut mac = Hmac::<Sha384>::new_from_slice(&pmk[..]).expect("HMAC key");
        mac.update(b"PMK Name");
        mac.update(&A_ADDR);
        mac.update(&S_ADDR);
        assert_eq!(&pmkid[..], &mac.finalize().into_bytes()[..16]);
    }

    #[test]
    fn direction_matters() {
        let pmk = pmk();
        let forward = rsn_pmkid(&pmk[..], &A_ADDR, &S_ADDR, AkmSuite::Sae).expect("PMKID");
        let reverse = rsn_pmkid(&pmk[..], &S_ADDR, &A_ADDR, AkmSuite::Sae).expect("PMKID");
        assert_ne!(forward, reverse);
    }

    #[test]
    fn empty_pmk() {
        assert_eq!(
            rsn_pmkid(&[], &A_ADDR, &S_ADDR, AkmSuite::Psk),
            Err(Error::MissingSecret("PMK"))
        );
    }
}
