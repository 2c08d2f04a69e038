// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        kek_len, prf,
        ptk::{pairwise_tk_len, require, PtkLayout, WpaPtk},
        HashClass,
    },
    crate::{
        ie::rsn::{akm::AkmSuite, cipher::CipherSuite, PMKID_LEN},
        secret::SecretBytes,
        Error, MacAddr,
    },
    std::mem,
    zeroize::Zeroizing,
};

const FILS_PTK_DERIVATION: &str = "FILS PTK Derivation";

/// Keys produced by FILS PTK derivation alongside the PTK itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilsKeys {
    /// The PTK. FILS defines no KCK; the ICK takes its place.
    pub ptk: WpaPtk,
    pub ick: SecretBytes,
    /// FILS-FT, only derived for the FT-FILS AKMs.
    pub fils_ft: SecretBytes,
}

/// Authentication tags exchanged in the FILS (Re)Association frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAuth {
    pub sta: Vec<u8>,
    pub ap: Vec<u8>,
}

pub fn fils_hash_class(akm: AkmSuite) -> Result<HashClass, Error> {
    match akm {
        AkmSuite::FilsSha256 | AkmSuite::FtFilsSha256 => Ok(HashClass::Sha256),
        AkmSuite::FilsSha384 | AkmSuite::FtFilsSha384 => Ok(HashClass::Sha384),
        _ => Err(Error::UnsupportedAkm(Some(akm))),
    }
}

/// PMK = HMAC-Hash(SNonce || ANonce, rMSK [|| DHss])
// IEEE Std 802.11-2020, 12.11.2.5.2
pub fn rmsk_to_pmk(
    akm: AkmSuite,
    rmsk: &[u8],
    snonce: &[u8],
    anonce: &[u8],
    dh_ss: Option<&[u8]>,
) -> Result<SecretBytes, Error> {
    let class = fils_hash_class(akm)?;
    require(rmsk, "rMSK")?;
    require(snonce, "SNonce")?;
    require(anonce, "ANonce")?;
    let key = [snonce, anonce].concat();
    let pmk = Zeroizing::new(prf::hmac(class, &key[..], &[rmsk, dh_ss.unwrap_or(&[])])?);
    Ok(SecretBytes::copy_from(&pmk[..]))
}

/// PMKID = Truncate-128(Hash(EAP-Initiate/Reauth))
pub fn pmkid_erp(akm: AkmSuite, reauth: &[u8]) -> Result<[u8; PMKID_LEN], Error> {
    let class = fils_hash_class(akm)?;
    if reauth.is_empty() {
        return Err(Error::MissingInput("EAP-Initiate/Reauth"));
    }
    let digest = prf::hash(class, &[reauth]);
    let mut pmkid = [0u8; PMKID_LEN];
    pmkid.copy_from_slice(&digest[..PMKID_LEN]);
    Ok(pmkid)
}

/// FILS-Key-Data = PRF(PMK, "FILS PTK Derivation", SPA || AA || SNonce || ANonce [|| DHss]),
/// taken as ICK, KEK, TK, FILS-FT and KDK.
// IEEE Std 802.11-2020, 12.11.2.5.3
#[allow(clippy::too_many_arguments)]
pub fn pmk_to_ptk(
    pmk: &[u8],
    spa: &MacAddr,
    aa: &MacAddr,
    snonce: &[u8],
    anonce: &[u8],
    dh_ss: Option<&[u8]>,
    akm: AkmSuite,
    cipher: CipherSuite,
    kdk_len: usize,
) -> Result<FilsKeys, Error> {
    let class = fils_hash_class(akm)?;
    require(pmk, "PMK")?;
    require(snonce, "SNonce")?;
    require(anonce, "ANonce")?;
    let layout = PtkLayout {
        kck: class.output_len(),
        kek: kek_len(akm, pmk.len())?,
        tk: pairwise_tk_len(cipher)?,
        kck2: if akm.is_ft() { class.output_len() } else { 0 },
        kek2: 0,
        kdk: kdk_len,
    };
    let context =
        Zeroizing::new([&spa[..], &aa[..], snonce, anonce, dh_ss.unwrap_or(&[])].concat());
    let material = prf::kdf(class, pmk, FILS_PTK_DERIVATION, &context[..], layout.total())?;
    let mut ptk = layout.split(&material);
    let ick = mem::take(&mut ptk.kck);
    let fils_ft = mem::take(&mut ptk.kck2);
    Ok(FilsKeys { ptk: ptk.with_ltf_keyseed(akm, cipher)?, ick, fils_ft })
}

/// Key-Auth for both directions. `dh` carries the (gSTA, gAP) public values if PFS was used.
// IEEE Std 802.11-2020, 12.11.2.6.2
pub fn key_auth_sk(
    ick: &[u8],
    snonce: &[u8],
    anonce: &[u8],
    sta_addr: &MacAddr,
    bssid: &MacAddr,
    dh: Option<(&[u8], &[u8])>,
    akm: AkmSuite,
) -> Result<KeyAuth, Error> {
    let class = fils_hash_class(akm)?;
    require(ick, "ICK")?;
    let empty: &[u8] = &[];
    let (g_sta, g_ap) = dh.unwrap_or((empty, empty));
    let sta = prf::hmac(class, ick, &[snonce, anonce, &sta_addr[..], &bssid[..], g_sta, g_ap])?;
    let ap = prf::hmac(class, ick, &[anonce, snonce, &bssid[..], &sta_addr[..], g_ap, g_sta])?;
    Ok(KeyAuth { sta, ap })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{reference_kdf, A_ADDR, S_ADDR},
        hmac::{Hmac, Mac},
        sha2::{Digest, Sha256, Sha384},
    };

    const ANONCE: [u8; 16] = [0xA0; 16];
    const SNONCE: [u8; 16] = [0x50; 16];
    const RMSK: [u8; 64] = [0x3C; 64];

    #[test]
    fn pmk_from_rmsk() {
        let pmk = rmsk_to_pmk(AkmSuite::FilsSha256, &RMSK[..], &SNONCE[..], &ANONCE[..], None)
            .expect("error deriving PMK");
        let mut mac =
            Hmac::<Sha256>::new_from_slice(&[&SNONCE[..], &ANONCE[..]].concat()).expect("key");
        mac.update(&RMSK[..]);
        assert_eq!(pmk.as_bytes(), &mac.finalize().into_bytes()[..]);

        let with_dh = rmsk_to_pmk(
            AkmSuite::FilsSha384,
            &RMSK[..],
            &SNONCE[..],
            &ANONCE[..],
            Some(&[7u8; 32][..]),
        )
        .expect("error deriving PMK");
        assert_eq!(with_dh.len(), 48);
    }

    #[test]
    fn erp_pmkid() {
        let reauth = [0x05u8, 0x01, 0x00, 0x08, 0x01, 0x02, 0x03, 0x04];
        let pmkid = pmkid_erp(AkmSuite::FilsSha384, &reauth[..]).expect("PMKID");
        assert_eq!(&pmkid[..], &Sha384::digest(&reauth[..])[..16]);
        assert_eq!(
            pmkid_erp(AkmSuite::FilsSha256, &[]),
            Err(Error::MissingInput("EAP-Initiate/Reauth"))
        );
    }

    #[test]
    fn ptk_layout_sha256() {
        let pmk = [0x11u8; 32];
        let keys = pmk_to_ptk(
            &pmk[..],
            &S_ADDR,
            &A_ADDR,
            &SNONCE[..],
            &ANONCE[..],
            None,
            AkmSuite::FilsSha256,
            CipherSuite::Ccmp128,
            0,
        )
        .expect("error deriving FILS PTK");
        let context = [&S_ADDR[..], &A_ADDR[..], &SNONCE[..], &ANONCE[..]].concat();
        let expected = reference_kdf::<Sha256>(&pmk[..], FILS_PTK_DERIVATION, &context, 80);
        assert_eq!(keys.ick.as_bytes(), &expected[..32]);
        assert_eq!(keys.ptk.kek(), &expected[32..64]);
        assert_eq!(keys.ptk.tk(), &expected[64..80]);
        assert!(keys.ptk.kck().is_empty());
        assert!(keys.fils_ft.is_empty());
    }

    #[test]
    fn ft_fils_sha384_layout() {
        let keys = pmk_to_ptk(
            &[0x22u8; 48][..],
            &S_ADDR,
            &A_ADDR,
            &SNONCE[..],
            &ANONCE[..],
            Some(&[9u8; 48][..]),
            AkmSuite::FtFilsSha384,
            CipherSuite::Gcmp256,
            0,
        )
        .expect("error deriving FILS PTK");
        assert_eq!(keys.ick.len(), 48);
        assert_eq!(keys.ptk.kek().len(), 64);
        assert_eq!(keys.ptk.tk().len(), 32);
        assert_eq!(keys.fils_ft.len(), 48);
    }

    #[test]
    fn non_fils_akm() {
        assert_eq!(
            pmk_to_ptk(
                &[1u8; 32][..],
                &S_ADDR,
                &A_ADDR,
                &SNONCE[..],
                &ANONCE[..],
                None,
                AkmSuite::Sae,
                CipherSuite::Ccmp128,
                0,
            ),
            Err(Error::UnsupportedAkm(Some(AkmSuite::Sae)))
        );
    }

    #[test]
    fn key_auth_directions() {
        let ick = [0x44u8; 32];
        let auth = key_auth_sk(
            &ick[..],
            &SNONCE[..],
            &ANONCE[..],
            &S_ADDR,
            &A_ADDR,
            None,
            AkmSuite::FilsSha256,
        )
        .expect("error computing Key-Auth");
        let mut mac = Hmac::<Sha256>::new_from_slice(&ick[..]).expect("key");
        mac.update(&SNONCE[..]);
        mac.update(&ANONCE[..]);
        mac.update(&S_ADDR[..]);
        mac.update(&A_ADDR[..]);
        assert_eq!(&auth.sta[..], &mac.finalize().into_bytes()[..]);

        let mut mac = Hmac::<Sha256>::new_from_slice(&ick[..]).expect("key");
        mac.update(&ANONCE[..]);
        mac.update(&SNONCE[..]);
        mac.update(&A_ADDR[..]);
        mac.update(&S_ADDR[..]);
        assert_eq!(&auth.ap[..], &mac.finalize().into_bytes()[..]);
    }

    #[test]
    fn key_auth_with_pfs() {
        let ick = [0x44u8; 48];
        let g_sta = [1u8; 97];
        let g_ap = [2u8; 97];
        let auth = key_auth_sk(
            &ick[..],
            &SNONCE[..],
            &ANONCE[..],
            &S_ADDR,
            &A_ADDR,
            Some((&g_sta[..], &g_ap[..])),
            AkmSuite::FilsSha384,
        )
        .expect("error computing Key-Auth");
        assert_eq!(auth.sta.len(), 48);
        assert_ne!(auth.sta, auth.ap);
    }
}
