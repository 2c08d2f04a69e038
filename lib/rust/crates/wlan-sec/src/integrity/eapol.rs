// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{zero_mic_field, Algorithm, Mic, MicAlgorithm},
    crate::{config::Config, ie::rsn::akm::AkmSuite, Error},
    bitfield::bitfield,
    log::{debug, warn},
};

// IEEE Std 802.11-2020, 12.7.2 b.1)
pub const KEY_DESCRIPTOR_VERSION_AKM_DEFINED: u8 = 0;
pub const KEY_DESCRIPTOR_VERSION_HMAC_MD5_RC4: u8 = 1;
pub const KEY_DESCRIPTOR_VERSION_HMAC_SHA1_AES: u8 = 2;
pub const KEY_DESCRIPTOR_VERSION_AES_128_CMAC: u8 = 3;

/// Offset of the Key Information field within an EAPOL-Key frame, EAPOL header included.
const KEY_INFO_OFFSET: usize = 5;
/// Offset of the Key MIC field: 4 octets EAPOL header, descriptor type, Key Information, Key
/// Length, Replay Counter, Nonce, IV, RSC and 8 reserved octets.
pub const KEY_MIC_OFFSET: usize = 81;
/// Key Data Length follows the MIC.
const KEY_DATA_LEN_LEN: usize = 2;

// IEEE Std 802.11-2020, 12.7.2, Figure 12-33
bitfield! {
    pub struct KeyInformation(u16);
    impl Debug;
    pub key_descriptor_version, _: 2, 0;
    pub key_type, _: 3, 3;
    pub install, _: 6, 6;
    pub key_ack, _: 7, 7;
    pub key_mic, _: 8, 8;
    pub secure, _: 9, 9;
    pub error, _: 10, 10;
    pub request, _: 11, 11;
    pub encrypted_key_data, _: 12, 12;
    pub smk_message, _: 13, 13;
}

/// Selects the EAPOL-Key MIC algorithm.
///
/// Key descriptor versions 1 to 3 fix the algorithm. Version 0 defers to the AKM; for the
/// SAE-EXT-KEY, OWE and DPP AKMs the hash then follows the KCK length.
// IEEE Std 802.11-2020, 12.7.3, Table 12-11
pub fn eapol_key_mic_algorithm(
    version: u8,
    akm: AkmSuite,
    kck_len: usize,
    cfg: &Config,
) -> Result<Mic, Error> {
    let mic = match version {
        KEY_DESCRIPTOR_VERSION_HMAC_MD5_RC4 => {
            if !cfg.allow_hmac_md5 {
                warn!("HMAC-MD5 EAPOL-Key MIC rejected by policy");
                return Err(Error::DisallowedAlgorithm(version));
            }
            Mic::new(MicAlgorithm::HmacMd5, 16)
        }
        KEY_DESCRIPTOR_VERSION_HMAC_SHA1_AES => Mic::new(MicAlgorithm::HmacSha1, 16),
        KEY_DESCRIPTOR_VERSION_AES_128_CMAC => Mic::new(MicAlgorithm::CmacAes128, 16),
        KEY_DESCRIPTOR_VERSION_AKM_DEFINED => match akm {
            AkmSuite::Sae | AkmSuite::FtSae | AkmSuite::Osen => {
                Mic::new(MicAlgorithm::CmacAes128, 16)
            }
            AkmSuite::SaeExtKey | AkmSuite::FtSaeExtKey | AkmSuite::Owe | AkmSuite::Dpp => {
                Mic::hmac_sha2_for_key_len(kck_len)?
            }
            AkmSuite::Ieee8021xSuiteB => Mic::new(MicAlgorithm::HmacSha256, 16),
            AkmSuite::Ieee8021xSuiteB192
            | AkmSuite::Ieee8021xSha384
            | AkmSuite::FtIeee8021xSha384 => Mic::new(MicAlgorithm::HmacSha384, 24),
            _ => return Err(Error::UnsupportedAkm(Some(akm))),
        },
        _ => return Err(Error::UnknownKeyDescriptorVersion(version)),
    };
    Ok(mic)
}

pub fn compute_eapol_key_mic(
    kck: &[u8],
    version: u8,
    akm: AkmSuite,
    data: &[u8],
    cfg: &Config,
) -> Result<Vec<u8>, Error> {
    eapol_key_mic_algorithm(version, akm, kck.len(), cfg)?.compute(kck, data)
}

/// Verifies the MIC of a raw EAPOL-Key frame.
///
/// The algorithm is chosen from the frame's Key Information field and `akm`. The MIC is
/// recomputed over the frame with its MIC field zeroed and compared in constant time.
pub fn verify_eapol_key_frame(
    kck: &[u8],
    akm: AkmSuite,
    frame: &[u8],
    cfg: &Config,
) -> Result<(), Error> {
    if kck.is_empty() {
        return Err(Error::MissingInput("KCK"));
    }
    if frame.len() < KEY_MIC_OFFSET {
        return Err(Error::InvalidLength("EAPOL-Key frame", frame.len()));
    }
    let key_info =
        KeyInformation(u16::from_be_bytes([frame[KEY_INFO_OFFSET], frame[KEY_INFO_OFFSET + 1]]));
    if key_info.key_mic() == 0 {
        return Err(Error::MissingInput("Key MIC"));
    }
    let version = key_info.key_descriptor_version() as u8;
    let mic = eapol_key_mic_algorithm(version, akm, kck.len(), cfg)?;
    if frame.len() < KEY_MIC_OFFSET + mic.len + KEY_DATA_LEN_LEN {
        return Err(Error::InvalidLength("EAPOL-Key frame", frame.len()));
    }

    let expected = &frame[KEY_MIC_OFFSET..KEY_MIC_OFFSET + mic.len];
    let zeroed = zero_mic_field(frame, KEY_MIC_OFFSET, mic.len, "EAPOL-Key frame")?;
    if mic.verify(kck, &zeroed[..], expected) {
        Ok(())
    } else {
        debug!("EAPOL-Key MIC mismatch ({:?}, version {})", mic.algorithm, version);
        Err(Error::MicMismatch)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(1, AkmSuite::Psk, 16, MicAlgorithm::HmacMd5, 16)]
    #[test_case(2, AkmSuite::Psk, 16, MicAlgorithm::HmacSha1, 16)]
    #[test_case(3, AkmSuite::PskSha256, 16, MicAlgorithm::CmacAes128, 16)]
    #[test_case(0, AkmSuite::Sae, 16, MicAlgorithm::CmacAes128, 16)]
    #[test_case(0, AkmSuite::FtSae, 16, MicAlgorithm::CmacAes128, 16)]
    #[test_case(0, AkmSuite::Osen, 16, MicAlgorithm::CmacAes128, 16)]
    #[test_case(0, AkmSuite::SaeExtKey, 16, MicAlgorithm::HmacSha256, 16)]
    #[test_case(0, AkmSuite::SaeExtKey, 24, MicAlgorithm::HmacSha384, 24)]
    #[test_case(0, AkmSuite::FtSaeExtKey, 32, MicAlgorithm::HmacSha512, 32)]
    #[test_case(0, AkmSuite::Owe, 24, MicAlgorithm::HmacSha384, 24)]
    #[test_case(0, AkmSuite::Dpp, 32, MicAlgorithm::HmacSha512, 32)]
    #[test_case(0, AkmSuite::Ieee8021xSuiteB, 16, MicAlgorithm::HmacSha256, 16)]
    #[test_case(0, AkmSuite::Ieee8021xSuiteB192, 24, MicAlgorithm::HmacSha384, 24)]
    #[test_case(0, AkmSuite::Ieee8021xSha384, 24, MicAlgorithm::HmacSha384, 24)]
    #[test_case(0, AkmSuite::FtIeee8021xSha384, 24, MicAlgorithm::HmacSha384, 24)]
    fn dispatch(version: u8, akm: AkmSuite, kck_len: usize, algorithm: MicAlgorithm, len: usize) {
        assert_eq!(
            eapol_key_mic_algorithm(version, akm, kck_len, &Config::default()),
            Ok(Mic::new(algorithm, len))
        );
    }

    #[test]
    fn dispatch_errors() {
        let cfg = Config::default();
        assert_eq!(
            eapol_key_mic_algorithm(1, AkmSuite::Psk, 16, &Config::fips()),
            Err(Error::DisallowedAlgorithm(1))
        );
        assert_eq!(
            eapol_key_mic_algorithm(4, AkmSuite::Psk, 16, &cfg),
            Err(Error::UnknownKeyDescriptorVersion(4))
        );
        assert_eq!(
            eapol_key_mic_algorithm(0, AkmSuite::Psk, 16, &cfg),
            Err(Error::UnsupportedAkm(Some(AkmSuite::Psk)))
        );
        assert_eq!(
            eapol_key_mic_algorithm(0, AkmSuite::FilsSha256, 0, &cfg),
            Err(Error::UnsupportedAkm(Some(AkmSuite::FilsSha256)))
        );
        assert_eq!(
            eapol_key_mic_algorithm(0, AkmSuite::Owe, 20, &cfg),
            Err(Error::UnsupportedKeyLength(20))
        );
    }

    /// A 4-Way Handshake message 2 shaped frame with key descriptor version 2 and 16 octets of
    /// key data.
    fn frame(key_info: u16, mic_len: usize) -> Vec<u8> {
        let mut frame = vec![0x01, 0x03, 0x00, 0x00, 0x02];
        frame.extend_from_slice(&key_info.to_be_bytes()[..]);
        frame.extend_from_slice(&[0x00, 0x10]);
        frame.extend_from_slice(&[0u8; 7]);
        frame.push(1);
        frame.extend_from_slice(&[0x55; 32]);
        frame.extend_from_slice(&[0u8; 16 + 8 + 8]);
        assert_eq!(frame.len(), KEY_MIC_OFFSET);
        frame.extend_from_slice(&vec![0u8; mic_len][..]);
        frame.extend_from_slice(&[0x00, 0x10]);
        frame.extend_from_slice(&[0x30; 16]);
        let body_len = (frame.len() - 4) as u16;
        frame[2..4].copy_from_slice(&body_len.to_be_bytes()[..]);
        frame
    }

    fn sign(frame: &mut Vec<u8>, kck: &[u8], version: u8, akm: AkmSuite, mic_len: usize) {
        let mic = compute_eapol_key_mic(kck, version, akm, &frame[..], &Config::default())
            .expect("error computing MIC");
        frame[KEY_MIC_OFFSET..KEY_MIC_OFFSET + mic_len].copy_from_slice(&mic[..]);
    }

    #[test]
    fn verify_sha1_frame() {
        let kck = [0x3Cu8; 16];
        let mut msg = frame(0x010A, 16);
        sign(&mut msg, &kck[..], 2, AkmSuite::Psk, 16);
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &msg[..], &Config::default()),
            Ok(())
        );

        // Key Data follows the MIC and Key Data Length.
        msg[KEY_MIC_OFFSET + 16 + KEY_DATA_LEN_LEN + 3] ^= 0xFF;
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &msg[..], &Config::default()),
            Err(Error::MicMismatch)
        );
    }

    #[test]
    fn verify_tampered_mic() {
        let kck = [0x3Cu8; 16];
        let mut msg = frame(0x010A, 16);
        sign(&mut msg, &kck[..], 2, AkmSuite::Psk, 16);
        msg[KEY_MIC_OFFSET] ^= 0x01;
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &msg[..], &Config::default()),
            Err(Error::MicMismatch)
        );
    }

    #[test]
    fn verify_akm_defined_sha384_frame() {
        let kck = [0x3Cu8; 24];
        let mut msg = frame(0x0108, 24);
        sign(&mut msg, &kck[..], 0, AkmSuite::Ieee8021xSuiteB192, 24);
        assert_eq!(
            verify_eapol_key_frame(
                &kck[..],
                AkmSuite::Ieee8021xSuiteB192,
                &msg[..],
                &Config::default()
            ),
            Ok(())
        );
    }

    #[test]
    fn md5_frame_rejected_under_fips() {
        let kck = [0x3Cu8; 16];
        let mut msg = frame(0x0109, 16);
        sign(&mut msg, &kck[..], 1, AkmSuite::Psk, 16);
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &msg[..], &Config::default()),
            Ok(())
        );
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &msg[..], &Config::fips()),
            Err(Error::DisallowedAlgorithm(1))
        );
    }

    #[test]
    fn malformed_frames() {
        let cfg = Config::default();
        let kck = [0x3Cu8; 16];
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &[0u8; 80][..], &cfg),
            Err(Error::InvalidLength("EAPOL-Key frame", 80))
        );
        let no_mic_bit = frame(0x000A, 16);
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, &no_mic_bit[..], &cfg),
            Err(Error::MissingInput("Key MIC"))
        );
        let truncated = &frame(0x010A, 16)[..KEY_MIC_OFFSET + 10];
        assert_eq!(
            verify_eapol_key_frame(&kck[..], AkmSuite::Psk, truncated, &cfg),
            Err(Error::InvalidLength("EAPOL-Key frame", KEY_MIC_OFFSET + 10))
        );
        assert_eq!(
            verify_eapol_key_frame(&[], AkmSuite::Psk, &no_mic_bit[..], &cfg),
            Err(Error::MissingInput("KCK"))
        );
    }

    #[test]
    fn key_information_fields() {
        let info = KeyInformation(0x13CA);
        assert_eq!(info.key_descriptor_version(), 2);
        assert_eq!(info.key_type(), 1);
        assert_eq!(info.install(), 1);
        assert_eq!(info.key_ack(), 1);
        assert_eq!(info.key_mic(), 1);
        assert_eq!(info.secure(), 1);
        assert_eq!(info.encrypted_key_data(), 1);
    }
}
