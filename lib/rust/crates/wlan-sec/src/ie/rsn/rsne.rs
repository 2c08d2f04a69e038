// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        akm::{AkmSet, AkmSuite},
        cipher::{CipherSet, CipherSuite},
        suite_selector::{SuiteSelector, SUITE_SELECTOR_LEN},
        PMKID_LEN,
    },
    crate::{
        config::{log_ignored, Config},
        ie::Id,
    },
    bitfield::bitfield,
    bitflags::bitflags,
    bytes::Buf,
    log::trace,
    thiserror::Error,
};

/// Vendor type (OUI 50-6F-9A, type 0x12) of the OSEN element, which reuses the RSNE body layout.
pub const OSEN_VENDOR_TYPE: [u8; 4] = [0x50, 0x6F, 0x9A, 0x12];

const RSN_VERSION: u16 = 1;
const RSNE_HDR_LEN: usize = 4;
const OSEN_HDR_LEN: usize = 6;

macro_rules! return_ok_on_empty {
    ( $rdr:expr,$result:expr ) => {{
        if !$rdr.has_remaining() {
            return Ok($result);
        }
    }};
}

/// Every way an RSNE, WPA IE or OSEN element can be rejected.
///
/// Several variants share a numeric diagnostic code; [`ErrorCode::code`] returns the value
/// historically reported to logs and control interfaces.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("empty security element")]
    Empty,
    #[error("security element too short for its header")]
    TooShort,
    #[error("malformed security element header or unsupported version")]
    MalformedHeader,
    #[error("invalid group cipher suite {0:?}")]
    InvalidGroupCipher(SuiteSelector),
    #[error("{0} octets left, too short for a group cipher suite")]
    GroupCipherTruncated(usize),
    #[error("pairwise cipher suite count {0} invalid or exceeds element")]
    PairwiseCountBotch(u16),
    #[error("pairwise cipher suite count truncated")]
    PairwiseCountTruncated,
    #[error("BIP-CMAC-128 offered as a pairwise cipher")]
    BipAsPairwise,
    #[error("AKM suite count {0} invalid or exceeds element")]
    AkmCountBotch(u16),
    #[error("AKM suite count truncated")]
    AkmCountTruncated,
    #[error("PMKID count {0} exceeds element")]
    PmkidUnderflow(u16),
    #[error("invalid group management cipher suite {0:?}")]
    InvalidMgmtGroupCipher(SuiteSelector),
    #[error("element is neither an RSNE, WPA IE nor OSEN element")]
    UnknownElement,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::Empty
            | ErrorCode::TooShort
            | ErrorCode::InvalidGroupCipher(_)
            | ErrorCode::BipAsPairwise
            | ErrorCode::UnknownElement => -1,
            ErrorCode::MalformedHeader => -2,
            ErrorCode::GroupCipherTruncated(_) => -3,
            ErrorCode::PairwiseCountBotch(_) => -4,
            ErrorCode::PairwiseCountTruncated => -5,
            ErrorCode::AkmCountBotch(_) => -6,
            ErrorCode::AkmCountTruncated => -7,
            ErrorCode::PmkidUnderflow(_) => -9,
            ErrorCode::InvalidMgmtGroupCipher(_) => -10,
        }
    }
}

bitflags! {
    /// Security protocol an element was parsed as.
    pub struct Proto: u8 {
        const WPA = 1 << 0;
        const RSN = 1 << 1;
        const WAPI = 1 << 2;
        const OSEN = 1 << 3;
    }
}

// IEEE Std 802.11-2020, 9.4.2.24.4, Figure 9-257
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct RsnCapabilities(u16);
    impl Debug;
    pub preauth, set_preauth: 0;
    pub no_pairwise, set_no_pairwise: 1;
    pub ptksa_replay_counter, set_ptksa_replay_counter: 3, 2;
    pub gtksa_replay_counter, set_gtksa_replay_counter: 5, 4;
    pub mgmt_frame_protection_req, set_mgmt_frame_protection_req: 6;
    pub mgmt_frame_protection_cap, set_mgmt_frame_protection_cap: 7;
    pub joint_multiband, set_joint_multiband: 8;
    pub peerkey_enabled, set_peerkey_enabled: 9;
    pub ssp_amsdu_cap, set_ssp_amsdu_cap: 10;
    pub ssp_amsdu_req, set_ssp_amsdu_req: 11;
    pub pbac, set_pbac: 12;
    pub extended_key_id, set_extended_key_id: 13;
    pub ocvc, set_ocvc: 14;
    // Bit 15 reserved.
}

/// Decoded contents of an RSNE, WPA IE or OSEN element.
///
/// Fields which were absent from the element keep the protocol's default values. The PMKID list
/// is a borrowed view of the element body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsnData<'a> {
    pub proto: Proto,
    pub pairwise_cipher: CipherSet,
    pub group_cipher: CipherSet,
    pub key_mgmt: AkmSet,
    pub capabilities: u16,
    /// Zero or more concatenated 16-octet PMKIDs.
    pub pmkid: &'a [u8],
    pub mgmt_group_cipher: CipherSet,
    pub has_group: bool,
    pub has_pairwise: bool,
}

impl<'a> RsnData<'a> {
    pub(crate) fn rsn_defaults() -> Self {
        Self {
            proto: Proto::RSN,
            pairwise_cipher: CipherSuite::Ccmp128.into(),
            group_cipher: CipherSuite::Ccmp128.into(),
            key_mgmt: AkmSuite::Ieee8021x.into(),
            capabilities: 0,
            pmkid: &[],
            mgmt_group_cipher: CipherSuite::BipCmac128.into(),
            has_group: false,
            has_pairwise: false,
        }
    }

    pub(crate) fn wpa_defaults() -> Self {
        Self {
            proto: Proto::WPA,
            pairwise_cipher: CipherSuite::Tkip.into(),
            group_cipher: CipherSuite::Tkip.into(),
            key_mgmt: AkmSuite::Ieee8021x.into(),
            capabilities: 0,
            pmkid: &[],
            mgmt_group_cipher: CipherSet::empty(),
            has_group: true,
            has_pairwise: true,
        }
    }

    pub fn num_pmkid(&self) -> usize {
        self.pmkid.len() / PMKID_LEN
    }

    /// Returns the advertised PMKIDs, at most `config.max_pmkids` of them.
    pub fn pmkids(&self, config: &Config) -> Vec<&'a [u8]> {
        let count = self.num_pmkid();
        if count > config.max_pmkids {
            log_ignored!(
                config,
                "ignoring {} of {} PMKIDs beyond limit",
                count - config.max_pmkids,
                count
            );
        }
        self.pmkid.chunks_exact(PMKID_LEN).take(config.max_pmkids).collect()
    }

    pub fn rsn_capabilities(&self) -> RsnCapabilities {
        RsnCapabilities(self.capabilities)
    }
}

fn is_osen(bytes: &[u8]) -> bool {
    bytes.len() >= OSEN_HDR_LEN
        && Id(bytes[0]) == Id::VENDOR_SPECIFIC
        && bytes[1] as usize == bytes.len() - 2
        && bytes[2..OSEN_HDR_LEN] == OSEN_VENDOR_TYPE
}

/// Reads one suite selector. Callers check that enough bytes remain.
pub(crate) fn read_selector(rdr: &mut &[u8]) -> SuiteSelector {
    let mut selector = [0u8; SUITE_SELECTOR_LEN];
    rdr.copy_to_slice(&mut selector);
    SuiteSelector::from_bytes(selector)
}

/// Parses a complete RSNE (including its two-octet header) or an OSEN vendor element.
pub fn parse_rsn(bytes: &[u8]) -> Result<RsnData<'_>, ErrorCode> {
    if bytes.is_empty() {
        return Err(ErrorCode::Empty);
    }

    let mut data = RsnData::rsn_defaults();
    let mut rdr = if is_osen(bytes) {
        data.proto = Proto::OSEN;
        data.group_cipher = CipherSuite::GtkNotUsed.into();
        data.has_group = true;
        data.key_mgmt = AkmSuite::Osen.into();
        &bytes[OSEN_HDR_LEN..]
    } else {
        if bytes.len() < RSNE_HDR_LEN {
            return Err(ErrorCode::TooShort);
        }
        let version = u16::from_le_bytes([bytes[2], bytes[3]]);
        if Id(bytes[0]) != Id::RSNE
            || bytes[1] as usize != bytes.len() - 2
            || version != RSN_VERSION
        {
            return Err(ErrorCode::MalformedHeader);
        }
        &bytes[RSNE_HDR_LEN..]
    };

    // Group data cipher suite.
    if rdr.remaining() >= SUITE_SELECTOR_LEN {
        let selector = read_selector(&mut rdr);
        match CipherSuite::from_rsn_selector(selector) {
            Some(cipher) if cipher.is_valid_group() => {
                data.group_cipher = cipher.into();
                data.has_group = true;
            }
            _ => return Err(ErrorCode::InvalidGroupCipher(selector)),
        }
    } else if rdr.has_remaining() {
        return Err(ErrorCode::GroupCipherTruncated(rdr.remaining()));
    }

    // Pairwise cipher suites.
    if rdr.remaining() >= 2 {
        let count = rdr.get_u16_le();
        if count == 0 || count as usize > rdr.remaining() / SUITE_SELECTOR_LEN {
            return Err(ErrorCode::PairwiseCountBotch(count));
        }
        data.has_pairwise = true;
        data.pairwise_cipher = (0..count)
            .filter_map(|_| {
                let selector = read_selector(&mut rdr);
                let cipher = CipherSuite::from_rsn_selector(selector);
                if cipher.is_none() {
                    trace!("dropping unknown pairwise cipher {:?}", selector);
                }
                cipher
            })
            .collect();
        if data.pairwise_cipher.contains(CipherSuite::BipCmac128) {
            return Err(ErrorCode::BipAsPairwise);
        }
    } else if rdr.remaining() == 1 {
        return Err(ErrorCode::PairwiseCountTruncated);
    }

    // AKM suites.
    if rdr.remaining() >= 2 {
        let count = rdr.get_u16_le();
        if count == 0 || count as usize > rdr.remaining() / SUITE_SELECTOR_LEN {
            return Err(ErrorCode::AkmCountBotch(count));
        }
        data.key_mgmt = (0..count)
            .filter_map(|_| {
                let selector = read_selector(&mut rdr);
                let akm = AkmSuite::from_rsn_selector(selector);
                if akm.is_none() {
                    trace!("dropping unknown AKM {:?}", selector);
                }
                akm
            })
            .collect();
    } else if rdr.remaining() == 1 {
        return Err(ErrorCode::AkmCountTruncated);
    }

    // RSN capabilities.
    if rdr.remaining() >= 2 {
        data.capabilities = rdr.get_u16_le();
    }

    // PMKIDs.
    if rdr.remaining() >= 2 {
        let count = rdr.get_u16_le();
        let pmkid_len = count as usize * PMKID_LEN;
        if pmkid_len > rdr.remaining() {
            return Err(ErrorCode::PmkidUnderflow(count));
        }
        let (pmkid, rest) = rdr.split_at(pmkid_len);
        data.pmkid = pmkid;
        rdr = rest;
    }

    // Group management cipher suite.
    if rdr.remaining() >= SUITE_SELECTOR_LEN {
        let selector = read_selector(&mut rdr);
        match CipherSuite::from_rsn_selector(selector) {
            Some(cipher) if cipher.is_valid_mgmt_group() => data.mgmt_group_cipher = cipher.into(),
            _ => return Err(ErrorCode::InvalidMgmtGroupCipher(selector)),
        }
    }

    return_ok_on_empty!(rdr, data);
    trace!("ignoring {} trailing octets in RSN element", rdr.remaining());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::hex_bytes,
        assert_matches::assert_matches,
        test_case::test_case,
    };

    // Literal RSNE inputs and the diagnostic code each must produce.
    #[test_case("30 00", -1; "too short")]
    #[test_case("30 02 01 00", 0; "version only")]
    #[test_case("30 02 00 00", -2; "version zero")]
    #[test_case("30 02 02 00", -2; "version two")]
    #[test_case("30 02 01 00 00", -2; "length mismatch")]
    #[test_case("dd 02 01 00", -2; "wrong element id")]
    #[test_case("30 03 01 00 00", -3; "truncated group cipher")]
    #[test_case("30 06 01 00 00 00 00 00", -1; "unknown group cipher")]
    #[test_case("30 06 01 00 00 0f ac 06", -1; "bip as group cipher")]
    #[test_case("30 06 01 00 00 0f ac 04", 0; "group only")]
    #[test_case("30 06 01 00 00 0f ac 07", 0; "group not used")]
    #[test_case("30 07 01 00 00 0f ac 04 00", -5; "truncated pairwise count")]
    #[test_case("30 08 01 00 00 0f ac 04 00 00", -4; "zero pairwise count")]
    #[test_case("30 08 01 00 00 0f ac 04 01 00", -4; "pairwise count overrun")]
    #[test_case("30 0c 01 00 00 0f ac 04 01 00 00 0f ac 04", 0; "group and pairwise")]
    #[test_case("30 0c 01 00 00 0f ac 04 01 00 00 0f ac 06", -1; "bip as pairwise")]
    #[test_case("30 0d 01 00 00 0f ac 04 01 00 00 0f ac 04 00", -7; "truncated akm count")]
    #[test_case("30 0e 01 00 00 0f ac 04 01 00 00 0f ac 04 00 00", -6; "zero akm count")]
    #[test_case("30 0e 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00", -6; "akm count overrun")]
    #[test_case("30 12 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02", 0; "psk")]
    #[test_case("30 13 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00", 0; "trailing octet")]
    #[test_case("30 14 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 80 00", 0; "capabilities")]
    #[test_case("30 16 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00 00 01 00", -9; "pmkid overrun")]
    #[test_case(
        "30 1a 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00 00 00 00 00 0f ac 06",
        0; "bip-cmac-128 mgmt group")]
    #[test_case(
        "30 1a 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00 00 00 00 00 0f ac 04",
        -10; "ccmp as mgmt group")]
    #[test_case("dd 04 50 6f 9a 12", 0; "osen header only")]
    fn golden_vectors(input: &str, expected: i32) {
        let bytes = hex_bytes(input);
        let code = match parse_rsn(&bytes[..]) {
            Ok(_) => 0,
            Err(e) => e.code(),
        };
        assert_eq!(code, expected);
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_rsn(&[]), Err(ErrorCode::Empty));
    }

    #[test]
    fn defaults_when_fields_absent() {
        let bytes = hex_bytes("30 02 01 00");
        let data = parse_rsn(&bytes[..]).expect("error parsing RSNE");
        assert_eq!(data.proto, Proto::RSN);
        assert_eq!(data.group_cipher.single(), Some(CipherSuite::Ccmp128));
        assert_eq!(data.pairwise_cipher.single(), Some(CipherSuite::Ccmp128));
        assert_eq!(data.key_mgmt.single(), Some(AkmSuite::Ieee8021x));
        assert_eq!(data.mgmt_group_cipher.single(), Some(CipherSuite::BipCmac128));
        assert!(!data.has_group);
        assert!(!data.has_pairwise);
        assert_eq!(data.num_pmkid(), 0);
    }

    #[test]
    fn full_rsne() {
        let bytes = hex_bytes(
            "30 32 01 00 00 0f ac 04 02 00 00 0f ac 04 00 0f ac 0a 02 00 00 0f ac 08 00 0f ac 02 \
             c0 00 01 00 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 00 0f ac 06",
        );
        let data = parse_rsn(&bytes[..]).expect("error parsing RSNE");
        assert!(data.has_group);
        assert!(data.has_pairwise);
        assert_eq!(
            data.pairwise_cipher.iter().collect::<Vec<_>>(),
            vec![CipherSuite::Ccmp128, CipherSuite::Ccmp256]
        );
        assert!(data.key_mgmt.contains(AkmSuite::Sae));
        assert!(data.key_mgmt.contains(AkmSuite::Psk));
        let caps = data.rsn_capabilities();
        assert!(caps.mgmt_frame_protection_req());
        assert!(caps.mgmt_frame_protection_cap());
        assert!(!caps.preauth());
        assert_eq!(data.pmkid, &bytes[32..48]);
        assert_eq!(data.mgmt_group_cipher.single(), Some(CipherSuite::BipCmac128));
    }

    #[test]
    fn unknown_pairwise_and_akm_are_dropped() {
        let bytes = hex_bytes(
            "30 18 01 00 00 0f ac 04 02 00 00 0f ac 63 00 0f ac 04 01 00 00 0f ac 63 00 00",
        );
        let data = parse_rsn(&bytes[..]).expect("error parsing RSNE");
        assert_eq!(data.pairwise_cipher.single(), Some(CipherSuite::Ccmp128));
        assert!(data.key_mgmt.is_empty());
    }

    #[test]
    fn osen_element() {
        let bytes = hex_bytes("dd 0e 50 6f 9a 12 00 0f ac 07 01 00 00 0f ac 04");
        let data = parse_rsn(&bytes[..]).expect("error parsing OSEN element");
        assert_eq!(data.proto, Proto::OSEN);
        assert_eq!(data.group_cipher.single(), Some(CipherSuite::GtkNotUsed));
        assert_eq!(data.key_mgmt.single(), Some(AkmSuite::Osen));
        assert_eq!(data.pairwise_cipher.single(), Some(CipherSuite::Ccmp128));
    }

    #[test]
    fn error_variants_carry_detail() {
        let bytes = hex_bytes("30 06 01 00 00 0f ac 63");
        assert_matches!(
            parse_rsn(&bytes[..]),
            Err(ErrorCode::InvalidGroupCipher(selector)) if selector.suite_type == 0x63
        );
        let bytes =
            hex_bytes("30 16 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00 00 01 00");
        assert_matches!(parse_rsn(&bytes[..]), Err(ErrorCode::PmkidUnderflow(1)));
    }

    #[test]
    fn pmkids_are_capped() {
        let mut bytes =
            hex_bytes("30 00 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 00 00 03 00");
        for i in 0..3u8 {
            bytes.extend_from_slice(&[i; PMKID_LEN]);
        }
        bytes[1] = (bytes.len() - 2) as u8;
        let data = parse_rsn(&bytes[..]).expect("error parsing RSNE");
        assert_eq!(data.num_pmkid(), 3);

        let config = Config { max_pmkids: 2, ..Default::default() };
        let pmkids = data.pmkids(&config);
        assert_eq!(pmkids.len(), 2);
        assert_eq!(pmkids[0], &[0u8; PMKID_LEN][..]);
        assert_eq!(pmkids[1], &[1u8; PMKID_LEN][..]);
        assert_eq!(data.pmkids(&Config::default()).len(), 3);
    }

    #[test]
    fn parse_is_deterministic() {
        let bytes = hex_bytes("30 14 01 00 00 0f ac 04 01 00 00 0f ac 04 01 00 00 0f ac 02 80 00");
        assert_eq!(parse_rsn(&bytes[..]), parse_rsn(&bytes[..]));
    }
}
