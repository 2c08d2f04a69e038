// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{
        rsn::{
            akm::AkmSuite,
            cipher::CipherSuite,
            rsne::{parse_rsn, read_selector, ErrorCode, RsnData, OSEN_VENDOR_TYPE},
            suite_selector::SUITE_SELECTOR_LEN,
        },
        Id,
    },
    crate::organization::Oui,
    bytes::Buf,
    log::trace,
};

// The WPA1 IE is not fully specified by IEEE. This format was derived from pcap.
// (1B) element ID 0xDD
// (1B) length
// (3B) OUI 00-50-F2
// (1B) OUI-specific element type
// (2B) WPA version
// (4B) multicast cipher
// (2B) unicast cipher count
// (4B x N) unicast cipher list
// (2B) AKM count
// (4B x N) AKM list
// (2B) capabilities
pub const OUI: Oui = Oui::MSFT;
pub const VENDOR_SPECIFIC_TYPE: u8 = 1;
pub const WPA_VERSION: u16 = 1;
const WPA_IE_HDR_LEN: usize = 8;

/// Parses a complete legacy WPA vendor element, header included.
pub fn parse_wpa(bytes: &[u8]) -> Result<RsnData<'_>, ErrorCode> {
    let mut data = RsnData::wpa_defaults();
    if bytes.len() < WPA_IE_HDR_LEN {
        return Err(ErrorCode::TooShort);
    }
    let version = u16::from_le_bytes([bytes[6], bytes[7]]);
    if Id(bytes[0]) != Id::VENDOR_SPECIFIC
        || bytes[1] as usize != bytes.len() - 2
        || bytes[2..5] != OUI[..]
        || bytes[5] != VENDOR_SPECIFIC_TYPE
        || version != WPA_VERSION
    {
        return Err(ErrorCode::MalformedHeader);
    }
    let mut rdr = &bytes[WPA_IE_HDR_LEN..];

    // Multicast cipher. Unknown selectors leave the group cipher set empty.
    if rdr.remaining() >= SUITE_SELECTOR_LEN {
        let selector = read_selector(&mut rdr);
        data.group_cipher = CipherSuite::from_wpa_selector(selector).into_iter().collect();
    } else if rdr.has_remaining() {
        return Err(ErrorCode::GroupCipherTruncated(rdr.remaining()));
    }

    // Unicast ciphers.
    if rdr.remaining() >= 2 {
        let count = rdr.get_u16_le();
        if count == 0 || count as usize > rdr.remaining() / SUITE_SELECTOR_LEN {
            return Err(ErrorCode::PairwiseCountBotch(count));
        }
        data.pairwise_cipher = (0..count)
            .filter_map(|_| CipherSuite::from_wpa_selector(read_selector(&mut rdr)))
            .collect();
    } else if rdr.remaining() == 1 {
        return Err(ErrorCode::PairwiseCountTruncated);
    }

    // AKMs.
    if rdr.remaining() >= 2 {
        let count = rdr.get_u16_le();
        if count == 0 || count as usize > rdr.remaining() / SUITE_SELECTOR_LEN {
            return Err(ErrorCode::AkmCountBotch(count));
        }
        data.key_mgmt = (0..count)
            .filter_map(|_| AkmSuite::from_wpa_selector(read_selector(&mut rdr)))
            .collect();
    } else if rdr.remaining() == 1 {
        return Err(ErrorCode::AkmCountTruncated);
    }

    if rdr.remaining() >= 2 {
        data.capabilities = rdr.get_u16_le();
    }

    if rdr.has_remaining() {
        trace!("ignoring {} trailing octets in WPA IE", rdr.remaining());
    }
    Ok(data)
}

/// Parses whichever security element `bytes` holds: an RSNE, a WPA IE or an OSEN element.
pub fn parse_wpa_ie(bytes: &[u8]) -> Result<RsnData<'_>, ErrorCode> {
    match bytes.first().copied().map(Id) {
        Some(Id::RSNE) => parse_rsn(bytes),
        Some(Id::VENDOR_SPECIFIC) if bytes.get(2..6) == Some(&OSEN_VENDOR_TYPE[..]) => {
            parse_rsn(bytes)
        }
        Some(Id::VENDOR_SPECIFIC) => parse_wpa(bytes),
        Some(_) => Err(ErrorCode::UnknownElement),
        None => Err(ErrorCode::Empty),
    }
}
