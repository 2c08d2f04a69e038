// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod elements;
pub mod ft;
pub mod pasn;
pub mod reader;
pub mod rsn;
pub mod wpa;

use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

pub use self::reader::Reader;

macro_rules! pub_const {
    ($name:ident, $val:expr) => {
        pub const $name: Self = Self($val);
    };
}

// IEEE Std 802.11-2020, 9.4.2.1, Table 9-92
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    FromZeroes,
    FromBytes,
    AsBytes,
    Unaligned,
)]
pub struct Id(pub u8);

impl Id {
    pub_const!(SSID, 0);
    pub_const!(SUPPORTED_RATES, 1);
    pub_const!(DSSS_PARAM_SET, 3);
    pub_const!(CF_PARAM_SET, 4);
    pub_const!(TIM, 5);
    pub_const!(IBSS_PARAM_SET, 6);
    pub_const!(COUNTRY, 7);
    pub_const!(REQUEST, 10);
    pub_const!(BSS_LOAD, 11);
    pub_const!(EDCA_PARAM_SET, 12);
    pub_const!(CHALLENGE_TEXT, 16);
    pub_const!(POWER_CAPABILITY, 33);
    pub_const!(SUPPORTED_CHANNELS, 36);
    pub_const!(ERP_INFO, 42);
    pub_const!(HT_CAPABILITIES, 45);
    pub_const!(RSNE, 48);
    pub_const!(EXTENDED_SUPPORTED_RATES, 50);
    pub_const!(MOBILITY_DOMAIN, 54);
    pub_const!(FAST_BSS_TRANSITION, 55);
    pub_const!(TIMEOUT_INTERVAL, 56);
    pub_const!(RIC_DATA, 57);
    pub_const!(SUPPORTED_OPERATING_CLASSES, 59);
    pub_const!(HT_OPERATION, 61);
    pub_const!(RM_ENABLED_CAPABILITIES, 70);
    pub_const!(MMIE, 76);
    pub_const!(SSID_LIST, 84);
    pub_const!(BSS_MAX_IDLE_PERIOD, 90);
    pub_const!(LINK_ID, 101);
    pub_const!(INTERWORKING, 107);
    pub_const!(ADVERTISEMENT_PROTOCOL, 108);
    pub_const!(QOS_MAP_SET, 110);
    pub_const!(ROAMING_CONSORTIUM, 111);
    pub_const!(MESH_CONFIG, 113);
    pub_const!(MESH_ID, 114);
    pub_const!(MESH_PEERING_MGMT, 117);
    pub_const!(EXT_CAPABILITIES, 127);
    pub_const!(AMPE, 139);
    pub_const!(MIC, 140);
    pub_const!(MULTI_BAND, 158);
    pub_const!(VHT_CAPABILITIES, 191);
    pub_const!(VHT_OPERATION, 192);
    pub_const!(VHT_OPERATING_MODE_NOTIFICATION, 199);
    pub_const!(AID, 197);
    pub_const!(S1G_CAPABILITIES, 217);
    pub_const!(CAG_NUMBER, 237);
    pub_const!(AP_CSN, 239);
    pub_const!(FILS_INDICATION, 240);
    pub_const!(DILS, 241);
    pub_const!(FRAGMENT, 242);
    pub_const!(RSNXE, 244);
    pub_const!(VENDOR_SPECIFIC, 221);
    pub_const!(EXTENSION, 255);
}

/// Element ID Extension values carried in the first body octet of an `Id::EXTENSION` element.
// IEEE Std 802.11-2020, 9.4.2.1, Table 9-92
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtId(pub u8);

impl ExtId {
    pub_const!(ASSOC_DELAY_INFO, 1);
    pub_const!(FILS_REQ_PARAMS, 2);
    pub_const!(FILS_KEY_CONFIRM, 3);
    pub_const!(FILS_SESSION, 4);
    pub_const!(FILS_HLP_CONTAINER, 5);
    pub_const!(FILS_IP_ADDR_ASSIGN, 6);
    pub_const!(KEY_DELIVERY, 7);
    pub_const!(FILS_WRAPPED_DATA, 8);
    pub_const!(FILS_PUBLIC_KEY, 12);
    pub_const!(FILS_NONCE, 13);
    pub_const!(OWE_DH_PARAM, 32);
    pub_const!(PASSWORD_IDENTIFIER, 33);
    pub_const!(HE_CAPABILITIES, 35);
    pub_const!(HE_OPERATION, 36);
    pub_const!(OCV_OCI, 54);
    pub_const!(SHORT_SSID_LIST, 58);
    pub_const!(HE_6GHZ_BAND_CAP, 59);
    pub_const!(REJECTED_GROUPS, 92);
    pub_const!(ANTI_CLOGGING_TOKEN, 93);
    pub_const!(PASN_PARAMS, 100);
    pub_const!(EHT_OPERATION, 106);
    pub_const!(MULTI_LINK, 107);
    pub_const!(EHT_CAPABILITIES, 108);
}

// IEEE Std 802.11-2020, 9.4.2.1
#[repr(C)]
#[derive(Clone, Copy, Debug, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct Header {
    pub id: Id,
    pub body_len: u8,
}

/// Largest body an element can carry. Elements of exactly this size may be continued by
/// Fragment elements.
pub const MAX_BODY_LEN: usize = 255;

/// A borrowed view of one information element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InformationElement<'a> {
    pub id: Id,
    pub ext_id: Option<ExtId>,
    /// The element body, excluding the extension ID octet for extension elements.
    pub data: &'a [u8],
}

/// Writes an element header plus body. Used by tests and by callers assembling frames.
pub fn write_element(buf: &mut Vec<u8>, id: Id, body: &[u8]) {
    debug_assert!(body.len() <= MAX_BODY_LEN);
    buf.push(id.0);
    buf.push(body.len() as u8);
    buf.extend_from_slice(body);
}
