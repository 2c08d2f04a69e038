// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{ExtId, Id, InformationElement, Reader, MAX_BODY_LEN},
    crate::{
        config::{log_ignored, Config},
        organization::Oui,
    },
    arrayvec::ArrayVec,
    log::{debug, trace},
};

pub const SSID_MAX_LEN: usize = 32;
pub const MAX_MULTI_BAND_IES: usize = 5;
pub const MAX_FRAGMENTS: usize = 3;

// Vendor specific element types, keyed by OUI.
const MSFT_WPA: u8 = 1;
const MSFT_WMM: u8 = 2;
const MSFT_WPS: u8 = 4;
const WMM_SUBTYPE_INFO: u8 = 0;
const WMM_SUBTYPE_PARAM: u8 = 1;
const WMM_SUBTYPE_TSPEC: u8 = 2;
const WFA_P2P: u8 = 0x09;
const WFA_WFD: u8 = 0x0a;
const WFA_HS20_INDICATION: u8 = 0x10;
const WFA_OSEN: u8 = 0x12;
const WFA_MBO: u8 = 0x16;
const WFA_MULTI_AP: u8 = 0x1b;
const WFA_OWE_TRANSITION: u8 = 0x1c;
const WFA_HS20_ROAMING_CONS_SEL: u8 = 0x1d;
const WFA_SAE_PK: u8 = 0x1f;
const BROADCOM_VENDOR_VHT: u8 = 0x04;
const BROADCOM_HT_CAP: u8 = 0x33;
const QCA_PREF_FREQ_LIST: u8 = 1;

// IEEE Std 802.11be, 9.4.2.312.1, Table 9-401c
const MULTI_LINK_TYPE_BASIC: u8 = 0;
const MULTI_LINK_TYPE_PROBE_REQ: u8 = 1;
const MULTI_LINK_TYPE_RECONF: u8 = 2;
const MULTI_LINK_TYPE_TDLS: u8 = 3;
const MULTI_LINK_TYPE_PRIOR_ACCESS: u8 = 4;
const MULTI_LINK_CONTROL_LEN: usize = 2;

/// Outcome of walking an element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// Every element was recognized.
    Ok,
    /// The walk completed but at least one element was not recognized.
    Unknown,
    /// An element's declared length ran past the end of the buffer.
    Failed,
}

/// One Fragment element, tagged with the element it continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub eid: Id,
    pub eid_ext: Option<ExtId>,
    pub data: &'a [u8],
}

/// Bookkeeping for elements split across Fragment elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentState<'a> {
    /// The element a following Fragment element would continue, if any.
    pub last_eid: Option<Id>,
    pub last_eid_ext: Option<ExtId>,
    pub frags: ArrayVec<Fragment<'a>, MAX_FRAGMENTS>,
}

impl<'a> FragmentState<'a> {
    fn track(&mut self, ie: &InformationElement<'a>, config: &Config) {
        let body_len = ie.data.len() + ie.ext_id.map_or(0, |_| 1);
        if ie.id != Id::FRAGMENT {
            if body_len == MAX_BODY_LEN {
                self.last_eid = Some(ie.id);
                self.last_eid_ext = ie.ext_id;
            } else {
                self.clear_pending();
            }
            return;
        }

        match self.last_eid {
            None => log_ignored!(config, "fragment element without a full-length predecessor"),
            Some(eid) => {
                let frag = Fragment { eid, eid_ext: self.last_eid_ext, data: ie.data };
                if self.frags.try_push(frag).is_err() {
                    log_ignored!(config, "dropping fragment of {:?}, limit reached", eid);
                }
            }
        }
        if body_len < MAX_BODY_LEN {
            self.clear_pending();
        }
    }

    fn clear_pending(&mut self) {
        self.last_eid = None;
        self.last_eid_ext = None;
    }

    /// Fragments continuing the element `(eid, eid_ext)`, in wire order.
    pub fn fragments_of(
        &self,
        eid: Id,
        eid_ext: Option<ExtId>,
    ) -> impl Iterator<Item = &Fragment<'a>> + '_ {
        self.frags.iter().filter(move |f| f.eid == eid && f.eid_ext == eid_ext)
    }
}

#[derive(Clone, Copy)]
enum LenCheck {
    Any,
    Min(usize),
    Max(usize),
    Exact(usize),
}

impl LenCheck {
    fn accepts(self, len: usize) -> bool {
        match self {
            LenCheck::Any => true,
            LenCheck::Min(min) => len >= min,
            LenCheck::Max(max) => len <= max,
            LenCheck::Exact(exact) => len == exact,
        }
    }
}

macro_rules! element_table {
    ($($key:pat => $field:ident, $check:expr;)*) => {
        fn slot_mut(
            &mut self,
            key: (Id, Option<ExtId>),
        ) -> Option<(&mut Option<&'a [u8]>, LenCheck)> {
            match key {
                $($key => Some((&mut self.$field, $check)),)*
                _ => None,
            }
        }

        /// Returns the body of a stored element, excluding the extension ID octet.
        pub fn get(&self, id: Id, ext_id: Option<ExtId>) -> Option<&'a [u8]> {
            match (id, ext_id) {
                $($key => self.$field,)*
                _ => None,
            }
        }
    };
}

/// Elements recognized in a management frame body. Every slice borrows from the parsed buffer.
///
/// Vendor specific elements are stored starting at their OUI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedElements<'a> {
    pub ssid: Option<&'a [u8]>,
    pub supp_rates: Option<&'a [u8]>,
    pub ds_params: Option<&'a [u8]>,
    pub challenge: Option<&'a [u8]>,
    pub erp_info: Option<&'a [u8]>,
    pub ext_supp_rates: Option<&'a [u8]>,
    pub rsn_ie: Option<&'a [u8]>,
    pub rsnxe: Option<&'a [u8]>,
    pub power_capab: Option<&'a [u8]>,
    pub supp_channels: Option<&'a [u8]>,
    pub mdie: Option<&'a [u8]>,
    pub ftie: Option<&'a [u8]>,
    pub timeout_int: Option<&'a [u8]>,
    pub ric: Option<&'a [u8]>,
    pub ht_capabilities: Option<&'a [u8]>,
    pub ht_operation: Option<&'a [u8]>,
    pub mesh_config: Option<&'a [u8]>,
    pub mesh_id: Option<&'a [u8]>,
    pub peer_mgmt: Option<&'a [u8]>,
    pub vht_capabilities: Option<&'a [u8]>,
    pub vht_operation: Option<&'a [u8]>,
    pub vht_opmode_notif: Option<&'a [u8]>,
    pub link_id: Option<&'a [u8]>,
    pub interworking: Option<&'a [u8]>,
    pub qos_map_set: Option<&'a [u8]>,
    pub ext_capab: Option<&'a [u8]>,
    pub bss_max_idle_period: Option<&'a [u8]>,
    pub ssid_list: Option<&'a [u8]>,
    pub ampe: Option<&'a [u8]>,
    pub mic: Option<&'a [u8]>,
    pub supp_op_classes: Option<&'a [u8]>,
    pub rrm_enabled: Option<&'a [u8]>,
    pub cag_number: Option<&'a [u8]>,
    pub ap_csn: Option<&'a [u8]>,
    pub fils_indic: Option<&'a [u8]>,
    pub dils: Option<&'a [u8]>,
    pub s1g_capab: Option<&'a [u8]>,

    // Extension elements.
    pub assoc_delay_info: Option<&'a [u8]>,
    pub fils_req_params: Option<&'a [u8]>,
    pub fils_key_confirm: Option<&'a [u8]>,
    pub fils_session: Option<&'a [u8]>,
    pub fils_hlp: Option<&'a [u8]>,
    pub fils_ip_addr_assign: Option<&'a [u8]>,
    pub key_delivery: Option<&'a [u8]>,
    pub wrapped_data: Option<&'a [u8]>,
    pub fils_pk: Option<&'a [u8]>,
    pub fils_nonce: Option<&'a [u8]>,
    pub owe_dh: Option<&'a [u8]>,
    pub password_id: Option<&'a [u8]>,
    pub he_capabilities: Option<&'a [u8]>,
    pub he_operation: Option<&'a [u8]>,
    pub oci: Option<&'a [u8]>,
    pub short_ssid_list: Option<&'a [u8]>,
    pub he_6ghz_band_cap: Option<&'a [u8]>,
    pub rejected_groups: Option<&'a [u8]>,
    pub anti_clogging_token: Option<&'a [u8]>,
    pub pasn_params: Option<&'a [u8]>,
    pub eht_capabilities: Option<&'a [u8]>,
    pub eht_operation: Option<&'a [u8]>,
    pub basic_mle: Option<&'a [u8]>,
    pub probe_req_mle: Option<&'a [u8]>,
    pub reconf_mle: Option<&'a [u8]>,
    pub tdls_mle: Option<&'a [u8]>,
    pub prior_access_mle: Option<&'a [u8]>,

    // Vendor specific elements.
    pub wpa_ie: Option<&'a [u8]>,
    pub wmm: Option<&'a [u8]>,
    pub wmm_tspec: Option<&'a [u8]>,
    pub wps_ie: Option<&'a [u8]>,
    pub p2p: Option<&'a [u8]>,
    pub wfd: Option<&'a [u8]>,
    pub hs20: Option<&'a [u8]>,
    pub osen: Option<&'a [u8]>,
    pub mbo: Option<&'a [u8]>,
    pub multi_ap: Option<&'a [u8]>,
    pub owe_trans: Option<&'a [u8]>,
    pub roaming_cons_sel: Option<&'a [u8]>,
    pub sae_pk: Option<&'a [u8]>,
    pub vendor_ht_cap: Option<&'a [u8]>,
    pub vendor_vht: Option<&'a [u8]>,
    pub pref_freq_list: Option<&'a [u8]>,

    pub multi_band: ArrayVec<&'a [u8], MAX_MULTI_BAND_IES>,
    pub frag: FragmentState<'a>,
}

impl<'a> ParsedElements<'a> {
    element_table! {
        (Id::SSID, None) => ssid, LenCheck::Max(SSID_MAX_LEN);
        (Id::SUPPORTED_RATES, None) => supp_rates, LenCheck::Any;
        (Id::DSSS_PARAM_SET, None) => ds_params, LenCheck::Min(1);
        (Id::CHALLENGE_TEXT, None) => challenge, LenCheck::Any;
        (Id::ERP_INFO, None) => erp_info, LenCheck::Min(1);
        (Id::EXTENDED_SUPPORTED_RATES, None) => ext_supp_rates, LenCheck::Any;
        (Id::RSNE, None) => rsn_ie, LenCheck::Any;
        (Id::RSNXE, None) => rsnxe, LenCheck::Any;
        (Id::POWER_CAPABILITY, None) => power_capab, LenCheck::Min(2);
        (Id::SUPPORTED_CHANNELS, None) => supp_channels, LenCheck::Any;
        (Id::MOBILITY_DOMAIN, None) => mdie, LenCheck::Min(3);
        (Id::FAST_BSS_TRANSITION, None) => ftie, LenCheck::Any;
        (Id::TIMEOUT_INTERVAL, None) => timeout_int, LenCheck::Exact(5);
        (Id::RIC_DATA, None) => ric, LenCheck::Any;
        (Id::HT_CAPABILITIES, None) => ht_capabilities, LenCheck::Min(26);
        (Id::HT_OPERATION, None) => ht_operation, LenCheck::Min(22);
        (Id::MESH_CONFIG, None) => mesh_config, LenCheck::Any;
        (Id::MESH_ID, None) => mesh_id, LenCheck::Any;
        (Id::MESH_PEERING_MGMT, None) => peer_mgmt, LenCheck::Any;
        (Id::VHT_CAPABILITIES, None) => vht_capabilities, LenCheck::Min(12);
        (Id::VHT_OPERATION, None) => vht_operation, LenCheck::Min(5);
        (Id::VHT_OPERATING_MODE_NOTIFICATION, None) => vht_opmode_notif, LenCheck::Exact(1);
        (Id::LINK_ID, None) => link_id, LenCheck::Min(18);
        (Id::INTERWORKING, None) => interworking, LenCheck::Any;
        (Id::QOS_MAP_SET, None) => qos_map_set, LenCheck::Any;
        (Id::EXT_CAPABILITIES, None) => ext_capab, LenCheck::Any;
        (Id::BSS_MAX_IDLE_PERIOD, None) => bss_max_idle_period, LenCheck::Min(3);
        (Id::SSID_LIST, None) => ssid_list, LenCheck::Any;
        (Id::AMPE, None) => ampe, LenCheck::Any;
        (Id::SUPPORTED_OPERATING_CLASSES, None) => supp_op_classes, LenCheck::Any;
        (Id::RM_ENABLED_CAPABILITIES, None) => rrm_enabled, LenCheck::Min(5);
        (Id::CAG_NUMBER, None) => cag_number, LenCheck::Any;
        (Id::AP_CSN, None) => ap_csn, LenCheck::Min(1);
        (Id::FILS_INDICATION, None) => fils_indic, LenCheck::Min(2);
        (Id::DILS, None) => dils, LenCheck::Min(13);
        (Id::S1G_CAPABILITIES, None) => s1g_capab, LenCheck::Min(15);
        (Id::EXTENSION, Some(ExtId::ASSOC_DELAY_INFO)) => assoc_delay_info, LenCheck::Min(1);
        (Id::EXTENSION, Some(ExtId::FILS_REQ_PARAMS)) => fils_req_params, LenCheck::Min(3);
        (Id::EXTENSION, Some(ExtId::FILS_KEY_CONFIRM)) => fils_key_confirm, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::FILS_SESSION)) => fils_session, LenCheck::Exact(8);
        (Id::EXTENSION, Some(ExtId::FILS_HLP_CONTAINER)) => fils_hlp, LenCheck::Min(12);
        (Id::EXTENSION, Some(ExtId::FILS_IP_ADDR_ASSIGN)) => fils_ip_addr_assign, LenCheck::Min(1);
        (Id::EXTENSION, Some(ExtId::KEY_DELIVERY)) => key_delivery, LenCheck::Min(8);
        (Id::EXTENSION, Some(ExtId::FILS_WRAPPED_DATA)) => wrapped_data, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::FILS_PUBLIC_KEY)) => fils_pk, LenCheck::Min(1);
        (Id::EXTENSION, Some(ExtId::FILS_NONCE)) => fils_nonce, LenCheck::Exact(16);
        (Id::EXTENSION, Some(ExtId::OWE_DH_PARAM)) => owe_dh, LenCheck::Min(2);
        (Id::EXTENSION, Some(ExtId::PASSWORD_IDENTIFIER)) => password_id, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::HE_CAPABILITIES)) => he_capabilities, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::HE_OPERATION)) => he_operation, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::OCV_OCI)) => oci, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::SHORT_SSID_LIST)) => short_ssid_list, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::HE_6GHZ_BAND_CAP)) => he_6ghz_band_cap, LenCheck::Min(2);
        (Id::EXTENSION, Some(ExtId::REJECTED_GROUPS)) => rejected_groups, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::ANTI_CLOGGING_TOKEN)) => anti_clogging_token, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::PASN_PARAMS)) => pasn_params, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::EHT_CAPABILITIES)) => eht_capabilities, LenCheck::Any;
        (Id::EXTENSION, Some(ExtId::EHT_OPERATION)) => eht_operation, LenCheck::Any;
    }

    /// Concatenates a stored element's body with every Fragment element that continued it.
    pub fn defragment(&self, eid: Id, eid_ext: Option<ExtId>) -> Option<Vec<u8>> {
        self.get(eid, eid_ext).map(|data| self.defragment_data(data, eid, eid_ext))
    }

    /// Like [`ParsedElements::defragment`] for a body the caller already holds, e.g. one of the
    /// Multi-Link elements.
    pub fn defragment_data(&self, data: &[u8], eid: Id, eid_ext: Option<ExtId>) -> Vec<u8> {
        let mut buf = data.to_vec();
        for frag in self.frag.fragments_of(eid, eid_ext) {
            buf.extend_from_slice(frag.data);
        }
        buf
    }

    /// Stores a fixed element. Returns false if the element is not recognized.
    fn parse_element(&mut self, ie: &InformationElement<'a>, config: &Config) -> bool {
        match (ie.id, ie.ext_id) {
            (Id::CF_PARAM_SET, _) | (Id::TIM, _) => return true,
            (Id::MULTI_BAND, _) => {
                if self.multi_band.try_push(ie.data).is_err() {
                    log_ignored!(config, "ignoring Multi-Band element, limit reached");
                }
                return true;
            }
            (Id::EXTENSION, Some(ExtId::MULTI_LINK)) => {
                return self.parse_multi_link(ie.data, config)
            }
            _ => (),
        }

        let (slot, check) = match self.slot_mut((ie.id, ie.ext_id)) {
            Some(slot) => slot,
            None => return false,
        };
        if !check.accepts(ie.data.len()) {
            log_ignored!(
                config,
                "ignoring {:?}/{:?} element with invalid length {}",
                ie.id,
                ie.ext_id,
                ie.data.len()
            );
            return true;
        }
        let first_wins =
            matches!(ie.id, Id::SSID | Id::RSNE | Id::RSNXE | Id::MOBILITY_DOMAIN);
        if first_wins && slot.is_some() {
            log_ignored!(config, "ignoring duplicate {:?} element", ie.id);
            return true;
        }
        *slot = Some(ie.data);
        true
    }

    fn parse_multi_link(&mut self, data: &'a [u8], config: &Config) -> bool {
        if data.len() < MULTI_LINK_CONTROL_LEN {
            log_ignored!(config, "ignoring Multi-Link element with invalid length {}", data.len());
            return true;
        }
        let slot = match data[0] & 0x07 {
            MULTI_LINK_TYPE_BASIC => &mut self.basic_mle,
            MULTI_LINK_TYPE_PROBE_REQ => &mut self.probe_req_mle,
            MULTI_LINK_TYPE_RECONF => &mut self.reconf_mle,
            MULTI_LINK_TYPE_TDLS => &mut self.tdls_mle,
            MULTI_LINK_TYPE_PRIOR_ACCESS => &mut self.prior_access_mle,
            other => {
                trace!("unknown Multi-Link element type {}", other);
                return false;
            }
        };
        *slot = Some(data);
        true
    }

    /// Stores a vendor specific element. Returns false if the OUI and type are not recognized.
    fn parse_vendor(&mut self, data: &'a [u8], config: &Config) -> bool {
        let (oui, vendor_type) = match (Oui::from_prefix(data), data.get(3)) {
            (Some(oui), Some(vendor_type)) => (oui, *vendor_type),
            _ => {
                log_ignored!(
                    config,
                    "short vendor specific element ignored ({} octets)",
                    data.len()
                );
                return false;
            }
        };

        let slot = match (oui, vendor_type) {
            (Oui::MSFT, MSFT_WPA) => &mut self.wpa_ie,
            (Oui::MSFT, MSFT_WMM) => match data.get(4) {
                Some(&WMM_SUBTYPE_INFO) | Some(&WMM_SUBTYPE_PARAM) => &mut self.wmm,
                Some(&WMM_SUBTYPE_TSPEC) => &mut self.wmm_tspec,
                Some(subtype) => {
                    trace!("unknown WMM element subtype {}", subtype);
                    return false;
                }
                None => {
                    log_ignored!(config, "short WMM element ignored ({} octets)", data.len());
                    return false;
                }
            },
            (Oui::MSFT, MSFT_WPS) => &mut self.wps_ie,
            (Oui::WFA, WFA_P2P) => &mut self.p2p,
            (Oui::WFA, WFA_WFD) => &mut self.wfd,
            (Oui::WFA, WFA_HS20_INDICATION) => &mut self.hs20,
            (Oui::WFA, WFA_OSEN) => &mut self.osen,
            (Oui::WFA, WFA_MBO) => &mut self.mbo,
            (Oui::WFA, WFA_MULTI_AP) => &mut self.multi_ap,
            (Oui::WFA, WFA_OWE_TRANSITION) => &mut self.owe_trans,
            (Oui::WFA, WFA_HS20_ROAMING_CONS_SEL) => &mut self.roaming_cons_sel,
            (Oui::WFA, WFA_SAE_PK) => &mut self.sae_pk,
            (Oui::BROADCOM, BROADCOM_HT_CAP) => &mut self.vendor_ht_cap,
            (Oui::BROADCOM, BROADCOM_VENDOR_VHT) => &mut self.vendor_vht,
            (Oui::QCA, QCA_PREF_FREQ_LIST) => &mut self.pref_freq_list,
            (oui, vendor_type) => {
                trace!("unknown vendor specific element {:?} type {}", oui, vendor_type);
                return false;
            }
        };
        *slot = Some(data);
        true
    }
}

/// Walks an element list and records every recognized element.
///
/// The returned elements are valid even when the result is `Failed`; they hold everything seen
/// before the malformed element.
pub fn parse<'a>(buf: &'a [u8], config: &Config) -> (ParsedElements<'a>, ParseResult) {
    let mut elems = ParsedElements::default();
    let mut unknown = 0usize;
    let mut reader = Reader::new(buf);

    while let Some(ie) = reader.next() {
        if ie.id == Id::MIC {
            // Everything after the MIC element is encrypted.
            elems.mic = Some(ie.data);
            break;
        }
        elems.frag.track(&ie, config);
        let known = match ie.id {
            Id::FRAGMENT => true,
            Id::VENDOR_SPECIFIC => elems.parse_vendor(ie.data, config),
            Id::EXTENSION if ie.ext_id.is_none() => {
                log_ignored!(config, "extension element without extension ID");
                false
            }
            _ => elems.parse_element(&ie, config),
        };
        if !known {
            unknown += 1;
            trace!("unknown element {:?}/{:?} ({} octets)", ie.id, ie.ext_id, ie.data.len());
        }
    }

    if reader.is_truncated() {
        debug!(
            "element parse failed at offset {}: {} octets left",
            reader.offset(),
            reader.bytes_remaining()
        );
        return (elems, ParseResult::Failed);
    }
    let result = if unknown > 0 { ParseResult::Unknown } else { ParseResult::Ok };
    (elems, result)
}
