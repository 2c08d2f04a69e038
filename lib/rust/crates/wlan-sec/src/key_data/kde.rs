// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{MloLinks, MAX_MLD_LINKS},
    crate::{
        ie::{rsn::PMKID_LEN, wpa, ExtId, Id},
        organization::Oui,
        Error, MacAddr,
    },
    bitfield::bitfield,
    log::{debug, trace},
    nom::{
        bytes::complete::take,
        combinator::{all_consuming, map, rest, verify},
        number::complete::{le_u16, le_u8},
        sequence::tuple,
        IResult,
    },
};

pub const TYPE: u8 = 0xDD;
const HDR_LEN: usize = 2;
/// Octets taken by OUI and data type.
const HDR_OUI_TYPE_LEN: usize = 4;

// IEEE Std 802.11-2020, 12.7.2, Table 12-9
const GTK_DATA_TYPE: u8 = 1;
const MAC_ADDR_DATA_TYPE: u8 = 3;
const PMKID_DATA_TYPE: u8 = 4;
const IGTK_DATA_TYPE: u8 = 9;
const KEY_ID_DATA_TYPE: u8 = 10;
const OCI_DATA_TYPE: u8 = 13;
const BIGTK_DATA_TYPE: u8 = 14;
// IEEE P802.11be, Table 12-9
const MLO_GTK_DATA_TYPE: u8 = 16;
const MLO_IGTK_DATA_TYPE: u8 = 17;
const MLO_BIGTK_DATA_TYPE: u8 = 18;
const MLO_LINK_DATA_TYPE: u8 = 19;

// Wi-Fi Alliance KDEs
const WFA_IP_ADDR_REQ_DATA_TYPE: u8 = 4;
const WFA_IP_ADDR_ALLOC_DATA_TYPE: u8 = 5;
const WFA_OSEN_DATA_TYPE: u8 = 0x12;
const WFA_TRANSITION_DISABLE_DATA_TYPE: u8 = 0x20;
const WFA_DPP_DATA_TYPE: u8 = 0x21;

/// A GTK KDE's fixed length.
/// Note: The KDE consists of a fixed and variable length (the GTK).
const GTK_FIXED_LEN: usize = 2;
const IGTK_IPN_LEN: usize = 6;
const IGTK_FIXED_LEN: usize = 2 + IGTK_IPN_LEN;
const MLO_GTK_FIXED_LEN: usize = 1 + IGTK_IPN_LEN;
const MLO_IGTK_FIXED_LEN: usize = IGTK_FIXED_LEN + 1;
const MLO_LINK_FIXED_LEN: usize = 1 + 6;
const OCI_LEN: usize = 3;

const TIMEOUT_REASSOC_DEADLINE: u8 = 1;
const TIMEOUT_KEY_LIFETIME: u8 = 2;
const TIMEOUT_INTERVAL_LEN: usize = 5;
const MDE_LEN: usize = 3;
/// MIC Control, a 16 octet MIC, ANonce and SNonce.
const FTE_MIN_LEN: usize = 2 + 16 + 32 + 32;
const LINK_ID_LEN: usize = 18;
const HT_CAPABILITIES_LEN: usize = 26;
const VHT_CAPABILITIES_LEN: usize = 12;
const AID_LEN: usize = 2;

// IEEE Std 802.11-2020, 12.7.2, Figure 12-35
bitfield! {
    pub struct GtkInfo(u8);
    impl Debug;
    pub key_id, set_key_id: 1, 0;
    pub tx, set_tx: 2, 2;
    // Bit 3-7 reserved.
    pub value, _: 7,0;
}

// IEEE P802.11be, Figure 12-54
bitfield! {
    pub struct MloLinkInfo(u8);
    impl Debug;
    pub link_id, _: 3, 0;
    pub rsne_present, _: 4, 4;
    pub rsnxe_present, _: 5, 5;
}

/// Views of every recognized element and KDE in a decrypted Key Data field.
///
/// Elements are stored whole, header included. KDE values are the payload following the
/// four octet OUI and data type. When an entry repeats, the last one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KdeSet<'a> {
    pub rsne: Option<&'a [u8]>,
    pub rsnxe: Option<&'a [u8]>,
    pub wpa_ie: Option<&'a [u8]>,
    pub osen: Option<&'a [u8]>,
    pub mde: Option<&'a [u8]>,
    pub fte: Option<&'a [u8]>,
    pub reassoc_deadline: Option<&'a [u8]>,
    pub key_lifetime: Option<&'a [u8]>,
    pub link_id: Option<&'a [u8]>,
    pub ext_capab: Option<&'a [u8]>,
    pub supp_rates: Option<&'a [u8]>,
    pub ext_supp_rates: Option<&'a [u8]>,
    pub supp_channels: Option<&'a [u8]>,
    pub supp_oper_classes: Option<&'a [u8]>,
    pub ht_capabilities: Option<&'a [u8]>,
    pub vht_capabilities: Option<&'a [u8]>,
    pub he_capabilities: Option<&'a [u8]>,
    pub he_6ghz_capabilities: Option<&'a [u8]>,
    pub eht_capabilities: Option<&'a [u8]>,
    pub ssid: Option<&'a [u8]>,
    pub aid: Option<&'a [u8]>,

    pub pmkid: Option<&'a [u8]>,
    pub key_id: Option<&'a [u8]>,
    pub gtk: Option<&'a [u8]>,
    pub mac_addr: Option<&'a [u8]>,
    pub igtk: Option<&'a [u8]>,
    pub bigtk: Option<&'a [u8]>,
    pub oci: Option<&'a [u8]>,
    pub ip_addr_req: Option<&'a [u8]>,
    pub ip_addr_alloc: Option<&'a [u8]>,
    pub transition_disable: Option<&'a [u8]>,
    pub dpp: Option<&'a [u8]>,

    pub mlo_gtk: MloLinks<&'a [u8]>,
    pub mlo_igtk: MloLinks<&'a [u8]>,
    pub mlo_bigtk: MloLinks<&'a [u8]>,
    pub mlo_link: MloLinks<MloLinkKde<'a>>,
}

/// GTK KDE:
/// IEEE Std 802.11-2020, 12.7.2, Figure 12-35
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GtkKde<'a> {
    pub key_id: u8,
    pub tx: bool,
    // 1 byte reserved.
    pub gtk: &'a [u8],
}

/// IGTK KDE, also the layout of the BIGTK KDE:
/// IEEE Std 802.11-2020, 12.7.2, Figure 12-42
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgtkKde<'a> {
    pub key_id: u16,
    // IGTK Packet Number
    pub ipn: [u8; IGTK_IPN_LEN],
    pub igtk: &'a [u8],
}

/// MLO Link KDE. The optional elements are whole, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MloLinkKde<'a> {
    pub link_id: u8,
    pub mac_addr: MacAddr,
    pub rsne: Option<&'a [u8]>,
    pub rsnxe: Option<&'a [u8]>,
}

/// Operating Channel Information KDE.
// IEEE Std 802.11-2020, 9.4.2.254
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OciKde {
    pub op_class: u8,
    pub primary_channel: u8,
    pub freq_segment_1_channel: u8,
}

fn parse_gtk(i: &[u8]) -> IResult<&[u8], GtkKde<'_>> {
    let (i, (info, _reserved, gtk)) =
        tuple((map(le_u8, GtkInfo), le_u8, verify(rest, |gtk: &[u8]| !gtk.is_empty())))(i)?;
    Ok((i, GtkKde { key_id: info.key_id(), tx: info.tx() == 1, gtk }))
}

fn parse_igtk(i: &[u8]) -> IResult<&[u8], IgtkKde<'_>> {
    let (i, (key_id, ipn, igtk)) =
        tuple((le_u16, take(IGTK_IPN_LEN), verify(rest, |igtk: &[u8]| !igtk.is_empty())))(i)?;
    let mut ipn_buf = [0u8; IGTK_IPN_LEN];
    ipn_buf.copy_from_slice(ipn);
    Ok((i, IgtkKde { key_id, ipn: ipn_buf, igtk }))
}

/// Takes one whole element, header included.
fn element(i: &[u8]) -> IResult<&[u8], &[u8]> {
    let (_, (_id, len)) = tuple((le_u8, le_u8))(i)?;
    take(HDR_LEN + len as usize)(i)
}

fn parse_mlo_link(i: &[u8]) -> IResult<&[u8], MloLinkKde<'_>> {
    let (mut i, (info, mac)) = tuple((map(le_u8, MloLinkInfo), take(6usize)))(i)?;
    let mut mac_addr = [0u8; 6];
    mac_addr.copy_from_slice(mac);
    let mut kde = MloLinkKde { link_id: info.link_id(), mac_addr, rsne: None, rsnxe: None };
    if info.rsne_present() == 1 {
        let (remaining, rsne) = verify(element, |e: &[u8]| Id(e[0]) == Id::RSNE)(i)?;
        kde.rsne = Some(rsne);
        i = remaining;
    }
    if info.rsnxe_present() == 1 {
        let (remaining, rsnxe) = verify(element, |e: &[u8]| Id(e[0]) == Id::RSNXE)(i)?;
        kde.rsnxe = Some(rsnxe);
        i = remaining;
    }
    Ok((i, kde))
}

fn parse_oci(i: &[u8]) -> IResult<&[u8], OciKde> {
    let (i, (op_class, primary_channel, freq_segment_1_channel)) =
        tuple((le_u8, le_u8, le_u8))(i)?;
    Ok((i, OciKde { op_class, primary_channel, freq_segment_1_channel }))
}

impl<'a> GtkKde<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Result<Self, Error> {
        all_consuming(parse_gtk)(data)
            .map(|(_, kde)| kde)
            .map_err(|_| Error::InvalidLength("GTK KDE", data.len()))
    }

    /// Length of the GTK KDE including its fixed fields, not just the GTK.
    pub fn len(&self) -> usize {
        GTK_FIXED_LEN + self.gtk.len()
    }
}

impl<'a> IgtkKde<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Result<Self, Error> {
        all_consuming(parse_igtk)(data)
            .map(|(_, kde)| kde)
            .map_err(|_| Error::InvalidLength("IGTK KDE", data.len()))
    }

    pub fn len(&self) -> usize {
        IGTK_FIXED_LEN + self.igtk.len()
    }
}

impl<'a> MloLinkKde<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Result<Self, Error> {
        parse_mlo_link(data)
            .map(|(_, kde)| kde)
            .map_err(|_| Error::InvalidLength("MLO Link KDE", data.len()))
    }
}

impl OciKde {
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        parse_oci(data).map(|(_, kde)| kde).map_err(|_| Error::InvalidLength("OCI KDE", data.len()))
    }
}

impl<'a> KdeSet<'a> {
    pub fn gtk_kde(&self) -> Option<Result<GtkKde<'a>, Error>> {
        self.gtk.map(GtkKde::from_bytes)
    }

    pub fn igtk_kde(&self) -> Option<Result<IgtkKde<'a>, Error>> {
        self.igtk.map(IgtkKde::from_bytes)
    }

    pub fn bigtk_kde(&self) -> Option<Result<IgtkKde<'a>, Error>> {
        self.bigtk.map(IgtkKde::from_bytes)
    }

    pub fn oci_kde(&self) -> Option<Result<OciKde, Error>> {
        self.oci.map(OciKde::from_bytes)
    }

    fn record_element(&mut self, id: Id, element: &'a [u8]) {
        let body_len = element.len() - HDR_LEN;
        let slot = match id {
            Id::RSNE => &mut self.rsne,
            Id::RSNXE => &mut self.rsnxe,
            Id::MOBILITY_DOMAIN if body_len >= MDE_LEN => &mut self.mde,
            Id::FAST_BSS_TRANSITION if body_len >= FTE_MIN_LEN => &mut self.fte,
            Id::TIMEOUT_INTERVAL if body_len == TIMEOUT_INTERVAL_LEN => {
                match element[HDR_LEN] {
                    TIMEOUT_REASSOC_DEADLINE => &mut self.reassoc_deadline,
                    TIMEOUT_KEY_LIFETIME => &mut self.key_lifetime,
                    other => {
                        trace!("ignoring Timeout Interval type {} in key data", other);
                        return;
                    }
                }
            }
            Id::LINK_ID if body_len >= LINK_ID_LEN => &mut self.link_id,
            Id::EXT_CAPABILITIES => &mut self.ext_capab,
            Id::SUPPORTED_RATES => &mut self.supp_rates,
            Id::EXTENDED_SUPPORTED_RATES => &mut self.ext_supp_rates,
            Id::SUPPORTED_CHANNELS => &mut self.supp_channels,
            Id::SUPPORTED_OPERATING_CLASSES => &mut self.supp_oper_classes,
            Id::HT_CAPABILITIES if body_len >= HT_CAPABILITIES_LEN => &mut self.ht_capabilities,
            Id::VHT_CAPABILITIES if body_len >= VHT_CAPABILITIES_LEN => {
                &mut self.vht_capabilities
            }
            Id::SSID => &mut self.ssid,
            Id::AID if body_len >= AID_LEN => &mut self.aid,
            Id::EXTENSION => match element.get(HDR_LEN).map(|&ext_id| ExtId(ext_id)) {
                Some(ExtId::HE_CAPABILITIES) => &mut self.he_capabilities,
                Some(ExtId::HE_6GHZ_BAND_CAP) => &mut self.he_6ghz_capabilities,
                Some(ExtId::EHT_CAPABILITIES) => &mut self.eht_capabilities,
                ext_id => {
                    trace!("unrecognized extension element {:?} in key data", ext_id);
                    return;
                }
            },
            Id::VENDOR_SPECIFIC => return self.record_kde(element),
            _ => {
                trace!("unrecognized element {} ({} octets) in key data", id.0, body_len);
                return;
            }
        };
        *slot = Some(element);
    }

    fn record_kde(&mut self, element: &'a [u8]) {
        let body = &element[HDR_LEN..];
        let (oui, data_type) = match (Oui::from_prefix(body), body.get(3)) {
            (Some(oui), Some(data_type)) => (oui, *data_type),
            _ => {
                trace!("short KDE ignored ({} octets)", body.len());
                return;
            }
        };
        let data = &body[HDR_OUI_TYPE_LEN..];

        let slot = match (oui, data_type) {
            (Oui::MSFT, wpa::VENDOR_SPECIFIC_TYPE) => {
                self.wpa_ie = Some(element);
                return;
            }
            (Oui::WFA, WFA_OSEN_DATA_TYPE) => {
                self.osen = Some(element);
                return;
            }
            (Oui::DOT11, PMKID_DATA_TYPE) if data.len() >= PMKID_LEN => &mut self.pmkid,
            (Oui::DOT11, KEY_ID_DATA_TYPE) => &mut self.key_id,
            (Oui::DOT11, GTK_DATA_TYPE) => &mut self.gtk,
            (Oui::DOT11, MAC_ADDR_DATA_TYPE) if data.len() >= 6 => &mut self.mac_addr,
            (Oui::DOT11, IGTK_DATA_TYPE) => &mut self.igtk,
            (Oui::DOT11, BIGTK_DATA_TYPE) => &mut self.bigtk,
            (Oui::DOT11, OCI_DATA_TYPE) if data.len() >= OCI_LEN => &mut self.oci,
            (Oui::DOT11, MLO_GTK_DATA_TYPE) if data.len() > MLO_GTK_FIXED_LEN => {
                return insert_link(&mut self.mlo_gtk, data[0] >> 4, data, "MLO GTK");
            }
            (Oui::DOT11, MLO_IGTK_DATA_TYPE) if data.len() > MLO_IGTK_FIXED_LEN => {
                let link_id = data[IGTK_FIXED_LEN] >> 4;
                return insert_link(&mut self.mlo_igtk, link_id, data, "MLO IGTK");
            }
            (Oui::DOT11, MLO_BIGTK_DATA_TYPE) if data.len() > MLO_IGTK_FIXED_LEN => {
                let link_id = data[IGTK_FIXED_LEN] >> 4;
                return insert_link(&mut self.mlo_bigtk, link_id, data, "MLO BIGTK");
            }
            (Oui::DOT11, MLO_LINK_DATA_TYPE) if data.len() >= MLO_LINK_FIXED_LEN => {
                match MloLinkKde::from_bytes(data) {
                    Ok(kde) => insert_link(&mut self.mlo_link, kde.link_id, kde, "MLO Link"),
                    Err(e) => debug!("malformed MLO Link KDE skipped: {}", e),
                }
                return;
            }
            (Oui::WFA, WFA_IP_ADDR_REQ_DATA_TYPE) => &mut self.ip_addr_req,
            (Oui::WFA, WFA_IP_ADDR_ALLOC_DATA_TYPE) => &mut self.ip_addr_alloc,
            (Oui::WFA, WFA_TRANSITION_DISABLE_DATA_TYPE) if !data.is_empty() => {
                &mut self.transition_disable
            }
            (Oui::WFA, WFA_DPP_DATA_TYPE) => &mut self.dpp,
            (oui, data_type) => {
                trace!("unrecognized KDE {:?} type {} ({} octets)", oui, data_type, data.len());
                return;
            }
        };
        *slot = Some(data);
    }
}

fn insert_link<T>(links: &mut MloLinks<T>, link_id: u8, value: T, what: &str) {
    if (link_id as usize) < MAX_MLD_LINKS {
        links.insert(link_id, value);
    } else {
        debug!("{} KDE with reserved link ID {} skipped", what, link_id);
    }
}

/// Walks a decrypted Key Data field.
///
/// A zero length entry or a single trailing octet ends the walk. An entry declaring more octets
/// than remain fails the whole call.
pub fn parse(buf: &[u8]) -> Result<KdeSet<'_>, Error> {
    let mut kdes = KdeSet::default();
    let mut offset = 0;
    while buf.len() - offset > 1 {
        let (id, declared) = (Id(buf[offset]), buf[offset + 1] as usize);
        if declared == 0 {
            trace!("key data ends at offset {} (id {})", offset, id.0);
            break;
        }
        let remaining = buf.len() - offset - HDR_LEN;
        if declared > remaining {
            debug!("key data underflow (ie={} len={})", id.0, declared);
            return Err(Error::KeyDataUnderflow { offset, declared, remaining });
        }
        let end = offset + HDR_LEN + declared;
        kdes.record_element(id, &buf[offset..end]);
        offset = end;
    }
    Ok(kdes)
}

/// Appends a KDE with the given OUI and data type.
pub fn write_kde(buf: &mut Vec<u8>, oui: Oui, data_type: u8, data: &[u8]) {
    debug_assert!(HDR_OUI_TYPE_LEN + data.len() <= crate::ie::MAX_BODY_LEN);
    buf.push(TYPE);
    buf.push((HDR_OUI_TYPE_LEN + data.len()) as u8);
    buf.extend_from_slice(&oui[..]);
    buf.push(data_type);
    buf.extend_from_slice(data);
}

/// Appends a GTK KDE.
pub fn write_gtk(buf: &mut Vec<u8>, key_id: u8, tx: bool, gtk: &[u8]) {
    let mut info = GtkInfo(0);
    info.set_key_id(key_id);
    info.set_tx(tx as u8);
    let data = [&[info.value(), 0][..], gtk].concat();
    write_kde(buf, Oui::DOT11, GTK_DATA_TYPE, &data[..]);
}

/// Appends an IGTK KDE.
pub fn write_igtk(buf: &mut Vec<u8>, key_id: u16, ipn: &[u8; IGTK_IPN_LEN], igtk: &[u8]) {
    let data = [&key_id.to_le_bytes()[..], &ipn[..], igtk].concat();
    write_kde(buf, Oui::DOT11, IGTK_DATA_TYPE, &data[..]);
}

/// Pads Key Data that is about to be encrypted.
/// See IEEE Std 802.11-2020, 12.7.2 j)
/// Padding extends the key data field to a minimum size of 16 octets or otherwise to a
/// multiple of 8 octets.
pub fn pad_for_encryption(buf: &mut Vec<u8>) {
    let written = buf.len();
    let padding_len = if written < 16 { 16 - written } else { ((written + 7) / 8) * 8 - written };
    if padding_len != 0 {
        buf.push(TYPE);
        buf.resize(written + padding_len, 0);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{ie::write_element, test_utils::hex_bytes},
        assert_matches::assert_matches,
    };

    const RSNE: [u8; 20] = [
        0x30, 0x12, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04, 0x01, 0x00, 0x00, 0x0F, 0xAC, 0x04,
        0x01, 0x00, 0x00, 0x0F, 0xAC, 0x02,
    ];

    #[test]
    fn parse_gtk_and_rsne() {
        let mut buf = RSNE.to_vec();
        write_gtk(&mut buf, 2, true, &[0xAA; 16][..]);
        pad_for_encryption(&mut buf);
        assert_eq!(buf.len() % 8, 0);

        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert_eq!(kdes.rsne, Some(&RSNE[..]));
        let gtk = kdes.gtk_kde().expect("GTK KDE").expect("valid GTK KDE");
        assert_eq!(gtk, GtkKde { key_id: 2, tx: true, gtk: &[0xAA; 16][..] });
        assert_eq!(gtk.len(), 18);
    }

    #[test]
    fn parse_igtk_and_bigtk() {
        let mut buf = vec![];
        let ipn = [1, 2, 3, 4, 5, 6];
        write_igtk(&mut buf, 4, &ipn, &[0xBB; 16][..]);
        write_kde(&mut buf, Oui::DOT11, BIGTK_DATA_TYPE, &[6, 0, 9, 9, 9, 9, 9, 9, 0xCC, 0xCC]);
        let kdes = parse(&buf[..]).expect("error parsing key data");

        let igtk = kdes.igtk_kde().expect("IGTK KDE").expect("valid IGTK KDE");
        assert_eq!(igtk, IgtkKde { key_id: 4, ipn, igtk: &[0xBB; 16][..] });
        assert_eq!(igtk.len(), 24);
        let bigtk = kdes.bigtk_kde().expect("BIGTK KDE").expect("valid BIGTK KDE");
        assert_eq!(bigtk.key_id, 6);
        assert_eq!(bigtk.igtk, &[0xCC, 0xCC][..]);
    }

    #[test]
    fn parse_vendor_kdes() {
        let mut buf = vec![];
        write_kde(&mut buf, Oui::DOT11, PMKID_DATA_TYPE, &[0x11; 16][..]);
        write_kde(&mut buf, Oui::DOT11, MAC_ADDR_DATA_TYPE, &[1, 2, 3, 4, 5, 6]);
        write_kde(&mut buf, Oui::DOT11, KEY_ID_DATA_TYPE, &[1, 0]);
        write_kde(&mut buf, Oui::DOT11, OCI_DATA_TYPE, &[81, 6, 0]);
        write_kde(&mut buf, Oui::WFA, WFA_IP_ADDR_REQ_DATA_TYPE, &[1]);
        write_kde(&mut buf, Oui::WFA, WFA_IP_ADDR_ALLOC_DATA_TYPE, &[10, 0, 0, 2]);
        write_kde(&mut buf, Oui::WFA, WFA_TRANSITION_DISABLE_DATA_TYPE, &[0x01]);
        write_kde(&mut buf, Oui::WFA, WFA_DPP_DATA_TYPE, &[0x00, 0x01]);
        let kdes = parse(&buf[..]).expect("error parsing key data");

        assert_eq!(kdes.pmkid, Some(&[0x11; 16][..]));
        assert_eq!(kdes.mac_addr, Some(&[1, 2, 3, 4, 5, 6][..]));
        assert_eq!(kdes.key_id, Some(&[1, 0][..]));
        assert_eq!(
            kdes.oci_kde(),
            Some(Ok(OciKde { op_class: 81, primary_channel: 6, freq_segment_1_channel: 0 }))
        );
        assert_eq!(kdes.ip_addr_req, Some(&[1][..]));
        assert_eq!(kdes.ip_addr_alloc, Some(&[10, 0, 0, 2][..]));
        assert_eq!(kdes.transition_disable, Some(&[0x01][..]));
        assert_eq!(kdes.dpp, Some(&[0x00, 0x01][..]));
    }

    #[test]
    fn parse_wpa_and_osen() {
        let wpa =
            hex_bytes("dd 16 00 50 f2 01 01 00 00 50 f2 02 01 00 00 50 f2 02 01 00 00 50 f2 02");
        let osen = hex_bytes("dd 04 50 6f 9a 12");
        let buf = [&wpa[..], &osen[..]].concat();
        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert_eq!(kdes.wpa_ie, Some(&wpa[..]));
        assert_eq!(kdes.osen, Some(&osen[..]));
    }

    #[test]
    fn parse_generic_elements() {
        let mut buf = vec![];
        write_element(&mut buf, Id::MOBILITY_DOMAIN, &[0xAB, 0xCD, 0x01]);
        write_element(&mut buf, Id::TIMEOUT_INTERVAL, &[TIMEOUT_REASSOC_DEADLINE, 0, 1, 0, 0]);
        write_element(&mut buf, Id::TIMEOUT_INTERVAL, &[TIMEOUT_KEY_LIFETIME, 0, 2, 0, 0]);
        write_element(&mut buf, Id::SSID, b"ssid");
        write_element(&mut buf, Id::SUPPORTED_RATES, &[0x82, 0x84]);
        write_element(&mut buf, Id::EXTENSION, &[ExtId::HE_CAPABILITIES.0, 1, 2, 3]);
        write_element(&mut buf, Id::AID, &[1, 0]);
        write_element(&mut buf, Id::HT_CAPABILITIES, &[0u8; 10][..]);
        let kdes = parse(&buf[..]).expect("error parsing key data");

        assert_eq!(kdes.mde, Some(&[54, 3, 0xAB, 0xCD, 0x01][..]));
        assert_eq!(kdes.reassoc_deadline, Some(&[56, 5, 1, 0, 1, 0, 0][..]));
        assert_eq!(kdes.key_lifetime, Some(&[56, 5, 2, 0, 2, 0, 0][..]));
        assert_eq!(kdes.ssid, Some(&[0, 4, b's', b's', b'i', b'd'][..]));
        assert_eq!(kdes.supp_rates, Some(&[1, 2, 0x82, 0x84][..]));
        assert_eq!(kdes.he_capabilities, Some(&[255, 4, 35, 1, 2, 3][..]));
        assert_eq!(kdes.aid, Some(&[197, 2, 1, 0][..]));
        // Too short to be an HT Capabilities element.
        assert_eq!(kdes.ht_capabilities, None);
    }

    #[test]
    fn last_wins() {
        let mut buf = vec![];
        write_gtk(&mut buf, 1, false, &[0x01; 16][..]);
        write_gtk(&mut buf, 2, false, &[0x02; 16][..]);
        let kdes = parse(&buf[..]).expect("error parsing key data");
        let gtk = kdes.gtk_kde().expect("GTK KDE").expect("valid GTK KDE");
        assert_eq!(gtk.key_id, 2);
        assert_eq!(gtk.gtk, &[0x02; 16][..]);
    }

    #[test]
    fn mlo_kdes() {
        let mut buf = vec![];
        // Key ID 1, link 3; PN; key.
        let mlo_gtk = [&[0x31][..], &[0u8; 6][..], &[0x44; 16][..]].concat();
        write_kde(&mut buf, Oui::DOT11, MLO_GTK_DATA_TYPE, &mlo_gtk[..]);
        // Key ID 4, IPN, link 14; key.
        let mlo_igtk = [&[4, 0][..], &[0u8; 6][..], &[0xE0][..], &[0x55; 16][..]].concat();
        write_kde(&mut buf, Oui::DOT11, MLO_IGTK_DATA_TYPE, &mlo_igtk[..]);
        // Link 15 is reserved and only this KDE is dropped.
        let reserved = [&[0xF1][..], &[0u8; 6][..], &[0x66; 16][..]].concat();
        write_kde(&mut buf, Oui::DOT11, MLO_GTK_DATA_TYPE, &reserved[..]);
        // Link 2 with an RSNE.
        let mlo_link = [&[0x12][..], &[1, 2, 3, 4, 5, 6][..], &RSNE[..]].concat();
        write_kde(&mut buf, Oui::DOT11, MLO_LINK_DATA_TYPE, &mlo_link[..]);
        write_gtk(&mut buf, 1, true, &[0x77; 16][..]);

        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert_eq!(kdes.mlo_gtk.bitmap(), 1 << 3);
        assert_eq!(kdes.mlo_gtk.get(3), Some(&&mlo_gtk[..]));
        assert_eq!(kdes.mlo_igtk.bitmap(), 1 << 14);
        assert_eq!(kdes.mlo_bigtk.len(), 0);
        assert_eq!(
            kdes.mlo_link.get(2),
            Some(&MloLinkKde {
                link_id: 2,
                mac_addr: [1, 2, 3, 4, 5, 6],
                rsne: Some(&RSNE[..]),
                rsnxe: None
            })
        );
        assert!(kdes.gtk.is_some());
    }

    #[test]
    fn malformed_mlo_link_skipped() {
        let mut buf = vec![];
        // Claims an RSNE that is not present.
        write_kde(&mut buf, Oui::DOT11, MLO_LINK_DATA_TYPE, &[0x11, 1, 2, 3, 4, 5, 6]);
        write_kde(&mut buf, Oui::DOT11, KEY_ID_DATA_TYPE, &[1, 0]);
        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert!(kdes.mlo_link.is_empty());
        assert!(kdes.key_id.is_some());
    }

    #[test]
    fn padding_terminates() {
        let mut buf = vec![];
        write_gtk(&mut buf, 1, false, &[0x01; 16][..]);
        let gtk_len = buf.len();
        buf.extend_from_slice(&[TYPE, 0, 0, 0, 0]);
        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert!(kdes.gtk.is_some());

        buf.truncate(gtk_len);
        buf.push(TYPE);
        assert!(parse(&buf[..]).expect("error parsing key data").gtk.is_some());
    }

    #[test]
    fn underflow_fails_whole_call() {
        let mut buf = RSNE.to_vec();
        buf.extend_from_slice(&[TYPE, 10, 0x00, 0x0F, 0xAC]);
        assert_eq!(
            parse(&buf[..]),
            Err(Error::KeyDataUnderflow { offset: 20, declared: 10, remaining: 3 })
        );
    }

    #[test]
    fn short_or_unknown_entries_ignored() {
        let mut buf = vec![];
        write_element(&mut buf, Id::VENDOR_SPECIFIC, &[0x00, 0x0F]);
        write_kde(&mut buf, Oui::DOT11, PMKID_DATA_TYPE, &[0x11; 8][..]);
        write_kde(&mut buf, Oui::new([1, 2, 3]), 1, &[0; 4][..]);
        write_element(&mut buf, Id::COUNTRY, b"US ");
        let kdes = parse(&buf[..]).expect("error parsing key data");
        assert_eq!(kdes, KdeSet::default());
    }

    #[test]
    fn typed_view_errors() {
        assert_matches!(GtkKde::from_bytes(&[0x01, 0x00]), Err(Error::InvalidLength("GTK KDE", 2)));
        assert_matches!(
            IgtkKde::from_bytes(&[4, 0, 1, 2, 3]),
            Err(Error::InvalidLength("IGTK KDE", 5))
        );
        assert_matches!(OciKde::from_bytes(&[81]), Err(Error::InvalidLength("OCI KDE", 1)));
    }

    #[test]
    fn padding_lengths() {
        let mut buf = vec![0u8; 3];
        pad_for_encryption(&mut buf);
        assert_eq!(buf, [&[0u8; 3][..], &[TYPE][..], &[0u8; 12][..]].concat());

        let mut buf = vec![0u8; 24];
        pad_for_encryption(&mut buf);
        assert_eq!(buf.len(), 24);

        let mut buf = vec![0u8; 25];
        pad_for_encryption(&mut buf);
        assert_eq!(buf.len(), 32);
        assert_eq!(buf[25], TYPE);
    }
}
