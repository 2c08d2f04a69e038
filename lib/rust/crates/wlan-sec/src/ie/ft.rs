// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Elements carried by FT Authentication and (Re)Association frames.

use {
    super::{
        rsn::{akm::AkmSuite, parse_rsn, PMKID_LEN},
        Id, Reader, MAX_BODY_LEN,
    },
    crate::{
        config::{log_ignored, Config},
        key::{
            akm_is_sha384,
            ft::{MOBILITY_DOMAIN_ID_LEN, R0KH_ID_MAX_LEN, R1KH_ID_LEN},
            NONCE_LEN,
        },
        key_data::{MloLinks, MAX_MLD_LINKS},
        MacAddr,
    },
    anyhow::{bail, ensure, format_err, Context as _},
    bitfield::bitfield,
    log::{debug, trace},
    nom::{
        combinator::all_consuming,
        multi::{length_data, many0},
        number::complete::le_u8,
        sequence::pair,
        IResult,
    },
};

const MIC_CONTROL_LEN: usize = 2;
const MDE_LEN: usize = 3;
const TIMEOUT_INTERVAL_LEN: usize = 5;

// IEEE Std 802.11-2020, 9.4.2.47, Table 9-225
const SUBELEM_R1KH_ID: u8 = 1;
const SUBELEM_GTK: u8 = 2;
const SUBELEM_R0KH_ID: u8 = 3;
const SUBELEM_IGTK: u8 = 4;
const SUBELEM_OCI: u8 = 5;
const SUBELEM_BIGTK: u8 = 6;
// IEEE P802.11be
const SUBELEM_MLO_GTK: u8 = 8;
const SUBELEM_MLO_IGTK: u8 = 9;
const SUBELEM_MLO_BIGTK: u8 = 10;

/// Key Info, Key Length and RSC ahead of a wrapped GTK.
const GTK_FIXED_LEN: usize = 2 + 1 + 8;
/// Key ID, IPN and Key Length ahead of a wrapped IGTK or BIGTK.
const IGTK_FIXED_LEN: usize = 2 + 6 + 1;
/// Key Info, Link ID Info, Key Length and RSC ahead of a per-link wrapped GTK.
const MLO_GTK_FIXED_LEN: usize = 2 + 1 + 1 + 8;
/// Key ID, IPN, Link ID Info and Key Length ahead of a per-link wrapped IGTK or BIGTK.
const MLO_IGTK_FIXED_LEN: usize = 2 + 6 + 1 + 1;
/// A wrapped key of 16 to 32 octets grows by the 8 octet AES key wrap block.
const WRAPPED_KEY_MIN_LEN: usize = 16 + 8;
const WRAPPED_KEY_MAX_LEN: usize = 32 + 8;
const OCI_MIN_LEN: usize = 3;

// IEEE Std 802.11-2020, 9.4.2.47, Figure 9-590
bitfield! {
    pub struct MicControl(u16);
    impl Debug;
    pub rsnxe_used, _: 0, 0;
    /// Only defined for FT-SAE-EXT-KEY.
    pub mic_len_field, _: 3, 1;
    pub element_count, _: 15, 8;
}

impl Clone for MicControl {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl PartialEq for MicControl {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MicControl {}

/// A defragmented Fast BSS Transition element and its subelements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fte {
    /// The element body with every Fragment element appended.
    pub body: Vec<u8>,
    pub mic_control: MicControl,
    pub mic_len: usize,
    pub anonce: [u8; NONCE_LEN],
    pub snonce: [u8; NONCE_LEN],
    pub r0kh_id: Option<Vec<u8>>,
    pub r1kh_id: Option<MacAddr>,
    pub gtk: Option<Vec<u8>>,
    pub igtk: Option<Vec<u8>>,
    pub bigtk: Option<Vec<u8>>,
    pub oci: Option<Vec<u8>>,
    pub mlo_gtk: MloLinks<Vec<u8>>,
    pub mlo_igtk: MloLinks<Vec<u8>>,
    pub mlo_bigtk: MloLinks<Vec<u8>>,
}

impl Fte {
    pub fn mic(&self) -> &[u8] {
        &self.body[MIC_CONTROL_LEN..MIC_CONTROL_LEN + self.mic_len]
    }
}

/// Elements of interest in an FT frame. Everything except the FTE borrows from the frame; the
/// elements are whole, header included, so they can be fed to the FT MIC directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WpaFtIes<'a> {
    pub rsne: Option<&'a [u8]>,
    /// The PMKID, when the RSNE lists exactly one.
    pub rsn_pmkid: Option<&'a [u8]>,
    pub rsnxe: Option<&'a [u8]>,
    pub mde: Option<&'a [u8]>,
    /// The FTE and its Fragment elements as they appear in the frame.
    pub fte_span: Option<&'a [u8]>,
    pub fte: Option<Fte>,
    pub timeout_interval: Option<&'a [u8]>,
    /// From the first RIC Data element to the end of the frame.
    pub ric: Option<&'a [u8]>,
}

impl<'a> WpaFtIes<'a> {
    pub fn mdid(&self) -> Option<[u8; MOBILITY_DOMAIN_ID_LEN]> {
        self.mde.map(|mde| [mde[2], mde[3]])
    }

    /// Parses the elements of an FT frame negotiated with `akm`.
    pub fn parse(buf: &'a [u8], akm: AkmSuite, config: &Config) -> Result<Self, anyhow::Error> {
        let mut ies = WpaFtIes::default();
        let mut fte: Option<(usize, Vec<u8>)> = None;
        let mut continuable = false;
        let mut reader = Reader::new(buf);
        let mut start = reader.offset();
        while let Some(ie) = reader.next() {
            let end = reader.offset();
            let element = &buf[start..end];
            let body = &element[2..];
            start = end;

            if ie.id == Id::FRAGMENT {
                match (continuable, fte.as_mut()) {
                    (true, Some((fte_start, fte_body))) => {
                        fte_body.extend_from_slice(body);
                        ies.fte_span = Some(&buf[*fte_start..end]);
                    }
                    _ => trace!("ignoring Fragment element in FT frame"),
                }
                continuable = continuable && body.len() == MAX_BODY_LEN;
                continue;
            }
            continuable = false;

            match ie.id {
                Id::RSNE => store_first(&mut ies.rsne, element, "RSNE", config),
                Id::RSNXE => store_first(&mut ies.rsnxe, element, "RSNXE", config),
                Id::MOBILITY_DOMAIN => {
                    if body.len() < MDE_LEN {
                        log_ignored!(config, "short MDE ignored ({} octets)", body.len());
                    } else {
                        store_first(&mut ies.mde, element, "MDE", config);
                    }
                }
                Id::FAST_BSS_TRANSITION => {
                    if fte.is_some() {
                        log_ignored!(config, "duplicate FTE ignored");
                    } else {
                        fte = Some((end - element.len(), body.to_vec()));
                        ies.fte_span = Some(element);
                        continuable = body.len() == MAX_BODY_LEN;
                    }
                }
                Id::TIMEOUT_INTERVAL => {
                    if body.len() == TIMEOUT_INTERVAL_LEN {
                        ies.timeout_interval = Some(element);
                    } else {
                        log_ignored!(config, "Timeout Interval of {} octets ignored", body.len());
                    }
                }
                Id::RIC_DATA => {
                    if ies.ric.is_none() {
                        ies.ric = Some(&buf[end - element.len()..]);
                    }
                }
                other => trace!("element {} not used by FT", other.0),
            }
        }
        ensure!(!reader.is_truncated(), "element list truncated at offset {}", reader.offset());

        if let Some(rsne) = ies.rsne {
            let rsn = parse_rsn(rsne).context("invalid RSNE in FT frame")?;
            if rsn.num_pmkid() == 1 {
                ies.rsn_pmkid = Some(&rsn.pmkid[..PMKID_LEN]);
            }
        }
        if let Some((_, body)) = fte {
            ies.fte = Some(parse_fte(body, akm).context("invalid FTE")?);
        }
        Ok(ies)
    }
}

fn store_first<'a>(slot: &mut Option<&'a [u8]>, element: &'a [u8], what: &str, config: &Config) {
    if slot.is_some() {
        log_ignored!(config, "duplicate {} ignored", what);
    } else {
        *slot = Some(element);
    }
}

/// MIC length by AKM. FT-SAE-EXT-KEY signals its MIC length in MIC Control.
fn mic_len(akm: AkmSuite, mic_control: &MicControl) -> Result<usize, anyhow::Error> {
    if akm == AkmSuite::FtSaeExtKey {
        match mic_control.mic_len_field() {
            0 => Ok(16),
            1 => Ok(24),
            2 => Ok(32),
            other => bail!("reserved MIC length {} in MIC Control", other),
        }
    } else if akm_is_sha384(akm) {
        Ok(24)
    } else {
        Ok(16)
    }
}

fn subelements(i: &[u8]) -> IResult<&[u8], Vec<(u8, &[u8])>> {
    all_consuming(many0(pair(le_u8, length_data(le_u8))))(i)
}

fn wrapped_key_len_ok(data: &[u8], fixed: usize) -> bool {
    (fixed + WRAPPED_KEY_MIN_LEN..=fixed + WRAPPED_KEY_MAX_LEN).contains(&data.len())
}

fn insert_link(links: &mut MloLinks<Vec<u8>>, link_id: u8, data: &[u8], what: &str) {
    if (link_id as usize) < MAX_MLD_LINKS {
        links.insert(link_id, data.to_vec());
    } else {
        debug!("{} subelement with reserved link ID {} skipped", what, link_id);
    }
}

fn parse_fte(body: Vec<u8>, akm: AkmSuite) -> Result<Fte, anyhow::Error> {
    ensure!(body.len() >= MIC_CONTROL_LEN, "FTE too short for MIC Control: {}", body.len());
    let mic_control = MicControl(u16::from_le_bytes([body[0], body[1]]));
    let mic_len = mic_len(akm, &mic_control)?;
    let fixed_len = MIC_CONTROL_LEN + mic_len + 2 * NONCE_LEN;
    ensure!(
        body.len() >= fixed_len,
        "FTE of {} octets, expected at least {}",
        body.len(),
        fixed_len
    );

    let mut anonce = [0u8; NONCE_LEN];
    let mut snonce = [0u8; NONCE_LEN];
    let nonces = &body[MIC_CONTROL_LEN + mic_len..fixed_len];
    anonce.copy_from_slice(&nonces[..NONCE_LEN]);
    snonce.copy_from_slice(&nonces[NONCE_LEN..]);

    let mut fte = Fte {
        body: vec![],
        mic_control,
        mic_len,
        anonce,
        snonce,
        r0kh_id: None,
        r1kh_id: None,
        gtk: None,
        igtk: None,
        bigtk: None,
        oci: None,
        mlo_gtk: MloLinks::default(),
        mlo_igtk: MloLinks::default(),
        mlo_bigtk: MloLinks::default(),
    };

    let (_, subelems) = subelements(&body[fixed_len..])
        .map_err(|_| format_err!("truncated FTE subelement"))?;
    for (id, data) in subelems {
        match id {
            SUBELEM_R1KH_ID => {
                ensure!(data.len() == R1KH_ID_LEN, "invalid R1KH-ID length {}", data.len());
                let mut r1kh_id = [0u8; R1KH_ID_LEN];
                r1kh_id.copy_from_slice(data);
                fte.r1kh_id = Some(r1kh_id);
            }
            SUBELEM_R0KH_ID => {
                ensure!(
                    (1..=R0KH_ID_MAX_LEN).contains(&data.len()),
                    "invalid R0KH-ID length {}",
                    data.len()
                );
                fte.r0kh_id = Some(data.to_vec());
            }
            SUBELEM_GTK => {
                ensure!(
                    wrapped_key_len_ok(data, GTK_FIXED_LEN),
                    "invalid GTK length {}",
                    data.len()
                );
                fte.gtk = Some(data.to_vec());
            }
            SUBELEM_IGTK => {
                ensure!(
                    wrapped_key_len_ok(data, IGTK_FIXED_LEN),
                    "invalid IGTK length {}",
                    data.len()
                );
                fte.igtk = Some(data.to_vec());
            }
            SUBELEM_BIGTK => {
                ensure!(
                    wrapped_key_len_ok(data, IGTK_FIXED_LEN),
                    "invalid BIGTK length {}",
                    data.len()
                );
                fte.bigtk = Some(data.to_vec());
            }
            SUBELEM_OCI => {
                ensure!(data.len() >= OCI_MIN_LEN, "invalid OCI length {}", data.len());
                fte.oci = Some(data.to_vec());
            }
            SUBELEM_MLO_GTK => {
                ensure!(
                    wrapped_key_len_ok(data, MLO_GTK_FIXED_LEN),
                    "invalid MLO GTK length {}",
                    data.len()
                );
                insert_link(&mut fte.mlo_gtk, data[2] & 0x0F, data, "MLO GTK");
            }
            SUBELEM_MLO_IGTK | SUBELEM_MLO_BIGTK => {
                ensure!(
                    wrapped_key_len_ok(data, MLO_IGTK_FIXED_LEN),
                    "invalid MLO IGTK/BIGTK length {}",
                    data.len()
                );
                let link_id = data[IGTK_FIXED_LEN - 1] & 0x0F;
                if id == SUBELEM_MLO_IGTK {
                    insert_link(&mut fte.mlo_igtk, link_id, data, "MLO IGTK");
                } else {
                    insert_link(&mut fte.mlo_bigtk, link_id, data, "MLO BIGTK");
                }
            }
            other => trace!("unknown FTE subelement {} ({} octets)", other, data.len()),
        }
    }
    fte.body = body;
    Ok(fte)
}
