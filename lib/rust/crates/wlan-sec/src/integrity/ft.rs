// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{zero_mic_field, Algorithm, Mic, MicAlgorithm},
    crate::{ie::rsn::akm::AkmSuite, secret::ct_eq, Error, MacAddr},
    log::debug,
};

/// The MIC follows the element header and the two octet MIC Control field.
pub const FTE_MIC_OFFSET: usize = 4;

/// Everything the FT MIC covers. Elements are complete, header included, as they appear in the
/// frame.
#[derive(Debug, Clone, Copy)]
pub struct FtMicInput<'a> {
    pub sta: &'a MacAddr,
    pub ap: &'a MacAddr,
    /// Transaction sequence number: 5 for (Re)Association Request, 6 for Response.
    pub seq: u8,
    pub rsne: Option<&'a [u8]>,
    pub mde: Option<&'a [u8]>,
    /// The FTE carrying the MIC. Its MIC field is treated as zero.
    pub fte: &'a [u8],
    pub ric: Option<&'a [u8]>,
    pub rsnxe: Option<&'a [u8]>,
    pub extra: Option<&'a [u8]>,
}

/// Selects the FT MIC by KCK length. A 16 octet KCK uses AES-128-CMAC except with
/// FT-SAE-EXT-KEY, where it selects HMAC-SHA-256 truncated to 16 octets.
// IEEE Std 802.11-2020, 13.8.4
pub fn ft_mic_algorithm(kck_len: usize, akm: AkmSuite) -> Result<Mic, Error> {
    match kck_len {
        16 if akm == AkmSuite::FtSaeExtKey => Ok(Mic::new(MicAlgorithm::HmacSha256, 16)),
        16 => Ok(Mic::new(MicAlgorithm::CmacAes128, 16)),
        24 | 32 => Mic::hmac_sha2_for_key_len(kck_len),
        _ => Err(Error::UnsupportedKeyLength(kck_len)),
    }
}

fn mic_and_expected<'a>(
    kck: &[u8],
    akm: AkmSuite,
    input: &FtMicInput<'a>,
) -> Result<(Mic, Vec<u8>, &'a [u8]), Error> {
    if kck.is_empty() {
        return Err(Error::MissingInput("KCK"));
    }
    let mic = ft_mic_algorithm(kck.len(), akm)?;
    let fte = zero_mic_field(input.fte, FTE_MIC_OFFSET, mic.len, "FTE")?;
    let expected = &input.fte[FTE_MIC_OFFSET..FTE_MIC_OFFSET + mic.len];

    let mut data = Vec::with_capacity(13 + input.fte.len());
    data.extend_from_slice(&input.sta[..]);
    data.extend_from_slice(&input.ap[..]);
    data.push(input.seq);
    for element in [input.rsne, input.mde] {
        data.extend_from_slice(element.unwrap_or_default());
    }
    data.extend_from_slice(&fte[..]);
    for element in [input.ric, input.rsnxe, input.extra] {
        data.extend_from_slice(element.unwrap_or_default());
    }
    Ok((mic, data, expected))
}

/// Computes the MIC to place in the FTE.
pub fn ft_mic(kck: &[u8], akm: AkmSuite, input: &FtMicInput<'_>) -> Result<Vec<u8>, Error> {
    let (mic, data, _) = mic_and_expected(kck, akm, input)?;
    mic.compute(kck, &data[..])
}

/// Verifies the MIC carried in `input.fte`.
pub fn verify_ft_mic(kck: &[u8], akm: AkmSuite, input: &FtMicInput<'_>) -> Result<(), Error> {
    let (mic, data, expected) = mic_and_expected(kck, akm, input)?;
    let computed = mic.compute(kck, &data[..])?;
    if ct_eq(&computed[..], expected) {
        Ok(())
    } else {
        debug!("FT MIC mismatch ({:?})", mic.algorithm);
        Err(Error::MicMismatch)
    }
}
