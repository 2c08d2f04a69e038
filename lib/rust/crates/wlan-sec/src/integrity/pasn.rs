// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{zero_mic_field, Algorithm, Mic, MicAlgorithm},
    crate::{
        ie::rsn::{akm::AkmSuite, cipher::CipherSuite},
        key::{pasn::pasn_hash_class, HashClass},
        secret::ct_eq,
        Error, MacAddr,
    },
    log::debug,
};

pub fn pasn_mic_algorithm(akm: AkmSuite, cipher: CipherSuite) -> Mic {
    match pasn_hash_class(akm, cipher) {
        HashClass::Sha384 => Mic::new(MicAlgorithm::HmacSha384, 24),
        _ => Mic::new(MicAlgorithm::HmacSha256, 16),
    }
}

pub fn pasn_mic_len(akm: AkmSuite, cipher: CipherSuite) -> usize {
    pasn_mic_algorithm(akm, cipher).len
}

/// What the PASN MIC covers. `frame` holds the MIC at `mic_offset`; that field is treated as
/// zero.
#[derive(Debug, Clone, Copy)]
pub struct PasnMicInput<'a> {
    pub addr1: &'a MacAddr,
    pub addr2: &'a MacAddr,
    /// Hash of the first PASN Authentication frame, or other context data.
    pub context: &'a [u8],
    pub frame: &'a [u8],
    pub mic_offset: usize,
}

fn covered(mic: &Mic, input: &PasnMicInput<'_>) -> Result<Vec<u8>, Error> {
    let frame = zero_mic_field(input.frame, input.mic_offset, mic.len, "PASN frame")?;
    Ok([&input.addr1[..], &input.addr2[..], input.context, &frame[..]].concat())
}

// IEEE Std 802.11az-2022, 12.13.8
pub fn pasn_mic(
    kck: &[u8],
    akm: AkmSuite,
    cipher: CipherSuite,
    input: &PasnMicInput<'_>,
) -> Result<Vec<u8>, Error> {
    if kck.is_empty() {
        return Err(Error::MissingInput("KCK"));
    }
    let mic = pasn_mic_algorithm(akm, cipher);
    mic.compute(kck, &covered(&mic, input)?[..])
}

pub fn verify_pasn_mic(
    kck: &[u8],
    akm: AkmSuite,
    cipher: CipherSuite,
    input: &PasnMicInput<'_>,
) -> Result<(), Error> {
    let computed = pasn_mic(kck, akm, cipher, input)?;
    let expected = &input.frame[input.mic_offset..input.mic_offset + computed.len()];
    if ct_eq(&computed[..], expected) {
        Ok(())
    } else {
        debug!("PASN MIC mismatch");
        Err(Error::MicMismatch)
    }
}
