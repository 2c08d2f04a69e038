// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    crate::MacAddr,
    hex::FromHex,
    hmac::{digest::core_api::BlockSizeUser, Mac, SimpleHmac},
    sha2::Digest,
};

pub const S_ADDR: MacAddr = [0x81, 0x76, 0x61, 0x14, 0xDF, 0xC9];
pub const A_ADDR: MacAddr = [0x1D, 0xE3, 0xFD, 0xDF, 0xCB, 0xD3];

/// PSK for passphrase "ThisIsAPassword" and SSID "ThisIsASSID".
pub fn pmk() -> Vec<u8> {
    Vec::from_hex("0dc0d6eb90555ed6419756b9a15ec3e3209b63df707dd508d14581f8982721af")
        .expect("error reading PMK from hex")
}

/// Decodes hex with arbitrary whitespace between octets.
pub fn hex_bytes(s: &str) -> Vec<u8> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    Vec::from_hex(compact).expect("invalid hex in test vector")
}

/// KDF-Hash-Length written out directly against `hmac`, independent of `key::prf`.
pub fn reference_kdf<D: Digest + BlockSizeUser>(
    key: &[u8],
    label: &str,
    context: &[u8],
    len: usize,
) -> Vec<u8> {
    let mut out = vec![];
    let mut i = 1u16;
    while out.len() < len {
        let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key).expect("HMAC key");
        mac.update(&i.to_le_bytes());
        mac.update(label.as_bytes());
        mac.update(context);
        mac.update(&((len * 8) as u16).to_le_bytes());
        out.extend_from_slice(&mac.finalize().into_bytes());
        i += 1;
    }
    out.truncate(len);
    out
}
