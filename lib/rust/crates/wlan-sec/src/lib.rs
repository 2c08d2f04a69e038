// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Parsing of 802.11 security elements and derivation of the RSN key hierarchy.
//!
//! Everything in this crate is a pure function over caller-owned input. Parsers borrow from the
//! buffers they were handed and never copy attacker-controlled data unless reassembly requires
//! it. Derived key material is held in [`SecretBytes`] which is zeroed when dropped.

pub mod buffer_reader;
pub mod config;
pub mod ie;
pub mod integrity;
pub mod key;
pub mod key_data;
pub mod organization;
pub mod secret;

#[cfg(test)]
mod test_utils;

use thiserror::Error;

pub use crate::config::Config;
pub use crate::secret::SecretBytes;

pub type MacAddr = [u8; 6];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported cipher suite: {0:?}")]
    UnsupportedCipher(Option<ie::rsn::cipher::CipherSuite>),
    #[error("unsupported AKM suite: {0:?}")]
    UnsupportedAkm(Option<ie::rsn::akm::AkmSuite>),
    #[error("missing secret: {0}")]
    MissingSecret(&'static str),
    #[error("missing input: {0}")]
    MissingInput(&'static str),
    #[error("unsupported key length: {0}")]
    UnsupportedKeyLength(usize),
    #[error("invalid length for {0}: {1}")]
    InvalidLength(&'static str, usize),
    #[error("key descriptor version {0} not permitted by policy")]
    DisallowedAlgorithm(u8),
    #[error("unknown key descriptor version: {0}")]
    UnknownKeyDescriptorVersion(u8),
    #[error("unsupported SAE group: {0}")]
    UnsupportedSaeGroup(u16),
    #[error("invalid SAE commit value: {0}")]
    InvalidSaeCommit(&'static str),
    #[error("no SAE password element found")]
    SaePasswordElementNotFound,
    #[error("key data underflow at offset {offset}: element declares {declared} octets, {remaining} remain")]
    KeyDataUnderflow { offset: usize, declared: usize, remaining: usize },
    #[error("invalid passphrase length: {0}")]
    InvalidPassphraseLen(usize),
    #[error("invalid SSID length: {0}")]
    InvalidSsidLen(usize),
    #[error("MIC mismatch")]
    MicMismatch,
}
