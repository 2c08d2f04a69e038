// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{ExtId, Id, MAX_BODY_LEN},
    crate::buffer_reader::BufferReader,
    bitflags::bitflags,
    thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("PASN Parameters element too short: {0} octets")]
    TooShort(usize),
    #[error("truncated Comeback Info")]
    ComebackTruncated,
    #[error("truncated Group and Key field")]
    GroupTruncated,
    #[error("{0} too long to encode")]
    TooLong(&'static str),
}

bitflags! {
    // IEEE Std 802.11az-2022, 9.4.2.305, Figure 9-1002d
    pub struct PasnControl: u8 {
        const COMEBACK_INFO_PRESENT = 1 << 0;
        const GROUP_AND_KEY_PRESENT = 1 << 1;
    }
}

const WRAPPED_DATA_FORMAT_MASK: u8 = 0x0F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrappedDataFormat {
    None,
    Ft,
    FilsSk,
    Sae,
    Reserved(u8),
}

impl From<u8> for WrappedDataFormat {
    fn from(value: u8) -> Self {
        match value & WRAPPED_DATA_FORMAT_MASK {
            0 => Self::None,
            1 => Self::Ft,
            2 => Self::FilsSk,
            3 => Self::Sae,
            other => Self::Reserved(other),
        }
    }
}

impl From<WrappedDataFormat> for u8 {
    fn from(format: WrappedDataFormat) -> Self {
        match format {
            WrappedDataFormat::None => 0,
            WrappedDataFormat::Ft => 1,
            WrappedDataFormat::FilsSk => 2,
            WrappedDataFormat::Sae => 3,
            WrappedDataFormat::Reserved(other) => other & WRAPPED_DATA_FORMAT_MASK,
        }
    }
}

/// Decoded PASN Parameters element. Slices borrow from the parsed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasnParams<'a> {
    pub control: PasnControl,
    pub wrapped_data_format: WrappedDataFormat,
    /// Comeback After in TUs. Only an AP sends it.
    pub comeback_after: u16,
    pub comeback: Option<&'a [u8]>,
    /// Zero when no Group and Key field is present.
    pub group: u16,
    pub pubkey: Option<&'a [u8]>,
}

impl<'a> PasnParams<'a> {
    /// Parses the element body following the Element ID Extension octet. `from_ap` selects
    /// whether a Comeback Info field carries the Comeback After subfield.
    // IEEE Std 802.11az-2022, 9.4.2.305
    pub fn parse(body: &'a [u8], from_ap: bool) -> Result<Self, Error> {
        let mut rdr = BufferReader::new(body);
        let (control, format) = match (rdr.read_byte(), rdr.read_byte()) {
            (Some(control), Some(format)) => (control, format),
            _ => return Err(Error::TooShort(body.len())),
        };
        let control = PasnControl::from_bits_truncate(control);
        let mut params = PasnParams {
            control,
            wrapped_data_format: format.into(),
            comeback_after: 0,
            comeback: None,
            group: 0,
            pubkey: None,
        };

        if control.contains(PasnControl::COMEBACK_INFO_PRESENT) {
            if from_ap {
                let after = rdr.read_bytes(2).ok_or(Error::ComebackTruncated)?;
                params.comeback_after = u16::from_le_bytes([after[0], after[1]]);
            }
            let len = rdr.read_byte().ok_or(Error::ComebackTruncated)?;
            params.comeback = Some(rdr.read_bytes(len as usize).ok_or(Error::ComebackTruncated)?);
        }

        if control.contains(PasnControl::GROUP_AND_KEY_PRESENT) {
            let group = rdr.read_bytes(2).ok_or(Error::GroupTruncated)?;
            params.group = u16::from_le_bytes([group[0], group[1]]);
            let len = rdr.read_byte().ok_or(Error::GroupTruncated)?;
            params.pubkey = Some(rdr.read_bytes(len as usize).ok_or(Error::GroupTruncated)?);
        }
        Ok(params)
    }

    /// Appends the complete element. The control flags follow the optional fields present;
    /// `comeback_after` is written with a comeback token only when `from_ap` is set.
    pub fn write(&self, buf: &mut Vec<u8>, from_ap: bool) -> Result<(), Error> {
        let mut body = vec![ExtId::PASN_PARAMS.0];
        let mut control = PasnControl::empty();
        if self.comeback.is_some() {
            control |= PasnControl::COMEBACK_INFO_PRESENT;
        }
        if self.pubkey.is_some() {
            control |= PasnControl::GROUP_AND_KEY_PRESENT;
        }
        body.push(control.bits());
        body.push(self.wrapped_data_format.into());

        if let Some(comeback) = self.comeback {
            if from_ap {
                body.extend_from_slice(&self.comeback_after.to_le_bytes()[..]);
            }
            let len = u8::try_from(comeback.len()).map_err(|_| Error::TooLong("comeback token"))?;
            body.push(len);
            body.extend_from_slice(comeback);
        }
        if let Some(pubkey) = self.pubkey {
            body.extend_from_slice(&self.group.to_le_bytes()[..]);
            let len = u8::try_from(pubkey.len()).map_err(|_| Error::TooLong("public key"))?;
            body.push(len);
            body.extend_from_slice(pubkey);
        }
        if body.len() > MAX_BODY_LEN {
            return Err(Error::TooLong("PASN Parameters element"));
        }
        buf.push(Id::EXTENSION.0);
        buf.push(body.len() as u8);
        buf.extend_from_slice(&body[..]);
        Ok(())
    }
}
