// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    super::{ExtId, Header, Id, InformationElement},
    crate::buffer_reader::BufferReader,
    std::mem::size_of,
};

/// Iterates over a chain of information elements.
///
/// Iteration stops at the first element whose declared length runs past the end of the
/// buffer. Callers that need to distinguish a clean end from such an overrun check
/// [`Reader::is_truncated`] once the iterator is exhausted.
pub struct Reader<'a> {
    rdr: BufferReader<'a>,
    truncated: bool,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { rdr: BufferReader::new(bytes), truncated: false }
    }

    /// Offset of the next element relative to the start of the buffer.
    pub fn offset(&self) -> usize {
        self.rdr.bytes_read()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn bytes_remaining(&self) -> usize {
        self.rdr.bytes_remaining()
    }
}

impl<'a> Iterator for Reader<'a> {
    type Item = InformationElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.truncated || self.rdr.bytes_remaining() == 0 {
            return None;
        }
        let header = match self.rdr.peek::<Header>() {
            Some(header) => header,
            None => {
                self.truncated = true;
                return None;
            }
        };
        let body_len = header.body_len as usize;
        if self.rdr.bytes_remaining() < size_of::<Header>() + body_len {
            self.truncated = true;
            return None;
        }

        // Both reads succeed after the length check above.
        let header = self.rdr.read::<Header>()?;
        let body = self.rdr.read_bytes(body_len)?;
        let (ext_id, data) = match header.id {
            Id::EXTENSION => match body.split_first() {
                Some((ext_id, data)) => (Some(ExtId(*ext_id)), data),
                None => (None, body),
            },
            _ => (None, body),
        };
        Some(InformationElement { id: header.id, ext_id, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn empty() {
        let mut rdr = Reader::new(&[][..]);
        assert_eq!(None, rdr.next());
        assert!(!rdr.is_truncated());
    }

    #[test]
    pub fn less_than_header() {
        let mut rdr = Reader::new(&[0][..]);
        assert_eq!(None, rdr.next());
        assert!(rdr.is_truncated());
    }

    #[test]
    pub fn body_too_short() {
        let mut rdr = Reader::new(&[0, 2, 10][..]);
        assert_eq!(None, rdr.next());
        assert!(rdr.is_truncated());
    }

    #[test]
    pub fn empty_body() {
        let elems: Vec<_> = Reader::new(&[0, 0][..]).collect();
        assert_eq!(&[InformationElement { id: Id::SSID, ext_id: None, data: &[][..] }], &elems[..]);
    }

    #[test]
    pub fn two_elements() {
        let bytes = vec![0, 2, 10, 20, 1, 3, 11, 22, 33];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(
            &[
                InformationElement { id: Id::SSID, ext_id: None, data: &[10, 20][..] },
                InformationElement {
                    id: Id::SUPPORTED_RATES,
                    ext_id: None,
                    data: &[11, 22, 33][..]
                },
            ],
            &elems[..]
        );
    }

    #[test]
    pub fn extension_element() {
        let bytes = vec![255, 3, 35, 1, 2, 255, 0];
        let elems: Vec<_> = Reader::new(&bytes[..]).collect();
        assert_eq!(
            &[
                InformationElement {
                    id: Id::EXTENSION,
                    ext_id: Some(ExtId::HE_CAPABILITIES),
                    data: &[1, 2][..]
                },
                InformationElement { id: Id::EXTENSION, ext_id: None, data: &[][..] },
            ],
            &elems[..]
        );
    }

    #[test]
    pub fn stops_at_overrun() {
        let bytes = vec![0, 1, 10, 1, 5, 1];
        let mut rdr = Reader::new(&bytes[..]);
        assert!(rdr.next().is_some());
        assert_eq!(rdr.offset(), 3);
        assert_eq!(rdr.next(), None);
        assert!(rdr.is_truncated());
        assert_eq!(rdr.bytes_remaining(), 3);
    }
}
