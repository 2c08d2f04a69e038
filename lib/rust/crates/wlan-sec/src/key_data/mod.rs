// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod kde;

pub use self::kde::{parse, GtkKde, IgtkKde, KdeSet, MloLinkKde, OciKde};

/// Number of links a multi-link device can address. Link IDs are four bits wide; 15 is reserved.
pub const MAX_MLD_LINKS: usize = 15;

/// Per-link values keyed by a 4-bit link ID, with a bitmap of the links present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MloLinks<T> {
    slots: [Option<T>; MAX_MLD_LINKS],
    present: u16,
}

impl<T> Default for MloLinks<T> {
    fn default() -> Self {
        Self { slots: Default::default(), present: 0 }
    }
}

impl<T> MloLinks<T> {
    /// Stores `value` for `link_id`, replacing any earlier value. Returns false, storing nothing,
    /// if the link ID is out of range.
    pub fn insert(&mut self, link_id: u8, value: T) -> bool {
        match self.slots.get_mut(link_id as usize) {
            Some(slot) => {
                *slot = Some(value);
                self.present |= 1 << link_id;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, link_id: u8) -> Option<&T> {
        self.slots.get(link_id as usize).and_then(Option::as_ref)
    }

    /// Bit `n` is set if link `n` holds a value.
    pub fn bitmap(&self) -> u16 {
        self.present
    }

    pub fn is_empty(&self) -> bool {
        self.present == 0
    }

    pub fn len(&self) -> usize {
        self.present.count_ones() as usize
    }

    /// Iterates over present links in ascending link ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(link_id, slot)| slot.as_ref().map(|value| (link_id as u8, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut links = MloLinks::default();
        assert!(links.is_empty());
        assert!(links.insert(0, "a"));
        assert!(links.insert(14, "b"));
        assert!(!links.insert(15, "c"));
        assert_eq!(links.get(0), Some(&"a"));
        assert_eq!(links.get(14), Some(&"b"));
        assert_eq!(links.get(15), None);
        assert_eq!(links.bitmap(), 0x4001);
        assert_eq!(links.len(), 2);
        assert_eq!(links.iter().collect::<Vec<_>>(), vec![(0, &"a"), (14, &"b")]);
    }

    #[test]
    fn insert_replaces() {
        let mut links = MloLinks::default();
        links.insert(3, 1);
        links.insert(3, 2);
        assert_eq!(links.get(3), Some(&2));
        assert_eq!(links.len(), 1);
    }
}
