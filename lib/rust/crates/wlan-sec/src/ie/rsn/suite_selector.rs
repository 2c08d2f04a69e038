// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::organization::Oui;
use std::fmt;

pub const SUITE_SELECTOR_LEN: usize = 4;

// IEEE Std 802.11-2020, 9.4.2.24.1
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiteSelector {
    pub oui: Oui,
    pub suite_type: u8,
}

impl SuiteSelector {
    pub const fn new(oui: Oui, suite_type: u8) -> Self {
        Self { oui, suite_type }
    }

    pub fn from_bytes(bytes: [u8; SUITE_SELECTOR_LEN]) -> Self {
        Self { oui: Oui::new([bytes[0], bytes[1], bytes[2]]), suite_type: bytes[3] }
    }

    pub fn to_bytes(self) -> [u8; SUITE_SELECTOR_LEN] {
        [self.oui[0], self.oui[1], self.oui[2], self.suite_type]
    }
}

impl fmt::Debug for SuiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.oui, self.suite_type)
    }
}

/// Declares a bitmask over a closed suite enum. The enum must provide `ALL` and `bit()`.
macro_rules! suite_set {
    ($(#[$attr:meta])* $name:ident, $suite:ty) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub const fn empty() -> Self {
                Self(0)
            }

            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub fn insert(&mut self, suite: $suite) {
                self.0 |= suite.bit();
            }

            pub fn contains(&self, suite: $suite) -> bool {
                self.0 & suite.bit() != 0
            }

            pub fn bits(&self) -> u32 {
                self.0
            }

            pub fn iter(&self) -> impl Iterator<Item = $suite> + '_ {
                let all: &'static [$suite] = &<$suite>::ALL;
                all.iter().copied().filter(move |suite| self.contains(*suite))
            }

            /// Returns the suite if exactly one is present.
            pub fn single(&self) -> Option<$suite> {
                if self.0.count_ones() == 1 {
                    self.iter().next()
                } else {
                    None
                }
            }
        }

        impl From<$suite> for $name {
            fn from(suite: $suite) -> Self {
                Self(suite.bit())
            }
        }

        impl std::iter::FromIterator<$suite> for $name {
            fn from_iter<I: IntoIterator<Item = $suite>>(iter: I) -> Self {
                let mut set = Self::empty();
                for suite in iter {
                    set.insert(suite);
                }
                set
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }
    };
}
pub(crate) use suite_set;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_bytes() {
        let selector = SuiteSelector::from_bytes([0x00, 0x0F, 0xAC, 0x04]);
        assert_eq!(selector, SuiteSelector::new(Oui::DOT11, 4));
        assert_eq!(selector.to_bytes(), [0x00, 0x0F, 0xAC, 0x04]);
        assert_eq!(format!("{:?}", selector), "00-0F-AC:4");
    }
}
