// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! SAE commit generation and key derivation.
//!
//! [`SaeCommit`] builds a group 19 Commit from the password by hunting and pecking and turns the
//! peer's Commit into keys. [`derive_keys`] covers any supported group once the shared secret
//! is known. Sequencing the exchange and drawing `rand` and `mask` is left to the caller.

use {
    super::{min_max, prf, ptk::require, HashClass},
    crate::{
        ie::{rsn::PMKID_LEN, ExtId, Id},
        secret::SecretBytes,
        Error, MacAddr,
    },
    log::debug,
    num::BigUint,
    p256::{
        elliptic_curve::{
            point::{AffineCoordinates, DecompressPoint},
            sec1::{FromEncodedPoint, ToEncodedPoint},
            PrimeField,
        },
        AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
    },
    std::fmt,
    subtle::Choice,
    zeroize::Zeroizing,
};

const SAE_KCK_AND_PMK: &str = "SAE KCK and PMK";
const SAE_HUNTING_AND_PECKING: &str = "SAE Hunting and Pecking";
const LEGACY_KEY_LEN: usize = 32;

/// The only group [`SaeCommit`] generates commits for.
pub const COMMIT_GROUP: u16 = 19;
const P256_LEN: usize = 32;
/// Hunting and pecking runs at least this many rounds, however early the element is found.
const MIN_PWE_ROUNDS: u8 = 40;
const MAX_PWE_ROUNDS: u8 = 200;
const MAX_PASSWORD_ID_LEN: usize = 254;

// RFC 5903, 3.1
const P256_PRIME: [u8; P256_LEN] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// An ECC group usable with SAE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaeGroup {
    pub id: u16,
    /// Octets in an element coordinate and in the shared secret `k`.
    pub prime_len: usize,
    /// Octets in a scalar.
    pub order_len: usize,
    order: &'static [u8],
}

// RFC 5903, 3.1 and 3.2
const GROUPS: [SaeGroup; 2] = [
    SaeGroup {
        id: 19,
        prime_len: 32,
        order_len: 32,
        order: &[
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84,
            0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
        ],
    },
    SaeGroup {
        id: 20,
        prime_len: 48,
        order_len: 48,
        order: &[
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            0xC7, 0x63, 0x4D, 0x81, 0xF4, 0x37, 0x2D, 0xDF, 0x58, 0x1A, 0x0D, 0xB2,
            0x48, 0xB0, 0xA7, 0x7A, 0xEC, 0xEC, 0x19, 0x6A, 0xCC, 0xC5, 0x29, 0x73,
        ],
    },
];

impl SaeGroup {
    pub fn from_id(id: u16) -> Result<Self, Error> {
        GROUPS.iter().find(|group| group.id == id).copied().ok_or(Error::UnsupportedSaeGroup(id))
    }

    pub fn order(&self) -> BigUint {
        BigUint::from_bytes_be(self.order)
    }

    /// Hash used with SAE-EXT-KEY, chosen by the group's prime length.
    pub fn hash_class(&self) -> HashClass {
        match self.prime_len {
            n if n <= 32 => HashClass::Sha256,
            n if n <= 48 => HashClass::Sha384,
            _ => HashClass::Sha512,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaeKeys {
    pub kck: SecretBytes,
    pub pmk: SecretBytes,
    pub pmkid: [u8; PMKID_LEN],
}

/// Left-pads a big-endian integer to `len` octets.
fn to_fixed_be(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes[..]);
    out
}

/// Derives KCK, PMK and PMKID.
///
/// With `ext_key` (SAE-EXT-KEY AKMs) the hash and key lengths follow the group; otherwise they
/// are fixed to SHA-256 and 32 octets.
// IEEE Std 802.11-2020, 12.4.5.4
pub fn derive_keys(
    k: &[u8],
    own_scalar: &[u8],
    peer_scalar: &[u8],
    group_id: u16,
    ext_key: bool,
) -> Result<SaeKeys, Error> {
    let group = SaeGroup::from_id(group_id)?;
    require(k, "SAE shared secret")?;
    if k.len() != group.prime_len {
        return Err(Error::InvalidLength("SAE shared secret", k.len()));
    }
    for scalar in [own_scalar, peer_scalar] {
        if scalar.len() != group.order_len {
            return Err(Error::InvalidLength("SAE commit scalar", scalar.len()));
        }
    }

    let (class, key_len) = if ext_key {
        let class = group.hash_class();
        (class, class.output_len())
    } else {
        (HashClass::Sha256, LEGACY_KEY_LEN)
    };

    let zero_salt = vec![0u8; class.output_len()];
    let keyseed = Zeroizing::new(prf::hmac(class, &zero_salt[..], &[k])?);
    let sum = (BigUint::from_bytes_be(own_scalar) + BigUint::from_bytes_be(peer_scalar))
        % group.order();
    let context = to_fixed_be(&sum, group.order_len);

    let material =
        prf::kdf(class, &keyseed[..], SAE_KCK_AND_PMK, &context[..], 2 * key_len)?;
    let mut parts = prf::split(&material, &[key_len, key_len]).into_iter();
    let kck = parts.next().unwrap_or_default();
    let pmk = parts.next().unwrap_or_default();
    let mut pmkid = [0u8; PMKID_LEN];
    pmkid.copy_from_slice(&context[..PMKID_LEN]);
    Ok(SaeKeys { kck, pmk, pmkid })
}

/// CN(KCK, send-confirm, scalar, element, peer-scalar, peer-element). The verifier for a
/// received Confirm swaps own and peer values.
pub fn confirm(
    kck: &[u8],
    send_confirm: u16,
    scalar: &[u8],
    element: &[u8],
    peer_scalar: &[u8],
    peer_element: &[u8],
) -> Result<Vec<u8>, Error> {
    require(kck, "KCK")?;
    let class = HashClass::for_key_len(kck.len())?;
    prf::hmac(
        class,
        kck,
        &[&send_confirm.to_le_bytes()[..], scalar, element, peer_scalar, peer_element],
    )
}

/// Finds the password element for group 19 by hunting and pecking.
// IEEE Std 802.11-2020, 12.4.4.2.2
fn derive_pwe(
    password: &[u8],
    password_id: Option<&[u8]>,
    addr1: &MacAddr,
    addr2: &MacAddr,
) -> Result<AffinePoint, Error> {
    let (addr_lo, addr_hi) = min_max(&addr1[..], &addr2[..]);
    let addrs = [addr_hi, addr_lo].concat();
    let mut pwe = None;
    for counter in 1..=MAX_PWE_ROUNDS {
        if counter > MIN_PWE_ROUNDS && pwe.is_some() {
            break;
        }
        let seed = Zeroizing::new(prf::hmac(
            HashClass::Sha256,
            &addrs[..],
            &[password, password_id.unwrap_or(&[]), &[counter][..]],
        )?);
        let value = prf::kdf(
            HashClass::Sha256,
            &seed[..],
            SAE_HUNTING_AND_PECKING,
            &P256_PRIME[..],
            P256_LEN,
        )?;
        if value.as_bytes() >= &P256_PRIME[..] {
            continue;
        }
        // y takes the parity of the seed's last octet.
        let y_is_odd = Choice::from(seed[P256_LEN - 1] & 1);
        let candidate: Option<AffinePoint> =
            AffinePoint::decompress(FieldBytes::from_slice(value.as_bytes()), y_is_odd).into();
        if pwe.is_none() {
            pwe = candidate;
        }
    }
    pwe.ok_or(Error::SaePasswordElementNotFound)
}

/// Parses a group 19 scalar, which must lie in 1 < s < r.
fn parse_scalar(bytes: &[u8], what: &'static str) -> Result<Scalar, Error> {
    if bytes.len() != P256_LEN {
        return Err(Error::InvalidLength(what, bytes.len()));
    }
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(bytes)).into();
    match scalar {
        Some(scalar) if scalar != Scalar::ZERO && scalar != Scalar::ONE => Ok(scalar),
        _ => Err(Error::InvalidSaeCommit(what)),
    }
}

/// Parses an element as x || y and checks that it lies on the curve.
fn parse_element(bytes: &[u8]) -> Result<AffinePoint, Error> {
    if bytes.len() != 2 * P256_LEN {
        return Err(Error::InvalidLength("SAE commit element", bytes.len()));
    }
    let encoded = EncodedPoint::from_affine_coordinates(
        FieldBytes::from_slice(&bytes[..P256_LEN]),
        FieldBytes::from_slice(&bytes[P256_LEN..]),
        false,
    );
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(Error::InvalidSaeCommit("peer element"))
}

fn encode_element(point: &AffinePoint) -> Result<[u8; 2 * P256_LEN], Error> {
    let encoded = point.to_encoded_point(false);
    match (encoded.x(), encoded.y()) {
        (Some(x), Some(y)) => {
            let mut out = [0u8; 2 * P256_LEN];
            out[..P256_LEN].copy_from_slice(x);
            out[P256_LEN..].copy_from_slice(y);
            Ok(out)
        }
        _ => Err(Error::InvalidSaeCommit("element")),
    }
}

/// Own side of a group 19 commit exchange. Holds `rand` until the peer's Commit arrives.
#[derive(Clone)]
pub struct SaeCommit {
    pwe: AffinePoint,
    rand: SecretBytes,
    pub scalar: [u8; P256_LEN],
    pub element: [u8; 2 * P256_LEN],
    pub password_id: Option<Vec<u8>>,
}

impl fmt::Debug for SaeCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaeCommit")
            .field("scalar", &self.scalar)
            .field("element", &self.element)
            .field("password_id", &self.password_id)
            .finish_non_exhaustive()
    }
}

impl SaeCommit {
    /// Derives the password element and computes scalar = (rand + mask) mod r and
    /// element = -(mask * PWE). `rand` and `mask` must both lie in 1 < x < r.
    // IEEE Std 802.11-2020, 12.4.5.3
    pub fn new(
        password: &[u8],
        password_id: Option<&[u8]>,
        own_addr: &MacAddr,
        peer_addr: &MacAddr,
        rand: &[u8],
        mask: &[u8],
    ) -> Result<Self, Error> {
        require(password, "SAE password")?;
        if let Some(id) = password_id {
            if id.len() > MAX_PASSWORD_ID_LEN {
                return Err(Error::InvalidLength("SAE password identifier", id.len()));
            }
        }
        let rand_scalar = parse_scalar(rand, "rand")?;
        let mask_scalar = parse_scalar(mask, "mask")?;
        let pwe = derive_pwe(password, password_id, own_addr, peer_addr)?;

        let scalar = rand_scalar + mask_scalar;
        if scalar == Scalar::ZERO || scalar == Scalar::ONE {
            return Err(Error::InvalidSaeCommit("scalar"));
        }
        let element = (-(ProjectivePoint::from(pwe) * mask_scalar)).to_affine();

        let mut scalar_bytes = [0u8; P256_LEN];
        scalar_bytes.copy_from_slice(&scalar.to_repr()[..]);
        debug!("prepared SAE commit for group {}", COMMIT_GROUP);
        Ok(Self {
            pwe,
            rand: SecretBytes::copy_from(rand),
            scalar: scalar_bytes,
            element: encode_element(&element)?,
            password_id: password_id.map(<[u8]>::to_vec),
        })
    }

    /// Appends the Commit body: group, the optional anti-clogging `token`, scalar, element and
    /// the Password Identifier element if one was used.
    // IEEE Std 802.11-2020, 9.3.3.12
    pub fn write(&self, buf: &mut Vec<u8>, token: Option<&[u8]>) {
        buf.extend_from_slice(&COMMIT_GROUP.to_le_bytes()[..]);
        if let Some(token) = token {
            buf.extend_from_slice(token);
        }
        buf.extend_from_slice(&self.scalar[..]);
        buf.extend_from_slice(&self.element[..]);
        if let Some(id) = &self.password_id {
            let len = id.len() as u8 + 1;
            buf.extend_from_slice(&[Id::EXTENSION.0, len, ExtId::PASSWORD_IDENTIFIER.0]);
            buf.extend_from_slice(&id[..]);
        }
    }

    /// k = F(rand * (peer-scalar * PWE + peer-element)), then KCK, PMK and PMKID as in
    /// [`derive_keys`].
    // IEEE Std 802.11-2020, 12.4.5.4
    pub fn keys_from_peer(
        &self,
        peer_scalar: &[u8],
        peer_element: &[u8],
    ) -> Result<SaeKeys, Error> {
        let peer_scalar_value = parse_scalar(peer_scalar, "peer scalar")?;
        let peer_element_value = parse_element(peer_element)?;
        if peer_scalar == &self.scalar[..] && peer_element == &self.element[..] {
            return Err(Error::InvalidSaeCommit("reflected commit"));
        }
        let rand = parse_scalar(self.rand.as_bytes(), "rand")?;
        let shared = (ProjectivePoint::from(self.pwe) * peer_scalar_value
            + ProjectivePoint::from(peer_element_value))
            * rand;
        if shared == ProjectivePoint::IDENTITY {
            return Err(Error::InvalidSaeCommit("shared secret"));
        }
        let k = shared.to_affine().x();
        derive_keys(&k[..], &self.scalar[..], peer_scalar, COMMIT_GROUP, false)
    }
}

/// Fields of a received Commit body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitFields<'a> {
    pub group: u16,
    pub scalar: &'a [u8],
    pub element: &'a [u8],
    pub password_id: Option<&'a [u8]>,
}

/// Splits a Commit body that carries no anti-clogging token.
pub fn parse_commit(body: &[u8]) -> Result<CommitFields<'_>, Error> {
    if body.len() < 2 {
        return Err(Error::InvalidLength("SAE commit", body.len()));
    }
    let group_id = u16::from_le_bytes([body[0], body[1]]);
    let group = SaeGroup::from_id(group_id)?;
    if body.len() < 2 + group.order_len + 2 * group.prime_len {
        return Err(Error::InvalidLength("SAE commit", body.len()));
    }
    let (scalar, rest) = body[2..].split_at(group.order_len);
    let (element, rest) = rest.split_at(2 * group.prime_len);
    let password_id = match rest {
        [] => None,
        [id, len, ext_id, tail @ ..]
            if *id == Id::EXTENSION.0
                && *ext_id == ExtId::PASSWORD_IDENTIFIER.0
                && usize::from(*len) == tail.len() + 1 =>
        {
            Some(tail)
        }
        _ => return Err(Error::InvalidSaeCommit("trailing data")),
    };
    Ok(CommitFields { group: group_id, scalar, element, password_id })
}
