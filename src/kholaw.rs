// Modern, minimalistic & standard-compliant multi-chain wallet library.
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2020-2024 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2020-2024 LNP/BP Standards Association. All rights reserved.
// Copyright (C) 2020-2024 Dr Maxim Orlovsky. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cardano extended ed25519 derivation.
//!
//! Private keys are 64-byte extended secrets (kL ‖ kR) accompanied by a chain
//! code. Two index serializations and two add arithmetics exist: the current
//! scheme (Kholaw; little-endian indexes, carry-propagating adds) and the
//! Byron legacy scheme (big-endian indexes, legacy adds). Child derivation
//! computes `kL' = kL + 8·trunc28(zL)` and `kR' = kR + zR` with the chain
//! code taken from a second, differently-tagged HMAC.

use bitcoin_hashes::{sha512, Hash};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use zeroize::Zeroize;

use crate::slip10::hmac_sha512;
use crate::xkey::{ChainCode, DerivationError};
use crate::{DerivationIndex, DerivationScheme, Idx, IdxBase};

fn serialize_index(index: DerivationIndex, scheme: DerivationScheme) -> [u8; 4] {
    match scheme {
        DerivationScheme::ByronLegacy => index.to_be_bytes(),
        _ => index.index().to_le_bytes(),
    }
}

/// Clamps a 32-byte secret into a 64-byte extended ed25519 key:
/// SHA-512 expansion with bits 0..2 of byte 0 cleared and bit 6 of byte 31
/// set (bit 7 cleared).
fn extend_secret(secret: &[u8]) -> [u8; 64] {
    let mut extended = sha512::Hash::hash(secret).to_byte_array();
    extended[0] &= 248;
    extended[31] &= 63;
    extended[31] |= 64;
    extended
}

/// Master key generation. Both schemes loop until bit 5 of the last byte of
/// the extended secret is clear; they differ in how the HMAC material is
/// produced from the seed.
pub(crate) fn master(scheme: DerivationScheme, seed: &[u8]) -> (Box<[u8; 64]>, ChainCode) {
    match scheme {
        DerivationScheme::Ed25519Kholaw => {
            let mut i = hmac_sha512(scheme.domain_key(), &[seed]);
            loop {
                let extended = extend_secret(&i[..32]);
                if extended[31] & 0x20 == 0 {
                    let mut cc = [0u8; 32];
                    cc.copy_from_slice(&i[32..]);
                    i.zeroize();
                    return (Box::new(extended), ChainCode::from(cc));
                }
                i = hmac_sha512(scheme.domain_key(), &[&i]);
            }
        }
        DerivationScheme::ByronLegacy => {
            // the seed keys the HMAC; the message is an incrementing label
            let mut iter = 1u32;
            loop {
                let label = format!("Root Seed Chain {iter}");
                let mut block = hmac_sha512(seed, &[label.as_bytes()]);
                let extended = extend_secret(&block[..32]);
                if extended[31] & 0x20 == 0 {
                    let mut cc = [0u8; 32];
                    cc.copy_from_slice(&block[32..]);
                    block.zeroize();
                    return (Box::new(extended), ChainCode::from(cc));
                }
                block.zeroize();
                iter += 1;
            }
        }
        _ => unreachable!("scheme dispatch is exhaustive in the engine"),
    }
}

/// `x + y` over 256-bit little-endian integers with carry propagation.
fn add_256bits_v2(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut carry: u16 = 0;
    let mut out = [0u8; 32];
    for i in 0..32 {
        let r = x[i] as u16 + y[i] as u16 + carry;
        out[i] = r as u8;
        carry = r >> 8;
    }
    out
}

/// Byron legacy add: byte-wise, carries discarded.
fn add_256bits_v1(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = x[i].wrapping_add(y[i]);
    }
    out
}

fn add_256bits(x: &[u8], y: &[u8], scheme: DerivationScheme) -> [u8; 32] {
    match scheme {
        DerivationScheme::ByronLegacy => add_256bits_v1(x, y),
        _ => add_256bits_v2(x, y),
    }
}

/// `x + 8·trunc28(y)` with full carry propagation over the low 28 bytes.
fn add_28_mul8_v2(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut carry: u16 = 0;
    let mut out = [0u8; 32];
    for i in 0..28 {
        let r = x[i] as u16 + ((y[i] as u16) << 3) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    for i in 28..32 {
        let r = x[i] as u16 + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

/// Byron legacy variant: the shifted term is masked byte-wise and the sum is
/// taken in the base field (mod 2^255 − 19), reproducing the historical
/// scheme bit for bit.
fn add_28_mul8_v1(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut acc = 0u8;
    let mut shifted = [0u8; 32];
    for i in 0..32 {
        shifted[i] = ((y[i] << 3) + acc) & 0x8;
        acc = y[i] >> 5;
    }
    fe_add(x, &shifted)
}

/// Addition modulo 2^255 − 19 over little-endian byte strings; the top bit of
/// each input is ignored, as in the historical field-element codec.
fn fe_add(x: &[u8], y: &[u8]) -> [u8; 32] {
    // p = 2^255 - 19, little-endian
    const P: [u8; 32] = [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ];
    fn ge(a: &[u8; 32], b: &[u8; 32]) -> bool {
        for i in (0..32).rev() {
            if a[i] != b[i] {
                return a[i] > b[i];
            }
        }
        true
    }

    let mut sum = [0u8; 32];
    let mut carry: u16 = 0;
    for i in 0..32 {
        let (mut a, mut b) = (x[i] as u16, y[i] as u16);
        if i == 31 {
            a &= 0x7f;
            b &= 0x7f;
        }
        let r = a + b + carry;
        sum[i] = r as u8;
        carry = r >> 8;
    }
    // both inputs are below 2^255, so the sum fits 256 bits and at most two
    // subtractions of p are needed
    for _ in 0..2 {
        if !ge(&sum, &P) {
            break;
        }
        let mut borrow: i16 = 0;
        for i in 0..32 {
            let r = sum[i] as i16 - P[i] as i16 - borrow;
            sum[i] = (r & 0xff) as u8;
            borrow = i16::from(r < 0);
        }
    }
    sum
}

fn add_28_mul8(x: &[u8], y: &[u8], scheme: DerivationScheme) -> [u8; 32] {
    match scheme {
        DerivationScheme::ByronLegacy => add_28_mul8_v1(x, y),
        _ => add_28_mul8_v2(x, y),
    }
}

/// Public key of a 64-byte extended secret: the base point multiplied by kL.
pub(crate) fn public_of(xprv: &[u8; 64]) -> CompressedEdwardsY {
    let mut kl = [0u8; 32];
    kl.copy_from_slice(&xprv[..32]);
    let point = EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(kl));
    kl.zeroize();
    point.compress()
}

/// Private child derivation. Hardened children mix in the full extended
/// secret (tags 0x00/0x01), soft children the public point (tags 0x02/0x03);
/// the chain code always comes from the second HMAC.
pub(crate) fn ckd_priv(
    scheme: DerivationScheme,
    xprv: &[u8; 64],
    chain: &ChainCode,
    index: DerivationIndex,
) -> (Box<[u8; 64]>, ChainCode) {
    let seri = serialize_index(index, scheme);
    let (mut z, mut i) = if index.is_hardened() {
        (
            hmac_sha512(chain.as_ref(), &[&[0x00], xprv, &seri]),
            hmac_sha512(chain.as_ref(), &[&[0x01], xprv, &seri]),
        )
    } else {
        let pk = public_of(xprv).to_bytes();
        (
            hmac_sha512(chain.as_ref(), &[&[0x02], &pk, &seri]),
            hmac_sha512(chain.as_ref(), &[&[0x03], &pk, &seri]),
        )
    };

    let left = add_28_mul8(&xprv[..32], &z[..32], scheme);
    let right = add_256bits(&xprv[32..], &z[32..], scheme);

    let mut child = Box::new([0u8; 64]);
    child[..32].copy_from_slice(&left);
    child[32..].copy_from_slice(&right);

    let mut cc = [0u8; 32];
    cc.copy_from_slice(&i[32..]);

    z.zeroize();
    i.zeroize();
    (child, ChainCode::from(cc))
}

/// Public (soft) child derivation: the parent point plus the base point
/// multiplied by `8·trunc28(zL)`.
pub(crate) fn ckd_pub(
    scheme: DerivationScheme,
    parent: &CompressedEdwardsY,
    chain: &ChainCode,
    index: DerivationIndex,
) -> Result<(CompressedEdwardsY, ChainCode), DerivationError> {
    let seri = serialize_index(index, scheme);
    let pk = parent.to_bytes();
    let z = hmac_sha512(chain.as_ref(), &[&[0x02], &pk, &seri]);
    let i = hmac_sha512(chain.as_ref(), &[&[0x03], &pk, &seri]);

    let tweak = add_28_mul8(&[0u8; 32], &z[..32], scheme);
    let tweak_point = EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(tweak));
    let parent_point = parent.decompress().ok_or(DerivationError::InvalidChildPoint)?;
    let child = (parent_point + tweak_point).compress();

    let mut cc = [0u8; 32];
    cc.copy_from_slice(&i[32..]);
    Ok((child, ChainCode::from(cc)))
}
