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

use std::fmt::{self, Debug, Formatter};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar as EdScalar;
use ed25519_dalek::SigningKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use secp256k1::{PublicKey as SecpPublicKey, SecretKey as SecpSecretKey, SECP256K1};
use zeroize::Zeroize;

use crate::Curve;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum KeyError {
    /// invalid key length {0} for curve {1}.
    InvalidLength(usize, Curve),

    /// secret scalar is zero or not below the curve group order.
    ScalarOutOfRange,

    /// byte string does not encode a valid curve point.
    InvalidPoint,

    /// point is of small order and cannot be used as a public key.
    LowOrderPoint,
}

/// A validated private key on one of the supported curves.
///
/// Construction guarantees the scalar lies in `[1, n-1]` for Weierstrass
/// curves. Raw Edwards buffers are zeroed on drop; the Weierstrass backends
/// manage their own secret hygiene.
#[derive(Clone)]
pub enum PrivateKey {
    Secp256k1(SecpSecretKey),
    Nist256p1(p256::SecretKey),
    Ed25519([u8; 32]),
    /// Cardano 64-byte extended secret (kL ‖ kR).
    Ed25519Extended(Box<[u8; 64]>),
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        match self {
            PrivateKey::Ed25519(bytes) => bytes.zeroize(),
            PrivateKey::Ed25519Extended(bytes) => bytes.zeroize(),
            // secp256k1 and p256 secret types handle their own memory
            _ => {}
        }
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("curve", &self.curve()).finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.curve() == other.curve()
            && self.is_extended() == other.is_extended()
            && self.secret_bytes() == other.secret_bytes()
    }
}

impl Eq for PrivateKey {}

impl PrivateKey {
    /// Constructs a private key from raw scalar bytes, validating length and
    /// scalar range.
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<PrivateKey, KeyError> {
        if bytes.len() != curve.scalar_len() {
            return Err(KeyError::InvalidLength(bytes.len(), curve));
        }
        match curve {
            Curve::Secp256k1 => SecpSecretKey::from_slice(bytes)
                .map(PrivateKey::Secp256k1)
                .map_err(|_| KeyError::ScalarOutOfRange),
            Curve::Nist256p1 => p256::SecretKey::from_slice(bytes)
                .map(PrivateKey::Nist256p1)
                .map_err(|_| KeyError::ScalarOutOfRange),
            Curve::Ed25519 => {
                let mut buf = [0u8; 32];
                buf.copy_from_slice(bytes);
                Ok(PrivateKey::Ed25519(buf))
            }
        }
    }

    /// Constructs a Cardano extended ed25519 private key from 64 bytes of
    /// kL ‖ kR material.
    pub fn ed25519_extended(bytes: &[u8]) -> Result<PrivateKey, KeyError> {
        if bytes.len() != 64 {
            return Err(KeyError::InvalidLength(bytes.len(), Curve::Ed25519));
        }
        let mut buf = Box::new([0u8; 64]);
        buf.copy_from_slice(bytes);
        Ok(PrivateKey::Ed25519Extended(buf))
    }

    pub fn curve(&self) -> Curve {
        match self {
            PrivateKey::Secp256k1(_) => Curve::Secp256k1,
            PrivateKey::Nist256p1(_) => Curve::Nist256p1,
            PrivateKey::Ed25519(_) | PrivateKey::Ed25519Extended(_) => Curve::Ed25519,
        }
    }

    pub fn is_extended(&self) -> bool { matches!(self, PrivateKey::Ed25519Extended(_)) }

    /// Raw scalar bytes (64 bytes for extended ed25519 secrets).
    pub fn secret_bytes(&self) -> Vec<u8> {
        match self {
            PrivateKey::Secp256k1(sk) => sk.secret_bytes().to_vec(),
            PrivateKey::Nist256p1(sk) => sk.to_bytes().to_vec(),
            PrivateKey::Ed25519(bytes) => bytes.to_vec(),
            PrivateKey::Ed25519Extended(bytes) => bytes.to_vec(),
        }
    }

    /// Computes the public key. Deterministic.
    pub fn to_public(&self) -> PublicKey {
        match self {
            PrivateKey::Secp256k1(sk) => {
                PublicKey::Secp256k1(SecpPublicKey::from_secret_key(SECP256K1, sk))
            }
            PrivateKey::Nist256p1(sk) => PublicKey::Nist256p1(sk.public_key()),
            PrivateKey::Ed25519(bytes) => {
                let vk = SigningKey::from_bytes(bytes).verifying_key();
                PublicKey::Ed25519(CompressedEdwardsY(vk.to_bytes()))
            }
            PrivateKey::Ed25519Extended(bytes) => {
                let mut kl = [0u8; 32];
                kl.copy_from_slice(&bytes[..32]);
                let point = EdwardsPoint::mul_base(&EdScalar::from_bytes_mod_order(kl));
                kl.zeroize();
                PublicKey::Ed25519(point.compress())
            }
        }
    }
}

/// A validated public key on one of the supported curves.
///
/// Construction guarantees the point is on curve and not the identity;
/// Edwards points of small order are rejected.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PublicKey {
    Secp256k1(SecpPublicKey),
    Nist256p1(p256::PublicKey),
    Ed25519(CompressedEdwardsY),
}

impl PublicKey {
    /// Parses a public key from compressed or uncompressed SEC1 bytes
    /// (Weierstrass curves) or a 32-byte compressed Edwards point.
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<PublicKey, KeyError> {
        if bytes.len() != curve.compressed_len() && bytes.len() != curve.uncompressed_len() {
            return Err(KeyError::InvalidLength(bytes.len(), curve));
        }
        match curve {
            Curve::Secp256k1 => SecpPublicKey::from_slice(bytes)
                .map(PublicKey::Secp256k1)
                .map_err(|_| KeyError::InvalidPoint),
            Curve::Nist256p1 => p256::PublicKey::from_sec1_bytes(bytes)
                .map(PublicKey::Nist256p1)
                .map_err(|_| KeyError::InvalidPoint),
            Curve::Ed25519 => {
                let mut buf = [0u8; 32];
                buf.copy_from_slice(bytes);
                let compressed = CompressedEdwardsY(buf);
                let point = compressed.decompress().ok_or(KeyError::InvalidPoint)?;
                if point.is_small_order() {
                    return Err(KeyError::LowOrderPoint);
                }
                Ok(PublicKey::Ed25519(compressed))
            }
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            PublicKey::Secp256k1(_) => Curve::Secp256k1,
            PublicKey::Nist256p1(_) => Curve::Nist256p1,
            PublicKey::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// Compressed point serialization: 33 bytes for Weierstrass curves,
    /// 32 bytes for ed25519.
    pub fn compressed(&self) -> Vec<u8> {
        match self {
            PublicKey::Secp256k1(pk) => pk.serialize().to_vec(),
            PublicKey::Nist256p1(pk) => pk.to_encoded_point(true).as_bytes().to_vec(),
            PublicKey::Ed25519(pk) => pk.to_bytes().to_vec(),
        }
    }

    /// Uncompressed SEC1 serialization for Weierstrass curves; Edwards points
    /// have a single 32-byte form.
    pub fn uncompressed(&self) -> Vec<u8> {
        match self {
            PublicKey::Secp256k1(pk) => pk.serialize_uncompressed().to_vec(),
            PublicKey::Nist256p1(pk) => pk.to_encoded_point(false).as_bytes().to_vec(),
            PublicKey::Ed25519(pk) => pk.to_bytes().to_vec(),
        }
    }

    /// 33-byte serialization used inside extended-key payloads and for
    /// fingerprinting: the compressed point for Weierstrass curves, a
    /// zero-prefixed point for ed25519.
    pub(crate) fn key_slot(&self) -> [u8; 33] {
        let mut slot = [0u8; 33];
        match self {
            PublicKey::Secp256k1(pk) => slot.copy_from_slice(&pk.serialize()),
            PublicKey::Nist256p1(pk) => {
                slot.copy_from_slice(pk.to_encoded_point(true).as_bytes())
            }
            PublicKey::Ed25519(pk) => slot[1..].copy_from_slice(&pk.to_bytes()),
        }
        slot
    }
}
