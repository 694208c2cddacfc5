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

/// Elliptic curves backing key material.
///
/// The set is closed: all dispatch over curves is exhaustively checked at
/// compile time.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
pub enum Curve {
    /// Bitcoin, EVM chains, Tron, Cosmos and the rest of the Koblitz family.
    #[display("secp256k1")]
    Secp256k1,

    /// NIST P-256 (secp256r1), used by NEO, Flow, Ontology.
    #[display("nist256p1")]
    Nist256p1,

    /// Twisted Edwards curve 25519 (Solana, Aptos, Monero, Cardano).
    #[display("ed25519")]
    Ed25519,
}

impl Curve {
    /// Byte length of a scalar (private key) on the curve.
    pub const fn scalar_len(self) -> usize { 32 }

    /// Byte length of a compressed point serialization.
    pub const fn compressed_len(self) -> usize {
        match self {
            Curve::Secp256k1 | Curve::Nist256p1 => 33,
            Curve::Ed25519 => 32,
        }
    }

    /// Byte length of an uncompressed point serialization. Edwards points have
    /// a single 32-byte serialization form.
    pub const fn uncompressed_len(self) -> usize {
        match self {
            Curve::Secp256k1 | Curve::Nist256p1 => 65,
            Curve::Ed25519 => 32,
        }
    }
}

/// Hierarchical derivation schemes supported by the [`crate::Xpriv`] /
/// [`crate::Xpub`] engine.
///
/// A scheme fixes the backing curve, the HMAC construction used for master and
/// child key material and whether public (soft) derivation is available.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display)]
pub enum DerivationScheme {
    /// BIP-32 over secp256k1.
    #[display("secp256k1")]
    Secp256k1,

    /// SLIP-0010 over NIST P-256.
    #[display("nist256p1")]
    Nist256p1,

    /// SLIP-0010 over ed25519. Hardened-only; no public derivation.
    #[display("ed25519")]
    Ed25519Slip10,

    /// Cardano extended ed25519 (Kholaw), 64-byte extended private keys with
    /// little-endian index serialization and carry-propagating scalar adds.
    #[display("ed25519-kholaw")]
    Ed25519Kholaw,

    /// Cardano Byron legacy variant of the Kholaw scheme: big-endian index
    /// serialization and the legacy add arithmetic.
    #[display("byron-legacy")]
    ByronLegacy,
}

impl DerivationScheme {
    /// The curve the scheme derives keys on.
    pub const fn curve(self) -> Curve {
        match self {
            DerivationScheme::Secp256k1 => Curve::Secp256k1,
            DerivationScheme::Nist256p1 => Curve::Nist256p1,
            DerivationScheme::Ed25519Slip10
            | DerivationScheme::Ed25519Kholaw
            | DerivationScheme::ByronLegacy => Curve::Ed25519,
        }
    }

    /// Whether the scheme can derive child public keys without access to the
    /// private key (soft derivation).
    pub const fn supports_public_derivation(self) -> bool {
        !matches!(self, DerivationScheme::Ed25519Slip10)
    }

    /// Whether private keys of the scheme are 64-byte extended secrets rather
    /// than single scalars.
    pub const fn uses_extended_secrets(self) -> bool {
        matches!(self, DerivationScheme::Ed25519Kholaw | DerivationScheme::ByronLegacy)
    }

    /// HMAC-SHA512 domain separation key used for master key generation.
    pub(crate) const fn domain_key(self) -> &'static [u8] {
        match self {
            DerivationScheme::Secp256k1 => b"Bitcoin seed",
            DerivationScheme::Nist256p1 => b"Nist256p1 seed",
            DerivationScheme::Ed25519Slip10
            | DerivationScheme::Ed25519Kholaw
            // Byron legacy keys the HMAC with the seed itself; the constant is
            // unused on that path.
            | DerivationScheme::ByronLegacy => b"ed25519 seed",
        }
    }
}
