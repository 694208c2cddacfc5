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

//! Extended keys and the hierarchical derivation engine.
//!
//! [`Xpriv`] and [`Xpub`] are polymorphic over the closed set of
//! [`DerivationScheme`]s. Extended keys serialize as Base58Check over a
//! 78-byte payload (4-byte version ‖ depth ‖ parent fingerprint ‖ child
//! number ‖ chain code ‖ 33-byte key slot); Cardano extended private keys
//! occupy a 110-byte payload since their secrets are 64 bytes.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use amplify::{Bytes20, Bytes32, Bytes4, Wrapper};
use bitcoin_hashes::{hash160, Hash};

use crate::{
    base58, kholaw, slip10, Curve, DerivationIndex, DerivationScheme, IdxBase, KeyError,
    PrivateKey, PublicKey,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum DerivationError {
    /// hardened derivation requires a private key.
    HardenedDerivationFromPublic,

    /// {0} scheme does not support public child derivation.
    PublicDerivationUnsupported(DerivationScheme),

    /// {0} scheme supports only hardened child derivation.
    SoftDerivationUnsupported(DerivationScheme),

    /// no valid child key left in the derivation index space.
    IndexSpaceExhausted,

    /// maximum derivation depth (255) exceeded.
    MaxDepthExceeded,

    /// derived child public key is not a valid curve point.
    InvalidChildPoint,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum XkeyDecodeError {
    /// wrong length of extended key data ({0}).
    WrongExtendedKeyLength(usize),

    /// extended key version bytes do not match the expected chain versions.
    VersionMismatch([u8; 4]),

    /// xpriv contains invalid byte for the secret key type ({0:#04x}) which must be set to zero.
    InvalidType(u8),

    /// extended key contains an invalid secret scalar.
    InvalidSecretKey,

    /// extended key contains an invalid public key: {0}
    #[from]
    InvalidKey(KeyError),

    /// extended key at depth zero must have zero parent fingerprint and child number.
    InvalidMaster,
}

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
pub enum XkeyParseError {
    /// wrong Base58 encoding of extended key data - {0}
    #[display(doc_comments)]
    #[from]
    Base58(base58::Error),

    #[display(inner)]
    #[from]
    Decode(XkeyDecodeError),
}

/// BIP32 chain code used for hierarchical derivation
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From)]
#[wrapper(Deref, RangeOps)]
pub struct ChainCode(Bytes32);

impl AsRef<[u8]> for ChainCode {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}

impl From<[u8; 32]> for ChainCode {
    fn from(value: [u8; 32]) -> Self { Self(value.into()) }
}

impl From<ChainCode> for [u8; 32] {
    fn from(value: ChainCode) -> Self { value.0.into_inner() }
}

/// First four bytes of HASH160 of the serialized public key slot; identifies
/// the parent of an extended key.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, Display, From)]
#[wrapper(RangeOps, Hex, FromStr)]
#[display(LowerHex)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct XpubFp(
    #[from]
    #[from([u8; 4])]
    Bytes4,
);

impl AsRef<[u8]> for XpubFp {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}

impl From<XpubFp> for [u8; 4] {
    fn from(value: XpubFp) -> Self { value.0.into_inner() }
}

impl XpubFp {
    pub const fn master() -> Self { Self(Bytes4::zero()) }
}

/// Full HASH160 of the serialized public key slot.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, Display, From)]
#[wrapper(RangeOps, Hex, FromStr)]
#[display(LowerHex)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct XpubId(
    #[from]
    #[from([u8; 20])]
    Bytes20,
);

impl AsRef<[u8]> for XpubId {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}

impl From<XpubId> for [u8; 20] {
    fn from(value: XpubId) -> Self { value.0.into_inner() }
}

/// Chain-specific 4-byte version prefixes for extended private and public key
/// serialization.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct XkeyVersions {
    pub xprv: [u8; 4],
    pub xpub: [u8; 4],
}

impl XkeyVersions {
    /// `xprv`/`xpub` prefixes.
    pub const BITCOIN_MAINNET: Self = XkeyVersions {
        xprv: [0x04, 0x88, 0xAD, 0xE4],
        xpub: [0x04, 0x88, 0xB2, 0x1E],
    };
    /// `tprv`/`tpub` prefixes.
    pub const BITCOIN_TESTNET: Self = XkeyVersions {
        xprv: [0x04, 0x35, 0x83, 0x94],
        xpub: [0x04, 0x35, 0x87, 0xCF],
    };

    pub const fn new(xprv: [u8; 4], xpub: [u8; 4]) -> Self { XkeyVersions { xprv, xpub } }
}

/// Metadata tying an extended key into its place within the hierarchy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct XkeyMeta {
    pub depth: u8,
    pub parent_fp: XpubFp,
    pub child_number: DerivationIndex,
}

impl XkeyMeta {
    const MASTER: Self = XkeyMeta {
        depth: 0,
        parent_fp: XpubFp::master(),
        child_number: DerivationIndex::ZERO,
    };

    fn validate(&self) -> Result<(), XkeyDecodeError> {
        if self.depth == 0
            && (self.parent_fp != XpubFp::master() || self.child_number != DerivationIndex::ZERO)
        {
            return Err(XkeyDecodeError::InvalidMaster);
        }
        Ok(())
    }

    fn child(&self, child_number: DerivationIndex, parent_fp: XpubFp) -> XkeyMeta {
        XkeyMeta {
            depth: self.depth + 1,
            parent_fp,
            child_number,
        }
    }
}

/// Deterministic part of the extended public key.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct XpubCore {
    /// Public key
    pub public_key: PublicKey,
    /// BIP32 chain code used for hierarchical derivation
    pub chain_code: ChainCode,
}

/// Deterministic part of the extended private key.
#[derive(Clone, Eq, PartialEq)]
pub struct XprivCore {
    /// Secret key material
    pub private_key: PrivateKey,
    /// BIP32 chain code used for hierarchical derivation
    pub chain_code: ChainCode,
}

impl fmt::Debug for XprivCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("XprivCore").field("private_key", &self.private_key).finish_non_exhaustive()
    }
}

fn header(versions: [u8; 4], meta: &XkeyMeta, chain_code: &ChainCode) -> [u8; 45] {
    let mut ret = [0u8; 45];
    ret[0..4].copy_from_slice(&versions);
    ret[4] = meta.depth;
    ret[5..9].copy_from_slice(meta.parent_fp.as_ref());
    ret[9..13].copy_from_slice(&meta.child_number.index().to_be_bytes());
    ret[13..45].copy_from_slice(chain_code.as_ref());
    ret
}

fn parse_header(data: &[u8]) -> (XkeyMeta, ChainCode) {
    let mut parent_fp = [0u8; 4];
    parent_fp.copy_from_slice(&data[5..9]);

    let mut child_number = [0u8; 4];
    child_number.copy_from_slice(&data[9..13]);

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);

    let meta = XkeyMeta {
        depth: data[4],
        parent_fp: parent_fp.into(),
        child_number: DerivationIndex::from_index(u32::from_be_bytes(child_number)),
    };
    (meta, chain_code.into())
}

/// An extended public key: public point plus chain code, tagged with its
/// derivation scheme and serialization versions.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Xpub {
    scheme: DerivationScheme,
    versions: XkeyVersions,
    meta: XkeyMeta,
    core: XpubCore,
}

impl Xpub {
    pub fn decode(
        data: impl Borrow<[u8]>,
        scheme: DerivationScheme,
        versions: XkeyVersions,
    ) -> Result<Xpub, XkeyDecodeError> {
        let data = data.borrow();

        if data.len() != 78 {
            return Err(XkeyDecodeError::WrongExtendedKeyLength(data.len()));
        }

        if data[0..4] != versions.xpub {
            let mut found = [0u8; 4];
            found.copy_from_slice(&data[0..4]);
            return Err(XkeyDecodeError::VersionMismatch(found));
        }

        let (meta, chain_code) = parse_header(data);
        meta.validate()?;

        let public_key = match scheme.curve() {
            Curve::Ed25519 => {
                if data[45] != 0x00 {
                    return Err(XkeyDecodeError::InvalidType(data[45]));
                }
                PublicKey::from_bytes(Curve::Ed25519, &data[46..78])?
            }
            curve => PublicKey::from_bytes(curve, &data[45..78])?,
        };

        Ok(Xpub {
            scheme,
            versions,
            meta,
            core: XpubCore {
                public_key,
                chain_code,
            },
        })
    }

    pub fn encode(&self) -> [u8; 78] {
        let mut ret = [0u8; 78];
        ret[0..45].copy_from_slice(&header(self.versions.xpub, &self.meta, &self.core.chain_code));
        ret[45..78].copy_from_slice(&self.core.public_key.key_slot());
        ret
    }

    pub fn scheme(&self) -> DerivationScheme { self.scheme }

    pub fn versions(&self) -> XkeyVersions { self.versions }

    pub fn depth(&self) -> u8 { self.meta.depth }

    pub fn child_number(&self) -> DerivationIndex { self.meta.child_number }

    pub fn parent_fp(&self) -> XpubFp { self.meta.parent_fp }

    pub fn public_key(&self) -> &PublicKey { &self.core.public_key }

    pub fn chain_code(&self) -> ChainCode { self.core.chain_code }

    /// Returns the HASH160 of the serialized public key slot.
    pub fn identifier(&self) -> XpubId {
        let hash = hash160::Hash::hash(&self.core.public_key.key_slot());
        XpubId::from(hash.to_byte_array())
    }

    pub fn fingerprint(&self) -> XpubFp {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&AsRef::<[u8]>::as_ref(&self.identifier())[..4]);
        XpubFp::from(bytes)
    }

    /// Attempts to derive an extended public key from a path of unhardened
    /// indexes.
    pub fn derive_pub(
        &self,
        path: impl AsRef<[DerivationIndex]>,
    ) -> Result<Xpub, DerivationError> {
        let mut pk = *self;
        for idx in path.as_ref() {
            pk = pk.ckd_pub(*idx)?;
        }
        Ok(pk)
    }

    /// Public->Public child key derivation. Fails on hardened indexes and on
    /// schemes without public derivation support.
    pub fn ckd_pub(
        &self,
        child_no: impl Into<DerivationIndex>,
    ) -> Result<Xpub, DerivationError> {
        let idx = child_no.into();
        if idx.is_hardened() {
            return Err(DerivationError::HardenedDerivationFromPublic);
        }
        if !self.scheme.supports_public_derivation() {
            return Err(DerivationError::PublicDerivationUnsupported(self.scheme));
        }
        if self.meta.depth == u8::MAX {
            return Err(DerivationError::MaxDepthExceeded);
        }

        let (public_key, chain_code, used) = match self.scheme {
            DerivationScheme::Secp256k1 | DerivationScheme::Nist256p1 => {
                slip10::ckd_pub_weierstrass(
                    self.scheme,
                    &self.core.public_key,
                    &self.core.chain_code,
                    idx,
                )?
            }
            DerivationScheme::Ed25519Kholaw | DerivationScheme::ByronLegacy => {
                let PublicKey::Ed25519(point) = &self.core.public_key else {
                    unreachable!("scheme and key curve are kept in sync")
                };
                let (child, cc) =
                    kholaw::ckd_pub(self.scheme, point, &self.core.chain_code, idx)?;
                (PublicKey::Ed25519(child), cc, idx)
            }
            DerivationScheme::Ed25519Slip10 => {
                unreachable!("public derivation support checked above")
            }
        };

        Ok(Xpub {
            scheme: self.scheme,
            versions: self.versions,
            meta: self.meta.child(used, self.fingerprint()),
            core: XpubCore {
                public_key,
                chain_code,
            },
        })
    }
}

impl Display for Xpub {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        base58::encode_check_to_fmt(f, &self.encode())
    }
}

impl FromStr for Xpub {
    type Err = XkeyParseError;

    fn from_str(inp: &str) -> Result<Xpub, XkeyParseError> {
        let data = base58::decode_check(inp)?;
        Xpub::decode(&data[..], DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET)
            .or_else(|err| match err {
                XkeyDecodeError::VersionMismatch(_) => Xpub::decode(
                    &data[..],
                    DerivationScheme::Secp256k1,
                    XkeyVersions::BITCOIN_TESTNET,
                ),
                other => Err(other),
            })
            .map_err(XkeyParseError::from)
    }
}

/// An extended private key.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Xpriv {
    scheme: DerivationScheme,
    versions: XkeyVersions,
    meta: XkeyMeta,
    core: XprivCore,
}

impl Xpriv {
    /// Generates the master key of a hierarchy from a seed.
    ///
    /// Degenerate HMAC outputs are skipped by the per-scheme retry loops, so
    /// generation succeeds for every seed.
    pub fn new_master(scheme: DerivationScheme, versions: XkeyVersions, seed: &[u8]) -> Xpriv {
        let (private_key, chain_code) = match scheme {
            DerivationScheme::Secp256k1 | DerivationScheme::Nist256p1 => {
                slip10::master_weierstrass(scheme, seed)
            }
            DerivationScheme::Ed25519Slip10 => slip10::master_ed25519(seed),
            DerivationScheme::Ed25519Kholaw | DerivationScheme::ByronLegacy => {
                let (key, cc) = kholaw::master(scheme, seed);
                (PrivateKey::Ed25519Extended(key), cc)
            }
        };
        Xpriv {
            scheme,
            versions,
            meta: XkeyMeta::MASTER,
            core: XprivCore {
                private_key,
                chain_code,
            },
        }
    }

    pub fn decode(
        data: impl Borrow<[u8]>,
        scheme: DerivationScheme,
        versions: XkeyVersions,
    ) -> Result<Xpriv, XkeyDecodeError> {
        let data = data.borrow();

        let expected_len = if scheme.uses_extended_secrets() { 110 } else { 78 };
        if data.len() != expected_len {
            return Err(XkeyDecodeError::WrongExtendedKeyLength(data.len()));
        }

        if data[0..4] != versions.xprv {
            let mut found = [0u8; 4];
            found.copy_from_slice(&data[0..4]);
            return Err(XkeyDecodeError::VersionMismatch(found));
        }

        let (meta, chain_code) = parse_header(data);
        meta.validate()?;

        if data[45] != 0x00 {
            return Err(XkeyDecodeError::InvalidType(data[45]));
        }
        let private_key = if scheme.uses_extended_secrets() {
            PrivateKey::ed25519_extended(&data[46..110])
                .map_err(|_| XkeyDecodeError::InvalidSecretKey)?
        } else {
            PrivateKey::from_bytes(scheme.curve(), &data[46..78])
                .map_err(|_| XkeyDecodeError::InvalidSecretKey)?
        };

        Ok(Xpriv {
            scheme,
            versions,
            meta,
            core: XprivCore {
                private_key,
                chain_code,
            },
        })
    }

    /// Serializes the key into its binary form: 78 bytes for single-scalar
    /// schemes, 110 bytes for Cardano extended secrets.
    pub fn encode(&self) -> Vec<u8> {
        let secret = self.core.private_key.secret_bytes();
        let mut ret = Vec::with_capacity(46 + secret.len());
        ret.extend_from_slice(&header(self.versions.xprv, &self.meta, &self.core.chain_code));
        ret.push(0x00);
        ret.extend_from_slice(&secret);
        ret
    }

    pub fn scheme(&self) -> DerivationScheme { self.scheme }

    pub fn versions(&self) -> XkeyVersions { self.versions }

    pub fn depth(&self) -> u8 { self.meta.depth }

    pub fn child_number(&self) -> DerivationIndex { self.meta.child_number }

    pub fn parent_fp(&self) -> XpubFp { self.meta.parent_fp }

    pub fn private_key(&self) -> &PrivateKey { &self.core.private_key }

    pub fn chain_code(&self) -> ChainCode { self.core.chain_code }

    pub fn to_xpub(&self) -> Xpub {
        Xpub {
            scheme: self.scheme,
            versions: self.versions,
            meta: self.meta,
            core: XpubCore {
                public_key: self.core.private_key.to_public(),
                chain_code: self.core.chain_code,
            },
        }
    }

    pub fn identifier(&self) -> XpubId { self.to_xpub().identifier() }

    pub fn fingerprint(&self) -> XpubFp { self.to_xpub().fingerprint() }

    /// Attempts to derive an extended private key from a path.
    pub fn derive_priv(
        &self,
        path: impl AsRef<[DerivationIndex]>,
    ) -> Result<Xpriv, DerivationError> {
        let mut xpriv = self.clone();
        for idx in path.as_ref() {
            xpriv = xpriv.ckd_priv(*idx)?;
        }
        Ok(xpriv)
    }

    /// Private->Private child key derivation.
    ///
    /// Degenerate HMAC outputs advance to the next index of the same
    /// hardness; the child records the index actually used.
    pub fn ckd_priv(
        &self,
        child_no: impl Into<DerivationIndex>,
    ) -> Result<Xpriv, DerivationError> {
        let idx = child_no.into();
        if self.meta.depth == u8::MAX {
            return Err(DerivationError::MaxDepthExceeded);
        }

        let (private_key, chain_code, used) = match self.scheme {
            DerivationScheme::Secp256k1 | DerivationScheme::Nist256p1 => {
                slip10::ckd_priv_weierstrass(
                    self.scheme,
                    &self.core.private_key,
                    &self.core.private_key.to_public(),
                    &self.core.chain_code,
                    idx,
                )?
            }
            DerivationScheme::Ed25519Slip10 => {
                if !idx.is_hardened() {
                    return Err(DerivationError::SoftDerivationUnsupported(self.scheme));
                }
                let (key, cc) =
                    slip10::ckd_priv_ed25519(&self.core.private_key, &self.core.chain_code, idx);
                (key, cc, idx)
            }
            DerivationScheme::Ed25519Kholaw | DerivationScheme::ByronLegacy => {
                let PrivateKey::Ed25519Extended(xprv) = &self.core.private_key else {
                    unreachable!("scheme and key curve are kept in sync")
                };
                let (key, cc) = kholaw::ckd_priv(self.scheme, xprv, &self.core.chain_code, idx);
                (PrivateKey::Ed25519Extended(key), cc, idx)
            }
        };

        Ok(Xpriv {
            scheme: self.scheme,
            versions: self.versions,
            meta: self.meta.child(used, self.fingerprint()),
            core: XprivCore {
                private_key,
                chain_code,
            },
        })
    }
}

impl Display for Xpriv {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        base58::encode_check_to_fmt(f, &self.encode())
    }
}

impl FromStr for Xpriv {
    type Err = XkeyParseError;

    fn from_str(inp: &str) -> Result<Xpriv, XkeyParseError> {
        let data = base58::decode_check(inp)?;
        Xpriv::decode(&data[..], DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET)
            .or_else(|err| match err {
                XkeyDecodeError::VersionMismatch(_) => Xpriv::decode(
                    &data[..],
                    DerivationScheme::Secp256k1,
                    XkeyVersions::BITCOIN_TESTNET,
                ),
                other => Err(other),
            })
            .map_err(XkeyParseError::from)
    }
}

#[cfg(feature = "serde")]
mod _serde {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::*;

    impl Serialize for Xpub {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.to_string())
            } else {
                serializer.serialize_bytes(&self.encode())
            }
        }
    }

    impl<'de> Deserialize<'de> for Xpub {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de> {
            if deserializer.is_human_readable() {
                let s = String::deserialize(deserializer)?;
                Xpub::from_str(&s).map_err(|err| {
                    de::Error::custom(format!("invalid xpub string representation; {err}"))
                })
            } else {
                let v = Vec::<u8>::deserialize(deserializer)?;
                Xpub::decode(
                    &v[..],
                    DerivationScheme::Secp256k1,
                    XkeyVersions::BITCOIN_MAINNET,
                )
                .map_err(|err| de::Error::custom(format!("invalid xpub bytes; {err}")))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{DerivationPath, HardenedIndex, Idx, NormalIndex};

    fn seed() -> Vec<u8> { hex::decode("000102030405060708090a0b0c0d0e0f").unwrap() }

    fn master() -> Xpriv {
        Xpriv::new_master(
            DerivationScheme::Secp256k1,
            XkeyVersions::BITCOIN_MAINNET,
            &seed(),
        )
    }

    #[test]
    fn xpriv_string_roundtrip() {
        let master = master();
        let s = master.to_string();
        let parsed = Xpriv::from_str(&s).unwrap();
        assert_eq!(parsed, master);
        assert_eq!(parsed.to_string(), s);
    }

    #[test]
    fn xpub_string_roundtrip() {
        let xpub = master().to_xpub();
        let s = xpub.to_string();
        let parsed = Xpub::from_str(&s).unwrap();
        assert_eq!(parsed, xpub);
    }

    #[test]
    fn strict_version_enforcement() {
        let master = master();
        let data = master.encode();
        assert!(matches!(
            Xpriv::decode(&data[..], DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_TESTNET),
            Err(XkeyDecodeError::VersionMismatch(_))
        ));
    }

    #[test]
    fn master_meta_consistency() {
        let mut data = master().encode();
        // corrupt parent fingerprint of a depth-zero key
        data[5] = 0xde;
        assert!(matches!(
            Xpriv::decode(&data[..], DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET),
            Err(XkeyDecodeError::InvalidMaster)
        ));
    }

    #[test]
    fn parent_fingerprint_consistency() {
        let master = master();
        let child = master.ckd_priv(HardenedIndex::ZERO).unwrap();
        assert_eq!(child.parent_fp(), master.fingerprint());
        assert_eq!(child.depth(), 1);
        let grandchild = child.ckd_priv(NormalIndex::from(7u8)).unwrap();
        assert_eq!(grandchild.parent_fp(), child.fingerprint());
    }

    #[test]
    fn hardened_public_derivation_refused() {
        let xpub = master().to_xpub();
        assert_eq!(
            xpub.ckd_pub(DerivationIndex::hardened(0)),
            Err(DerivationError::HardenedDerivationFromPublic)
        );
    }

    #[test]
    fn slip10_ed25519_refuses_everything_public() {
        let master =
            Xpriv::new_master(DerivationScheme::Ed25519Slip10, XkeyVersions::BITCOIN_MAINNET, &seed());
        let xpub = master.to_xpub();
        assert_eq!(
            xpub.ckd_pub(DerivationIndex::normal(0)),
            Err(DerivationError::PublicDerivationUnsupported(DerivationScheme::Ed25519Slip10))
        );
        assert_eq!(
            master.ckd_priv(DerivationIndex::normal(0)).unwrap_err(),
            DerivationError::SoftDerivationUnsupported(DerivationScheme::Ed25519Slip10)
        );
    }

    #[test]
    fn kholaw_xpriv_roundtrip() {
        let master = Xpriv::new_master(
            DerivationScheme::Ed25519Kholaw,
            XkeyVersions::BITCOIN_MAINNET,
            &[0x5a; 64],
        );
        let encoded = master.encode();
        assert_eq!(encoded.len(), 110);
        let decoded = Xpriv::decode(
            &encoded[..],
            DerivationScheme::Ed25519Kholaw,
            XkeyVersions::BITCOIN_MAINNET,
        )
        .unwrap();
        assert_eq!(decoded, master);
        // the public side is an ordinary 78-byte xpub
        assert_eq!(master.to_xpub().encode().len(), 78);
    }

    #[test]
    fn path_walk_equals_stepwise() {
        let master = master();
        let path = DerivationPath::from_str("m/44'/0'/0'/0/0").unwrap();
        let walked = master.derive_priv(&path).unwrap();
        let mut stepwise = master;
        for idx in &path {
            stepwise = stepwise.ckd_priv(idx).unwrap();
        }
        assert_eq!(walked, stepwise);
        assert_eq!(walked.depth(), 5);
    }
}
