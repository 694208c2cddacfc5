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

//! Pluggable address codec framework.
//!
//! Each chain family implements [`AddressCodec`] with its own typed
//! parameters record; decoding validates checksum, network prefix and payload
//! structure before returning the raw key material embedded in the address.

use bech32::{FromBase32, ToBase32, Variant};
use bitcoin_hashes::{hash160, Hash};

use crate::{base58, Curve, KeyError, PublicKey};

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum AddressError {
    /// wrong Base58 encoding of address data - {0}
    #[from]
    Base58(base58::Error),

    /// wrong Bech32 encoding of address data - {0}
    #[from]
    Bech32(bech32::Error),

    /// address checksum does not match the payload.
    Checksum,

    /// address version prefix does not match the expected chain prefix.
    WrongPrefix,

    /// address human-readable prefix '{0}' does not match the expected '{1}'.
    WrongHrp(String, String),

    /// witness version {0} cannot be encoded.
    InvalidWitnessVersion(u8),

    /// unexpected address payload length {0}.
    InvalidLength(usize),

    /// invalid address payload structure.
    InvalidPayload,

    /// address contains an invalid public key - {0}
    #[from]
    InvalidKey(KeyError),

    /// payment id embedded in the address does not match the expected one.
    PaymentIdMismatch,

    /// {0} public keys cannot be encoded by this address format.
    UnsupportedKey(Curve),
}

/// Capability contract of a chain address format.
///
/// Encoding turns a validated public key into an address string; decoding
/// validates the string and returns the raw key material it carries.
pub trait AddressCodec {
    type Params;

    fn encode(&self, key: &PublicKey, params: &Self::Params) -> Result<String, AddressError>;

    fn decode(&self, addr: &str, params: &Self::Params) -> Result<Vec<u8>, AddressError>;
}

/// Parameters of Base58Check (Bitcoin-family) addresses.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Base58CheckParams {
    /// Network version bytes prepended to the key hash.
    pub version: Vec<u8>,
}

/// Bitcoin-family Base58Check addresses: `version ‖ HASH160(pubkey)` with a
/// 4-byte double-SHA-256 checksum.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Base58CheckCodec;

impl AddressCodec for Base58CheckCodec {
    type Params = Base58CheckParams;

    fn encode(&self, key: &PublicKey, params: &Self::Params) -> Result<String, AddressError> {
        if key.curve() == Curve::Ed25519 {
            return Err(AddressError::UnsupportedKey(Curve::Ed25519));
        }
        let hash = hash160::Hash::hash(&key.compressed()).to_byte_array();
        let mut payload = Vec::with_capacity(params.version.len() + hash.len());
        payload.extend_from_slice(&params.version);
        payload.extend_from_slice(&hash);
        Ok(base58::encode_check(&payload))
    }

    fn decode(&self, addr: &str, params: &Self::Params) -> Result<Vec<u8>, AddressError> {
        let data = base58::decode_check(addr)?;
        if data.len() != params.version.len() + 20 {
            return Err(AddressError::InvalidLength(data.len()));
        }
        if data[..params.version.len()] != params.version[..] {
            return Err(AddressError::WrongPrefix);
        }
        Ok(data[params.version.len()..].to_vec())
    }
}

/// Parameters of Bech32 (segwit-style) addresses.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Bech32Params {
    /// Human-readable prefix identifying the network.
    pub hrp: String,
    /// Witness version encoded as the first data character.
    pub witness_version: u8,
}

/// Bech32 addresses carrying a witness program: for key addresses the
/// program is `HASH160(pubkey)`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Bech32Codec;

impl AddressCodec for Bech32Codec {
    type Params = Bech32Params;

    fn encode(&self, key: &PublicKey, params: &Self::Params) -> Result<String, AddressError> {
        if key.curve() == Curve::Ed25519 {
            return Err(AddressError::UnsupportedKey(Curve::Ed25519));
        }
        let program = hash160::Hash::hash(&key.compressed()).to_byte_array();
        let version = bech32::u5::try_from_u8(params.witness_version)
            .map_err(|_| AddressError::InvalidWitnessVersion(params.witness_version))?;
        let mut data = vec![version];
        data.extend(program.to_base32());
        Ok(bech32::encode(&params.hrp, data, Variant::Bech32)?)
    }

    fn decode(&self, addr: &str, params: &Self::Params) -> Result<Vec<u8>, AddressError> {
        let (hrp, data, variant) = bech32::decode(addr)?;
        if variant != Variant::Bech32 {
            return Err(AddressError::InvalidPayload);
        }
        if hrp.to_lowercase() != params.hrp.to_lowercase() {
            return Err(AddressError::WrongHrp(hrp, params.hrp.clone()));
        }
        let (version, program) = data.split_first().ok_or(AddressError::InvalidPayload)?;
        if version.to_u8() != params.witness_version {
            return Err(AddressError::WrongPrefix);
        }
        let program = Vec::<u8>::from_base32(program)?;
        if program.len() != 20 && program.len() != 32 {
            return Err(AddressError::InvalidLength(program.len()));
        }
        Ok(program)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PrivateKey;

    fn test_key() -> PublicKey {
        PrivateKey::from_bytes(Curve::Secp256k1, &[0x11; 32]).unwrap().to_public()
    }

    #[test]
    fn base58check_roundtrip() {
        let params = Base58CheckParams { version: vec![0x00] };
        let key = test_key();
        let addr = Base58CheckCodec.encode(&key, &params).unwrap();
        assert!(addr.starts_with('1'));
        let material = Base58CheckCodec.decode(&addr, &params).unwrap();
        assert_eq!(material, hash160::Hash::hash(&key.compressed()).to_byte_array());
    }

    #[test]
    fn base58check_wrong_version() {
        let key = test_key();
        let addr = Base58CheckCodec
            .encode(&key, &Base58CheckParams { version: vec![0x00] })
            .unwrap();
        assert_eq!(
            Base58CheckCodec.decode(&addr, &Base58CheckParams { version: vec![0x6f] }),
            Err(AddressError::WrongPrefix)
        );
    }

    #[test]
    fn base58check_detects_bit_flips() {
        let params = Base58CheckParams { version: vec![0x00] };
        let addr = Base58CheckCodec.encode(&test_key(), &params).unwrap();
        for pos in 1..addr.len() {
            let mut tampered = addr.clone().into_bytes();
            tampered[pos] = if tampered[pos] == b'2' { b'3' } else { b'2' };
            let tampered = String::from_utf8(tampered).unwrap();
            if tampered == addr {
                continue;
            }
            assert!(
                Base58CheckCodec.decode(&tampered, &params).is_err(),
                "tampering at {pos} went unnoticed"
            );
        }
    }

    #[test]
    fn bech32_roundtrip() {
        let params = Bech32Params { hrp: "bc".to_owned(), witness_version: 0 };
        let key = test_key();
        let addr = Bech32Codec.encode(&key, &params).unwrap();
        assert!(addr.starts_with("bc1"));
        let program = Bech32Codec.decode(&addr, &params).unwrap();
        assert_eq!(program, hash160::Hash::hash(&key.compressed()).to_byte_array());
    }

    #[test]
    fn bech32_wrong_hrp() {
        let params = Bech32Params { hrp: "bc".to_owned(), witness_version: 0 };
        let addr = Bech32Codec.encode(&test_key(), &params).unwrap();
        let testnet = Bech32Params { hrp: "tb".to_owned(), witness_version: 0 };
        assert!(matches!(
            Bech32Codec.decode(&addr, &testnet),
            Err(AddressError::WrongHrp(_, _))
        ));
    }

    #[test]
    fn edwards_keys_unsupported() {
        let key = PrivateKey::from_bytes(Curve::Ed25519, &[4u8; 32]).unwrap().to_public();
        let params = Base58CheckParams { version: vec![0x00] };
        assert_eq!(
            Base58CheckCodec.encode(&key, &params),
            Err(AddressError::UnsupportedKey(Curve::Ed25519))
        );
    }
}
