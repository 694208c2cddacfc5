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

//! Monero address codec.
//!
//! A standard address is `net_ver ‖ spend_pub ‖ view_pub` followed by the
//! first four bytes of the payload's Keccak-256, all under the Monero
//! block-wise Base58. An integrated address inserts an 8-byte payment id
//! between the view key and the checksum. Standard addresses are 95
//! characters, integrated ones 106.

use std::fmt::{self, Display, Formatter};

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha3::{Digest, Keccak256};

use crate::address::{AddressCodec, AddressError};
use crate::{base58, Curve, PublicKey};

/// Network version byte of mainnet standard addresses.
pub const MONERO_MAINNET: u8 = 0x12;
/// Network version byte of mainnet integrated addresses.
pub const MONERO_MAINNET_INTEGRATED: u8 = 0x13;
/// Network version byte of testnet standard addresses.
pub const MONERO_TESTNET: u8 = 0x35;
/// Network version byte of testnet integrated addresses.
pub const MONERO_TESTNET_INTEGRATED: u8 = 0x36;

const KEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;
const PAYMENT_ID_LEN: usize = 8;

/// 8-byte tag embedded in integrated addresses to disambiguate recipients
/// sharing a view/spend keypair.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, From)]
pub struct PaymentId([u8; PAYMENT_ID_LEN]);

impl AsRef<[u8]> for PaymentId {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl PaymentId {
    pub fn from_slice(bytes: &[u8]) -> Option<PaymentId> {
        <[u8; PAYMENT_ID_LEN]>::try_from(bytes).ok().map(PaymentId)
    }
}

/// Parameters of the Monero address format.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MoneroParams {
    /// Network version byte.
    pub net_ver: u8,
    /// Public view key accompanying the spend key inside the address.
    pub view_key: PublicKey,
    /// Payment id; present for integrated addresses only.
    pub payment_id: Option<PaymentId>,
}

/// Standard and integrated Monero addresses.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct MoneroCodec;

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest: [u8; 32] = Keccak256::digest(payload).into();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Addresses carry points as they appear on the wire; decode only requires
/// them to be on curve, matching wallet behavior.
fn validate_point(bytes: &[u8]) -> Result<(), AddressError> {
    let mut buf = [0u8; KEY_LEN];
    buf.copy_from_slice(bytes);
    CompressedEdwardsY(buf)
        .decompress()
        .map(|_| ())
        .ok_or(AddressError::InvalidKey(crate::KeyError::InvalidPoint))
}

impl AddressCodec for MoneroCodec {
    type Params = MoneroParams;

    fn encode(&self, key: &PublicKey, params: &Self::Params) -> Result<String, AddressError> {
        let PublicKey::Ed25519(spend) = key else {
            return Err(AddressError::UnsupportedKey(key.curve()));
        };
        let PublicKey::Ed25519(view) = &params.view_key else {
            return Err(AddressError::UnsupportedKey(params.view_key.curve()));
        };

        let mut payload = Vec::with_capacity(1 + 2 * KEY_LEN + PAYMENT_ID_LEN + CHECKSUM_LEN);
        payload.push(params.net_ver);
        payload.extend_from_slice(spend.as_bytes());
        payload.extend_from_slice(view.as_bytes());
        if let Some(payment_id) = &params.payment_id {
            payload.extend_from_slice(payment_id.as_ref());
        }
        let checksum = checksum(&payload);
        payload.extend_from_slice(&checksum);
        Ok(base58::encode_monero(&payload))
    }

    fn decode(&self, addr: &str, params: &Self::Params) -> Result<Vec<u8>, AddressError> {
        let data = base58::decode_monero(addr)?;
        if data.len() < 1 + CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(data.len()));
        }
        let (payload, embedded_checksum) = data.split_at(data.len() - CHECKSUM_LEN);
        if checksum(payload) != embedded_checksum[..] {
            return Err(AddressError::Checksum);
        }
        if payload[0] != params.net_ver {
            return Err(AddressError::WrongPrefix);
        }

        let body = &payload[1..];
        let embedded_payment_id = match body.len() {
            // standard: spend ‖ view
            l if l == 2 * KEY_LEN => None,
            // integrated: spend ‖ view ‖ payment id
            l if l == 2 * KEY_LEN + PAYMENT_ID_LEN => {
                PaymentId::from_slice(&body[2 * KEY_LEN..])
            }
            l => return Err(AddressError::InvalidLength(l)),
        };

        validate_point(&body[..KEY_LEN])?;
        validate_point(&body[KEY_LEN..2 * KEY_LEN])?;

        if embedded_payment_id != params.payment_id {
            return Err(AddressError::PaymentIdMismatch);
        }

        Ok(body[..2 * KEY_LEN].to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PrivateKey;

    fn zero_key() -> PublicKey {
        // the all-zero string decompresses to a valid (small-order) point;
        // address codecs accept it since only curve membership is checked
        PublicKey::Ed25519(CompressedEdwardsY([0u8; 32]))
    }

    fn payment_id() -> PaymentId {
        PaymentId::from_slice(&hex::decode("0102030405060708").unwrap()).unwrap()
    }

    #[test]
    fn standard_address_vector() {
        let params = MoneroParams {
            net_ver: MONERO_MAINNET,
            view_key: zero_key(),
            payment_id: None,
        };
        let addr = MoneroCodec.encode(&zero_key(), &params).unwrap();
        assert_eq!(addr.len(), 95);
        assert_eq!(
            addr,
            "41d7FXjswpK1111111111111111111111111111111111111111111111111111111111111111111111111111112KhNi4"
        );
        let material = MoneroCodec.decode(&addr, &params).unwrap();
        assert_eq!(material, vec![0u8; 64]);
    }

    #[test]
    fn integrated_address_vector() {
        let params = MoneroParams {
            net_ver: MONERO_MAINNET_INTEGRATED,
            view_key: zero_key(),
            payment_id: Some(payment_id()),
        };
        let addr = MoneroCodec.encode(&zero_key(), &params).unwrap();
        assert_eq!(addr.len(), 106);
        assert_eq!(
            addr,
            "4BKnGLZNZ5q11111111111111111111111111111111111111111111111111111111111111111111111111111113DUyZY2dc1xuuJW9"
        );
        assert_eq!(MoneroCodec.decode(&addr, &params).unwrap(), vec![0u8; 64]);
    }

    #[test]
    fn payment_id_must_match() {
        let encode_params = MoneroParams {
            net_ver: MONERO_MAINNET_INTEGRATED,
            view_key: zero_key(),
            payment_id: Some(payment_id()),
        };
        let addr = MoneroCodec.encode(&zero_key(), &encode_params).unwrap();

        let wrong = MoneroParams {
            payment_id: PaymentId::from_slice(&[0u8; 8]),
            ..encode_params
        };
        assert_eq!(
            MoneroCodec.decode(&addr, &wrong),
            Err(AddressError::PaymentIdMismatch)
        );

        let missing = MoneroParams { payment_id: None, ..encode_params };
        assert_eq!(
            MoneroCodec.decode(&addr, &missing),
            Err(AddressError::PaymentIdMismatch)
        );
    }

    #[test]
    fn wrong_network_rejected() {
        let params = MoneroParams {
            net_ver: MONERO_MAINNET,
            view_key: zero_key(),
            payment_id: None,
        };
        let addr = MoneroCodec.encode(&zero_key(), &params).unwrap();
        let testnet = MoneroParams { net_ver: MONERO_TESTNET, ..params };
        assert_eq!(MoneroCodec.decode(&addr, &testnet), Err(AddressError::WrongPrefix));
    }

    #[test]
    fn checksum_tamper_detection() {
        let params = MoneroParams {
            net_ver: MONERO_MAINNET,
            view_key: zero_key(),
            payment_id: None,
        };
        let addr = MoneroCodec.encode(&zero_key(), &params).unwrap();
        for pos in [0usize, 20, 50, 94] {
            let mut tampered = addr.clone().into_bytes();
            tampered[pos] = if tampered[pos] == b'2' { b'3' } else { b'2' };
            let tampered = String::from_utf8(tampered).unwrap();
            if tampered == addr {
                continue;
            }
            assert!(MoneroCodec.decode(&tampered, &params).is_err());
        }
    }

    #[test]
    fn real_keys_roundtrip() {
        let spend = PrivateKey::from_bytes(Curve::Ed25519, &[1u8; 32]).unwrap().to_public();
        let view = PrivateKey::from_bytes(Curve::Ed25519, &[2u8; 32]).unwrap().to_public();
        let params = MoneroParams {
            net_ver: MONERO_MAINNET,
            view_key: view,
            payment_id: None,
        };
        let addr = MoneroCodec.encode(&spend, &params).unwrap();
        assert_eq!(addr.len(), 95);
        let material = MoneroCodec.decode(&addr, &params).unwrap();
        assert_eq!(&material[..32], &spend.compressed()[..]);
        assert_eq!(&material[32..], &view.compressed()[..]);
    }
}
