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

//! Base58 policies: Base58Check (double-SHA-256 checksum, used by extended
//! keys and Bitcoin-family addresses) and the Monero block-wise Base58
//! variant (fixed 8-byte ↔ 11-character blocks).

use std::fmt::{self, Formatter};

use bitcoin_hashes::{sha256d, Hash};

/// Number of checksum bytes appended by the Base58Check policy.
const CHECKSUM_LEN: usize = 4;

/// Monero Base58 alphabet; identical to the Bitcoin one.
static ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Character lengths of encoded Monero blocks, indexed by the binary block
/// length (0 to 8 bytes).
const ENCODED_BLOCK_SIZES: [usize; 9] = [0, 2, 3, 5, 6, 7, 9, 10, 11];
const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum Error {
    /// invalid Base58 content - {0}
    #[from]
    Invalid(bs58::decode::Error),

    /// Base58Check payload of {0} bytes is too short to contain a checksum.
    TooShort(usize),

    /// Base58Check checksum does not match the payload.
    InvalidChecksum,

    /// invalid character '{0}' outside of the Base58 alphabet.
    InvalidCharacter(char),

    /// Base58 block of {0} characters does not correspond to any binary block
    /// length.
    InvalidBlockLength(usize),

    /// decoded Base58 block overflows its binary block length.
    BlockOverflow,
}

/// Encodes `data` with a 4-byte double-SHA-256 checksum appended.
pub fn encode_check(data: &[u8]) -> String {
    let checksum = sha256d::Hash::hash(data).to_byte_array();
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(payload).into_string()
}

/// Writes Base58Check-encoded `data` into a formatter.
pub fn encode_check_to_fmt(f: &mut Formatter, data: &[u8]) -> fmt::Result {
    f.write_str(&encode_check(data))
}

/// Decodes a Base58Check string, validating and stripping the 4-byte
/// double-SHA-256 checksum.
pub fn decode_check(s: &str) -> Result<Vec<u8>, Error> {
    let mut data = bs58::decode(s).into_vec()?;
    if data.len() < CHECKSUM_LEN {
        return Err(Error::TooShort(data.len()));
    }
    let payload_len = data.len() - CHECKSUM_LEN;
    let checksum = sha256d::Hash::hash(&data[..payload_len]).to_byte_array();
    if data[payload_len..] != checksum[..CHECKSUM_LEN] {
        return Err(Error::InvalidChecksum);
    }
    data.truncate(payload_len);
    Ok(data)
}

/// Encodes bytes with the Monero block-wise Base58 policy: each 8-byte block
/// maps to exactly 11 characters (partial tail blocks per
/// [`ENCODED_BLOCK_SIZES`]), interpreting blocks as big-endian integers.
pub fn encode_monero(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len().div_ceil(FULL_BLOCK_SIZE) * FULL_ENCODED_BLOCK_SIZE);
    for chunk in data.chunks(FULL_BLOCK_SIZE) {
        let mut num = 0u64;
        for &byte in chunk {
            num = num << 8 | byte as u64;
        }
        let encoded_len = ENCODED_BLOCK_SIZES[chunk.len()];
        let mut block = [b'1'; FULL_ENCODED_BLOCK_SIZE];
        let mut pos = encoded_len;
        while num > 0 {
            pos -= 1;
            block[pos] = ALPHABET[(num % 58) as usize];
            num /= 58;
        }
        s.push_str(std::str::from_utf8(&block[..encoded_len]).expect("alphabet is ASCII"));
    }
    s
}

/// Decodes a Monero block-wise Base58 string.
pub fn decode_monero(s: &str) -> Result<Vec<u8>, Error> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * FULL_BLOCK_SIZE / FULL_ENCODED_BLOCK_SIZE + FULL_BLOCK_SIZE);
    for chunk in bytes.chunks(FULL_ENCODED_BLOCK_SIZE) {
        let block_len = ENCODED_BLOCK_SIZES
            .iter()
            .position(|&encoded| encoded == chunk.len())
            .ok_or(Error::InvalidBlockLength(chunk.len()))?;
        let mut num = 0u128;
        for &c in chunk {
            let digit = ALPHABET
                .iter()
                .position(|&a| a == c)
                .ok_or(Error::InvalidCharacter(c as char))?;
            num = num * 58 + digit as u128;
        }
        if num >> (8 * block_len as u32) != 0 {
            return Err(Error::BlockOverflow);
        }
        out.extend_from_slice(&num.to_be_bytes()[16 - block_len..]);
    }
    Ok(out)
}
