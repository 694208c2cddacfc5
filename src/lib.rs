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

//! Hierarchical deterministic key derivation, deterministic ECDSA signing and
//! address codecs for multiple elliptic curves and chains.
//!
//! The library is pure and stateless: every operation is a function from byte
//! strings and typed key values to new values; nothing is mutated in place and
//! no I/O is performed.

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod base58;
mod curve;
mod index;
mod path;
mod key;
mod slip10;
mod kholaw;
mod xkey;
mod ecdsa;
mod address;
mod monero;
pub mod mnemonic;

pub use address::{
    AddressCodec, AddressError, Base58CheckCodec, Base58CheckParams, Bech32Codec, Bech32Params,
};
pub use curve::{Curve, DerivationScheme};
pub use ecdsa::{
    personal_digest, recover_personal, EcdsaSigner, EcdsaVerifier, SignatureError,
    ETHEREUM_MESSAGE_PREFIX, TRON_MESSAGE_PREFIX,
};
pub use index::{
    DerivationIndex, HardenedIndex, Idx, IdxBase, IndexError, IndexParseError, NormalIndex,
    HARDENED_INDEX_BOUNDARY,
};
pub use key::{KeyError, PrivateKey, PublicKey};
pub use monero::{
    MoneroCodec, MoneroParams, PaymentId, MONERO_MAINNET, MONERO_MAINNET_INTEGRATED,
    MONERO_TESTNET, MONERO_TESTNET_INTEGRATED,
};
pub use path::{DerivationParseError, DerivationPath};
pub use xkey::{
    ChainCode, DerivationError, XkeyDecodeError, XkeyMeta, XkeyParseError, XkeyVersions, Xpriv,
    XprivCore, Xpub, XpubCore, XpubFp, XpubId,
};
