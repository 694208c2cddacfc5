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

use std::str::FromStr;

use hdstd::{
    DerivationError, DerivationIndex, DerivationPath, DerivationScheme, HardenedIndex, Idx,
    XkeyVersions, Xpriv, Xpub,
};

const SEED: &str = "000102030405060708090a0b0c0d0e0f";

fn seed() -> Vec<u8> { hex::decode(SEED).unwrap() }

fn secp_master() -> Xpriv {
    Xpriv::new_master(DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET, &seed())
}

#[test]
fn bip32_vector1_master() {
    assert_eq!(
        secp_master().to_string(),
        "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRN\
         NU3TGtRBeJgk33yuGBxrMPHi"
    );
    assert_eq!(
        secp_master().to_xpub().to_string(),
        "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD\
         265TMg7usUDFdp6W1EGMcet8"
    );
}

#[test]
fn bip32_vector1_first_hardened_child() {
    let child = secp_master().ckd_priv(HardenedIndex::ZERO).unwrap();
    assert_eq!(
        child.to_string(),
        "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11e\
         ZG7XnxHrnYeSvkzY7d2bhkJ7"
    );
}

#[test]
fn path_derivation_equals_stepwise() {
    let master = secp_master();
    let path = DerivationPath::from_str("m/44'/0'/0'/0/0").unwrap();
    let by_path = master.derive_priv(&path).unwrap();

    let stepwise = master
        .ckd_priv(DerivationIndex::hardened(44))
        .unwrap()
        .ckd_priv(DerivationIndex::hardened(0))
        .unwrap()
        .ckd_priv(DerivationIndex::hardened(0))
        .unwrap()
        .ckd_priv(DerivationIndex::normal(0))
        .unwrap()
        .ckd_priv(DerivationIndex::normal(0))
        .unwrap();

    assert_eq!(by_path, stepwise);
}

#[test]
fn soft_derivation_commutes_with_public() {
    for scheme in [
        DerivationScheme::Secp256k1,
        DerivationScheme::Nist256p1,
        DerivationScheme::Ed25519Kholaw,
        DerivationScheme::ByronLegacy,
    ] {
        let master = Xpriv::new_master(scheme, XkeyVersions::BITCOIN_MAINNET, &seed());
        // a hardened step first, so the commutation is checked off-master
        let account = master.ckd_priv(DerivationIndex::hardened(0)).unwrap();
        let xpub = account.to_xpub();
        for index in [DerivationIndex::normal(0), DerivationIndex::normal(42)] {
            let child_priv = account.ckd_priv(index).unwrap();
            let child_pub = xpub.ckd_pub(index).unwrap();
            assert_eq!(child_priv.to_xpub(), child_pub, "{scheme} index {index}");
        }
    }
}

#[test]
fn hardened_public_derivation_always_fails() {
    for scheme in [
        DerivationScheme::Secp256k1,
        DerivationScheme::Nist256p1,
        DerivationScheme::Ed25519Kholaw,
        DerivationScheme::ByronLegacy,
    ] {
        let xpub = Xpriv::new_master(scheme, XkeyVersions::BITCOIN_MAINNET, &seed()).to_xpub();
        assert_eq!(
            xpub.ckd_pub(DerivationIndex::hardened(0)),
            Err(DerivationError::HardenedDerivationFromPublic),
            "{scheme}"
        );
    }
}

#[test]
fn fingerprint_chain_is_consistent() {
    let master = secp_master();
    let account = master.derive_priv(&DerivationPath::from_str("m/44'/0'/0'").unwrap()).unwrap();
    let change = account.ckd_priv(DerivationIndex::normal(0)).unwrap();
    assert_eq!(change.parent_fp(), account.fingerprint());
    assert_eq!(change.parent_fp(), account.to_xpub().fingerprint());
    assert_eq!(change.depth(), 4);
}

#[test]
fn extended_key_string_roundtrip_all_schemes() {
    for scheme in [
        DerivationScheme::Secp256k1,
        DerivationScheme::Nist256p1,
        DerivationScheme::Ed25519Slip10,
        DerivationScheme::Ed25519Kholaw,
        DerivationScheme::ByronLegacy,
    ] {
        let master = Xpriv::new_master(scheme, XkeyVersions::BITCOIN_MAINNET, &seed());
        let xprv_data = master.encode();
        let xprv_back =
            Xpriv::decode(&xprv_data[..], scheme, XkeyVersions::BITCOIN_MAINNET).unwrap();
        assert_eq!(xprv_back, master, "{scheme}");

        let xpub = master.to_xpub();
        let xpub_back =
            Xpub::decode(xpub.encode(), scheme, XkeyVersions::BITCOIN_MAINNET).unwrap();
        assert_eq!(xpub_back, xpub, "{scheme}");
    }
}

#[test]
fn testnet_versions_roundtrip_via_strings() {
    let master =
        Xpriv::new_master(DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_TESTNET, &seed());
    let s = master.to_string();
    assert!(s.starts_with("tprv"));
    let parsed = Xpriv::from_str(&s).unwrap();
    assert_eq!(parsed, master);
}

#[test]
fn mnemonic_feeds_master_generation() {
    let mnemonic = hdstd::mnemonic::Mnemonic::from_str(
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
         abandon about",
    )
    .unwrap();
    let seed = mnemonic.to_seed("");
    let master =
        Xpriv::new_master(DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET, &seed[..]);
    let again =
        Xpriv::new_master(DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET, &seed[..]);
    assert_eq!(master, again);
    assert_eq!(master.depth(), 0);
    assert_eq!(master.parent_fp(), hdstd::XpubFp::master());
}

#[test]
fn schemes_produce_distinct_hierarchies() {
    let secp = Xpriv::new_master(DerivationScheme::Secp256k1, XkeyVersions::BITCOIN_MAINNET, &seed());
    let nist = Xpriv::new_master(DerivationScheme::Nist256p1, XkeyVersions::BITCOIN_MAINNET, &seed());
    let ed = Xpriv::new_master(DerivationScheme::Ed25519Slip10, XkeyVersions::BITCOIN_MAINNET, &seed());
    assert_ne!(secp.private_key().secret_bytes(), nist.private_key().secret_bytes());
    assert_ne!(nist.private_key().secret_bytes(), ed.private_key().secret_bytes());
    assert_ne!(secp.chain_code(), ed.chain_code());
}
