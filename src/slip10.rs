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

//! HMAC-SHA-512 master and child key constructions for the single-scalar
//! schemes: BIP-32 over secp256k1 and SLIP-0010 over NIST P-256 and ed25519.

use bitcoin_hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use p256::elliptic_curve::PrimeField;
use p256::{FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};
use secp256k1::{Scalar as SecpScalar, SECP256K1};
use zeroize::Zeroize;

use crate::xkey::{ChainCode, DerivationError};
use crate::{Curve, DerivationIndex, DerivationScheme, Idx, IdxBase, PrivateKey, PublicKey};

pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> [u8; 64] {
    let mut engine = HmacEngine::<sha512::Hash>::new(key);
    for part in parts {
        engine.input(part);
    }
    Hmac::<sha512::Hash>::from_engine(engine).to_byte_array()
}

fn chain_code(i: &[u8; 64]) -> ChainCode {
    let mut cc = [0u8; 32];
    cc.copy_from_slice(&i[32..]);
    ChainCode::from(cc)
}

/// Master key generation for secp256k1 and NIST P-256: the HMAC is re-applied
/// to its own 64-byte output until the left half is a valid non-zero scalar.
pub(crate) fn master_weierstrass(
    scheme: DerivationScheme,
    seed: &[u8],
) -> (PrivateKey, ChainCode) {
    let mut i = hmac_sha512(scheme.domain_key(), &[seed]);
    loop {
        match PrivateKey::from_bytes(scheme.curve(), &i[..32]) {
            Ok(key) => {
                let cc = chain_code(&i);
                i.zeroize();
                return (key, cc);
            }
            Err(_) => i = hmac_sha512(scheme.domain_key(), &[&i]),
        }
    }
}

/// SLIP-0010 ed25519 master key: no scalar validation is required.
pub(crate) fn master_ed25519(seed: &[u8]) -> (PrivateKey, ChainCode) {
    let mut i = hmac_sha512(DerivationScheme::Ed25519Slip10.domain_key(), &[seed]);
    let key = PrivateKey::from_bytes(Curve::Ed25519, &i[..32])
        .expect("any 32 bytes are a valid ed25519 secret");
    let cc = chain_code(&i);
    i.zeroize();
    (key, cc)
}

/// Private child derivation for the Weierstrass schemes.
///
/// Degenerate HMAC outputs (left half ≥ n, or a zero child scalar) advance to
/// the next index; the index actually used is returned alongside the child.
pub(crate) fn ckd_priv_weierstrass(
    scheme: DerivationScheme,
    parent: &PrivateKey,
    parent_pub: &PublicKey,
    chain: &ChainCode,
    index: DerivationIndex,
) -> Result<(PrivateKey, ChainCode, DerivationIndex), DerivationError> {
    let mut idx = index;
    loop {
        let mut i = if idx.is_hardened() {
            let mut secret = parent.secret_bytes();
            let i = hmac_sha512(chain.as_ref(), &[&[0u8], &secret, &idx.to_be_bytes()]);
            secret.zeroize();
            i
        } else {
            hmac_sha512(chain.as_ref(), &[&parent_pub.compressed(), &idx.to_be_bytes()])
        };
        match child_scalar(scheme, parent, &i[..32]) {
            Some(child) => {
                let cc = chain_code(&i);
                i.zeroize();
                return Ok((child, cc, idx));
            }
            None => {
                i.zeroize();
                idx = idx.checked_inc().ok_or(DerivationError::IndexSpaceExhausted)?;
            }
        }
    }
}

fn child_scalar(scheme: DerivationScheme, parent: &PrivateKey, il: &[u8]) -> Option<PrivateKey> {
    match (scheme, parent) {
        (DerivationScheme::Secp256k1, PrivateKey::Secp256k1(sk)) => {
            let mut tweak_bytes = [0u8; 32];
            tweak_bytes.copy_from_slice(il);
            let tweak = SecpScalar::from_be_bytes(tweak_bytes).ok()?;
            (*sk).add_tweak(&tweak).ok().map(PrivateKey::Secp256k1)
        }
        (DerivationScheme::Nist256p1, PrivateKey::Nist256p1(sk)) => {
            let il_scalar =
                Option::<Scalar>::from(Scalar::from_repr(*FieldBytes::from_slice(il)))?;
            let sum = il_scalar + *sk.to_nonzero_scalar();
            let child = Option::<NonZeroScalar>::from(NonZeroScalar::new(sum))?;
            Some(PrivateKey::Nist256p1(p256::SecretKey::from(child)))
        }
        _ => unreachable!("scheme and parent key curve are kept in sync by the engine"),
    }
}

/// Public child derivation for the Weierstrass schemes (soft indexes only;
/// hardness is enforced by the caller).
pub(crate) fn ckd_pub_weierstrass(
    scheme: DerivationScheme,
    parent: &PublicKey,
    chain: &ChainCode,
    index: DerivationIndex,
) -> Result<(PublicKey, ChainCode, DerivationIndex), DerivationError> {
    let mut idx = index;
    loop {
        let i = hmac_sha512(chain.as_ref(), &[&parent.compressed(), &idx.to_be_bytes()]);
        match child_point(scheme, parent, &i[..32]) {
            Some(child) => return Ok((child, chain_code(&i), idx)),
            None => idx = idx.checked_inc().ok_or(DerivationError::IndexSpaceExhausted)?,
        }
    }
}

fn child_point(scheme: DerivationScheme, parent: &PublicKey, il: &[u8]) -> Option<PublicKey> {
    match (scheme, parent) {
        (DerivationScheme::Secp256k1, PublicKey::Secp256k1(pk)) => {
            let mut tweak_bytes = [0u8; 32];
            tweak_bytes.copy_from_slice(il);
            let tweak = SecpScalar::from_be_bytes(tweak_bytes).ok()?;
            pk.add_exp_tweak(SECP256K1, &tweak).ok().map(PublicKey::Secp256k1)
        }
        (DerivationScheme::Nist256p1, PublicKey::Nist256p1(pk)) => {
            let il_scalar =
                Option::<Scalar>::from(Scalar::from_repr(*FieldBytes::from_slice(il)))?;
            let sum = ProjectivePoint::GENERATOR * il_scalar
                + ProjectivePoint::from(*pk.as_affine());
            p256::PublicKey::from_affine(sum.to_affine()).ok().map(PublicKey::Nist256p1)
        }
        _ => unreachable!("scheme and parent key curve are kept in sync by the engine"),
    }
}

/// SLIP-0010 ed25519 private child derivation. Only hardened indexes are
/// defined; soft indexes are rejected by the engine before reaching here.
pub(crate) fn ckd_priv_ed25519(
    parent: &PrivateKey,
    chain: &ChainCode,
    index: DerivationIndex,
) -> (PrivateKey, ChainCode) {
    let mut secret = parent.secret_bytes();
    let mut i = hmac_sha512(chain.as_ref(), &[&[0u8], &secret, &index.to_be_bytes()]);
    secret.zeroize();
    let key = PrivateKey::from_bytes(Curve::Ed25519, &i[..32])
        .expect("any 32 bytes are a valid ed25519 secret");
    let cc = chain_code(&i);
    i.zeroize();
    (key, cc)
}

#[cfg(test)]
mod test {
    use super::*;

    fn seed() -> Vec<u8> { hex::decode("000102030405060708090a0b0c0d0e0f").unwrap() }

    #[test]
    fn slip10_nist256p1_master() {
        let (key, cc) = master_weierstrass(DerivationScheme::Nist256p1, &seed());
        assert_eq!(
            hex::encode(key.secret_bytes()),
            "612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2"
        );
        assert_eq!(
            hex::encode(AsRef::<[u8]>::as_ref(&cc)),
            "beeb672fe4621673f722f38529c07392fecaa61015c80c34f29ce8b41b3cb6ea"
        );
        assert_eq!(
            hex::encode(key.to_public().compressed()),
            "0266874dc6ade47b3ecd096745ca09bcd29638dd52c2c12117b11ed3e458cfa9e8"
        );
    }

    #[test]
    fn slip10_nist256p1_hardened_child() {
        let (key, cc) = master_weierstrass(DerivationScheme::Nist256p1, &seed());
        let (child, child_cc, used) = ckd_priv_weierstrass(
            DerivationScheme::Nist256p1,
            &key,
            &key.to_public(),
            &cc,
            DerivationIndex::hardened(0),
        )
        .unwrap();
        assert_eq!(used, DerivationIndex::hardened(0));
        assert_eq!(
            hex::encode(child.secret_bytes()),
            "6939694369114c67917a182c59ddb8cafc3004e63ca5d3b84403ba8613debc0c"
        );
        assert_eq!(
            hex::encode(AsRef::<[u8]>::as_ref(&child_cc)),
            "3460cea53e6a6bb5fb391eeef3237ffd8724bf0a40e94943c98b83825342ee11"
        );
        assert_eq!(
            hex::encode(child.to_public().compressed()),
            "0384610f5ecffe8fda089363a41f56a5c7ffc1d81b59a612d0d649b2d22355590c"
        );
    }

    #[test]
    fn slip10_ed25519_master_and_child() {
        let (key, cc) = master_ed25519(&seed());
        assert_eq!(
            hex::encode(key.secret_bytes()),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(AsRef::<[u8]>::as_ref(&cc)),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );
        let (child, child_cc) = ckd_priv_ed25519(&key, &cc, DerivationIndex::hardened(0));
        assert_eq!(
            hex::encode(child.secret_bytes()),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
        assert_eq!(
            hex::encode(AsRef::<[u8]>::as_ref(&child_cc)),
            "8b59aa11380b624e81507a27fedda59fea6d0b779a778918a2fd3590e16e9c69"
        );
    }

    #[test]
    fn soft_derivation_commutes_with_public() {
        for scheme in [DerivationScheme::Secp256k1, DerivationScheme::Nist256p1] {
            let (key, cc) = master_weierstrass(scheme, &seed());
            let pk = key.to_public();
            for index in [DerivationIndex::normal(0), DerivationIndex::normal(1000)] {
                let (child_priv, priv_cc, _) =
                    ckd_priv_weierstrass(scheme, &key, &pk, &cc, index).unwrap();
                let (child_pub, pub_cc, _) =
                    ckd_pub_weierstrass(scheme, &pk, &cc, index).unwrap();
                assert_eq!(child_priv.to_public(), child_pub, "{scheme} index {index}");
                assert_eq!(priv_cc, pub_cc);
            }
        }
    }
}
