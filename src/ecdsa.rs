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

//! Deterministic ECDSA signing and verification over secp256k1 and NIST
//! P-256.
//!
//! Signatures use RFC 6979 nonces, are normalized to low-S form and serialize
//! as fixed-width big-endian `r ‖ s`. The verifier accepts high-S signatures
//! by normalizing before the check. Public-key recovery and personal-message
//! signing (EVM / Tron style Keccak-256 prefix hashing with a trailing
//! `v = 27 + recovery_id` byte) are provided for the chains requiring them.

use bitcoin_hashes::{sha256, Hash};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature as NistSignature, SigningKey, VerifyingKey};
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::point::DecompressPoint;
use p256::elliptic_curve::subtle::Choice;
use p256::elliptic_curve::{Field, PrimeField};
use p256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature as SecpSignature};
use secp256k1::{Message, SECP256K1};
use sha3::{Digest, Keccak256};

use crate::{Curve, PrivateKey, PublicKey};

/// Prefix used by EIP-191 personal message signing.
pub const ETHEREUM_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";
/// Prefix used by Tron personal message signing.
pub const TRON_MESSAGE_PREFIX: &str = "\x19TRON Signed Message:\n";

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum SignatureError {
    /// digest of {0} bytes does not match the curve scalar size.
    InvalidDigest(usize),

    /// signature of {0} bytes instead of the fixed-width r ‖ s form.
    InvalidSignatureLength(usize),

    /// signature r or s component is zero or exceeds the group order.
    InvalidSignature,

    /// invalid signature recovery id {0}.
    InvalidRecoveryId(u8),

    /// {0} keys cannot be used for ECDSA operations.
    UnsupportedCurve(Curve),
}

/// Keccak-256 digest of a personal message under a chain prefix: the prefix
/// string, the decimal message length and the message itself.
pub fn personal_digest(prefix: &str, message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// Recovers the signer's public key from a 65-byte personal-message
/// signature (EVM-style chains, secp256k1).
pub fn recover_personal(
    prefix: &str,
    message: &[u8],
    signature: &[u8],
) -> Result<PublicKey, SignatureError> {
    if signature.len() != 65 {
        return Err(SignatureError::InvalidSignatureLength(signature.len()));
    }
    let v = signature[64];
    let recovery_id = if v >= 27 { v - 27 } else { v };
    let digest = personal_digest(prefix, message);
    recover_secp256k1(&digest, &signature[..64], recovery_id)
}

fn message_from_digest(digest: &[u8]) -> Result<Message, SignatureError> {
    let digest: [u8; 32] =
        digest.try_into().map_err(|_| SignatureError::InvalidDigest(digest.len()))?;
    Ok(Message::from_digest(digest))
}

fn recover_secp256k1(
    digest: &[u8],
    signature: &[u8],
    recovery_id: u8,
) -> Result<PublicKey, SignatureError> {
    let msg = message_from_digest(digest)?;
    let recovery_id = RecoveryId::from_i32(recovery_id as i32)
        .map_err(|_| SignatureError::InvalidRecoveryId(recovery_id))?;
    let sig = RecoverableSignature::from_compact(signature, recovery_id)
        .map_err(|_| SignatureError::InvalidSignature)?;
    SECP256K1
        .recover_ecdsa(&msg, &sig)
        .map(PublicKey::Secp256k1)
        .map_err(|_| SignatureError::InvalidSignature)
}

/// Public-key recovery for NIST P-256 by reconstructing the R point from the
/// r component: `Q = r⁻¹(sR − zG)`. Recovery ids 2 and 3 (r reduced past the
/// group order) are rejected.
fn recover_nist256p1(
    digest: &[u8],
    signature: &[u8],
    recovery_id: u8,
) -> Result<PublicKey, SignatureError> {
    if digest.len() != 32 {
        return Err(SignatureError::InvalidDigest(digest.len()));
    }
    if recovery_id > 1 {
        return Err(SignatureError::InvalidRecoveryId(recovery_id));
    }
    let sig = NistSignature::from_slice(signature)
        .map_err(|_| SignatureError::InvalidSignature)?;
    let (r, s) = sig.split_scalars();

    let big_r =
        Option::<AffinePoint>::from(AffinePoint::decompress(&r.to_repr(), Choice::from(recovery_id)))
            .ok_or(SignatureError::InvalidSignature)?;
    let z = <Scalar as Reduce<p256::U256>>::reduce_bytes(FieldBytes::from_slice(digest));
    let r_inv = Option::<Scalar>::from(r.invert()).ok_or(SignatureError::InvalidSignature)?;
    let q = (ProjectivePoint::from(big_r) * *s - ProjectivePoint::GENERATOR * z) * r_inv;
    p256::PublicKey::from_affine(q.to_affine())
        .map(PublicKey::Nist256p1)
        .map_err(|_| SignatureError::InvalidSignature)
}

/// Deterministic ECDSA signer bound to a single private key.
pub struct EcdsaSigner {
    key: PrivateKey,
}

impl EcdsaSigner {
    /// Binds a signer to a Weierstrass-curve private key.
    pub fn new(key: PrivateKey) -> Result<Self, SignatureError> {
        match key.curve() {
            Curve::Secp256k1 | Curve::Nist256p1 => Ok(EcdsaSigner { key }),
            curve => Err(SignatureError::UnsupportedCurve(curve)),
        }
    }

    pub fn public_key(&self) -> PublicKey { self.key.to_public() }

    /// Signs a pre-computed digest of exactly the curve scalar length.
    ///
    /// The produced signature is verified against the signer's own public key
    /// before being returned; a failure there means a broken signing backend
    /// and aborts the process.
    pub fn sign_digest(&self, digest: &[u8]) -> Result<[u8; 64], SignatureError> {
        let signature = match &self.key {
            PrivateKey::Secp256k1(sk) => {
                let msg = message_from_digest(digest)?;
                SECP256K1.sign_ecdsa(&msg, sk).serialize_compact()
            }
            PrivateKey::Nist256p1(sk) => {
                if digest.len() != 32 {
                    return Err(SignatureError::InvalidDigest(digest.len()));
                }
                let signing_key = SigningKey::from(sk);
                let mut sig: NistSignature = signing_key
                    .sign_prehash(digest)
                    .map_err(|_| SignatureError::InvalidDigest(digest.len()))?;
                if let Some(normalized) = sig.normalize_s() {
                    sig = normalized;
                }
                sig.to_bytes().as_slice().try_into().expect("fixed-width r ‖ s form")
            }
            _ => unreachable!("constructor rejects non-Weierstrass keys"),
        };

        let verifier =
            EcdsaVerifier::new(self.public_key()).expect("signer key curve is ECDSA-capable");
        assert_eq!(
            verifier.verify_digest(digest, &signature),
            Ok(true),
            "produced signature failed self-verification: signing backend is broken"
        );
        Ok(signature)
    }

    /// Hashes the message with SHA-256 and signs the digest.
    pub fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], SignatureError> {
        self.sign_digest(&sha256::Hash::hash(message).to_byte_array())
    }

    /// Signs a digest and returns the signature together with the recovery id
    /// identifying which of the candidate R points reproduces the public key.
    pub fn sign_recoverable(&self, digest: &[u8]) -> Result<([u8; 64], u8), SignatureError> {
        match &self.key {
            PrivateKey::Secp256k1(sk) => {
                let msg = message_from_digest(digest)?;
                let (recovery_id, signature) =
                    SECP256K1.sign_ecdsa_recoverable(&msg, sk).serialize_compact();
                let verifier = EcdsaVerifier::new(self.public_key())
                    .expect("signer key curve is ECDSA-capable");
                assert_eq!(
                    verifier.verify_digest(digest, &signature),
                    Ok(true),
                    "produced signature failed self-verification: signing backend is broken"
                );
                Ok((signature, recovery_id.to_i32() as u8))
            }
            PrivateKey::Nist256p1(_) => {
                let signature = self.sign_digest(digest)?;
                let expected = self.public_key();
                for recovery_id in 0..2u8 {
                    if recover_nist256p1(digest, &signature, recovery_id) == Ok(expected) {
                        return Ok((signature, recovery_id));
                    }
                }
                Err(SignatureError::InvalidSignature)
            }
            _ => unreachable!("constructor rejects non-Weierstrass keys"),
        }
    }

    /// Personal-message signing: Keccak-256 over the chain prefix, the
    /// decimal message length and the message, with `v = 27 + recovery_id`
    /// appended to the fixed-width signature.
    pub fn sign_personal(
        &self,
        prefix: &str,
        message: &[u8],
    ) -> Result<[u8; 65], SignatureError> {
        let digest = personal_digest(prefix, message);
        let (signature, recovery_id) = self.sign_recoverable(&digest)?;
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature);
        out[64] = 27 + recovery_id;
        Ok(out)
    }
}

/// ECDSA verifier bound to a single public key.
pub struct EcdsaVerifier {
    key: PublicKey,
}

impl EcdsaVerifier {
    /// Binds a verifier to a Weierstrass-curve public key.
    pub fn new(key: PublicKey) -> Result<Self, SignatureError> {
        match key.curve() {
            Curve::Secp256k1 | Curve::Nist256p1 => Ok(EcdsaVerifier { key }),
            curve => Err(SignatureError::UnsupportedCurve(curve)),
        }
    }

    pub fn public_key(&self) -> PublicKey { self.key }

    /// Checks a fixed-width signature against a digest. Malformed inputs are
    /// errors; a failing verification equation is `Ok(false)`.
    pub fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool, SignatureError> {
        if signature.len() != 64 {
            return Err(SignatureError::InvalidSignatureLength(signature.len()));
        }
        // zero components parse fine in the backends but are not valid
        // signatures
        if signature[..32].iter().all(|&b| b == 0) || signature[32..].iter().all(|&b| b == 0) {
            return Err(SignatureError::InvalidSignature);
        }
        match &self.key {
            PublicKey::Secp256k1(pk) => {
                let msg = message_from_digest(digest)?;
                let mut sig = SecpSignature::from_compact(signature)
                    .map_err(|_| SignatureError::InvalidSignature)?;
                sig.normalize_s();
                Ok(SECP256K1.verify_ecdsa(&msg, &sig, pk).is_ok())
            }
            PublicKey::Nist256p1(pk) => {
                if digest.len() != 32 {
                    return Err(SignatureError::InvalidDigest(digest.len()));
                }
                let sig = NistSignature::from_slice(signature)
                    .map_err(|_| SignatureError::InvalidSignature)?;
                let sig = sig.normalize_s().unwrap_or(sig);
                Ok(VerifyingKey::from(*pk).verify_prehash(digest, &sig).is_ok())
            }
            _ => unreachable!("constructor rejects non-Weierstrass keys"),
        }
    }

    /// Hashes the message with SHA-256 and checks the signature against the
    /// digest.
    pub fn verify_message(
        &self,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, SignatureError> {
        self.verify_digest(&sha256::Hash::hash(message).to_byte_array(), signature)
    }

    /// Recovers the public key matching the signature over the digest.
    /// Callers without a recovery id iterate the possible ids and compare to
    /// an expected key.
    pub fn recover_digest(
        &self,
        digest: &[u8],
        signature: &[u8],
        recovery_id: u8,
    ) -> Result<PublicKey, SignatureError> {
        if signature.len() != 64 {
            return Err(SignatureError::InvalidSignatureLength(signature.len()));
        }
        match self.key.curve() {
            Curve::Secp256k1 => recover_secp256k1(digest, signature, recovery_id),
            Curve::Nist256p1 => recover_nist256p1(digest, signature, recovery_id),
            _ => unreachable!("constructor rejects non-Weierstrass keys"),
        }
    }

    /// Checks a 65-byte personal-message signature by recovering the signer
    /// key and comparing it to the bound public key.
    pub fn verify_personal(
        &self,
        prefix: &str,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, SignatureError> {
        if self.key.curve() != Curve::Secp256k1 {
            return Err(SignatureError::UnsupportedCurve(self.key.curve()));
        }
        Ok(recover_personal(prefix, message, signature)? == self.key)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn secp_signer() -> EcdsaSigner {
        let sk = PrivateKey::from_bytes(Curve::Secp256k1, &[0x17; 32]).unwrap();
        EcdsaSigner::new(sk).unwrap()
    }

    #[test]
    fn sign_verify_roundtrip() {
        for curve in [Curve::Secp256k1, Curve::Nist256p1] {
            let sk = PrivateKey::from_bytes(curve, &[0x59; 32]).unwrap();
            let signer = EcdsaSigner::new(sk).unwrap();
            let verifier = EcdsaVerifier::new(signer.public_key()).unwrap();
            let sig = signer.sign_message(b"hd-std test message").unwrap();
            assert_eq!(verifier.verify_message(b"hd-std test message", &sig), Ok(true));
            assert_eq!(verifier.verify_message(b"another message", &sig), Ok(false));
        }
    }

    #[test]
    fn signing_is_deterministic() {
        let signer = secp_signer();
        let digest = [0xabu8; 32];
        assert_eq!(signer.sign_digest(&digest).unwrap(), signer.sign_digest(&digest).unwrap());
    }

    #[test]
    fn rejects_wrong_digest_length() {
        let signer = secp_signer();
        assert_eq!(
            signer.sign_digest(&[0u8; 31]),
            Err(SignatureError::InvalidDigest(31))
        );
    }

    #[test]
    fn rejects_out_of_range_signature() {
        let verifier = EcdsaVerifier::new(secp_signer().public_key()).unwrap();
        // r = 0
        let zero_r = [0u8; 64];
        assert_eq!(
            verifier.verify_digest(&[1u8; 32], &zero_r),
            Err(SignatureError::InvalidSignature)
        );
        // s = order
        let mut order_s = [0u8; 64];
        order_s[0] = 1;
        order_s[32..].copy_from_slice(
            &hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap(),
        );
        assert_eq!(
            verifier.verify_digest(&[1u8; 32], &order_s),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn recovery_roundtrip() {
        for curve in [Curve::Secp256k1, Curve::Nist256p1] {
            let sk = PrivateKey::from_bytes(curve, &[0x33; 32]).unwrap();
            let signer = EcdsaSigner::new(sk).unwrap();
            let verifier = EcdsaVerifier::new(signer.public_key()).unwrap();
            let digest = [0x42u8; 32];
            let (sig, recovery_id) = signer.sign_recoverable(&digest).unwrap();
            let recovered = verifier.recover_digest(&digest, &sig, recovery_id).unwrap();
            assert_eq!(recovered, signer.public_key(), "{curve}");
        }
    }

    #[test]
    fn ed25519_keys_rejected() {
        let sk = PrivateKey::from_bytes(Curve::Ed25519, &[9u8; 32]).unwrap();
        let pk = sk.to_public();
        assert!(matches!(
            EcdsaSigner::new(sk),
            Err(SignatureError::UnsupportedCurve(Curve::Ed25519))
        ));
        assert!(matches!(
            EcdsaVerifier::new(pk),
            Err(SignatureError::UnsupportedCurve(Curve::Ed25519))
        ));
    }
}
