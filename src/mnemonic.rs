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

//! BIP-39 seed phrases: generation, validation and PBKDF2-HMAC-SHA512 seed
//! expansion feeding [`crate::Xpriv::new_master`].

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum MnemonicError {
    /// unsupported number of mnemonic words {0}; use 12, 15, 18, 21 or 24.
    WordCount(usize),

    /// invalid mnemonic phrase - {0}
    Phrase(String),
}

impl From<bip39::Error> for MnemonicError {
    fn from(err: bip39::Error) -> Self { MnemonicError::Phrase(err.to_string()) }
}

/// Number of words in a seed phrase, fixing the entropy size.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum WordCount {
    Twelve,
    Fifteen,
    Eighteen,
    TwentyOne,
    TwentyFour,
}

impl WordCount {
    pub const fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::Fifteen => 15,
            WordCount::Eighteen => 18,
            WordCount::TwentyOne => 21,
            WordCount::TwentyFour => 24,
        }
    }

    pub const fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::Fifteen => 20,
            WordCount::Eighteen => 24,
            WordCount::TwentyOne => 28,
            WordCount::TwentyFour => 32,
        }
    }
}

/// A validated BIP-39 seed phrase.
#[derive(Clone, Eq, PartialEq)]
pub struct Mnemonic(bip39::Mnemonic);

impl Debug for Mnemonic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic").field("word_count", &self.word_count()).finish_non_exhaustive()
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { Display::fmt(&self.0, f) }
}

impl FromStr for Mnemonic {
    type Err = MnemonicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mnemonic(bip39::Mnemonic::parse(s)?))
    }
}

impl Mnemonic {
    /// Generates a fresh phrase from OS entropy.
    pub fn generate(word_count: WordCount) -> Mnemonic {
        let mut entropy = [0u8; 32];
        let len = word_count.entropy_bytes();
        OsRng.fill_bytes(&mut entropy[..len]);
        let mnemonic = bip39::Mnemonic::from_entropy(&entropy[..len])
            .expect("entropy length matches the word count");
        entropy.zeroize();
        Mnemonic(mnemonic)
    }

    /// Restores a phrase from raw entropy.
    pub fn from_entropy(entropy: &[u8]) -> Result<Mnemonic, MnemonicError> {
        Ok(Mnemonic(bip39::Mnemonic::from_entropy(entropy)?))
    }

    pub fn word_count(&self) -> usize { self.0.word_count() }

    /// Expands the phrase into a 64-byte seed with PBKDF2-HMAC-SHA512 under
    /// an optional passphrase. The seed feeds master key generation.
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.0.to_seed(passphrase))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
         about";

    #[test]
    fn known_phrase_seed() {
        let mnemonic = Mnemonic::from_str(PHRASE).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        let seed = mnemonic.to_seed("TREZOR");
        assert_eq!(
            hex::encode(&seed[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c9\
             2f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        let phrase = PHRASE.replace("about", "abandon");
        assert!(Mnemonic::from_str(&phrase).is_err());
    }

    #[test]
    fn generated_phrases_validate() {
        for word_count in [WordCount::Twelve, WordCount::TwentyFour] {
            let mnemonic = Mnemonic::generate(word_count);
            assert_eq!(mnemonic.word_count(), word_count.words());
            let parsed = Mnemonic::from_str(&mnemonic.to_string()).unwrap();
            assert_eq!(parsed, mnemonic);
        }
    }

    #[test]
    fn debug_does_not_leak_phrase() {
        let mnemonic = Mnemonic::from_str(PHRASE).unwrap();
        assert!(!format!("{mnemonic:?}").contains("abandon"));
    }
}
