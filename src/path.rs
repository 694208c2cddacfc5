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

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::{DerivationIndex, IndexParseError};

#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum DerivationParseError {
    /// unable to parse derivation path '{0}' - {1}
    InvalidIndex(String, IndexParseError),
    /// invalid derivation path format '{0}'
    InvalidFormat(String),
}

/// Sequence of derivation indexes, i.e. the `44'/0'/0'/0/0` part of
/// `m/44'/0'/0'/0/0`.
///
/// An empty path corresponds to the master key itself.
#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, From)]
#[wrapper(Deref)]
#[wrapper_mut(DerefMut)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "camelCase"))]
pub struct DerivationPath<I = DerivationIndex>(Vec<I>);

impl<I: Clone> From<&[I]> for DerivationPath<I> {
    fn from(path: &[I]) -> Self { Self(path.to_vec()) }
}

impl<I: Display> Display for DerivationPath<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.0 {
            f.write_str("/")?;
            Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl<I: FromStr> FromStr for DerivationPath<I>
where IndexParseError: From<<I as FromStr>::Err>
{
    type Err = DerivationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let full = s;
        let s = match s.strip_prefix("m/") {
            Some(tail) => tail,
            None if s == "m" => "",
            None => s.strip_prefix('/').unwrap_or(s),
        };
        if s.is_empty() {
            return Ok(Self(vec![]));
        }
        let inner = s
            .split('/')
            .map(I::from_str)
            .collect::<Result<Vec<_>, I::Err>>()
            .map_err(|err| DerivationParseError::InvalidIndex(full.to_owned(), err.into()))?;
        Ok(Self(inner))
    }
}

impl<I> IntoIterator for DerivationPath<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'path, I: Copy> IntoIterator for &'path DerivationPath<I> {
    type Item = I;
    type IntoIter = std::iter::Copied<std::slice::Iter<'path, I>>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter().copied() }
}

impl<I> FromIterator<I> for DerivationPath<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self { Self(iter.into_iter().collect()) }
}

impl<I> AsRef<[I]> for DerivationPath<I> {
    fn as_ref(&self) -> &[I] { &self.0 }
}

impl<I> DerivationPath<I> {
    /// Constructs empty derivation path.
    pub fn new() -> Self { Self(vec![]) }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{HardenedIndex, IdxBase};

    #[test]
    fn altstr() {
        let path1 = DerivationPath::<HardenedIndex>::from_str("m/86h/1h/0h").unwrap();
        let path2 = DerivationPath::<HardenedIndex>::from_str("m/86'/1'/0'").unwrap();
        let path3 = DerivationPath::<HardenedIndex>::from_str("86'/1h/0h").unwrap();
        assert_eq!(path1, path2);
        assert_eq!(path1, path3);
    }

    #[test]
    fn master_path() {
        let path = DerivationPath::<DerivationIndex>::from_str("m").unwrap();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "m");
    }

    #[test]
    fn mixed_hardness() {
        let path = DerivationPath::<DerivationIndex>::from_str("m/44'/0'/0'/0/5").unwrap();
        assert_eq!(path.len(), 5);
        assert!(path[2].is_hardened());
        assert!(!path[4].is_hardened());
        assert_eq!(path[4].index(), 5);
        assert_eq!(path.to_string(), "m/44h/0h/0h/0/5");
    }

    #[test]
    fn rejects_garbage() {
        assert!(DerivationPath::<DerivationIndex>::from_str("m//0").is_err());
        assert!(DerivationPath::<DerivationIndex>::from_str("m/a/b").is_err());
        assert!(DerivationPath::<DerivationIndex>::from_str("m/44'/x").is_err());
        assert!(DerivationPath::<DerivationIndex>::from_str("m/4294967296").is_err());
    }
}
