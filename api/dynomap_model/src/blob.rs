// Copyright 2019-2024 Dynomap developers.
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

use std::fmt::{Debug, Display, Formatter};

use base64::display::Base64Display;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::ValueError;

/// An immutable binary buffer, stored by a binary attribute or an element of a
/// binary set. The textual representation (used by [`Display`] and
/// [`Blob::from_encoded`]) is standard base64.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob {
    data: Bytes,
}

impl Blob {
    pub fn from_vec(data: Vec<u8>) -> Blob {
        Blob {
            data: Bytes::from(data),
        }
    }

    /// Decode a blob from base64 text.
    pub fn from_encoded(encoded: &str) -> Result<Blob, ValueError> {
        let data = STANDARD.decode(encoded)?;
        Ok(Blob::from_vec(data))
    }

    /// The base64 representation of the contents.
    pub fn encode(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Blob::from_vec(data)
    }
}

impl From<&[u8]> for Blob {
    fn from(data: &[u8]) -> Self {
        Blob::from_vec(data.to_vec())
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        self.data.as_ref()
    }
}

impl Display for Blob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Base64Display::new(self.data.as_ref(), &STANDARD))
    }
}

impl Debug for Blob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blob({})", self)
    }
}
