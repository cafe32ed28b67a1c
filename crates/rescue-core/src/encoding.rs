//! Text encodings for reading and writing CSV files

use crate::error::{Error, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A text encoding, identified by its WHATWG label (e.g. "UTF-8", "windows-1252")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8, the default for every target
    pub const UTF_8: TextEncoding = TextEncoding(encoding_rs::UTF_8);

    /// Look up an encoding by label
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(TextEncoding)
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decode file content, dropping a leading byte order mark
    ///
    /// Malformed sequences are an error rather than being replaced.
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<String> {
        let (text, had_errors) = self.0.decode_with_bom_removal(bytes);
        if had_errors {
            return Err(Error::Decode {
                path: path.to_path_buf(),
                encoding: self.name(),
            });
        }
        Ok(text.into_owned())
    }

    /// Encode text for writing
    pub fn encode(&self, text: &str, path: &Path) -> Result<Vec<u8>> {
        let (bytes, _, had_unmappable) = self.0.encode(text);
        if had_unmappable {
            return Err(Error::Encode {
                path: path.to_path_buf(),
                encoding: self.name(),
            });
        }
        Ok(bytes.into_owned())
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::UTF_8
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        Self::for_label(&label)
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.name().to_string()
    }
}

impl std::str::FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_label(s)
    }
}
