//! Qualifier encoding schemes.
//!
//! A qualifier is the physical byte string identifying a cell within a
//! column family. [`QualifierEncoding`] is the codec family that maps logical
//! column identity onto those bytes: either the column name itself
//! ([`QualifierEncoding::NonEncoded`]) or a counter-allocated number packed
//! into a fixed-width big-endian form. Lexicographic order of encoded
//! qualifiers equals numeric order, which keeps cells within a family sorted
//! by allocation.
//!
//! Only the four-byte width currently has a codec body. The one/two/three
//! byte widths declare their bounds (so capacity checks work) but their
//! encode/decode paths surface [`Error::Unsupported`]; their wire layout is
//! not yet fixed and must not be guessed at.

use std::fmt;

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

/// A logical qualifier value prior to encoding.
///
/// The non-encoded scheme stores column names directly; every numbered
/// scheme stores a counter-allocated number. The two shapes are deliberately
/// a closed sum so codec mismatches fail loudly instead of truncating.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum QualifierValue {
    /// A logical column name, stored as its UTF-8 bytes.
    Name(String),
    /// A counter-allocated qualifier number.
    Number(u32),
}

impl QualifierValue {
    /// The contained number, if this is a numeric qualifier.
    #[inline]
    pub fn as_number(&self) -> Option<u32> {
        match self {
            QualifierValue::Number(n) => Some(*n),
            QualifierValue::Name(_) => None,
        }
    }

    /// The contained name, if this is a name qualifier.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            QualifierValue::Name(s) => Some(s),
            QualifierValue::Number(_) => None,
        }
    }
}

impl From<&str> for QualifierValue {
    fn from(value: &str) -> Self {
        QualifierValue::Name(value.to_string())
    }
}

impl From<String> for QualifierValue {
    fn from(value: String) -> Self {
        QualifierValue::Name(value)
    }
}

impl From<u32> for QualifierValue {
    fn from(value: u32) -> Self {
        QualifierValue::Number(value)
    }
}

impl fmt::Display for QualifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualifierValue::Name(s) => f.write_str(s),
            QualifierValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Codec family mapping logical column identity to physical qualifier bytes.
///
/// Selected once at table creation alongside the storage scheme and immutable
/// thereafter. Serialized to the catalog as a single 0-based discriminant
/// byte plus the UTF-8 display name for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum QualifierEncoding {
    /// Column names stored verbatim as their UTF-8 bytes.
    NonEncoded,
    /// Numbers bounded to `[0, 255]`. No codec body yet.
    OneByte,
    /// Numbers bounded to `[0, 65535]`. No codec body yet.
    TwoByte,
    /// Numbers bounded to `[0, 16777215]`. No codec body yet.
    ThreeByte,
    /// Numbers bounded to `[0, 4294967295]`, stored as exactly 4 bytes
    /// big-endian.
    FourByte,
}

/// Fixed discriminant table; decode is a lookup over this, never a scan.
const ENCODINGS: [QualifierEncoding; 5] = [
    QualifierEncoding::NonEncoded,
    QualifierEncoding::OneByte,
    QualifierEncoding::TwoByte,
    QualifierEncoding::ThreeByte,
    QualifierEncoding::FourByte,
];

impl QualifierEncoding {
    /// Serialized discriminant byte (0-based).
    #[inline]
    pub const fn discriminant(self) -> u8 {
        match self {
            QualifierEncoding::NonEncoded => 0,
            QualifierEncoding::OneByte => 1,
            QualifierEncoding::TwoByte => 2,
            QualifierEncoding::ThreeByte => 3,
            QualifierEncoding::FourByte => 4,
        }
    }

    /// Decode a persisted discriminant byte.
    ///
    /// Qualifier encoding is identity-defining: without it no qualifier in
    /// the table can be interpreted, so an out-of-range byte aborts the
    /// snapshot load.
    pub fn from_discriminant(value: u8) -> Result<Self> {
        ENCODINGS
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidDiscriminant {
                kind: "qualifier encoding",
                value,
            })
    }

    /// Display name persisted as diagnostic metadata bytes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            QualifierEncoding::NonEncoded => "NON_ENCODED_QUALIFIERS",
            QualifierEncoding::OneByte => "ONE_BYTE_QUALIFIERS",
            QualifierEncoding::TwoByte => "TWO_BYTE_QUALIFIERS",
            QualifierEncoding::ThreeByte => "THREE_BYTE_QUALIFIERS",
            QualifierEncoding::FourByte => "FOUR_BYTE_QUALIFIERS",
        }
    }

    /// UTF-8 bytes of [`QualifierEncoding::name`].
    #[inline]
    pub const fn metadata_bytes(self) -> &'static [u8] {
        self.name().as_bytes()
    }

    /// Largest qualifier number this encoding can represent, `None` for the
    /// non-encoded scheme.
    #[inline]
    pub const fn max_qualifier(self) -> Option<u32> {
        match self {
            QualifierEncoding::NonEncoded => None,
            QualifierEncoding::OneByte => Some(0xFF),
            QualifierEncoding::TwoByte => Some(0xFFFF),
            QualifierEncoding::ThreeByte => Some(0xFF_FFFF),
            QualifierEncoding::FourByte => Some(u32::MAX),
        }
    }

    /// Whether column identities are numbers allocated by a counter.
    #[inline]
    pub fn is_numbered(self) -> bool {
        self != QualifierEncoding::NonEncoded
    }

    /// True iff `value` is within this encoding's representable range.
    ///
    /// Answered from the declared bounds, so capacity checks work even for
    /// widths whose codec body is unimplemented.
    pub fn is_encodeable(self, value: &QualifierValue) -> bool {
        match (self, value) {
            (QualifierEncoding::NonEncoded, QualifierValue::Name(_)) => true,
            (QualifierEncoding::NonEncoded, QualifierValue::Number(_)) => false,
            (_, QualifierValue::Name(_)) => false,
            (encoding, QualifierValue::Number(n)) => match encoding.max_qualifier() {
                Some(max) => *n <= max,
                None => false,
            },
        }
    }

    /// Encode a logical qualifier value into physical qualifier bytes.
    ///
    /// The non-encoded scheme yields the name's UTF-8 bytes; the four-byte
    /// scheme yields exactly 4 big-endian bytes. The one/two/three byte
    /// widths fail [`Error::Unsupported`], and a value of the wrong shape
    /// for the scheme fails [`Error::NotEncodeable`].
    pub fn encode(self, value: &QualifierValue) -> Result<Vec<u8>> {
        match self {
            QualifierEncoding::NonEncoded => match value {
                QualifierValue::Name(s) => Ok(s.as_bytes().to_vec()),
                QualifierValue::Number(n) => Err(Error::NotEncodeable(format!(
                    "non-encoded qualifiers store names, got number {n}"
                ))),
            },
            QualifierEncoding::FourByte => match value {
                QualifierValue::Number(n) => Ok(n.to_be_bytes().to_vec()),
                QualifierValue::Name(s) => Err(Error::NotEncodeable(format!(
                    "four-byte qualifiers store numbers, got name '{s}'"
                ))),
            },
            QualifierEncoding::OneByte
            | QualifierEncoding::TwoByte
            | QualifierEncoding::ThreeByte => Err(Error::Unsupported(self.name())),
        }
    }

    /// Decode physical qualifier bytes back into a logical value.
    ///
    /// Inverse of [`QualifierEncoding::encode`] for every value within the
    /// scheme's declared range.
    pub fn decode(self, bytes: &[u8]) -> Result<QualifierValue> {
        match self {
            QualifierEncoding::NonEncoded => {
                let name = std::str::from_utf8(bytes).map_err(|_| {
                    Error::CatalogError("qualifier bytes are not valid UTF-8".to_string())
                })?;
                Ok(QualifierValue::Name(name.to_string()))
            }
            QualifierEncoding::FourByte => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    Error::CatalogError(format!(
                        "four-byte qualifier must be exactly 4 bytes, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(QualifierValue::Number(u32::from_be_bytes(arr)))
            }
            QualifierEncoding::OneByte
            | QualifierEncoding::TwoByte
            | QualifierEncoding::ThreeByte => Err(Error::Unsupported(self.name())),
        }
    }

    /// Decode a qualifier embedded within a larger buffer.
    pub fn decode_range(self, bytes: &[u8], offset: usize, len: usize) -> Result<QualifierValue> {
        let end = offset.checked_add(len).ok_or_else(|| {
            Error::CatalogError("qualifier range overflows the buffer".to_string())
        })?;
        let slice = bytes.get(offset..end).ok_or_else(|| {
            Error::CatalogError(format!(
                "qualifier range {offset}..{end} out of bounds for {} bytes",
                bytes.len()
            ))
        })?;
        self.decode(slice)
    }
}

impl fmt::Display for QualifierEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
