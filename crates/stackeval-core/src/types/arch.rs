//! Word geometry of the target: width and byte order.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StackevalError};

/// Size of a machine word in the dumped memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth
{
    /// 32-bit target, 4-byte words.
    Four,
    /// 64-bit target, 8-byte words.
    Eight,
}

impl WordWidth
{
    /// Bytes per display row. Both widths use 16-byte rows.
    pub const ROW_BYTES: u64 = 16;

    /// Width in bytes.
    pub const fn bytes(self) -> usize
    {
        match self {
            WordWidth::Four => 4,
            WordWidth::Eight => 8,
        }
    }

    /// Number of hex digits needed to print one word.
    pub const fn hex_digits(self) -> usize
    {
        self.bytes() * 2
    }

    /// Words grouped on one row of the flat listing.
    pub const fn words_per_row(self) -> usize
    {
        match self {
            WordWidth::Four => 4,
            WordWidth::Eight => 2,
        }
    }

    /// Build from a byte count (4 or 8).
    ///
    /// ## Errors
    ///
    /// Returns `InvalidArgument` for any other size.
    pub fn from_bytes(bytes: usize) -> Result<Self>
    {
        match bytes {
            4 => Ok(WordWidth::Four),
            8 => Ok(WordWidth::Eight),
            other => Err(StackevalError::InvalidArgument(format!(
                "unsupported word width {other}, expected 4 or 8"
            ))),
        }
    }
}

impl fmt::Display for WordWidth
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}-bit", self.bytes() * 8)
    }
}

/// Byte order used both to decode dump tokens and to read words back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder
{
    Big,
    Little,
}

impl ByteOrder
{
    /// Write the low `len` bytes of `value` (len is 1, 2, 4 or 8).
    pub(crate) fn put(self, value: u64, len: usize, out: &mut Vec<u8>)
    {
        let bytes = match self {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        };
        match self {
            ByteOrder::Big => out.extend_from_slice(&bytes[8 - len..]),
            ByteOrder::Little => out.extend_from_slice(&bytes[..len]),
        }
    }

    /// Read an unsigned integer from `bytes` (1 to 8 bytes long).
    pub fn read(self, bytes: &[u8]) -> u64
    {
        let fold = |acc: u64, byte: &u8| (acc << 8) | u64::from(*byte);
        match self {
            ByteOrder::Big => bytes.iter().fold(0, fold),
            ByteOrder::Little => bytes.iter().rev().fold(0, fold),
        }
    }
}

impl FromStr for ByteOrder
{
    type Err = StackevalError;

    fn from_str(s: &str) -> Result<Self>
    {
        match s.to_lowercase().as_str() {
            "big" | "be" => Ok(ByteOrder::Big),
            "little" | "le" => Ok(ByteOrder::Little),
            _ => Err(StackevalError::InvalidArgument(format!("unknown byte order: {s}"))),
        }
    }
}

impl fmt::Display for ByteOrder
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            ByteOrder::Big => "big-endian",
            ByteOrder::Little => "little-endian",
        };
        write!(f, "{label}")
    }
}

/// Architecture parameters taken from the binary's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchParams
{
    pub word_width: WordWidth,
    pub byte_order: ByteOrder,
}

impl ArchParams
{
    pub const fn new(word_width: WordWidth, byte_order: ByteOrder) -> Self
    {
        Self { word_width, byte_order }
    }
}

impl fmt::Display for ArchParams
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} {}", self.word_width, self.byte_order)
    }
}
