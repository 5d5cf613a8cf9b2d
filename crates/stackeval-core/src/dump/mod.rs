//! # Memory dumps
//!
//! [`MemoryDump`] is the decoded form of a textual dump: a contiguous byte
//! buffer, the address of its first byte, and the word geometry needed to
//! read it back. [`DumpDecoder`] builds one from text using a
//! [`DumpGrammar`] for the tool that produced it.

pub mod codec;
pub mod decoder;
pub mod grammar;

pub use decoder::{DumpBuilder, DumpDecoder};
pub use grammar::{AutoGrammar, DataLine, DumpFormat, DumpGrammar, MonitorGrammar, PhysAddrGrammar};

use crate::error::{Result, StackevalError};
use crate::types::{Address, ArchParams, ByteOrder, WordWidth};

/// Contiguous bytes starting at a known address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDump
{
    base: Address,
    bytes: Vec<u8>,
    arch: ArchParams,
}

impl MemoryDump
{
    pub fn new(base: Address, bytes: Vec<u8>, arch: ArchParams) -> Self
    {
        Self { base, bytes, arch }
    }

    pub fn base_address(&self) -> Address
    {
        self.base
    }

    /// One past the last byte.
    pub fn end_address(&self) -> Address
    {
        self.base + self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8]
    {
        &self.bytes
    }

    pub fn len(&self) -> usize
    {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.bytes.is_empty()
    }

    pub fn arch(&self) -> ArchParams
    {
        self.arch
    }

    pub fn word_width(&self) -> WordWidth
    {
        self.arch.word_width
    }

    pub fn byte_order(&self) -> ByteOrder
    {
        self.arch.byte_order
    }

    /// Full word stored at `address`, if the dump covers all of its bytes.
    pub fn word_at(&self, address: Address) -> Option<u64>
    {
        let start = usize::try_from(address.value().checked_sub(self.base.value())?).ok()?;
        let end = start.checked_add(self.word_width().bytes())?;
        self.bytes.get(start..end).map(|bytes| self.byte_order().read(bytes))
    }

    /// Byte offset of the first word-aligned address in the buffer.
    pub fn first_word_offset(&self) -> usize
    {
        let width = self.word_width().bytes() as u64;
        let misalignment = self.base.value() % width;
        let skip = if misalignment == 0 { 0 } else { width - misalignment };
        // `skip < 8`, so the cast is lossless.
        (skip as usize).min(self.bytes.len())
    }

    /// Bytes before the first aligned word.
    pub fn leading_bytes(&self) -> &[u8]
    {
        &self.bytes[..self.first_word_offset()]
    }

    /// Bytes after the last complete aligned word, with their address.
    pub fn trailing_bytes(&self) -> (Address, &[u8])
    {
        let first = self.first_word_offset();
        let width = self.word_width().bytes();
        let whole = (self.bytes.len() - first) / width * width;
        let start = first + whole;
        (self.base + start as u64, &self.bytes[start..])
    }

    /// Every complete aligned word, in address order.
    pub fn words(&self) -> impl Iterator<Item = (Address, u64)> + '_
    {
        let first = self.first_word_offset();
        let width = self.word_width().bytes();
        let order = self.byte_order();
        self.bytes[first..]
            .chunks_exact(width)
            .enumerate()
            .map(move |(i, chunk)| (self.base + (first + i * width) as u64, order.read(chunk)))
    }

    /// Re-serialize the dump in `grammar`'s format.
    ///
    /// Tokens are `token_bytes` wide and lines carry `bytes_per_line` bytes.
    /// Decoding the result with the same grammar and byte order gives back
    /// this dump: a trailing remainder that could not be written as one
    /// shorter token goes on its own line as single bytes.
    ///
    /// ## Errors
    ///
    /// `InvalidArgument` unless `token_bytes` is 1, 2, 4 or 8 and
    /// `bytes_per_line` is a non-zero multiple of it.
    pub fn to_text(&self, grammar: &dyn DumpGrammar, token_bytes: usize, bytes_per_line: usize) -> Result<String>
    {
        if !matches!(token_bytes, 1 | 2 | 4 | 8) || bytes_per_line == 0 || bytes_per_line % token_bytes != 0 {
            return Err(StackevalError::InvalidArgument(format!(
                "cannot write {token_bytes}-byte tokens in {bytes_per_line}-byte lines"
            )));
        }

        let mut out = String::new();
        let header = grammar.format_absolute(self.base.value());
        let relative = header.is_some();
        if let Some(header) = header {
            out.push_str(&header);
            out.push('\n');
        }

        let mut push_line = |address: Address, bytes: &[u8], width: usize| {
            let offset = if relative { address - self.base } else { address.value() };
            let tokens = codec::encode_tokens(bytes, width, self.byte_order()).join(" ");
            out.push_str(&grammar.format_data(offset, &tokens));
            out.push('\n');
        };

        for (i, line) in self.bytes.chunks(bytes_per_line).enumerate() {
            let address = self.base + (i * bytes_per_line) as u64;
            let remainder = line.len() % token_bytes;
            if remainder == 0 || remainder.is_power_of_two() {
                push_line(address, line, token_bytes);
            } else {
                let whole = line.len() - remainder;
                if whole > 0 {
                    push_line(address, &line[..whole], token_bytes);
                }
                push_line(address + whole as u64, &line[whole..], 1);
            }
        }

        Ok(out)
    }
}
