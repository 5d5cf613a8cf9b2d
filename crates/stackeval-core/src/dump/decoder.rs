//! Text-to-bytes decoding of a whole dump.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace};

use super::codec::decode_tokens;
use super::grammar::{DataLine, DumpGrammar};
use super::MemoryDump;
use crate::error::{Result, StackevalError};
use crate::types::{Address, ArchParams};

/// Incremental dump assembly with address continuity checks.
///
/// Lines are fed in order; each one must start exactly where the previous
/// one ended. Once an absolute-offset line has been seen, data line offsets
/// are relative to the first declared base.
///
/// A line whose first word is partial (fewer digits than the others on the
/// previous line) is taken at face value as a short word. If the next line
/// is misaligned as well the expected address drifts from the device's and
/// the continuity check fires on that line.
#[derive(Debug)]
pub struct DumpBuilder
{
    arch: ArchParams,
    absolute: bool,
    start: Option<u64>,
    next: u64,
    bytes: Vec<u8>,
}

impl DumpBuilder
{
    pub fn new(arch: ArchParams) -> Self
    {
        Self {
            arch,
            absolute: false,
            start: None,
            next: 0,
            bytes: Vec::new(),
        }
    }

    /// Address the next line is expected to start at.
    pub fn next_address(&self) -> Option<u64>
    {
        self.start.map(|_| self.next)
    }

    /// Handle an absolute-offset line declaring `offset` on line `line`.
    ///
    /// ## Errors
    ///
    /// `AddressContinuity` if a base is already known and `offset` is not
    /// the next expected address.
    pub fn absolute_offset(&mut self, line: usize, offset: u64) -> Result<()>
    {
        if self.start.is_none() {
            self.start = Some(offset);
            self.next = offset;
            self.absolute = true;
        } else if self.next != offset {
            return Err(StackevalError::AddressContinuity {
                line,
                expected: self.next,
                actual: offset,
            });
        }
        Ok(())
    }

    /// Handle a data line at `offset` carrying `tokens`.
    ///
    /// ## Errors
    ///
    /// `AddressContinuity` when the line does not continue the dump,
    /// `TokenWidth` / `Encoding` when its tokens cannot be converted.
    pub fn data(&mut self, line: usize, offset: u64, tokens: &str) -> Result<()>
    {
        match self.start {
            None => {
                // No base declared yet: take this offset as absolute.
                self.start = Some(offset);
                self.next = offset;
            }
            Some(start) => {
                let actual = if self.absolute { start.wrapping_add(offset) } else { offset };
                if actual != self.next {
                    return Err(StackevalError::AddressContinuity {
                        line,
                        expected: self.next,
                        actual,
                    });
                }
            }
        }

        let line_bytes =
            decode_tokens(tokens, self.arch.byte_order).map_err(|err| StackevalError::from_token(line, err))?;
        self.next = self.next.wrapping_add(line_bytes.len() as u64);
        self.bytes.extend_from_slice(&line_bytes);
        Ok(())
    }

    /// Assemble the dump. An input without data yields an empty dump at 0.
    pub fn finish(self) -> MemoryDump
    {
        MemoryDump::new(Address::new(self.start.unwrap_or(0)), self.bytes, self.arch)
    }
}

/// Grammar-pluggable decoder producing a [`MemoryDump`].
///
/// ## Example
///
/// ```rust
/// use stackeval_core::dump::{DumpDecoder, MonitorGrammar};
/// use stackeval_core::types::{ArchParams, ByteOrder, WordWidth};
///
/// let decoder = DumpDecoder::new(MonitorGrammar, ArchParams::new(WordWidth::Four, ByteOrder::Big));
/// let dump = decoder.decode_str("0x00001000:  deadbeef 00000000   *................*\n").unwrap();
/// assert_eq!(dump.word_at(0x1000u64.into()), Some(0xdead_beef));
/// ```
pub struct DumpDecoder
{
    grammar: Box<dyn DumpGrammar>,
    arch: ArchParams,
    strict: bool,
}

impl DumpDecoder
{
    pub fn new(grammar: impl DumpGrammar + 'static, arch: ArchParams) -> Self
    {
        Self::with_grammar(Box::new(grammar), arch)
    }

    pub fn with_grammar(grammar: Box<dyn DumpGrammar>, arch: ArchParams) -> Self
    {
        Self {
            grammar,
            arch,
            strict: false,
        }
    }

    /// Reject unrecognized non-blank lines instead of skipping them.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self
    {
        self.strict = strict;
        self
    }

    pub fn arch(&self) -> ArchParams
    {
        self.arch
    }

    /// Decode every line of `reader`.
    ///
    /// Lines are read as bytes and converted lossily, so stray non-UTF-8
    /// bytes in a preview column do not abort the load.
    ///
    /// ## Errors
    ///
    /// The first fatal line error (see [`DumpBuilder`]), `Format` for an
    /// unrecognized line in strict mode, or `Io` from the reader.
    pub fn decode<R: BufRead>(&self, mut reader: R) -> Result<MemoryDump>
    {
        let mut builder = DumpBuilder::new(self.arch);
        let mut buf = Vec::new();
        let mut line_num = 0;
        let mut data_lines = 0usize;
        let mut skipped = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);

            if let Some(offset) = self.grammar.absolute_offset(line) {
                builder.absolute_offset(line_num, offset)?;
            } else if let Some(DataLine { offset, tokens }) = self.grammar.data_line(line) {
                builder.data(line_num, offset, tokens)?;
                data_lines += 1;
            } else if self.strict && !line.trim().is_empty() {
                return Err(StackevalError::Format {
                    line: line_num,
                    text: line.to_string(),
                });
            } else {
                trace!(line = line_num, "skipping {line:?}");
                skipped += 1;
            }
        }

        let dump = builder.finish();
        debug!(
            grammar = self.grammar.name(),
            data_lines,
            skipped,
            bytes = dump.len(),
            "decoded dump at {}",
            dump.base_address()
        );
        Ok(dump)
    }

    /// Decode an in-memory dump.
    ///
    /// ## Errors
    ///
    /// Same as [`DumpDecoder::decode`].
    pub fn decode_str(&self, text: &str) -> Result<MemoryDump>
    {
        self.decode(text.as_bytes())
    }

    /// Open and decode the dump file at `path`.
    ///
    /// ## Errors
    ///
    /// `Io` if the file cannot be opened, otherwise as [`DumpDecoder::decode`].
    pub fn decode_file(&self, path: &Path) -> Result<MemoryDump>
    {
        let file = File::open(path)?;
        self.decode(BufReader::new(file))
    }
}
