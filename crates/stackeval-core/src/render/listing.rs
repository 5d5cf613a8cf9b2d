//! Flat annotated listing.

use smallvec::SmallVec;
use tracing::debug;

use super::{AddressWindow, DumpRenderer, WordEvent};
use crate::classify::IgnoredSymbols;
use crate::dump::MemoryDump;
use crate::types::{Address, WordWidth};

/// Bytes that do not form a complete aligned word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRun
{
    pub address: Address,
    pub bytes: Vec<u8>,
}

/// Words sharing one 16-byte row, with the detail strings of any symbol
/// references among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow
{
    pub address: Address,
    pub words: SmallVec<[WordEvent; 4]>,
    pub details: SmallVec<[String; 4]>,
}

impl ListingRow
{
    fn new(address: Address) -> Self
    {
        Self {
            address,
            words: SmallVec::new(),
            details: SmallVec::new(),
        }
    }

    fn push(&mut self, event: WordEvent)
    {
        if let Some(detail) = event.detail() {
            self.details.push(detail);
        }
        self.words.push(event);
    }
}

/// Result of [`DumpRenderer::annotate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing
{
    pub word_width: WordWidth,
    /// Misaligned bytes before the first word.
    pub leading: Option<ByteRun>,
    pub rows: Vec<ListingRow>,
    /// Bytes after the last complete word.
    pub trailing: Option<ByteRun>,
    pub ignored: IgnoredSymbols,
}

impl Listing
{
    /// Every word event, in address order.
    pub fn words(&self) -> impl Iterator<Item = &WordEvent>
    {
        self.rows.iter().flat_map(|row| row.words.iter())
    }

    pub fn is_empty(&self) -> bool
    {
        self.rows.is_empty() && self.leading.is_none() && self.trailing.is_none()
    }
}

impl DumpRenderer<'_>
{
    /// Classify every word of `dump` inside `window` and group them into
    /// rows.
    ///
    /// The window is widened to whole 16-byte rows first. A row starts at
    /// every row-aligned address, so a dump with a misaligned base gets a
    /// short first row.
    pub fn annotate(&self, dump: &MemoryDump, window: AddressWindow) -> Listing
    {
        let snapped = window.snapped(WordWidth::ROW_BYTES);
        let mut ignored = IgnoredSymbols::new();
        let mut rows: Vec<ListingRow> = Vec::new();

        for (address, value) in Self::words_in(dump, window) {
            let starts_row = address.value() % WordWidth::ROW_BYTES == 0;
            if starts_row || rows.is_empty() {
                rows.push(ListingRow::new(address));
            }
            let event = self.event(address, value, &mut ignored);
            if let Some(row) = rows.last_mut() {
                row.push(event);
            }
        }

        let leading = Some(dump.leading_bytes())
            .filter(|bytes| !bytes.is_empty() && snapped.contains(dump.base_address()))
            .map(|bytes| ByteRun {
                address: dump.base_address(),
                bytes: bytes.to_vec(),
            });
        let (tail_address, tail) = dump.trailing_bytes();
        let trailing = Some(tail)
            .filter(|bytes| !bytes.is_empty() && snapped.contains(tail_address))
            .map(|bytes| ByteRun {
                address: tail_address,
                bytes: bytes.to_vec(),
            });

        debug!(
            "annotated {} rows, {} ignored zero-size symbols",
            rows.len(),
            ignored.len()
        );

        Listing {
            word_width: dump.word_width(),
            leading,
            rows,
            trailing,
            ignored,
        }
    }
}
