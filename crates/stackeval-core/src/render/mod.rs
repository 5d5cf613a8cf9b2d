//! # Rendering
//!
//! Walks a [`MemoryDump`] word by word and classifies every word inside an
//! [`AddressWindow`]. Two walks exist:
//!
//! - [`DumpRenderer::annotate`]: a flat listing grouped into 16-byte rows
//! - [`DumpRenderer::trace`]: one entry per word plus linear frame
//!   reconstruction and blank-stack detection
//!
//! Neither walk fails. Output is data for a printer; no terminal escapes
//! are produced here.

pub mod listing;
pub mod trace;
pub mod window;

pub use listing::{ByteRun, Listing, ListingRow};
pub use trace::{BlankRun, FrameWord, StackFrame, Trace, TraceEvent};
pub use window::AddressWindow;

use crate::classify::{Classification, IgnoredSymbols, WordCategory, WordClassifier};
use crate::config::AnalysisConfig;
use crate::dump::MemoryDump;
use crate::types::{Address, SymbolCategory, WordWidth};

/// One classified word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEvent
{
    pub address: Address,
    pub value: u64,
    pub classification: Classification,
}

impl WordEvent
{
    pub fn category(&self) -> WordCategory
    {
        self.classification.category()
    }

    /// Cell text, see [`Classification::text`].
    pub fn text(&self, width: WordWidth) -> String
    {
        self.classification.text(width)
    }

    /// `name{0xADDR + 0xOFFSET = 0xVALUE}` for symbol references.
    pub fn detail(&self) -> Option<String>
    {
        self.classification.symbol().map(|symbol| symbol.offset_string(self.value))
    }
}

/// Walks dumps with a fixed classifier.
#[derive(Debug, Clone, Copy)]
pub struct DumpRenderer<'a>
{
    classifier: WordClassifier<'a>,
}

impl<'a> DumpRenderer<'a>
{
    pub fn new(classifier: WordClassifier<'a>) -> Self
    {
        Self { classifier }
    }

    pub fn classifier(&self) -> &WordClassifier<'a>
    {
        &self.classifier
    }

    /// Complete aligned words of `dump` inside `window`, snapped to rows.
    fn words_in<'d>(dump: &'d MemoryDump, window: AddressWindow) -> impl Iterator<Item = (Address, u64)> + 'd
    {
        let window = window.snapped(WordWidth::ROW_BYTES);
        dump.words()
            .skip_while(move |(address, _)| *address < window.lower())
            .take_while(move |(address, _)| window.contains(*address))
    }

    fn event(&self, address: Address, value: u64, ignored: &mut IgnoredSymbols) -> WordEvent
    {
        WordEvent {
            address,
            value,
            classification: self.classifier.classify(value, address, ignored),
        }
    }
}

/// One line of the legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry
{
    pub category: WordCategory,
    pub label: String,
}

/// Describe every category a walk can produce.
pub fn legend(config: &AnalysisConfig) -> Vec<LegendEntry>
{
    let symbol = |category: SymbolCategory| LegendEntry {
        category: WordCategory::Symbol(category),
        label: category.to_string(),
    };
    vec![
        symbol(SymbolCategory::TextZeroLength),
        symbol(SymbolCategory::Text),
        symbol(SymbolCategory::Data),
        symbol(SymbolCategory::Bss),
        symbol(SymbolCategory::Unknown),
        LegendEntry {
            category: WordCategory::StackLocal,
            label: format!("local pointer, within {}", config.stack_local_threshold),
        },
        LegendEntry {
            category: WordCategory::Raw,
            label: "raw value".to_string(),
        },
    ]
}
