//! # Word classification
//!
//! Decides what a single word most likely is. In order of precedence:
//!
//! 1. a reference into a known symbol (sized symbols by strict containment,
//!    zero-size ones only within [`AnalysisConfig::max_unbounded_span`]),
//! 2. a pointer into the same stack, when the value is within
//!    [`AnalysisConfig::stack_local_threshold`] of the word's own address,
//! 3. an opaque value.
//!
//! A symbol match always wins, even when the value is also close to the
//! current address.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config::AnalysisConfig;
use crate::symbols::SymbolTable;
use crate::types::{Address, Sections, Symbol, SymbolCategory, WordWidth};

/// What a word was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification
{
    /// The word points `offset` bytes into `symbol`.
    SymbolRef
    {
        symbol: Arc<Symbol>,
        offset: u64,
        category: SymbolCategory,
    },
    /// The word points `offset` bytes away from its own address.
    StackLocal { offset: i64 },
    /// Nothing recognizable.
    Raw { value: u64 },
}

/// Category of a classification, for legends and colour selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordCategory
{
    Symbol(SymbolCategory),
    StackLocal,
    Raw,
}

impl Classification
{
    pub fn category(&self) -> WordCategory
    {
        match self {
            Classification::SymbolRef { category, .. } => WordCategory::Symbol(*category),
            Classification::StackLocal { .. } => WordCategory::StackLocal,
            Classification::Raw { .. } => WordCategory::Raw,
        }
    }

    pub fn symbol(&self) -> Option<&Arc<Symbol>>
    {
        match self {
            Classification::SymbolRef { symbol, .. } => Some(symbol),
            _ => None,
        }
    }

    /// Cell text for a word of `width`, padded to its hex-digit width.
    ///
    /// Symbols show their name, stack-local pointers `stk+XXXh`/`stk-XXXh`,
    /// everything else the zero-padded value.
    pub fn text(&self, width: WordWidth) -> String
    {
        let digits = width.hex_digits();
        match self {
            Classification::SymbolRef { symbol, .. } => {
                let name: String = symbol.name.display_name().chars().take(digits).collect();
                format!("{name:>digits$}")
            }
            Classification::StackLocal { offset } => {
                let sign = if *offset < 0 { '-' } else { '+' };
                let pad = digits.saturating_sub(5);
                format!("stk{sign}{:0pad$x}h", offset.unsigned_abs())
            }
            Classification::Raw { value } => format!("{value:0digits$x}"),
        }
    }
}

/// Zero-size symbols whose match was discarded, keyed by name.
///
/// Each entry remembers the last value that hit the symbol outside its
/// capped span. Threaded through a walk and reported once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoredSymbols
{
    entries: BTreeMap<String, (Arc<Symbol>, u64)>,
}

impl IgnoredSymbols
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn record(&mut self, symbol: &Arc<Symbol>, value: u64)
    {
        self.entries
            .insert(symbol.name.raw().to_string(), (Arc::clone(symbol), value));
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// `(symbol, last ignored value)` pairs ordered by symbol name.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Symbol>, u64)>
    {
        self.entries.values().map(|(symbol, value)| (symbol, *value))
    }

    /// One notice line per symbol.
    pub fn notices(&self) -> Vec<String>
    {
        self.iter()
            .map(|(symbol, value)| format!("Symbol last ignored at 0x{value:x}: {symbol}"))
            .collect()
    }
}

impl fmt::Display for IgnoredSymbols
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for notice in self.notices() {
            writeln!(f, "{notice}")?;
        }
        Ok(())
    }
}

/// Classifies words against a symbol table and section flags.
#[derive(Debug, Clone, Copy)]
pub struct WordClassifier<'a>
{
    symbols: &'a SymbolTable,
    sections: &'a Sections,
    config: &'a AnalysisConfig,
}

impl<'a> WordClassifier<'a>
{
    pub fn new(symbols: &'a SymbolTable, sections: &'a Sections, config: &'a AnalysisConfig) -> Self
    {
        Self {
            symbols,
            sections,
            config,
        }
    }

    pub fn config(&self) -> &'a AnalysisConfig
    {
        self.config
    }

    /// Symbol `value` refers to under the two-tier containment policy.
    ///
    /// A zero-size match outside the capped span is recorded in `ignored`.
    pub fn resolve(&self, value: u64, ignored: &mut IgnoredSymbols) -> Option<Arc<Symbol>>
    {
        let symbol = self.symbols.find(value)?;
        if symbol.contains(value) {
            return Some(symbol);
        }
        if symbol.contains_capped(value, self.config.max_unbounded_span) {
            return Some(symbol);
        }
        trace!("ignoring {} for 0x{value:x}", symbol.name);
        ignored.record(&symbol, value);
        None
    }

    /// Classify `word`, found at `current`.
    pub fn classify(&self, word: u64, current: Address, ignored: &mut IgnoredSymbols) -> Classification
    {
        if let Some(symbol) = self.resolve(word, ignored) {
            let flags = self.sections.get(symbol.section_index).map(|section| section.flags);
            let category = SymbolCategory::from_section(flags, symbol.size);
            return Classification::SymbolRef {
                offset: word - symbol.address,
                category,
                symbol,
            };
        }

        let distance = current.abs_diff(word);
        if distance < self.config.stack_local_threshold {
            // Bounded by the threshold, which keeps well inside i64.
            let magnitude = i64::try_from(distance).unwrap_or(i64::MAX);
            let offset = if word >= current.value() { magnitude } else { -magnitude };
            return Classification::StackLocal { offset };
        }

        Classification::Raw { value: word }
    }
}
