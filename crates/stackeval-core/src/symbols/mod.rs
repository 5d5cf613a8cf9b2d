//! # Symbols
//!
//! The address-indexed symbol registry and the ELF extraction that fills it.
//!
//! [`SymbolTable`] is append-then-query: symbols are added in any order, and
//! the first lookup after a mutation sorts them by address. Lookup is
//! nearest-below with size-aware containment, plus the "unbounded tail"
//! convention for zero-size symbols (see [`SymbolTable::find`]).

pub(crate) mod demangle;
pub mod extractor;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use extractor::{ElfImage, ExtractionStats, SymbolFilter};

use crate::types::Symbol;

#[derive(Debug, Default)]
struct Inner
{
    sorted: bool,
    symbols: Vec<Arc<Symbol>>,
}

impl Inner
{
    fn ensure_sorted(&mut self)
    {
        if !self.sorted {
            // Stable: equal addresses keep insertion order.
            self.symbols.sort_by_key(|symbol| symbol.address);
            self.sorted = true;
        }
    }
}

/// Address-indexed registry of known symbols.
///
/// Not keyed uniquely by address: degenerate inputs may carry several
/// symbols at one value, and all of them are kept.
///
/// ## Thread Safety
///
/// Insertion and the sort triggered by the first lookup share one mutex, so
/// the table can be filled from several threads and queried afterwards.
#[derive(Debug, Default)]
pub struct SymbolTable
{
    inner: Mutex<Inner>,
}

impl SymbolTable
{
    /// Create a new empty symbol table.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner>
    {
        // A panic elsewhere cannot leave the vector half-built.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a symbol; the sort cache becomes stale.
    pub fn add(&self, symbol: Symbol)
    {
        let mut inner = self.lock();
        inner.sorted = false;
        inner.symbols.push(Arc::new(symbol));
    }

    /// Nearest symbol at or below `address` that contains it.
    ///
    /// Finds the greatest symbol with `symbol.address <= address` (the last
    /// added one on ties) and returns it when `address` falls inside its size
    /// **or** its size is zero. A zero-size symbol therefore matches every
    /// address above it up to the next symbol; callers that mind the false
    /// positives apply [`Symbol::contains_capped`].
    ///
    /// ## Complexity
    ///
    /// O(n log n) on the first lookup after a mutation, O(log n) afterwards.
    pub fn find(&self, address: u64) -> Option<Arc<Symbol>>
    {
        let mut inner = self.lock();
        inner.ensure_sorted();

        let upper = inner.symbols.partition_point(|symbol| symbol.address <= address);
        let candidate = inner.symbols.get(upper.checked_sub(1)?)?;
        if candidate.contains(address) || candidate.is_unbounded() {
            Some(Arc::clone(candidate))
        } else {
            None
        }
    }

    /// Number of symbols held.
    pub fn len(&self) -> usize
    {
        self.lock().symbols.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    /// Snapshot of all symbols, sorted by address.
    pub fn sorted(&self) -> Vec<Arc<Symbol>>
    {
        let mut inner = self.lock();
        inner.ensure_sorted();
        inner.symbols.clone()
    }
}

impl FromIterator<Symbol> for SymbolTable
{
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self
    {
        let table = SymbolTable::new();
        for symbol in iter {
            table.add(symbol);
        }
        table
    }
}
