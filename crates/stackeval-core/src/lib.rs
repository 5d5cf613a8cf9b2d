//! # stackeval-core
//!
//! Post-mortem analysis of raw memory dumps against an ELF symbol table.
//!
//! The pipeline has four stages:
//! - [`dump`]: decode a textual hex dump into a [`MemoryDump`]
//! - [`symbols`]: load symbols from an ELF image into a [`SymbolTable`]
//! - [`classify`]: decide what each word of the dump points at
//! - [`render`]: walk a dump as a flat listing or as a stack trace
//!
//! Every stage is offline. Nothing here reads live process memory.
//!
//! ```
//! use stackeval_core::prelude::*;
//!
//! let arch = ArchParams::new(WordWidth::Four, ByteOrder::Big);
//! let dump = DumpDecoder::new(MonitorGrammar, arch)
//!     .decode_str("0x00001000:  00001004 deadbeef 00002000 00000000\n")
//!     .unwrap();
//!
//! let symbols: SymbolTable = [Symbol::new("main", 0x2000, 0x40, 1, SymbolKind::Function)]
//!     .into_iter()
//!     .collect();
//! let sections = Sections::from_flags(&[SectionFlags::default(), SectionFlags::TEXT]);
//! let config = AnalysisConfig::default();
//!
//! let renderer = DumpRenderer::new(WordClassifier::new(&symbols, &sections, &config));
//! let trace = renderer.trace(&dump, AddressWindow::ALL);
//! assert_eq!(trace.frames.len(), 1);
//! assert_eq!(trace.blank_runs.len(), 1);
//! ```

pub mod classify;
pub mod config;
pub mod dump;
pub mod error;
pub mod prelude;
pub mod render;
pub mod symbols;
pub mod types;

pub use classify::{Classification, IgnoredSymbols, WordCategory, WordClassifier};
pub use config::AnalysisConfig;
pub use dump::{DumpDecoder, DumpFormat, MemoryDump};
pub use error::{Result, StackevalError, TokenError};
pub use render::{AddressWindow, DumpRenderer, Listing, Trace};
pub use symbols::{ElfImage, SymbolFilter, SymbolTable};
