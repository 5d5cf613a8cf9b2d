//! Common module for library exports

pub use crate::classify::{Classification, IgnoredSymbols, WordCategory, WordClassifier};
pub use crate::config::AnalysisConfig;
pub use crate::dump::{AutoGrammar, DumpDecoder, DumpFormat, DumpGrammar, MemoryDump, MonitorGrammar, PhysAddrGrammar};
pub use crate::error::{Result, StackevalError, TokenError};
pub use crate::render::{legend, AddressWindow, BlankRun, DumpRenderer, LegendEntry, Listing, StackFrame, Trace, TraceEvent, WordEvent};
pub use crate::symbols::{ElfImage, ExtractionStats, SymbolFilter, SymbolTable};
pub use crate::types::{
    Address, ArchParams, ByteOrder, SectionFlags, SectionInfo, Sections, Symbol, SymbolCategory, SymbolKind, SymbolName, WordWidth,
};
