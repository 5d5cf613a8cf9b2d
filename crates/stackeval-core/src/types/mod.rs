//! # Types
//!
//! Plain data shared by the decoder, symbol table and renderer.

pub mod address;
pub mod arch;
pub mod sections;
pub mod symbols;

// Re-export all public types
pub use address::Address;
pub use arch::{ArchParams, ByteOrder, WordWidth};
pub use sections::{SectionFlags, SectionInfo, Sections, SymbolCategory};
pub use symbols::{Symbol, SymbolKind, SymbolLanguage, SymbolName};
