//! Symbol types.

use std::fmt;

use once_cell::sync::OnceCell;

/// Programming language guessed from a symbol's mangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolLanguage
{
    /// Rust symbol (v0 or legacy mangling).
    Rust,
    /// C++ symbol (Itanium mangling without Rust extensions).
    Cpp,
    /// C symbol or unmangled global.
    C,
}

impl fmt::Display for SymbolLanguage
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolLanguage::Rust => "rust",
            SymbolLanguage::Cpp => "c++",
            SymbolLanguage::C => "c",
        };
        write!(f, "{label}")
    }
}

/// A linkage name with lazily computed demangling.
///
/// Firmware images routinely carry tens of thousands of symbols while a dump
/// only ever references a handful, so demangling waits until a name is shown.
#[derive(Debug, Clone)]
pub struct SymbolName
{
    raw: String,
    demangled: OnceCell<Option<String>>,
}

impl SymbolName
{
    /// Construct from a raw linkage name.
    pub fn new(raw: impl Into<String>) -> Self
    {
        Self {
            raw: raw.into(),
            demangled: OnceCell::new(),
        }
    }

    /// Raw (mangled) name emitted in the object file.
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Demangled human-friendly name if the raw name was mangled.
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled
            .get_or_init(|| crate::symbols::demangle::demangle(&self.raw))
            .as_deref()
    }

    /// Preferred presentation (demangled, falling back to raw).
    pub fn display_name(&self) -> &str
    {
        self.demangled().unwrap_or(&self.raw)
    }

    /// Language classification for the symbol.
    pub fn language(&self) -> SymbolLanguage
    {
        crate::symbols::demangle::language_of(&self.raw)
    }
}

impl PartialEq for SymbolName
{
    fn eq(&self, other: &Self) -> bool
    {
        self.raw == other.raw
    }
}

impl Eq for SymbolName {}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.display_name())
    }
}

/// Kind of symbol worth indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind
{
    /// Function / code symbol (`STT_FUNC`).
    Function,
    /// Data object symbol (`STT_OBJECT`).
    Object,
}

impl fmt::Display for SymbolKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Object => write!(f, "object"),
        }
    }
}

/// A named, address-anchored entity from a binary's symbol table.
///
/// `size == 0` means the extent is unknown; see [`Symbol::contains_capped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol
{
    pub name: SymbolName,
    pub address: u64,
    pub size: u64,
    pub section_index: usize,
    pub kind: SymbolKind,
}

impl Symbol
{
    pub fn new(name: impl Into<String>, address: u64, size: u64, section_index: usize, kind: SymbolKind) -> Self
    {
        Self {
            name: SymbolName::new(name),
            address,
            size,
            section_index,
            kind,
        }
    }

    /// Whether the symbol has no recorded size.
    pub fn is_unbounded(&self) -> bool
    {
        self.size == 0
    }

    /// Strict containment: `address <= value < address + size`.
    ///
    /// Always false for unbounded symbols.
    pub fn contains(&self, value: u64) -> bool
    {
        value >= self.address && value - self.address < self.size
    }

    /// Containment with unbounded symbols capped at `max_span` bytes.
    ///
    /// Sized symbols behave exactly like [`Symbol::contains`].
    pub fn contains_capped(&self, value: u64, max_span: u64) -> bool
    {
        let span = if self.is_unbounded() { max_span } else { self.size };
        value >= self.address && value - self.address < span
    }

    /// `name{0xADDR + 0xOFFSET = 0xVALUE}` for a value inside this symbol.
    pub fn offset_string(&self, value: u64) -> String
    {
        format!(
            "{}{{0x{:x} + 0x{:x} = 0x{:x}}}",
            self.name,
            self.address,
            value.wrapping_sub(self.address),
            value
        )
    }
}

impl fmt::Display for Symbol
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            f,
            "{} @0x{:x} size {} ({}, section {})",
            self.name, self.address, self.size, self.kind, self.section_index
        )
    }
}
