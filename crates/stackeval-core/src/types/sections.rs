//! Section metadata and the display category derived from it.

use std::fmt;

/// Flags of one section, indexed by the same number symbols carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionFlags
{
    pub executable: bool,
    pub writable: bool,
    pub allocated: bool,
}

impl SectionFlags
{
    pub const TEXT: Self = Self {
        executable: true,
        writable: false,
        allocated: true,
    };
    pub const DATA: Self = Self {
        executable: false,
        writable: false,
        allocated: true,
    };
    pub const BSS: Self = Self {
        executable: false,
        writable: true,
        allocated: true,
    };
}

/// One section of the loaded binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo
{
    pub index: usize,
    pub name: String,
    pub address: u64,
    pub size: u64,
    pub flags: SectionFlags,
}

/// Section table indexed by section number; gaps hold default (no) flags.
#[derive(Debug, Clone, Default)]
pub struct Sections
{
    entries: Vec<Option<SectionInfo>>,
}

impl Sections
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Insert a section at its own index, growing the table as needed.
    pub fn insert(&mut self, section: SectionInfo)
    {
        let index = section.index;
        if self.entries.len() <= index {
            self.entries.resize(index + 1, None);
        }
        self.entries[index] = Some(section);
    }

    /// Build a table from bare flags, section `i` taking `flags[i]`.
    pub fn from_flags(flags: &[SectionFlags]) -> Self
    {
        let mut sections = Self::new();
        for (index, flags) in flags.iter().enumerate() {
            sections.insert(SectionInfo {
                index,
                name: String::new(),
                address: 0,
                size: 0,
                flags: *flags,
            });
        }
        sections
    }

    pub fn get(&self, index: usize) -> Option<&SectionInfo>
    {
        self.entries.get(index).and_then(Option::as_ref)
    }

    pub fn by_name(&self, name: &str) -> Option<&SectionInfo>
    {
        self.iter().find(|section| section.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionInfo>
    {
        self.entries.iter().flatten()
    }

    pub fn len(&self) -> usize
    {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }
}

/// Display category of a symbol reference, derived from its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolCategory
{
    /// Executable section, sized symbol.
    Text,
    /// Executable section, zero-length symbol (worth flagging on its own).
    TextZeroLength,
    /// Writable and allocated.
    Bss,
    /// Allocated only.
    Data,
    /// No such section, or no useful flags.
    Unknown,
}

impl SymbolCategory
{
    /// Categorize a symbol of `size` living in a section with `flags`.
    pub fn from_section(flags: Option<SectionFlags>, size: u64) -> Self
    {
        let Some(flags) = flags else {
            return SymbolCategory::Unknown;
        };
        match flags {
            SectionFlags { executable: true, .. } if size == 0 => SymbolCategory::TextZeroLength,
            SectionFlags { executable: true, .. } => SymbolCategory::Text,
            SectionFlags {
                writable: true,
                allocated: true,
                ..
            } => SymbolCategory::Bss,
            SectionFlags { allocated: true, .. } => SymbolCategory::Data,
            _ => SymbolCategory::Unknown,
        }
    }
}

impl fmt::Display for SymbolCategory
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolCategory::Text => ".text",
            SymbolCategory::TextZeroLength => ".text zero-length",
            SymbolCategory::Bss => ".bss",
            SymbolCategory::Data => ".data",
            SymbolCategory::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_category_precedence()
    {
        assert_eq!(
            SymbolCategory::from_section(Some(SectionFlags::TEXT), 16),
            SymbolCategory::Text
        );
        assert_eq!(
            SymbolCategory::from_section(Some(SectionFlags::TEXT), 0),
            SymbolCategory::TextZeroLength
        );
        assert_eq!(SymbolCategory::from_section(Some(SectionFlags::BSS), 0), SymbolCategory::Bss);
        assert_eq!(SymbolCategory::from_section(Some(SectionFlags::DATA), 4), SymbolCategory::Data);
        assert_eq!(
            SymbolCategory::from_section(Some(SectionFlags::default()), 4),
            SymbolCategory::Unknown
        );
        assert_eq!(SymbolCategory::from_section(None, 4), SymbolCategory::Unknown);
    }

    #[test]
    fn test_sections_fill_gaps()
    {
        let mut sections = Sections::new();
        sections.insert(SectionInfo {
            index: 3,
            name: ".bss".into(),
            address: 0x2000,
            size: 0x100,
            flags: SectionFlags::BSS,
        });
        assert!(sections.get(0).is_none());
        assert_eq!(sections.get(3).map(|s| s.flags), Some(SectionFlags::BSS));
        assert_eq!(sections.by_name(".bss").map(|s| s.index), Some(3));
        assert_eq!(sections.len(), 1);
    }
}
