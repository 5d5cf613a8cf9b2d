//! ELF symbol and section extraction.
//!
//! Reads the binary with the `object` crate and turns it into the three
//! inputs the rest of the crate needs: a [`SymbolTable`], a [`Sections`]
//! table indexed like the symbols' section numbers, and [`ArchParams`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use object::{Object, ObjectSection, ObjectSymbol};
use tracing::{debug, info};

use super::SymbolTable;
use crate::error::Result;
use crate::types::{ArchParams, ByteOrder, SectionFlags, SectionInfo, Sections, Symbol, SymbolKind, WordWidth};

/// Names dropped before indexing.
///
/// Some firmware images define function/object symbols at values that show
/// up constantly in raw memory (0, fill patterns, small offsets). Matching
/// them would paint half the dump, so they are excluded up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFilter
{
    pub excluded_prefixes: Vec<String>,
    pub excluded_names: Vec<String>,
}

impl Default for SymbolFilter
{
    fn default() -> Self
    {
        Self {
            excluded_prefixes: vec!["_vx_offset".to_string()],
            excluded_names: vec!["cpuPwrIntEnterHook".to_string()],
        }
    }
}

impl SymbolFilter
{
    /// A filter that keeps everything.
    pub fn none() -> Self
    {
        Self {
            excluded_prefixes: Vec::new(),
            excluded_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self
    {
        self.excluded_names.push(name.into());
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self
    {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool
    {
        self.excluded_names.iter().any(|excluded| excluded == name)
            || self.excluded_prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Counters collected while extracting symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats
{
    /// Every symbol seen, keyed by the object file's kind label.
    pub seen_by_kind: BTreeMap<String, usize>,
    /// Symbols accepted into the table, by kind.
    pub loaded_by_kind: BTreeMap<SymbolKind, usize>,
    /// Symbols accepted into the table, by section index.
    pub loaded_by_section: BTreeMap<usize, usize>,
    /// Names removed by the [`SymbolFilter`].
    pub excluded: Vec<String>,
}

impl ExtractionStats
{
    pub fn loaded(&self) -> usize
    {
        self.loaded_by_kind.values().sum()
    }
}

impl fmt::Display for ExtractionStats
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        writeln!(f, "Symbol kind / seen:")?;
        for (kind, count) in &self.seen_by_kind {
            writeln!(f, "  {kind:<10} {count}")?;
        }
        writeln!(f, "Symbol kind / loaded:")?;
        for (kind, count) in &self.loaded_by_kind {
            writeln!(f, "  {:<10} {count}", kind.to_string())?;
        }
        writeln!(f, "Section / symbols loaded:")?;
        for (section, count) in &self.loaded_by_section {
            writeln!(f, "  {section:<10} {count}")?;
        }
        if !self.excluded.is_empty() {
            writeln!(f, "Excluded: {}", self.excluded.join(", "))?;
        }
        Ok(())
    }
}

/// Everything pulled out of one binary.
#[derive(Debug)]
pub struct ElfImage
{
    pub symbols: SymbolTable,
    pub sections: Sections,
    pub arch: ArchParams,
    pub stats: ExtractionStats,
}

impl ElfImage
{
    /// Read and parse the binary at `path`.
    ///
    /// ## Errors
    ///
    /// `Io` if the file cannot be read, `Elf` if it is not an object file.
    pub fn load(path: &Path, filter: &SymbolFilter) -> Result<Self>
    {
        info!("Processing binary {}", path.display());
        let data = fs::read(path)?;
        Self::parse(&data, filter)
    }

    /// Parse an in-memory binary.
    ///
    /// ## Errors
    ///
    /// Returns `Elf` if the bytes are not a supported object file.
    pub fn parse(data: &[u8], filter: &SymbolFilter) -> Result<Self>
    {
        let file = object::File::parse(data)?;

        let arch = ArchParams::new(
            if file.is_64() { WordWidth::Eight } else { WordWidth::Four },
            if file.is_little_endian() { ByteOrder::Little } else { ByteOrder::Big },
        );

        let sections = read_sections(&file);
        for name in [".text", ".data", ".bss"] {
            match sections.by_name(name) {
                Some(section) => info!("Section {name} index {}", section.index),
                None => info!("No section {name}"),
            }
        }

        let symbols = SymbolTable::new();
        let mut stats = ExtractionStats::default();

        let mut source: Vec<_> = file.symbols().collect();
        if source.is_empty() {
            debug!("No static symbol table, falling back to dynamic symbols");
            source = file.dynamic_symbols().collect();
        }

        for (i, symbol) in source.iter().enumerate() {
            let object_kind = symbol.kind();
            *stats.seen_by_kind.entry(format!("{object_kind:?}")).or_default() += 1;

            let kind = match object_kind {
                object::SymbolKind::Text => SymbolKind::Function,
                object::SymbolKind::Data => SymbolKind::Object,
                // Don't care.
                object::SymbolKind::File | object::SymbolKind::Section | object::SymbolKind::Unknown => continue,
                other => {
                    debug!("Ignoring symbol #{i} of kind {other:?}");
                    continue;
                }
            };

            let Ok(name) = symbol.name() else {
                debug!("Ignoring symbol #{i} with unreadable name");
                continue;
            };
            let section_index = symbol.section_index().map_or(0, |index| index.0);

            if filter.is_excluded(name) {
                info!("Ignoring symbol #{i} {name} section {section_index} kind {kind}");
                stats.excluded.push(name.to_string());
                continue;
            }

            *stats.loaded_by_kind.entry(kind).or_default() += 1;
            *stats.loaded_by_section.entry(section_index).or_default() += 1;
            symbols.add(Symbol::new(name, symbol.address(), symbol.size(), section_index, kind));
        }

        info!(
            loaded = stats.loaded(),
            excluded = stats.excluded.len(),
            sections = sections.len(),
            "Loaded symbols ({arch})"
        );
        debug!("{stats}");

        Ok(Self {
            symbols,
            sections,
            arch,
            stats,
        })
    }
}

fn read_sections(file: &object::File<'_>) -> Sections
{
    let mut sections = Sections::new();
    for section in file.sections() {
        let flags = match section.flags() {
            object::SectionFlags::Elf { sh_flags } => SectionFlags {
                executable: sh_flags & u64::from(object::elf::SHF_EXECINSTR) != 0,
                writable: sh_flags & u64::from(object::elf::SHF_WRITE) != 0,
                allocated: sh_flags & u64::from(object::elf::SHF_ALLOC) != 0,
            },
            _ => section_flags_from_kind(section.kind()),
        };
        sections.insert(SectionInfo {
            index: section.index().0,
            name: section.name().unwrap_or_default().to_string(),
            address: section.address(),
            size: section.size(),
            flags,
        });
    }
    sections
}

/// Best effort for non-ELF inputs, which carry no `sh_flags`.
fn section_flags_from_kind(kind: object::SectionKind) -> SectionFlags
{
    match kind {
        object::SectionKind::Text => SectionFlags::TEXT,
        object::SectionKind::Data | object::SectionKind::UninitializedData => SectionFlags::BSS,
        object::SectionKind::ReadOnlyData | object::SectionKind::ReadOnlyString => SectionFlags::DATA,
        _ => SectionFlags::default(),
    }
}
