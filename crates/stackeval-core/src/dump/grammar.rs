//! Line grammars for the dump formats we know how to read.
//!
//! The decoder only asks two questions of a line: "does it restate an
//! absolute base address?" and "does it carry data?". Each tool format
//! answers them in its own [`DumpGrammar`] implementation.

use std::fmt;
use std::str::FromStr;

use crate::error::StackevalError;

/// A recognized data line: its address field and the raw token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLine<'a>
{
    pub offset: u64,
    pub tokens: &'a str,
}

/// One dump tool's line format.
pub trait DumpGrammar: Send + Sync
{
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Base address declared by an absolute-offset line.
    fn absolute_offset(&self, _line: &str) -> Option<u64>
    {
        None
    }

    /// Address field and token text of a data line.
    fn data_line<'a>(&self, line: &'a str) -> Option<DataLine<'a>>;

    /// Header line declaring `address` as the base, for formats that have one.
    fn format_absolute(&self, _address: u64) -> Option<String>
    {
        None
    }

    /// A data line at `offset` holding `tokens`.
    fn format_data(&self, offset: u64, tokens: &str) -> String;
}

/// Parse a hex address field, with or without a `0x` prefix.
fn parse_hex_field(field: &str) -> Option<u64>
{
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    if digits.is_empty() || digits.len() > 16 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Split `line` into an address field and the token text before any preview.
fn split_data_line<'a>(line: &'a str, previews: &[char]) -> Option<DataLine<'a>>
{
    let (field, rest) = line.trim_start().split_once(':')?;
    let offset = parse_hex_field(field)?;
    let tokens = rest.split(previews).next().unwrap_or(rest).trim();
    if tokens.is_empty() {
        return None;
    }
    Some(DataLine { offset, tokens })
}

/// Target-monitor memory display, e.g. a VxWorks shell `d` command:
///
/// ```text
/// 0x01549090:  00000000 00000000 ffffff1f ffffffff   *................*
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorGrammar;

impl DumpGrammar for MonitorGrammar
{
    fn name(&self) -> &'static str
    {
        "monitor"
    }

    fn data_line<'a>(&self, line: &'a str) -> Option<DataLine<'a>>
    {
        let trimmed = line.trim_start();
        if !(trimmed.starts_with("0x") || trimmed.starts_with("0X")) {
            return None;
        }
        split_data_line(trimmed, &['*'])
    }

    fn format_data(&self, offset: u64, tokens: &str) -> String
    {
        format!("0x{offset:08x}:  {tokens}")
    }
}

/// Offset-relative hex dump preceded by `Physaddr:` headers:
///
/// ```text
/// Physaddr:10867C000
/// 0000000000000000: 0001 0203 0405 0607 0809 0a0b 0c0d 0e0f  |........ ........|
/// ```
///
/// Data line offsets are relative to the first header's base. A later
/// header restates the running address and must match it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysAddrGrammar;

const PHYSADDR: &str = "physaddr:";

impl DumpGrammar for PhysAddrGrammar
{
    fn name(&self) -> &'static str
    {
        "physaddr"
    }

    fn absolute_offset(&self, line: &str) -> Option<u64>
    {
        let trimmed = line.trim();
        let head = trimmed.get(..PHYSADDR.len())?;
        if !head.eq_ignore_ascii_case(PHYSADDR) {
            return None;
        }
        parse_hex_field(trimmed[PHYSADDR.len()..].trim())
    }

    fn data_line<'a>(&self, line: &'a str) -> Option<DataLine<'a>>
    {
        split_data_line(line, &['|'])
    }

    fn format_absolute(&self, address: u64) -> Option<String>
    {
        Some(format!("Physaddr:{address:X}"))
    }

    fn format_data(&self, offset: u64, tokens: &str) -> String
    {
        format!("{offset:016x}: {tokens}")
    }
}

/// Accepts either format: `Physaddr:` headers, and data lines with or
/// without `0x`, previews delimited by `*` or `|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGrammar;

impl DumpGrammar for AutoGrammar
{
    fn name(&self) -> &'static str
    {
        "auto"
    }

    fn absolute_offset(&self, line: &str) -> Option<u64>
    {
        PhysAddrGrammar.absolute_offset(line)
    }

    fn data_line<'a>(&self, line: &'a str) -> Option<DataLine<'a>>
    {
        split_data_line(line, &['*', '|'])
    }

    fn format_data(&self, offset: u64, tokens: &str) -> String
    {
        MonitorGrammar.format_data(offset, tokens)
    }
}

/// Named selection of a grammar, for configuration and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat
{
    #[default]
    Auto,
    Monitor,
    PhysAddr,
}

impl DumpFormat
{
    pub fn grammar(self) -> Box<dyn DumpGrammar>
    {
        match self {
            DumpFormat::Auto => Box::new(AutoGrammar),
            DumpFormat::Monitor => Box::new(MonitorGrammar),
            DumpFormat::PhysAddr => Box::new(PhysAddrGrammar),
        }
    }
}

impl FromStr for DumpFormat
{
    type Err = StackevalError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DumpFormat::Auto),
            "monitor" | "vxworks" => Ok(DumpFormat::Monitor),
            "physaddr" | "phys" => Ok(DumpFormat::PhysAddr),
            _ => Err(StackevalError::InvalidArgument(format!(
                "unknown dump format: {s}. Use 'auto', 'monitor' or 'physaddr'"
            ))),
        }
    }
}

impl fmt::Display for DumpFormat
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.grammar().name())
    }
}
