//! Terminal output for listings, traces and lookups.

use std::io::{self, Write};

use crossterm::style::{Attribute, Attributes, Color, ContentStyle};
use stackeval_core::prelude::*;
use stackeval_core::render::{ByteRun, ListingRow};

/// Background/foreground pair for a category.
fn style_for(category: WordCategory) -> Option<ContentStyle>
{
    let (foreground, background) = match category {
        WordCategory::Symbol(SymbolCategory::TextZeroLength) => (Color::Red, Color::Yellow),
        WordCategory::Symbol(SymbolCategory::Text) => (Color::Black, Color::Yellow),
        WordCategory::Symbol(SymbolCategory::Data) => (Color::Black, Color::Green),
        WordCategory::Symbol(SymbolCategory::Bss) => (Color::White, Color::Green),
        WordCategory::Symbol(SymbolCategory::Unknown) => (Color::Cyan, Color::Blue),
        WordCategory::StackLocal => {
            return Some(ContentStyle {
                foreground_color: Some(Color::Blue),
                background_color: Some(Color::Black),
                attributes: Attributes::from(Attribute::Bold),
                ..ContentStyle::new()
            });
        }
        WordCategory::Raw => return None,
    };
    Some(ContentStyle {
        foreground_color: Some(foreground),
        background_color: Some(background),
        ..ContentStyle::new()
    })
}

pub struct Printer
{
    color: bool,
    width: WordWidth,
}

impl Printer
{
    pub fn new(color: bool, width: WordWidth) -> Self
    {
        Self { color, width }
    }

    fn paint(&self, category: WordCategory, text: &str) -> String
    {
        match style_for(category) {
            Some(style) if self.color => style.apply(text).to_string(),
            _ => text.to_string(),
        }
    }

    fn address(&self, address: Address) -> String
    {
        address.to_hex(self.width.hex_digits())
    }

    fn bytes(&self, out: &mut impl Write, run: &ByteRun) -> io::Result<()>
    {
        let bytes: Vec<String> = run.bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        writeln!(out, "{}:  {}", self.address(run.address), bytes.join(" "))
    }

    fn row(&self, out: &mut impl Write, row: &ListingRow) -> io::Result<()>
    {
        write!(out, "{}:  ", self.address(row.address))?;
        for word in &row.words {
            write!(out, "{}  ", self.paint(word.category(), &word.text(self.width)))?;
        }
        if !row.details.is_empty() {
            write!(out, "[{}]", row.details.join(" "))?;
        }
        writeln!(out)
    }

    pub fn listing(&self, out: &mut impl Write, listing: &Listing) -> io::Result<()>
    {
        if let Some(run) = &listing.leading {
            self.bytes(out, run)?;
        }
        for row in &listing.rows {
            self.row(out, row)?;
        }
        if let Some(run) = &listing.trailing {
            self.bytes(out, run)?;
        }
        self.ignored(out, &listing.ignored)
    }

    pub fn trace(&self, out: &mut impl Write, trace: &Trace) -> io::Result<()>
    {
        let digits = self.width.hex_digits();
        for event in &trace.events {
            match event {
                TraceEvent::Word(word) => {
                    write!(
                        out,
                        "{}:  {:0digits$x}  {}",
                        self.address(word.address),
                        word.value,
                        self.paint(word.category(), &word.text(self.width))
                    )?;
                    if let Some(detail) = word.detail() {
                        write!(out, "  {detail}")?;
                    }
                    writeln!(out)?;
                }
                TraceEvent::BlankStart(address) => {
                    writeln!(out, "{}:  blank stack begins", self.address(*address))?;
                }
                TraceEvent::BlankEnd(run) => {
                    writeln!(
                        out,
                        "{}:  blank stack ends, 0x{:x} bytes from {}",
                        self.address(run.end()),
                        run.length,
                        self.address(run.start)
                    )?;
                }
            }
        }
        if let Some(run) = &trace.unterminated_blank {
            writeln!(
                out,
                "blank stack never ended: 0x{:x} bytes from {}",
                run.length,
                self.address(run.start)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Frames:")?;
        for (i, frame) in trace.frames.iter().enumerate() {
            let locals = frame.words.iter().filter(|word| word.stack_relative).count();
            writeln!(
                out,
                "  #{i:<3} {}  {}  ({} words, {} stack-local)",
                self.address(frame.address),
                frame.caller.offset_string(frame.return_address),
                frame.words.len(),
                locals
            )?;
        }
        self.ignored(out, &trace.ignored)
    }

    pub fn ignored(&self, out: &mut impl Write, ignored: &IgnoredSymbols) -> io::Result<()>
    {
        if ignored.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        write!(out, "{ignored}")
    }

    pub fn legend(&self, out: &mut impl Write, entries: &[LegendEntry]) -> io::Result<()>
    {
        writeln!(out)?;
        writeln!(out, "Legend:")?;
        for entry in entries {
            writeln!(out, "\t{}", self.paint(entry.category, &entry.label))?;
        }
        Ok(())
    }

    pub fn lookup(&self, out: &mut impl Write, value: u64, hit: Option<(&Symbol, SymbolCategory)>) -> io::Result<()>
    {
        let address = self.address(Address::new(value));
        match hit {
            Some((symbol, category)) => writeln!(
                out,
                "{address}:  {}",
                self.paint(WordCategory::Symbol(category), &symbol.offset_string(value))
            ),
            None => writeln!(out, "{address}:  no symbol"),
        }
    }
}
