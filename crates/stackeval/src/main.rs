mod printer;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use stackeval_core::prelude::*;
use stackeval_utils::{info, init_logging, init_logging_with_level, LogFormat, LogLevel};

use crate::printer::Printer;

/// Annotate raw memory and stack dumps with symbols from an ELF binary.
#[derive(Parser, Debug)]
#[command(name = "stackeval")]
#[command(version)]
#[command(about = "Annotate raw memory and stack dumps with symbols from an ELF binary", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
    /// Log level (error, warn, info, debug, trace); RUST_LOG wins when set
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    /// Log format used with --log-level (pretty or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
    /// Print without terminal colours
    #[arg(long, global = true, default_value_t = false)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Annotate every word of a dump
    Dump(WalkArgs),
    /// Walk a dump as a stack: frames and blank regions
    Trace(WalkArgs),
    /// Resolve addresses against the symbol table
    Lookup
    {
        /// ELF binary providing symbols
        elf: PathBuf,
        /// Addresses to resolve (hex with 0x, or decimal)
        #[arg(required = true)]
        addresses: Vec<String>,
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// Load symbols only and print statistics
    Load
    {
        /// ELF binary providing symbols
        elf: PathBuf,
        /// Also print every loaded symbol
        #[arg(long, default_value_t = false)]
        list: bool,
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// Decode a dump and print it again in monitor format
    Reformat
    {
        /// Textual memory dump
        dump: PathBuf,
        #[command(flatten)]
        decode: DecodeArgs,
        /// Bytes per output token (1, 2, 4 or 8); defaults to the word width
        #[arg(long)]
        token_bytes: Option<usize>,
        /// Bytes per output line
        #[arg(long, default_value_t = 16)]
        bytes_per_line: usize,
    },
}

#[derive(Args, Debug)]
struct WalkArgs
{
    /// ELF binary the dump was taken from
    elf: PathBuf,
    /// Textual memory dump
    dump: PathBuf,
    /// Lower address limit (hex with 0x, or decimal)
    lower: Option<String>,
    /// Upper address limit, exclusive
    upper: Option<String>,
    #[command(flatten)]
    decode: DecodeArgs,
    #[command(flatten)]
    symbols: SymbolArgs,
}

#[derive(Args, Debug)]
struct DecodeArgs
{
    /// Dump text format
    #[arg(long, default_value = "auto")]
    format: DumpFormat,
    /// Word width in bytes (4 or 8); defaults to the ELF class
    #[arg(long)]
    word_width: Option<usize>,
    /// Byte order (big or little); defaults to the ELF header
    #[arg(long)]
    endian: Option<ByteOrder>,
    /// Reject lines that are neither data nor address headers
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct SymbolArgs
{
    /// Ignore a symbol by name (repeatable)
    #[arg(long = "exclude")]
    exclude: Vec<String>,
    /// Ignore symbols starting with a prefix (repeatable)
    #[arg(long = "exclude-prefix")]
    exclude_prefix: Vec<String>,
}

impl SymbolArgs
{
    fn filter(&self) -> SymbolFilter
    {
        let filter = self
            .exclude
            .iter()
            .fold(SymbolFilter::default(), |filter, name| filter.with_name(name.clone()));
        self.exclude_prefix
            .iter()
            .fold(filter, |filter, prefix| filter.with_prefix(prefix.clone()))
    }
}

impl DecodeArgs
{
    /// Geometry from `fallback`, with command-line overrides applied.
    fn arch(&self, fallback: ArchParams) -> Result<ArchParams>
    {
        let word_width = match self.word_width {
            Some(bytes) => WordWidth::from_bytes(bytes)?,
            None => fallback.word_width,
        };
        Ok(ArchParams::new(word_width, self.endian.unwrap_or(fallback.byte_order)))
    }

    fn decoder(&self, arch: ArchParams) -> DumpDecoder
    {
        DumpDecoder::with_grammar(self.format.grammar(), arch).strict(self.strict)
    }
}

fn main()
{
    let cli = Cli::parse();

    let logging = match cli.log_level {
        Some(level) => init_logging_with_level(level, cli.log_format.unwrap_or(LogFormat::Pretty)),
        None => init_logging(),
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, !cli.no_color) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands, color: bool) -> Result<()>
{
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Dump(args) => {
            let session = Session::open(&args)?;
            let renderer = session.renderer();
            let listing = renderer.annotate(&session.dump, session.window);
            let printer = Printer::new(color, session.dump.word_width());
            printer.listing(&mut out, &listing)?;
            printer.legend(&mut out, &legend(&session.config))?;
        }
        Commands::Trace(args) => {
            let session = Session::open(&args)?;
            let renderer = session.renderer();
            let trace = renderer.trace(&session.dump, session.window);
            let printer = Printer::new(color, session.dump.word_width());
            printer.trace(&mut out, &trace)?;
            printer.legend(&mut out, &legend(&session.config))?;
        }
        Commands::Lookup { elf, addresses, symbols } => {
            let image = ElfImage::load(&elf, &symbols.filter())?;
            let config = AnalysisConfig::default();
            let classifier = WordClassifier::new(&image.symbols, &image.sections, &config);
            let printer = Printer::new(color, image.arch.word_width);
            let mut ignored = IgnoredSymbols::new();
            for text in &addresses {
                let value = parse_limit(text)?;
                let symbol = classifier.resolve(value, &mut ignored);
                let hit = symbol.as_deref().map(|symbol| {
                    let flags = image.sections.get(symbol.section_index).map(|section| section.flags);
                    (symbol, SymbolCategory::from_section(flags, symbol.size))
                });
                printer.lookup(&mut out, value, hit)?;
            }
            printer.ignored(&mut out, &ignored)?;
        }
        Commands::Load { elf, list, symbols } => {
            writeln!(out, "Processing binary {}", elf.display())?;
            let image = ElfImage::load(&elf, &symbols.filter())?;
            writeln!(out, "Architecture: {}", image.arch)?;
            for section in image.sections.iter() {
                writeln!(out, "Section {} index {} @0x{:x}", section.name, section.index, section.address)?;
            }
            write!(out, "{}", image.stats)?;
            if list {
                for symbol in image.symbols.sorted() {
                    writeln!(out, "{symbol}")?;
                }
            }
        }
        Commands::Reformat {
            dump,
            decode,
            token_bytes,
            bytes_per_line,
        } => {
            let arch = decode.arch(ArchParams::new(WordWidth::Four, ByteOrder::Big))?;
            let memory = decode.decoder(arch).decode_file(&dump)?;
            let token_bytes = token_bytes.unwrap_or(arch.word_width.bytes());
            write!(out, "{}", memory.to_text(&MonitorGrammar, token_bytes, bytes_per_line)?)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Everything a dump or trace walk needs.
struct Session
{
    image: ElfImage,
    dump: MemoryDump,
    window: AddressWindow,
    config: AnalysisConfig,
}

impl Session
{
    fn open(args: &WalkArgs) -> Result<Self>
    {
        let window = parse_window(args.lower.as_deref(), args.upper.as_deref())?;
        let image = ElfImage::load(&args.elf, &args.symbols.filter())?;
        info!("loaded {} symbols from {}", image.symbols.len(), args.elf.display());

        let arch = args.decode.arch(image.arch)?;
        let dump = args.decode.decoder(arch).decode_file(&args.dump)?;
        info!(
            "decoded {} bytes at {} from {}",
            dump.len(),
            dump.base_address(),
            args.dump.display()
        );

        Ok(Self {
            image,
            dump,
            window,
            config: AnalysisConfig::default(),
        })
    }

    fn renderer(&self) -> DumpRenderer<'_>
    {
        DumpRenderer::new(WordClassifier::new(&self.image.symbols, &self.image.sections, &self.config))
    }
}

/// Hex with a `0x` prefix, or decimal.
fn parse_limit(text: &str) -> Result<u64>
{
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| StackevalError::InvalidArgument(format!("bad address '{text}': {e}")))
}

fn parse_window(lower: Option<&str>, upper: Option<&str>) -> Result<AddressWindow>
{
    match (lower, upper) {
        (None, None) => Ok(AddressWindow::ALL),
        (Some(lower), Some(upper)) => AddressWindow::new(parse_limit(lower)?, parse_limit(upper)?),
        _ => Err(StackevalError::InvalidArgument(
            "lower and upper limits must be given together".to_string(),
        )),
    }
}
