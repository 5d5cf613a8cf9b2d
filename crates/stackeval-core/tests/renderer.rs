//! Tests for the flat and trace walks

use stackeval_core::prelude::*;
use stackeval_core::render::{ByteRun, FrameWord};

const BIG32: ArchParams = ArchParams::new(WordWidth::Four, ByteOrder::Big);

fn decode(text: &str) -> MemoryDump
{
    DumpDecoder::new(MonitorGrammar, BIG32).decode_str(text).unwrap()
}

fn text_sections() -> Sections
{
    Sections::from_flags(&[SectionFlags::default(), SectionFlags::TEXT])
}

struct Fixture
{
    symbols: SymbolTable,
    sections: Sections,
    config: AnalysisConfig,
}

impl Fixture
{
    fn new(symbols: Vec<Symbol>) -> Self
    {
        Self {
            symbols: symbols.into_iter().collect(),
            sections: text_sections(),
            config: AnalysisConfig::default(),
        }
    }

    fn renderer(&self) -> DumpRenderer<'_>
    {
        DumpRenderer::new(WordClassifier::new(&self.symbols, &self.sections, &self.config))
    }
}

const SCENARIO: &str = "\
0x00001000:  00000000 00000000 00000000 00000000
0x00001010:  deadbeef 00000000 00000000 00000000
";

#[test]
fn test_scenario_listing()
{
    let fixture = Fixture::new(Vec::new());
    let listing = fixture.renderer().annotate(&decode(SCENARIO), AddressWindow::ALL);

    assert_eq!(listing.rows.len(), 2);
    assert_eq!(listing.rows[0].address, Address::new(0x1000));
    assert_eq!(listing.rows[1].address, Address::new(0x1010));

    let second = &listing.rows[0].words[1];
    assert_eq!(second.address, Address::new(0x1004));
    assert_eq!(second.classification, Classification::Raw { value: 0 });
    assert!(listing.words().all(|word| word.category() == WordCategory::Raw));
    assert!(listing.leading.is_none());
    assert!(listing.trailing.is_none());
}

#[test]
fn test_scenario_trace()
{
    let fixture = Fixture::new(Vec::new());
    let trace = fixture.renderer().trace(&decode(SCENARIO), AddressWindow::ALL);

    let run = BlankRun {
        start: Address::new(0x1010),
        length: 4,
    };
    assert_eq!(trace.blank_runs, vec![run]);
    assert!(trace.unterminated_blank.is_none());
    assert_eq!(trace.events[4], TraceEvent::BlankStart(Address::new(0x1010)));
    assert_eq!(trace.events[5], TraceEvent::BlankEnd(run));
    // The sentinel itself is never classified.
    assert_eq!(trace.words().count(), 7);
    assert!(trace.words().all(|word| word.address != Address::new(0x1010)));
    assert!(trace.frames.is_empty());
}

#[test]
fn test_consecutive_sentinels_form_one_run()
{
    let fixture = Fixture::new(Vec::new());
    let dump = decode("0x00001000:  eeeeeeee eeeeeeee deadbeef 00000000\n");
    let trace = fixture.renderer().trace(&dump, AddressWindow::ALL);

    assert_eq!(
        trace.blank_runs,
        vec![BlankRun {
            start: Address::new(0x1000),
            length: 12,
        }]
    );
    let starts = trace
        .events
        .iter()
        .filter(|event| matches!(event, TraceEvent::BlankStart(_)))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn test_unterminated_blank_run()
{
    let fixture = Fixture::new(Vec::new());
    let dump = decode("0x00001000:  00000000 deadbeef deadbeef deadbeef\n");
    let trace = fixture.renderer().trace(&dump, AddressWindow::ALL);

    assert!(trace.blank_runs.is_empty());
    let run = trace.unterminated_blank.unwrap();
    assert_eq!(run.start, Address::new(0x1004));
    assert_eq!(run.length, 12);
    assert_eq!(run.end(), Address::new(0x1010));
}

#[test]
fn test_frames_follow_return_addresses()
{
    let fixture = Fixture::new(vec![Symbol::new("main", 0x2000, 0x100, 1, SymbolKind::Function)]);
    let dump = decode(
        "\
0x00001000:  00001008 00002010 12345678 00001000
0x00001010:  00002020 deadbeef 00000000 00000000
",
    );
    let trace = fixture.renderer().trace(&dump, AddressWindow::ALL);

    assert_eq!(trace.frames.len(), 2);
    let first = &trace.frames[0];
    assert_eq!(first.caller.name.raw(), "main");
    assert_eq!(first.address, Address::new(0x1004));
    assert_eq!(first.return_address, 0x2010);
    assert_eq!(
        first.words,
        vec![
            FrameWord {
                address: Address::new(0x1008),
                value: 0x1234_5678,
                stack_relative: false,
            },
            FrameWord {
                address: Address::new(0x100c),
                value: 0x1000,
                stack_relative: true,
            },
        ]
    );
    // Words after the blank run still belong to the open frame.
    assert_eq!(trace.frames[1].words.len(), 2);
}

#[test]
fn test_listing_details_and_colours()
{
    let fixture = Fixture::new(vec![Symbol::new("main", 0x2000, 0x100, 1, SymbolKind::Function)]);
    let dump = decode("0x00001000:  00002010 00001008 00000000 00002000\n");
    let listing = fixture.renderer().annotate(&dump, AddressWindow::ALL);

    let row = &listing.rows[0];
    assert_eq!(row.words.len(), 4);
    assert_eq!(
        row.details.to_vec(),
        vec![
            "main{0x2000 + 0x10 = 0x2010}".to_string(),
            "main{0x2000 + 0x0 = 0x2000}".to_string(),
        ]
    );
    let categories: Vec<WordCategory> = row.words.iter().map(WordEvent::category).collect();
    assert_eq!(
        categories,
        vec![
            WordCategory::Symbol(SymbolCategory::Text),
            WordCategory::StackLocal,
            WordCategory::Raw,
            WordCategory::Symbol(SymbolCategory::Text),
        ]
    );
}

#[test]
fn test_window_snaps_outward()
{
    let fixture = Fixture::new(Vec::new());
    let dump = decode(
        "\
0x00001000:  00000001 00000002 00000003 00000004
0x00001010:  00000005 00000006 00000007 00000008
",
    );
    let renderer = fixture.renderer();

    let narrow = renderer.annotate(&dump, AddressWindow::new(0x1003, 0x1009).unwrap());
    let aligned = renderer.annotate(&dump, AddressWindow::new(0x1000, 0x1010).unwrap());
    assert_eq!(narrow, aligned);
    let values: Vec<u64> = narrow.words().map(|word| word.value).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);

    let traced = renderer.trace(&dump, AddressWindow::new(0x1003, 0x1009).unwrap());
    assert_eq!(traced, renderer.trace(&dump, AddressWindow::new(0x1000, 0x1010).unwrap()));
}

#[test]
fn test_window_outside_dump_is_empty()
{
    let fixture = Fixture::new(Vec::new());
    let dump = decode(SCENARIO);
    let listing = fixture.renderer().annotate(&dump, AddressWindow::new(0x8000, 0x9000).unwrap());
    assert!(listing.is_empty());
    let trace = fixture.renderer().trace(&dump, AddressWindow::new(0x8000, 0x9000).unwrap());
    assert!(trace.events.is_empty());
}

#[test]
fn test_partial_bytes_in_flat_mode()
{
    let fixture = Fixture::new(Vec::new());
    let dump = decode("0x00001002:  aa bb 00 00 00 01 00 00 00 02 00 00 00 03 00 00 00 04 cc\n");
    let listing = fixture.renderer().annotate(&dump, AddressWindow::ALL);

    assert_eq!(
        listing.leading,
        Some(ByteRun {
            address: Address::new(0x1002),
            bytes: vec![0xaa, 0xbb],
        })
    );
    assert_eq!(
        listing.trailing,
        Some(ByteRun {
            address: Address::new(0x1014),
            bytes: vec![0xcc],
        })
    );
    // Short first row up to the 16-byte boundary.
    assert_eq!(listing.rows[0].address, Address::new(0x1004));
    assert_eq!(listing.rows[0].words.len(), 3);
    assert_eq!(listing.rows[1].address, Address::new(0x1010));
    assert_eq!(listing.rows[1].words.len(), 1);
}

#[test]
fn test_walks_keep_separate_ignored_sets()
{
    let fixture = Fixture::new(vec![Symbol::new("sysInit", 0x10_0000, 0, 1, SymbolKind::Function)]);
    let far = decode("0x00001000:  00200000\n");
    let near = decode("0x00001000:  00100010\n");
    let renderer = fixture.renderer();

    let first = renderer.annotate(&far, AddressWindow::ALL);
    assert_eq!(first.ignored.len(), 1);
    assert_eq!(first.words().next().unwrap().category(), WordCategory::Raw);

    let second = renderer.annotate(&near, AddressWindow::ALL);
    assert!(second.ignored.is_empty());
    assert_eq!(
        second.words().next().unwrap().category(),
        WordCategory::Symbol(SymbolCategory::TextZeroLength)
    );
}

#[test]
fn test_legend()
{
    let entries = legend(&AnalysisConfig::default());
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0].label, ".text zero-length");
    let local = entries
        .iter()
        .find(|entry| entry.category == WordCategory::StackLocal)
        .unwrap();
    assert_eq!(local.label, "local pointer, within 4096");
}
