//! Tests for word classification

use stackeval_core::classify::{Classification, IgnoredSymbols, WordCategory, WordClassifier};
use stackeval_core::config::AnalysisConfig;
use stackeval_core::symbols::SymbolTable;
use stackeval_core::types::{Address, SectionFlags, Sections, Symbol, SymbolCategory, SymbolKind, WordWidth};

/// Sections: 0 = null, 1 = .text, 2 = .rodata, 3 = .bss
fn sections() -> Sections
{
    Sections::from_flags(&[
        SectionFlags::default(),
        SectionFlags::TEXT,
        SectionFlags::DATA,
        SectionFlags::BSS,
    ])
}

fn symbols() -> SymbolTable
{
    [
        Symbol::new("taskEntry", 0x0010_0000, 0x100, 1, SymbolKind::Function),
        Symbol::new("sysInit", 0x0020_0000, 0, 1, SymbolKind::Function),
        Symbol::new("versionString", 0x0030_0000, 0x40, 2, SymbolKind::Object),
        Symbol::new("readyQHead", 0x0040_0000, 0x10, 3, SymbolKind::Object),
        Symbol::new("orphan", 0x0050_0000, 0x10, 9, SymbolKind::Object),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_symbol_reference()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    let class = classifier.classify(0x0010_0044, Address::new(0x8000), &mut ignored);
    match &class {
        Classification::SymbolRef { symbol, offset, category } => {
            assert_eq!(symbol.name.raw(), "taskEntry");
            assert_eq!(*offset, 0x44);
            assert_eq!(*category, SymbolCategory::Text);
        }
        other => panic!("expected symbol reference, got {other:?}"),
    }
    assert_eq!(class.text(WordWidth::Four), "taskEntr");
    assert!(ignored.is_empty());
}

#[test]
fn test_categories_follow_sections()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();
    let at = Address::new(0x8000);

    let category = |value: u64, ignored: &mut IgnoredSymbols| classifier.classify(value, at, ignored).category();
    assert_eq!(
        category(0x0020_0010, &mut ignored),
        WordCategory::Symbol(SymbolCategory::TextZeroLength)
    );
    assert_eq!(category(0x0030_0000, &mut ignored), WordCategory::Symbol(SymbolCategory::Data));
    assert_eq!(category(0x0040_0008, &mut ignored), WordCategory::Symbol(SymbolCategory::Bss));
    assert_eq!(category(0x0050_0000, &mut ignored), WordCategory::Symbol(SymbolCategory::Unknown));
}

#[test]
fn test_zero_size_symbol_is_capped()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    let inside = classifier.resolve(0x0020_0000 + 0xffff, &mut ignored);
    assert_eq!(inside.unwrap().name.raw(), "sysInit");
    assert!(ignored.is_empty());

    let outside = classifier.resolve(0x0020_0000 + 0x1_0000, &mut ignored);
    assert!(outside.is_none());
    assert_eq!(ignored.len(), 1);
    assert_eq!(
        ignored.notices(),
        vec!["Symbol last ignored at 0x210000: sysInit @0x200000 size 0 (function, section 1)".to_string()]
    );
}

#[test]
fn test_ignored_symbols_keep_last_value()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    let far = Address::new(0x9000_0000);
    classifier.classify(0x0021_0000, far, &mut ignored);
    classifier.classify(0x0022_0000, far, &mut ignored);
    assert_eq!(ignored.len(), 1);
    let (symbol, value) = ignored.iter().next().unwrap();
    assert_eq!(symbol.name.raw(), "sysInit");
    assert_eq!(value, 0x0022_0000);
}

#[test]
fn test_custom_span()
{
    let table = symbols();
    let sections = sections();
    let config = AnalysisConfig {
        max_unbounded_span: 0x100,
        ..AnalysisConfig::default()
    };
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    assert!(classifier.resolve(0x0020_00ff, &mut ignored).is_some());
    assert!(classifier.resolve(0x0020_0100, &mut ignored).is_none());
}

#[test]
fn test_stack_local_pointer()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();
    let at = Address::new(0x0094_be750);

    let above = classifier.classify(0x0094_be7a0, at, &mut ignored);
    assert_eq!(above, Classification::StackLocal { offset: 0x50 });
    assert_eq!(above.text(WordWidth::Four), "stk+050h");

    let below = classifier.classify(0x0094_be700, at, &mut ignored);
    assert_eq!(below, Classification::StackLocal { offset: -0x50 });
    assert_eq!(below.text(WordWidth::Four), "stk-050h");
    assert_eq!(below.text(WordWidth::Eight), "stk-00000000050h");
}

#[test]
fn test_stack_threshold_is_exclusive()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();
    let at = Address::new(0x0800_0000);

    assert!(matches!(
        classifier.classify(0x0800_0fff, at, &mut ignored),
        Classification::StackLocal { offset: 0xfff }
    ));
    assert_eq!(
        classifier.classify(0x0800_1000, at, &mut ignored),
        Classification::Raw { value: 0x0800_1000 }
    );
}

#[test]
fn test_symbol_beats_stack_local()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    // The value is 4 bytes away from where it sits, and also a symbol address.
    let class = classifier.classify(0x0010_0000, Address::new(0x000f_fffc), &mut ignored);
    assert!(matches!(class, Classification::SymbolRef { offset: 0, .. }));
}

#[test]
fn test_raw_value()
{
    let (table, sections, config) = (symbols(), sections(), AnalysisConfig::default());
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    let class = classifier.classify(0, Address::new(0x1004), &mut ignored);
    assert_eq!(class, Classification::Raw { value: 0 });
    assert_eq!(class.category(), WordCategory::Raw);
    assert_eq!(class.text(WordWidth::Four), "00000000");
    assert_eq!(class.text(WordWidth::Eight), "0000000000000000");
}

#[test]
fn test_short_names_are_right_aligned()
{
    let table: SymbolTable = [Symbol::new("f", 0x4000, 4, 1, SymbolKind::Function)].into_iter().collect();
    let sections = sections();
    let config = AnalysisConfig::default();
    let classifier = WordClassifier::new(&table, &sections, &config);
    let mut ignored = IgnoredSymbols::new();

    let class = classifier.classify(0x4000, Address::new(0x9000_0000), &mut ignored);
    assert_eq!(class.text(WordWidth::Four), "       f");
}
