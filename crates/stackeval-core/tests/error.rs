//! Tests for error handling

use std::error::Error;

use stackeval_core::dump::{DumpDecoder, MonitorGrammar};
use stackeval_core::error::{Result, StackevalError, TokenError};
use stackeval_core::render::AddressWindow;
use stackeval_core::types::{ArchParams, ByteOrder, WordWidth};

const BIG32: ArchParams = ArchParams::new(WordWidth::Four, ByteOrder::Big);

fn decode(text: &str) -> Result<stackeval_core::dump::MemoryDump>
{
    DumpDecoder::new(MonitorGrammar, BIG32).decode_str(text)
}

#[test]
fn test_address_gap_is_fatal()
{
    let err = decode(
        "\
0x00001000:  00000000 00000000 00000000 00000000
0x00001020:  00000000
",
    )
    .unwrap_err();

    match err {
        StackevalError::AddressContinuity { line, expected, actual } => {
            assert_eq!(line, 2);
            assert_eq!(expected, 0x1010);
            assert_eq!(actual, 0x1020);
        }
        other => panic!("expected AddressContinuity, got {other:?}"),
    }
}

#[test]
fn test_address_overlap_is_fatal()
{
    let err = decode(
        "\
0x00001000:  00000000 00000000
0x00001004:  00000000
",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        StackevalError::AddressContinuity {
            line: 2,
            expected: 0x1008,
            actual: 0x1004,
        }
    ));
}

#[test]
fn test_restated_header_must_match()
{
    let text = "\
Physaddr:2000
0000000000000000: 0001 0203
Physaddr:3000
";
    let err = DumpDecoder::new(stackeval_core::dump::PhysAddrGrammar, BIG32)
        .decode_str(text)
        .unwrap_err();
    assert!(matches!(
        err,
        StackevalError::AddressContinuity {
            line: 3,
            expected: 0x2004,
            actual: 0x3000,
        }
    ));
}

#[test]
fn test_inconsistent_token_width()
{
    let err = decode("0x00001000:  00000000 0000 00000000\n").unwrap_err();
    match &err {
        StackevalError::TokenWidth { line, source } => {
            assert_eq!(*line, 1);
            assert!(matches!(source, TokenError::Inconsistent { expected: 8, found: 4, .. }));
        }
        other => panic!("expected TokenWidth, got {other:?}"),
    }
    assert!(err.source().is_some());
}

#[test]
fn test_oversize_token()
{
    let err = decode("0x00001000:  00000000000000000\n").unwrap_err();
    assert!(matches!(
        err,
        StackevalError::TokenWidth {
            source: TokenError::Oversize { width: 17, .. },
            ..
        }
    ));
}

#[test]
fn test_bad_hex_token()
{
    let err = decode("0x00001000:  00000000 0000zzzz\n").unwrap_err();
    match err {
        StackevalError::Encoding { line, token, .. } => {
            assert_eq!(line, 1);
            assert_eq!(token, "0000zzzz");
        }
        other => panic!("expected Encoding, got {other:?}"),
    }
}

#[test]
fn test_strict_mode_rejects_noise()
{
    let text = "\
0x00001000:  00000000
-> d 0x1004
";
    assert!(decode(text).is_ok());

    let err = DumpDecoder::new(MonitorGrammar, BIG32)
        .strict(true)
        .decode_str(text)
        .unwrap_err();
    assert!(matches!(err, StackevalError::Format { line: 2, .. }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_messages_carry_line_and_addresses()
{
    let err = StackevalError::AddressContinuity {
        line: 7,
        expected: 0x1010,
        actual: 0x1020,
    };
    let message = format!("{}", err);
    assert!(message.contains("Line 7"));
    assert!(message.contains("0x1010"));
    assert!(message.contains("0x1020"));
}

#[test]
fn test_invalid_window()
{
    let err = AddressWindow::new(0x2000, 0x1000).unwrap_err();
    assert!(matches!(err, StackevalError::InvalidArgument(_)));
    assert_eq!(err.line(), None);
}

#[test]
fn test_missing_dump_file()
{
    let err = DumpDecoder::new(MonitorGrammar, BIG32)
        .decode_file(std::path::Path::new("/nonexistent/stack.dump"))
        .unwrap_err();
    assert!(matches!(err, StackevalError::Io(_)));
}

#[test]
fn test_word_width_validation()
{
    assert!(WordWidth::from_bytes(4).is_ok());
    assert!(WordWidth::from_bytes(8).is_ok());
    assert!(matches!(WordWidth::from_bytes(2), Err(StackevalError::InvalidArgument(_))));
}
