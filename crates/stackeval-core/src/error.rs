//! # Error Types
//!
//! Errors raised while loading a binary or decoding a dump.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages. Classification and rendering never fail: they
//! degrade to raw words or to empty output instead.

use std::num::ParseIntError;

use thiserror::Error;

/// Main error type for stackeval operations
///
/// ## Error Categories
///
/// 1. **Dump grammar**: `Format` (strict mode only; lines are skipped otherwise)
/// 2. **Dump continuity**: `AddressContinuity`
/// 3. **Dump tokens**: `TokenWidth`, `Encoding`
/// 4. **Binary loading**: `Elf`
/// 5. **Caller input**: `InvalidArgument`
/// 6. **I/O errors**: `Io`
///
/// Every decode variant carries the 1-based line number of the offending line.
#[derive(Error, Debug)]
pub enum StackevalError
{
    /// A line matched none of the grammar's line shapes
    ///
    /// Only produced by a decoder in strict mode. Tool output routinely mixes
    /// prompts and banners into the dump, so the default is to skip them.
    #[error("Line {line}: unrecognized dump line {text:?}")]
    Format
    {
        line: usize,
        text: String,
    },

    /// A declared or implied address does not continue the previous line
    ///
    /// Gaps and overlaps are never patched up: the dump is rejected so that
    /// every annotated word is known to sit at the address printed beside it.
    #[error("Line {line}: expected address 0x{expected:x}, got 0x{actual:x}")]
    AddressContinuity
    {
        line: usize,
        expected: u64,
        actual: u64,
    },

    /// Hex tokens on a line disagree in width, or one is wider than 16 digits
    #[error("Line {line}: {source}")]
    TokenWidth
    {
        line: usize,
        #[source]
        source: TokenError,
    },

    /// A token is not a hexadecimal number
    #[error("Line {line}: invalid hex token {token:?}: {source}")]
    Encoding
    {
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// The binary could not be parsed as an object file
    #[error("Failed to parse binary: {0}")]
    Elf(String),

    /// Invalid argument passed in by the caller
    ///
    /// Examples:
    /// - A word width other than 4 or 8
    /// - A lower limit above the upper limit
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error while reading the dump or the binary
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StackevalError
{
    /// Line number for decode errors, `None` for everything else.
    pub fn line(&self) -> Option<usize>
    {
        match self {
            StackevalError::Format { line, .. }
            | StackevalError::AddressContinuity { line, .. }
            | StackevalError::TokenWidth { line, .. }
            | StackevalError::Encoding { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Attach a line number to a token-level failure.
    pub(crate) fn from_token(line: usize, err: TokenError) -> Self
    {
        match err {
            TokenError::NotHex { token, source } => StackevalError::Encoding { line, token, source },
            other => StackevalError::TokenWidth { line, source: other },
        }
    }
}

impl From<object::read::Error> for StackevalError
{
    fn from(err: object::read::Error) -> Self
    {
        StackevalError::Elf(err.to_string())
    }
}

/// Failure converting the token text of a single data line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError
{
    /// A token other than the last differs in width from the first one
    #[error("inconsistent word size: token {token:?} has {found} digits, expected {expected}")]
    Inconsistent
    {
        token: String,
        expected: usize,
        found: usize,
    },

    /// A token is wider than a 64-bit word
    #[error("oversize word: token {token:?} has {width} digits")]
    Oversize
    {
        token: String,
        width: usize,
    },

    /// A token is not valid hexadecimal
    #[error("invalid hex token {token:?}: {source}")]
    NotHex
    {
        token: String,
        source: ParseIntError,
    },
}

/// Convenience type alias for `Result<T, StackevalError>`
///
/// ```rust
/// use stackeval_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StackevalError>;
