//! Symbol demangling utilities.
//!
//! - **Rust**: legacy (`_ZN...E`) and v0 (`_R...`) schemes, via `rustc-demangle`
//! - **C++**: Itanium `_Z` names are recognised but left mangled
//! - **C**: everything else

use rustc_demangle::try_demangle;

use crate::types::SymbolLanguage;

/// Demangle `raw` if it is a Rust symbol. `None` means "show it as is".
pub(crate) fn demangle(raw: &str) -> Option<String>
{
    // `{:#}` drops the trailing hash of legacy symbols.
    try_demangle(raw).ok().map(|d| format!("{d:#}"))
}

/// Guess the source language from the mangling pattern.
pub(crate) fn language_of(raw: &str) -> SymbolLanguage
{
    if raw.starts_with("_R") || (raw.starts_with("_ZN") && try_demangle(raw).is_ok()) {
        SymbolLanguage::Rust
    } else if raw.starts_with("_Z") {
        SymbolLanguage::Cpp
    } else {
        SymbolLanguage::C
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_plain_c_name_is_untouched()
    {
        assert_eq!(demangle("taskIdSelf"), None);
        assert_eq!(language_of("taskIdSelf"), SymbolLanguage::C);
    }

    #[test]
    fn test_rust_legacy_name()
    {
        let raw = "_ZN4core3ptr13drop_in_place17h0123456789abcdefE";
        assert_eq!(demangle(raw).as_deref(), Some("core::ptr::drop_in_place"));
        assert_eq!(language_of(raw), SymbolLanguage::Rust);
    }

    #[test]
    fn test_cpp_name_is_detected()
    {
        assert_eq!(language_of("_Z3fooi"), SymbolLanguage::Cpp);
    }
}
