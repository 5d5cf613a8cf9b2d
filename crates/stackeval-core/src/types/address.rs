//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};

/// Strongly typed address of a location inside a memory dump
///
/// Word *values* read out of the dump stay plain `u64`; only the place a word
/// was found at is an `Address`. Keeping the two apart avoids mixing up
/// "where" and "what" in the classifier, which compares both.
///
/// ## Example
///
/// ```rust
/// use stackeval_core::types::Address;
///
/// let addr = Address::from(0x1003);
/// assert_eq!(addr.align_down(16), Address::from(0x1000));
/// assert_eq!(addr.align_up(16), Some(Address::from(0x1010)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// The highest representable address, used as an open upper bound.
    pub const MAX: Self = Address(u64::MAX);

    /// Create a new address from a `u64` value
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use stackeval_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None);
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Add an offset to this address, saturating at the maximum value
    pub fn saturating_add(self, offset: u64) -> Self
    {
        Address(self.0.saturating_add(offset))
    }

    /// Distance between this address and a word value, ignoring direction.
    pub fn abs_diff(self, value: u64) -> u64
    {
        self.0.abs_diff(value)
    }

    /// Round down to a multiple of `alignment` (must be non-zero).
    pub fn align_down(self, alignment: u64) -> Self
    {
        Address(self.0 - self.0 % alignment)
    }

    /// Round up to a multiple of `alignment`, or `None` on overflow.
    pub fn align_up(self, alignment: u64) -> Option<Self>
    {
        match self.0 % alignment {
            0 => Some(self),
            rem => self.0.checked_add(alignment - rem).map(Address),
        }
    }

    /// Format with a fixed number of hex digits (8 for 32-bit, 16 for 64-bit dumps).
    pub fn to_hex(self, digits: usize) -> String
    {
        format!("0x{:0digits$x}", self.0)
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<Address> for Address
{
    type Output = u64;

    fn sub(self, rhs: Address) -> Self::Output
    {
        self.0.wrapping_sub(rhs.0)
    }
}
