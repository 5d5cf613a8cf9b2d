//! Address window limiting a walk.

use crate::error::{Result, StackevalError};
use crate::types::Address;

/// Half-open address range `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow
{
    lower: Address,
    upper: Address,
}

impl AddressWindow
{
    /// The whole address space.
    pub const ALL: Self = Self {
        lower: Address::ZERO,
        upper: Address::MAX,
    };

    /// ## Errors
    ///
    /// `InvalidArgument` if `lower > upper`.
    pub fn new(lower: u64, upper: u64) -> Result<Self>
    {
        if lower > upper {
            return Err(StackevalError::InvalidArgument(format!(
                "lower limit 0x{lower:x} is above upper limit 0x{upper:x}"
            )));
        }
        Ok(Self {
            lower: Address::new(lower),
            upper: Address::new(upper),
        })
    }

    pub fn lower(&self) -> Address
    {
        self.lower
    }

    pub fn upper(&self) -> Address
    {
        self.upper
    }

    /// Widen outward to multiples of `granularity`.
    #[must_use]
    pub fn snapped(self, granularity: u64) -> Self
    {
        Self {
            lower: self.lower.align_down(granularity),
            upper: self.upper.align_up(granularity).unwrap_or(Address::MAX),
        }
    }

    pub fn contains(&self, address: Address) -> bool
    {
        self.lower <= address && address < self.upper
    }
}

impl Default for AddressWindow
{
    fn default() -> Self
    {
        Self::ALL
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_snapping_is_outward()
    {
        let window = AddressWindow::new(0x1003, 0x1009).unwrap().snapped(16);
        assert_eq!(window, AddressWindow::new(0x1000, 0x1010).unwrap());
    }

    #[test]
    fn test_aligned_bounds_stay_put()
    {
        let window = AddressWindow::new(0x1000, 0x1010).unwrap().snapped(16);
        assert_eq!(window.lower(), Address::new(0x1000));
        assert_eq!(window.upper(), Address::new(0x1010));
    }

    #[test]
    fn test_open_window_does_not_overflow()
    {
        assert_eq!(AddressWindow::ALL.snapped(16), AddressWindow::ALL);
    }

    #[test]
    fn test_inverted_limits_are_rejected()
    {
        assert!(AddressWindow::new(0x2000, 0x1000).is_err());
    }
}
