//! GPIO input abstractions
//!
//! Interlock signals (emergency-stop mushroom button, suction pressure
//! switch) are wired as plain digital inputs.

/// Digital input pin
///
/// Implementations should handle the actual pin read for the platform
/// (chip register, Linux GPIO line, etc.).
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Logic level at which an input is considered asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Asserted when the pin reads high
    #[default]
    High,
    /// Asserted when the pin reads low (normally-closed contacts)
    Low,
}

impl ActiveLevel {
    /// Check whether `pin` is asserted at this level
    pub fn is_asserted<P: InputPin + ?Sized>(self, pin: &P) -> bool {
        match self {
            ActiveLevel::High => pin.is_high(),
            ActiveLevel::Low => pin.is_low(),
        }
    }
}
