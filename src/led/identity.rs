//! LED identities, decoupled from physical pins.

use crate::error::Error;

/// Logical indicator identity.  Pin numbers live in the
/// [`LedRegistry`](super::LedRegistry), never at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedId {
    Blue = 0,
    Sim = 1,
    Fault = 2,
    Fire = 3,
}

impl LedId {
    /// Total number of identities.
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Blue, Self::Sim, Self::Fault, Self::Fire];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "BLUE",
            Self::Sim => "SIM",
            Self::Fault => "FAULT",
            Self::Fire => "FIRE",
        }
    }
}

impl TryFrom<u8> for LedId {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Blue),
            1 => Ok(Self::Sim),
            2 => Ok(Self::Fault),
            3 => Ok(Self::Fire),
            _ => Err(Error::UnknownIdentity(raw)),
        }
    }
}

impl core::fmt::Display for LedId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
