//! Switch and light channel identities for the lighting controller board.
//!
//! Single source of truth for channel ordering: the switch bank, the light
//! outputs, and the event log all index by these enums.  Board nets follow
//! the reference harness (port A outputs, port B switch inputs, heartbeat on
//! port C).

// ---------------------------------------------------------------------------
// Switch inputs (active-high toggle switches)
// ---------------------------------------------------------------------------

/// One physical switch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Switch {
    Left = 0,
    Right = 1,
    Hazard = 2,
    Head = 3,
    Regen = 4,
    Mech = 5,
}

impl Switch {
    pub const COUNT: usize = 6;

    /// Scan order used by the switch bank.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Hazard,
        Self::Head,
        Self::Regen,
        Self::Mech,
    ];

    /// Board net name on the reference harness.
    pub const fn net(self) -> &'static str {
        match self {
            Self::Right => "RB0",
            Self::Left => "RB1",
            Self::Hazard => "RB2",
            Self::Head => "RB3",
            Self::Regen => "RB4",
            Self::Mech => "RB5",
        }
    }
}

// ---------------------------------------------------------------------------
// Light outputs (level-set, no acknowledgement)
// ---------------------------------------------------------------------------

/// One light output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Light {
    Left = 0,
    Right = 1,
    Brake = 2,
    Head = 3,
    Strobe = 4,
}

impl Light {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Left,
        Self::Right,
        Self::Brake,
        Self::Head,
        Self::Strobe,
    ];

    /// Board net name on the reference harness.
    pub const fn net(self) -> &'static str {
        match self {
            Self::Left => "RA0",
            Self::Right => "RA1",
            Self::Brake => "RA2",
            Self::Head => "RA3",
            Self::Strobe => "RA5",
        }
    }
}

/// Heartbeat indicator toggled by the Tick Source.
pub const HEARTBEAT_NET: &str = "RC0";

impl core::fmt::Display for Switch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}({})", self, self.net())
    }
}

impl core::fmt::Display for Light {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}({})", self, self.net())
    }
}
