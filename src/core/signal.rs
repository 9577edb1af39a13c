//! Event signals.
//!
//! A signal identifies the category of an event. Signals live in a bit-flag
//! space: handlers match on a nonzero bitwise intersection, so a single
//! handler mask can cover several signal values at once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bitmask identifier for an event kind.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::Signal;
///
/// const TURN_ON: Signal = Signal::bit(0);
/// const TURN_OFF: Signal = Signal::bit(1);
///
/// let power = TURN_ON | TURN_OFF;
/// assert!(power.intersects(TURN_ON));
/// assert!(power.intersects(TURN_OFF));
/// assert!(!TURN_ON.intersects(TURN_OFF));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(u32);

impl Signal {
    /// The empty signal. Never matches any handler.
    pub const NONE: Signal = Signal(0);

    /// First signal value free for application use.
    pub const USER: Signal = Signal(1);

    /// Create a signal from raw bits.
    pub const fn new(bits: u32) -> Self {
        Signal(bits)
    }

    /// Signal with only bit `n` set.
    ///
    /// Panics if `n >= 32`; in a `const` this is a compile error.
    pub const fn bit(n: u32) -> Self {
        assert!(n < u32::BITS, "signal bit out of range");
        Signal(1 << n)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True iff the two signals share at least one bit.
    ///
    /// Two nonzero signals with disjoint bits do not intersect.
    pub const fn intersects(self, other: Signal) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Signal) -> Signal {
        Signal(self.0 | other.0)
    }
}

impl From<u32> for Signal {
    fn from(bits: u32) -> Self {
        Signal(bits)
    }
}

impl BitOr for Signal {
    type Output = Signal;

    fn bitor(self, rhs: Signal) -> Signal {
        self.union(rhs)
    }
}

impl BitOrAssign for Signal {
    fn bitor_assign(&mut self, rhs: Signal) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Signal {
    type Output = Signal;

    fn bitand(self, rhs: Signal) -> Signal {
        Signal(self.0 & rhs.0)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
