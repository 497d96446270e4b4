use crate::types::Tick;

/// A duration authored in milliseconds (data tables, config files).
///
/// The simulation never waits on wall-clock time: every `Millis` is turned into
/// a tick count at the configured tick rate before it is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Millis(u32);

impl Millis {
    const MILLIS_PER_SEC: u64 = 1_000;

    pub const ZERO: Self = Self(0);

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs * 1_000)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Convert to a tick count at the given tick rate.
    ///
    /// Rounds up: a non-zero duration always lasts at least one tick.
    pub const fn to_ticks(self, tick_hz: u32) -> Tick {
        let numer = self.0 as u64 * tick_hz as u64;
        numer.div_ceil(Self::MILLIS_PER_SEC)
    }
}
