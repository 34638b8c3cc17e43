//! Host restart

/// Full host restart
///
/// Used when the board reports a condition that only a power-cycle-like
/// restart recovers from. Implementations never return.
pub trait SystemReset {
    fn reset(&mut self) -> !;
}
