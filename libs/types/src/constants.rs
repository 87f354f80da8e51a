//! Engine-wide constants and scale factors

use ethers_core::types::U256;

/// Parts-per-million scale used for reserve weights and fee rates
/// (1,000,000 ppm = 100%)
pub const PPM_SCALE: u32 = 1_000_000;

/// Default window over which the average rate converges to the spot rate
pub const DEFAULT_AVERAGE_RATE_WINDOW_SECS: u64 = 600;

/// Seconds since the unix epoch, supplied by the host on every operation.
/// The engine never reads a wall clock of its own.
pub type Timestamp = u64;

/// Largest value representable in 112 bits. Oracle fractions are reduced to
/// this width so that the linear blend of two rates cannot overflow 256 bits.
#[inline]
pub fn max_uint112() -> U256 {
    (U256::one() << 112) - 1
}
