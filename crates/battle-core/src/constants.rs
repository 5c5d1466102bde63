//! Voting flow constants.

/// Delay between vote commit and the close signal (milliseconds).
pub const CLOSE_DELAY_MS: u64 = 2_000;

/// Starting score for participant A when the host supplies no tally.
pub const DEFAULT_SCORE_A: u32 = 45;

/// Starting score for participant B when the host supplies no tally.
pub const DEFAULT_SCORE_B: u32 = 55;

/// A battle is always head-to-head.
pub const PARTICIPANTS_PER_BATTLE: usize = 2;
