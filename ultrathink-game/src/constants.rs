//! Centralized balance and tuning constants for ULTRATHINK game logic.
//!
//! These values define the deterministic math of a playthrough. Keeping them
//! together means difficulty can only move through reviewed code changes or
//! an explicit config override passed through the `DataLoader`.

// Funds and scoring --------------------------------------------------------
/// Starting chart value for every new game.
pub const INITIAL_FUNDS: i64 = 10_000;
/// Flat bonus for selling on a SAFE announcement.
pub const SELL_SAFE_BONUS: i64 = 8;
/// Gain sentinel attached to a rugged HODL effect.
pub const RUGGED_GAIN: i64 = -100;
/// Token count assumed by the result hand-off when none is supplied.
pub const DEFAULT_RESULT_TOTAL: u32 = 4;

// Gain generation ----------------------------------------------------------
/// Catalog-driven gains are snapped to multiples of this value.
pub const CATALOG_GAIN_STEP: i64 = 100;

// Difficulty curve ---------------------------------------------------------
/// Token ordinals at or above this collapse onto the hardest curve.
pub const DIFFICULTY_CEILING: u32 = 4;
/// Highest ordinal still labelled EASY in randomized runs.
pub const EASY_ORDINAL_MAX: u32 = 2;
/// Ordinal labelled MEDIUM in randomized runs.
pub const MEDIUM_ORDINAL: u32 = 3;

// Mixed catalog deck -------------------------------------------------------
pub(crate) const MIXED_EASY_CASES: usize = 2;
pub(crate) const MIXED_MEDIUM_CASES: usize = 2;
pub(crate) const MIXED_HARD_CASES: usize = 1;

// Identifiers --------------------------------------------------------------
pub(crate) const ID_SUFFIX_LEN: usize = 6;
pub(crate) const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// RNG stream domains -------------------------------------------------------
pub(crate) const STREAM_SELECTION: &[u8] = b"selection";
pub(crate) const STREAM_OUTCOME: &[u8] = b"outcome";
