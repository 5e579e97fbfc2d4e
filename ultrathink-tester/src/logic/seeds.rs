use anyhow::{Result, bail};
use std::collections::HashMap;
use ultrathink_game::{decode_replay_code, encode_replay_code};

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

/// Seed plus the replay code it was given as, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub fn from_replay_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// Code to print next to results; numeric seeds get a derived one.
    #[must_use]
    pub fn display_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| encode_replay_code(self.seed))
    }

    /// Seed for the `iteration`-th repeat of this entry. Iteration 0 is the
    /// seed itself so a single iteration replays exactly what was asked for.
    #[must_use]
    pub fn iteration_seed(&self, iteration: usize) -> u64 {
        let step = u64::try_from(iteration).unwrap_or(u64::MAX);
        self.seed
            .wrapping_add(step.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers (negative values use their magnitude) and
/// `UT-` replay codes. Duplicates collapse, preferring the coded form.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some(seed) = decode_replay_code(token) {
            SeedInfo::from_replay_code(seed, token.trim().to_uppercase())
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        match index.get(&info.seed).and_then(|slot| deduped.get_mut(*slot)) {
            Some(existing) => {
                if existing.code.is_none() && info.code.is_some() {
                    *existing = info;
                }
            }
            None => {
                index.insert(info.seed, deduped.len());
                deduped.push(info);
            }
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(deduped)
}
