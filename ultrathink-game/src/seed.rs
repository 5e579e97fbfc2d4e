//! Reversible replay-code scheme over a 64-word list.
//! Code format: `UT-<WORD><NN>`, e.g. `UT-DIAMOND42`.

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const CODE_PREFIX: &str = "UT";

// Word list for replay codes
pub const WORD_LIST: [&str; 64] = [
    "DIAMOND", "HANDS", "MOON", "LAMBO", "WAGMI", "NGMI", "DEGEN", "APE", "WHALE", "SHRIMP",
    "PUMP", "DUMP", "RUG", "EXIT", "BAG", "HODL", "SELL", "FOMO", "FUD", "ALPHA", "BETA",
    "GAS", "MINT", "BURN", "STAKE", "YIELD", "FARM", "VAULT", "BRIDGE", "ORACLE", "LEDGER",
    "WALLET", "SEED", "SHILL", "CANDLE", "WICK", "BULL", "BEAR", "CRAB", "FLIP", "SNIPE",
    "PRESALE", "AIRDROP", "TOKEN", "CHART", "SIGNAL", "NOISE", "TONE", "HYPE", "BAIT", "SAFE",
    "AUDIT", "LOCK", "MULTISIG", "TREASURY", "LISTING", "ROADMAP", "WHITEPAPER", "DISCORD",
    "TELEGRAM", "THREAD", "SPACES", "ROCKET", "ZERO",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 9];
    buf[..6].copy_from_slice(b"ULTRA-");
    buf[6] = (packed & 0xFF) as u8;
    buf[7] = (packed >> 8) as u8;
    buf[8] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the code for a seed. Only the low 16 bits matter, so any seed maps
/// onto some code; seeds produced by [`decode_replay_code`] map back exactly.
#[must_use]
pub fn encode_replay_code(seed: u64) -> String {
    let packed = (seed & 0xFFFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST.get(wi as usize).copied().unwrap_or(WORD_LIST[0]);
    if nn > 99 {
        nn %= 100;
    }
    format!("{CODE_PREFIX}-{word}{nn:02}")
}

#[must_use]
pub fn decode_replay_code(code: &str) -> Option<u64> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    if !nn_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    encode_replay_code(compose_seed(wi, nn))
}
