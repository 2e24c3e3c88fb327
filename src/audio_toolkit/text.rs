use natural::phonetics::soundex;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static STRIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9 ]").expect("valid strip pattern"));

/// Known child mispronunciations, keyed by the standard adult form.
///
/// Covers the English number vocabulary: dropped/softened consonants and the
/// classic "-teen" vs "-ty" confusion in both directions.
static TOLERANCE_TABLE: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let entries: [(&str, &[&str]); 28] = [
        ("one", &["wun", "won"]),
        ("two", &["to", "too"]),
        ("three", &["free", "tree", "fee"]),
        ("four", &["for", "foe"]),
        ("five", &["fife", "bive"]),
        ("six", &["sick", "sis"]),
        ("seven", &["seben", "sebben"]),
        ("eight", &["ate", "eigh"]),
        ("nine", &["nigh", "nie"]),
        ("ten", &["den", "tin"]),
        ("eleven", &["leven", "lebben"]),
        ("twelve", &["twelf", "twef"]),
        ("thirteen", &["thirty", "firteen", "turteen"]),
        ("fourteen", &["forty", "fourty"]),
        ("fifteen", &["fifty", "fifeen"]),
        ("sixteen", &["sixty", "sikteen"]),
        ("seventeen", &["seventy", "sebenteen"]),
        ("eighteen", &["eighty", "ateen"]),
        ("nineteen", &["ninety", "nineeen"]),
        ("twenty", &["twenny", "tenty"]),
        ("thirty", &["thirteen", "dirty", "firty"]),
        ("forty", &["fourteen", "fourty"]),
        ("fifty", &["fifteen", "fitty"]),
        ("sixty", &["sixteen", "sikty"]),
        ("seventy", &["seventeen", "sebenty"]),
        ("eighty", &["eighteen", "aty"]),
        ("ninety", &["nineteen", "ninedy"]),
        ("hundred", &["hundrid", "hunded", "hundwed"]),
    ];
    entries.into_iter().collect()
});

/// Canonicalizes text before any comparison: lowercase, hyphens to spaces,
/// everything outside `[a-z0-9 ]` stripped, surrounding whitespace trimmed.
///
/// Pure and total over any input; idempotent by construction.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('-', " ");
    STRIP_PATTERN.replace_all(&lowered, "").trim().to_string()
}

/// True when `heard_word` is a recognized mispronunciation of `target_word`:
/// either a tolerance-table variant or a Soundex match (phonetic leniency,
/// gated to longer words where the code is meaningful).
pub fn matches_variant(target_word: &str, heard_word: &str) -> bool {
    if target_word == heard_word {
        return false;
    }

    if let Some(variants) = TOLERANCE_TABLE.get(target_word) {
        if variants.contains(&heard_word) {
            return true;
        }
    }

    target_word.len() >= 4 && heard_word.len() >= 4 && soundex(target_word, heard_word)
}
