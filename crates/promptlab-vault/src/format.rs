//! Display masking and local key-shape checks.
//!
//! Both are pure: no storage, no network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Provider;

const VISIBLE_EDGE: usize = 4;

static GEMINI_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^AIza[A-Za-z0-9_-]{35}$").expect("gemini key pattern is valid")
});

static OPENAI_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sk-[A-Za-z0-9]{48}$").expect("openai key pattern is valid"));

pub(crate) fn key_pattern(provider: Provider) -> &'static Regex {
    match provider {
        Provider::Gemini => &GEMINI_KEY,
        Provider::OpenAi => &OPENAI_KEY,
    }
}

/// Mask an API key for display.
///
/// Keys of eight characters or fewer are fully starred. Longer keys keep
/// their first and last four characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= VISIBLE_EDGE * 2 {
        return "*".repeat(len);
    }

    let mut masked = String::with_capacity(key.len());
    masked.extend(&chars[..VISIBLE_EDGE]);
    masked.push_str(&"*".repeat(len - VISIBLE_EDGE * 2));
    masked.extend(&chars[len - VISIBLE_EDGE..]);
    masked
}

/// Check `key` against the named provider's key shape.
///
/// Unknown provider names are never valid.
pub fn validate_key_format(provider: &str, key: &str) -> bool {
    provider
        .parse::<Provider>()
        .map(|p| p.matches_key_format(key))
        .unwrap_or(false)
}
