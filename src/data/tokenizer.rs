// ============================================================
// Layer 4 — Code-Aware Tokenizer
// ============================================================
// Turns one raw text record into the ordered tokens the
// embedding trainer learns from.
//
// Answers in a programming Q&A dataset mix prose with code:
//   "Call np.array(h2o) and check the user_id field."
// A plain whitespace split would glue punctuation to words and
// a plain word split would tear `np.array` and `user_id` apart.
//
// Three steps, applied in order:
//
//   1. Segment   — maximal runs of word characters, numerics,
//                  `_` and `.` become one unit; any other
//                  non-whitespace character is a unit of its own.
//
//   2. Classify  — first matching rule wins:
//        a) code-like: letters mixed with `_`/`.` or with digits.
//           Case is kept, one trailing punctuation char stripped.
//        b) natural language: letters only. Lower-cased,
//           dropped if it is a stop word.
//        c) anything else (punctuation, bare numbers): dropped.
//
//   3. Filter    — keep only tokens longer than 2 characters
//                  with fewer than 5 digits (drops noise like
//                  "x1" and hex-ish ids like "a1b2c3d4e5").
//
// Examples:
//   "The user_id was 42"      → ["user_id"]
//   "np.array(h2o)"           → ["np.array", "h2o"]
//   "aaaaaaaaaa1111111111"    → []
//
// Character classes are Unicode-aware: a letter is \p{L}, a
// digit is a decimal digit (\d, category Nd). Roman numerals,
// fractions and superscripts are neither.
//
// The patterns compile once per process; after that everything
// is a pure function over &str, safe to call from any thread.
//
// Reference: Rust Book §8 (Strings in Rust)
//            regex crate documentation

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::corpus::{Token, TokenSequence};
use crate::domain::record::RawRecord;

/// Stop words removed from natural-language tokens.
/// Kept sorted so lookups can binary search.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "are", "as", "at", "be", "but", "by", "if", "into", "is", "it", "no", "of",
    "on", "such", "that", "the", "their", "then", "there", "these", "they", "this", "to",
    "was", "will", "with",
];

/// Tokens must be strictly longer than this many characters
const MIN_TOKEN_CHARS: usize = 2;

/// Tokens must contain strictly fewer digits than this
const MAX_TOKEN_DIGITS: usize = 5;

/// A run of word characters, numerics and dots, or one other
/// visible char. `\p{N}` keeps "abc½" and "ⅫⅫⅫ" whole.
static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w\p{N}.]+|\S").expect("unit pattern is valid"));

static DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("digit pattern is valid"));

static LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}").expect("letter pattern is valid"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}+$").expect("word pattern is valid"));

static DIGITS_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("digits pattern is valid"));

/// Tokenize a raw text string.
pub fn tokenize(text: &str) -> TokenSequence {
    segment(text)
        .into_iter()
        .filter_map(classify)
        .filter(|t| passes_final_filter(t))
        .collect()
}

/// Tokenize a dataset record. Records that are not text yield
/// an empty sequence so one odd cell never aborts a training run.
pub fn tokenize_record(record: &RawRecord) -> TokenSequence {
    record.as_text().map(tokenize).unwrap_or_default()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Count decimal digit characters in a string.
pub fn digit_count(s: &str) -> usize {
    DIGIT_RE.find_iter(s).count()
}

/// True for a non-empty string made only of decimal digits.
pub fn is_digits_only(s: &str) -> bool {
    DIGITS_ONLY_RE.is_match(s)
}

// ── Step 1: Segmentation ─────────────────────────────────────────────────────

/// Split text into candidate units, borrowing from the input.
fn segment(text: &str) -> Vec<&str> {
    UNIT_RE.find_iter(text).map(|m| m.as_str()).collect()
}

// ── Step 2: Classification ───────────────────────────────────────────────────

/// Trailing characters stripped from code-like units.
/// `_` and `>` survive because they are meaningful in code.
fn is_strippable(c: char) -> bool {
    c.is_ascii_punctuation() && c != '_' && c != '>'
}

fn is_code_like(unit: &str) -> bool {
    let has_letter = LETTER_RE.is_match(unit);
    if !has_letter {
        return false;
    }
    let has_joiner = unit.contains(['_', '.']);
    let has_digit  = DIGIT_RE.is_match(unit);
    (unit.chars().count() > 1 && has_joiner) || has_digit
}

/// Drop at most one trailing punctuation character.
fn strip_trailing_punctuation(unit: &str) -> &str {
    let mut chars = unit.chars();
    match chars.next_back() {
        Some(last) if is_strippable(last) && chars.next().is_some() => {
            &unit[..unit.len() - last.len_utf8()]
        }
        _ => unit,
    }
}

fn classify(unit: &str) -> Option<Token> {
    if is_code_like(unit) {
        let stripped = strip_trailing_punctuation(unit);
        // A sentence-final "Python." is only code-like because of its
        // dot; once stripped it is an ordinary word.
        if stripped.len() == unit.len() || is_code_like(stripped) {
            return Some(stripped.to_string());
        }
        return natural_language(stripped);
    }

    natural_language(unit)
}

fn natural_language(unit: &str) -> Option<Token> {
    if !WORD_RE.is_match(unit) {
        return None;
    }
    let lower = unit.to_lowercase();
    (!is_stop_word(&lower)).then_some(lower)
}

// ── Step 3: Final filter ─────────────────────────────────────────────────────

fn passes_final_filter(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_CHARS && digit_count(token) < MAX_TOKEN_DIGITS
}
