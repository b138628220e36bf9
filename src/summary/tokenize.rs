//! Sentence and word tokenization for English prose.
//!
//! Sentence boundaries follow the usual heuristics: a run of `.`, `!` or `?`
//! (plus any closing quotes or brackets) followed by whitespace ends a
//! sentence unless the period belongs to a known abbreviation or an initial,
//! or the next word starts in lowercase. A blank line always ends one.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Abbreviations whose trailing period does not end a sentence,
/// case-folded and without that period.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "ft", "vs", "etc", "e.g", "i.e",
    "cf", "al", "approx", "inc", "ltd", "co", "corp", "dept", "est", "fig", "no", "vol", "gen",
    "gov", "sen", "rep", "capt", "col", "lt", "sgt", "jan", "feb", "mar", "apr", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec",
];

static ABBREVIATION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ABBREVIATIONS.iter().copied().collect());

/// Forces the one-time construction of the abbreviation set.
pub(crate) fn load() {
    LazyLock::force(&ABBREVIATION_SET);
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}' | '\u{00BB}')
}

/// Decides whether a terminator run really ends the sentence.
///
/// `before` is the sentence text up to the first terminator, `terminator`
/// that character, and `after` everything following the closing run.
fn ends_sentence(before: &str, terminator: char, after: &str) -> bool {
    let Some(next) = after.chars().find(|c| !c.is_whitespace()) else {
        return true;
    };
    if next.is_lowercase() {
        return false;
    }
    if terminator != '.' {
        return true;
    }

    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    let mut chars = word.chars();
    // A single letter is an initial ("J. S. Bach").
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_alphabetic() {
            return false;
        }
    }
    !ABBREVIATION_SET.contains(word.to_lowercase().as_str())
}

fn push_fragment<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if fragment.chars().any(char::is_alphanumeric) {
        sentences.push(fragment);
    }
}

/// Splits text into sentences, preserving their order.
///
/// Each sentence is a trimmed slice of the input; fragments with no
/// alphanumeric character are dropped.
///
/// # Examples
///
/// ```
/// use promptscore::summary::split_sentences;
///
/// let sentences = split_sentences("Dr. Smith plays. Does she sing? Yes!");
/// assert_eq!(sentences, vec!["Dr. Smith plays.", "Does she sing?", "Yes!"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' {
            let mut j = i + 1;
            let mut blank_line = false;
            while j < chars.len() && chars[j].1.is_whitespace() {
                blank_line |= chars[j].1 == '\n';
                j += 1;
            }
            if blank_line {
                push_fragment(&mut sentences, &text[start..pos]);
                start = chars.get(j).map_or(text.len(), |&(p, _)| p);
            }
            i = j;
            continue;
        }

        if !is_terminator(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (is_terminator(chars[j].1) || is_closing(chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map_or(text.len(), |&(p, _)| p);

        // "3.5", "e.g." mid-word and URLs are not boundaries.
        let followed_by_space = chars.get(j).map_or(true, |&(_, next)| next.is_whitespace());
        if followed_by_space && ends_sentence(&text[start..pos], c, &text[end..]) {
            push_fragment(&mut sentences, &text[start..end]);
            start = end;
        }
        i = j;
    }
    push_fragment(&mut sentences, &text[start..]);

    sentences
}

/// Splits text into case-folded alphanumeric words.
///
/// Every run of non-alphanumeric characters is a separator, so punctuation
/// never forms a token and "don't" yields "don" and "t".
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}
