//! English stopword list.
//!
//! The closed list of function words that carry no topical weight. It also
//! holds the contraction fragments ("don", "t", "ll") the word tokenizer
//! produces when it splits on apostrophes.

use std::collections::HashSet;
use std::sync::LazyLock;

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().copied().collect());

/// Returns true if the case-folded word is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Forces the one-time construction of the stopword set.
pub(crate) fn load() {
    LazyLock::force(&STOPWORDS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_function_words() {
        for word in ["the", "a", "on", "again", "is", "don", "t"] {
            assert!(is_stopword(word), "{}", word);
        }
    }

    #[test]
    fn test_content_words_are_kept() {
        for word in ["cat", "melody", "piano", "ran"] {
            assert!(!is_stopword(word), "{}", word);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        // Callers fold case before lookup.
        assert!(!is_stopword("The"));
    }
}
