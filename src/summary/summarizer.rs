//! Word-frequency extractive summarizer.

use super::stopwords::is_stopword;
use super::tokenize::{split_sentences, words};
use std::collections::{HashMap, HashSet};

/// Returned when the input has no text at all.
pub const EMPTY_INPUT_MESSAGE: &str = "There is no text to summarize.";

/// Returned when the input has no words left after filtering stopwords.
pub const UNPROCESSABLE_MESSAGE: &str =
    "The text could not be summarized because it contains no meaningful words.";

/// Normalized term weights for one document.
///
/// Each term's weight is its count divided by the count of the most
/// frequent term, so weights lie in (0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    weights: HashMap<String, f64>,
}

impl TermFrequency {
    /// Counts the non-stopword terms of a document and normalizes them.
    pub fn from_text(text: &str) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for word in words(text).filter(|w| !is_stopword(w)) {
            *counts.entry(word).or_insert(0) += 1;
        }

        let max = counts.values().copied().max().unwrap_or(0);
        let weights = counts
            .into_iter()
            .map(|(term, count)| (term, f64::from(count) / f64::from(max)))
            .collect();
        Self { weights }
    }

    /// Returns true if no term survived filtering.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Weight of a case-folded term, or 0 if it is not a scoring term.
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    /// Sums the weights of a sentence's words; repeated words count again.
    pub fn score(&self, sentence: &str) -> f64 {
        words(sentence).map(|word| self.weight(&word)).sum()
    }
}

/// Summarizes text by selecting its highest-scoring sentences.
///
/// # Arguments
///
/// * `text` - Plain document text
/// * `target_sentence_count` - Maximum number of sentences to keep
///
/// # Returns
///
/// The selected sentences in their original order, joined by single
/// spaces. Text with no more sentences than the target comes back
/// unchanged. Empty text yields [`EMPTY_INPUT_MESSAGE`] and text made only
/// of stopwords yields [`UNPROCESSABLE_MESSAGE`].
///
/// # Examples
///
/// ```
/// use promptscore::summary::summarize;
///
/// let text = "A cat sat. A dog ran fast far away. A cat sat on the mat again.";
/// assert_eq!(
///     summarize(text, 2),
///     "A dog ran fast far away. A cat sat on the mat again."
/// );
/// ```
pub fn summarize(text: &str, target_sentence_count: usize) -> String {
    if text.trim().is_empty() {
        return EMPTY_INPUT_MESSAGE.to_string();
    }

    let sentences = split_sentences(text);
    if sentences.len() <= target_sentence_count {
        return text.to_string();
    }

    let frequencies = TermFrequency::from_text(text);
    if frequencies.is_empty() {
        tracing::debug!("No scoring terms in {} sentences", sentences.len());
        return UNPROCESSABLE_MESSAGE.to_string();
    }

    // Sentences are identified by their text; a repeat keeps its first slot.
    let mut seen: HashSet<&str> = HashSet::with_capacity(sentences.len());
    let distinct: Vec<&str> = sentences
        .into_iter()
        .filter(|sentence| seen.insert(*sentence))
        .collect();

    let scores: Vec<f64> = distinct.iter().map(|s| frequencies.score(s)).collect();

    // Stable sort: equal scores keep document order.
    let mut ranked: Vec<usize> = (0..distinct.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked.truncate(target_sentence_count);
    ranked.sort_unstable();

    tracing::debug!(
        "Selected {} of {} sentences over {} terms",
        ranked.len(),
        distinct.len(),
        frequencies.len()
    );

    ranked
        .into_iter()
        .map(|i| distinct[i])
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANIMALS: &str = "A cat sat. A dog ran fast far away. A cat sat on the mat again.";

    #[test]
    fn test_term_weights() {
        let tf = TermFrequency::from_text(ANIMALS);
        assert_eq!(tf.weight("cat"), 1.0);
        assert_eq!(tf.weight("sat"), 1.0);
        assert_eq!(tf.weight("dog"), 0.5);
        assert_eq!(tf.weight("the"), 0.0);
        assert_eq!(tf.weight("again"), 0.0);
        assert_eq!(tf.len(), 8);
    }

    #[test]
    fn test_sentence_scores_count_repeats() {
        let tf = TermFrequency::from_text(ANIMALS);
        assert_eq!(tf.score("A cat sat."), 2.0);
        assert_eq!(tf.score("A dog ran fast far away."), 2.5);
        assert_eq!(tf.score("Cat cat CAT"), 3.0);
        assert_eq!(tf.score("Nothing relevant here"), 0.0);
    }

    #[test]
    fn test_selection_keeps_document_order() {
        assert_eq!(
            summarize(ANIMALS, 2),
            "A dog ran fast far away. A cat sat on the mat again."
        );
    }

    #[test]
    fn test_highest_score_wins_regardless_of_position() {
        let text = "Music moves people. The weather was mild. \
                    Music theory explains how music moves people.";
        assert_eq!(
            summarize(text, 1),
            "Music theory explains how music moves people."
        );
    }

    #[test]
    fn test_ties_prefer_earlier_sentences() {
        let text = "Red apples. Green pears. Blue plums.";
        assert_eq!(summarize(text, 2), "Red apples. Green pears.");
    }

    #[test]
    fn test_short_text_is_returned_unchanged() {
        let text = "  Only one sentence here!  ";
        assert_eq!(summarize(text, 1), text);
        assert_eq!(summarize(ANIMALS, 3), ANIMALS);
        assert_eq!(summarize(ANIMALS, 10), ANIMALS);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize("", 3), EMPTY_INPUT_MESSAGE);
        assert_eq!(summarize(" \n\t ", 3), EMPTY_INPUT_MESSAGE);
    }

    #[test]
    fn test_only_stopwords() {
        let text = "It is what it is. They were there. Was it? It was.";
        assert_eq!(summarize(text, 2), UNPROCESSABLE_MESSAGE);
    }

    #[test]
    fn test_duplicate_sentences_are_counted_once() {
        let text = "Piano practice matters. Piano practice matters. Rest days help. \
                    Scales build piano technique.";
        assert_eq!(
            summarize(text, 2),
            "Piano practice matters. Scales build piano technique."
        );
    }

    #[test]
    fn test_many_repeats_keep_first_positions() {
        let mut text = String::new();
        for _ in 0..2000 {
            text.push_str("Filler line repeats. ");
        }
        text.push_str("Melody carries melody themes. Filler line repeats.");
        assert_eq!(
            summarize(&text, 2),
            "Filler line repeats. Melody carries melody themes."
        );
    }

    #[test]
    fn test_zero_target() {
        assert_eq!(summarize(ANIMALS, 0), "");
    }
}
