//! Frequency-ranked terms per document. Feeds the narrative report only; never the score.

use std::collections::HashMap;

/// Tokens shorter than this (in characters) are dropped.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Common English function words. Matched after lower-casing.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "are", "was", "were", "been", "being", "have", "has", "had",
    "does", "did", "doing", "will", "would", "should", "could", "may", "might", "must", "shall",
    "can", "not", "but", "nor", "yet", "from", "into", "onto", "upon", "about", "above",
    "below", "over", "under", "after", "before", "during", "through", "between", "among",
    "within", "without", "this", "that", "these", "those", "there", "here", "then", "than",
    "they", "them", "their", "theirs", "you", "your", "yours", "our", "ours", "his", "her",
    "hers", "its", "she", "him", "who", "whom", "whose", "which", "what", "when", "where",
    "why", "how", "all", "any", "each", "every", "both", "few", "more", "most", "other",
    "some", "such", "only", "own", "same", "too", "very", "just", "also", "well", "via",
    "per", "etc", "out", "off", "again", "further", "once", "while", "because", "until",
    "against", "across", "along", "around", "itself", "myself", "ourselves",
    "yourself", "themselves", "himself", "herself", "one", "get", "got",
];

/// A single extracted term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub term: String,
    pub count: u32,
    /// Token index of the first occurrence; breaks frequency ties.
    pub first_seen: usize,
}

/// Unique lower-cased terms of one document, most frequent first, ties by first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Terms in rank order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.term.as_str())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.keywords.iter().any(|k| k.term == term)
    }

    #[cfg(test)]
    pub fn count(&self, term: &str) -> u32 {
        self.keywords
            .iter()
            .find(|k| k.term == term)
            .map(|k| k.count)
            .unwrap_or(0)
    }

    /// Terms of `self` that also appear in `other`, in `self`'s rank order.
    pub fn shared_with<'a>(&'a self, other: &KeywordSet) -> Vec<&'a str> {
        self.terms().filter(|t| other.contains(t)).collect()
    }

    /// Terms of `self` absent from `other`, in `self`'s rank order.
    pub fn missing_from<'a>(&'a self, other: &KeywordSet) -> Vec<&'a str> {
        self.terms().filter(|t| !other.contains(t)).collect()
    }
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lower-cases, splits on non-alphanumeric boundaries, drops short tokens and stopwords,
/// then ranks the unique terms. Deterministic for a given input.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let lowered = text.to_lowercase();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut keywords: Vec<Keyword> = Vec::new();

    let tokens = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS && !is_stopword(t));

    for (position, token) in tokens.enumerate() {
        match index.get(token) {
            Some(&slot) => keywords[slot].count += 1,
            None => {
                index.insert(token, keywords.len());
                keywords.push(Keyword {
                    term: token.to_string(),
                    count: 1,
                    first_seen: position,
                });
            }
        }
    }

    keywords.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));

    KeywordSet { keywords }
}
