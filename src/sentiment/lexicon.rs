//! Embedded polarity lexicon for product reviews
//!
//! Scores follow the adjective-centric convention of pattern-style models:
//! each entry is the average polarity of the word in [-1.0, 1.0].

use std::collections::HashMap;

/// Word polarities
const POLARITY: &[(&str, f64)] = &[
    // positive
    ("amazing", 0.6),
    ("affordable", 0.3),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("cheap", 0.4),
    ("clean", 0.37),
    ("comfortable", 0.4),
    ("cool", 0.35),
    ("delicious", 1.0),
    ("delightful", 0.7),
    ("easy", 0.43),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("fast", 0.2),
    ("favorite", 0.5),
    ("favourite", 0.5),
    ("fine", 0.42),
    ("fresh", 0.3),
    ("friendly", 0.38),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("healthy", 0.5),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("lucky", 0.33),
    ("natural", 0.1),
    ("nice", 0.6),
    ("ok", 0.5),
    ("okay", 0.5),
    ("outstanding", 0.5),
    ("perfect", 1.0),
    ("pleasant", 0.73),
    ("pleased", 0.5),
    ("polite", 0.3),
    ("pure", 0.21),
    ("quick", 0.33),
    ("recommend", 0.2),
    ("recommended", 0.2),
    ("refreshing", 0.5),
    ("reliable", 0.4),
    ("rich", 0.38),
    ("satisfied", 0.5),
    ("smooth", 0.4),
    ("superb", 1.0),
    ("sweet", 0.35),
    ("tasty", 0.6),
    ("thanks", 0.2),
    ("tidy", 0.3),
    ("top", 0.5),
    ("wonderful", 1.0),
    ("worth", 0.3),
    ("yummy", 0.8),
    // negative
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("bitter", -0.1),
    ("bland", -0.33),
    ("boring", -1.0),
    ("broken", -0.4),
    ("cold", -0.1),
    ("damaged", -0.3),
    ("dirty", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disgusting", -1.0),
    ("dull", -0.31),
    ("expensive", -0.5),
    ("fake", -0.5),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("late", -0.3),
    ("leaking", -0.2),
    ("mediocre", -0.4),
    ("nasty", -1.0),
    ("overpriced", -0.4),
    ("poor", -0.4),
    ("rotten", -0.8),
    ("rude", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("sour", -0.2),
    ("spoiled", -0.6),
    ("stale", -0.5),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("unhappy", -0.6),
    ("useless", -0.5),
    ("warm", -0.1),
    ("waste", -0.2),
    ("watery", -0.4),
    ("weak", -0.38),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

/// Adverbs that scale the polarity of the next scored word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.2),
    ("so", 1.2),
    ("super", 1.3),
    ("totally", 1.3),
    ("very", 1.3),
];

/// Words that flip the next scored word
const NEGATIONS: &[&str] = &["no", "not", "never", "nothing", "hardly"];

/// Lookup tables used by [`super::SentimentAnalyzer`]
#[derive(Debug, Clone)]
pub struct Lexicon {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl Lexicon {
    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.polarity.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// `not`, `never`, ... and contractions such as `isn't` or `didn't`
    pub fn is_negation(&self, word: &str) -> bool {
        NEGATIONS.contains(&word) || word.ends_with("n't")
    }

    pub fn len(&self) -> usize {
        self.polarity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polarity.is_empty()
    }
}
