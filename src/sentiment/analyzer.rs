//! Pattern-style polarity scoring

use super::lexicon::Lexicon;

/// Multiplier applied to a scored word preceded by a negation
const NEGATION_FACTOR: f64 = -0.5;

/// Multiplier applied once to the last scored word when followed by `!`
const EXCLAMATION_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Exclamation,
}

/// Lexicon-based polarity scorer
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Mean polarity of the scored words in `text`, clamped to [-1.0, 1.0]
    ///
    /// An intensifier scales the next scored word, a negation in front of it
    /// multiplies it by -0.5, and a following `!` strengthens it once.
    /// Intensifiers and one-letter words may sit between a negation and its
    /// word; words of up to two letters may sit between an intensifier and
    /// its word. Text without any scored word
    /// has polarity 0.0.
    pub fn polarity(&self, text: &str) -> f64 {
        let mut assessments: Vec<f64> = Vec::new();
        let mut intensity = 1.0;
        let mut negated = false;
        let mut exclaimed = true;

        for token in tokenize(text) {
            match token {
                Token::Exclamation => {
                    if !exclaimed {
                        if let Some(last) = assessments.last_mut() {
                            *last = clamp(*last * EXCLAMATION_FACTOR);
                        }
                        exclaimed = true;
                    }
                }
                Token::Word(word) => {
                    if self.lexicon.is_negation(&word) {
                        negated = true;
                        intensity = 1.0;
                    } else if let Some(factor) = self.lexicon.intensity(&word) {
                        intensity *= factor;
                    } else if let Some(polarity) = self.lexicon.polarity(&word) {
                        let mut score = polarity * intensity;
                        if negated {
                            score *= NEGATION_FACTOR;
                        }
                        assessments.push(clamp(score));
                        intensity = 1.0;
                        negated = false;
                        exclaimed = false;
                    } else {
                        // articles and short verbs do not break a modifier
                        let len = word.trim_matches('\'').chars().count();
                        if len > 1 {
                            negated = false;
                        }
                        if len > 2 {
                            intensity = 1.0;
                        }
                    }
                }
            }
        }

        if assessments.is_empty() {
            return 0.0;
        }
        clamp(assessments.iter().sum::<f64>() / assessments.len() as f64)
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Lowercased words (letters, digits, inner apostrophes) and `!` marks
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let ch = if ch == '\u{2019}' { '\'' } else { ch };
        if ch.is_alphanumeric() || (ch == '\'' && !current.is_empty()) {
            current.extend(ch.to_lowercase());
            continue;
        }

        flush(&mut current, &mut tokens);
        if ch == '!' {
            tokens.push(Token::Exclamation);
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    let word = current.trim_end_matches('\'');
    if !word.is_empty() {
        tokens.push(Token::Word(word.to_string()));
    }
    current.clear();
}
