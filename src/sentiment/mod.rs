//! Review sentiment labeling
//!
//! Includes:
//! - a lexicon-based polarity scorer
//! - the Positive/Negative/Neutral labeling rule
//! - per-label counts over a reviews table

mod analyzer;
mod lexicon;

use std::fmt;
use std::sync::OnceLock;

use log::debug;
use polars::prelude::*;

use crate::data::ReviewTable;

pub use analyzer::SentimentAnalyzer;
pub use lexicon::Lexicon;

/// Column appended by [`label_reviews`]
pub const SENTIMENT_COLUMN: &str = "sentiment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Label for a polarity score: above zero is positive, below is negative
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Sentiment::Positive
        } else if polarity < 0.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review with its derived label
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub review_text: Option<String>,
    pub sentiment: Sentiment,
}

fn default_analyzer() -> &'static SentimentAnalyzer {
    static ANALYZER: OnceLock<SentimentAnalyzer> = OnceLock::new();
    ANALYZER.get_or_init(SentimentAnalyzer::default)
}

/// Classify one review; a missing text is treated as empty and is Neutral
pub fn classify(text: Option<&str>) -> Sentiment {
    Sentiment::from_polarity(default_analyzer().polarity(text.unwrap_or("")))
}

/// Label every review and append a `sentiment` column to the table
pub fn label_reviews(reviews: &mut ReviewTable) -> crate::Result<Vec<ReviewRecord>> {
    let records: Vec<ReviewRecord> = reviews
        .review_texts()?
        .into_iter()
        .map(|text| ReviewRecord {
            review_text: text.map(str::to_string),
            sentiment: classify(text),
        })
        .collect();

    let labels: Vec<&str> = records.iter().map(|r| r.sentiment.as_str()).collect();
    reviews
        .frame_mut()
        .with_column(Series::new(SENTIMENT_COLUMN.into(), labels))?;

    debug!("Labeled {} reviews", records.len());
    Ok(records)
}

/// Count labels, most frequent first; equal counts keep first-seen order
pub fn count_sentiments(records: &[ReviewRecord]) -> Vec<(Sentiment, usize)> {
    let mut counts: Vec<(Sentiment, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(label, _)| *label == record.sentiment) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.sentiment, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_total() {
        assert_eq!(classify(Some("great product")), Sentiment::Positive);
        assert_eq!(classify(Some("terrible")), Sentiment::Negative);
        assert_eq!(classify(Some("")), Sentiment::Neutral);
        assert_eq!(classify(None), Sentiment::Neutral);
        assert_eq!(classify(Some("ok item")), Sentiment::Positive);
        assert_eq!(classify(Some("12345 ???")), Sentiment::Neutral);
        assert_eq!(classify(Some("not a good juice")), Sentiment::Negative);
    }

    #[test]
    fn test_from_polarity_boundaries() {
        assert_eq!(Sentiment::from_polarity(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(1e-6), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-1e-6), Sentiment::Negative);
    }

    #[test]
    fn test_label_reviews_appends_column() {
        let mut reviews =
            ReviewTable::from_texts(&[Some("great product"), None, Some("awful taste")]).unwrap();

        let records = label_reviews(&mut reviews).unwrap();
        assert_eq!(records[1].review_text, None);
        assert_eq!(records[1].sentiment, Sentiment::Neutral);

        let column = reviews.frame().column(SENTIMENT_COLUMN).unwrap();
        let labels: Vec<Option<&str>> = column
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            labels,
            vec![Some("Positive"), Some("Neutral"), Some("Negative")]
        );
    }

    #[test]
    fn test_count_sentiments_orders_by_frequency() {
        let records: Vec<ReviewRecord> = [
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Positive,
            Sentiment::Negative,
        ]
        .into_iter()
        .map(|sentiment| ReviewRecord {
            review_text: None,
            sentiment,
        })
        .collect();

        assert_eq!(
            count_sentiments(&records),
            vec![
                (Sentiment::Positive, 2),
                (Sentiment::Negative, 2),
                (Sentiment::Neutral, 1),
            ]
        );
    }
}
