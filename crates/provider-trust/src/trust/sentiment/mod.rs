mod lexicon;
pub(crate) mod tokenizer;

pub use lexicon::{Lexicon, LexiconError};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::SentimentLabel;
use tokenizer::{expand_contractions, is_negation, tokenize};

/// Intensity strictly above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Intensity strictly below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Classifier output for a single piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub label: SentimentLabel,
    pub intensity: f64,
}

impl SentimentAnalysis {
    pub const fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            intensity: 0.0,
        }
    }
}

/// Lexicon-based polarity classifier for review comments.
///
/// Intensity is the mean polarity over every token of the comment: matched tokens add their
/// lexicon weight (inverted when the closest preceding negator has not been consumed yet),
/// unmatched tokens and negators add zero but still count toward the denominator.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    lexicon: Arc<Lexicon>,
}

impl SentimentClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn classify(&self, text: &str) -> SentimentAnalysis {
        if text.trim().is_empty() {
            return SentimentAnalysis::neutral();
        }

        let lowered = expand_contractions(&text.to_lowercase());
        let tokens = tokenize(&lowered);
        if tokens.is_empty() {
            return SentimentAnalysis::neutral();
        }

        let mut total = 0.0;
        let mut negated = false;
        for token in &tokens {
            if is_negation(token) {
                negated = true;
                continue;
            }
            if let Some(weight) = self.lexicon.polarity(token) {
                total += if negated { -weight } else { weight };
                negated = false;
            }
        }

        let intensity = total / tokens.len() as f64;
        SentimentAnalysis {
            label: label_for(intensity),
            intensity,
        }
    }
}

/// Map an intensity onto the fixed ±0.1 bands.
pub fn label_for(intensity: f64) -> SentimentLabel {
    if intensity > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if intensity < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
