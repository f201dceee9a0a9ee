use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_stemmers::{Algorithm, Stemmer};

/// AFINN-165, compiled into the binary.
const AFINN_165: &str = include_str!("afinn-165.tsv");

/// Immutable word → polarity mapping with stem-level fallback.
///
/// Every entry is indexed twice: under its lower-cased surface form and under its English
/// (Snowball) stem, so `recommended`, `recommends` and `recommending` all reach the
/// `recommend` weight. Built once at startup and shared behind an `Arc`.
pub struct Lexicon {
    surface: HashMap<String, f64>,
    stems: HashMap<String, f64>,
    stemmer: Stemmer,
}

impl Lexicon {
    /// The AFINN-165 list shipped with the crate. Multi-word entries load but never match,
    /// since the tokenizer yields single words.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_reader(AFINN_165.as_bytes())
    }

    /// Build from in-memory entries. A later duplicate surface form replaces an earlier one;
    /// a stem keeps the weight of the first entry that produced it.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut surface = HashMap::new();
        let mut stems = HashMap::new();

        for (word, weight) in entries {
            let word = word.trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            stems
                .entry(stemmer.stem(&word).into_owned())
                .or_insert(weight);
            surface.insert(word, weight);
        }

        Self {
            surface,
            stems,
            stemmer,
        }
    }

    /// Parse AFINN-format data: one `word<TAB>weight` pair per line, `#` comments allowed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .quoting(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let word = record.get(0).unwrap_or_default();
            if word.is_empty() && record.len() <= 1 {
                continue;
            }

            let raw_weight = record
                .get(1)
                .filter(|value| !value.is_empty())
                .ok_or(LexiconError::MissingWeight { line })?;
            let weight = raw_weight
                .parse::<f64>()
                .ok()
                .filter(|weight| weight.is_finite())
                .ok_or_else(|| LexiconError::InvalidWeight {
                    line,
                    word: word.to_string(),
                    value: raw_weight.to_string(),
                })?;

            entries.push((word.to_string(), weight));
        }

        if entries.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self::from_entries(entries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Polarity for an already lower-cased token: surface form first, then its stem.
    pub fn polarity(&self, token: &str) -> Option<f64> {
        if let Some(weight) = self.surface.get(token) {
            return Some(*weight);
        }
        self.stems.get(self.stemmer.stem(token).as_ref()).copied()
    }

    /// Number of distinct surface entries.
    pub fn len(&self) -> usize {
        self.surface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("entries", &self.surface.len())
            .field("stems", &self.stems.len())
            .finish()
    }
}

/// Failure to load lexicon data.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("unable to open lexicon {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon data: {0}")]
    Csv(#[from] csv::Error),
    #[error("lexicon line {line}: expected `word<TAB>weight`")]
    MissingWeight { line: u64 },
    #[error("lexicon line {line}: weight {value:?} for {word:?} is not a finite number")]
    InvalidWeight {
        line: u64,
        word: String,
        value: String,
    },
    #[error("lexicon contains no entries")]
    Empty,
}
