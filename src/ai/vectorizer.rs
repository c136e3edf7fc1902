use std::sync::{Mutex, MutexGuard, PoisonError};

use linfa_preprocessing::{CountVectorizer, PreprocessingError};
use ndarray::{arr1, Array1, Array2};
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use thiserror::Error;

/// English stop words removed before counting.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Error)]
pub enum VectorizerError {
    #[error("cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,
    #[error("empty vocabulary; documents contain only stop words or short tokens")]
    EmptyVocabulary,
    #[error("vocabulary holds {vocabulary} terms but {idf} idf weights")]
    ShapeMismatch { vocabulary: usize, idf: usize },
    #[error("idf weight {value} for feature {index} is not a finite value of at least 1")]
    InvalidIdf { index: usize, value: f64 },
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
}

/// TF-IDF text vectorizer over unigrams and bigrams.
///
/// Tokenization, stop-word removal and the bounded vocabulary come from
/// linfa's `CountVectorizer`. The smoothed IDF weights are fixed at fit time,
/// so a single document is weighted exactly as it was inside the training
/// batch. Rows are scaled to unit L2 norm.
#[derive(Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// The fitted counter caches its compiled token regex in a `RefCell`.
    counts: Mutex<CountVectorizer>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and IDF weights from `documents` and returns the
    /// weighted training matrix alongside the vectorizer.
    ///
    /// With `max_features` set, only the most frequent terms are kept.
    pub fn fit_transform<S: AsRef<str>>(
        max_features: Option<usize>,
        documents: &[S],
    ) -> Result<(Self, Array2<f64>), VectorizerError> {
        if documents.is_empty() {
            return Err(VectorizerError::EmptyCorpus);
        }
        let corpus: Array1<String> = documents.iter().map(|doc| doc.as_ref().to_string()).collect();

        let counts = CountVectorizer::params()
            .n_gram_range(1, 2)
            .stopwords(ENGLISH_STOP_WORDS)
            .max_features(max_features)
            .fit(&corpus)?;
        let n_features = counts.nentries();
        if n_features == 0 {
            return Err(VectorizerError::EmptyVocabulary);
        }
        let term_counts = counts.transform(&corpus)?;

        let mut doc_freq = vec![0usize; n_features];
        for (_, (_, col)) in term_counts.iter() {
            if let Some(df) = doc_freq.get_mut(col) {
                *df += 1;
            }
        }
        let n_docs = documents.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self {
            counts: Mutex::new(counts),
            idf,
        };
        let rows = vectorizer.weigh(&term_counts);
        Ok((vectorizer, rows))
    }

    /// Terms outside the fitted vocabulary are ignored.
    pub fn transform(&self, text: &str) -> Result<Array1<f64>, VectorizerError> {
        let term_counts = self.counter().transform(&arr1(&[text]))?;
        Ok(self.weigh(&term_counts).row(0).to_owned())
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Checks that a decoded vectorizer is usable: one finite IDF weight of
    /// at least 1 per vocabulary entry.
    pub fn validate(&self) -> Result<(), VectorizerError> {
        let vocabulary = self.counter().nentries();
        if vocabulary == 0 {
            return Err(VectorizerError::EmptyVocabulary);
        }
        if vocabulary != self.idf.len() {
            return Err(VectorizerError::ShapeMismatch {
                vocabulary,
                idf: self.idf.len(),
            });
        }
        match self
            .idf
            .iter()
            .enumerate()
            .find(|(_, value)| !(value.is_finite() && **value >= 1.0))
        {
            Some((index, &value)) => Err(VectorizerError::InvalidIdf { index, value }),
            None => Ok(()),
        }
    }

    fn counter(&self) -> MutexGuard<'_, CountVectorizer> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn weigh(&self, term_counts: &CsMat<usize>) -> Array2<f64> {
        let mut rows = Array2::zeros((term_counts.rows(), self.n_features()));
        for (&count, (row, col)) in term_counts.iter() {
            if let Some(idf) = self.idf.get(col) {
                rows[[row, col]] = count as f64 * idf;
            }
        }
        for mut row in rows.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|value| value / norm);
            }
        }
        rows
    }
}
