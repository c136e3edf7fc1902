use rand::{
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
    Rng, SeedableRng,
};

use crate::domain::{EmailRecord, Label};

use super::phrases::*;

const BODY_WRAP_WIDTH: usize = 100;
const MAX_SUBJECT_WORDS: usize = 7;

/// Target number of records per label, in generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution(Vec<(Label, usize)>);

impl Distribution {
    pub fn new(counts: Vec<(Label, usize)>) -> Self {
        Self(counts)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, usize)> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new(vec![
            (Label::Normal, 80),
            (Label::Spam, 40),
            (Label::HighPriority, 30),
        ])
    }
}

pub struct Synthesizer<R> {
    rng: R,
}

impl Synthesizer<StdRng> {
    /// A fixed seed makes the generated dataset reproducible.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl<R: Rng> Synthesizer<R> {
    /// Produces exactly `total` shuffled records. A distribution that sums
    /// short of `total` is padded with normal emails; one that overshoots is
    /// truncated.
    pub fn generate(&mut self, total: usize, distribution: &Distribution) -> Vec<EmailRecord> {
        let mut records = Vec::with_capacity(total.max(distribution.total()));
        for (label, count) in distribution.iter() {
            for _ in 0..count {
                records.push(self.record(label));
            }
        }
        records.shuffle(&mut self.rng);

        while records.len() < total {
            records.push(self.record(Label::Normal));
        }
        records.truncate(total);
        records
    }

    pub fn record(&mut self, label: Label) -> EmailRecord {
        EmailRecord {
            subject: self.subject(label),
            body: self.body(label),
            label,
        }
    }

    pub fn subject(&mut self, label: Label) -> String {
        match label {
            Label::Spam => {
                let opener = self.pick(SPAM_SUBJECT_OPENERS);
                let tail = self.pick(SPAM_SUBJECT_TAILS);
                format!("{opener} {tail}").trim().to_string()
            }
            Label::HighPriority => self.pick(HIGH_PRIORITY_SUBJECTS).to_string(),
            Label::Normal => {
                let subject = format!(
                    "{} {} {}",
                    self.pick(SUBJECT_STARTS),
                    self.pick(SUBJECT_CONNECTORS),
                    self.pick(SUBJECT_OBJECTS)
                );
                let words: Vec<&str> = subject.split_whitespace().collect();
                if words.len() > MAX_SUBJECT_WORDS {
                    words[..MAX_SUBJECT_WORDS - 1].join(" ")
                } else {
                    subject
                }
            }
        }
    }

    pub fn body(&mut self, label: Label) -> String {
        let pool = sentence_pool(label);
        let count = self.rng.random_range(2..=5);
        let sentences: Vec<&str> = (0..count).map(|_| self.pick(&pool)).collect();
        wrap(&sentences.join(" "), BODY_WRAP_WIDTH)
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn sentence_pool(label: Label) -> Vec<&'static str> {
    match label {
        Label::Spam => SPAM_SENTENCES
            .iter()
            .chain(PHISHING_SENTENCES)
            .copied()
            .collect(),
        Label::HighPriority => HIGH_PRIORITY_SENTENCES.to_vec(),
        Label::Normal => NORMAL_SENTENCES.to_vec(),
    }
}

/// Greedy word wrap on whitespace. Words longer than `width` get a line of
/// their own.
pub fn wrap(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Records per label in canonical label order.
pub fn label_counts(records: &[EmailRecord]) -> Vec<(Label, usize)> {
    Label::ALL
        .iter()
        .map(|label| {
            let count = records.iter().filter(|r| r.label == *label).count();
            (*label, count)
        })
        .collect()
}
