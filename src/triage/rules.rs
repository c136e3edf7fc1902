use crate::domain::Label;

const URGENT_KEYWORDS: &[&str] = &[
    "urgent",
    "invoice",
    "payment",
    "due",
    "asap",
    "deadline",
    "escalation",
    "overdue",
];

const SPAM_KEYWORDS: &[&str] = &[
    "free",
    "offer",
    "discount",
    "click",
    "loan",
    "prize",
    "congratulations",
    "claim",
    "act now",
];

/// Assigns `label` when any keyword occurs as a substring of the lower-cased
/// text.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub name: &'static str,
    pub label: Label,
    keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new<I, S>(name: &'static str, label: Label, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            label,
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered keyword overrides; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<KeywordRule>,
}

impl RuleChain {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, text: &str) -> Option<&KeywordRule> {
        let lowered = text.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(
                "urgent_keywords",
                Label::HighPriority,
                URGENT_KEYWORDS.iter().copied(),
            ),
            KeywordRule::new("spam_keywords", Label::Spam, SPAM_KEYWORDS.iter().copied()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_of(text: &str) -> Option<Label> {
        RuleChain::default().evaluate(text).map(|rule| rule.label)
    }

    #[test]
    fn urgent_keywords_are_case_insensitive() {
        assert_eq!(label_of("invoice due ASAP"), Some(Label::HighPriority));
        assert_eq!(label_of("ESCALATION required"), Some(Label::HighPriority));
    }

    #[test]
    fn spam_keywords_match_phrases() {
        assert_eq!(label_of("claim your free prize now"), Some(Label::Spam));
        assert_eq!(label_of("Act Now before it ends"), Some(Label::Spam));
    }

    #[test]
    fn urgent_wins_over_spam() {
        assert_eq!(label_of("Free offer: payment overdue"), Some(Label::HighPriority));
    }

    #[test]
    fn matching_is_by_substring() {
        assert_eq!(label_of("residue analysis"), Some(Label::HighPriority));
        assert_eq!(label_of("freedom of speech"), Some(Label::Spam));
    }

    #[test]
    fn plain_text_falls_through() {
        assert_eq!(label_of("Notes from our weekly sync"), None);
        assert_eq!(label_of(""), None);
    }

    #[test]
    fn custom_chains_respect_order() {
        let chain = RuleChain::new(vec![
            KeywordRule::new("spam_first", Label::Spam, ["report"]),
            KeywordRule::new("normal_second", Label::Normal, ["report"]),
        ]);
        assert_eq!(chain.evaluate("Quarterly REPORT").unwrap().name, "spam_first");
    }
}
