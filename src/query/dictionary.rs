//! Static phrase dictionaries and the longest-match-first scanner.
//!
//! Text is normalized to NFKC, lowercased, and split on anything that is not
//! alphanumeric, so `Entry-Level`, `entry level` and `ENTRY LEVEL` all
//! produce the same tokens.

use std::collections::HashMap;
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

use crate::catalog::{JobLevel, TestType};

/// Normalize text into lowercase alphanumeric tokens.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    let folded: String = text
        .nfkc()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().map(str::to_string).collect()
}

/// A phrase → tag table scanned longest-match-first.
///
/// At each token position the longest phrase that matches wins and its
/// tokens are consumed, so `front line manager` never also yields `manager`.
pub struct PhraseTable<T: Copy> {
    phrases: HashMap<Vec<String>, T>,
    max_words: usize,
}

impl<T: Copy> PhraseTable<T> {
    pub fn new(entries: &[(&str, T)]) -> Self {
        let mut phrases = HashMap::with_capacity(entries.len());
        let mut max_words = 0;
        for (phrase, tag) in entries {
            let tokens = normalize_tokens(phrase);
            if tokens.is_empty() {
                continue;
            }
            max_words = max_words.max(tokens.len());
            phrases.entry(tokens).or_insert(*tag);
        }
        Self { phrases, max_words }
    }

    /// Return the tags of every matched phrase in text order.
    pub fn scan(&self, tokens: &[String]) -> Vec<T> {
        let mut found = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            let window = self.max_words.min(tokens.len() - pos);
            let matched = (1..=window)
                .rev()
                .find_map(|len| self.phrases.get(&tokens[pos..pos + len]).map(|tag| (len, *tag)));
            match matched {
                Some((len, tag)) => {
                    found.push(tag);
                    pos += len;
                }
                None => pos += 1,
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

static JOB_LEVEL_PHRASES: &[(&str, JobLevel)] = &[
    ("analyst", JobLevel::Analyst),
    ("analysts", JobLevel::Analyst),
    ("entry level", JobLevel::Entry),
    ("entry-level", JobLevel::Entry),
    ("junior", JobLevel::Entry),
    ("fresher", JobLevel::Entry),
    ("freshers", JobLevel::Entry),
    ("beginner", JobLevel::Entry),
    ("intern", JobLevel::Entry),
    ("interns", JobLevel::Entry),
    ("internship", JobLevel::Entry),
    ("trainee", JobLevel::Entry),
    ("apprentice", JobLevel::Entry),
    ("graduate", JobLevel::Graduate),
    ("graduates", JobLevel::Graduate),
    ("new grad", JobLevel::Graduate),
    ("new grads", JobLevel::Graduate),
    ("recent graduate", JobLevel::Graduate),
    ("campus hire", JobLevel::Graduate),
    ("campus hiring", JobLevel::Graduate),
    ("mid level", JobLevel::Mid),
    ("mid-level", JobLevel::Mid),
    ("mid professional", JobLevel::Mid),
    ("mid career", JobLevel::Mid),
    ("intermediate", JobLevel::Mid),
    ("professional individual contributor", JobLevel::Professional),
    ("individual contributor", JobLevel::Professional),
    ("senior", JobLevel::Senior),
    ("sr", JobLevel::Senior),
    ("principal", JobLevel::Senior),
    ("supervisor", JobLevel::Supervisor),
    ("supervisors", JobLevel::Supervisor),
    ("supervisory", JobLevel::Supervisor),
    ("team lead", JobLevel::Supervisor),
    ("team leader", JobLevel::Supervisor),
    ("front line manager", JobLevel::FrontLineManager),
    ("frontline manager", JobLevel::FrontLineManager),
    ("first line manager", JobLevel::FrontLineManager),
    ("line manager", JobLevel::FrontLineManager),
    ("manager", JobLevel::Manager),
    ("managers", JobLevel::Manager),
    ("managerial", JobLevel::Manager),
    ("people manager", JobLevel::Manager),
    ("director", JobLevel::Director),
    ("directors", JobLevel::Director),
    ("head of", JobLevel::Director),
    ("executive", JobLevel::Executive),
    ("executives", JobLevel::Executive),
    ("c suite", JobLevel::Executive),
    ("c-suite", JobLevel::Executive),
    ("vice president", JobLevel::Executive),
    ("senior leadership", JobLevel::Executive),
    ("general population", JobLevel::GeneralPopulation),
];

static TEST_TYPE_PHRASES: &[(&str, TestType)] = &[
    ("cognitive", TestType::Cognitive),
    ("cognitive ability", TestType::Cognitive),
    ("reasoning", TestType::Cognitive),
    ("numerical reasoning", TestType::Cognitive),
    ("verbal reasoning", TestType::Cognitive),
    ("inductive reasoning", TestType::Cognitive),
    ("deductive reasoning", TestType::Cognitive),
    ("problem solving", TestType::Cognitive),
    ("general ability", TestType::Cognitive),
    ("personality", TestType::Personality),
    ("personality test", TestType::Personality),
    ("personality questionnaire", TestType::Personality),
    ("opq", TestType::Personality),
    ("aptitude", TestType::Aptitude),
    ("aptitude test", TestType::Aptitude),
    ("behavioral", TestType::Behavioral),
    ("behavioural", TestType::Behavioral),
    ("behavior", TestType::Behavioral),
    ("behaviour", TestType::Behavioral),
    ("behavioral fit", TestType::Behavioral),
    ("behavioural fit", TestType::Behavioral),
    ("culture fit", TestType::Behavioral),
    ("cultural fit", TestType::Behavioral),
    ("situational judgment", TestType::Behavioral),
    ("situational judgement", TestType::Behavioral),
    ("sjt", TestType::Behavioral),
    ("biodata", TestType::Behavioral),
    ("competency", TestType::Behavioral),
    ("competencies", TestType::Behavioral),
    ("soft skill", TestType::Behavioral),
    ("soft skills", TestType::Behavioral),
    ("knowledge", TestType::Knowledge),
    ("technical", TestType::Knowledge),
    ("technical skills", TestType::Knowledge),
    ("hard skills", TestType::Knowledge),
    ("skills test", TestType::Knowledge),
    ("simulation", TestType::Simulation),
    ("simulations", TestType::Simulation),
    ("simulated", TestType::Simulation),
    ("work sample", TestType::Simulation),
    ("assessment exercise", TestType::Simulation),
    ("in tray", TestType::Simulation),
];

pub static JOB_LEVELS: LazyLock<PhraseTable<JobLevel>> =
    LazyLock::new(|| PhraseTable::new(JOB_LEVEL_PHRASES));

pub static TEST_TYPES: LazyLock<PhraseTable<TestType>> =
    LazyLock::new(|| PhraseTable::new(TEST_TYPE_PHRASES));
