//! Canonical tag vocabularies shared by the catalog and the query side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::dictionary::{PhraseTable, normalize_tokens};

/// Canonical job level tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobLevel {
    Entry,
    Graduate,
    Mid,
    Professional,
    Senior,
    Analyst,
    Supervisor,
    FrontLineManager,
    Manager,
    Director,
    Executive,
    GeneralPopulation,
}

impl JobLevel {
    pub const ALL: [Self; 12] = [
        Self::Entry,
        Self::Graduate,
        Self::Mid,
        Self::Professional,
        Self::Senior,
        Self::Analyst,
        Self::Supervisor,
        Self::FrontLineManager,
        Self::Manager,
        Self::Director,
        Self::Executive,
        Self::GeneralPopulation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "Entry-Level",
            Self::Graduate => "Graduate",
            Self::Mid => "Mid-Professional",
            Self::Professional => "Professional Individual Contributor",
            Self::Senior => "Senior",
            Self::Analyst => "Analyst",
            Self::Supervisor => "Supervisor",
            Self::FrontLineManager => "Front Line Manager",
            Self::Manager => "Manager",
            Self::Director => "Director",
            Self::Executive => "Executive",
            Self::GeneralPopulation => "General Population",
        }
    }

    /// Parse a catalog label such as `Mid-Professional` or `Front Line Manager`.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = normalize_tokens(label).join(" ");
        let level = match key.as_str() {
            "entry" | "entry level" => Self::Entry,
            "graduate" | "graduates" => Self::Graduate,
            "mid" | "mid level" | "mid professional" => Self::Mid,
            "professional" | "professional individual contributor" | "individual contributor" => {
                Self::Professional
            }
            "senior" => Self::Senior,
            "analyst" => Self::Analyst,
            "supervisor" => Self::Supervisor,
            "front line manager" | "frontline manager" => Self::FrontLineManager,
            "manager" => Self::Manager,
            "director" => Self::Director,
            "executive" => Self::Executive,
            "general population" => Self::GeneralPopulation,
            _ => return None,
        };
        Some(level)
    }
}

impl fmt::Display for JobLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed test-type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestType {
    Cognitive,
    Personality,
    Aptitude,
    Behavioral,
    Knowledge,
    Simulation,
}

impl TestType {
    pub const ALL: [Self; 6] = [
        Self::Cognitive,
        Self::Personality,
        Self::Aptitude,
        Self::Behavioral,
        Self::Knowledge,
        Self::Simulation,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cognitive => "Cognitive",
            Self::Personality => "Personality",
            Self::Aptitude => "Aptitude",
            Self::Behavioral => "Behavioral",
            Self::Knowledge => "Knowledge",
            Self::Simulation => "Simulation",
        }
    }

    /// Parse a catalog test-type cell entry.
    ///
    /// Accepts the single-letter catalog codes (A, B, C, D, E, K, P, S) as
    /// well as spelled-out category names. Ability & Aptitude (A) maps to
    /// both Cognitive and Aptitude.
    pub fn from_label(label: &str) -> Vec<Self> {
        let trimmed = label.trim();
        if trimmed.len() == 1 {
            return match trimmed.to_ascii_uppercase().as_str() {
                "A" => vec![Self::Cognitive, Self::Aptitude],
                "B" | "C" | "D" => vec![Self::Behavioral],
                "E" | "S" => vec![Self::Simulation],
                "K" => vec![Self::Knowledge],
                "P" => vec![Self::Personality],
                _ => Vec::new(),
            };
        }

        let key = normalize_tokens(trimmed).join(" ");
        match key.as_str() {
            "ability aptitude" | "ability and aptitude" => vec![Self::Cognitive, Self::Aptitude],
            "cognitive" | "ability" => vec![Self::Cognitive],
            "aptitude" => vec![Self::Aptitude],
            "personality" | "personality behavior" | "personality and behavior"
            | "personality behaviour" | "personality and behaviour" => vec![Self::Personality],
            "behavioral" | "behavioural" | "competencies" | "development and 360"
            | "development 360" | "biodata situational judgment"
            | "biodata and situational judgment" | "biodata situational judgement"
            | "biodata and situational judgement" => vec![Self::Behavioral],
            "knowledge" | "knowledge skills" | "knowledge and skills" => vec![Self::Knowledge],
            "simulation" | "simulations" | "assessment exercises" => vec![Self::Simulation],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported natural language, identified by its canonical lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Find every supported language named in `text`.
    ///
    /// `English (USA)` and `Latin American Spanish` resolve to `english`
    /// and `spanish`.
    pub fn find_all(text: &str) -> Vec<Self> {
        LANGUAGES
            .scan(&normalize_tokens(text))
            .into_iter()
            .map(|name| Self(name.to_string()))
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("arabic", "arabic"),
    ("chinese simplified", "chinese simplified"),
    ("simplified chinese", "chinese simplified"),
    ("chinese traditional", "chinese traditional"),
    ("traditional chinese", "chinese traditional"),
    ("czech", "czech"),
    ("danish", "danish"),
    ("dutch", "dutch"),
    ("english", "english"),
    ("estonian", "estonian"),
    ("finnish", "finnish"),
    ("flemish", "flemish"),
    ("french", "french"),
    ("german", "german"),
    ("greek", "greek"),
    ("hungarian", "hungarian"),
    ("icelandic", "icelandic"),
    ("indonesian", "indonesian"),
    ("italian", "italian"),
    ("japanese", "japanese"),
    ("korean", "korean"),
    ("latvian", "latvian"),
    ("lithuanian", "lithuanian"),
    ("malay", "malay"),
    ("norwegian", "norwegian"),
    ("polish", "polish"),
    ("portuguese", "portuguese"),
    ("romanian", "romanian"),
    ("russian", "russian"),
    ("serbian", "serbian"),
    ("slovak", "slovak"),
    ("spanish", "spanish"),
    ("swedish", "swedish"),
    ("thai", "thai"),
    ("turkish", "turkish"),
    ("vietnamese", "vietnamese"),
];

static LANGUAGES: std::sync::LazyLock<PhraseTable<&'static str>> =
    std::sync::LazyLock::new(|| PhraseTable::new(LANGUAGE_NAMES));
