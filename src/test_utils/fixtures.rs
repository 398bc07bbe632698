use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use super::mocks::{StaticFetcher, StaticGenerator};
use crate::catalog::{AssessmentRecord, JobLevel, TestType};
use crate::pipeline::{PipelineOptions, Recommender};
use crate::providers::{PageFetcher, TextGenerator};
use crate::search::{CorpusIndex, Embedder, HashEmbedder};

/// Embedding dimension used by fixture indexes.
pub const FIXTURE_DIMS: usize = 128;

/// Catalog rows matching [`sample_records`], in CSV form.
pub const SAMPLE_CATALOG_CSV: &str = "\
name,url,description,job_levels,languages,test_type,duration,remote_testing,adaptive_irt
Java 8 (New),https://catalog.example.com/view/java-8-new/,Multi-choice test of Java 8 programming knowledge.,\"Mid-Professional, Professional Individual Contributor\",English (USA),K,18,yes,yes
Occupational Personality Questionnaire OPQ32r,https://catalog.example.com/view/opq32r/,Measures behavioural preferences and personality at work.,\"Manager, Director, Mid-Professional\",\"English (USA), Latin American Spanish\",P,25,yes,no
Verify - Numerical Ability,https://catalog.example.com/view/verify-numerical-ability/,Numerical reasoning ability test with adaptive item selection.,\"Graduate, Entry-Level, Mid-Professional\",\"English (USA), French\",A,17,yes,yes
Motivation Questionnaire MQ,https://catalog.example.com/view/motivation-questionnaire-mq/,Personality inventory covering sources of motivation at work.,\"Manager, Professional Individual Contributor\",English (USA),P,45,yes,no
Customer Service Simulation,https://catalog.example.com/view/customer-service-simulation/,Realistic customer service work sample simulation.,Entry-Level,English (USA),S,,no,no
Sales Situational Judgement,https://catalog.example.com/view/sales-situational-judgement/,Situational judgement test for sales roles.,\"Entry-Level, Graduate\",\"English (USA), German\",B,30,yes,no
";

/// Test fixture providing an isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl UnitTestFixture {
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a file with content relative to the fixture root.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Write [`SAMPLE_CATALOG_CSV`] as `catalog.csv`.
    #[must_use]
    pub fn create_catalog(&self) -> PathBuf {
        self.create_file("catalog.csv", SAMPLE_CATALOG_CSV)
    }
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Six representative catalog records.
pub fn sample_records() -> Vec<AssessmentRecord> {
    vec![
        AssessmentRecord::new("Java 8 (New)", "https://catalog.example.com/view/java-8-new/")
            .with_description("Multi-choice test of Java 8 programming knowledge.")
            .with_job_levels([JobLevel::Mid, JobLevel::Professional])
            .with_languages(["English (USA)"])
            .with_test_types([TestType::Knowledge])
            .with_duration(Some(18))
            .with_flags(true, true),
        AssessmentRecord::new(
            "Occupational Personality Questionnaire OPQ32r",
            "https://catalog.example.com/view/opq32r/",
        )
        .with_description("Measures behavioural preferences and personality at work.")
        .with_job_levels([JobLevel::Manager, JobLevel::Director, JobLevel::Mid])
        .with_languages(["English (USA)", "Latin American Spanish"])
        .with_test_types([TestType::Personality])
        .with_duration(Some(25))
        .with_flags(true, false),
        AssessmentRecord::new(
            "Verify - Numerical Ability",
            "https://catalog.example.com/view/verify-numerical-ability/",
        )
        .with_description("Numerical reasoning ability test with adaptive item selection.")
        .with_job_levels([JobLevel::Graduate, JobLevel::Entry, JobLevel::Mid])
        .with_languages(["English (USA)", "French"])
        .with_test_types([TestType::Cognitive, TestType::Aptitude])
        .with_duration(Some(17))
        .with_flags(true, true),
        AssessmentRecord::new(
            "Motivation Questionnaire MQ",
            "https://catalog.example.com/view/motivation-questionnaire-mq/",
        )
        .with_description("Personality inventory covering sources of motivation at work.")
        .with_job_levels([JobLevel::Manager, JobLevel::Professional])
        .with_languages(["English (USA)"])
        .with_test_types([TestType::Personality])
        .with_duration(Some(45))
        .with_flags(true, false),
        AssessmentRecord::new(
            "Customer Service Simulation",
            "https://catalog.example.com/view/customer-service-simulation/",
        )
        .with_description("Realistic customer service work sample simulation.")
        .with_job_levels([JobLevel::Entry])
        .with_languages(["English (USA)"])
        .with_test_types([TestType::Simulation])
        .with_duration(None)
        .with_flags(false, false),
        AssessmentRecord::new(
            "Sales Situational Judgement",
            "https://catalog.example.com/view/sales-situational-judgement/",
        )
        .with_description("Situational judgement test for sales roles.")
        .with_job_levels([JobLevel::Entry, JobLevel::Graduate])
        .with_languages(["English (USA)", "German"])
        .with_test_types([TestType::Behavioral])
        .with_duration(Some(30))
        .with_flags(true, false),
    ]
}

/// Index over [`sample_records`] embedded with `embedder`.
///
/// # Panics
///
/// Panics if the sample corpus fails to build.
pub fn sample_index(embedder: &dyn Embedder) -> CorpusIndex {
    CorpusIndex::build(sample_records(), embedder).expect("sample corpus builds")
}

/// Pipeline over the sample corpus with the hash embedder and the given
/// providers.
///
/// # Panics
///
/// Panics if the pipeline cannot be wired.
pub fn sample_recommender(
    fetcher: Arc<dyn PageFetcher>,
    generator: Arc<dyn TextGenerator>,
) -> Recommender {
    let embedder = Arc::new(HashEmbedder::new(FIXTURE_DIMS));
    let index = sample_index(embedder.as_ref());
    Recommender::new(
        Arc::new(index),
        embedder,
        fetcher,
        generator,
        PipelineOptions::default(),
    )
    .expect("sample pipeline wires")
}

/// Sample pipeline for text-only requests.
pub fn text_recommender() -> Recommender {
    sample_recommender(
        Arc::new(StaticFetcher::default()),
        Arc::new(StaticGenerator::new("unused")),
    )
}
