use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RecError, Result};

/// Environment lookup used for overrides; `std::env::var` in production.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Config {
    /// Defaults, then either the explicit file or the global and project
    /// files, then `ASSESSREC_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        Self::load_with(explicit_path, project_root, &|key: &str| std::env::var(key).ok())
    }

    pub fn load_with(
        explicit_path: Option<&Path>,
        project_root: &Path,
        env: EnvLookup<'_>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("ASSESSREC_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                RecError::MissingConfig(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("assessrec/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join("assessrec.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| RecError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| RecError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.generation {
            self.generation.merge(patch);
        }
        if let Some(patch) = patch.fetch {
            self.fetch.merge(patch);
        }
        if let Some(patch) = patch.pipeline {
            self.pipeline.merge(patch);
        }
        if let Some(patch) = patch.gemini {
            self.gemini.merge(patch);
        }
    }

    /// Apply `ASSESSREC_*` overrides read through `env`.
    pub fn apply_overrides(&mut self, env: EnvLookup<'_>) -> Result<()> {
        if let Some(value) = env("ASSESSREC_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = env("ASSESSREC_INDEX_SNAPSHOT_PATH") {
            self.index.snapshot_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_bool(env, "ASSESSREC_INDEX_AUTO_BUILD") {
            self.index.auto_build = value;
        }
        if let Some(value) = env("ASSESSREC_EMBEDDING_BACKEND") {
            self.embedding.backend = EmbeddingBackend::parse(&value)?;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_EMBEDDING_HASH_DIMS")? {
            self.embedding.hash_dims = value;
        }
        if let Some(value) = env("ASSESSREC_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_EMBEDDING_MODEL_DIMS")? {
            self.embedding.model_dims = value;
        }
        if let Some(value) = env_u64(env, "ASSESSREC_EMBEDDING_TIMEOUT_SECS")? {
            self.embedding.timeout_secs = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_EMBEDDING_CACHE_SIZE")? {
            self.embedding.cache_size = value;
        }
        if let Some(value) = env("ASSESSREC_GENERATION_BACKEND") {
            self.generation.backend = GenerationBackend::parse(&value)?;
        }
        if let Some(value) = env("ASSESSREC_GENERATION_MODEL") {
            self.generation.model = value;
        }
        if let Some(value) = env_u64(env, "ASSESSREC_GENERATION_TIMEOUT_SECS")? {
            self.generation.timeout_secs = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_GENERATION_PROMPT_CHAR_LIMIT")? {
            self.generation.prompt_char_limit = value;
        }
        if let Some(value) = env_u64(env, "ASSESSREC_FETCH_TIMEOUT_SECS")? {
            self.fetch.timeout_secs = value;
        }
        if let Some(value) = env("ASSESSREC_FETCH_USER_AGENT") {
            self.fetch.user_agent = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_PIPELINE_DEFAULT_MAX_RESULTS")? {
            self.pipeline.default_max_results = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_PIPELINE_MAX_RESULTS_LIMIT")? {
            self.pipeline.max_results_limit = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_PIPELINE_DESCRIPTION_MAX_CHARS")? {
            self.pipeline.description_max_chars = value;
        }
        if let Some(value) = env_usize(env, "ASSESSREC_PIPELINE_MAX_CONCURRENCY")? {
            self.pipeline.max_concurrency = value;
        }
        if let Some(value) = env("ASSESSREC_GEMINI_API_KEY")
            .or_else(|| env("GEMINI_API_KEY"))
            .or_else(|| env("GOOGLE_API_KEY"))
        {
            self.gemini.api_key = Some(value);
        }
        if let Some(value) = env("ASSESSREC_GEMINI_BASE_URL") {
            self.gemini.base_url = value;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.max_results_limit == 0 {
            return Err(RecError::Config(
                "pipeline.max_results_limit must be at least 1".to_string(),
            ));
        }
        if self.pipeline.default_max_results == 0
            || self.pipeline.default_max_results > self.pipeline.max_results_limit
        {
            return Err(RecError::Config(format!(
                "pipeline.default_max_results must be between 1 and {}",
                self.pipeline.max_results_limit
            )));
        }
        if self.embedding.hash_dims == 0 || self.embedding.model_dims == 0 {
            return Err(RecError::Config("embedding dimensions must be positive".to_string()));
        }
        for (name, secs) in [
            ("embedding.timeout_secs", self.embedding.timeout_secs),
            ("generation.timeout_secs", self.generation.timeout_secs),
            ("fetch.timeout_secs", self.fetch.timeout_secs),
        ] {
            if secs == 0 {
                return Err(RecError::Config(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    /// Where the index snapshot lives.
    pub fn snapshot_path(&self) -> PathBuf {
        self.index.snapshot_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".assessrec"))
                .join("assessrec/index.json")
        })
    }

    /// Gemini API key, required when either backend is `gemini`.
    pub fn gemini_api_key(&self) -> Result<&str> {
        self.gemini
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                RecError::MissingConfig(
                    "gemini.api_key (or ASSESSREC_GEMINI_API_KEY / GEMINI_API_KEY) is not set".to_string(),
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/assessments.csv"),
        }
    }
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Defaults to `<data dir>/assessrec/index.json`.
    pub snapshot_path: Option<PathBuf>,
    /// Build from the catalog in memory when no usable snapshot exists.
    pub auto_build: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            auto_build: true,
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexPatch) {
        if let Some(value) = patch.snapshot_path {
            self.snapshot_path = Some(value);
        }
        if let Some(value) = patch.auto_build {
            self.auto_build = value;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Hash,
    Gemini,
}

impl EmbeddingBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "gemini" => Ok(Self::Gemini),
            _ => Err(RecError::Config(format!(
                "invalid embedding backend {value} (expected hash|gemini)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub hash_dims: usize,
    pub model: String,
    pub model_dims: usize,
    pub timeout_secs: u64,
    /// Query embeddings kept in the LRU cache.
    pub cache_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hash,
            hash_dims: 384,
            model: "models/embedding-001".to_string(),
            model_dims: 768,
            timeout_secs: 15,
            cache_size: 512,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.hash_dims {
            self.hash_dims = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.model_dims {
            self.model_dims = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.cache_size {
            self.cache_size = value;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    #[default]
    Disabled,
    Gemini,
}

impl GenerationBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            "gemini" => Ok(Self::Gemini),
            _ => Err(RecError::Config(format!(
                "invalid generation backend {value} (expected disabled|gemini)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    pub model: String,
    pub timeout_secs: u64,
    pub prompt_char_limit: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::Disabled,
            model: "models/gemini-2.0-flash".to_string(),
            timeout_secs: 30,
            prompt_char_limit: 3000,
        }
    }
}

impl GenerationConfig {
    fn merge(&mut self, patch: GenerationPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.prompt_char_limit {
            self.prompt_char_limit = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: crate::providers::fetch::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    fn merge(&mut self, patch: FetchPatch) {
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.user_agent {
            self.user_agent = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub default_max_results: usize,
    pub max_results_limit: usize,
    pub description_max_chars: usize,
    /// Worker threads for batch requests.
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_max_results: 5,
            max_results_limit: 10,
            description_max_chars: 500,
            max_concurrency: 4,
        }
    }
}

impl PipelineConfig {
    fn merge(&mut self, patch: PipelinePatch) {
        if let Some(value) = patch.default_max_results {
            self.default_max_results = value;
        }
        if let Some(value) = patch.max_results_limit {
            self.max_results_limit = value;
        }
        if let Some(value) = patch.description_max_chars {
            self.description_max_chars = value;
        }
        if let Some(value) = patch.max_concurrency {
            self.max_concurrency = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::providers::gemini::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    fn merge(&mut self, patch: GeminiPatch) {
        if let Some(value) = patch.api_key {
            self.api_key = Some(value);
        }
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub catalog: Option<CatalogPatch>,
    pub index: Option<IndexPatch>,
    pub embedding: Option<EmbeddingPatch>,
    pub generation: Option<GenerationPatch>,
    pub fetch: Option<FetchPatch>,
    pub pipeline: Option<PipelinePatch>,
    pub gemini: Option<GeminiPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IndexPatch {
    pub snapshot_path: Option<PathBuf>,
    pub auto_build: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<EmbeddingBackend>,
    pub hash_dims: Option<usize>,
    pub model: Option<String>,
    pub model_dims: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub cache_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerationPatch {
    pub backend: Option<GenerationBackend>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub prompt_char_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FetchPatch {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PipelinePatch {
    pub default_max_results: Option<usize>,
    pub max_results_limit: Option<usize>,
    pub description_max_chars: Option<usize>,
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeminiPatch {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

fn env_bool(env: EnvLookup<'_>, key: &str) -> Option<bool> {
    env(key).map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(env: EnvLookup<'_>, key: &str) -> Result<Option<u64>> {
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|err| RecError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

fn env_usize(env: EnvLookup<'_>, key: &str) -> Result<Option<usize>> {
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|err| RecError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
