use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::{Catalog, load_catalog};
use crate::config::{Config, EmbeddingBackend, GenerationBackend};
use crate::error::{RecError, Result};
use crate::pipeline::{PipelineOptions, Recommender};
use crate::providers::{
    DisabledGenerator, GeminiClient, GeminiSettings, HttpPageFetcher, PageFetcher, TextGenerator,
};
use crate::search::{CorpusIndex, Embedder, HashEmbedder, load_snapshot};

pub struct AppContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        Ok(Self {
            project_root,
            config,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    pub const fn with_config(project_root: PathBuf, config: Config, robot_mode: bool) -> Self {
        Self {
            project_root,
            config,
            robot_mode,
            verbosity: 0,
        }
    }

    fn gemini_client(&self) -> Result<Arc<GeminiClient>> {
        let mut settings = GeminiSettings::new(self.config.gemini_api_key()?);
        settings.base_url.clone_from(&self.config.gemini.base_url);
        settings.embedding_model.clone_from(&self.config.embedding.model);
        settings.embedding_dimension = self.config.embedding.model_dims;
        settings.generation_model.clone_from(&self.config.generation.model);
        settings.embedding_timeout = Duration::from_secs(self.config.embedding.timeout_secs);
        settings.generation_timeout = Duration::from_secs(self.config.generation.timeout_secs);
        Ok(Arc::new(GeminiClient::new(settings)?))
    }

    /// The embedder both the corpus and queries are embedded with.
    pub fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        let embedder: Arc<dyn Embedder> = match self.config.embedding.backend {
            EmbeddingBackend::Hash => Arc::new(HashEmbedder::new(self.config.embedding.hash_dims)),
            EmbeddingBackend::Gemini => self.gemini_client()?,
        };
        Ok(embedder)
    }

    pub fn generator(&self) -> Result<Arc<dyn TextGenerator>> {
        let generator: Arc<dyn TextGenerator> = match self.config.generation.backend {
            GenerationBackend::Disabled => Arc::new(DisabledGenerator),
            GenerationBackend::Gemini => self.gemini_client()?,
        };
        Ok(generator)
    }

    pub fn fetcher(&self) -> Result<Arc<dyn PageFetcher>> {
        let fetcher = HttpPageFetcher::new(
            Duration::from_secs(self.config.fetch.timeout_secs),
            &self.config.fetch.user_agent,
        )?;
        Ok(Arc::new(fetcher))
    }

    pub fn catalog_path(&self) -> PathBuf {
        let path = &self.config.catalog.path;
        if path.is_absolute() {
            path.clone()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        load_catalog(&self.catalog_path())
    }

    /// Embed the configured catalog into a fresh index.
    pub fn build_index(&self, embedder: &dyn Embedder) -> Result<(CorpusIndex, Catalog)> {
        let mut catalog = self.load_catalog()?;
        let records = std::mem::take(&mut catalog.records);
        let index =
            CorpusIndex::build_bounded(records, embedder, self.config.pipeline.max_concurrency)?;
        Ok((index, catalog))
    }

    /// Load the snapshot, or build from the catalog when allowed.
    pub fn open_index(&self, embedder: &dyn Embedder) -> Result<CorpusIndex> {
        let snapshot = self.config.snapshot_path();
        let auto_build = self.config.index.auto_build;

        if snapshot.exists() {
            match load_snapshot(&snapshot, &embedder.model_id()) {
                Ok(index) => return Ok(index),
                Err(err @ RecError::CorpusIntegrity(_)) if auto_build => {
                    warn!(error = %err, "index snapshot unusable; rebuilding from catalog");
                }
                Err(err) => return Err(err),
            }
        } else if !auto_build {
            return Err(RecError::MissingConfig(format!(
                "no index snapshot at {}; run `assessrec index` first",
                snapshot.display()
            )));
        }

        info!(catalog = %self.catalog_path().display(), "building index in memory");
        self.build_index(embedder).map(|(index, _)| index)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_results_limit: self.config.pipeline.max_results_limit,
            description_max_chars: self.config.pipeline.description_max_chars,
            prompt_char_limit: self.config.generation.prompt_char_limit,
            embedding_cache_size: self.config.embedding.cache_size,
        }
    }

    /// Wire the full request pipeline around the opened index.
    pub fn recommender(&self) -> Result<Recommender> {
        let embedder = self.embedder()?;
        let index = self.open_index(embedder.as_ref())?;
        Recommender::new(
            Arc::new(index),
            embedder,
            self.fetcher()?,
            self.generator()?,
            self.pipeline_options(),
        )
    }
}
