//! In-memory provider doubles.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{RecError, Result};
use crate::providers::{PageFetcher, TextGenerator};
use crate::search::Embedder;

/// Serves fixed pages; any other URL is unreachable.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(url.into(), text.into());
        self
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| {
                RecError::InputError(format!("could not fetch {url}: connection refused"))
            })
    }
}

/// Always answers with the same text and remembers the prompts it saw.
#[derive(Debug)]
pub struct StaticGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl TextGenerator for StaticGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.reply.clone())
    }
}

/// Every call fails, as a timed-out or unavailable model would.
#[derive(Debug, Default)]
pub struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RecError::Provider("generation timed out".to_string()))
    }
}

/// Claims another embedder's identity but cannot embed anything.
#[derive(Debug)]
pub struct FailingEmbedder {
    model_id: String,
    dimension: usize,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn mimicking(embedder: &dyn Embedder) -> Self {
        Self {
            model_id: embedder.model_id(),
            dimension: embedder.dimension(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RecError::Provider("embedding service unavailable".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }
}

/// Wraps an embedder and counts calls.
pub struct CountingEmbedder<E> {
    inner: E,
    calls: AtomicUsize,
}

impl<E: Embedder> CountingEmbedder<E> {
    pub const fn new(inner: E) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<E: Embedder> Embedder for CountingEmbedder<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn model_id(&self) -> String {
        self.inner.model_id()
    }
}
