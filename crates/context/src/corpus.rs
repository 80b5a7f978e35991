//! Requirements corpus store.
//!
//! Holds the two corpora the prompt pipeline reads from:
//!
//! - **program summary**: one short block per degree program
//! - **detailed requirements**: the full requirements document, with a
//!   header line opening every program's section
//!
//! Both are fetched together the first time anyone asks for them and stay
//! resident afterwards. Loading is single flight: concurrent callers that
//! arrive while the fetch is in progress wait for that same fetch, which runs
//! on its own task and survives callers that give up waiting. A failed
//! load is final for the life of the store; readers see empty text.

use std::sync::{Arc, OnceLock};

use coursechat_config::CorpusConfig;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::source::{CorpusSource, LocatorSource};

/// The two corpora known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorpusKind {
    ProgramSummary,
    DetailedRequirements,
}

impl CorpusKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::ProgramSummary => "program_summary",
            Self::DetailedRequirements => "detailed_requirements",
        }
    }
}

/// Borrowed view of both corpora, empty when the load failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusSnapshot<'a> {
    pub summary: &'a str,
    pub detailed: &'a str,
}

impl<'a> CorpusSnapshot<'a> {
    pub fn new(summary: &'a str, detailed: &'a str) -> Self {
        Self { summary, detailed }
    }

    pub fn get(&self, kind: CorpusKind) -> &'a str {
        match kind {
            CorpusKind::ProgramSummary => self.summary,
            CorpusKind::DetailedRequirements => self.detailed,
        }
    }
}

#[derive(Debug)]
enum LoadState {
    Ready { summary: String, detailed: String },
    Failed,
}

impl LoadState {
    fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// The one background load, shared by every caller that waits on it.
type SharedLoad = Shared<BoxFuture<'static, Arc<LoadState>>>;

/// Lazily loaded, process-lifetime cache of the two corpora.
pub struct CorpusStore {
    source: Arc<dyn CorpusSource>,
    summary_locator: String,
    detailed_locator: String,
    loader: OnceLock<SharedLoad>,
    state: OnceCell<Arc<LoadState>>,
}

impl CorpusStore {
    /// Create an unloaded store. Nothing is fetched until first use.
    pub fn new(
        source: Arc<dyn CorpusSource>,
        summary_locator: impl Into<String>,
        detailed_locator: impl Into<String>,
    ) -> Self {
        Self {
            source,
            summary_locator: summary_locator.into(),
            detailed_locator: detailed_locator.into(),
            loader: OnceLock::new(),
            state: OnceCell::new(),
        }
    }

    /// Build a store reading the configured paths/URLs.
    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(
            Arc::new(LocatorSource::new()),
            config.summary.clone(),
            config.detailed.clone(),
        )
    }

    /// Start (or join) the load. Same contract as [`ensure_loaded`](Self::ensure_loaded).
    pub async fn initialize(&self) -> bool {
        self.ensure_loaded().await
    }

    /// Wait for the one and only load, triggering it if nobody has yet.
    ///
    /// Returns `true` when both corpora are available. The load runs on its
    /// own task, so a caller that stops waiting does not cancel it.
    pub async fn ensure_loaded(&self) -> bool {
        self.state().await.is_ready()
    }

    /// Current state without triggering or awaiting a load.
    pub fn is_loaded(&self) -> bool {
        self.state.get().is_some_and(|state| state.is_ready())
    }

    /// Program summary text (`""` if the load failed).
    pub async fn summary(&self) -> &str {
        self.snapshot().await.summary
    }

    /// Detailed requirements text (`""` if the load failed).
    pub async fn detailed(&self) -> &str {
        self.snapshot().await.detailed
    }

    pub async fn get(&self, kind: CorpusKind) -> &str {
        self.snapshot().await.get(kind)
    }

    /// Both corpora at once, after the load has settled.
    pub async fn snapshot(&self) -> CorpusSnapshot<'_> {
        match self.state().await {
            LoadState::Ready { summary, detailed } => CorpusSnapshot::new(summary, detailed),
            LoadState::Failed => CorpusSnapshot::default(),
        }
    }

    async fn state(&self) -> &LoadState {
        self.state
            .get_or_init(|| self.loader().clone())
            .await
            .as_ref()
    }

    /// Spawn the load on first use and hand out the shared handle.
    fn loader(&self) -> &SharedLoad {
        self.loader.get_or_init(|| {
            let task = tokio::spawn(load(
                self.source.clone(),
                self.summary_locator.clone(),
                self.detailed_locator.clone(),
            ));
            async move {
                let state = task.await.unwrap_or_else(|e| {
                    warn!(error = %e, "Corpus load task failed");
                    LoadState::Failed
                });
                Arc::new(state)
            }
            .boxed()
            .shared()
        })
    }
}

async fn load(
    source: Arc<dyn CorpusSource>,
    summary_locator: String,
    detailed_locator: String,
) -> LoadState {
    let (summary, detailed) = tokio::join!(
        source.fetch(&summary_locator),
        source.fetch(&detailed_locator),
    );

    match (summary, detailed) {
        (Ok(summary), Ok(detailed)) => {
            info!(
                summary_bytes = summary.len(),
                detailed_bytes = detailed.len(),
                "Requirements corpora loaded"
            );
            LoadState::Ready { summary, detailed }
        }
        (summary, detailed) => {
            let failures = [
                (CorpusKind::ProgramSummary, summary.err()),
                (CorpusKind::DetailedRequirements, detailed.err()),
            ];
            for (kind, err) in failures {
                if let Some(err) = err {
                    warn!(
                        corpus = kind.name(),
                        error = %err,
                        "Failed to load requirements corpus"
                    );
                }
            }
            LoadState::Failed
        }
    }
}
