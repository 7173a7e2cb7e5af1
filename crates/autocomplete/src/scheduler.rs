//! The autocomplete handle and its single writer task.
//!
//! Every mutation (rebuilds and count deltas) is queued on one unbounded
//! channel and applied by one task, strictly in submission order. Lookups
//! never touch the channel; they read the published indexes directly.

use std::sync::Arc;
use std::time::Duration;

use mediatag_types::TagFrequency;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::builder::build;
use crate::indexes::{IndexStats, IndexStatus, Indexes};
use crate::source::TagSource;
use crate::{AutocompleteError, FRAGMENT_CAP, MAX_SUGGESTIONS};

/// Tunables for [`Autocompleter`].
#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    /// Delay before the one startup rebuild.
    pub startup_delay: Duration,
    /// Suggestions returned per lookup.
    pub max_suggestions: usize,
    /// Fragment index entries kept per distinct fragment.
    pub fragment_cap: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_secs(60),
            max_suggestions: MAX_SUGGESTIONS,
            fragment_cap: FRAGMENT_CAP,
        }
    }
}

type RebuildReply = oneshot::Sender<Result<IndexStats, AutocompleteError>>;

enum Command {
    /// Rebuild from the store; `reply` is `None` for the startup rebuild.
    Rebuild { reply: Option<RebuildReply> },
    ChangeCount { tag: String, delta: i64 },
    /// Acknowledged once everything queued before it has been applied.
    Flush(oneshot::Sender<()>),
}

/// Cheap-to-clone handle to the tag suggestion indexes.
///
/// The writer task stops once every handle has been dropped.
#[derive(Clone)]
pub struct Autocompleter {
    indexes: Arc<Indexes>,
    commands: mpsc::UnboundedSender<Command>,
    config: AutocompleteConfig,
}

impl Autocompleter {
    /// Spawn the writer and schedule the startup rebuild after
    /// `config.startup_delay`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<S: TagSource>(source: S, config: AutocompleteConfig) -> Self {
        let delay = config.startup_delay;
        let this = Self::spawn(source, config);

        let weak = this.commands.downgrade();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Skip if every handle is already gone.
            if let Some(commands) = weak.upgrade() {
                debug!("startup autocomplete rebuild queued");
                let _ = commands.send(Command::Rebuild { reply: None });
            }
        });

        info!(
            delay_secs = delay.as_secs(),
            "autocomplete index will be built after startup delay"
        );
        this
    }

    /// Spawn the writer without scheduling any rebuild.
    ///
    /// Lookups return nothing until [`Autocompleter::rebuild`] has run.
    pub fn spawn<S: TagSource>(source: S, config: AutocompleteConfig) -> Self {
        let indexes = Arc::new(Indexes::new());
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(
            source,
            Arc::clone(&indexes),
            config.fragment_cap,
            rx,
        ));
        Self {
            indexes,
            commands,
            config,
        }
    }

    /// Rebuild both indexes from the store and wait for the result.
    ///
    /// On a store error the previously published indexes stay in place.
    pub async fn rebuild(&self) -> Result<IndexStats, AutocompleteError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Rebuild { reply: Some(reply) })?;
        rx.await.map_err(|_| AutocompleteError::WriterClosed)?
    }

    /// Tags starting with `prefix`.
    pub fn suggest_exact(&self, prefix: &str) -> Vec<TagFrequency> {
        self.indexes
            .suggest_exact(prefix, self.config.max_suggestions)
    }

    /// Tags containing `prefix` after their first character.
    pub fn suggest_fragment(&self, prefix: &str) -> Vec<TagFrequency> {
        self.indexes
            .suggest_fragment(prefix, self.config.max_suggestions)
    }

    /// Exact and fragment suggestions together, ranked and de-duplicated.
    pub fn suggest_merged(&self, prefix: &str) -> Vec<TagFrequency> {
        let mut merged = self.suggest_exact(prefix);
        merged.extend(self.suggest_fragment(prefix));
        merged.sort_by(TagFrequency::cmp_by_count_desc);
        merged.dedup();
        merged
    }

    pub fn increment_tag(&self, tag: &str) -> Result<(), AutocompleteError> {
        self.change_tag_count(tag, 1)
    }

    pub fn decrement_tag(&self, tag: &str) -> Result<(), AutocompleteError> {
        self.change_tag_count(tag, -1)
    }

    /// Queue a count change. Returns once queued, not once applied.
    pub fn change_tag_count(&self, tag: &str, delta: i64) -> Result<(), AutocompleteError> {
        self.send(Command::ChangeCount {
            tag: tag.to_owned(),
            delta,
        })
    }

    /// Wait until every change queued so far has been applied.
    pub async fn flush(&self) -> Result<(), AutocompleteError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Flush(reply))?;
        rx.await.map_err(|_| AutocompleteError::WriterClosed)
    }

    pub fn status(&self) -> IndexStatus {
        self.indexes.status()
    }

    pub fn stats(&self) -> Option<IndexStats> {
        self.indexes.stats()
    }

    pub fn indexes(&self) -> &Arc<Indexes> {
        &self.indexes
    }

    fn send(&self, command: Command) -> Result<(), AutocompleteError> {
        self.commands
            .send(command)
            .map_err(|_| AutocompleteError::WriterClosed)
    }
}

async fn run_writer<S: TagSource>(
    source: S,
    indexes: Arc<Indexes>,
    fragment_cap: usize,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Rebuild { reply } => {
                let result = rebuild(&source, &indexes, fragment_cap).await;
                if let Err(e) = &result {
                    error!("Autocomplete rebuild failed, keeping previous index: {e}");
                }
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            Command::ChangeCount { tag, delta } => {
                indexes.apply_delta(&tag, delta);
            }
            Command::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
    debug!("autocomplete writer stopped");
}

async fn rebuild<S: TagSource>(
    source: &S,
    indexes: &Indexes,
    fragment_cap: usize,
) -> Result<IndexStats, AutocompleteError> {
    let snapshot = source.snapshot_all_tags().await?;
    let built = tokio::task::spawn_blocking(move || build(&snapshot, fragment_cap)).await?;

    let stats = IndexStats {
        exact_entries: built.exact.len(),
        fragment_entries: built.fragments.len(),
        last_build: built.stats.clone(),
    };
    indexes.publish(built);

    info!(
        tags = stats.exact_entries,
        fragments = stats.fragment_entries,
        elapsed_ms = stats.last_build.elapsed_ms,
        "autocomplete index published"
    );
    Ok(stats)
}
