//! Background cache warming.
//!
//! A [`CacheWarmer`] walks a fixed id range through the service so the first
//! real requests are served from cache. [`CacheWarmer::spawn`] runs it on a
//! schedule as its own tokio task; [`CacheWarmer::run_once`] runs one pass
//! inline.

use crate::backend::CacheBackend;
use crate::config::WarmerConfig;
use crate::service::PokemonService;
use crate::upstream::PokemonSource;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outcome of one warm pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmReport {
    pub attempted: usize,
    pub loaded: usize,
    pub failed: usize,
}

/// Periodic cache warmer.
pub struct CacheWarmer<B: CacheBackend, S: PokemonSource> {
    service: PokemonService<B, S>,
    config: WarmerConfig,
}

impl<B: CacheBackend, S: PokemonSource> CacheWarmer<B, S> {
    pub fn new(service: PokemonService<B, S>, config: WarmerConfig) -> Self {
        CacheWarmer { service, config }
    }

    pub fn config(&self) -> &WarmerConfig {
        &self.config
    }

    /// Run one pass over the configured id range.
    ///
    /// Ids are fetched sequentially. A failed id is logged and counted; the
    /// pass always continues. Every call, failed or not, is followed by the
    /// politeness delay.
    pub async fn run_once(&self) -> WarmReport {
        let started = Instant::now();
        let mut report = WarmReport::default();

        info!(
            "Starting Pokémon cache preloading ({}..={})",
            self.config.ids.start(),
            self.config.ids.end()
        );

        for id in self.config.ids.clone() {
            report.attempted += 1;

            match self.service.get_by_id(id).await {
                Ok(pokemon) => {
                    report.loaded += 1;
                    debug!("Preloaded Pokémon: {} - {}", pokemon.id, pokemon.name);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!("Failed to preload Pokémon ID {}: {}", id, e);
                }
            }

            tokio::time::sleep(self.config.politeness_delay).await;
        }

        info!(
            "Pokémon cache preloading completed: {}/{} loaded, {} failed in {:?}",
            report.loaded,
            report.attempted,
            report.failed,
            started.elapsed()
        );
        report
    }

    /// Start the schedule on the current tokio runtime.
    ///
    /// The first pass runs after `initial_delay`; each later pass starts
    /// `interval` after the previous one finished. A pass that panics is
    /// logged and the schedule carries on.
    ///
    /// Dropping the returned handle also stops the warmer.
    pub fn spawn(self) -> WarmerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let passes = Arc::new(AtomicU64::new(0));

        let join = tokio::spawn(self.run_schedule(shutdown_rx, Arc::clone(&passes)));

        WarmerHandle {
            shutdown_tx,
            join,
            passes,
        }
    }

    async fn run_schedule(self, mut shutdown_rx: mpsc::Receiver<()>, passes: Arc<AtomicU64>) {
        debug!(
            "Cache warmer scheduled: first pass in {:?}, then every {:?}",
            self.config.initial_delay, self.config.interval
        );

        tokio::select! {
            _ = tokio::time::sleep(self.config.initial_delay) => {}
            _ = shutdown_rx.recv() => {
                info!("Cache warmer stopped before its first pass");
                return;
            }
        }

        loop {
            if AssertUnwindSafe(self.run_once()).catch_unwind().await.is_err() {
                error!("Error during cache preloading: pass panicked, keeping schedule");
            }
            passes.fetch_add(1, Ordering::SeqCst);

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown_rx.recv() => break,
            }
        }

        info!("Cache warmer stopped");
    }
}

/// Handle for a spawned [`CacheWarmer`].
pub struct WarmerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
    passes: Arc<AtomicU64>,
}

impl WarmerHandle {
    /// Number of passes finished so far (including ones that panicked).
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::SeqCst)
    }

    /// Stop the schedule and wait for the task to exit.
    ///
    /// A pass already in progress runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.join.await {
            error!("Cache warmer task failed: {}", e);
        }
    }
}
