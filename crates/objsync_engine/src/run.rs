//! Pull-based progress stream of a sync run.

use crate::engine::{SyncEngine, SyncResult, SyncStatus};
use objsync_core::{RemoteIds, SyncEntity};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Counters of a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Entities in the resolved order.
    pub entities: usize,
    /// Entities that completed.
    pub completed: usize,
    /// Entities that failed.
    pub failed: usize,
}

impl RunStats {
    /// Entities that reached a terminal status.
    pub fn finished(&self) -> usize {
        self.completed + self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Created,
    InProgress,
    Terminal,
}

/// A lazy sync run over a resolved order.
///
/// Each entity yields `Created`, `InProgress` and then its terminal
/// result; the entity is only synced when the terminal event is pulled.
/// Dropping the run between events cancels it at that point, leaving
/// entities already synced intact.
///
/// Remote ids assigned during the run are used when serializing the
/// entities that reference them.
pub struct SyncRun {
    engine: SyncEngine,
    order: Vec<Arc<dyn SyncEntity>>,
    position: usize,
    step: Step,
    ids: RemoteIds,
    stats: RunStats,
    halted: bool,
}

impl SyncRun {
    pub(crate) fn new(engine: SyncEngine, order: Vec<Arc<dyn SyncEntity>>) -> Self {
        let stats = RunStats {
            entities: order.len(),
            ..RunStats::default()
        };
        Self {
            engine,
            order,
            position: 0,
            step: Step::Created,
            ids: RemoteIds::new(),
            stats,
            halted: false,
        }
    }

    /// Returns the resolved sync order.
    pub fn order(&self) -> &[Arc<dyn SyncEntity>] {
        &self.order
    }

    /// Returns the counters so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Returns true once the run has nothing left to emit.
    pub fn is_finished(&self) -> bool {
        self.halted || self.position >= self.order.len()
    }

    /// Returns true if the run stopped early after a failure.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn finish(&mut self, result: &SyncResult) {
        match result.status {
            SyncStatus::Completed => {
                self.stats.completed += 1;
                if let Some(remote_id) = &result.remote_id {
                    self.ids.record(result.entity.clone(), remote_id.as_str());
                }
            }
            _ => {
                self.stats.failed += 1;
                if self.engine.config().aborts_on_error() {
                    warn!("Aborting run after {} failed", result.entity);
                    self.halted = true;
                }
            }
        }

        self.position += 1;
        self.step = Step::Created;
        if self.is_finished() {
            info!(
                "Sync run finished: {} entities, {} completed, {} failed",
                self.stats.entities, self.stats.completed, self.stats.failed
            );
        }
    }
}

impl Iterator for SyncRun {
    type Item = SyncResult;

    fn next(&mut self) -> Option<SyncResult> {
        if self.halted {
            return None;
        }
        let entity = Arc::clone(self.order.get(self.position)?);

        let event = match self.step {
            Step::Created => {
                self.step = Step::InProgress;
                SyncResult::created(entity.key())
            }
            Step::InProgress => {
                self.step = Step::Terminal;
                SyncResult::in_progress(entity.key())
            }
            Step::Terminal => {
                let result = self.engine.sync_with(entity.as_ref(), false, &self.ids);
                self.finish(&result);
                result
            }
        };

        if let Some(delay) = self.engine.config().step_delay {
            thread::sleep(delay);
        }
        Some(event)
    }
}

impl std::fmt::Debug for SyncRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRun")
            .field("entities", &self.order.len())
            .field("position", &self.position)
            .field("step", &self.step)
            .field("stats", &self.stats)
            .field("halted", &self.halted)
            .finish()
    }
}
