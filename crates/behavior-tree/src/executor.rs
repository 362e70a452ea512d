//! Per-frame execution engine.
//!
//! [`Executor::tick`] evaluates the tree synchronously, ends every node, and
//! hands the actions discovered during evaluation to a background task that
//! runs them one after another. While that task is draining, further ticks
//! are dropped.
//!
//! Node state is reset before the drain finishes, so a tree inspected
//! mid-drain reads `Inactive` everywhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, debug, info_span, trace, warn};

use crate::bindings::Bindings;
use crate::builder;
use crate::config::TreeConfig;
use crate::description::TreeDescription;
use crate::error::Result;
use crate::tag::Tag;
use crate::tree::Tree;
use crate::{ActionQueue, Status};

/// Counters accumulated over the executor's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks that evaluated the tree.
    pub evaluated: u64,
    /// Ticks ignored because actions were still draining.
    pub dropped: u64,
    /// Actions handed to drain tasks.
    pub actions_queued: u64,
    /// Drain tasks that panicked or were cancelled.
    pub failed_drains: u64,
}

/// Result of one [`Executor::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Evaluated { status: Status, queued: usize },
    /// A previous tick's actions were still running; nothing happened.
    Dropped,
}

impl TickOutcome {
    pub fn status(&self) -> Option<Status> {
        match self {
            TickOutcome::Evaluated { status, .. } => Some(*status),
            TickOutcome::Dropped => None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, TickOutcome::Dropped)
    }
}

/// Clears the in-flight flag when the drain task finishes, panics or is
/// cancelled.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one tree, one tick per frame.
///
/// `tick` spawns onto the current Tokio runtime and must be called from
/// within one.
pub struct Executor {
    tree: Tree,
    config: TreeConfig,
    queue: ActionQueue,
    in_flight: Arc<AtomicBool>,
    drain: Option<JoinHandle<()>>,
    stats: TickStats,
}

impl Executor {
    /// Builds and awakens a tree from `description` with the default config.
    pub fn load<A: Tag, C: Tag>(
        description: &TreeDescription,
        bindings: &Bindings<A, C>,
    ) -> Result<Self> {
        Self::load_with(TreeConfig::default(), description, bindings)
    }

    pub fn load_with<A: Tag, C: Tag>(
        config: TreeConfig,
        description: &TreeDescription,
        bindings: &Bindings<A, C>,
    ) -> Result<Self> {
        let tree = builder::build_with(description, bindings, &config)?;
        Ok(Self::from_tree(tree, config))
    }

    /// Wraps an already built tree.
    pub fn from_tree(tree: Tree, config: TreeConfig) -> Self {
        Self {
            tree,
            config,
            queue: ActionQueue::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
            drain: None,
            stats: TickStats::default(),
        }
    }

    /// Replaces the tree with one built from `description`.
    ///
    /// The new tree is built completely before the swap; on error the current
    /// tree stays in place. A drain already running keeps going, and ticks
    /// are still dropped until it finishes.
    pub fn reload<A: Tag, C: Tag>(
        &mut self,
        description: &TreeDescription,
        bindings: &Bindings<A, C>,
    ) -> Result<()> {
        let tree = builder::build_with(description, bindings, &self.config)?;
        self.tree = tree;
        self.queue.clear();
        debug!(
            agent = %self.config.agent,
            nodes = self.tree.node_count(),
            "reloaded behavior tree"
        );
        Ok(())
    }

    /// Advances one frame.
    ///
    /// Returns [`TickOutcome::Dropped`] without touching the tree when the
    /// previous tick's actions are still draining.
    ///
    /// # Panics
    ///
    /// Panics when the tree queues actions and no Tokio runtime is current,
    /// since the drain is spawned onto it. Ticks that queue nothing never
    /// touch the runtime.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_in_flight() {
            self.stats.dropped += 1;
            debug!(
                agent = %self.config.agent,
                dropped = self.stats.dropped,
                "tick dropped while actions drain"
            );
            return TickOutcome::Dropped;
        }

        self.queue.clear();
        let status = self.tree.evaluate(&mut self.queue);
        self.stats.evaluated += 1;

        let queued = self.queue.len();
        if queued > 0 {
            self.stats.actions_queued += queued as u64;
            self.spawn_drain();
        }

        self.tree.end();

        trace!(
            agent = %self.config.agent,
            tick = self.stats.evaluated,
            %status,
            queued,
            "tick evaluated"
        );
        TickOutcome::Evaluated { status, queued }
    }

    fn spawn_drain(&mut self) {
        if let Some(Some(Err(err))) = self.drain.take().map(FutureExt::now_or_never) {
            self.drain_failed(&err);
        }

        self.in_flight.store(true, Ordering::Release);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let actions = self.queue.snapshot();
        let span = info_span!("bt.drain", agent = %self.config.agent, tick = self.stats.evaluated);

        let drain = async move {
            let _guard = guard;
            for action in actions {
                trace!(node = %action.node, action = %action.label, "running action");
                action.run().await;
            }
            trace!("actions drained");
        };

        self.drain = Some(tokio::spawn(drain.instrument(span)));
    }

    /// Waits for the current drain, if any, to finish.
    pub async fn wait_idle(&mut self) {
        let Some(handle) = self.drain.take() else {
            return;
        };
        if let Err(err) = handle.await {
            self.drain_failed(&err);
        }
    }

    fn drain_failed(&mut self, err: &JoinError) {
        self.stats.failed_drains += 1;
        warn!(
            agent = %self.config.agent,
            failed = self.stats.failed_drains,
            error = %err,
            "action drain task failed"
        );
    }

    /// Whether a previous tick's actions are still draining.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Actions discovered by the most recent evaluated tick.
    pub fn pending(&self) -> &ActionQueue {
        &self.queue
    }
}
