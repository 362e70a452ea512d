//! Core lifecycle trait.
//!
//! This module defines the [`Behavior`] trait, the contract every tree node
//! honors once per tick: awake once after construction, start lazily on the
//! first update of a tick, update, and end when the tick closes.

use crate::{ActionQueue, Status};

/// A behavior tree node driven through the awake/start/update/end cycle.
///
/// The cycle is the only state-carrying mechanism: a node must be able to be
/// updated again on the next tick after `on_end` without leaking anything from
/// the previous one.
pub trait Behavior {
    /// Called exactly once, right after the tree is constructed.
    fn on_awake(&mut self);

    /// Called by `on_update` when the node is updated while `Inactive`.
    fn on_start(&mut self);

    /// Evaluate this node for the current tick.
    ///
    /// # Arguments
    ///
    /// * `queue` - Pending actions of the current tick. Action leaves append
    ///   their bound work here instead of running it.
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the node succeeded
    /// - `Status::Failure` if the node failed
    fn on_update(&mut self, queue: &mut ActionQueue) -> Status;

    /// Called once at the end of every tick, whatever its outcome.
    fn on_end(&mut self);

    /// Current lifecycle state.
    fn state(&self) -> Status;
}
