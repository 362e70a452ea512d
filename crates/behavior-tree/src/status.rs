//! Lifecycle state carried by every behavior node.

/// The state of a behavior node within one tick.
///
/// # Frame Semantics
///
/// Every node starts a tick `Inactive`, becomes `Running` when it is first
/// updated, and is reset to `Inactive` by the end-of-tick pass:
/// - Conditions evaluate immediately and report `Success` or `Failure`
/// - Actions report `Success` as soon as their work is queued; the work itself
///   drains after evaluation
///
/// `Running` is also the value composites observe while a child is mid-update.
/// `Completed` is reserved for node kinds that report work in progress across
/// several ticks; none of the built-in kinds produce it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
pub enum Status {
    /// The node has not been started during the current tick.
    #[default]
    Inactive,

    /// The node completed successfully.
    ///
    /// For conditions: The condition matched its expected value.
    /// For actions: The action was queued (or there was nothing to queue).
    Success,

    /// The node failed.
    ///
    /// For conditions: The condition did not match its expected value.
    Failure,

    /// The node has been started during the current tick.
    Running,

    /// Reserved for multi-tick work that has finished.
    Completed,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` for the two outcomes a node update can settle on.
    #[inline]
    pub fn is_settled(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Swaps `Success` and `Failure`; every other state is returned unchanged.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }

    /// Maps a boolean outcome onto `Success`/`Failure`.
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
