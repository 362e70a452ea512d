//! Frame-driven behavior tree runtime.
//!
//! Trees are loaded from a serialized node graph, validated into a rooted
//! tree of owned nodes, and ticked once per external frame. Evaluation is
//! synchronous; the actions it discovers are drained afterwards, one at a
//! time, on a background task.
//!
//! - **Typed bindings**: action and condition tags are host enums, resolved
//!   against [`Bindings`] once at load time
//! - **All-or-nothing loading**: any malformed record or unbound tag fails the
//!   load with a [`BuildError`]
//! - **No re-entrant ticks**: a tick arriving while actions still drain is
//!   dropped
//!
//! # Architecture
//!
//! - [`Behavior`]: awake/start/update/end lifecycle every node honors
//! - [`Status`]: per-tick node state and result
//! - [`Node`]: closed sum over Root, Action, Conditional, Sequence, Selector,
//!   Repeater and Inverter
//! - [`TreeDescription`]: serialized node and link records
//! - [`builder`]: description plus bindings into a live [`Tree`]
//! - [`Executor`]: per-frame ticking and sequential action drain
//!
//! # Example
//!
//! ```rust,ignore
//! let description = TreeDescription::from_path(Path::new("trees/patrol.json"))?;
//! let bindings = Bindings::new()
//!     .action(Act::OutputLog, || async { tracing::info!("tick") })
//!     .condition(Cond::FiftyFifty, || rand::random());
//!
//! let mut executor = Executor::load(&description, &bindings)?;
//! loop {
//!     executor.tick();
//!     frame.tick().await;
//! }
//! ```

pub mod behavior;
pub mod bindings;
pub mod builder;
mod composite;
pub mod config;
mod decorator;
pub mod description;
pub mod error;
pub mod executor;
pub mod leaf;
pub mod node;
pub mod queue;
pub mod status;
pub mod tag;
pub mod tree;

pub use behavior::Behavior;
pub use bindings::{ActionFn, Bindings, ConditionFn, action_fn, condition_fn};
pub use builder::{build, build_with};
pub use config::TreeConfig;
pub use description::{
    LinkRecord, NodeKindRecord, NodeKindTag, NodeRecord, Position, TreeDescription,
};
pub use error::{BuildError, Result};
pub use executor::{Executor, TickOutcome, TickStats};
pub use leaf::{ActionLeaf, Check, ConditionalLeaf};
pub use node::{Node, NodeIndex, NodeKind};
pub use queue::{ActionQueue, PendingAction};
pub use status::Status;
pub use tag::{ActTag, ConditionTag, Tag};
pub use tree::Tree;
