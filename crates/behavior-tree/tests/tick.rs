//! Execution engine behavior across frames.

use std::sync::{Arc, Mutex};

use behavior_tree::{
    Behavior, Bindings, Executor, Status, TickOutcome, TreeConfig, TreeDescription,
};
use serde_json::json;
use strum::{Display, EnumIter, EnumString};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
enum Act {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
enum Cond {
    Always,
}

/// Records start and finish of every action; `First` parks on `gate`.
#[derive(Clone, Default)]
struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
    gate: Arc<Notify>,
}

impl Journal {
    fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn bindings(&self) -> Bindings<Act, Cond> {
        let gated = self.clone();
        let second = self.clone();
        let third = self.clone();
        Bindings::new()
            .action(Act::First, move || {
                let journal = gated.clone();
                async move {
                    journal.push("First:start".into());
                    journal.gate.notified().await;
                    journal.push("First:end".into());
                }
            })
            .action(Act::Second, move || {
                let journal = second.clone();
                async move {
                    journal.push("Second:start".into());
                    tokio::task::yield_now().await;
                    journal.push("Second:end".into());
                }
            })
            .action(Act::Third, move || {
                let journal = third.clone();
                async move {
                    journal.push("Third:start".into());
                    journal.push("Third:end".into());
                }
            })
            .condition(Cond::Always, || true)
    }
}

/// Root -> Sequence [First, Selector [Always, Third], Repeater x2 [Second]]
fn three_actions() -> TreeDescription {
    serde_json::from_value(json!({
        "nodes": [
            { "id": "root", "nodeKind": "Root" },
            { "id": "seq", "nodeKind": "Sequence" },
            { "id": "first", "nodeKind": "Action", "act": "First" },
            { "id": "sel", "nodeKind": "Selector" },
            { "id": "always", "nodeKind": "Conditional", "condition": "Always" },
            { "id": "third", "nodeKind": "Action", "act": "Third" },
            { "id": "rep", "nodeKind": "Repeater", "repeatCount": 2 },
            { "id": "second", "nodeKind": "Action", "act": "Second" }
        ],
        "links": [
            { "sourceId": "root", "outputSlot": "Output", "targetId": "seq" },
            { "sourceId": "seq", "outputSlot": "1", "targetId": "first" },
            { "sourceId": "seq", "outputSlot": "2", "targetId": "sel" },
            { "sourceId": "seq", "outputSlot": "3", "targetId": "rep" },
            { "sourceId": "sel", "outputSlot": "1", "targetId": "always" },
            { "sourceId": "sel", "outputSlot": "2", "targetId": "third" },
            { "sourceId": "rep", "outputSlot": "Output", "targetId": "second" }
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn actions_drain_sequentially_in_discovery_order() {
    let journal = Journal::default();
    let mut executor = Executor::load(&three_actions(), &journal.bindings()).unwrap();

    let outcome = executor.tick();
    assert_eq!(
        outcome,
        TickOutcome::Evaluated {
            status: Status::Success,
            queued: 3
        }
    );
    // The selector short-circuits on `Always`, so `Third` is never queued.
    assert_eq!(executor.pending().labels(), vec!["First", "Second", "Second"]);

    journal.gate.notify_one();
    executor.wait_idle().await;

    assert_eq!(
        journal.entries(),
        vec![
            "First:start",
            "First:end",
            "Second:start",
            "Second:end",
            "Second:start",
            "Second:end",
        ]
    );
}

#[tokio::test]
async fn second_tick_while_draining_is_a_no_op() {
    let journal = Journal::default();
    let mut executor = Executor::load(&three_actions(), &journal.bindings()).unwrap();

    assert!(!executor.tick().is_dropped());
    tokio::task::yield_now().await;
    assert_eq!(journal.entries(), vec!["First:start"]);

    // Blocked on the gate: further ticks change nothing.
    for _ in 0..3 {
        assert_eq!(executor.tick(), TickOutcome::Dropped);
    }
    assert_eq!(executor.pending().len(), 3);
    assert_eq!(executor.stats().evaluated, 1);
    assert_eq!(executor.stats().dropped, 3);

    journal.gate.notify_one();
    executor.wait_idle().await;

    assert!(!executor.tick().is_dropped());
    assert_eq!(executor.stats().evaluated, 2);
    assert_eq!(executor.stats().actions_queued, 6);

    journal.gate.notify_one();
    executor.wait_idle().await;
}

#[tokio::test]
async fn state_reads_inactive_while_actions_drain() {
    let journal = Journal::default();
    let mut executor = Executor::load(&three_actions(), &journal.bindings()).unwrap();

    executor.tick();
    assert!(executor.is_in_flight());
    assert!(
        executor
            .tree()
            .iter()
            .all(|node| node.state() == Status::Inactive)
    );

    journal.gate.notify_one();
    executor.wait_idle().await;
    assert!(!executor.is_in_flight());
}

#[tokio::test]
async fn failed_reload_keeps_the_current_tree() {
    let journal = Journal::default();
    let bindings = journal.bindings();
    let mut executor =
        Executor::load_with(TreeConfig::new("reloader"), &three_actions(), &bindings).unwrap();

    let broken: TreeDescription = serde_json::from_value(json!({
        "nodes": [ { "id": "a", "nodeKind": "Action", "act": "First" } ],
        "links": []
    }))
    .unwrap();
    assert!(executor.reload(&broken, &bindings).is_err());
    assert_eq!(executor.tree().node_count(), 8);

    let single: TreeDescription = serde_json::from_value(json!({
        "nodes": [
            { "id": "root", "nodeKind": "Root" },
            { "id": "third", "nodeKind": "Action", "act": "Third" }
        ],
        "links": [ { "sourceId": "root", "outputSlot": "Output", "targetId": "third" } ]
    }))
    .unwrap();
    executor.reload(&single, &bindings).unwrap();
    assert_eq!(executor.tree().node_count(), 2);

    executor.tick();
    executor.wait_idle().await;
    assert_eq!(journal.entries(), vec!["Third:start", "Third:end"]);
}
