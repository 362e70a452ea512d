//! The agent driven by the demo tree.
//!
//! It walks along the x axis, logs, rests, and flips coins. Its action and
//! condition vocabularies are the tag enums the tree description refers to.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use behavior_tree::Bindings;
use strum::{Display, EnumIter, EnumString};
use tracing::info;

/// Distance covered by one move action.
const STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Act {
    OutputLog,
    Wait,
    MoveLeft,
    MoveRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Cond {
    FiftyFifty,
    IsInRange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned area anchored at its top-left corner; y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.left + self.width).contains(&point.x)
            && (self.top - self.height..=self.top).contains(&point.y)
    }
}

impl Default for Area {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    position: Arc<Mutex<Point>>,
    area: Area,
    rest: Duration,
}

impl Agent {
    pub fn new(area: Area, rest: Duration) -> Self {
        Self {
            position: Arc::new(Mutex::new(Point::default())),
            area,
            rest,
        }
    }

    pub fn position(&self) -> Point {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn in_range(&self) -> bool {
        self.area.contains(self.position())
    }

    fn shift(&self, dx: f32) -> Point {
        let mut position = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        position.x += dx;
        *position
    }

    /// Binds every tag to this agent.
    pub fn bindings(&self) -> Bindings<Act, Cond> {
        let left = self.clone();
        let right = self.clone();
        let range = self.clone();
        let rest = self.rest;

        Bindings::new()
            .action(Act::OutputLog, || async {
                info!("output log");
            })
            .action(Act::Wait, move || async move {
                tokio::time::sleep(rest).await;
                info!("wait");
                tokio::time::sleep(rest).await;
            })
            .action(Act::MoveLeft, move || {
                let agent = left.clone();
                async move {
                    let position = agent.shift(-STEP);
                    info!(x = position.x, "moved left");
                }
            })
            .action(Act::MoveRight, move || {
                let agent = right.clone();
                async move {
                    let position = agent.shift(STEP);
                    info!(x = position.x, "moved right");
                }
            })
            .condition(Cond::FiftyFifty, rand::random::<bool>)
            .condition(Cond::IsInRange, move || range.in_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_bounds_are_inclusive() {
        let area = Area::default();
        assert!(area.contains(Point { x: 0.0, y: 0.0 }));
        assert!(area.contains(Point { x: 1.0, y: -1.0 }));
        assert!(!area.contains(Point { x: 0.5, y: 0.5 }));
        assert!(!area.contains(Point { x: -0.1, y: -0.5 }));
    }

    #[test]
    fn every_tag_is_bound() {
        let agent = Agent::new(Area::default(), Duration::ZERO);
        assert!(agent.bindings().ensure_complete().is_ok());
    }

    #[tokio::test]
    async fn move_actions_shift_the_agent() {
        let agent = Agent::new(Area::default(), Duration::ZERO);
        let bindings = agent.bindings();

        let right = bindings.action_for(&Act::MoveRight).unwrap();
        right().await;
        right().await;
        assert!((agent.position().x - 0.2).abs() < 1e-6);

        let left = bindings.action_for(&Act::MoveLeft).unwrap();
        for _ in 0..5 {
            left().await;
        }
        assert!(agent.position().x < 0.0);
        assert!(!agent.in_range());

        let in_range = bindings.condition_for(&Cond::IsInRange).unwrap();
        assert!(!in_range());
    }
}
