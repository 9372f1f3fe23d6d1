//! Navigation - moving the selection between nodes with directional input.
//!
//! A move from the selected node considers every other node whose offset
//! lies inside a cone around the input direction and is at least
//! `min_hop_distance` away. Each candidate is scored
//! `(1 - dot) * 1.25 + distance * 0.0015`, favouring nodes straight ahead
//! over merely close ones, and the lowest score wins.

use clue_model::{ClueId, Vec2};

use crate::config::NavigationConfig;

const ANGLE_WEIGHT: f32 = 1.25;
const DISTANCE_WEIGHT: f32 = 0.0015;

/// Tracks the selected node and moves it in response to directions.
#[derive(Debug, Clone)]
pub struct NavigationController {
    config: NavigationConfig,
    selected: Option<ClueId>,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            selected: None,
        }
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&ClueId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: Option<ClueId>) {
        self.selected = id;
    }

    /// Move the selection one hop in `direction`.
    ///
    /// `nodes` holds every node's id and position. Returns false, leaving the
    /// selection alone, when nothing is selected or no candidate qualifies.
    pub fn move_selection(&mut self, direction: Vec2, nodes: &[(ClueId, Vec2)]) -> bool {
        let Some(current) = self.selected.as_ref() else {
            return false;
        };
        let Some(origin) = nodes.iter().find(|(id, _)| id == current).map(|(_, p)| *p) else {
            return false;
        };

        match self.best_candidate(current, origin, direction, nodes) {
            Some(next) => {
                self.selected = Some(next);
                true
            }
            None => false,
        }
    }

    /// The lowest-scoring node inside the cone, ties broken by id.
    pub fn best_candidate(
        &self,
        current: &ClueId,
        origin: Vec2,
        direction: Vec2,
        nodes: &[(ClueId, Vec2)],
    ) -> Option<ClueId> {
        let direction = direction.normalized();
        if direction == Vec2::ZERO {
            return None;
        }
        let cone_cos = self.config.cone_cos();

        nodes
            .iter()
            .filter(|(id, _)| id != current)
            .filter_map(|(id, position)| {
                let delta = *position - origin;
                let distance = delta.length();
                if distance < self.config.min_hop_distance {
                    return None;
                }
                let dot = delta.normalized().dot(direction);
                if dot < cone_cos {
                    return None;
                }
                Some((score(dot, distance), id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
            .map(|(_, id)| id.clone())
    }
}

fn score(dot: f32, distance: f32) -> f32 {
    (1.0 - dot) * ANGLE_WEIGHT + distance * DISTANCE_WEIGHT
}

/// Turns a held stick into discrete navigation steps.
///
/// Fires on the first frame the stick leaves the deadzone, again whenever it
/// swings sharply away from the last fired direction, and otherwise once per
/// `repeat_interval` while held.
#[derive(Debug, Clone)]
pub struct RepeatGate {
    interval: f32,
    reversal_dot: f32,
    deadzone: f32,
    last: Option<Vec2>,
    held: f32,
}

impl RepeatGate {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            interval: config.repeat_interval,
            reversal_dot: config.reversal_dot,
            deadzone: config.deadzone,
            last: None,
            held: 0.0,
        }
    }

    /// Feed this frame's stick value. Returns the direction to move in when
    /// a step should fire.
    pub fn poll(&mut self, stick: Vec2, dt: f32) -> Option<Vec2> {
        if stick.length() < self.deadzone {
            self.reset();
            return None;
        }
        let direction = stick.normalized();

        let fire = match self.last {
            None => true,
            Some(last) if direction.dot(last) < self.reversal_dot => true,
            Some(_) => {
                self.held += dt.max(0.0);
                self.held >= self.interval
            }
        };

        if fire {
            self.last = Some(direction);
            self.held = 0.0;
            Some(direction)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.held = 0.0;
    }
}
