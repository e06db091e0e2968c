//! Scrolling-lane driving game
//!
//! The car sits on a fixed row and steers between two lane walls that drift
//! narrower or wider every few ticks. Obstacles fall one row per tick.

use super::engine::{Engine, GameKind, Input};
use super::grid::TextGrid;
use super::session::{Cause, Session};
use crate::consts::*;
use crate::tuning::{DifficultyProfile, RoadTuning, Tier};

/// Car footprint relative to its anchor: `(dx, dy, glyph)`
pub const CAR: [(i32, i32, char); 4] = [(0, 0, '^'), (-1, 1, '/'), (0, 1, '#'), (1, 1, '\\')];
/// Obstacle footprint relative to its anchor
pub const OBSTACLE: [(i32, i32, char); 3] = [(0, 0, 'A'), (-1, 1, 'o'), (1, 1, 'o')];

/// Anchor cell of a falling obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
}

impl Obstacle {
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        OBSTACLE.iter().map(move |&(dx, dy, _)| (self.x + dx, self.y + dy))
    }
}

#[derive(Debug, Clone)]
pub struct RoadEngine {
    pub car_x: i32,
    pub car_y: i32,
    /// Left lane wall column
    pub left: i32,
    /// Right lane wall column
    pub right: i32,
    pub obstacles: Vec<Obstacle>,
    pub drift_timer: u64,
    tuning: RoadTuning,
}

impl Default for RoadEngine {
    fn default() -> Self {
        Self {
            car_x: ROAD_WIDTH / 2,
            car_y: ROAD_HEIGHT - 3,
            left: 5,
            right: ROAD_WIDTH - 5,
            obstacles: Vec::new(),
            drift_timer: 0,
            tuning: Tier::Normal.profile().road,
        }
    }
}

impl RoadEngine {
    pub fn car_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        CAR.iter().map(move |&(dx, dy, _)| (self.car_x + dx, self.car_y + dy))
    }

    pub fn lane_width(&self) -> i32 {
        self.right - self.left
    }

    /// Car touching or past a lane wall, or overlapping any obstacle
    pub fn car_collides(&self) -> bool {
        if self.car_cells().any(|(x, _)| x <= self.left || x >= self.right) {
            return true;
        }
        self.obstacles
            .iter()
            .flat_map(|o| o.cells())
            .any(|cell| self.car_cells().any(|c| c == cell))
    }

    fn spawn_obstacle(&mut self, session: &mut Session) {
        let (min, max) = (self.left + 2, self.right - 2);
        let x = session.rng().range_inclusive(min, max);
        self.obstacles.push(Obstacle { x, y: 0 });
    }

    /// Periodic lane drift, biased toward narrowing, width kept in bounds
    fn drift(&mut self, session: &mut Session) {
        self.drift_timer += 1;
        if self.drift_timer % ROAD_DRIFT_PERIOD != 0 {
            return;
        }

        let narrow = session.rng().chance(ROAD_NARROW_CHANCE);
        let width = self.lane_width();
        if narrow && width > ROAD_MIN_LANE_WIDTH {
            self.left += 1;
            self.right -= 1;
        } else if !narrow && width < ROAD_MAX_LANE_WIDTH {
            self.left -= 1;
            self.right += 1;
        }
        self.left = self.left.min(ROAD_WIDTH / 2 - 4).max(2);
        self.right = self.right.max(ROAD_WIDTH / 2 + 4).min(ROAD_WIDTH - 3);
        log::debug!("road lane drift: {}..{}", self.left, self.right);
    }
}

impl Engine for RoadEngine {
    fn kind(&self) -> GameKind {
        GameKind::Road
    }

    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile) {
        *self = Self {
            tuning: profile.road,
            ..Self::default()
        };
        session.set_tick_interval_ms(self.tuning.tick_ms);
    }

    fn step(&mut self, session: &mut Session) {
        if session.frame() % self.tuning.spawn_every == 0 {
            self.spawn_obstacle(session);
        }
        for obstacle in &mut self.obstacles {
            obstacle.y += 1;
        }
        self.obstacles.retain(|o| o.y < ROAD_HEIGHT - 1);

        let dodged = self
            .obstacles
            .iter()
            .filter(|o| o.y == self.car_y && (o.x - self.car_x).abs() > ROAD_DODGE_DISTANCE)
            .count() as u64;
        session.add_score(1 + dodged);

        if self.car_collides() {
            session.request_termination(Cause::Crashed);
            return;
        }

        self.drift(session);
    }

    fn on_input(&mut self, input: Input, _session: &mut Session) -> bool {
        match input {
            Input::Left => {
                self.car_x -= 1;
                true
            }
            Input::Right => {
                self.car_x += 1;
                true
            }
            _ => false,
        }
    }

    fn render(&self) -> TextGrid {
        let mut grid = TextGrid::new(ROAD_WIDTH as usize, ROAD_HEIGHT as usize);
        let mid = (self.left + self.right) / 2;
        for y in 0..ROAD_HEIGHT {
            grid.put(self.left, y, '|');
            grid.put(self.right, y, '|');
            if y % 2 == 0 {
                grid.put(mid, y, ':');
            }
        }
        for &(dx, dy, ch) in &CAR {
            grid.put(self.car_x + dx, self.car_y + dy, ch);
        }
        for obstacle in &self.obstacles {
            for &(dx, dy, ch) in &OBSTACLE {
                grid.put(obstacle.x + dx, obstacle.y + dy, ch);
            }
        }
        grid
    }

    fn controls(&self) -> &'static str {
        "← → steer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Mode;

    fn setup(tier: Tier, seed: u32) -> (RoadEngine, Session) {
        let mut engine = RoadEngine::default();
        let mut session = Session::new(tier, Mode::Marathon, seed);
        engine.init(&mut session, tier.profile());
        (engine, session)
    }

    /// Step the way the controller does: frame first, then the engine
    fn tick(engine: &mut RoadEngine, session: &mut Session) {
        session.next_frame();
        engine.step(session);
    }

    #[test]
    fn test_scores_each_tick() {
        let (mut engine, mut session) = setup(Tier::Easy, 1);
        tick(&mut engine, &mut session);
        assert_eq!(session.base_score(), 1);
        assert!(session.pending_termination().is_none());
    }

    #[test]
    fn test_boundary_contact_crashes() {
        for steer in [Input::Left, Input::Right] {
            let (mut engine, mut session) = setup(Tier::Normal, 2);
            engine.obstacles.clear();
            // car half-width is 1; walls at 5 and 22, car at 13
            for _ in 0..8 {
                engine.on_input(steer, &mut session);
            }
            tick(&mut engine, &mut session);
            assert_eq!(
                session.pending_termination(),
                Some(Cause::Crashed),
                "steering {steer:?} into the wall"
            );
        }
    }

    #[test]
    fn test_input_is_unclamped() {
        let (mut engine, mut session) = setup(Tier::Normal, 2);
        for _ in 0..30 {
            assert!(engine.on_input(Input::Left, &mut session));
        }
        assert_eq!(engine.car_x, ROAD_WIDTH / 2 - 30);
        assert!(!engine.on_input(Input::Up, &mut session));
    }

    #[test]
    fn test_obstacle_collision() {
        let (mut engine, mut session) = setup(Tier::Normal, 2);
        // lands on the car's nose row next tick
        engine.obstacles.push(Obstacle {
            x: engine.car_x + 1,
            y: engine.car_y - 2,
        });
        tick(&mut engine, &mut session);
        assert_eq!(session.pending_termination(), Some(Cause::Crashed));
    }

    #[test]
    fn test_dodge_bonus() {
        let (mut engine, mut session) = setup(Tier::Normal, 2);
        engine.obstacles.push(Obstacle {
            x: engine.car_x + 4,
            y: engine.car_y - 1,
        });
        tick(&mut engine, &mut session);
        assert!(session.pending_termination().is_none());
        assert_eq!(session.base_score(), 2);
    }

    #[test]
    fn test_obstacles_discarded_past_bottom() {
        let (mut engine, mut session) = setup(Tier::Normal, 2);
        engine.car_x = engine.left + 3;
        engine.obstacles.push(Obstacle {
            x: engine.right - 2,
            y: ROAD_HEIGHT - 2,
        });
        tick(&mut engine, &mut session);
        assert!(engine.obstacles.iter().all(|o| o.y < ROAD_HEIGHT - 1));
    }

    #[test]
    fn test_lane_width_stays_bounded() {
        let (mut engine, mut session) = setup(Tier::Insane, 31);
        for _ in 0..5000 {
            engine.drift(&mut session);
            let width = engine.lane_width();
            assert!(width >= ROAD_MIN_LANE_WIDTH && width <= ROAD_MAX_LANE_WIDTH, "width {width}");
            assert!(engine.left >= 2 && engine.right <= ROAD_WIDTH - 3);
        }
    }

    #[test]
    fn test_spawns_on_frame_multiples() {
        for tier in [Tier::Easy, Tier::Insane] {
            let (mut engine, mut session) = setup(tier, 8);
            let every = tier.profile().road.spawn_every;
            let mut spawned_at = Vec::new();
            for _ in 0..60 {
                tick(&mut engine, &mut session);
                if !engine.obstacles.is_empty() {
                    spawned_at.push(session.frame());
                }
                engine.obstacles.clear();
            }
            let expected: Vec<u64> = (1..=60).filter(|f| f % every == 0).collect();
            assert_eq!(spawned_at, expected, "tier {tier}");
        }
    }

    #[test]
    fn test_walls_move_only_on_drift_period() {
        let (mut engine, mut session) = setup(Tier::Normal, 21);
        let mut moved_at = Vec::new();
        for _ in 0..500 {
            let walls = (engine.left, engine.right);
            engine.obstacles.clear();
            tick(&mut engine, &mut session);
            assert!(session.pending_termination().is_none());
            if (engine.left, engine.right) != walls {
                moved_at.push(session.frame());
            }
        }
        assert!(!moved_at.is_empty());
        assert!(moved_at.iter().all(|f| f % ROAD_DRIFT_PERIOD == 0), "{moved_at:?}");
    }

    #[test]
    fn test_spawn_columns_in_lane() {
        let (mut engine, mut session) = setup(Tier::Insane, 4);
        for _ in 0..500 {
            engine.spawn_obstacle(&mut session);
        }
        assert!(
            engine
                .obstacles
                .iter()
                .all(|o| o.x >= engine.left + 2 && o.x <= engine.right - 2)
        );
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let (mut engine, mut session) = setup(Tier::Hard, 555);
            let mut trace = Vec::new();
            for t in 0..300u64 {
                if t % 3 == 0 {
                    let steer = if (t / 9) % 2 == 0 { Input::Left } else { Input::Right };
                    engine.on_input(steer, &mut session);
                }
                tick(&mut engine, &mut session);
                trace.push(engine.render().to_string());
                if session.pending_termination().is_some() {
                    break;
                }
            }
            (trace, session.base_score(), session.pending_termination())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_render() {
        let (engine, _) = setup(Tier::Normal, 1);
        let grid = engine.render();
        assert_eq!(grid.width(), ROAD_WIDTH as usize);
        assert_eq!(grid.get(5, 0), Some('|'));
        assert_eq!(grid.get(22, 3), Some('|'));
        assert_eq!(grid.get(13, 0), Some(':'));
        assert_eq!(grid.get(13, 19), Some('^'));
        assert_eq!(grid.get(14, 20), Some('\\'));
    }
}
