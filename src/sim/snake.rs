//! Snake: a head-first body that grows on food

use std::collections::VecDeque;

use super::engine::{Engine, GameKind, Input};
use super::grid::TextGrid;
use super::session::{Cause, Session};
use crate::consts::*;
use crate::tuning::DifficultyProfile;

/// Unit direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dir {
    pub dx: i32,
    pub dy: i32,
}

impl Dir {
    pub const UP: Dir = Dir { dx: 0, dy: -1 };
    pub const DOWN: Dir = Dir { dx: 0, dy: 1 };
    pub const LEFT: Dir = Dir { dx: -1, dy: 0 };
    pub const RIGHT: Dir = Dir { dx: 1, dy: 0 };

    pub fn reverse(self) -> Dir {
        Dir {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

pub type Cell = (i32, i32);

/// Play area is `1..=SNAKE_WIDTH` × `1..=SNAKE_HEIGHT`; row/column 0 and the
/// far edge are the border.
#[derive(Debug, Clone)]
pub struct SnakeEngine {
    /// Head first
    pub body: VecDeque<Cell>,
    /// Direction for the next step
    pub dir: Dir,
    /// Direction of the last step taken
    pub heading: Dir,
    /// None once the board is full
    pub food: Option<Cell>,
}

impl Default for SnakeEngine {
    fn default() -> Self {
        Self {
            body: Self::start_body(),
            dir: Dir::RIGHT,
            heading: Dir::RIGHT,
            food: None,
        }
    }
}

impl SnakeEngine {
    fn start_body() -> VecDeque<Cell> {
        VecDeque::from(vec![(3, 3), (2, 3), (1, 3)])
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn in_bounds((x, y): Cell) -> bool {
        (1..=SNAKE_WIDTH).contains(&x) && (1..=SNAKE_HEIGHT).contains(&y)
    }

    /// Place food uniformly among cells not covered by the body
    fn place_food(&mut self, session: &mut Session) {
        let free: Vec<Cell> = (1..=SNAKE_HEIGHT)
            .flat_map(|y| (1..=SNAKE_WIDTH).map(move |x| (x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        self.food = if free.is_empty() {
            None
        } else {
            Some(free[session.rng().below(free.len())])
        };
    }

    fn turn(&mut self, dir: Dir) -> bool {
        if dir == self.dir.reverse() || dir == self.heading.reverse() {
            return false;
        }
        self.dir = dir;
        true
    }
}

impl Engine for SnakeEngine {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile) {
        self.body = Self::start_body();
        self.dir = Dir::RIGHT;
        self.heading = Dir::RIGHT;
        self.place_food(session);
        session.set_tick_interval_ms(profile.snake.tick_ms);
    }

    fn step(&mut self, session: &mut Session) {
        let (hx, hy) = self.head();
        let head = (hx + self.dir.dx, hy + self.dir.dy);
        if !Self::in_bounds(head) || self.body.contains(&head) {
            session.request_termination(Cause::Crashed);
            return;
        }

        self.heading = self.dir;
        self.body.push_front(head);
        if self.food == Some(head) {
            session.add_score(SNAKE_FOOD_BONUS);
            self.place_food(session);
            log::debug!("snake ate at {:?}, length {}", head, self.body.len());
        } else {
            self.body.pop_back();
        }
    }

    fn on_input(&mut self, input: Input, _session: &mut Session) -> bool {
        let dir = match input {
            Input::Up => Dir::UP,
            Input::Down => Dir::DOWN,
            Input::Left => Dir::LEFT,
            Input::Right => Dir::RIGHT,
            _ => return false,
        };
        self.turn(dir)
    }

    fn render(&self) -> TextGrid {
        let (w, h) = (SNAKE_WIDTH + 2, SNAKE_HEIGHT + 2);
        let mut grid = TextGrid::new(w as usize, h as usize);
        for x in 0..w {
            grid.put(x, 0, '#');
            grid.put(x, h - 1, '#');
        }
        for y in 0..h {
            grid.put(0, y, '#');
            grid.put(w - 1, y, '#');
        }
        if let Some((fx, fy)) = self.food {
            grid.put(fx, fy, '*');
        }
        for (i, &(x, y)) in self.body.iter().enumerate().rev() {
            grid.put(x, y, if i == 0 { '@' } else { 'o' });
        }
        grid
    }

    fn controls(&self) -> &'static str {
        "Arrows move"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Mode;
    use crate::tuning::Tier;
    use proptest::prelude::*;

    fn setup(seed: u32) -> (SnakeEngine, Session) {
        let mut engine = SnakeEngine::default();
        let mut session = Session::new(Tier::Normal, Mode::Marathon, seed);
        engine.init(&mut session, Tier::Normal.profile());
        (engine, session)
    }

    #[test]
    fn test_moves_keeping_length() {
        let (mut engine, mut session) = setup(1);
        engine.food = Some((20, 15));
        engine.step(&mut session);
        assert_eq!(engine.head(), (4, 3));
        assert_eq!(engine.body.len(), 3);
        assert_eq!(session.base_score(), 0);
    }

    #[test]
    fn test_eats_and_grows() {
        let (mut engine, mut session) = setup(1);
        engine.food = Some((4, 3));
        engine.step(&mut session);
        assert_eq!(engine.body.len(), 4);
        assert_eq!(session.base_score(), SNAKE_FOOD_BONUS);
        let food = engine.food.unwrap();
        assert!(!engine.body.contains(&food));
        assert!(SnakeEngine::in_bounds(food));
    }

    #[test]
    fn test_wall_crash() {
        let (mut engine, mut session) = setup(1);
        engine.food = None;
        engine.on_input(Input::Up, &mut session);
        for _ in 0..2 {
            engine.step(&mut session);
        }
        assert!(session.pending_termination().is_none());
        engine.step(&mut session);
        assert_eq!(session.pending_termination(), Some(Cause::Crashed));
        assert_eq!(engine.head(), (3, 1));
    }

    #[test]
    fn test_self_collision() {
        let (mut engine, mut session) = setup(1);
        engine.body = VecDeque::from(vec![(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)]);
        engine.food = None;
        engine.on_input(Input::Down, &mut session);
        engine.step(&mut session);
        assert_eq!(session.pending_termination(), Some(Cause::Crashed));
    }

    #[test]
    fn test_reverse_rejected() {
        let (mut engine, mut session) = setup(1);
        assert!(!engine.on_input(Input::Left, &mut session));
        assert_eq!(engine.dir, Dir::RIGHT);

        // two quick turns inside one tick cannot fold back onto the neck
        assert!(engine.on_input(Input::Up, &mut session));
        assert!(!engine.on_input(Input::Left, &mut session));
        assert_eq!(engine.dir, Dir::UP);
        assert!(!engine.on_input(Input::Action, &mut session));
    }

    #[test]
    fn test_full_board_has_no_food() {
        let (mut engine, mut session) = setup(1);
        engine.body = (1..=SNAKE_HEIGHT)
            .flat_map(|y| (1..=SNAKE_WIDTH).map(move |x| (x, y)))
            .collect();
        engine.place_food(&mut session);
        assert_eq!(engine.food, None);
    }

    #[test]
    fn test_render() {
        let (engine, _) = setup(1);
        let grid = engine.render();
        assert_eq!(grid.width(), 30);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.get(3, 3), Some('@'));
        assert_eq!(grid.get(1, 3), Some('o'));
        assert_eq!(grid.get(0, 0), Some('#'));
    }

    #[test]
    fn test_determinism() {
        let script = [Input::Down, Input::Right, Input::Down, Input::Left, Input::Up];
        let run = || {
            let (mut engine, mut session) = setup(77);
            let mut trace = Vec::new();
            for t in 0..120 {
                if t % 7 == 0 {
                    engine.on_input(script[(t / 7) % script.len()], &mut session);
                }
                engine.step(&mut session);
                trace.push(engine.render().to_string());
                if session.pending_termination().is_some() {
                    break;
                }
            }
            (trace, session.base_score(), session.pending_termination())
        };
        assert_eq!(run(), run());
    }

    fn dir_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            Just(Input::Up),
            Just(Input::Down),
            Just(Input::Left),
            Just(Input::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_reverse_never_applies(inputs in proptest::collection::vec(dir_strategy(), 1..40)) {
            let (mut engine, mut session) = setup(3);
            for input in inputs {
                let before = engine.dir;
                let reverse = match input {
                    Input::Up => Dir::UP,
                    Input::Down => Dir::DOWN,
                    Input::Left => Dir::LEFT,
                    _ => Dir::RIGHT,
                } == before.reverse();
                engine.on_input(input, &mut session);
                if reverse {
                    prop_assert_eq!(engine.dir, before);
                }
            }
        }
    }
}
