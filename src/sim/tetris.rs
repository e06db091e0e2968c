//! Falling-block puzzle with a four-piece shuffled bag
//!
//! The active piece may sit partly above the well (negative rows) while it
//! enters; locking any cell above row 0 ends the run.

use super::engine::{Engine, GameKind, Input};
use super::grid::TextGrid;
use super::session::{Cause, Session};
use crate::consts::*;
use crate::tuning::DifficultyProfile;

type Shape = &'static [&'static [u8]];

const I_ROTATIONS: &[Shape] = &[&[&[1], &[1], &[1], &[1]], &[&[1, 1, 1, 1]]];
const O_ROTATIONS: &[Shape] = &[&[&[1, 1], &[1, 1]]];
const L_ROTATIONS: &[Shape] = &[
    &[&[1, 0], &[1, 0], &[1, 1]],
    &[&[1, 1, 1], &[1, 0, 0]],
    &[&[1, 1], &[0, 1], &[0, 1]],
    &[&[0, 0, 1], &[1, 1, 1]],
];
const T_ROTATIONS: &[Shape] = &[
    &[&[1, 1, 1], &[0, 1, 0]],
    &[&[1, 0], &[1, 1], &[1, 0]],
    &[&[0, 1, 0], &[1, 1, 1]],
    &[&[0, 1], &[1, 1], &[0, 1]],
];

/// Piece kinds in the bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    L,
    T,
}

impl PieceKind {
    pub const ALL: [PieceKind; 4] = [PieceKind::I, PieceKind::O, PieceKind::L, PieceKind::T];

    /// Rotation states, each a list of rows
    pub fn rotations(&self) -> &'static [Shape] {
        match self {
            PieceKind::I => I_ROTATIONS,
            PieceKind::O => O_ROTATIONS,
            PieceKind::L => L_ROTATIONS,
            PieceKind::T => T_ROTATIONS,
        }
    }

    /// Filled cell offsets for a rotation state
    pub fn cells(&self, rotation: usize) -> impl Iterator<Item = (i32, i32)> {
        let shape = self.rotations()[rotation % self.rotations().len()];
        shape.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(dx, _)| (dx as i32, dy as i32))
        })
    }
}

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: TETRIS_WIDTH as i32 / 2 - 1,
            y: -2,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .cells(self.rotation)
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Shuffled pool of upcoming pieces; refilled with all four kinds when empty
#[derive(Debug, Clone, Default)]
pub struct Bag {
    pending: Vec<PieceKind>,
}

impl Bag {
    pub fn draw(&mut self, session: &mut Session) -> PieceKind {
        if self.pending.is_empty() {
            self.pending = PieceKind::ALL.to_vec();
            session.rng().shuffle(&mut self.pending);
            log::debug!("tetris bag refilled: {:?}", self.pending);
        }
        // refilled above, never empty here
        self.pending.pop().unwrap_or(PieceKind::O)
    }
}

pub type Well = [[bool; TETRIS_WIDTH]; TETRIS_HEIGHT];

#[derive(Debug, Clone)]
pub struct TetrisEngine {
    pub well: Well,
    pub piece: Piece,
    pub bag: Bag,
}

impl Default for TetrisEngine {
    fn default() -> Self {
        Self {
            well: [[false; TETRIS_WIDTH]; TETRIS_HEIGHT],
            piece: Piece::spawn(PieceKind::O),
            bag: Bag::default(),
        }
    }
}

impl TetrisEngine {
    /// True if the piece overlaps a wall, the floor, or a settled cell.
    /// Cells above the well only collide with the side walls.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(x, y)| {
            if x < 0 || x >= TETRIS_WIDTH as i32 || y >= TETRIS_HEIGHT as i32 {
                return true;
            }
            y >= 0 && self.well[y as usize][x as usize]
        })
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = Piece {
            x: self.piece.x + dx,
            y: self.piece.y + dy,
            ..self.piece
        };
        if self.collides(&moved) {
            return false;
        }
        self.piece = moved;
        true
    }

    /// Rotate in place, else with a one-column kick left, then right
    fn try_rotate(&mut self) -> bool {
        let count = self.piece.kind.rotations().len();
        let rotated = Piece {
            rotation: (self.piece.rotation + 1) % count,
            ..self.piece
        };
        for kick in [0, -1, 1] {
            let candidate = Piece {
                x: rotated.x + kick,
                ..rotated
            };
            if !self.collides(&candidate) {
                self.piece = candidate;
                return true;
            }
        }
        false
    }

    /// Remove full rows, shifting rows above down. Returns the number cleared.
    pub fn clear_lines(&mut self) -> usize {
        let kept: Vec<[bool; TETRIS_WIDTH]> = self
            .well
            .iter()
            .filter(|row| !row.iter().all(|&c| c))
            .copied()
            .collect();
        let cleared = TETRIS_HEIGHT - kept.len();
        if cleared > 0 {
            let mut well = [[false; TETRIS_WIDTH]; TETRIS_HEIGHT];
            well[cleared..].copy_from_slice(&kept);
            self.well = well;
        }
        cleared
    }

    /// Settle the active piece, score cleared rows, spawn the next piece
    fn lock(&mut self, session: &mut Session) {
        let mut above_top = false;
        for (x, y) in self.piece.cells() {
            if y < 0 {
                above_top = true;
            } else {
                self.well[y as usize][x as usize] = true;
            }
        }
        if above_top {
            session.request_termination(Cause::Crashed);
            return;
        }

        let cleared = self.clear_lines();
        if cleared > 0 {
            session.add_score(TETRIS_POINTS_PER_LINE * cleared as u64);
            log::debug!("tetris cleared {} lines", cleared);
        }
        self.spawn(session);
    }

    fn spawn(&mut self, session: &mut Session) {
        self.piece = Piece::spawn(self.bag.draw(session));
        if self.collides(&self.piece) {
            session.request_termination(Cause::Crashed);
        }
    }
}

impl Engine for TetrisEngine {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn init(&mut self, session: &mut Session, profile: &DifficultyProfile) {
        self.well = [[false; TETRIS_WIDTH]; TETRIS_HEIGHT];
        self.bag = Bag::default();
        session.set_tick_interval_ms(profile.tetris.tick_ms);
        self.spawn(session);
    }

    fn step(&mut self, session: &mut Session) {
        if !self.try_move(0, 1) {
            self.lock(session);
        }
    }

    fn on_input(&mut self, input: Input, _session: &mut Session) -> bool {
        match input {
            Input::Left => self.try_move(-1, 0),
            Input::Right => self.try_move(1, 0),
            Input::Down => self.try_move(0, 1),
            Input::Up | Input::Action => self.try_rotate(),
            _ => false,
        }
    }

    fn render(&self) -> TextGrid {
        let mut grid = TextGrid::new(TETRIS_WIDTH * 2, TETRIS_HEIGHT);
        let mut draw = |x: i32, y: i32, filled: bool| {
            let cell = if filled { "[]" } else { " ." };
            grid.put_str(x * 2, y, cell);
        };
        for (y, row) in self.well.iter().enumerate() {
            for (x, &filled) in row.iter().enumerate() {
                draw(x as i32, y as i32, filled);
            }
        }
        for (x, y) in self.piece.cells() {
            if y >= 0 {
                draw(x, y, true);
            }
        }
        grid
    }

    fn controls(&self) -> &'static str {
        "← → move · ↑ rotate · ↓ drop"
    }
}
