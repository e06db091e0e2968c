//! "Any session active" registry
//!
//! Shared by every controller in the process; the driver reads it to decide
//! whether keys belong to a running game or to the menu.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::sim::{ActivityRegistry, GameKind};

#[derive(Debug, Default)]
pub struct ActiveRegistry {
    active: RefCell<BTreeSet<GameKind>>,
}

impl ActiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn any_active(&self) -> bool {
        !self.active.borrow().is_empty()
    }

    pub fn is_active(&self, game: GameKind) -> bool {
        self.active.borrow().contains(&game)
    }
}

impl ActivityRegistry for ActiveRegistry {
    fn register(&self, game: GameKind) {
        self.active.borrow_mut().insert(game);
    }

    fn deregister(&self, game: GameKind) {
        self.active.borrow_mut().remove(&game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Controller, Mode};
    use crate::tuning::Tier;
    use std::rc::Rc;

    #[test]
    fn test_tracks_controllers() {
        let registry = Rc::new(ActiveRegistry::new());
        let mut snake = Controller::new(GameKind::Snake.engine(), Tier::Normal, Mode::Practice)
            .with_registry(registry.clone());
        let mut road = Controller::new(GameKind::Road.engine(), Tier::Normal, Mode::Practice)
            .with_registry(registry.clone());
        assert!(!registry.any_active());

        snake.start_with_seed(1);
        road.start_with_seed(2);
        assert!(registry.is_active(GameKind::Snake));
        snake.stop();
        assert!(registry.any_active());
        road.stop();
        assert!(!registry.any_active());
    }
}
