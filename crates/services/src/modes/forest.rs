use rand::Rng;
use realm_core::model::ObstacleType;
use realm_core::progression::Event;

/// Width and height of the forest grid.
pub const GRID_SIZE: u8 = 5;

/// Score granted by a powerup.
pub const POWERUP_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    fn random(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.random_range(0..GRID_SIZE),
            y: rng.random_range(0..GRID_SIZE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub position: Position,
    pub kind: ObstacleType,
}

/// What happened on one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Where the player ended up, after any push back.
    pub position: Position,
    /// A tree pushed the player back before they settled.
    pub pushed_back: bool,
    /// What took effect on the cell the player settled on.
    pub obstacle: Option<ObstacleType>,
    /// Engine event to feed into the session.
    pub event: Option<Event>,
    /// The player stands on the clue and should be shown the challenge.
    pub at_clue: bool,
}

/// The forest grid: the player, the obstacles and the clue cell.
pub struct ForestRun<R> {
    rng: R,
    player: Position,
    obstacles: Vec<Obstacle>,
    clue: Position,
}

impl<R: Rng> ForestRun<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        let obstacle = |x, y, kind| Obstacle {
            position: Position::new(x, y),
            kind,
        };
        Self {
            rng,
            player: Position::new(0, 0),
            obstacles: vec![
                obstacle(2, 1, ObstacleType::Tree),
                obstacle(1, 2, ObstacleType::Trap),
                obstacle(3, 2, ObstacleType::Powerup),
                obstacle(4, 3, ObstacleType::Monster),
            ],
            clue: Position::new(4, 2),
        }
    }

    #[must_use]
    pub fn player(&self) -> Position {
        self.player
    }

    #[must_use]
    pub fn clue(&self) -> Position {
        self.clue
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn obstacle_at(&self, position: Position) -> Option<ObstacleType> {
        self.obstacles
            .iter()
            .find(|o| o.position == position)
            .map(|o| o.kind)
    }

    /// Move one cell. Moves off the grid are refused with `None`.
    ///
    /// Trees push the player one column back, or back where they came from in
    /// the first column, and whatever waits on that cell takes effect. Traps
    /// stay put and cost a life each visit; monsters cost a life and vanish;
    /// powerups grant [`POWERUP_POINTS`] and vanish.
    pub fn step(&mut self, direction: Direction) -> Option<Step> {
        let Position { x, y } = self.player;
        let target = match direction {
            Direction::Up => Position::new(x, y.checked_sub(1)?),
            Direction::Down => Position::new(x, y + 1),
            Direction::Left => Position::new(x.checked_sub(1)?, y),
            Direction::Right => Position::new(x + 1, y),
        };
        if target.x >= GRID_SIZE || target.y >= GRID_SIZE {
            return None;
        }
        let from = self.player;
        self.player = target;

        let mut pushed_back = false;
        let mut obstacle = self.obstacle_at(self.player);
        for _ in 0..GRID_SIZE {
            if obstacle != Some(ObstacleType::Tree) {
                break;
            }
            pushed_back = true;
            self.player = match self.player.x.checked_sub(1) {
                Some(x) => Position::new(x, self.player.y),
                None => from,
            };
            obstacle = self.obstacle_at(self.player);
        }

        let landed = self.player;
        let event = match obstacle {
            Some(ObstacleType::Tree) | None => None,
            Some(ObstacleType::Trap) => Some(Event::Hazard),
            Some(ObstacleType::Monster) => {
                self.remove_at(landed);
                Some(Event::Hazard)
            }
            Some(ObstacleType::Powerup) => {
                self.remove_at(landed);
                Some(Event::Bonus {
                    points: POWERUP_POINTS,
                })
            }
        };

        Some(Step {
            position: self.player,
            pushed_back,
            obstacle,
            event,
            at_clue: self.player == self.clue,
        })
    }

    /// Move the clue after a correct answer and, on a coin flip, spawn a trap
    /// or monster somewhere on the grid. Returns the spawned obstacle.
    pub fn clue_solved(&mut self) -> Option<Obstacle> {
        self.clue = Position::random(&mut self.rng);
        if !self.rng.random_bool(0.5) {
            return None;
        }
        let kind = if self.rng.random_bool(0.5) {
            ObstacleType::Monster
        } else {
            ObstacleType::Trap
        };
        let spawned = Obstacle {
            position: Position::random(&mut self.rng),
            kind,
        };
        self.obstacles.push(spawned);
        tracing::debug!(?spawned, "obstacle spawned");
        Some(spawned)
    }

    fn remove_at(&mut self, position: Position) {
        self.obstacles.retain(|o| o.position != position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run() -> ForestRun<StdRng> {
        ForestRun::new(StdRng::seed_from_u64(4))
    }

    fn walk(forest: &mut ForestRun<StdRng>, moves: &[Direction]) -> Vec<Step> {
        moves.iter().filter_map(|d| forest.step(*d)).collect()
    }

    #[test]
    fn moves_stay_on_the_grid() {
        let mut forest = run();
        assert_eq!(forest.step(Direction::Up), None);
        assert_eq!(forest.step(Direction::Left), None);
        assert_eq!(forest.player(), Position::new(0, 0));

        walk(&mut forest, &[Direction::Down; 6]);
        assert_eq!(forest.player(), Position::new(0, 4));
    }

    #[test]
    fn trees_push_back_a_column() {
        let mut forest = run();
        let steps = walk(&mut forest, &[Direction::Down, Direction::Right, Direction::Right]);
        let last = steps.last().unwrap();
        assert!(last.pushed_back);
        assert_eq!(last.obstacle, None);
        assert_eq!(last.position, Position::new(1, 1));
        assert_eq!(last.event, None);
        assert_eq!(forest.obstacle_at(Position::new(2, 1)), Some(ObstacleType::Tree));
    }

    #[test]
    fn push_back_cells_take_effect() {
        let mut forest = run();
        forest.obstacles.push(Obstacle {
            position: Position::new(1, 1),
            kind: ObstacleType::Monster,
        });
        walk(&mut forest, &[Direction::Right, Direction::Right]);
        let step = forest.step(Direction::Down).unwrap();
        assert!(step.pushed_back);
        assert_eq!(step.position, Position::new(1, 1));
        assert_eq!(step.obstacle, Some(ObstacleType::Monster));
        assert_eq!(step.event, Some(Event::Hazard));
        assert_eq!(forest.obstacle_at(Position::new(1, 1)), None);
    }

    #[test]
    fn first_column_trees_send_the_player_back() {
        let mut forest = run();
        forest.obstacles.push(Obstacle {
            position: Position::new(0, 2),
            kind: ObstacleType::Tree,
        });
        forest.step(Direction::Down).unwrap();
        let step = forest.step(Direction::Down).unwrap();
        assert!(step.pushed_back);
        assert_eq!(step.position, Position::new(0, 1));
        assert_eq!(step.event, None);
    }

    #[test]
    fn traps_persist_and_powerups_vanish() {
        let mut forest = run();
        let steps = walk(
            &mut forest,
            &[Direction::Down, Direction::Down, Direction::Right],
        );
        assert_eq!(steps[2].event, Some(Event::Hazard));
        assert_eq!(forest.obstacle_at(Position::new(1, 2)), Some(ObstacleType::Trap));

        let steps = walk(&mut forest, &[Direction::Right, Direction::Right]);
        assert_eq!(steps[1].event, Some(Event::Bonus { points: 5 }));
        assert_eq!(forest.obstacle_at(Position::new(3, 2)), None);

        let step = forest.step(Direction::Right).unwrap();
        assert!(step.at_clue);
    }

    #[test]
    fn monsters_strike_once() {
        let mut forest = run();
        walk(&mut forest, &[Direction::Down; 3]);
        walk(&mut forest, &[Direction::Right; 3]);
        let step = forest.step(Direction::Right).unwrap();
        assert_eq!(step.position, Position::new(4, 3));
        assert_eq!(step.event, Some(Event::Hazard));
        assert_eq!(forest.obstacle_at(Position::new(4, 3)), None);
    }

    #[test]
    fn solving_the_clue_moves_it_and_may_spawn() {
        let mut forest = run();
        let before = forest.obstacles().len();
        let mut spawned = 0;
        for _ in 0..20 {
            if let Some(obstacle) = forest.clue_solved() {
                assert!(matches!(
                    obstacle.kind,
                    ObstacleType::Trap | ObstacleType::Monster
                ));
                spawned += 1;
            }
            assert!(forest.clue().x < GRID_SIZE && forest.clue().y < GRID_SIZE);
        }
        assert!(spawned > 0 && spawned < 20);
        assert_eq!(forest.obstacles().len(), before + spawned);
    }
}
