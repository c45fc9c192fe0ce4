use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use super::config::GameConfig;
use super::coordinate::Coordinate;
use super::orientation::Orientation;
use super::snake::{Growth, Snake};
use super::surface::Surface;

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the playground
    Wall,
    /// Snake hit its own body
    SelfCollision,
}

/// Lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Terminal: the snake collided
    GameOver(CollisionType),
    /// Terminal: the snake fills the whole playground, nothing left to eat
    Cleared,
}

impl Status {
    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell
    Moved,
    /// The snake ate and grew; the level went up
    Ate,
    GameOver(CollisionType),
    Cleared,
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::GameOver(_) | TickOutcome::Cleared)
    }
}

/// Cells not covered by the snake or the food
///
/// Backed by a vector for uniform random picks and an index for O(1) removal.
#[derive(Debug, Clone, Default)]
struct FreeCells {
    cells: Vec<Coordinate>,
    index: HashMap<Coordinate, usize>,
}

impl FreeCells {
    fn insert(&mut self, cell: Coordinate) -> bool {
        if self.index.contains_key(&cell) {
            return false;
        }
        self.index.insert(cell, self.cells.len());
        self.cells.push(cell);
        true
    }

    fn remove(&mut self, cell: Coordinate) -> bool {
        let Some(i) = self.index.remove(&cell) else {
            return false;
        };
        self.cells.swap_remove(i);
        if let Some(moved) = self.cells.get(i) {
            self.index.insert(*moved, i);
        }
        true
    }

    fn contains(&self, cell: Coordinate) -> bool {
        self.index.contains_key(&cell)
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn choose<R: Rng>(&self, rng: &mut R) -> Option<Coordinate> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells[rng.gen_range(0..self.cells.len())])
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.index.clear();
    }
}

/// The playing field: grid, food, level and the tick state machine
///
/// Free cells, snake cells and the food cell always partition the grid.
pub struct Playground<S: Surface, R: Rng> {
    width: i32,
    height: i32,
    grid_size: i32,
    free: FreeCells,
    food: Option<Coordinate>,
    level: u32,
    interval_ms: u64,
    min_interval_ms: u64,
    status: Status,
    snake: Snake,
    surface: S,
    rng: R,
}

impl<S: Surface, R: Rng> Playground<S, R> {
    /// Create a playground on `surface` and throw in the starting snake
    pub fn new(config: &GameConfig, surface: S, rng: R) -> Self {
        let snake = Snake::new(config.grid_size, config.initial_snake_length);
        Self::with_snake(config, surface, rng, snake)
    }

    /// Create a playground around an existing snake
    ///
    /// The playground size comes from the surface, rounded down to whole cells.
    pub fn with_snake(config: &GameConfig, surface: S, rng: R, snake: Snake) -> Self {
        let grid_size = config.grid_size.max(1);
        let width = surface.width() / grid_size * grid_size;
        let height = surface.height() / grid_size * grid_size;

        let mut playground = Self {
            width,
            height,
            grid_size,
            free: FreeCells::default(),
            food: None,
            level: 0,
            interval_ms: config.initial_interval_ms,
            min_interval_ms: config.min_interval_ms,
            status: Status::Running,
            snake,
            surface,
            rng,
        };

        playground.initialize_free_space();
        playground.throw_in_snake();
        playground.advance_level();
        playground
    }

    /// Mark every grid-aligned cell in bounds as free
    pub fn initialize_free_space(&mut self) {
        self.free.clear();
        for x in (0..self.width).step_by(self.grid_size as usize) {
            for y in (0..self.height).step_by(self.grid_size as usize) {
                self.free.insert(Coordinate::new(x, y));
            }
        }
    }

    fn throw_in_snake(&mut self) {
        let body: Vec<Coordinate> = self.snake.body().copied().collect();
        for cell in body {
            self.occupy(cell);
        }
        self.snake.spawn(&mut self.surface);
        info!(
            "Snake thrown in: {} cells heading {:?} on a {}x{} playground",
            self.snake.len(),
            self.snake.orientation(),
            self.width,
            self.height
        );
    }

    pub fn is_in_bounds(&self, position: Coordinate) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    /// What the snake would hit at `position`, if anything
    pub fn collision_at(&self, position: Coordinate) -> Option<CollisionType> {
        if !self.is_in_bounds(position) {
            return Some(CollisionType::Wall);
        }
        if self.snake.occupies(position) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    pub fn is_legal_position(&self, position: Coordinate) -> bool {
        self.collision_at(position).is_none()
    }

    /// Take a cell out of the free set
    pub fn occupy(&mut self, position: Coordinate) {
        self.free.remove(position);
    }

    /// Return a cell to the free set
    pub fn release(&mut self, position: Coordinate) {
        if self.is_in_bounds(position) {
            self.free.insert(position);
        }
    }

    /// Place food on a random free cell
    ///
    /// Returns `None` when no free cell is left.
    pub fn spawn_food(&mut self) -> Option<Coordinate> {
        let food = self.free.choose(&mut self.rng)?;
        self.occupy(food);
        self.draw_food(food);
        self.food = Some(food);
        debug!("Food thrown in at {}", food);
        Some(food)
    }

    /// Put the food on a chosen free cell
    #[cfg(test)]
    pub(crate) fn place_food(&mut self, position: Coordinate) -> bool {
        if self.food.is_some() || !self.free.contains(position) {
            return false;
        }
        self.occupy(position);
        self.draw_food(position);
        self.food = Some(position);
        true
    }

    // Food is a cell split in 3x3 with only the edge midpoints filled
    fn draw_food(&mut self, food: Coordinate) {
        let size = self.grid_size;
        self.surface.draw_cell(food.x, food.y, size, size);

        if size % 3 != 0 {
            return;
        }
        let third = size / 3;
        for (col, row) in [(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)] {
            self.surface
                .erase_cell(food.x + col * third, food.y + row * third, third, third);
        }
    }

    /// Go up one level, shrinking the tick interval by 10%
    pub fn advance_level(&mut self) {
        self.level += 1;
        let shrunk = (u128::from(self.interval_ms) * 9 / 10) as u64;
        self.interval_ms = shrunk.max(self.min_interval_ms);
        debug!("Level {} at {} ms per tick", self.level, self.interval_ms);
    }

    /// Buffer a turn; ignored once the game has ended
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if !self.status.is_running() {
            return false;
        }
        self.snake.set_orientation(orientation)
    }

    /// Advance the game by one step
    ///
    /// After a terminal outcome the playground no longer changes and every
    /// further tick reports the same outcome.
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            Status::GameOver(collision) => return TickOutcome::GameOver(collision),
            Status::Cleared => return TickOutcome::Cleared,
            Status::Running => {}
        }

        let next = self.snake.turn();

        if self.food.is_none() && self.spawn_food().is_none() {
            self.status = Status::Cleared;
            info!("Playground cleared at level {}", self.level);
            return TickOutcome::Cleared;
        }

        if let Some(collision) = self.collision_at(next) {
            self.status = Status::GameOver(collision);
            info!(
                "Game over: {:?} at {} (level {}, length {})",
                collision,
                next,
                self.level,
                self.snake.len()
            );
            return TickOutcome::GameOver(collision);
        }

        self.occupy(next);

        if self.food == Some(next) {
            self.snake.advance(next, Growth::Grow, &mut self.surface);
            self.food = None;
            self.advance_level();
            TickOutcome::Ate
        } else {
            let tail = self.snake.tail();
            self.release(tail);
            self.snake.advance(next, Growth::Move, &mut self.surface);
            TickOutcome::Moved
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Total number of grid cells
    pub fn cell_count(&self) -> usize {
        ((self.width / self.grid_size) * (self.height / self.grid_size)) as usize
    }

    pub fn free_cell_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_free(&self, position: Coordinate) -> bool {
        self.free.contains(position)
    }

    pub fn food(&self) -> Option<Coordinate> {
        self.food
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::surface::PixelCanvas;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn config(grid_size: i32) -> GameConfig {
        GameConfig {
            grid_size,
            ..GameConfig::default()
        }
    }

    fn playground_with(
        width: i32,
        height: i32,
        grid_size: i32,
        body: Vec<Coordinate>,
        orientation: Orientation,
    ) -> Playground<PixelCanvas, StdRng> {
        let snake = Snake::from_body(grid_size, body, orientation).unwrap();
        Playground::with_snake(
            &config(grid_size),
            PixelCanvas::new(width, height),
            StdRng::seed_from_u64(7),
            snake,
        )
    }

    fn assert_partition<S: Surface, R: Rng>(playground: &Playground<S, R>) {
        let grid = playground.grid_size();
        let mut covered = 0;

        for x in (0..playground.width()).step_by(grid as usize) {
            for y in (0..playground.height()).step_by(grid as usize) {
                let cell = Coordinate::new(x, y);
                let owners = [
                    playground.is_free(cell),
                    playground.snake().occupies(cell),
                    playground.food() == Some(cell),
                ]
                .iter()
                .filter(|&&owned| owned)
                .count();
                assert_eq!(owners, 1, "cell {} has {} owners", cell, owners);
                covered += 1;
            }
        }

        assert_eq!(covered, playground.cell_count());
        let body: HashSet<_> = playground.snake().body().collect();
        assert_eq!(body.len(), playground.snake().len(), "body overlaps itself");
    }

    #[test]
    fn test_new_playground() {
        let playground = Playground::new(
            &config(10),
            PixelCanvas::new(100, 100),
            StdRng::seed_from_u64(1),
        );

        assert_eq!(playground.level(), 1);
        assert_eq!(playground.interval(), Duration::from_millis(450));
        assert_eq!(playground.cell_count(), 100);
        assert_eq!(playground.free_cell_count(), 90);
        assert_eq!(playground.food(), None);
        assert!(playground.status().is_running());
        assert_partition(&playground);
    }

    #[test]
    fn test_size_rounds_down_to_whole_cells() {
        let playground = Playground::new(
            &config(10),
            PixelCanvas::new(105, 99),
            StdRng::seed_from_u64(1),
        );
        assert_eq!(playground.width(), 100);
        assert_eq!(playground.height(), 90);
        assert_eq!(playground.cell_count(), 90);
    }

    #[test]
    fn test_bounds_checking() {
        let playground = playground_with(
            100,
            100,
            10,
            vec![Coordinate::new(0, 50), Coordinate::new(10, 50)],
            Orientation::Right,
        );

        assert!(playground.is_legal_position(Coordinate::new(0, 0)));
        assert!(playground.is_legal_position(Coordinate::new(90, 90)));
        assert!(!playground.is_legal_position(Coordinate::new(-10, 0)));
        assert!(!playground.is_legal_position(Coordinate::new(100, 0)));
        assert!(!playground.is_legal_position(Coordinate::new(0, 100)));
        assert_eq!(
            playground.collision_at(Coordinate::new(10, 50)),
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(
            playground.collision_at(Coordinate::new(0, -10)),
            Some(CollisionType::Wall)
        );
    }

    #[test]
    fn test_run_into_right_wall() {
        let mut playground = Playground::new(
            &config(10),
            PixelCanvas::new(100, 100),
            StdRng::seed_from_u64(3),
        );
        assert_eq!(playground.snake().head(), Coordinate::new(90, 0));

        let outcome = playground.tick();

        assert!(playground.food().is_some());
        assert_eq!(outcome, TickOutcome::GameOver(CollisionType::Wall));
        assert_eq!(playground.status(), Status::GameOver(CollisionType::Wall));
        assert_eq!(playground.snake().head(), Coordinate::new(90, 0));
        assert_partition(&playground);
    }

    #[test]
    fn test_eat_food() {
        let mut playground = playground_with(
            100,
            100,
            10,
            vec![Coordinate::new(0, 0), Coordinate::new(10, 0)],
            Orientation::Right,
        );
        let free_before = playground.free_cell_count();
        assert!(playground.place_food(Coordinate::new(20, 0)));

        let outcome = playground.tick();

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(
            playground.snake().body().copied().collect::<Vec<_>>(),
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(10, 0),
                Coordinate::new(20, 0)
            ]
        );
        assert_eq!(playground.snake().len(), 3);
        assert_eq!(playground.level(), 2);
        assert_eq!(playground.food(), None);
        // One cell net: taken by the food, kept by the new head
        assert_eq!(playground.free_cell_count(), free_before - 1);
        assert_partition(&playground);
    }

    #[test]
    fn test_spawned_food_leaves_free_set() {
        let mut playground = playground_with(
            30,
            30,
            10,
            vec![Coordinate::new(0, 0), Coordinate::new(10, 0)],
            Orientation::Right,
        );
        let free_before = playground.free_cell_count();

        // Whatever cell is picked, spawning takes it out of the free set
        let food = playground.spawn_food().unwrap();
        assert!(!playground.is_free(food));
        assert_eq!(playground.free_cell_count(), free_before - 1);
        assert_partition(&playground);
    }

    #[test]
    fn test_move_releases_tail() {
        let mut playground = playground_with(
            100,
            100,
            10,
            vec![Coordinate::new(0, 50), Coordinate::new(10, 50)],
            Orientation::Right,
        );
        assert!(playground.place_food(Coordinate::new(90, 90)));

        assert_eq!(playground.tick(), TickOutcome::Moved);
        assert!(playground.is_free(Coordinate::new(0, 50)));
        assert!(!playground.is_free(Coordinate::new(20, 50)));
        assert_eq!(playground.snake().len(), 2);
        assert_partition(&playground);
    }

    #[test]
    fn test_self_collision() {
        // Head at (10,10) heading down into a U-shaped body
        let body = vec![
            Coordinate::new(0, 20),
            Coordinate::new(0, 10),
            Coordinate::new(10, 20),
            Coordinate::new(20, 20),
            Coordinate::new(20, 10),
            Coordinate::new(10, 10),
        ];
        let mut playground = playground_with(50, 50, 10, body, Orientation::Left);
        playground.set_orientation(Orientation::Down);

        assert_eq!(
            playground.tick(),
            TickOutcome::GameOver(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_own_tail_is_a_collision() {
        let body = vec![
            Coordinate::new(0, 0),
            Coordinate::new(10, 0),
            Coordinate::new(10, 10),
            Coordinate::new(0, 10),
        ];
        let mut playground = playground_with(50, 50, 10, body, Orientation::Left);
        playground.set_orientation(Orientation::Up);

        assert_eq!(
            playground.tick(),
            TickOutcome::GameOver(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut playground = Playground::new(
            &config(10),
            PixelCanvas::new(100, 100),
            StdRng::seed_from_u64(3),
        );
        playground.tick();
        let canvas = playground.surface().clone();

        assert!(!playground.set_orientation(Orientation::Down));
        assert_eq!(playground.tick(), TickOutcome::GameOver(CollisionType::Wall));
        assert_eq!(playground.surface(), &canvas);
    }

    #[test]
    fn test_advance_level_interval() {
        let mut playground = playground_with(
            30,
            30,
            10,
            vec![Coordinate::new(0, 0)],
            Orientation::Right,
        );
        assert_eq!(playground.interval(), Duration::from_millis(450));

        let mut expected = 450u64;
        for _ in 0..60 {
            playground.advance_level();
            expected = (expected * 9 / 10).max(17);
            assert_eq!(playground.interval(), Duration::from_millis(expected));
        }
        assert_eq!(playground.interval(), Duration::from_millis(17));
        assert_eq!(playground.level(), 61);
    }

    #[test]
    fn test_advance_level_on_huge_interval() {
        let config = GameConfig {
            grid_size: 10,
            initial_interval_ms: u64::MAX,
            ..GameConfig::default()
        };
        let snake = Snake::from_body(10, vec![Coordinate::new(0, 0)], Orientation::Right).unwrap();
        let playground = Playground::with_snake(
            &config,
            PixelCanvas::new(30, 30),
            StdRng::seed_from_u64(7),
            snake,
        );
        assert_eq!(
            playground.interval(),
            Duration::from_millis((u128::from(u64::MAX) * 9 / 10) as u64)
        );
    }

    #[test]
    fn test_cleared_when_grid_is_full() {
        // 2x1 grid, snake fills it entirely
        let mut playground = playground_with(
            20,
            10,
            10,
            vec![Coordinate::new(0, 0), Coordinate::new(10, 0)],
            Orientation::Right,
        );
        assert_eq!(playground.free_cell_count(), 0);
        assert_eq!(playground.tick(), TickOutcome::Cleared);
        assert_eq!(playground.status(), Status::Cleared);
    }

    #[test]
    fn test_food_glyph() {
        let mut playground = playground_with(
            9,
            9,
            3,
            vec![Coordinate::new(0, 0)],
            Orientation::Right,
        );
        let before = playground.surface().filled_count();
        let food = playground.spawn_food().unwrap();

        // Plus shape: 4 of the 9 sub-cells
        assert_eq!(playground.surface().filled_count(), before + 4);
        assert!(playground.surface().is_filled(food.x + 1, food.y));
        assert!(!playground.surface().is_filled(food.x + 1, food.y + 1));
    }

    #[test]
    fn test_partition_holds_over_random_play() {
        let mut playground = Playground::new(
            &GameConfig {
                columns: 12,
                rows: 12,
                initial_snake_length: 3,
                grid_size: 3,
                ..GameConfig::default()
            },
            PixelCanvas::new(36, 36),
            StdRng::seed_from_u64(11),
        );
        let mut rng = StdRng::seed_from_u64(5);
        let turns = [
            Orientation::Up,
            Orientation::Down,
            Orientation::Left,
            Orientation::Right,
        ];

        for _ in 0..500 {
            let length = playground.snake().len();
            playground.set_orientation(turns[rng.gen_range(0..4)]);
            match playground.tick() {
                TickOutcome::Ate => assert_eq!(playground.snake().len(), length + 1),
                TickOutcome::Moved => assert_eq!(playground.snake().len(), length),
                _ => break,
            }
            assert_partition(&playground);
        }
    }
}
