use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::action::Direction;
use super::grid::Grid;
use crate::error::{Result, SnakeError};

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move cell by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    pub fn manhattan(&self, other: Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Direction of a single step from self to `other`, if they are adjacent
    pub fn direction_to(&self, other: Cell) -> Option<Direction> {
        Direction::from_delta(other.row - self.row, other.col - self.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One body segment and the direction it will move next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub cell: Cell,
    pub direction: Direction,
}

/// The snake in the game
///
/// Each segment carries its own direction. A direction change is recorded in
/// the turn map at the head's cell and every following segment picks it up
/// when it reaches that cell, so a turn travels down the body one cell per
/// tick. The entry is dropped once the tail has passed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    segments: Vec<Segment>,
    /// Heading of the head
    direction: Direction,
    turns: BTreeMap<Cell, Direction>,
}

impl Snake {
    /// Create a straight snake with given head position and direction
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (d_row, d_col) = direction.delta();
        let segments = (0..length.max(1) as i32)
            .map(|i| Segment {
                cell: head.moved_by(-d_row * i, -d_col * i),
                direction,
            })
            .collect();

        Self {
            segments,
            direction,
            turns: BTreeMap::new(),
        }
    }

    /// Build a snake from its body cells, head first.
    ///
    /// Segment directions are derived from the body's shape and a turn is
    /// scheduled at every body cell, so the body follows the head exactly.
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Result<Self> {
        let Some(&head) = cells.first() else {
            return Err(SnakeError::MalformedState("snake has no segments".into()));
        };

        let mut segments = vec![Segment {
            cell: head,
            direction,
        }];
        for pair in cells.windows(2) {
            let segment_direction = pair[1].direction_to(pair[0]).ok_or_else(|| {
                SnakeError::MalformedState(format!(
                    "body cells {} and {} are not adjacent",
                    pair[0], pair[1]
                ))
            })?;
            segments.push(Segment {
                cell: pair[1],
                direction: segment_direction,
            });
        }

        let turns = segments[..segments.len() - 1]
            .iter()
            .map(|segment| (segment.cell, segment.direction))
            .collect();

        Ok(Self {
            segments,
            direction,
            turns,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.segments[0].cell
    }

    /// Heading of the head; changed only through [`Snake::set_direction`]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1].cell
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Body cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().map(|segment| segment.cell)
    }

    pub fn turns(&self) -> &BTreeMap<Cell, Direction> {
        &self.turns
    }

    /// Check if any segment, head included, sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.iter().any(|segment| segment.cell == cell)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.segments[1..].iter().any(|segment| segment.cell == cell)
    }

    /// Point the head in `direction` and schedule the turn at the head cell.
    ///
    /// A reversal onto the neck is ignored; returns whether the heading was
    /// accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        self.turns.insert(self.head(), direction);
        true
    }

    /// Turn the head toward an adjacent cell
    pub fn go_to(&mut self, cell: Cell) -> bool {
        match self.head().direction_to(cell) {
            Some(direction) => self.set_direction(direction),
            None => false,
        }
    }

    /// Move every segment one cell, applying scheduled turns.
    ///
    /// Returns the cell the tail vacated together with the direction the tail
    /// left it in, which is where a new segment goes on growth.
    pub fn advance(&mut self) -> Segment {
        let last = self.segments.len() - 1;
        let mut vacated = self.segments[last];

        for (index, segment) in self.segments.iter_mut().enumerate() {
            let here = segment.cell;
            if index == 0 {
                segment.direction = self.direction;
            }
            if let Some(&turn) = self.turns.get(&here) {
                segment.direction = turn;
                if index == last {
                    self.turns.remove(&here);
                }
            }
            segment.cell = here.moved_in_direction(segment.direction);
            if index == last {
                vacated = Segment {
                    cell: here,
                    direction: segment.direction,
                };
            }
        }

        vacated
    }

    /// Append a segment behind the tail
    pub fn grow(&mut self, vacated: Segment) {
        self.segments.push(vacated);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Head left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state. Read-only snapshot as far as the pilots are concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub food: Cell,
    pub score: u32,
    pub steps: u32,
    pub moves_without_eating: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Cell, grid: Grid) -> Self {
        Self {
            grid,
            snake,
            food,
            score: 0,
            steps: 0,
            moves_without_eating: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        self.grid.in_bounds(cell)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, cell: Cell) -> bool {
        self.snake.occupies(cell)
    }

    /// In bounds and not under any segment
    pub fn is_free(&self, cell: Cell) -> bool {
        self.is_in_bounds(cell) && !self.is_occupied_by_snake(cell)
    }

    /// Highest score reachable on this board: every cell filled
    pub fn max_score(&self) -> u32 {
        let initial_length = self.snake.len().saturating_sub(self.score as usize);
        self.grid.cell_count().saturating_sub(initial_length) as u32
    }

    /// Reject states no game could have produced
    pub fn validate(&self) -> Result<()> {
        if self.snake.is_empty() {
            return Err(SnakeError::MalformedState("snake has no segments".into()));
        }

        let mut seen = HashSet::with_capacity(self.snake.len());
        for cell in self.snake.cells() {
            if !self.grid.in_bounds(cell) {
                return Err(SnakeError::MalformedState(format!(
                    "snake segment {cell} is outside the {}x{} grid",
                    self.grid.rows, self.grid.cols
                )));
            }
            if !seen.insert(cell) {
                return Err(SnakeError::MalformedState(format!(
                    "snake overlaps itself at {cell}"
                )));
            }
        }

        for pair in self.snake.segments().windows(2) {
            if pair[0].cell.manhattan(pair[1].cell) != 1 {
                return Err(SnakeError::MalformedState(format!(
                    "body cells {} and {} are not adjacent",
                    pair[0].cell, pair[1].cell
                )));
            }
        }

        if !self.grid.in_bounds(self.food) {
            return Err(SnakeError::MalformedState(format!(
                "food {} is outside the {}x{} grid",
                self.food, self.grid.rows, self.grid.cols
            )));
        }
        if seen.contains(&self.food) {
            return Err(SnakeError::MalformedState(format!(
                "food {} is on the snake",
                self.food
            )));
        }

        Ok(())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score {} | length {}", self.score, self.snake.len())?;
        for row in 0..self.grid.rows as i32 {
            for col in 0..self.grid.cols as i32 {
                let cell = Cell::new(row, col);
                let glyph = if cell == self.snake.head() {
                    'H'
                } else if self.snake.occupies(cell) {
                    'o'
                } else if cell == self.food {
                    '*'
                } else {
                    '.'
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
