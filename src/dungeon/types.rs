//! Dungeon data structures.
//!
//! Rooms live in a flat row-major arena and refer to their neighbours by grid
//! coordinate only, so a whole dungeon serializes as plain nested data.

use crate::combat::types::Enemy;
use crate::core::constants::{
    DEFAULT_REQUIRED_EXPLORATION, DEFAULT_VIEW_RANGE, DUNGEON_SIZE_PER_TIER, MAX_DUNGEON_SIZE,
    MAX_TIER, MIN_DUNGEON_SIZE, MIN_TIER,
};
use crate::items::Item;
use crate::merchant::Merchant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index into a room's `doors` array
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// (row, col) offset of one step in this direction
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Direction of a single step from `from` to `to`, if they are adjacent.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|dir| {
            let (dr, dc) = dir.offset();
            from.row.checked_add_signed(dr) == Some(to.row)
                && from.col.checked_add_signed(dc) == Some(to.col)
        })
    }
}

/// Pre-rolled contents of a treasure room
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreasureLoot {
    pub copper: u64,
    pub items: Vec<Item>,
}

/// A single room in the dungeon grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Room {
    /// Independent enemy instances; slain ones stay until a victory pays for them
    pub enemies: Vec<Enemy>,
    /// Loose item awaiting pickup
    pub item_drop: Option<Item>,
    pub is_cleared: bool,
    /// Revealed by proximity; never reverts
    pub is_visible: bool,
    pub is_visited: bool,
    pub has_merchant: bool,
    pub merchant_visited: bool,
    pub has_treasure: bool,
    pub treasure_looted: bool,
    pub treasure: Option<TreasureLoot>,
    pub is_end_room: bool,
    /// Player stepped in while the room had no living enemies
    pub entered_after_clear: bool,
    /// Open doors indexed by [`Direction::index`]
    pub doors: [bool; 4],
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_door(&self, direction: Direction) -> bool {
        self.doors[direction.index()]
    }

    pub fn door_count(&self) -> usize {
        self.doors.iter().filter(|&&open| open).count()
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn has_living_enemies(&self) -> bool {
        self.enemies.iter().any(|e| e.is_alive())
    }

    /// Treasure still waiting to be looted
    pub fn has_unlooted_treasure(&self) -> bool {
        self.has_treasure && !self.treasure_looted
    }
}

/// Outcome of a player move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveResult {
    /// Player entered a room without living enemies
    Moved { to: Position, revealed: usize },
    /// Player entered a room with living enemies; resolve an encounter next
    CombatRequired {
        to: Position,
        revealed: usize,
        enemies: usize,
    },
}

impl MoveResult {
    pub fn position(&self) -> Position {
        match self {
            MoveResult::Moved { to, .. } | MoveResult::CombatRequired { to, .. } => *to,
        }
    }

    pub fn needs_combat(&self) -> bool {
        matches!(self, MoveResult::CombatRequired { .. })
    }
}

/// Main dungeon state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub tier: u8,
    pub rows: usize,
    pub cols: usize,
    /// Seed that reproduces this exact layout
    pub seed: u64,
    /// Row-major room arena, `rows * cols` long
    pub rooms: Vec<Room>,
    pub player_pos: Position,
    pub start_pos: Position,
    pub end_pos: Position,
    pub merchant_pos: Option<Position>,
    pub merchant: Merchant,
    /// Radius revealed around the player after each move
    pub view_range: u32,
    /// Visible-room fraction needed for completion
    pub required_exploration: f64,
    /// Completion reward already granted
    pub completed: bool,
}

/// Side length of a generated dungeon for `tier`.
pub fn grid_side_for_tier(tier: u8) -> usize {
    let tier = tier.clamp(MIN_TIER, MAX_TIER);
    (MIN_DUNGEON_SIZE + (tier - MIN_TIER) as usize * DUNGEON_SIZE_PER_TIER).min(MAX_DUNGEON_SIZE)
}

impl Dungeon {
    /// Empty `rows x cols` dungeon with no doors. The start room at (0, 0) is
    /// visible, visited and cleared.
    pub fn new(tier: u8, rows: usize, cols: usize, seed: u64) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let start = Position::new(0, 0);
        let mut dungeon = Self {
            tier,
            rows,
            cols,
            seed,
            rooms: vec![Room::new(); rows * cols],
            player_pos: start,
            start_pos: start,
            end_pos: start,
            merchant_pos: None,
            merchant: Merchant::default(),
            view_range: DEFAULT_VIEW_RANGE,
            required_exploration: DEFAULT_REQUIRED_EXPLORATION,
            completed: false,
        };
        if let Some(room) = dungeon.room_mut(start) {
            room.is_visible = true;
            room.is_visited = true;
            room.is_cleared = true;
            room.entered_after_clear = true;
        }
        dungeon
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    pub fn room(&self, pos: Position) -> Option<&Room> {
        self.index_of(pos).and_then(|i| self.rooms.get(i))
    }

    pub fn room_mut(&mut self, pos: Position) -> Option<&mut Room> {
        self.index_of(pos).and_then(move |i| self.rooms.get_mut(i))
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room(self.player_pos)
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        let pos = self.player_pos;
        self.room_mut(pos)
    }

    /// All grid positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Grid cell one step away, if it is inside the grid.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.offset();
        let next = Position::new(
            pos.row.checked_add_signed(dr)?,
            pos.col.checked_add_signed(dc)?,
        );
        self.contains(next).then_some(next)
    }

    /// Opens a door between `pos` and its neighbour on both sides.
    /// Returns false if the neighbour is off the grid.
    pub fn connect(&mut self, pos: Position, direction: Direction) -> bool {
        let Some(next) = self.neighbor(pos, direction) else {
            return false;
        };
        if let Some(room) = self.room_mut(pos) {
            room.doors[direction.index()] = true;
        }
        if let Some(room) = self.room_mut(next) {
            room.doors[direction.opposite().index()] = true;
        }
        true
    }

    pub fn is_connected(&self, pos: Position, direction: Direction) -> bool {
        self.room(pos).is_some_and(|room| room.has_door(direction))
    }

    pub fn visible_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.is_visible).count()
    }
}
