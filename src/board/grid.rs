//! Gem and board types.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default board edge length.
pub const BOARD_SIZE: usize = 8;

/// A cell position on the board.
///
/// Ordering is row-major, so sorted coordinates read top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row, 0 is the top row.
    pub row: usize,
    /// Column, 0 is the leftmost column.
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check whether `other` is one of the four orthogonal neighbors.
    #[must_use]
    pub const fn is_adjacent(self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Get orthogonal neighbors (up, down, left, right) inside a `size`×`size` board.
    ///
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn adjacent(self, size: usize) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.row > 0 {
            result[count as usize] = Coord::new(self.row - 1, self.col);
            count += 1;
        }
        if self.row + 1 < size {
            result[count as usize] = Coord::new(self.row + 1, self.col);
            count += 1;
        }
        if self.col > 0 {
            result[count as usize] = Coord::new(self.row, self.col - 1);
            count += 1;
        }
        if self.col + 1 < size {
            result[count as usize] = Coord::new(self.row, self.col + 1);
            count += 1;
        }

        (result, count)
    }
}

impl fmt::Display for Coord {
    /// One-based `(row,col)`, the way the battle log prints positions.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}

/// Tile types. Six mana colors plus the skull, which deals damage instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum GemType {
    /// Red mana.
    Red = 0,
    /// Blue mana.
    Blue = 1,
    /// Green mana.
    Green = 2,
    /// Yellow mana.
    Yellow = 3,
    /// Purple mana.
    Purple = 4,
    /// Brown mana.
    Brown = 5,
    /// Damage tile.
    Skull = 6,
}

impl GemType {
    /// Number of tile types.
    pub const COUNT: usize = 7;

    /// Every tile type, in index order.
    pub const ALL: [GemType; Self::COUNT] = [
        GemType::Red,
        GemType::Blue,
        GemType::Green,
        GemType::Yellow,
        GemType::Purple,
        GemType::Brown,
        GemType::Skull,
    ];

    /// Index into per-type tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this is the damage tile.
    #[must_use]
    pub const fn is_skull(self) -> bool {
        matches!(self, GemType::Skull)
    }

    /// Single-letter symbol used by text boards: `R B G Y P N S`.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            GemType::Red => 'R',
            GemType::Blue => 'B',
            GemType::Green => 'G',
            GemType::Yellow => 'Y',
            GemType::Purple => 'P',
            GemType::Brown => 'N',
            GemType::Skull => 'S',
        }
    }

    /// Parse a symbol produced by [`GemType::symbol`] (case-insensitive).
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'R' => Some(GemType::Red),
            'B' => Some(GemType::Blue),
            'G' => Some(GemType::Green),
            'Y' => Some(GemType::Yellow),
            'P' => Some(GemType::Purple),
            'N' => Some(GemType::Brown),
            'S' => Some(GemType::Skull),
            _ => None,
        }
    }

    /// Uniformly random tile type over the full set.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }
}

impl fmt::Display for GemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GemType::Red => "red",
            GemType::Blue => "blue",
            GemType::Green => "green",
            GemType::Yellow => "yellow",
            GemType::Purple => "purple",
            GemType::Brown => "brown",
            GemType::Skull => "skull",
        };
        f.write_str(name)
    }
}

/// Stable gem identity, kept across swaps and falls for animation continuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GemId(pub u32);

/// A single gem on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gem {
    /// Tile type, immutable once placed.
    pub kind: GemType,
    /// Identity.
    pub id: GemId,
}

/// Square grid of gems.
///
/// Cells are only empty between removal and refill inside a cascade pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Edge length.
    size: usize,
    /// Cells stored in row-major order.
    cells: Vec<Option<Gem>>,
    /// Next identity to hand out.
    next_id: u32,
}

impl Board {
    /// Create an all-empty board. Only generation and tests start from here.
    #[must_use]
    pub(crate) fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            next_id: 0,
        }
    }

    /// Build a board from rows of gem symbols (see [`GemType::symbol`]).
    ///
    /// Identities are assigned sequentially in row-major order.
    /// Returns `None` if the rows are not square or contain an unknown symbol.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        if size == 0 {
            return None;
        }

        let mut board = Self::empty(size);
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != size {
                return None;
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let kind = GemType::from_symbol(symbol)?;
                board.place(Coord::new(row, col), kind);
            }
        }
        Some(board)
    }

    /// Get the edge length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Check if a coordinate is within the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Convert a coordinate to an index into the cell array.
    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.row * self.size + coord.col)
        } else {
            None
        }
    }

    /// Get the gem at a coordinate (`None` if out of bounds or empty).
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Gem> {
        self.index(coord).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Get the tile type at a coordinate.
    #[must_use]
    #[inline]
    pub fn kind_at(&self, coord: Coord) -> Option<GemType> {
        self.get(coord).map(|gem| gem.kind)
    }

    /// Place a fresh gem of `kind` at `coord`, replacing whatever was there.
    ///
    /// Returns the new gem's identity, or `None` if out of bounds.
    pub fn place(&mut self, coord: Coord, kind: GemType) -> Option<GemId> {
        let idx = self.index(coord)?;
        let id = self.allocate_id();
        self.cells[idx] = Some(Gem { kind, id });
        Some(id)
    }

    /// Remove and return the gem at `coord`, leaving the cell empty.
    pub(crate) fn take(&mut self, coord: Coord) -> Option<Gem> {
        let idx = self.index(coord)?;
        self.cells[idx].take()
    }

    /// Put an existing gem (keeping its identity) into a cell.
    pub(crate) fn put(&mut self, coord: Coord, gem: Option<Gem>) {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = gem;
        }
    }

    /// Swap the contents of two cells.
    ///
    /// Returns `false` (and changes nothing) if either is out of bounds.
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Check that every cell holds a gem.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Hand out the next identity.
    pub(crate) fn allocate_id(&mut self) -> GemId {
        let id = GemId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Reassign identities 0, 1, 2, … in row-major order.
    pub(crate) fn renumber(&mut self) {
        self.next_id = 0;
        for idx in 0..self.cells.len() {
            if self.cells[idx].is_some() {
                let id = GemId(self.next_id);
                self.next_id += 1;
                if let Some(gem) = self.cells[idx].as_mut() {
                    gem.id = id;
                }
            }
        }
    }

    /// Iterate over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size;
        (0..size * size).map(move |idx| Coord::new(idx / size, idx % size))
    }

    /// Iterate over all occupied cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Gem)> {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref()
                .map(|gem| (Coord::new(idx / size, idx % size), gem))
        })
    }

    /// Render as rows of symbols, `.` for empty cells.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| {
                        self.kind_at(Coord::new(row, col))
                            .map_or('.', GemType::symbol)
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_rows() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_adjacent() {
        let coord = Coord::new(5, 5);
        let (adj, count) = coord.adjacent(8);
        let adj_slice = &adj[..count as usize];
        assert_eq!(count, 4);
        assert!(adj_slice.contains(&Coord::new(4, 5))); // up
        assert!(adj_slice.contains(&Coord::new(6, 5))); // down
        assert!(adj_slice.contains(&Coord::new(5, 4))); // left
        assert!(adj_slice.contains(&Coord::new(5, 6))); // right
    }

    #[test]
    fn test_coord_adjacent_corner() {
        let (adj, count) = Coord::new(7, 7).adjacent(8);
        let adj_slice = &adj[..count as usize];
        assert_eq!(count, 2);
        assert!(adj_slice.contains(&Coord::new(6, 7)));
        assert!(adj_slice.contains(&Coord::new(7, 6)));
    }

    #[test]
    fn test_is_adjacent() {
        let c = Coord::new(3, 3);
        assert!(c.is_adjacent(Coord::new(3, 4)));
        assert!(c.is_adjacent(Coord::new(2, 3)));
        assert!(!c.is_adjacent(Coord::new(4, 4)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(3, 5)));
    }

    #[test]
    fn test_symbol_roundtrip() {
        for kind in GemType::ALL {
            assert_eq!(GemType::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(GemType::from_symbol('s'), Some(GemType::Skull));
        assert_eq!(GemType::from_symbol('x'), None);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["RGB", "YPN", "SSR"]).unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.kind_at(Coord::new(2, 0)), Some(GemType::Skull));
        assert_eq!(board.get(Coord::new(0, 0)).unwrap().id, GemId(0));
        assert_eq!(board.get(Coord::new(2, 2)).unwrap().id, GemId(8));
        assert!(board.is_full());
        assert_eq!(board.to_rows(), vec!["RGB", "YPN", "SSR"]);
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Board::from_rows(&[]).is_none());
        assert!(Board::from_rows(&["RG", "R"]).is_none());
        assert!(Board::from_rows(&["RX", "RG"]).is_none());
    }

    #[test]
    fn test_swap_keeps_identity() {
        let mut board = Board::from_rows(&["RG", "BY"]).unwrap();
        let red = *board.get(Coord::new(0, 0)).unwrap();
        assert!(board.swap(Coord::new(0, 0), Coord::new(0, 1)));
        assert_eq!(board.get(Coord::new(0, 1)), Some(&red));
        assert!(!board.swap(Coord::new(0, 0), Coord::new(0, 2)));
    }

    #[test]
    fn test_take_and_renumber() {
        let mut board = Board::from_rows(&["RG", "BY"]).unwrap();
        assert!(board.take(Coord::new(0, 0)).is_some());
        assert!(!board.is_full());
        assert_eq!(board.to_rows(), vec![".G", "BY"]);

        board.place(Coord::new(0, 0), GemType::Skull);
        assert_eq!(board.get(Coord::new(0, 0)).unwrap().id, GemId(4));
        board.renumber();
        let ids: Vec<u32> = board.iter().map(|(_, gem)| gem.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
