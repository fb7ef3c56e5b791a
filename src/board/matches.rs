//! Run detection and connected-group sizing.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::grid::{Board, Coord, GemType};

/// Shortest row or column run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Set of matched cells from one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeSet<Coord>,
}

impl MatchSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of matched cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether `coord` is part of the match.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Add a cell.
    pub fn insert(&mut self, coord: Coord) {
        self.cells.insert(coord);
    }

    /// Matched cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// Matched cells as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Coord> {
        self.iter().collect()
    }

    /// Whether any matched cell holds a skull on `board`.
    #[must_use]
    pub fn has_skull(&self, board: &Board) -> bool {
        self.iter()
            .any(|coord| board.kind_at(coord).is_some_and(GemType::is_skull))
    }
}

impl FromIterator<Coord> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Find every cell belonging to a row or column run of [`MIN_RUN`] or more.
///
/// Rows and columns are scanned independently and unioned. Empty cells break
/// runs.
#[must_use]
pub fn find_matches(board: &Board) -> MatchSet {
    let size = board.size();
    let mut set = MatchSet::new();

    for row in 0..size {
        scan_line(board, &mut set, (0..size).map(|col| Coord::new(row, col)));
    }
    for col in 0..size {
        scan_line(board, &mut set, (0..size).map(|row| Coord::new(row, col)));
    }

    set
}

/// Add every run of [`MIN_RUN`]+ along one line of coordinates.
fn scan_line(board: &Board, set: &mut MatchSet, line: impl Iterator<Item = Coord>) {
    let mut run: Vec<Coord> = Vec::new();
    let mut run_kind: Option<GemType> = None;

    for coord in line {
        let kind = board.kind_at(coord);
        if kind.is_some() && kind == run_kind {
            run.push(coord);
            continue;
        }
        if run.len() >= MIN_RUN {
            run.iter().for_each(|&c| set.insert(c));
        }
        run.clear();
        run.push(coord);
        run_kind = kind;
    }

    if run.len() >= MIN_RUN && run_kind.is_some() {
        run.iter().for_each(|&c| set.insert(c));
    }
}

/// Size of the largest 4-connected same-type group inside `matched`.
///
/// The flood fill never leaves the matched set, even when an unmatched
/// neighbor has the same type.
#[must_use]
pub fn largest_group(board: &Board, matched: &MatchSet) -> usize {
    let mut visited: BTreeSet<Coord> = BTreeSet::new();
    let mut largest = 0;

    for start in matched.iter() {
        if visited.contains(&start) {
            continue;
        }
        let Some(kind) = board.kind_at(start) else {
            continue;
        };

        let mut size = 0;
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(coord) = queue.pop_front() {
            size += 1;
            let (adj, count) = coord.adjacent(board.size());
            for &next in &adj[..count as usize] {
                if matched.contains(next)
                    && !visited.contains(&next)
                    && board.kind_at(next) == Some(kind)
                {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        largest = largest.max(size);
    }

    largest
}

/// Per-type tally of matched gems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemCounts([u32; GemType::COUNT]);

impl GemCounts {
    /// Tally the types of the matched cells on `board`.
    #[must_use]
    pub fn tally(board: &Board, matched: &MatchSet) -> Self {
        let mut counts = Self::default();
        for coord in matched.iter() {
            if let Some(kind) = board.kind_at(coord) {
                counts.0[kind.index()] += 1;
            }
        }
        counts
    }

    /// Count for one type.
    #[must_use]
    pub const fn get(&self, kind: GemType) -> u32 {
        self.0[kind.index()]
    }

    /// Number of matched skulls.
    #[must_use]
    pub const fn skulls(&self) -> u32 {
        self.get(GemType::Skull)
    }

    /// Total matched gems.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Non-zero mana counts (skulls excluded), in type order.
    pub fn mana(&self) -> impl Iterator<Item = (GemType, u32)> + '_ {
        GemType::ALL
            .into_iter()
            .filter(|kind| !kind.is_skull())
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(_, count)| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run-free pattern with no legal move.
    fn base_rows() -> Vec<String> {
        const CYCLE: [char; 6] = ['R', 'B', 'G', 'Y', 'P', 'N'];
        (0..8)
            .map(|r| (0..8).map(|c| CYCLE[(r + 2 * c) % 6]).collect())
            .collect()
    }

    fn board_with(overrides: &[(usize, usize, char)]) -> Board {
        let mut rows: Vec<Vec<char>> = base_rows().iter().map(|r| r.chars().collect()).collect();
        for &(r, c, ch) in overrides {
            rows[r][c] = ch;
        }
        let rows: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        Board::from_rows(&refs).unwrap()
    }

    #[test]
    fn test_base_board_has_no_matches() {
        assert!(find_matches(&board_with(&[])).is_empty());
    }

    #[test]
    fn test_row_run_of_three() {
        let board = board_with(&[(0, 0, 'S'), (0, 1, 'S'), (0, 2, 'S')]);
        let matched = find_matches(&board);
        assert_eq!(
            matched.to_vec(),
            vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]
        );
        assert_eq!(largest_group(&board, &matched), 3);
        assert!(matched.has_skull(&board));
    }

    #[test]
    fn test_column_run_of_four() {
        let board = board_with(&[(2, 5, 'Y'), (3, 5, 'Y'), (4, 5, 'Y'), (5, 5, 'Y')]);
        let matched = find_matches(&board);
        assert_eq!(matched.len(), 4);
        assert_eq!(largest_group(&board, &matched), 4);
        assert!(!matched.has_skull(&board));
    }

    #[test]
    fn test_plus_shape_counts_as_one_group() {
        let board = board_with(&[
            (3, 3, 'S'),
            (2, 3, 'S'),
            (4, 3, 'S'),
            (3, 2, 'S'),
            (3, 4, 'S'),
        ]);
        let matched = find_matches(&board);
        assert_eq!(matched.len(), 5);
        assert_eq!(largest_group(&board, &matched), 5);
    }

    #[test]
    fn test_group_sizer_ignores_unmatched_same_type() {
        // (1,0) is red and touches the red run at (0,0..3) but is not matched.
        let board = Board::from_rows(&["RRRB", "RBYG", "GYBY", "BGYG"]).unwrap();
        let matched = find_matches(&board);
        assert_eq!(matched.len(), 3);
        assert!(!matched.contains(Coord::new(1, 0)));
        assert_eq!(largest_group(&board, &matched), 3);
    }

    #[test]
    fn test_long_run_contributes_all_cells() {
        let board = Board::from_rows(&["GGGGG", "RBRBR", "BRBRB", "RBRBR", "BRBRB"]).unwrap();
        let matched = find_matches(&board);
        assert_eq!(matched.len(), 5);
        assert_eq!(largest_group(&board, &matched), 5);
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let mut board = Board::from_rows(&["RRRR", "BGBG", "GBGB", "BGBG"]).unwrap();
        board.take(Coord::new(0, 1));
        assert!(find_matches(&board).is_empty());
    }

    #[test]
    fn test_counts() {
        let board = board_with(&[(0, 0, 'S'), (0, 1, 'S'), (0, 2, 'S')]);
        let matched = find_matches(&board);
        let counts = GemCounts::tally(&board, &matched);
        assert_eq!(counts.skulls(), 3);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.mana().count(), 0);

        let board = board_with(&[(2, 5, 'Y'), (3, 5, 'Y'), (4, 5, 'Y'), (5, 5, 'Y')]);
        let counts = GemCounts::tally(&board, &find_matches(&board));
        assert_eq!(counts.mana().collect::<Vec<_>>(), vec![(GemType::Yellow, 4)]);
    }
}
