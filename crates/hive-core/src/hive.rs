//! One-hive rule: connectivity of the occupied cells.
//!
//! All pieces on the board must form a single group under hex adjacency
//! after every turn. A piece may only leave its cell if the remaining cells
//! still form one group.

use crate::board::Board;
use crate::hex::HexCoord;
use std::collections::{HashMap, HashSet, VecDeque};

/// Whether the occupied cells form a single connected group.
///
/// An empty board counts as connected.
pub fn is_connected(board: &Board) -> bool {
    let Some(start) = board.occupied().next().copied() else {
        return true;
    };

    let mut visited = HashSet::with_capacity(board.len());
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for neighbor in board.occupied_neighbors(&current) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited.len() == board.len()
}

/// Whether the top piece at `coord` can leave without splitting the hive.
///
/// Lifting a piece off a stack never changes the occupied set, so only
/// single-piece cells need the flood fill.
pub fn can_remove_without_disconnecting(board: &Board, coord: &HexCoord) -> bool {
    match board.height_at(coord) {
        0 => false,
        1 => {
            let (lifted, _) = board.lifted(coord);
            is_connected(&lifted)
        }
        _ => true,
    }
}

/// Cells whose single piece holds the hive together.
///
/// These are the articulation points of the adjacency graph of occupied
/// cells, restricted to cells of height one. Computed with one depth-first
/// pass so enumerating movable pieces does not flood fill once per piece.
pub fn pinned_cells(board: &Board) -> HashSet<HexCoord> {
    let mut search = ArticulationSearch {
        board,
        discovery: HashMap::with_capacity(board.len()),
        low: HashMap::with_capacity(board.len()),
        timer: 0,
        articulation: HashSet::new(),
    };

    let mut cells: Vec<HexCoord> = board.occupied().copied().collect();
    cells.sort();
    for cell in cells {
        if !search.discovery.contains_key(&cell) {
            search.visit(cell, None);
        }
    }

    search
        .articulation
        .into_iter()
        .filter(|cell| board.height_at(cell) == 1)
        .collect()
}

struct ArticulationSearch<'a> {
    board: &'a Board,
    discovery: HashMap<HexCoord, u32>,
    low: HashMap<HexCoord, u32>,
    timer: u32,
    articulation: HashSet<HexCoord>,
}

impl ArticulationSearch<'_> {
    // Recursion depth is bounded by the number of pieces in play.
    fn visit(&mut self, cell: HexCoord, parent: Option<HexCoord>) {
        self.timer += 1;
        self.discovery.insert(cell, self.timer);
        self.low.insert(cell, self.timer);
        let mut children = 0;

        let neighbors: Vec<HexCoord> = self.board.occupied_neighbors(&cell).collect();
        for next in neighbors {
            if Some(next) == parent {
                continue;
            }
            match self.discovery.get(&next).copied() {
                Some(disc) => {
                    let low = self.low[&cell].min(disc);
                    self.low.insert(cell, low);
                }
                None => {
                    children += 1;
                    self.visit(next, Some(cell));
                    let low = self.low[&cell].min(self.low[&next]);
                    self.low.insert(cell, low);
                    if parent.is_some() && self.low[&next] >= self.discovery[&cell] {
                        self.articulation.insert(cell);
                    }
                }
            }
        }

        if parent.is_none() && children > 1 {
            self.articulation.insert(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, PieceId, PieceKind, Team};
    use crate::hex::Direction;

    fn board_with(cells: &[HexCoord]) -> Board {
        let mut board = Board::new();
        for (i, cell) in cells.iter().enumerate() {
            board.place(Piece::new(i as PieceId, Team::White, PieceKind::Ant), *cell);
        }
        board
    }

    fn line(len: i32) -> Vec<HexCoord> {
        (0..len).map(|q| HexCoord::axial(q, 0)).collect()
    }

    #[test]
    fn test_empty_and_single_are_connected() {
        assert!(is_connected(&Board::new()));
        assert!(is_connected(&board_with(&[HexCoord::ORIGIN])));
    }

    #[test]
    fn test_gap_is_disconnected() {
        let board = board_with(&[HexCoord::ORIGIN, HexCoord::axial(2, 0)]);
        assert!(!is_connected(&board));
    }

    #[test]
    fn test_line_middle_is_pinned() {
        let board = board_with(&line(3));

        assert!(can_remove_without_disconnecting(&board, &HexCoord::axial(0, 0)));
        assert!(!can_remove_without_disconnecting(&board, &HexCoord::axial(1, 0)));
        assert!(can_remove_without_disconnecting(&board, &HexCoord::axial(2, 0)));
    }

    #[test]
    fn test_stacked_cell_never_pinned() {
        let mut board = board_with(&line(3));
        board.place(
            Piece::new(10, Team::Black, PieceKind::Beetle),
            HexCoord::axial(1, 0),
        );

        assert!(can_remove_without_disconnecting(&board, &HexCoord::axial(1, 0)));
        assert!(!pinned_cells(&board).contains(&HexCoord::axial(1, 0)));
    }

    #[test]
    fn test_ring_has_no_pinned_cells() {
        let ring = HexCoord::ORIGIN.neighbors();
        let board = board_with(&ring);

        assert!(is_connected(&board));
        assert!(pinned_cells(&board).is_empty());
        for cell in ring {
            assert!(can_remove_without_disconnecting(&board, &cell));
        }
    }

    #[test]
    fn test_unoccupied_cell_cannot_be_removed() {
        let board = board_with(&line(2));
        assert!(!can_remove_without_disconnecting(&board, &HexCoord::axial(5, 0)));
    }

    #[test]
    fn test_pinned_cells_match_flood_fill() {
        // A ring with a tail and a branch
        let mut cells: Vec<HexCoord> = HexCoord::ORIGIN.neighbors().to_vec();
        let tail_start = HexCoord::axial(1, 0);
        let t1 = tail_start.add(Direction::East);
        let t2 = t1.add(Direction::East);
        let t3 = t2.add(Direction::SouthEast);
        cells.extend([t1, t2, t3]);
        let branch = HexCoord::axial(-1, 0).add(Direction::West);
        cells.push(branch);
        let board = board_with(&cells);

        let pinned = pinned_cells(&board);
        for cell in board.occupied() {
            assert_eq!(
                pinned.contains(cell),
                !can_remove_without_disconnecting(&board, cell),
                "disagreement at {}",
                cell
            );
        }
        assert!(pinned.contains(&t1));
        assert!(pinned.contains(&t2));
        assert!(!pinned.contains(&t3));
    }
}
