//! Movement rules for pieces already on the board.
//!
//! Each piece kind has its own destination generator, selected by `match`.
//! All generators run on a snapshot of the board with the moving piece lifted
//! off its cell, so the piece never blocks its own path.

use crate::board::{Board, PieceKind};
use crate::hex::{Direction, HexCoord};
use crate::hive::can_remove_without_disconnecting;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::trace;

/// Number of slides in a Spider move
const SPIDER_STEPS: usize = 3;

/// Freedom of movement for a ground-level slide between adjacent cells.
///
/// The two cells flanking the gap must not both be occupied (the piece would
/// not fit through) and must not both be empty (the piece would lose contact
/// with the hive mid-slide).
pub fn can_slide(board: &Board, from: &HexCoord, to: &HexCoord) -> bool {
    let Some([left, right]) = from.common_neighbors(to) else {
        return false;
    };
    board.is_occupied(&left) != board.is_occupied(&right)
}

/// Freedom of movement for a step that may start or end on top of the hive.
///
/// Heights are stack sizes on `board`, which must already have the moving
/// piece lifted. A step is blocked when both flanking stacks are taller than
/// both the stack being left and the stack being entered.
pub fn can_step_at_height(board: &Board, from: &HexCoord, to: &HexCoord) -> bool {
    let Some([left, right]) = from.common_neighbors(to) else {
        return false;
    };
    let from_height = board.height_at(from);
    let to_height = board.height_at(to);
    if from_height == 0 && to_height == 0 {
        return can_slide(board, from, to);
    }
    let gate = board.height_at(&left).min(board.height_at(&right));
    gate <= from_height.max(to_height)
}

/// Unoccupied neighbors reachable by a single ground slide
fn ground_slides<'a>(board: &'a Board, from: &'a HexCoord) -> impl Iterator<Item = HexCoord> + 'a {
    from.neighbors()
        .into_iter()
        .filter(move |to| !board.is_occupied(to) && can_slide(board, from, to))
}

/// Legal destinations for the top piece at `origin`.
///
/// Empty when the cell is unoccupied or when lifting the piece would split
/// the hive. Ownership and turn order are checked by the game state.
pub fn destinations(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    if !can_remove_without_disconnecting(board, origin) {
        return BTreeSet::new();
    }
    destinations_unchecked(board, origin)
}

/// Destinations without the one-hive precondition; callers must have checked
/// it already (for example through [`crate::hive::pinned_cells`]).
pub(crate) fn destinations_unchecked(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    let (lifted, Some(piece)) = board.lifted(origin) else {
        return BTreeSet::new();
    };

    let targets = match piece.kind {
        PieceKind::QueenBee => queen_moves(&lifted, origin),
        PieceKind::Beetle => beetle_moves(&lifted, origin),
        PieceKind::Spider => spider_moves(&lifted, origin),
        PieceKind::Grasshopper => grasshopper_moves(&lifted, origin),
        PieceKind::Ant => ant_moves(&lifted, origin),
        PieceKind::Ladybug | PieceKind::Mosquito => BTreeSet::new(),
    };

    trace!(
        %piece,
        %origin,
        count = targets.len(),
        "generated destinations"
    );
    targets
}

/// Queen Bee: one slide to an empty neighbor
fn queen_moves(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    ground_slides(board, origin).collect()
}

/// Beetle: one step in any direction, climbing on or off the hive
fn beetle_moves(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    origin
        .neighbors()
        .into_iter()
        .filter(|to| can_step_at_height(board, origin, to))
        .collect()
}

/// Spider: exactly three slides without revisiting a cell
fn spider_moves(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    let mut results = BTreeSet::new();
    let mut path = vec![*origin];
    spider_walk(board, &mut path, &mut results);
    results
}

fn spider_walk(board: &Board, path: &mut Vec<HexCoord>, results: &mut BTreeSet<HexCoord>) {
    let Some(current) = path.last().copied() else {
        return;
    };
    if path.len() == SPIDER_STEPS + 1 {
        results.insert(current);
        return;
    }

    for next in ground_slides(board, &current) {
        if path.contains(&next) {
            continue;
        }
        path.push(next);
        spider_walk(board, path, results);
        path.pop();
    }
}

/// Grasshopper: jump in a straight line over at least one piece
fn grasshopper_moves(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    Direction::ALL
        .into_iter()
        .filter_map(|dir| {
            let mut landing = origin.add(dir);
            if !board.is_occupied(&landing) {
                return None;
            }
            while board.is_occupied(&landing) {
                landing = landing.add(dir);
            }
            Some(landing)
        })
        .collect()
}

/// Ant: any cell reachable by repeated slides around the hive
fn ant_moves(board: &Board, origin: &HexCoord) -> BTreeSet<HexCoord> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(*origin);
    queue.push_back(*origin);

    while let Some(current) = queue.pop_front() {
        for next in ground_slides(board, &current) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.remove(origin);
    visited.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, PieceId, Team};
    use pretty_assertions::assert_eq;

    /// Builds boards one piece at a time, handing out ids in order
    struct Layout {
        board: Board,
        next_id: PieceId,
    }

    impl Layout {
        fn new() -> Self {
            Self {
                board: Board::new(),
                next_id: 0,
            }
        }

        fn put(mut self, kind: PieceKind, q: i32, r: i32) -> Self {
            let piece = Piece::new(self.next_id, Team::White, kind);
            self.next_id += 1;
            self.board.place(piece, HexCoord::axial(q, r));
            self
        }

        fn ants(mut self, cells: &[(i32, i32)]) -> Self {
            for (q, r) in cells {
                self = self.put(PieceKind::Ant, *q, *r);
            }
            self
        }
    }

    /// Joins (1,-1), (0,1) and (-1,0) around the outside of the origin
    const OUTER_LINK: [(i32, i32); 6] = [(2, -1), (2, 0), (1, 1), (-1, 2), (-2, 2), (-2, 1)];

    fn cells(coords: &[(i32, i32)]) -> BTreeSet<HexCoord> {
        coords.iter().map(|(q, r)| HexCoord::axial(*q, *r)).collect()
    }

    #[test]
    fn test_can_slide_along_single_piece() {
        let board = Layout::new().ants(&[(0, 0)]).board;
        // (1,-1) -> (1,0): the flanking cells are (0,0) and (2,-1)
        assert!(can_slide(&board, &HexCoord::axial(1, -1), &HexCoord::axial(1, 0)));
    }

    #[test]
    fn test_cannot_slide_through_gate() {
        let board = Layout::new().ants(&[(1, -1), (0, 1)]).board;
        assert!(!can_slide(&board, &HexCoord::ORIGIN, &HexCoord::axial(1, 0)));
    }

    #[test]
    fn test_cannot_slide_away_from_contact() {
        let board = Layout::new().ants(&[(-1, 0)]).board;
        // Neither (1,-1) nor (0,1) is occupied: the slide would leave the hive
        assert!(!can_slide(&board, &HexCoord::ORIGIN, &HexCoord::axial(1, 0)));
    }

    #[test]
    fn test_queen_moves_one_step_around_neighbor() {
        let board = Layout::new()
            .ants(&[(0, 0)])
            .put(PieceKind::QueenBee, 1, 0)
            .board;
        let moves = destinations(&board, &HexCoord::axial(1, 0));
        assert_eq!(moves, cells(&[(1, -1), (0, 1)]));
    }

    #[test]
    fn test_queen_blocked_by_gates() {
        // Every empty neighbor of the origin is flanked by two pieces
        let board = Layout::new()
            .put(PieceKind::QueenBee, 0, 0)
            .ants(&[(1, -1), (0, 1), (-1, 0)])
            .ants(&OUTER_LINK)
            .board;
        let moves = destinations(&board, &HexCoord::ORIGIN);
        assert!(moves.is_empty());
    }

    #[test]
    fn test_pinned_piece_has_no_moves() {
        let board = Layout::new()
            .ants(&[(-1, 0)])
            .put(PieceKind::QueenBee, 0, 0)
            .ants(&[(1, 0)])
            .board;
        assert!(destinations(&board, &HexCoord::ORIGIN).is_empty());
    }

    #[test]
    fn test_grasshopper_jumps_lines() {
        let board = Layout::new()
            .put(PieceKind::Grasshopper, 0, 0)
            .ants(&[(1, 0), (2, 0), (0, 1)])
            .board;
        let moves = destinations(&board, &HexCoord::ORIGIN);
        assert_eq!(moves, cells(&[(3, 0), (0, 2)]));
        for target in &moves {
            assert!(!board.is_occupied(target));
        }
    }

    #[test]
    fn test_grasshopper_only_jumps_over_occupied_neighbors() {
        let board = Layout::new()
            .put(PieceKind::Grasshopper, 0, 0)
            .ants(&[(1, 0)])
            .board;
        let moves = destinations(&board, &HexCoord::ORIGIN);
        assert_eq!(moves, cells(&[(2, 0)]));
    }

    #[test]
    fn test_ant_circles_the_hive() {
        let board = Layout::new()
            .ants(&[(0, 0), (1, 0)])
            .put(PieceKind::Ant, -1, 0)
            .board;
        let moves = destinations(&board, &HexCoord::axial(-1, 0));

        // Every empty cell around the remaining two-piece hive
        let expected = cells(&[(0, -1), (1, -1), (2, -1), (2, 0), (1, 1), (0, 1), (-1, 1)]);
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_ant_cannot_enter_enclosed_cell() {
        // A ring around (0,0) with one gap on the west; the gap is a gate
        let board = Layout::new()
            .ants(&[(1, -1), (1, 0), (0, 1), (-1, 1), (0, -1)])
            .ants(&[(-2, 1)])
            .put(PieceKind::Ant, -2, 0)
            .board;
        let moves = destinations(&board, &HexCoord::axial(-2, 0));
        assert!(!moves.contains(&HexCoord::ORIGIN));
        assert!(!moves.contains(&HexCoord::axial(-2, 0)));
        assert!(!moves.is_empty());
    }

    #[test]
    fn test_spider_moves_exactly_three() {
        let board = Layout::new()
            .ants(&[(0, 0), (1, 0)])
            .put(PieceKind::Spider, -1, 0)
            .board;
        let moves = destinations(&board, &HexCoord::axial(-1, 0));

        // Three slides clockwise and counter-clockwise around the pair
        assert_eq!(moves, cells(&[(2, -1), (1, 1)]));
        for target in &moves {
            assert!(!board.is_occupied(target));
        }
    }

    #[test]
    fn test_spider_trapped_in_gate() {
        // Spider surrounded so that every exit is a gate
        let board = Layout::new()
            .put(PieceKind::Spider, 0, 0)
            .ants(&[(1, -1), (0, 1), (-1, 0)])
            .ants(&OUTER_LINK)
            .board;
        assert!(destinations(&board, &HexCoord::ORIGIN).is_empty());
    }

    #[test]
    fn test_beetle_climbs_and_slides() {
        let board = Layout::new()
            .ants(&[(0, 0)])
            .put(PieceKind::Beetle, 1, 0)
            .board;
        let moves = destinations(&board, &HexCoord::axial(1, 0));
        assert_eq!(moves, cells(&[(0, 0), (1, -1), (0, 1)]));
    }

    #[test]
    fn test_beetle_on_top_moves_anywhere_adjacent() {
        let mut board = Layout::new().ants(&[(0, 0), (1, 0)]).board;
        board.place(Piece::new(50, Team::Black, PieceKind::Beetle), HexCoord::ORIGIN);

        let moves = destinations(&board, &HexCoord::ORIGIN);
        let expected: BTreeSet<HexCoord> = HexCoord::ORIGIN.neighbors().into_iter().collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_beetle_blocked_by_tall_gate() {
        // Two two-high stacks flank the gap between (0,0) and (1,0)
        let mut board = Layout::new().ants(&[(0, 0), (1, -1), (0, 1), (-1, 0)]).board;
        board.place(Piece::new(60, Team::Black, PieceKind::Beetle), HexCoord::axial(1, -1));
        board.place(Piece::new(61, Team::Black, PieceKind::Beetle), HexCoord::axial(0, 1));
        board.place(Piece::new(62, Team::White, PieceKind::Beetle), HexCoord::ORIGIN);

        let (lifted, _) = board.lifted(&HexCoord::ORIGIN);
        assert!(!can_step_at_height(&lifted, &HexCoord::ORIGIN, &HexCoord::axial(1, 0)));
        assert!(!destinations(&board, &HexCoord::ORIGIN).contains(&HexCoord::axial(1, 0)));
        // Climbing onto one of the tall stacks is still fine
        assert!(destinations(&board, &HexCoord::ORIGIN).contains(&HexCoord::axial(1, -1)));
    }

    #[test]
    fn test_reserved_kinds_never_move() {
        let board = Layout::new()
            .ants(&[(0, 0)])
            .put(PieceKind::Ladybug, 1, 0)
            .put(PieceKind::Mosquito, -1, 0)
            .board;
        assert!(destinations_unchecked(&board, &HexCoord::axial(1, 0)).is_empty());
        assert!(destinations_unchecked(&board, &HexCoord::axial(-1, 0)).is_empty());
    }

    #[test]
    fn test_empty_cell_has_no_destinations() {
        let board = Layout::new().ants(&[(0, 0)]).board;
        assert!(destinations(&board, &HexCoord::axial(4, 4)).is_empty());
    }
}
