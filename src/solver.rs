use crate::{
    dlx::Matrix,
    sudoku::{Sudoku, N},
};
use itertools::Itertools;
use log::debug;

/// One constraint family per Sudoku rule, 81 columns each.
const CONSTRAINTS: usize = 4 * N * N;

/// Unique id of the candidate "digit n+1 at (r, c)".
fn candidate_id(r: usize, c: usize, n: usize) -> usize {
    r * N * N + c * N + n
}

/// The four constraint columns the candidate satisfies: cell filled,
/// row has digit, column has digit, box has digit.
fn constraint_columns(r: usize, c: usize, n: usize) -> [usize; 4] {
    [
        r * N + c,
        N * N + r * N + n,
        2 * N * N + c * N + n,
        3 * N * N + ((r / 3) * 3 + c / 3) * N + n,
    ]
}

/// Builds the full exact-cover matrix for an empty board: 324 constraint
/// columns and all 729 candidate rows.
pub fn build_matrix() -> Matrix {
    let mut matrix = Matrix::new(CONSTRAINTS);
    for ((r, c), n) in (0..N).cartesian_product(0..N).cartesian_product(0..N) {
        matrix.add_row(candidate_id(r, c, n), &constraint_columns(r, c, n));
    }
    matrix
}

/// Forces every filled cell of the board into the solution path before the
/// search runs. Returns false when some clue's candidate row is already gone,
/// which happens exactly when an earlier clue contradicts it; the matrix is
/// left untouched by such a clue.
pub fn apply_clues(matrix: &mut Matrix, board: &Sudoku) -> bool {
    let mut all_placed = true;
    for (r, c, digit) in board.clues() {
        let id = candidate_id(r, c, digit as usize - 1);
        if !matrix.select_row(id) {
            debug!("clue {digit} at ({r}, {c}) has no remaining candidate row");
            all_placed = false;
        }
    }
    all_placed
}

/// Turns selected candidate row ids back into a filled board.
pub fn decode_solution(row_ids: &[usize]) -> Sudoku {
    let mut board = Sudoku::from_grid([[0; N]; N]);
    for &id in row_ids {
        let r = id / (N * N);
        let c = (id / N) % N;
        let n = id % N;
        board.set(r, c, n as u16 + 1);
    }
    board
}

/// Returns the first solution found and the number of search iterations, or
/// an error message with the iteration count. A clue that cannot be placed
/// makes the puzzle unsatisfiable and is reported the same way as an
/// exhausted search.
pub fn solve_sudoku(board: &Sudoku) -> Result<(Sudoku, usize), (String, usize)> {
    let mut matrix = build_matrix();
    if !apply_clues(&mut matrix, board) {
        return Err(("No solution found".to_string(), matrix.iterations()));
    }
    match matrix.search() {
        Some(rows) => Ok((decode_solution(&rows), matrix.iterations())),
        None => Err(("No solution found".to_string(), matrix.iterations())),
    }
}
