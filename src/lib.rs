mod dlx;
mod solver;
mod sudoku;

pub use dlx::Matrix;
pub use solver::{apply_clues, build_matrix, decode_solution, solve_sudoku};
pub use sudoku::{Item, Sudoku};
