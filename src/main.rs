use colored::Colorize;
use itertools::Itertools;
use sudoku_dlx::{solve_sudoku, Sudoku};

const PUZZLE: [[u16; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

fn main() {
    env_logger::init();
    let board = Sudoku::from_grid(PUZZLE);
    println!("Input:\n{board}");
    match solve_sudoku(&board) {
        Ok((solution, iterations)) => {
            println!("Found a solution in {iterations} iterations.");
            for r in 0..9 {
                let line = (0..9)
                    .map(|c| solution.get(r, c).number().unwrap_or(0))
                    .join(" ");
                println!("{line}");
            }
        }
        Err((err, iterations)) => {
            println!("{}", format!("{err} ({iterations} iterations)").red());
        }
    }
}
