use colored::Colorize;
use itertools::Itertools;
use std::collections::HashSet;

pub const N: usize = 9;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Sudoku {
    rows: [[Item; N]; N],
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Item {
    Number(u16),
    Empty,
}

impl Item {
    pub fn number(&self) -> Option<u16> {
        if let Item::Number(x) = self {
            Some(*x)
        } else {
            None
        }
    }
}

impl Sudoku {
    /// Builds a board from a digit grid, 0 meaning blank. Contradictory
    /// grids are accepted as-is; they simply fail to solve.
    pub fn from_grid(grid: [[u16; N]; N]) -> Self {
        let rows = grid.map(|row| {
            row.map(|x| {
                if x == 0 {
                    Item::Empty
                } else {
                    Item::Number(x)
                }
            })
        });
        Self { rows }
    }

    /// Parses one line per row; space, `.` and `0` are blanks. Short lines
    /// leave the remaining cells blank.
    pub fn from_text(text: &str) -> Result<Self, String> {
        let mut rows = [[Item::Empty; N]; N];
        for (i, line) in text.lines().take(N).enumerate() {
            for (j, c) in line.chars().take(N).enumerate() {
                rows[i][j] = match c {
                    ' ' | '.' | '0' => Item::Empty,
                    c => {
                        let x = c.to_digit(10).ok_or_else(|| format!("Invalid char: {c}"))? as u16;
                        Item::Number(x)
                    }
                };
            }
        }
        Ok(Self { rows })
    }

    pub fn get(&self, i: usize, j: usize) -> &Item {
        &self.rows[i][j]
    }

    pub fn set(&mut self, i: usize, j: usize, number: u16) {
        self.rows[i][j] = Item::Number(number);
    }

    /// Filled cells as (row, column, digit) triples, in reading order.
    pub fn clues(&self) -> Vec<(usize, usize, u16)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(j, x)| x.number().map(|n| (i, j, n)))
            })
            .collect_vec()
    }

    fn get_row_values(&self, i: usize) -> Vec<u16> {
        self.rows[i].iter().filter_map(|x| x.number()).collect_vec()
    }

    fn get_col_values(&self, j: usize) -> Vec<u16> {
        self.rows
            .iter()
            .map(|row| &row[j])
            .filter_map(|x| x.number())
            .collect_vec()
    }

    fn get_square_values(&self, i: usize, j: usize) -> Vec<u16> {
        let i0 = (i / 3) * 3;
        let j0 = (j / 3) * 3;
        (i0..i0 + 3)
            .cartesian_product(j0..j0 + 3)
            .filter_map(|(i, j)| self.get(i, j).number())
            .collect_vec()
    }

    /// True when no row, column or 3x3 square holds the same digit twice.
    /// Blank cells are fine; use `clues().len()` to check completeness.
    pub fn is_valid(&self) -> bool {
        (0..N)
            .map(|i| self.get_row_values(i))
            .chain((0..N).map(|j| self.get_col_values(j)))
            .chain(
                (0..N)
                    .step_by(3)
                    .cartesian_product((0..N).step_by(3))
                    .map(|(i, j)| self.get_square_values(i, j)),
            )
            .all(|group| {
                let unique = group.iter().collect::<HashSet<_>>();
                unique.len() == group.len()
            })
    }
}

impl std::fmt::Display for Sudoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut line = String::new();
        let horizontal_line = " ----------------- ";
        for (i, row) in self.rows.iter().enumerate() {
            if i % 3 == 0 {
                writeln!(f, "{}", horizontal_line)?;
            }
            for (j, x) in row.iter().enumerate() {
                line.push(if j % 3 == 0 { '|' } else { ' ' });
                match x {
                    Item::Number(n) => {
                        line.push_str(&format!("{n}"));
                    }
                    Item::Empty => {
                        line.push_str(&" ".on_blue().to_string());
                    }
                }
            }
            writeln!(f, "{line}|")?;
            line.clear();
        }
        writeln!(f, "{}", horizontal_line)
    }
}
