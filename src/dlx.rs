use log::debug;

/// Index into the node arena.
pub type NodeId = usize;

const ROOT: NodeId = 0;
/// Row id stored on header nodes, never matched by a candidate lookup.
const HEADER: usize = usize::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    left: NodeId,
    right: NodeId,
    up: NodeId,
    down: NodeId,
    /// Arena index of the owning column header; headers point at themselves.
    column: NodeId,
    /// Candidate row id this node belongs to.
    row: usize,
}

/// Sparse 0/1 matrix for exact-cover search, stored as a flat arena of
/// doubly-linked ring nodes (Knuth's Dancing Links).
///
/// Slot 0 is the root sentinel; slots `1..=n_columns` are the column headers,
/// linked into the root's horizontal ring while their column is still
/// uncovered. Every link is an arena index, so an empty ring is a node
/// pointing at its own slot and the whole matrix is a plain value.
#[derive(Debug, Clone)]
pub struct Matrix {
    nodes: Vec<Node>,
    /// Live row count per column, indexed by constraint id.
    sizes: Vec<usize>,
    /// Current partial selection, clue rows first.
    solution: Vec<NodeId>,
    iterations: usize,
}

struct Frame {
    col: NodeId,
    row: NodeId,
}

impl Matrix {
    /// Creates a matrix with `n_columns` empty constraint columns and no rows.
    pub fn new(n_columns: usize) -> Self {
        let mut nodes = Vec::with_capacity(n_columns + 1);
        nodes.push(Node {
            left: n_columns,
            right: if n_columns == 0 { ROOT } else { 1 },
            up: ROOT,
            down: ROOT,
            column: ROOT,
            row: HEADER,
        });
        for c in 1..=n_columns {
            nodes.push(Node {
                left: c - 1,
                right: if c == n_columns { ROOT } else { c + 1 },
                up: c,
                down: c,
                column: c,
                row: HEADER,
            });
        }
        Self {
            nodes,
            sizes: vec![0; n_columns],
            solution: Vec::new(),
            iterations: 0,
        }
    }

    /// Adds one candidate row touching the given constraint columns: one node
    /// per incidence, appended at the tail of each column's vertical ring and
    /// linked into a horizontal ring of its own in argument order.
    pub fn add_row(&mut self, row: usize, columns: &[usize]) {
        if columns.is_empty() {
            return;
        }
        let first = self.nodes.len();
        for &c in columns {
            let header = c + 1;
            let id = self.nodes.len();
            let up = self.nodes[header].up;
            self.nodes.push(Node {
                left: id,
                right: id,
                up,
                down: header,
                column: header,
                row,
            });
            self.nodes[up].down = id;
            self.nodes[header].up = id;
            self.sizes[c] += 1;
            if id > first {
                self.nodes[id].left = id - 1;
                self.nodes[id - 1].right = id;
            }
        }
        let last = self.nodes.len() - 1;
        self.nodes[first].left = last;
        self.nodes[last].right = first;
    }

    /// Number of search iterations (row trials) performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Hides a column: the header leaves the root ring, then every row under
    /// it is unlinked vertically from all its *other* columns. Horizontal
    /// links of the removed rows are untouched, which is what lets `uncover`
    /// restore them.
    fn cover(&mut self, col: NodeId) {
        let (left, right) = (self.nodes[col].left, self.nodes[col].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        let mut row = self.nodes[col].down;
        while row != col {
            let mut node = self.nodes[row].right;
            while node != row {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                self.sizes[self.nodes[node].column - 1] -= 1;
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Exact mirror of `cover`: rows bottom-up, siblings leftward, so every
    /// link is restored in the reverse order it was cut.
    fn uncover(&mut self, col: NodeId) {
        let mut row = self.nodes[col].up;
        while row != col {
            let mut node = self.nodes[row].left;
            while node != row {
                self.sizes[self.nodes[node].column - 1] += 1;
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = node;
                self.nodes[down].up = node;
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }
        let (left, right) = (self.nodes[col].left, self.nodes[col].right);
        self.nodes[left].right = col;
        self.nodes[right].left = col;
    }

    /// Active column with the fewest remaining rows, first one winning ties.
    /// Must not be called when the root ring is empty.
    fn choose_column(&self) -> NodeId {
        let mut best = self.nodes[ROOT].right;
        let mut col = self.nodes[best].right;
        while col != ROOT {
            if self.sizes[col - 1] < self.sizes[best - 1] {
                best = col;
            }
            col = self.nodes[col].right;
        }
        best
    }

    /// Commits to a row: records it on the solution path and covers the
    /// columns of its remaining siblings.
    fn select(&mut self, row: NodeId) {
        self.solution.push(row);
        let mut node = self.nodes[row].right;
        while node != row {
            self.cover(self.nodes[node].column);
            node = self.nodes[node].right;
        }
    }

    /// Undoes `select`: uncovers sibling columns leftward and pops the row.
    fn unselect(&mut self, row: NodeId) {
        let mut node = self.nodes[row].left;
        while node != row {
            self.uncover(self.nodes[node].column);
            node = self.nodes[node].left;
        }
        self.solution.pop();
    }

    /// Forces a known row into the solution before searching, covering every
    /// column it touches. Used for clues. Returns `false` without touching
    /// the matrix if no node with this row id is still reachable (the row was
    /// already removed by an earlier selection).
    pub fn select_row(&mut self, row_id: usize) -> bool {
        let mut col = self.nodes[ROOT].right;
        while col != ROOT {
            let mut node = self.nodes[col].down;
            while node != col {
                if self.nodes[node].row == row_id {
                    self.cover(col);
                    self.select(node);
                    return true;
                }
                node = self.nodes[node].down;
            }
            col = self.nodes[col].right;
        }
        false
    }

    /// Algorithm X: repeatedly pick the smallest active column, try each of
    /// its rows, and backtrack on dead ends. Runs on an explicit frame stack
    /// (one frame per committed row) rather than native recursion. Returns
    /// the row ids of the first full cover found, clue rows included, or
    /// `None` once every branch is exhausted.
    pub fn search(&mut self) -> Option<Vec<usize>> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            self.iterations += 1;
            if self.nodes[ROOT].right == ROOT {
                debug!("solution found after {} iterations", self.iterations);
                return Some(self.solution.iter().map(|&n| self.nodes[n].row).collect());
            }
            let mut col = self.choose_column();
            self.cover(col);
            let mut row = self.nodes[col].down;
            loop {
                if row != col {
                    self.select(row);
                    stack.push(Frame { col, row });
                    break;
                }
                // Column exhausted: restore it and retry the parent frame
                // with its next row.
                self.uncover(col);
                let frame = match stack.pop() {
                    Some(frame) => frame,
                    None => {
                        debug!("search exhausted after {} iterations", self.iterations);
                        return None;
                    }
                };
                self.unselect(frame.row);
                col = frame.col;
                row = self.nodes[frame.row].down;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Knuth's six-row example: the unique cover is rows 0, 3 and 4.
    fn knuth_matrix() -> Matrix {
        let mut matrix = Matrix::new(7);
        matrix.add_row(0, &[2, 4, 5]);
        matrix.add_row(1, &[0, 3, 6]);
        matrix.add_row(2, &[1, 2, 5]);
        matrix.add_row(3, &[0, 3]);
        matrix.add_row(4, &[1, 6]);
        matrix.add_row(5, &[3, 4, 6]);
        matrix
    }

    fn active_columns(matrix: &Matrix) -> Vec<NodeId> {
        let mut cols = Vec::new();
        let mut col = matrix.nodes[ROOT].right;
        while col != ROOT {
            cols.push(col);
            col = matrix.nodes[col].right;
        }
        cols
    }

    #[test]
    fn add_row_links_and_counts_match() {
        let matrix = knuth_matrix();
        assert_eq!(matrix.sizes, vec![2, 2, 2, 3, 2, 2, 3]);
        for col in active_columns(&matrix) {
            let mut count = 0;
            let mut node = matrix.nodes[col].down;
            while node != col {
                assert_eq!(matrix.nodes[node].column, col);
                count += 1;
                node = matrix.nodes[node].down;
            }
            assert_eq!(count, matrix.sizes[col - 1]);
        }
    }

    #[test]
    fn cover_then_uncover_restores_link_state() {
        let mut matrix = knuth_matrix();
        let before_nodes = matrix.nodes.clone();
        let before_sizes = matrix.sizes.clone();
        for col in 1..=7 {
            matrix.cover(col);
            matrix.uncover(col);
            assert_eq!(matrix.nodes, before_nodes, "column {col} not restored");
            assert_eq!(matrix.sizes, before_sizes, "column {col} sizes not restored");
        }
    }

    #[test]
    fn nested_cover_uncover_restores_link_state() {
        let mut matrix = knuth_matrix();
        let before_nodes = matrix.nodes.clone();
        let before_sizes = matrix.sizes.clone();
        matrix.cover(1);
        matrix.cover(4);
        matrix.uncover(4);
        matrix.uncover(1);
        assert_eq!(matrix.nodes, before_nodes);
        assert_eq!(matrix.sizes, before_sizes);
    }

    #[test]
    fn choose_column_returns_minimum_size() {
        let mut matrix = knuth_matrix();
        matrix.cover(1);
        matrix.cover(5);
        let best = matrix.choose_column();
        for col in active_columns(&matrix) {
            assert!(matrix.sizes[best - 1] <= matrix.sizes[col - 1]);
        }
        matrix.uncover(5);
        matrix.uncover(1);
    }

    #[test]
    fn search_finds_the_unique_cover() {
        let mut matrix = knuth_matrix();
        let mut rows = matrix.search().unwrap();
        rows.sort_unstable();
        assert_eq!(rows, vec![0, 3, 4]);
    }

    #[test]
    fn search_reports_exhaustion_on_uncoverable_column() {
        // Column 1 has no rows at all.
        let mut matrix = Matrix::new(2);
        matrix.add_row(0, &[0]);
        assert!(matrix.search().is_none());
        assert!(matrix.iterations() > 0);
    }

    #[test]
    fn select_row_covers_its_columns() {
        let mut matrix = knuth_matrix();
        assert!(matrix.select_row(3));
        // Row 3 covers columns 0 and 3, leaving 1, 2, 4, 5, 6 active.
        assert_eq!(active_columns(&matrix), vec![2, 3, 5, 6, 7]);
        let rows = matrix.search().unwrap();
        assert_eq!(rows, vec![3, 0, 4]);
    }

    #[test]
    fn select_row_is_a_no_op_when_the_row_is_gone() {
        let mut matrix = knuth_matrix();
        assert!(matrix.select_row(3));
        let nodes = matrix.nodes.clone();
        let sizes = matrix.sizes.clone();
        // Row 1 shares columns 0 and 3 with row 3, so it was removed.
        assert!(!matrix.select_row(1));
        assert_eq!(matrix.nodes, nodes);
        assert_eq!(matrix.sizes, sizes);
    }
}
