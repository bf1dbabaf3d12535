use crate::grid::{Cell, Dir};
use std::collections::VecDeque;

/// The snake as an ordered run of occupied cells, head at the front.
///
/// Cells never move once occupied: advancing prepends a new head and, when
/// not growing, pops the tail. Every other cell stays put until the tail
/// reaches it.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// A fresh snake is a single head cell; the body accretes through play.
    pub fn hatch(head: Cell) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Self { body }
    }

    pub fn head(&self) -> Cell {
        *self.body.front().expect("snake is never empty")
    }

    pub fn tail(&self) -> Cell {
        *self.body.back().expect("snake is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Would moving the head into `cell` bite the body? When the tail will
    /// be vacated this same tick (`tail_vacating`), stepping into it is
    /// legal, matching classic tail-chasing rules.
    pub fn would_bite(&self, cell: Cell, tail_vacating: bool) -> bool {
        self.body
            .iter()
            .enumerate()
            .any(|(i, &c)| c == cell && !(tail_vacating && i == self.body.len() - 1))
    }

    /// Prepend `new_head`; keep the tail only when growing.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    /// The direction from the neck to the head, if the snake has one.
    pub fn heading(&self) -> Option<Dir> {
        let head = self.head();
        let neck = *self.body.get(1)?;
        match (head.x - neck.x, head.z - neck.z) {
            (1, 0) => Some(Dir::PosX),
            (-1, 0) => Some(Dir::NegX),
            (0, 1) => Some(Dir::PosZ),
            (0, -1) => Some(Dir::NegZ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worm(cells: &[(i32, i32)]) -> Snake {
        let mut body = VecDeque::new();
        for &(x, z) in cells {
            body.push_back(Cell::new(x, z));
        }
        Snake { body }
    }

    #[test]
    fn hatchling_is_a_single_cell() {
        let snake = Snake::hatch(Cell::new(0, 0));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), snake.tail());
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = worm(&[(2, 0), (1, 0), (0, 0)]);
        snake.advance(Cell::new(3, 0), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(3, 0));
        assert_eq!(snake.tail(), Cell::new(1, 0));
    }

    #[test]
    fn advance_with_growth_adds_one_cell() {
        let mut snake = worm(&[(2, 0), (1, 0), (0, 0)]);
        snake.advance(Cell::new(3, 0), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Cell::new(0, 0));
    }

    #[test]
    fn bite_check_spares_a_vacating_tail() {
        // Square loop: head one step from closing onto the tail cell.
        let snake = worm(&[(0, 1), (1, 1), (1, 0), (0, 0)]);
        let tail = Cell::new(0, 0);
        assert!(!snake.would_bite(tail, true));
        assert!(snake.would_bite(tail, false));
        assert!(snake.would_bite(Cell::new(1, 1), true));
    }

    #[test]
    fn heading_reads_head_minus_neck() {
        assert_eq!(worm(&[(2, 0), (1, 0)]).heading(), Some(Dir::PosX));
        assert_eq!(worm(&[(0, 3), (0, 4)]).heading(), Some(Dir::NegZ));
        assert_eq!(Snake::hatch(Cell::new(0, 0)).heading(), None);
    }
}
