use std::fmt;

use crate::bean::{Bean, BEAN_CHAR};
use crate::snake::Snake;

pub const BACKGROUND_CHAR: char = '.';
pub const SNAKE_BODY_CHAR: char = 'o';

/// Glyph grid derived from the game state, rebuilt every tick.
pub struct Panel {
    length: usize,
    height: usize,
    cells: Vec<char>,
}

impl Panel {
    pub fn new(length: usize, height: usize) -> Self {
        Panel { length, height, cells: vec![BACKGROUND_CHAR; length * height] }
    }

    pub fn rebuild(&mut self, snake: &Snake, bean: &Bean) {
        self.cells.fill(BACKGROUND_CHAR);

        let bean_pos = bean.location();
        self.put(bean_pos.x, bean_pos.y, BEAN_CHAR);

        for pos in snake.segments() {
            self.put(pos.x, pos.y, SNAKE_BODY_CHAR);
        }

        if let Some(head) = snake.head() {
            self.put(head.x, head.y, snake.head_char());
        }
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.length && y < self.height {
            Some(self.cells[y * self.length + x])
        } else {
            None
        }
    }

    /// The framed board, one string per terminal line.
    pub fn lines(&self) -> Vec<String> {
        let rule = format!("{}-", "---".repeat(self.length + 1));
        let mut lines = Vec::with_capacity(self.height + 2);

        lines.push(rule.clone());
        for row in self.cells.chunks(self.length) {
            let mut line = String::from("|  ");
            for ch in row {
                line.push(*ch);
                line.push_str("  ");
            }
            line.push('|');
            lines.push(line);
        }
        lines.push(rule);

        lines
    }

    fn put(&mut self, x: i32, y: i32, ch: char) {
        // Off-board cells only show up on the losing tick, skip them
        if x < 0 || y < 0 || x as usize >= self.length || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.length + x as usize] = ch;
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
