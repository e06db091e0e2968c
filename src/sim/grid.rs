//! Fixed-size character buffer handed to the render sink

use std::fmt;

/// Rows of fixed-width characters, displayed verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl TextGrid {
    /// Blank grid filled with spaces
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, ' ')
    }

    pub fn filled(width: usize, height: usize, ch: char) -> Self {
        Self {
            width,
            height,
            cells: vec![ch; width * height],
        }
    }

    /// Build from preformatted lines; short lines are padded with spaces.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let width = lines
            .iter()
            .map(|l| l.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let mut grid = Self::new(width, lines.len());
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.as_ref().chars().enumerate() {
                grid.put(x as i32, y as i32, ch);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Write a cell; coordinates outside the grid are clipped silently.
    pub fn put(&mut self, x: i32, y: i32, ch: char) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ch;
        }
    }

    /// Write a string starting at (x, y), clipped at the right edge
    pub fn put_str(&mut self, x: i32, y: i32, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as i32, y, ch);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width].iter().collect()
    }

    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row(y)).collect()
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&self.row(y))?;
        }
        Ok(())
    }
}
