use std::fmt;
use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::generator::GrowingTree;
use crate::maze::{Coord, Direction, Face, Sign};

/// One glyph of the rendered maze picture.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RenderCell {
    Wall,
    Open,
    Root,
    Active,
    Entrance,
    Exit,
}

impl RenderCell {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for RenderCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            RenderCell::Wall => "⬜".with(Color::White),
            RenderCell::Open => "  ".with(Color::Reset),
            RenderCell::Root => "🟦".with(Color::Blue),
            RenderCell::Active => "* ".with(Color::Magenta),
            RenderCell::Entrance => "🟩".with(Color::Green),
            RenderCell::Exit => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                RenderCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Draws the engine's maze and a status line to the terminal.
///
/// Mazes of more than two dimensions are shown as the slice through the
/// first two axes with all higher indices at zero; axis 0 runs across the
/// screen and axis 1 down it.
pub struct Renderer {
    stdout: Stdout,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            stdout: std::io::stdout(),
        }
    }

    /// The terminal footprint (columns, rows) of the maze picture plus
    /// status line.
    fn footprint(engine: &GrowingTree) -> (usize, usize) {
        let (width, height) = Self::slice_extents(engine);
        (
            (2 * width + 1) * RenderCell::CELL_WIDTH as usize,
            2 * height + 2,
        )
    }

    fn slice_extents(engine: &GrowingTree) -> (usize, usize) {
        let shape = engine.maze().shape();
        let width = shape[0];
        let height = if shape.len() > 1 { shape[1] } else { 1 };
        (width, height)
    }

    /// The full cell coordinate of a slice position.
    fn slice_coord(engine: &GrowingTree, x: usize, y: usize) -> Coord {
        let mut indices = vec![0; engine.maze().dimension_count()];
        indices[0] = x;
        if indices.len() > 1 {
            indices[1] = y;
        }
        Coord::new(indices)
    }

    fn cell_glyph(engine: &GrowingTree, coord: &Coord) -> RenderCell {
        if engine.entrance().is_some_and(|c| c == coord) {
            RenderCell::Entrance
        } else if engine.exit().is_some_and(|c| c == coord) {
            RenderCell::Exit
        } else if coord == engine.root() && engine.steps_taken() > 0 {
            RenderCell::Root
        } else if engine.active_cells().contains(coord) {
            RenderCell::Active
        } else {
            RenderCell::Open
        }
    }

    /// The glyph at picture position `(gx, gy)` where odd/odd positions are
    /// cell centers, odd/even and even/odd are walls, and even/even are
    /// pillars.
    fn glyph_at(engine: &GrowingTree, gx: usize, gy: usize) -> RenderCell {
        let maze = engine.maze();
        match (gx % 2, gy % 2) {
            (1, 1) => {
                let coord = Self::slice_coord(engine, gx / 2, gy / 2);
                Self::cell_glyph(engine, &coord)
            }
            (0, 1) => {
                // Vertical wall segment left of cell column gx / 2.
                let x = gx / 2;
                let y = gy / 2;
                let face = if x < Self::slice_extents(engine).0 {
                    Face::new(
                        Self::slice_coord(engine, x, y),
                        Direction::new(0, Sign::Negative),
                    )
                } else {
                    Face::new(
                        Self::slice_coord(engine, x - 1, y),
                        Direction::new(0, Sign::Positive),
                    )
                };
                if maze.has_wall(&face) {
                    RenderCell::Wall
                } else {
                    RenderCell::Open
                }
            }
            (1, 0) => {
                // Horizontal wall segment above cell row gy / 2. One-axis
                // mazes have no vertical neighbors, so those rows are solid
                // border.
                if maze.dimension_count() < 2 {
                    return RenderCell::Wall;
                }
                let x = gx / 2;
                let y = gy / 2;
                let face = if y < Self::slice_extents(engine).1 {
                    Face::new(
                        Self::slice_coord(engine, x, y),
                        Direction::new(1, Sign::Negative),
                    )
                } else {
                    Face::new(
                        Self::slice_coord(engine, x, y - 1),
                        Direction::new(1, Sign::Positive),
                    )
                };
                if maze.has_wall(&face) {
                    RenderCell::Wall
                } else {
                    RenderCell::Open
                }
            }
            _ => RenderCell::Wall,
        }
    }

    /// Redraws the whole picture. Returns Ok(false) without drawing when the
    /// terminal is too small, so the caller can keep polling for a resize.
    pub fn render(&mut self, engine: &GrowingTree, status: &str) -> std::io::Result<bool> {
        let (need_cols, need_rows) = Self::footprint(engine);
        let (term_cols, term_rows) = terminal::size()?;
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        if (term_cols as usize) < need_cols || (term_rows as usize) < need_rows {
            let msg = format!(
                "Terminal size ({}x{}) is too small for the maze picture ({}x{}). Please resize the terminal.\r\n",
                term_cols, term_rows, need_cols, need_rows
            );
            queue!(
                self.stdout,
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold))
            )?;
            self.stdout.flush()?;
            return Ok(false);
        }

        let (width, height) = Self::slice_extents(engine);
        for gy in 0..(2 * height + 1) {
            for gx in 0..(2 * width + 1) {
                let glyph = Self::glyph_at(engine, gx, gy);
                queue!(self.stdout, style::Print(glyph))?;
            }
            queue!(self.stdout, style::Print("\r\n"))?;
        }

        let (truncated, _) = status.unicode_truncate(term_cols as usize);
        queue!(
            self.stdout,
            style::PrintStyledContent(truncated.to_string().with(Color::Cyan)),
            style::Print("\r\n")
        )?;
        self.stdout.flush()?;
        Ok(true)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Selector;

    #[test]
    fn test_glyphs_follow_wall_state() {
        let mut engine = GrowingTree::new(&[2, 2], Selector::recursive_backtracker(), 1).unwrap();
        // Fresh maze: every wall segment present, every cell open or marked.
        assert_eq!(Renderer::glyph_at(&engine, 0, 0), RenderCell::Wall);
        assert_eq!(Renderer::glyph_at(&engine, 2, 1), RenderCell::Wall);
        while !engine.is_finished() {
            engine.advance();
        }
        // A spanning tree of 4 cells opens 3 internal segments.
        let mut open_internal = 0;
        for &(gx, gy) in &[(2, 1), (2, 3), (1, 2), (3, 2)] {
            if Renderer::glyph_at(&engine, gx, gy) == RenderCell::Open {
                open_internal += 1;
            }
        }
        assert_eq!(open_internal, 3);
    }

    #[test]
    fn test_entrance_and_exit_glyphs() {
        let mut engine = GrowingTree::new(&[3, 3], Selector::default(), 9).unwrap();
        while !engine.is_finished() {
            engine.advance();
        }
        let entrance = engine.entrance().unwrap().clone();
        let (gx, gy) = (
            2 * entrance.indices()[0] + 1,
            2 * entrance.indices()[1] + 1,
        );
        assert_eq!(Renderer::glyph_at(&engine, gx, gy), RenderCell::Entrance);
    }
}
