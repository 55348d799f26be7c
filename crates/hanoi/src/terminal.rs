//! Plain-text presentation surface.
//!
//! Tracks where every disc sits from the surface callbacks alone and draws
//! the pegs as rows of text. A live surface writes a frame after every
//! completed move; a quiet one only records state until
//! [`render`](TerminalSurface::render) is called.
//!
//! ```text
//!    |       |       |
//!   =1=      |       |
//!  ==2==     |       |
//! ─────── ─────── ───────
//! ```

use std::io::Write;

use hanoi_core::{Anchor, DiscId, Progress, Scene};
use hanoi_runtime::{PresentationSurface, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiscState {
    peg: usize,
    position: usize,
    lifted: bool,
}

/// Text renderer over any writer.
pub struct TerminalSurface<W> {
    out: W,
    live: bool,
    pegs: usize,
    discs: Vec<DiscState>,
    progress: Option<Progress>,
}

impl<W: Write + Send> TerminalSurface<W> {
    #[must_use]
    pub fn new(out: W, live: bool) -> Self {
        Self {
            out,
            live,
            pegs: 0,
            discs: Vec::new(),
            progress: None,
        }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the current frame.
    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let frame = self.frame();
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// The current frame as text.
    #[must_use]
    pub fn frame(&self) -> String {
        let height = self.discs.len();
        // Widest cell is the bottom disc: arms on both sides of its label.
        let column = 2 * height + height.to_string().len() + 2;

        // grid[peg][row] with row 0 at the base.
        let mut grid = vec![vec![None; height]; self.pegs];
        for (rank, state) in self.discs.iter().enumerate() {
            if state.lifted || state.position == 0 {
                continue;
            }
            if let Some(slot) = grid
                .get_mut(state.peg)
                .and_then(|stack| stack.get_mut(state.position - 1))
            {
                *slot = Some(rank);
            }
        }

        let mut frame = String::new();
        let pegs_row = vec![cell(None, column); self.pegs].join(" ");
        frame.push_str(pegs_row.trim_end());
        frame.push('\n');
        for row in (0..height).rev() {
            let line = grid
                .iter()
                .map(|stack| cell(stack[row], column))
                .collect::<Vec<_>>()
                .join(" ");
            frame.push_str(line.trim_end());
            frame.push('\n');
        }
        let base = vec!["─".repeat(column); self.pegs].join(" ");
        frame.push_str(&base);
        frame.push('\n');
        if let Some(progress) = self.progress {
            frame.push_str(&progress.to_string());
            frame.push('\n');
        }
        frame
    }
}

/// One peg's cell: a centred disc or the bare peg.
fn cell(rank: Option<usize>, column: usize) -> String {
    match rank {
        Some(rank) => {
            let label = DiscId::new(rank as u32).label().to_string();
            let arms = "=".repeat(rank + 1);
            format!("{:^column$}", format!("{arms}{label}{arms}"))
        }
        None => format!("{:^column$}", "|"),
    }
}

impl<W: Write + Send> PresentationSurface for TerminalSurface<W> {
    fn build(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        if scene.anchors.is_empty() {
            return Err(SurfaceError::MissingElement {
                element: "peg anchors",
                role: "columns the discs are drawn in",
            });
        }
        self.pegs = scene.anchors.len();
        self.discs = scene
            .discs
            .iter()
            .map(|style| DiscState {
                peg: 0,
                position: style.initial_position,
                lifted: false,
            })
            .collect();
        self.progress = None;

        if self.live {
            let palette = scene
                .discs
                .iter()
                .map(|style| format!("{} {}", style.disc, style.color))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                self.out,
                "{} pegs, {} discs ({palette})",
                self.pegs,
                self.discs.len()
            )?;
            self.render()?;
        }
        Ok(())
    }

    fn disc_lifted(&mut self, disc: DiscId, _elevation: usize) -> Result<(), SurfaceError> {
        if let Some(state) = self.discs.get_mut(disc.rank() as usize) {
            state.lifted = true;
        }
        Ok(())
    }

    fn disc_anchor(&mut self, disc: DiscId, anchor: &Anchor) -> Result<(), SurfaceError> {
        if let Some(state) = self.discs.get_mut(disc.rank() as usize) {
            state.peg = anchor.peg;
        }
        Ok(())
    }

    fn disc_position(&mut self, disc: DiscId, position: usize) -> Result<(), SurfaceError> {
        if let Some(state) = self.discs.get_mut(disc.rank() as usize) {
            state.position = position;
            state.lifted = false;
        }
        Ok(())
    }

    fn progress(&mut self, progress: Progress) -> Result<(), SurfaceError> {
        self.progress = Some(progress);
        if self.live {
            self.render()?;
        }
        Ok(())
    }
}

impl<W> std::fmt::Debug for TerminalSurface<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("live", &self.live)
            .field("pegs", &self.pegs)
            .field("discs", &self.discs.len())
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
