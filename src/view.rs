//! Terminal preview of a forest in braille.

use crate::canvas::{paint, BrailleSurface};
use crate::config::{Rgb, ViewConfig};
use crate::error::Result;
use crate::forest::{generate_params, Forest, ForestParams};
use crate::help::render_help_overlay;
use crate::seed::Seed;
use crate::sketch::Sketch;
use crate::terminal::{rgb, Terminal};
use crossterm::event::KeyCode;
use crossterm::style::Color;

const HELP: &str = "\
BLOCKFOREST
─────────────────
+/-    Branch angle
r      Reset angle
?      Toggle help
q/Esc  Quit";

/// Interactive state: the only inputs that can change while viewing
struct ViewState {
    angle: f64,
    start_angle: f64,
    step: f64,
    help: bool,
}

impl ViewState {
    fn new(angle: f64, step: f64) -> Self {
        Self {
            angle,
            start_angle: angle,
            step,
            help: false,
        }
    }

    /// Handle keypress, returns true if should quit
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('+') | KeyCode::Char('=') => self.angle += self.step,
            KeyCode::Char('-') | KeyCode::Char('_') => self.angle -= self.step,
            KeyCode::Char('r') => self.angle = self.start_angle,
            KeyCode::Char('?') => self.help = !self.help,
            _ => {}
        }
        false
    }
}

/// Paint a forest into the terminal buffer through a braille grid.
pub fn draw_forest(term: &mut Terminal, dots: &mut BrailleSurface, forest: &Forest) {
    dots.clear();
    paint(forest, dots);

    let (width, height) = term.size();
    term.clear();
    for cy in 0..height as usize {
        for cx in 0..width as usize {
            if let Some((ch, color)) = dots.cell(cx, cy) {
                term.set(cx as i32, cy as i32, ch, Some(rgb(color)));
            }
        }
    }
}

/// Print the forest once, sized to the current terminal.
pub fn print(config: &ViewConfig) -> Result<()> {
    let seed = Seed::from_hash(&config.hash)?;
    let params = params_for(config, config.style.mod1);
    let forest = generate_params(seed, &params);

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    // Leave a row for the shell prompt
    let height = height.saturating_sub(1);
    let mut term = Terminal::detached(width, height);

    let mut dots = BrailleSurface::for_cells(width, height);
    draw_forest(&mut term, &mut dots, &forest);
    term.print_to_stdout();
    Ok(())
}

/// Run the interactive preview until the user quits
pub fn run(config: &ViewConfig) -> Result<()> {
    let seed = Seed::from_hash(&config.hash)?;
    let mut state = ViewState::new(config.style.mod1, config.angle_step);
    let mut sketch = Sketch::new();

    let mut term = Terminal::new(true)?;
    term.set_background(config.style.background);
    term.clear_screen()?;

    let (mut width, mut height) = term.size();
    let mut dots = BrailleSurface::for_cells(width, height);
    let mut dirty = true;

    loop {
        let (new_w, new_h) = crossterm::terminal::size().unwrap_or((width, height));
        if new_w != width || new_h != height {
            width = new_w;
            height = new_h;
            term.resize(width, height);
            term.clear_screen()?;
            dots = BrailleSurface::for_cells(width, height);
            dirty = true;
        }

        if dirty {
            let forest = sketch.forest(seed, &params_for(config, state.angle));
            draw_forest(&mut term, &mut dots, forest);

            if config.show_status {
                let status = format!(
                    " {}  angle {:.2}  trees {}  segments {} ",
                    seed,
                    state.angle,
                    forest.trees.len(),
                    forest.segments.len()
                );
                term.set_str(0, height as i32 - 1, &status, Some(Color::Grey));
            }
            if state.help {
                render_help_overlay(&mut term, HELP);
            }

            term.render()?;
            dirty = false;
        }

        if let Some(code) = term.wait_key(100)? {
            if state.handle_key(code) {
                break;
            }
            dirty = true;
        }
    }

    Ok(())
}

fn params_for(config: &ViewConfig, angle: f64) -> ForestParams {
    ForestParams {
        width: config.style.width,
        height: config.style.height,
        branch_angle: angle,
        stroke: Rgb::GREEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::generate;

    #[test]
    fn angle_keys_step_and_reset() {
        let mut state = ViewState::new(0.4, 0.05);
        assert!(!state.handle_key(KeyCode::Char('+')));
        assert!((state.angle - 0.45).abs() < 1e-12);
        state.handle_key(KeyCode::Char('-'));
        state.handle_key(KeyCode::Char('-'));
        assert!((state.angle - 0.35).abs() < 1e-12);
        state.handle_key(KeyCode::Char('r'));
        assert_eq!(state.angle, 0.4);
        assert!(state.handle_key(KeyCode::Esc));
    }

    #[test]
    fn forest_lands_in_the_buffer() {
        let forest = generate(Seed::new(1000), 500, 500, 0.4);
        let mut term = Terminal::detached(40, 20);
        let mut dots = BrailleSurface::for_cells(40, 20);
        draw_forest(&mut term, &mut dots, &forest);

        let drawn = (0..20u16)
            .flat_map(|y| (0..40u16).map(move |x| (x, y)))
            .filter_map(|(x, y)| term.get(x, y))
            .filter(|cell| cell.ch != ' ')
            .count();
        assert!(drawn > 0);
    }
}
