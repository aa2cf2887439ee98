use crate::terminal::Terminal;
use crossterm::style::Color;

/// Top-left corner and outer size of a help box centred on the screen.
fn help_box(width: u16, height: u16, help_text: &str) -> (usize, usize, usize, usize) {
    let lines = help_text.lines().count();
    let max_width = help_text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines + 2;

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;
    (start_x, start_y, box_width, box_height)
}

/// Draw a bordered help box over whatever is already in the buffer.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let (width, height) = term.size();
    let (start_x, start_y, box_width, box_height) = help_box(width, height, help_text);
    let max_width = box_width - 4;
    let (left, right) = (start_x as i32, (start_x + box_width - 1) as i32);

    let border = Some(Color::White);
    let text = Some(Color::Grey);

    let horizontal = "─".repeat(box_width - 2);
    let top = start_y as i32;
    let bottom = (start_y + box_height - 1) as i32;
    term.set_str(left, top, &format!("┌{}┐", horizontal), border);
    term.set_str(left, bottom, &format!("└{}┘", horizontal), border);

    for (i, line) in help_text.lines().enumerate() {
        let y = top + 1 + i as i32;
        let padding = max_width.saturating_sub(line.chars().count());
        term.set(left, y, '│', border);
        term.set_str(left + 1, y, &format!(" {}{} ", line, " ".repeat(padding)), text);
        term.set(right, y, '│', border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_is_centred() {
        // Widest line is 5 chars: box 9 wide, 4 tall.
        assert_eq!(help_box(21, 10, "ab\nabcde"), (6, 3, 9, 4));
    }

    #[test]
    fn overlay_draws_border_and_text() {
        let mut term = Terminal::detached(20, 6);
        render_help_overlay(&mut term, "q quit");

        let (x, y, w, h) = help_box(20, 6, "q quit");
        assert_eq!(term.get(x as u16, y as u16).map(|c| c.ch), Some('┌'));
        assert_eq!(term.get((x + w - 1) as u16, (y + h - 1) as u16).map(|c| c.ch), Some('┘'));
        assert_eq!(term.get((x + 2) as u16, (y + 1) as u16).map(|c| c.ch), Some('q'));
    }
}
