use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::Game;

const SEPARATOR: &str = " | ";

/// Renders the one-line status bar below the board and returns the area left
/// for the board itself.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, game: &Game) -> Rect {
    let [board_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(status_line(game))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    board_area
}

fn status_line(game: &Game) -> Line<'static> {
    let value = Style::default().fg(Color::White);
    let bounds = game.bounds();

    Line::from(vec![
        Span::raw("Length: "),
        Span::styled(game.snake().len().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Eaten: "),
        Span::styled(game.foods_eaten().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw("Tick: "),
        Span::styled(game.tick_count().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}x{}", bounds.width, bounds.height)),
    ])
}
