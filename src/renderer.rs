use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::config::GridSize;
use crate::game::Game;
use crate::snake::Position;
use crate::tile::{Tile, TileKind};
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Board glyphs, one terminal cell per logical cell.
const GLYPH_WALL: &str = "#";
const GLYPH_BODY: &str = "S";
const GLYPH_HEAD: &str = "h";
const GLYPH_FOOD: &str = "@";
const GLYPH_EMPTY: &str = " ";

/// Screen the interactive loop is currently showing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

impl Screen {
    /// How long to wait for a key before the next frame.
    ///
    /// While playing, waits only until the next tick is due. Menus have no
    /// tick to meet and wait a full interval.
    #[must_use]
    pub fn poll_timeout(self, tick_interval: Duration, since_last_tick: Duration) -> Duration {
        match self {
            Self::Playing => tick_interval.saturating_sub(since_last_tick),
            Self::Start | Self::GameOver => tick_interval,
        }
    }
}

/// Last drawn kind of every board cell.
///
/// Seeded from [`Game::tiles`] once per episode, then patched with
/// [`Game::changed_tiles`] after every tick.
#[derive(Debug, Clone)]
pub struct TileCanvas {
    bounds: GridSize,
    cells: Vec<TileKind>,
}

impl TileCanvas {
    /// Creates a canvas showing the full initial board of `game`.
    #[must_use]
    pub fn new(game: &Game) -> Self {
        let bounds = game.bounds();
        let mut canvas = Self {
            bounds,
            cells: vec![TileKind::Empty; bounds.total_cells()],
        };
        canvas.apply(&game.tiles());
        canvas
    }

    /// Applies the tiles changed by the last tick.
    pub fn sync(&mut self, game: &Game) {
        self.apply(&game.changed_tiles());
    }

    /// Kind drawn at `position`, `None` off the board.
    #[must_use]
    pub fn kind_at(&self, position: Position) -> Option<TileKind> {
        self.index(position).map(|index| self.cells[index])
    }

    fn apply(&mut self, tiles: &[Tile]) {
        for tile in tiles {
            if let Some(index) = self.index(tile.position) {
                self.cells[index] = tile.kind;
            }
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        let width = usize::from(self.bounds.width);
        if x >= width || y >= usize::from(self.bounds.height) {
            return None;
        }

        Some(y * width + x)
    }
}

/// Renders the full frame from the canvas and the immutable game state.
pub fn render(frame: &mut Frame<'_>, game: &Game, canvas: &TileCanvas, screen: Screen) {
    let area = frame.area();
    let board_area = render_hud(frame, area, game);

    render_board(frame, board_area, canvas);

    match screen {
        Screen::Start => render_start_menu(frame, board_area),
        Screen::GameOver => render_game_over_menu(
            frame,
            board_area,
            game.foods_eaten(),
            game.snake().len(),
            game.has_won(),
            game.death_reason(),
        ),
        Screen::Playing => {}
    }
}

fn render_board(frame: &mut Frame<'_>, area: Rect, canvas: &TileCanvas) {
    let buffer = frame.buffer_mut();
    for y in 0..canvas.bounds.height {
        for x in 0..canvas.bounds.width {
            let position = Position {
                x: i32::from(x),
                y: i32::from(y),
            };
            let Some(kind) = canvas.kind_at(position) else {
                continue;
            };

            let column = area.x.saturating_add(x);
            let row = area.y.saturating_add(y);
            if column >= area.right() || row >= area.bottom() {
                continue;
            }

            let (glyph, style) = tile_style(kind);
            buffer.set_string(column, row, glyph, style);
        }
    }
}

fn tile_style(kind: TileKind) -> (&'static str, Style) {
    match kind {
        TileKind::Wall => (GLYPH_WALL, Style::new().fg(Color::DarkGray)),
        TileKind::Body => (GLYPH_BODY, Style::new().fg(Color::Green)),
        TileKind::Head => (
            GLYPH_HEAD,
            Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        TileKind::Food => (GLYPH_FOOD, Style::new().fg(Color::Red)),
        TileKind::Empty => (GLYPH_EMPTY, Style::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::config::GridSize;
    use crate::env::{EnvConfig, Environment, SnakeEnv};
    use crate::game::Game;
    use crate::input::Action;
    use crate::snake::Position;
    use crate::tile::TileKind;

    use super::{Screen, TileCanvas, render};

    fn game() -> Game {
        let mut game = Game::new_with_seed(
            GridSize {
                width: 10,
                height: 10,
            },
            3,
        )
        .expect("board is valid");
        game.food = Position::new(7, 7);
        game
    }

    #[test]
    fn canvas_tracks_the_snake_through_diffs() {
        let mut game = game();
        let mut canvas = TileCanvas::new(&game);

        assert_eq!(canvas.kind_at(Position::new(0, 0)), Some(TileKind::Wall));
        assert_eq!(canvas.kind_at(Position::new(4, 4)), Some(TileKind::Head));
        assert_eq!(canvas.kind_at(Position::new(4, 6)), Some(TileKind::Body));

        game.update().expect("game is running");
        canvas.sync(&game);

        assert_eq!(canvas.kind_at(Position::new(4, 3)), Some(TileKind::Head));
        assert_eq!(canvas.kind_at(Position::new(4, 4)), Some(TileKind::Body));
        assert_eq!(canvas.kind_at(Position::new(4, 6)), Some(TileKind::Empty));
        assert_eq!(canvas.kind_at(Position::new(7, 7)), Some(TileKind::Food));
    }

    #[test]
    fn canvas_matches_a_fresh_projection_after_eating() {
        let mut game = game();
        game.food = Position::new(4, 3);
        let mut canvas = TileCanvas::new(&game);

        for _ in 0..2 {
            game.update().expect("game is running");
            canvas.sync(&game);
        }

        let fresh = TileCanvas::new(&game);
        assert_eq!(canvas.cells, fresh.cells);
    }

    #[test]
    fn canvas_follows_environment_steps() {
        let mut env = SnakeEnv::new(EnvConfig {
            seed: Some(4),
            ..EnvConfig::default()
        })
        .expect("env should build");
        let mut canvas = TileCanvas::new(env.game());

        let actions = [
            Action::Up,
            Action::Left,
            Action::Left,
            Action::Down,
            Action::Down,
            Action::Right,
            Action::Right,
            Action::Right,
            Action::Up,
            Action::Up,
            Action::Left,
            Action::Down,
        ];
        for action in actions {
            let result = env.step(action).expect("episode running");
            canvas.sync(env.game());

            assert_eq!(canvas.cells, TileCanvas::new(env.game()).cells);
            if result.terminated {
                break;
            }
        }
    }

    #[test]
    fn menus_wait_a_full_interval_for_input() {
        let tick = Duration::from_millis(100);
        let overdue = Duration::from_millis(250);

        assert_eq!(Screen::Start.poll_timeout(tick, overdue), tick);
        assert_eq!(Screen::GameOver.poll_timeout(tick, overdue), tick);
        assert_eq!(Screen::Playing.poll_timeout(tick, overdue), Duration::ZERO);
        assert_eq!(
            Screen::Playing.poll_timeout(tick, Duration::from_millis(40)),
            Duration::from_millis(60)
        );
    }

    #[test]
    fn render_draws_board_glyphs() {
        let game = game();
        let canvas = TileCanvas::new(&game);
        let mut terminal =
            Terminal::new(TestBackend::new(40, 16)).expect("test backend should build");

        terminal
            .draw(|frame| render(frame, &game, &canvas, Screen::Playing))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        let symbol = |x: u16, y: u16| buffer[(x, y)].symbol().to_owned();
        assert_eq!(symbol(0, 0), "#");
        assert_eq!(symbol(4, 4), "h");
        assert_eq!(symbol(4, 5), "S");
        assert_eq!(symbol(7, 7), "@");
    }
}
