use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{CollisionType, PixelCanvas, Status, Surface};
use crate::metrics::{PlayStats, format_clock};
use crate::session::Snapshot;

/// Turn a bitmap into text, two pixel rows per line using half blocks
pub fn canvas_lines(canvas: &PixelCanvas) -> Vec<String> {
    (0..canvas.height())
        .step_by(2)
        .map(|y| {
            (0..canvas.width())
                .map(|x| match (canvas.is_filled(x, y), canvas.is_filled(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect()
        })
        .collect()
}

/// Terminal cells needed for a bitmap inside a one-cell border
///
/// Saturates at `u16::MAX`; ratatui clips anything larger to the frame.
pub fn framed_size(canvas: &PixelCanvas) -> (u16, u16) {
    let width = u16::try_from(canvas.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from((canvas.height().max(0) as u32).div_ceil(2)).unwrap_or(u16::MAX);
    (width.saturating_add(2), rows.saturating_add(2))
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, stats: &PlayStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Playground
                Constraint::Length(2), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, stats), chunks[0]);

        let (width, height) = framed_size(&snapshot.canvas);
        let playground_area = Self::centered(chunks[1], width, height);

        match snapshot.status {
            Status::Running => {
                frame.render_widget(self.render_playground(snapshot), playground_area)
            }
            status => frame.render_widget(
                self.render_game_over(status, snapshot, stats),
                playground_area,
            ),
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [cell] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);
        cell
    }

    fn render_playground(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let lines: Vec<Line> = canvas_lines(&snapshot.canvas)
            .into_iter()
            .map(|row| Line::styled(row, Style::default().fg(Color::Green)))
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, stats: &PlayStats) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Level: ", label),
            Span::styled(
                snapshot.level.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.length.to_string(), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{} ms", snapshot.interval.as_millis()), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(
                format!(
                    "{} ({} on level)",
                    format_clock(stats.play_time()),
                    format_clock(stats.level_time())
                ),
                value,
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(
                format!("level {}, length {}", stats.best_level(), stats.longest_snake()),
                value,
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        status: Status,
        snapshot: &Snapshot,
        stats: &PlayStats,
    ) -> Paragraph<'static> {
        let (title, reason, color) = match status {
            Status::Cleared => ("YOU WIN", "The snake fills the playground", Color::Green),
            Status::GameOver(CollisionType::Wall) => ("GAME OVER", "Hit the wall", Color::Red),
            Status::GameOver(CollisionType::SelfCollision) => {
                ("GAME OVER", "Bit its own tail", Color::Red)
            }
            Status::Running => ("", "", Color::White),
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Level reached: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.level.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("    Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} finished, {} won", stats.games_finished(), stats.wins()),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to turn | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
