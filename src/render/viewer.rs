use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::io::{Stderr, stderr};

use crate::env::Screen;

/// Episode information shown above the game screen
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub title: String,
    pub episode_reward: f32,
    pub lives: u32,
    pub steps: usize,
}

/// Terminal window for human rendering
///
/// Switches to the alternate screen when created and restores the terminal
/// on [`Viewer::close`] or when dropped.
pub struct Viewer {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    closed: bool,
}

impl Viewer {
    pub fn new() -> Result<Self> {
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        Ok(Self {
            terminal,
            closed: false,
        })
    }

    pub fn draw(&mut self, screen: &Screen, status: &Status) -> Result<()> {
        self.terminal
            .draw(|frame| render(frame, screen, status))
            .context("Failed to draw frame")?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn render(frame: &mut Frame, screen: &Screen, status: &Status) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Game screen
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    frame.render_widget(status_line(status), chunks[0]);

    let area = chunks[1];
    let lines = screen_lines(
        screen,
        area.width.saturating_sub(2) as usize,
        area.height.saturating_sub(2) as usize,
    );
    let game = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", status.title)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(game, area);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Ctrl+C", Style::default().fg(Color::Red)),
        Span::raw(" to abort"),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn status_line(status: &Status) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{:.2}", status.episode_reward),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("Lives: ", Style::default().fg(Color::Yellow)),
        Span::styled(status.lives.to_string(), Style::default().fg(Color::White)),
        Span::raw("    "),
        Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
        Span::styled(status.steps.to_string(), Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Center)
}

/// Scale `screen` into at most `max_cols` × `max_rows` terminal cells
///
/// Every cell shows two vertically stacked pixels with an upper half block,
/// foreground for the top pixel and background for the bottom one.
pub fn screen_lines(screen: &Screen, max_cols: usize, max_rows: usize) -> Vec<Line<'static>> {
    if max_cols == 0 || max_rows == 0 || screen.width() == 0 || screen.height() == 0 {
        return Vec::new();
    }

    // Largest scale that fits both directions, never above native size
    let scale = (max_cols as f32 / screen.width() as f32)
        .min((max_rows * 2) as f32 / screen.height() as f32)
        .min(1.0);
    let cols = ((screen.width() as f32 * scale) as usize).max(1);
    let pixel_rows = ((screen.height() as f32 * scale) as usize).max(1);

    let sample = |x: usize, y: usize| -> Color {
        let sx = (x * screen.width() / cols).min(screen.width() - 1);
        let sy = (y * screen.height() / pixel_rows).min(screen.height() - 1);
        let v = screen.get(sx, sy);
        Color::Rgb(v, v, v)
    };

    (0..pixel_rows.div_ceil(2))
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|x| {
                    let top = sample(x, row * 2);
                    let bottom = if row * 2 + 1 < pixel_rows {
                        sample(x, row * 2 + 1)
                    } else {
                        Color::Reset
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
