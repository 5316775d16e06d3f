//! TUI rendering: header, week, lessons, notes and status bar.

pub mod lessons;
pub mod week;

use divergence_core::store::DisplayMode;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

// ─── Theme ────────────────────────────────────────────────────────────────────

/// Styles for the current [`DisplayMode`].
///
/// Dyslexia mode avoids bold and italic text, uses a cream-on-charcoal palette
/// and leaves a blank line between list rows.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
  pub text:         Style,
  pub muted:        Style,
  pub heading:      Style,
  pub selected:     Style,
  pub bar:          Style,
  pub border:       Style,
  pub double_space: bool,
}

impl Theme {
  pub fn for_mode(mode: DisplayMode) -> Self {
    match mode {
      DisplayMode::Standard => Self {
        text:         Style::default(),
        muted:        Style::default().fg(Color::DarkGray),
        heading:      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        selected:     Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
        bar:          Style::default().fg(Color::White).bg(Color::DarkGray),
        border:       Style::default().fg(Color::DarkGray),
        double_space: false,
      },
      DisplayMode::Dyslexia => {
        let cream = Color::Rgb(0xfd, 0xf6, 0xe3);
        let charcoal = Color::Rgb(0x2b, 0x2b, 0x2b);
        Self {
          text:         Style::default().fg(cream).bg(charcoal),
          muted:        Style::default().fg(Color::Rgb(0xc8, 0xc0, 0xa8)).bg(charcoal),
          heading:      Style::default().fg(Color::Rgb(0xff, 0xd7, 0x5f)).bg(charcoal),
          selected:     Style::default().fg(charcoal).bg(cream),
          bar:          Style::default().fg(charcoal).bg(Color::Rgb(0xff, 0xd7, 0x5f)),
          border:       Style::default().fg(cream).bg(charcoal),
          double_space: true,
        }
      }
    }
  }

  fn block(&self, title: String) -> Block<'static> {
    Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(self.border)
      .style(self.text)
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let theme = Theme::for_mode(app.state.display_mode());
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, &theme);
  draw_body(f, rows[1], app, &theme);
  draw_status(f, rows[2], app, &theme);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  let now = app.now();
  let left = Span::styled(
    format!(" divergence  {}", now.format("%A %d/%m/%Y %H:%M")),
    theme.bar,
  );
  let right = Span::styled(format!("{} ", next_lesson_label(app)), theme.bar);

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::styled(" ".repeat(pad as usize), theme.bar), right]);
  f.render_widget(Paragraph::new(line).style(theme.bar), area);
}

fn next_lesson_label(app: &App) -> String {
  match app.next_lesson() {
    Some(s) => format!("Next: {} at {}", s.name, s.starts_at.display_12h()),
    None => "No upcoming lessons".into(),
  }
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  // Week pane (30%) beside lessons over notes (70%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
    .split(area);

  let right = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(cols[1]);

  week::draw(f, cols[0], app, theme);
  lessons::draw(f, right[0], app, theme);
  lessons::draw_notes(f, right[1], app, theme);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  let status = if app.status_msg.is_empty() {
    "jk day  JK/Tab lesson  [ ] week  t today  d dyslexia  q quit"
  } else {
    app.status_msg.as_str()
  };

  let mode_span = Span::styled(format!(" {} ", app.state.display_mode()), theme.selected);
  let hint_span = Span::styled(format!("  {status}"), theme.muted);

  f.render_widget(Paragraph::new(Line::from(vec![mode_span, hint_span])).style(theme.text), area);
}
