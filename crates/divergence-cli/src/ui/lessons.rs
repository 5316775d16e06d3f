//! Lessons pane for the selected day, and the notes pane under it.

use divergence_core::{subject::Subject, time::format_date};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::Theme;
use crate::app::App;

/// Swatch colour for a subject, falling back to cyan for unparseable values.
fn swatch(subject: &Subject) -> Color { subject.colour.parse().unwrap_or(Color::Cyan) }

fn duration_minutes(subject: &Subject) -> u16 {
  subject
    .ends_at
    .minutes_since_midnight()
    .saturating_sub(subject.starts_at.minutes_since_midnight())
}

/// Render the selected day's lessons into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  let lessons = app.lessons();
  let now = app.now();
  let title = format!(
    " {} {} ",
    app.selected_day.format("%A"),
    format_date(app.selected_day)
  );
  let block = theme.block(title);

  if lessons.is_empty() {
    f.render_widget(
      Paragraph::new("No lessons.").style(theme.muted).block(block),
      area,
    );
    return;
  }

  let items: Vec<ListItem> = lessons
    .iter()
    .map(|s| {
      let running = if app.selected_day == now.date() && s.in_progress(now.date(), now.time().into()) {
        "  now"
      } else {
        ""
      };
      let mut lines = vec![Line::from(vec![
        Span::styled("█ ", Style::default().fg(swatch(s))),
        Span::styled(format!("{}-{}  ", s.starts_at, s.ends_at), theme.muted),
        Span::styled(s.name.clone(), theme.heading),
        Span::styled(format!("  {}", s.teacher), theme.text),
        Span::styled(format!("  {} min", duration_minutes(s)), theme.muted),
        Span::styled(running, theme.heading),
      ])];
      if theme.double_space {
        lines.push(Line::from(""));
      }
      ListItem::new(lines)
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.lesson_cursor.min(lessons.len() - 1)));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(theme.selected)
      .highlight_symbol("> "),
    area,
    &mut state,
  );
}

/// Render the highlighted lesson's description and notes into `area`.
pub fn draw_notes(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  let Some(subject) = app.cursor_lesson() else {
    f.render_widget(
      Paragraph::new("").style(theme.text).block(theme.block(" Notes ".into())),
      area,
    );
    return;
  };

  let mut lines: Vec<Line> = Vec::new();
  if let Some(description) = &subject.description {
    lines.push(Line::styled(description.clone(), theme.text));
    lines.push(Line::from(""));
  }
  if subject.notes.is_empty() {
    lines.push(Line::styled("No notes yet.", theme.muted));
  }
  for note in &subject.notes {
    lines.push(Line::styled(note.date.clone(), theme.muted));
    lines.push(Line::styled(note.content.clone(), theme.text));
    if theme.double_space {
      lines.push(Line::from(""));
    }
  }

  f.render_widget(
    Paragraph::new(lines)
      .block(theme.block(format!(" {} notes ", subject.name)))
      .wrap(Wrap { trim: false }),
    area,
  );
}
