//! Week pane on the left, one row per day.

use divergence_core::time::format_date;
use ratatui::{
  Frame,
  layout::Rect,
  text::{Line, Span},
  widgets::{List, ListItem, ListState},
};

use super::Theme;
use crate::app::App;

/// Render the selected week into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
  let days = app.week();
  let today = app.now().date();

  let block = theme.block(" Week ".into());

  let mut selected = None;
  let items: Vec<ListItem> = days
    .iter()
    .enumerate()
    .map(|(i, d)| {
      if d.date == app.selected_day {
        selected = Some(i);
      }
      let marker = if d.date == today { "•" } else { " " };
      let count = match d.lessons.len() {
        0 => String::new(),
        1 => "1 lesson".into(),
        n => format!("{n} lessons"),
      };
      let mut lines = vec![Line::from(vec![
        Span::styled(format!("{marker} {:<9} {} ", d.date.format("%A"), format_date(d.date)), theme.text),
        Span::styled(count, theme.muted),
      ])];
      if theme.double_space {
        lines.push(Line::from(""));
      }
      ListItem::new(lines)
    })
    .collect();

  let mut state = ListState::default();
  state.select(selected);

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(theme.selected),
    area,
    &mut state,
  );
}
