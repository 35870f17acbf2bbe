//! Search view component
//!
//! Search box in the header, and a results area with one tab per kind.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, InputMode, SearchState};
use crate::models::MediaKind;
use crate::ui::browser::CardList;
use crate::ui::Theme;

/// Text of the search box, with a bar at the cursor while editing
pub fn search_box_text(search: &SearchState, editing: bool) -> String {
    if editing {
        let split = search
            .query
            .char_indices()
            .nth(search.cursor)
            .map(|(i, _)| i)
            .unwrap_or(search.query.len());
        let (before, after) = search.query.split_at(split);
        format!("⌕ {}│{}", before, after)
    } else if search.query.is_empty() {
        "⌕ Type / to search movies, TV shows and people...".to_string()
    } else {
        format!("⌕ {}", search.query)
    }
}

pub fn render_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let border_style = if editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_box = Paragraph::new(search_box_text(&app.search, editing))
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, area);
}

/// "Movies (20) │ TV Shows │ People" with the active tab highlighted
fn tab_line(search: &SearchState) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, kind) in MediaKind::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Theme::dimmed()));
        }
        let tab = search.tab(*kind);
        let label = match &tab.query {
            Some(_) => format!(" {} ({}) ", kind.tab_label(), tab.view.list.len()),
            None => format!(" {} ", kind.tab_label()),
        };
        let style = if *kind == search.kind {
            Theme::tab_active()
        } else {
            Theme::dimmed()
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(tab_line(&app.search)), chunks[0]);

    let tab = app.search.active();
    if tab.loading.is_loading() {
        let message = tab.loading.message().unwrap_or("Searching...");
        let loading = Paragraph::new(format!("⟳ {}", message))
            .style(Theme::loading())
            .alignment(Alignment::Center)
            .block(results_block(app));
        frame.render_widget(loading, chunks[1]);
        return;
    }

    if tab.query.is_none() {
        let hint = Paragraph::new(if app.search.submitted.is_empty() {
            "Press Enter to search"
        } else {
            "Tab to load this tab"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center)
        .block(results_block(app));
        frame.render_widget(hint, chunks[1]);
        return;
    }

    CardList::new(results_title(app), &tab.view)
        .focused(app.input_mode == InputMode::Normal)
        .render(frame, chunks[1]);
}

fn results_title(app: &App) -> String {
    format!("RESULTS: \"{}\"", app.search.submitted)
}

fn results_block(app: &App) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", results_title(app)), Theme::title()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_box_cursor() {
        let mut search = SearchState::default();
        for c in "héat".chars() {
            search.insert(c);
        }
        search.cursor_left();
        assert_eq!(search_box_text(&search, true), "⌕ héa│t");
        assert_eq!(search_box_text(&search, false), "⌕ héat");
    }

    #[test]
    fn test_search_box_placeholder() {
        let search = SearchState::default();
        assert!(search_box_text(&search, false).contains("Type / to search"));
    }
}
