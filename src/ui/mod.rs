//! Terminal UI components
//!
//! Built with ratatui. Every screen is drawn from the [`App`] alone; nothing
//! here mutates state.

pub mod browser;
pub mod detail;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, AppState, CreditsPane, HomePane, InputMode, LoadingState};
use crate::models::{Feed, MediaKind, TimeWindow};
use browser::CardList;

/// Rows taken by the header, status bar, list borders and the search tab line
const CHROME_ROWS: u16 = 3 + 1 + 2 + 1;

/// How many list rows fit on a terminal of `height` rows
pub fn list_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS).max(1) as usize
}

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("LM", Theme::title()),
        Span::styled("DB", Theme::secondary().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    search::render_search_box(frame, header_chunks[1], app);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.state {
        AppState::Home => render_home(frame, area, app),
        AppState::Listing(feed) => render_listing(frame, area, app, feed),
        AppState::Search => search::render_results(frame, area, app),
        AppState::Detail(_) => detail::render(frame, area, app.detail.as_ref()),
        AppState::Credits(target) => render_credits(frame, area, app, target.kind),
        AppState::Reviews(_) => render_reviews(frame, area, app),
    }
}

/// Draws the loading or error placeholder for a screen request. Returns
/// false when the screen has its data.
fn render_loading(frame: &mut Frame, area: Rect, title: &str, loading: &LoadingState) -> bool {
    let (text, style, hint) = match loading {
        LoadingState::Idle => return false,
        LoadingState::Loading(msg) => (
            format!("⟳ {}", msg.as_deref().unwrap_or("Loading...")),
            Theme::loading(),
            None,
        ),
        LoadingState::Error(msg) => (
            format!("✗ {}", msg),
            Theme::error(),
            Some("r try again · esc go back"),
        ),
        LoadingState::NotFound(msg) => (msg.clone(), Theme::error(), Some("esc go back")),
    };

    let mut lines = vec![Line::from(""), Line::from(Span::styled(text, style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, Theme::keybind_desc())));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border())
                .title(Span::styled(format!(" {} ", title), Theme::title())),
        );
    frame.render_widget(paragraph, area);
    true
}

fn halves(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    [chunks[0], chunks[1]]
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let trending = Feed::TrendingMovies(app.window).title().to_uppercase();
    if render_loading(frame, area, "HOME", &app.home.loading) {
        return;
    }

    let [left, right] = halves(area);
    CardList::new("POPULAR MOVIES", &app.home.popular)
        .focused(app.home.pane == HomePane::Popular)
        .render(frame, left);
    CardList::new(trending, &app.home.trending)
        .focused(app.home.pane == HomePane::Trending)
        .render(frame, right);
}

fn render_listing(frame: &mut Frame, area: Rect, app: &App, feed: Feed) {
    let title = feed.title().to_uppercase();
    if render_loading(frame, area, &title, &app.listing.loading) {
        return;
    }
    CardList::new(title, &app.listing.view).render(frame, area);
}

fn render_credits(frame: &mut Frame, area: Rect, app: &App, kind: MediaKind) {
    let credits = &app.credits;
    let heading = if credits.title.is_empty() {
        "CREDITS".to_string()
    } else {
        credits.title.to_uppercase()
    };
    if render_loading(frame, area, &heading, &credits.loading) {
        return;
    }

    let (cast, crew) = match kind {
        MediaKind::Person => ("ACTING", "PRODUCTION"),
        _ => ("CAST", "CREW"),
    };

    let [left, right] = halves(area);
    CardList::new(format!("{} · {}", heading, cast), &credits.cast)
        .focused(credits.pane == CreditsPane::Cast)
        .render(frame, left);
    CardList::new(crew, &credits.crew)
        .focused(credits.pane == CreditsPane::Crew)
        .render(frame, right);
}

fn render_reviews(frame: &mut Frame, area: Rect, app: &App) {
    let reviews = &app.reviews;
    let heading = if reviews.title.is_empty() {
        "REVIEWS".to_string()
    } else {
        format!("REVIEWS · {}", reviews.title.to_uppercase())
    };
    if render_loading(frame, area, &heading, &reviews.loading) {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    CardList::new(heading, &reviews.view).render(frame, chunks[0]);

    let mut lines = Vec::new();
    if let Some(review) = reviews.view.selected() {
        let mut byline = vec![
            Span::styled("▶ ", Theme::accent()),
            Span::styled(review.author.clone(), Theme::title()),
        ];
        if let Some(date) = review.date() {
            byline.push(Span::styled(format!("  {}", date), Theme::year()));
        }
        if let Some(rating) = review.author_details.rating {
            byline.push(Span::styled(format!("  ★ {:.0}/10", rating), Theme::rating(rating)));
        }
        lines.push(Line::from(byline));
        lines.push(Line::from(""));
        for line in review.content.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Theme::text())));
        }
    }

    let content = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border())
                .title(Span::styled(" REVIEW ", Theme::title())),
        );
    frame.render_widget(content, chunks[1]);
}

/// Short screen name for the status bar
pub fn state_label(state: &AppState) -> String {
    match state {
        AppState::Home => "HOME".into(),
        AppState::Listing(feed) => feed.title().to_uppercase(),
        AppState::Search => "SEARCH".into(),
        AppState::Detail(target) => target.kind.badge().into(),
        AppState::Credits(_) => "CREDITS".into(),
        AppState::Reviews(_) => "REVIEWS".into(),
    }
}

fn key_help(app: &App) -> &'static str {
    if app.input_mode == InputMode::Editing {
        return " enter:search  esc:done ";
    }
    match app.state {
        AppState::Home => " q:quit  /:search  tab:switch  1-8:feeds  m:more ",
        AppState::Listing(_) => " q:quit  /:search  enter:open  m:more  esc:back ",
        AppState::Search => " q:quit  i:edit  tab:next tab  enter:open  esc:back ",
        AppState::Detail(target) if target.kind == MediaKind::Person => {
            " q:quit  c:filmography  enter:open  esc:back "
        }
        AppState::Detail(_) => " q:quit  c:credits  v:reviews  enter:open  esc:back ",
        AppState::Credits(_) => " q:quit  tab:switch  enter:open  esc:back ",
        AppState::Reviews(_) => " q:quit  m:more  esc:back ",
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let window = match app.window {
        TimeWindow::Day => " today ",
        TimeWindow::Week => " this week ",
    };

    let status_line = Line::from(vec![
        mode_indicator,
        Span::styled(format!(" {} ", state_label(&app.state)), Theme::dimmed()),
        Span::styled(window, Theme::secondary()),
        Span::raw(" │ "),
        Span::styled(key_help(app), Theme::dimmed()),
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Target;

    #[test]
    fn test_list_rows() {
        assert_eq!(list_rows(40), 33);
        assert_eq!(list_rows(3), 1);
    }

    #[test]
    fn test_state_label() {
        assert_eq!(state_label(&AppState::Home), "HOME");
        assert_eq!(
            state_label(&AppState::Listing(Feed::TopRatedTv)),
            "TOP RATED TV SHOWS"
        );
        assert_eq!(
            state_label(&AppState::Detail(Target::new(MediaKind::Person, 1))),
            "PERSON"
        );
    }
}
