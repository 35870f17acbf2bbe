//! UI rendering tests for LMDB
//!
//! Renders whole screens into a ratatui `TestBackend` and checks what ends up
//! in the buffer.
//!
//! ## Test Cases
//! - test_theme_*: palette contrast against the background
//! - test_layout_*: renders at 80x24 (min), 200x50 (large) and degenerate sizes
//! - test_home_*: loading placeholder, both lists, list footers
//! - test_search_*: placeholder, tabs, results and the loading state
//! - test_detail_*: not found, failed and loaded pages
//! - test_error_popup: popup over any screen

use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;

use lmdb_tui::app::{DetailState, Event, InputMode};
use lmdb_tui::list::ListSeed;
use lmdb_tui::ui::theme::{color_to_rgb, contrast_ratio, meets_wcag_aa, meets_wcag_aa_large};
use lmdb_tui::ui::{self, Theme};
use lmdb_tui::{App, MediaItem, MediaKind, Movie, MovieDetails, Paginated, Target, TimeWindow};

// =============================================================================
// Helpers
// =============================================================================

fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

/// Draw the app and return the screen as text, one line per row
fn draw(app: &App, width: u16, height: u16) -> String {
    let mut terminal = test_terminal(width, height);
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    let mut text = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn movies(first: u64, count: u64, total_pages: u32) -> ListSeed<MediaItem> {
    let results: Vec<_> = (first..first + count)
        .map(|id| json!({"id": id, "title": format!("Movie {}", id), "release_date": "2001-01-01"}))
        .collect();
    let page: Paginated<Movie> = serde_json::from_value(json!({
        "page": 1,
        "total_pages": total_pages,
        "total_results": count,
        "results": results,
    }))
    .unwrap();
    ListSeed::from_page(page.map(MediaItem::from), None)
}

/// App on a loaded home screen
fn home_app() -> App {
    let mut app = App::new(TimeWindow::Week);
    app.take_requests();
    app.apply(Event::Home {
        popular: movies(1, 20, 5),
        trending: movies(100, 3, 1),
    });
    app.take_pages();
    app
}

// =============================================================================
// Theme
// =============================================================================

#[test]
fn test_theme_text_contrast() {
    let bg = color_to_rgb(Theme::BACKGROUND).unwrap();
    for (name, color) in [("TEXT", Theme::TEXT), ("SECONDARY", Theme::SECONDARY)] {
        let fg = color_to_rgb(color).unwrap();
        assert!(
            meets_wcag_aa(fg, bg),
            "{} on BACKGROUND contrast {:.2}:1 must be >= 4.5:1",
            name,
            contrast_ratio(fg, bg)
        );
    }
}

#[test]
fn test_theme_accent_contrast() {
    let bg = color_to_rgb(Theme::BACKGROUND).unwrap();
    let colors = [
        ("PRIMARY", Theme::PRIMARY),
        ("ACCENT", Theme::ACCENT),
        ("ERROR", Theme::ERROR),
        ("DIM", Theme::DIM),
        ("RATING_HIGH", Theme::RATING_HIGH),
        ("RATING_MID", Theme::RATING_MID),
    ];
    for (name, color) in colors {
        let fg = color_to_rgb(color).unwrap();
        assert!(
            meets_wcag_aa_large(fg, bg),
            "{} on BACKGROUND contrast {:.2}:1 must be >= 3:1",
            name,
            contrast_ratio(fg, bg)
        );
    }
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_layout_minimum_size() {
    let screen = draw(&home_app(), 80, 24);
    assert!(screen.contains("LMDB"));
    assert!(screen.contains("SEARCH"));
    assert!(screen.contains("POPULAR MOVIES"));
    assert!(screen.contains("NORMAL"));
}

#[test]
fn test_layout_large_size() {
    let screen = draw(&home_app(), 200, 50);
    assert!(screen.contains("POPULAR MOVIES (1/20)"));
    assert!(screen.contains("TRENDING MOVIES THIS WEEK (1/3)"));
    assert!(screen.contains("Movie 20"));
    assert!(screen.contains("this week"));
}

#[test]
fn test_layout_tiny_terminal_does_not_panic() {
    let app = home_app();
    for (w, h) in [(1, 1), (10, 3), (20, 5), (40, 8)] {
        draw(&app, w, h);
    }
}

#[test]
fn test_list_rows_match_rendered_list() {
    // At 80x24 the popular list shows 18 rows: 24 minus the header, status
    // bar and list borders. list_rows is the same minus the search tab line.
    let screen = draw(&home_app(), 80, 24);
    assert!(screen.contains("Movie 18"));
    assert!(!screen.contains("Movie 19"));
    assert_eq!(ui::list_rows(24), 17);
}

// =============================================================================
// Home
// =============================================================================

#[test]
fn test_home_loading_placeholder() {
    let app = App::new(TimeWindow::Day);
    let screen = draw(&app, 80, 24);
    assert!(screen.contains("Loading movies..."));
    assert!(screen.contains("today"));
}

#[test]
fn test_home_list_footers() {
    let screen = draw(&home_app(), 200, 50);
    // Popular has more pages, trending is a single short page
    assert!(screen.contains("Load More"));
    assert!(screen.contains("No more results"));
}

#[test]
fn test_home_selection_marker_follows_focus() {
    let mut app = home_app();
    let screen = draw(&app, 200, 50);
    assert!(screen.contains("▸ Movie 1"));
    assert!(!screen.contains("▸ Movie 100"));

    app.handle_key(crossterm::event::KeyEvent::new(
        crossterm::event::KeyCode::Tab,
        crossterm::event::KeyModifiers::NONE,
    ));
    let screen = draw(&app, 200, 50);
    assert!(screen.contains("▸ Movie 100"));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_placeholder_and_tabs() {
    let mut app = home_app();
    app.focus_search();
    app.input_mode = InputMode::Normal;

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("Type / to search movies, TV shows and people..."));
    assert!(screen.contains("Movies"));
    assert!(screen.contains("TV Shows"));
    assert!(screen.contains("People"));
    assert!(screen.contains("Press Enter to search"));
}

#[test]
fn test_search_editing_shows_cursor() {
    let mut app = home_app();
    app.focus_search();
    for c in "alien".chars() {
        app.search.insert(c);
    }

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("⌕ alien│"));
    assert!(screen.contains("INSERT"));
}

#[test]
fn test_search_loading_and_results() {
    let mut app = home_app();
    app.focus_search();
    for c in "alien".chars() {
        app.search.insert(c);
    }
    app.submit_search();
    app.input_mode = InputMode::Normal;

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("Searching..."));

    let query = app.search.submitted.clone();
    app.apply(Event::Search {
        query,
        kind: MediaKind::Movie,
        seed: movies(1, 4, 1),
    });
    let screen = draw(&app, 100, 30);
    assert!(screen.contains("RESULTS: \"alien\""));
    assert!(screen.contains("Movies (4)"));
    assert!(screen.contains("Movie 4"));
    assert!(screen.contains("No more results"));
}

#[test]
fn test_search_no_results() {
    let mut app = home_app();
    app.focus_search();
    app.search.insert('x');
    app.submit_search();
    let query = app.search.submitted.clone();
    app.apply(Event::Search {
        query,
        kind: MediaKind::Movie,
        seed: ListSeed::fixed(Vec::new()),
    });

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("No results found"));
}

// =============================================================================
// Detail
// =============================================================================

#[test]
fn test_detail_not_found() {
    let mut app = home_app();
    let target = Target::new(MediaKind::Tv, 42);
    app.open(target);
    assert!(draw(&app, 80, 24).contains("Loading..."));

    app.apply(Event::Details {
        target,
        outcome: Ok(None),
    });
    let screen = draw(&app, 80, 24);
    assert!(screen.contains("No tv with id 42"));
    assert!(screen.contains("esc go back"));
}

#[test]
fn test_detail_failed() {
    let mut app = home_app();
    let target = Target::new(MediaKind::Movie, 7);
    app.open(target);
    app.apply(Event::Details {
        target,
        outcome: Err("movie 7 has no credits".into()),
    });

    let screen = draw(&app, 80, 24);
    assert!(screen.contains("✗ movie 7 has no credits"));
    assert!(screen.contains("r try again"));
}

#[test]
fn test_detail_loaded_movie() {
    let mut app = home_app();
    let target = Target::new(MediaKind::Movie, 550);
    app.open(target);

    let details: MovieDetails = serde_json::from_value(json!({
        "id": 550,
        "title": "Fight Club",
        "release_date": "1999-10-15",
        "runtime": 139,
        "vote_average": 8.4,
        "vote_count": 26280,
        "overview": "A ticking-time-bomb insomniac and a slippery soap salesman.",
        "credits": {"cast": [], "crew": []}
    }))
    .unwrap();
    app.detail = Some(DetailState::Movie {
        details: Box::new(details),
        recommendations: lmdb_tui::app::ListView::from_seed(movies(807, 2, 1)),
    });

    let screen = draw(&app, 160, 40);
    assert!(screen.contains("Fight Club (1999)"));
    assert!(screen.contains("RECOMMENDATIONS"));
    assert!(screen.contains("Movie 808"));
    assert!(screen.contains("c:credits"));
}

#[test]
fn test_credits_not_found() {
    let mut app = home_app();
    let target = Target::new(MediaKind::Movie, 550);
    app.open_credits(target);
    app.apply(Event::Credits {
        target,
        outcome: Ok(None),
    });

    let screen = draw(&app, 80, 24);
    assert!(screen.contains("No credits for movie 550"));
    assert!(screen.contains("esc go back"));
    assert!(!screen.contains("try again"));
}

#[test]
fn test_credits_failure_offers_retry() {
    let mut app = home_app();
    let target = Target::new(MediaKind::Tv, 1399);
    app.open_credits(target);
    app.apply(Event::Credits {
        target,
        outcome: Err("tv 1399 has no credits".into()),
    });

    let screen = draw(&app, 80, 24);
    assert!(screen.contains("✗ tv 1399 has no credits"));
    assert!(screen.contains("r try again"));
}

// =============================================================================
// Error popup
// =============================================================================

#[test]
fn test_error_popup() {
    let mut app = home_app();
    app.set_error("TMDB API key is missing");

    let screen = draw(&app, 80, 24);
    assert!(screen.contains("ERROR"));
    assert!(screen.contains("TMDB API key is missing"));

    app.clear_error();
    assert!(!draw(&app, 80, 24).contains("TMDB API key is missing"));
}
