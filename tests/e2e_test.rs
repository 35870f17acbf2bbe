//! End-to-end tests
//!
//! Drive the app the way the event loop does: keys go into [`App`], queued
//! requests and page fetches run against a mocked TMDB, and the finished
//! events are applied back. Nothing here touches a terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};

use lmdb_tui::app::{AppState, DetailState, InputMode, LoadingState};
use lmdb_tui::list::{Footer, ListStatus};
use lmdb_tui::runtime::{execute, run_page};
use lmdb_tui::{App, MediaKind, Target, TimeWindow, TmdbClient};

// =============================================================================
// Helpers
// =============================================================================

fn client(server: &ServerGuard) -> Arc<TmdbClient> {
    Arc::new(TmdbClient::with_base_url("test_key", server.url()))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(key(code));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Run everything the app has queued, apply the results, and repeat until
/// nothing new is queued
async fn settle(app: &mut App, client: &Arc<TmdbClient>) {
    loop {
        let requests = app.take_requests();
        let pages = app.take_pages();
        if requests.is_empty() && pages.is_empty() {
            break;
        }
        for request in requests {
            let event = execute(Arc::clone(client), request).await;
            app.apply(event);
        }
        for page in pages {
            let event = run_page(page).await;
            app.apply(event);
        }
    }
}

/// A page of movies with ids `first..first + count`
fn movie_page(page: u32, total_pages: u32, first: u64, count: u64) -> String {
    let results: Vec<String> = (first..first + count)
        .map(|id| {
            format!(
                r#"{{"id": {}, "title": "Movie {}", "release_date": "2001-01-01", "vote_average": 7.0}}"#,
                id, id
            )
        })
        .collect();
    format!(
        r#"{{"page": {}, "total_pages": {}, "total_results": {}, "results": [{}]}}"#,
        page,
        total_pages,
        total_pages * 20,
        results.join(",")
    )
}

fn movie_details(id: u64) -> String {
    format!(
        r#"{{
            "id": {id},
            "title": "Movie {id}",
            "release_date": "2001-01-01",
            "runtime": 120,
            "vote_average": 7.5,
            "vote_count": 100,
            "credits": {{
                "cast": [{{"id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0}}],
                "crew": [{{"id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing"}}]
            }},
            "recommendations": {{"page": 1, "total_pages": 1, "total_results": 1, "results": [{{"id": 807, "title": "Se7en"}}]}},
            "reviews": {{"page": 1, "total_pages": 0, "total_results": 0, "results": []}}
        }}"#
    )
}

async fn mock_home(server: &mut ServerGuard) -> (Mock, Mock) {
    let popular = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(movie_page(1, 2, 1, 20))
        .create_async()
        .await;
    let trending = server
        .mock("GET", "/trending/movie/week")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(movie_page(1, 1, 100, 3))
        .create_async()
        .await;
    (popular, trending)
}

// =============================================================================
// Browsing
// =============================================================================

#[tokio::test]
async fn test_home_scroll_detail_credits_reviews() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    let (popular, trending) = mock_home(&mut server).await;

    let mut app = App::new(TimeWindow::Week);
    assert!(app.home.loading.is_loading());
    settle(&mut app, &client).await;

    popular.assert_async().await;
    trending.assert_async().await;
    assert_eq!(app.home.loading, LoadingState::Idle);
    assert_eq!(app.home.popular.list.len(), 20);
    assert_eq!(app.home.trending.list.len(), 3);
    assert_eq!(app.home.popular.list.footer(), Footer::LoadMore);

    // Jumping to the end brings the footer into view and loads page 2
    let second = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(movie_page(2, 2, 21, 10))
        .expect(1)
        .create_async()
        .await;
    press(&mut app, KeyCode::Char('G'));
    assert_eq!(app.home.popular.list.status(), ListStatus::Loading);
    settle(&mut app, &client).await;

    second.assert_async().await;
    assert_eq!(app.home.popular.list.len(), 30);
    assert_eq!(app.home.popular.list.status(), ListStatus::Exhausted);
    assert_eq!(app.home.popular.list.footer(), Footer::NoMoreResults);

    // Scrolling past the end again does nothing more
    press(&mut app, KeyCode::Char('G'));
    assert!(app.take_pages().is_empty());

    // Open the last movie
    let details = server
        .mock("GET", "/movie/30")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(movie_details(30))
        .create_async()
        .await;
    press(&mut app, KeyCode::Enter);
    let target = Target::new(MediaKind::Movie, 30);
    assert_eq!(app.state, AppState::Detail(target));
    settle(&mut app, &client).await;

    details.assert_async().await;
    match &app.detail {
        Some(DetailState::Movie {
            details,
            recommendations,
        }) => {
            assert_eq!(details.title, "Movie 30");
            assert_eq!(recommendations.list.len(), 1);
            assert_eq!(recommendations.list.status(), ListStatus::Exhausted);
        }
        _ => panic!("expected a loaded movie"),
    }

    // Credits
    let credits = server
        .mock("GET", "/movie/30/credits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "cast": [
                    {"id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0},
                    {"id": 287, "name": "Brad Pitt", "character": "Tyler Durden", "order": 1}
                ],
                "crew": [{"id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing"}]
            }"#,
        )
        .create_async()
        .await;
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.state, AppState::Credits(target));
    settle(&mut app, &client).await;

    credits.assert_async().await;
    assert_eq!(app.credits.cast.list.len(), 2);
    assert_eq!(app.credits.crew.list.len(), 1);
    assert_eq!(app.credits.loading, LoadingState::Idle);

    // Back to the detail page without refetching it
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state, AppState::Detail(target));
    assert!(app.take_requests().is_empty());

    // Reviews
    let reviews = server
        .mock("GET", "/movie/30/reviews")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "page": 1, "total_pages": 1, "total_results": 1,
                "results": [{
                    "id": "r1",
                    "author": "Goddard",
                    "author_details": {"username": "Goddard", "rating": 8.0},
                    "content": "Pretty awesome movie.",
                    "created_at": "2018-06-09T17:51:53.359Z"
                }]
            }"#,
        )
        .create_async()
        .await;
    press(&mut app, KeyCode::Char('v'));
    assert_eq!(app.state, AppState::Reviews(target));
    settle(&mut app, &client).await;

    reviews.assert_async().await;
    assert_eq!(app.reviews.view.list.len(), 1);
    assert_eq!(
        app.reviews.view.selected().map(|r| r.author.as_str()),
        Some("Goddard")
    );

    // All the way home
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state, AppState::Home);
    assert!(!press_back(&mut app));
}

fn press_back(app: &mut App) -> bool {
    app.handle_key(key(KeyCode::Esc))
}

#[tokio::test]
async fn test_listing_feed_pages_through() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    let first = server
        .mock("GET", "/movie/top_rated")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(movie_page(1, 3, 1, 20))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/movie/top_rated")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(movie_page(2, 3, 21, 20))
        .create_async()
        .await;

    // Top rated movies is the third feed
    press(&mut app, KeyCode::Char('3'));
    assert!(matches!(app.state, AppState::Listing(_)));
    settle(&mut app, &client).await;
    first.assert_async().await;
    assert_eq!(app.listing.view.list.len(), 20);

    // "m" loads the next page explicitly
    press(&mut app, KeyCode::Char('m'));
    settle(&mut app, &client).await;
    second.assert_async().await;
    assert_eq!(app.listing.view.list.len(), 40);
    assert_eq!(app.listing.view.list.page(), 2);
    assert_eq!(app.listing.view.list.status(), ListStatus::Idle);
}

#[tokio::test]
async fn test_server_error_page_ends_the_list() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    // List calls degrade to an empty page, which still moves the list along
    let failing = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .create_async()
        .await;
    press(&mut app, KeyCode::Char('m'));
    settle(&mut app, &client).await;
    failing.assert_async().await;

    assert_eq!(app.home.popular.list.len(), 20);
    assert_eq!(app.home.popular.list.page(), 2);
    assert_eq!(app.home.popular.list.status(), ListStatus::Exhausted);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_flow_follows_top_hit() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    let multi = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::UrlEncoded("query".into(), "brad pitt".into()))
        .with_status(200)
        .with_body(
            r#"{"page": 1, "total_pages": 1, "total_results": 1,
                "results": [{"id": 287, "media_type": "person", "name": "Brad Pitt"}]}"#,
        )
        .create_async()
        .await;
    let people = server
        .mock("GET", "/search/person")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "brad pitt".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"page": 1, "total_pages": 1, "total_results": 2,
                "results": [
                    {"id": 287, "name": "Brad Pitt", "known_for_department": "Acting"},
                    {"id": 1000, "name": "Brad Pittman"}
                ]}"#,
        )
        .create_async()
        .await;

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.state, AppState::Search);
    assert_eq!(app.input_mode, InputMode::Editing);

    type_text(&mut app, "  brad pitt ");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.search.submitted, "brad pitt");
    assert!(app.search.active().loading.is_loading());

    settle(&mut app, &client).await;
    multi.assert_async().await;
    people.assert_async().await;

    assert_eq!(app.search.kind, MediaKind::Person);
    let tab = app.search.tab(MediaKind::Person);
    assert_eq!(tab.view.list.len(), 2);
    assert_eq!(tab.loading, LoadingState::Idle);
    assert_eq!(app.search.tab(MediaKind::Movie).loading, LoadingState::Idle);

    assert_eq!(
        app.selected_target(),
        Some(Target::new(MediaKind::Person, 287))
    );
}

#[tokio::test]
async fn test_blank_search_shows_no_results() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    let any_search = server
        .mock("GET", Matcher::Regex("^/search/".into()))
        .expect(0)
        .create_async()
        .await;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);
    assert!(app.take_requests().is_empty());

    any_search.assert_async().await;
    assert_eq!(app.search.active().view.list.footer(), Footer::NoResultsFound);
}

#[tokio::test]
async fn test_late_search_results_are_dropped() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;
    server
        .mock("GET", Matcher::Regex("^/search/".into()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(movie_page(1, 1, 1, 5))
        .create_async()
        .await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "alien");
    press(&mut app, KeyCode::Enter);
    let stale = app.take_requests();

    // The user searches again before the first query comes back
    press(&mut app, KeyCode::Char('i'));
    for _ in 0..5 {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "heat");
    press(&mut app, KeyCode::Enter);

    for request in stale {
        let event = execute(Arc::clone(&client), request).await;
        app.apply(event);
    }
    assert!(app.search.active().view.list.is_empty());
    assert!(app.search.active().loading.is_loading());

    settle(&mut app, &client).await;
    assert_eq!(app.search.active().query.as_deref(), Some("heat"));
    assert_eq!(app.search.active().view.list.len(), 5);
}

// =============================================================================
// Detail pages
// =============================================================================

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;
    server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    press(&mut app, KeyCode::Enter);
    settle(&mut app, &client).await;

    let target = Target::new(MediaKind::Movie, 1);
    assert!(matches!(app.detail, Some(DetailState::NotFound(t)) if t == target));
    assert_eq!(app.focused_slot(), None);

    // Credits can't be opened from a missing page
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.state, AppState::Detail(target));
}

#[tokio::test]
async fn test_missing_credits_fails_then_retries() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    let broken = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 1, "title": "Movie 1"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    press(&mut app, KeyCode::Enter);
    settle(&mut app, &client).await;
    broken.assert_async().await;
    assert!(matches!(app.detail, Some(DetailState::Failed { .. })));

    // The fixed response is served on retry
    broken.remove_async().await;
    let fixed = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(movie_details(1))
        .create_async()
        .await;

    press(&mut app, KeyCode::Char('r'));
    settle(&mut app, &client).await;
    fixed.assert_async().await;
    assert!(matches!(app.detail, Some(DetailState::Movie { .. })));
}

#[tokio::test]
async fn test_person_detail_and_filmography() {
    let mut server = Server::new_async().await;
    let client = client(&server);
    mock_home(&mut server).await;

    server
        .mock("GET", "/person/287")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "id": 287,
                "name": "Brad Pitt",
                "birthday": "1963-12-18",
                "place_of_birth": "Shawnee, Oklahoma, USA",
                "known_for_department": "Acting",
                "combined_credits": {
                    "cast": [
                        {"id": 550, "media_type": "movie", "title": "Fight Club", "release_date": "1999-10-15", "genre_ids": [18], "original_language": "en", "popularity": 60.0, "character": "Tyler Durden"},
                        {"id": 807, "media_type": "movie", "title": "Se7en", "release_date": "1995-09-22", "genre_ids": [80], "original_language": "en", "popularity": 40.0, "character": "Mills"},
                        {"id": 9, "media_type": "tv", "name": "The Tonight Show", "first_air_date": "2014-02-17", "genre_ids": [10767], "original_language": "en", "character": "Self"}
                    ],
                    "crew": []
                }
            }"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/person/287/combined_credits")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
                "cast": [
                    {"id": 807, "media_type": "movie", "title": "Se7en", "release_date": "1995-09-22", "character": "Mills"},
                    {"id": 550, "media_type": "movie", "title": "Fight Club", "release_date": "1999-10-15", "character": "Tyler Durden"}
                ],
                "crew": [
                    {"id": 1, "media_type": "movie", "title": "Produced", "release_date": "2010-01-01", "job": "Producer"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let mut app = App::new(TimeWindow::Week);
    settle(&mut app, &client).await;

    let target = Target::new(MediaKind::Person, 287);
    app.open(target);
    settle(&mut app, &client).await;

    match &app.detail {
        Some(DetailState::Person { details, known_for }) => {
            assert_eq!(details.name, "Brad Pitt");
            // The talk show appearance is left out
            assert_eq!(known_for.list.len(), 2);
            assert_eq!(
                known_for.selected().and_then(|c| c.target),
                Some(Target::new(MediaKind::Movie, 550))
            );
        }
        _ => panic!("expected a loaded person"),
    }

    // Reviews only exist for titles
    press(&mut app, KeyCode::Char('v'));
    assert_eq!(app.state, AppState::Detail(target));

    press(&mut app, KeyCode::Char('c'));
    settle(&mut app, &client).await;
    assert_eq!(app.state, AppState::Credits(target));
    assert_eq!(app.credits.cast.list.len(), 2);
    assert_eq!(app.credits.crew.list.len(), 1);

    // Newest first
    let first = app.credits.cast.selected().expect("cast loaded");
    assert_eq!(first.target, Some(Target::new(MediaKind::Movie, 550)));
}
