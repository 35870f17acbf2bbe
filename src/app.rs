//! App state and core application logic
//!
//! Manages the screen state machine and navigation stack. The app never talks
//! to the network itself: key handling queues [`Request`]s and page fetches
//! ([`PendingPage`]) which the runtime executes, and the results come back as
//! [`Event`]s passed to [`App::apply`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::list::{Advance, ListSeed, PageRequest, PageResult, PaginatedList};
use crate::models::{
    Card, Feed, MediaItem, MediaKind, MovieDetails, PersonDetails, Review, Target, TimeWindow,
    TvDetails,
};

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Popular movies and this week's trending movies
    #[default]
    Home,
    /// One of the fixed listing feeds
    Listing(Feed),
    /// Search box with one results tab per kind
    Search,
    /// Movie, TV show or person page
    Detail(Target),
    /// Cast & crew of a title, or a person's filmography
    Credits(Target),
    /// User reviews of a title
    Reviews(Target),
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for whole-screen requests
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading(Option<String>),
    Error(String),
    /// The requested record doesn't exist; retrying won't help
    NotFound(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadingState::NotFound(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) | LoadingState::NotFound(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Cursor and viewport offset for a list
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// First visible row
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible.
    ///
    /// The row after the last item holds the list footer, so when the cursor
    /// sits on the last item the footer is scrolled into view with it.
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let bottom = if self.len > 0 && self.selected + 1 == self.len {
            self.selected + 1
        } else {
            self.selected
        };
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if bottom >= self.offset + visible_height {
            self.offset = (bottom + 1).saturating_sub(visible_height).min(self.selected);
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., when a new page comes in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Cursor movements shared by every list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

/// What a key asks of the focused list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListAction {
    Move(Motion),
    LoadMore,
    Retry,
    /// Re-check the scroll trigger after the list changed underneath the cursor
    Refill,
}

// =============================================================================
// List views
// =============================================================================

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// A paginated list plus its cursor.
///
/// Every view gets a process-unique id; page results carry the id of the view
/// that requested them so a page can't land in a view that replaced it.
pub struct ListView<T> {
    id: u64,
    pub list: PaginatedList<T>,
    pub cursor: ListState,
}

impl<T> ListView<T> {
    pub fn new(list: PaginatedList<T>) -> Self {
        let cursor = ListState::new(list.len());
        Self {
            id: NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed),
            list,
            cursor,
        }
    }

    pub fn from_seed(seed: ListSeed<T>) -> Self {
        Self::new(PaginatedList::from_seed(seed))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn selected(&self) -> Option<&T> {
        self.list.get(self.cursor.selected)
    }

    /// Replace the contents with a fresh page 1 and move the cursor to the top
    pub fn reseed(&mut self, seed: ListSeed<T>) {
        self.list.reseed(seed);
        self.cursor = ListState::new(self.list.len());
    }

    /// Move the cursor and report the page fetch the scroll trigger asks for
    pub fn step(&mut self, motion: Motion, rows: usize) -> Option<PageRequest<T>> {
        match motion {
            Motion::Up => self.cursor.up(),
            Motion::Down => self.cursor.down(),
            Motion::PageUp => self.cursor.page_up(rows.max(1)),
            Motion::PageDown => self.cursor.page_down(rows.max(1)),
            Motion::First => self.cursor.first(),
            Motion::Last => self.cursor.last(),
        }
        self.cursor.scroll_into_view(rows);
        self.list.trigger_in_view(self.cursor.offset, rows)
    }

    pub fn complete(&mut self, result: PageResult<T>) -> Result<Advance, crate::list::PageError> {
        let outcome = self.list.complete(result);
        self.cursor.set_len(self.list.len());
        outcome
    }

    fn act(&mut self, action: ListAction, rows: usize) -> Option<PageRequest<T>> {
        match action {
            ListAction::Move(motion) => self.step(motion, rows),
            ListAction::LoadMore => self.list.begin_advance(),
            ListAction::Retry => {
                self.list.dismiss_error();
                self.list.begin_advance()
            }
            ListAction::Refill => self.list.trigger_in_view(self.cursor.offset, rows),
        }
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new(PaginatedList::empty())
    }
}

/// Identifies which list on which screen a page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Popular,
    Trending,
    Listing,
    Search(MediaKind),
    Recommendations,
    KnownFor,
    Cast,
    Crew,
    Reviews,
}

// =============================================================================
// Requests and events
// =============================================================================

/// Screen-level work for the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Home(TimeWindow),
    Feed(Feed),
    /// `kind: None` lets the top multi-search hit pick the tab
    Search {
        query: String,
        kind: Option<MediaKind>,
    },
    Details(Target),
    Credits(Target),
    Reviews(Target),
}

/// A page fetch started by a list view
#[derive(Debug)]
pub enum PendingPage {
    Media {
        slot: Slot,
        view: u64,
        request: PageRequest<MediaItem>,
    },
    Cards {
        slot: Slot,
        view: u64,
        request: PageRequest<Card>,
    },
    Reviews {
        view: u64,
        request: PageRequest<Review>,
    },
}

/// A loaded detail page with its first-page lists
#[derive(Debug)]
pub enum Details {
    Movie {
        details: Box<MovieDetails>,
        recommendations: ListSeed<MediaItem>,
    },
    Tv {
        details: Box<TvDetails>,
        recommendations: ListSeed<MediaItem>,
    },
    Person {
        details: Box<PersonDetails>,
        known_for: ListSeed<Card>,
    },
}

/// Cast and crew (or a person's filmography) ready to page through
#[derive(Debug)]
pub struct CreditLists {
    pub cast: ListSeed<Card>,
    pub crew: ListSeed<Card>,
}

/// Finished work reported back by the runtime
#[derive(Debug)]
pub enum Event {
    Home {
        popular: ListSeed<MediaItem>,
        trending: ListSeed<MediaItem>,
    },
    Feed {
        feed: Feed,
        seed: ListSeed<MediaItem>,
    },
    Search {
        query: String,
        kind: MediaKind,
        seed: ListSeed<MediaItem>,
    },
    /// `Ok(None)` is a missing entity, `Err` a page that can't be rendered
    Details {
        target: Target,
        outcome: Result<Option<Details>, String>,
    },
    Credits {
        target: Target,
        outcome: Result<Option<CreditLists>, String>,
    },
    Reviews {
        target: Target,
        seed: ListSeed<Review>,
    },
    MediaPage {
        slot: Slot,
        view: u64,
        result: PageResult<MediaItem>,
    },
    CardPage {
        slot: Slot,
        view: u64,
        result: PageResult<Card>,
    },
    ReviewPage {
        view: u64,
        result: PageResult<Review>,
    },
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Which home list has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomePane {
    #[default]
    Popular,
    Trending,
}

#[derive(Default)]
pub struct HomeState {
    pub popular: ListView<MediaItem>,
    pub trending: ListView<MediaItem>,
    pub pane: HomePane,
    pub loading: LoadingState,
}

#[derive(Default)]
pub struct ListingState {
    pub feed: Option<Feed>,
    pub view: ListView<MediaItem>,
    pub loading: LoadingState,
}

/// Results for one search tab
#[derive(Default)]
pub struct SearchTab {
    /// The query these results belong to; `None` until the tab is loaded
    pub query: Option<String>,
    pub view: ListView<MediaItem>,
    pub loading: LoadingState,
}

#[derive(Default)]
pub struct SearchState {
    /// Text in the search box
    pub query: String,
    /// Cursor position in chars
    pub cursor: usize,
    /// Last submitted query
    pub submitted: String,
    /// Active tab
    pub kind: MediaKind,
    pub movies: SearchTab,
    pub tv: SearchTab,
    pub people: SearchTab,
    /// Whether the next search result picks the active tab
    auto_tab: bool,
}

impl SearchState {
    fn byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    pub fn tab(&self, kind: MediaKind) -> &SearchTab {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv,
            MediaKind::Person => &self.people,
        }
    }

    pub fn tab_mut(&mut self, kind: MediaKind) -> &mut SearchTab {
        match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Tv => &mut self.tv,
            MediaKind::Person => &mut self.people,
        }
    }

    pub fn active(&self) -> &SearchTab {
        self.tab(self.kind)
    }
}

/// Detail screen contents
pub enum DetailState {
    Loading(Target),
    Movie {
        details: Box<MovieDetails>,
        recommendations: ListView<MediaItem>,
    },
    Tv {
        details: Box<TvDetails>,
        recommendations: ListView<MediaItem>,
    },
    Person {
        details: Box<PersonDetails>,
        known_for: ListView<Card>,
    },
    NotFound(Target),
    /// A required part of the page failed to load; `r` retries
    Failed { target: Target, message: String },
}

impl DetailState {
    pub fn target(&self) -> Target {
        match self {
            DetailState::Loading(t) | DetailState::NotFound(t) => *t,
            DetailState::Failed { target, .. } => *target,
            DetailState::Movie { details, .. } => Target::new(MediaKind::Movie, details.id),
            DetailState::Tv { details, .. } => Target::new(MediaKind::Tv, details.id),
            DetailState::Person { details, .. } => Target::new(MediaKind::Person, details.id),
        }
    }

    /// Title of the loaded entity
    pub fn title(&self) -> Option<&str> {
        match self {
            DetailState::Movie { details, .. } => Some(&details.title),
            DetailState::Tv { details, .. } => Some(&details.name),
            DetailState::Person { details, .. } => Some(&details.name),
            _ => None,
        }
    }
}

/// Which credits list has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreditsPane {
    #[default]
    Cast,
    Crew,
}

#[derive(Default)]
pub struct CreditsState {
    pub target: Option<Target>,
    pub title: String,
    pub cast: ListView<Card>,
    pub crew: ListView<Card>,
    pub pane: CreditsPane,
    pub loading: LoadingState,
}

#[derive(Default)]
pub struct ReviewsState {
    pub target: Option<Target>,
    pub title: String,
    pub view: ListView<Review>,
    pub loading: LoadingState,
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    pub running: bool,
    pub input_mode: InputMode,
    /// Global error message, cleared on the next key
    pub error: Option<String>,
    /// Rows a list can show at once; drives scrolling and the scroll trigger
    pub viewport_rows: usize,
    /// Window used for trending feeds
    pub window: TimeWindow,

    pub home: HomeState,
    pub listing: ListingState,
    pub search: SearchState,
    pub detail: Option<DetailState>,
    pub credits: CreditsState,
    pub reviews: ReviewsState,

    requests: Vec<Request>,
    pages: Vec<PendingPage>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(TimeWindow::default())
    }
}

impl App {
    /// Create the app on the home screen with its first request queued
    pub fn new(window: TimeWindow) -> Self {
        let mut app = Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            viewport_rows: 10,
            window,
            home: HomeState::default(),
            listing: ListingState::default(),
            search: SearchState::default(),
            detail: None,
            credits: CreditsState::default(),
            reviews: ReviewsState::default(),
            requests: Vec::new(),
            pages: Vec::new(),
        };
        app.load_home();
        app
    }

    /// Requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Page fetches queued since the last call
    pub fn take_pages(&mut self) -> Vec<PendingPage> {
        std::mem::take(&mut self.pages)
    }

    pub fn set_viewport(&mut self, rows: usize) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            if let Some(slot) = self.focused_slot() {
                self.act(slot, ListAction::Refill);
            }
        }
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        // A visible page error is dismissed before leaving the screen
        if let Some(slot) = self.focused_slot() {
            if self.dismiss_list_error(slot) {
                return true;
            }
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            self.ensure_loaded();
            true
        } else {
            false
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.navigate(AppState::Search);
        self.input_mode = InputMode::Editing;
    }

    // -------------------------------------------------------------------------
    // Loading screens
    // -------------------------------------------------------------------------

    fn load_home(&mut self) {
        self.home.loading = LoadingState::Loading(Some("Loading movies...".into()));
        self.requests.push(Request::Home(self.window));
    }

    /// Show a listing feed. Trending feeds use the configured window.
    pub fn open_feed(&mut self, feed: Feed) {
        let feed = match feed {
            Feed::TrendingMovies(_) => Feed::TrendingMovies(self.window),
            Feed::TrendingTv(_) => Feed::TrendingTv(self.window),
            other => other,
        };
        self.navigate(AppState::Listing(feed));
        self.load_feed(feed);
    }

    fn load_feed(&mut self, feed: Feed) {
        self.listing.feed = Some(feed);
        self.listing.view.reseed(ListSeed::fixed(Vec::new()));
        self.listing.loading = LoadingState::Loading(Some(format!("Loading {}...", feed)));
        self.requests.push(Request::Feed(feed));
    }

    /// Open the page behind a card
    pub fn open(&mut self, target: Target) {
        self.navigate(AppState::Detail(target));
        self.load_detail(target);
    }

    fn load_detail(&mut self, target: Target) {
        self.detail = Some(DetailState::Loading(target));
        self.requests.push(Request::Details(target));
    }

    /// Cast & crew for a title, filmography for a person
    pub fn open_credits(&mut self, target: Target) {
        self.navigate(AppState::Credits(target));
        self.load_credits(target);
    }

    fn load_credits(&mut self, target: Target) {
        self.credits.target = Some(target);
        self.credits.title = self.title_for(target);
        self.credits.pane = CreditsPane::Cast;
        self.credits.cast.reseed(ListSeed::fixed(Vec::new()));
        self.credits.crew.reseed(ListSeed::fixed(Vec::new()));
        self.credits.loading = LoadingState::Loading(Some("Loading credits...".into()));
        self.requests.push(Request::Credits(target));
    }

    pub fn open_reviews(&mut self, target: Target) {
        if target.kind == MediaKind::Person {
            return;
        }
        self.navigate(AppState::Reviews(target));
        self.load_reviews(target);
    }

    fn load_reviews(&mut self, target: Target) {
        self.reviews.target = Some(target);
        self.reviews.title = self.title_for(target);
        self.reviews.view.reseed(ListSeed::fixed(Vec::new()));
        self.reviews.loading = LoadingState::Loading(Some("Loading reviews...".into()));
        self.requests.push(Request::Reviews(target));
    }

    fn title_for(&self, target: Target) -> String {
        self.detail
            .as_ref()
            .filter(|d| d.target() == target)
            .and_then(DetailState::title)
            .unwrap_or_default()
            .to_string()
    }

    /// Submit the search box. A blank query shows no results without a request.
    pub fn submit_search(&mut self) {
        let query = self.search.query.trim().to_string();
        self.search.submitted = query.clone();
        for kind in MediaKind::ALL {
            let tab = self.search.tab_mut(kind);
            tab.query = None;
            tab.view.reseed(ListSeed::fixed(Vec::new()));
            tab.loading = LoadingState::Idle;
        }

        if query.is_empty() {
            self.search.tab_mut(self.search.kind).query = Some(query);
            return;
        }

        self.search.auto_tab = true;
        self.search.tab_mut(self.search.kind).loading =
            LoadingState::Loading(Some("Searching...".into()));
        self.requests.push(Request::Search { query, kind: None });
    }

    /// Switch to the next search tab, loading it for the submitted query
    pub fn next_search_tab(&mut self) {
        let kinds = MediaKind::ALL;
        let idx = kinds.iter().position(|k| *k == self.search.kind).unwrap_or(0);
        let kind = kinds[(idx + 1) % kinds.len()];
        self.search.kind = kind;
        self.search.auto_tab = false;

        let submitted = self.search.submitted.clone();
        let tab = self.search.tab_mut(kind);
        if submitted.is_empty() || tab.query.as_deref() == Some(submitted.as_str()) {
            return;
        }
        tab.loading = LoadingState::Loading(Some("Searching...".into()));
        self.requests.push(Request::Search {
            query: submitted,
            kind: Some(kind),
        });
    }

    /// Reload whatever the current screen is missing after going back
    fn ensure_loaded(&mut self) {
        match self.state {
            AppState::Listing(feed) if self.listing.feed != Some(feed) => self.load_feed(feed),
            AppState::Detail(target)
                if self.detail.as_ref().map(DetailState::target) != Some(target) =>
            {
                self.load_detail(target)
            }
            AppState::Credits(target) if self.credits.target != Some(target) => {
                self.load_credits(target)
            }
            AppState::Reviews(target) if self.reviews.target != Some(target) => {
                self.load_reviews(target)
            }
            _ => {}
        }
    }

    /// Re-run the failed request of the current screen, or retry the focused
    /// list's failed page.
    pub fn retry(&mut self) {
        match self.state {
            AppState::Home if self.home.loading.is_error() => self.load_home(),
            AppState::Listing(feed) if self.listing.loading.is_error() => self.load_feed(feed),
            AppState::Detail(target)
                if matches!(
                    self.detail,
                    Some(DetailState::Failed { .. }) | Some(DetailState::NotFound(_))
                ) =>
            {
                self.load_detail(target)
            }
            AppState::Credits(target) if self.credits.loading.is_error() => {
                self.load_credits(target)
            }
            AppState::Reviews(target) if self.reviews.loading.is_error() => {
                self.load_reviews(target)
            }
            _ => {
                if let Some(slot) = self.focused_slot() {
                    self.act(slot, ListAction::Retry);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------

    /// The list keyboard motion applies to on the current screen
    pub fn focused_slot(&self) -> Option<Slot> {
        match self.state {
            AppState::Home => Some(match self.home.pane {
                HomePane::Popular => Slot::Popular,
                HomePane::Trending => Slot::Trending,
            }),
            AppState::Listing(_) => Some(Slot::Listing),
            AppState::Search => Some(Slot::Search(self.search.kind)),
            AppState::Detail(_) => match self.detail {
                Some(DetailState::Movie { .. }) | Some(DetailState::Tv { .. }) => {
                    Some(Slot::Recommendations)
                }
                Some(DetailState::Person { .. }) => Some(Slot::KnownFor),
                _ => None,
            },
            AppState::Credits(_) => Some(match self.credits.pane {
                CreditsPane::Cast => Slot::Cast,
                CreditsPane::Crew => Slot::Crew,
            }),
            AppState::Reviews(_) => Some(Slot::Reviews),
        }
    }

    pub fn media_view(&self, slot: Slot) -> Option<&ListView<MediaItem>> {
        match slot {
            Slot::Popular => Some(&self.home.popular),
            Slot::Trending => Some(&self.home.trending),
            Slot::Listing => Some(&self.listing.view),
            Slot::Search(kind) => Some(&self.search.tab(kind).view),
            Slot::Recommendations => match &self.detail {
                Some(DetailState::Movie {
                    recommendations, ..
                })
                | Some(DetailState::Tv {
                    recommendations, ..
                }) => Some(recommendations),
                _ => None,
            },
            _ => None,
        }
    }

    fn media_view_mut(&mut self, slot: Slot) -> Option<&mut ListView<MediaItem>> {
        match slot {
            Slot::Popular => Some(&mut self.home.popular),
            Slot::Trending => Some(&mut self.home.trending),
            Slot::Listing => Some(&mut self.listing.view),
            Slot::Search(kind) => Some(&mut self.search.tab_mut(kind).view),
            Slot::Recommendations => match &mut self.detail {
                Some(DetailState::Movie {
                    recommendations, ..
                })
                | Some(DetailState::Tv {
                    recommendations, ..
                }) => Some(recommendations),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn card_view(&self, slot: Slot) -> Option<&ListView<Card>> {
        match slot {
            Slot::KnownFor => match &self.detail {
                Some(DetailState::Person { known_for, .. }) => Some(known_for),
                _ => None,
            },
            Slot::Cast => Some(&self.credits.cast),
            Slot::Crew => Some(&self.credits.crew),
            _ => None,
        }
    }

    fn card_view_mut(&mut self, slot: Slot) -> Option<&mut ListView<Card>> {
        match slot {
            Slot::KnownFor => match &mut self.detail {
                Some(DetailState::Person { known_for, .. }) => Some(known_for),
                _ => None,
            },
            Slot::Cast => Some(&mut self.credits.cast),
            Slot::Crew => Some(&mut self.credits.crew),
            _ => None,
        }
    }

    /// Where Enter on the focused list leads
    pub fn selected_target(&self) -> Option<Target> {
        let slot = self.focused_slot()?;
        if let Some(view) = self.media_view(slot) {
            return view.selected().map(|item| Target::new(item.kind(), item.id()));
        }
        self.card_view(slot)
            .and_then(ListView::selected)
            .and_then(|card| card.target)
    }

    fn act(&mut self, slot: Slot, action: ListAction) {
        let rows = self.viewport_rows;

        if let Some((view, request)) = self
            .media_view_mut(slot)
            .map(|v| (v.id(), v.act(action, rows)))
        {
            if let Some(request) = request {
                self.pages.push(PendingPage::Media {
                    slot,
                    view,
                    request,
                });
            }
            return;
        }

        if let Some((view, request)) = self
            .card_view_mut(slot)
            .map(|v| (v.id(), v.act(action, rows)))
        {
            if let Some(request) = request {
                self.pages.push(PendingPage::Cards {
                    slot,
                    view,
                    request,
                });
            }
            return;
        }

        if slot == Slot::Reviews {
            let view = self.reviews.view.id();
            if let Some(request) = self.reviews.view.act(action, rows) {
                self.pages.push(PendingPage::Reviews { view, request });
            }
        }
    }

    fn dismiss_list_error(&mut self, slot: Slot) -> bool {
        fn dismiss<T>(view: &mut ListView<T>) -> bool {
            let had = view.list.last_error().is_some();
            view.list.dismiss_error();
            had
        }

        if let Some(view) = self.media_view_mut(slot) {
            return dismiss(view);
        }
        if let Some(view) = self.card_view_mut(slot) {
            return dismiss(view);
        }
        slot == Slot::Reviews && dismiss(&mut self.reviews.view)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Apply a finished request or page fetch. Results for screens that have
    /// since been replaced are dropped.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Home { popular, trending } => {
                self.home.popular.reseed(popular);
                self.home.trending.reseed(trending);
                self.home.loading = LoadingState::Idle;
                self.act(Slot::Popular, ListAction::Refill);
                self.act(Slot::Trending, ListAction::Refill);
            }
            Event::Feed { feed, seed } => {
                if self.listing.feed != Some(feed) {
                    return;
                }
                self.listing.view.reseed(seed);
                self.listing.loading = LoadingState::Idle;
                self.act(Slot::Listing, ListAction::Refill);
            }
            Event::Search { query, kind, seed } => {
                if query != self.search.submitted {
                    tracing::debug!(query = %query, "dropping results for an old query");
                    return;
                }
                if self.search.auto_tab {
                    // The placeholder spinner was on the previously active tab
                    self.search.tab_mut(self.search.kind).loading = LoadingState::Idle;
                    self.search.kind = kind;
                    self.search.auto_tab = false;
                }
                let tab = self.search.tab_mut(kind);
                tab.query = Some(query);
                tab.view.reseed(seed);
                tab.loading = LoadingState::Idle;
                self.act(Slot::Search(kind), ListAction::Refill);
            }
            Event::Details { target, outcome } => self.apply_details(target, outcome),
            Event::Credits { target, outcome } => {
                if self.credits.target != Some(target) {
                    return;
                }
                match outcome {
                    Ok(Some(lists)) => {
                        self.credits.cast.reseed(lists.cast);
                        self.credits.crew.reseed(lists.crew);
                        self.credits.loading = LoadingState::Idle;
                        self.act(Slot::Cast, ListAction::Refill);
                    }
                    Ok(None) => {
                        self.credits.loading = LoadingState::NotFound(format!(
                            "No credits for {} {}",
                            target.kind.as_str(),
                            target.id
                        ))
                    }
                    Err(message) => self.credits.loading = LoadingState::Error(message),
                }
            }
            Event::Reviews { target, seed } => {
                if self.reviews.target != Some(target) {
                    return;
                }
                self.reviews.view.reseed(seed);
                self.reviews.loading = LoadingState::Idle;
                self.act(Slot::Reviews, ListAction::Refill);
            }
            Event::MediaPage { slot, view, result } => {
                let outcome = match self.media_view_mut(slot) {
                    Some(v) if v.id() == view => v.complete(result),
                    _ => return,
                };
                self.after_page(slot, outcome);
            }
            Event::CardPage { slot, view, result } => {
                let outcome = match self.card_view_mut(slot) {
                    Some(v) if v.id() == view => v.complete(result),
                    _ => return,
                };
                self.after_page(slot, outcome);
            }
            Event::ReviewPage { view, result } => {
                if self.reviews.view.id() != view {
                    return;
                }
                let outcome = self.reviews.view.complete(result);
                self.after_page(Slot::Reviews, outcome);
            }
        }
    }

    fn apply_details(&mut self, target: Target, outcome: Result<Option<Details>, String>) {
        if self.detail.as_ref().map(DetailState::target) != Some(target) {
            return;
        }
        let (state, slot) = match outcome {
            Ok(Some(Details::Movie {
                details,
                recommendations,
            })) => (
                DetailState::Movie {
                    details,
                    recommendations: ListView::from_seed(recommendations),
                },
                Some(Slot::Recommendations),
            ),
            Ok(Some(Details::Tv {
                details,
                recommendations,
            })) => (
                DetailState::Tv {
                    details,
                    recommendations: ListView::from_seed(recommendations),
                },
                Some(Slot::Recommendations),
            ),
            Ok(Some(Details::Person { details, known_for })) => (
                DetailState::Person {
                    details,
                    known_for: ListView::from_seed(known_for),
                },
                Some(Slot::KnownFor),
            ),
            Ok(None) => (DetailState::NotFound(target), None),
            Err(message) => (DetailState::Failed { target, message }, None),
        };
        self.detail = Some(state);
        if let Some(slot) = slot {
            self.act(slot, ListAction::Refill);
        }
    }

    fn after_page(&mut self, slot: Slot, outcome: Result<Advance, crate::list::PageError>) {
        match outcome {
            // An empty page leaves the trigger row where it was, so only a
            // grown list may pull the next page without a keypress
            Ok(Advance::Appended { count, .. }) if count > 0 => {
                self.act(slot, ListAction::Refill)
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(slot = ?slot, error = %e, "list page failed"),
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.submit_search();
                true
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace();
                true
            }
            KeyCode::Delete => {
                self.search.delete();
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search.cursor_home();
                true
            }
            KeyCode::End => {
                self.search.cursor_end();
                true
            }
            _ => false,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') => {
                self.focus_search();
                return true;
            }
            KeyCode::Esc => return self.back(),
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as usize) - ('1' as usize);
                self.open_feed(Feed::ALL[idx]);
                return true;
            }
            KeyCode::Char('r') => {
                self.retry();
                return true;
            }
            _ => {}
        }

        if let Some(motion) = motion_for(key.code) {
            if let Some(slot) = self.focused_slot() {
                self.act(slot, ListAction::Move(motion));
            }
            return true;
        }

        match self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail(target) => self.handle_detail_key(key, target),
            AppState::Credits(_) => self.handle_credits_key(key),
            AppState::Listing(_) | AppState::Reviews(_) => self.handle_list_key(key),
        }
    }

    /// Enter and `m`, common to every list screen
    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                if let Some(target) = self.selected_target() {
                    self.open(target);
                }
                true
            }
            KeyCode::Char('m') => {
                if let Some(slot) = self.focused_slot() {
                    self.act(slot, ListAction::LoadMore);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.home.pane = match self.home.pane {
                    HomePane::Popular => HomePane::Trending,
                    HomePane::Trending => HomePane::Popular,
                };
                true
            }
            _ => self.handle_list_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => {
                self.next_search_tab();
                true
            }
            KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
                true
            }
            _ => self.handle_list_key(key),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, target: Target) -> bool {
        let loaded = matches!(
            self.detail,
            Some(DetailState::Movie { .. })
                | Some(DetailState::Tv { .. })
                | Some(DetailState::Person { .. })
        );
        match key.code {
            KeyCode::Char('c') if loaded => {
                self.open_credits(target);
                true
            }
            KeyCode::Char('v') if loaded && target.kind != MediaKind::Person => {
                self.open_reviews(target);
                true
            }
            _ => self.handle_list_key(key),
        }
    }

    fn handle_credits_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.credits.pane = match self.credits.pane {
                    CreditsPane::Cast => CreditsPane::Crew,
                    CreditsPane::Crew => CreditsPane::Cast,
                };
                let slot = match self.credits.pane {
                    CreditsPane::Cast => Slot::Cast,
                    CreditsPane::Crew => Slot::Crew,
                };
                self.act(slot, ListAction::Refill);
                true
            }
            _ => self.handle_list_key(key),
        }
    }
}

fn motion_for(code: KeyCode) -> Option<Motion> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Motion::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Motion::Down),
        KeyCode::PageUp => Some(Motion::PageUp),
        KeyCode::PageDown => Some(Motion::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Motion::First),
        KeyCode::End | KeyCode::Char('G') => Some(Motion::Last),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
