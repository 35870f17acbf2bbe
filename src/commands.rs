//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the TMDB client and the same list
//! controller the TUI scrolls through. Each handler takes CLI args and Output,
//! returns ExitCode.

use serde::Serialize;
use std::sync::Arc;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    AiringTodayCmd, CreditsCmd, CreditsOutput, ExitCode, InfoCmd, ListingOutput, Output,
    PageArgs, PopularCmd, RecommendationsCmd, ReviewsCmd, SearchCmd, TitleKind, TopRatedCmd,
    TrendingCmd,
};
use crate::list::{Advance, ListSeed, PaginatedList};
use crate::models::{Feed, MediaItem, MediaKind, Paginated, Target, TimeWindow};
use crate::runtime;

// =============================================================================
// Listing helpers
// =============================================================================

/// Print one page as fetched
fn print_page<T: Serialize>(page: Paginated<T>, limit: Option<usize>, output: &Output) -> ExitCode {
    let mut results = page.results;
    if results.is_empty() {
        return output.error("No results found", ExitCode::NoResults);
    }
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    print(
        ListingOutput {
            page: page.page,
            total_pages: page.total_pages,
            results,
        },
        output,
    )
}

/// Load up to `pages` pages through a list controller, then print them
async fn print_pages<T: Serialize>(
    seed: ListSeed<T>,
    pages: u32,
    limit: Option<usize>,
    output: &Output,
) -> ExitCode {
    let mut list = PaginatedList::from_seed(seed);

    while list.page() < pages && list.has_more() {
        match list.advance().await {
            Ok(Advance::Appended { page, count }) => {
                output.info(format!("Loaded page {} ({} results)", page, count));
            }
            Ok(Advance::Ignored) | Ok(Advance::Stale) => break,
            Err(e) => return output.error(e.to_string(), ExitCode::NetworkError),
        }
    }

    if list.is_empty() {
        return output.error("No results found", ExitCode::NoResults);
    }

    let page = list.page();
    let total_pages = list.total_pages();
    let mut results = list.into_items();
    if let Some(limit) = limit {
        results.truncate(limit);
    }
    print(
        ListingOutput {
            page,
            total_pages,
            results,
        },
        output,
    )
}

/// Every item behind a seed, however many pages that takes
async fn collect_all<T>(seed: ListSeed<T>) -> Result<Vec<T>, crate::list::PageError> {
    let mut list = PaginatedList::from_seed(seed);
    while list.has_more() {
        if list.advance().await? == Advance::Ignored {
            break;
        }
    }
    Ok(list.into_items())
}

fn print<T: Serialize>(data: T, output: &Output) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

/// A required detail lookup failed outright
fn lookup_error(e: TmdbError, output: &Output) -> ExitCode {
    let code = match e {
        TmdbError::RequestFailed(_) | TmdbError::Status { .. } => ExitCode::NetworkError,
        TmdbError::InvalidResponse(_) | TmdbError::MissingSubResource(_) => ExitCode::Error,
    };
    output.error(e.to_string(), code)
}

fn not_found(target: Target, output: &Output) -> ExitCode {
    output.error(
        format!("No {} with id {}", target.kind.as_str(), target.id),
        ExitCode::NotFound,
    )
}

async fn feed_cmd(client: Arc<TmdbClient>, feed: Feed, args: PageArgs, output: &Output) -> ExitCode {
    output.info(format!("Fetching {}...", feed));
    match args.pages {
        Some(pages) => {
            let seed = runtime::feed_seed(client, feed).await;
            print_pages(seed, pages, args.limit, output).await
        }
        None => print_page(client.feed(feed, Some(args.page)).await, args.limit, output),
    }
}

// =============================================================================
// Listing Commands
// =============================================================================

pub async fn popular_cmd(cmd: PopularCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let feed = match MediaKind::from(cmd.media_type) {
        MediaKind::Movie => Feed::PopularMovies,
        MediaKind::Tv => Feed::PopularTv,
        MediaKind::Person => Feed::PopularPeople,
    };
    feed_cmd(client, feed, cmd.pages, output).await
}

pub async fn trending_cmd(
    cmd: TrendingCmd,
    default_window: TimeWindow,
    client: Arc<TmdbClient>,
    output: &Output,
) -> ExitCode {
    let window = cmd.window.map(TimeWindow::from).unwrap_or(default_window);
    let feed = match cmd.media_type {
        TitleKind::Movie => Feed::TrendingMovies(window),
        TitleKind::Tv => Feed::TrendingTv(window),
    };
    feed_cmd(client, feed, cmd.pages, output).await
}

pub async fn top_rated_cmd(cmd: TopRatedCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let feed = match cmd.media_type {
        TitleKind::Movie => Feed::TopRatedMovies,
        TitleKind::Tv => Feed::TopRatedTv,
    };
    feed_cmd(client, feed, cmd.pages, output).await
}

pub async fn airing_today_cmd(
    cmd: AiringTodayCmd,
    client: Arc<TmdbClient>,
    output: &Output,
) -> ExitCode {
    feed_cmd(client, Feed::AiringTodayTv, cmd.pages, output).await
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let query = cmd.query.trim().to_string();
    if query.is_empty() {
        return output.error("No results found", ExitCode::NoResults);
    }

    let kind = client
        .resolve_search_kind(&query, cmd.media_type.map(MediaKind::from))
        .await;
    output.info(format!("Searching {} for: {}", kind.tab_label(), query));

    match cmd.pages.pages {
        Some(pages) => {
            let seed = runtime::search_seed(client, kind, query).await;
            print_pages(seed, pages, cmd.pages.limit, output).await
        }
        None => print_page(
            client.search(kind, &query, Some(cmd.pages.page)).await,
            cmd.pages.limit,
            output,
        ),
    }
}

// =============================================================================
// Detail Commands
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let target = Target::new(cmd.media_type.into(), cmd.id);
    output.info(format!("Getting info for {} {}", target.kind.as_str(), target.id));

    match target.kind {
        MediaKind::Movie => match client.movie_details(target.id).await {
            Ok(Some(details)) => {
                if let Err(e) = details.require_credits() {
                    return lookup_error(e, output);
                }
                print(details, output)
            }
            Ok(None) => not_found(target, output),
            Err(e) => lookup_error(e, output),
        },
        MediaKind::Tv => match client.tv_details(target.id).await {
            Ok(Some(details)) => {
                if let Err(e) = details.require_credits() {
                    return lookup_error(e, output);
                }
                print(details, output)
            }
            Ok(None) => not_found(target, output),
            Err(e) => lookup_error(e, output),
        },
        MediaKind::Person => match client.person_details(target.id).await {
            Ok(Some(details)) => print(details, output),
            Ok(None) => not_found(target, output),
            Err(e) => lookup_error(e, output),
        },
    }
}

pub async fn credits_cmd(cmd: CreditsCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let target = Target::new(cmd.media_type.into(), cmd.id);

    let lists = match runtime::credits(client, target).await {
        Ok(Some(lists)) => lists,
        Ok(None) => return not_found(target, output),
        Err(e) => return lookup_error(e, output),
    };

    let (cast, crew) = match (collect_all(lists.cast).await, collect_all(lists.crew).await) {
        (Ok(cast), Ok(crew)) => (cast, crew),
        (Err(e), _) | (_, Err(e)) => return output.error(e.to_string(), ExitCode::Error),
    };

    let limit = cmd.limit.unwrap_or(usize::MAX);
    print(
        CreditsOutput {
            cast: cast.into_iter().take(limit).collect(),
            crew: crew.into_iter().take(limit).collect(),
        },
        output,
    )
}

pub async fn reviews_cmd(cmd: ReviewsCmd, client: Arc<TmdbClient>, output: &Output) -> ExitCode {
    let target = Target::new(cmd.media_type.into(), cmd.id);
    match cmd.pages.pages {
        Some(pages) => {
            let seed = runtime::reviews_seed(client, target).await;
            print_pages(seed, pages, cmd.pages.limit, output).await
        }
        None => {
            let page = Some(cmd.pages.page);
            let reviews = match cmd.media_type {
                TitleKind::Movie => client.movie_reviews(cmd.id, page).await,
                TitleKind::Tv => client.tv_reviews(cmd.id, page).await,
            };
            print_page(reviews, cmd.pages.limit, output)
        }
    }
}

pub async fn recommendations_cmd(
    cmd: RecommendationsCmd,
    client: Arc<TmdbClient>,
    output: &Output,
) -> ExitCode {
    let target = Target::new(cmd.media_type.into(), cmd.id);
    let page = match cmd.pages.pages {
        Some(_) => None,
        None => Some(cmd.pages.page),
    };
    let first: Paginated<MediaItem> = match cmd.media_type {
        TitleKind::Movie => client
            .movie_recommendations(cmd.id, page)
            .await
            .map(MediaItem::from),
        TitleKind::Tv => client
            .tv_recommendations(cmd.id, page)
            .await
            .map(MediaItem::from),
    };

    match cmd.pages.pages {
        Some(pages) => {
            let seed = runtime::recommendations_seed(client, target, first);
            print_pages(seed, pages, cmd.pages.limit, output).await
        }
        None => print_page(first, cmd.pages.limit, output),
    }
}
