//! Background execution of app requests
//!
//! Every [`Request`] and [`PendingPage`] the app queues runs on its own tokio
//! task. Finished work is sent back over an unbounded channel and applied on
//! the UI loop, so the app state is only ever touched from one place.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{TmdbClient, TmdbError};
use crate::app::{App, CreditLists, Details, Event, PendingPage, Request};
use crate::filmography::{self, pager, LOCAL_PAGE_SIZE};
use crate::list::{page_fn, ListSeed};
use crate::models::{Card, CardItem, Feed, MediaItem, MediaKind, Paginated, Review, Target};

// =============================================================================
// Seeds
// =============================================================================

/// Page 1 of a feed plus a fetch function for the rest
pub async fn feed_seed(client: Arc<TmdbClient>, feed: Feed) -> ListSeed<MediaItem> {
    let first = client.feed(feed, None).await;
    let fetch = page_fn(move |page| {
        let client = Arc::clone(&client);
        async move { Ok::<_, anyhow::Error>(client.feed(feed, Some(page)).await.results) }
    });
    ListSeed::from_page(first, Some(fetch))
}

/// Page 1 of a typed search plus a fetch function for the rest
pub async fn search_seed(
    client: Arc<TmdbClient>,
    kind: MediaKind,
    query: String,
) -> ListSeed<MediaItem> {
    let first = client.search(kind, &query, None).await;
    let fetch = page_fn(move |page| {
        let client = Arc::clone(&client);
        let query = query.clone();
        async move {
            Ok::<_, anyhow::Error>(client.search(kind, &query, Some(page)).await.results)
        }
    });
    ListSeed::from_page(first, Some(fetch))
}

/// Reviews of a movie or show. People have none.
pub async fn reviews_seed(client: Arc<TmdbClient>, target: Target) -> ListSeed<Review> {
    let first = reviews_page(&client, target, None).await;
    let fetch = page_fn(move |page| {
        let client = Arc::clone(&client);
        async move { Ok::<_, anyhow::Error>(reviews_page(&client, target, Some(page)).await.results) }
    });
    ListSeed::from_page(first, Some(fetch))
}

async fn reviews_page(client: &TmdbClient, target: Target, page: Option<u32>) -> Paginated<Review> {
    match target.kind {
        MediaKind::Movie => client.movie_reviews(target.id, page).await,
        MediaKind::Tv => client.tv_reviews(target.id, page).await,
        MediaKind::Person => Paginated::empty(),
    }
}

/// Recommendations after the appended first page
pub fn recommendations_seed(
    client: Arc<TmdbClient>,
    target: Target,
    first: Paginated<MediaItem>,
) -> ListSeed<MediaItem> {
    let fetch = page_fn(move |page| {
        let client = Arc::clone(&client);
        async move {
            let items: Vec<MediaItem> = match target.kind {
                MediaKind::Movie => client
                    .movie_recommendations(target.id, Some(page))
                    .await
                    .map(MediaItem::from)
                    .results,
                MediaKind::Tv => client
                    .tv_recommendations(target.id, Some(page))
                    .await
                    .map(MediaItem::from)
                    .results,
                MediaKind::Person => Vec::new(),
            };
            Ok::<_, anyhow::Error>(items)
        }
    });
    ListSeed::from_page(first, Some(fetch))
}

fn cards<T: CardItem>(items: &[T]) -> Vec<Card> {
    items.iter().map(CardItem::card).collect()
}

// =============================================================================
// Screens
// =============================================================================

/// Load a detail page. Movies and shows without their credits can't be shown.
pub async fn details(
    client: Arc<TmdbClient>,
    target: Target,
) -> Result<Option<Details>, TmdbError> {
    match target.kind {
        MediaKind::Movie => {
            let Some(details) = client.movie_details(target.id).await? else {
                return Ok(None);
            };
            details.require_credits()?;
            let first = details
                .recommendations
                .clone()
                .unwrap_or_default()
                .map(MediaItem::from);
            Ok(Some(Details::Movie {
                details: Box::new(details),
                recommendations: recommendations_seed(client, target, first),
            }))
        }
        MediaKind::Tv => {
            let Some(details) = client.tv_details(target.id).await? else {
                return Ok(None);
            };
            details.require_credits()?;
            let first = details
                .recommendations
                .clone()
                .unwrap_or_default()
                .map(MediaItem::from);
            Ok(Some(Details::Tv {
                details: Box::new(details),
                recommendations: recommendations_seed(client, target, first),
            }))
        }
        MediaKind::Person => {
            let Some(details) = client.person_details(target.id).await? else {
                return Ok(None);
            };
            let known_for = cards(&filmography::known_for(&details));
            Ok(Some(Details::Person {
                details: Box::new(details),
                known_for: pager(known_for, LOCAL_PAGE_SIZE),
            }))
        }
    }
}

/// Cast and crew of a title, or a person's credits newest first
pub async fn credits(
    client: Arc<TmdbClient>,
    target: Target,
) -> Result<Option<CreditLists>, TmdbError> {
    let lists = match target.kind {
        MediaKind::Movie => client.movie_credits(target.id).await?.map(|c| {
            (cards(&c.cast), cards(&c.crew))
        }),
        MediaKind::Tv => client.tv_credits(target.id).await?.map(|c| {
            (cards(&c.cast), cards(&c.crew))
        }),
        MediaKind::Person => client
            .person_combined_credits(target.id)
            .await?
            .map(|c| {
                (
                    cards(&filmography::by_date(&c.cast)),
                    cards(&filmography::by_date(&c.crew)),
                )
            }),
    };
    Ok(lists.map(|(cast, crew)| CreditLists {
        cast: pager(cast, LOCAL_PAGE_SIZE),
        crew: pager(crew, LOCAL_PAGE_SIZE),
    }))
}

/// Run one screen request to completion
pub async fn execute(client: Arc<TmdbClient>, request: Request) -> Event {
    match request {
        Request::Home(window) => {
            let (popular, trending) = tokio::join!(
                feed_seed(Arc::clone(&client), Feed::PopularMovies),
                feed_seed(Arc::clone(&client), Feed::TrendingMovies(window)),
            );
            Event::Home { popular, trending }
        }
        Request::Feed(feed) => Event::Feed {
            feed,
            seed: feed_seed(client, feed).await,
        },
        Request::Search { query, kind } => {
            let kind = client.resolve_search_kind(&query, kind).await;
            let seed = search_seed(client, kind, query.clone()).await;
            Event::Search { query, kind, seed }
        }
        Request::Details(target) => {
            let outcome = details(client, target).await.map_err(|e| {
                tracing::error!(target = ?target, error = %e, "detail page failed");
                e.to_string()
            });
            Event::Details { target, outcome }
        }
        Request::Credits(target) => {
            let outcome = credits(client, target).await.map_err(|e| {
                tracing::error!(target = ?target, error = %e, "credits failed");
                e.to_string()
            });
            Event::Credits { target, outcome }
        }
        Request::Reviews(target) => Event::Reviews {
            target,
            seed: reviews_seed(client, target).await,
        },
    }
}

/// Run one page fetch to completion
pub async fn run_page(page: PendingPage) -> Event {
    match page {
        PendingPage::Media {
            slot,
            view,
            request,
        } => Event::MediaPage {
            slot,
            view,
            result: request.run().await,
        },
        PendingPage::Cards {
            slot,
            view,
            request,
        } => Event::CardPage {
            slot,
            view,
            result: request.run().await,
        },
        PendingPage::Reviews { view, request } => Event::ReviewPage {
            view,
            result: request.run().await,
        },
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// Spawns queued work and collects the results
pub struct Runtime {
    client: Arc<TmdbClient>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Runtime {
    pub fn new(client: TmdbClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            tx,
            rx,
        }
    }

    pub fn client(&self) -> &Arc<TmdbClient> {
        &self.client
    }

    /// Spawn everything the app has queued since the last call
    pub fn dispatch(&self, app: &mut App) {
        for request in app.take_requests() {
            tracing::debug!(request = ?request, "dispatching");
            let client = Arc::clone(&self.client);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                if tx.send(execute(client, request).await).is_err() {
                    tracing::debug!("app closed before request finished");
                }
            });
        }

        for page in app.take_pages() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                if tx.send(run_page(page).await).is_err() {
                    tracing::debug!("app closed before page finished");
                }
            });
        }
    }

    /// Apply every finished result without waiting. Returns how many were applied.
    pub fn drain(&mut self, app: &mut App) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            app.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next finished result
    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
