//! Shaping a person's credits for display
//!
//! TMDB returns every credit a person has, including talk show appearances and
//! duplicate entries for people credited several times on one title.

use std::collections::HashSet;
use std::sync::Arc;

use crate::list::{page_fn, ListSeed};
use crate::models::{Credit, MediaKind, PersonDetails};

/// Page size used when an in-memory list is paged through a list controller
pub const LOCAL_PAGE_SIZE: usize = 20;

const TALK_SHOW_GENRE: u32 = 10767;
const NEWS_GENRE: u32 = 10763;

/// Titles the person is best known for.
///
/// Actors are judged by their cast credits, everyone else by crew credits.
/// Appearances as themselves, talk shows, news and genre-less entries are
/// dropped; English-language titles sort first, then by popularity.
pub fn known_for(details: &PersonDetails) -> Vec<Credit> {
    let Some(credits) = details.combined_credits.as_ref() else {
        return Vec::new();
    };
    let source = if details.known_for_department == "Acting" {
        &credits.cast
    } else {
        &credits.crew
    };

    let mut picked: Vec<Credit> = dedupe(source)
        .into_iter()
        .filter(|c| c.character != "Self")
        .filter(|c| {
            let genres = c.media.genre_ids();
            !genres.is_empty() && !genres.contains(&TALK_SHOW_GENRE) && !genres.contains(&NEWS_GENRE)
        })
        .collect();

    picked.sort_by(|a, b| {
        let a_en = a.media.original_language() == "en";
        let b_en = b.media.original_language() == "en";
        b_en.cmp(&a_en)
            .then_with(|| b.media.popularity().total_cmp(&a.media.popularity()))
    });
    picked
}

/// Credits newest first, with undated (announced) titles at the top
pub fn by_date(credits: &[Credit]) -> Vec<Credit> {
    let mut sorted = dedupe(credits);
    sorted.sort_by(|a, b| match (a.media.date(), b.media.date()) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(a),
    });
    sorted
}

/// Keep the first credit per title
fn dedupe(credits: &[Credit]) -> Vec<Credit> {
    let mut seen: HashSet<(MediaKind, u64)> = HashSet::new();
    credits
        .iter()
        .filter(|c| seen.insert((c.media.kind(), c.media.id())))
        .cloned()
        .collect()
}

/// Serve an in-memory collection through a list controller, `page_size` at a time
pub fn pager<T>(items: Vec<T>, page_size: usize) -> ListSeed<T>
where
    T: Clone + Send + Sync + 'static,
{
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1) as u32;
    let first: Vec<T> = items.iter().take(page_size).cloned().collect();
    let all = Arc::new(items);

    let fetch = page_fn(move |page: u32| {
        let all = Arc::clone(&all);
        async move {
            let start = (page.saturating_sub(1) as usize) * page_size;
            Ok::<_, anyhow::Error>(all.iter().skip(start).take(page_size).cloned().collect())
        }
    });

    ListSeed::new(first, total_pages, Some(fetch))
}
