//! Card list view
//!
//! Renders any [`ListView`] whose items project to a [`Card`], followed by the
//! list footer ("Load More", "Loading...", "No more results", "No results
//! found") and, when the last page fetch failed, a one-line error.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem},
};

use crate::app::{ListState, ListView};
use crate::list::Footer;
use crate::models::{Card, CardItem};
use crate::ui::Theme;

/// A bordered, scrollable list of cards
pub struct CardList<'a, T> {
    title: String,
    view: &'a ListView<T>,
    focused: bool,
}

impl<'a, T: CardItem> CardList<'a, T> {
    pub fn new(title: impl Into<String>, view: &'a ListView<T>) -> Self {
        Self {
            title: title.into(),
            view,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let list = &self.view.list;
        let title = if list.is_empty() {
            format!(" {} ", self.title)
        } else {
            format!(
                " {} ({}/{}) ",
                self.title,
                self.view.cursor.selected + 1,
                list.len()
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(title, Theme::title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let error = list.last_error().map(|e| e.to_string());
        let rows = (inner.height as usize).saturating_sub(usize::from(error.is_some()));
        let offset = visible_offset(&self.view.cursor, rows);

        let mut lines: Vec<ListItem> = list
            .items()
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(i, item)| {
                let is_selected = self.focused && i == self.view.cursor.selected;
                render_item(&item.card(), is_selected)
            })
            .collect();

        // The footer occupies the row after the last item
        if list.len() >= offset && list.len() < offset + rows {
            lines.push(render_footer(list.footer()));
        }

        if let Some(message) = error {
            while lines.len() < rows {
                lines.push(ListItem::new(""));
            }
            lines.push(ListItem::new(Line::from(vec![
                Span::styled("✗ ", Theme::error()),
                Span::styled(message, Theme::error()),
                Span::styled("  r retry · esc dismiss", Theme::keybind_desc()),
            ])));
        }

        frame.render_widget(List::new(lines).style(Theme::text()), inner);
    }
}

/// First row to draw so the cursor is on screen even if the app's idea of
/// the viewport is taller than this area
pub fn visible_offset(cursor: &ListState, rows: usize) -> usize {
    if rows == 0 {
        return cursor.offset;
    }
    if cursor.selected >= cursor.offset + rows {
        cursor.selected + 1 - rows
    } else {
        cursor.offset.min(cursor.selected)
    }
}

/// ▸ Title  subtitle  [BADGE] ★ 7.5
pub fn render_item(card: &Card, is_selected: bool) -> ListItem<'static> {
    let marker = if is_selected { "▸ " } else { "  " };

    let mut spans = vec![
        Span::styled(
            marker.to_string(),
            if is_selected {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            card.title.clone(),
            if is_selected {
                Theme::list_item_selected()
            } else {
                Theme::text()
            },
        ),
    ];

    if !card.subtitle.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(card.subtitle.clone(), Theme::year()));
    }

    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!("[{}]", card.badge), Theme::badge()));

    if let Some(rating) = card.rating.filter(|r| *r > 0.0) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("★ {:.1}", rating), Theme::rating(rating)));
    }

    ListItem::new(Line::from(spans))
}

fn render_footer(footer: Footer) -> ListItem<'static> {
    let style = match footer {
        Footer::LoadMore | Footer::Loading => Theme::footer(),
        Footer::NoMoreResults | Footer::NoResultsFound => Theme::dimmed(),
    };
    let mut spans = vec![Span::styled(format!("  {}", footer.label()), style)];
    if footer == Footer::LoadMore {
        spans.push(Span::styled("  (m)", Theme::keybind_desc()));
    }
    ListItem::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_offset_follows_cursor() {
        let cursor = ListState {
            selected: 12,
            offset: 3,
            len: 20,
        };
        // A 5-row area can't show row 12 from offset 3
        assert_eq!(visible_offset(&cursor, 5), 8);
        // A tall area keeps the app's offset
        assert_eq!(visible_offset(&cursor, 15), 3);
    }
}
