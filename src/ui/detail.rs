//! Detail view for movies, TV shows and people
//!
//! Info panel on the left, recommendations (or a person's best known work)
//! on the right.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::DetailState;
use crate::models::{
    format_date, format_money, format_runtime, Genre, MovieDetails, PersonDetails, TvDetails,
};
use crate::ui::browser::CardList;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, detail: Option<&DetailState>) {
    let Some(detail) = detail else {
        render_message(frame, area, "Nothing selected", Theme::dimmed(), None);
        return;
    };

    match detail {
        DetailState::Loading(_) => {
            render_message(frame, area, "⟳ Loading...", Theme::loading(), None)
        }
        DetailState::NotFound(target) => render_message(
            frame,
            area,
            &format!("No {} with id {}", target.kind.as_str(), target.id),
            Theme::error(),
            Some("esc go back"),
        ),
        DetailState::Failed { message, .. } => render_message(
            frame,
            area,
            &format!("✗ {}", message),
            Theme::error(),
            Some("r try again · esc go back"),
        ),
        DetailState::Movie {
            details,
            recommendations,
        } => {
            let [info, side] = split(area);
            render_info(frame, info, movie_lines(details), "c cast & crew · v reviews");
            CardList::new("RECOMMENDATIONS", recommendations).render(frame, side);
        }
        DetailState::Tv {
            details,
            recommendations,
        } => {
            let [info, side] = split(area);
            render_info(frame, info, tv_lines(details), "c cast & crew · v reviews");
            CardList::new("RECOMMENDATIONS", recommendations).render(frame, side);
        }
        DetailState::Person { details, known_for } => {
            let [info, side] = split(area);
            render_info(frame, info, person_lines(details), "c filmography");
            CardList::new("KNOWN FOR", known_for).render(frame, side);
        }
    }
}

fn split(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    [chunks[0], chunks[1]]
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style, hint: Option<&str>) {
    let mut lines = vec![Line::from(""), Line::from(Span::styled(text.to_string(), style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint.to_string(), Theme::keybind_desc())));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border()),
        );
    frame.render_widget(paragraph, area);
}

fn render_info(frame: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>, hint: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" INFO ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(hint.to_string(), Theme::keybind_desc())));

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

// =============================================================================
// Info lines
// =============================================================================

fn title_line(title: &str, year: Option<u16>) -> Line<'static> {
    let year = year.map(|y| format!(" ({})", y)).unwrap_or_default();
    Line::from(vec![
        Span::styled("▶ ", Theme::accent()),
        Span::styled(title.to_string(), Theme::title()),
        Span::styled(year, Theme::secondary()),
    ])
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dimmed()),
        Span::styled(value.into(), Theme::text()),
    ])
}

fn genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn rating_spans(score: f32, votes: u32) -> Vec<Span<'static>> {
    if votes == 0 {
        return vec![Span::styled("Not yet rated", Theme::dimmed())];
    }
    vec![
        Span::styled(format!("★ {:.1}", score), Theme::rating(score)),
        Span::styled(format!(" ({} votes)", votes), Theme::dimmed()),
    ]
}

fn overview(lines: &mut Vec<Line<'static>>, heading: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(heading.to_string(), Theme::accent())));
    for line in text.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), Theme::text())));
    }
}

pub fn movie_lines(movie: &MovieDetails) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(&movie.title, movie.year())];

    if !movie.tagline.is_empty() {
        lines.push(Line::from(Span::styled(
            movie.tagline.clone(),
            Theme::secondary().add_modifier(Modifier::ITALIC),
        )));
    }

    let mut meta = rating_spans(movie.vote_average, movie.vote_count);
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(format_runtime(runtime), Theme::secondary()));
    }
    lines.push(Line::from(meta));

    if !movie.genres.is_empty() {
        lines.push(field("Genre", genres(&movie.genres)));
    }
    let directors = movie.crew_with_job("Director");
    if !directors.is_empty() {
        lines.push(field("Directed by", directors.join(", ")));
    }
    if let Some(date) = movie.release_date.as_deref().and_then(format_date) {
        lines.push(field("Released", date));
    }
    if !movie.status.is_empty() {
        lines.push(field("Status", movie.status.clone()));
    }
    if movie.budget > 0 {
        lines.push(field("Budget", format_money(movie.budget)));
    }
    if movie.revenue > 0 {
        lines.push(field("Revenue", format_money(movie.revenue)));
    }

    overview(&mut lines, "OVERVIEW", &movie.overview);
    lines
}

pub fn tv_lines(show: &TvDetails) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(&show.name, show.year())];

    if !show.tagline.is_empty() {
        lines.push(Line::from(Span::styled(
            show.tagline.clone(),
            Theme::secondary().add_modifier(Modifier::ITALIC),
        )));
    }

    let mut meta = rating_spans(show.vote_average, show.vote_count);
    meta.push(Span::styled(" │ ", Theme::dimmed()));
    meta.push(Span::styled(
        format!(
            "{} seasons, {} episodes",
            show.number_of_seasons, show.number_of_episodes
        ),
        Theme::secondary(),
    ));
    if let Some(runtime) = show.episode_run_time.first().filter(|r| **r > 0) {
        meta.push(Span::styled(" │ ", Theme::dimmed()));
        meta.push(Span::styled(format_runtime(*runtime), Theme::secondary()));
    }
    lines.push(Line::from(meta));

    if !show.genres.is_empty() {
        lines.push(field("Genre", genres(&show.genres)));
    }
    if !show.created_by.is_empty() {
        let names: Vec<&str> = show.created_by.iter().map(|c| c.name.as_str()).collect();
        lines.push(field("Created by", names.join(", ")));
    }
    if let Some(date) = show.first_air_date.as_deref().and_then(format_date) {
        lines.push(field("First aired", date));
    }
    if let Some(date) = show.last_air_date.as_deref().and_then(format_date) {
        lines.push(field("Last aired", date));
    }
    if !show.status.is_empty() {
        lines.push(field("Status", show.status.clone()));
    }

    overview(&mut lines, "OVERVIEW", &show.overview);

    let seasons: Vec<_> = show.seasons.iter().filter(|s| s.season_number > 0).collect();
    if !seasons.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("SEASONS", Theme::accent())));
        for season in seasons {
            let aired = season
                .air_date
                .as_deref()
                .and_then(crate::models::extract_year)
                .map(|y| format!(" ({})", y))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", season.name), Theme::text()),
                Span::styled(aired, Theme::year()),
                Span::styled(format!("  {} episodes", season.episode_count), Theme::dimmed()),
            ]));
        }
    }
    lines
}

pub fn person_lines(person: &PersonDetails) -> Vec<Line<'static>> {
    let mut lines = vec![title_line(&person.name, None)];

    if !person.known_for_department.is_empty() {
        lines.push(field("Known for", person.known_for_department.clone()));
    }
    if let Some(born) = person.birthday.as_deref().and_then(format_date) {
        let place = person
            .place_of_birth
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!(" in {}", p))
            .unwrap_or_default();
        lines.push(field("Born", format!("{}{}", born, place)));
    }
    if let Some(died) = person.deathday.as_deref().and_then(format_date) {
        lines.push(field("Died", died));
    }
    lines.push(field("Gender", person.gender.to_string()));
    if !person.also_known_as.is_empty() {
        lines.push(field("Also known as", person.also_known_as.join(", ")));
    }

    overview(&mut lines, "BIOGRAPHY", &person.biography);
    lines
}
