//! UI rendering for the terminal preview.
//!
//! Pure projection of [`App`] state into a `ratatui` frame.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::player::{ErrorReason, MediaBackend, PlaybackState};
use crate::prefs::PrefStore;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", "seek"),
    ("+/-", "volume"),
    ("s", "shuffle"),
    ("r", "repeat"),
    ("zz", "jump to playing"),
    ("K", "track info"),
    ("d", "dark"),
    ("q", "quit"),
];

const RADIO_CONTROLS: &[(&str, &str)] = &[
    ("a", "artists"),
    ("tab", "focus"),
    ("x", "toggle artist"),
    ("A/N", "all/none"),
];

fn controls_text(radio: bool, seek_percent: u8) -> String {
    let extra: &[(&str, &str)] = if radio { RADIO_CONTROLS } else { &[] };
    CONTROLS
        .iter()
        .chain(extra)
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] {v} -/+{seek_percent}%")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn state_text(state: &PlaybackState) -> String {
    match state {
        PlaybackState::Error(ErrorReason::TrackLoad(reason)) => {
            format!("Error: {reason} (skipping)")
        }
        PlaybackState::Error(ErrorReason::PlaybackStart(_)) => {
            "Press play to start".to_string()
        }
        other => other.label().to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Visible slice of a list that keeps `sel_pos` centered when possible.
fn window(total: usize, height: usize, sel_pos: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = sel_pos.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn base_style(dark: bool) -> Style {
    if dark {
        Style::default().fg(Color::Gray).bg(Color::Black)
    } else {
        Style::default()
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn status_text<M: MediaBackend, S: PrefStore>(app: &App<M, S>) -> String {
    let session = &app.session;
    let mut parts: Vec<String> = Vec::new();

    parts.push(if app.follow_playback {
        " CURSOR: Follow".to_string()
    } else {
        " CURSOR: Free-roam".to_string()
    });

    let seq = session.sequencer();
    parts.push(format!(
        "Shuffle: {}",
        if seq.shuffle() { "ON" } else { "OFF" }
    ));
    parts.push(format!("Repeat: {}", seq.repeat().as_str()));
    parts.push(format!("Vol: {:.0}%", session.volume() * 100.0));

    match session.current_track() {
        Some((_, track)) => {
            let time = match session.duration() {
                Some(total) => format!(
                    "{} / {}",
                    format_mmss(session.position()),
                    format_mmss(total)
                ),
                None => format_mmss(session.position()),
            };
            parts.push(format!("Song: {} - {} [{}]", track.title, track.artist, time));
        }
        None => parts.push("No track".to_string()),
    }
    parts.push(state_text(session.state()));

    if let Some(f) = session.filter() {
        parts.push(format!(
            "Artists: {}/{}",
            f.enabled().len(),
            f.artists().len()
        ));
    }
    if let Some(site) = &app.site_label {
        parts.push(format!("Site: {site}"));
    }

    parts.join(" • ")
}

fn draw_tracks<M: MediaBackend, S: PrefStore>(
    frame: &mut Frame,
    app: &App<M, S>,
    visible: &[usize],
    area: Rect,
) {
    let catalog = app.session.catalog();
    let playing = app.session.current_track().map(|(i, _)| i);
    let sel_pos = visible.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end) = window(visible.len(), area.height.saturating_sub(2) as usize, sel_pos);

    // Only build items for the visible window.
    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .filter_map(|&i| catalog.get(i).map(|t| (i, t)))
        .map(|(i, t)| {
            let marker = if Some(i) == playing { "♪ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(t.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(t.artist.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let mut block = Block::default().borders(Borders::ALL).title(" tracks ");
    if app.focus == Focus::Tracks {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_artists<M: MediaBackend, S: PrefStore>(frame: &mut Frame, app: &App<M, S>, area: Rect) {
    let Some(filter) = app.session.filter() else {
        return;
    };
    let artists = filter.artists();
    let (start, end) = window(
        artists.len(),
        area.height.saturating_sub(2) as usize,
        app.artist_cursor,
    );

    let items: Vec<ListItem> = artists[start..end]
        .iter()
        .map(|a| {
            let mark = if filter.is_enabled(a) { "[x] " } else { "[ ] " };
            ListItem::new(format!("{mark}{a}"))
        })
        .collect();

    let mut block = Block::default().borders(Borders::ALL).title(" artists ");
    if app.focus == Focus::Artists {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if !artists.is_empty() {
        state.select(Some(app.artist_cursor.min(artists.len() - 1) - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_info<M: MediaBackend, S: PrefStore>(frame: &mut Frame, app: &App<M, S>, area: Rect) {
    let popup = centered_rect_sized(72, 8, area);
    frame.render_widget(Clear, popup);

    let info = match app.session.catalog().get(app.selected) {
        Some(t) => format!(
            "Title: {}\nArtist: {}\nFile: {}\nCover: {}",
            t.title,
            t.artist,
            t.filename,
            if t.cover_image.is_some() {
                "embedded"
            } else {
                "none"
            }
        ),
        None => "No track selected".to_string(),
    };
    let paragraph = Paragraph::new(info)
        .block(
            Block::default()
                .padding(left_pad())
                .borders(Borders::ALL)
                .title(" track info (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup);
}

/// Render the whole preview into `frame`.
pub fn draw<M: MediaBackend, S: PrefStore>(
    frame: &mut Frame,
    app: &App<M, S>,
    visible: &[usize],
    seek_percent: u8,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(base_style(app.dark_mode)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let header = Paragraph::new(app.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" sitecast ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let mut status_style = Style::default();
    if matches!(app.session.state(), PlaybackState::Error(_)) {
        status_style = status_style.fg(Color::Red);
    }
    let status = Paragraph::new(status_text(app))
        .style(status_style)
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let main = if app.artist_panel && app.session.is_radio() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[2]);
        draw_artists(frame, app, cols[1]);
        cols[0]
    } else {
        chunks[2]
    };
    draw_tracks(frame, app, visible, main);

    if app.info_window {
        draw_info(frame, app, main);
    }

    let footer = Paragraph::new(controls_text(app.session.is_radio(), seek_percent))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_centers_selection() {
        assert_eq!(window(5, 10, 3), (0, 5));
        assert_eq!(window(100, 10, 50), (45, 55));
        assert_eq!(window(100, 10, 2), (0, 10));
        assert_eq!(window(100, 10, 98), (90, 100));
    }

    #[test]
    fn controls_mention_seek_step_and_radio_keys() {
        let plain = controls_text(false, 5);
        assert!(plain.contains("[H/L] seek -/+5%"));
        assert!(!plain.contains("[a] artists"));
        assert!(controls_text(true, 5).contains("[x] toggle artist"));
    }

    #[test]
    fn format_mmss_pads() {
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::ZERO), "00:00");
    }

    #[test]
    fn error_states_explain_themselves() {
        let load = PlaybackState::Error(ErrorReason::TrackLoad("404".into()));
        assert_eq!(state_text(&load), "Error: 404 (skipping)");
        let start = PlaybackState::Error(ErrorReason::PlaybackStart("denied".into()));
        assert_eq!(state_text(&start), "Press play to start");
    }
}
