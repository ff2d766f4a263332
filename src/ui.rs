//! UI rendering for the player panel.
//!
//! The panel is a fixed-size box centred in the terminal, standing in for a
//! frameless desktop window: background colour from the skin image, a cover
//! swatch, the now-playing text and a one-line control legend.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{Controller, PlaybackState};
use crate::audio::SessionFactory;
use crate::library::Playlist;
use crate::skin::Skin;

const CONTROLS: &str = "h◀ spc⏯ l▶ r⟳ q✕";

/// Centre a `width` x `height` box inside `r`, shrinking it to fit.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + (r.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Black or white, whichever reads better on `bg`.
fn contrast([r, g, b]: [u8; 3]) -> Color {
    let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    if luma > 128_000 {
        Color::Black
    } else {
        Color::White
    }
}

fn state_label<F: SessionFactory>(controller: &Controller<F>) -> &'static str {
    match controller.state() {
        PlaybackState::Idle => "■ idle",
        // The session drained but its completion has not been handled yet.
        PlaybackState::Playing if !controller.is_playing() => "▶ …",
        PlaybackState::Playing => "▶ playing",
        PlaybackState::Paused => "❚❚ paused",
    }
}

/// Name of the entry under the cursor, for when nothing has been opened yet.
fn cued_title(playlist: &Playlist) -> String {
    playlist
        .current()
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "No track".to_string())
}

fn panel_title(skin: &Skin) -> String {
    if skin.pinned {
        " skinamp ^ ".to_string()
    } else {
        " skinamp ".to_string()
    }
}

/// Render the panel for `controller` using `skin`.
pub fn draw<F: SessionFactory>(frame: &mut Frame, controller: &Controller<F>, skin: &Skin) {
    let (cols, rows) = skin.panel_size();
    let area = centered_rect_sized(cols, rows, frame.area());
    frame.render_widget(Clear, area);

    let base = match &skin.background {
        Some(bg) => Style::default()
            .bg(rgb(bg.average_rgb))
            .fg(contrast(bg.average_rgb)),
        None => Style::default(),
    };

    let mut title = panel_title(skin);
    if skin.minimized {
        title = format!("{}{} ", title, state_label(controller));
    }
    let frame_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
        .style(base);
    let inner = frame_block.inner(area);
    frame.render_widget(frame_block, area);

    if skin.minimized || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(inner);

    // Cover swatch
    let track = controller.current_track();
    let cover = match track.and_then(|t| t.artwork.as_ref()) {
        Some(art) => Paragraph::new(format!("{}×{}", art.width, art.height))
            .alignment(Alignment::Center)
            .style(Style::default().bg(rgb(art.average_rgb)).fg(contrast(art.average_rgb))),
        None => Paragraph::new("♪")
            .alignment(Alignment::Center)
            .style(base.add_modifier(Modifier::DIM)),
    };
    frame.render_widget(cover, chunks[0]);

    let (title, artist) = match track {
        Some(t) => (t.title.clone(), t.artist.as_str()),
        None => (cued_title(controller.playlist()), ""),
    };
    frame.render_widget(
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .style(base.add_modifier(Modifier::BOLD)),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(artist).alignment(Alignment::Center).style(base),
        chunks[2],
    );

    let playlist = controller.playlist();
    let position = if playlist.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", playlist.cursor() + 1, playlist.len())
    };
    let loop_text = if controller.loop_enabled() { "⟳on" } else { "⟳off" };
    frame.render_widget(
        Paragraph::new(format!(
            "{} {} {}",
            state_label(controller),
            position,
            loop_text
        ))
        .alignment(Alignment::Center)
        .style(base),
        chunks[3],
    );

    let status = controller.last_error().unwrap_or(CONTROLS);
    frame.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(base),
        chunks[4],
    );
}
