use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Focus};
use crate::config;
use crate::player::MediaBackend;
use crate::prefs::PrefStore;
use crate::ui;

/// Two-key prefixes pending across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    pending_gg: bool,
    pending_zz: bool,
}

/// Main terminal loop: pump media events, draw, handle one key. Returns
/// `Ok(())` when the user quits.
pub fn run<M: MediaBackend, S: PrefStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App<M, S>,
    state: &mut EventLoopState,
) -> std::io::Result<()> {
    loop {
        app.session.pump(Instant::now());
        app.sync_follow();

        let visible = app.visible_indices();
        terminal.draw(|f| ui::draw(f, app, &visible, settings.controls.seek_step_percent))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key_event(key, app, state) {
                return Ok(());
            }
        }
    }
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event<M: MediaBackend, S: PrefStore>(
    key: KeyEvent,
    app: &mut App<M, S>,
    state: &mut EventLoopState,
) -> bool {
    let code = key.code;
    if code != KeyCode::Char('g') {
        state.pending_gg = false;
    }
    if code != KeyCode::Char('z') {
        state.pending_zz = false;
    }

    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.cursor_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('z') => {
            if state.pending_zz {
                state.pending_zz = false;
                app.follow_playback_on();
            } else {
                state.pending_zz = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.cursor_bottom();
        }
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Artists => app.artist_cursor_down(),
            Focus::Tracks => {
                app.follow_playback_off();
                app.cursor_down();
            }
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Artists => app.artist_cursor_up(),
            Focus::Tracks => {
                app.follow_playback_off();
                app.cursor_up();
            }
        },
        KeyCode::Enter => match app.focus {
            Focus::Artists => {
                app.toggle_artist_at_cursor();
            }
            Focus::Tracks => app.play_selected(),
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Char('l') => app.next(),
        KeyCode::Char('h') => app.previous(),
        KeyCode::Char('L') => app.seek_forward(),
        KeyCode::Char('H') => app.seek_back(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('r') => app.cycle_repeat(),
        KeyCode::Char('K') => app.toggle_info_window(),
        KeyCode::Char('d') => app.toggle_dark_mode(),
        KeyCode::Char('a') => app.toggle_artist_panel(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('x') => {
            app.toggle_artist_at_cursor();
        }
        KeyCode::Char('A') => {
            app.select_all_artists();
        }
        KeyCode::Char('N') => {
            app.select_no_artists();
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog::{Catalog, Track};
    use crate::player::testing::FakeMedia;
    use crate::player::{MediaEvent, PlaybackState, Session, SessionOptions};
    use crate::prefs::{MemoryStore, Preferences};

    fn app(radio: bool) -> App<FakeMedia, MemoryStore> {
        let tracks = ["a", "b", "c"]
            .iter()
            .zip(["X", "Y", "X"])
            .map(|(name, artist)| Track {
                filename: format!("{name}.mp3"),
                title: name.to_uppercase(),
                artist: artist.to_string(),
                cover_image: None,
            })
            .collect();
        let options = SessionOptions {
            radio,
            ..SessionOptions::default()
        };
        let session = Session::with_rng(
            Catalog::new(tracks),
            FakeMedia::default(),
            Preferences::new(MemoryStore::default(), "t"),
            options,
            StdRng::seed_from_u64(7),
        );
        App::new(session, &config::Settings::default())
    }

    fn press(app: &mut App<FakeMedia, MemoryStore>, state: &mut EventLoopState, c: char) -> bool {
        handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), app, state)
    }

    #[test]
    fn q_quits_and_other_keys_do_not() {
        let mut app = app(false);
        let mut state = EventLoopState::default();
        assert!(!press(&mut app, &mut state, 'j'));
        assert!(press(&mut app, &mut state, 'q'));
    }

    #[test]
    fn gg_needs_two_consecutive_presses() {
        let mut app = app(false);
        let mut state = EventLoopState::default();
        press(&mut app, &mut state, 'G');
        assert_eq!(app.selected, 2);

        press(&mut app, &mut state, 'g');
        press(&mut app, &mut state, 'j');
        press(&mut app, &mut state, 'g');
        assert_eq!(app.selected, 0, "j wrapped, g alone does not jump");

        press(&mut app, &mut state, 'G');
        press(&mut app, &mut state, 'g');
        press(&mut app, &mut state, 'g');
        assert_eq!(app.selected, 0);
        assert!(!app.follow_playback);
    }

    #[test]
    fn zz_returns_to_following_playback() {
        let mut app = app(false);
        let mut state = EventLoopState::default();
        app.session.start();
        press(&mut app, &mut state, 'j');
        assert!(!app.follow_playback);
        press(&mut app, &mut state, 'z');
        press(&mut app, &mut state, 'z');
        assert!(app.follow_playback);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn space_toggles_playback() {
        let mut app = app(false);
        let mut state = EventLoopState::default();
        app.session.start();
        app.session
            .handle_media_event(MediaEvent::Ready { duration: None }, Instant::now());
        assert_eq!(*app.session.state(), PlaybackState::Ready);
        press(&mut app, &mut state, ' ');
        assert_eq!(*app.session.state(), PlaybackState::Playing);
        press(&mut app, &mut state, 'p');
        assert_eq!(*app.session.state(), PlaybackState::Paused);
    }

    #[test]
    fn enter_in_artist_panel_toggles_the_artist() {
        let mut app = app(true);
        let mut state = EventLoopState::default();
        app.session.start();
        press(&mut app, &mut state, 'a');
        assert_eq!(app.focus, Focus::Artists);

        handle_key_event(
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            &mut app,
            &mut state,
        );
        assert_eq!(app.visible_indices(), vec![1]);

        press(&mut app, &mut state, 'A');
        assert_eq!(app.visible_indices(), vec![0, 1, 2]);
    }
}
