//! Player session integration tests
//!
//! Drives a full session (store + sync) against the simulated backend.
//! Focus on real-world scenarios: end of queue, broken files, media keys,
//! seeking, persistence across sessions.

use shelf_core::{Track, TrackId};
use shelf_playback::{
    Action, BackendCall, Dispatch, JsonFilePreferences, MediaBackend, MediaEvent,
    MemoryPreferences, Notification, PlaybackError, PlaybackMode, PlayerConfig, PlayerSession,
    SimulatedBackend,
};
use std::time::{Duration, Instant};

// ===== Test Helpers =====

type Session = PlayerSession<SimulatedBackend, MemoryPreferences>;

fn create_track(id: i64, title: &str) -> Track {
    Track::new(
        TrackId::new(id),
        title,
        "Test Artist",
        format!("https://cdn/audio/{}.mp3", id),
    )
    .with_duration(60.0)
}

fn abc() -> Vec<Track> {
    vec![
        create_track(1, "A"),
        create_track(2, "B"),
        create_track(3, "C"),
    ]
}

fn config() -> PlayerConfig {
    PlayerConfig {
        error_skip_delay_ms: 1000,
        ..PlayerConfig::default()
    }
}

fn new_session() -> Session {
    PlayerSession::new(SimulatedBackend::new(60.0), MemoryPreferences::new(), &config())
}

/// Deliver everything the backend has queued, like an event loop would
fn pump(session: &mut Session, now: Instant) {
    loop {
        let events = session.backend_mut().take_events();
        if events.is_empty() {
            break;
        }
        for event in events {
            session.handle_media_event_at(event, now);
        }
    }
}

/// Deliver events for at most `rounds` turns, then require quiet
fn pump_bounded(session: &mut Session, rounds: usize) {
    for _ in 0..rounds {
        let events = session.backend_mut().take_events();
        if events.is_empty() {
            return;
        }
        for event in events {
            session.handle_media_event(event);
        }
    }
    assert!(
        session.backend_mut().take_events().is_empty(),
        "media events still arriving after {} rounds",
        rounds
    );
}

fn play_queue(tracks: Vec<Track>) -> Session {
    let mut session = new_session();
    session
        .dispatch(Action::SetQueue {
            tracks,
            play_immediately: true,
        })
        .unwrap();
    pump(&mut session, Instant::now());
    session
}

// ===== Loading and transport =====

#[test]
fn test_play_waits_for_ready_event() {
    let mut session = new_session();
    session
        .dispatch(Action::SetQueue {
            tracks: abc(),
            play_immediately: true,
        })
        .unwrap();

    // Loaded but not ready: intent is queued, backend silent
    assert_eq!(session.backend().src(), Some("https://cdn/audio/1.mp3"));
    assert!(!session.backend().is_playing());
    assert!(session.state().is_playing());

    pump(&mut session, Instant::now());
    assert!(session.is_media_ready());
    assert!(session.backend().is_playing());
    assert_eq!(session.state().duration(), 60.0);
}

#[test]
fn test_toggle_play_pauses_backend() {
    let mut session = play_queue(abc());
    session.dispatch(Action::TogglePlay).unwrap();
    assert!(!session.backend().is_playing());

    session.dispatch(Action::TogglePlay).unwrap();
    assert!(session.backend().is_playing());
}

#[test]
fn test_time_updates_mirror_position() {
    let mut session = play_queue(abc());
    session.backend_mut().advance(12.5);
    pump(&mut session, Instant::now());
    assert_eq!(session.state().current_time(), 12.5);
}

#[test]
fn test_track_change_loads_new_source() {
    let mut session = play_queue(abc());
    session.backend_mut().take_calls();

    session.dispatch(Action::PlayIndex(2)).unwrap();
    let calls = session.backend_mut().take_calls();
    assert_eq!(calls, vec![BackendCall::Load("https://cdn/audio/3.mp3".to_string())]);

    pump(&mut session, Instant::now());
    assert!(session.backend().is_playing());
    assert_eq!(session.state().current_time(), 0.0);
}

#[test]
fn test_volume_and_mute_are_applied() {
    let mut session = play_queue(abc());
    session.dispatch(Action::SetVolume(0.3)).unwrap();
    assert_eq!(session.backend().volume(), 0.3);
    assert!(!session.backend().is_muted());

    session.dispatch(Action::SetVolume(0.0)).unwrap();
    assert!(session.backend().is_muted());

    session.dispatch(Action::SetVolume(0.5)).unwrap();
    assert!(!session.backend().is_muted());

    session.press_key("m").unwrap().unwrap();
    assert!(session.backend().is_muted());
    assert_eq!(session.backend().volume(), 0.5);
}

// ===== End of track =====

#[test]
fn test_sequential_advances_at_end_of_track() {
    let mut session = play_queue(abc());
    session.backend_mut().advance(61.0);
    pump(&mut session, Instant::now());

    assert_eq!(session.state().current_index(), Some(1));
    assert!(session.state().is_playing());
    assert_eq!(session.backend().src(), Some("https://cdn/audio/2.mp3"));
    assert!(session.backend().is_playing());
}

#[test]
fn test_sequential_stops_after_last_track() {
    let mut session = play_queue(abc());
    session.dispatch(Action::PlayIndex(2)).unwrap();
    pump(&mut session, Instant::now());

    session.backend_mut().advance(61.0);
    pump(&mut session, Instant::now());

    let state = session.state();
    assert!(!state.is_playing());
    assert_eq!(state.current_index(), Some(2));
    assert_eq!(state.current_time(), 0.0);
    assert!(!session.backend().is_playing());
    assert_eq!(session.backend().current_time(), 0.0);
}

#[test]
fn test_repeat_all_wraps_after_last_track() {
    let mut session = play_queue(abc());
    session.dispatch(Action::SetMode(PlaybackMode::RepeatAll)).unwrap();
    session.dispatch(Action::PlayIndex(2)).unwrap();
    pump(&mut session, Instant::now());

    session.backend_mut().advance(61.0);
    pump(&mut session, Instant::now());

    assert_eq!(session.state().current_index(), Some(0));
    assert!(session.backend().is_playing());
}

#[test]
fn test_repeat_one_restarts_same_track() {
    let mut session = play_queue(abc());
    session.dispatch(Action::SetMode(PlaybackMode::RepeatOne)).unwrap();
    session.backend_mut().take_calls();

    session.backend_mut().advance(61.0);
    pump(&mut session, Instant::now());

    assert_eq!(session.state().current_index(), Some(0));
    assert!(session.state().is_playing());
    assert!(session.backend().is_playing());
    let calls = session.backend_mut().take_calls();
    assert!(calls.contains(&BackendCall::Seek(0.0)));
    assert!(!calls.iter().any(|c| matches!(c, BackendCall::Load(_))));
}

#[test]
fn test_previous_restart_reseeks_backend() {
    let mut session = play_queue(abc());
    session.backend_mut().advance(20.0);
    pump(&mut session, Instant::now());
    session.backend_mut().take_calls();

    session.dispatch(Action::PrevSong).unwrap();

    assert_eq!(session.state().current_index(), Some(0));
    assert_eq!(session.state().current_time(), 0.0);
    assert_eq!(session.backend_mut().take_calls(), vec![BackendCall::Seek(0.0)]);
}

// ===== Errors =====

#[test]
fn test_broken_track_is_skipped_after_delay() {
    let mut session = new_session();
    session
        .backend_mut()
        .mark_broken("https://cdn/audio/1.mp3");
    let start = Instant::now();

    session
        .dispatch(Action::SetQueue {
            tracks: abc(),
            play_immediately: true,
        })
        .unwrap();
    pump(&mut session, start);

    let notifications = session.drain_notifications();
    assert!(matches!(
        notifications.as_slice(),
        [Notification::PlaybackFailed { track_id, title, .. }]
            if *track_id == TrackId::new(1) && title == "A"
    ));

    // Not yet due
    session.tick_at(start + Duration::from_millis(500));
    assert_eq!(session.state().current_index(), Some(0));

    session.tick_at(start + Duration::from_millis(1000));
    assert_eq!(session.state().current_index(), Some(1));

    pump(&mut session, start + Duration::from_millis(1000));
    assert!(session.backend().is_playing());
    assert_eq!(session.backend().src(), Some("https://cdn/audio/2.mp3"));
}

#[test]
fn test_skip_is_suppressed_if_user_changed_track() {
    let mut session = new_session();
    session
        .backend_mut()
        .mark_broken("https://cdn/audio/1.mp3");
    let start = Instant::now();

    session
        .dispatch(Action::SetQueue {
            tracks: abc(),
            play_immediately: true,
        })
        .unwrap();
    pump(&mut session, start);

    // User picks C before the skip fires
    session.dispatch(Action::PlayIndex(2)).unwrap();
    pump(&mut session, start);

    session.tick_at(start + Duration::from_secs(5));
    assert_eq!(session.state().current_index(), Some(2));
    assert!(session.backend().is_playing());
}

#[test]
fn test_single_broken_track_pauses_instead_of_looping() {
    let mut session = new_session();
    session
        .backend_mut()
        .mark_broken("https://cdn/audio/1.mp3");
    let start = Instant::now();

    session
        .dispatch(Action::SetQueue {
            tracks: vec![create_track(1, "A")],
            play_immediately: true,
        })
        .unwrap();
    pump(&mut session, start);

    session.tick_at(start + Duration::from_secs(2));
    assert!(!session.state().is_playing());
    assert_eq!(session.state().current_index(), Some(0));
}

#[test]
fn test_play_after_failure_reloads_track() {
    let mut session = new_session();
    session
        .backend_mut()
        .mark_broken("https://cdn/audio/1.mp3");
    let start = Instant::now();

    session
        .dispatch(Action::SetQueue {
            tracks: vec![create_track(1, "A")],
            play_immediately: true,
        })
        .unwrap();
    pump(&mut session, start);
    session.tick_at(start + Duration::from_secs(2));
    assert!(!session.state().is_playing());
    session.drain_notifications();
    session.backend_mut().take_calls();

    // Pressing play again retries the source instead of going silent
    let retry_at = start + Duration::from_secs(3);
    session.dispatch_at(Action::Play, retry_at).unwrap();
    assert_eq!(
        session.backend_mut().take_calls(),
        vec![BackendCall::Load("https://cdn/audio/1.mp3".to_string())]
    );

    pump(&mut session, retry_at);
    assert!(matches!(
        session.drain_notifications().as_slice(),
        [Notification::PlaybackFailed { .. }]
    ));

    session.tick_at(retry_at + Duration::from_millis(1000));
    assert!(!session.state().is_playing());
}

/// Backend that cannot decode anything
struct UnsupportedBackend;

impl MediaBackend for UnsupportedBackend {
    fn load(&mut self, url: &str) -> shelf_playback::Result<()> {
        Err(PlaybackError::MediaBackend(format!("Unsupported format: {}", url)))
    }

    fn play(&mut self) -> shelf_playback::Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _time: f64) -> shelf_playback::Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn current_time(&self) -> f64 {
        0.0
    }
}

#[test]
fn test_load_failure_skip_follows_caller_clock() {
    let mut session =
        PlayerSession::new(UnsupportedBackend, MemoryPreferences::new(), &config());
    let virtual_now = Instant::now() + Duration::from_secs(3600);

    session
        .dispatch_at(
            Action::SetQueue {
                tracks: abc(),
                play_immediately: true,
            },
            virtual_now,
        )
        .unwrap();
    assert!(matches!(
        session.drain_notifications().as_slice(),
        [Notification::PlaybackFailed { track_id, .. }] if *track_id == TrackId::new(1)
    ));

    session.tick_at(virtual_now + Duration::from_millis(500));
    assert_eq!(session.state().current_index(), Some(0));

    session.tick_at(virtual_now + Duration::from_millis(1000));
    assert_eq!(session.state().current_index(), Some(1));
}

// ===== External transport =====

#[test]
fn test_media_key_pause_updates_state() {
    let mut session = play_queue(abc());
    session.backend_mut().external_pause();
    pump(&mut session, Instant::now());
    assert!(!session.state().is_playing());

    session.backend_mut().external_play();
    pump(&mut session, Instant::now());
    assert!(session.state().is_playing());
}

// ===== Seeking =====

#[test]
fn test_seek_requires_ready_media() {
    let mut session = new_session();
    session
        .dispatch(Action::SetQueue {
            tracks: abc(),
            play_immediately: false,
        })
        .unwrap();
    assert!(matches!(session.seek(10.0), Err(PlaybackError::NotReady)));
}

#[test]
fn test_seek_updates_mirror_immediately() {
    let mut session = play_queue(abc());
    session.seek(42.0).unwrap();
    assert_eq!(session.state().current_time(), 42.0);

    // Stale time update before the seek completes is ignored
    session.handle_media_event(MediaEvent::TimeUpdate { time: 3.0 });
    assert_eq!(session.state().current_time(), 42.0);

    pump(&mut session, Instant::now());
    session.backend_mut().advance(1.0);
    pump(&mut session, Instant::now());
    assert_eq!(session.state().current_time(), 43.0);
}

#[test]
fn test_seek_past_end_is_clamped_and_settles() {
    let mut session = play_queue(abc());
    session.backend_mut().take_calls();

    session.seek(1000.0).unwrap();
    assert_eq!(session.state().current_time(), 60.0);
    pump_bounded(&mut session, 10);
    assert_eq!(session.state().current_time(), 60.0);

    // Unknown duration: the mirror follows where the media landed
    session.dispatch(Action::SetDuration(0.0)).unwrap();
    session.seek(1000.0).unwrap();
    pump_bounded(&mut session, 10);
    assert_eq!(session.state().current_time(), 60.0);

    let seeks = session
        .backend_mut()
        .take_calls()
        .into_iter()
        .filter(|c| matches!(c, BackendCall::Seek(_)))
        .count();
    assert_eq!(seeks, 2);
}

// ===== Shortcuts and reorder =====

#[test]
fn test_mode_shortcut_cycles_and_notifies() {
    let mut session = play_queue(abc());
    session.dispatch(Action::SetMode(PlaybackMode::RepeatAll)).unwrap();

    session.press_key("s").unwrap().unwrap();
    assert_eq!(session.state().mode(), PlaybackMode::RepeatOne);
    session.press_key("s").unwrap().unwrap();
    assert_eq!(session.state().mode(), PlaybackMode::Shuffle);

    let notifications = session.drain_notifications();
    assert_eq!(
        notifications,
        vec![
            Notification::ModeChanged {
                mode: PlaybackMode::RepeatOne
            },
            Notification::ModeChanged {
                mode: PlaybackMode::Shuffle
            },
        ]
    );
    assert!(session.press_key("x").is_none());
}

#[test]
fn test_drag_reorder_keeps_playing_track() {
    let mut session = play_queue(abc());
    session.backend_mut().take_calls();

    session
        .drop_track(TrackId::new(1), Some(TrackId::new(3)))
        .unwrap()
        .unwrap();

    let order: Vec<i64> = session.state().queue().iter().map(|t| t.id.as_i64()).collect();
    assert_eq!(order, vec![2, 3, 1]);
    assert_eq!(session.state().current_index(), Some(2));
    assert_eq!(session.state().current_track_id(), Some(TrackId::new(1)));
    // Same track, so no reload
    assert!(session.backend_mut().take_calls().is_empty());

    assert!(session.drop_track(TrackId::new(1), None).is_none());
}

// ===== Persistence =====

#[test]
fn test_preferences_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let prefs = JsonFilePreferences::open(&path).unwrap();
        let mut session = PlayerSession::new(SimulatedBackend::default(), prefs, &config());
        session
            .dispatch(Action::SetQueue {
                tracks: abc(),
                play_immediately: false,
            })
            .unwrap();
        session.dispatch(Action::SetVolume(0.35)).unwrap();
        session.dispatch(Action::SetMode(PlaybackMode::RepeatAll)).unwrap();
        session.dispatch(Action::ToggleFavorite(TrackId::new(2))).unwrap();
        session.press_key("m").unwrap().unwrap();
    }

    let prefs = JsonFilePreferences::open(&path).unwrap();
    let session = PlayerSession::new(SimulatedBackend::default(), prefs, &config());
    let state = session.state();
    assert_eq!(state.volume(), 0.35);
    assert_eq!(state.mode(), PlaybackMode::RepeatAll);
    assert!(state.is_muted_by_user());
    assert!(state.is_favorite(TrackId::new(2)));
    // Queue itself is not persisted
    assert!(state.queue().is_empty());

    // New session applies restored volume / mute to the backend
    assert_eq!(session.backend().volume(), 0.35);
    assert!(session.backend().is_muted());
    assert!(session.store().state().current_index().is_none());
}
