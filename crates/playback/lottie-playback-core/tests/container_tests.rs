mod common;

use std::sync::{Arc, Mutex};

use common::{doc, MemoryStore, MockRenderer};
use lottie_playback_core::{
    Config, ContainerSession, Direction, EventKind, LifecycleState, Manifest, ManifestEntry,
    PlaybackError, Player, SourceDescriptor,
};
use lottie_test_fixtures::manifests;

fn bundle(name: &str) -> SourceDescriptor {
    SourceDescriptor::Bundle { name: name.into() }
}

fn fixture(name: &str) -> Manifest {
    manifests::load(name).unwrap()
}

fn player() -> Player<MockRenderer> {
    Player::new(MockRenderer::default(), Config::default())
}

#[test]
fn open_loads_initial_animation_with_entry_settings() {
    let store = MemoryStore::with_container(
        "pack",
        fixture("three-animations"),
        &[("A", 10), ("B", 20), ("C", 30)],
    );
    let mut session = ContainerSession::new(store, bundle("pack"));
    let mut p = player();

    session.open(&mut p).unwrap();
    assert_eq!(session.active_id(), Some("A"));
    assert_eq!(p.total_frames(), 10.0);
    assert!(p.settings().loop_animation);
    assert_eq!(session.store().requests(), vec!["pack", "pack#A"]);
}

#[test]
fn navigation_reloads_only_when_the_cursor_moves() {
    let store = MemoryStore::with_container(
        "pack",
        fixture("three-animations"),
        &[("A", 10), ("B", 20), ("C", 30)],
    );
    let mut session = ContainerSession::new(store, bundle("pack"));
    let mut p = player();
    session.open(&mut p).unwrap();

    assert_eq!(session.previous(&mut p).unwrap(), "A");
    assert_eq!(session.store().requests().len(), 2);

    assert_eq!(session.next(&mut p).unwrap(), "B");
    assert_eq!(p.total_frames(), 20.0);
    assert_eq!(p.settings().speed, 2);

    assert_eq!(session.next(&mut p).unwrap(), "C");
    assert_eq!(p.settings().direction, Direction::Reverse);
    assert_eq!(p.current_frame(), 29.0);
    assert_eq!((p.settings().width, p.settings().height), (320, 240));

    assert_eq!(session.next(&mut p).unwrap(), "C");
    assert_eq!(
        session.store().requests(),
        vec!["pack", "pack#A", "pack#B", "pack#C"]
    );
}

#[test]
fn loop_count_resets_when_switching_animations() {
    let store = MemoryStore::with_container(
        "pack",
        fixture("three-animations"),
        &[("A", 3), ("B", 20), ("C", 30)],
    );
    let mut session = ContainerSession::new(store, bundle("pack"));
    let mut p = player();
    session.open(&mut p).unwrap();
    p.play();
    for _ in 0..6 {
        p.tick();
    }
    assert_eq!(p.loop_count(), 2);

    session.next(&mut p).unwrap();
    assert_eq!(p.loop_count(), 0);
}

#[test]
fn hover_entries_play_on_enter_and_rewind_on_exit() {
    let store = MemoryStore::with_container("hover", fixture("hover-pair"), &[("idle", 8), ("wave", 10)]);
    let mut session = ContainerSession::new(store, bundle("hover"));
    let mut p = player();
    session.open(&mut p).unwrap();

    assert_eq!(session.active_id(), Some("wave"));
    assert!(session.hover_enabled());
    assert_eq!(p.current_frame(), 2.0);
    assert!(p.is_paused());
    assert_eq!(p.renderer().background, Some(0xff20_2020));

    session.pointer_entered(&mut p);
    assert!(p.is_playing());
    p.tick();
    p.tick();
    assert_eq!(p.current_frame(), 4.0);

    session.pointer_exited(&mut p);
    assert_eq!(p.state(), LifecycleState::Stopped);
    assert_eq!(p.current_frame(), 2.0);
}

#[test]
fn non_hover_entries_ignore_pointer_presence() {
    let store = MemoryStore::with_container("hover", fixture("hover-pair"), &[("idle", 8), ("wave", 10)]);
    let mut session = ContainerSession::new(store, bundle("hover"));
    let mut p = player();
    session.open(&mut p).unwrap();

    session.activate("idle", &mut p).unwrap();
    assert!(!session.hover_enabled());
    assert!(p.is_playing());
    session.pointer_exited(&mut p);
    assert!(p.is_playing());

    let err = session.activate("missing", &mut p).unwrap_err();
    assert!(matches!(err, PlaybackError::MissingAnimation { .. }));
    assert_eq!(session.active_id(), Some("idle"));
}

#[test]
fn unreachable_container_puts_player_in_error() {
    let mut session = ContainerSession::new(MemoryStore::default(), bundle("nowhere"));
    let mut p = player();
    let errors = Arc::new(Mutex::new(0));
    let sink = errors.clone();
    p.on(EventKind::LoadError, move |_| *sink.lock().unwrap() += 1);

    let err = session.open(&mut p).unwrap_err();
    assert_eq!(err.category(), "fetch");
    assert!(!err.is_recoverable());
    assert_eq!(p.state(), LifecycleState::Error);
    assert_eq!(*errors.lock().unwrap(), 1);
    assert!(session.navigator().is_none());
}

#[test]
fn missing_animation_bytes_surface_as_fetch_failure() {
    let store = MemoryStore::with_container("pack", fixture("three-animations"), &[("A", 10)]);
    let mut session = ContainerSession::new(store, bundle("pack"));
    let mut p = player();
    session.open(&mut p).unwrap();

    let err = session.next(&mut p).unwrap_err();
    assert!(matches!(err, PlaybackError::FetchFailure { .. }));
    assert_eq!(p.state(), LifecycleState::Error);
    assert_eq!(session.active_id(), Some("B"));

    session.previous(&mut p).unwrap();
    assert_eq!(p.state(), LifecycleState::Paused);
    assert_eq!(p.total_frames(), 10.0);
}

#[test]
fn invalid_manifest_is_rejected_on_open() {
    let manifest = Manifest::new(vec![ManifestEntry::new("dup"), ManifestEntry::new("dup")]);
    let store = MemoryStore::with_container("bad", manifest, &[("dup", 5)]);
    let mut session = ContainerSession::new(store, bundle("bad"));
    let mut p = player();
    let err = session.open(&mut p).unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidManifest { .. }));
    assert!(session.navigator().is_none());
}

#[test]
fn plain_file_loads_as_single_animation() {
    let mut store = MemoryStore::default();
    store.files.insert("https://cdn/solo.json".into(), doc(12, 24));
    let mut session = ContainerSession::new(store, SourceDescriptor::url("https://cdn/solo.json"));
    let mut p = player();

    session.open(&mut p).unwrap();
    assert_eq!(p.total_frames(), 12.0);
    assert_eq!(p.duration(), 0.5);
    assert!(session.navigator().is_none());
    assert!(!session.hover_enabled());
    assert!(matches!(
        session.next(&mut p),
        Err(PlaybackError::MissingAnimation { .. })
    ));
}
