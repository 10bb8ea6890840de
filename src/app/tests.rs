use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use super::messages::Message;
use super::state::{App, DocumentSession};
use crate::chapters::ChapterTable;
use crate::config::AppConfig;
use crate::container::fixtures;
use crate::controls::{ChapterRow, ControlSurface};
use crate::cover::sample_png_bytes;
use crate::player::{
    AudioStreamInfo, CoverSample, CoverTagType, MediaInfo, PlaybackState, Player, PlayerEvent,
};

#[derive(Debug, Clone, PartialEq)]
enum PlayerCall {
    Load(PathBuf),
    Play,
    Pause,
    Seek(u64),
    SetVolume(f64),
}

#[derive(Default)]
struct FakePlayer {
    calls: Vec<PlayerCall>,
    volume: f64,
    duration: Option<u64>,
}

impl FakePlayer {
    fn seek_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, PlayerCall::Seek(_)))
            .count()
    }
}

impl Player for FakePlayer {
    fn load(&mut self, path: &Path) {
        self.calls.push(PlayerCall::Load(path.to_path_buf()));
    }

    fn play(&mut self) {
        self.calls.push(PlayerCall::Play);
    }

    fn pause(&mut self) {
        self.calls.push(PlayerCall::Pause);
    }

    fn seek(&mut self, position: u64) {
        self.calls.push(PlayerCall::Seek(position));
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.calls.push(PlayerCall::SetVolume(volume));
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn duration(&self) -> Option<u64> {
        self.duration
    }
}

/// Control sink that records every write and, like a real range widget,
/// clamps seek values to the configured range.
#[derive(Default)]
struct FakeControls {
    seek_range: (u64, u64),
    seek_value: u64,
    loud_seek_writes: usize,
    silent_seek_writes: usize,
    volume: f64,
    silent_volume_writes: usize,
    elapsed: String,
    remaining: String,
    position: String,
    total_duration: String,
    counter: Option<String>,
    title: String,
    stream_properties: Option<String>,
    genre: Option<String>,
    year: Option<String>,
    progress: f64,
    playing: bool,
    rows: Vec<ChapterRow>,
    highlighted: BTreeSet<usize>,
    focused: Option<usize>,
    has_cover: bool,
    chapter_panel_visible: bool,
    genre_panel_visible: bool,
}

impl FakeControls {
    fn clamped(&self, value: u64) -> u64 {
        value.clamp(self.seek_range.0, self.seek_range.1)
    }
}

impl ControlSurface for FakeControls {
    fn seek_value(&self) -> u64 {
        self.seek_value
    }

    fn set_seek_range_silently(&mut self, start: u64, end: u64) {
        self.seek_range = (start, end);
    }

    fn set_seek_value_silently(&mut self, value: u64) {
        self.silent_seek_writes += 1;
        self.seek_value = self.clamped(value);
    }

    fn set_seek_value(&mut self, value: u64) {
        self.loud_seek_writes += 1;
        self.seek_value = self.clamped(value);
    }

    fn volume_value(&self) -> f64 {
        self.volume
    }

    fn set_volume_silently(&mut self, volume: f64) {
        self.silent_volume_writes += 1;
        self.volume = volume;
    }

    fn set_elapsed_label(&mut self, text: &str) {
        self.elapsed = text.to_string();
    }

    fn set_remaining_label(&mut self, text: &str) {
        self.remaining = text.to_string();
    }

    fn set_position_label(&mut self, text: &str) {
        self.position = text.to_string();
    }

    fn set_total_duration_label(&mut self, text: &str) {
        self.total_duration = text.to_string();
    }

    fn set_chapter_counter(&mut self, text: Option<&str>) {
        self.counter = text.map(str::to_string);
    }

    fn set_title_label(&mut self, text: &str) {
        self.title = text.to_string();
    }

    fn set_stream_properties_label(&mut self, text: Option<&str>) {
        self.stream_properties = text.map(str::to_string);
    }

    fn set_genre_label(&mut self, text: Option<&str>) {
        self.genre = text.map(str::to_string);
    }

    fn set_year_label(&mut self, text: Option<&str>) {
        self.year = text.map(str::to_string);
    }

    fn set_progress_fraction(&mut self, fraction: f64) {
        self.progress = fraction;
    }

    fn set_playing_indicator(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn set_chapter_rows(&mut self, rows: &[ChapterRow]) {
        self.rows = rows.to_vec();
    }

    fn clear_chapter_rows(&mut self) {
        self.rows.clear();
        self.highlighted.clear();
        self.focused = None;
    }

    fn set_row_highlight(&mut self, row: usize, highlighted: bool) {
        if highlighted {
            self.highlighted.insert(row);
        } else {
            self.highlighted.remove(&row);
        }
    }

    fn focus_row(&mut self, row: usize) {
        self.focused = Some(row);
    }

    fn set_cover_image(&mut self, image: Option<DynamicImage>) {
        self.has_cover = image.is_some();
    }

    fn set_chapter_panel_visible(&mut self, visible: bool) {
        self.chapter_panel_visible = visible;
    }

    fn set_genre_panel_visible(&mut self, visible: bool) {
        self.genre_panel_visible = visible;
    }
}

fn new_app() -> App<FakePlayer, FakeControls> {
    App::new(
        FakePlayer::default(),
        FakeControls::default(),
        AppConfig::default(),
    )
}

/// Controller with a three-chapter book already open: 0-60, 60-90, 90-180.
fn audiobook_app() -> App<FakePlayer, FakeControls> {
    let mut app = new_app();
    app.session = Some(DocumentSession {
        path: PathBuf::from("/tmp/book.m4b"),
        is_audiobook: true,
        table: ChapterTable::build(vec![
            ("One".to_string(), 60_000),
            ("Two".to_string(), 30_000),
            ("Three".to_string(), 90_000),
        ]),
        current_chapter: Some(0),
        generation: 1,
    });
    app.snapshot.duration = 180;
    app.controls.seek_range = (0, 60);
    app
}

fn player_event(generation: u64, event: PlayerEvent) -> Message {
    Message::Player { generation, event }
}

fn position(seconds: u64) -> Message {
    player_event(1, PlayerEvent::PositionUpdated(seconds))
}

#[test]
fn opening_plain_media_loads_and_plays() {
    let mut app = new_app();
    app.reduce(Message::Open(PathBuf::from("/nonexistent/song.mp3")));

    let session = app.session().unwrap();
    assert!(!session.is_audiobook);
    assert!(session.table.is_empty());
    assert_eq!(session.generation, 1);
    assert_eq!(
        app.player.calls,
        vec![
            PlayerCall::Load(PathBuf::from("/nonexistent/song.mp3")),
            PlayerCall::Play,
        ]
    );
}

#[test]
fn opening_a_chaptered_file_builds_the_session() {
    let file = fixtures::chaptered_file(&[("Opening", 60_000), ("Middle", 30_000), ("Closing", 90_000)]);
    let mut app = new_app();
    app.reduce(Message::Open(file.path().to_path_buf()));

    let session = app.session().unwrap();
    assert!(session.is_audiobook);
    assert_eq!(session.table.len(), 3);
    assert_eq!(session.current_chapter, Some(0));

    assert_eq!(app.controls.rows.len(), 3);
    assert_eq!(app.controls.rows[0].title, "Opening");
    assert_eq!(app.controls.rows[0].length, "01:00");
    assert_eq!(app.controls.counter.as_deref(), Some("1 / 3"));
    assert_eq!(app.controls.seek_range, (0, 60));
    assert!(app.controls.highlighted.contains(&0));
    assert_eq!(
        app.player.calls[..2],
        [PlayerCall::Load(file.path().to_path_buf()), PlayerCall::Play]
    );
}

#[test]
fn reopening_supersedes_the_previous_document() {
    let book = fixtures::chaptered_file(&[("One", 60_000), ("Two", 30_000)]);
    let mut app = new_app();
    app.reduce(Message::Open(book.path().to_path_buf()));
    app.reduce(position(70));
    assert_eq!(app.session().unwrap().current_chapter, Some(1));

    app.reduce(Message::Open(PathBuf::from("/nonexistent/song.mp3")));
    // A position report from the first document arrives late.
    app.reduce(player_event(1, PlayerEvent::PositionUpdated(85)));

    let session = app.session().unwrap();
    assert_eq!(session.generation, 2);
    assert!(!session.is_audiobook);
    assert_eq!(session.current_chapter, None);
    assert_eq!(app.snapshot().position, 0);
    assert!(app.controls.rows.is_empty());
    assert_eq!(app.controls.counter, None);
    assert!(!app.controls.has_cover);
    assert_eq!(app.controls.progress, 0.0);
}

#[test]
fn plain_media_positions_use_whole_stream_labels() {
    let mut app = new_app();
    app.reduce(Message::Open(PathBuf::from("/nonexistent/song.mp3")));
    app.reduce(player_event(1, PlayerEvent::DurationChanged(300)));
    app.reduce(player_event(1, PlayerEvent::PositionUpdated(40)));

    assert_eq!(app.controls.seek_range, (0, 300));
    assert_eq!(app.controls.elapsed, "00:40");
    assert_eq!(app.controls.remaining, "04:20");
    assert_eq!(app.controls.seek_value, 40);
}

#[test]
fn crossing_a_boundary_moves_the_highlight_and_range() {
    let mut app = audiobook_app();
    app.reduce(position(59));
    assert_eq!(app.session().unwrap().current_chapter, Some(0));

    app.reduce(position(60));
    let session = app.session().unwrap();
    assert_eq!(session.current_chapter, Some(1));
    assert_eq!(app.controls.counter.as_deref(), Some("2 / 3"));
    assert_eq!(app.controls.seek_range, (60, 90));
    assert_eq!(app.controls.highlighted.iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(app.controls.focused, Some(1));
}

#[test]
fn positions_past_the_end_clamp_to_the_last_chapter() {
    let mut app = audiobook_app();
    app.reduce(position(500));
    assert_eq!(app.session().unwrap().current_chapter, Some(2));
    assert_eq!(app.controls.counter.as_deref(), Some("3 / 3"));
}

#[test]
fn position_updates_never_issue_seeks_or_loud_writes() {
    let mut app = audiobook_app();
    for seconds in [0, 30, 59, 60, 61, 95, 179, 500] {
        app.reduce(position(seconds));
    }
    assert_eq!(app.player.seek_count(), 0);
    assert_eq!(app.controls.loud_seek_writes, 0);
    assert!(app.controls.silent_seek_writes > 0);
}

#[test]
fn chapter_labels_count_from_the_chapter_bounds() {
    let mut app = audiobook_app();
    app.reduce(position(70));

    // Chapter 2 spans 60-90: ten seconds in, twenty to go.
    assert_eq!(app.controls.elapsed, "00:10");
    assert_eq!(app.controls.remaining, "00:20");
    assert_eq!(app.controls.position, "01:10");
    assert!((app.controls.progress - 70.0 / 180.0).abs() < 1e-9);
}

#[test]
fn skip_flows_through_the_seek_bar() {
    let mut app = audiobook_app();
    app.controls.seek_range = (60, 90);
    app.controls.seek_value = 70;

    app.reduce(Message::SkipForward);

    assert_eq!(app.controls.loud_seek_writes, 1);
    assert_eq!(app.player.calls, vec![PlayerCall::Seek(80)]);
}

#[test]
fn skip_clamps_at_the_seek_bar_range() {
    let mut app = audiobook_app();
    app.controls.seek_range = (60, 90);
    app.controls.seek_value = 85;
    app.reduce(Message::SkipForward);
    assert_eq!(app.player.calls, vec![PlayerCall::Seek(90)]);

    app.controls.seek_value = 61;
    app.reduce(Message::SkipBackward);
    assert_eq!(app.player.calls[1], PlayerCall::Seek(60));
}

#[test]
fn chapter_navigation_stops_at_the_edges() {
    let mut app = audiobook_app();
    app.reduce(Message::PreviousChapter);
    assert!(app.player.calls.is_empty());

    app.session.as_mut().unwrap().current_chapter = Some(2);
    app.reduce(Message::NextChapter);
    assert!(app.player.calls.is_empty());
}

#[test]
fn next_chapter_seeks_to_the_neighbor_start() {
    let mut app = audiobook_app();
    app.reduce(Message::NextChapter);

    // Only the seek is issued; the highlight follows the next position event.
    assert_eq!(app.player.calls, vec![PlayerCall::Seek(60)]);
    assert_eq!(app.session().unwrap().current_chapter, Some(0));
}

#[test]
fn chapter_navigation_needs_an_audiobook() {
    let mut app = new_app();
    app.reduce(Message::Open(PathBuf::from("/nonexistent/song.mp3")));
    app.player.calls.clear();
    app.reduce(Message::NextChapter);
    assert!(app.player.calls.is_empty());
}

#[test]
fn row_activation_seeks_highlights_and_plays() {
    let mut app = audiobook_app();
    app.reduce(Message::ChapterRowActivated(2));

    assert_eq!(
        app.player.calls,
        vec![PlayerCall::Seek(90), PlayerCall::Play]
    );
    assert_eq!(app.session().unwrap().current_chapter, Some(2));
    assert_eq!(app.controls.counter.as_deref(), Some("3 / 3"));
    assert_eq!(app.controls.seek_range, (90, 180));
}

#[test]
fn toggle_follows_the_reported_playback_state() {
    let mut app = audiobook_app();
    app.reduce(Message::TogglePlayPause);
    assert_eq!(app.player.calls, vec![PlayerCall::Play]);

    app.reduce(player_event(1, PlayerEvent::StateChanged(PlaybackState::Playing)));
    assert!(app.controls.playing);

    app.reduce(Message::TogglePlayPause);
    assert_eq!(app.player.calls[1], PlayerCall::Pause);
}

#[test]
fn end_of_stream_rewinds_and_pauses() {
    let mut app = audiobook_app();
    app.snapshot.state = PlaybackState::Playing;
    app.reduce(player_event(1, PlayerEvent::EndOfStream));

    assert_eq!(app.player.calls, vec![PlayerCall::Seek(0), PlayerCall::Pause]);
    assert_eq!(app.snapshot().state, PlaybackState::Paused);
    assert!(!app.controls.playing);
}

#[test]
fn volume_reports_within_epsilon_are_not_echoed() {
    let mut app = audiobook_app();
    app.controls.volume = 0.5;

    app.reduce(player_event(1, PlayerEvent::VolumeChanged(0.5004)));
    assert_eq!(app.controls.silent_volume_writes, 0);

    app.reduce(player_event(1, PlayerEvent::VolumeChanged(0.8)));
    assert_eq!(app.controls.silent_volume_writes, 1);
    assert!((app.controls.volume - 0.8).abs() < f64::EPSILON);
}

#[test]
fn user_volume_changes_go_to_the_player() {
    let mut app = audiobook_app();
    app.reduce(Message::VolumeControlChanged(0.3));
    assert_eq!(app.player.calls, vec![PlayerCall::SetVolume(0.3)]);
}

#[test]
fn media_info_fills_labels_and_panels() {
    let mut app = audiobook_app();
    app.player.duration = Some(180);
    let info = MediaInfo {
        title: Some("A Book".to_string()),
        artist: Some("An Author".to_string()),
        genre: Some("Fiction".to_string()),
        year: Some(2019),
        audio: Some(AudioStreamInfo {
            codec: Some("AAC".to_string()),
            sample_rate: 44_100,
            channels: 2,
            bitrate: 128_000,
        }),
        ..MediaInfo::default()
    };
    app.reduce(player_event(1, PlayerEvent::MediaInfoUpdated(info)));

    assert_eq!(app.controls.title, "A Book - An Author");
    assert_eq!(
        app.controls.stream_properties.as_deref(),
        Some("Stereo | 44100 Hz | 128 kbps | AAC")
    );
    assert_eq!(app.controls.genre.as_deref(), Some("Fiction"));
    assert_eq!(app.controls.year.as_deref(), Some("2019"));
    assert_eq!(app.controls.total_duration, "03:00");
    assert!(app.controls.chapter_panel_visible);
    assert!(app.controls.genre_panel_visible);
}

#[test]
fn media_info_without_tags_falls_back_to_the_basename() {
    let mut app = new_app();
    app.reduce(Message::Open(PathBuf::from("/nonexistent/song.mp3")));
    app.reduce(player_event(1, PlayerEvent::MediaInfoUpdated(MediaInfo::default())));

    assert_eq!(app.controls.title, "song.mp3");
    assert!(!app.controls.chapter_panel_visible);
    assert!(!app.controls.genre_panel_visible);
    assert_eq!(app.controls.stream_properties, None);
}

#[test]
fn front_covers_are_applied_and_other_types_skipped() {
    let mut app = audiobook_app();
    let front = MediaInfo {
        cover: Some(CoverSample {
            data: sample_png_bytes(),
            tag_type: CoverTagType::FrontCover,
        }),
        ..MediaInfo::default()
    };
    app.reduce(player_event(1, PlayerEvent::MediaInfoUpdated(front)));
    assert!(app.controls.has_cover);

    let mut app = audiobook_app();
    let back = MediaInfo {
        cover: Some(CoverSample {
            data: sample_png_bytes(),
            tag_type: CoverTagType::BackCover,
        }),
        ..MediaInfo::default()
    };
    app.reduce(player_event(1, PlayerEvent::MediaInfoUpdated(back)));
    assert!(!app.controls.has_cover);
}
