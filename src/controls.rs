//! Passive UI sinks the controller writes derived values into.
//!
//! Interactive controls expose two write paths. The silent setters update the
//! control without firing its change notification and are the only ones the
//! player-event handlers may use; the loud seek setter behaves like user
//! input, and its final value must be routed back through
//! [`crate::app::Message::SeekBarChanged`].

use image::DynamicImage;

/// One row of the chapter list projection. The table itself stays the source
/// of truth; rows are derived once per open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    pub number: u32,
    pub title: String,
    /// Chapter length preformatted as `h:mm:ss`.
    pub length: String,
    pub start: u64,
    pub end: u64,
}

pub trait ControlSurface {
    // Seek bar. Values are whole seconds; the control clamps to its range.
    fn seek_value(&self) -> u64;
    fn set_seek_range_silently(&mut self, start: u64, end: u64);
    fn set_seek_value_silently(&mut self, value: u64);
    /// Loud write: the surface fires its change notification for this one.
    fn set_seek_value(&mut self, value: u64);

    // Volume control.
    fn volume_value(&self) -> f64;
    fn set_volume_silently(&mut self, volume: f64);

    // Time and metadata labels.
    fn set_elapsed_label(&mut self, text: &str);
    fn set_remaining_label(&mut self, text: &str);
    fn set_position_label(&mut self, text: &str);
    fn set_total_duration_label(&mut self, text: &str);
    fn set_chapter_counter(&mut self, text: Option<&str>);
    fn set_title_label(&mut self, text: &str);
    fn set_stream_properties_label(&mut self, text: Option<&str>);
    fn set_genre_label(&mut self, text: Option<&str>);
    fn set_year_label(&mut self, text: Option<&str>);

    // Whole-book progress and the play/pause glyph.
    fn set_progress_fraction(&mut self, fraction: f64);
    fn set_playing_indicator(&mut self, playing: bool);

    // Chapter list projection.
    fn set_chapter_rows(&mut self, rows: &[ChapterRow]);
    fn clear_chapter_rows(&mut self);
    fn set_row_highlight(&mut self, row: usize, highlighted: bool);
    fn focus_row(&mut self, row: usize);

    // Cover art and optional panels.
    fn set_cover_image(&mut self, image: Option<DynamicImage>);
    fn set_chapter_panel_visible(&mut self, visible: bool);
    fn set_genre_panel_visible(&mut self, visible: bool);
}
