//! Chapter table construction and position lookup.
//!
//! The table is built once per opened document and never mutated afterwards.
//! Every other component refers to chapters by 0-based index into it; the
//! 1-based `number` exists only for display.

use crate::error::LocateError;

/// One entry of a chaptered medium, bounded by whole-second offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based ordinal shown in the chapter counter and the row list.
    pub number: u32,
    pub title: String,
    /// Inclusive start offset in seconds.
    pub start: u64,
    /// Exclusive end offset; equals the next chapter's start.
    pub end: u64,
}

impl Chapter {
    pub fn contains(&self, position: u64) -> bool {
        position >= self.start && position < self.end
    }

    pub fn length(&self) -> u64 {
        self.end - self.start
    }
}

/// Ordered, contiguous, gapless sequence of chapters starting at offset 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterTable {
    chapters: Vec<Chapter>,
}

impl ChapterTable {
    /// Build a table from ordered `(title, duration in milliseconds)` pairs.
    ///
    /// Durations truncate to whole seconds, matching the second granularity
    /// used everywhere else. Zero-duration entries are kept as zero-length
    /// chapters so ordinals stay contiguous.
    pub fn build(entries: Vec<(String, u64)>) -> Self {
        let mut chapters = Vec::with_capacity(entries.len());
        let mut cursor = 0u64;
        for (index, (title, duration_ms)) in entries.into_iter().enumerate() {
            let seconds = duration_ms / 1000;
            chapters.push(Chapter {
                number: index as u32 + 1,
                title,
                start: cursor,
                end: cursor + seconds,
            });
            cursor += seconds;
        }
        Self { chapters }
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter()
    }

    /// Summed length of all chapters; equals the end of the last one.
    pub fn total_length(&self) -> u64 {
        self.chapters.last().map_or(0, |chapter| chapter.end)
    }

    /// Index of the chapter containing `position`.
    ///
    /// Positions at or past the end of the last chapter clamp to it. The
    /// error branch is unreachable for a non-empty table; callers log it and
    /// fall back to the first chapter.
    pub fn locate(&self, position: u64) -> Result<usize, LocateError> {
        let gap = LocateError {
            position,
            chapters: self.chapters.len(),
        };
        let last = self.chapters.len().checked_sub(1).ok_or(gap.clone())?;
        if position >= self.chapters[last].end {
            return Ok(last);
        }
        self.chapters
            .iter()
            .position(|chapter| chapter.contains(position))
            .ok_or(gap)
    }

    /// Index of the chapter adjacent to `current`, one step in `direction`
    /// (`+1` next, `-1` previous). `None` means the edge was reached;
    /// navigation never wraps.
    pub fn adjacent(&self, current: usize, direction: isize) -> Option<usize> {
        let target = current.checked_add_signed(direction)?;
        (target < self.chapters.len()).then_some(target)
    }
}
