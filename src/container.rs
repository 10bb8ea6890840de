//! MP4 container inspection: signature sniffing and chapter extraction.
//!
//! Audiobook chapters live in one of two places inside the `moov` tree: a
//! QuickTime text track, whose sample timing table is the per-chapter
//! duration list, or the Nero `chpl` atom carrying absolute start stamps.
//! A minimal box walker reads exactly those two shapes; nothing else of the
//! container is interpreted.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ContainerError;

/// Upper bound on a sane `moov` payload; metadata trees are small.
const MAX_MOOV_BYTES: u64 = 256 * 1024 * 1024;

/// Upper bound on chapter counts accepted from any table in the file.
const MAX_CHAPTERS: usize = 10_000;

/// `true` when the file carries the MP4-family signature: the literal bytes
/// `ftyp` at byte offset 4. Any read failure reads as "not chaptered".
pub fn is_chaptered_container(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut signature = [0u8; 4];
    if file.seek(SeekFrom::Start(4)).is_err() {
        return false;
    }
    if file.read_exact(&mut signature).is_err() {
        return false;
    }
    &signature == b"ftyp"
}

/// Read the chapter table as ordered `(title, duration in milliseconds)`
/// pairs. A container that parses but declares no chapters yields an empty
/// list; callers treat that as "not an audiobook".
pub fn read_chapter_table(path: &Path) -> Result<Vec<(String, u64)>, ContainerError> {
    let unreadable = |source: io::Error| ContainerError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(unreadable)?;
    let moov = load_moov(&mut file)
        .map_err(unreadable)?
        .ok_or_else(|| ContainerError::Malformed {
            path: path.to_path_buf(),
            detail: "no moov box".to_string(),
        })?;

    if let Some(entries) = read_text_track_chapters(&mut file, &moov).map_err(unreadable)? {
        debug!(chapters = entries.len(), "Read chapter text track");
        return Ok(entries);
    }
    if let Some(entries) = read_chpl_chapters(&moov) {
        debug!(chapters = entries.len(), "Read chpl chapter atom");
        return Ok(entries);
    }
    Ok(Vec::new())
}

/// Scan top-level boxes and load the `moov` payload into memory.
fn load_moov(file: &mut File) -> io::Result<Option<Vec<u8>>> {
    file.seek(SeekFrom::Start(0))?;
    loop {
        let mut header = [0u8; 8];
        if let Err(err) = file.read_exact(&mut header) {
            return if err.kind() == io::ErrorKind::UnexpectedEof {
                Ok(None)
            } else {
                Err(err)
            };
        }
        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let kind = [header[4], header[5], header[6], header[7]];
        let payload_len = match size32 {
            // Size zero: the box runs to end of file.
            0 => {
                let here = file.stream_position()?;
                let end = file.seek(SeekFrom::End(0))?;
                file.seek(SeekFrom::Start(here))?;
                end - here
            }
            // Size one: actual size follows as a 64-bit field.
            1 => {
                let mut large = [0u8; 8];
                file.read_exact(&mut large)?;
                u64::from_be_bytes(large).saturating_sub(16)
            }
            _ => u64::from(size32).saturating_sub(8),
        };
        if &kind == b"moov" {
            if payload_len > MAX_MOOV_BYTES {
                return Ok(None);
            }
            let mut moov = vec![0u8; payload_len as usize];
            file.read_exact(&mut moov)?;
            return Ok(Some(moov));
        }
        file.seek(SeekFrom::Current(payload_len as i64))?;
    }
}

/// Split a container payload into its immediate child boxes. Truncated or
/// nonsensical headers end the walk instead of erroring.
fn child_boxes(data: &[u8]) -> Vec<([u8; 4], &[u8])> {
    let mut children = Vec::new();
    let mut pos = 0usize;
    while data.len() - pos >= 8 {
        let size =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let kind = [data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]];
        let (payload_start, total) = match size {
            0 => (pos + 8, data.len() - pos),
            1 => {
                if data.len() - pos < 16 {
                    break;
                }
                let large = u64::from_be_bytes(data[pos + 8..pos + 16].try_into().unwrap());
                (pos + 16, large as usize)
            }
            _ => (pos + 8, size),
        };
        let header_len = payload_start - pos;
        if total < header_len || total > data.len() - pos {
            break;
        }
        children.push((kind, &data[payload_start..pos + total]));
        pos += total;
    }
    children
}

fn find_box<'a>(data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    child_boxes(data)
        .into_iter()
        .find_map(|(child_kind, payload)| (&child_kind == kind).then_some(payload))
}

fn be_u32(data: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(data.get(at..at + 4)?.try_into().ok()?))
}

fn be_u64(data: &[u8], at: usize) -> Option<u64> {
    Some(u64::from_be_bytes(data.get(at..at + 8)?.try_into().ok()?))
}

/// Locate a `text`-handler track and turn its sample table into chapters.
/// The `stts` deltas over the `mdhd` timescale are the per-chapter durations;
/// each sample in the media data is one length-prefixed title.
fn read_text_track_chapters(
    file: &mut File,
    moov: &[u8],
) -> io::Result<Option<Vec<(String, u64)>>> {
    for (kind, trak) in child_boxes(moov) {
        if &kind != b"trak" {
            continue;
        }
        let Some(mdia) = find_box(trak, b"mdia") else {
            continue;
        };
        let Some(hdlr) = find_box(mdia, b"hdlr") else {
            continue;
        };
        if hdlr.get(8..12) != Some(b"text".as_slice()) {
            continue;
        }
        let Some(timescale) = mdhd_timescale(find_box(mdia, b"mdhd")) else {
            continue;
        };
        let Some(stbl) = find_box(mdia, b"minf").and_then(|minf| find_box(minf, b"stbl")) else {
            continue;
        };

        let Some(durations) = sample_durations(find_box(stbl, b"stts"), timescale) else {
            continue;
        };
        let Some(sizes) = sample_sizes(find_box(stbl, b"stsz")) else {
            continue;
        };
        let Some(offsets) = sample_offsets(stbl, &sizes) else {
            warn!("Chapter text track has an unsupported chunk layout");
            continue;
        };

        let mut entries = Vec::with_capacity(durations.len());
        for (index, duration_ms) in durations.iter().enumerate() {
            let (Some(&offset), Some(&size)) = (offsets.get(index), sizes.get(index)) else {
                break;
            };
            entries.push((read_title_sample(file, offset, size)?, *duration_ms));
        }
        if !entries.is_empty() {
            return Ok(Some(entries));
        }
    }
    Ok(None)
}

fn mdhd_timescale(mdhd: Option<&[u8]>) -> Option<u32> {
    let mdhd = mdhd?;
    let offset = match mdhd.first()? {
        1 => 20,
        _ => 12,
    };
    let timescale = be_u32(mdhd, offset)?;
    (timescale > 0).then_some(timescale)
}

/// Expand `stts` run-length entries into one millisecond duration per sample.
fn sample_durations(stts: Option<&[u8]>, timescale: u32) -> Option<Vec<u64>> {
    let stts = stts?;
    let entry_count = be_u32(stts, 4)? as usize;
    if entry_count > MAX_CHAPTERS {
        return None;
    }
    let mut durations = Vec::new();
    for entry in 0..entry_count {
        let base = 8 + entry * 8;
        let count = be_u32(stts, base)? as usize;
        let delta = be_u32(stts, base + 4)?;
        if durations.len() + count > MAX_CHAPTERS {
            return None;
        }
        let duration_ms = u64::from(delta) * 1000 / u64::from(timescale);
        durations.extend(std::iter::repeat(duration_ms).take(count));
    }
    (!durations.is_empty()).then_some(durations)
}

fn sample_sizes(stsz: Option<&[u8]>) -> Option<Vec<u32>> {
    let stsz = stsz?;
    let uniform = be_u32(stsz, 4)?;
    let count = be_u32(stsz, 8)? as usize;
    if count == 0 || count > MAX_CHAPTERS {
        return None;
    }
    if uniform != 0 {
        return Some(vec![uniform; count]);
    }
    let mut sizes = Vec::with_capacity(count);
    for index in 0..count {
        sizes.push(be_u32(stsz, 12 + index * 4)?);
    }
    Some(sizes)
}

/// Absolute file offset of every sample. Covers the two layouts chapter
/// tracks use in practice: one chunk per sample, or a single chunk holding
/// all samples back to back.
fn sample_offsets(stbl: &[u8], sizes: &[u32]) -> Option<Vec<u64>> {
    let chunks = chunk_offsets(stbl)?;
    if chunks.len() == sizes.len() {
        return Some(chunks);
    }
    if chunks.len() == 1 {
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut cursor = chunks[0];
        for &size in sizes {
            offsets.push(cursor);
            cursor += u64::from(size);
        }
        return Some(offsets);
    }
    None
}

fn chunk_offsets(stbl: &[u8]) -> Option<Vec<u64>> {
    if let Some(stco) = find_box(stbl, b"stco") {
        let count = be_u32(stco, 4)? as usize;
        if count > MAX_CHAPTERS {
            return None;
        }
        let mut offsets = Vec::with_capacity(count);
        for index in 0..count {
            offsets.push(u64::from(be_u32(stco, 8 + index * 4)?));
        }
        return Some(offsets);
    }
    let co64 = find_box(stbl, b"co64")?;
    let count = be_u32(co64, 4)? as usize;
    if count > MAX_CHAPTERS {
        return None;
    }
    let mut offsets = Vec::with_capacity(count);
    for index in 0..count {
        offsets.push(be_u64(co64, 8 + index * 8)?);
    }
    Some(offsets)
}

/// A title sample is a big-endian length prefix followed by text; trailing
/// per-sample boxes (style records) are ignored.
fn read_title_sample(file: &mut File, offset: u64, size: u32) -> io::Result<String> {
    file.seek(SeekFrom::Start(offset))?;
    let mut prefix = [0u8; 2];
    file.read_exact(&mut prefix)?;
    let text_len = usize::from(u16::from_be_bytes(prefix)).min(size.saturating_sub(2) as usize);
    let mut text = vec![0u8; text_len];
    file.read_exact(&mut text)?;
    Ok(String::from_utf8_lossy(&text).into_owned())
}

/// Nero chapter atom: absolute start stamps in 100 ns units. Durations come
/// from consecutive stamps; the final chapter runs to the movie duration
/// recorded in `mvhd`, or ends zero-length when that is missing.
fn read_chpl_chapters(moov: &[u8]) -> Option<Vec<(String, u64)>> {
    let chpl = find_box(moov, b"udta").and_then(|udta| find_box(udta, b"chpl"))?;
    let count = usize::from(*chpl.get(8)?);
    let mut starts_ms = Vec::with_capacity(count);
    let mut titles = Vec::with_capacity(count);
    let mut pos = 9usize;
    for _ in 0..count {
        let stamp = be_u64(chpl, pos)?;
        let title_len = usize::from(*chpl.get(pos + 8)?);
        let title = chpl.get(pos + 9..pos + 9 + title_len)?;
        starts_ms.push(stamp / 10_000);
        titles.push(String::from_utf8_lossy(title).into_owned());
        pos += 9 + title_len;
    }
    let last_start = *starts_ms.last()?;

    let total_ms = movie_duration_ms(moov).unwrap_or(last_start);
    let mut entries = Vec::with_capacity(starts_ms.len());
    for (index, title) in titles.into_iter().enumerate() {
        let start = starts_ms[index];
        let end = starts_ms.get(index + 1).copied().unwrap_or(total_ms);
        entries.push((title, end.saturating_sub(start)));
    }
    Some(entries)
}

fn movie_duration_ms(moov: &[u8]) -> Option<u64> {
    let mvhd = find_box(moov, b"mvhd")?;
    let (timescale, duration) = match mvhd.first()? {
        1 => (be_u32(mvhd, 20)?, be_u64(mvhd, 24)?),
        _ => (be_u32(mvhd, 12)?, u64::from(be_u32(mvhd, 16)?)),
    };
    (timescale > 0).then(|| duration * 1000 / u64::from(timescale))
}
