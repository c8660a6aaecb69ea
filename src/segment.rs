//! Track and segment boundaries from positional continuity
//!
//! Two consecutive accepted points stay in the same segment while their
//! coordinates share enough leading fractional digits. Sharing fewer than
//! `segment_digits` starts a new segment, fewer than `track_digits` starts a
//! new track.

use crate::coord::FRACTION_DIGITS;

/// What the writer must emit before the location just observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// First accepted point of the stream
    First,
    /// Same segment as the previous point
    Continue,
    NewSegment,
    NewTrack,
}

/// Number of leading fractional digits two fixed-point coordinates share.
///
/// Returns 0 when the strings differ in length, are shorter than seven
/// characters or have different integer parts; otherwise counts matching
/// digits from the first fractional digit up to the first mismatch.
pub fn match_digits(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() || a.len() < FRACTION_DIGITS {
        return 0;
    }
    let split = a.len() - FRACTION_DIGITS;
    if a[..split] != b[..split] {
        return 0;
    }
    a[split..]
        .iter()
        .zip(&b[split..])
        .take_while(|(x, y)| x == y)
        .count()
}

/// Tracks the last accepted coordinate pair and the track/segment counts.
#[derive(Debug, Clone)]
pub struct Segmenter {
    track_digits: usize,
    segment_digits: usize,
    last: Option<(String, String)>,
    tracks: u64,
    segments: u64,
}

impl Segmenter {
    pub fn new(track_digits: usize, segment_digits: usize) -> Self {
        Self {
            track_digits,
            segment_digits,
            last: None,
            tracks: 0,
            segments: 0,
        }
    }

    /// Record an accepted point and return the boundary to emit before it.
    pub fn observe(&mut self, latitude: &str, longitude: &str) -> Boundary {
        let Some((last_lat, last_lon)) = self.last.as_mut() else {
            self.tracks = 1;
            self.segments = 1;
            self.last = Some((latitude.to_string(), longitude.to_string()));
            return Boundary::First;
        };

        let shared = match_digits(last_lat, latitude).min(match_digits(last_lon, longitude));
        let boundary = if shared < self.track_digits {
            self.tracks += 1;
            self.segments += 1;
            Boundary::NewTrack
        } else if shared < self.segment_digits {
            self.segments += 1;
            Boundary::NewSegment
        } else {
            Boundary::Continue
        };

        last_lat.clear();
        last_lat.push_str(latitude);
        last_lon.clear();
        last_lon.push_str(longitude);
        boundary
    }

    pub fn tracks(&self) -> u64 {
        self.tracks
    }

    pub fn segments(&self) -> u64 {
        self.segments
    }

    pub fn last(&self) -> Option<(&str, &str)> {
        self.last.as_ref().map(|(lat, lon)| (lat.as_str(), lon.as_str()))
    }
}
