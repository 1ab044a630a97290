//! Timestamp sampling and timecode formatting.
//!
//! [`sample_timestamps`] derives the instants at which thumbnails are taken.
//! The sampling is gap-padded: the clip is treated as `count + 2` equal
//! segments and only the `count` interior boundaries are sampled, so the very
//! first and last frames — disproportionately likely to be black, a logo, or
//! a cut boundary — are never chosen.

/// Compute `count` evenly spaced sample timestamps across a clip.
///
/// This function is pure and total — it never fails:
///
/// - `count == 0` returns an empty vector;
/// - `duration_seconds <= 0` returns `count` zeros (a corrupt or unknown
///   duration degrades to sampling frame 0, it never aborts the pipeline);
/// - otherwise returns `count` strictly increasing values, all strictly
///   inside `(0, duration_seconds)`, spaced `duration_seconds / (count + 2)`
///   apart.
///
/// # Example
///
/// ```
/// use vidsheet::sampling::sample_timestamps;
///
/// let samples = sample_timestamps(120.0, 4);
/// assert_eq!(samples.len(), 4);
/// assert_eq!(samples[0], 20.0);
/// assert_eq!(samples[3], 80.0);
/// ```
pub fn sample_timestamps(duration_seconds: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if duration_seconds <= 0.0 {
        return vec![0.0; count];
    }

    let gap = duration_seconds / (count as f64 + 2.0);
    (0..count).map(|index| gap * (index as f64 + 1.0)).collect()
}

/// Format a timestamp in seconds as zero-padded `HH:MM:SS`.
///
/// Fractional seconds are truncated; negative inputs clamp to `00:00:00`.
///
/// # Example
///
/// ```
/// use vidsheet::sampling::format_timecode;
///
/// assert_eq!(format_timecode(3661.0), "01:01:01");
/// assert_eq!(format_timecode(59.9), "00:00:59");
/// ```
pub fn format_timecode(seconds: f64) -> String {
    let total = if seconds > 0.0 { seconds as u64 } else { 0 };
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
