//! Tick<->frame synchronization map.

use crate::error::RxmError;
use crate::types::SyncEntry;

/// Succeeds iff both `score_tick` and `audio_frame` are strictly
/// increasing across the entry list. Trivially satisfied by 0 or 1
/// entries.
pub fn validate_sync(entries: &[SyncEntry]) -> Result<(), RxmError> {
    for i in 1..entries.len() {
        if entries[i].score_tick <= entries[i - 1].score_tick
            || entries[i].audio_frame <= entries[i - 1].audio_frame
        {
            return Err(RxmError::NonMonotonicSync { index: i });
        }
    }
    Ok(())
}

/// Linear interpolation between the two bracketing anchors; clamps to
/// the boundary value outside the anchor range. Returns `None` if
/// `entries` is empty.
pub fn tick_to_frame(entries: &[SyncEntry], tick: u32) -> Option<u32> {
    interpolate(entries, tick, |e| e.score_tick, |e| e.audio_frame)
}

pub fn frame_to_tick(entries: &[SyncEntry], frame: u32) -> Option<u32> {
    interpolate(entries, frame, |e| e.audio_frame, |e| e.score_tick)
}

fn interpolate(
    entries: &[SyncEntry],
    x: u32,
    key: impl Fn(&SyncEntry) -> u32,
    value: impl Fn(&SyncEntry) -> u32,
) -> Option<u32> {
    if entries.is_empty() {
        return None;
    }
    if x <= key(&entries[0]) {
        return Some(value(&entries[0]));
    }
    let last = entries.len() - 1;
    if x >= key(&entries[last]) {
        return Some(value(&entries[last]));
    }
    for i in 1..entries.len() {
        let (prev, next) = (&entries[i - 1], &entries[i]);
        if x >= key(prev) && x <= key(next) {
            let tick_range = key(next) as i64 - key(prev) as i64;
            if tick_range == 0 {
                return Some(value(prev));
            }
            // Truncates toward zero, matching the anchor reference's
            // `int(frame_range * tick_offset / tick_range)`.
            let tick_offset = x as i64 - key(prev) as i64;
            let value_range = value(next) as i64 - value(prev) as i64;
            let delta = (value_range * tick_offset) / tick_range;
            return Some((value(prev) as i64 + delta) as u32);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<SyncEntry> {
        vec![
            SyncEntry { score_tick: 0, audio_frame: 0 },
            SyncEntry { score_tick: 100, audio_frame: 4410 },
            SyncEntry { score_tick: 200, audio_frame: 8820 },
        ]
    }

    #[test]
    fn monotonic_sync_passes() {
        assert!(validate_sync(&entries()).is_ok());
    }

    #[test]
    fn non_monotonic_sync_fails() {
        let bad = vec![
            SyncEntry { score_tick: 100, audio_frame: 4410 },
            SyncEntry { score_tick: 50, audio_frame: 8820 },
        ];
        assert!(validate_sync(&bad).is_err());
    }

    #[test]
    fn interpolates_between_anchors() {
        let e = entries();
        assert_eq!(tick_to_frame(&e, 50), Some(2205));
    }

    #[test]
    fn clamps_outside_the_anchor_range() {
        let e = entries();
        assert_eq!(tick_to_frame(&e, 1000), Some(8820));
        assert_eq!(frame_to_tick(&e, 0), Some(0));
    }

    #[test]
    fn truncates_toward_zero_on_non_exact_midpoints() {
        let e = vec![
            SyncEntry { score_tick: 0, audio_frame: 0 },
            SyncEntry { score_tick: 3, audio_frame: 10 },
        ];
        // 10 * 2 / 3 = 6.667, which truncates to 6, not 7.
        assert_eq!(tick_to_frame(&e, 2), Some(6));
    }
}
