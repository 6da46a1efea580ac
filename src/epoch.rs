//! Governance epoch windows
//!
//! Voting systems this dashboard reads from settle on a fixed 7-day cadence
//! anchored to Thursday 00:00:00 UTC. `EpochWindow::completed` derives the
//! most recently closed window from a probe time by pure date arithmetic.
//!
//! Probe policy: every caller probes with the current time and reads the
//! last completed epoch. When a pool has a voter contract, its own
//! `epochVoteStart`/`epochVoteEnd` accessors are authoritative and preferred
//! (see `onchain::voting::voter_epoch_window`); this module is the fallback
//! and the reference for chains without one.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use eyre::{eyre, Result};
use serde::Serialize;

/// Weekday the epoch flips on, at midnight UTC
pub const ANCHOR_WEEKDAY: Weekday = Weekday::Thu;

/// Epoch length in days
pub const EPOCH_DAYS: i64 = 7;

/// A half-open `[start, end)` governance accounting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpochWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EpochWindow {
    /// The most recently completed epoch as of `probe`: ends on the last
    /// anchor boundary at or before `probe`, starts exactly 7 days earlier.
    pub fn completed(probe: DateTime<Utc>) -> Self {
        let end = most_recent_anchor(probe);
        let start = end - Duration::days(EPOCH_DAYS);
        Self { start, end }
    }

    /// Build a window from contract-reported UNIX timestamps. The contract
    /// is authoritative, but an inverted window is still rejected.
    pub fn from_timestamps(start_ts: i64, end_ts: i64) -> Result<Self> {
        if start_ts >= end_ts {
            return Err(eyre!(
                "Invalid epoch bounds: start {} >= end {}",
                start_ts,
                end_ts
            ));
        }
        let start = Utc
            .timestamp_opt(start_ts, 0)
            .single()
            .ok_or_else(|| eyre!("Epoch start {} is not a valid timestamp", start_ts))?;
        let end = Utc
            .timestamp_opt(end_ts, 0)
            .single()
            .ok_or_else(|| eyre!("Epoch end {} is not a valid timestamp", end_ts))?;
        Ok(Self { start, end })
    }

    pub fn start_ts(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_ts(&self) -> i64 {
        self.end.timestamp()
    }
}

impl std::fmt::Display for EpochWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%Y-%m-%d %H:%M UTC"),
            self.end.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

/// Most recent anchor boundary (Thursday 00:00 UTC) at or before `t`
fn most_recent_anchor(t: DateTime<Utc>) -> DateTime<Utc> {
    let days_back =
        (t.weekday().num_days_from_monday() + 7 - ANCHOR_WEEKDAY.num_days_from_monday()) % 7;
    let date = t.date_naive() - Duration::days(days_back as i64);
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_window_is_exactly_seven_days() {
        let probes = [
            utc(2024, 1, 1, 0, 0),
            utc(2024, 6, 15, 23, 59),
            utc(2025, 12, 31, 12, 30),
        ];
        for probe in probes {
            let w = EpochWindow::completed(probe);
            assert_eq!(w.end - w.start, Duration::days(7));
            assert!(w.end <= probe);
        }
    }

    #[test]
    fn test_end_falls_on_anchor_midnight() {
        let w = EpochWindow::completed(utc(2024, 9, 10, 14, 0));
        assert_eq!(w.end.weekday(), ANCHOR_WEEKDAY);
        assert_eq!(w.start.weekday(), ANCHOR_WEEKDAY);
        assert_eq!(w.end.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_tuesday_probe_resolves_strictly_before() {
        // 2024-09-10 is a Tuesday; the last Thursday boundary is 09-05
        let probe = utc(2024, 9, 10, 9, 0);
        let w = EpochWindow::completed(probe);
        assert_eq!(w.end, utc(2024, 9, 5, 0, 0));
        assert_eq!(w.start, utc(2024, 8, 29, 0, 0));
        assert!(w.end < probe);
    }

    #[test]
    fn test_probe_on_anchor_midnight_is_inclusive() {
        // Exactly on the boundary: the boundary itself is the end
        let probe = utc(2024, 9, 5, 0, 0);
        let w = EpochWindow::completed(probe);
        assert_eq!(w.end, probe);
    }

    #[test]
    fn test_deterministic_for_equal_probes() {
        let probe = utc(2025, 3, 3, 7, 45);
        assert_eq!(EpochWindow::completed(probe), EpochWindow::completed(probe));
    }

    #[test]
    fn test_contract_bounds_validation() {
        assert!(EpochWindow::from_timestamps(1_700_000_000, 1_700_604_800).is_ok());
        assert!(EpochWindow::from_timestamps(1_700_604_800, 1_700_000_000).is_err());
        assert!(EpochWindow::from_timestamps(5, 5).is_err());
    }
}
