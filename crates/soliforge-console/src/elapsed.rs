/*
[INPUT]:  Task status, start timestamp, recorded duration, wall clock
[OUTPUT]: Elapsed seconds for display and a one-second ticker armed while running
[POS]:    View layer - execution clock derivation
[UPDATE]: When changing how elapsed time is derived or displayed
*/

use std::time::Duration;

use chrono::{DateTime, Utc};
use soliforge_client::{Task, TaskStatus};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Seconds to display for a task.
///
/// While running with a start timestamp the value is derived from the wall
/// clock and clamped at zero; otherwise the recorded duration is shown, or
/// zero when there is none.
pub fn elapsed_seconds(
    status: TaskStatus,
    started_at: Option<DateTime<Utc>>,
    duration: Option<u64>,
    now: DateTime<Utc>,
) -> u64 {
    match (status, started_at) {
        (TaskStatus::Running, Some(start)) => (now - start).num_seconds().max(0) as u64,
        _ => duration.unwrap_or(0),
    }
}

pub fn for_task(task: &Task, now: DateTime<Utc>) -> u64 {
    elapsed_seconds(task.status, task.started_at, task.duration, now)
}

/// `MM:SS`; minutes keep counting past 59
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn should_tick(task: &Task) -> bool {
    task.status == TaskStatus::Running && task.started_at.is_some()
}

/// Redraw timer for the elapsed clock
#[derive(Debug)]
pub struct ElapsedTicker {
    period: Duration,
    interval: Option<Interval>,
}

impl ElapsedTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Arm or disarm according to the latest snapshot
    pub fn sync(&mut self, task: &Task) {
        match (should_tick(task), self.interval.is_some()) {
            (true, false) => {
                let mut interval =
                    tokio::time::interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.interval = Some(interval);
            }
            (false, true) => self.interval = None,
            _ => {}
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Resolves on the next tick; never resolves while disarmed
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
