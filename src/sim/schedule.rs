//! Tick-counted timers
//!
//! Every wait in the game (spawn cycle, clock, delayed reset) is a timer here,
//! fired from the simulation tick. Nothing blocks and nothing runs off-thread.

use serde::{Deserialize, Serialize};

/// Work the scheduler can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Job {
    /// Run an obstacle spawn cycle
    SpawnCycle,
    /// Take one second off the clock
    ClockTick,
    /// Detach the crossing effect and send the player back to the start lane
    FinishCrossing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    job: Job,
    due_tick: u64,
    /// Some(period) for repeating timers
    period_ticks: Option<u64>,
    /// Insertion order, breaks ties between timers due on the same tick
    seq: u64,
}

/// Pending timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `job` once at `now + delay_ticks`
    pub fn schedule_once(&mut self, job: Job, now: u64, delay_ticks: u64) {
        self.push(job, now + delay_ticks, None);
    }

    /// Fire `job` at `now + delay_ticks` and then every `period_ticks`
    pub fn schedule_repeating(&mut self, job: Job, now: u64, delay_ticks: u64, period_ticks: u64) {
        self.push(job, now + delay_ticks, Some(period_ticks.max(1)));
    }

    /// Drop every pending timer for `job`
    pub fn cancel(&mut self, job: Job) {
        self.timers.retain(|t| t.job != job);
    }

    pub fn is_pending(&self, job: Job) -> bool {
        self.timers.iter().any(|t| t.job == job)
    }

    /// Collect jobs due at or before `now`, in due order.
    /// Repeating timers are re-armed; one-shot timers are removed.
    pub fn take_due(&mut self, now: u64) -> Vec<Job> {
        let mut due: Vec<(u64, u64, Job)> = Vec::new();

        for timer in &mut self.timers {
            // A repeating timer that fell behind fires once per missed period
            while timer.due_tick <= now {
                due.push((timer.due_tick, timer.seq, timer.job));
                match timer.period_ticks {
                    Some(period) => timer.due_tick += period,
                    None => break,
                }
            }
        }
        self.timers
            .retain(|t| t.period_ticks.is_some() || t.due_tick > now);

        due.sort_by_key(|(tick, seq, _)| (*tick, *seq));
        due.into_iter().map(|(_, _, job)| job).collect()
    }

    fn push(&mut self, job: Job, due_tick: u64, period_ticks: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            job,
            due_tick,
            period_ticks,
            seq,
        });
    }
}
