//! Deadline health badge derived from a task's due date and status.
//!
//! The badge is never stored. It is recomputed from the clock every time a
//! task is read, so a task drifts from on-track to at-risk to overdue without
//! any write.

use chrono::{DateTime, TimeDelta, Utc};

use super::TaskStatus;

/// Hours before the due date inside which a task counts as at risk.
pub const AT_RISK_HOURS: i64 = 24;

/// Deadline health of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    /// Done, undated, or more than [`AT_RISK_HOURS`] from the deadline.
    OnTrack,
    /// Due within [`AT_RISK_HOURS`] and not yet done.
    AtRisk,
    /// Past the due date and not yet done.
    Overdue,
}

impl Badge {
    /// Stable snake_case representation used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::AtRisk => "at_risk",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a task as of `now`.
///
/// Tasks without a due date, and finished tasks, are always on track. A task
/// due exactly now is at risk; one due a second ago is overdue. Time is
/// compared exactly, at the clock's full precision.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use taskboard::domain::{Badge, TaskStatus, classify};
///
/// let now = Utc::now();
/// let due = now + TimeDelta::hours(2);
/// assert_eq!(classify(Some(due), TaskStatus::InProgress, now), Badge::AtRisk);
/// assert_eq!(classify(Some(due), TaskStatus::Done, now), Badge::OnTrack);
/// ```
#[must_use]
pub fn classify(due_date: Option<DateTime<Utc>>, status: TaskStatus, now: DateTime<Utc>) -> Badge {
    let Some(due) = due_date else {
        return Badge::OnTrack;
    };
    if status == TaskStatus::Done {
        return Badge::OnTrack;
    }
    let remaining = due - now;
    if remaining < TimeDelta::zero() {
        Badge::Overdue
    } else if remaining <= TimeDelta::hours(AT_RISK_HOURS) {
        Badge::AtRisk
    } else {
        Badge::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn no_due_date_is_always_on_track(now: DateTime<Utc>) {
        for status in TaskStatus::ALL {
            assert_eq!(classify(None, *status, now), Badge::OnTrack);
        }
    }

    #[rstest]
    fn done_tasks_are_on_track_even_when_late(now: DateTime<Utc>) {
        let due = now - TimeDelta::days(30);
        assert_eq!(classify(Some(due), TaskStatus::Done, now), Badge::OnTrack);
    }

    #[rstest]
    #[case(-TimeDelta::hours(1), Badge::Overdue)]
    #[case(-TimeDelta::milliseconds(1), Badge::Overdue)]
    #[case(TimeDelta::zero(), Badge::AtRisk)]
    #[case(TimeDelta::hours(2), Badge::AtRisk)]
    #[case(TimeDelta::hours(24), Badge::AtRisk)]
    #[case(TimeDelta::hours(24) + TimeDelta::seconds(1), Badge::OnTrack)]
    #[case(TimeDelta::days(7), Badge::OnTrack)]
    fn classifies_relative_to_now(
        now: DateTime<Utc>,
        #[case] offset: TimeDelta,
        #[case] expected: Badge,
    ) {
        for status in [TaskStatus::Backlog, TaskStatus::InProgress, TaskStatus::Review] {
            assert_eq!(classify(Some(now + offset), status, now), expected);
        }
    }

    #[rstest]
    fn badge_drifts_as_the_clock_advances(now: DateTime<Utc>) {
        let due = now + TimeDelta::hours(48);
        let status = TaskStatus::InProgress;
        assert_eq!(classify(Some(due), status, now), Badge::OnTrack);
        assert_eq!(
            classify(Some(due), status, now + TimeDelta::hours(30)),
            Badge::AtRisk
        );
        assert_eq!(
            classify(Some(due), status, now + TimeDelta::hours(49)),
            Badge::Overdue
        );
    }
}
