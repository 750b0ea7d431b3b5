// SPDX-License-Identifier: MIT

//! Attendance toggle: flip a user's membership in an event's attendee list
//! and apply the point consequence.
//!
//! Ordering contract: the attendance mutation is committed before the
//! ledger mutation is attempted. A ledger failure after the attendance
//! commit leaves the two inconsistent; there is no compensating write and
//! the error propagates to the caller.

use crate::catalog::TaskId;
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::services::points::PointsLedger;
use crate::time_utils::now_rfc3339;

/// Result of a toggle, as surfaced to the API layer.
#[derive(Debug, Clone, Copy)]
pub struct ToggleOutcome {
    /// Whether the user attends the event after the toggle.
    pub attending: bool,
}

/// Flip membership in an order-preserving attendee list.
///
/// Returns whether the subject was attending before the flip, and the new
/// list: the subject removed if present, appended otherwise.
pub fn flip_membership(attendees: &[String], subject: &str) -> (bool, Vec<String>) {
    let was_attending = attendees.iter().any(|s| s == subject);

    let new_list = if was_attending {
        attendees.iter().filter(|s| *s != subject).cloned().collect()
    } else {
        let mut list = attendees.to_vec();
        list.push(subject.to_string());
        list
    };

    (was_attending, new_list)
}

/// Toggle a user's attendance on an event, then settle the ATTEND_JAM
/// points: award on join, deduct on leave.
pub async fn toggle_attendance(
    db: &FirestoreDb,
    ledger: &PointsLedger,
    event_id: &str,
    subject: &str,
) -> Result<ToggleOutcome, AppError> {
    let mut event = db
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))?;

    let (was_attending, new_list) = flip_membership(&event.attendees, subject);
    event.attendees = new_list;
    event.updated_at = now_rfc3339();

    // Commit the attendance change first; the ledger side effect below may
    // still fail independently.
    db.update_event_attendees(&event).await?;

    if was_attending {
        ledger.deduct(subject, TaskId::AttendJam).await?;
    } else {
        ledger.award(subject, TaskId::AttendJam, true).await?;
    }

    tracing::info!(
        event_id,
        subject,
        attending = !was_attending,
        "Attendance toggled"
    );

    Ok(ToggleOutcome {
        attending: !was_attending,
    })
}
