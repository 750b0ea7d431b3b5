// SPDX-License-Identifier: MIT

//! Points ledger: award and deduct points against a user record.
//!
//! Each mutation is a read-modify-write of two fields on the user document
//! (`num_points` and the ordered `completed_tasks` log), persisted together
//! in one field-scoped update. The read-modify-write is not isolated;
//! concurrent requests for the same user can lose an update. That matches
//! the original design and is deliberately not papered over here.

use crate::catalog::{Task, TaskId};
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::time_utils::now_rfc3339;

/// Result of a ledger mutation.
#[derive(Debug, Clone, Copy)]
pub struct LedgerOutcome {
    /// Signed point delta applied by this mutation.
    pub points_delta: i64,
    /// The user's total after the mutation.
    pub new_total: u32,
}

/// Points ledger service.
#[derive(Clone)]
pub struct PointsLedger {
    db: FirestoreDb,
}

impl PointsLedger {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Award a task's points to a user.
    ///
    /// Returns `None` when `check_completion` is set and the task is
    /// non-repeatable and already in the user's completion log (a no-op:
    /// no state is modified). Passing `check_completion = false` bypasses
    /// the check entirely, which is how event creation stays repeatable
    /// regardless of the catalog flag.
    pub async fn award(
        &self,
        subject: &str,
        task_id: TaskId,
        check_completion: bool,
    ) -> Result<Option<LedgerOutcome>, AppError> {
        let mut user = self
            .db
            .get_user(subject)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", subject)))?;

        let task = task_id.task();
        let (new_total, new_log) = match apply_award(
            user.num_points,
            &user.completed_tasks,
            task,
            check_completion,
        ) {
            Some(next) => next,
            None => {
                tracing::debug!(subject, task = task_id.as_str(), "Task already completed");
                return Ok(None);
            }
        };

        user.num_points = new_total;
        user.completed_tasks = new_log;
        user.updated_at = now_rfc3339();
        self.db.update_user_ledger(&user).await?;

        tracing::info!(
            subject,
            task = task_id.as_str(),
            points = task.points,
            total = new_total,
            "Awarded points"
        );

        Ok(Some(LedgerOutcome {
            points_delta: i64::from(task.points),
            new_total,
        }))
    }

    /// Deduct a task's points from a user, clamping the total at 0.
    ///
    /// Non-repeatable tasks are removed from the completion log entirely;
    /// repeatable tasks lose only their most recent entry.
    pub async fn deduct(&self, subject: &str, task_id: TaskId) -> Result<LedgerOutcome, AppError> {
        let mut user = self
            .db
            .get_user(subject)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", subject)))?;

        let task = task_id.task();
        let (new_total, new_log) = apply_deduct(user.num_points, &user.completed_tasks, task);

        user.num_points = new_total;
        user.completed_tasks = new_log;
        user.updated_at = now_rfc3339();
        self.db.update_user_ledger(&user).await?;

        tracing::info!(
            subject,
            task = task_id.as_str(),
            points = task.points,
            total = new_total,
            "Deducted points"
        );

        Ok(LedgerOutcome {
            points_delta: -i64::from(task.points),
            new_total,
        })
    }
}

/// Pure award transition: new total and completion log, or `None` when the
/// completion check makes this a no-op.
fn apply_award(
    total: u32,
    completed: &[String],
    task: &Task,
    check_completion: bool,
) -> Option<(u32, Vec<String>)> {
    if check_completion
        && !task.repeatable
        && completed.iter().any(|t| t == task.id.as_str())
    {
        return None;
    }

    let mut log = completed.to_vec();
    log.push(task.id.as_str().to_string());
    Some((total + task.points, log))
}

/// Pure deduction transition. The total clamps at 0, so award followed by
/// deduct is not strictly invertible once other deductions intervene.
fn apply_deduct(total: u32, completed: &[String], task: &Task) -> (u32, Vec<String>) {
    let mut log = completed.to_vec();
    let id = task.id.as_str();

    if task.repeatable {
        // Remove only the most recently appended occurrence
        if let Some(pos) = log.iter().rposition(|t| t == id) {
            log.remove(pos);
        }
    } else {
        // Remove all occurrences (expected: at most one)
        log.retain(|t| t != id);
    }

    (total.saturating_sub(task.points), log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskId;

    fn log(ids: &[TaskId]) -> Vec<String> {
        ids.iter().map(|t| t.as_str().to_string()).collect()
    }

    #[test]
    fn test_award_appends_and_adds_points() {
        let task = TaskId::AttendJam.task();
        let (total, completed) = apply_award(0, &[], task, true).unwrap();
        assert_eq!(total, task.points);
        assert_eq!(completed, log(&[TaskId::AttendJam]));
    }

    #[test]
    fn test_non_repeatable_second_award_is_noop() {
        let task = TaskId::SignUp.task();
        let (total, completed) = apply_award(0, &[], task, true).unwrap();
        assert!(apply_award(total, &completed, task, true).is_none());
    }

    #[test]
    fn test_repeatable_award_always_appends() {
        let task = TaskId::AttendJam.task();
        let (total, completed) = apply_award(0, &[], task, true).unwrap();
        let (total, completed) = apply_award(total, &completed, task, true).unwrap();
        assert_eq!(total, task.points * 2);
        assert_eq!(completed, log(&[TaskId::AttendJam, TaskId::AttendJam]));
    }

    #[test]
    fn test_check_bypass_awards_even_when_completed() {
        let task = TaskId::SignUp.task();
        let (total, completed) = apply_award(0, &[], task, true).unwrap();
        // Bypassing the check duplicates the non-repeatable entry
        let (total, completed) = apply_award(total, &completed, task, false).unwrap();
        assert_eq!(total, task.points * 2);
        assert_eq!(completed, log(&[TaskId::SignUp, TaskId::SignUp]));
    }

    #[test]
    fn test_deduct_clamps_at_zero() {
        let task = TaskId::AttendJam.task();
        assert!(task.points > 5);
        let (total, _) = apply_deduct(5, &log(&[TaskId::AttendJam]), task);
        assert_eq!(total, 0);
    }

    #[test]
    fn test_repeatable_deduct_removes_last_occurrence_only() {
        let task = TaskId::AttendJam.task();
        let completed = log(&[TaskId::AttendJam, TaskId::CreateJam, TaskId::AttendJam]);
        let (_, remaining) = apply_deduct(30, &completed, task);
        assert_eq!(remaining, log(&[TaskId::AttendJam, TaskId::CreateJam]));
    }

    #[test]
    fn test_non_repeatable_deduct_removes_all_occurrences() {
        let task = TaskId::SignUp.task();
        let completed = log(&[TaskId::SignUp, TaskId::CreateJam, TaskId::SignUp]);
        let (_, remaining) = apply_deduct(30, &completed, task);
        assert_eq!(remaining, log(&[TaskId::CreateJam]));
    }

    #[test]
    fn test_deduct_missing_entry_still_deducts_points() {
        let task = TaskId::AttendJam.task();
        let (total, remaining) = apply_deduct(25, &[], task);
        assert_eq!(total, 25 - task.points);
        assert!(remaining.is_empty());
    }
}
