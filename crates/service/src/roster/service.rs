use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use super::domain::{local_date, NewStudentInput, RosterDocument, StudentRecord, StudentView, SubmitInput};
use super::repository::RosterRepository;
use crate::errors::ServiceError;

/// Source of "now"; swapped out in tests to move across calendar days.
pub type Clock = fn() -> DateTime<Utc>;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub total_points: u64,
    pub points_added: u64,
}

/// Roster operations. Each call loads the document, works on it, and (for
/// writes) stores it back in one piece.
///
/// There is no lock around load/store: two concurrent writes can race and the
/// later store wins.
pub struct RosterService {
    repo: Arc<dyn RosterRepository>,
    clock: Clock,
}

impl RosterService {
    pub fn new(repo: Arc<dyn RosterRepository>) -> Self {
        Self::with_clock(repo, Utc::now)
    }

    pub fn with_clock(repo: Arc<dyn RosterRepository>, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Look up one student and report whether they may submit today.
    pub async fn get_student(&self, id: &str) -> Result<StudentView, ServiceError> {
        let roster = self.load().await?;
        let today = local_date((self.clock)());
        roster
            .find(id)
            .map(|s| s.view(today))
            .ok_or_else(|| ServiceError::NotFound("Student not found".into()))
    }

    /// Record today's selections for a student.
    pub async fn submit(&self, input: SubmitInput) -> Result<SubmitOutcome, ServiceError> {
        let submission = input.validate()?;
        let mut roster = self.load().await?;
        let now = (self.clock)();

        let student = roster
            .find_mut(&submission.student_id)
            .ok_or_else(|| ServiceError::NotFound("Student not found".into()))?;
        if !student.can_fill_on(local_date(now)) {
            debug!(student_id = %submission.student_id, "submission rejected: already filled today");
            return Err(ServiceError::AlreadyFilledToday);
        }

        let points_added = student.apply_submission(&submission.selections, now);
        let total_points = student.total_points;
        self.store(&roster).await?;

        info!(
            student_id = %submission.student_id,
            selections = submission.selections.len(),
            points_added,
            total_points,
            "submission accepted"
        );
        Ok(SubmitOutcome { total_points, points_added })
    }

    /// Every record, in roster order.
    pub async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        Ok(self.load().await?.students)
    }

    /// Register a new student with zeroed points.
    pub async fn add_student(&self, input: NewStudentInput) -> Result<StudentRecord, ServiceError> {
        let new_student = input.validate()?;
        let mut roster = self.load().await?;
        if roster.contains(&new_student.id) {
            debug!(student_id = %new_student.id, "add rejected: duplicate id");
            return Err(ServiceError::Conflict("A student with this ID already exists".into()));
        }

        let record = StudentRecord::new(new_student);
        roster.students.push(record.clone());
        self.store(&roster).await?;

        info!(student_id = %record.id, roster_size = roster.students.len(), "student added");
        Ok(record)
    }

    async fn load(&self) -> Result<RosterDocument, ServiceError> {
        self.repo.load().await.inspect_err(|e| error!(error = %e, "failed to load roster"))
    }

    async fn store(&self, roster: &RosterDocument) -> Result<(), ServiceError> {
        self.repo.store(roster).await.inspect_err(|e| error!(error = %e, "failed to store roster"))
    }
}
