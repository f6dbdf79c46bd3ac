use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// One student's uploaded artifact against one assignment.
///
/// Rows are append-only: never mutated, never deduplicated. Repeat
/// submissions from the same student simply add rows.
#[derive(Debug, sqlx::FromRow)]
pub struct Submission {
    pub id: Uuid,

    pub assignment_id: Uuid,
    pub student_id: Uuid,

    /// Path relative to the upload root. Never serialized to callers.
    pub stored_file: String,
    pub original_name: String,

    pub submitted_at: DateTime<Utc>,
}

/// Caller-facing shape: student resolved to a display name, the stored path
/// replaced by the original filename.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub id: Uuid,
    pub student: StudentRef,
    pub file_name: String,
    pub submission_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StudentRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    student_id: Uuid,
    student_name: String,
    original_name: String,
    submitted_at: DateTime<Utc>,
}

impl From<SubmissionRow> for SubmissionView {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            student: StudentRef {
                id: row.student_id,
                name: row.student_name,
            },
            file_name: row.original_name,
            submission_date: row.submitted_at,
        }
    }
}

impl Submission {
    /// Appends the record with a single INSERT. The append must stay a
    /// one-statement operation so concurrent submissions to the same
    /// assignment can never lose each other.
    pub async fn insert(&self, db: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO submissions (id, assignment_id, student_id, stored_file, original_name, submitted_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(self.assignment_id)
        .bind(self.student_id)
        .bind(&self.stored_file)
        .bind(&self.original_name)
        .bind(self.submitted_at)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Primary-key lookup; submission ids are unique across the whole store.
    pub async fn find(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(
            "SELECT id, assignment_id, student_id, stored_file, original_name, submitted_at \
             FROM submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Submissions for one assignment in arrival order.
    pub async fn views_for_assignment(
        db: &SqlitePool,
        assignment_id: Uuid,
    ) -> sqlx::Result<Vec<SubmissionView>> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            "SELECT s.id, s.student_id, u.name AS student_name, s.original_name, s.submitted_at \
             FROM submissions s \
             JOIN users u ON u.id = s.student_id \
             WHERE s.assignment_id = ? \
             ORDER BY s.rowid",
        )
        .bind(assignment_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
