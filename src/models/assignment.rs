use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::submission::{Submission, SubmissionView};

/// A teacher-authored task bound to a course.
///
/// `course_name` is a display snapshot taken at creation time and is never
/// synced with later course renames. Metadata is immutable after creation.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,

    pub name: String,
    pub course_id: Uuid,
    pub course_name: String,
    pub deadline: DateTime<Utc>,
    pub instructions: String,

    pub created_at: DateTime<Utc>,
}

/// List-view shape: an assignment plus its submissions with each student
/// resolved to a display name.
#[derive(Debug, Serialize)]
pub struct AssignmentWithSubmissions {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub submissions: Vec<SubmissionView>,
}

const COLUMNS: &str = "id, name, course_id, course_name, deadline, instructions, created_at";

impl Assignment {
    pub async fn insert(&self, db: &SqlitePool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO assignments (id, name, course_id, course_name, deadline, instructions, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(self.course_id)
        .bind(&self.course_name)
        .bind(self.deadline)
        .bind(&self.instructions)
        .bind(self.created_at)
        .execute(db)
        .await?;

        Ok(())
    }

    pub async fn find(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<Self>> {
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM assignments WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// All assignments, most recently created first.
    pub async fn all(db: &SqlitePool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM assignments ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn for_course(db: &SqlitePool, course_id: Uuid) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM assignments WHERE course_id = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await
    }

    pub async fn with_submissions(
        db: &SqlitePool,
        assignments: Vec<Self>,
    ) -> sqlx::Result<Vec<AssignmentWithSubmissions>> {
        let mut populated = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let submissions = Submission::views_for_assignment(db, assignment.id).await?;
            populated.push(AssignmentWithSubmissions {
                assignment,
                submissions,
            });
        }

        Ok(populated)
    }
}
