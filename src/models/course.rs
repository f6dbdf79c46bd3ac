use sqlx::SqlitePool;
use uuid::Uuid;

/// Course lookup collaborator. Course lifecycle is managed elsewhere; this
/// service only resolves a course and snapshots its title.
#[derive(Debug, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
}

impl Course {
    pub async fn find(db: &SqlitePool, id: Uuid) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT id, title FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }
}
