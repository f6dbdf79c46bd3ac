#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use crate::state::HandinState;
use crate::storage::FileStore;

pub(crate) const TEACHER_TOKEN: &str = "teacher-token";
pub(crate) const STUDENT_TOKEN: &str = "student-token";

pub(crate) const BOUNDARY: &str = "handin-test-boundary";

/// One fully wired application over an in-memory database and a throwaway
/// upload root, seeded with a teacher, a student, and one course.
pub(crate) struct TestApp {
    pub state: HandinState,
    pub course_id: Uuid,
    pub student_id: Uuid,
    _uploads: tempfile::TempDir,
}

impl TestApp {
    pub(crate) fn router(&self) -> Router {
        crate::router(self.state.clone())
    }

    pub(crate) fn upload_count(&self) -> usize {
        std::fs::read_dir(self.state.files.root()).unwrap().count()
    }
}

pub(crate) async fn test_app() -> TestApp {
    // A pool larger than one connection would hand each connection its own
    // private in-memory database.
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&db_pool).await.unwrap();

    let teacher_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let course_id = Uuid::new_v4();

    sqlx::query("INSERT INTO users (id, name, email, role, api_token) VALUES (?, ?, ?, 'teacher', ?)")
        .bind(teacher_id)
        .bind("Tess Teacher")
        .bind("tess@example.edu")
        .bind(TEACHER_TOKEN)
        .execute(&db_pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO users (id, name, email, role, api_token) VALUES (?, ?, ?, 'student', ?)")
        .bind(student_id)
        .bind("Sam Student")
        .bind("sam@example.edu")
        .bind(STUDENT_TOKEN)
        .execute(&db_pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO courses (id, title) VALUES (?, ?)")
        .bind(course_id)
        .bind("Intro to Databases")
        .execute(&db_pool)
        .await
        .unwrap();

    let uploads = tempfile::tempdir().unwrap();
    let files = FileStore::open(uploads.path().to_path_buf()).await.unwrap();

    TestApp {
        state: HandinState { db_pool, files },
        course_id,
        student_id,
        _uploads: uploads,
    }
}

/// Raw multipart body with a single file field named `submission_file`.
pub(crate) fn multipart_file(filename: &str, content_type: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"submission_file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(crate) async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
