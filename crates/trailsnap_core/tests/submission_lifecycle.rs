use rusqlite::Connection;
use trailsnap_core::db::open_db_in_memory;
use trailsnap_core::{
    AchievementRepository, ProfileRepository, RegisteredUser, RepoError,
    SqliteAchievementRepository, SqliteProfileRepository, SqliteSubmissionRepository,
    SqliteTaskRepository, SubmissionRepository, SubmissionStatus, Task, TaskDifficulty,
    TaskId, TaskRepository, TaskSubmission, UserId, FIRST_STEPS_ACHIEVEMENT,
};
use uuid::Uuid;

#[test]
fn start_creates_pending_submission() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");

    let submission = start(&mut conn, user.user_id, task.id);

    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(submission.user_id, user.user_id);
    assert_eq!(submission.task_id, task.id);
    assert!(submission.started_at > 0);
    assert!(submission.ended_at.is_none());
    assert!(submission.photo_url.is_none());
}

#[test]
fn start_rejects_unknown_task() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let missing = Uuid::new_v4();

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let err = repo.start_submission(user.user_id, missing).unwrap_err();
    assert!(matches!(err, RepoError::TaskNotFound(id) if id == missing));
}

#[test]
fn second_start_for_same_pair_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");
    start(&mut conn, user.user_id, task.id);

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let err = repo.start_submission(user.user_id, task.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::PendingAlreadyExists { user_id, task_id }
            if user_id == user.user_id && task_id == task.id
    ));
}

#[test]
fn start_again_after_failure_is_allowed() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");

    let first = start(&mut conn, user.user_id, task.id);
    {
        let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
        repo.fail_submission(first.id).unwrap();
    }

    let second = start(&mut conn, user.user_id, task.id);
    assert_ne!(second.id, first.id);
    assert_eq!(second.status, SubmissionStatus::Pending);
}

#[test]
fn fail_sets_failed_status_and_ended_at() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");
    let submission = start(&mut conn, user.user_id, task.id);

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let failed = repo.fail_submission(submission.id).unwrap();

    assert_eq!(failed.id, submission.id);
    assert_eq!(failed.status, SubmissionStatus::Failed);
    assert!(failed.ended_at.is_some());
    assert!(failed.photo_url.is_none());
}

#[test]
fn fail_awards_no_points_and_publishes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    seed_first_steps(&conn);
    let task = create_task(&conn, "Lighthouse");
    let submission = start(&mut conn, user.user_id, task.id);

    {
        let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
        repo.fail_submission(submission.id).unwrap();
    }

    assert_eq!(points_for(&conn, user.profile_id), 0);
    let feed_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM news_feed;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(feed_count, 0);
}

#[test]
fn fail_on_terminal_submission_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");
    let submission = start(&mut conn, user.user_id, task.id);

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    repo.fail_submission(submission.id).unwrap();

    let err = repo.fail_submission(submission.id).unwrap_err();
    assert!(matches!(err, RepoError::SubmissionNotFound(id) if id == submission.id));
}

#[test]
fn fail_unknown_submission_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let err = repo.fail_submission(missing).unwrap_err();
    assert!(matches!(err, RepoError::SubmissionNotFound(id) if id == missing));
}

#[test]
fn complete_without_pending_attempt_returns_no_pending() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    seed_first_steps(&conn);
    let task = create_task(&conn, "Lighthouse");

    let mut repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let err = repo
        .complete_submission(user.user_id, task.id, "https://cdn.example/p.jpg", "done")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NoPendingSubmission { user_id, task_id }
            if user_id == user.user_id && task_id == task.id
    ));
}

#[test]
fn get_submission_roundtrip_and_missing_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let task = create_task(&conn, "Lighthouse");
    let submission = start(&mut conn, user.user_id, task.id);

    let repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let loaded = repo.get_submission(submission.id).unwrap().unwrap();
    assert_eq!(loaded, submission);
    assert!(repo.get_submission(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_user_submissions_orders_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let other = register_user(&mut conn, "mart");
    let task_a = create_task(&conn, "Lighthouse");
    let task_b = create_task(&conn, "Old mill");

    let older = start(&mut conn, user.user_id, task_a.id);
    let newer = start(&mut conn, user.user_id, task_b.id);
    start(&mut conn, other.user_id, task_a.id);

    conn.execute(
        "UPDATE task_submission SET started_at = 1000 WHERE id = ?1;",
        [older.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE task_submission SET started_at = 2000 WHERE id = ?1;",
        [newer.id.to_string()],
    )
    .unwrap();

    let repo = SqliteSubmissionRepository::try_new(&mut conn).unwrap();
    let listed = repo.list_user_submissions(user.user_id).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

fn register_user(conn: &mut Connection, name: &str) -> RegisteredUser {
    let mut repo = SqliteProfileRepository::try_new(conn).unwrap();
    repo.register_user(name, "https://cdn.example/avatar.png")
        .unwrap()
}

fn seed_first_steps(conn: &Connection) {
    let repo = SqliteAchievementRepository::try_new(conn).unwrap();
    repo.create_achievement(FIRST_STEPS_ACHIEVEMENT, 100).unwrap();
}

fn create_task(conn: &Connection, title: &str) -> Task {
    let task = Task::new(title, "Take the photo.", TaskDifficulty::Easy, 59.437, 24.7536);
    let repo = SqliteTaskRepository::try_new(conn).unwrap();
    repo.create_task(&task).unwrap();
    task
}

fn start(conn: &mut Connection, user_id: UserId, task_id: TaskId) -> TaskSubmission {
    let mut repo = SqliteSubmissionRepository::try_new(conn).unwrap();
    repo.start_submission(user_id, task_id).unwrap()
}

fn points_for(conn: &Connection, profile_id: Uuid) -> i64 {
    conn.query_row(
        "SELECT points FROM user_profile_public WHERE id = ?1;",
        [profile_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}
