use rusqlite::Connection;
use trailsnap_core::db::open_db_in_memory;
use trailsnap_core::{
    AchievementRepository, FeedEntryId, FeedRepository, FeedService, FeedServiceError,
    ProfileRepository, RegisteredUser, RepoError, SqliteAchievementRepository,
    SqliteFeedRepository, SqliteProfileRepository, SqliteSubmissionRepository,
    SqliteTaskRepository, SubmissionRepository, Task, TaskDifficulty, TaskId, TaskRepository,
    UserId, FIRST_STEPS_ACHIEVEMENT,
};
use uuid::Uuid;

#[test]
fn likes_are_unconditional_increments() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let entry_id = publish_entry(&mut conn, user.user_id, "Lighthouse", "done");

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.like_entry(entry_id).unwrap().likes, 1);
    // Repeat likes are not deduplicated per user.
    assert_eq!(repo.like_entry(entry_id).unwrap().likes, 2);
    assert_eq!(repo.like_entry(entry_id).unwrap().likes, 3);
}

#[test]
fn like_on_unknown_entry_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let err = repo.like_entry(missing).unwrap_err();
    assert!(matches!(err, RepoError::FeedEntryNotFound(id) if id == missing));
}

#[test]
fn comments_are_returned_ascending_by_submission_time() {
    let mut conn = open_db_in_memory().unwrap();
    let author_a = register_user(&mut conn, "liis");
    let author_b = register_user(&mut conn, "mart");
    let entry_id = publish_entry(&mut conn, author_a.user_id, "Lighthouse", "done");

    {
        let mut repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
        repo.add_comment(entry_id, author_b.user_id, "nice shot").unwrap();
        repo.add_comment(entry_id, author_a.user_id, "thanks").unwrap();
    }
    conn.execute(
        "UPDATE comment SET submitted_at = 1000 WHERE text = 'nice shot';",
        [],
    )
    .unwrap();
    conn.execute(
        "UPDATE comment SET submitted_at = 2000 WHERE text = 'thanks';",
        [],
    )
    .unwrap();

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let entry = repo.get_entry(entry_id).unwrap().unwrap();
    assert_eq!(entry.comments.len(), 2);
    assert_eq!(entry.comments[0].text, "nice shot");
    assert_eq!(entry.comments[0].author, author_b.user_id);
    assert_eq!(entry.comments[0].author_name, "mart");
    assert_eq!(entry.comments[1].text, "thanks");
    assert_eq!(entry.comments[1].author_name, "liis");
}

#[test]
fn comment_on_unknown_entry_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let missing = Uuid::new_v4();

    let mut repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let err = repo.add_comment(missing, user.user_id, "hello").unwrap_err();
    assert!(matches!(err, RepoError::FeedEntryNotFound(id) if id == missing));
}

#[test]
fn feed_lists_newest_entries_first() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let older = publish_entry(&mut conn, user.user_id, "Lighthouse", "one");
    let newer = publish_entry(&mut conn, user.user_id, "Old mill", "two");

    conn.execute(
        "UPDATE news_feed SET created_at = 1000 WHERE id = ?1;",
        [older.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE news_feed SET created_at = 2000 WHERE id = ?1;",
        [newer.to_string()],
    )
    .unwrap();

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let feed = repo.list_feed().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].id, newer);
    assert_eq!(feed[1].id, older);
}

#[test]
fn get_unknown_entry_returns_none() {
    let mut conn = open_db_in_memory().unwrap();

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    assert!(repo.get_entry(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn service_rejects_blank_comment_text() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let entry_id = publish_entry(&mut conn, user.user_id, "Lighthouse", "done");

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let mut service = FeedService::new(repo);

    let err = service.add_comment(entry_id, user.user_id, "   ").unwrap_err();
    assert!(matches!(err, FeedServiceError::BlankComment));

    let entry = service.get_entry(entry_id).unwrap().unwrap();
    assert!(entry.comments.is_empty());
}

#[test]
fn service_wraps_feed_reads_and_likes() {
    let mut conn = open_db_in_memory().unwrap();
    let user = register_user(&mut conn, "liis");
    let entry_id = publish_entry(&mut conn, user.user_id, "Lighthouse", "done");

    let repo = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let mut service = FeedService::new(repo);

    assert_eq!(service.news_feed().unwrap().len(), 1);
    assert_eq!(service.like_entry(entry_id).unwrap().likes, 1);

    let entry = service
        .add_comment(entry_id, user.user_id, "great spot")
        .unwrap();
    assert_eq!(entry.comments.len(), 1);
    assert_eq!(entry.comments[0].text, "great spot");
}

fn register_user(conn: &mut Connection, name: &str) -> RegisteredUser {
    let mut repo = SqliteProfileRepository::try_new(conn).unwrap();
    repo.register_user(name, "https://cdn.example/avatar.png")
        .unwrap()
}

/// Completes one submission end to end and returns the published entry id.
fn publish_entry(
    conn: &mut Connection,
    user_id: UserId,
    task_title: &str,
    description: &str,
) -> FeedEntryId {
    {
        let repo = SqliteAchievementRepository::try_new(conn).unwrap();
        if repo.find_by_name(FIRST_STEPS_ACHIEVEMENT).unwrap().is_none() {
            repo.create_achievement(FIRST_STEPS_ACHIEVEMENT, 100).unwrap();
        }
    }
    let task_id = create_task(conn, task_title);

    let submission = {
        let mut repo = SqliteSubmissionRepository::try_new(conn).unwrap();
        repo.start_submission(user_id, task_id).unwrap();
        repo.complete_submission(user_id, task_id, "https://cdn.example/p.jpg", description)
            .unwrap()
    };

    let repo = SqliteFeedRepository::try_new(conn).unwrap();
    repo.list_feed()
        .unwrap()
        .into_iter()
        .find(|entry| entry.task_submission_id == submission.id)
        .unwrap()
        .id
}

fn create_task(conn: &Connection, title: &str) -> TaskId {
    let task = Task::new(title, "Take the photo.", TaskDifficulty::Easy, 59.437, 24.7536);
    let repo = SqliteTaskRepository::try_new(conn).unwrap();
    repo.create_task(&task).unwrap();
    task.id
}
