use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::log_db_operation;
use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            // Each connection to :memory: is its own database.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        let db = Database { pool };
        db.migrate().await?;
        log_db_operation!(info, "migrate", "database initialized");
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS problems (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                platform TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                topic TEXT NOT NULL,
                subtopic TEXT,
                time_spent INTEGER NOT NULL DEFAULT 0,
                outcome TEXT NOT NULL,
                date TEXT NOT NULL,
                link TEXT,
                tags TEXT NOT NULL DEFAULT '',
                approach_notes TEXT,
                code_link TEXT,
                is_revision INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS learning_items (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                kind TEXT NOT NULL,
                category TEXT NOT NULL,
                subtopic TEXT,
                time_spent INTEGER NOT NULL DEFAULT 0,
                progress INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                date TEXT NOT NULL,
                link TEXT,
                tags TEXT NOT NULL DEFAULT '',
                notes TEXT,
                resource_link TEXT,
                is_revision INTEGER NOT NULL DEFAULT 0,
                difficulty TEXT,
                platform TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // item_id points at either problems or learning_items, selected by item_type.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS revision_items (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                item_id TEXT NOT NULL UNIQUE,
                item_type TEXT NOT NULL,
                original_date TEXT NOT NULL,
                next_revision_date TEXT NOT NULL,
                revision_cycle INTEGER NOT NULL DEFAULT 1 CHECK (revision_cycle >= 1),
                is_completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS revision_events (
                id TEXT PRIMARY KEY,
                revision_item_id TEXT NOT NULL,
                cycle_completed INTEGER NOT NULL,
                completed_date TEXT NOT NULL,
                next_revision_date TEXT NOT NULL,
                FOREIGN KEY (revision_item_id) REFERENCES revision_items(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roadmaps (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                color TEXT NOT NULL,
                is_public INTEGER NOT NULL DEFAULT 0,
                last_visited TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roadmap_topics (
                id TEXT PRIMARY KEY,
                roadmap_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                position INTEGER NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (roadmap_id) REFERENCES roadmaps(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roadmap_subtopics (
                id TEXT PRIMARY KEY,
                topic_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                position INTEGER NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT,
                difficulty TEXT,
                estimated_time INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (topic_id) REFERENCES roadmap_topics(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Problem operations
    /// Insert a problem and, when given, its first revision item atomically.
    pub async fn insert_problem(&self, problem: &Problem, revision: Option<&RevisionItem>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        problem_insert(problem).execute(&mut *tx).await?;
        if let Some(item) = revision {
            revision_item_insert(item).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        log_db_operation!(debug, "insert_problem", item_id = problem.id);
        Ok(())
    }

    pub async fn get_problem(&self, id: Uuid) -> Result<Option<Problem>> {
        let row = sqlx::query("SELECT * FROM problems WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_problem).transpose()
    }

    pub async fn list_problems(&self, user_id: &str) -> Result<Vec<Problem>> {
        let rows = sqlx::query("SELECT * FROM problems WHERE user_id = ?1 ORDER BY date DESC, rowid DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        log_db_operation!(debug, "list_problems", count = rows.len());
        rows.iter().map(row_to_problem).collect()
    }

    // Learning item operations
    pub async fn insert_learning_item(&self, item: &LearningItem, revision: Option<&RevisionItem>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        learning_item_insert(item).execute(&mut *tx).await?;
        if let Some(revision) = revision {
            revision_item_insert(revision).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        log_db_operation!(debug, "insert_learning_item", item_id = item.id);
        Ok(())
    }

    pub async fn get_learning_item(&self, id: Uuid) -> Result<Option<LearningItem>> {
        let row = sqlx::query("SELECT * FROM learning_items WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_learning_item).transpose()
    }

    pub async fn list_learning_items(&self, user_id: &str) -> Result<Vec<LearningItem>> {
        let rows = sqlx::query("SELECT * FROM learning_items WHERE user_id = ?1 ORDER BY date DESC, rowid DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        log_db_operation!(debug, "list_learning_items", count = rows.len());
        rows.iter().map(row_to_learning_item).collect()
    }

    pub async fn update_learning_item(&self, item: &LearningItem) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE learning_items
            SET title = ?1, kind = ?2, category = ?3, subtopic = ?4, time_spent = ?5,
                progress = ?6, status = ?7, link = ?8, tags = ?9, notes = ?10,
                resource_link = ?11, difficulty = ?12, platform = ?13
            WHERE id = ?14
            "#,
        )
        .bind(&item.title)
        .bind(item.kind)
        .bind(&item.category)
        .bind(&item.subtopic)
        .bind(item.time_spent)
        .bind(item.progress)
        .bind(item.status)
        .bind(&item.link)
        .bind(&item.tags)
        .bind(&item.notes)
        .bind(&item.resource_link)
        .bind(item.difficulty)
        .bind(&item.platform)
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a learning item together with its revision schedule.
    pub async fn delete_learning_item(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM revision_items WHERE item_id = ?1 AND item_type = ?2")
            .bind(id.to_string())
            .bind(ItemType::Learning)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM learning_items WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // Revision operations
    pub async fn insert_revision_item(&self, item: &RevisionItem) -> Result<()> {
        revision_item_insert(item).execute(&self.pool).await?;

        log_db_operation!(debug, "insert_revision_item", item_id = item.id);
        Ok(())
    }

    pub async fn get_revision_item(&self, id: Uuid) -> Result<Option<RevisionItem>> {
        let row = sqlx::query("SELECT * FROM revision_items WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_revision_item).transpose()
    }

    pub async fn get_revision_item_for_source(&self, item_id: Uuid) -> Result<Option<RevisionItem>> {
        let row = sqlx::query("SELECT * FROM revision_items WHERE item_id = ?1")
            .bind(item_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_revision_item).transpose()
    }

    /// Revision items in insertion order.
    pub async fn list_revision_items(&self, user_id: &str) -> Result<Vec<RevisionItem>> {
        let rows = sqlx::query("SELECT * FROM revision_items WHERE user_id = ?1 ORDER BY rowid ASC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        log_db_operation!(debug, "list_revision_items", count = rows.len());
        rows.iter().map(row_to_revision_item).collect()
    }

    /// Persist a completed revision and append its history event atomically.
    pub async fn record_completion(&self, item: &RevisionItem, event: &RevisionEvent) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE revision_items
            SET next_revision_date = ?1, revision_cycle = ?2, is_completed = ?3, completed_date = ?4
            WHERE id = ?5
            "#,
        )
        .bind(item.next_revision_date)
        .bind(item.revision_cycle)
        .bind(item.is_completed)
        .bind(item.completed_date)
        .bind(item.id.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO revision_events (id, revision_item_id, cycle_completed, completed_date, next_revision_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(event.id.to_string())
        .bind(event.revision_item_id.to_string())
        .bind(event.cycle_completed)
        .bind(event.completed_date)
        .bind(event.next_revision_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        log_db_operation!(debug, "record_completion", item_id = item.id);
        Ok(())
    }

    pub async fn list_revision_events(&self, revision_item_id: Uuid) -> Result<Vec<RevisionEvent>> {
        let rows = sqlx::query(
            "SELECT * FROM revision_events WHERE revision_item_id = ?1 ORDER BY completed_date ASC, rowid ASC",
        )
        .bind(revision_item_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_revision_event).collect()
    }

    // Roadmap operations
    pub async fn insert_roadmap(&self, roadmap: &Roadmap) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO roadmaps (id, user_id, title, description, color, is_public, last_visited,
                                  created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(roadmap.id.to_string())
        .bind(&roadmap.user_id)
        .bind(&roadmap.title)
        .bind(&roadmap.description)
        .bind(&roadmap.color)
        .bind(roadmap.is_public)
        .bind(roadmap.last_visited.map(|d| d.to_rfc3339()))
        .bind(roadmap.created_at.to_rfc3339())
        .bind(roadmap.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load a roadmap with its topics and subtopics.
    pub async fn get_roadmap(&self, id: Uuid) -> Result<Option<Roadmap>> {
        let row = sqlx::query("SELECT * FROM roadmaps WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut roadmap = row_to_roadmap(&row)?;
                roadmap.topics = self.load_topics(roadmap.id).await?;
                Ok(Some(roadmap))
            }
            None => Ok(None),
        }
    }

    pub async fn list_roadmaps(&self, user_id: &str) -> Result<Vec<Roadmap>> {
        let rows = sqlx::query("SELECT * FROM roadmaps WHERE user_id = ?1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut roadmaps = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut roadmap = row_to_roadmap(row)?;
            roadmap.topics = self.load_topics(roadmap.id).await?;
            roadmaps.push(roadmap);
        }

        log_db_operation!(debug, "list_roadmaps", count = roadmaps.len());
        Ok(roadmaps)
    }

    pub async fn touch_roadmap(&self, id: Uuid, visited_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE roadmaps SET last_visited = ?1 WHERE id = ?2")
            .bind(visited_at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn load_topics(&self, roadmap_id: Uuid) -> Result<Vec<Topic>> {
        let rows = sqlx::query("SELECT * FROM roadmap_topics WHERE roadmap_id = ?1 ORDER BY position ASC")
            .bind(roadmap_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut topic = row_to_topic(row)?;
            topic.subtopics = self.load_subtopics(topic.id).await?;
            topic.refresh_counters();
            topics.push(topic);
        }

        Ok(topics)
    }

    async fn load_subtopics(&self, topic_id: Uuid) -> Result<Vec<Subtopic>> {
        let rows = sqlx::query("SELECT * FROM roadmap_subtopics WHERE topic_id = ?1 ORDER BY position ASC")
            .bind(topic_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_subtopic).collect()
    }

    pub async fn get_topic(&self, id: Uuid) -> Result<Option<Topic>> {
        let row = sqlx::query("SELECT * FROM roadmap_topics WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut topic = row_to_topic(&row)?;
                topic.subtopics = self.load_subtopics(topic.id).await?;
                topic.refresh_counters();
                Ok(Some(topic))
            }
            None => Ok(None),
        }
    }

    pub async fn next_topic_position(&self, roadmap_id: Uuid) -> Result<u32> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM roadmap_topics WHERE roadmap_id = ?1")
            .bind(roadmap_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(u32::try_from(max.unwrap_or(0))? + 1)
    }

    pub async fn next_subtopic_position(&self, topic_id: Uuid) -> Result<u32> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM roadmap_subtopics WHERE topic_id = ?1")
            .bind(topic_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(u32::try_from(max.unwrap_or(0))? + 1)
    }

    pub async fn insert_topic(&self, topic: &Topic) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO roadmap_topics (id, roadmap_id, title, description, position, is_completed,
                                        completed_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(topic.id.to_string())
        .bind(topic.roadmap_id.to_string())
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(topic.order)
        .bind(topic.is_completed)
        .bind(topic.completed_date)
        .bind(topic.created_at.to_rfc3339())
        .bind(topic.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.bump_roadmap(topic.roadmap_id, topic.updated_at).await
    }

    pub async fn get_subtopic(&self, id: Uuid) -> Result<Option<Subtopic>> {
        let row = sqlx::query("SELECT * FROM roadmap_subtopics WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_subtopic).transpose()
    }

    pub async fn insert_subtopic(&self, subtopic: &Subtopic) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO roadmap_subtopics (id, topic_id, title, description, position, is_completed,
                                           completed_date, difficulty, estimated_time, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(subtopic.id.to_string())
        .bind(subtopic.topic_id.to_string())
        .bind(&subtopic.title)
        .bind(&subtopic.description)
        .bind(subtopic.order)
        .bind(subtopic.is_completed)
        .bind(subtopic.completed_date)
        .bind(subtopic.difficulty)
        .bind(subtopic.estimated_time)
        .bind(subtopic.created_at.to_rfc3339())
        .bind(subtopic.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// `completed_date = None` marks the topic as not completed.
    pub async fn set_topic_completion(&self, id: Uuid, completed_date: Option<NaiveDate>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE roadmap_topics SET is_completed = ?1, completed_date = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(completed_date.is_some())
        .bind(completed_date)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_subtopic_completion(&self, id: Uuid, completed_date: Option<NaiveDate>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE roadmap_subtopics SET is_completed = ?1, completed_date = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(completed_date.is_some())
        .bind(completed_date)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn bump_roadmap(&self, roadmap_id: Uuid, updated_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE roadmaps SET updated_at = ?1 WHERE id = ?2")
            .bind(updated_at.to_rfc3339())
            .bind(roadmap_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

type InsertQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

fn problem_insert(problem: &Problem) -> InsertQuery<'_> {
    sqlx::query(
        r#"
        INSERT INTO problems (id, user_id, title, platform, difficulty, topic, subtopic,
                              time_spent, outcome, date, link, tags, approach_notes,
                              code_link, is_revision)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
    )
    .bind(problem.id.to_string())
    .bind(&problem.user_id)
    .bind(&problem.title)
    .bind(&problem.platform)
    .bind(problem.difficulty)
    .bind(&problem.topic)
    .bind(&problem.subtopic)
    .bind(problem.time_spent)
    .bind(problem.outcome)
    .bind(problem.date)
    .bind(&problem.link)
    .bind(&problem.tags)
    .bind(&problem.approach_notes)
    .bind(&problem.code_link)
    .bind(problem.is_revision)
}

fn learning_item_insert(item: &LearningItem) -> InsertQuery<'_> {
    sqlx::query(
        r#"
        INSERT INTO learning_items (id, user_id, title, kind, category, subtopic, time_spent,
                                    progress, status, date, link, tags, notes, resource_link,
                                    is_revision, difficulty, platform)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        "#,
    )
    .bind(item.id.to_string())
    .bind(&item.user_id)
    .bind(&item.title)
    .bind(item.kind)
    .bind(&item.category)
    .bind(&item.subtopic)
    .bind(item.time_spent)
    .bind(item.progress)
    .bind(item.status)
    .bind(item.date)
    .bind(&item.link)
    .bind(&item.tags)
    .bind(&item.notes)
    .bind(&item.resource_link)
    .bind(item.is_revision)
    .bind(item.difficulty)
    .bind(&item.platform)
}

fn revision_item_insert(item: &RevisionItem) -> InsertQuery<'_> {
    sqlx::query(
        r#"
        INSERT INTO revision_items (id, user_id, item_id, item_type, original_date,
                                    next_revision_date, revision_cycle, is_completed, completed_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(item.id.to_string())
    .bind(&item.user_id)
    .bind(item.item_id.to_string())
    .bind(item.item_type)
    .bind(item.original_date)
    .bind(item.next_revision_date)
    .bind(item.revision_cycle)
    .bind(item.is_completed)
    .bind(item.completed_date)
}

fn parse_uuid(row: &SqliteRow, column: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(&row.try_get::<String, _>(column)?)?)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn row_to_problem(row: &SqliteRow) -> Result<Problem> {
    Ok(Problem {
        id: parse_uuid(row, "id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        platform: row.try_get("platform")?,
        difficulty: row.try_get("difficulty")?,
        topic: row.try_get("topic")?,
        subtopic: row.try_get("subtopic")?,
        time_spent: row.try_get("time_spent")?,
        outcome: row.try_get("outcome")?,
        date: row.try_get("date")?,
        link: row.try_get("link")?,
        tags: row.try_get("tags")?,
        approach_notes: row.try_get("approach_notes")?,
        code_link: row.try_get("code_link")?,
        is_revision: row.try_get("is_revision")?,
    })
}

fn row_to_learning_item(row: &SqliteRow) -> Result<LearningItem> {
    Ok(LearningItem {
        id: parse_uuid(row, "id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        kind: row.try_get("kind")?,
        category: row.try_get("category")?,
        subtopic: row.try_get("subtopic")?,
        time_spent: row.try_get("time_spent")?,
        progress: row.try_get("progress")?,
        status: row.try_get("status")?,
        date: row.try_get("date")?,
        link: row.try_get("link")?,
        tags: row.try_get("tags")?,
        notes: row.try_get("notes")?,
        resource_link: row.try_get("resource_link")?,
        is_revision: row.try_get("is_revision")?,
        difficulty: row.try_get("difficulty")?,
        platform: row.try_get("platform")?,
    })
}

fn row_to_revision_item(row: &SqliteRow) -> Result<RevisionItem> {
    Ok(RevisionItem {
        id: parse_uuid(row, "id")?,
        user_id: row.try_get("user_id")?,
        item_id: parse_uuid(row, "item_id")?,
        item_type: row.try_get("item_type")?,
        subject: None,
        original_date: row.try_get("original_date")?,
        next_revision_date: row.try_get("next_revision_date")?,
        revision_cycle: row.try_get("revision_cycle")?,
        is_completed: row.try_get("is_completed")?,
        completed_date: row.try_get("completed_date")?,
    })
}

fn row_to_revision_event(row: &SqliteRow) -> Result<RevisionEvent> {
    Ok(RevisionEvent {
        id: parse_uuid(row, "id")?,
        revision_item_id: parse_uuid(row, "revision_item_id")?,
        cycle_completed: row.try_get("cycle_completed")?,
        completed_date: row.try_get("completed_date")?,
        next_revision_date: row.try_get("next_revision_date")?,
    })
}

fn row_to_roadmap(row: &SqliteRow) -> Result<Roadmap> {
    Ok(Roadmap {
        id: parse_uuid(row, "id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        color: row.try_get("color")?,
        is_public: row.try_get("is_public")?,
        last_visited: row
            .try_get::<Option<String>, _>("last_visited")?
            .map(|s| parse_timestamp(&s))
            .transpose()?,
        topics: Vec::new(),
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}

fn row_to_topic(row: &SqliteRow) -> Result<Topic> {
    Ok(Topic {
        id: parse_uuid(row, "id")?,
        roadmap_id: parse_uuid(row, "roadmap_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        order: row.try_get("position")?,
        is_completed: row.try_get("is_completed")?,
        completed_date: row.try_get("completed_date")?,
        subtopics: Vec::new(),
        total_subtopics: 0,
        completed_subtopics: 0,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}

fn row_to_subtopic(row: &SqliteRow) -> Result<Subtopic> {
    Ok(Subtopic {
        id: parse_uuid(row, "id")?,
        topic_id: parse_uuid(row, "topic_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        order: row.try_get("position")?,
        is_completed: row.try_get("is_completed")?,
        completed_date: row.try_get("completed_date")?,
        difficulty: row.try_get("difficulty")?,
        estimated_time: row.try_get("estimated_time")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}
