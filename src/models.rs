use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Outcome {
    Solved,
    Hints,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum LearningType {
    Course,
    Book,
    Tutorial,
    Article,
    Video,
    Podcast,
    Workshop,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
pub enum LearningStatus {
    NotStarted,
    InProgress,
    Completed,
    Paused,
}

/// Skill level shared by learning items and roadmap subtopics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub platform: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub subtopic: Option<String>,
    pub time_spent: u32, // minutes
    pub outcome: Outcome,
    pub date: NaiveDate,
    pub link: Option<String>,
    pub tags: String,
    pub approach_notes: Option<String>,
    pub code_link: Option<String>,
    pub is_revision: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LearningType,
    pub category: String,
    pub subtopic: Option<String>,
    pub time_spent: u32,
    pub progress: u8, // 0-100
    pub status: LearningStatus,
    pub date: NaiveDate,
    pub link: Option<String>,
    pub tags: String,
    pub notes: Option<String>,
    pub resource_link: Option<String>,
    pub is_revision: bool,
    pub difficulty: Option<SkillLevel>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum ItemType {
    Problem,
    Learning,
}

/// Hydrated source record attached to a revision item for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevisionSubject {
    Problem(Problem),
    LearningItem(LearningItem),
}

impl RevisionSubject {
    pub fn item_type(&self) -> ItemType {
        match self {
            RevisionSubject::Problem(_) => ItemType::Problem,
            RevisionSubject::LearningItem(_) => ItemType::Learning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionItem {
    pub id: Uuid,
    pub user_id: String,
    pub item_id: Uuid,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<RevisionSubject>,
    pub original_date: NaiveDate,
    pub next_revision_date: NaiveDate,
    pub revision_cycle: u32,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
}

impl RevisionItem {
    /// Attach the source record. A subject of the wrong kind is dropped.
    pub fn with_subject(mut self, subject: RevisionSubject) -> Self {
        if subject.item_type() == self.item_type {
            self.subject = Some(subject);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionAgenda {
    pub date: NaiveDate,
    pub items: Vec<RevisionItem>,
    pub total_items: usize,
    pub completed_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStats {
    pub total_revisions: usize,
    pub completed_revisions: usize,
    pub upcoming_revisions: usize,
    pub overdue_revisions: usize,
    pub current_streak: u32,
}

/// One completed review, appended to the history log on every completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionEvent {
    pub id: Uuid,
    pub revision_item_id: Uuid,
    pub cycle_completed: u32,
    pub completed_date: NaiveDate,
    pub next_revision_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub is_public: bool,
    pub last_visited: Option<DateTime<Utc>>,
    pub topics: Vec<Topic>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Uuid,
    pub roadmap_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub order: u32,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub subtopics: Vec<Subtopic>,
    pub total_subtopics: u32,
    pub completed_subtopics: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    /// Recompute the subtopic counters from the loaded subtopics.
    pub fn refresh_counters(&mut self) {
        self.total_subtopics = self.subtopics.len() as u32;
        self.completed_subtopics = self.subtopics.iter().filter(|s| s.is_completed).count() as u32;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub order: u32,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub difficulty: Option<SkillLevel>,
    pub estimated_time: Option<u32>, // minutes
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapProgress {
    pub total_topics: u32,
    pub completed_topics: u32,
    pub total_subtopics: u32,
    pub completed_subtopics: u32,
    pub overall_progress: f64,
}

impl RoadmapProgress {
    /// Topics and subtopics weigh the same towards overall progress.
    pub fn from_roadmap(roadmap: &Roadmap) -> Self {
        let total_topics = roadmap.topics.len() as u32;
        let completed_topics = roadmap.topics.iter().filter(|t| t.is_completed).count() as u32;
        let total_subtopics = roadmap.topics.iter().map(|t| t.total_subtopics).sum();
        let completed_subtopics = roadmap.topics.iter().map(|t| t.completed_subtopics).sum();

        let total_items = total_topics + total_subtopics;
        let overall_progress = if total_items > 0 {
            f64::from(completed_topics + completed_subtopics) / f64::from(total_items) * 100.0
        } else {
            0.0
        };

        Self {
            total_topics,
            completed_topics,
            total_subtopics,
            completed_subtopics,
            overall_progress,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapWithProgress {
    #[serde(flatten)]
    pub roadmap: Roadmap,
    pub progress: RoadmapProgress,
}

// Request payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemRequest {
    pub title: String,
    pub platform: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub subtopic: Option<String>,
    #[serde(default)]
    pub time_spent: u32,
    pub outcome: Outcome,
    pub date: Option<NaiveDate>, // defaults to today
    pub link: Option<String>,
    #[serde(default)]
    pub tags: String,
    pub approach_notes: Option<String>,
    pub code_link: Option<String>,
    #[serde(default)]
    pub is_revision: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningItemRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LearningType,
    pub category: String,
    pub subtopic: Option<String>,
    #[serde(default)]
    pub time_spent: u32,
    #[serde(default)]
    pub progress: u8,
    pub status: LearningStatus,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    #[serde(default)]
    pub tags: String,
    pub notes: Option<String>,
    pub resource_link: Option<String>,
    #[serde(default)]
    pub is_revision: bool,
    pub difficulty: Option<SkillLevel>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLearningItemRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<LearningType>,
    pub category: Option<String>,
    pub subtopic: Option<String>,
    pub time_spent: Option<u32>,
    pub progress: Option<u8>,
    pub status: Option<LearningStatus>,
    pub link: Option<String>,
    pub tags: Option<String>,
    pub notes: Option<String>,
    pub resource_link: Option<String>,
    pub difficulty: Option<SkillLevel>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRevisionRequest {
    pub item_id: Uuid,
    pub item_type: ItemType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoadmapRequest {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>, // defaults to #3B82F6
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubtopicRequest {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<SkillLevel>,
    pub estimated_time: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> Problem {
        Problem {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            title: "Two Sum".to_string(),
            platform: "LeetCode".to_string(),
            difficulty: Difficulty::Easy,
            topic: "Arrays".to_string(),
            subtopic: None,
            time_spent: 10,
            outcome: Outcome::Solved,
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            link: None,
            tags: String::new(),
            approach_notes: None,
            code_link: None,
            is_revision: true,
        }
    }

    #[test]
    fn test_subject_is_tagged_by_kind() {
        let value = serde_json::to_value(RevisionSubject::Problem(problem())).unwrap();
        assert_eq!(value["problem"]["title"], "Two Sum");
        assert_eq!(value["problem"]["isRevision"], true);
    }

    #[test]
    fn test_with_subject_drops_mismatched_kind() {
        let p = problem();
        let item = RevisionItem {
            id: Uuid::new_v4(),
            user_id: p.user_id.clone(),
            item_id: p.id,
            item_type: ItemType::Learning,
            subject: None,
            original_date: p.date,
            next_revision_date: p.date,
            revision_cycle: 1,
            is_completed: false,
            completed_date: None,
        };

        assert!(item.clone().with_subject(RevisionSubject::Problem(p.clone())).subject.is_none());

        let item = RevisionItem { item_type: ItemType::Problem, ..item };
        assert!(item.with_subject(RevisionSubject::Problem(p)).subject.is_some());
    }

    #[test]
    fn test_empty_roadmap_progress_is_zero() {
        let now = Utc::now();
        let roadmap = Roadmap {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            title: "Empty".to_string(),
            description: None,
            color: "#3B82F6".to_string(),
            is_public: false,
            last_visited: None,
            topics: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let progress = RoadmapProgress::from_roadmap(&roadmap);
        assert_eq!(progress, RoadmapProgress::default());
    }

    #[test]
    fn test_learning_status_wire_format() {
        assert_eq!(serde_json::to_value(LearningStatus::NotStarted).unwrap(), "not-started");
        let parsed: LearningType = serde_json::from_value(serde_json::json!("podcast")).unwrap();
        assert_eq!(parsed, LearningType::Podcast);
    }
}
