use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

use crate::config::RevisionConfig;
use crate::database::Database;
use crate::date_utils;
use crate::models::*;
use crate::notifications::{NoopNotifier, Notification, SharedNotifier};
use crate::revision_scheduler::{RevisionScheduler, RevisionSource};

// Import logging macros
use crate::{log_service_error, log_service_start, log_service_success, log_service_warn};

const SERVICE: &str = "tracker_service";
const DEFAULT_ROADMAP_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("item '{0}' already has a revision schedule")]
    AlreadyScheduled(Uuid),

    #[error("completion of revision item '{0}' is already in progress")]
    CompletionInProgress(Uuid),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TrackerError {
    fn not_found(kind: &'static str, id: Uuid) -> Self {
        TrackerError::NotFound { kind, id: id.to_string() }
    }
}

type InFlight = Arc<Mutex<HashSet<Uuid>>>;

/// Holds a revision id in the in-flight set until dropped.
struct CompletionGuard {
    id: Uuid,
    in_flight: InFlight,
}

impl CompletionGuard {
    fn acquire(in_flight: &InFlight, id: Uuid) -> Result<Self, TrackerError> {
        let mut set = in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(id) {
            return Err(TrackerError::CompletionInProgress(id));
        }

        Ok(Self {
            id,
            in_flight: Arc::clone(in_flight),
        })
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.id);
    }
}

#[derive(Clone)]
pub struct TrackerService {
    db: Database,
    scheduler: RevisionScheduler,
    notifier: SharedNotifier,
    revision_config: RevisionConfig,
    completions_in_flight: InFlight,
}

impl TrackerService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            scheduler: RevisionScheduler::new(),
            notifier: Arc::new(NoopNotifier),
            revision_config: RevisionConfig::default(),
            completions_in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_notifier(mut self, notifier: SharedNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_revision_config(mut self, config: RevisionConfig) -> Self {
        self.revision_config = config;
        self
    }

    /// The current study day, honouring the configured reset hour.
    pub fn today(&self) -> NaiveDate {
        date_utils::adjusted_today(self.revision_config.daily_reset_hour)
    }

    // Problem operations
    pub async fn create_problem(&self, user_id: &str, request: CreateProblemRequest) -> Result<Problem> {
        require_non_empty("title", &request.title)?;
        require_non_empty("topic", &request.topic)?;

        let problem = Problem {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: request.title.trim().to_string(),
            platform: request.platform,
            difficulty: request.difficulty,
            topic: request.topic,
            subtopic: request.subtopic,
            time_spent: request.time_spent,
            outcome: request.outcome,
            date: request.date.unwrap_or_else(|| self.today()),
            link: request.link,
            tags: request.tags,
            approach_notes: request.approach_notes,
            code_link: request.code_link,
            is_revision: request.is_revision,
        };

        let revision = self.first_revision_for(&problem, problem.is_revision)?;
        self.db.insert_problem(&problem, revision.as_ref()).await?;
        if let Some(revision) = &revision {
            self.notify_scheduled(revision);
        }

        self.notifier.notify(Notification::created("Problem", Some(&problem.title)));
        Ok(problem)
    }

    pub async fn get_problem(&self, id: Uuid) -> Result<Option<Problem>> {
        self.db.get_problem(id).await
    }

    pub async fn list_problems(&self, user_id: &str) -> Result<Vec<Problem>> {
        self.db.list_problems(user_id).await
    }

    // Learning item operations
    pub async fn create_learning_item(
        &self,
        user_id: &str,
        request: CreateLearningItemRequest,
    ) -> Result<LearningItem> {
        require_non_empty("title", &request.title)?;
        require_progress(request.progress)?;

        let item = LearningItem {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: request.title.trim().to_string(),
            kind: request.kind,
            category: request.category,
            subtopic: request.subtopic,
            time_spent: request.time_spent,
            progress: request.progress,
            status: request.status,
            date: request.date.unwrap_or_else(|| self.today()),
            link: request.link,
            tags: request.tags,
            notes: request.notes,
            resource_link: request.resource_link,
            is_revision: request.is_revision,
            difficulty: request.difficulty,
            platform: request.platform,
        };

        let revision = self.first_revision_for(&item, item.is_revision)?;
        self.db.insert_learning_item(&item, revision.as_ref()).await?;
        if let Some(revision) = &revision {
            self.notify_scheduled(revision);
        }

        self.notifier.notify(Notification::created("Learning Item", Some(&item.title)));
        Ok(item)
    }

    pub async fn list_learning_items(&self, user_id: &str) -> Result<Vec<LearningItem>> {
        self.db.list_learning_items(user_id).await
    }

    pub async fn update_learning_item(
        &self,
        id: Uuid,
        request: UpdateLearningItemRequest,
    ) -> Result<Option<LearningItem>> {
        let mut item = match self.db.get_learning_item(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };

        if let Some(title) = request.title {
            require_non_empty("title", &title)?;
            item.title = title.trim().to_string();
        }
        if let Some(progress) = request.progress {
            require_progress(progress)?;
            item.progress = progress;
        }
        if let Some(kind) = request.kind {
            item.kind = kind;
        }
        if let Some(category) = request.category {
            item.category = category;
        }
        if let Some(time_spent) = request.time_spent {
            item.time_spent = time_spent;
        }
        if let Some(status) = request.status {
            item.status = status;
        }
        if let Some(tags) = request.tags {
            item.tags = tags;
        }
        if request.subtopic.is_some() {
            item.subtopic = request.subtopic;
        }
        if request.link.is_some() {
            item.link = request.link;
        }
        if request.notes.is_some() {
            item.notes = request.notes;
        }
        if request.resource_link.is_some() {
            item.resource_link = request.resource_link;
        }
        if request.difficulty.is_some() {
            item.difficulty = request.difficulty;
        }
        if request.platform.is_some() {
            item.platform = request.platform;
        }

        self.db.update_learning_item(&item).await?;
        self.notifier.notify(Notification::updated("Learning Item", None));
        Ok(Some(item))
    }

    pub async fn delete_learning_item(&self, id: Uuid) -> Result<bool> {
        let deleted = self.db.delete_learning_item(id).await?;
        if deleted {
            self.notifier.notify(Notification::deleted("Learning Item", None));
        }
        Ok(deleted)
    }

    // Revision operations
    /// Put an existing problem or learning item on the revision schedule.
    pub async fn schedule_revision(
        &self,
        user_id: &str,
        request: CreateRevisionRequest,
    ) -> Result<RevisionItem> {
        let subject = match request.item_type {
            ItemType::Problem => self
                .db
                .get_problem(request.item_id)
                .await?
                .map(RevisionSubject::Problem),
            ItemType::Learning => self
                .db
                .get_learning_item(request.item_id)
                .await?
                .map(RevisionSubject::LearningItem),
        };

        let subject = match subject {
            Some(subject) if subject_owner(&subject) == user_id => subject,
            _ => return Err(TrackerError::not_found(item_type_label(request.item_type), request.item_id).into()),
        };

        let item = match &subject {
            RevisionSubject::Problem(problem) => self.schedule_source(problem).await?,
            RevisionSubject::LearningItem(learning) => self.schedule_source(learning).await?,
        };

        Ok(item.with_subject(subject))
    }

    async fn schedule_source<S: RevisionSource>(&self, source: &S) -> Result<RevisionItem> {
        if self.db.get_revision_item_for_source(source.source_id()).await?.is_some() {
            log_service_warn!(SERVICE, "schedule_revision", "source already scheduled");
            return Err(TrackerError::AlreadyScheduled(source.source_id()).into());
        }

        let item = self.scheduler.create_revision_item(source)?;
        self.db.insert_revision_item(&item).await?;

        self.notify_scheduled(&item);
        Ok(item)
    }

    /// The revision item a newly logged source starts with, if it is flagged.
    /// Computed before anything is written so a scheduling error stores nothing.
    fn first_revision_for<S: RevisionSource>(&self, source: &S, flagged: bool) -> Result<Option<RevisionItem>> {
        if !flagged {
            return Ok(None);
        }
        Ok(Some(self.scheduler.create_revision_item(source)?))
    }

    fn notify_scheduled(&self, item: &RevisionItem) {
        self.notifier.notify(Notification::created(
            "Revision",
            Some(&format!(
                "First review due {}",
                date_utils::format_date_for_display(item.next_revision_date)
            )),
        ));
    }

    /// All revision items of a user in insertion order, with their source attached.
    pub async fn list_revision_items(&self, user_id: &str) -> Result<Vec<RevisionItem>> {
        let items = self.db.list_revision_items(user_id).await?;
        self.hydrate(user_id, items).await
    }

    async fn hydrate(&self, user_id: &str, items: Vec<RevisionItem>) -> Result<Vec<RevisionItem>> {
        if items.is_empty() {
            return Ok(items);
        }

        let problems: HashMap<Uuid, Problem> = self
            .db
            .list_problems(user_id)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let learning: HashMap<Uuid, LearningItem> = self
            .db
            .list_learning_items(user_id)
            .await?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let subject = match item.item_type {
                    ItemType::Problem => problems.get(&item.item_id).cloned().map(RevisionSubject::Problem),
                    ItemType::Learning => learning.get(&item.item_id).cloned().map(RevisionSubject::LearningItem),
                };
                match subject {
                    Some(subject) => item.with_subject(subject),
                    None => item,
                }
            })
            .collect())
    }

    pub async fn complete_revision_item(&self, id: Uuid) -> Result<RevisionItem> {
        self.complete_revision_item_on(id, self.today()).await
    }

    /// Complete a revision on `today`. Concurrent completions of the same id
    /// are rejected with `CompletionInProgress`.
    pub async fn complete_revision_item_on(&self, id: Uuid, today: NaiveDate) -> Result<RevisionItem> {
        log_service_start!(SERVICE, "complete_revision", item_id = id);
        let started = Instant::now();

        let _guard = CompletionGuard::acquire(&self.completions_in_flight, id)?;

        let item = self
            .db
            .get_revision_item(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("revision item", id))?;

        let completed = self.scheduler.complete_revision_item(&item, today)?;
        let event = RevisionEvent {
            id: Uuid::new_v4(),
            revision_item_id: id,
            cycle_completed: item.revision_cycle,
            completed_date: today,
            next_revision_date: completed.next_revision_date,
        };

        if let Err(e) = self.db.record_completion(&completed, &event).await {
            log_service_error!(SERVICE, "complete_revision", item_id = id, error = &e);
            self.notifier.notify(Notification::failed("Complete", "Revision", &e.to_string()));
            return Err(e);
        }

        log_service_success!(
            SERVICE,
            "complete_revision",
            item_id = id,
            duration_ms = started.elapsed().as_millis() as u64
        );
        self.notifier.notify(Notification::updated(
            "Revision",
            Some(&format!(
                "Next review {} ({})",
                date_utils::format_date_for_display(completed.next_revision_date),
                date_utils::relative_date_description(completed.next_revision_date, today)
            )),
        ));

        let user_id = completed.user_id.clone();
        let mut hydrated = self.hydrate(&user_id, vec![completed]).await?;
        Ok(hydrated.remove(0))
    }

    pub async fn revision_history(&self, id: Uuid) -> Result<Vec<RevisionEvent>> {
        if self.db.get_revision_item(id).await?.is_none() {
            return Err(TrackerError::not_found("revision item", id).into());
        }
        self.db.list_revision_events(id).await
    }

    /// Agenda over `[start, end]`; defaults to today plus the configured window.
    pub async fn revision_agenda(
        &self,
        user_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<RevisionAgenda>> {
        let start = start.unwrap_or_else(|| self.today());
        let end = match end {
            Some(end) => end,
            None => start
                .checked_add_days(Days::new(u64::from(self.revision_config.agenda_window_days)))
                .ok_or_else(|| TrackerError::InvalidInput(format!("agenda window from {} overflows", start)))?,
        };

        let items = self.list_revision_items(user_id).await?;
        Ok(self.scheduler.build_agenda(&items, start, end))
    }

    pub async fn due_revisions(&self, user_id: &str, date: Option<NaiveDate>) -> Result<Vec<RevisionItem>> {
        let date = date.unwrap_or_else(|| self.today());
        let items = self.list_revision_items(user_id).await?;
        Ok(self.scheduler.select_due_items(&items, date))
    }

    pub async fn revision_stats(&self, user_id: &str, today: Option<NaiveDate>) -> Result<RevisionStats> {
        let today = today.unwrap_or_else(|| self.today());
        let items = self.db.list_revision_items(user_id).await?;
        Ok(self.scheduler.compute_stats(&items, today))
    }

    // Roadmap operations
    pub async fn create_roadmap(&self, user_id: &str, request: CreateRoadmapRequest) -> Result<RoadmapWithProgress> {
        require_non_empty("title", &request.title)?;
        let color = request.color.unwrap_or_else(|| DEFAULT_ROADMAP_COLOR.to_string());
        if !hex_color_pattern().is_match(&color) {
            return Err(TrackerError::InvalidInput(format!("color '{}' must look like #RRGGBB", color)).into());
        }

        let now = Utc::now();
        let roadmap = Roadmap {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: request.title.trim().to_string(),
            description: request.description,
            color,
            is_public: request.is_public,
            last_visited: None,
            topics: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.db.insert_roadmap(&roadmap).await?;
        self.notifier.notify(Notification::created("Roadmap", Some(&roadmap.title)));
        Ok(with_progress(roadmap))
    }

    pub async fn list_roadmaps(&self, user_id: &str) -> Result<Vec<RoadmapWithProgress>> {
        let roadmaps = self.db.list_roadmaps(user_id).await?;
        Ok(roadmaps.into_iter().map(with_progress).collect())
    }

    /// Load a roadmap and record the visit.
    pub async fn get_roadmap(&self, id: Uuid) -> Result<Option<RoadmapWithProgress>> {
        let Some(mut roadmap) = self.db.get_roadmap(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        self.db.touch_roadmap(id, now).await?;
        roadmap.last_visited = Some(now);
        Ok(Some(with_progress(roadmap)))
    }

    pub async fn add_topic(&self, roadmap_id: Uuid, request: CreateTopicRequest) -> Result<Topic> {
        require_non_empty("title", &request.title)?;
        if self.db.get_roadmap(roadmap_id).await?.is_none() {
            return Err(TrackerError::not_found("roadmap", roadmap_id).into());
        }

        let now = Utc::now();
        let topic = Topic {
            id: Uuid::new_v4(),
            roadmap_id,
            title: request.title.trim().to_string(),
            description: request.description,
            order: self.db.next_topic_position(roadmap_id).await?,
            is_completed: false,
            completed_date: None,
            subtopics: Vec::new(),
            total_subtopics: 0,
            completed_subtopics: 0,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_topic(&topic).await?;
        self.notifier.notify(Notification::created("Topic", Some(&topic.title)));
        Ok(topic)
    }

    pub async fn add_subtopic(&self, topic_id: Uuid, request: CreateSubtopicRequest) -> Result<Subtopic> {
        require_non_empty("title", &request.title)?;
        if self.db.get_topic(topic_id).await?.is_none() {
            return Err(TrackerError::not_found("topic", topic_id).into());
        }

        let now = Utc::now();
        let subtopic = Subtopic {
            id: Uuid::new_v4(),
            topic_id,
            title: request.title.trim().to_string(),
            description: request.description,
            order: self.db.next_subtopic_position(topic_id).await?,
            is_completed: false,
            completed_date: None,
            difficulty: request.difficulty,
            estimated_time: request.estimated_time,
            created_at: now,
            updated_at: now,
        };

        self.db.insert_subtopic(&subtopic).await?;
        self.notifier.notify(Notification::created("Subtopic", Some(&subtopic.title)));
        Ok(subtopic)
    }

    pub async fn set_topic_completed(&self, topic_id: Uuid, completed: bool) -> Result<Topic> {
        let completed_date = completed.then(|| self.today());
        if !self.db.set_topic_completion(topic_id, completed_date).await? {
            return Err(TrackerError::not_found("topic", topic_id).into());
        }

        self.notifier.notify(Notification::updated("Topic", None));
        self.db
            .get_topic(topic_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("topic", topic_id).into())
    }

    pub async fn set_subtopic_completed(&self, subtopic_id: Uuid, completed: bool) -> Result<Subtopic> {
        let completed_date = completed.then(|| self.today());
        if !self.db.set_subtopic_completion(subtopic_id, completed_date).await? {
            return Err(TrackerError::not_found("subtopic", subtopic_id).into());
        }

        self.notifier.notify(Notification::updated("Subtopic", None));
        self.db
            .get_subtopic(subtopic_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("subtopic", subtopic_id).into())
    }
}

fn with_progress(roadmap: Roadmap) -> RoadmapWithProgress {
    let progress = RoadmapProgress::from_roadmap(&roadmap);
    RoadmapWithProgress { roadmap, progress }
}

fn subject_owner(subject: &RevisionSubject) -> &str {
    match subject {
        RevisionSubject::Problem(problem) => &problem.user_id,
        RevisionSubject::LearningItem(item) => &item.user_id,
    }
}

fn item_type_label(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Problem => "problem",
        ItemType::Learning => "learning item",
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), TrackerError> {
    if value.trim().is_empty() {
        return Err(TrackerError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_progress(progress: u8) -> Result<(), TrackerError> {
    if progress > 100 {
        return Err(TrackerError::InvalidInput(format!("progress {} is above 100", progress)));
    }
    Ok(())
}

fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"))
}
