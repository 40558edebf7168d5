use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{Application, ApplicationPatch, EventType, NewApplication, Note, Profile, TimelineEvent};
use crate::seed;
use crate::storage::Storage;

pub const APPLICATIONS_KEY: &str = "applications";
pub const NOTES_KEY: &str = "notes";
pub const TIMELINE_KEY: &str = "timeline";
pub const PROFILE_KEY: &str = "profile";

/// Canonical owner of the application collection and its sub-records.
///
/// All reads go through its query surface and all mutations through its
/// operations; every mutation rewrites the owning collection's whole document
/// in storage before returning. A failed write keeps the in-memory change and
/// reports on stderr. Construct one per process (or per test) and pass it by
/// reference; there is no global instance.
pub struct AppStore {
    storage: Box<dyn Storage>,
    applications: Vec<Application>,
    notes: Vec<Note>,
    events: Vec<TimelineEvent>,
    profile: Profile,
    last_id: i64,
}

impl AppStore {
    /// Loads all collections from storage. A missing or unparseable
    /// applications document falls back to the built-in seed set, which is
    /// persisted immediately; notes, timeline, and profile start empty.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let seeded_applications = load_or_default(storage.as_ref(), APPLICATIONS_KEY);
        let notes = load_or_default(storage.as_ref(), NOTES_KEY).unwrap_or_default();
        let events = load_or_default(storage.as_ref(), TIMELINE_KEY).unwrap_or_default();
        let profile = load_or_default(storage.as_ref(), PROFILE_KEY).unwrap_or_default();

        let mut store = Self {
            storage,
            applications: Vec::new(),
            notes,
            events,
            profile,
            last_id: 0,
        };

        match seeded_applications {
            Some(apps) => store.applications = apps,
            None => {
                store.applications = seed::default_applications();
                store.persist(APPLICATIONS_KEY, &store.applications);
            }
        }

        store
    }

    // --- Application operations ---

    /// Full collection, in insertion order.
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|app| app.id == id)
    }

    /// Creates a record and returns its generated id.
    pub fn add(&mut self, new: NewApplication) -> String {
        let id = self.next_id();
        self.applications.push(new.into_application(id.clone()));
        self.persist(APPLICATIONS_KEY, &self.applications);
        id
    }

    /// Merges the patch into the matching record. Unknown ids are a no-op,
    /// not an error; returns whether a record was updated.
    pub fn update(&mut self, id: &str, patch: &ApplicationPatch) -> bool {
        let Some(app) = self.applications.iter_mut().find(|app| app.id == id) else {
            return false;
        };
        patch.apply(app);
        self.persist(APPLICATIONS_KEY, &self.applications);
        true
    }

    /// Removes the record and its notes and timeline events. Unknown ids are
    /// a no-op; returns whether a record was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.applications.len();
        self.applications.retain(|app| app.id != id);
        if self.applications.len() == before {
            return false;
        }
        self.persist(APPLICATIONS_KEY, &self.applications);

        let notes_before = self.notes.len();
        self.notes.retain(|note| note.application_id != id);
        if self.notes.len() != notes_before {
            self.persist(NOTES_KEY, &self.notes);
        }

        let events_before = self.events.len();
        self.events.retain(|event| event.application_id != id);
        if self.events.len() != events_before {
            self.persist(TIMELINE_KEY, &self.events);
        }

        true
    }

    // --- Note operations ---

    pub fn notes_for(&self, application_id: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.application_id == application_id)
            .collect()
    }

    pub fn add_note(&mut self, application_id: &str, title: &str, content: &str) -> String {
        let id = self.next_id();
        self.notes.push(Note {
            id: id.clone(),
            application_id: application_id.to_string(),
            date: today(),
            title: title.to_string(),
            content: content.to_string(),
        });
        self.persist(NOTES_KEY, &self.notes);
        id
    }

    pub fn update_note(&mut self, id: &str, title: &str, content: &str) -> bool {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return false;
        };
        note.title = title.to_string();
        note.content = content.to_string();
        self.persist(NOTES_KEY, &self.notes);
        true
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return false;
        }
        self.persist(NOTES_KEY, &self.notes);
        true
    }

    // --- Timeline operations ---

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn events_for(&self, application_id: &str) -> Vec<&TimelineEvent> {
        self.events
            .iter()
            .filter(|event| event.application_id == application_id)
            .collect()
    }

    pub fn add_event(
        &mut self,
        application_id: &str,
        date: &str,
        event_type: EventType,
        notes: Option<String>,
    ) -> String {
        let id = self.next_id();
        self.events.push(TimelineEvent {
            id: id.clone(),
            application_id: application_id.to_string(),
            date: date.to_string(),
            event_type,
            notes,
        });
        self.persist(TIMELINE_KEY, &self.events);
        id
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        if self.events.len() == before {
            return false;
        }
        self.persist(TIMELINE_KEY, &self.events);
        true
    }

    // --- Profile operations ---

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.persist(PROFILE_KEY, &self.profile);
    }

    // --- Internals ---

    /// Millisecond-timestamp ids, bumped past any id already in use so a burst
    /// of adds within one millisecond still gets distinct ids.
    fn next_id(&mut self) -> String {
        let mut candidate = chrono::Utc::now()
            .timestamp_millis()
            .max(self.last_id + 1);
        while self.id_in_use(&candidate.to_string()) {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.applications.iter().any(|app| app.id == id)
            || self.notes.iter().any(|note| note.id == id)
            || self.events.iter().any(|event| event.id == id)
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Warning: failed to serialize {key}: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.save(key, &json) {
            eprintln!("Warning: failed to persist {key} (in-memory state kept): {e:#}");
        }
    }
}

fn load_or_default<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    match storage.load(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                eprintln!("Warning: ignoring corrupt {key} data: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            eprintln!("Warning: failed to read {key}: {e:#}");
            None
        }
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationStatus;
    use crate::storage::MemoryStorage;
    use anyhow::{Result, anyhow};
    use std::collections::HashSet;
    use std::rc::Rc;

    fn empty_store() -> (AppStore, Rc<MemoryStorage>) {
        // An empty array on the applications key suppresses seeding.
        let storage = Rc::new(MemoryStorage::with_entry(APPLICATIONS_KEY, "[]"));
        (AppStore::open(Box::new(storage.clone())), storage)
    }

    fn new_app(company: &str, position: &str) -> NewApplication {
        NewApplication {
            company: company.to_string(),
            position: position.to_string(),
            status: Some(ApplicationStatus::Applied),
            date_applied: Some("2025-01-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_seeds_and_persists_when_key_missing() {
        let storage = Rc::new(MemoryStorage::new());
        let store = AppStore::open(Box::new(storage.clone()));
        assert_eq!(store.applications().len(), 6);

        let saved = storage.load(APPLICATIONS_KEY).unwrap().unwrap();
        let reloaded: Vec<Application> = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded, store.applications());
    }

    #[test]
    fn test_open_falls_back_to_seed_on_corrupt_json() {
        let storage = Rc::new(MemoryStorage::with_entry(APPLICATIONS_KEY, "{not json"));
        let store = AppStore::open(Box::new(storage.clone()));
        assert_eq!(store.applications().len(), 6);
        // The corrupt document is replaced by the persisted seed set.
        let saved = storage.load(APPLICATIONS_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<Application>>(&saved).is_ok());
    }

    #[test]
    fn test_add_generates_unique_ids() {
        let (mut store, _storage) = empty_store();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let id = store.add(new_app(&format!("Company {i}"), "Engineer"));
            assert!(ids.insert(id), "duplicate id issued");
        }
        assert_eq!(store.applications().len(), 50);
    }

    #[test]
    fn test_add_then_get_returns_supplied_fields() {
        let (mut store, _storage) = empty_store();
        let id = store.add(NewApplication {
            company: "Acme".to_string(),
            position: "Eng".to_string(),
            status: Some(ApplicationStatus::Applied),
            date_applied: Some("2025-01-01".to_string()),
            location: Some("Remote".to_string()),
            ..Default::default()
        });

        let app = store.get(&id).unwrap();
        assert_eq!(app.id, id);
        assert_eq!(app.company, "Acme");
        assert_eq!(app.position, "Eng");
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.date_applied, "2025-01-01");
        assert_eq!(app.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_add_persists_document_that_reloads_with_new_record() {
        let (mut store, storage) = empty_store();
        let before = store.applications().len();
        let id = store.add(new_app("Acme", "Eng"));
        assert_eq!(store.applications().len(), before + 1);

        let reopened = AppStore::open(Box::new(storage));
        let app = reopened.get(&id).expect("record survives reload");
        assert_eq!(app.company, "Acme");
    }

    #[test]
    fn test_update_merges_and_leaves_other_fields() {
        let (mut store, _storage) = empty_store();
        let id = store.add(new_app("Acme", "Eng"));

        let updated = store.update(
            &id,
            &ApplicationPatch {
                status: Some(ApplicationStatus::Offer),
                ..Default::default()
            },
        );
        assert!(updated);

        let app = store.get(&id).unwrap();
        assert_eq!(app.status, ApplicationStatus::Offer);
        assert_eq!(app.company, "Acme");
        assert_eq!(app.position, "Eng");
        assert_eq!(app.date_applied, "2025-01-01");
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let (mut store, _storage) = empty_store();
        store.add(new_app("Acme", "Eng"));
        let snapshot = store.applications().to_vec();

        let updated = store.update(
            "no-such-id",
            &ApplicationPatch {
                company: Some("Ghost".to_string()),
                ..Default::default()
            },
        );
        assert!(!updated);
        assert_eq!(store.applications(), snapshot.as_slice());
    }

    #[test]
    fn test_delete_removes_record_and_sub_records() {
        let (mut store, _storage) = empty_store();
        let id = store.add(new_app("Acme", "Eng"));
        let other = store.add(new_app("Globex", "Dev"));
        store.add_note(&id, "Intro call", "Spoke with recruiter");
        store.add_event(&id, "2025-01-05", EventType::PhoneScreen, None);
        store.add_note(&other, "Keep", "Unrelated note");

        assert!(store.delete(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.applications().iter().any(|a| a.id == id));
        assert!(store.notes_for(&id).is_empty());
        assert!(store.events_for(&id).is_empty());
        assert_eq!(store.notes_for(&other).len(), 1);

        // Deleting again is a tolerated no-op.
        assert!(!store.delete(&id));
    }

    #[test]
    fn test_collection_roundtrips_through_serialized_form() {
        let (mut store, storage) = empty_store();
        store.add(new_app("Acme", "Eng"));
        store.add(NewApplication {
            company: "Globex".to_string(),
            position: "Dev".to_string(),
            status: Some(ApplicationStatus::PhoneScreen),
            date_applied: Some("2025-01-02".to_string()),
            salary: Some("$100k".to_string()),
            contact_email: Some("hr@globex.com".to_string()),
            ..Default::default()
        });

        let raw = storage.load(APPLICATIONS_KEY).unwrap().unwrap();
        let reloaded: Vec<Application> = serde_json::from_str(&raw).unwrap();
        assert_eq!(reloaded, store.applications());
    }

    #[test]
    fn test_notes_and_events_survive_reload() {
        let (mut store, storage) = empty_store();
        let id = store.add(new_app("Acme", "Eng"));
        store.add_note(&id, "Research", "Read the engineering blog");
        store.add_event(&id, "2025-01-10", EventType::TechnicalInterview, Some("1h pairing".to_string()));

        let reopened = AppStore::open(Box::new(storage));
        assert_eq!(reopened.notes_for(&id).len(), 1);
        let events = reopened.events_for(&id);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::TechnicalInterview);
    }

    #[test]
    fn test_note_update_and_delete() {
        let (mut store, _storage) = empty_store();
        let id = store.add(new_app("Acme", "Eng"));
        let note_id = store.add_note(&id, "Draft", "v1");

        assert!(store.update_note(&note_id, "Final", "v2"));
        let notes = store.notes_for(&id);
        assert_eq!(notes[0].title, "Final");
        assert_eq!(notes[0].content, "v2");

        assert!(store.delete_note(&note_id));
        assert!(store.notes_for(&id).is_empty());
        assert!(!store.delete_note(&note_id));
        assert!(!store.update_note(&note_id, "x", "y"));
    }

    #[test]
    fn test_profile_roundtrips() {
        let (mut store, storage) = empty_store();
        store.set_profile(Profile {
            name: Some("John Doe".to_string()),
            email: Some("john.doe@example.com".to_string()),
            ..Default::default()
        });

        let reopened = AppStore::open(Box::new(storage));
        assert_eq!(reopened.profile().name.as_deref(), Some("John Doe"));
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some("[]".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    #[test]
    fn test_write_failure_keeps_in_memory_mutation() {
        let mut store = AppStore::open(Box::new(FailingStorage));
        let id = store.add(new_app("Acme", "Eng"));
        assert!(store.get(&id).is_some());
        assert_eq!(store.applications().len(), 1);
    }
}
