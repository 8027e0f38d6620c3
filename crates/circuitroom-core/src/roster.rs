//! Participant roster and the selection for the next session.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::{Outbox, Store};

/// Store collection holding person documents.
pub const PEOPLE_COLLECTION: &str = "people";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// People known to the owner plus the current selection.
///
/// Like the exercise library, mutations are applied in memory and written
/// through the outbox.
#[derive(Debug)]
pub struct ParticipantRoster {
    owner_id: String,
    people: Vec<Person>,
    selected: HashSet<String>,
    outbox: Outbox,
}

impl ParticipantRoster {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            people: Vec::new(),
            selected: HashSet::new(),
            outbox: Outbox::default(),
        }
    }

    /// Load the owner's people, oldest first. The selection starts empty.
    pub fn load(owner_id: impl Into<String>, store: &dyn Store) -> Result<Self> {
        let mut roster = Self::new(owner_id);
        let docs = store.fetch_all(&roster.owner_id, PEOPLE_COLLECTION, Some("createdAt"))?;
        roster.people = docs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Person>, _>>()?;
        Ok(roster)
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn add(&mut self, display_name: &str, nickname: Option<&str>) -> Result<Person> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "displayName".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        let person = Person {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.to_string(),
            nickname: nickname
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };
        self.outbox.enqueue_save(
            &self.owner_id,
            PEOPLE_COLLECTION,
            &person.id,
            serde_json::to_value(&person)?,
        );
        self.people.push(person.clone());
        Ok(person)
    }

    /// Remove a person and drop them from the selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.people.len();
        self.people.retain(|p| p.id != id);
        self.selected.remove(id);
        let removed = self.people.len() != before;
        if removed {
            self.outbox.enqueue_remove(&self.owner_id, PEOPLE_COLLECTION, id);
        }
        removed
    }

    fn ensure_known(&self, id: &str) -> Result<(), ValidationError> {
        if self.get(id).is_none() {
            return Err(ValidationError::NotFound {
                kind: "person".into(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Flip selection of a known person. Returns the new state.
    pub fn toggle_selected(&mut self, id: &str) -> Result<bool, ValidationError> {
        self.ensure_known(id)?;
        if self.selected.remove(id) {
            Ok(false)
        } else {
            self.selected.insert(id.to_string());
            Ok(true)
        }
    }

    /// Select a known person. Selecting twice keeps them selected.
    pub fn select(&mut self, id: &str) -> Result<(), ValidationError> {
        self.ensure_known(id)?;
        self.selected.insert(id.to_string());
        Ok(())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn select_all(&mut self) {
        self.selected = self.people.iter().map(|p| p.id.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Selected ids and display names in roster order.
    pub fn selected(&self) -> (Vec<String>, Vec<String>) {
        self.people
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .map(|p| (p.id.clone(), p.display_name.clone()))
            .unzip()
    }

    pub fn flush(&mut self, store: &dyn Store) -> usize {
        self.outbox.flush(store)
    }

    pub fn pending_writes(&self) -> usize {
        self.outbox.len()
    }
}
