//! In-memory `ResumeStore` that records every write, for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;
use crate::store::{ResumeStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Create { user_id: Uuid, document: ResumeDocument },
    Update { id: Uuid, user_id: Uuid, document: ResumeDocument },
}

impl Write {
    pub fn document(&self) -> &ResumeDocument {
        match self {
            Write::Create { document, .. } | Write::Update { document, .. } => document,
        }
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            Write::Create { user_id, .. } | Write::Update { user_id, .. } => *user_id,
        }
    }
}

#[derive(Default)]
pub struct MemoryResumeStore {
    records: Mutex<HashMap<Uuid, (Uuid, ResumeDocument)>>,
    writes: Mutex<Vec<Write>>,
    latency: Option<Duration>,
    load_latency: Option<Duration>,
    fail_writes: Mutex<bool>,
    fail_loads: bool,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every create/update sleeps this long before completing.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Every load sleeps this long before answering.
    pub fn with_load_latency(latency: Duration) -> Self {
        Self {
            load_latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn failing_loads() -> Self {
        Self {
            fail_loads: true,
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn seed(&self, user_id: Uuid, mut document: ResumeDocument) -> Uuid {
        let id = document.id.unwrap_or_else(Uuid::new_v4);
        document.id = Some(id);
        self.records
            .lock()
            .unwrap()
            .insert(id, (user_id, document));
        id
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn creates(&self) -> usize {
        self.writes()
            .iter()
            .filter(|w| matches!(w, Write::Create { .. }))
            .count()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn load_by_user(&self, user_id: Uuid) -> Result<Option<ResumeDocument>, StoreError> {
        if let Some(latency) = self.load_latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_loads {
            return Err(StoreError::Unavailable("backend unreachable".into()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|(owner, _)| *owner == user_id)
            .map(|(_, doc)| doc.clone()))
    }

    async fn create(&self, user_id: Uuid, document: &ResumeDocument) -> Result<Uuid, StoreError> {
        self.writes.lock().unwrap().push(Write::Create {
            user_id,
            document: document.clone(),
        });
        self.simulate_latency().await;
        self.check_writable()?;

        let id = Uuid::new_v4();
        let mut stored = document.clone();
        stored.id = Some(id);
        self.records.lock().unwrap().insert(id, (user_id, stored));
        Ok(id)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        document: &ResumeDocument,
    ) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(Write::Update {
            id,
            user_id,
            document: document.clone(),
        });
        self.simulate_latency().await;
        self.check_writable()?;

        let mut records = self.records.lock().unwrap();
        match records.get_mut(&id) {
            Some((owner, stored)) if *owner == user_id => {
                *stored = document.clone();
                stored.id = Some(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound(id)),
        }
    }
}
