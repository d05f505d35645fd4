//! Per-user editing sessions.
//!
//! A `ResumeSession` is the scope that owns one user's live document: the
//! autosave coordinator, the export slot and the notice queue. It is built on
//! sign-in and torn down on sign-out, never shared across users.

pub mod handlers;
pub mod notices;

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{error, info};
use uuid::Uuid;

use crate::autosave::{AutosaveCoordinator, AutosaveStatus, SaveOutcome};
use crate::editor::{EditCommand, EditError, EditOutcome};
use crate::errors::AppError;
use crate::export::{export_filename, ExportArtifact, ExportOptions, Exporter};
use crate::models::resume::ResumeDocument;
use crate::render::render_document;
use crate::store::ResumeStore;

use notices::Notices;

pub struct ResumeSession {
    user_id: Uuid,
    coordinator: AutosaveCoordinator,
    notices: Notices,
    export_slot: Semaphore,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub user_id: Uuid,
    pub document: ResumeDocument,
    pub autosave: AutosaveStatus,
    pub exporting: bool,
}

impl ResumeSession {
    /// Loads the user's resume. A missing record starts from the default
    /// document; a failed load is reported and also starts from the default.
    pub async fn open(user_id: Uuid, store: Arc<dyn ResumeStore>) -> Self {
        let notices = Notices::default();
        let document = match store.load_by_user(user_id).await {
            Ok(Some(document)) => {
                info!("Loaded resume {:?} for user {user_id}", document.id);
                document
            }
            Ok(None) => {
                info!("No saved resume for user {user_id}; starting fresh");
                ResumeDocument::default()
            }
            Err(e) => {
                error!("Error loading resume for user {user_id}: {e}");
                notices.error("Error loading resume", e.to_string());
                ResumeDocument::default()
            }
        };

        Self {
            user_id,
            coordinator: AutosaveCoordinator::new(user_id, store, notices.clone(), document),
            notices,
            export_slot: Semaphore::new(1),
        }
    }

    pub fn document(&self) -> ResumeDocument {
        self.coordinator.document()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.user_id,
            document: self.coordinator.document(),
            autosave: self.coordinator.status(),
            exporting: self.is_exporting(),
        }
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn replace_document(&self, document: ResumeDocument) -> Result<(), AppError> {
        Ok(self.coordinator.on_data_changed(document)?)
    }

    pub fn edit(&self, command: EditCommand) -> Result<EditOutcome, AppError> {
        let outcome: Result<EditOutcome, EditError> =
            self.coordinator.apply(|doc| command.apply(doc))?;
        Ok(outcome?)
    }

    /// Stores an already validated `data:` URL as the profile picture.
    pub fn set_profile_picture(&self, picture: String) -> Result<(), AppError> {
        let applied: Result<(), Infallible> = self.coordinator.apply(|doc| {
            doc.personal_info.profile_picture = Some(picture);
            Ok(())
        })?;
        match applied {
            Ok(()) => Ok(()),
            Err(never) => match never {},
        }
    }

    pub async fn save(&self) -> Result<SaveOutcome, AppError> {
        Ok(self.coordinator.save_now().await?)
    }

    /// Renders the live document and hands it to `exporter`. Only one export
    /// runs per session; a concurrent request is refused.
    pub async fn export(&self, exporter: &dyn Exporter) -> Result<ExportArtifact, AppError> {
        let _permit = self.begin_export()?;
        let document = self.coordinator.document();
        let rendered = render_document(&document, document.template_id);
        let filename = export_filename(&document.personal_info);

        match exporter
            .export(self.user_id, &rendered, &filename, &ExportOptions::default())
            .await
        {
            Ok(artifact) => {
                info!("Exported {} for user {}", artifact.filename, self.user_id);
                self.notices.info(
                    "PDF Downloaded",
                    "Your resume has been downloaded successfully.",
                );
                Ok(artifact)
            }
            Err(e) => {
                error!("Error generating PDF for user {}: {e}", self.user_id);
                self.notices.error(
                    "Download Failed",
                    "There was an error generating your PDF. Please try again.",
                );
                Err(AppError::Export(e.to_string()))
            }
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.export_slot.available_permits() == 0
    }

    fn begin_export(&self) -> Result<SemaphorePermit<'_>, AppError> {
        self.export_slot
            .try_acquire()
            .map_err(|_| AppError::Conflict("An export is already in progress".to_string()))
    }

    fn close(&self) {
        self.coordinator.shutdown();
    }
}

/// Live sessions keyed by user. A user without an entry is signed out: no
/// load, no persist.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<Uuid, Arc<ResumeSession>>,
    /// Sign-ins whose load is still running, keyed by user. A sign-out or a
    /// newer sign-in replaces or removes the ticket, which voids the load.
    loading: HashMap<Uuid, u64>,
    next_ticket: u64,
}

impl SessionRegistry {
    /// Opens a fresh session, closing any earlier one for the same user first.
    /// Answers `Unauthorized` when the user signed out (or signed in again)
    /// while the resume was loading.
    pub async fn sign_in(
        &self,
        user_id: Uuid,
        store: Arc<dyn ResumeStore>,
    ) -> Result<Arc<ResumeSession>, AppError> {
        let (ticket, previous) = {
            let mut registry = self.lock();
            registry.next_ticket += 1;
            let ticket = registry.next_ticket;
            registry.loading.insert(user_id, ticket);
            (ticket, registry.sessions.remove(&user_id))
        };
        if let Some(previous) = previous {
            previous.close();
        }

        let session = Arc::new(ResumeSession::open(user_id, store).await);

        let mut registry = self.lock();
        if registry.loading.get(&user_id) != Some(&ticket) {
            drop(registry);
            session.close();
            info!("Sign-in for user {user_id} superseded while loading");
            return Err(AppError::Unauthorized);
        }
        registry.loading.remove(&user_id);
        registry.sessions.insert(user_id, Arc::clone(&session));
        drop(registry);

        info!("User {user_id} signed in");
        Ok(session)
    }

    /// Closes the user's session and voids any sign-in still loading. The
    /// pending autosave timer is cancelled before this returns. Returns false
    /// when there was nothing to sign out.
    pub fn sign_out(&self, user_id: Uuid) -> bool {
        let (removed, was_loading) = {
            let mut registry = self.lock();
            let was_loading = registry.loading.remove(&user_id).is_some();
            (registry.sessions.remove(&user_id), was_loading)
        };
        if let Some(session) = &removed {
            session.close();
        }
        let signed_out = removed.is_some() || was_loading;
        if signed_out {
            info!("User {user_id} signed out");
        }
        signed_out
    }

    pub fn get(&self, user_id: Uuid) -> Result<Arc<ResumeSession>, AppError> {
        self.lock()
            .sessions
            .get(&user_id)
            .cloned()
            .ok_or(AppError::Unauthorized)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::export::ExportError;
    use crate::models::resume::PersonalInfo;
    use crate::render::RenderedResume;
    use crate::session::notices::NoticeLevel;
    use crate::store::memory::MemoryResumeStore;

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_hydrates_saved_resume() {
        let store = Arc::new(MemoryResumeStore::new());
        let user = Uuid::new_v4();
        let id = store.seed(
            user,
            ResumeDocument {
                title: "Stored".into(),
                ..ResumeDocument::default()
            },
        );

        let registry = SessionRegistry::default();
        let session = registry.sign_in(user, store.clone()).await.unwrap();
        assert_eq!(session.document().id, Some(id));
        assert_eq!(session.document().title, "Stored");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_falls_back_to_default() {
        let store = Arc::new(MemoryResumeStore::failing_loads());
        let registry = SessionRegistry::default();
        let session = registry.sign_in(Uuid::new_v4(), store).await.unwrap();

        assert_eq!(session.document(), ResumeDocument::default());
        let notices = session.notices().drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].title, "Error loading resume");
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_out_user_is_unauthorized() {
        let registry = SessionRegistry::default();
        assert!(matches!(
            registry.get(Uuid::new_v4()),
            Err(AppError::Unauthorized)
        ));
        assert!(!registry.sign_out(Uuid::new_v4()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_drops_pending_edit_before_next_user() {
        let store = Arc::new(MemoryResumeStore::new());
        let registry = SessionRegistry::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let session = registry.sign_in(alice, store.clone()).await.unwrap();
        session
            .edit(EditCommand::SetTitle {
                title: "Alice's unsaved edit".into(),
            })
            .unwrap();
        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(registry.sign_out(alice));

        let bob_session = registry.sign_in(bob, store.clone()).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;

        assert!(store.writes().is_empty(), "stale timer must not write");
        assert_eq!(bob_session.document(), ResumeDocument::default());
        assert!(matches!(
            session.edit(EditCommand::SetTitle { title: "x".into() }),
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_writes_are_bound_to_session_user() {
        let store = Arc::new(MemoryResumeStore::new());
        let registry = SessionRegistry::default();
        let carol = Uuid::new_v4();

        let session = registry.sign_in(carol, store.clone()).await.unwrap();
        session.save().await.unwrap();
        assert!(store.writes().iter().all(|w| w.user_id() == carol));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_again_replaces_session() {
        let store = Arc::new(MemoryResumeStore::new());
        let registry = SessionRegistry::default();
        let user = Uuid::new_v4();

        let first = registry.sign_in(user, store.clone()).await.unwrap();
        first
            .edit(EditCommand::SetTitle { title: "pending".into() })
            .unwrap();
        let second = registry.sign_in(user, store.clone()).await.unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;
        assert!(store.writes().is_empty());
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&registry.get(user).unwrap(), &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_out_during_load_keeps_user_signed_out() {
        let store = Arc::new(MemoryResumeStore::with_load_latency(Duration::from_secs(1)));
        let registry = SessionRegistry::default();
        let user = Uuid::new_v4();

        let signing_in = tokio::spawn({
            let registry = registry.clone();
            let store = store.clone();
            async move { registry.sign_in(user, store).await }
        });
        settle().await;

        assert!(registry.sign_out(user), "a loading sign-in counts as signed in");
        tokio::time::advance(Duration::from_secs(2)).await;

        let result = signing_in.await.unwrap();
        assert!(matches!(result, Err(AppError::Unauthorized)));
        assert!(matches!(registry.get(user), Err(AppError::Unauthorized)));
        assert!(store.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_of_overlapping_sign_ins_wins() {
        let store = Arc::new(MemoryResumeStore::with_load_latency(Duration::from_secs(1)));
        let registry = SessionRegistry::default();
        let user = Uuid::new_v4();

        let first = tokio::spawn({
            let registry = registry.clone();
            let store = store.clone();
            async move { registry.sign_in(user, store).await }
        });
        settle().await;
        let second = tokio::spawn({
            let registry = registry.clone();
            let store = store.clone();
            async move { registry.sign_in(user, store).await }
        });
        settle().await;
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(matches!(first.await.unwrap(), Err(AppError::Unauthorized)));
        let second = second.await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&registry.get(user).unwrap(), &second));
    }

    struct FakeExporter {
        fail: bool,
        delay: Duration,
    }

    #[async_trait]
    impl Exporter for FakeExporter {
        async fn export(
            &self,
            _user_id: Uuid,
            target: &RenderedResume,
            filename: &str,
            _options: &ExportOptions,
        ) -> Result<ExportArtifact, ExportError> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ExportError::Rasterize("renderer crashed".into()));
            }
            Ok(ExportArtifact {
                filename: filename.to_string(),
                content: bytes::Bytes::from(target.html.clone()),
                archive_key: None,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_uses_name_derived_filename() {
        let store = Arc::new(MemoryResumeStore::new());
        let user = Uuid::new_v4();
        store.seed(
            user,
            ResumeDocument {
                personal_info: PersonalInfo {
                    full_name: "Ada Lovelace".into(),
                    ..PersonalInfo::default()
                },
                ..ResumeDocument::default()
            },
        );
        let session = ResumeSession::open(user, store).await;
        let exporter = FakeExporter {
            fail: false,
            delay: Duration::ZERO,
        };

        let artifact = session.export(&exporter).await.unwrap();
        assert_eq!(artifact.filename, "Ada Lovelace.pdf");
        assert!(!session.is_exporting());
        assert_eq!(session.notices().drain()[0].title, "PDF Downloaded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_export_while_first_outstanding_is_refused() {
        let store = Arc::new(MemoryResumeStore::new());
        let session = ResumeSession::open(Uuid::new_v4(), store).await;
        let exporter = FakeExporter {
            fail: false,
            delay: Duration::from_secs(3),
        };

        let first = session.export(&exporter);
        tokio::pin!(first);
        tokio::select! {
            biased;
            _ = &mut first => panic!("export should still be running"),
            _ = settle() => {}
        }
        assert!(session.is_exporting());
        assert!(matches!(
            session.export(&exporter).await,
            Err(AppError::Conflict(_))
        ));

        first.await.unwrap();
        assert!(!session.is_exporting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_export_releases_slot() {
        let store = Arc::new(MemoryResumeStore::new());
        let session = ResumeSession::open(Uuid::new_v4(), store).await;
        let exporter = FakeExporter {
            fail: true,
            delay: Duration::ZERO,
        };

        assert!(matches!(
            session.export(&exporter).await,
            Err(AppError::Export(_))
        ));
        assert!(!session.is_exporting());
        let notices = session.notices().drain();
        assert_eq!(notices[0].title, "Download Failed");
    }
}
