//! Local document mutations.
//!
//! All of these require an authenticated store, touch only the in-memory
//! document and never talk to the network. Nothing is persisted until
//! [`AdminStore::save`] runs.

use showreel_core::{AboutData, Entry, EntryDraft, EntryId, GlobalSettings};
use tracing::{debug, instrument, warn};

use super::{AdminStore, Confirmation};
use crate::error::AdminError;

impl AdminStore {
    /// Add a new entry at the front of the list.
    ///
    /// The entry gets the next free id. A featured draft becomes the only
    /// featured entry.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] while anonymous, or
    /// [`AdminError::InvalidDocument`] if no entry id is left.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_entry(&self, draft: EntryDraft) -> Result<Entry, AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        let entry = state.document.add_entry(draft)?;
        debug!(id = %entry.id, featured = entry.is_featured, "Entry added");
        Ok(entry)
    }

    /// Replace the entry with the same id, in place.
    ///
    /// # Errors
    ///
    /// [`AdminError::NotAuthenticated`] while anonymous,
    /// [`AdminError::NotFound`] when no entry has that id.
    #[instrument(skip(self, entry), fields(id = %entry.id))]
    pub async fn update_entry(&self, entry: Entry) -> Result<(), AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        state.document.replace_entry(entry)?;
        debug!("Entry updated");
        Ok(())
    }

    /// Remove an entry once the operator has confirmed it.
    ///
    /// # Errors
    ///
    /// [`AdminError::UserCancelled`] when `confirmation` is declined (nothing
    /// changes), [`AdminError::NotAuthenticated`] while anonymous,
    /// [`AdminError::NotFound`] when no entry has that id.
    #[instrument(skip(self))]
    pub async fn remove_entry(
        &self,
        id: EntryId,
        confirmation: Confirmation,
    ) -> Result<Entry, AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        if confirmation == Confirmation::Declined {
            debug!("Removal declined");
            return Err(AdminError::UserCancelled);
        }

        let removed = state.document.remove_entry(id)?;
        debug!(title = %removed.title, "Entry removed");
        Ok(removed)
    }

    /// Replace the entry order with `entries`, as given.
    ///
    /// The caller is expected to pass a permutation of the current entries.
    /// Anything else is still applied, with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] while anonymous.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub async fn reorder_entries(&self, entries: Vec<Entry>) -> Result<(), AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        if !state.document.reorder(entries) {
            warn!("Reorder was not a permutation of the current entries; applied as given");
        }
        Ok(())
    }

    /// Replace the about section.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] while anonymous.
    pub async fn update_about(&self, about: AboutData) -> Result<(), AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        state.document.about = Some(about);
        Ok(())
    }

    /// Replace the global settings.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotAuthenticated`] while anonymous.
    pub async fn update_settings(&self, settings: GlobalSettings) -> Result<(), AdminError> {
        let mut state = self.inner.state.write().await;
        state.require_auth()?;

        state.document.settings = Some(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use showreel_core::{AccentMode, Document};

    use super::super::fakes::{FakeDocuments, FakeVideos};
    use super::*;
    use crate::credential::Credential;
    use crate::session::MemorySessionHolder;

    async fn logged_in(ids: &[i64]) -> AdminStore {
        let store = AdminStore::new(
            Arc::new(FakeDocuments::owned_by(42).with_entries(ids)),
            Arc::new(MemorySessionHolder::new()),
            Arc::new(FakeVideos::default()),
        );
        store.login(Credential::new("good")).await.expect("login");
        store
    }

    fn ids(entries: &[Entry]) -> Vec<i64> {
        entries.iter().map(|e| e.id.as_i64()).collect()
    }

    #[tokio::test]
    async fn test_mutations_require_authentication() {
        let store = AdminStore::new(
            Arc::new(FakeDocuments::owned_by(42)),
            Arc::new(MemorySessionHolder::new()),
            Arc::new(FakeVideos::default()),
        );

        assert!(matches!(
            store.add_entry(EntryDraft::titled("X")).await,
            Err(AdminError::NotAuthenticated)
        ));
        assert!(matches!(
            store.reorder_entries(Vec::new()).await,
            Err(AdminError::NotAuthenticated)
        ));
        assert!(matches!(
            store.update_about(AboutData::default()).await,
            Err(AdminError::NotAuthenticated)
        ));
        assert_eq!(store.document().await, Document::default());
    }

    #[tokio::test]
    async fn test_add_entry_prepends_next_id() {
        let store = logged_in(&[3]).await;

        let entry = store
            .add_entry(EntryDraft::titled("X"))
            .await
            .expect("add");

        assert_eq!(entry.id, EntryId::new(4));
        assert_eq!(ids(&store.entries().await), vec![4, 3]);
    }

    #[tokio::test]
    async fn test_add_entry_with_no_id_left_is_rejected() {
        let store = logged_in(&[i64::MAX]).await;

        let result = store.add_entry(EntryDraft::titled("X")).await;

        assert!(matches!(result, Err(AdminError::InvalidDocument(_))));
        assert_eq!(ids(&store.entries().await), vec![i64::MAX]);
    }

    #[tokio::test]
    async fn test_add_entry_ids_unique_and_increasing() {
        let store = logged_in(&[]).await;

        let mut assigned = Vec::new();
        for n in 0..5 {
            let entry = store
                .add_entry(EntryDraft::titled(format!("E{n}")))
                .await
                .expect("add");
            assigned.push(entry.id.as_i64());
        }

        assert_eq!(assigned, vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(&store.entries().await), vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_entry_sets_single_hero() {
        let store = logged_in(&[1, 2]).await;
        let mut first = store.entry(EntryId::new(1)).await.expect("entry 1");
        first.is_featured = true;

        store.update_entry(first).await.expect("update");

        let entries = store.entries().await;
        assert_eq!(ids(&entries), vec![1, 2]);
        assert!(store.entry(EntryId::new(1)).await.expect("entry 1").is_featured);
        assert!(!store.entry(EntryId::new(2)).await.expect("entry 2").is_featured);
        assert_eq!(store.hero().await.map(|e| e.id), Some(EntryId::new(1)));
    }

    #[tokio::test]
    async fn test_featured_add_moves_hero() {
        let store = logged_in(&[1, 2]).await;
        let mut second = store.entry(EntryId::new(2)).await.expect("entry 2");
        second.is_featured = true;
        store.update_entry(second).await.expect("update");

        let draft = EntryDraft {
            is_featured: true,
            ..EntryDraft::titled("New hero")
        };
        let added = store.add_entry(draft).await.expect("add");

        let document = store.document().await;
        assert_eq!(document.featured_count(), 1);
        assert_eq!(document.hero().map(|e| e.id), Some(added.id));
    }

    #[tokio::test]
    async fn test_update_unknown_entry() {
        let store = logged_in(&[1]).await;
        let ghost = EntryDraft::titled("Ghost").into_entry(EntryId::new(99));

        let result = store.update_entry(ghost).await;

        assert!(matches!(result, Err(AdminError::NotFound(_))));
        assert_eq!(ids(&store.entries().await), vec![1]);
    }

    #[tokio::test]
    async fn test_remove_entry_declined_changes_nothing() {
        let store = logged_in(&[1, 2, 3]).await;
        let before = store.document().await;

        let result = store
            .remove_entry(EntryId::new(2), Confirmation::Declined)
            .await;

        assert!(matches!(result, Err(AdminError::UserCancelled)));
        assert_eq!(store.document().await, before);
    }

    #[tokio::test]
    async fn test_remove_entry_confirmed_keeps_order() {
        let store = logged_in(&[1, 2, 3]).await;

        let removed = store
            .remove_entry(EntryId::new(2), Confirmation::Confirmed)
            .await
            .expect("remove");

        assert_eq!(removed.id, EntryId::new(2));
        assert_eq!(ids(&store.entries().await), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_reorder_permutation() {
        let store = logged_in(&[1, 2, 3]).await;
        let mut order = store.entries().await;
        order.reverse();

        store.reorder_entries(order).await.expect("reorder");

        let entries = store.entries().await;
        assert_eq!(ids(&entries), vec![3, 2, 1]);
        let set: HashSet<i64> = ids(&entries).into_iter().collect();
        assert_eq!(set, HashSet::from([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_reorder_non_permutation_applied_as_given() {
        let store = logged_in(&[1, 2, 3]).await;
        let mut order = store.entries().await;
        order.truncate(1);

        store.reorder_entries(order).await.expect("reorder");

        assert_eq!(ids(&store.entries().await), vec![1]);
    }

    #[tokio::test]
    async fn test_update_about_and_settings_replace_wholesale() {
        let store = logged_in(&[1]).await;

        store
            .update_about(AboutData {
                title: "Director".to_string(),
                skills: vec!["Editing".to_string()],
                ..AboutData::default()
            })
            .await
            .expect("about");
        store
            .update_about(AboutData {
                bio: "Second".to_string(),
                ..AboutData::default()
            })
            .await
            .expect("about");
        store
            .update_settings(GlobalSettings {
                accent_mode: AccentMode::Hero,
                custom_color: "#000000".to_string(),
            })
            .await
            .expect("settings");

        let document = store.document().await;
        let about = document.about.expect("about set");
        assert_eq!(about.bio, "Second");
        assert!(about.title.is_empty());
        assert!(about.skills.is_empty());
        assert_eq!(
            document.settings.map(|s| s.accent_mode),
            Some(AccentMode::Hero)
        );
    }
}
