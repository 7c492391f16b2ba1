use color_eyre::Result;
use serde::{de::DeserializeOwned, Serialize};
use ulid::Ulid;

use crate::db::Db;
use crate::models::{Bundle, Category, Metadata, Policy, Question};

pub const POLICY_KEY: &str = "njra_policies";
pub const BUNDLE_KEY: &str = "njra_bundles";
pub const METADATA_KEY: &str = "njra_metadata";

/// A stored collection exists but cannot be decoded. Nothing is overwritten;
/// the record has to be repaired or removed by hand.
#[derive(Debug, thiserror::Error)]
#[error("stored {key} is not valid JSON")]
pub struct CorruptData {
    pub key: String,
    #[source]
    source: serde_json::Error,
}

/// Display format of the last-updated marker, e.g. `3/14/2025, 9:05:12 AM`.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// ---------------------------------------------------------------------------
// KeyValueStore trait (DIP: the store defines the persistence it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Seed data, returned until a collection is first written
// ---------------------------------------------------------------------------

pub fn seed_policies() -> Vec<Policy> {
    vec![Policy {
        id: "demo-001".to_string(),
        code: Some("RT-01".to_string()),
        title: "Airway Management".to_string(),
        category: Some(Category::ClinicalCare),
        content: "<h1>Airway Management</h1><p>Ensure patency using head tilt/chin lift or jaw thrust as indicated.</p><ul><li>Assess respiratory effort.</li><li>Prepare suction.</li></ul>".to_string(),
        questions: vec![
            Question {
                text: "Primary maneuver to open airway without spinal concerns?".to_string(),
                options: vec!["Jaw thrust".to_string(), "Head tilt/chin lift".to_string()],
                correct_index: 1,
            },
            Question {
                text: "What equipment must be ready?".to_string(),
                options: vec!["Suction".to_string(), "Nebulizer".to_string()],
                correct_index: 0,
            },
        ],
    }]
}

pub fn seed_bundles() -> Vec<Bundle> {
    vec![Bundle {
        id: "bundle-1".to_string(),
        title: "Orientation Essentials".to_string(),
        description: "Core airway and infection control policies for onboarding.".to_string(),
        policy_ids: vec!["demo-001".to_string()],
    }]
}

/// Result of an upsert: the id the record ended up with plus the whole collection.
#[derive(Debug, Clone)]
pub struct Saved<T> {
    pub id: String,
    pub items: Vec<T>,
}

trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Identified for Policy {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Identified for Bundle {
    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Replace in place when the id is known, otherwise append under a fresh ULID.
fn upsert<T: Identified>(items: &mut Vec<T>, mut item: T) -> String {
    if let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        let id = item.id().to_string();
        *slot = item;
        return id;
    }

    let id = Ulid::new().to_string();
    item.set_id(id.clone());
    items.push(item);
    id
}

// ---------------------------------------------------------------------------
// PolicyStore
// ---------------------------------------------------------------------------

/// CRUD over the policy and bundle collections plus the last-updated marker.
///
/// Every operation is a read-modify-write of one JSON document. Nothing guards
/// concurrent writers: two overlapping mutations of the same collection can
/// overwrite each other, and mutations never cascade across collections.
pub struct PolicyStore<S: KeyValueStore = Db> {
    kv: S,
}

impl<S: KeyValueStore + Clone> Clone for PolicyStore<S> {
    fn clone(&self) -> Self {
        Self {
            kv: self.kv.clone(),
        }
    }
}

impl<S: KeyValueStore> PolicyStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str, fallback: impl FnOnce() -> T) -> Result<T> {
        match self.kv.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                CorruptData {
                    key: key.to_string(),
                    source,
                }
                .into()
            }),
            None => Ok(fallback()),
        }
    }

    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await
    }

    pub async fn list_policies(&self) -> Result<Vec<Policy>> {
        self.load(POLICY_KEY, seed_policies).await
    }

    pub async fn list_bundles(&self) -> Result<Vec<Bundle>> {
        self.load(BUNDLE_KEY, seed_bundles).await
    }

    pub async fn metadata(&self) -> Result<Metadata> {
        self.load(METADATA_KEY, Metadata::default).await
    }

    pub async fn find_policy(&self, id: &str) -> Result<Option<Policy>> {
        Ok(self.list_policies().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn find_bundle(&self, id: &str) -> Result<Option<Bundle>> {
        Ok(self.list_bundles().await?.into_iter().find(|b| b.id == id))
    }

    pub async fn save_policy(&self, policy: Policy) -> Result<Saved<Policy>> {
        let mut policies = self.list_policies().await?;
        let id = upsert(&mut policies, policy);
        self.persist(POLICY_KEY, &policies).await?;

        tracing::info!("policy saved with id: {id}");
        Ok(Saved { id, items: policies })
    }

    pub async fn delete_policy(&self, id: &str) -> Result<Vec<Policy>> {
        let mut policies = self.list_policies().await?;
        policies.retain(|p| p.id != id);
        self.persist(POLICY_KEY, &policies).await?;

        tracing::info!("policy deleted with id: {id}");
        Ok(policies)
    }

    pub async fn update_category(&self, id: &str, category: Category) -> Result<Vec<Policy>> {
        let mut policies = self.list_policies().await?;
        if let Some(policy) = policies.iter_mut().find(|p| p.id == id) {
            policy.category = Some(category);
        }
        self.persist(POLICY_KEY, &policies).await?;

        tracing::info!("policy {id} moved to category {}", category.label());
        Ok(policies)
    }

    pub async fn save_bundle(&self, bundle: Bundle) -> Result<Saved<Bundle>> {
        let mut bundles = self.list_bundles().await?;
        let id = upsert(&mut bundles, bundle);
        self.persist(BUNDLE_KEY, &bundles).await?;

        tracing::info!("bundle saved with id: {id}");
        Ok(Saved { id, items: bundles })
    }

    pub async fn delete_bundle(&self, id: &str) -> Result<Vec<Bundle>> {
        let mut bundles = self.list_bundles().await?;
        bundles.retain(|b| b.id != id);
        self.persist(BUNDLE_KEY, &bundles).await?;

        tracing::info!("bundle deleted with id: {id}");
        Ok(bundles)
    }

    /// Stamp the current local time as the last-updated marker. Callers invoke
    /// this after each mutation; it is not part of the mutation itself.
    pub async fn touch_metadata(&self) -> Result<String> {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.persist(
            METADATA_KEY,
            &Metadata {
                last_updated: now.clone(),
            },
        )
        .await?;
        Ok(now)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct MemoryKv(Arc<Mutex<HashMap<String, String>>>);

    impl KeyValueStore for MemoryKv {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn store() -> PolicyStore<MemoryKv> {
        PolicyStore::new(MemoryKv::default())
    }

    fn draft(title: &str) -> Policy {
        Policy {
            id: String::new(),
            code: None,
            title: title.to_string(),
            category: Some(Category::InfectionControl),
            content: "<p>body</p>".to_string(),
            questions: vec![],
        }
    }

    #[tokio::test]
    async fn empty_store_returns_seed_data() {
        let store = store();
        assert_eq!(store.list_policies().await.unwrap(), seed_policies());
        assert_eq!(store.list_bundles().await.unwrap(), seed_bundles());
        assert_eq!(
            store.metadata().await.unwrap().last_updated,
            crate::models::DEFAULT_LAST_UPDATED
        );
    }

    #[tokio::test]
    async fn insert_appends_under_generated_id() {
        let store = store();
        let saved = store.save_policy(draft("Hand Hygiene")).await.unwrap();

        assert_eq!(saved.items.len(), 2);
        assert_eq!(saved.items[1].id, saved.id);
        assert!(!saved.id.is_empty());

        let listed = store.list_policies().await.unwrap();
        assert_eq!(listed, saved.items);
    }

    #[tokio::test]
    async fn unknown_caller_id_is_replaced_by_generated_id() {
        let store = store();
        let mut policy = draft("Hand Hygiene");
        policy.id = "client-chosen".to_string();

        let saved = store.save_policy(policy).await.unwrap();
        assert_ne!(saved.id, "client-chosen");
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let store = store();
        let first = store.save_policy(draft("First")).await.unwrap();
        store.save_policy(draft("Second")).await.unwrap();

        let mut edited = draft("First, revised");
        edited.id = first.id.clone();
        let saved = store.save_policy(edited.clone()).await.unwrap();

        assert_eq!(saved.id, first.id);
        assert_eq!(saved.items.len(), 3);
        assert_eq!(saved.items[1], edited);

        let matching: Vec<_> = store
            .list_policies()
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.id == first.id)
            .collect();
        assert_eq!(matching, vec![edited]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = store();
        let before = store.list_policies().await.unwrap();
        let after = store.delete_policy("does-not-exist").await.unwrap();
        assert_eq!(before, after);

        let after = store.delete_policy("demo-001").await.unwrap();
        assert!(after.is_empty());
        assert!(store.delete_policy("demo-001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_policy_does_not_cascade_into_bundles() {
        let store = store();
        store.delete_policy("demo-001").await.unwrap();

        let bundles = store.list_bundles().await.unwrap();
        assert_eq!(bundles[0].policy_ids, vec!["demo-001".to_string()]);
    }

    #[tokio::test]
    async fn update_category_touches_one_record_only() {
        let store = store();
        let saved = store.save_policy(draft("Other")).await.unwrap();

        let policies = store
            .update_category("demo-001", Category::Documentation)
            .await
            .unwrap();
        assert_eq!(policies[0].category, Some(Category::Documentation));
        assert_eq!(policies[1].category, Some(Category::InfectionControl));
        assert_eq!(policies[1].id, saved.id);

        let unchanged = store
            .update_category("missing", Category::Administrative)
            .await
            .unwrap();
        assert_eq!(unchanged, policies);
    }

    #[tokio::test]
    async fn bundles_follow_the_same_upsert_contract() {
        let store = store();
        let saved = store
            .save_bundle(Bundle {
                id: String::new(),
                title: "Night shift".to_string(),
                description: "Overnight refresher".to_string(),
                policy_ids: vec!["demo-001".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(saved.items.len(), 2);

        let mut edited = saved.items[1].clone();
        edited.title = "Night shift (2025)".to_string();
        let resaved = store.save_bundle(edited).await.unwrap();
        assert_eq!(resaved.id, saved.id);
        assert_eq!(resaved.items.len(), 2);
        assert_eq!(resaved.items[1].title, "Night shift (2025)");

        let remaining = store.delete_bundle(&saved.id).await.unwrap();
        assert_eq!(remaining, seed_bundles());
    }

    #[tokio::test]
    async fn touch_metadata_persists_the_timestamp() {
        let store = store();
        let stamp = store.touch_metadata().await.unwrap();
        assert_ne!(stamp, crate::models::DEFAULT_LAST_UPDATED);
        assert_eq!(store.metadata().await.unwrap().last_updated, stamp);
    }

    #[tokio::test]
    async fn corrupt_collection_is_reported() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .withf(|key| key == POLICY_KEY)
            .returning(|_| Box::pin(async { Ok(Some("{not json".to_string())) }));

        let store = PolicyStore::new(mock);
        let err = store.list_policies().await.unwrap_err();
        assert_eq!(err.to_string(), "stored njra_policies is not valid JSON");
        let corrupt = err.downcast_ref::<CorruptData>().unwrap();
        assert_eq!(corrupt.key, POLICY_KEY);
    }

    #[tokio::test]
    async fn failed_write_surfaces_the_error() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Box::pin(async { Ok(None) }));
        mock.expect_set()
            .returning(|_, _| Box::pin(async { Err(color_eyre::eyre::eyre!("disk full")) }));

        let store = PolicyStore::new(mock);
        assert!(store.delete_policy("demo-001").await.is_err());
    }
}
