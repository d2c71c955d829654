use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{Catalog, Category, ItemId, Method, Product, Spice};
use crate::derive::{derive, CategorySets, Derived};
use crate::error::{Error, Result};
use crate::selection::Selection;
use crate::storage::{default_language, PersistedState, StateStore};

/// Visual state of a tag, evaluated in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TagState {
    Selected,
    MutuallyExcluded,
    Incompatible,
    Default,
}

impl TagState {
    pub fn is_blocked(self) -> bool {
        matches!(self, TagState::MutuallyExcluded | TagState::Incompatible)
    }
}

/// Result of [`AppState::toggle_tag`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "state")]
pub enum ToggleOutcome {
    Selected,
    Removed,
    /// The tag is incompatible or mutually excluded; nothing changed.
    Blocked(TagState),
}

/// Everything a renderer needs, as handed to listeners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub selection: Selection,
    pub incompatible_tags: CategorySets,
    pub mutually_excluded_tags: CategorySets,
    pub language: String,
}

pub type Listener = Box<dyn Fn(&StateSnapshot) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Selection state bound to a catalog and a store.
///
/// Every mutation re-derives the incompatibility sets, persists the selection
/// and then notifies listeners once.
pub struct AppState {
    catalog: Arc<Catalog>,
    selection: Selection,
    derived: Derived,
    language: String,
    store: Box<dyn StateStore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl AppState {
    /// Restore the saved selection from `store`. Ids unknown to `catalog` are dropped.
    pub fn new(catalog: Arc<Catalog>, store: Box<dyn StateStore>) -> Self {
        let persisted = match store.load() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("failed to restore selection: {}", e);
                PersistedState::default()
            }
        };

        let mut selection = persisted.selection;
        let before = selection.total();
        selection.retain(|category, id| catalog.contains(category, id));
        if selection.total() != before {
            tracing::info!(
                dropped = before - selection.total(),
                "dropped stale ids from restored selection"
            );
        }

        let derived = derive(&selection, &catalog);
        AppState {
            catalog,
            selection,
            derived,
            language: persisted.language,
            store,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn incompatible(&self) -> &CategorySets {
        &self.derived.incompatible
    }

    pub fn mutually_excluded(&self) -> &CategorySets {
        &self.derived.mutually_excluded
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            selection: self.selection.clone(),
            incompatible_tags: self.derived.incompatible.clone(),
            mutually_excluded_tags: self.derived.mutually_excluded.clone(),
            language: self.language.clone(),
        }
    }

    // --- Subscriptions ---

    pub fn subscribe(&mut self, listener: impl Fn(&StateSnapshot) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // --- Mutations ---

    /// Add `id` to the selection. Returns `Ok(false)` if it was already selected.
    pub fn select_tag(&mut self, category: Category, id: ItemId) -> Result<bool> {
        if !self.catalog.contains(category, id) {
            return Err(Error::UnknownItem { category, id });
        }
        if !self.selection.insert(category, id) {
            return Ok(false);
        }
        tracing::debug!(%category, id, "selected tag");
        self.commit();
        Ok(true)
    }

    pub fn remove_tag(&mut self, category: Category, id: ItemId) -> bool {
        if !self.selection.remove(category, id) {
            return false;
        }
        tracing::debug!(%category, id, "removed tag");
        self.commit();
        true
    }

    /// Click semantics: blocked tags stay untouched, selected tags are removed,
    /// anything else is selected.
    pub fn toggle_tag(&mut self, category: Category, id: ItemId) -> Result<ToggleOutcome> {
        match self.tag_state(category, id) {
            state if state.is_blocked() => Ok(ToggleOutcome::Blocked(state)),
            TagState::Selected => {
                self.remove_tag(category, id);
                Ok(ToggleOutcome::Removed)
            }
            _ => {
                self.select_tag(category, id)?;
                Ok(ToggleOutcome::Selected)
            }
        }
    }

    pub fn reset(&mut self) {
        self.selection.clear();
        self.commit();
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.language = if language.trim().is_empty() {
            default_language()
        } else {
            language
        };
        self.commit();
    }

    /// Flush the persisted selection. Called when the consumer shuts down.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.persisted())
    }

    fn persisted(&self) -> PersistedState {
        PersistedState {
            selection: self.selection.clone(),
            language: self.language.clone(),
        }
    }

    fn commit(&mut self) {
        self.derived = derive(&self.selection, &self.catalog);
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist selection: {}", e);
        }
        let snapshot = self.snapshot();
        for (_, listener) in &self.listeners {
            listener(&snapshot);
        }
    }

    // --- Queries ---

    pub fn tag_state(&self, category: Category, id: ItemId) -> TagState {
        if self.selection.contains(category, id) {
            TagState::Selected
        } else if self.derived.mutually_excluded.contains(category, id) {
            TagState::MutuallyExcluded
        } else if self.derived.incompatible.contains(category, id) {
            TagState::Incompatible
        } else {
            TagState::Default
        }
    }

    /// State of every catalog entry in `category`, in catalog order.
    pub fn tag_states(&self, category: Category) -> Vec<(ItemId, TagState)> {
        self.catalog
            .ids(category)
            .into_iter()
            .map(|id| (id, self.tag_state(category, id)))
            .collect()
    }

    pub fn has_selections(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn total_selected(&self) -> usize {
        self.selection.total()
    }

    /// Whether the explanation panel has anything to say about the selection.
    pub fn should_show_explanations(&self) -> bool {
        self.selection.should_explain()
    }

    pub fn selected_products(&self) -> Vec<&Product> {
        self.selection
            .selected_products
            .iter()
            .filter_map(|id| self.catalog.product(*id))
            .collect()
    }

    pub fn selected_methods(&self) -> Vec<&Method> {
        self.selection
            .selected_methods
            .iter()
            .filter_map(|id| self.catalog.method(*id))
            .collect()
    }

    pub fn selected_spices(&self) -> Vec<&Spice> {
        self.selection
            .selected_spices
            .iter()
            .filter_map(|id| self.catalog.spice(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Mutex;

    fn state_with(store: MemoryStore) -> AppState {
        AppState::new(Arc::new(Catalog::builtin().unwrap()), Box::new(store))
    }

    #[test]
    fn tag_state_priority() {
        let mut state = state_with(MemoryStore::new());
        // Ваниль (17): Говядина and Лосось incompatible, Кумин and Красный перец excluded.
        state.select_tag(Category::Spices, 17).unwrap();
        assert_eq!(state.tag_state(Category::Spices, 17), TagState::Selected);
        assert_eq!(state.tag_state(Category::Spices, 6), TagState::MutuallyExcluded);
        assert_eq!(state.tag_state(Category::Spices, 15), TagState::MutuallyExcluded);
        assert_eq!(state.tag_state(Category::Products, 1), TagState::Incompatible);
        assert_eq!(state.tag_state(Category::Methods, 5), TagState::Incompatible);
        assert_eq!(state.tag_state(Category::Products, 2), TagState::Default);
    }

    #[test]
    fn select_unknown_item_is_an_error() {
        let mut state = state_with(MemoryStore::new());
        let err = state.select_tag(Category::Methods, 404).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownItem { category: Category::Methods, id: 404 }
        ));
        assert!(!state.has_selections());
    }

    #[test]
    fn toggle_respects_blocked_tags() {
        let mut state = state_with(MemoryStore::new());
        assert_eq!(state.toggle_tag(Category::Products, 6).unwrap(), ToggleOutcome::Selected);
        // Шоколад excludes Говядина.
        assert_eq!(
            state.toggle_tag(Category::Products, 1).unwrap(),
            ToggleOutcome::Blocked(TagState::MutuallyExcluded)
        );
        assert_eq!(
            state.toggle_tag(Category::Methods, 5).unwrap(),
            ToggleOutcome::Blocked(TagState::Incompatible)
        );
        assert_eq!(state.toggle_tag(Category::Products, 6).unwrap(), ToggleOutcome::Removed);
        assert!(!state.has_selections());
    }

    #[test]
    fn listeners_fire_once_per_change_with_fresh_derived_sets() {
        let mut state = state_with(MemoryStore::new());
        let seen: Arc<Mutex<Vec<StateSnapshot>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let id = state.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.clone()));

        state.select_tag(Category::Products, 6).unwrap();
        state.select_tag(Category::Products, 6).unwrap();
        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 1);
            assert!(seen[0].mutually_excluded_tags.products.contains(&1));
            assert!(seen[0].incompatible_tags.methods.contains(&5));
        }

        assert!(state.unsubscribe(id));
        state.reset();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(!state.unsubscribe(id));
    }

    #[test]
    fn reset_clears_selection_and_derived_sets() {
        let mut state = state_with(MemoryStore::new());
        state.select_tag(Category::Spices, 17).unwrap();
        state.select_tag(Category::Methods, 2).unwrap();
        state.reset();
        assert!(!state.has_selections());
        assert!(state.incompatible().is_empty());
        assert!(state.mutually_excluded().is_empty());
    }

    #[test]
    fn explanations_need_a_spice() {
        let mut state = state_with(MemoryStore::new());
        state.select_tag(Category::Products, 2).unwrap();
        state.select_tag(Category::Methods, 1).unwrap();
        assert!(!state.should_show_explanations());

        state.select_tag(Category::Spices, 3).unwrap();
        assert!(state.should_show_explanations());

        state.reset();
        state.select_tag(Category::Spices, 3).unwrap();
        assert!(state.should_show_explanations());
    }

    #[test]
    fn selected_items_follow_selection_order() {
        let mut state = state_with(MemoryStore::new());
        state.select_tag(Category::Spices, 9).unwrap();
        state.select_tag(Category::Spices, 1).unwrap();
        let names: Vec<&str> = state.selected_spices().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Корица", "Базилик"]);
    }

    #[test]
    fn mutations_persist_and_restore() {
        let store = MemoryStore::new();
        {
            let mut state = state_with(store.clone());
            state.select_tag(Category::Products, 2).unwrap();
            state.select_tag(Category::Spices, 7).unwrap();
            state.set_language("en");
        }
        let raw = store.raw().unwrap();
        assert!(raw.contains("\"selectedSpices\":[7]"));

        let restored = state_with(store);
        assert_eq!(restored.selection().selected_products, vec![2]);
        assert_eq!(restored.selection().selected_spices, vec![7]);
        assert_eq!(restored.language(), "en");
    }

    #[test]
    fn restore_drops_unknown_ids_and_rederives() {
        let store = MemoryStore::with_raw(
            r#"{"selectedProducts": [6, 99, 6], "selectedMethods": [], "selectedSpices": []}"#,
        );
        let state = state_with(store);
        assert_eq!(state.selection().selected_products, vec![6]);
        assert_eq!(state.tag_state(Category::Products, 1), TagState::MutuallyExcluded);
        assert_eq!(state.language(), "ru");
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let state = state_with(MemoryStore::with_raw("{broken"));
        assert!(!state.has_selections());
    }
}
