use serde::{Deserialize, Serialize};

use crate::catalog::{Category, ItemId};

/// The three selected-id lists. Insertion order is kept and ids are never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub selected_products: Vec<ItemId>,
    #[serde(default)]
    pub selected_methods: Vec<ItemId>,
    #[serde(default)]
    pub selected_spices: Vec<ItemId>,
}

impl Selection {
    pub fn ids(&self, category: Category) -> &[ItemId] {
        match category {
            Category::Products => &self.selected_products,
            Category::Methods => &self.selected_methods,
            Category::Spices => &self.selected_spices,
        }
    }

    fn ids_mut(&mut self, category: Category) -> &mut Vec<ItemId> {
        match category {
            Category::Products => &mut self.selected_products,
            Category::Methods => &mut self.selected_methods,
            Category::Spices => &mut self.selected_spices,
        }
    }

    pub fn contains(&self, category: Category, id: ItemId) -> bool {
        self.ids(category).contains(&id)
    }

    /// Append `id` unless it is already selected. Returns whether it was added.
    pub fn insert(&mut self, category: Category, id: ItemId) -> bool {
        if self.contains(category, id) {
            return false;
        }
        self.ids_mut(category).push(id);
        true
    }

    pub fn remove(&mut self, category: Category, id: ItemId) -> bool {
        let ids = self.ids_mut(category);
        let before = ids.len();
        ids.retain(|&existing| existing != id);
        ids.len() != before
    }

    pub fn clear(&mut self) {
        for category in Category::ALL {
            self.ids_mut(category).clear();
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.ids(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Every selected `(category, id)`, products first, each list in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, ItemId)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.ids(c).iter().map(move |id| (c, *id)))
    }

    /// Keep only the first occurrence of each id and the ids `keep` accepts.
    pub fn retain(&mut self, mut keep: impl FnMut(Category, ItemId) -> bool) {
        for category in Category::ALL {
            let mut seen = Vec::new();
            self.ids_mut(category).retain(|&id| {
                if seen.contains(&id) || !keep(category, id) {
                    return false;
                }
                seen.push(id);
                true
            });
        }
    }

    /// Explanations need at least one spice. Products and methods alone have
    /// nothing to pair with.
    pub fn should_explain(&self) -> bool {
        !self.selected_spices.is_empty()
    }

    /// Copy with every list sorted ascending, used as the canonical analysis order.
    pub fn sorted(&self) -> Selection {
        let mut sorted = self.clone();
        for category in Category::ALL {
            sorted.ids_mut(category).sort_unstable();
        }
        sorted
    }
}
