//! Incompatibility derivation.
//!
//! Derived sets are a pure function of the selection and the catalog: a fold over
//! the `incompatible_*` cross references, closed in both directions. A reference
//! inside one category marks the other item as *mutually excluded*; a reference
//! across categories marks it *incompatible*.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, Category, ItemId};
use crate::selection::Selection;

/// One ordered id set per category.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq, schemars::JsonSchema)]
pub struct CategorySets {
    #[serde(default)]
    pub products: BTreeSet<ItemId>,
    #[serde(default)]
    pub methods: BTreeSet<ItemId>,
    #[serde(default)]
    pub spices: BTreeSet<ItemId>,
}

impl CategorySets {
    pub fn get(&self, category: Category) -> &BTreeSet<ItemId> {
        match category {
            Category::Products => &self.products,
            Category::Methods => &self.methods,
            Category::Spices => &self.spices,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut BTreeSet<ItemId> {
        match category {
            Category::Products => &mut self.products,
            Category::Methods => &mut self.methods,
            Category::Spices => &mut self.spices,
        }
    }

    pub fn contains(&self, category: Category, id: ItemId) -> bool {
        self.get(category).contains(&id)
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Derived {
    pub incompatible: CategorySets,
    pub mutually_excluded: CategorySets,
}

/// Compute both derived sets for `selection`.
///
/// Never contains an id that is selected in the same category, and only
/// contains ids the catalog knows.
pub fn derive(selection: &Selection, catalog: &Catalog) -> Derived {
    let mut derived = Derived::default();

    for (category, id) in selection.iter() {
        let Some(refs) = catalog.refs(category, id) else {
            continue;
        };
        for target in Category::ALL {
            let bucket = if target == category {
                derived.mutually_excluded.get_mut(target)
            } else {
                derived.incompatible.get_mut(target)
            };

            bucket.extend(refs.incompatible(target).iter().copied());

            for (other_id, other_refs) in catalog.entries_with_refs(target) {
                if other_refs.incompatible(category).contains(&id) {
                    bucket.insert(other_id);
                }
            }
        }
    }

    for sets in [&mut derived.incompatible, &mut derived.mutually_excluded] {
        for category in Category::ALL {
            sets.get_mut(category)
                .retain(|&id| !selection.contains(category, id) && catalog.contains(category, id));
        }
    }

    tracing::debug!(
        selected = selection.total(),
        incompatible = derived.incompatible.len(),
        mutually_excluded = derived.mutually_excluded.len(),
        "derived compatibility"
    );
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"[
                {"id": 1, "name": "Говядина", "incompatible_spices": [3]},
                {"id": 2, "name": "Шоколад", "incompatible_products": [1], "incompatible_methods": [1]}
            ]"#,
            r#"[
                {"id": 1, "name": "Гриль"},
                {"id": 2, "name": "Варка", "incompatible_spices": [2]}
            ]"#,
            r#"[
                {"id": 1, "name": "Кумин", "incompatible_spices": [3]},
                {"id": 2, "name": "Укроп"},
                {"id": 3, "name": "Ваниль", "incompatible_methods": [1]}
            ]"#,
        )
        .unwrap()
    }

    fn select(pairs: &[(Category, ItemId)]) -> Selection {
        let mut selection = Selection::default();
        for &(c, id) in pairs {
            selection.insert(c, id);
        }
        selection
    }

    fn ids(set: &BTreeSet<ItemId>) -> Vec<ItemId> {
        set.iter().copied().collect()
    }

    #[test]
    fn empty_selection_derives_nothing() {
        let derived = derive(&Selection::default(), &catalog());
        assert!(derived.incompatible.is_empty());
        assert!(derived.mutually_excluded.is_empty());
    }

    #[test]
    fn forward_and_backward_references_are_both_followed() {
        let catalog = catalog();

        let derived = derive(&select(&[(Category::Methods, 1)]), &catalog);
        // Шоколад and Ваниль both point at Гриль.
        assert_eq!(ids(&derived.incompatible.products), vec![2]);
        assert_eq!(ids(&derived.incompatible.spices), vec![3]);

        let derived = derive(&select(&[(Category::Spices, 3)]), &catalog);
        assert_eq!(ids(&derived.incompatible.methods), vec![1]);
        assert_eq!(ids(&derived.incompatible.products), vec![1]);
        assert_eq!(ids(&derived.mutually_excluded.spices), vec![1]);
    }

    #[test]
    fn same_category_references_are_mutual_exclusions() {
        let derived = derive(&select(&[(Category::Products, 1)]), &catalog());
        assert_eq!(ids(&derived.mutually_excluded.products), vec![2]);
        assert!(derived.incompatible.products.is_empty());
        assert_eq!(ids(&derived.incompatible.spices), vec![3]);
    }

    #[test]
    fn selected_ids_never_appear_in_derived_sets() {
        let selection = select(&[
            (Category::Products, 1),
            (Category::Products, 2),
            (Category::Spices, 1),
            (Category::Spices, 3),
            (Category::Methods, 1),
        ]);
        let derived = derive(&selection, &catalog());
        for (category, id) in selection.iter() {
            assert!(!derived.incompatible.contains(category, id));
            assert!(!derived.mutually_excluded.contains(category, id));
        }
    }

    #[test]
    fn derivation_is_idempotent_and_order_independent() {
        let catalog = catalog();
        let a = select(&[(Category::Spices, 1), (Category::Methods, 2), (Category::Products, 2)]);
        let b = select(&[(Category::Products, 2), (Category::Spices, 1), (Category::Methods, 2)]);
        let first = derive(&a, &catalog);
        assert_eq!(first, derive(&a, &catalog));
        assert_eq!(first, derive(&b, &catalog));
    }

    #[test]
    fn unknown_selected_ids_and_dangling_refs_are_ignored() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Рыба", "incompatible_spices": [42]}]"#,
            "[]",
            "[]",
        )
        .unwrap();
        let derived = derive(
            &select(&[(Category::Products, 1), (Category::Products, 99)]),
            &catalog,
        );
        assert!(derived.incompatible.is_empty());
        assert!(derived.mutually_excluded.is_empty());
    }
}
