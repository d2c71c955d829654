use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Catalog ids are unique within a category; the three categories are separate namespaces.
pub type ItemId = u32;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Products,
    Methods,
    Spices,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Products, Category::Methods, Category::Spices];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Products => "products",
            Category::Methods => "methods",
            Category::Spices => "spices",
        }
    }

    fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "products" | "product" => Ok(Category::Products),
            "methods" | "method" => Ok(Category::Methods),
            "spices" | "spice" => Ok(Category::Spices),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

/// Cross-reference lists shared by every catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CrossRefs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_products: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_methods: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_spices: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compatible_products: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compatible_methods: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compatible_spices: Vec<ItemId>,
}

impl CrossRefs {
    pub fn incompatible(&self, category: Category) -> &[ItemId] {
        match category {
            Category::Products => &self.incompatible_products,
            Category::Methods => &self.incompatible_methods,
            Category::Spices => &self.incompatible_spices,
        }
    }

    pub fn compatible(&self, category: Category) -> &[ItemId] {
        match category {
            Category::Products => &self.compatible_products,
            Category::Methods => &self.compatible_methods,
            Category::Spices => &self.compatible_spices,
        }
    }

    fn all(&self) -> impl Iterator<Item = (Category, ItemId)> + '_ {
        Category::ALL.into_iter().flat_map(move |c| {
            self.incompatible(c)
                .iter()
                .chain(self.compatible(c))
                .map(move |id| (c, *id))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ItemId,
    pub name: String,
    /// Food group, e.g. "мясо", "рыба", "овощи".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub refs: CrossRefs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Method {
    pub id: ItemId,
    pub name: String,
    /// Working temperature in °C.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Typical cooking time in minutes.
    #[serde(
        default,
        deserialize_with = "whole_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<u32>,
    #[serde(
        default,
        deserialize_with = "whole_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<u32>,
    #[serde(flatten)]
    pub refs: CrossRefs,
}

// Hand-edited catalogs write levels and minutes as decimals ("intensity": 7.5).
// Fractions are truncated; negatives become 0 and huge values saturate.

fn whole(value: f64, max: u32) -> u32 {
    if value.is_nan() {
        0
    } else {
        value.trunc().clamp(0.0, f64::from(max)) as u32
    }
}

fn whole_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| whole(v, u32::from(u8::MAX)) as u8))
}

fn whole_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| whole(v, u32::MAX)))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChemicalCompounds {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volatile_oils: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phenolic_compounds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alkaloids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Solubility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Spice {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1..=10; see [`Spice::intensity`] for the effective value.
    #[serde(
        default,
        deserialize_with = "whole_u8",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<u8>,
    /// базовая / связывающая / акцентная / финишная
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taste_profile: Vec<String>,
    /// English flavor keys (sweet, spicy, herbal, ...) used for flavor profiling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chemical_compounds: Option<ChemicalCompounds>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub best_products: Vec<String>,
    #[serde(default)]
    pub heat_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solubility: Option<Solubility>,
    #[serde(flatten)]
    pub refs: CrossRefs,
}

impl Spice {
    /// Stored intensity, or 5 when missing or zero.
    pub fn intensity(&self) -> u8 {
        match self.intensity {
            Some(v) if v > 0 => v,
            _ => 5,
        }
    }

    /// Volatile oils, then phenolic compounds, then alkaloids.
    pub fn compounds(&self) -> Vec<&str> {
        self.chemical_compounds
            .iter()
            .flat_map(|c| {
                c.volatile_oils
                    .iter()
                    .chain(&c.phenolic_compounds)
                    .chain(&c.alkaloids)
            })
            .map(String::as_str)
            .collect()
    }

    pub fn volatile_oils(&self) -> &[String] {
        self.chemical_compounds
            .as_ref()
            .map(|c| c.volatile_oils.as_slice())
            .unwrap_or(&[])
    }

    pub fn phenolic_compounds(&self) -> &[String] {
        self.chemical_compounds
            .as_ref()
            .map(|c| c.phenolic_compounds.as_slice())
            .unwrap_or(&[])
    }

    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or("базовая")
    }
}

/// Id and display name of a catalog entry, for tag clouds and listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
}

/// A problem found by [`Catalog::lint`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    DuplicateId { category: Category, id: ItemId },
    DanglingRef {
        from: (Category, ItemId),
        to: (Category, ItemId),
    },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::DuplicateId { category, id } => {
                write!(f, "duplicate id {} in {}", id, category)
            }
            CatalogIssue::DanglingRef { from, to } => write!(
                f,
                "{} {} references unknown {} {}",
                from.0, from.1, to.0, to.1
            ),
        }
    }
}

const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");
const BUILTIN_METHODS: &str = include_str!("../data/methods.json");
const BUILTIN_SPICES: &str = include_str!("../data/spices.json");

/// The static dataset: three fixed collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub methods: Vec<Method>,
    pub spices: Vec<Spice>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PRODUCTS, BUILTIN_METHODS, BUILTIN_SPICES)
    }

    pub fn from_json(products: &str, methods: &str, spices: &str) -> Result<Self> {
        let catalog = Catalog {
            products: serde_json::from_str(products).map_err(|e| Error::json("products", e))?,
            methods: serde_json::from_str(methods).map_err(|e| Error::json("methods", e))?,
            spices: serde_json::from_str(spices).map_err(|e| Error::json("spices", e))?,
        };
        catalog.report_issues();
        Ok(catalog)
    }

    /// Read `products.json`, `methods.json` and `spices.json` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |category: Category| -> Result<String> {
            let path = dir.join(category.file_name());
            fs::read_to_string(&path).map_err(|e| Error::io(path, e))
        };
        let products = read(Category::Products)?;
        let methods = read(Category::Methods)?;
        let spices = read(Category::Spices)?;

        let catalog = Catalog {
            products: serde_json::from_str(&products)
                .map_err(|e| Error::json(dir.join("products.json").display().to_string(), e))?,
            methods: serde_json::from_str(&methods)
                .map_err(|e| Error::json(dir.join("methods.json").display().to_string(), e))?,
            spices: serde_json::from_str(&spices)
                .map_err(|e| Error::json(dir.join("spices.json").display().to_string(), e))?,
        };
        tracing::debug!(
            dir = %dir.display(),
            products = catalog.products.len(),
            methods = catalog.methods.len(),
            spices = catalog.spices.len(),
            "loaded catalog"
        );
        catalog.report_issues();
        Ok(catalog)
    }

    pub fn product(&self, id: ItemId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn method(&self, id: ItemId) -> Option<&Method> {
        self.methods.iter().find(|m| m.id == id)
    }

    pub fn spice(&self, id: ItemId) -> Option<&Spice> {
        self.spices.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, category: Category, id: ItemId) -> bool {
        self.refs(category, id).is_some()
    }

    pub fn name(&self, category: Category, id: ItemId) -> Option<&str> {
        match category {
            Category::Products => self.product(id).map(|p| p.name.as_str()),
            Category::Methods => self.method(id).map(|m| m.name.as_str()),
            Category::Spices => self.spice(id).map(|s| s.name.as_str()),
        }
    }

    pub fn refs(&self, category: Category, id: ItemId) -> Option<&CrossRefs> {
        match category {
            Category::Products => self.product(id).map(|p| &p.refs),
            Category::Methods => self.method(id).map(|m| &m.refs),
            Category::Spices => self.spice(id).map(|s| &s.refs),
        }
    }

    /// Every entry of a category as `(id, refs)`, in catalog order.
    pub fn entries_with_refs(&self, category: Category) -> Vec<(ItemId, &CrossRefs)> {
        match category {
            Category::Products => self.products.iter().map(|p| (p.id, &p.refs)).collect(),
            Category::Methods => self.methods.iter().map(|m| (m.id, &m.refs)).collect(),
            Category::Spices => self.spices.iter().map(|s| (s.id, &s.refs)).collect(),
        }
    }

    pub fn ids(&self, category: Category) -> Vec<ItemId> {
        self.entries_with_refs(category)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    pub fn entries(&self, category: Category) -> Vec<ItemSummary> {
        let summarize = |id: ItemId, name: &str| ItemSummary {
            id,
            name: name.to_string(),
        };
        match category {
            Category::Products => self.products.iter().map(|p| summarize(p.id, &p.name)).collect(),
            Category::Methods => self.methods.iter().map(|m| summarize(m.id, &m.name)).collect(),
            Category::Spices => self.spices.iter().map(|s| summarize(s.id, &s.name)).collect(),
        }
    }

    /// Duplicate ids and cross references to ids the catalog does not contain.
    pub fn lint(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for (id, refs) in self.entries_with_refs(category) {
                if !seen.insert(id) {
                    issues.push(CatalogIssue::DuplicateId { category, id });
                }
                for (target, target_id) in refs.all() {
                    if !self.contains(target, target_id) {
                        issues.push(CatalogIssue::DanglingRef {
                            from: (category, id),
                            to: (target, target_id),
                        });
                    }
                }
            }
        }
        issues
    }

    fn report_issues(&self) {
        for issue in self.lint() {
            tracing::warn!("catalog: {}", issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_and_is_consistent() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.products.is_empty());
        assert!(!catalog.methods.is_empty());
        assert!(!catalog.spices.is_empty());
        assert_eq!(catalog.lint(), vec![]);
    }

    #[test]
    fn category_parses_singular_and_plural() {
        assert_eq!("spices".parse::<Category>().unwrap(), Category::Spices);
        assert_eq!("Product".parse::<Category>().unwrap(), Category::Products);
        assert!(matches!(
            "herbs".parse::<Category>(),
            Err(Error::UnknownCategory(name)) if name == "herbs"
        ));
    }

    #[test]
    fn missing_cross_refs_read_as_empty() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Курица"}]"#,
            r#"[{"id": 1, "name": "Жарка", "temperature": 190}]"#,
            r#"[{"id": 1, "name": "Базилик", "incompatible_products": [1]}]"#,
        )
        .unwrap();
        let product = catalog.product(1).unwrap();
        assert!(product.refs.incompatible(Category::Spices).is_empty());
        assert_eq!(catalog.spice(1).unwrap().refs.incompatible_products, vec![1]);
        assert_eq!(catalog.method(1).unwrap().temperature, Some(190.0));
    }

    #[test]
    fn decimal_levels_and_minutes_are_truncated() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Курица"}]"#,
            r#"[{"id": 1, "name": "Жарка", "time": 12.5, "difficulty": 2.0},
                {"id": 2, "name": "Копчение", "time": 1e12, "difficulty": -1}]"#,
            r#"[{"id": 1, "name": "Базилик", "intensity": 7.5},
                {"id": 2, "name": "Укроп", "intensity": 300}]"#,
        )
        .unwrap();
        assert_eq!(catalog.spice(1).unwrap().intensity, Some(7));
        assert_eq!(catalog.spice(2).unwrap().intensity, Some(u8::MAX));
        assert_eq!(catalog.method(1).unwrap().time, Some(12));
        assert_eq!(catalog.method(1).unwrap().difficulty, Some(2));
        assert_eq!(catalog.method(2).unwrap().time, Some(u32::MAX));
        assert_eq!(catalog.method(2).unwrap().difficulty, Some(0));
    }

    #[test]
    fn spice_intensity_defaults_to_five() {
        let catalog = Catalog::from_json(
            "[]",
            "[]",
            r#"[{"id": 1, "name": "А"}, {"id": 2, "name": "Б", "intensity": 0}, {"id": 3, "name": "В", "intensity": 9}]"#,
        )
        .unwrap();
        let intensities: Vec<u8> = catalog.spices.iter().map(Spice::intensity).collect();
        assert_eq!(intensities, vec![5, 5, 9]);
    }

    #[test]
    fn lint_reports_duplicates_and_dangling_refs() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Рыба", "incompatible_spices": [7]}, {"id": 1, "name": "Рыба-2"}]"#,
            "[]",
            "[]",
        )
        .unwrap();
        let issues = catalog.lint();
        assert!(issues.contains(&CatalogIssue::DuplicateId {
            category: Category::Products,
            id: 1
        }));
        assert!(issues.contains(&CatalogIssue::DanglingRef {
            from: (Category::Products, 1),
            to: (Category::Spices, 7),
        }));
    }

    #[test]
    fn load_dir_names_the_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("products.json"), "[]").unwrap();
        let err = Catalog::load_dir(dir.path()).unwrap_err();
        match err {
            Error::Io { path, .. } => assert!(path.ends_with("methods.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
