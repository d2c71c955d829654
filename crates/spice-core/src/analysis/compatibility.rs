use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use crate::catalog::{Catalog, ItemId, Method, Product, Spice};
use crate::selection::Selection;
use crate::storage::TextStyle;

use super::{compounds, detailed, mixture};

/// Spice pairs whose intensities add up to more than this are flagged.
const INTENSE_PAIR_THRESHOLD: u16 = 15;

/// Selections remembered by [`CompatibilityAnalyzer::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompatibilityNote {
    Compatible {
        title: String,
        reason: String,
        chemical_basis: String,
        taste_interaction: String,
        nutritional_benefits: String,
    },
    Incompatible {
        title: String,
        reason: String,
        chemical_conflict: String,
        taste_clash: String,
        recommendation: String,
    },
}

impl CompatibilityNote {
    pub fn title(&self) -> &str {
        match self {
            CompatibilityNote::Compatible { title, .. }
            | CompatibilityNote::Incompatible { title, .. } => title,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CookingProcess {
    pub title: String,
    pub temperature_effect: String,
    pub chemical_changes: String,
    pub aroma_development: String,
    pub optimal_timing: String,
    pub technique_tips: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReactionType {
    Intense,
    Delicate,
    Contrasting,
    Balanced,
}

impl ReactionType {
    fn classify(a: u8, b: u8) -> Self {
        let total = u16::from(a) + u16::from(b);
        if total > 12 {
            ReactionType::Intense
        } else if total < 8 {
            ReactionType::Delicate
        } else if a.abs_diff(b) > 3 {
            ReactionType::Contrasting
        } else {
            ReactionType::Balanced
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReactionType::Intense => "интенсивное взаимодействие",
            ReactionType::Delicate => "деликатное взаимодействие",
            ReactionType::Contrasting => "контрастное взаимодействие",
            ReactionType::Balanced => "сбалансированное взаимодействие",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SynergyPair {
    pub compound1: String,
    pub compound2: String,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChemicalReaction {
    pub title: String,
    pub common_compounds: Vec<String>,
    pub synergy_compounds: Vec<SynergyPair>,
    pub reaction_type: ReactionType,
    /// Russian prose for `reaction_type`.
    pub reaction_label: String,
    pub temperature_range: String,
    pub flavor_result: String,
    pub molecular_explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Mixture,
    Warning,
    Timing,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub content: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SelectionAnalysis {
    pub compatibility: Vec<CompatibilityNote>,
    pub cooking_processes: Vec<CookingProcess>,
    pub chemical_reactions: Vec<ChemicalReaction>,
    pub recommendations: Vec<Recommendation>,
}

impl SelectionAnalysis {
    pub fn is_empty(&self) -> bool {
        self.compatibility.is_empty()
            && self.cooking_processes.is_empty()
            && self.chemical_reactions.is_empty()
            && self.recommendations.is_empty()
    }
}

type CacheKey = (Vec<ItemId>, Vec<ItemId>, Vec<ItemId>);

fn cache_key(sorted: &Selection) -> CacheKey {
    (
        sorted.selected_products.clone(),
        sorted.selected_methods.clone(),
        sorted.selected_spices.clone(),
    )
}

/// Explains why the selected items do or don't go together.
///
/// Results are memoized per selection; the key is order-independent. The
/// least recently used selection is evicted once the cache is full.
pub struct CompatibilityAnalyzer {
    catalog: Arc<Catalog>,
    style: TextStyle,
    cache: Mutex<LruCache<CacheKey, SelectionAnalysis>>,
}

impl CompatibilityAnalyzer {
    pub fn new(catalog: Arc<Catalog>, style: TextStyle) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::with_cache_capacity(catalog, style, capacity)
    }

    pub fn with_cache_capacity(
        catalog: Arc<Catalog>,
        style: TextStyle,
        capacity: NonZeroUsize,
    ) -> Self {
        CompatibilityAnalyzer {
            catalog,
            style,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Number of memoized selections.
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether `selection` (in any order) is memoized. Does not touch recency.
    pub fn is_cached(&self, selection: &Selection) -> bool {
        let key = cache_key(&selection.sorted());
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&key)
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn analyze_selection(&self, selection: &Selection) -> SelectionAnalysis {
        let sorted = selection.sorted();
        let key = cache_key(&sorted);

        if let Some(hit) = self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
            tracing::trace!("analysis cache hit");
            return hit.clone();
        }

        let products = self.resolve_products(&sorted.selected_products);
        let methods = self.resolve_methods(&sorted.selected_methods);
        let spices = self.resolve_spices(&sorted.selected_spices);

        let analysis = SelectionAnalysis {
            compatibility: self.product_spice_notes(&products, &spices),
            cooking_processes: self.cooking_processes(&methods, &spices),
            chemical_reactions: self.chemical_reactions(&spices),
            recommendations: self.recommendations(&methods, &spices),
        };
        tracing::debug!(
            notes = analysis.compatibility.len(),
            processes = analysis.cooking_processes.len(),
            reactions = analysis.chemical_reactions.len(),
            recommendations = analysis.recommendations.len(),
            "analyzed selection"
        );

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(key, analysis.clone());
        analysis
    }

    pub(crate) fn resolve_products(&self, ids: &[ItemId]) -> Vec<&Product> {
        ids.iter().filter_map(|id| self.catalog.product(*id)).collect()
    }

    pub(crate) fn resolve_methods(&self, ids: &[ItemId]) -> Vec<&Method> {
        ids.iter().filter_map(|id| self.catalog.method(*id)).collect()
    }

    pub(crate) fn resolve_spices(&self, ids: &[ItemId]) -> Vec<&Spice> {
        ids.iter().filter_map(|id| self.catalog.spice(*id)).collect()
    }

    // --- product + spice ---

    pub(crate) fn product_spice_notes(
        &self,
        products: &[&Product],
        spices: &[&Spice],
    ) -> Vec<CompatibilityNote> {
        let mut notes = Vec::new();
        for product in products {
            for spice in spices {
                if product.refs.compatible_spices.contains(&spice.id) {
                    notes.push(self.compatible_note(product, spice));
                } else if product.refs.incompatible_spices.contains(&spice.id) {
                    notes.push(self.incompatible_note(product, spice));
                }
            }
        }
        notes
    }

    fn compatible_note(&self, product: &Product, spice: &Spice) -> CompatibilityNote {
        let (p, s) = (&product.name, &spice.name);
        let title = format!("{s} + {p}");
        match self.style {
            TextStyle::Brief => CompatibilityNote::Compatible {
                title,
                reason: format!("{s} отлично сочетается с {p} благодаря дополняющим профилям."),
                chemical_basis: format!(
                    "Химические соединения {s} усиливают натуральные вкусы {p} без конфликтующих реакций."
                ),
                taste_interaction: format!(
                    "Вкусовые ноты {s} гармонично дополняют основной вкус {p}, создавая сбалансированный профиль."
                ),
                nutritional_benefits: format!(
                    "Сочетание {p} с {s} улучшает усвоение питательных веществ."
                ),
            },
            TextStyle::Detailed => CompatibilityNote::Compatible {
                title,
                reason: detailed::compatibility_reason(product, spice),
                chemical_basis: detailed::chemical_compatibility(spice),
                taste_interaction: detailed::taste_interaction(spice),
                nutritional_benefits: detailed::nutritional_benefits(spice),
            },
        }
    }

    fn incompatible_note(&self, product: &Product, spice: &Spice) -> CompatibilityNote {
        let (p, s) = (&product.name, &spice.name);
        let title = format!("Несовместимость: {s} + {p}");
        match self.style {
            TextStyle::Brief => CompatibilityNote::Incompatible {
                title,
                reason: format!(
                    "{s} может перебить натуральный вкус {p} или создать неприятные сочетания."
                ),
                chemical_conflict: format!(
                    "Химические соединения {s} могут нежелательно реагировать с компонентами {p}."
                ),
                taste_clash: format!(
                    "Интенсивность {s} может подавить деликатные вкусовые ноты {p}."
                ),
                recommendation: format!(
                    "Рекомендуем использовать более мягкие специи или уменьшить количество {s}."
                ),
            },
            TextStyle::Detailed => CompatibilityNote::Incompatible {
                title,
                reason: detailed::incompatibility_reason(product, spice),
                chemical_conflict: detailed::chemical_conflict(product, spice),
                taste_clash: detailed::taste_clash(product, spice),
                recommendation: detailed::alternative_recommendation(product),
            },
        }
    }

    // --- method + spice ---

    pub(crate) fn cooking_processes(
        &self,
        methods: &[&Method],
        spices: &[&Spice],
    ) -> Vec<CookingProcess> {
        let mut processes = Vec::new();
        for method in methods {
            for spice in spices {
                processes.push(self.cooking_process(method, spice));
            }
        }
        processes
    }

    fn cooking_process(&self, method: &Method, spice: &Spice) -> CookingProcess {
        let (m, s) = (&method.name, &spice.name);
        let title = format!("{m} + {s}");
        match self.style {
            TextStyle::Brief => CookingProcess {
                title,
                temperature_effect: brief_temperature_effect(method, spice),
                chemical_changes: format!(
                    "Во время {m} происходят химические изменения в {s}, которые усиливают ароматические свойства."
                ),
                aroma_development: format!(
                    "{m} способствует постепенному развитию аромата {s} в процессе приготовления."
                ),
                optimal_timing: brief_timing(method, spice),
                technique_tips: format!(
                    "Во время {m} рекомендуем предварительно активировать {s} для усиления аромата."
                ),
            },
            TextStyle::Detailed => CookingProcess {
                title,
                temperature_effect: detailed::temperature_effect(method, spice),
                chemical_changes: detailed::chemical_changes(method),
                aroma_development: detailed::aroma_development(method, spice),
                optimal_timing: detailed::optimal_timing(spice),
                technique_tips: detailed::technique_tips(method),
            },
        }
    }

    // --- spice + spice ---

    pub(crate) fn chemical_reactions(&self, spices: &[&Spice]) -> Vec<ChemicalReaction> {
        let mut reactions = Vec::new();
        for (i, a) in spices.iter().enumerate() {
            for b in &spices[i + 1..] {
                reactions.push(chemical_reaction(a, b));
            }
        }
        reactions
    }

    // --- recommendations ---

    pub(crate) fn recommendations(
        &self,
        methods: &[&Method],
        spices: &[&Spice],
    ) -> Vec<Recommendation> {
        let mut out = Vec::new();
        if spices.is_empty() {
            return out;
        }

        if let Some(profile) = mixture::identify(spices) {
            out.push(Recommendation {
                kind: RecommendationKind::Mixture,
                title: format!("Смесь специй: {}", profile.name),
                content: format!("{}. {}", profile.origin, profile.synergy_explanation),
                priority: Priority::High,
            });
        }

        let intense = intense_pairs(spices);
        if !intense.is_empty() {
            out.push(Recommendation {
                kind: RecommendationKind::Warning,
                title: "Потенциальные конфликты".to_string(),
                content: format!("Осторожно с сочетанием: {}", intense.join(", ")),
                priority: Priority::High,
            });
        }

        if !methods.is_empty() {
            let advice: Vec<String> = spices
                .iter()
                .map(|s| {
                    let when = match s.intensity() {
                        i if i > 7 => "добавлять в конце приготовления",
                        i if i < 3 => "добавлять в начале приготовления",
                        _ => "добавлять в середине процесса",
                    };
                    format!("{} - {}", s.name, when)
                })
                .collect();
            out.push(Recommendation {
                kind: RecommendationKind::Timing,
                title: "Рекомендации по времени".to_string(),
                content: advice.join("; "),
                priority: Priority::Medium,
            });
        }
        out
    }
}

fn brief_temperature_effect(method: &Method, spice: &Spice) -> String {
    let (m, s) = (&method.name, &spice.name);
    let temperature = method.temperature.unwrap_or(100.0);
    if temperature > 180.0 {
        format!("Высокая температура {m} может разрушить летучие соединения {s}.")
    } else if temperature < 60.0 {
        format!("Низкая температура {m} сохранит ароматические свойства {s}.")
    } else {
        format!("Температура {m} оптимальна для аромата {s}.")
    }
}

fn brief_timing(method: &Method, spice: &Spice) -> String {
    let (m, s) = (&method.name, &spice.name);
    match spice.intensity() {
        i if i > 7 => format!("Добавляйте {s} в конце {m} чтобы избежать горечи."),
        i if i < 3 => format!("Добавляйте {s} в начале {m} для лучшего аромата."),
        _ => format!("Добавляйте {s} в середине {m}."),
    }
}

/// "a + b" for every pair whose combined intensity is too high.
fn intense_pairs(spices: &[&Spice]) -> Vec<String> {
    let mut pairs = Vec::new();
    for (i, a) in spices.iter().enumerate() {
        for b in &spices[i + 1..] {
            if u16::from(a.intensity()) + u16::from(b.intensity()) > INTENSE_PAIR_THRESHOLD {
                pairs.push(format!("{} + {}", a.name, b.name));
            }
        }
    }
    pairs
}

fn chemical_reaction(a: &Spice, b: &Spice) -> ChemicalReaction {
    let ca = a.compounds();
    let cb = b.compounds();

    let common: Vec<String> = ca
        .iter()
        .filter(|c| cb.contains(c))
        .map(|c| c.to_string())
        .collect();
    let synergies = synergy_pairs(&ca, &cb);
    let molecular_explanation = molecular_explanation(&common, &synergies, a, b);
    let reaction_type = ReactionType::classify(a.intensity(), b.intensity());

    ChemicalReaction {
        title: format!("Химическое взаимодействие: {} + {}", a.name, b.name),
        temperature_range: temperature_range(ca.iter().chain(&cb).copied()),
        reaction_type,
        reaction_label: reaction_type.label().to_string(),
        flavor_result: flavor_result(a, b),
        common_compounds: common,
        synergy_compounds: synergies,
        molecular_explanation,
    }
}

/// Pairs where both compounds are in the reference table and the first lists
/// the second as a synergy partner.
fn synergy_pairs(ca: &[&str], cb: &[&str]) -> Vec<SynergyPair> {
    let mut pairs = Vec::new();
    for c1 in ca {
        let Some(info) = compounds::lookup(c1) else {
            continue;
        };
        for c2 in cb {
            if compounds::lookup(c2).is_some() && info.synergies.contains(c2) {
                pairs.push(SynergyPair {
                    compound1: c1.to_string(),
                    compound2: c2.to_string(),
                    effect: info.effects.to_string(),
                });
            }
        }
    }
    pairs
}

fn temperature_range<'a>(all: impl Iterator<Item = &'a str>) -> String {
    let temps: Vec<u32> = all.map(compounds::stability).collect();
    let (Some(&min), Some(&max)) = (temps.iter().min(), temps.iter().max()) else {
        return "60-180°C".to_string();
    };
    if min == max {
        format!("Оптимальная температура: до {min}°C для сохранения ароматических свойств")
    } else {
        format!(
            "Температурный диапазон: {}-{}°C для максимального сохранения",
            min.saturating_sub(20).max(60),
            min
        )
    }
}

fn flavor_result(a: &Spice, b: &Spice) -> String {
    let mut combined: Vec<&str> = Vec::new();
    for taste in a.taste_profile.iter().chain(&b.taste_profile) {
        if !combined.contains(&taste.as_str()) {
            combined.push(taste);
        }
    }
    if combined.is_empty() {
        return format!(
            "Сочетание {} и {} создает многослойный профиль",
            a.name, b.name
        );
    }

    let common: Vec<&str> = a
        .taste_profile
        .iter()
        .filter(|t| b.taste_profile.contains(t))
        .map(String::as_str)
        .collect();
    if common.is_empty() {
        format!(
            "Результирующий вкус: {} - дополняющее сочетание",
            combined.join(", ")
        )
    } else {
        format!(
            "Результирующий вкус: {} с особым усилением ({})",
            combined.join(", "),
            common.join(", ")
        )
    }
}

fn molecular_explanation(
    common: &[String],
    synergies: &[SynergyPair],
    a: &Spice,
    b: &Spice,
) -> String {
    let mut parts = Vec::new();
    if !common.is_empty() {
        parts.push(format!(
            "Общие соединения ({}) создают резонансный эффект.",
            common.join(", ")
        ));
    }
    if !synergies.is_empty() {
        let names: Vec<String> = synergies
            .iter()
            .map(|s| format!("{}+{}", s.compound1, s.compound2))
            .collect();
        parts.push(format!(
            "Синергетические пары ({}) создают новые ароматические соединения.",
            names.join(", ")
        ));
    }
    if !parts.is_empty() {
        return parts.join(" ");
    }

    let (ca, cb) = (a.compounds(), b.compounds());
    if ca.is_empty() || cb.is_empty() {
        return format!(
            "Молекулярные взаимодействия между {} и {} создают уникальный профиль.",
            a.name, b.name
        );
    }
    let head = |c: &[&str]| c.iter().take(2).copied().collect::<Vec<_>>().join(", ");
    format!(
        "Химические соединения {} ({}) взаимодействуют с соединениями {} ({}), создавая сложный профиль.",
        a.name,
        head(&ca),
        b.name,
        head(&cb)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn analyzer(style: TextStyle) -> CompatibilityAnalyzer {
        CompatibilityAnalyzer::new(Arc::new(Catalog::builtin().unwrap()), style)
    }

    fn select(pairs: &[(Category, ItemId)]) -> Selection {
        let mut selection = Selection::default();
        for &(c, id) in pairs {
            selection.insert(c, id);
        }
        selection
    }

    #[test]
    fn empty_selection_has_nothing_to_say() {
        let analysis = analyzer(TextStyle::Brief).analyze_selection(&Selection::default());
        assert!(analysis.is_empty());
    }

    #[test]
    fn product_spice_notes_follow_product_lists() {
        // Говядина: Тимьян compatible, Ваниль incompatible, Базилик neither.
        let analysis = analyzer(TextStyle::Brief).analyze_selection(&select(&[
            (Category::Products, 1),
            (Category::Spices, 1),
            (Category::Spices, 3),
            (Category::Spices, 17),
        ]));
        let titles: Vec<&str> = analysis.compatibility.iter().map(|n| n.title()).collect();
        assert_eq!(titles, vec!["Тимьян + Говядина", "Несовместимость: Ваниль + Говядина"]);
        match &analysis.compatibility[1] {
            CompatibilityNote::Incompatible { recommendation, .. } => assert_eq!(
                recommendation,
                "Рекомендуем использовать более мягкие специи или уменьшить количество Ваниль."
            ),
            other => panic!("unexpected note: {other:?}"),
        }
    }

    #[test]
    fn detailed_style_uses_category_prose() {
        let analysis = analyzer(TextStyle::Detailed).analyze_selection(&select(&[
            (Category::Products, 1),
            (Category::Spices, 17),
        ]));
        match &analysis.compatibility[0] {
            CompatibilityNote::Incompatible { recommendation, .. } => assert_eq!(
                recommendation,
                "Рекомендуем заменить на черный перец, тимьян, розмарин"
            ),
            other => panic!("unexpected note: {other:?}"),
        }
    }

    #[test]
    fn cooking_processes_cover_every_method_spice_pair() {
        let analysis = analyzer(TextStyle::Brief).analyze_selection(&select(&[
            (Category::Methods, 5),
            (Category::Methods, 6),
            (Category::Spices, 10),
            (Category::Spices, 16),
        ]));
        assert_eq!(analysis.cooking_processes.len(), 4);
        let grill_clove = &analysis.cooking_processes[0];
        assert_eq!(grill_clove.title, "Гриль + Гвоздика");
        assert_eq!(
            grill_clove.temperature_effect,
            "Высокая температура Гриль может разрушить летучие соединения Гвоздика."
        );
        assert_eq!(
            grill_clove.optimal_timing,
            "Добавляйте Гвоздика в конце Гриль чтобы избежать горечи."
        );
        let smoke_dill = &analysis.cooking_processes[3];
        assert_eq!(
            smoke_dill.temperature_effect,
            "Температура Копчение оптимальна для аромата Укроп."
        );
    }

    #[test]
    fn chemical_reaction_for_oregano_and_thyme() {
        let analysis = analyzer(TextStyle::Brief)
            .analyze_selection(&select(&[(Category::Spices, 3), (Category::Spices, 2)]));
        assert_eq!(analysis.chemical_reactions.len(), 1);
        let reaction = &analysis.chemical_reactions[0];
        assert_eq!(reaction.title, "Химическое взаимодействие: Орегано + Тимьян");
        assert_eq!(reaction.common_compounds, vec!["карвакрол", "тимол"]);
        assert_eq!(reaction.reaction_type, ReactionType::Balanced);
        // розмариновая кислота is unknown to the compound table and counts as 150.
        assert_eq!(
            reaction.temperature_range,
            "Температурный диапазон: 130-150°C для максимального сохранения"
        );
        assert_eq!(
            reaction.flavor_result,
            "Результирующий вкус: пряный, горьковатый, земляной с особым усилением (пряный)"
        );
        let synergy: Vec<(&str, &str)> = reaction
            .synergy_compounds
            .iter()
            .map(|s| (s.compound1.as_str(), s.compound2.as_str()))
            .collect();
        assert_eq!(synergy, vec![("карвакрол", "тимол"), ("тимол", "карвакрол")]);
        assert!(reaction
            .molecular_explanation
            .starts_with("Общие соединения (карвакрол, тимол) создают резонансный эффект."));
    }

    #[test]
    fn reaction_without_compounds_uses_default_range() {
        let catalog = Catalog::from_json(
            "[]",
            "[]",
            r#"[{"id": 1, "name": "А", "intensity": 2}, {"id": 2, "name": "Б", "intensity": 3}]"#,
        )
        .unwrap();
        let analyzer = CompatibilityAnalyzer::new(Arc::new(catalog), TextStyle::Brief);
        let analysis =
            analyzer.analyze_selection(&select(&[(Category::Spices, 1), (Category::Spices, 2)]));
        let reaction = &analysis.chemical_reactions[0];
        assert_eq!(reaction.temperature_range, "60-180°C");
        assert_eq!(reaction.reaction_type, ReactionType::Delicate);
        assert_eq!(
            reaction.flavor_result,
            "Сочетание А и Б создает многослойный профиль"
        );
        assert_eq!(
            reaction.molecular_explanation,
            "Молекулярные взаимодействия между А и Б создают уникальный профиль."
        );
    }

    #[test]
    fn recommendations_flag_mixtures_intensity_and_timing() {
        // Гвоздика (9) + Красный перец (9) + Укроп (3), cooked on the grill.
        let analysis = analyzer(TextStyle::Brief).analyze_selection(&select(&[
            (Category::Methods, 5),
            (Category::Spices, 10),
            (Category::Spices, 15),
            (Category::Spices, 16),
        ]));
        let kinds: Vec<RecommendationKind> =
            analysis.recommendations.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Mixture,
                RecommendationKind::Warning,
                RecommendationKind::Timing
            ]
        );
        assert_eq!(
            analysis.recommendations[0].title,
            "Смесь специй: Авторская смесь специй"
        );
        assert_eq!(
            analysis.recommendations[1].content,
            "Осторожно с сочетанием: Гвоздика + Красный перец"
        );
        assert_eq!(
            analysis.recommendations[2].content,
            "Гвоздика - добавлять в конце приготовления; \
             Красный перец - добавлять в конце приготовления; \
             Укроп - добавлять в середине процесса"
        );
        assert_eq!(analysis.recommendations[2].priority, Priority::Medium);
    }

    #[test]
    fn permutations_share_one_cache_entry() {
        let analyzer = analyzer(TextStyle::Brief);
        let a = analyzer.analyze_selection(&select(&[
            (Category::Spices, 6),
            (Category::Spices, 1),
            (Category::Products, 3),
        ]));
        let b = analyzer.analyze_selection(&select(&[
            (Category::Products, 3),
            (Category::Spices, 1),
            (Category::Spices, 6),
        ]));
        assert_eq!(a, b);
        assert_eq!(analyzer.cached(), 1);

        analyzer.clear_cache();
        assert_eq!(analyzer.cached(), 0);
    }

    #[test]
    fn cache_evicts_least_recently_used_selection() {
        let analyzer = CompatibilityAnalyzer::with_cache_capacity(
            Arc::new(Catalog::builtin().unwrap()),
            TextStyle::Brief,
            NonZeroUsize::new(2).unwrap(),
        );
        let basil = select(&[(Category::Spices, 1)]);
        let thyme = select(&[(Category::Spices, 3)]);
        let dill = select(&[(Category::Spices, 16)]);

        analyzer.analyze_selection(&basil);
        analyzer.analyze_selection(&thyme);
        analyzer.analyze_selection(&basil);
        analyzer.analyze_selection(&dill);

        assert_eq!(analyzer.cached(), 2);
        assert!(analyzer.is_cached(&basil));
        assert!(!analyzer.is_cached(&thyme));
        assert!(analyzer.is_cached(&dill));
    }
}
