use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{Catalog, Method, Product, Spice};
use crate::selection::Selection;
use crate::storage::TextStyle;

use super::compatibility::{
    ChemicalReaction, CompatibilityAnalyzer, CompatibilityNote, CookingProcess, Recommendation,
    SelectionAnalysis,
};
use super::mixture::{self, MixtureAnalysis};
use super::science::{self, ScientificBasis};

const EMPTY_TITLE: &str = "Анализ сочетаний";
const EMPTY_DESCRIPTION: &str = "Выберите продукты, методы приготовления и специи для получения детального анализа их совместимости и взаимодействий.";

/// Flavor keys in tie-break order.
const FLAVOR_KEYS: [&str; 10] = [
    "sweet", "sour", "bitter", "salty", "umami", "spicy", "aromatic", "earthy", "citrus", "herbal",
];

/// Spice groups that reinforce each other when two or more members are present.
const SYNERGY_GROUPS: &[(&str, &[&str])] = &[
    ("теплые", &["корица", "гвоздика", "мускатный орех", "кардамон"]),
    ("цитрусовые", &["лимон", "лайм", "апельсин", "бергамот"]),
    ("острые", &["перец", "чили", "имбирь", "васаби"]),
    ("травяные", &["базилик", "орегано", "тимьян", "розмарин"]),
];

pub fn flavor_label(key: &str) -> &str {
    match key {
        "sweet" => "сладкий",
        "sour" => "кислый",
        "bitter" => "горький",
        "salty" => "соленый",
        "umami" => "умами",
        "spicy" => "острый",
        "aromatic" => "ароматный",
        "earthy" => "земляной",
        "citrus" => "цитрусовый",
        "herbal" => "травяной",
        other => other,
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    None,
    Simple,
    Medium,
    Complex,
    Expert,
}

impl Complexity {
    pub fn label(self) -> &'static str {
        match self {
            Complexity::None => "Нет",
            Complexity::Simple => "Простая",
            Complexity::Medium => "Средняя",
            Complexity::Complex => "Сложная",
            Complexity::Expert => "Экспертная",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlavorBalance {
    Neutral,
    Unbalanced,
    Complex,
    Balanced,
    Simple,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlavorProfile {
    pub dominant: Vec<String>,
    pub secondary: Vec<String>,
    pub balance: FlavorBalance,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    Mediterranean,
    Asian,
    Indian,
    Mexican,
    French,
}

impl Cuisine {
    const INDICATORS: [(Cuisine, &'static [&'static str]); 5] = [
        (Cuisine::Mediterranean, &["базилик", "орегано", "тимьян", "розмарин"]),
        (Cuisine::Asian, &["имбирь", "чеснок", "соевый соус", "кунжут"]),
        (Cuisine::Indian, &["куркума", "кориандр", "кумин", "кардамон"]),
        (Cuisine::Mexican, &["чили", "кумин", "кориандр", "лайм"]),
        (Cuisine::French, &["тимьян", "лавровый лист", "эстрагон", "петрушка"]),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Cuisine::Mediterranean => "средиземноморская",
            Cuisine::Asian => "азиатская",
            Cuisine::Indian => "индийская",
            Cuisine::Mexican => "мексиканская",
            Cuisine::French => "французская",
        }
    }

    /// Genitive form, as in "для ... кухни".
    pub fn genitive(self) -> &'static str {
        match self {
            Cuisine::Mediterranean => "средиземноморской",
            Cuisine::Asian => "азиатской",
            Cuisine::Indian => "индийской",
            Cuisine::Mexican => "мексиканской",
            Cuisine::French => "французской",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    const LEVELS: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    /// 1-based level, saturating at the hardest.
    fn from_level(level: u32) -> Self {
        let index = (level.max(1) - 1) as usize;
        Self::LEVELS[index.min(Self::LEVELS.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "очень легко",
            Difficulty::Easy => "легко",
            Difficulty::Medium => "средне",
            Difficulty::Hard => "сложно",
            Difficulty::VeryHard => "очень сложно",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Overview {
    pub title: String,
    pub description: String,
    pub complexity: Complexity,
    pub complexity_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor_profile: Option<FlavorProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Cuisine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompleteAnalysis {
    pub overview: Overview,
    pub compatibility: Vec<CompatibilityNote>,
    pub spice_mixture: Option<MixtureAnalysis>,
    pub cooking_processes: Vec<CookingProcess>,
    pub chemical_reactions: Vec<ChemicalReaction>,
    pub recommendations: Vec<Recommendation>,
    pub scientific_basis: Option<ScientificBasis>,
}

/// The explanation panel: pairwise sections plus the scientific basis, which
/// has content for a single spice too.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Explanation {
    #[serde(flatten)]
    pub analysis: SelectionAnalysis,
    pub scientific_basis: Option<ScientificBasis>,
}

/// Everything there is to say about a selection, in one report.
pub struct ComprehensiveAnalyzer {
    compatibility: CompatibilityAnalyzer,
}

impl ComprehensiveAnalyzer {
    pub fn new(catalog: Arc<Catalog>, style: TextStyle) -> Self {
        ComprehensiveAnalyzer {
            compatibility: CompatibilityAnalyzer::new(catalog, style),
        }
    }

    pub fn compatibility(&self) -> &CompatibilityAnalyzer {
        &self.compatibility
    }

    /// `None` until the selection holds a spice.
    pub fn explain(&self, selection: &Selection) -> Option<Explanation> {
        if !selection.should_explain() {
            return None;
        }
        let sorted = selection.sorted();
        let methods = self.compatibility.resolve_methods(&sorted.selected_methods);
        let spices = self.compatibility.resolve_spices(&sorted.selected_spices);
        Some(Explanation {
            analysis: self.compatibility.analyze_selection(&sorted),
            scientific_basis: science::scientific_basis(&methods, &spices),
        })
    }

    pub fn complete_analysis(&self, selection: &Selection) -> CompleteAnalysis {
        let sorted = selection.sorted();
        let products = self.compatibility.resolve_products(&sorted.selected_products);
        let methods = self.compatibility.resolve_methods(&sorted.selected_methods);
        let spices = self.compatibility.resolve_spices(&sorted.selected_spices);

        let analysis = self.compatibility.analyze_selection(&sorted);
        let spice_mixture = if sorted.selected_spices.len() >= 2 {
            mixture::analyze(&sorted.selected_spices, self.compatibility.catalog())
        } else {
            None
        };

        CompleteAnalysis {
            overview: overview(&products, &methods, &spices),
            compatibility: analysis.compatibility,
            spice_mixture,
            cooking_processes: analysis.cooking_processes,
            chemical_reactions: analysis.chemical_reactions,
            recommendations: analysis.recommendations,
            scientific_basis: science::scientific_basis(&methods, &spices),
        }
    }
}

pub fn overview(products: &[&Product], methods: &[&Method], spices: &[&Spice]) -> Overview {
    if products.is_empty() && methods.is_empty() && spices.is_empty() {
        return Overview {
            title: EMPTY_TITLE.to_string(),
            description: EMPTY_DESCRIPTION.to_string(),
            complexity: Complexity::None,
            complexity_label: Complexity::None.label().to_string(),
            flavor_profile: None,
            cuisine: None,
            cuisine_label: None,
            estimated_minutes: None,
            difficulty: None,
            difficulty_label: None,
        };
    }

    let flavor = flavor_profile(spices);
    let cuisine = cuisine(spices);
    let complexity = complexity(products, methods, spices);
    let difficulty = difficulty(methods, spices);
    Overview {
        title: title(products, methods, spices),
        description: description(methods, spices, &flavor, cuisine),
        complexity,
        complexity_label: complexity.label().to_string(),
        flavor_profile: Some(flavor),
        cuisine,
        cuisine_label: cuisine.map(|c| c.label().to_string()),
        estimated_minutes: estimated_minutes(methods, spices),
        difficulty: Some(difficulty),
        difficulty_label: Some(difficulty.label().to_string()),
    }
}

fn title(products: &[&Product], methods: &[&Method], spices: &[&Spice]) -> String {
    let mut parts = Vec::new();
    if !products.is_empty() {
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        parts.push(names.join(", "));
    }
    if !methods.is_empty() {
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        parts.push(format!("приготовленные методом: {}", names.join(", ")));
    }
    if !spices.is_empty() {
        let names: Vec<&str> = spices.iter().take(3).map(|s| s.name.as_str()).collect();
        let more = if spices.len() > 3 {
            format!(" и еще {}", spices.len() - 3)
        } else {
            String::new()
        };
        parts.push(format!("со специями: {}{}", names.join(", "), more));
    }
    parts.join(" ")
}

fn description(
    methods: &[&Method],
    spices: &[&Spice],
    flavor: &FlavorProfile,
    cuisine: Option<Cuisine>,
) -> String {
    let mut parts = Vec::new();
    if let Some(cuisine) = cuisine {
        parts.push(format!(
            "Это сочетание характерно для {} кухни.",
            cuisine.genitive()
        ));
    }
    if !flavor.dominant.is_empty() {
        let labels: Vec<&str> = flavor.dominant.iter().map(|k| flavor_label(k)).collect();
        parts.push(format!("Доминирующие вкусы: {}.", labels.join(", ")));
    }
    if spices.len() >= 2 {
        let synergies = flavor_synergies(spices);
        if !synergies.is_empty() {
            parts.push(format!(
                "Специи создают синергетические эффекты: {}.",
                synergies.join(", ")
            ));
        }
    }
    if let Some(note) = method_spice_interaction(methods, spices) {
        parts.push(note.to_string());
    }

    if parts.is_empty() {
        EMPTY_DESCRIPTION.to_string()
    } else {
        parts.join(" ")
    }
}

pub fn complexity(products: &[&Product], methods: &[&Method], spices: &[&Spice]) -> Complexity {
    let strong_spices = spices
        .iter()
        .filter(|s| s.intensity.unwrap_or(0) >= 7)
        .count();
    let hard_methods = methods
        .iter()
        .filter(|m| m.difficulty.unwrap_or(0) >= 3)
        .count();

    let score = products.len() as f64
        + methods.len() as f64 * 2.0
        + spices.len() as f64 * 1.5
        + strong_spices as f64 * 2.0
        + hard_methods as f64 * 3.0;

    if score <= 3.0 {
        Complexity::Simple
    } else if score <= 8.0 {
        Complexity::Medium
    } else if score <= 15.0 {
        Complexity::Complex
    } else {
        Complexity::Expert
    }
}

/// Flavor keys weighted by spice intensity (1 when unset).
pub fn flavor_profile(spices: &[&Spice]) -> FlavorProfile {
    let mut scores: Vec<(&str, u32)> = FLAVOR_KEYS.iter().map(|k| (*k, 0)).collect();
    for spice in spices {
        let weight = u32::from(spice.intensity.filter(|v| *v > 0).unwrap_or(1));
        for key in &spice.profile {
            if let Some((_, score)) = scores.iter_mut().find(|(k, _)| *k == key.as_str()) {
                *score += weight;
            }
        }
    }
    scores.retain(|(_, score)| *score > 0);
    scores.sort_by(|a, b| b.1.cmp(&a.1));

    let balance = match scores.as_slice() {
        [] => FlavorBalance::Neutral,
        [(_, top), rest @ ..] => {
            let second = rest.first().map_or(0, |(_, s)| *s);
            if *top > second * 2 {
                FlavorBalance::Unbalanced
            } else if scores.len() >= 4 {
                FlavorBalance::Complex
            } else if scores.len() >= 2 {
                FlavorBalance::Balanced
            } else {
                FlavorBalance::Simple
            }
        }
    };

    let keys: Vec<String> = scores.iter().map(|(k, _)| k.to_string()).collect();
    FlavorProfile {
        dominant: keys.iter().take(3).cloned().collect(),
        secondary: keys.iter().skip(3).take(3).cloned().collect(),
        balance,
    }
}

/// Best-matching cuisine; needs at least two indicator spices.
pub fn cuisine(spices: &[&Spice]) -> Option<Cuisine> {
    let names: Vec<String> = spices.iter().map(|s| s.name.to_lowercase()).collect();
    let mut best = None;
    let mut best_score = 0;
    for (cuisine, indicators) in Cuisine::INDICATORS {
        let matches = indicators
            .iter()
            .filter(|indicator| names.iter().any(|name| name.contains(*indicator)))
            .count();
        if matches > best_score {
            best_score = matches;
            best = Some(cuisine);
        }
    }
    if best_score >= 2 {
        best
    } else {
        None
    }
}

fn flavor_synergies(spices: &[&Spice]) -> Vec<String> {
    let names: Vec<String> = spices.iter().map(|s| s.name.to_lowercase()).collect();
    SYNERGY_GROUPS
        .iter()
        .filter(|(_, members)| {
            members
                .iter()
                .filter(|member| names.iter().any(|name| name.contains(*member)))
                .count()
                >= 2
        })
        .map(|(group, _)| format!("{group} специи создают гармоничное сочетание"))
        .collect()
}

fn method_spice_interaction(methods: &[&Method], spices: &[&Spice]) -> Option<&'static str> {
    if methods.is_empty() || spices.is_empty() {
        return None;
    }
    let high_heat = methods
        .iter()
        .any(|m| m.temperature.is_some_and(|t| t > 150.0));
    let delicate = spices.iter().any(|s| s.heat_sensitive);
    Some(if high_heat && delicate {
        "Некоторые специи могут потерять аромат при высокой температуре - добавляйте их в конце приготовления."
    } else {
        "Выбранные методы приготовления хорошо сочетаются со специями."
    })
}

/// Sum of method times plus two minutes per spice; `None` without methods.
pub fn estimated_minutes(methods: &[&Method], spices: &[&Spice]) -> Option<u32> {
    if methods.is_empty() {
        return None;
    }
    let cooking = methods
        .iter()
        .filter_map(|m| m.time)
        .fold(0, u32::saturating_add);
    let spice_minutes = u32::try_from(spices.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(2);
    Some(cooking.saturating_add(spice_minutes))
}

pub fn difficulty(methods: &[&Method], spices: &[&Spice]) -> Difficulty {
    let mut level = methods
        .iter()
        .filter_map(|m| m.difficulty)
        .fold(1, u32::max);
    if spices.len() > 5 {
        level = level.saturating_add(1);
    }
    if spices.iter().any(|s| s.intensity.unwrap_or(0) >= 8) {
        level = level.saturating_add(1);
    }
    Difficulty::from_level(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn analyzer() -> ComprehensiveAnalyzer {
        ComprehensiveAnalyzer::new(Arc::new(Catalog::builtin().unwrap()), TextStyle::Brief)
    }

    fn select(pairs: &[(Category, u32)]) -> Selection {
        let mut selection = Selection::default();
        for &(c, id) in pairs {
            selection.insert(c, id);
        }
        selection
    }

    #[test]
    fn empty_selection_gets_placeholder_overview() {
        let report = analyzer().complete_analysis(&Selection::default());
        assert_eq!(report.overview.title, EMPTY_TITLE);
        assert_eq!(report.overview.complexity, Complexity::None);
        assert_eq!(report.overview.difficulty, None);
        assert_eq!(report.spice_mixture, None);
        assert_eq!(report.scientific_basis, None);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn provencal_beef_overview() {
        let report = analyzer().complete_analysis(&select(&[
            (Category::Spices, 4),
            (Category::Products, 1),
            (Category::Spices, 2),
            (Category::Methods, 1),
            (Category::Spices, 3),
        ]));
        let overview = &report.overview;
        assert_eq!(
            overview.title,
            "Говядина приготовленные методом: Жарка со специями: Орегано, Тимьян, Розмарин"
        );
        assert_eq!(overview.complexity, Complexity::Complex);
        assert_eq!(overview.cuisine, Some(Cuisine::Mediterranean));
        assert_eq!(overview.estimated_minutes, Some(21));
        assert_eq!(overview.difficulty, Some(Difficulty::Easy));

        let flavor = overview.flavor_profile.as_ref().unwrap();
        assert_eq!(flavor.dominant, vec!["herbal", "aromatic", "bitter"]);
        assert_eq!(flavor.secondary, vec!["earthy"]);
        assert_eq!(flavor.balance, FlavorBalance::Unbalanced);

        assert_eq!(
            overview.description,
            "Это сочетание характерно для средиземноморской кухни. \
             Доминирующие вкусы: травяной, ароматный, горький. \
             Специи создают синергетические эффекты: травяные специи создают гармоничное сочетание. \
             Выбранные методы приготовления хорошо сочетаются со специями."
        );

        assert_eq!(report.spice_mixture.unwrap().mixture, "Прованские травы");
        assert!(report.scientific_basis.is_some());
        assert_eq!(report.cooking_processes.len(), 3);
        assert_eq!(report.chemical_reactions.len(), 3);
    }

    #[test]
    fn heat_sensitive_spices_on_the_grill_get_a_warning() {
        let report = analyzer()
            .complete_analysis(&select(&[(Category::Methods, 5), (Category::Spices, 1)]));
        assert!(report
            .overview
            .description
            .ends_with("добавляйте их в конце приготовления."));
        assert_eq!(report.overview.cuisine, None);
    }

    #[test]
    fn difficulty_rises_with_many_or_strong_spices() {
        let catalog = Catalog::builtin().unwrap();
        let smoke = catalog.method(6).unwrap();
        let spices: Vec<&Spice> = [1, 2, 3, 4, 5, 10]
            .iter()
            .map(|id| catalog.spice(*id).unwrap())
            .collect();
        assert_eq!(difficulty(&[smoke], &spices), Difficulty::VeryHard);
        assert_eq!(difficulty(&[], &spices[..2]), Difficulty::VeryEasy);
        assert_eq!(Difficulty::VeryHard.label(), "очень сложно");
    }

    #[test]
    fn products_alone_are_simple_without_time_estimate() {
        let report = analyzer().complete_analysis(&select(&[(Category::Products, 2)]));
        assert_eq!(report.overview.title, "Курица");
        assert_eq!(report.overview.complexity, Complexity::Simple);
        assert_eq!(report.overview.estimated_minutes, None);
        assert_eq!(report.overview.description, EMPTY_DESCRIPTION);
        let flavor = report.overview.flavor_profile.unwrap();
        assert_eq!(flavor.balance, FlavorBalance::Neutral);
    }

    #[test]
    fn cuisine_needs_two_indicators() {
        fn pick<'a>(catalog: &'a Catalog, ids: &[u32]) -> Vec<&'a Spice> {
            ids.iter().map(|id| catalog.spice(*id).unwrap()).collect()
        }
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(cuisine(&pick(&catalog, &[3])), None);
        // Кумин + Кориандр tie between Indian and Mexican; the first listed wins.
        assert_eq!(cuisine(&pick(&catalog, &[5, 6])), Some(Cuisine::Indian));
    }

    #[test]
    fn serialized_overview_and_reactions_carry_russian_labels() {
        // Гвоздика + Красный перец on Гриль
        let report = analyzer().complete_analysis(&select(&[
            (Category::Methods, 5),
            (Category::Spices, 10),
            (Category::Spices, 15),
        ]));
        let json = serde_json::to_value(&report).unwrap();

        let overview = &json["overview"];
        assert_eq!(overview["complexity"], "complex");
        assert_eq!(overview["complexity_label"], "Сложная");
        assert_eq!(overview["difficulty"], "hard");
        assert_eq!(overview["difficulty_label"], "сложно");
        assert!(overview.get("cuisine_label").is_none());

        let reaction = &json["chemical_reactions"][0];
        assert_eq!(reaction["reaction_type"], "intense");
        assert_eq!(reaction["reaction_label"], "интенсивное взаимодействие");

        let herbs = analyzer().complete_analysis(&select(&[(Category::Spices, 1), (Category::Spices, 2)]));
        let json = serde_json::to_value(&herbs.overview).unwrap();
        assert_eq!(json["cuisine"], "mediterranean");
        assert_eq!(json["cuisine_label"], "средиземноморская");
    }

    #[test]
    fn estimated_minutes_saturates() {
        let catalog = Catalog::from_json(
            "[]",
            r#"[{"id": 1, "name": "Томление", "time": 4294967295}]"#,
            r#"[{"id": 1, "name": "Базилик"}]"#,
        )
        .unwrap();
        let slow = catalog.method(1).unwrap();
        let basil = catalog.spice(1).unwrap();
        assert_eq!(estimated_minutes(&[slow, slow], &[basil]), Some(u32::MAX));
    }
}
