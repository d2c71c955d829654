//! Spice mixture recognition and scoring.
//!
//! A selection of spices is matched against a handful of classic blends. Three or
//! more spices that match none of them are described as a custom blend.

use serde::Serialize;
use std::collections::HashSet;

use crate::catalog::{Catalog, ItemId, Spice};

struct KnownMixture {
    name: &'static str,
    origin: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    synergy: &'static str,
    applications: &'static str,
    tips: &'static str,
}

const KNOWN_MIXTURES: &[KnownMixture] = &[
    KnownMixture {
        name: "Прованские травы",
        origin: "Франция, регион Прованс",
        required: &["тимьян", "розмарин", "орегано"],
        optional: &["базилик", "лаванда"],
        synergy: "Фенольные соединения тимьяна, розмарина и орегано создают гармоничный букет с антиоксидантными свойствами. Терпены усиливают друг друга, создавая характерный средиземноморский аромат.",
        applications: "жареное мясо, запеченные овощи, рататуй, гриль, маринады для баранины",
        tips: "Смешивайте в равных пропорциях. Добавляйте в начале приготовления для полного раскрытия аромата. Храните в герметичной таре.",
    },
    KnownMixture {
        name: "Итальянские травы",
        origin: "Италия",
        required: &["базилик", "орегано"],
        optional: &["тимьян", "розмарин", "майоран"],
        synergy: "Эвгенол базилика синергирует с карвакролом орегано, создавая классический итальянский профиль. Летучие масла взаимно усиливают ароматические свойства.",
        applications: "паста, пицца, томатные соусы, запеченная рыба, овощи на гриле",
        tips: "Базилик добавляйте в конце, остальные травы - в процессе готовки. Хорошо сочетается с оливковым маслом.",
    },
    KnownMixture {
        name: "Гарам масала",
        origin: "Индия",
        required: &["кориандр", "кумин", "кардамон"],
        optional: &["корица", "гвоздика", "черный перец"],
        synergy: "Терпеновые соединения кориандра и кумина создают основу, которую дополняют эфирные масла кардамона. Синергия создает сложный, многослойный вкус.",
        applications: "карри, тушеное мясо, рис, бобовые, маринады для курицы",
        tips: "Обжаривайте целые специи перед измельчением. Добавляйте в конце приготовления для сохранения аромата.",
    },
    KnownMixture {
        name: "Карри",
        origin: "Индия",
        required: &["куркума", "кориандр", "кумин"],
        optional: &["имбирь", "чеснок", "красный перец"],
        synergy: "Куркумин куркумы взаимодействует с пиперином, усиливая биодоступность. Терпены кориандра и кумина создают характерную основу карри.",
        applications: "овощные карри, курица, рис, чечевица, кокосовые соусы",
        tips: "Обжаривайте специи в масле перед добавлением других ингредиентов. Куркуму добавляйте осторожно - может горчить.",
    },
    KnownMixture {
        name: "Китайские пять специй",
        origin: "Китай",
        required: &["звездчатый анис", "корица", "фенхель"],
        optional: &["гвоздика", "сычуаньский перец"],
        synergy: "Анетол фенхеля и звездчатого аниса создает сладкую основу, которую балансируют пряные соединения корицы и гвоздики.",
        applications: "утка, свинина, жареные овощи, маринады, азиатские супы",
        tips: "Используйте умеренно - смесь очень ароматная. Хорошо подходит для маринадов и сухих натираний.",
    },
];

pub const CUSTOM_MIXTURE_NAME: &str = "Авторская смесь специй";

/// Minimum number of spices that counts as a custom blend.
const CUSTOM_MIN_SPICES: usize = 3;

/// Upper bound on [`interactions`] output.
const MAX_INTERACTIONS: usize = 5;

/// Taste pairs that complement each other across two spices.
const COMPLEMENTARY_TASTES: &[(&str, &str)] = &[
    ("сладкий", "пряный"),
    ("острый", "ароматный"),
    ("горький", "сладкий"),
    ("цитрусовый", "травяной"),
];

/// Taste notes that clash with the key taste.
fn clashing_tastes(taste: &str) -> &'static [&'static str] {
    match taste {
        "сладкий" => &["горький", "острый"],
        "горький" => &["сладкий"],
        "острый" => &["сладкий", "деликатный"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MixtureProfile {
    pub name: String,
    pub origin: String,
    /// `false` for a custom blend.
    pub known: bool,
    pub composition: String,
    pub synergy_explanation: String,
    pub chemical_interactions: String,
    pub flavor_profile: String,
    pub best_applications: String,
    pub preparation_tips: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConflictingPair {
    pub spice1: String,
    pub spice2: String,
    pub conflict_reason: String,
    pub chemical_clash: String,
    pub taste_interference: String,
    pub solution: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Interaction {
    pub spices: [String; 2],
    pub description: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MixtureAnalysis {
    pub mixture: String,
    pub description: String,
    /// 1..=10
    pub score: u8,
    pub interactions: Vec<Interaction>,
}

fn average_intensity(spices: &[&Spice]) -> f64 {
    if spices.is_empty() {
        return 0.0;
    }
    let total: u32 = spices.iter().map(|s| u32::from(s.intensity())).sum();
    f64::from(total) / spices.len() as f64
}

fn category_of(spice: &Spice) -> &str {
    spice.category.as_deref().unwrap_or("другие")
}

/// Distinct spice categories in first-seen order.
fn categories<'a>(spices: &[&'a Spice]) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for spice in spices {
        let category = category_of(spice);
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

/// Count occurrences while keeping first-seen order, then rank by count.
/// Ties keep their first-seen order.
fn ranked<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn find_known(spices: &[&Spice]) -> Option<&'static KnownMixture> {
    let names: Vec<String> = spices.iter().map(|s| s.name.to_lowercase()).collect();
    KNOWN_MIXTURES.iter().find(|mixture| {
        mixture.required.iter().all(|req| {
            names
                .iter()
                .any(|name| name.contains(req) || req.contains(name.as_str()))
        })
    })
}

/// Describe the blend formed by `spices`, if any.
pub fn identify(spices: &[&Spice]) -> Option<MixtureProfile> {
    if let Some(mixture) = find_known(spices) {
        return Some(MixtureProfile {
            name: mixture.name.to_string(),
            origin: mixture.origin.to_string(),
            known: true,
            composition: known_composition(spices, mixture),
            synergy_explanation: mixture.synergy.to_string(),
            chemical_interactions: shared_compounds(spices),
            flavor_profile: flavor_profile(spices),
            best_applications: mixture.applications.to_string(),
            preparation_tips: mixture.tips.to_string(),
        });
    }

    if spices.len() < CUSTOM_MIN_SPICES {
        return None;
    }
    Some(MixtureProfile {
        name: CUSTOM_MIXTURE_NAME.to_string(),
        origin: "Пользовательская комбинация".to_string(),
        known: false,
        composition: custom_composition(spices),
        synergy_explanation: custom_synergy(spices),
        chemical_interactions: shared_compounds(spices),
        flavor_profile: flavor_profile(spices),
        best_applications: custom_applications(spices),
        preparation_tips: custom_tips(spices),
    })
}

fn role_in_mixture<'a>(spice: &'a Spice, mixture: &KnownMixture) -> &'a str {
    let name = spice.name.to_lowercase();
    if mixture.required.iter().any(|req| name.contains(req)) {
        "основная"
    } else if mixture.optional.iter().any(|opt| name.contains(opt)) {
        "дополнительная"
    } else {
        spice.role_or_default()
    }
}

fn proportion(spice: &Spice) -> &'static str {
    match spice.intensity() {
        i if i > 7 => "минимально",
        i if i < 4 => "щедро",
        _ => "умеренно",
    }
}

fn known_composition(spices: &[&Spice], mixture: &KnownMixture) -> String {
    spices
        .iter()
        .map(|s| format!("{}: {} ({})", s.name, role_in_mixture(s, mixture), proportion(s)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn custom_composition(spices: &[&Spice]) -> String {
    let total: u32 = spices.iter().map(|s| u32::from(s.intensity())).sum();
    let parts: Vec<String> = spices
        .iter()
        .map(|s| {
            let share = (f64::from(s.intensity()) / f64::from(total) * 100.0).round();
            format!(
                "{}: {} специя ({}% от общей интенсивности)",
                s.name,
                s.role_or_default(),
                share
            )
        })
        .collect();
    format!(
        "Средняя интенсивность: {:.1}/10. Состав: {}",
        average_intensity(spices),
        parts.join("; ")
    )
}

fn custom_synergy(spices: &[&Spice]) -> String {
    let categories = categories(spices);
    match categories.as_slice() {
        [only] => format!(
            "Все специи из категории \"{only}\" - создают гармоничный, сбалансированный вкус с усилением характерных свойств категории."
        ),
        _ => format!(
            "Сочетание {} категорий специй создает сложный, многослойный вкусовой профиль с взаимным усилением ароматических соединений.",
            categories.len()
        ),
    }
}

/// Compounds (volatile oils and phenolics) that occur in more than one spice.
fn shared_compounds(spices: &[&Spice]) -> String {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for spice in spices {
        for compound in spice.volatile_oils().iter().chain(spice.phenolic_compounds()) {
            match groups.iter_mut().find(|(c, _)| *c == compound.as_str()) {
                Some((_, owners)) => owners.push(&spice.name),
                None => groups.push((compound, vec![&spice.name])),
            }
        }
    }

    let shared: Vec<String> = groups
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(compound, owners)| {
            format!(
                "{} ({}): синергетическое усиление ароматических свойств",
                compound,
                owners.join(", ")
            )
        })
        .collect();

    if shared.is_empty() {
        "Уникальные химические соединения каждой специи создают сложный ароматический букет"
            .to_string()
    } else {
        shared.join("; ")
    }
}

fn flavor_profile(spices: &[&Spice]) -> String {
    let dominant: Vec<String> = ranked(
        spices
            .iter()
            .flat_map(|s| s.taste_profile.iter().map(String::as_str)),
    )
    .into_iter()
    .take(3)
    .map(|(taste, count)| format!("{taste} ({count} специи)"))
    .collect();
    format!(
        "Доминирующие вкусы: {}. Общая интенсивность: {:.1}/10",
        dominant.join(", "),
        average_intensity(spices)
    )
}

fn custom_applications(spices: &[&Spice]) -> String {
    let best: Vec<&str> = ranked(
        spices
            .iter()
            .flat_map(|s| s.best_products.iter().map(String::as_str)),
    )
    .into_iter()
    .take(3)
    .map(|(product, _)| product)
    .collect();
    if best.is_empty() {
        "универсальное применение".to_string()
    } else {
        best.join(", ")
    }
}

fn custom_tips(spices: &[&Spice]) -> String {
    let roles: HashSet<&str> = spices.iter().map(|s| s.role_or_default()).collect();
    let mut tips = Vec::new();
    if roles.contains("базовая") {
        tips.push("Базовые специи добавляйте в начале приготовления");
    }
    if roles.contains("акцентная") {
        tips.push("Акцентные специи добавляйте в середине процесса");
    }
    if roles.contains("финишная") {
        tips.push("Финишные специи добавляйте в конце или при подаче");
    }
    if average_intensity(spices) > 6.0 {
        tips.push("Используйте умеренно - смесь имеет высокую интенсивность");
    }
    if tips.is_empty() {
        "Используйте согласно рецепту".to_string()
    } else {
        tips.join(". ")
    }
}

/// Pairs where the earlier spice lists the later one as incompatible.
pub fn conflicting_pairs(spices: &[&Spice]) -> Vec<ConflictingPair> {
    let mut pairs = Vec::new();
    for (i, a) in spices.iter().enumerate() {
        for b in &spices[i + 1..] {
            if a.refs.incompatible_spices.contains(&b.id) {
                pairs.push(ConflictingPair {
                    spice1: a.name.clone(),
                    spice2: b.name.clone(),
                    conflict_reason: conflict_reason(a, b),
                    chemical_clash: format!(
                        "Активные соединения {} могут подавлять или искажать ароматические свойства {}",
                        a.name, b.name
                    ),
                    taste_interference: taste_interference(a, b),
                    solution: format!(
                        "Используйте {} и {} в разных блюдах или уменьшите количество одной из специй",
                        a.name, b.name
                    ),
                });
            }
        }
    }
    pairs
}

fn conflict_reason(a: &Spice, b: &Spice) -> String {
    let (ia, ib) = (a.intensity(), b.intensity());
    if ia > 7 && ib > 7 {
        format!(
            "Обе специи имеют высокую интенсивность ({ia} и {ib}), что может создать дисбаланс вкуса"
        )
    } else {
        format!("{} и {} имеют конфликтующие вкусовые профили", a.name, b.name)
    }
}

fn taste_interference(a: &Spice, b: &Spice) -> String {
    for ta in &a.taste_profile {
        for tb in &b.taste_profile {
            if clashing_tastes(ta).contains(&tb.as_str()) {
                return format!("{ta} вкус {} конфликтует с {tb} вкусом {}", a.name, b.name);
            }
        }
    }
    "Вкусовые профили создают дисгармонию".to_string()
}

/// Score in 1..=10: 7, minus 2 per conflicting pair, adjusted for extreme
/// average intensity and for category variety.
pub fn compatibility_score(spices: &[&Spice]) -> u8 {
    let mut score: i32 = 7;
    score -= 2 * conflicting_pairs(spices).len() as i32;

    let average = average_intensity(spices);
    if average > 8.0 {
        score -= 1;
    }
    if average < 3.0 {
        score -= 1;
    }
    if categories(spices).len() > 1 {
        score += 1;
    }
    score.clamp(1, 10) as u8
}

fn interaction(a: &Spice, b: &Spice) -> Interaction {
    let spices = [a.name.clone(), b.name.clone()];
    let has = |spice: &Spice, taste: &str| spice.taste_profile.iter().any(|t| t == taste);

    let common: Vec<&str> = a
        .taste_profile
        .iter()
        .filter(|t| b.taste_profile.contains(t))
        .map(String::as_str)
        .collect();
    if !common.is_empty() {
        return Interaction {
            spices,
            description: format!(
                "Общие вкусовые ноты ({}) создают гармоничное сочетание",
                common.join(", ")
            ),
        };
    }

    for &(first, second) in COMPLEMENTARY_TASTES {
        let matched = if has(a, first) && has(b, second) {
            Some((first, second))
        } else if has(a, second) && has(b, first) {
            Some((second, first))
        } else {
            None
        };
        if let Some((ta, tb)) = matched {
            return Interaction {
                spices,
                description: format!("{ta} вкус {} дополняет {tb} ноты {}", a.name, b.name),
            };
        }
    }

    Interaction {
        spices,
        description: "Создают сложный многослойный вкусовой профиль".to_string(),
    }
}

/// Pairwise interaction notes, at most five.
pub fn interactions(spices: &[&Spice]) -> Vec<Interaction> {
    let mut out = Vec::new();
    for (i, a) in spices.iter().enumerate() {
        for b in &spices[i + 1..] {
            if out.len() == MAX_INTERACTIONS {
                return out;
            }
            out.push(interaction(a, b));
        }
    }
    out
}

/// Score and describe the blend formed by `spice_ids`.
///
/// Ids are analyzed in ascending order. Unknown ids are skipped.
pub fn analyze(spice_ids: &[ItemId], catalog: &Catalog) -> Option<MixtureAnalysis> {
    let mut ids = spice_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    let spices: Vec<&Spice> = ids.iter().filter_map(|id| catalog.spice(*id)).collect();
    if spices.len() < 2 {
        return None;
    }

    let profile = identify(&spices)?;
    Some(MixtureAnalysis {
        mixture: profile.name,
        description: profile.synergy_explanation,
        score: compatibility_score(&spices),
        interactions: interactions(&spices),
    })
}
