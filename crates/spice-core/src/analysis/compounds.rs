//! Reference table of aromatic compounds: properties, heat stability and known synergies.

pub struct CompoundInfo {
    pub name: &'static str,
    pub properties: &'static [&'static str],
    /// Temperature in °C above which the compound starts to break down.
    pub stable_up_to: u32,
    pub synergies: &'static [&'static str],
    pub effects: &'static str,
}

/// Stability assumed for compounds missing from [`COMPOUNDS`].
pub const DEFAULT_STABILITY: u32 = 150;

pub const COMPOUNDS: &[CompoundInfo] = &[
    CompoundInfo {
        name: "эвгенол",
        properties: &["антиоксидант", "антимикробный", "анестетик"],
        stable_up_to: 150,
        synergies: &["линалоол", "тимол"],
        effects: "придает гвоздичный аромат, усиливает вкус мяса",
    },
    CompoundInfo {
        name: "линалоол",
        properties: &["седативный", "антибактериальный", "ароматический"],
        stable_up_to: 180,
        synergies: &["эвгенол", "гераниол"],
        effects: "создает цветочные ноты, смягчает острые вкусы",
    },
    CompoundInfo {
        name: "тимол",
        properties: &["антисептический", "противогрибковый", "отхаркивающий"],
        stable_up_to: 200,
        synergies: &["карвакрол", "эвгенол"],
        effects: "усиливает пряный вкус, консервирует продукты",
    },
    CompoundInfo {
        name: "карвакрол",
        properties: &["антимикробный", "антиоксидант", "противовоспалительный"],
        stable_up_to: 190,
        synergies: &["тимол", "розмариновая кислота"],
        effects: "создает острый пряный вкус, улучшает пищеварение",
    },
    CompoundInfo {
        name: "камфора",
        properties: &["стимулирующий", "охлаждающий", "антисептический"],
        stable_up_to: 160,
        synergies: &["цинеол", "розмариновая кислота"],
        effects: "придает смолистый аромат, стимулирует аппетит",
    },
    CompoundInfo {
        name: "цинеол",
        properties: &["отхаркивающий", "противовоспалительный", "охлаждающий"],
        stable_up_to: 170,
        synergies: &["камфора", "туйон"],
        effects: "создает свежий ментоловый оттенок",
    },
    CompoundInfo {
        name: "куминальдегид",
        properties: &["пищеварительный", "ветрогонный", "антиспазматический"],
        stable_up_to: 180,
        synergies: &["лимонен", "карвон"],
        effects: "придает характерный земляной аромат кумина",
    },
    CompoundInfo {
        name: "анетол",
        properties: &["эстрогенный", "отхаркивающий", "ветрогонный"],
        stable_up_to: 160,
        synergies: &["фенхон", "лимонен"],
        effects: "создает сладкий анисовый вкус",
    },
];

pub fn lookup(name: &str) -> Option<&'static CompoundInfo> {
    COMPOUNDS.iter().find(|c| c.name == name)
}

pub fn stability(name: &str) -> u32 {
    lookup(name).map_or(DEFAULT_STABILITY, |c| c.stable_up_to)
}

/// Volatile oils treated as anti-inflammatory.
pub const ANTI_INFLAMMATORY: &[&str] = &["эвгенол", "куркумин", "гингерол"];
/// Volatile oils with antimicrobial, preserving action.
pub const PRESERVATIVES: &[&str] = &["тимол", "карвакрол", "эвгенол", "цинеол"];
/// Volatile oils that improve nutrient absorption.
pub const BIOAVAILABILITY_ENHANCERS: &[&str] = &["пиперин", "куркумин", "гингерол"];
