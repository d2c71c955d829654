//! Chemistry behind a selection: which compounds are present, how they
//! interact, what they do for nutrition and shelf life, and how each cooking
//! method extracts them.

use serde::Serialize;

use crate::catalog::{Method, Solubility, Spice};

use super::compounds;

/// Taste pairs that read as complementary chemistry.
const COMPLEMENTARY_TASTES: &[(&str, &str)] = &[
    ("сладкий", "горьковатый"),
    ("кислый", "сладкий"),
    ("острый", "охлаждающий"),
    ("земляной", "цитрусовый"),
    ("ароматный", "пряный"),
    ("смолистый", "свежий"),
];

/// Methods above this temperature (°C) boost preservation.
const PRESERVING_HEAT: f64 = 150.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompoundPresence {
    pub name: String,
    pub sources: Vec<String>,
    pub properties: Vec<String>,
    pub effects: Vec<String>,
    /// Present in more than one selected spice.
    pub synergy: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChemistryKind {
    Synergy,
    Complementary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlavorChemistry {
    pub spices: [String; 2],
    pub kind: ChemistryKind,
    /// Shared compounds for synergy, the matched taste pair otherwise.
    pub compounds: Vec<String>,
    pub effect: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NutritionKind {
    Antioxidant,
    AntiInflammatory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutritionalAspect {
    pub kind: NutritionKind,
    pub spices: Vec<String>,
    pub benefit: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Preservation {
    pub spices: Vec<String>,
    pub mechanism: String,
    /// 0..=100
    pub effectiveness: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bioavailability {
    pub enhancers: Vec<String>,
    pub mechanism: String,
    pub target_nutrients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SolventInteraction {
    pub spice: String,
    pub water: String,
    pub oil: String,
    pub alcohol: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MethodEffect {
    pub method: String,
    pub title: String,
    pub description: String,
    /// Spices that suit this kind of extraction.
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScientificBasis {
    pub chemical_compounds: Vec<CompoundPresence>,
    pub flavor_chemistry: Vec<FlavorChemistry>,
    pub nutritional_aspects: Vec<NutritionalAspect>,
    pub preservation: Option<Preservation>,
    pub bioavailability: Option<Bioavailability>,
    pub solvent_interactions: Vec<SolventInteraction>,
    pub method_effects: Vec<MethodEffect>,
}

/// `None` without spices.
pub fn scientific_basis(methods: &[&Method], spices: &[&Spice]) -> Option<ScientificBasis> {
    if spices.is_empty() {
        return None;
    }
    Some(ScientificBasis {
        chemical_compounds: compound_presence(spices),
        flavor_chemistry: flavor_chemistry(spices),
        nutritional_aspects: nutritional_aspects(spices),
        preservation: preservation(methods, spices),
        bioavailability: bioavailability(spices),
        solvent_interactions: spices.iter().filter_map(|s| solvent_interaction(s)).collect(),
        method_effects: methods.iter().map(|m| method_effect(m, spices)).collect(),
    })
}

fn names(spices: &[&Spice]) -> Vec<String> {
    spices.iter().map(|s| s.name.clone()).collect()
}

fn contains_any(spice: &Spice, wanted: &[&str]) -> bool {
    spice.compounds().iter().any(|c| wanted.contains(c))
}

pub fn compound_presence(spices: &[&Spice]) -> Vec<CompoundPresence> {
    let mut found: Vec<CompoundPresence> = Vec::new();
    for spice in spices {
        for compound in spice.compounds() {
            if let Some(entry) = found.iter_mut().find(|c| c.name == compound) {
                entry.sources.push(spice.name.clone());
                entry.synergy = true;
                continue;
            }
            let info = compounds::lookup(compound);
            found.push(CompoundPresence {
                name: compound.to_string(),
                sources: vec![spice.name.clone()],
                properties: info
                    .map(|i| i.properties.iter().map(|p| p.to_string()).collect())
                    .unwrap_or_default(),
                effects: info.map(|i| vec![i.effects.to_string()]).unwrap_or_default(),
                synergy: false,
            });
        }
    }
    found
}

fn complementary_tastes(a: &Spice, b: &Spice) -> Option<[String; 2]> {
    let has = |spice: &Spice, taste: &str| spice.taste_profile.iter().any(|t| t == taste);
    COMPLEMENTARY_TASTES.iter().find_map(|&(first, second)| {
        if has(a, first) && has(b, second) {
            Some([first.to_string(), second.to_string()])
        } else if has(a, second) && has(b, first) {
            Some([second.to_string(), first.to_string()])
        } else {
            None
        }
    })
}

pub fn flavor_chemistry(spices: &[&Spice]) -> Vec<FlavorChemistry> {
    let mut out = Vec::new();
    for (i, a) in spices.iter().enumerate() {
        for b in &spices[i + 1..] {
            if a.chemical_compounds.is_none() || b.chemical_compounds.is_none() {
                continue;
            }
            let pair = [a.name.clone(), b.name.clone()];
            let cb = b.compounds();
            let common: Vec<String> = a
                .compounds()
                .into_iter()
                .filter(|c| cb.contains(c))
                .map(str::to_string)
                .collect();

            if !common.is_empty() {
                out.push(FlavorChemistry {
                    spices: pair,
                    kind: ChemistryKind::Synergy,
                    compounds: common,
                    effect: "Усиление общих ароматических соединений".to_string(),
                });
            } else if let Some(tastes) = complementary_tastes(a, b) {
                out.push(FlavorChemistry {
                    spices: pair,
                    kind: ChemistryKind::Complementary,
                    compounds: tastes.to_vec(),
                    effect: "Создание сложного вкусового профиля".to_string(),
                });
            }
        }
    }
    out
}

pub fn nutritional_aspects(spices: &[&Spice]) -> Vec<NutritionalAspect> {
    let mut aspects = Vec::new();

    let antioxidants: Vec<&Spice> = spices
        .iter()
        .copied()
        .filter(|s| !s.phenolic_compounds().is_empty())
        .collect();
    if !antioxidants.is_empty() {
        aspects.push(NutritionalAspect {
            kind: NutritionKind::Antioxidant,
            spices: names(&antioxidants),
            benefit: "Защита от окислительного стресса и улучшение сохранности продуктов"
                .to_string(),
        });
    }

    let anti_inflammatory: Vec<&Spice> = spices
        .iter()
        .copied()
        .filter(|s| contains_any(s, compounds::ANTI_INFLAMMATORY))
        .collect();
    if !anti_inflammatory.is_empty() {
        aspects.push(NutritionalAspect {
            kind: NutritionKind::AntiInflammatory,
            spices: names(&anti_inflammatory),
            benefit: "Противовоспалительное действие".to_string(),
        });
    }
    aspects
}

pub fn preservation(methods: &[&Method], spices: &[&Spice]) -> Option<Preservation> {
    let preservatives: Vec<&Spice> = spices
        .iter()
        .copied()
        .filter(|s| contains_any(s, compounds::PRESERVATIVES))
        .collect();
    if preservatives.is_empty() {
        return None;
    }

    let mut effectiveness = 20 * preservatives.len();
    if methods
        .iter()
        .any(|m| m.temperature.is_some_and(|t| t > PRESERVING_HEAT))
    {
        effectiveness += 30;
    }
    Some(Preservation {
        spices: names(&preservatives),
        mechanism: "Антимикробные соединения подавляют рост бактерий и грибков".to_string(),
        effectiveness: effectiveness.min(100) as u8,
    })
}

pub fn bioavailability(spices: &[&Spice]) -> Option<Bioavailability> {
    let enhancers: Vec<&Spice> = spices
        .iter()
        .copied()
        .filter(|s| contains_any(s, compounds::BIOAVAILABILITY_ENHANCERS))
        .collect();
    if enhancers.is_empty() {
        return None;
    }
    Some(Bioavailability {
        enhancers: names(&enhancers),
        mechanism: "Улучшение всасывания питательных веществ в кишечнике".to_string(),
        target_nutrients: ["жирорастворимые витамины", "минералы", "антиоксиданты"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

#[derive(Clone, Copy)]
enum Solvent {
    Water,
    Oil,
    Alcohol,
}

impl Solvent {
    fn label(self) -> &'static str {
        match self {
            Solvent::Water => "водой",
            Solvent::Oil => "маслом",
            Solvent::Alcohol => "алкоголем",
        }
    }
}

fn solvent_description(spice: &Spice, solvent: Solvent, level: Option<&str>) -> String {
    let s = &spice.name;
    match (solvent, level) {
        (Solvent::Water, Some("хорошо")) => format!(
            "Водорастворимые соединения {s} легко извлекаются, создавая насыщенный отвар с активными веществами"
        ),
        (Solvent::Water, Some("частично")) => format!(
            "Некоторые соединения {s} растворяются в воде, требуется длительное настаивание для полного извлечения"
        ),
        (Solvent::Water, Some("плохо")) => {
            format!("{s} плохо растворяется в воде, основные ароматы остаются в твердой фазе")
        }
        (Solvent::Oil, Some("хорошо")) => format!(
            "Жирорастворимые эфирные масла {s} активно переходят в масло, создавая ароматную основу"
        ),
        (Solvent::Oil, Some("частично")) => {
            format!("Часть летучих соединений {s} растворяется в масле при нагревании")
        }
        (Solvent::Oil, Some("плохо")) => {
            format!("{s} слабо взаимодействует с маслом, требует предварительной обработки")
        }
        (Solvent::Alcohol, Some("хорошо")) => {
            format!("Спиртовые экстракты {s} содержат максимальную концентрацию активных веществ")
        }
        (Solvent::Alcohol, Some("частично")) => {
            format!("Алкоголь частично извлекает ароматические соединения {s}")
        }
        (Solvent::Alcohol, Some("плохо")) => {
            format!("{s} не подходит для спиртовых настоек, низкая экстракция")
        }
        _ => format!("Взаимодействие {s} с {} не определено", solvent.label()),
    }
}

/// `None` when the spice has no solubility data.
pub fn solvent_interaction(spice: &Spice) -> Option<SolventInteraction> {
    let solubility = spice.solubility.as_ref()?;
    Some(SolventInteraction {
        spice: spice.name.clone(),
        water: solvent_description(spice, Solvent::Water, solubility.water.as_deref()),
        oil: solvent_description(spice, Solvent::Oil, solubility.oil.as_deref()),
        alcohol: solvent_description(spice, Solvent::Alcohol, solubility.alcohol.as_deref()),
    })
}

pub fn method_effect(method: &Method, spices: &[&Spice]) -> MethodEffect {
    let dissolves_well = |pick: fn(&Solubility) -> Option<&String>| -> Vec<String> {
        spices
            .iter()
            .filter(|s| {
                s.solubility
                    .as_ref()
                    .and_then(pick)
                    .is_some_and(|level| level == "хорошо")
            })
            .map(|s| s.name.clone())
            .collect()
    };

    let (title, description, recommendations) = match method.name.as_str() {
        "Варка" => (
            "Варка - водная экстракция".to_string(),
            "При варке активно извлекаются водорастворимые соединения",
            dissolves_well(|s| s.water.as_ref()),
        ),
        "Жарка" => (
            "Жарка - масляная экстракция".to_string(),
            "Высокая температура и масло извлекают жирорастворимые ароматы",
            dissolves_well(|s| s.oil.as_ref()),
        ),
        "Тушение" => (
            "Тушение - комбинированная экстракция".to_string(),
            "Сочетание воды и жира позволяет извлечь широкий спектр соединений",
            names(spices),
        ),
        "Фламбирование" => (
            "Фламбирование - спиртовая экстракция".to_string(),
            "Алкоголь извлекает специфические ароматические соединения",
            dissolves_well(|s| s.alcohol.as_ref()),
        ),
        "Запекание" => (
            "Запекание - сухая экстракция".to_string(),
            "Сухой жар концентрирует ароматы и создает новые соединения",
            spices
                .iter()
                .filter(|s| s.intensity.is_some_and(|i| i > 5))
                .map(|s| s.name.clone())
                .collect(),
        ),
        other => (
            format!("{other} - специфическая обработка"),
            "Метод влияет на извлечение и трансформацию ароматических соединений",
            names(spices),
        ),
    };

    MethodEffect {
        method: method.name.clone(),
        title,
        description: description.to_string(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn spices<'a>(catalog: &'a Catalog, ids: &[u32]) -> Vec<&'a Spice> {
        ids.iter().map(|id| catalog.spice(*id).unwrap()).collect()
    }

    #[test]
    fn no_spices_no_basis() {
        let catalog = Catalog::builtin().unwrap();
        let fry = catalog.method(1).unwrap();
        assert_eq!(scientific_basis(&[fry], &[]), None);
    }

    #[test]
    fn shared_compounds_are_marked_as_synergy() {
        let catalog = Catalog::builtin().unwrap();
        // Базилик and Корица both carry эвгенол.
        let found = compound_presence(&spices(&catalog, &[1, 9]));
        let eugenol = found.iter().find(|c| c.name == "эвгенол").unwrap();
        assert_eq!(eugenol.sources, vec!["Базилик", "Корица"]);
        assert!(eugenol.synergy);
        assert_eq!(eugenol.properties.len(), 3);

        let vanillin = compound_presence(&spices(&catalog, &[17]));
        assert!(!vanillin[0].synergy);
        assert!(vanillin[0].properties.is_empty());
    }

    #[test]
    fn flavor_chemistry_prefers_shared_compounds() {
        let catalog = Catalog::builtin().unwrap();
        // Базилик/Корица share эвгенол; Кумин/Кориандр only complement in taste.
        let found = flavor_chemistry(&spices(&catalog, &[1, 9]));
        assert_eq!(found[0].kind, ChemistryKind::Synergy);
        assert_eq!(found[0].compounds, vec!["эвгенол"]);

        let found = flavor_chemistry(&spices(&catalog, &[6, 5]));
        assert_eq!(found[0].kind, ChemistryKind::Complementary);
        assert_eq!(found[0].compounds, vec!["земляной", "цитрусовый"]);
    }

    #[test]
    fn preservation_scales_with_spices_and_heat() {
        let catalog = Catalog::builtin().unwrap();
        let herbs = spices(&catalog, &[2, 3, 10]);
        let boil = catalog.method(2).unwrap();
        let fry = catalog.method(1).unwrap();

        assert_eq!(preservation(&[boil], &herbs).unwrap().effectiveness, 60);
        assert_eq!(preservation(&[fry], &herbs).unwrap().effectiveness, 90);

        let more = spices(&catalog, &[1, 2, 3, 4, 9, 10]);
        assert_eq!(preservation(&[fry], &more).unwrap().effectiveness, 100);

        assert_eq!(preservation(&[fry], &spices(&catalog, &[17])), None);
    }

    #[test]
    fn enhancers_are_found_among_all_compound_groups() {
        let catalog = Catalog::builtin().unwrap();
        // пиперин is an alkaloid of Черный перец, куркумин a phenolic of Куркума.
        let found = bioavailability(&spices(&catalog, &[7, 11, 16])).unwrap();
        assert_eq!(found.enhancers, vec!["Куркума", "Черный перец"]);

        let aspects = nutritional_aspects(&spices(&catalog, &[7, 12, 16]));
        let kinds: Vec<NutritionKind> = aspects.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![NutritionKind::Antioxidant, NutritionKind::AntiInflammatory]
        );
        assert_eq!(aspects[1].spices, vec!["Куркума", "Имбирь"]);
    }

    #[test]
    fn solvent_prose_follows_solubility_levels() {
        let catalog = Catalog::builtin().unwrap();
        let dill = solvent_interaction(catalog.spice(16).unwrap()).unwrap();
        assert!(dill.water.starts_with("Водорастворимые соединения Укроп"));
        assert_eq!(
            dill.oil,
            "Часть летучих соединений Укроп растворяется в масле при нагревании"
        );

        let bare = Catalog::from_json("[]", "[]", r#"[{"id": 1, "name": "Соль"}]"#).unwrap();
        assert_eq!(solvent_interaction(bare.spice(1).unwrap()), None);
    }

    #[test]
    fn method_effects_pick_suitable_spices() {
        let catalog = Catalog::builtin().unwrap();
        let chosen = spices(&catalog, &[3, 12, 16]);

        let boil = method_effect(catalog.method(2).unwrap(), &chosen);
        assert_eq!(boil.title, "Варка - водная экстракция");
        assert_eq!(boil.recommendations, vec!["Имбирь", "Укроп"]);

        let bake = method_effect(catalog.method(4).unwrap(), &chosen);
        assert_eq!(bake.recommendations, vec!["Имбирь"]);

        let smoke = method_effect(catalog.method(6).unwrap(), &chosen);
        assert_eq!(smoke.title, "Копчение - специфическая обработка");
        assert_eq!(smoke.recommendations.len(), 3);
    }
}
