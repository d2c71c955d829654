//! Category-aware prose for product/spice and method/spice pairs.

use crate::catalog::{Method, Product, Spice};

use super::compounds;

pub fn compatibility_reason(product: &Product, spice: &Spice) -> String {
    let s = &spice.name;
    match product.category.as_deref() {
        Some("мясо") => format!(
            "{s} содержит соединения, которые расщепляют белки и жиры в мясе, улучшая его усвояемость и вкус"
        ),
        Some("птица") => format!(
            "Ароматические соединения {s} проникают в нежные волокна птицы, создавая сбалансированный вкус"
        ),
        Some("рыба") => {
            format!("{s} нейтрализует специфические амины рыбы и подчеркивает ее деликатный вкус")
        }
        Some("овощи") => format!(
            "Фитохимические соединения {s} усиливают природные сахара и витамины в овощах"
        ),
        Some("крупы") => {
            format!("{s} обогащает нейтральную крахмалистую основу, добавляя сложность вкуса")
        }
        _ => format!("{s} химически совместим с {}", product.name),
    }
}

pub fn chemical_compatibility(spice: &Spice) -> String {
    let Some(chem) = &spice.chemical_compounds else {
        return "Химический анализ недоступен".to_string();
    };
    let names: Vec<&str> = chem
        .volatile_oils
        .iter()
        .chain(&chem.phenolic_compounds)
        .map(String::as_str)
        .collect();
    let effects: Vec<String> = names
        .iter()
        .map(|name| match compounds::lookup(name) {
            Some(info) => info.effects.to_string(),
            None => format!("{name} взаимодействует с продуктом"),
        })
        .collect();
    format!(
        "Активные соединения: {}. Эффекты: {}",
        names.join(", "),
        effects.join("; ")
    )
}

fn taste_effect(taste: &str) -> &str {
    match taste {
        "ароматный" => "усиливает натуральные ароматы продукта",
        "пряный" => "добавляет теплые пряные ноты",
        "острый" => "создает контраст и стимулирует рецепторы",
        "сладкий" => "балансирует соленые и кислые вкусы",
        "горьковатый" => "добавляет сложность и глубину",
        "цитрусовый" => "освежает и осветляет тяжелые вкусы",
        "земляной" => "создает основу для других вкусов",
        other => other,
    }
}

pub fn taste_interaction(spice: &Spice) -> String {
    let intensity = spice.intensity();
    let effects: Vec<&str> = spice.taste_profile.iter().map(|t| taste_effect(t)).collect();
    let weight = if intensity > 6 {
        "доминирует во вкусе"
    } else if intensity < 4 {
        "деликатно дополняет"
    } else {
        "гармонично сочетается"
    };
    format!(
        "Вкусовой профиль: {}. Интенсивность {}/10 - {}",
        effects.join(", "),
        intensity,
        weight
    )
}

pub fn nutritional_benefits(spice: &Spice) -> String {
    let text = match spice.name.to_lowercase().as_str() {
        "базилик" => "богат витамином K, антиоксидантами, улучшает пищеварение",
        "орегано" => "высокое содержание антиоксидантов, антибактериальные свойства",
        "тимьян" => "источник витамина C, тимол обладает антисептическими свойствами",
        "розмарин" => "улучшает память, содержит розмариновую кислоту",
        "кориандр" => "помогает пищеварению, содержит витамины A и K",
        "кумин" => "богат железом, улучшает пищеварение",
        "имбирь" => "противовоспалительные свойства, улучшает пищеварение",
        "куркума" => "мощный антиоксидант, противовоспалительные свойства",
        _ => "обогащает блюдо полезными соединениями",
    };
    text.to_string()
}

pub fn incompatibility_reason(product: &Product, spice: &Spice) -> String {
    format!(
        "{} может перебить {} неприятным послевкусием",
        spice.name, product.name
    )
}

pub fn chemical_conflict(product: &Product, spice: &Spice) -> String {
    format!(
        "Химический конфликт {} может нежелательно реагировать с {}",
        spice.name, product.name
    )
}

pub fn taste_clash(product: &Product, spice: &Spice) -> String {
    let intensity = spice.intensity();
    if intensity > 7 {
        format!(
            "Высокая интенсивность {} ({}/10) подавляет натуральный вкус {}",
            spice.name, intensity, product.name
        )
    } else {
        format!(
            "Вкусовые профили {} и {} создают дисгармонию",
            spice.name, product.name
        )
    }
}

pub fn alternative_recommendation(product: &Product) -> String {
    let alternatives: &[&str] = match product.category.as_deref() {
        Some("мясо") => &["черный перец", "тимьян", "розмарин"],
        Some("рыба") => &["укроп", "лимон", "петрушка"],
        Some("овощи") => &["базилик", "орегано", "тимьян"],
        _ => &["более мягкие специи"],
    };
    format!("Рекомендуем заменить на {}", alternatives.join(", "))
}

pub fn temperature_effect(method: &Method, spice: &Spice) -> String {
    let range = method.temperature_range.as_deref().unwrap_or("");
    if range.contains("200") || range.contains("300") {
        format!(
            "При высокой температуре ({range}) летучие масла {} быстро испаряются",
            spice.name
        )
    } else if range.contains("100") {
        format!(
            "При температуре {range} соединения {} медленно извлекаются",
            spice.name
        )
    } else {
        format!(
            "При низкой температуре ({range}) деликатные ароматы {} сохраняются",
            spice.name
        )
    }
}

pub fn chemical_changes(method: &Method) -> String {
    let text = match method.name.to_lowercase().as_str() {
        "жарка" => "Реакция Майяра усиливает вкус",
        "варка" => "Водорастворимые соединения извлекаются",
        "тушение" => "Медленное извлечение концентрирует вкус",
        "запекание" => "Сухой жар концентрирует ароматы",
        "гриль" => "Высокая температура создает дымные ароматы",
        _ => "Соединения трансформируются",
    };
    text.to_string()
}

pub fn aroma_development(method: &Method, spice: &Spice) -> String {
    let duration = method.duration.as_deref().unwrap_or("");
    if duration.contains("час") {
        format!(
            "Длительная обработка ({duration}) позволяет {} полностью развить аромат",
            spice.name
        )
    } else if duration.contains("мин") {
        format!(
            "Короткая обработка ({duration}) сохраняет яркость {}",
            spice.name
        )
    } else {
        format!(
            "Аромат {} постепенно развивается в процессе приготовления",
            spice.name
        )
    }
}

pub fn optimal_timing(spice: &Spice) -> String {
    let text = match spice.role_or_default() {
        "базовая" => "добавлять в начале",
        "связывающая" => "добавлять в середине",
        "акцентная" => "добавлять ближе к концу",
        "финишная" => "добавлять в конце",
        _ => "использовать согласно рецепту",
    };
    text.to_string()
}

pub fn technique_tips(method: &Method) -> String {
    let text = match method.name.to_lowercase().as_str() {
        "жарка" => "добавлять в разогретое масло",
        "варка" => "использовать марлевый мешочек",
        "тушение" => "обжарить перед добавлением",
        "запекание" => "смешать с маслом",
        "гриль" => "использовать в маринаде",
        _ => "следовать общим правилам",
    };
    text.to_string()
}
