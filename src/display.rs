//! Helpers for turning classified languages into the grouped skill
//! view the portfolio renders.

use serde::Serialize;

use crate::models::{Category, ClassifiedLanguage};

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub languages: Vec<ClassifiedLanguage>,
    pub total_percentage: u32,
}

/// Groups languages by category. Languages inside a group are sorted by
/// descending percentage, groups by descending total share; ties fall
/// back to name order so output is stable.
pub fn group_by_category(languages: &[ClassifiedLanguage]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for lang in languages {
        match groups.iter_mut().find(|g| g.category == lang.category) {
            Some(group) => {
                group.total_percentage += lang.percentage;
                group.languages.push(lang.clone());
            }
            None => groups.push(CategoryGroup {
                category: lang.category,
                total_percentage: lang.percentage,
                languages: vec![lang.clone()],
            }),
        }
    }

    for group in &mut groups {
        group
            .languages
            .sort_by(|a, b| b.percentage.cmp(&a.percentage).then_with(|| a.name.cmp(&b.name)));
    }

    groups.sort_by(|a, b| {
        b.total_percentage
            .cmp(&a.total_percentage)
            .then_with(|| a.category.to_string().cmp(&b.category.to_string()))
    });

    groups
}

/// Converts a usage percentage into a 0-100 display level. Heavy usage
/// caps at 90 and a variety bonus (2 points per distinct language,
/// up to 10) tops it off, capped at 95 overall.
pub fn skill_level(percentage: u32, total_languages: usize) -> u32 {
    let base = (percentage * 2).min(90);
    let variety_bonus = (total_languages as u32 * 2).min(10);
    (base + variety_bonus).min(95)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(name: &str, category: Category, percentage: u32) -> ClassifiedLanguage {
        ClassifiedLanguage {
            name: name.to_string(),
            bytes: None,
            percentage,
            category,
            display_name: name.to_string(),
            color: "#6b7280".to_string(),
        }
    }

    #[test]
    fn groups_sort_by_total_share() {
        let languages = vec![
            lang("Python", Category::Backend, 20),
            lang("JavaScript", Category::Frontend, 30),
            lang("TypeScript", Category::Frontend, 25),
            lang("Rust", Category::Backend, 15),
        ];

        let groups = group_by_category(&languages);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, Category::Frontend);
        assert_eq!(groups[0].total_percentage, 55);
        assert_eq!(groups[0].languages[0].name, "JavaScript");
        assert_eq!(groups[1].category, Category::Backend);
        assert_eq!(groups[1].languages[0].name, "Python");
    }

    #[test]
    fn skill_level_caps() {
        assert_eq!(skill_level(10, 1), 22);
        assert_eq!(skill_level(60, 2), 94);
        // base caps at 90, bonus at 10, overall at 95
        assert_eq!(skill_level(80, 20), 95);
        assert_eq!(skill_level(0, 0), 0);
    }
}
