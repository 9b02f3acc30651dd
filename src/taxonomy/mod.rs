use std::collections::HashMap;

use crate::models::Category;

const NEUTRAL_COLOR: &str = "#6b7280";

/// Display metadata for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub category: Category,
    pub display_name: String,
    pub color: String,
}

/// Static lookup from a raw language identifier to its category, display
/// name and presentation color. Advisory only: a miss yields the
/// `Other` default instead of an error, so aggregation never fails on an
/// unknown language.
pub struct LanguageTable {
    entries: HashMap<&'static str, (Category, &'static str, &'static str)>,
}

impl LanguageTable {
    pub fn new() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };

        table.init_frontend();
        table.init_backend();
        table.init_mobile();
        table.init_tools();
        table.init_data();

        table
    }

    fn init_frontend(&mut self) {
        let langs = [
            ("JavaScript", "JavaScript", "#f7df1e"),
            ("TypeScript", "TypeScript", "#3178c6"),
            ("HTML", "HTML", "#e34f26"),
            ("CSS", "CSS", "#1572b6"),
            ("Vue", "Vue.js", "#4fc08d"),
            ("React", "React", "#61dafb"),
            ("Svelte", "Svelte", "#ff3e00"),
        ];
        self.add_all(Category::Frontend, &langs);
    }

    fn init_backend(&mut self) {
        let langs = [
            ("Python", "Python", "#3776ab"),
            ("Java", "Java", "#007396"),
            ("C#", "C#", "#239120"),
            ("PHP", "PHP", "#777bb4"),
            ("Go", "Go", "#00add8"),
            ("Rust", "Rust", "#000000"),
            ("C++", "C++", "#00599c"),
            ("C", "C", "#a8b9cc"),
        ];
        self.add_all(Category::Backend, &langs);
    }

    fn init_mobile(&mut self) {
        let langs = [
            ("Swift", "Swift", "#fa7343"),
            ("Kotlin", "Kotlin", "#7f52ff"),
            ("Dart", "Flutter/Dart", "#0175c2"),
        ];
        self.add_all(Category::Mobile, &langs);
    }

    fn init_tools(&mut self) {
        let langs = [
            ("Shell", "Shell/Bash", "#89e051"),
            ("PowerShell", "PowerShell", "#5391fe"),
            ("Dockerfile", "Docker", "#2496ed"),
            ("YAML", "YAML", "#cb171e"),
            ("JSON", "JSON", "#000000"),
            ("HCL", "Terraform", "#623ce4"),
        ];
        self.add_all(Category::Tools, &langs);
    }

    fn init_data(&mut self) {
        self.add_all(Category::Database, &[("SQL", "SQL", "#4479a1")]);

        let langs = [
            ("Jupyter Notebook", "Jupyter Notebook", "#da5b0b"),
            ("R", "R", "#276dc3"),
            ("MATLAB", "MATLAB", "#0076a8"),
        ];
        self.add_all(Category::DataScience, &langs);
    }

    fn add_all(
        &mut self,
        category: Category,
        langs: &[(&'static str, &'static str, &'static str)],
    ) {
        for (name, display_name, color) in langs {
            self.entries.insert(*name, (category, *display_name, *color));
        }
    }

    /// Exact-match lookup; unknown languages keep their raw name.
    pub fn lookup(&self, name: &str) -> LanguageInfo {
        match self.entries.get(name) {
            Some((category, display_name, color)) => LanguageInfo {
                category: *category,
                display_name: (*display_name).to_string(),
                color: (*color).to_string(),
            },
            None => LanguageInfo {
                category: Category::Other,
                display_name: name.to_string(),
                color: NEUTRAL_COLOR.to_string(),
            },
        }
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_lookup() {
        let table = LanguageTable::new();

        let ts = table.lookup("TypeScript");
        assert_eq!(ts.category, Category::Frontend);
        assert_eq!(ts.display_name, "TypeScript");
        assert_eq!(ts.color, "#3178c6");

        let dart = table.lookup("Dart");
        assert_eq!(dart.category, Category::Mobile);
        assert_eq!(dart.display_name, "Flutter/Dart");
    }

    #[test]
    fn unknown_language_defaults_to_other() {
        let table = LanguageTable::new();

        let info = table.lookup("Brainfuck");
        assert_eq!(info.category, Category::Other);
        assert_eq!(info.display_name, "Brainfuck");
        assert_eq!(info.color, NEUTRAL_COLOR);
    }
}
