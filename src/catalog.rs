//! Closed city and category catalogs
//!
//! A catalog is an ordered mapping from a user-facing label to the code the
//! events API expects. Labels are the only accepted inputs during selection;
//! anything else is rejected and the user is re-prompted.

/// A single catalog entry: display label plus API code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: String,
    pub code: String,
}

/// An ordered, closed label -> code mapping.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, code)| CatalogEntry {
                    label: label.to_string(),
                    code: code.to_string(),
                })
                .collect(),
        }
    }

    /// Exact-label lookup. Catalogs are closed sets: no fuzzy matching.
    pub fn code_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.code.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.code_for(label).is_some()
    }

    /// Labels in catalog order, for building choice sets.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}

/// The two catalogs the dialog offers, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub cities: Catalog,
    pub categories: Catalog,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            cities: Catalog::new([
                ("Москва", "msk"),
                ("Санкт-Петербург", "spb"),
                ("Казань", "kzn"),
            ]),
            categories: Catalog::new([
                ("🎵 Концерты", "concert"),
                ("🎭 Театры", "theater"),
                ("🖼 Выставки", "exhibition"),
                ("🎪 Фестивали", "festival"),
            ]),
        }
    }
}
