//! File categorization by extension.
//!
//! This module maps file names to category labels (e.g., "Images", "Documents")
//! using an ordered table of extension sets. Lookup walks the table in
//! declaration order and the first category claiming the extension wins.
//!
//! # Examples
//!
//! ```
//! use downsort::file_category::classify;
//!
//! assert_eq!(classify("photo.JPG"), "Images");
//! assert_eq!(classify("notes.md"), "Documents");
//! assert_eq!(classify("file.xyz123"), "Other");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

/// Category used when no table entry claims an extension.
pub const FALLBACK_CATEGORY: &str = "Other";

static DEFAULT_TABLE: LazyLock<CategoryTable> = LazyLock::new(|| {
    CategoryTable::new()
        .with_category(
            "Images",
            &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".heic"],
        )
        .with_category(
            "Documents",
            &[
                ".pdf", ".doc", ".docx", ".txt", ".rtf", ".ppt", ".pptx", ".xls", ".xlsx", ".csv",
                ".md",
            ],
        )
        .with_category("Videos", &[".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv"])
        .with_category("Audio", &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a"])
        .with_category("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"])
        .with_category(
            "Code",
            &[
                ".py", ".js", ".ts", ".html", ".css", ".json", ".yml", ".yaml", ".java", ".c",
                ".cpp", ".cs", ".go", ".rs", ".rb", ".php",
            ],
        )
        .with_category("Installers", &[".exe", ".msi", ".dmg", ".pkg", ".deb"])
});

/// A named category and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Directory name the category's files are moved into.
    pub name: String,
    /// Lowercase extensions, leading dot included.
    pub extensions: Vec<String>,
}

impl Category {
    fn claims(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}

/// Ordered mapping from category name to extension set.
///
/// The table is built once and treated as read-only afterwards. Ordering
/// matters only if two categories claim the same extension, which
/// [`CategoryTable::duplicate_extensions`] reports.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Creates an empty table. Every name classifies as [`FALLBACK_CATEGORY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in table shared by the whole process.
    pub fn standard() -> &'static CategoryTable {
        &DEFAULT_TABLE
    }

    /// Appends a category. Extensions are lowercased and given a leading dot
    /// if they lack one.
    ///
    /// # Examples
    ///
    /// ```
    /// use downsort::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::new().with_category("Ebooks", &["epub", ".MOBI"]);
    /// assert_eq!(table.classify("book.mobi"), "Ebooks");
    /// ```
    pub fn with_category(mut self, name: &str, extensions: &[&str]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        self.categories.push(Category {
            name: name.to_string(),
            extensions,
        });
        self
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Maps a file name to the first category claiming its extension.
    pub fn classify(&self, file_name: &str) -> &str {
        let ext = extension_of(file_name).to_lowercase();
        if ext.is_empty() {
            return FALLBACK_CATEGORY;
        }

        self.categories
            .iter()
            .find(|category| category.claims(&ext))
            .map(|category| category.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Returns every extension claimed by more than one category, together
    /// with the claiming category names in table order. Sorted by extension.
    pub fn duplicate_extensions(&self) -> Vec<(String, Vec<String>)> {
        let mut owners: HashMap<&str, Vec<String>> = HashMap::new();
        for category in &self.categories {
            for ext in &category.extensions {
                let names = owners.entry(ext.as_str()).or_default();
                if !names.contains(&category.name) {
                    names.push(category.name.clone());
                }
            }
        }

        let mut duplicates: Vec<_> = owners
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(ext, names)| (ext.to_string(), names))
            .collect();
        duplicates.sort();
        duplicates
    }
}

/// Classifies a file name against the built-in table.
pub fn classify(file_name: &str) -> &'static str {
    CategoryTable::standard().classify(file_name)
}

/// Splits a file name into stem and extension.
///
/// The extension runs from the last `.` to the end and keeps its case.
/// Names without a dot, and dotfiles like `.bashrc`, have an empty extension.
///
/// ```
/// use downsort::file_category::split_name;
///
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_name("README"), ("README", ""));
/// ```
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(idx) => file_name.split_at(idx),
    }
}

/// Returns the extension of a file name as produced by [`split_name`].
pub fn extension_of(file_name: &str) -> &str {
    split_name(file_name).1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_category_order() {
        let names: Vec<_> = CategoryTable::standard()
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Documents",
                "Videos",
                "Audio",
                "Archives",
                "Code",
                "Installers"
            ]
        );
    }

    #[test]
    fn test_every_standard_extension_classifies_to_its_category() {
        for category in CategoryTable::standard().categories() {
            for ext in &category.extensions {
                let lower = format!("x{}", ext);
                let upper = format!("x{}", ext.to_uppercase());
                assert_eq!(classify(&lower), category.name, "{}", lower);
                assert_eq!(classify(&upper), category.name, "{}", upper);
            }
        }
    }

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("photo.JPG"), "Images");
        assert_eq!(classify("notes.md"), "Documents");
        assert_eq!(classify("script.py"), "Code");
        assert_eq!(classify("movie.Mkv"), "Videos");
        assert_eq!(classify("song.flac"), "Audio");
        assert_eq!(classify("backup.tar.gz"), "Archives");
        assert_eq!(classify("setup.exe"), "Installers");
    }

    #[test]
    fn test_classify_unknown_defaults_to_other() {
        assert_eq!(classify("file.xyz123"), "Other");
        assert_eq!(classify("README"), "Other");
        assert_eq!(classify(".bashrc"), "Other");
        assert_eq!(classify("trailing."), "Other");
        assert_eq!(classify(""), "Other");
    }

    #[test]
    fn test_dotfile_with_extension() {
        assert_eq!(classify(".config.json"), "Code");
    }

    #[test]
    fn test_classify_is_pure() {
        let first = classify("report.pdf");
        let second = classify("report.pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn test_standard_table_has_no_duplicate_extensions() {
        let duplicates = CategoryTable::standard().duplicate_extensions();
        assert!(duplicates.is_empty(), "duplicates: {:?}", duplicates);
    }

    #[test]
    fn test_first_declared_category_wins() {
        let table = CategoryTable::new()
            .with_category("Web", &[".html"])
            .with_category("Code", &[".html", ".rs"]);

        assert_eq!(table.classify("index.html"), "Web");
        assert_eq!(table.classify("main.rs"), "Code");
        assert_eq!(
            table.duplicate_extensions(),
            vec![(
                ".html".to_string(),
                vec!["Web".to_string(), "Code".to_string()]
            )]
        );
    }

    #[test]
    fn test_empty_table_falls_back() {
        let table = CategoryTable::new();
        assert_eq!(table.classify("photo.png"), FALLBACK_CATEGORY);
    }

    #[test]
    fn test_with_category_normalizes_extensions() {
        let table = CategoryTable::new().with_category("Ebooks", &["EPUB", ".Mobi"]);
        assert_eq!(
            table.categories()[0].extensions,
            vec![".epub".to_string(), ".mobi".to_string()]
        );
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_name("Photo.JPG"), ("Photo", ".JPG"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
        assert_eq!(split_name("file."), ("file", "."));
    }
}
