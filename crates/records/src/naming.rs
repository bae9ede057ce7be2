//! Table name derivation.
//!
//! Entities declare their table names explicitly. This module holds the
//! naming convention those declarations follow, as a pure function of a
//! module path, a type name and a set of excluded path segments:
//!
//! ```
//! use records::naming::TableNamer;
//!
//! let namer = TableNamer::new(["palvin", "models"]);
//! assert_eq!(namer.derive("palvin::models::user", "UserAccount"), "user_accounts");
//! assert_eq!(namer.derive("palvin::billing::models", "Invoice"), "billing_invoices");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use common::NamingConfig;

static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static LOWER_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Words whose plural form is the same as the singular.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// `-f` / `-fe` words that take `-ves`.
const F_TO_VES: &[&str] = &[
    "calf", "elf", "half", "knife", "leaf", "life", "loaf", "self", "shelf", "thief", "wife",
    "wolf",
];

/// `-o` words that take `-es`.
const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "torpedo", "veto"];

/// Convert a camel-case type name to lower-case underscored words.
pub fn camel_to_snake(name: &str) -> String {
    let spaced = WORD_START.replace_all(name, "${1}_${2}");
    LOWER_UPPER
        .replace_all(&spaced, "${1}_${2}")
        .to_lowercase()
}

/// Pluralize the last underscored word of `name`.
pub fn pluralize(name: &str) -> String {
    match name.rsplit_once('_') {
        Some((head, last)) => format!("{}_{}", head, pluralize_word(last)),
        None => pluralize_word(name),
    }
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if F_TO_VES.contains(&word) {
        let stem = word.strip_suffix("fe").or_else(|| word.strip_suffix('f'));
        if let Some(stem) = stem {
            return format!("{}ves", stem);
        }
    }
    if O_TO_OES.contains(&word) {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix("is") {
        if !stem.is_empty() {
            return format!("{}es", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

/// Derives table names from module paths and type names.
#[derive(Debug, Clone)]
pub struct TableNamer {
    excluded: Vec<String>,
}

impl TableNamer {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &NamingConfig) -> Self {
        Self::new(config.excluded_segments.iter().cloned())
    }

    /// Segments removed from every derived name.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Derive the table name for `type_name` declared in `module_path`.
    ///
    /// The last module segment is replaced by the pluralized, underscored
    /// type name. Repeated segments keep their first position and excluded
    /// segments are dropped before joining with `_`.
    pub fn derive(&self, module_path: &str, type_name: &str) -> String {
        let mut segments: Vec<String> = module_path
            .split("::")
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let table = pluralize(&camel_to_snake(type_name));
        match segments.last_mut() {
            Some(last) => *last = table,
            None => segments.push(table),
        }

        let mut kept: Vec<&str> = Vec::with_capacity(segments.len());
        for segment in &segments {
            if kept.contains(&segment.as_str()) || self.excluded.iter().any(|e| e == segment) {
                continue;
            }
            kept.push(segment);
        }
        kept.join("_")
    }
}

impl Default for TableNamer {
    fn default() -> Self {
        Self::from_config(&NamingConfig::default())
    }
}
