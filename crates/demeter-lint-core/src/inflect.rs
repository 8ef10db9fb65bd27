//! Name inflection for turning variable and association names into class names.
//!
//! Follows the Rails conventions closely enough for model lookup:
//! `@invoices` classifies to `Invoice`, `line_items` to `LineItem`,
//! `people` to `Person`.

/// Plural/singular pairs that no suffix rule covers.
const IRREGULARS: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("zombies", "zombie"),
    ("oxen", "ox"),
    ("mice", "mouse"),
    ("geese", "goose"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
    "status",
    "alias",
];

/// Suffix rules, tried in order. The first match wins.
const SINGULAR_RULES: &[(&str, &str)] = &[
    ("quizzes", "quiz"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("indices", "index"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("buses", "bus"),
    ("shoes", "shoe"),
    ("movies", "movie"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("oes", "o"),
    ("lves", "lf"),
    ("rves", "rf"),
    ("ss", "ss"),
    ("us", "us"),
    ("is", "is"),
];

/// Removes a leading variable sigil (`@`, `@@`, `$`).
#[must_use]
pub fn strip_sigil(identifier: &str) -> &str {
    identifier.trim_start_matches(['@', '$'])
}

/// Returns the singular form of an underscored word.
///
/// Only the last `_`-separated segment is inflected, so `line_items`
/// becomes `line_item` and `sales_people` becomes `sales_person`.
#[must_use]
pub fn singularize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    format!("{head}{}", singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLES.contains(&lower.as_str()) {
        return word.to_string();
    }

    for (plural, singular) in IRREGULARS {
        if lower == *plural {
            return replace_suffix(word, plural.len(), singular);
        }
    }

    for (suffix, replacement) in SINGULAR_RULES {
        if lower.ends_with(suffix) {
            return replace_suffix(word, suffix.len(), replacement);
        }
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        // consonant + ies -> y (companies), vowel + ies stays regular (movies handled above)
        if stem.ends_with(|c: char| !"aeiou".contains(c)) && !stem.is_empty() {
            return replace_suffix(word, 3, "y");
        }
    }

    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Replaces the last `len` bytes of `word` with `replacement`.
///
/// Keeps the original casing of the first character when the whole word
/// is replaced (`People` -> `Person`).
fn replace_suffix(word: &str, len: usize, replacement: &str) -> String {
    let cut = word.len().saturating_sub(len);
    let head = &word[..cut];
    if head.is_empty() && word.starts_with(|c: char| c.is_ascii_uppercase()) {
        return camelize(replacement);
    }
    format!("{head}{replacement}")
}

/// Converts `snake_case` (and `a/b` paths) to `CamelCase` (`A::B`).
#[must_use]
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a variable or association name into a class name.
///
/// ```ignore
/// assert_eq!(classify("@invoices"), "Invoice");
/// assert_eq!(classify("line_items"), "LineItem");
/// ```
#[must_use]
pub fn classify(identifier: &str) -> String {
    camelize(&singularize(strip_sigil(identifier)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sigils() {
        assert_eq!(strip_sigil("@invoice"), "invoice");
        assert_eq!(strip_sigil("@@registry"), "registry");
        assert_eq!(strip_sigil("$stdout"), "stdout");
        assert_eq!(strip_sigil("invoice"), "invoice");
    }

    #[test]
    fn singularizes_regular_plurals() {
        assert_eq!(singularize("invoices"), "invoice");
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("companies"), "company");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("wolves"), "wolf");
    }

    #[test]
    fn leaves_singulars_alone() {
        assert_eq!(singularize("invoice"), "invoice");
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("news"), "news");
        assert_eq!(singularize("user"), "user");
    }

    #[test]
    fn singularizes_irregulars() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("movies"), "movie");
        assert_eq!(singularize("sales_people"), "sales_person");
    }

    #[test]
    fn singularizes_last_segment_only() {
        assert_eq!(singularize("line_items"), "line_item");
        assert_eq!(singularize("news_items"), "news_item");
    }

    #[test]
    fn camelizes() {
        assert_eq!(camelize("invoice"), "Invoice");
        assert_eq!(camelize("line_item"), "LineItem");
        assert_eq!(camelize("admin/user"), "Admin::User");
    }

    #[test]
    fn classifies_variables() {
        assert_eq!(classify("@invoice"), "Invoice");
        assert_eq!(classify("@invoices"), "Invoice");
        assert_eq!(classify("line_items"), "LineItem");
        assert_eq!(classify("@people"), "Person");
        assert_eq!(classify("survey"), "Survey");
    }
}
