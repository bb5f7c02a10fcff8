//! Fixed English inflection table.
//!
//! Storage-name fallbacks and bulk-method inference depend on turning a type
//! or method name into its plural or singular form. The rules below are a
//! closed table so generated names never drift between releases.
//!
//! Irregular and uncountable words only match on a word boundary: the whole
//! input, or a trailing CamelCase word (`SalesPerson` -> `SalesPeople`), so
//! `Box` never matches the irregular `ox`.

/// (singular, plural) pairs that the suffix rules get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("quiz", "quizzes"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("index", "indices"),
    ("status", "statuses"),
    ("alias", "aliases"),
    ("bus", "buses"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("axis", "axes"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("wolf", "wolves"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("calf", "calves"),
    ("self", "selves"),
    ("elf", "elves"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("life", "lives"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
    ("veto", "vetoes"),
    ("cache", "caches"),
    ("movie", "movies"),
    ("cookie", "cookies"),
];

/// Words with identical singular and plural forms.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "metadata",
    "data",
];

/// Pluralize a word or the trailing word of a CamelCase identifier.
///
/// ```
/// use multidb_core::pluralize;
///
/// assert_eq!(pluralize("User"), "Users");
/// assert_eq!(pluralize("Address"), "Addresses");
/// assert_eq!(pluralize("SalesPerson"), "SalesPeople");
/// ```
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_string();
    }
    if let Some(replaced) = replace_word(word, IRREGULAR.iter().map(|(s, p)| (*s, *p))) {
        return replaced;
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{}es", word);
    }
    if ends_with_consonant_y(&lower) {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    format!("{}s", word)
}

/// Singularize a word or the trailing word of a CamelCase identifier.
///
/// Words that already look singular are returned unchanged.
///
/// ```
/// use multidb_core::singularize;
///
/// assert_eq!(singularize("Users"), "User");
/// assert_eq!(singularize("Status"), "Status");
/// assert_eq!(singularize("Addresses"), "Address");
/// ```
pub fn singularize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_string();
    }
    if let Some(replaced) = replace_word(word, IRREGULAR.iter().map(|(s, p)| (*p, *s))) {
        return replaced;
    }
    // A singular irregular stays as it is (`Status`, `Analysis`).
    if matching_word(word, IRREGULAR.iter().map(|(s, _)| *s)).is_some() {
        return word.to_string();
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn is_uncountable(word: &str) -> bool {
    matching_word(word, UNCOUNTABLE.iter().copied()).is_some()
}

fn ends_with_consonant_y(lower: &str) -> bool {
    let bytes = lower.as_bytes();
    bytes.len() >= 2
        && bytes[bytes.len() - 1] == b'y'
        && !matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Find the longest table word that `word` ends with on a word boundary and
/// return the byte offset where it starts.
fn matching_word<'a>(word: &str, candidates: impl Iterator<Item = &'a str>) -> Option<(usize, &'a str)> {
    let lower = word.to_ascii_lowercase();
    candidates
        .filter(|candidate| lower.ends_with(candidate))
        .map(|candidate| (word.len() - candidate.len(), candidate))
        .filter(|(start, _)| is_word_start(word, *start))
        .max_by_key(|(_, candidate)| candidate.len())
}

fn replace_word<'a>(
    word: &str,
    pairs: impl Iterator<Item = (&'a str, &'a str)> + Clone,
) -> Option<String> {
    let (start, from) = matching_word(word, pairs.clone().map(|(from, _)| from))?;
    let (_, to) = pairs.into_iter().find(|(candidate, _)| *candidate == from)?;
    let matched = &word[start..];
    Some(format!("{}{}", &word[..start], match_case(matched, to)))
}

fn is_word_start(word: &str, start: usize) -> bool {
    if start == 0 {
        return true;
    }
    let bytes = word.as_bytes();
    bytes[start].is_ascii_uppercase() || !bytes[start - 1].is_ascii_alphanumeric()
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_ascii_lowercase()) {
        return replacement.to_ascii_uppercase();
    }
    if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        return crate::capitalize(replacement);
    }
    replacement.to_string()
}
