//! Word inflections used to derive conventional names for resource kinds.
//!
//! Rules are ordered: the first matching rule wins. Uncountable words are
//! checked against the last `_`-separated segment and irregular words match
//! as suffixes, so `sales_person` pluralizes to `sales_people` and `woman`
//! to `women`.

use once_cell::sync::Lazy;
use regex::Regex;

type Rules = Vec<(Regex, &'static str)>;

fn compile(table: &[(&str, &'static str)]) -> Rules {
    table
        .iter()
        .map(|(pattern, replacement)| {
            let re = Regex::new(pattern).expect("inflection rules are valid patterns");
            (re, *replacement)
        })
        .collect()
}

static PLURALS: Lazy<Rules> = Lazy::new(|| {
    compile(&[
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)^(oxen)$", "${1}"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)^(m|l)ice$", "${1}ice"),
        (r"(?i)^(m|l)ouse$", "${1}ice"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)sis$", "ses"),
        (r"(?i)([ti])a$", "${1}a"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)(buffal|tomat)o$", "${1}oes"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(octop|vir)i$", "${1}i"),
        (r"(?i)(octop|vir)us$", "${1}i"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)s$", "s"),
        (r"$", "s"),
    ])
});

static SINGULARS: Lazy<Rules> = Lazy::new(|| {
    compile(&[
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)^(m|l)ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
        (
            r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ])
});

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid boundary pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid boundary pattern"));

/// (singular, plural)
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

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
];

/// Split `line_item` into (`line_`, `item`) so word lists apply to the tail.
fn split_tail(word: &str) -> (&str, &str) {
    match word.rfind(['_', '/']) {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    }
}

/// Render `to` with the case of the first character of `original`.
fn match_case(original: &str, to: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    if !upper {
        return to.to_string();
    }
    let mut chars = to.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split `word` before a trailing `suffix`, compared ignoring ASCII case.
fn split_suffix<'a>(word: &'a str, suffix: &str) -> Option<(&'a str, &'a str)> {
    let idx = word.len().checked_sub(suffix.len())?;
    if !word.is_char_boundary(idx) {
        return None;
    }
    let (head, tail) = word.split_at(idx);
    tail.eq_ignore_ascii_case(suffix).then_some((head, tail))
}

/// Irregular words match as suffixes: `woman` → `women`,
/// `grandchild` → `grandchildren`.
fn irregular(word: &str, to_plural: bool) -> Option<String> {
    IRREGULARS.iter().find_map(|&(singular, plural)| {
        let (from, to) = if to_plural {
            (singular, plural)
        } else {
            (plural, singular)
        };
        if split_suffix(word, to).is_some() {
            return Some(word.to_string());
        }
        split_suffix(word, from).map(|(head, tail)| format!("{head}{}", match_case(tail, to)))
    })
}

fn inflect(word: &str, rules: &Rules, to_plural: bool) -> String {
    if word.is_empty() {
        return String::new();
    }

    let (_, tail) = split_tail(word);
    if UNCOUNTABLES.contains(&tail.to_lowercase().as_str()) {
        return word.to_string();
    }
    if let Some(inflected) = irregular(word, to_plural) {
        return inflected;
    }

    for (re, replacement) in rules {
        if re.is_match(word) {
            return re.replace(word, *replacement).into_owned();
        }
    }
    word.to_string()
}

/// `item` → `items`, `category` → `categories`, `person` → `people`.
pub fn pluralize(word: &str) -> String {
    inflect(word, &PLURALS, true)
}

/// `items` → `item`, `categories` → `category`, `people` → `person`.
pub fn singularize(word: &str) -> String {
    inflect(word, &SINGULARS, false)
}

/// `LineItem` → `line_item`, `Admin::Item` → `admin/item`.
pub fn underscore(word: &str) -> String {
    let word = word.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

/// `line_item` → `LineItem`, `admin/item` → `Admin::Item`.
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .map(|part| {
                    let mut chars = part.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Class name for a (possibly plural) resource name: `line_items` → `LineItem`.
pub fn classify(word: &str) -> String {
    camelize(&singularize(word))
}
