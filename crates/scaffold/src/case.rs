//! String-case derivation
//!
//! Every token derived from a plugin name goes through these functions.
//! `-` is a word separator equivalent to `_`, so `my-plugin` and
//! `my_plugin` produce the same snake, camel, and pascal forms.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// Words whose plural is the same as the singular
const UNCOUNTABLE: &[&str] = &[
    "audio",
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "media",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
];

/// Irregular singular -> plural pairs
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

fn normalize(input: &str) -> String {
    input.replace('-', "_")
}

/// Plain lowercase, separators untouched
pub fn lower(input: &str) -> String {
    input.to_lowercase()
}

/// snake_case (`my-plugin` -> `my_plugin`, `HelloWorld` -> `hello_world`)
pub fn snake(input: &str) -> String {
    normalize(input).to_snake_case()
}

/// camelCase (`my-plugin` -> `myPlugin`)
pub fn camel(input: &str) -> String {
    normalize(input).to_lower_camel_case()
}

/// PascalCase (`my-plugin` -> `MyPlugin`)
pub fn pascal(input: &str) -> String {
    normalize(input).to_upper_camel_case()
}

/// UPPER_SNAKE (`my-plugin` -> `MY_PLUGIN`)
pub fn upper_snake(input: &str) -> String {
    snake(input).to_uppercase()
}

/// kebab-case (`MyPlugin` -> `my-plugin`)
pub fn kebab(input: &str) -> String {
    input.to_kebab_case()
}

/// Uppercase the first character only
pub fn ucfirst(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pluralize the last word of `input`, keeping everything before it.
///
/// Words are split on `_`, `-`, and spaces. The last word keeps its
/// casing (`POST` -> `POSTS`, `Post` -> `Posts`). Plurals pass through
/// unchanged, so `pluralize(pluralize(x)) == pluralize(x)` for the
/// vocabulary covered by the rule table.
pub fn pluralize(input: &str) -> String {
    let split = input
        .rfind(|c: char| c == '_' || c == '-' || c == ' ')
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let (prefix, word) = input.split_at(split);

    if word.is_empty() {
        return input.to_string();
    }

    format!("{}{}", prefix, pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    let plural = plural_lower(&word.to_lowercase());

    let has_alpha = word.chars().any(char::is_alphabetic);
    if has_alpha && !word.chars().any(char::is_lowercase) {
        plural.to_uppercase()
    } else if word.chars().next().is_some_and(char::is_uppercase) {
        ucfirst(&plural)
    } else {
        plural
    }
}

fn plural_lower(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    for (singular, plural) in IRREGULAR {
        if word == *singular {
            return plural.to_string();
        }
        if word == *plural {
            return word.to_string();
        }
    }

    if word.ends_with("ss") || word.ends_with("us") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix("is") {
        return format!("{}es", stem);
    }
    if word.ends_with('s') {
        // Already plural
        return word.to_string();
    }
    if word.ends_with('x') || word.ends_with('z') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{}ves", stem);
    }
    if let Some(stem) = word.strip_suffix("lf") {
        return format!("{}lves", stem);
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphen_equals_underscore() {
        assert_eq!(snake("my-thing"), snake("my_thing"));
        assert_eq!(camel("my-thing"), camel("my_thing"));
        assert_eq!(pascal("my-thing"), pascal("my_thing"));
        assert_eq!(snake("my-thing"), "my_thing");
        assert_eq!(camel("my-thing"), "myThing");
        assert_eq!(pascal("my-thing"), "MyThing");
    }

    #[test]
    fn test_case_family() {
        assert_eq!(lower("Hello-World"), "hello-world");
        assert_eq!(snake("HelloWorld"), "hello_world");
        assert_eq!(upper_snake("hello-world"), "HELLO_WORLD");
        assert_eq!(kebab("HelloWorld"), "hello-world");
        assert_eq!(ucfirst("hello_worlds"), "Hello_worlds");
        assert_eq!(ucfirst(""), "");
    }

    #[test]
    fn test_pluralize_rules() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("analysis"), "analyses");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("shelf"), "shelves");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("news"), "news");
    }

    #[test]
    fn test_pluralize_last_word_only() {
        assert_eq!(pluralize("hello_world"), "hello_worlds");
        assert_eq!(pluralize("hello-world"), "hello-worlds");
        assert_eq!(pluralize("blog_category"), "blog_categories");
        assert_eq!(pluralize("team_person"), "team_people");
    }

    #[test]
    fn test_pluralize_keeps_case() {
        assert_eq!(pluralize("Post"), "Posts");
        assert_eq!(pluralize("POST"), "POSTS");
        assert_eq!(pluralize("Child"), "Children");
    }

    #[test]
    fn test_pluralize_is_idempotent() {
        for word in [
            "post", "category", "box", "class", "status", "analysis", "knife", "shelf", "person",
            "child", "mouse", "news", "hello_world", "blog-entry",
        ] {
            let once = pluralize(word);
            assert_eq!(pluralize(&once), once, "pluralizing {} twice", word);
        }
    }
}
