//! Shared application utilities.

/// Normalize a name to title case: each whitespace-separated word gets an
/// uppercased first letter and a lowercased remainder, joined by single
/// spaces.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
