//! Tokenisation and casing helpers shared by matching and rewriting.

use std::collections::HashSet;

/// Lowercased alphanumeric runs of `text`, in order, duplicates kept.
pub fn words(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn word_set(text: &str) -> HashSet<String> {
    words(text).into_iter().collect()
}

/// Strips surrounding punctuation and lowercases. `"Sofa,"` -> `"sofa"`,
/// `"|"` -> `""`.
pub fn normalize_token(token: &str) -> String {
    token.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase()
}

/// Normalised whitespace tokens, skipping tokens that are pure punctuation.
pub fn normalized_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(normalize_token).filter(|token| !token.is_empty()).collect()
}

/// Uppercases the first letter of every letter run and lowercases the rest,
/// so `"3 seater sofa"` becomes `"3 Seater Sofa"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// True when the leading normalised tokens of `text` are exactly `phrase`'s
/// tokens. An empty phrase never leads.
pub fn leads_with(text: &str, phrase: &str) -> bool {
    let phrase_tokens = normalized_tokens(phrase);
    if phrase_tokens.is_empty() {
        return false;
    }
    let text_tokens = normalized_tokens(text);
    text_tokens.len() >= phrase_tokens.len() && text_tokens[..phrase_tokens.len()] == phrase_tokens
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Moves the whitespace tokens of `title` matching `phrase` (one title token
/// per phrase token, first unused match) to the front in phrase order. The
/// remaining tokens keep their order. Returns `None` if any phrase token is
/// missing from the title.
pub fn relocate_to_front(title: &str, phrase: &str) -> Option<String> {
    let tokens = title.split_whitespace().collect::<Vec<_>>();
    let normalized = tokens.iter().map(|token| normalize_token(token)).collect::<Vec<_>>();
    let phrase_tokens = normalized_tokens(phrase);
    if phrase_tokens.is_empty() {
        return None;
    }

    let mut used = vec![false; tokens.len()];
    let mut front = Vec::with_capacity(phrase_tokens.len());
    for wanted in &phrase_tokens {
        let position =
            (0..tokens.len()).find(|&index| !used[index] && &normalized[index] == wanted)?;
        used[position] = true;
        front.push(tokens[position].trim_matches(|ch: char| !ch.is_alphanumeric()));
    }

    let rest = tokens.iter().enumerate().filter(|(index, _)| !used[*index]).map(|(_, token)| *token);
    Some(front.into_iter().chain(rest).collect::<Vec<_>>().join(" "))
}

/// Moves every token whose normalised form satisfies `is_front` to the front,
/// keeping relative order on both sides.
pub fn partition_to_front(title: &str, is_front: impl Fn(&str) -> bool) -> String {
    let (front, rest): (Vec<&str>, Vec<&str>) =
        title.split_whitespace().partition(|token| is_front(&normalize_token(token)));
    front.into_iter().chain(rest).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{
        leads_with, normalize_token, partition_to_front, relocate_to_front, title_case, words,
    };

    #[test]
    fn words_split_on_punctuation_and_lowercase() {
        assert_eq!(words("3-Seater Sofa, GREY"), vec!["3", "seater", "sofa", "grey"]);
        assert!(words(" | ").is_empty());
    }

    #[test]
    fn normalize_token_trims_punctuation() {
        assert_eq!(normalize_token("Sofa,"), "sofa");
        assert_eq!(normalize_token("|"), "");
        assert_eq!(normalize_token("(Oak)"), "oak");
    }

    #[test]
    fn title_case_capitalises_each_letter_run() {
        assert_eq!(title_case("grey fabric sofa"), "Grey Fabric Sofa");
        assert_eq!(title_case("3 seater SOFA"), "3 Seater Sofa");
        assert_eq!(title_case("mid-century desk"), "Mid-Century Desk");
    }

    #[test]
    fn leads_with_skips_delimiter_tokens() {
        assert!(leads_with("Grey Fabric Sofa | 3 Seater", "grey fabric sofa"));
        assert!(leads_with("Oak Dining Table", "oak dining table"));
        assert!(!leads_with("Oak Dining", "oak dining table"));
        assert!(!leads_with("Dining Oak Table", "oak dining table"));
        assert!(!leads_with("Oak Dining Table", ""));
    }

    #[test]
    fn relocate_moves_phrase_words_and_keeps_rest_order() {
        assert_eq!(
            relocate_to_front("3 Seater Fabric Sofa Grey", "grey fabric sofa").as_deref(),
            Some("Grey Fabric Sofa 3 Seater")
        );
        assert_eq!(
            relocate_to_front("Table, Oak Dining", "oak dining table").as_deref(),
            Some("Oak Dining Table")
        );
        assert!(relocate_to_front("Oak Dining Chair", "oak dining table").is_none());
    }

    #[test]
    fn partition_keeps_relative_order() {
        let moved = partition_to_front("Large Handmade Rustic Reclaimed Wood Oak Bench Seat", |t| {
            t == "oak" || t == "bench"
        });
        assert_eq!(moved, "Oak Bench Large Handmade Rustic Reclaimed Wood Seat");
    }
}
