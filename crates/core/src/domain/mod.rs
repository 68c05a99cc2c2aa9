pub mod keyword;
pub mod product;
pub mod recommendation;

/// One tabular row as delivered by a loader: ordered `(column, cell)` pairs.
pub type RawRow = Vec<(String, String)>;

/// Lookup of the first non-blank cell among `names`. Headers match
/// case-insensitively with spaces and hyphens read as underscores, so
/// `"Status Code"` answers to `status_code`.
pub fn cell<'a>(row: &'a [(String, String)], names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        row.iter()
            .find(|(column, _)| header_matches(column, name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    })
}

pub fn header_matches(column: &str, name: &str) -> bool {
    let column = column.trim();
    column.len() == name.len()
        && column.chars().zip(name.chars()).all(|(left, right)| {
            let fold = |ch: char| match ch {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            };
            fold(left) == fold(right)
        })
}

/// Parses a numeric cell leniently. Thousands separators, decimals and
/// surrounding whitespace are accepted; `NaN`, infinities, negatives and
/// anything unparseable are treated as missing.
pub fn parse_metric(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|ch| *ch != ',' && *ch != '_').collect();
    let parsed = cleaned.parse::<f64>().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}
