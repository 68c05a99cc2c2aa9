use serde::{Deserialize, Serialize};

use super::{cell, parse_metric};

/// Position assigned to keywords the site does not rank for.
pub const NOT_RANKING_POSITION: u32 = 999;

/// One ranked search term. Immutable once loaded into a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub position: u32,
    pub search_volume: u64,
    pub difficulty: u8,
}

impl KeywordRecord {
    pub fn new(
        keyword: impl Into<String>,
        position: u32,
        search_volume: u64,
        difficulty: u8,
    ) -> Self {
        Self { keyword: keyword.into(), position, search_volume, difficulty }
    }

    pub fn is_ranking(&self) -> bool {
        self.position < NOT_RANKING_POSITION
    }

    /// Short metric summary used inside reasoning strings.
    pub fn metrics_label(&self) -> String {
        let position = if self.is_ranking() {
            format!("position {}", self.position)
        } else {
            "not ranking".to_owned()
        };
        format!(
            "{} searches/mo, {position}, difficulty {}",
            format_count(self.search_volume),
            self.difficulty
        )
    }
}

/// A keyword row before normalization. Every metric may be absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawKeywordRow {
    pub keyword: Option<String>,
    pub position: Option<f64>,
    pub search_volume: Option<f64>,
    pub difficulty: Option<f64>,
}

impl RawKeywordRow {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self { keyword: Some(keyword.into()), ..Self::default() }
    }

    pub fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_search_volume(mut self, search_volume: f64) -> Self {
        self.search_volume = Some(search_volume);
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Reads a ranking export row. Column names are matched
    /// case-insensitively and the common ranking-tool aliases are accepted.
    pub fn from_cells(row: &[(String, String)]) -> Self {
        Self {
            keyword: cell(row, &["keyword", "query", "search_term"]).map(str::to_owned),
            position: cell(row, &["position", "rank", "current_rank"]).and_then(parse_metric),
            search_volume: cell(row, &["search_volume", "volume", "monthly_searches"])
                .and_then(parse_metric),
            difficulty: cell(row, &["difficulty", "keyword_difficulty", "kd"])
                .and_then(parse_metric),
        }
    }

    /// Produces a catalog record, or `None` when the keyword text is blank.
    /// Missing or zero positions become [`NOT_RANKING_POSITION`]; missing
    /// volume and difficulty become zero; difficulty clamps to `0..=100`.
    pub fn normalize(&self) -> Option<KeywordRecord> {
        let keyword = self.keyword.as_deref().map(str::trim).filter(|value| !value.is_empty())?;

        let position = match self.position.map(f64::round) {
            Some(value) if value >= 1.0 => value.min(f64::from(NOT_RANKING_POSITION)) as u32,
            _ => NOT_RANKING_POSITION,
        };
        let search_volume = self.search_volume.map(|value| value.round() as u64).unwrap_or(0);
        let difficulty = self.difficulty.map(|value| value.round().min(100.0) as u8).unwrap_or(0);

        Some(KeywordRecord::new(keyword, position, search_volume, difficulty))
    }
}

/// Which performance profile a relevant keyword falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBucket {
    EasyWin,
    TopPerformer,
    PoorPerformer,
    MissingOpportunity,
}

impl PerformanceBucket {
    /// Selection order used by the rewriter, highest lever first.
    pub const PRIORITY: [PerformanceBucket; 4] = [
        PerformanceBucket::EasyWin,
        PerformanceBucket::TopPerformer,
        PerformanceBucket::PoorPerformer,
        PerformanceBucket::MissingOpportunity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBucket::EasyWin => "easy-win",
            PerformanceBucket::TopPerformer => "top-performing",
            PerformanceBucket::PoorPerformer => "poor-performing",
            PerformanceBucket::MissingOpportunity => "missing-opportunity",
        }
    }
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_count, KeywordRecord, RawKeywordRow, NOT_RANKING_POSITION};

    fn row(cells: &[(&str, &str)]) -> Vec<(String, String)> {
        cells.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn normalize_trims_keyword_and_defaults_missing_metrics() {
        let record = RawKeywordRow::new("  oak sideboard ").normalize().expect("record");

        assert_eq!(record.keyword, "oak sideboard");
        assert_eq!(record.position, NOT_RANKING_POSITION);
        assert_eq!(record.search_volume, 0);
        assert_eq!(record.difficulty, 0);
    }

    #[test]
    fn normalize_drops_blank_keywords() {
        assert!(RawKeywordRow::new("   ").normalize().is_none());
        assert!(RawKeywordRow::default().normalize().is_none());
    }

    #[test]
    fn zero_position_reads_as_not_ranking() {
        let record = RawKeywordRow::new("oak bed").with_position(0.0).normalize().expect("record");
        assert!(!record.is_ranking());
    }

    #[test]
    fn difficulty_is_clamped_and_metrics_rounded() {
        let record = RawKeywordRow::new("walnut desk")
            .with_position(4.4)
            .with_search_volume(1250.6)
            .with_difficulty(180.0)
            .normalize()
            .expect("record");

        assert_eq!(record, KeywordRecord::new("walnut desk", 4, 1251, 100));
    }

    #[test]
    fn from_cells_accepts_ranking_tool_aliases() {
        let raw = RawKeywordRow::from_cells(&row(&[
            ("Keyword", "grey fabric sofa"),
            ("Rank", "45"),
            ("Volume", "1,800"),
            ("KD", "25"),
        ]));

        assert_eq!(raw.normalize(), Some(KeywordRecord::new("grey fabric sofa", 45, 1800, 25)));
    }

    #[test]
    fn from_cells_treats_nan_as_missing() {
        let raw = RawKeywordRow::from_cells(&row(&[
            ("keyword", "pine bed"),
            ("position", "NaN"),
            ("search_volume", "nan"),
        ]));
        let record = raw.normalize().expect("record");

        assert_eq!(record.position, NOT_RANKING_POSITION);
        assert_eq!(record.search_volume, 0);
    }

    #[test]
    fn metrics_label_formats_volume_and_position() {
        assert_eq!(
            KeywordRecord::new("oak table", 5, 12000, 10).metrics_label(),
            "12,000 searches/mo, position 5, difficulty 10"
        );
        assert_eq!(
            KeywordRecord::new("oak table", NOT_RANKING_POSITION, 300, 0).metrics_label(),
            "300 searches/mo, not ranking, difficulty 0"
        );
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1800), "1,800");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
