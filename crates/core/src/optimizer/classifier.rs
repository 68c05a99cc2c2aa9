use super::matcher::RelevantKeyword;
use crate::config::ClassifierConfig;
use crate::domain::keyword::{KeywordRecord, PerformanceBucket};

/// Relevant keywords split by performance profile. A keyword may sit in
/// several buckets; each bucket is ordered by descending search volume.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedKeywords<'c> {
    pub easy_wins: Vec<RelevantKeyword<'c>>,
    pub top_performers: Vec<RelevantKeyword<'c>>,
    pub poor_performers: Vec<RelevantKeyword<'c>>,
    pub missing_opportunities: Vec<RelevantKeyword<'c>>,
    /// How many relevant keywords were classified, bucketed or not.
    pub relevant: usize,
}

impl<'c> ClassifiedKeywords<'c> {
    pub fn bucket(&self, bucket: PerformanceBucket) -> &[RelevantKeyword<'c>] {
        match bucket {
            PerformanceBucket::EasyWin => &self.easy_wins,
            PerformanceBucket::TopPerformer => &self.top_performers,
            PerformanceBucket::PoorPerformer => &self.poor_performers,
            PerformanceBucket::MissingOpportunity => &self.missing_opportunities,
        }
    }

    /// First keyword of the first non-empty bucket in priority order.
    pub fn winner(&self) -> Option<(PerformanceBucket, &RelevantKeyword<'c>)> {
        PerformanceBucket::PRIORITY
            .iter()
            .find_map(|bucket| self.bucket(*bucket).first().map(|keyword| (*bucket, keyword)))
    }

    pub fn is_empty(&self) -> bool {
        PerformanceBucket::PRIORITY.iter().all(|bucket| self.bucket(*bucket).is_empty())
    }
}

#[derive(Clone, Debug, Default)]
pub struct PerformanceClassifier {
    config: ClassifierConfig,
}

impl PerformanceClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn buckets_for(&self, record: &KeywordRecord) -> Vec<PerformanceBucket> {
        PerformanceBucket::PRIORITY
            .iter()
            .copied()
            .filter(|bucket| self.qualifies(*bucket, record))
            .collect()
    }

    pub fn classify<'c>(&self, relevant: &[RelevantKeyword<'c>]) -> ClassifiedKeywords<'c> {
        let mut classified = ClassifiedKeywords { relevant: relevant.len(), ..Default::default() };

        for keyword in relevant {
            for bucket in self.buckets_for(keyword.record) {
                let target = match bucket {
                    PerformanceBucket::EasyWin => &mut classified.easy_wins,
                    PerformanceBucket::TopPerformer => &mut classified.top_performers,
                    PerformanceBucket::PoorPerformer => &mut classified.poor_performers,
                    PerformanceBucket::MissingOpportunity => &mut classified.missing_opportunities,
                };
                target.push(keyword.clone());
            }
        }

        for bucket in [
            &mut classified.easy_wins,
            &mut classified.top_performers,
            &mut classified.poor_performers,
            &mut classified.missing_opportunities,
        ] {
            bucket.sort_by(|left, right| {
                right.record.search_volume.cmp(&left.record.search_volume)
            });
        }

        classified
    }

    fn qualifies(&self, bucket: PerformanceBucket, record: &KeywordRecord) -> bool {
        let config = &self.config;
        match bucket {
            PerformanceBucket::EasyWin => {
                record.difficulty < config.easy_win_max_difficulty
                    && record.search_volume > config.easy_win_min_volume
                    && record.position > config.easy_win_min_position
            }
            PerformanceBucket::TopPerformer => {
                record.position <= config.top_performer_max_position && record.search_volume > 0
            }
            PerformanceBucket::PoorPerformer => {
                record.position > config.poor_performer_min_position
                    && record.search_volume > config.poor_performer_min_volume
            }
            PerformanceBucket::MissingOpportunity => {
                record.position > config.missing_opportunity_min_position
                    && record.search_volume > config.missing_opportunity_min_volume
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PerformanceClassifier;
    use crate::config::{ClassifierConfig, ClassifierPreset};
    use crate::domain::keyword::{KeywordRecord, PerformanceBucket, NOT_RANKING_POSITION};
    use crate::optimizer::matcher::{RelevanceReason, RelevantKeyword};

    fn relevant(records: &[KeywordRecord]) -> Vec<RelevantKeyword<'_>> {
        records
            .iter()
            .enumerate()
            .map(|(catalog_index, record)| RelevantKeyword {
                record,
                reason: RelevanceReason::ExactSubstring,
                catalog_index,
            })
            .collect()
    }

    #[test]
    fn easy_win_boundaries() {
        let classifier = PerformanceClassifier::default();
        let easy = |difficulty, volume, position| {
            classifier
                .buckets_for(&KeywordRecord::new("k", position, volume, difficulty))
                .contains(&PerformanceBucket::EasyWin)
        };

        assert!(easy(29, 301, 31));
        assert!(!easy(30, 301, 31));
        assert!(!easy(29, 300, 31));
        assert!(!easy(29, 301, 30));
    }

    #[test]
    fn top_performer_requires_rank_ten_or_better() {
        let classifier = PerformanceClassifier::default();
        let top = |position, volume| {
            classifier
                .buckets_for(&KeywordRecord::new("k", position, volume, 50))
                .contains(&PerformanceBucket::TopPerformer)
        };

        assert!(top(10, 1));
        assert!(!top(11, 1000));
        assert!(!top(NOT_RANKING_POSITION, 1000));
    }

    #[test]
    fn keyword_can_sit_in_several_buckets() {
        let classifier = PerformanceClassifier::default();
        let buckets = classifier.buckets_for(&KeywordRecord::new("k", 60, 1800, 25));

        assert_eq!(
            buckets,
            vec![
                PerformanceBucket::EasyWin,
                PerformanceBucket::PoorPerformer,
                PerformanceBucket::MissingOpportunity
            ]
        );
    }

    #[test]
    fn high_volume_preset_drops_position_gate() {
        let classifier =
            PerformanceClassifier::new(ClassifierConfig::from_preset(ClassifierPreset::HighVolume));
        let record = KeywordRecord::new("k", 4, 2500, 35);

        assert!(classifier.buckets_for(&record).contains(&PerformanceBucket::EasyWin));
        assert!(!PerformanceClassifier::default()
            .buckets_for(&record)
            .contains(&PerformanceBucket::EasyWin));
    }

    #[test]
    fn buckets_sort_by_volume_and_winner_follows_priority() {
        let records = vec![
            KeywordRecord::new("a", 3, 200, 60),
            KeywordRecord::new("b", 25, 800, 60),
            KeywordRecord::new("c", 8, 900, 60),
        ];
        let classified = PerformanceClassifier::default().classify(&relevant(&records));

        let tops = classified.top_performers.iter().map(|k| k.record.keyword.as_str());
        assert_eq!(tops.collect::<Vec<_>>(), vec!["c", "a"]);
        assert_eq!(classified.poor_performers.len(), 1);
        assert_eq!(classified.relevant, 3);

        let (bucket, keyword) = classified.winner().expect("winner");
        assert_eq!(bucket, PerformanceBucket::TopPerformer);
        assert_eq!(keyword.record.keyword, "c");
    }

    #[test]
    fn nothing_relevant_means_no_winner() {
        let classified = PerformanceClassifier::default().classify(&[]);
        assert!(classified.is_empty());
        assert!(classified.winner().is_none());
    }
}
