//! Property-based tests for the holiday index.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::model::{HolidayIndex, HolidayRecord};

    /// Strategy to generate ISO-looking dates within one year
    fn date_strategy() -> impl Strategy<Value = String> {
        (1u32..=12, 1u32..=28).prop_map(|(m, d)| format!("2021-{m:02}-{d:02}"))
    }

    /// Strategy to generate a set of distinct dates
    fn distinct_dates_strategy() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set(date_strategy(), 0..40)
    }

    proptest! {
        #[test]
        fn test_distinct_dates_index_has_same_size(dates in distinct_dates_strategy()) {
            let records: Vec<HolidayRecord> = dates
                .iter()
                .map(|d| HolidayRecord::new(d.clone(), false, true))
                .collect();
            let n = records.len();

            let index = HolidayIndex::build(records);
            prop_assert_eq!(index.len(), n);
            for date in &dates {
                prop_assert!(index.contains(date));
            }
        }

        #[test]
        fn test_one_duplicate_shrinks_by_one_and_keeps_last(
            dates in prop::collection::btree_set(date_strategy(), 1..40),
            pick in any::<prop::sample::Index>()
        ) {
            let dates: Vec<String> = dates.into_iter().collect();
            let duplicated = pick.get(&dates).clone();

            let mut records: Vec<HolidayRecord> = dates
                .iter()
                .map(|d| HolidayRecord::new(d.clone(), false, true).with_names("orig", "orig"))
                .collect();
            records.push(HolidayRecord::new(duplicated.clone(), true, false).with_names("last", "last"));
            let n = records.len();

            let index = HolidayIndex::build(records);
            prop_assert_eq!(index.len(), n - 1);

            let kept = index.get(&duplicated).unwrap();
            prop_assert_eq!(kept.name.as_deref(), Some("last"));
            prop_assert!(kept.fixed);
        }
    }
}
