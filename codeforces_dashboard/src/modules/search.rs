use crate::types::records::UserRecord;
use chrono::NaiveDate;
use codeforces_dashboard_libs::api::DateRangeParameter;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::cmp::Reverse;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Predicates selected in the dashboard sidebar. Every field is optional;
/// an absent field applies no restriction.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq, Clone)]
pub struct UserFilter {
    pub country: Option<String>,
    pub rank: Option<String>,
    pub registered: Option<DateRangeParameter>,
}

impl UserFilter {
    /// Equality filters are exact and case-sensitive. A record missing the
    /// filtered field is rejected only while that filter is active.
    pub fn matches(&self, user: &UserRecord) -> bool {
        if let Some(country) = &self.country {
            if user.country.as_ref() != Some(country) {
                return false;
            }
        }
        if let Some(rank) = &self.rank {
            if user.rank.as_ref() != Some(rank) {
                return false;
            }
        }
        if let Some(registered) = &self.registered {
            if !registered.contains(user.registration_date) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct PageSelection {
    pub limit: u32,
    /// 1-indexed page number.
    pub page: u32,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<UserRecord>,
    pub total: u32,
    pub index: u32,
    pub pages: u32,
    pub count: u32,
    pub first: u32,
    pub last: u32,
}

/// Filters, sorts and slices the enriched set into one displayable page.
///
/// The sort is by rating descending with missing ratings last; `sort_by_key`
/// is stable, so ties keep their source order and pages never overlap. The
/// function is total: an out-of-range page yields an empty slice and an
/// empty input yields a single empty page.
pub fn apply(records: &[UserRecord], filter: &UserFilter, selection: &PageSelection) -> PageResult {
    let mut filtered: Vec<UserRecord> = records
        .iter()
        .filter(|user| filter.matches(user))
        .cloned()
        .collect();
    filtered.sort_by_key(|user| Reverse(user.rating.unwrap_or(i32::MIN)));

    let total = filtered.len();
    let limit = selection.limit.max(1) as usize;
    let index = selection.page.max(1) as usize;
    let pages = (total.max(1) + limit - 1) / limit;

    let start = (index - 1).saturating_mul(limit).min(total);
    let end = (start + limit).min(total);
    let items: Vec<UserRecord> = filtered[start..end].to_vec();

    let count = items.len();
    let (first, last) = if count == 0 { (0, 0) } else { (start + 1, end) };

    PageResult {
        items,
        total: total as u32,
        index: index as u32,
        pages: pages as u32,
        count: count as u32,
        first: first as u32,
        last: last as u32,
    }
}

/// Distinct countries present in the enriched set, sorted; records without
/// a country contribute nothing.
pub fn country_options(records: &[UserRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|user| user.country.clone())
        .sorted()
        .dedup()
        .collect()
}

/// Distinct ranks present in the enriched set, sorted.
pub fn rank_options(records: &[UserRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|user| user.rank.clone())
        .sorted()
        .dedup()
        .collect()
}

/// Earliest and latest registration date, used as the default date-range
/// bounds in the UI. `None` on an empty set.
pub fn registration_bounds(records: &[UserRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|user| user.registration_date).min()?;
    let max = records.iter().map(|user| user.registration_date).max()?;

    Some((min, max))
}

#[cfg(test)]
mod test {
    use super::*;
    use codeforces_dashboard_libs::codeforces::model::RatedUser;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn user(
        handle: &str,
        rating: Option<i32>,
        country: Option<&str>,
        rank: Option<&str>,
        registered: NaiveDate,
    ) -> UserRecord {
        UserRecord::from(RatedUser {
            handle: String::from(handle),
            first_name: None,
            last_name: None,
            country: country.map(String::from),
            city: None,
            organization: None,
            rank: rank.map(String::from),
            max_rank: rank.map(String::from),
            rating,
            max_rating: rating,
            contribution: None,
            registration_time_seconds: registered
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp(),
        })
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            user(
                "alice",
                Some(2400),
                Some("Japan"),
                Some("grandmaster"),
                date(2015, 3, 10),
            ),
            user("bob", None, Some("Japan"), None, date(2020, 1, 1)),
            user(
                "carol",
                Some(1900),
                Some("France"),
                Some("candidate master"),
                date(2020, 1, 2),
            ),
            user(
                "dave",
                Some(1900),
                None,
                Some("candidate master"),
                date(2018, 7, 23),
            ),
        ]
    }

    fn handles(result: &PageResult) -> Vec<&str> {
        result
            .items
            .iter()
            .map(|user| user.handle.as_str())
            .collect()
    }

    #[test]
    fn sorts_by_rating_descending_with_missing_ratings_last() {
        let records = vec![
            user("a", Some(2400), None, None, date(2020, 1, 1)),
            user("b", None, None, None, date(2020, 1, 1)),
            user("c", Some(1900), None, None, date(2020, 1, 1)),
        ];

        let result = apply(
            &records,
            &UserFilter::default(),
            &PageSelection { limit: 10, page: 1 },
        );

        assert_eq!(handles(&result), vec!["a", "c", "b"]);
        assert_eq!(result.total, 3);
        assert_eq!(result.pages, 1);
        assert_eq!((result.first, result.last), (1, 3));
    }

    #[test]
    fn ratings_never_increase_within_a_page() {
        let result = apply(
            &sample(),
            &UserFilter::default(),
            &PageSelection::default(),
        );

        let ratings: Vec<i32> = result
            .items
            .iter()
            .map(|user| user.rating.unwrap_or(i32::MIN))
            .collect();
        assert!(ratings.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn country_filter_keeps_only_exact_matches() {
        let filter = UserFilter {
            country: Some(String::from("Japan")),
            ..UserFilter::default()
        };

        let result = apply(&sample(), &filter, &PageSelection::default());

        assert_eq!(handles(&result), vec!["alice", "bob"]);
        assert!(result
            .items
            .iter()
            .all(|user| user.country.as_deref() == Some("Japan")));
    }

    #[test]
    fn rank_filter_excludes_records_without_a_rank() {
        let filter = UserFilter {
            rank: Some(String::from("candidate master")),
            ..UserFilter::default()
        };

        let result = apply(&sample(), &filter, &PageSelection::default());

        assert_eq!(handles(&result), vec!["carol", "dave"]);
    }

    #[test]
    fn unfiltered_records_keep_missing_demographics() {
        let result = apply(
            &sample(),
            &UserFilter::default(),
            &PageSelection::default(),
        );

        // dave has no country, bob has no rank; without an active filter
        // both stay in the data
        assert_eq!(result.total, 4);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let filter = UserFilter {
            registered: Some(DateRangeParameter {
                from: Some(date(2020, 1, 1)),
                to: Some(date(2020, 1, 1)),
            }),
            ..UserFilter::default()
        };

        let result = apply(&sample(), &filter, &PageSelection::default());

        // bob registered on 2020-01-01, carol one day later
        assert_eq!(handles(&result), vec!["bob"]);
    }

    #[test]
    fn inverted_date_range_yields_an_empty_page() {
        let filter = UserFilter {
            registered: Some(DateRangeParameter {
                from: Some(date(2021, 1, 1)),
                to: Some(date(2020, 1, 1)),
            }),
            ..UserFilter::default()
        };

        let result = apply(&sample(), &filter, &PageSelection::default());

        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.pages, 1);
    }

    #[test]
    fn empty_input_yields_a_single_empty_page() {
        let result = apply(&[], &UserFilter::default(), &PageSelection::default());

        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.pages, 1);
        assert_eq!((result.first, result.last), (0, 0));
    }

    #[test]
    fn page_beyond_total_yields_an_empty_slice() {
        let result = apply(
            &sample(),
            &UserFilter::default(),
            &PageSelection { limit: 10, page: 7 },
        );

        assert!(result.items.is_empty());
        assert_eq!(result.total, 4);
        assert_eq!(result.pages, 1);
        assert_eq!(result.index, 7);
        assert_eq!((result.first, result.last), (0, 0));
    }

    #[test]
    fn concatenated_pages_reproduce_the_filtered_set_exactly_once() {
        let records: Vec<UserRecord> = (0..25)
            .map(|i| {
                user(
                    &format!("user{:02}", i),
                    // a few rating ties and a missing-rating tail
                    if i % 7 == 0 { None } else { Some(1000 + (i % 5) * 100) },
                    None,
                    None,
                    date(2019, 6, 15),
                )
            })
            .collect();

        let selection = PageSelection { limit: 10, page: 1 };
        let full = apply(
            &records,
            &UserFilter::default(),
            &PageSelection {
                limit: 500,
                page: 1,
            },
        );

        let first = apply(&records, &UserFilter::default(), &selection);
        assert_eq!(first.pages, 3);
        assert_eq!((first.first, first.last), (1, 10));

        let mut collected: Vec<UserRecord> = Vec::new();
        for page in 1..=first.pages {
            let result = apply(
                &records,
                &UserFilter::default(),
                &PageSelection { limit: 10, page },
            );
            collected.extend(result.items);
        }

        assert_eq!(collected, full.items);
    }

    #[test]
    fn apply_is_deterministic() {
        let filter = UserFilter {
            country: Some(String::from("Japan")),
            ..UserFilter::default()
        };
        let selection = PageSelection { limit: 10, page: 1 };

        let first = apply(&sample(), &filter, &selection);
        let second = apply(&sample(), &filter, &selection);

        assert_eq!(first, second);
    }

    #[test]
    fn option_lists_are_distinct_sorted_and_skip_missing_values() {
        let records = sample();

        assert_eq!(country_options(&records), vec!["France", "Japan"]);
        assert_eq!(
            rank_options(&records),
            vec!["candidate master", "grandmaster"]
        );
    }

    #[test]
    fn registration_bounds_span_the_enriched_set() {
        let records = sample();

        assert_eq!(
            registration_bounds(&records),
            Some((date(2015, 3, 10), date(2020, 1, 2)))
        );
        assert_eq!(registration_bounds(&[]), None);
    }
}
