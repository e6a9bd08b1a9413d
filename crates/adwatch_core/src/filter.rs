//! Derived views over the result set.
//!
//! Filtering never mutates the canonical result set or catalog; every
//! function here builds a fresh value from shared references.

use crate::model::{AdRecord, Catalog, FilterSelection};

/// Applies the active filters to the result set.
///
/// Stages compose as logical AND: market, then category, then free-text
/// search. Each stage narrows an ad's keyword records and drops ads left with
/// none. The category stage keeps a record when its keyword appears in the
/// selected category's keyword list.
pub fn filtered_results(
    results: &[AdRecord],
    catalog: &Catalog,
    filter: &FilterSelection,
) -> Vec<AdRecord> {
    let mut filtered: Vec<AdRecord> = results.to_vec();

    if let Some(market) = filter.market.as_deref() {
        filtered = retain_records(filtered, |_, record| record.market == market);
    }

    if let Some(category) = filter.category.as_deref() {
        filtered = retain_records(filtered, |_, record| {
            catalog
                .get(category)
                .is_some_and(|data| data.keywords.iter().any(|k| k.text == record.keyword))
        });
    }

    if !filter.search.is_empty() {
        let needle = filter.search.to_lowercase();
        filtered = retain_records(filtered, |ad, record| {
            record.keyword.to_lowercase().contains(&needle)
                || record.title.to_lowercase().contains(&needle)
                || ad.landing_page.to_lowercase().contains(&needle)
        });
    }

    filtered
}

fn retain_records<F>(results: Vec<AdRecord>, keep: F) -> Vec<AdRecord>
where
    F: Fn(&AdRecord, &crate::model::KeywordRecord) -> bool,
{
    results
        .into_iter()
        .filter_map(|ad| {
            let records: Vec<_> = ad
                .keyword_records
                .iter()
                .filter(|record| keep(&ad, record))
                .cloned()
                .collect();
            if records.is_empty() {
                None
            } else {
                Some(AdRecord {
                    keyword_records: records,
                    ..ad
                })
            }
        })
        .collect()
}

/// Sorted, distinct market codes across all keyword records.
pub fn markets(results: &[AdRecord]) -> Vec<String> {
    let mut codes: Vec<String> = results
        .iter()
        .flat_map(|ad| ad.keyword_records.iter())
        .filter(|record| !record.market.is_empty())
        .map(|record| record.market.clone())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}
