//! Catalog operations.
//!
//! Every mutation is a pure function from a catalog to a candidate catalog.
//! The caller persists the candidate and commits it only after the backend
//! confirms the save, so the in-memory catalog never diverges from the last
//! persisted state.

use thiserror::Error;

use crate::model::{Catalog, CategoryRecord, KeywordEntry};

const MAX_CATEGORY_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("category name must be 1-20 letters, digits, '_' or '-'")]
    InvalidCategoryName,
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
    #[error("category \"{0}\" does not exist")]
    UnknownCategory(String),
    #[error("keyword \"{0}\" already exists in this category")]
    DuplicateKeyword(String),
    #[error("keyword \"{0}\" does not exist in this category")]
    UnknownKeyword(String),
    #[error("no keywords given")]
    EmptyInput,
}

/// Counts for a batch keyword addition. `added == 0` means the candidate is
/// identical to the input catalog and nothing needs persisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchAddOutcome {
    pub added: usize,
    pub skipped: usize,
}

/// Category names are limited to 1-20 characters of letters (any script),
/// digits, underscores and hyphens.
pub fn validate_category_name(name: &str) -> Result<(), CatalogError> {
    let count = name.chars().count();
    if count == 0 || count > MAX_CATEGORY_NAME_CHARS {
        return Err(CatalogError::InvalidCategoryName);
    }
    if !name
        .chars()
        .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
    {
        return Err(CatalogError::InvalidCategoryName);
    }
    Ok(())
}

pub fn add_category(
    catalog: &Catalog,
    name: &str,
    created_at: Option<String>,
) -> Result<Catalog, CatalogError> {
    let name = name.trim();
    validate_category_name(name)?;
    if catalog.contains_key(name) {
        return Err(CatalogError::DuplicateCategory(name.to_string()));
    }
    let mut next = catalog.clone();
    next.insert(
        name.to_string(),
        CategoryRecord {
            enabled: true,
            keywords: Vec::new(),
            created_at,
        },
    );
    Ok(next)
}

pub fn delete_category(catalog: &Catalog, name: &str) -> Result<Catalog, CatalogError> {
    if !catalog.contains_key(name) {
        return Err(CatalogError::UnknownCategory(name.to_string()));
    }
    let mut next = catalog.clone();
    next.remove(name);
    Ok(next)
}

pub fn toggle_category(catalog: &Catalog, name: &str) -> Result<Catalog, CatalogError> {
    let mut next = catalog.clone();
    let data = next
        .get_mut(name)
        .ok_or_else(|| CatalogError::UnknownCategory(name.to_string()))?;
    data.enabled = !data.enabled;
    Ok(next)
}

/// Adds a single keyword. Duplicates are a case-sensitive exact match and
/// are rejected without producing a candidate.
pub fn add_keyword(
    catalog: &Catalog,
    category: &str,
    text: &str,
    added_at: Option<String>,
) -> Result<Catalog, CatalogError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CatalogError::EmptyInput);
    }
    let mut next = catalog.clone();
    let data = next
        .get_mut(category)
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))?;
    if data.keywords.iter().any(|k| k.text == text) {
        return Err(CatalogError::DuplicateKeyword(text.to_string()));
    }
    data.keywords.push(KeywordEntry {
        text: text.to_string(),
        enabled: true,
        added_at,
    });
    Ok(next)
}

pub fn delete_keyword(
    catalog: &Catalog,
    category: &str,
    keyword: &str,
) -> Result<Catalog, CatalogError> {
    let mut next = catalog.clone();
    let data = next
        .get_mut(category)
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))?;
    let before = data.keywords.len();
    data.keywords.retain(|k| k.text != keyword);
    if data.keywords.len() == before {
        return Err(CatalogError::UnknownKeyword(keyword.to_string()));
    }
    Ok(next)
}

pub fn toggle_keyword(
    catalog: &Catalog,
    category: &str,
    keyword: &str,
) -> Result<Catalog, CatalogError> {
    let mut next = catalog.clone();
    let data = next
        .get_mut(category)
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))?;
    let entry = data
        .keywords
        .iter_mut()
        .find(|k| k.text == keyword)
        .ok_or_else(|| CatalogError::UnknownKeyword(keyword.to_string()))?;
    entry.enabled = !entry.enabled;
    Ok(next)
}

/// Adds one keyword per non-empty input line, skipping keywords the category
/// already holds. With nothing but duplicates the returned candidate equals
/// the input and the outcome reports zero added.
pub fn batch_add_keywords(
    catalog: &Catalog,
    category: &str,
    input: &str,
    added_at: Option<String>,
) -> Result<(Catalog, BatchAddOutcome), CatalogError> {
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(CatalogError::EmptyInput);
    }

    let mut next = catalog.clone();
    let data = next
        .get_mut(category)
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))?;

    let mut outcome = BatchAddOutcome::default();
    for line in lines {
        if data.keywords.iter().any(|k| k.text == line) {
            outcome.skipped += 1;
            continue;
        }
        data.keywords.push(KeywordEntry {
            text: line.to_string(),
            enabled: true,
            added_at: added_at.clone(),
        });
        outcome.added += 1;
    }
    Ok((next, outcome))
}

/// Keywords eligible for a crawl: enabled keywords of enabled categories,
/// deduplicated across categories, in catalog order.
pub fn enabled_keywords(catalog: &Catalog) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut keywords = Vec::new();
    for data in catalog.values().filter(|data| data.enabled) {
        for entry in data.keywords.iter().filter(|k| k.enabled) {
            if seen.insert(entry.text.clone()) {
                keywords.push(entry.text.clone());
            }
        }
    }
    keywords
}

/// Total keyword count across all categories, enabled or not.
pub fn total_keywords(catalog: &Catalog) -> usize {
    catalog.values().map(|data| data.keywords.len()).sum()
}
