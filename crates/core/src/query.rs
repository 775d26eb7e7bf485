//! In-memory list querying: free-text search, single-column sort, pagination.
//!
//! Every collection in the console (customers, tickets, products, offerings,
//! prices, services) is listed the same way, so the engine works on the JSON
//! shape of a record rather than on typed fields. A column name is simply a
//! top-level key of the serialized record.

use core::cmp::Ordering;
use core::iter::Peekable;
use core::str::Chars;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort request for a single column.
///
/// Only the first entry of [`ListQuery::sort`] is honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(alias = "id", alias = "columnId")]
    pub column: String,
    #[serde(default)]
    pub desc: bool,
}

impl SortSpec {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            desc: true,
        }
    }
}

/// Paging + search + sort request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Zero-based page.
    pub page_index: usize,
    pub page_size: usize,
    /// Free-text search (case-insensitive substring).
    pub search: String,
    pub sort: Vec<SortSpec>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
            search: String::new(),
            sort: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn page(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
            ..Self::default()
        }
    }

    /// A single page holding every matching record.
    pub fn all() -> Self {
        Self::page(0, usize::MAX)
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sorted_by(mut self, spec: SortSpec) -> Self {
        self.sort = vec![spec];
        self
    }
}

/// One page of results. `total` counts matches before slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Which fields a free-text search inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Every top-level scalar value (and scalars inside top-level arrays).
    AllFields,
    /// Only the named top-level fields.
    Fields(&'static [&'static str]),
}

/// Run a query over an owned collection.
pub fn run<T: Serialize>(records: Vec<T>, query: &ListQuery, scope: SearchScope) -> Page<T> {
    let mut rows: Vec<(Value, T)> = records
        .into_iter()
        .map(|r| (serde_json::to_value(&r).unwrap_or(Value::Null), r))
        .collect();

    let needle = query.search.trim().to_lowercase();
    if !needle.is_empty() {
        rows.retain(|(shape, _)| matches_search(shape, &needle, scope));
    }

    if let Some(spec) = query.sort.first() {
        rows.sort_by(|(a, _), (b, _)| {
            let ord = natural_cmp(&column_text(a, &spec.column), &column_text(b, &spec.column));
            if spec.desc { ord.reverse() } else { ord }
        });
    }

    let total = rows.len();
    let start = query.page_index.saturating_mul(query.page_size);
    let records = rows
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .map(|(_, r)| r)
        .collect();

    Page { records, total }
}

/// Whether a serialized record contains `needle` (already lower-cased).
pub fn matches_search(shape: &Value, needle: &str, scope: SearchScope) -> bool {
    let Value::Object(map) = shape else {
        return false;
    };
    match scope {
        SearchScope::AllFields => map.values().any(|v| value_contains(v, needle)),
        SearchScope::Fields(fields) => fields
            .iter()
            .filter_map(|f| map.get(*f))
            .any(|v| value_contains(v, needle)),
    }
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Array(items) => items
            .iter()
            .any(|v| !v.is_array() && !v.is_object() && value_contains(v, needle)),
        Value::Null | Value::Object(_) => false,
    }
}

/// Text used to order a record by `column`; missing values sort as "".
pub fn column_text(shape: &Value, column: &str) -> String {
    match shape.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Case-insensitive comparison that orders digit runs by numeric value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let xs = take_digits(&mut ai);
                let ys = take_digits(&mut bi);
                let ord = cmp_digit_runs(&xs, &ys);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = fold(x).cmp(&fold(y));
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        id: u64,
        name: String,
        tags: Vec<String>,
        note: Option<String>,
    }

    fn row(id: u64, name: &str) -> Row {
        Row {
            id,
            name: name.to_string(),
            tags: vec![],
            note: None,
        }
    }

    fn fixture() -> Vec<Row> {
        vec![
            row(1, "Switch 10"),
            row(2, "switch 9"),
            row(3, "Access Point"),
            Row {
                tags: vec!["firewall".into()],
                ..row(4, "Gateway")
            },
        ]
    }

    #[test]
    fn blank_search_matches_everything() {
        let page = run(fixture(), &ListQuery::all().with_search("   "), SearchScope::AllFields);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn search_is_case_insensitive_and_covers_numbers_and_arrays() {
        let page = run(fixture(), &ListQuery::all().with_search("SWITCH"), SearchScope::AllFields);
        assert_eq!(page.total, 2);

        let page = run(fixture(), &ListQuery::all().with_search("3"), SearchScope::AllFields);
        assert_eq!(page.records[0].id, 3);

        let page = run(fixture(), &ListQuery::all().with_search("fire"), SearchScope::AllFields);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, 4);
    }

    #[test]
    fn restricted_scope_ignores_other_fields() {
        let page = run(
            fixture(),
            &ListQuery::all().with_search("fire"),
            SearchScope::Fields(&["name"]),
        );
        assert_eq!(page.total, 0);
    }

    #[test]
    fn sort_is_numeric_aware() {
        let page = run(fixture(), &ListQuery::all().sorted_by(SortSpec::asc("name")), SearchScope::AllFields);
        let names: Vec<_> = page.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Access Point", "Gateway", "switch 9", "Switch 10"]);

        let page = run(fixture(), &ListQuery::all().sorted_by(SortSpec::desc("id")), SearchScope::AllFields);
        assert_eq!(page.records[0].id, 4);
    }

    #[test]
    fn missing_column_sorts_as_empty() {
        let mut rows = fixture();
        rows[2].note = Some("b".into());
        rows[0].note = Some("a".into());
        let page = run(rows, &ListQuery::all().sorted_by(SortSpec::asc("note")), SearchScope::AllFields);
        let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn pagination_slices_after_filtering() {
        let page = run(fixture(), &ListQuery::page(1, 3), SearchScope::AllFields);
        assert_eq!(page.total, 4);
        assert_eq!(page.records.len(), 1);

        let page = run(fixture(), &ListQuery::page(7, 3), SearchScope::AllFields);
        assert_eq!(page.total, 4);
        assert!(page.records.is_empty());
    }

    #[test]
    fn sort_spec_accepts_table_state_aliases() {
        let spec: SortSpec = serde_json::from_str(r#"{"id":"name","desc":true}"#).unwrap();
        assert_eq!(spec, SortSpec::desc("name"));
        let spec: SortSpec = serde_json::from_str(r#"{"columnId":"sku"}"#).unwrap();
        assert_eq!(spec, SortSpec::asc("sku"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn natural_cmp_is_antisymmetric(a in "[a-zA-Z0-9 ]{0,12}", b in "[a-zA-Z0-9 ]{0,12}") {
                prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
            }

            #[test]
            fn natural_cmp_orders_plain_numbers(x in 0u32..100_000, y in 0u32..100_000) {
                prop_assert_eq!(natural_cmp(&x.to_string(), &y.to_string()), x.cmp(&y));
            }

            /// Walking every page yields exactly the filtered collection.
            #[test]
            fn pages_partition_the_matches(
                names in proptest::collection::vec("[a-c]{1,3}", 0..40),
                page_size in 1usize..7,
                needle in "[a-c]{0,1}",
            ) {
                let rows: Vec<Row> = names.iter().enumerate().map(|(i, n)| row(i as u64, n)).collect();
                let expected = rows.iter().filter(|r| r.name.contains(needle.as_str())).count();

                let mut seen = 0;
                let mut page_index = 0;
                loop {
                    let q = ListQuery::page(page_index, page_size).with_search(needle.clone());
                    let page = run(rows.clone(), &q, SearchScope::Fields(&["name"]));
                    prop_assert_eq!(page.total, expected);
                    prop_assert!(page.records.len() <= page_size);
                    if page.records.is_empty() {
                        break;
                    }
                    seen += page.records.len();
                    page_index += 1;
                }
                prop_assert_eq!(seen, expected);
            }
        }
    }
}
