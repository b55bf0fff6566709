use super::*;
use crate::{
    Dataset, Direction, Error, FacetSpec, FieldDef, FieldKind, FilterSpec, Record, Schema,
    SortSpec, Value,
};
use chrono::NaiveDate;
use std::sync::Arc;

fn schema() -> Arc<Schema> {
    Arc::new(
        Schema::new(
            vec![
                FieldDef::new("id", FieldKind::Id).sortable(),
                FieldDef::new("name", FieldKind::Text).sortable(),
                FieldDef::new("born", FieldKind::Date).sortable(),
                FieldDef::new("team", FieldKind::Text),
            ],
            "id",
        )
        .unwrap(),
    )
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn record(id: usize, name: &str, born: Value, team: &str) -> Record {
    Record::new(vec![
        Value::Id(format!("id-{id:02}")),
        Value::from(name),
        born,
        Value::from(team),
    ])
}

fn people(names: &[&str]) -> Dataset {
    Dataset::from_records(
        schema(),
        names.iter().enumerate().map(|(i, name)| {
            let team = if i % 2 == 0 { "red" } else { "blue" };
            record(i, name, date(1990, 1, 1 + i as u32), team)
        }),
    )
}

fn column(dataset: &Dataset, index: usize) -> Vec<String> {
    dataset
        .rows()
        .iter()
        .map(|row| row.get(index).unwrap().to_string())
        .collect()
}

fn names(dataset: &Dataset) -> Vec<String> {
    column(dataset, 1)
}

fn ids(dataset: &Dataset) -> Vec<String> {
    column(dataset, 0)
}

#[test]
fn query_matches_names_case_insensitively_in_order() {
    let dataset = people(&[
        "Alice", "bob", "Sal", "carl", "Walter", "dave", "HALEY", "erin", "Al", "frank",
    ]);

    let filtered = filter(&dataset, &FilterSpec::query("al")).unwrap();

    assert_eq!(names(&filtered), vec!["Alice", "Sal", "Walter", "HALEY", "Al"]);
}

#[test]
fn query_matches_identifier_but_not_dates() {
    let dataset = people(&["Alice", "bob", "carl"]);

    let by_id = filter(&dataset, &FilterSpec::query("ID-01")).unwrap();
    assert_eq!(names(&by_id), vec!["bob"]);

    let by_date = filter(&dataset, &FilterSpec::query("1990")).unwrap();
    assert!(by_date.is_empty());
}

#[test]
fn non_ascii_query_is_case_insensitive() {
    let dataset = people(&["ÉMILE", "emile", "Zoë"]);
    let filtered = filter(&dataset, &FilterSpec::query("émi")).unwrap();
    assert_eq!(names(&filtered), vec!["ÉMILE"]);
}

#[test]
fn identity_filter_returns_input() {
    let dataset = people(&["Alice", "bob"]);
    let filtered = filter(&dataset, &FilterSpec::default()).unwrap();
    assert!(filtered.shares_rows_with(&dataset));

    let inactive = FilterSpec::default().with_facet(FacetSpec::new("team"));
    let filtered = filter(&dataset, &inactive).unwrap();
    assert!(filtered.shares_rows_with(&dataset));
}

#[test]
fn facet_is_exact_and_combines_with_query() {
    let dataset = people(&["Alice", "Alan", "Sally", "Al", "Bob"]);
    let red = FacetSpec::new("team").with_value(Some("red".to_string()));

    let only_red = filter(&dataset, &FilterSpec::default().with_facet(red.clone())).unwrap();
    assert_eq!(names(&only_red), vec!["Alice", "Sally", "Bob"]);

    let red_al = filter(&dataset, &FilterSpec::query("al").with_facet(red)).unwrap();
    assert_eq!(names(&red_al), vec!["Alice", "Sally"]);

    let partial = FacetSpec::new("team").with_value(Some("re".to_string()));
    let none = filter(&dataset, &FilterSpec::default().with_facet(partial)).unwrap();
    assert!(none.is_empty());
}

#[test]
fn facet_on_unknown_field_is_invalid() {
    let dataset = people(&["Alice"]);
    let facet = FacetSpec::new("vehicle").with_value(Some("Golf".to_string()));
    let err = filter(&dataset, &FilterSpec::default().with_facet(facet)).unwrap_err();
    assert_eq!(err, Error::invalid_field("vehicle"));
}

#[test]
fn filter_is_idempotent() {
    let dataset = people(&["Alice", "Sal", "bob", "Hal", "Walt", "Quinn"]);
    let spec = FilterSpec::query("al")
        .with_facet(FacetSpec::new("team").with_value(Some("red".to_string())));

    let once = filter(&dataset, &spec).unwrap();
    let twice = filter(&once, &spec).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn sorts_names_with_collation() {
    let dataset = people(&["Bob", "alice", "Carl"]);

    let asc = sort(&dataset, &SortSpec::ascending("name")).unwrap();
    assert_eq!(names(&asc), vec!["alice", "Bob", "Carl"]);

    let desc = sort(&dataset, &SortSpec::descending("name")).unwrap();
    assert_eq!(names(&desc), vec!["Carl", "Bob", "alice"]);
}

#[test]
fn sort_is_stable_in_both_directions() {
    let dataset = people(&["b", "a", "B", "a", "b", "a"]);

    let asc = sort(&dataset, &SortSpec::ascending("name")).unwrap();
    assert_eq!(ids(&asc), vec!["id-01", "id-03", "id-05", "id-00", "id-04", "id-02"]);

    let desc = sort(&dataset, &SortSpec::descending("name")).unwrap();
    assert_eq!(ids(&desc), vec!["id-02", "id-00", "id-04", "id-01", "id-03", "id-05"]);
}

#[test]
fn dates_sort_chronologically() {
    let dataset = Dataset::from_records(
        schema(),
        vec![
            record(0, "a", date(2001, 5, 1), "red"),
            record(1, "b", date(1999, 12, 31), "red"),
            record(2, "c", date(2001, 1, 9), "red"),
        ],
    );
    let sorted = sort(&dataset, &SortSpec::ascending("born")).unwrap();
    assert_eq!(names(&sorted), vec!["b", "c", "a"]);
}

#[test]
fn unsorted_spec_is_a_no_op() {
    let dataset = people(&["b", "a"]);
    let sorted = sort(&dataset, &SortSpec::unsorted()).unwrap();
    assert!(sorted.shares_rows_with(&dataset));
}

#[test]
fn sort_rejects_unknown_or_unsortable_fields() {
    let dataset = people(&["b", "a"]);
    assert_eq!(
        sort(&dataset, &SortSpec::ascending("age")).unwrap_err(),
        Error::invalid_field("age")
    );
    assert_eq!(
        sort(
            &dataset,
            &SortSpec {
                field: Some("team".into()),
                direction: Direction::Descending,
            }
        )
        .unwrap_err(),
        Error::invalid_field("team")
    );
}

#[test]
fn distinct_values_are_sorted_and_unique() {
    let dataset = Dataset::from_records(
        schema(),
        vec![
            record(0, "a", date(2000, 1, 1), "red"),
            record(1, "b", date(2000, 1, 1), "Blue"),
            record(2, "c", date(2000, 1, 1), "red"),
            record(3, "d", date(2000, 1, 1), "azure"),
        ],
    );

    assert_eq!(
        distinct_field_values(&dataset, "team").unwrap(),
        vec!["azure", "Blue", "red"]
    );
    assert_eq!(
        distinct_field_values(&dataset, "born").unwrap(),
        vec!["2000-01-01"]
    );
    assert_eq!(
        distinct_field_values(&dataset, "nope").unwrap_err(),
        Error::invalid_field("nope")
    );
}

#[test]
fn operations_on_empty_dataset() {
    let dataset = Dataset::empty(schema());
    assert!(sort(&dataset, &SortSpec::ascending("name")).unwrap().is_empty());
    assert!(filter(&dataset, &FilterSpec::query("x")).unwrap().is_empty());
    assert!(distinct_field_values(&dataset, "team").unwrap().is_empty());
}
