//! Composing URL query params from view state

use crate::models::{AggregateField, ReadableQueryParams, SortBy, WritableQueryParams};

use super::keys;
use super::raw::RawQueryParams;

/// Encode a full view state as URL query params.
///
/// Only the cursor of the active mode is written, since both modes share
/// the `cursor` key.
pub fn encode(params: &ReadableQueryParams) -> RawQueryParams {
    let mut raw = RawQueryParams::new();
    raw.set(keys::MODE, params.mode.as_str());
    raw.set(keys::QUERY, params.query.as_str());

    let cursor = params.active_cursor();
    if !cursor.is_empty() {
        raw.set(keys::CURSOR, cursor);
    }

    raw.set_all(keys::FIELD, params.fields.iter().map(String::as_str));
    raw.set_all(keys::SORT, sort_tokens(&params.sort_bys));
    raw.set(keys::EXTRAPOLATE, extrapolate_value(params.extrapolate));
    raw.set_all(keys::AGGREGATE_FIELD, aggregate_field_values(&params.aggregate_fields));
    raw.set_all(keys::AGGREGATE_SORT, sort_tokens(&params.aggregate_sort_bys));
    raw
}

/// Apply a partial update, returning the new URL query params.
///
/// Keys the update does not mention are carried over untouched. Writing
/// aggregate fields drops the legacy `groupBy` and `visualize` keys so the
/// two encodings never disagree.
pub fn apply(raw: &RawQueryParams, update: &WritableQueryParams) -> RawQueryParams {
    let mut next = raw.clone();

    if let Some(mode) = update.mode {
        next.set(keys::MODE, mode.as_str());
    }
    if let Some(query) = &update.query {
        write_optional(&mut next, keys::QUERY, query.as_deref());
    }
    if let Some(cursor) = &update.cursor {
        write_optional(&mut next, keys::CURSOR, cursor.as_deref());
    }
    if let Some(fields) = &update.fields {
        next.set_all(keys::FIELD, fields.iter().map(String::as_str));
    }
    if let Some(sort_bys) = &update.sort_bys {
        next.set_all(keys::SORT, sort_tokens(sort_bys));
    }
    if let Some(extrapolate) = update.extrapolate {
        next.set(keys::EXTRAPOLATE, extrapolate_value(extrapolate));
    }
    if let Some(aggregate_fields) = &update.aggregate_fields {
        next.remove(keys::GROUP_BY);
        next.remove(keys::VISUALIZE);
        next.set_all(keys::AGGREGATE_FIELD, aggregate_field_values(aggregate_fields));
    }
    if let Some(aggregate_sort_bys) = &update.aggregate_sort_bys {
        next.set_all(keys::AGGREGATE_SORT, sort_tokens(aggregate_sort_bys));
    }

    next
}

fn write_optional(raw: &mut RawQueryParams, key: &str, value: Option<&str>) {
    match value {
        Some(value) => raw.set(key, value),
        None => raw.remove(key),
    }
}

fn sort_tokens(sort_bys: &[SortBy]) -> Vec<String> {
    sort_bys.iter().map(SortBy::to_token).collect()
}

fn aggregate_field_values(aggregate_fields: &[AggregateField]) -> Vec<String> {
    aggregate_fields
        .iter()
        .map(|field| field.to_url_value().to_string())
        .collect()
}

fn extrapolate_value(extrapolate: bool) -> &'static str {
    if extrapolate {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartType, GroupBy, Mode, Visualize};
    use crate::query::{decode, OrganizationFeatures};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample_params() -> ReadableQueryParams {
        ReadableQueryParams {
            mode: Mode::Aggregate,
            query: "span.op:db".to_string(),
            cursor: "0:100:0".to_string(),
            fields: vec!["id".to_string(), "span.duration".to_string()],
            sort_bys: vec![SortBy::ascending("span.duration")],
            extrapolate: false,
            aggregate_cursor: "0:100:0".to_string(),
            aggregate_fields: vec![
                GroupBy::new("span.op").into(),
                Visualize::new("p95(span.duration)")
                    .with_chart_type(Some(ChartType::Area))
                    .into(),
                Visualize::new("count(span.duration)").into(),
            ],
            aggregate_sort_bys: vec![SortBy::descending("count(span.duration)")],
        }
    }

    #[test]
    fn test_encode_then_decode_restores_state() {
        let params = sample_params();
        let raw = RawQueryParams::parse(&encode(&params).to_query_string());

        let decoded = decode(&raw, &OrganizationFeatures::new()).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn test_encode_defaults_roundtrip() {
        let features = OrganizationFeatures::new();
        let defaults = decode(&RawQueryParams::new(), &features).unwrap();

        assert_eq!(decode(&encode(&defaults), &features).unwrap(), defaults);
    }

    #[test]
    fn test_encode_writes_tokens() {
        let raw = encode(&sample_params());

        assert_eq!(raw.get(keys::MODE), Some("aggregate"));
        assert_eq!(raw.get(keys::EXTRAPOLATE), Some("0"));
        assert_eq!(raw.get_all(keys::SORT), vec!["span.duration"]);
        assert_eq!(raw.get_all(keys::AGGREGATE_SORT), vec!["-count(span.duration)"]);
        assert_eq!(
            raw.get_all(keys::AGGREGATE_FIELD),
            vec![
                r#"{"groupBy":"span.op"}"#,
                r#"{"chartType":2,"yAxes":["p95(span.duration)"]}"#,
                r#"{"yAxes":["count(span.duration)"]}"#,
            ]
        );
    }

    #[test]
    fn test_apply_leaves_unmentioned_keys() {
        let raw = RawQueryParams::parse("query=foo&field=id&project=1");
        let update = WritableQueryParams {
            mode: Some(Mode::Aggregate),
            ..Default::default()
        };

        let next = apply(&raw, &update);
        assert_eq!(next.get(keys::MODE), Some("aggregate"));
        assert_eq!(next.get(keys::QUERY), Some("foo"));
        assert_eq!(next.get_all(keys::FIELD), vec!["id"]);
        assert_eq!(next.get("project"), Some("1"));
        assert_eq!(raw.get(keys::MODE), None);
    }

    #[test]
    fn test_apply_clears_keys() {
        let raw = RawQueryParams::parse("query=foo&cursor=0%3A50%3A0");
        let update = WritableQueryParams {
            query: Some(None),
            cursor: Some(None),
            ..Default::default()
        };

        let next = apply(&raw, &update);
        assert!(!next.contains(keys::QUERY));
        assert!(!next.contains(keys::CURSOR));
    }

    #[test]
    fn test_apply_aggregate_fields_replaces_legacy_keys() {
        let raw = RawQueryParams::parse(
            "groupBy=span.op&visualize=%7B%22yAxes%22%3A%5B%22p50(span.duration)%22%5D%7D",
        );
        let update = WritableQueryParams {
            aggregate_fields: Some(vec![
                GroupBy::new("transaction").into(),
                Visualize::new("avg(span.self_time)").into(),
            ]),
            ..Default::default()
        };

        let next = apply(&raw, &update);
        assert!(!next.contains(keys::GROUP_BY));
        assert!(!next.contains(keys::VISUALIZE));

        let decoded = decode(&next, &OrganizationFeatures::new()).unwrap();
        assert_eq!(
            decoded.aggregate_fields,
            vec![
                AggregateField::from(GroupBy::new("transaction")),
                Visualize::new("avg(span.self_time)").into(),
            ]
        );
        assert_eq!(
            decoded.aggregate_sort_bys,
            vec![SortBy::descending("avg(span.self_time)")]
        );
    }

    const EXPRESSIONS: &[&str] = &["count(span.duration)", "p50(span.duration)", "-", ""];

    fn expression() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(EXPRESSIONS).prop_map(String::from),
            ".{0,8}",
        ]
    }

    fn sort_token() -> impl Strategy<Value = String> {
        prop_oneof![
            expression().prop_map(|e| format!("-{e}")),
            expression(),
        ]
    }

    fn y_axes_blob() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(expression(), 0..3),
            prop::option::of(0i64..4),
        )
            .prop_map(|(axes, chart_type)| {
                let mut blob = json!({ "yAxes": axes });
                if let Some(code) = chart_type {
                    blob["chartType"] = json!(code);
                }
                blob.to_string()
            })
    }

    fn aggregate_field_blob() -> impl Strategy<Value = String> {
        prop_oneof![
            ".{0,8}".prop_map(|group_by| json!({ "groupBy": group_by }).to_string()),
            y_axes_blob(),
        ]
    }

    fn raw_params() -> impl Strategy<Value = RawQueryParams> {
        (
            prop_oneof![Just("samples".to_string()), Just("aggregate".to_string()), ".{0,8}"],
            (".{0,8}", ".{0,8}", ".{0,2}"),
            prop::collection::vec(".{0,8}", 0..4),
            prop::collection::vec(sort_token(), 0..3),
            prop::collection::vec(".{0,8}", 0..3),
            prop::option::of(y_axes_blob()),
            prop::collection::vec(aggregate_field_blob(), 0..4),
            prop::collection::vec(sort_token(), 0..3),
        )
            .prop_map(
                |(
                    mode,
                    (query, cursor, extrapolate),
                    fields,
                    sorts,
                    group_bys,
                    visualize,
                    aggregate_fields,
                    aggregate_sorts,
                )| {
                    let mut raw = RawQueryParams::new();
                    raw.append(keys::MODE, mode);
                    raw.append(keys::QUERY, query);
                    raw.append(keys::CURSOR, cursor);
                    raw.append(keys::EXTRAPOLATE, extrapolate);
                    for field in fields {
                        raw.append(keys::FIELD, field);
                    }
                    for sort in sorts {
                        raw.append(keys::SORT, sort);
                    }
                    for group_by in group_bys {
                        raw.append(keys::GROUP_BY, group_by);
                    }
                    if let Some(visualize) = visualize {
                        raw.append(keys::VISUALIZE, visualize);
                    }
                    for aggregate_field in aggregate_fields {
                        raw.append(keys::AGGREGATE_FIELD, aggregate_field);
                    }
                    for aggregate_sort in aggregate_sorts {
                        raw.append(keys::AGGREGATE_SORT, aggregate_sort);
                    }
                    raw
                },
            )
    }

    proptest! {
        #[test]
        fn prop_encode_then_decode_is_identity(raw in raw_params()) {
            let features = OrganizationFeatures::new();
            let params = decode(&raw, &features).unwrap();

            let reparsed = RawQueryParams::parse(&encode(&params).to_query_string());
            prop_assert_eq!(decode(&reparsed, &features).unwrap(), params);
        }
    }
}
