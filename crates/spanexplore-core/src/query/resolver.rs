//! Decoding of the span explore view state from URL query params
//!
//! Every scalar param degrades to a default when absent or garbled. The JSON
//! carrying params (`aggregateField`, `visualize`) are the exception: a blob
//! that is present but not valid JSON is reported as
//! [`Error::MalformedAggregate`]. Blank blobs count as absent.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{
    decode_sorts, visualizes_from_url_object, AggregateField, GroupBy, Mode, ReadableQueryParams,
    SortBy, Visualize,
};

use super::features::OrganizationFeatures;
use super::keys;
use super::raw::RawQueryParams;

/// Decode the readable query params of the explore view.
///
/// Pure: the result depends only on `raw` and `features`.
pub fn decode(
    raw: &RawQueryParams,
    features: &OrganizationFeatures,
) -> Result<ReadableQueryParams> {
    let extrapolate = decode_extrapolate(raw);
    let mode = raw.get(keys::MODE).and_then(Mode::parse).unwrap_or_default();
    let query = raw.get(keys::QUERY).unwrap_or_default().to_string();
    let cursor = raw.get(keys::CURSOR).unwrap_or_default().to_string();

    let fields = decode_fields(raw, features);
    let sort_bys = decode_sort_bys(raw, &fields);

    let aggregate_fields = decode_aggregate_fields(raw)?;
    let aggregate_sort_bys = decode_aggregate_sort_bys(raw, &aggregate_fields);

    Ok(ReadableQueryParams {
        mode,
        query,
        aggregate_cursor: cursor.clone(),
        cursor,
        fields,
        sort_bys,
        extrapolate,
        aggregate_fields,
        aggregate_sort_bys,
    })
}

fn decode_extrapolate(raw: &RawQueryParams) -> bool {
    !matches!(raw.get(keys::EXTRAPOLATE), Some("0"))
}

fn decode_fields(raw: &RawQueryParams, features: &OrganizationFeatures) -> Vec<String> {
    let fields: Vec<String> = raw
        .get_all(keys::FIELD)
        .into_iter()
        .filter(|field| !field.is_empty())
        .map(ToString::to_string)
        .collect();

    if fields.is_empty() {
        features.default_fields()
    } else {
        fields
    }
}

/// Explicit sorts are kept as given, even on a column `fields` lacks.
fn decode_sort_bys(raw: &RawQueryParams, fields: &[String]) -> Vec<SortBy> {
    let sort_bys = decode_sorts(&raw.get_all(keys::SORT));
    if !sort_bys.is_empty() {
        return sort_bys;
    }

    default_sort_bys(fields)
}

/// `timestamp` descending when shown, else the first column descending
pub fn default_sort_bys(fields: &[String]) -> Vec<SortBy> {
    if fields.iter().any(|field| field == keys::TIMESTAMP) {
        return vec![SortBy::descending(keys::TIMESTAMP)];
    }

    fields
        .first()
        .map(|field| vec![SortBy::descending(field.clone())])
        .unwrap_or_default()
}

fn decode_aggregate_fields(raw: &RawQueryParams) -> Result<Vec<AggregateField>> {
    let entries: Vec<&str> = raw
        .get_all(keys::AGGREGATE_FIELD)
        .into_iter()
        .filter(|entry| !is_blank(entry))
        .collect();
    if !entries.is_empty() {
        return from_aggregate_field_entries(&entries);
    }

    if let Some(visualize) = raw.get(keys::VISUALIZE).filter(|v| !is_blank(v)) {
        return from_legacy_visualize(raw, visualize);
    }

    let mut aggregate_fields = group_bys_or_placeholder(raw);
    aggregate_fields.push(Visualize::default_visualization().into());
    Ok(aggregate_fields)
}

fn from_aggregate_field_entries(entries: &[&str]) -> Result<Vec<AggregateField>> {
    let mut aggregate_fields = Vec::new();
    for entry in entries {
        let value = parse_json(keys::AGGREGATE_FIELD, entry)?;
        aggregate_fields.extend(AggregateField::from_url_value(&value));
    }

    Ok(ensure_defaults(aggregate_fields))
}

/// Pre multi-aggregate URLs: `groupBy` params plus one `visualize` blob
fn from_legacy_visualize(raw: &RawQueryParams, visualize: &str) -> Result<Vec<AggregateField>> {
    let value = parse_json(keys::VISUALIZE, visualize)?;

    let mut aggregate_fields = group_bys_or_placeholder(raw);
    if let Some(object) = value.as_object() {
        aggregate_fields.extend(
            visualizes_from_url_object(object)
                .into_iter()
                .map(AggregateField::Visualize),
        );
    }

    Ok(ensure_defaults(aggregate_fields))
}

fn group_bys_or_placeholder(raw: &RawQueryParams) -> Vec<AggregateField> {
    let group_bys = raw.get_all(keys::GROUP_BY);
    if group_bys.is_empty() {
        return vec![GroupBy::empty().into()];
    }

    group_bys
        .into_iter()
        .map(|group_by| GroupBy::new(group_by).into())
        .collect()
}

/// Appends a placeholder group-by and the default visualize where missing
fn ensure_defaults(mut aggregate_fields: Vec<AggregateField>) -> Vec<AggregateField> {
    if !aggregate_fields.iter().any(|f| f.as_group_by().is_some()) {
        aggregate_fields.push(GroupBy::empty().into());
    }
    if !aggregate_fields.iter().any(|f| f.as_visualize().is_some()) {
        aggregate_fields.push(Visualize::default_visualization().into());
    }

    aggregate_fields
}

fn decode_aggregate_sort_bys(
    raw: &RawQueryParams,
    aggregate_fields: &[AggregateField],
) -> Vec<SortBy> {
    let sort_bys = decode_sorts(&raw.get_all(keys::AGGREGATE_SORT));
    let sortable = |sort_by: &SortBy| {
        aggregate_fields
            .iter()
            .filter_map(AggregateField::as_visualize)
            .any(|visualize| visualize.y_axis == sort_by.field)
    };

    if !sort_bys.is_empty() && sort_bys.iter().all(sortable) {
        return sort_bys;
    }

    default_aggregate_sort_bys(aggregate_fields)
}

/// The first visualize's expression, descending
pub fn default_aggregate_sort_bys(aggregate_fields: &[AggregateField]) -> Vec<SortBy> {
    aggregate_fields
        .iter()
        .find_map(AggregateField::as_visualize)
        .map(|visualize| vec![SortBy::descending(visualize.y_axis.clone())])
        .unwrap_or_default()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_json(key: &'static str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::malformed_aggregate(key, e))
}
