//! Aggregate-mode fields: group-bys and visualized functions
//!
//! In the URL every aggregate field is a JSON blob, either
//! `{"groupBy": "span.op"}` or `{"yAxes": ["count(span.duration)"], "chartType": 1}`.
//! Which variant a blob is gets decided by the key it carries.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::function::{default_chart_type, parse_function, ParsedFunction};

/// Aggregate expression used when nothing else is visualized
pub const DEFAULT_VISUALIZATION: &str = "count(span.duration)";

/// Rendering hint for a visualized function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChartType {
    /// Bar chart
    Bar,
    /// Line chart
    Line,
    /// Area chart
    Area,
}

impl ChartType {
    /// Numeric code used in URLs
    pub fn code(self) -> u8 {
        match self {
            Self::Bar => 0,
            Self::Line => 1,
            Self::Area => 2,
        }
    }

    /// Map a URL code back to a chart type; unknown codes yield `None`
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Bar),
            1 => Some(Self::Line),
            2 => Some(Self::Area),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ChartType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(i64::from(code)).ok_or_else(|| format!("unknown chart type {code}"))
    }
}

impl From<ChartType> for u8 {
    fn from(chart_type: ChartType) -> Self {
        chart_type.code()
    }
}

/// A group-by slot; an empty string is the "no grouping" placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupBy {
    /// Attribute to bucket by
    #[serde(rename = "groupBy")]
    pub group_by: String,
}

impl GroupBy {
    /// Group by `attribute`
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            group_by: attribute.into(),
        }
    }

    /// The empty placeholder slot
    pub fn empty() -> Self {
        Self::new("")
    }
}

/// One aggregate expression to chart and compute, e.g. `count(span.duration)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualize {
    /// Canonical function expression
    pub y_axis: String,
    /// Explicit chart type, if the user picked one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
}

impl Visualize {
    /// Visualize `expression` with no explicit chart type
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            y_axis: expression.into(),
            chart_type: None,
        }
    }

    /// Set an explicit chart type
    #[must_use]
    pub fn with_chart_type(mut self, chart_type: Option<ChartType>) -> Self {
        self.chart_type = chart_type;
        self
    }

    /// The fallback `count(span.duration)` visualize
    pub fn default_visualization() -> Self {
        Self::new(DEFAULT_VISUALIZATION)
    }

    /// Function name and arguments of the expression
    pub fn parsed_function(&self) -> Option<ParsedFunction> {
        parse_function(&self.y_axis)
    }

    /// Chart type to render with: the explicit one, or the default for the function
    pub fn selected_chart_type(&self) -> ChartType {
        self.chart_type
            .unwrap_or_else(|| default_chart_type(&self.y_axis))
    }
}

/// One entry in the aggregate-mode shape of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateField {
    /// Dimension to bucket by
    GroupBy(GroupBy),
    /// Metric to compute per bucket
    Visualize(Visualize),
}

impl AggregateField {
    /// Returns the group-by if this is one
    pub fn as_group_by(&self) -> Option<&GroupBy> {
        match self {
            Self::GroupBy(group_by) => Some(group_by),
            Self::Visualize(_) => None,
        }
    }

    /// Returns the visualize if this is one
    pub fn as_visualize(&self) -> Option<&Visualize> {
        match self {
            Self::Visualize(visualize) => Some(visualize),
            Self::GroupBy(_) => None,
        }
    }

    /// Decode one URL JSON blob.
    ///
    /// A `groupBy` key yields a single group-by; a `yAxes` key yields one
    /// visualize per string axis, all tagged with the blob's chart type.
    /// Blobs with neither key, or of the wrong shape, yield nothing.
    pub fn from_url_value(value: &Value) -> Vec<Self> {
        let Some(object) = value.as_object() else {
            return Vec::new();
        };

        if let Some(group_by) = object.get("groupBy") {
            return group_by
                .as_str()
                .map(|attribute| vec![Self::GroupBy(GroupBy::new(attribute))])
                .unwrap_or_default();
        }

        visualizes_from_url_object(object)
            .into_iter()
            .map(Self::Visualize)
            .collect()
    }

    /// Encode as a URL JSON blob, one visualize per blob
    pub fn to_url_value(&self) -> Value {
        match self {
            Self::GroupBy(group_by) => json!({ "groupBy": group_by.group_by }),
            Self::Visualize(visualize) => match visualize.chart_type {
                Some(chart_type) => {
                    json!({ "yAxes": [visualize.y_axis], "chartType": chart_type.code() })
                }
                None => json!({ "yAxes": [visualize.y_axis] }),
            },
        }
    }
}

impl From<GroupBy> for AggregateField {
    fn from(group_by: GroupBy) -> Self {
        Self::GroupBy(group_by)
    }
}

impl From<Visualize> for AggregateField {
    fn from(visualize: Visualize) -> Self {
        Self::Visualize(visualize)
    }
}

/// Expand a `{"yAxes": [...], "chartType": n}` object into visualizes
pub(crate) fn visualizes_from_url_object(object: &Map<String, Value>) -> Vec<Visualize> {
    let chart_type = object
        .get("chartType")
        .and_then(Value::as_i64)
        .and_then(ChartType::from_code);

    object
        .get("yAxes")
        .and_then(Value::as_array)
        .map(|axes| {
            axes.iter()
                .filter_map(Value::as_str)
                .filter(|axis| !axis.is_empty())
                .map(|axis| Visualize::new(axis).with_chart_type(chart_type))
                .collect()
        })
        .unwrap_or_default()
}
