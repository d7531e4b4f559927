//! Aggregate function expressions such as `avg(span.self_time)`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::ChartType;

static FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\((.*)\)\s*$").expect("function pattern is valid")
});

/// Functions whose series read best as bars
const BAR_FUNCTIONS: &[&str] = &["count", "count_unique", "sum"];

/// A parsed aggregate function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFunction {
    /// Function name, e.g. `avg`
    pub name: String,
    /// Trimmed arguments in call order
    pub arguments: Vec<String>,
}

/// Parse an aggregate expression into its function name and arguments.
///
/// Returns `None` for anything that is not shaped like `name(args)`, e.g. a
/// plain attribute such as `span.op`.
pub fn parse_function(expression: &str) -> Option<ParsedFunction> {
    let captures = FUNCTION_PATTERN.captures(expression)?;
    let name = captures.get(1)?.as_str().to_string();
    let raw_args = captures.get(2).map_or("", |m| m.as_str());

    let arguments = if raw_args.trim().is_empty() {
        Vec::new()
    } else {
        raw_args.split(',').map(|arg| arg.trim().to_string()).collect()
    };

    Some(ParsedFunction { name, arguments })
}

/// Chart type used for a y-axis that has no explicit one
pub fn default_chart_type(expression: &str) -> ChartType {
    match parse_function(expression) {
        Some(function) if BAR_FUNCTIONS.contains(&function.name.as_str()) => ChartType::Bar,
        _ => ChartType::Line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_single_argument() {
        let parsed = parse_function("avg(span.self_time)").unwrap();
        assert_eq!(parsed.name, "avg");
        assert_eq!(parsed.arguments, vec!["span.self_time"]);
    }

    #[test]
    fn test_parse_multiple_arguments() {
        let parsed = parse_function("percentile(span.duration, 0.95)").unwrap();
        assert_eq!(parsed.name, "percentile");
        assert_eq!(parsed.arguments, vec!["span.duration", "0.95"]);
    }

    #[test]
    fn test_parse_no_arguments() {
        let parsed = parse_function("count()").unwrap();
        assert_eq!(parsed.name, "count");
        assert!(parsed.arguments.is_empty());
    }

    #[rstest]
    #[case("span.op")]
    #[case("")]
    #[case("(span.duration)")]
    fn test_parse_non_function(#[case] expression: &str) {
        assert_eq!(parse_function(expression), None);
    }

    #[rstest]
    #[case("count(span.duration)", ChartType::Bar)]
    #[case("count_unique(user)", ChartType::Bar)]
    #[case("sum(span.self_time)", ChartType::Bar)]
    #[case("p50(span.duration)", ChartType::Line)]
    #[case("span.op", ChartType::Line)]
    fn test_default_chart_type(#[case] expression: &str, #[case] expected: ChartType) {
        assert_eq!(default_chart_type(expression), expected);
    }
}
