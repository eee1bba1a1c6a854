//! Parser for parameter configuration space (PCS) files.
//!
//! A PCS file holds one clause per line. Empty lines and lines starting with
//! `#` are skipped. Every other line must match one of four clause grammars,
//! tried in this order:
//!
//! ```text
//! child | parent in {v1, v2, ...}          conditional clause
//! {name1=v1, name2=v2, ...}                forbidden clause
//! name {v1, v2, ...} [default]             categorical parameter
//! name [min, max] [default] <l><i><l>      numerical parameter
//! ```
//!
//! A trailing `i` marks a numerical parameter as integer-valued, an `l` on
//! either side of it marks it logarithmic.
//!
//! Parsing runs in two stages. The first classifies every line, producing
//! parameters directly and keeping conditional and forbidden clauses pending.
//! The second resolves the pending clauses against the complete parameter
//! list, so clauses may refer to parameters defined further down the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::schema::{
    ActivityConditions, Assignment, Domain, EqualsCondition, ForbiddenCombination,
    ParameterNode, Specification, SpecificationError,
};

/// Errors raised while reading a PCS file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("No file at {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot parse line {line_number} '{line}': {reason}")]
    Format {
        line_number: usize,
        line: String,
        reason: String,
    },
    #[error("Line {line_number}: {reason} '{identifier}'")]
    UnknownParameter {
        line_number: usize,
        identifier: String,
        reason: &'static str,
    },
    #[error(transparent)]
    Specification(#[from] SpecificationError),
}

/// Parse the PCS file at `path`.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Specification, ParseError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let specification = parse_str(&text)?;
    debug!(
        "Read {} parameters, {} conditioned parameters and {} forbidden combinations from {}",
        specification.parameters().len(),
        specification.activity_conditions().len(),
        specification.forbidden_combinations().len(),
        path.display()
    );
    Ok(specification)
}

/// Parse PCS clauses from a string.
pub fn parse_str(text: &str) -> Result<Specification, ParseError> {
    let mut parameters = Vec::new();
    let mut pending_conditions = Vec::new();
    let mut pending_forbidden = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let source = SourceLine {
            number: i + 1,
            text: line,
        };
        match classify(source)? {
            Clause::Parameter(node) => parameters.push(node),
            Clause::Condition(clause) => pending_conditions.push(clause),
            Clause::Forbidden(clause) => pending_forbidden.push(clause),
        }
    }

    debug!(
        "Classified {} parameter, {} conditional and {} forbidden clauses",
        parameters.len(),
        pending_conditions.len(),
        pending_forbidden.len()
    );

    let conditions = resolve_conditions(&pending_conditions, &parameters)?;
    let forbidden = pending_forbidden
        .iter()
        .map(|clause| resolve_forbidden(clause, &parameters))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Specification::new(parameters, conditions, forbidden)?)
}

// ============================================================================
// Line classification
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    text: &'a str,
}

impl SourceLine<'_> {
    fn format_error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::Format {
            line_number: self.number,
            line: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn unknown_parameter(&self, identifier: &str, reason: &'static str) -> ParseError {
        ParseError::UnknownParameter {
            line_number: self.number,
            identifier: identifier.to_string(),
            reason,
        }
    }
}

/// Result of classifying a single line.
#[derive(Debug)]
enum Clause<'a> {
    Parameter(ParameterNode),
    Condition(PendingCondition<'a>),
    Forbidden(PendingForbidden<'a>),
}

/// Conditional clause waiting for the full parameter list.
#[derive(Debug)]
struct PendingCondition<'a> {
    source: SourceLine<'a>,
    child: &'a str,
    parent: &'a str,
    values: Vec<&'a str>,
}

/// Forbidden clause waiting for the full parameter list.
#[derive(Debug)]
struct PendingForbidden<'a> {
    source: SourceLine<'a>,
    assignments: Vec<(&'a str, &'a str)>,
}

/// Raw pieces of a numerical parameter clause.
#[derive(Debug)]
struct NumericalClause<'a> {
    name: &'a str,
    min: &'a str,
    max: &'a str,
    integer: bool,
    logarithmic: bool,
}

fn classify(source: SourceLine<'_>) -> Result<Clause<'_>, ParseError> {
    let text = source.text;

    if let Some((child, parent, values)) = match_conditional(text) {
        return Ok(Clause::Condition(PendingCondition {
            source,
            child,
            parent,
            values,
        }));
    }

    if let Some(assignments) = match_forbidden(text) {
        return Ok(Clause::Forbidden(PendingForbidden {
            source,
            assignments,
        }));
    }

    if let Some((name, values)) = match_categorical(text) {
        let domain = Domain::categorical(values).map_err(|e| source.format_error(e.to_string()))?;
        return Ok(Clause::Parameter(ParameterNode::new(name, domain)));
    }

    if let Some(clause) = match_numerical(text) {
        return numerical_parameter(source, &clause).map(Clause::Parameter);
    }

    Err(source.format_error("line matches no clause format"))
}

/// `child | parent in {v1, v2, ...}`
fn match_conditional(text: &str) -> Option<(&str, &str, Vec<&str>)> {
    let mut cursor = Cursor::new(text);
    let child = cursor.name()?;
    cursor.skip_whitespace();
    cursor.expect('|')?;
    cursor.skip_whitespace();
    let parent = cursor.name()?;
    cursor.skip_whitespace();
    cursor.expect_keyword("in")?;
    cursor.skip_whitespace();
    let values = cursor.braced_list()?;
    Some((child, parent, values))
}

/// `{name1=v1, name2=v2, ...}`
fn match_forbidden(text: &str) -> Option<Vec<(&str, &str)>> {
    let mut cursor = Cursor::new(text);
    cursor.expect('{')?;

    let mut assignments = Vec::new();
    loop {
        cursor.skip_whitespace();
        let name = cursor.name()?;
        cursor.skip_whitespace();
        cursor.expect('=')?;
        cursor.skip_whitespace();
        let value = cursor.list_value('}')?;
        assignments.push((name, value));
        cursor.skip_whitespace();
        if cursor.expect(',').is_none() {
            break;
        }
    }

    cursor.expect('}')?;
    Some(assignments)
}

/// `name {v1, v2, ...} [default]`
fn match_categorical(text: &str) -> Option<(&str, Vec<&str>)> {
    let mut cursor = Cursor::new(text);
    let name = cursor.name()?;
    cursor.skip_whitespace();
    let values = cursor.braced_list()?;
    Some((name, values))
}

/// `name [min, max] [default] <l><i><l>`
fn match_numerical(text: &str) -> Option<NumericalClause<'_>> {
    let mut cursor = Cursor::new(text);
    let name = cursor.name()?;
    cursor.skip_whitespace();
    cursor.expect('[')?;
    cursor.skip_whitespace();
    let min = cursor.number()?;
    cursor.skip_whitespace();
    cursor.expect(',')?;
    cursor.skip_whitespace();
    let max = cursor.number()?;
    cursor.skip_whitespace();
    cursor.expect(']')?;
    cursor.skip_whitespace();

    // The default value is not part of the space's structure; skip through the
    // last closing bracket.
    cursor.expect('[')?;
    cursor.skip_past_last(']')?;

    cursor.skip_whitespace();
    let leading_log = cursor.expect('l').is_some();
    cursor.skip_whitespace();
    let integer = cursor.expect('i').is_some();
    cursor.skip_whitespace();
    let trailing_log = cursor.expect('l').is_some();

    Some(NumericalClause {
        name,
        min,
        max,
        integer,
        logarithmic: leading_log || trailing_log,
    })
}

fn numerical_parameter(
    source: SourceLine<'_>,
    clause: &NumericalClause<'_>,
) -> Result<ParameterNode, ParseError> {
    let min = parse_bound(source, clause, clause.min, "Minimum")?;
    let max = parse_bound(source, clause, clause.max, "Maximum")?;

    let domain = if clause.integer {
        let min = integer_bound(source, clause, min, clause.min, "Minimum")?;
        let max = integer_bound(source, clause, max, clause.max, "Maximum")?;
        if clause.logarithmic {
            Domain::log_integer(min, max)
        } else {
            Domain::integer(min, max)
        }
    } else if clause.logarithmic {
        Domain::log_float(min, max)
    } else {
        Domain::float(min, max)
    };

    let domain = domain.map_err(|e| source.format_error(e.to_string()))?;
    Ok(ParameterNode::new(clause.name, domain))
}

fn parse_bound(
    source: SourceLine<'_>,
    clause: &NumericalClause<'_>,
    token: &str,
    which: &str,
) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            source.format_error(format!(
                "{} value '{}' of parameter '{}' is not a number",
                which, token, clause.name
            ))
        })
}

/// Integer bounds are read as floating point first and must not carry a
/// fractional part.
fn integer_bound(
    source: SourceLine<'_>,
    clause: &NumericalClause<'_>,
    value: f64,
    token: &str,
    which: &str,
) -> Result<i64, ParseError> {
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(source.format_error(format!(
            "{} value '{}' of parameter '{}' should be an integer",
            which, token, clause.name
        )));
    }
    Ok(value as i64)
}

// ============================================================================
// Resolution of pending clauses
// ============================================================================

fn resolve_conditions(
    pending: &[PendingCondition<'_>],
    parameters: &[ParameterNode],
) -> Result<ActivityConditions, ParseError> {
    let mut conditions = ActivityConditions::new();
    for clause in pending {
        if !parameters.iter().any(|p| p.identifier == clause.child) {
            return Err(clause
                .source
                .unknown_parameter(clause.child, "condition on undefined child"));
        }

        let parent = find_unique(parameters, clause.parent).ok_or_else(|| {
            clause.source.unknown_parameter(
                clause.parent,
                "condition dependent on undefined or duplicated parent",
            )
        })?;

        let allowed_values = clause
            .values
            .iter()
            .map(|token| coerce(clause.source, parent, token))
            .collect::<Result<Vec<_>, _>>()?;

        conditions
            .entry(clause.child.to_string())
            .or_default()
            .push(EqualsCondition::new(clause.parent, allowed_values));
    }
    Ok(conditions)
}

fn resolve_forbidden(
    clause: &PendingForbidden<'_>,
    parameters: &[ParameterNode],
) -> Result<ForbiddenCombination, ParseError> {
    let mut assignment = Assignment::new();
    for &(identifier, token) in &clause.assignments {
        let parameter = find_unique(parameters, identifier).ok_or_else(|| {
            clause.source.unknown_parameter(
                identifier,
                "forbidden combination on undefined or duplicated parameter",
            )
        })?;
        let value = coerce(clause.source, parameter, token)?;
        assignment.insert(identifier.to_string(), value);
    }
    Ok(ForbiddenCombination::new(assignment))
}

/// The single parameter named `identifier`, or `None` if there is no such
/// parameter or the name is ambiguous.
fn find_unique<'p>(parameters: &'p [ParameterNode], identifier: &str) -> Option<&'p ParameterNode> {
    let mut matches = parameters.iter().filter(|p| p.identifier == identifier);
    match (matches.next(), matches.next()) {
        (Some(parameter), None) => Some(parameter),
        _ => None,
    }
}

fn coerce(
    source: SourceLine<'_>,
    parameter: &ParameterNode,
    token: &str,
) -> Result<crate::schema::Value, ParseError> {
    parameter.domain.coerce(token).ok_or_else(|| {
        source.format_error(format!(
            "value '{}' does not fit the {} domain of '{}'",
            token,
            parameter.domain.kind(),
            parameter.identifier
        ))
    })
}

// ============================================================================
// Scanning
// ============================================================================

/// Characters allowed in value tokens. Braces are allowed; see
/// [`Cursor::list_value`].
fn is_value_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '"' | '\'' | '(' | ')' | '|' | '=')
}

/// Characters allowed in parameter names.
fn is_name_char(c: char) -> bool {
    is_value_char(c) && !matches!(c, '[' | ']' | '{' | '}')
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

/// Forward-only scanner over a single line.
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn expect(&mut self, c: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(c)?;
        Some(())
    }

    fn expect_keyword(&mut self, keyword: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(keyword)?;
        Some(())
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> Option<&'a str> {
        let end = self.rest.find(|c: char| !pred(c)).unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn name(&mut self) -> Option<&'a str> {
        self.take_while(is_name_char)
    }

    /// Value token inside a list closed by `close`.
    ///
    /// A token may contain `close` itself. If the token is not followed by a
    /// separator or `close`, it is cut at its last `close`, which then ends
    /// the list.
    fn list_value(&mut self, close: char) -> Option<&'a str> {
        let mut end = self
            .rest
            .find(|c: char| !is_value_char(c))
            .unwrap_or(self.rest.len());
        let after = self.rest[end..].trim_start();
        let terminated = after.starts_with(',') || after.starts_with(close);
        if !terminated {
            if let Some(idx) = self.rest[..end].rfind(close) {
                end = idx;
            }
        }
        if end == 0 {
            return None;
        }
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn number(&mut self) -> Option<&'a str> {
        self.take_while(is_number_char)
    }

    /// `{v1, v2, ...}` with at least one value.
    fn braced_list(&mut self) -> Option<Vec<&'a str>> {
        self.expect('{')?;
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            values.push(self.list_value('}')?);
            self.skip_whitespace();
            if self.expect(',').is_none() {
                break;
            }
        }
        self.expect('}')?;
        Some(values)
    }

    fn skip_past_last(&mut self, c: char) -> Option<()> {
        let idx = self.rest.rfind(c)?;
        self.rest = &self.rest[idx + c.len_utf8()..];
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Value;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    const FULL_FEATURED: &str = "\
# Parameters
@1:some-category {0,1,2,3} [2]
@1:discrete-log [1, 1024] [4]il
@1:discrete [75, 99] [80]i
@1:2:continuous [-1.02, 2.6] [0.4]
@1:2:logarithmic [29.4, 200.8] [100]l
@1:0:complicated-category {F, L, x, +, no} [no]
@1:5:A:discrete-log-with-spaces   [ 1 , 65535 ]   [ 5 ]   l i
@0:4:discrete-with-spaces [ 0, 100 ] [ 50 ] i
@1:2:G:continuous-with-spaces [ 1.34 , 2.5 ] [ 2 ]
@1:2:G:logarithmic-with-spaces [0.5, 3.0] [1] l

# Conditions
@1:2:continuous | @1:0:complicated-category in {+, F, x}
@1:2:continuous | @1:discrete in {75}
@1:5:A:discrete-log-with-spaces | @1:some-category in {0,2}

# Forbidden combinations
{@1:2:G:logarithmic-with-spaces=1, @1:2:continuous=1.5, @1:some-category=3}
{ @1:discrete = 76 , @1:0:complicated-category = + }
";

    fn assignment(pairs: &[(&str, Value)]) -> Assignment {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect()
    }

    fn write_pcs(lines: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pcs");
        fs::write(&path, lines.join("\n")).unwrap();
        (dir, path)
    }

    fn check_strict(combination: &ForbiddenCombination, expected: &Assignment) {
        assert!(combination.is_met(expected), "combination is too strict");
        for key in expected.keys() {
            let mut subset = expected.clone();
            subset.remove(key);
            assert!(
                !combination.is_met(&subset),
                "combination is also met without {}",
                key
            );
        }
    }

    #[test]
    fn test_parse_full_featured_file() {
        let (_dir, path) = write_pcs(&[FULL_FEATURED]);
        let specification = parse(&path).unwrap();

        let expected = vec![
            ParameterNode::new(
                "@1:some-category",
                Domain::categorical(["0", "1", "2", "3"]).unwrap(),
            ),
            ParameterNode::new("@1:discrete-log", Domain::log_integer(1, 1024).unwrap()),
            ParameterNode::new("@1:discrete", Domain::integer(75, 99).unwrap()),
            ParameterNode::new("@1:2:continuous", Domain::float(-1.02, 2.6).unwrap()),
            ParameterNode::new("@1:2:logarithmic", Domain::log_float(29.4, 200.8).unwrap()),
            ParameterNode::new(
                "@1:0:complicated-category",
                Domain::categorical(["F", "L", "x", "+", "no"]).unwrap(),
            ),
            ParameterNode::new(
                "@1:5:A:discrete-log-with-spaces",
                Domain::log_integer(1, 65535).unwrap(),
            ),
            ParameterNode::new("@0:4:discrete-with-spaces", Domain::integer(0, 100).unwrap()),
            ParameterNode::new(
                "@1:2:G:continuous-with-spaces",
                Domain::float(1.34, 2.5).unwrap(),
            ),
            ParameterNode::new(
                "@1:2:G:logarithmic-with-spaces",
                Domain::log_float(0.5, 3.0).unwrap(),
            ),
        ];
        assert_eq!(specification.parameters(), expected.as_slice());

        let forbidden = specification.forbidden_combinations();
        assert_eq!(forbidden.len(), 2);
        check_strict(
            &forbidden[0],
            &assignment(&[
                ("@1:2:G:logarithmic-with-spaces", Value::Float(1.0)),
                ("@1:2:continuous", Value::Float(1.5)),
                ("@1:some-category", Value::from("3")),
            ]),
        );
        check_strict(
            &forbidden[1],
            &assignment(&[
                ("@1:discrete", Value::Integer(76)),
                ("@1:0:complicated-category", Value::from("+")),
            ]),
        );

        let continuous = specification.conditions_of("@1:2:continuous");
        assert_eq!(continuous.len(), 2);
        assert_eq!(continuous[0].parent, "@1:0:complicated-category");
        assert_eq!(
            continuous[0].allowed_values,
            vec![Value::from("+"), Value::from("F"), Value::from("x")]
        );
        assert_eq!(continuous[1].parent, "@1:discrete");
        assert_eq!(continuous[1].allowed_values, vec![Value::Integer(75)]);

        let discrete_log = specification.conditions_of("@1:5:A:discrete-log-with-spaces");
        assert_eq!(discrete_log.len(), 1);
        assert_eq!(discrete_log[0].parent, "@1:some-category");
        assert_eq!(
            discrete_log[0].allowed_values,
            vec![Value::from("0"), Value::from("2")]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = parse(dir.path().join("missing.pcs"));
        assert!(matches!(result, Err(ParseError::FileNotFound(_))));
    }

    #[test]
    fn test_unknown_line_format() {
        let (_dir, path) = write_pcs(&["factor [2, 15} [5]i"]);
        match parse(&path) {
            Err(ParseError::Format {
                line_number, line, ..
            }) => {
                assert_eq!(line_number, 1);
                assert_eq!(line, "factor [2, 15} [5]i");
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_default_is_rejected() {
        assert!(matches!(
            parse_str("factor [2, 15] i"),
            Err(ParseError::Format { .. })
        ));
    }

    #[test]
    fn test_condition_using_unknown_child() {
        let (_dir, path) = write_pcs(&[
            "sort-algo {quick,insertion,merge,heap} [quick]",
            "quick-selection-method | sort-algo in {quick}",
        ]);
        match parse(&path) {
            Err(ParseError::UnknownParameter {
                line_number,
                identifier,
                ..
            }) => {
                assert_eq!(line_number, 2);
                assert_eq!(identifier, "quick-selection-method");
            }
            other => panic!("expected unknown parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_condition_using_unknown_parent() {
        let (_dir, path) = write_pcs(&[
            "quick-selection-method { first, random, median-of-medians} [random]",
            "quick-selection-method | sort-algo in {quick}",
        ]);
        assert!(matches!(
            parse(&path),
            Err(ParseError::UnknownParameter { identifier, .. }) if identifier == "sort-algo"
        ));
    }

    #[test]
    fn test_condition_using_duplicated_parent() {
        let result = parse_str(
            "sort-algo {quick, heap} [quick]\n\
             sort-algo {merge, heap} [merge]\n\
             method {first, random} [first]\n\
             method | sort-algo in {quick}",
        );
        assert!(matches!(
            result,
            Err(ParseError::UnknownParameter { identifier, .. }) if identifier == "sort-algo"
        ));
    }

    #[test]
    fn test_duplicated_parameter_is_rejected() {
        let result = parse_str("a {x, y} [x]\na [0, 1] [0]");
        assert!(matches!(
            result,
            Err(ParseError::Specification(SpecificationError::DuplicateParameter(_)))
        ));
    }

    #[test]
    fn test_condition_using_wrong_domain() {
        let (_dir, path) = write_pcs(&[
            "factor [2, 15] [5]i",
            "value [0.2, 45.91] [5.3]",
            "value | factor in {five}",
        ]);
        assert!(matches!(
            parse(&path),
            Err(ParseError::Format { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_forbidden_combination_using_unknown_parameter() {
        let (_dir, path) = write_pcs(&["factor [2, 15] [5]i", "{value=5}"]);
        assert!(matches!(
            parse(&path),
            Err(ParseError::UnknownParameter { identifier, .. }) if identifier == "value"
        ));
    }

    #[test]
    fn test_forbidden_combination_using_wrong_domain() {
        let (_dir, path) = write_pcs(&["factor [2, 15] [5]i", "{factor=3.4}"]);
        assert!(matches!(
            parse(&path),
            Err(ParseError::Format { line_number: 2, .. })
        ));
    }

    #[test]
    fn test_fractional_bounds_for_integer_parameter() {
        for line in ["factor [2.1, 15] [5]i", "factor [2, 15.06] [5]i"] {
            let (_dir, path) = write_pcs(&[line]);
            assert!(
                matches!(parse(&path), Err(ParseError::Format { .. })),
                "'{}' should be rejected",
                line
            );
        }
    }

    #[test]
    fn test_integer_bounds_in_float_notation() {
        let specification = parse_str("factor [2.0, 1e3] [5]i").unwrap();
        assert_eq!(
            specification.parameters()[0].domain,
            Domain::integer(2, 1000).unwrap()
        );
    }

    #[test]
    fn test_log_marker_positions() {
        let specification = parse_str(
            "a [1, 10] [2] li\n\
             b [1, 10] [2] il\n\
             c [1, 10] [2] l\n\
             d [1, 10] [2] i\n\
             e [1, 10] [2]",
        )
        .unwrap();
        let domains: Vec<_> = specification
            .parameters()
            .iter()
            .map(|p| p.domain.clone())
            .collect();
        assert_eq!(
            domains,
            vec![
                Domain::log_integer(1, 10).unwrap(),
                Domain::log_integer(1, 10).unwrap(),
                Domain::log_float(1.0, 10.0).unwrap(),
                Domain::integer(1, 10).unwrap(),
                Domain::float(1.0, 10.0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_invalid_domains_are_format_errors() {
        assert!(matches!(
            parse_str("a [0, 10] [2] l"),
            Err(ParseError::Format { .. })
        ));
        assert!(matches!(
            parse_str("a [10, 1] [2]"),
            Err(ParseError::Format { .. })
        ));
        assert!(matches!(
            parse_str("a {x, y, x} [x]"),
            Err(ParseError::Format { .. })
        ));
    }

    #[test]
    fn test_clauses_may_precede_definitions() {
        let specification = parse_str(
            "{algo=heap, depth=3}\n\
             depth | algo in {quick, heap}\n\
             \n   \n\
             # comment\n\
             algo {quick, heap} [quick]\n\
             depth [1, 8] [2] i",
        )
        .unwrap();
        assert_eq!(specification.parameters().len(), 2);
        assert_eq!(specification.conditions_of("depth").len(), 1);
        assert_eq!(specification.forbidden_combinations().len(), 1);
    }

    #[test]
    fn test_values_may_contain_braces() {
        let specification = parse_str(
            "set {{a}, b{, c}} [b{]\n\
             tight {x, y}[y]\n\
             depth [1, 8] [2] i\n\
             depth | set in {{a}, c}}\n\
             {set=c}}",
        )
        .unwrap();

        assert_eq!(
            specification.parameters()[0].domain,
            Domain::categorical(["{a}", "b{", "c}"]).unwrap()
        );
        assert_eq!(
            specification.parameters()[1].domain,
            Domain::categorical(["x", "y"]).unwrap()
        );
        assert_eq!(
            specification.conditions_of("depth")[0].allowed_values,
            vec![Value::from("{a}"), Value::from("c}")]
        );
        assert_eq!(
            specification.forbidden_combinations()[0].assignment,
            assignment(&[("set", Value::from("c}"))])
        );
    }

    #[test]
    fn test_unrepresentable_continuous_width() {
        let result = parse_str("x [-1e308, 1e308] [0]");
        match result {
            Err(ParseError::Format { line_number, .. }) => assert_eq!(line_number, 1),
            other => panic!("expected format error, got {:?}", other),
        }
        let specification = parse_str("x [-1e307, 1e307] [0]").unwrap();
        assert_eq!(
            specification.parameters()[0].domain.float_bounds(),
            Some((-1e307, 1e307))
        );
    }

    #[test]
    fn test_categorical_keeps_token_order() {
        let specification = parse_str("c {0,1,2,3}").unwrap();
        assert_eq!(
            specification.parameters()[0].domain,
            Domain::Categorical {
                values: vec!["0".into(), "1".into(), "2".into(), "3".into()]
            }
        );
    }

    proptest! {
        #[test]
        fn prop_integer_bounds_survive_parsing(a in -100_000i64..100_000, b in -100_000i64..100_000) {
            let (min, max) = (a.min(b), a.max(b));
            let specification = parse_str(&format!("name [{}, {}] [{}] i", min, max, min)).unwrap();
            prop_assert_eq!(
                specification.parameters()[0].domain.integer_bounds(),
                Some((min, max))
            );
        }
    }
}
