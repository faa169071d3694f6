//! The matching engine: tokens in, typed results out.

use crate::coerce;
use crate::error::ParseError;
use crate::help::HelpLayout;
use crate::spec::{ArgClass, ArgSpec, ArgValue, NO_ARG_ID, NO_ARG_VALUE, ValueType};
use crate::tokenize::{self, DEFAULT_DELIMITERS};
use serde::Serialize;
use std::collections::BTreeMap;

/// One `(id, value)` pair, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedArg {
    pub id: i32,
    pub value: ArgValue,
}

impl ParsedArg {
    pub fn new(id: i32, value: impl Into<ArgValue>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }

    fn nothing_parsed() -> Self {
        Self::new(NO_ARG_ID, NO_ARG_VALUE)
    }
}

/// Everything a single parse produced.
///
/// Results gathered before an error stay visible next to it; only an
/// exclusive switch throws earlier results away.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    results: Vec<ParsedArg>,
    error: Option<ParseError>,
    missing: BTreeMap<i32, bool>,
}

impl ParseOutcome {
    pub fn results(&self) -> &[ParsedArg] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ParsedArg> {
        self.results
    }

    /// Values recorded for `id`, in input order.
    pub fn values_of(&self, id: i32) -> impl Iterator<Item = &ArgValue> {
        self.results
            .iter()
            .filter(move |r| r.id == id)
            .map(|r| &r.value)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// The error text, or an empty string after a clean parse.
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn is_missing_required(&self) -> bool {
        self.missing.values().any(|&m| m)
    }

    /// Ids of required specs that did not receive a value.
    pub fn missing_required(&self) -> Vec<i32> {
        self.missing
            .iter()
            .filter(|(_, m)| **m)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether this is the "nothing parsed" sentinel result.
    pub fn is_empty_parse(&self) -> bool {
        self.results.len() == 1 && self.results[0] == ParsedArg::nothing_parsed()
    }
}

/// Registered specs plus the state of the most recent parse.
///
/// Each `parse_*` call resets the error, the token buffer and the
/// missing-required map; registered specs are kept. Use one parser per thread.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    specs: Vec<ArgSpec>,
    tokens: Vec<String>,
    error: Option<ParseError>,
    missing: BTreeMap<i32, bool>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec and return a handle for further tweaks.
    ///
    /// Ids are not checked for uniqueness; lookups return the first match.
    pub fn add_spec(&mut self, spec: ArgSpec) -> &mut ArgSpec {
        if spec.is_required() {
            self.missing.insert(spec.id(), true);
        }
        let idx = self.specs.len();
        self.specs.push(spec);
        &mut self.specs[idx]
    }

    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    pub fn spec_by_id(&self, id: i32) -> Option<&ArgSpec> {
        self.specs.iter().find(|s| s.id() == id)
    }

    pub fn spec_by_id_mut(&mut self, id: i32) -> Option<&mut ArgSpec> {
        self.specs.iter_mut().find(|s| s.id() == id)
    }

    pub fn spec_by_flag(&self, token: &str) -> Option<&ArgSpec> {
        find_by_flag(&self.specs, token)
    }

    /// Parse process arguments, skipping the program name.
    pub fn parse_env(&mut self) -> ParseOutcome {
        self.parse_args(std::env::args().skip(1))
    }

    /// Parse an argument vector (program name already removed).
    pub fn parse_args<I, S>(&mut self, args: I) -> ParseOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = args
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.parse_line(&line)
    }

    /// Parse a whole command line.
    pub fn parse_line(&mut self, line: &str) -> ParseOutcome {
        self.error = None;
        for missing in self.missing.values_mut() {
            *missing = true;
        }
        self.tokens = tokenize::split_line(line, &DEFAULT_DELIMITERS);

        let mut results = match_tokens(
            &self.specs,
            &self.tokens,
            &mut self.missing,
            &mut self.error,
        );
        if results.is_empty() {
            results.push(ParsedArg::nothing_parsed());
        }

        if let Some(err) = &self.error {
            tracing::debug!(error = %err, "parse stopped");
        }

        ParseOutcome {
            results,
            error: self.error.clone(),
            missing: self.missing.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn is_missing_required(&self) -> bool {
        self.missing.values().any(|&m| m)
    }

    pub fn missing_required(&self) -> Vec<i32> {
        self.missing
            .iter()
            .filter(|(_, m)| **m)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Tokens produced by the most recent parse.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the flag of spec `id` appeared in the last parsed line at all,
    /// regardless of whether its value was accepted.
    pub fn has_token(&self, id: i32) -> bool {
        let Some(spec) = self.spec_by_id(id) else {
            return false;
        };
        let short = spec.short_flag();
        let long = spec.long_flag();
        self.tokens.iter().any(|t| *t == short || *t == long)
    }

    /// Render every spec as an aligned help table.
    pub fn help(&self) -> String {
        let layout = HelpLayout::from_specs(&self.specs);
        self.specs
            .iter()
            .map(|s| layout.render(s))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn find_by_flag<'s>(specs: &'s [ArgSpec], token: &str) -> Option<&'s ArgSpec> {
    specs.iter().find(|s| s.matches_flag(token))
}

/// Single forward pass over `tokens`. Stops at the first error (stored in
/// `error`) or at an exclusive switch.
fn match_tokens(
    specs: &[ArgSpec],
    tokens: &[String],
    missing: &mut BTreeMap<i32, bool>,
    error: &mut Option<ParseError>,
) -> Vec<ParsedArg> {
    let mut results = Vec::new();
    let n = tokens.len();
    let mut i = 0;

    while i < n && error.is_none() {
        let token = tokens[i].as_str();
        let spec = match find_by_flag(specs, token) {
            Some(spec) if !spec.matches_unset_flag(token) => spec,
            _ => {
                *error = Some(ParseError::UnrecognizedOption(token.to_string()));
                break;
            }
        };
        tracing::trace!(token, id = spec.id(), "matched flag");

        let next = i + 1;
        let has_next = next < n;
        let num_params = spec.param_count();
        let value_type = spec.resolved_value_type();

        match spec.class() {
            ArgClass::ExclusiveSwitch => {
                results.clear();
                results.push(ParsedArg::new(spec.id(), true));
                return results;
            }
            ArgClass::Switch if num_params == 0 => {
                results.push(ParsedArg::new(spec.id(), true));
            }
            ArgClass::Switch if num_params == 1 && has_next => {
                let text = tokens[next].as_str();
                match coerce::parse_bool(text) {
                    Some(v) => results.push(ParsedArg::new(spec.id(), v)),
                    None => *error = Some(ParseError::InvalidBoolean(text.to_string())),
                }
                i = next;
            }
            ArgClass::Optional | ArgClass::Required if num_params == 1 && has_next => {
                match coerce_value(value_type, &tokens[next]) {
                    Ok(Some(value)) => {
                        results.push(ParsedArg::new(spec.id(), value));
                        if spec.is_required() {
                            missing.insert(spec.id(), false);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => *error = Some(err),
                }
                i = next;
            }
            ArgClass::Optional | ArgClass::Required if num_params > 1 && has_next => {
                let end = next.saturating_add(num_params).min(n);
                let group = &tokens[next..end];
                match validate_group(spec, token, group) {
                    Ok(()) => {
                        results.push(ParsedArg::new(spec.id(), group.join(",")));
                        if spec.is_required() {
                            missing.insert(spec.id(), false);
                        }
                    }
                    Err(err) => *error = Some(err),
                }
                i += group.len();
            }
            // A value is needed but the line ended: skip without an error.
            _ => {}
        }

        i += 1;
    }

    results
}

/// Coerce a single value token. `Ok(None)` means the type carries no value.
fn coerce_value(value_type: ValueType, text: &str) -> Result<Option<ArgValue>, ParseError> {
    let owned = || text.to_string();
    let value = match value_type {
        ValueType::NoValue => return Ok(None),
        ValueType::String => ArgValue::from(text),
        ValueType::File => {
            if !coerce::file_exists(text) {
                return Err(ParseError::FileNotFound(owned()));
            }
            ArgValue::from(text)
        }
        ValueType::Boolean => coerce::parse_bool(text)
            .map(ArgValue::Bool)
            .ok_or_else(|| ParseError::InvalidBoolean(owned()))?,
        ValueType::Integer => coerce::parse_int(text)
            .map(ArgValue::Int)
            .ok_or_else(|| ParseError::InvalidInteger(owned()))?,
        ValueType::Float => coerce::parse_float(text)
            .map(ArgValue::Float)
            .ok_or_else(|| ParseError::InvalidFloat(owned()))?,
        ValueType::Double => coerce::parse_double(text)
            .map(ArgValue::Double)
            .ok_or_else(|| ParseError::InvalidDouble(owned()))?,
    };
    Ok(Some(value))
}

/// Validate every token of a multi-value group against the spec's type.
fn validate_group(spec: &ArgSpec, flag: &str, group: &[String]) -> Result<(), ParseError> {
    let value_type = spec.resolved_value_type();
    if !matches!(
        value_type,
        ValueType::Boolean | ValueType::Integer | ValueType::Float | ValueType::Double
    ) {
        return Err(ParseError::UnsupportedMultiValue {
            flag: flag.to_string(),
            value_type,
        });
    }

    for text in group {
        coerce_value(value_type, text)?;
    }

    let expected = spec.param_count();
    if group.len() < expected {
        return Err(ParseError::MissingValues {
            flag: flag.to_string(),
            expected,
            found: group.len(),
        });
    }

    Ok(())
}
