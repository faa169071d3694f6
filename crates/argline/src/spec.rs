//! Argument declarations and the values they produce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id reported when nothing was parsed.
pub const NO_ARG_ID: i32 = 0;

/// Value paired with [`NO_ARG_ID`] in an empty parse.
pub const NO_ARG_VALUE: &str = "default_str";

/// Placeholder short name for a spec declared without one.
pub const UNSET_SHORT_NAME: &str = "default_short_flag";

/// Placeholder long name for a spec declared without one.
pub const UNSET_LONG_NAME: &str = "default_long_flag";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgClass {
    /// Presence means `true`; may take one boolean value instead.
    Switch,
    /// Ends the parse on sight with only its own result (`--help`, `--version`).
    ExclusiveSwitch,
    Optional,
    /// Like `Optional`, but tracked as missing until a value is consumed.
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    NoValue,
    Boolean,
    Integer,
    Float,
    Double,
    String,
    /// A path that must exist when parsed.
    File,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoValue => "no-value",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::File => "file",
        };
        f.write_str(name)
    }
}

/// Prefix convention for flag names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagStyle {
    /// `-s` and `--long`.
    #[default]
    Dash,
    /// `/s` and `/long`.
    Slash,
}

impl FlagStyle {
    pub fn short_prefix(self) -> &'static str {
        match self {
            Self::Dash => "-",
            Self::Slash => "/",
        }
    }

    pub fn long_prefix(self) -> &'static str {
        match self {
            Self::Dash => "--",
            Self::Slash => "/",
        }
    }
}

/// A typed value produced by a parse or declared as a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    Str(String),
}

impl ArgValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Floats print with six decimals, everything else in its plain form.
impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
            Self::Double(v) => write!(f, "{v:.6}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// One accepted command-line argument.
///
/// Built once with the chained setters, then handed to
/// [`Parser::add_spec`](crate::Parser::add_spec).
///
/// ```
/// use argline::{ArgClass, ArgSpec, ValueType};
///
/// let spec = ArgSpec::new(ArgClass::Optional, 7)
///     .short("n")
///     .long("count")
///     .help("How many")
///     .value_type(ValueType::Integer)
///     .default_value(3);
/// assert_eq!(spec.long_flag(), "--count");
/// assert_eq!(spec.param_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    id: i32,
    class: ArgClass,
    short_name: String,
    long_name: String,
    description: String,
    value_type: Option<ValueType>,
    num_params: Option<usize>,
    flag_style: FlagStyle,
    default_value: Option<ArgValue>,
}

impl ArgSpec {
    pub fn new(class: ArgClass, id: i32) -> Self {
        Self {
            id,
            class,
            short_name: UNSET_SHORT_NAME.to_string(),
            long_name: UNSET_LONG_NAME.to_string(),
            description: String::new(),
            value_type: None,
            num_params: None,
            flag_style: FlagStyle::Dash,
            default_value: None,
        }
    }

    /// Short name without its prefix (`"v"` for `-v`).
    pub fn short(mut self, name: impl Into<String>) -> Self {
        self.short_name = name.into();
        self
    }

    /// Long name without its prefix (`"verbose"` for `--verbose`).
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long_name = name.into();
        self
    }

    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Number of value tokens consumed after the flag.
    pub fn num_params(mut self, n: usize) -> Self {
        self.num_params = Some(n);
        self
    }

    pub fn flag_style(mut self, style: FlagStyle) -> Self {
        self.flag_style = style;
        self
    }

    pub fn default_value(mut self, value: impl Into<ArgValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn set_flag_style(&mut self, style: FlagStyle) -> &mut Self {
        self.flag_style = style;
        self
    }

    pub fn set_default_value(&mut self, value: impl Into<ArgValue>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn class(&self) -> ArgClass {
        self.class
    }

    pub fn is_required(&self) -> bool {
        self.class == ArgClass::Required
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn has_short_name(&self) -> bool {
        self.short_name != UNSET_SHORT_NAME
    }

    pub fn has_long_name(&self) -> bool {
        self.long_name != UNSET_LONG_NAME
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn style(&self) -> FlagStyle {
        self.flag_style
    }

    /// Declared value type, or the class default when none was given.
    pub fn resolved_value_type(&self) -> ValueType {
        self.value_type.unwrap_or(match self.class {
            ArgClass::ExclusiveSwitch => ValueType::NoValue,
            ArgClass::Switch => ValueType::Boolean,
            ArgClass::Optional | ArgClass::Required => ValueType::String,
        })
    }

    /// Declared arity, or the class default when none was given.
    pub fn param_count(&self) -> usize {
        self.num_params.unwrap_or(match self.class {
            ArgClass::Switch | ArgClass::ExclusiveSwitch => 0,
            ArgClass::Optional | ArgClass::Required => 1,
        })
    }

    pub fn default(&self) -> Option<&ArgValue> {
        self.default_value.as_ref()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// Prefix + short name, e.g. `-v` or `/v`.
    pub fn short_flag(&self) -> String {
        format!("{}{}", self.flag_style.short_prefix(), self.short_name)
    }

    /// Prefix + long name, e.g. `--verbose` or `/verbose`.
    pub fn long_flag(&self) -> String {
        format!("{}{}", self.flag_style.long_prefix(), self.long_name)
    }

    pub fn matches_flag(&self, token: &str) -> bool {
        token == self.short_flag() || token == self.long_flag()
    }

    /// True when `token` is the placeholder form of a name this spec left unset.
    pub fn matches_unset_flag(&self, token: &str) -> bool {
        let unset_long = !self.has_long_name()
            && token == format!("{}{}", self.flag_style.long_prefix(), UNSET_LONG_NAME);
        let unset_short = !self.has_short_name()
            && token == format!("{}{}", self.flag_style.short_prefix(), UNSET_SHORT_NAME);
        unset_long || unset_short
    }

    /// Columns handed to help rendering.
    pub fn display_row(&self) -> HelpRow {
        HelpRow {
            short_flag: self.has_short_name().then(|| self.short_flag()),
            long_flag: self.has_long_name().then(|| self.long_flag()),
            description: self.description.clone(),
            required: self.is_required(),
            default_text: self.default_value.as_ref().map(ArgValue::to_string),
        }
    }
}

/// Display view of a spec. Unset names are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRow {
    pub short_flag: Option<String>,
    pub long_flag: Option<String>,
    pub description: String,
    pub required: bool,
    pub default_text: Option<String>,
}
