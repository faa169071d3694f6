//! Declarative command-line parsing.
//!
//! Register [`ArgSpec`]s on a [`Parser`], then hand it a whole command line.
//! The line is split into tokens (quotes and brackets keep their contents
//! together, `=` and `,` separate values), each flag is matched against the
//! registered specs, and the values that follow are coerced to the spec's type.
//!
//! ```
//! use argline::{ArgClass, ArgSpec, Parser, ValueType};
//!
//! let mut parser = Parser::new();
//! parser.add_spec(ArgSpec::new(ArgClass::Switch, 1).short("v").long("verbose"));
//! parser.add_spec(
//!     ArgSpec::new(ArgClass::Required, 2)
//!         .short("n")
//!         .long("count")
//!         .value_type(ValueType::Integer),
//! );
//!
//! let outcome = parser.parse_line("-v --count=3");
//! assert!(!outcome.is_error());
//! assert!(!outcome.is_missing_required());
//! assert_eq!(outcome.results()[1].value.as_int(), Some(3));
//! ```
//!
//! Parsing never panics on bad input. The first problem stops the walk and is
//! reported through [`ParseOutcome::error`]; whatever was parsed before it is
//! still returned.

pub mod coerce;
pub mod error;
pub mod help;
pub mod parser;
pub mod spec;
pub mod tokenize;

pub use error::{ErrorKind, ParseError};
pub use help::HelpLayout;
pub use parser::{ParseOutcome, ParsedArg, Parser};
pub use spec::{
    ArgClass, ArgSpec, ArgValue, FlagStyle, HelpRow, NO_ARG_ID, NO_ARG_VALUE, UNSET_LONG_NAME,
    UNSET_SHORT_NAME, ValueType,
};
