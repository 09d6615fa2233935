//! # d-json — JSON lexing for display and editing
//!
//! Two byte-oriented passes over JSON text, neither of which builds a tree:
//!
//! - **[`colorize`]** — classify every byte into a [`TokenClass`] for syntax
//!   highlighting
//! - **[`pretty`]** — reformat compact JSON into an editable, line-broken form
//!
//! Both share the string/escape tracker in [`scan`], so they agree exactly on
//! where string literals start and end. Malformed input is never an error:
//! the passes degrade to best-effort output.
//!
//! ```
//! use d_json::{colorize, pretty, TokenClass};
//!
//! let classes: Vec<TokenClass> = colorize(r#"{"n":1}"#).map(|t| t.class).collect();
//! assert_eq!(classes[1], TokenClass::Key);
//! assert_eq!(pretty(r#"{"n":1}"#), "{\n  \"n\":1\n}");
//! ```

pub mod colorize;
pub mod pretty;
pub mod scan;
pub mod token;

pub use colorize::{colorize, Colorizer, Token};
pub use pretty::pretty;
pub use token::TokenClass;
