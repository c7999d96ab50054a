//! Literal codec: labels, packed keys and their closure expansions
//!
//! A *label* is a string over `{0, 1, 2, z, o, x}` with one character per
//! atom. It packs into a [`Key`], the identity of an implicant throughout
//! the minimizer.
//!
//! ```
//! use htmin::label::{encode, countermodels};
//!
//! let key = encode("z2").unwrap();
//! let valuations: Vec<String> = countermodels(key).map(|k| k.to_string()).collect();
//! assert_eq!(valuations, vec!["02", "12"]);
//! ```

mod closure;
mod error;
mod key;
mod literal;

pub use closure::{countermodels, total_countermodels, total_covers, totalize, Expansion};
pub use error::LabelError;
pub use key::{decode, encode, Key, Label, MAX_WIDTH};
pub use literal::{Literal, INCOMPATIBLE_UNION, LANE_BITS, LANE_MASK};
