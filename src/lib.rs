//! Package implement an ordered-set of unique keys, using
//! [left-leaning-red-black][wiki-llrb] tree.
//!
//! Unlike most ordered collections, the total order on keys is not
//! demanded from the key type. Instead a comparator function is injected
//! into the set at construction time and it alone decides the sort order,
//! which makes it possible to index the same key type under different
//! orderings.
//!
//! Simple ordered-set for single threaded use case
//! -----------------------------------------------
//!
//! - Each entry in OSet instance correspond to a unique key.
//! - Parametrised over `key-type` and a total-order comparator over keys.
//! - Mutation via insert(), remove() api, failures are typed errors.
//! - Membership via contains(), extrema via min(), max().
//! - Full table scan, to iterate over all keys in sort order.
//! - Level order scan, to iterate over all keys breadth first.
//! - Read only access into the tree shape, for tools that render it.
//! - Uses ownership model and borrow semantics to ensure safety.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Constructing a new [OSet] instance and mutating it:
//!
//! ```
//! use oset::OSet;
//!
//! let mut index = OSet::new(|a: &String, b: &String| a.cmp(b));
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! index.insert("key1".to_string()).unwrap();
//! index.insert("key2".to_string()).unwrap();
//!
//! let n = index.len();
//! assert_eq!(n, 2);
//!
//! assert_eq!(index.contains(&"key1".to_string()), true);
//! assert_eq!(index.min().unwrap(), "key1");
//! assert_eq!(index.max().unwrap(), "key2");
//!
//! index.remove(&"key1".to_string()).unwrap();
//! assert_eq!(index.contains(&"key1".to_string()), false);
//! ```
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(DuplicateKey, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, std::io::read(buf));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, std::fs::read(file_path), format!("read failed"));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

mod oset;

pub use crate::oset::{Color, Iter, LevelOrder, Node, OSet};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    DuplicateKey(String, String),
    KeyNotFound(String, String),
    EmptyTree(String, String),
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            DuplicateKey(p, msg) => write!(f, "{} DuplicateKey: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
            EmptyTree(p, msg) => write!(f, "{} EmptyTree: {}", p, msg),
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
