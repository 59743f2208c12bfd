//! libxingma-core
//!
//! Decomposition store, code derivation and third-tier short-code
//! allocation for the xingma (shape-code) table compiler.
//!
//! The compiler turns a character decomposition database into an
//! input-method encoding table: every character gets a full code (up to
//! four symbols built from its flattened decomposition), a brief two-symbol
//! code, and optionally a bootstrapped third-tier short code that
//! deduplicates the most contended full-code prefixes.
//!
//! Public API:
//! - `Code` / `Part` / `Tag` - value types of the data model
//! - `LookupTable` - decomposition store + short-code table with memoized
//!   expansion; full/brief/default-L3 derivation are methods on it
//! - `l3_bootstrap` - third-tier allocation sweep with per-group report
//! - `Error` - the error taxonomy shared by all of the above

pub mod code;
pub use code::{Code, Part, Tag, MAX_CODE_LEN};

pub mod table;
pub use table::LookupTable;

pub mod derive;

pub mod allocate;
pub use allocate::{l3_bootstrap, BootstrapSummary};

pub mod error;
pub use error::{Error, Result};
