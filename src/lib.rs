//! # maxsat-formula - Weighted Partial MaxSAT Instances in Memory
//!
//! `maxsat-formula` is the central data store between problem loaders and
//! MaxSAT solving algorithms. A loader populates a
//! [`MaxSatFormula`](instances::MaxSatFormula) with hard clauses, weighted soft
//! clauses, cardinality and pseudo-boolean constraints, or a linear objective
//! that gets converted to soft clauses. Solving algorithms afterwards read the
//! clauses and the weight bookkeeping, and the formula can be written out in
//! the DIMACS WCNF format at any time.
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` for the variable name registry. |
//! | `compression` | Enable writing compressed output files (bzip2, gzip and xz, detected by the file extension). |
//! | `serde` | Derive `Serialize` and `Deserialize` for the data types. |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade. Clause
//! insertion and constraint routing are logged at `trace` level, conversions
//! and copies at `debug` level. No logger is installed by the library.

pub mod instances;
pub mod types;

pub use instances::{MaxSatFormula, ProblemType};
