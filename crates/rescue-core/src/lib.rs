//! rescue-core: Core library for rescuing CSV files and replacing sentinel values
//!
//! This library provides functionality to:
//! - Scan directories for CSV files (non-recursive)
//! - Move staged files from a rescue directory into a destination directory
//! - Load CSV files into typed tables and replace a sentinel token
//!   (`BURNOUT` by default) with a missing value
//! - Run configured batches of targets, isolating failures per file

pub mod batch;
pub mod config;
pub mod encoding;
pub mod error;
pub mod parser;
pub mod relocator;
pub mod scanner;
pub mod table;
pub mod transform;
pub mod writer;

pub use batch::{BatchDriver, BatchReport, FileFailure, Stage, TargetReport};
pub use config::{expand_date, BatchConfig, FileTarget};
pub use encoding::TextEncoding;
pub use error::{Error, ErrorCategory, Result};
pub use parser::{parse_csv, parse_csv_str};
pub use relocator::{move_all, move_file, CollisionPolicy, MoveOutcome};
pub use scanner::list_csv_files;
pub use table::{CellValue, Column, ColumnKind, Row, Table};
pub use transform::{
    transform_file, transform_in_place, ReplacementRule, TransformOutcome, DEFAULT_SENTINEL,
};
pub use writer::{to_csv_string, write_csv};
