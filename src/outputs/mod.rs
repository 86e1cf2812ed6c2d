//! Output generation for a finished run.
//!
//! - [`markdown`]: renders the digest for the terminal (stdout)
//! - [`json`]: writes the digest as a JSON report, one file per edition
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── morning.json
//! ```

pub mod json;
pub mod markdown;
