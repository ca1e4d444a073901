//! Fuzzing library for paperai.
//!
//! Targets cover provider JSON parsing, search query validation and the
//! graph build plus layout pipeline.
//!
//! # Usage
//!
//! ```bash
//! cd crates/paperai-fuzz
//! cargo +nightly fuzz run fuzz_graph_layout -- -max_total_time=60
//! ```

pub use paperai::{graph, models};
