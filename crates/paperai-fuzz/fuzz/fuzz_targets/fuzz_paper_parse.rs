#![no_main]

use libfuzzer_sys::fuzz_target;
use paperai::models::{Paper, PaperRecord, SearchResult};

fuzz_target!(|data: &[u8]| {
    if let Ok(paper) = serde_json::from_slice::<Paper>(data) {
        let _ = PaperRecord::from(&paper);
    }
    let _ = serde_json::from_slice::<SearchResult>(data);
});
