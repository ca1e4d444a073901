#![no_main]

use libfuzzer_sys::fuzz_target;
use paperai::models::SearchParams;
use paperai::search::SearchQuery;

fuzz_target!(|data: &[u8]| {
    if let Ok(params) = serde_urlencoded::from_bytes::<SearchParams>(data) {
        if let Ok(query) = SearchQuery::try_from(params) {
            let _ = query.year_param();
        }
    }
});
