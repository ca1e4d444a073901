#![no_main]

use libfuzzer_sys::fuzz_target;
use paperai::graph::{ForceLayout, LayoutConfig, build_knowledge_graph};
use paperai::models::KnowledgeGraphRequest;

fuzz_target!(|data: &[u8]| {
    let Ok(req) = serde_json::from_slice::<KnowledgeGraphRequest>(data) else {
        return;
    };
    let graph = build_knowledge_graph(&req.papers, &req.authors, &req.topics);
    let engine = ForceLayout::new(LayoutConfig { max_iterations: 5, ..LayoutConfig::default() });
    let layout = engine.run(&graph).expect("built graphs have no dangling edges");
    assert!(layout.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
});
