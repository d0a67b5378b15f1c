#[path = "integration/pipeline_tests.rs"]
mod pipeline_tests;
