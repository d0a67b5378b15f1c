#[path = "integration/jobs_tests.rs"]
mod jobs_tests;
