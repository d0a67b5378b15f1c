//! SeaORM entity definitions for PostgreSQL database.

pub mod credit_event;
pub mod injectable_template;
pub mod injected_template;
pub mod job;
pub mod job_result;
