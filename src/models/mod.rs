//! Domain models and DTOs.

pub mod deepcopy;
pub mod job;
pub mod result;
pub mod template;

pub use deepcopy::{
    Avatar, RemoteAvatar, RemoteStatus, ResultPayload, StatusSnapshot, SwipeResult, V1Result,
    V2Result, extract_marketing_angles, extract_swipe_results,
};
pub use job::{
    CreateJobRequest, CreateJobResponse, JobDetailResponse, JobListResponse, JobStatus,
    JobStatusResponse, QueryJobsParams, TargetApproach,
};
pub use result::ResultMetadata;
pub use template::{
    GenerateTemplateRequest, GenerateTemplateResponse, GeneratedTemplate, InjectedTemplateSummary,
    InjectionSummary, ProcessResultsResponse,
};
