//! Business logic services.

pub mod angle_match;
pub mod billing;
pub mod content;
pub mod deepcopy;
pub mod injector;
pub mod materializer;
pub mod reconciler;
pub mod sanitize;

pub use deepcopy::DeepCopyClient;
