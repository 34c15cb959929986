// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Bucket names, function names, regions, key prefixes, and invalidation paths.

mod bucket_name;
mod function_name;
mod id;
mod key_prefix;
mod path_pattern;
mod region;

pub use bucket_name::{BucketName, BucketNameError};
pub use function_name::{FunctionName, FunctionNameError};
pub use id::{DistributionId, Id, InvalidationId};
pub use key_prefix::KeyPrefix;
pub use path_pattern::{PathPattern, PathPatternError};
pub use region::{Region, RegionError};
