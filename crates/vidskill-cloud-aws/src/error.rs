//! Mapping of SDK errors onto [`CloudError`]

use aws_sdk_s3::error::ProvideErrorMetadata;
use vidskill_cloud::CloudError;

/// Error codes that mean "the thing you asked about does not exist"
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchBucket",
    "NotFound",
    "ResourceNotFoundException",
    "NoSuchKey",
];

/// Convert any SDK error into a [`CloudError`], recognising absence
pub(crate) fn api_error<E>(operation: &str, err: E) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    if is_not_found(&code, &message) {
        return CloudError::ResourceNotFound(format!("{}: {}", operation, message));
    }

    CloudError::api(operation, format!("{}: {}", code, message))
}

fn is_not_found(code: &str, message: &str) -> bool {
    NOT_FOUND_CODES.contains(&code)
        // The stack API reports missing stacks as a validation error
        || (code == "ValidationError" && message.contains("does not exist"))
}
