pub mod artifact;
pub mod lambda;

pub use artifact::{ARTIFACT_BUCKET_LOGICAL_ID, ArtifactStack, SKILL_ID_TAG};
pub use lambda::{
    FUNCTION_LOGICAL_ID, LambdaStack, USER_POOL_CLIENT_LOGICAL_ID, USER_POOL_LOGICAL_ID,
    WEB_PLAYER_LOGGING_VAR,
};
