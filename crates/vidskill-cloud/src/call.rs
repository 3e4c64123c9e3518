//! Remote call wrapper
//!
//! Every request against a provider goes through [`call`], which logs the
//! intent, the success or the failure, and classifies the outcome according
//! to a [`CallPolicy`].

use crate::error::Result;
use std::future::Future;

/// How a failed remote call is surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPolicy {
    /// Failure is returned as `Err` and aborts the workflow
    Fatal,
    /// Failure is logged as an error and turned into `Ok(None)`
    Tolerant,
    /// Failure is expected (existence checks) and turned into `Ok(None)` silently
    Probe,
}

/// Execute one remote request and classify its result
///
/// Returns `Ok(Some(data))` on success. On failure the policy decides between
/// `Err(e)` ([`CallPolicy::Fatal`]) and `Ok(None)`.
pub async fn call<T, F>(description: &str, policy: CallPolicy, request: F) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    if policy == CallPolicy::Probe {
        tracing::debug!("checking {}", description);
    } else {
        tracing::info!("calling {}", description);
    }

    match request.await {
        Ok(data) => {
            if policy == CallPolicy::Probe {
                tracing::debug!("success with {}", description);
            } else {
                tracing::info!("success with {}", description);
            }
            Ok(Some(data))
        }
        Err(e) => match policy {
            CallPolicy::Fatal => {
                tracing::error!("failure with {}: {}", description, e);
                Err(e)
            }
            CallPolicy::Tolerant => {
                tracing::error!("failure with {}: {}", description, e);
                Ok(None)
            }
            CallPolicy::Probe => {
                tracing::debug!("{} reported: {}", description, e);
                Ok(None)
            }
        },
    }
}

/// [`call`] with [`CallPolicy::Fatal`], unwrapping the success value
pub async fn fatal<T, F>(description: &str, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tracing::info!("calling {}", description);
    match request.await {
        Ok(data) => {
            tracing::info!("success with {}", description);
            Ok(data)
        }
        Err(e) => {
            tracing::error!("failure with {}: {}", description, e);
            Err(e)
        }
    }
}

/// [`call`] with [`CallPolicy::Probe`]: any failure reads as "absent"
pub async fn probe<T, F>(description: &str, request: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match call(description, CallPolicy::Probe, request).await {
        Ok(found) => found,
        Err(_) => None,
    }
}
