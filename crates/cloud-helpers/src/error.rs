//! Translation of AWS SDK failures into [`HelperError`].

use std::error::Error as StdError;
use std::fmt;

use aws_credential_types::provider::error::CredentialsError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use common::{HelperError, Operation};

/// Map an SDK error raised by `operation` onto the generic error.
///
/// Credential-resolution failures anywhere in the source chain become
/// [`HelperError::MissingCredentials`]. Modeled service errors keep their code
/// and message; everything else keeps the full display context.
pub(crate) fn translate<E, R>(operation: Operation, err: SdkError<E, R>) -> HelperError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: fmt::Debug + Send + Sync + 'static,
{
    if caused_by_credentials(&err) {
        return HelperError::MissingCredentials;
    }

    let message = match &err {
        SdkError::ServiceError(ctx) => match (ctx.err().code(), ctx.err().message()) {
            (Some(code), Some(msg)) => format!("{code}: {msg}"),
            (Some(code), None) => code.to_owned(),
            _ => DisplayErrorContext(&err).to_string(),
        },
        _ => DisplayErrorContext(&err).to_string(),
    };

    HelperError::provider(operation, message)
}

/// Reject a blank required argument before it reaches the provider.
pub(crate) fn require(field: &str, value: &str) -> Result<(), HelperError> {
    if value.trim().is_empty() {
        return Err(HelperError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

fn caused_by_credentials(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<CredentialsError>().is_some() {
            return true;
        }
        current = e.source();
    }
    false
}
