//! AWS SDK client bundle built from [`Settings`].

use aws_config::{BehaviorVersion, Region};
use common::HelperError;
use tracing::debug;

use crate::config::Settings;

/// Bundle of AWS SDK clients sharing one resolved SDK config.
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// SNS client used to publish and to subscribe queues to topics.
    pub sns: aws_sdk_sns::Client,
    /// SQS client used to receive and delete messages.
    pub sqs: aws_sdk_sqs::Client,
    /// Secrets Manager client used to read secret values.
    pub secretsmanager: aws_sdk_secretsmanager::Client,
}

impl AwsClients {
    /// Build all clients.
    ///
    /// Static credentials from `settings` take precedence; otherwise the SDK's
    /// default credential chain is used. The region and endpoint override are
    /// applied when present.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::MissingCredentials`] if `settings` carries only
    /// half of a static key pair.
    pub async fn init(settings: &Settings) -> Result<Self, HelperError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(credentials) = settings.static_credentials()? {
            loader = loader.credentials_provider(credentials);
        }
        if let Some(region) = settings.region() {
            loader = loader.region(Region::new(region.to_owned()));
        }

        let config = loader.load().await;
        let endpoint = settings.endpoint_url();

        let sns = {
            let mut builder = aws_sdk_sns::config::Builder::from(&config);
            if let Some(url) = endpoint {
                builder = builder.endpoint_url(url);
            }
            aws_sdk_sns::Client::from_conf(builder.build())
        };

        let sqs = {
            let mut builder = aws_sdk_sqs::config::Builder::from(&config);
            if let Some(url) = endpoint {
                builder = builder.endpoint_url(url);
            }
            aws_sdk_sqs::Client::from_conf(builder.build())
        };

        let secretsmanager = {
            let mut builder = aws_sdk_secretsmanager::config::Builder::from(&config);
            if let Some(url) = endpoint {
                builder = builder.endpoint_url(url);
            }
            aws_sdk_secretsmanager::Client::from_conf(builder.build())
        };

        debug!(
            region = config.region().map(|r| r.as_ref()).unwrap_or("<default>"),
            endpoint_override = endpoint.is_some(),
            "AWS clients initialised"
        );

        Ok(Self {
            sns,
            sqs,
            secretsmanager,
        })
    }
}
