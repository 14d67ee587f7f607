//! [`SecretSource`] implementation backed by the Secrets Manager client.

use async_trait::async_trait;
use common::{HelperError, Operation};

use super::SecretSource;
use crate::aws::AwsClients;
use crate::error::translate;

#[async_trait]
impl SecretSource for AwsClients {
    async fn secret_string(&self, secret_id: &str) -> Result<Option<String>, HelperError> {
        let resp = self
            .secretsmanager
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| translate(Operation::RetrieveSecret, e))?;

        Ok(resp.secret_string().map(str::to_owned))
    }
}
