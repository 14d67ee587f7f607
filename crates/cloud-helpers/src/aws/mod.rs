//! AWS SDK client initialisation for SNS, SQS, and Secrets Manager.
//!
//! Clients are not created until the first operation needs one. All three share
//! a single [`aws_config::SdkConfig`], so credentials and region are resolved
//! once per bundle.

pub mod clients;
pub mod lazy;

pub use clients::AwsClients;
pub use lazy::LazyClients;
