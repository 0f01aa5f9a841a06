pub mod mutations;
pub mod queries;
pub mod schema;
pub mod subscriptions;
pub mod types;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;
pub use schema::{build_schema, AppSchema};
pub use subscriptions::SubscriptionRoot;

use async_graphql::ErrorExtensions;

use crate::error::AppError;
use infra::ops::DomainError;

/// Map application errors onto GraphQL errors. Validation failures carry
/// a `fields` extension so the forms can highlight each offending field.
pub(crate) fn gql_error(error: AppError) -> async_graphql::Error {
    match &error {
        AppError::Domain(DomainError::Validation(errors)) => {
            let fields = errors.fields().clone();
            async_graphql::Error::new("validation failed").extend_with(|_, e| {
                for (field, message) in &fields {
                    e.set(field.as_str(), message.as_str());
                }
            })
        }
        _ => async_graphql::Error::new(error.to_string()),
    }
}

pub(crate) fn domain_error(error: DomainError) -> async_graphql::Error {
    gql_error(AppError::Domain(error))
}
