//! Document Storage
//! Mission: Persist shop documents and answer the access gate's credential lookups

pub mod documents;

pub use documents::{DocumentStore, InsertOneResult, UpdateResult};

use crate::auth::models::UserRecord;
use anyhow::Result;

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    User,
    Product,
    Order,
    Banner,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::Product => "product",
            Collection::Order => "order",
            Collection::Banner => "banner",
        }
    }
}

/// The only data-access operation the access gate depends on
pub trait CredentialStore: Send + Sync {
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
}
