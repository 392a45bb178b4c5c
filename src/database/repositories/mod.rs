pub mod account;

pub use account::{CredentialStore, Identifier, PgCredentialStore, StoreError, StoreResult};
