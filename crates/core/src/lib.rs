//! Functional core for the inventory service.
//!
//! Everything in here is either pure or talks to the outside world only through
//! the traits in [`storage::ItemTable`] and [`auth::TokenVerifier`]. The server
//! crate supplies the DynamoDB and Cognito implementations.

pub mod auth;
pub mod request;
pub mod response;
pub mod storage;
