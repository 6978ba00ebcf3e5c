//! Request middleware and extractors

mod attendee_auth;

pub use attendee_auth::Authenticated;
