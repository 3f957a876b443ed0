//! Stateless JWT authentication for the sandpiper platform.
//!
//! Login issues a signed token carrying the user's ID as the subject;
//! the API's bearer middleware validates it on every request. No token
//! state is persisted server-side.

pub mod error;
pub mod jwt;

pub use error::AuthError;
pub use jwt::{Claims, JwtAuthenticator};
