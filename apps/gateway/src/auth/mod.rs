pub mod bearer;
pub mod claims;
pub mod jwt;

pub use bearer::extract_bearer;
pub use claims::{Claims, SubjectId};
pub use jwt::{mint_access_token, AuthError, TokenVerifier};
