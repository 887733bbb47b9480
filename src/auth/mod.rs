//! Authentication module: token codec, password hashing, cookie contract
//! and the cookie-based request authenticator.

pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use cookie::{get_cookie, ACCESS_COOKIE, REFRESH_COOKIE};
pub use jwt::{Claims, JwtService, TokenError, TokenPair};
pub use middleware::{cookie_auth_middleware, AuthContext, CookieCredential};
pub use password::PasswordHasher;
