// Credential Service: signup, login, username recovery and session tokens.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;
pub mod validation;

pub use extractor::{AuthUser, MaybeAuthUser};
pub use token::TokenService;
