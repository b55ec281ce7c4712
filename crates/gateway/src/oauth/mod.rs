//! OAuth sign-in providers.

mod google;

pub use google::{GoogleOAuth, OAuthProvider};
