pub mod rest;
pub mod traits;

pub use rest::RestApi;
pub use traits::{ContentPick, CreateSection, LandingApi};
