pub mod errors;
pub mod identity;
pub mod search_url;
