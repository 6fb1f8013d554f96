pub mod identity;
pub mod requests;

pub use identity::Caller;
