pub mod sessions;
pub mod todo;
pub mod user;

pub use sessions::SessionRegistry;
pub use todo::TodoService;
pub use user::UserService;
