pub mod backend;
pub mod error;
pub mod impls;
pub mod model;
pub mod store;

pub use backend::{DocumentService, PatchOp};
pub use error::FriendError;
pub use store::Store;
