//! Preference manager.
//!
//! Declare a [`PreferenceTree`], hand it to a [`PreferenceManager`] with a key
//! prefix and a storage backend, then `get`/`set` typed values. Every call
//! returns a usable value plus a [`Status`].

pub mod error;
pub mod handler;
pub mod managed;
pub mod manager;
pub mod status;
pub mod tree;

pub use error::ManagerError;
pub use handler::{Action, LogHandler, RequestSummary, ResponseHandler};
pub use managed::ManagedPreference;
pub use manager::PreferenceManager;
pub use status::{Response, Status};
pub use tree::{PreferenceGroup, PreferenceTree, TreeNode};
