//! The lazy accessible node tree
//!
//! Windows group into VMs, each window owns a root node, and nodes
//! materialize their description and children on demand under the
//! configured collection limits.

mod jvm;
mod node;
mod path;
mod window;

pub use jvm::AccessibleJvm;
pub use node::AccessibleNode;
pub use path::{NodeCursor, NodePath};
pub use window::AccessibleWindow;

pub(crate) use jvm::group_into_jvms;
