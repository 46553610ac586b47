//! # Collaborator Traits
//!
//! The seams between the redirection layer and everything it does not own.
//!
//! | Trait | Role | Implemented by |
//! |-------|------|----------------|
//! | [`PathAttributes`] | Read the redirection attribute and stat a placeholder | [`NativeAttributes`](crate::NativeAttributes), test fakes |
//! | [`RemoteFs`] / [`RemoteFile`] | Open and read remote objects | The host's remote client |
//! | [`ProtocolFs`] | Capability set the host registry dispatches to | [`RedirectFs`](crate::RedirectFs) |
//!
//! ```text
//! host ──▶ ProtocolFs (RedirectFs) ──▶ PathAttributes   (resolve, no network)
//!                    │
//!                    └──▶ RedirectHandle ──▶ RemoteFs    (first read only)
//! ```

mod path_attrs;
mod protocol_fs;
mod remote;

pub use path_attrs::PathAttributes;
pub use protocol_fs::ProtocolFs;
pub use remote::{RemoteFile, RemoteFs};
