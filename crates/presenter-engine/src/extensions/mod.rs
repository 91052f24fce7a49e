//! # Link Extensions
//!
//! Two additions to plain CommonMark link handling:
//!
//! - **`handle_link`**: `<@name>` becomes a link to the name's profile page
//! - **`target_blank`**: every link opens in a new browsing context without
//!   access to the opener

pub mod handle_link;
pub mod target_blank;

pub use handle_link::{HandleLink, HandleLinkExtension};
pub use target_blank::{TargetBlank, TargetBlankExtension};
