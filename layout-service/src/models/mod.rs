//! Request and response bodies for the layout API.

pub mod layout;

pub use layout::{LayoutResponse, PromptRequest};
