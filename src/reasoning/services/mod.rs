//! Pure rendering and normalization for provider wire formats.

mod normalize;
mod render;

pub use normalize::{REACT_CALL_ID, normalize_response};
pub use render::{
    DEFAULT_MAX_TOKENS, REACT_STOP_SEQUENCE, RequestOptions, render_messages, render_request,
    render_tool_declarations,
};
