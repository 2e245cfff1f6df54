//! Server-rendered pages

mod handlers;
mod templates;

pub use handlers::*;
pub use templates::render_page;
