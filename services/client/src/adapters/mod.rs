pub mod console;
pub mod http;
pub mod page;

pub use console::ConsoleConfirm;
pub use http::HttpBackend;
pub use page::{HtmlPage, PageSnapshot};
