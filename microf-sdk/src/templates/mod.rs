pub mod parser;
pub mod template;

pub use template::CommandTemplate;
