pub mod reader;
pub mod tables;
pub mod template;

pub use reader::{Cell, Row, Workbook};
pub use tables::*;
pub use template::write_template;
