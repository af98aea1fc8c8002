mod article;
mod page;

pub use article::*;
pub use page::*;
