//! Domain entities

mod category;
mod category_attribute;

pub use category::Category;
pub use category_attribute::{
    CategoryAttribute, NewCategoryAttribute, NodeCreated, NodeSummary, RootAttribute,
};
