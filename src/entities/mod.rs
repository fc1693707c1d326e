pub mod product;
pub mod sale;

pub use product::{Entity as ProductEntity, Model as ProductModel};
pub use sale::{Entity as SaleEntity, Model as SaleModel};
