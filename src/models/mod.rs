pub mod pricing;
pub mod product;
