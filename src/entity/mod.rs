pub mod audit_logs;
pub mod categories;
pub mod countries;
pub mod product_categories;
pub mod product_images;
pub mod products;
pub mod sea_orm_active_enums;
pub mod services;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use countries::Entity as Countries;
pub use product_categories::Entity as ProductCategories;
pub use product_images::Entity as ProductImages;
pub use products::Entity as Products;
pub use services::Entity as Services;
pub use users::Entity as Users;
