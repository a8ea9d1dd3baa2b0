pub mod cart_items;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use users::Entity as Users;
