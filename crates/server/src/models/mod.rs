//! Domain models, separate from database row types.
//!
//! Each entity has a domain struct plus `Create*Input` / `Update*Input`
//! request types. Update inputs carry only the fields a client is allowed
//! to change; anything else never reaches the database.

pub mod inventory;
pub mod sale;
pub mod store;
pub mod supplier;
pub mod user;

pub use inventory::{CreateItemInput, InventoryItem, UpdateItemInput};
pub use sale::{CreateSaleInput, Sale, UpdateSaleInput};
pub use store::{CreateStoreInput, Store, UpdateStoreInput};
pub use supplier::{CreateSupplierInput, Supplier, UpdateSupplierInput};
pub use user::User;
