//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod client;
pub mod invoice;
pub mod line_item;
pub mod project;
pub mod time_entry;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use invoice::{
    Column as InvoiceColumn, Entity as Invoice, InvoiceStatus, Model as InvoiceModel,
};
pub use line_item::{Column as LineItemColumn, Entity as LineItem, Model as LineItemModel};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use time_entry::{
    Column as TimeEntryColumn, Entity as TimeEntry, EntryStatus, Model as TimeEntryModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
