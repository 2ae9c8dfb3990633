pub mod formatter;
pub mod gacha;
pub mod menu_store;
pub mod responder;

pub use crate::domain::model::{Budget, Event, MenuItem, MenuSnapshot, Selection};
pub use crate::domain::ports::{ConfigProvider, EventSigner, MenuSource};
pub use crate::utils::error::Result;
