pub mod permissions;
pub mod navigation;

pub use permissions::PermissionTable;
pub use navigation::{MENU, NavItem, can_open, visible_menu};
