use crate::access::permissions::PermissionTable;
use crate::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    /// `None` means every signed-in user sees the entry.
    pub permission: Option<&'static str>,
}

pub const MENU: &[NavItem] = &[
    NavItem { label: "Dashboard", path: "/dashboard", permission: None },
    NavItem { label: "Projects", path: "/projects", permission: Some("view_projects") },
    NavItem { label: "Tasks", path: "/tasks", permission: Some("view_tasks") },
    NavItem { label: "Calendar", path: "/calendar", permission: Some("view_calendar") },
    NavItem { label: "KPIs", path: "/kpis", permission: Some("view_kpis") },
    NavItem { label: "OKRs", path: "/okrs", permission: Some("view_okrs") },
    NavItem { label: "Time Tracking", path: "/time-tracking", permission: Some("track_time") },
    NavItem { label: "Files", path: "/files", permission: Some("manage_files") },
    NavItem { label: "Activity Log", path: "/activity", permission: Some("view_activity") },
    NavItem { label: "Notifications", path: "/notifications", permission: None },
    NavItem { label: "Settings", path: "/settings", permission: None },
    NavItem { label: "Administration", path: "/admin", permission: Some("manage_users") },
];

pub fn visible_menu(role: Role, table: &PermissionTable) -> Vec<&'static NavItem> {
    MENU.iter()
        .filter(|item| item.permission.is_none_or(|name| table.has_permission(role, name)))
        .collect()
}

pub fn can_open(role: Role, table: &PermissionTable, path: &str) -> bool {
    visible_menu(role, table).iter().any(|item| item.path == path)
}
