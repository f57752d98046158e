use crate::model::{Permission, RecordId, Role, RolePermission};
use crate::sync::api::{ApiError, DashboardApi};

/// Role → permission lookup.
///
/// `admin` passes every check regardless of stored rows. For other roles a
/// permission is granted only by an explicit `allowed = true` row; a missing
/// row or an unknown permission name is a denial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionTable {
    permissions: Vec<Permission>,
    grants: Vec<RolePermission>,
}

impl PermissionTable {
    pub fn new(permissions: Vec<Permission>, grants: Vec<RolePermission>) -> Self {
        Self { permissions, grants }
    }

    /// Loads the catalogue and the rows of the non-admin roles.
    pub async fn load<A>(api: &A) -> Result<Self, ApiError>
    where
        A: DashboardApi + ?Sized,
    {
        let permissions = api.list_permissions().await?;
        let mut grants = Vec::new();
        for role in [Role::ProjectManager, Role::Member] {
            grants.extend(api.role_permissions(role).await?);
        }
        Ok(Self::new(permissions, grants))
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn is_allowed(&self, role: Role, permission_id: &RecordId) -> bool {
        if role == Role::Admin {
            return true;
        }
        self.grants
            .iter()
            .any(|g| g.role == role && &g.permission_id == permission_id && g.allowed)
    }

    pub fn has_permission(&self, role: Role, name: &str) -> bool {
        if role == Role::Admin {
            return true;
        }
        self.permissions
            .iter()
            .find(|p| p.name == name)
            .is_some_and(|p| self.is_allowed(role, &p.id))
    }

    /// Toggles a row locally, inserting it when missing.
    pub fn set(&mut self, role: Role, permission_id: &RecordId, allowed: bool) {
        match self
            .grants
            .iter_mut()
            .find(|g| g.role == role && &g.permission_id == permission_id)
        {
            Some(row) => row.allowed = allowed,
            None => self.grants.push(RolePermission {
                role,
                permission_id: permission_id.clone(),
                allowed,
            }),
        }
    }

    /// One row per known permission for the admin matrix, missing rows
    /// reported as denied.
    pub fn matrix_for(&self, role: Role) -> Vec<RolePermission> {
        self.permissions
            .iter()
            .map(|p| RolePermission {
                role,
                permission_id: p.id.clone(),
                allowed: self.is_allowed(role, &p.id),
            })
            .collect()
    }
}
