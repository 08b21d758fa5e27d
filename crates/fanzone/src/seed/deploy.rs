use fanzone_core::domain::Role;
use fanzone_core::storage::{RoleRepository, Result};

/// Creates the standard roles, or resets them to their standard permissions.
///
/// Idempotent; runs on every `deploy` and before an import.
pub async fn insert_roles(roles: &dyn RoleRepository) -> Result<Vec<Role>> {
    let mut created = Vec::new();
    for standard in Role::standard_roles() {
        let role = roles
            .upsert_role(standard.name, standard.permissions, standard.default)
            .await?;
        tracing::debug!(role = %role.name, permissions = role.permissions.bits(), "Role ready");
        created.push(role);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteRepository;
    use fanzone_core::domain::Permission;

    #[tokio::test]
    async fn test_insert_roles_is_idempotent() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        insert_roles(&repo).await.unwrap();
        repo.upsert_role("User", Permission::empty(), false)
            .await
            .unwrap();
        let roles = insert_roles(&repo).await.unwrap();

        assert_eq!(repo.list_roles().await.unwrap().len(), 3);
        let user = roles.iter().find(|r| r.name == "User").unwrap();
        assert!(user.default);
        assert_eq!(
            user.permissions,
            Permission::COMMENT | Permission::WRITE_ARTICLES
        );
        let admin = roles.iter().find(|r| r.name == "Administrator").unwrap();
        assert_eq!(admin.permissions, Permission::all());
    }
}
