use super::types::Role;

const GRAVATAR_SECURE: &str = "https://secure.gravatar.com/avatar";
const GRAVATAR_PLAIN: &str = "http://www.gravatar.com/avatar";

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercase hex MD5 of the normalized email, as Gravatar expects.
pub fn avatar_hash(email: &str) -> String {
    format!("{:x}", md5::compute(normalize_email(email).as_bytes()))
}

/// Builds a Gravatar URL for an avatar hash.
pub fn gravatar_url(hash: &str, size: u32, secure: bool) -> String {
    let base = if secure {
        GRAVATAR_SECURE
    } else {
        GRAVATAR_PLAIN
    };
    format!("{base}/{hash}?s={size}&d=identicon&r=g")
}

/// Picks the role for a newly created account.
///
/// The configured administrator email gets the role holding every
/// permission bit; everyone else, or the administrator when no such role
/// exists, gets the default role.
pub fn assign_role<'a>(email: &str, admin_email: Option<&str>, roles: &'a [Role]) -> Option<&'a Role> {
    let is_admin = admin_email
        .map(|admin| normalize_email(admin) == normalize_email(email))
        .unwrap_or(false);

    if is_admin {
        if let Some(role) = roles.iter().find(|r| r.permissions.bits() == 0xff) {
            return Some(role);
        }
    }

    roles.iter().find(|r| r.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Permission;

    fn roles() -> Vec<Role> {
        Role::standard_roles()
            .iter()
            .enumerate()
            .map(|(i, r)| Role {
                id: i as i64 + 1,
                name: r.name.to_string(),
                default: r.default,
                permissions: r.permissions,
            })
            .collect()
    }

    #[test]
    fn test_avatar_hash_is_md5_of_normalized_email() {
        assert_eq!(
            avatar_hash("MyEmailAddress@example.com "),
            "0bc83cb571cd1c50ba6f3e8a78ef1346"
        );
        assert_eq!(avatar_hash("a@b.c"), avatar_hash(" A@B.C"));
    }

    #[test]
    fn test_gravatar_url_secure_and_plain() {
        assert_eq!(
            gravatar_url("abc", 100, true),
            "https://secure.gravatar.com/avatar/abc?s=100&d=identicon&r=g"
        );
        assert_eq!(
            gravatar_url("abc", 18, false),
            "http://www.gravatar.com/avatar/abc?s=18&d=identicon&r=g"
        );
    }

    #[test]
    fn test_assign_role_admin_email() {
        let roles = roles();
        let role = assign_role("Boss@Example.com", Some("boss@example.com"), &roles).unwrap();
        assert_eq!(role.name, "Administrator");
    }

    #[test]
    fn test_assign_role_default_for_others() {
        let roles = roles();
        let role = assign_role("fan@example.com", Some("boss@example.com"), &roles).unwrap();
        assert_eq!(role.name, "User");

        let role = assign_role("fan@example.com", None, &roles).unwrap();
        assert_eq!(role.name, "User");
    }

    #[test]
    fn test_assign_role_admin_falls_back_to_default() {
        let roles: Vec<Role> = roles()
            .into_iter()
            .filter(|r| r.permissions != Permission::all())
            .collect();
        let role = assign_role("boss@example.com", Some("boss@example.com"), &roles).unwrap();
        assert!(role.default);
    }

    #[test]
    fn test_assign_role_without_roles() {
        assert!(assign_role("fan@example.com", None, &[]).is_none());
    }
}
