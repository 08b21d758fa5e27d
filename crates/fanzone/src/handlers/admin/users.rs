use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;
use fanzone_auth::{password::hash_password_blocking, redirect_with_flash, FlashMessage};
use fanzone_core::domain::{
    assign_role, avatar_hash, normalize_email, validate_email, validate_username, NewUser, Role,
    User, UserUpdate, ValidationError,
};
use fanzone_core::pagination::{Pagination, ADMIN_PER_PAGE};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use super::{parse_optional_id, Admin, AdminForm, AdminList, AdminRow, FormField, SelectOption};
use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

const BASE: &str = "/admin/users";
const TAKEN: &str = "Email or username already in use.";

#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    role_id: Option<String>,
    #[serde(default)]
    password: String,
}

impl UserForm {
    fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            role_id: user.role_id().map(|id| id.to_string()),
            password: String::new(),
        }
    }

    fn role_id(&self) -> Option<i64> {
        parse_optional_id(self.role_id.as_deref())
    }

    /// Password may be blank on edit, where it means "keep the current one".
    fn validate(&self, roles: &[Role], password_required: bool) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_username(&self.username)?;
        if password_required && self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        if let Some(id) = self.role_id() {
            if !roles.iter().any(|role| role.id == id) {
                return Err(ValidationError::Required("A valid role"));
            }
        }
        Ok(())
    }
}

fn form_page(
    ctx: RequestContext,
    title: &str,
    action: String,
    form: &UserForm,
    roles: &[Role],
) -> AdminForm {
    let selected = form.role_id();
    let mut options = vec![SelectOption::new("", "Automatic", selected.is_none())];
    options.extend(
        roles
            .iter()
            .map(|role| SelectOption::new(role.id, role.name.clone(), selected == Some(role.id))),
    );

    AdminForm {
        ctx,
        title: title.to_string(),
        action,
        back: BASE,
        fields: vec![
            FormField::email("email", "Email", &form.email).required(),
            FormField::text("username", "Username", &form.username).required(),
            FormField::select("role_id", "Role", options),
            FormField::password("password", "Password"),
        ],
        errors: Vec::new(),
    }
}

fn rejected(page: AdminForm) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response()
}

async fn find_user(state: &AppState, id: i64) -> Result<User, AppError> {
    state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("User", id).into())
}

pub async fn list(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), ADMIN_PER_PAGE)?;
    let page = state.users.list_users(pagination).await?.ensure_in_range()?;

    Ok(HtmlTemplate(AdminList {
        ctx,
        title: "Users",
        base: BASE,
        headers: vec!["ID", "Username", "Email", "Role", "Member since"],
        pager: Pager::new(&page, BASE),
        total: page.total,
        rows: page
            .items
            .iter()
            .map(|user| AdminRow {
                id: user.id,
                cells: vec![
                    user.id.to_string(),
                    user.username.clone(),
                    user.email.clone(),
                    user.role_name().to_string(),
                    user.member_since.format("%Y-%m-%d").to_string(),
                ],
            })
            .collect(),
    }))
}

pub async fn new_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.roles.list_roles().await?;
    Ok(HtmlTemplate(form_page(
        ctx,
        "New user",
        format!("{BASE}/new"),
        &UserForm::default(),
        &roles,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let roles = state.roles.list_roles().await?;
    let action = format!("{BASE}/new");
    if let Err(e) = form.validate(&roles, true) {
        return Ok(rejected(
            form_page(ctx, "New user", action, &form, &roles).with_error(e),
        ));
    }

    let email = normalize_email(&form.email);
    let role_id = form.role_id().or_else(|| {
        assign_role(&email, state.auth.config.admin_email.as_deref(), &roles).map(|r| r.id)
    });
    let new_user = NewUser {
        avatar_hash: Some(avatar_hash(&email)),
        email,
        username: form.username.trim().to_string(),
        password_hash: hash_password_blocking(form.password.clone()).await?,
        role_id,
        member_since: Utc::now(),
    };

    let user = match state.users.create_user(&new_user).await {
        Ok(user) => user,
        Err(RepositoryError::AlreadyExists { .. }) => {
            return Ok(rejected(
                form_page(ctx, "New user", action, &form, &roles).with_error(TAKEN),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User created by admin");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("User {} created.", user.username)),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = find_user(&state, id).await?;
    let roles = state.roles.list_roles().await?;

    Ok(HtmlTemplate(form_page(
        ctx,
        &format!("Edit {}", user.username),
        format!("{BASE}/{id}/edit"),
        &UserForm::from_user(&user),
        &roles,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let user = find_user(&state, id).await?;
    let roles = state.roles.list_roles().await?;
    let title = format!("Edit {}", user.username);
    let action = format!("{BASE}/{id}/edit");
    if let Err(e) = form.validate(&roles, false) {
        return Ok(rejected(
            form_page(ctx, &title, action, &form, &roles).with_error(e),
        ));
    }

    let password_hash = if form.password.is_empty() {
        None
    } else {
        Some(hash_password_blocking(form.password.clone()).await?)
    };
    let email = normalize_email(&form.email);
    let role_id = form.role_id().or_else(|| {
        assign_role(&email, state.auth.config.admin_email.as_deref(), &roles).map(|r| r.id)
    });
    let update = UserUpdate {
        avatar_hash: Some(avatar_hash(&email)),
        email,
        username: form.username.trim().to_string(),
        role_id,
        password_hash,
    };

    let user = match state.users.update_user(id, &update).await {
        Ok(user) => user,
        Err(RepositoryError::AlreadyExists { .. }) => {
            return Ok(rejected(
                form_page(ctx, &title, action, &form, &roles).with_error(TAKEN),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, role = user.role_name(), "User updated by admin");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("User {} updated.", user.username)),
    ))
}

/// Removes the account, its comments and every session it holds.
pub async fn delete(
    State(state): State<AppState>,
    Admin(_ctx): Admin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.users.delete_user(id).await?;
    state.auth.sessions.delete_user_sessions(id).await?;
    tracing::info!(user_id = id, "User deleted by admin");

    Ok(redirect_with_flash(BASE, FlashMessage::info("User deleted.")))
}
