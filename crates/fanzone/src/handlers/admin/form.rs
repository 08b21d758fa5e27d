//! Generic list and form pages shared by every admin model.

use askama::Template;

use crate::context::RequestContext;
use crate::handlers::views::Pager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    TextArea,
    Select,
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// One input of an admin form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub options: Vec<SelectOption>,
    pub required: bool,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            options: Vec::new(),
            required: false,
        }
    }

    pub fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(name, label, FieldKind::Text)
        }
    }

    pub fn email(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(name, label, FieldKind::Email)
        }
    }

    /// Password inputs never echo a value back.
    pub fn password(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    pub fn textarea(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::new(name, label, FieldKind::TextArea)
        }
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    pub fn multi_select(
        name: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::MultiSelect)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_textarea(&self) -> bool {
        self.kind == FieldKind::TextArea
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select | FieldKind::MultiSelect)
    }

    pub fn is_multiple(&self) -> bool {
        self.kind == FieldKind::MultiSelect
    }

    /// `type` attribute for plain inputs.
    pub fn input_type(&self) -> &'static str {
        match self.kind {
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            _ => "text",
        }
    }
}

/// A table row of an admin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    pub id: i64,
    pub cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "admin/list.html")]
pub struct AdminList {
    pub ctx: RequestContext,
    pub title: &'static str,
    /// Base path of the model, e.g. `/admin/teams`.
    pub base: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<AdminRow>,
    pub pager: Pager,
    pub total: u64,
}

#[derive(Template)]
#[template(path = "admin/form.html")]
pub struct AdminForm {
    pub ctx: RequestContext,
    pub title: String,
    pub action: String,
    pub back: &'static str,
    pub fields: Vec<FormField>,
    pub errors: Vec<String>,
}

impl AdminForm {
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.errors.push(error.to_string());
        self
    }
}

/// Parses a select value; blank means none.
pub fn parse_optional_id(value: Option<&str>) -> Option<i64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kinds() {
        assert_eq!(FormField::password("password", "Password").input_type(), "password");
        assert_eq!(FormField::email("email", "Email", "x").input_type(), "email");
        assert!(FormField::textarea("content", "Content", "").is_textarea());
        assert!(FormField::multi_select("team_ids", "Teams", vec![]).is_multiple());
        assert!(FormField::select("team_id", "Team", vec![]).is_select());
        assert!(!FormField::select("team_id", "Team", vec![]).is_multiple());
    }

    #[test]
    fn test_password_field_has_no_value() {
        assert_eq!(FormField::password("password", "Password").value, "");
    }

    #[test]
    fn test_parse_optional_id() {
        assert_eq!(parse_optional_id(Some("12")), Some(12));
        assert_eq!(parse_optional_id(Some(" ")), None);
        assert_eq!(parse_optional_id(Some("x")), None);
        assert_eq!(parse_optional_id(None), None);
    }
}
