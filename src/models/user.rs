use crate::core::validation::{Field, Validatable, Validator};

pub const WEAK_PASSWORD_MESSAGE: &str = "Don't let dad choose the password.";

/// An account holder with an optional password
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub password: Option<String>,
}

impl User {
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }
}

impl Validatable for User {
    fn validator() -> Validator<Self> {
        Validator::new().validate(Field::Base, WEAK_PASSWORD_MESSAGE, |user: &User| {
            user.password.as_deref() == Some("1234")
        })
    }
}
