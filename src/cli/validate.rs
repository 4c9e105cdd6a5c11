use anyhow::{Context, Result};
use tracing::debug;

use super::Outcome;
use crate::core::validation::{Errors, Validatable};
use crate::models::User;
use crate::symbols::*;

pub fn handle_validate(password: Option<String>, json: bool) -> Result<Outcome> {
    let user = User { password };
    let errors = user.errors();
    debug!("User validation produced {} errors", errors.len());

    if json {
        let rendered =
            serde_json::to_string_pretty(&errors).context("Failed to serialize errors")?;
        println!("{rendered}");
    } else {
        print!("{}", render_errors(&errors));
    }

    Ok(if errors.is_empty() {
        Outcome::Success
    } else {
        Outcome::Invalid
    })
}

pub fn render_errors(errors: &Errors) -> String {
    if errors.is_empty() {
        return format!("{SYMBOL_INDICATOR_SUCCESS} User is valid\n");
    }

    let mut output = format!(
        "{SYMBOL_INDICATOR_ERROR} User is invalid ({} errors)\n",
        errors.len()
    );
    for violation in errors {
        output.push_str(&format!("  {}: {}\n", violation.field, violation.message));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_validate_weak_password() {
        let outcome = handle_validate(Some("1234".to_string()), false).unwrap();

        assert_eq!(outcome, Outcome::Invalid);
    }

    #[test]
    fn test_handle_validate_good_password() {
        let outcome = handle_validate(Some("5678".to_string()), true).unwrap();

        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_render_errors() {
        let errors = User::with_password("1234").errors();

        assert_eq!(
            render_errors(&errors),
            "❌ User is invalid (1 errors)\n  base: Don't let dad choose the password.\n"
        );
        assert_eq!(
            render_errors(&User::with_password("5678").errors()),
            "✅ User is valid\n"
        );
    }
}
