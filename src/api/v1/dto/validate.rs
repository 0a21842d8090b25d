/*
 * Responsibility
 * - DTO の validate() で使う field 単位のチェック
 * - エラーは全部集めてから VALIDATION_FAILED として返す (upstream は呼ばない)
 */
use crate::error::{AppError, FieldErrors};

#[derive(Debug, Default)]
pub struct Check {
    errors: FieldErrors,
}

impl Check {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.entry(field).or_insert_with(|| message.into());
        self
    }

    pub fn required(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
        self
    }

    pub fn min_chars(
        &mut self,
        field: &'static str,
        value: &str,
        min: usize,
        message: &str,
    ) -> &mut Self {
        if value.trim().chars().count() < min {
            self.fail(field, message);
        }
        self
    }

    pub fn email(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if !looks_like_email(value) {
            self.fail(field, message);
        }
        self
    }

    pub fn has_failed(&self, field: &'static str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

// Shape check only; the backend owns real address validation.
fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.contains(char::is_whitespace)
}
