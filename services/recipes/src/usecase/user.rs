use recipe_core::error::FieldErrors;
use recipe_domain::user::{
    MAX_USER_FIELD_LEN, UserFlags, is_password_long_enough, normalize_email,
};

use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, User, UserChanges};
use crate::error::RecipeServiceError;
use crate::usecase::password::hash_password_blocking;

pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const REQUIRED: &str = "This field is required.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const DUPLICATE_EMAIL: &str = "user with this email already exists.";

pub(crate) fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

fn validate_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", BLANK);
        return;
    }
    let valid = email
        .rsplit_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        errors.add("email", INVALID_EMAIL);
    }
    if email.chars().count() > MAX_USER_FIELD_LEN {
        errors.add("email", too_long(MAX_USER_FIELD_LEN));
    }
}

fn validate_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.add("password", BLANK);
    } else if !is_password_long_enough(password) {
        errors.add("password", "Ensure this field has at least 5 characters.");
    }
}

fn validate_name(errors: &mut FieldErrors, name: &str) {
    if name.trim().is_empty() {
        errors.add("name", BLANK);
    } else if name.chars().count() > MAX_USER_FIELD_LEN {
        errors.add("name", too_long(MAX_USER_FIELD_LEN));
    }
}

async fn ensure_email_free<R: UserRepository>(
    repo: &R,
    email: &str,
    current_user: Option<i32>,
) -> Result<(), RecipeServiceError> {
    match repo.find_by_email(email).await? {
        Some(existing) if Some(existing.id) != current_user => {
            Err(RecipeServiceError::field("email", DUPLICATE_EMAIL))
        }
        _ => Ok(()),
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipeServiceError> {
        let email = normalize_email(&input.email);
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &email);
        validate_password(&mut errors, &input.password);
        validate_name(&mut errors, &input.name);
        errors.into_result()?;

        ensure_email_free(&self.repo, &email, None).await?;
        let password_hash = hash_password_blocking(input.password).await?;
        let user = self
            .repo
            .create(&NewUser {
                email,
                name: input.name.trim().to_owned(),
                password_hash,
                flags: UserFlags::regular(),
            })
            .await?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }
}

// ── CreateSuperuser ──────────────────────────────────────────────────────────

pub struct CreateSuperuserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateSuperuserUseCase<R> {
    /// Superusers are created without a display name.
    pub async fn execute(&self, email: &str, password: &str) -> Result<User, RecipeServiceError> {
        let email = normalize_email(email);
        let mut errors = FieldErrors::new();
        validate_email(&mut errors, &email);
        validate_password(&mut errors, password);
        errors.into_result()?;

        ensure_email_free(&self.repo, &email, None).await?;
        let password_hash = hash_password_blocking(password.to_owned()).await?;
        let user = self
            .repo
            .create(&NewUser {
                email,
                name: String::new(),
                password_hash,
                flags: UserFlags::superuser(),
            })
            .await?;
        tracing::info!(user_id = user.id, "superuser created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, RecipeServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(RecipeServiceError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    /// `false` for a full update: every field must be present.
    pub partial: bool,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        input: UpdateUserInput,
    ) -> Result<User, RecipeServiceError> {
        let email = input.email.as_deref().map(normalize_email);
        let mut errors = FieldErrors::new();
        if !input.partial {
            for (field, present) in [
                ("email", email.is_some()),
                ("password", input.password.is_some()),
                ("name", input.name.is_some()),
            ] {
                if !present {
                    errors.add(field, REQUIRED);
                }
            }
        }
        if let Some(ref email) = email {
            validate_email(&mut errors, email);
        }
        if let Some(ref password) = input.password {
            validate_password(&mut errors, password);
        }
        if let Some(ref name) = input.name {
            validate_name(&mut errors, name);
        }
        errors.into_result()?;

        if let Some(ref email) = email {
            ensure_email_free(&self.repo, email, Some(user_id)).await?;
        }
        let password_hash = match input.password {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };
        let changes = UserChanges {
            email,
            name: input.name.map(|n| n.trim().to_owned()),
            password_hash,
        };
        self.repo
            .update(user_id, &changes)
            .await?
            .ok_or(RecipeServiceError::UserNotFound)
    }
}
