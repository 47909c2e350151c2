use crate::shared::{DomainResult, Violations};

/// Self-service profile edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub bio: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    /// Pre-uploaded avatar reference
    pub avatar: Option<String>,
}

impl UpdateProfileDto {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.user_name.is_none()
            && self.bio.is_none()
            && self.phone_number.is_none()
            && self.city.is_none()
            && self.avatar.is_none()
    }

    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Violations::new();

        if let Some(first_name) = &self.first_name {
            v.check(!first_name.trim().is_empty(), "First name cannot be empty");
            v.check(
                first_name.chars().count() <= 50,
                "First name cannot exceed 50 characters",
            );
        }
        if let Some(last_name) = &self.last_name {
            v.check(!last_name.trim().is_empty(), "Last name cannot be empty");
            v.check(
                last_name.chars().count() <= 50,
                "Last name cannot exceed 50 characters",
            );
        }
        if let Some(user_name) = &self.user_name {
            let len = user_name.chars().count();
            v.check(
                (3..=30).contains(&len),
                "Username must be between 3 and 30 characters",
            );
        }
        if let Some(bio) = &self.bio {
            v.check(bio.chars().count() <= 500, "Bio cannot exceed 500 characters");
        }
        if let Some(phone) = &self.phone_number {
            v.check(
                !phone.is_empty()
                    && phone
                        .chars()
                        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')')),
                "Phone number may only contain digits, spaces and + - ( )",
            );
        }
        if let Some(city) = &self.city {
            v.check(city.chars().count() <= 100, "City cannot exceed 100 characters");
        }
        if let Some(avatar) = &self.avatar {
            v.check(!avatar.trim().is_empty(), "Avatar URL cannot be empty");
        }

        v.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DomainError;

    #[test]
    fn reports_every_bad_field() {
        let dto = UpdateProfileDto {
            user_name: Some("ab".into()),
            phone_number: Some("call me".into()),
            city: Some("x".repeat(101)),
            ..Default::default()
        };
        match dto.validate() {
            Err(DomainError::ValidationFailed(msgs)) => assert_eq!(msgs.len(), 3),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn accepts_well_formed_patch() {
        let dto = UpdateProfileDto {
            user_name: Some("seller_01".into()),
            phone_number: Some("+1 (555) 010-2030".into()),
            bio: Some("Vintage furniture".into()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
        assert!(!dto.is_empty());
        assert!(UpdateProfileDto::default().is_empty());
    }
}
