use plaza_types::{SignInRequest, SignUpRequest};

/// Registration input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub demo_user: bool,
}

impl SignUpForm {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::FirstName(value) => self.first_name = value,
            FieldUpdate::LastName(value) => self.last_name = value,
            FieldUpdate::Email(value) => self.email = value,
            FieldUpdate::Password(value) => self.password = value,
            FieldUpdate::ConfirmPassword(value) => self.confirm_password = value,
            FieldUpdate::DemoUser(value) => self.demo_user = value,
        }
    }

    /// Current value of a text field; `None` for the demo checkbox
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::FirstName => Some(&self.first_name),
            FormField::LastName => Some(&self.last_name),
            FormField::Email => Some(&self.email),
            FormField::Password => Some(&self.password),
            FormField::ConfirmPassword => Some(&self.confirm_password),
            FormField::DemoUser => None,
        }
    }

    /// Payload for the account-creation endpoint (confirmation is not sent)
    pub fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            demo_user: self.demo_user,
        }
    }

    pub fn credentials(&self) -> SignInRequest {
        SignInRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    DemoUser,
}

impl FormField {
    /// Fields in display order
    pub const ALL: [FormField; 6] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Password,
        FormField::ConfirmPassword,
        FormField::DemoUser,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::ConfirmPassword => "confirmPassword",
            FormField::DemoUser => "demo_user",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::Email => "Email Address",
            FormField::Password => "Password",
            FormField::ConfirmPassword => "Confirm Password",
            FormField::DemoUser => "Create as Demo User",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "firstName" => Some(FormField::FirstName),
            "lastName" => Some(FormField::LastName),
            "email" => Some(FormField::Email),
            "password" => Some(FormField::Password),
            "confirmPassword" => Some(FormField::ConfirmPassword),
            "demo_user" | "demoUser" => Some(FormField::DemoUser),
            _ => None,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FormField::Password | FormField::ConfirmPassword)
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A single edit to the form. The demo flag carries a bool, every other
/// field a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    Password(String),
    ConfirmPassword(String),
    DemoUser(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> FormField {
        match self {
            FieldUpdate::FirstName(_) => FormField::FirstName,
            FieldUpdate::LastName(_) => FormField::LastName,
            FieldUpdate::Email(_) => FormField::Email,
            FieldUpdate::Password(_) => FormField::Password,
            FieldUpdate::ConfirmPassword(_) => FormField::ConfirmPassword,
            FieldUpdate::DemoUser(_) => FormField::DemoUser,
        }
    }

    /// Build a text update; `None` for the demo checkbox, which is not text
    pub fn text(field: FormField, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        match field {
            FormField::FirstName => Some(FieldUpdate::FirstName(value)),
            FormField::LastName => Some(FieldUpdate::LastName(value)),
            FormField::Email => Some(FieldUpdate::Email(value)),
            FormField::Password => Some(FieldUpdate::Password(value)),
            FormField::ConfirmPassword => Some(FieldUpdate::ConfirmPassword(value)),
            FormField::DemoUser => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_wire_names() {
        for field in FormField::ALL {
            assert_eq!(FormField::parse(field.as_str()), Some(field));
        }
        assert_eq!(FormField::parse("demoUser"), Some(FormField::DemoUser));
        assert_eq!(FormField::parse("username"), None);
    }

    #[test]
    fn test_focus_cycles_through_all_fields() {
        assert_eq!(FormField::DemoUser.next(), FormField::FirstName);
        assert_eq!(FormField::FirstName.previous(), FormField::DemoUser);
        assert_eq!(FormField::Email.next(), FormField::Password);
    }

    #[test]
    fn test_text_update_rejects_checkbox() {
        assert_eq!(FieldUpdate::text(FormField::DemoUser, "true"), None);
        assert_eq!(
            FieldUpdate::text(FormField::Email, "a@b.co"),
            Some(FieldUpdate::Email("a@b.co".to_string()))
        );
    }

    #[test]
    fn test_request_omits_confirmation() {
        let mut form = SignUpForm::default();
        form.apply(FieldUpdate::Email("a@b.co".to_string()));
        form.apply(FieldUpdate::Password("secret-pw".to_string()));
        form.apply(FieldUpdate::ConfirmPassword("other".to_string()));
        form.apply(FieldUpdate::DemoUser(true));

        let request = form.to_request();
        assert_eq!(request.email, "a@b.co");
        assert_eq!(request.password, "secret-pw");
        assert!(request.demo_user);

        let credentials = form.credentials();
        assert_eq!(credentials.email, "a@b.co");
        assert_eq!(credentials.password, "secret-pw");
    }
}
