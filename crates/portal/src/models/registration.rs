//! Public registration form and status lookup.

use serde::Deserialize;
use uuid::Uuid;

use esep_core::{CategoryId, Fee, PanchayathId, PhoneNumber, RegistrationStatus};

use super::{ValidationError, optional_text};

/// Prefix of every customer id.
pub const CUSTOMER_ID_PREFIX: &str = "ESEP-";

/// A fresh customer id: `ESEP-` followed by eight upper-case hex digits.
#[must_use]
pub fn generate_customer_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{CUSTOMER_ID_PREFIX}{}", hex.get(..8).unwrap_or(&hex))
}

/// Raw form fields from `POST /register/{category_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub agent_pro: Option<String>,
    #[serde(default)]
    pub panchayath_id: String,
}

/// A validated registration ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub full_name: String,
    pub phone: PhoneNumber,
    pub mobile_number: Option<PhoneNumber>,
    pub email: Option<String>,
    pub address: String,
    pub ward: Option<String>,
    pub agent_pro: Option<String>,
    pub category_id: CategoryId,
    pub panchayath_id: PanchayathId,
    pub fee_paid: Fee,
}

impl RegistrationForm {
    /// Check the form for `category_id`, charging `offer_fee`.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequired` when the name, phone, address or panchayath
    /// is blank, and `Invalid` for a malformed phone, mobile number, email or
    /// panchayath id.
    pub fn validate(
        &self,
        category_id: CategoryId,
        offer_fee: Fee,
    ) -> Result<NewRegistration, ValidationError> {
        let full_name = self.full_name.trim();
        let phone = self.phone.trim();
        let address = self.address.trim();
        let panchayath = self.panchayath_id.trim();
        if full_name.is_empty() || phone.is_empty() || address.is_empty() || panchayath.is_empty()
        {
            return Err(ValidationError::MissingRequired);
        }

        let phone = PhoneNumber::parse(phone).map_err(|e| ValidationError::invalid("Phone", e))?;
        let mobile_number = optional_text(self.mobile_number.as_deref())
            .map(|raw| {
                PhoneNumber::parse(&raw).map_err(|e| ValidationError::invalid("Mobile number", e))
            })
            .transpose()?;

        let email = optional_text(self.email.as_deref());
        if let Some(email) = &email
            && !looks_like_email(email)
        {
            return Err(ValidationError::invalid("Email", "enter a valid email address"));
        }

        let panchayath_id = panchayath
            .parse::<PanchayathId>()
            .map_err(|_| ValidationError::invalid("Panchayath", "choose a panchayath from the list"))?;

        Ok(NewRegistration {
            full_name: full_name.to_string(),
            phone,
            mobile_number,
            email,
            address: address.to_string(),
            ward: optional_text(self.ward.as_deref()),
            agent_pro: optional_text(self.agent_pro.as_deref()),
            category_id,
            panchayath_id,
            fee_paid: offer_fee,
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    })
}

/// Query string of `GET /status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl StatusQuery {
    /// The normalised `(customer_id, phone)` pair, once both are filled in.
    ///
    /// Customer ids are matched case-insensitively; an unparseable phone
    /// yields `None` so the lookup reports "not found" rather than an error.
    #[must_use]
    pub fn lookup_key(&self) -> Option<(String, PhoneNumber)> {
        let customer_id = optional_text(self.customer_id.as_deref())?.to_uppercase();
        let phone = PhoneNumber::parse(&optional_text(self.phone.as_deref())?).ok()?;
        Some((customer_id, phone))
    }

    /// Whether the visitor submitted anything yet.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.customer_id.is_some() || self.phone.is_some()
    }
}

/// What a status lookup reveals about a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationStatusView {
    pub customer_id: String,
    pub full_name: String,
    pub status: RegistrationStatus,
    pub category_name: String,
    pub panchayath_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            full_name: "  Anitha K ".to_string(),
            phone: "98765 43210".to_string(),
            mobile_number: Some(String::new()),
            email: Some("anitha@example.com".to_string()),
            address: "Ward 4, Kadakkal".to_string(),
            ward: Some("4".to_string()),
            agent_pro: None,
            panchayath_id: Uuid::new_v4().to_string(),
        }
    }

    fn category() -> CategoryId {
        CategoryId::new(Uuid::new_v4())
    }

    #[test]
    fn test_customer_id_format() {
        let id = generate_customer_id();
        assert!(id.starts_with("ESEP-"));
        let suffix = id.strip_prefix("ESEP-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_valid_form() {
        let fee = Fee::parse("250").unwrap();
        let reg = form().validate(category(), fee).unwrap();
        assert_eq!(reg.full_name, "Anitha K");
        assert_eq!(reg.phone.as_str(), "9876543210");
        assert_eq!(reg.mobile_number, None);
        assert_eq!(reg.ward.as_deref(), Some("4"));
        assert_eq!(reg.fee_paid, fee);
    }

    #[test]
    fn test_missing_required() {
        let mut f = form();
        f.address = "   ".to_string();
        assert_eq!(
            f.validate(category(), Fee::parse("0").unwrap()),
            Err(ValidationError::MissingRequired)
        );
    }

    #[test]
    fn test_bad_phone_and_email() {
        let mut f = form();
        f.phone = "12345".to_string();
        assert!(matches!(
            f.validate(category(), Fee::parse("0").unwrap()),
            Err(ValidationError::Invalid { field: "Phone", .. })
        ));

        let mut f = form();
        f.email = Some("not-an-email".to_string());
        assert!(matches!(
            f.validate(category(), Fee::parse("0").unwrap()),
            Err(ValidationError::Invalid { field: "Email", .. })
        ));
    }

    #[test]
    fn test_bad_panchayath() {
        let mut f = form();
        f.panchayath_id = "kadakkal".to_string();
        assert!(matches!(
            f.validate(category(), Fee::parse("0").unwrap()),
            Err(ValidationError::Invalid { field: "Panchayath", .. })
        ));
    }

    #[test]
    fn test_status_query_key() {
        let q = StatusQuery {
            customer_id: Some(" esep-1a2b3c4d ".to_string()),
            phone: Some("+91 98765-43210".to_string()),
        };
        let (id, phone) = q.lookup_key().unwrap();
        assert_eq!(id, "ESEP-1A2B3C4D");
        assert_eq!(phone.as_str(), "9876543210");
        assert!(q.is_submitted());

        let empty = StatusQuery::default();
        assert!(empty.lookup_key().is_none());
        assert!(!empty.is_submitted());
    }
}
