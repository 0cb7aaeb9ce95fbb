//! Customer master record following the SAP Business One OCRD table.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Business partner type for customers.
pub const CUSTOMER_CARD_TYPE: &str = "C";

/// Customer form as typed by the user. Empty optional inputs are dropped
/// when the record is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerDraft {
    /// RUC/DNI, sent as `LicTradNum`.
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cellular: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl CustomerDraft {
    /// `"C" + tax id`, or empty while no tax id has been entered.
    pub fn card_code(&self) -> String {
        let tax_id = self.tax_id.trim();
        if tax_id.is_empty() {
            String::new()
        } else {
            format!("{}{}", CUSTOMER_CARD_TYPE, tax_id)
        }
    }

    pub fn record(&self) -> CustomerRecord {
        CustomerRecord {
            card_code: self.card_code(),
            card_name: self.name.trim().to_string(),
            card_type: CUSTOMER_CARD_TYPE.to_string(),
            lic_trad_num: self.tax_id.trim().to_string(),
            phone1: non_empty(&self.phone),
            cellular: non_empty(&self.cellular),
            e_mail: non_empty(&self.email),
            address: non_empty(&self.address),
            u_sap_fiori: None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// OCRD customer payload. Field lengths follow the SAP B1 column sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerRecord {
    #[serde(rename = "CardCode")]
    #[validate(length(max = 15))]
    pub card_code: String,

    #[serde(rename = "CardName")]
    #[validate(length(max = 100))]
    pub card_name: String,

    #[serde(rename = "CardType")]
    pub card_type: String,

    #[serde(rename = "LicTradNum")]
    #[validate(length(max = 32))]
    pub lic_trad_num: String,

    #[serde(rename = "Phone1", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub phone1: Option<String>,

    #[serde(rename = "Cellular", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub cellular: Option<String>,

    #[serde(rename = "E_Mail", skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub e_mail: Option<String>,

    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub address: Option<String>,

    #[serde(rename = "U_SAPFiori", skip_serializing_if = "Option::is_none")]
    pub u_sap_fiori: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(tax_id: &str, name: &str) -> CustomerDraft {
        CustomerDraft {
            tax_id: tax_id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn card_code_is_derived_from_tax_id() {
        assert_eq!(draft("", "Sin documento").card_code(), "");
        assert_eq!(draft("10456789012", "Juan Perez").card_code(), "C10456789012");
    }

    #[test]
    fn identity_fields_are_trimmed() {
        let record = draft(" 20512345678 ", "  Acme SAC ").record();

        assert_eq!(record.card_code, "C20512345678");
        assert_eq!(record.lic_trad_num, "20512345678");
        assert_eq!(record.card_name, "Acme SAC");
        assert_eq!(draft("   ", "Sin documento").card_code(), "");
    }

    #[test]
    fn minimal_record_serializes_ocrd_keys_only() {
        let value = serde_json::to_value(draft("20512345678", "Acme SAC").record()).unwrap();

        assert_eq!(
            value,
            json!({
                "CardCode": "C20512345678",
                "CardName": "Acme SAC",
                "CardType": "C",
                "LicTradNum": "20512345678",
            })
        );
    }

    #[test]
    fn optional_contact_fields_are_included_when_present() {
        let mut customer = draft("20512345678", "Acme SAC");
        customer.email = " ventas@acme.pe ".to_string();
        customer.cellular = "987654321".to_string();

        let value = serde_json::to_value(customer.record()).unwrap();

        assert_eq!(value["E_Mail"], "ventas@acme.pe");
        assert_eq!(value["Cellular"], "987654321");
        assert!(value.get("Phone1").is_none());
        assert!(value.get("Address").is_none());
    }

    #[test]
    fn validation_enforces_column_sizes_and_email() {
        assert!(draft("20512345678", "Acme SAC").record().validate().is_ok());

        let too_long = draft(&"9".repeat(20), "Acme SAC").record();
        let errors = too_long.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("card_code"));

        let mut bad_email = draft("20512345678", "Acme SAC");
        bad_email.email = "no-es-correo".to_string();
        let errors = bad_email.record().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("e_mail"));
    }
}
