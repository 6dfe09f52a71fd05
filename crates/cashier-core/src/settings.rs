//! Store profile and register-wide settings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::Currency;
use crate::types::TaxRate;
use crate::{DEFAULT_INVOICE_FOOTER, DEFAULT_STORE_NAME};

/// UI language. Only the label matters to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Ar => Language::En,
            Language::En => Language::Ar,
        }
    }
}

/// What appears on the receipt header and footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreProfile {
    pub name: String,
    /// Logo image reference (URL or data URI).
    pub logo: Option<String>,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub invoice_footer: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        StoreProfile {
            name: DEFAULT_STORE_NAME.to_string(),
            logo: None,
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            invoice_footer: DEFAULT_INVOICE_FOOTER.to_string(),
        }
    }
}

/// One field of the store profile, for the individual setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Logo,
    Address,
    Phone,
    Email,
    InvoiceFooter,
}

impl StoreProfile {
    /// Sets one field. A blank logo clears it.
    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::Logo => {
                self.logo = Some(value).filter(|v| !v.trim().is_empty());
            }
            ProfileField::Address => self.address = value,
            ProfileField::Phone => self.phone = value,
            ProfileField::Email => self.email = value,
            ProfileField::InvoiceFooter => self.invoice_footer = value,
        }
    }
}

/// Register-wide settings, persisted as one record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub store: StoreProfile,
    pub tax_rate: TaxRate,
    pub currency: Currency,
    pub language: Language,
}
