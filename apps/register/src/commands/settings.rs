//! # Settings Commands
//!
//! Currency, tax, store profile, language, the signed-in user and the
//! hydration status of each stored record.

use cashier_core::{Collection, Currency, Language, ProfileField, StoreProfile, TaxRate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::external::{IdentityProvider, UserIdentity};
use crate::state::{CollectionPhase, SessionState};

/// One entry of the currency picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyOption {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

impl From<Currency> for CurrencyOption {
    fn from(currency: Currency) -> Self {
        CurrencyOption {
            code: currency.code(),
            symbol: currency.symbol(),
            name: currency.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub store: StoreProfile,
    /// e.g. `15.00`
    pub tax_percent: Decimal,
    pub currency: CurrencyOption,
    pub currencies: Vec<CurrencyOption>,
    pub language: Language,
}

/// Where each stored record is in its load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub ready: bool,
    pub collections: Vec<(Collection, CollectionPhase)>,
}

pub fn get_settings(state: &SessionState) -> SettingsResponse {
    debug!("get_settings command");
    state.with_engine(|e| {
        let settings = e.settings();
        SettingsResponse {
            store: settings.store.clone(),
            tax_percent: settings.tax_rate.percentage(),
            currency: settings.currency.into(),
            currencies: Currency::ALL.into_iter().map(CurrencyOption::from).collect(),
            language: settings.language,
        }
    })
}

/// Switches the display currency. Stored prices do not change.
pub fn set_currency(state: &SessionState, code: String) -> Result<SettingsResponse, ApiError> {
    debug!(code = %code, "set_currency command");
    let currency: Currency = code.parse().map_err(cashier_core::CoreError::from)?;
    state.with_engine_mut(|e| e.set_currency(currency));
    info!(currency = %currency, "Display currency changed");
    Ok(get_settings(state))
}

/// Sets the tax rate from a percentage such as `15` or `8.25`.
///
/// Open table totals are recomputed at the new rate.
pub fn set_tax_rate(state: &SessionState, percent: Decimal) -> Result<SettingsResponse, ApiError> {
    debug!(percent = %percent, "set_tax_rate command");
    let rate = TaxRate::from_percent(percent).ok_or_else(|| {
        ApiError::validation(format!(
            "tax rate must be a non-negative percentage with at most two decimals, got {percent}"
        ))
    })?;
    state.with_engine_mut(|e| e.set_tax_rate(rate))?;
    info!(bps = rate.bps(), "Tax rate changed");
    Ok(get_settings(state))
}

pub fn set_store_field(
    state: &SessionState,
    field: ProfileField,
    value: String,
) -> SettingsResponse {
    debug!(field = ?field, "set_store_field command");
    state.with_engine_mut(|e| e.set_store_field(field, value));
    get_settings(state)
}

pub fn toggle_language(state: &SessionState) -> Language {
    debug!("toggle_language command");
    state.with_engine_mut(|e| {
        e.toggle_language();
        e.settings().language
    })
}

pub fn current_user(identity: &dyn IdentityProvider) -> Option<UserIdentity> {
    identity.current_user()
}

pub fn session_status(state: &SessionState) -> SessionStatus {
    state.with_session(|s| SessionStatus {
        ready: s.lifecycle().all_loaded(),
        collections: s.lifecycle().phases(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::external::StaticIdentity;
    use crate::state::Session;
    use cashier_core::{Money, ProductDraft, Settings, TableDraft};

    fn state() -> SessionState {
        SessionState::new(Session::new(Settings::default(), None))
    }

    #[test]
    fn test_currency_switch() {
        let state = state();
        let settings = set_currency(&state, "usd".to_string()).unwrap();
        assert_eq!(settings.currency.code, "USD");
        assert_eq!(settings.currencies.len(), 3);

        let err = set_currency(&state, "EUR".to_string()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_settings(&state).currency.code, "USD");
    }

    #[test]
    fn test_tax_rate_refreshes_table_totals() {
        let state = state();
        state
            .with_engine_mut(|e| {
                let tea = e.add_product(&ProductDraft {
                    name: "Tea".to_string(),
                    category: "Drinks".to_string(),
                    price: Money::from_major(10),
                    quantity: 3,
                    image: None,
                })?;
                let table = e.add_table(&TableDraft {
                    name: "T1".to_string(),
                    seats: 4,
                })?;
                e.select_table(table.id)?;
                e.add_to_cart(tea.id)
            })
            .unwrap();

        let settings = set_tax_rate(&state, Decimal::new(825, 2)).unwrap();
        assert_eq!(settings.tax_percent, Decimal::new(825, 2));

        let total = state.with_engine(|e| e.tables()[0].total);
        assert_eq!(total.to_string(), "10.83");

        let err = set_tax_rate(&state, Decimal::new(-1, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_store_profile_and_language() {
        let state = state();
        let settings = set_store_field(&state, ProfileField::Name, "Qahwa House".to_string());
        assert_eq!(settings.store.name, "Qahwa House");

        assert_eq!(toggle_language(&state), Language::En);
        assert_eq!(toggle_language(&state), Language::Ar);
    }

    #[test]
    fn test_identity_and_status() {
        let identity = StaticIdentity::new(Some(UserIdentity {
            display_name: "Salem".to_string(),
            email: None,
        }));
        assert_eq!(current_user(&identity).unwrap().display_name, "Salem");
        assert!(current_user(&StaticIdentity::default()).is_none());

        let status = session_status(&state());
        assert!(!status.ready);
        assert_eq!(status.collections.len(), Collection::ALL.len());
    }
}
