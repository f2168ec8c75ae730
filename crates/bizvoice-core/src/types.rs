//! # Domain Types
//!
//! Core domain types used throughout Bizvoice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │     Invoice     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  username       │   │  name           │   │  invoice_number │       │
//! │  │  role           │   │  price_cents    │   │  customer       │       │
//! │  │  profile ───────┼───┼─────────────────┼──►│  profile (copy) │       │
//! │  └─────────────────┘   └────────┬────────┘   │  items[]        │       │
//! │                                 │            │  total_cents    │       │
//! │                        ┌────────┴────────┐   └─────────────────┘       │
//! │                        │  PriceHistory   │                              │
//! │                        │  old → new      │   ┌─────────────────┐       │
//! │                        │  changed_by     │   │  InvoiceStatus  │       │
//! │                        └─────────────────┘   │  draft / sent   │       │
//! │                                              │  paid / overdue │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Embedded Values
//! `BusinessProfile`, `Customer`, `BankDetails` and `InvoiceItem` have no
//! identity of their own. They are stored inside their owner (as JSON
//! columns) and copied by value, so editing a profile later never changes
//! invoices that were already issued.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (standard GST slab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 100%, the highest rate an invoice may carry.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Half the nominal rate as a percentage, used for the CGST/SGST lines.
    #[inline]
    pub fn half_percentage(&self) -> f64 {
        self.0 as f64 / 200.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// May create other accounts.
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// A stored account. The password hash is deliberately not a field here;
/// it lives only in the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Login name, unique.
    pub username: String,
    /// Contact email, unique.
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    /// Inactive accounts can neither log in nor use existing tokens.
    pub is_active: bool,
    /// Issuer details printed on this user's invoices.
    pub business_profile: Option<BusinessProfile>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The stored profile, or the default one for users that never set it.
    pub fn profile_or_default(&self) -> BusinessProfile {
        self.business_profile.clone().unwrap_or_default()
    }
}

/// Input for creating an account.
#[derive(Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

// =============================================================================
// Business Profile
// =============================================================================

/// Legal, contact and banking details of the invoice issuer.
///
/// Only `company_name` is mandatory. Every other field is printed on the
/// invoice when present and skipped otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BusinessProfile {
    pub company_name: String,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Two-digit GST state code, e.g. "27" for Maharashtra.
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub account_holder: Option<String>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        BusinessProfile {
            company_name: "My Business".to_string(),
            gst_number: None,
            pan_number: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            state_code: None,
            pincode: None,
            country: Some("India".to_string()),
            phone: None,
            email: None,
            website: None,
            bank_name: None,
            account_number: None,
            ifsc_code: None,
            account_holder: None,
        }
    }
}

impl BusinessProfile {
    /// Bank details from the profile, if at least one banking field is set.
    pub fn bank_details(&self) -> Option<BankDetails> {
        if self.bank_name.is_none()
            && self.account_number.is_none()
            && self.ifsc_code.is_none()
            && self.account_holder.is_none()
        {
            return None;
        }

        Some(BankDetails {
            bank_name: self.bank_name.clone().unwrap_or_default(),
            account_number: self.account_number.clone().unwrap_or_default(),
            ifsc_code: self.ifsc_code.clone().unwrap_or_default(),
            account_holder: self.account_holder.clone().unwrap_or_default(),
        })
    }
}

/// Where the customer should pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder: String,
}

// =============================================================================
// Products
// =============================================================================

/// A catalog entry that can be picked into invoice lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in paise (smallest currency unit).
    pub current_price_cents: i64,
    /// Unit label shown next to quantities ("pcs", "hrs", "kg").
    pub unit: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.current_price_cents)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub current_price_cents: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    crate::DEFAULT_UNIT.to_string()
}

/// Partial product update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_price_cents: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl ProductUpdate {
    /// Applies the present fields to `product`.
    ///
    /// Returns the previous price when the price actually changed, which is
    /// the signal to append a price-history record.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) -> Option<i64> {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(unit) = &self.unit {
            product.unit = unit.clone();
        }
        product.updated_at = now;

        match self.current_price_cents {
            Some(price) if price != product.current_price_cents => {
                let old = product.current_price_cents;
                product.current_price_cents = price;
                Some(old)
            }
            _ => None,
        }
    }
}

/// Compact search hit used by the invoice editor's product picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub current_price_cents: i64,
    /// Empty string when the product has no description.
    pub description: String,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        ProductSummary {
            id: product.id,
            name: product.name,
            current_price_cents: product.current_price_cents,
            description: product.description.unwrap_or_default(),
        }
    }
}

/// One price change of a product. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PriceHistory {
    pub id: String,
    pub product_id: String,
    pub old_price_cents: i64,
    pub new_price_cents: i64,
    /// Username of whoever made the change.
    pub changed_by: String,
    #[ts(as = "String")]
    pub changed_at: DateTime<Utc>,
}

// =============================================================================
// Invoices
// =============================================================================

/// The billed party, embedded in the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    /// Customer's GSTIN, printed on the bill-to block when present.
    #[serde(default)]
    pub gst_number: Option<String>,
}

/// A line on an invoice.
///
/// Uses the snapshot pattern: name and rate are frozen at invoicing time,
/// so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceItem {
    pub product_id: String,
    /// Product name at time of invoicing (frozen).
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Fractional quantities are allowed (hours, kilograms).
    pub quantity: f64,
    /// Unit rate in paise.
    pub rate_cents: i64,
    /// Line amount in paise as supplied by the client.
    pub amount_cents: i64,
}

impl InvoiceItem {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// What the amount would be if it were exactly quantity × rate.
    #[inline]
    pub fn expected_amount(&self) -> Money {
        self.rate().multiply_quantity(self.quantity)
    }
}

/// Lifecycle label of an invoice.
///
/// There is no enforced state machine; any status may be set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// A persisted invoice.
///
/// After creation only `status` and `updated_at` ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Human-facing sequential number, e.g. "INV-0001".
    pub invoice_number: String,
    pub customer: Customer,
    pub items: Vec<InvoiceItem>,
    pub subtotal_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub bank_details: Option<BankDetails>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,
    /// Username of the creator.
    pub created_by: String,
    /// Issuer details as they were when the invoice was created.
    pub business_profile: Option<BusinessProfile>,
    #[ts(as = "String")]
    pub invoice_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Bank details to print: the invoice's own, else the profile's.
    pub fn effective_bank_details(&self) -> Option<BankDetails> {
        self.bank_details.clone().or_else(|| {
            self.business_profile
                .as_ref()
                .and_then(BusinessProfile::bank_details)
        })
    }
}

/// Client input for creating an invoice.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    pub customer: Customer,
    pub items: Vec<InvoiceItem>,
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
}

fn default_tax_rate_bps() -> u32 {
    crate::DEFAULT_TAX_RATE_BPS
}

// =============================================================================
// Reporting
// =============================================================================

/// Revenue ranking entry, grouped by product name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub name: String,
    pub quantity: f64,
    pub amount_cents: i64,
}

/// Aggregates shown on the dashboard. Computed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_invoices: i64,
    pub total_revenue_cents: i64,
    /// Revenue since the first instant of the current month (UTC).
    pub monthly_revenue_cents: i64,
    pub top_products: Vec<TopProduct>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            description: None,
            current_price_cents: 10000,
            unit: "pcs".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
        assert!((rate.half_percentage() - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_default_is_gst() {
        assert_eq!(TaxRate::default().bps(), 1800);
        assert_eq!(TaxRate::from_percentage(12.5).bps(), 1250);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("paid".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Paid);
        assert_eq!("SENT".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Sent);
        assert!("cancelled".parse::<InvoiceStatus>().is_err());
        assert_eq!(InvoiceStatus::Overdue.to_string(), "overdue");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
    }

    #[test]
    fn test_update_price_change_reports_old_price() {
        let mut product = widget();
        let update = ProductUpdate {
            current_price_cents: Some(15000),
            ..Default::default()
        };
        assert_eq!(update.apply(&mut product, Utc::now()), Some(10000));
        assert_eq!(product.current_price_cents, 15000);
    }

    #[test]
    fn test_update_same_price_is_not_a_change() {
        let mut product = widget();
        let update = ProductUpdate {
            name: Some("Gadget".to_string()),
            current_price_cents: Some(10000),
            ..Default::default()
        };
        assert_eq!(update.apply(&mut product, Utc::now()), None);
        assert_eq!(product.name, "Gadget");
    }

    #[test]
    fn test_summary_fills_missing_description() {
        let summary = ProductSummary::from(widget());
        assert_eq!(summary.description, "");
    }

    #[test]
    fn test_profile_bank_details_only_when_set() {
        let mut profile = BusinessProfile::default();
        assert!(profile.bank_details().is_none());

        profile.bank_name = Some("State Bank".to_string());
        profile.ifsc_code = Some("SBIN0000001".to_string());
        let bank = profile.bank_details().unwrap();
        assert_eq!(bank.bank_name, "State Bank");
        assert_eq!(bank.account_number, "");
    }

    #[test]
    fn test_draft_defaults() {
        let draft: InvoiceDraft = serde_json::from_str(
            r#"{"customer":{"name":"Acme"},"items":[]}"#,
        )
        .unwrap();
        assert_eq!(draft.tax_rate_bps, 1800);
        assert!(draft.bank_details.is_none());
    }

    #[test]
    fn test_new_user_debug_hides_password() {
        let user = NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: "Alice".to_string(),
            role: UserRole::User,
        };
        assert!(!format!("{:?}", user).contains("hunter22"));
    }
}
