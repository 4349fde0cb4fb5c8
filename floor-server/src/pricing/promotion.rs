//! Promotion code validation
//!
//! A promotion code is not stored anywhere. It is validated on the fly:
//!
//! 1. trim + uppercase
//! 2. exact match in the fixed code table (takes precedence)
//! 3. `CHIEN<N>` with `1 <= N <= max_percent` and no leading zero → `N / 100`
//!
//! Two policies exist because the table/bill flow and the menu preview have
//! always used different bounds (60 and 70) and different rules (the menu
//! preview never accepted fixed codes).

use rust_decimal::Decimal;

/// Prefix of the pattern-based codes
pub const PATTERN_PREFIX: &str = "CHIEN";

/// Fixed code → percent
pub const FIXED_CODES: &[(&str, u32)] = &[("GIAM10", 10), ("VIP20", 20), ("KHAIMO", 50)];

/// Default bound for table/bill promotions
pub const DEFAULT_TABLE_MAX_PERCENT: u32 = 60;

/// Default bound for the menu price preview
pub const DEFAULT_MENU_MAX_PERCENT: u32 = 70;

/// A code that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCode {
    /// Normalized (trimmed, uppercase) code
    pub code: String,
    pub percent: u32,
    /// `percent / 100`
    pub rate: Decimal,
}

/// Validation rules for one call site
#[derive(Debug, Clone)]
pub struct PromotionEngine {
    fixed_codes: bool,
    max_percent: u32,
}

impl PromotionEngine {
    /// Fixed codes plus `CHIEN<N>` up to `max_percent` (table and bulk apply)
    pub fn for_tables(max_percent: u32) -> Self {
        Self {
            fixed_codes: true,
            max_percent: max_percent.min(100),
        }
    }

    /// `CHIEN<N>` only, up to `max_percent` (menu price preview)
    pub fn for_menu(max_percent: u32) -> Self {
        Self {
            fixed_codes: false,
            max_percent: max_percent.min(100),
        }
    }

    pub fn max_percent(&self) -> u32 {
        self.max_percent
    }

    /// Validate a code, returning its discount rate
    ///
    /// `None` means invalid; callers must not treat it as a zero discount.
    pub fn validate(&self, code: &str) -> Option<Decimal> {
        self.validate_detailed(code).map(|v| v.rate)
    }

    pub fn validate_detailed(&self, code: &str) -> Option<ValidatedCode> {
        let code = normalize(code);
        let percent = self.percent_for(&code)?;
        Some(ValidatedCode {
            rate: Decimal::new(i64::from(percent), 2),
            code,
            percent,
        })
    }

    fn percent_for(&self, code: &str) -> Option<u32> {
        if self.fixed_codes
            && let Some((_, percent)) = FIXED_CODES.iter().find(|(c, _)| *c == code)
        {
            return Some(*percent);
        }

        let digits = code.strip_prefix(PATTERN_PREFIX)?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let n: u32 = digits.parse().ok()?;
        (1..=self.max_percent).contains(&n).then_some(n)
    }
}

/// Trim and uppercase
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}
