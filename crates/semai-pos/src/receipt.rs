//! # Receipt
//!
//! The receipt-shaped summary a successful checkout hands back: everything
//! the struk modal shows, plus the plain-text nota used for printing and
//! WhatsApp sharing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use semai_core::{Money, PaymentMethod, PriceMode, StoreSettings};

// =============================================================================
// Receipt
// =============================================================================

/// One line on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_rp: i64,
    pub subtotal_rp: i64,
}

/// The summary returned by a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: String,
    pub issued_at: DateTime<Utc>,
    pub price_mode: PriceMode,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_rp: i64,
    pub discount_rp: i64,
    pub total_rp: i64,
    pub payment_method: PaymentMethod,
    pub cash_received_rp: i64,
    /// Zero for non-cash methods.
    pub change_rp: i64,
}

impl Receipt {
    /// Short id shown on the nota header ("Nota #a1b2c3d4").
    pub fn short_id(&self) -> &str {
        &self.sale_id[..self.sale_id.len().min(8)]
    }

    /// Renders the plain-text nota, headed with the store identity.
    ///
    /// Customer-facing labels stay Indonesian; this is the exact text that
    /// goes to the thermal printer or a WhatsApp message.
    pub fn render_text(&self, store: &StoreSettings) -> String {
        let mut out = String::new();

        out.push_str(&format!("*NOTA {}*\n", store.store_name.to_uppercase()));
        if !store.address.is_empty() {
            out.push_str(&store.address);
            out.push('\n');
        }
        if !store.phone.is_empty() {
            out.push_str(&format!("WA: {}\n", store.phone));
        }

        out.push_str(&format!(
            "Nota #{}  {}\n",
            self.short_id(),
            self.issued_at.format("%d-%m-%Y %H:%M")
        ));
        out.push_str("--------------------------\n");

        for line in &self.lines {
            out.push_str(&format!("{}\n", line.name));
            out.push_str(&format!(
                "  {}x @ {} = {}\n",
                line.quantity,
                Money::from_rupiah(line.unit_price_rp),
                Money::from_rupiah(line.subtotal_rp)
            ));
        }

        out.push_str("--------------------------\n");
        out.push_str(&format!(
            "Subtotal: {}\n",
            Money::from_rupiah(self.subtotal_rp)
        ));
        if self.discount_rp > 0 {
            out.push_str(&format!(
                "Diskon: -{}\n",
                Money::from_rupiah(self.discount_rp)
            ));
        }
        out.push_str(&format!("*Total: {}*\n", Money::from_rupiah(self.total_rp)));
        out.push_str(&format!("Metode: {}\n", method_label(self.payment_method)));

        if self.payment_method == PaymentMethod::Cash {
            out.push_str(&format!(
                "Tunai: {}\n",
                Money::from_rupiah(self.cash_received_rp)
            ));
            out.push_str(&format!(
                "Kembalian: {}\n",
                Money::from_rupiah(self.change_rp)
            ));
        }

        out.push_str("\nTerima kasih sudah belanja!\n");
        out
    }
}

/// Uppercase label for the payment method line.
fn method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "CASH",
        PaymentMethod::Qris => "QRIS",
        PaymentMethod::Transfer => "TRANSFER",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> Receipt {
        Receipt {
            sale_id: "a1b2c3d4-0000-0000-0000-000000000000".to_string(),
            issued_at: Utc::now(),
            price_mode: PriceMode::Standard,
            lines: vec![ReceiptLine {
                name: "Aglonema Suksom".to_string(),
                quantity: 2,
                unit_price_rp: 55_000,
                subtotal_rp: 110_000,
            }],
            subtotal_rp: 110_000,
            discount_rp: 11_000,
            total_rp: 99_000,
            payment_method: PaymentMethod::Cash,
            cash_received_rp: 100_000,
            change_rp: 1_000,
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(receipt().short_id(), "a1b2c3d4");
    }

    #[test]
    fn test_nota_contains_totals_and_change() {
        let store = StoreSettings {
            store_name: "Semai Nursery".to_string(),
            address: "Bandar Lampung, Indonesia".to_string(),
            phone: "0812-0000-0000".to_string(),
            logo_url: None,
        };

        let text = receipt().render_text(&store);

        assert!(text.contains("*NOTA SEMAI NURSERY*"));
        assert!(text.contains("Nota #a1b2c3d4"));
        assert!(text.contains("2x @ Rp 55.000 = Rp 110.000"));
        assert!(text.contains("Subtotal: Rp 110.000"));
        assert!(text.contains("Diskon: -Rp 11.000"));
        assert!(text.contains("*Total: Rp 99.000*"));
        assert!(text.contains("Tunai: Rp 100.000"));
        assert!(text.contains("Kembalian: Rp 1.000"));
    }

    #[test]
    fn test_non_cash_nota_hides_cash_lines() {
        let mut r = receipt();
        r.payment_method = PaymentMethod::Qris;
        r.cash_received_rp = r.total_rp;
        r.change_rp = 0;

        let text = r.render_text(&StoreSettings::default());
        assert!(text.contains("Metode: QRIS"));
        assert!(!text.contains("Tunai:"));
        assert!(!text.contains("Kembalian:"));
    }

    #[test]
    fn test_zero_discount_line_omitted() {
        let mut r = receipt();
        r.discount_rp = 0;
        r.total_rp = r.subtotal_rp;

        let text = r.render_text(&StoreSettings::default());
        assert!(!text.contains("Diskon"));
    }
}
