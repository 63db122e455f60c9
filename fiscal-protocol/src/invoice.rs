//! Invoice wire DTOs
//!
//! Field names are the JSON contract with the existing POS frontends
//! and therefore stay in Spanish. Amounts are decimals end to end; the
//! protocol is fixed-point and floats would reintroduce rounding drift.

use rust_decimal::Decimal;
use serde::Deserialize;

/// A complete fiscal invoice request for one terminal
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    /// Customer identification, printed on the fiscal document header
    #[serde(default)]
    pub cliente: Client,
    /// Sale lines, emitted in input order
    #[serde(default)]
    pub items: Vec<Item>,
    /// Tender lines, emitted in input order
    #[serde(default)]
    pub pagos: Vec<Payment>,
}

/// Customer legal identification
#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    #[serde(default = "default_razon_social")]
    pub razon_social: String,
    #[serde(default = "default_rif")]
    pub rif: String,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            razon_social: default_razon_social(),
            rif: default_rif(),
        }
    }
}

fn default_razon_social() -> String {
    "Consumidor Final".to_string()
}

fn default_rif() -> String {
    "V000000000".to_string()
}

/// One sale line
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    #[serde(default = "default_descripcion")]
    pub descripcion: String,
    /// Quantity, 3-decimal precision on the wire
    #[serde(default)]
    pub cantidad: Decimal,
    /// Unit price including tax, 2-decimal precision on the wire
    #[serde(default)]
    pub precio_unitario_con_iva: Decimal,
    /// Tax rate in percent (0, 8, 16 or 31)
    #[serde(default)]
    pub tasa_iva: Decimal,
}

fn default_descripcion() -> String {
    "Producto".to_string()
}

/// One tender line
#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    /// Fiscal tender slot (1-99)
    #[serde(default = "default_slot")]
    pub slot_fiscal: i64,
    /// Amount, 2-decimal precision on the wire
    #[serde(default)]
    pub monto: Decimal,
}

fn default_slot() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let invoice: Invoice = serde_json::from_str("{}").unwrap();
        assert_eq!(invoice.cliente.razon_social, "Consumidor Final");
        assert_eq!(invoice.cliente.rif, "V000000000");
        assert!(invoice.items.is_empty());
        assert!(invoice.pagos.is_empty());
    }

    #[test]
    fn test_decimal_fields_parse_from_numbers() {
        let json = r#"{
            "items": [{"descripcion": "Arepa", "cantidad": 2.0,
                       "precio_unitario_con_iva": 11.60, "tasa_iva": 16.0}],
            "pagos": [{"slot_fiscal": 1, "monto": 23.20}]
        }"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.items[0].tasa_iva, Decimal::from(16));
        assert_eq!(invoice.pagos[0].slot_fiscal, 1);
    }

    #[test]
    fn test_malformed_numeric_field_rejected() {
        let json = r#"{"items": [{"cantidad": "dos"}]}"#;
        assert!(serde_json::from_str::<Invoice>(json).is_err());
    }
}
