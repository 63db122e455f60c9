//! Invoice to command-sequence encoder
//!
//! Translates an [`Invoice`] into the ordered, fixed-width positional
//! command lines the TFHKA unit consumes, one command per text line:
//!
//! ```text
//! iS*<razon social>                  client name
//! iR*<rif>                           client tax id
//! <code><price:10><qty:8><desc:40>   one per item
//! 3                                  subtotal marker
//! 2<slot:2><amount:12>               partial payment (all but last)
//! 1<slot:2>                          totalizer (closes the sale)
//! 199                                IGTF surcharge closer (conditional)
//! ```
//!
//! Line order is part of the protocol and must not be changed. The
//! encoder is pure: same invoice, same configuration, same bytes.

use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{ProtocolError, ProtocolResult};
use crate::invoice::Invoice;

/// Payment slots the tax authority treats as foreign currency.
///
/// A sale paid through any of these must close with the `199` command
/// or the fiscal unit rejects or misclassifies the transaction.
pub const IGTF_SLOTS: [i64; 5] = [20, 21, 22, 23, 24];

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Slots that trigger the mandatory `199` closing command
    pub surcharge_slots: Vec<i64>,
    /// Emit `199` unconditionally (deployments that always operate
    /// under the IGTF regime)
    pub force_surcharge: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            surcharge_slots: IGTF_SLOTS.to_vec(),
            force_surcharge: false,
        }
    }
}

/// Map a tax rate (percent) to its single-character command code.
///
/// Unrecognized rates fall back to the exempt code, matching the
/// vendor's documented behavior.
pub fn tax_code(rate: Decimal) -> char {
    if rate == Decimal::from(16) {
        '!'
    } else if rate == Decimal::from(8) {
        '"'
    } else if rate == Decimal::from(31) {
        '#'
    } else {
        ' '
    }
}

/// Encode an invoice into its ordered command sequence.
///
/// Fails as a whole on any field that cannot be represented in the
/// fixed-width format; there is no partial encoding.
#[instrument(skip_all, fields(items = invoice.items.len(), pagos = invoice.pagos.len()))]
pub fn encode_invoice(invoice: &Invoice, config: &EncoderConfig) -> ProtocolResult<Vec<String>> {
    let mut commands = Vec::with_capacity(invoice.items.len() + invoice.pagos.len() + 4);

    // Client header lines
    commands.push(format!("iS*{}", sanitize(&invoice.cliente.razon_social)));
    commands.push(format!("iR*{}", sanitize(&invoice.cliente.rif)));

    // Item lines, input order
    for item in &invoice.items {
        let mut price = item.precio_unitario_con_iva;
        let mut rate = item.tasa_iva;

        // Protocol quirk: zero/negative prices are not encodable, the
        // unit expects the minimal amount marked exempt instead.
        if price <= Decimal::ZERO {
            price = Decimal::new(1, 2); // 0.01
            rate = Decimal::ZERO;
        }

        // The command carries the tax-exclusive base price; the unit
        // re-applies the rate itself.
        let base = if rate > Decimal::ZERO {
            price / (Decimal::ONE + rate / Decimal::ONE_HUNDRED)
        } else {
            price
        };

        let price_fmt = fixed_point(base, 2, 10)?;
        let qty_fmt = fixed_point(item.cantidad, 3, 8)?;
        let desc: String = sanitize(&item.descripcion).chars().take(40).collect();

        commands.push(format!("{}{}{}{}", tax_code(rate), price_fmt, qty_fmt, desc));
    }

    // Subtotal marker
    commands.push("3".to_string());

    // Payment lines: N-1 partials then one totalizer. The totalizer
    // must be last; the unit closes the sale on it.
    match invoice.pagos.as_slice() {
        [] => commands.push("101".to_string()),
        [partials @ .., last] => {
            for pago in partials {
                let slot = validate_slot(pago.slot_fiscal)?;
                let amount = fixed_point(pago.monto, 2, 12)?;
                commands.push(format!("2{:02}{}", slot, amount));
            }
            commands.push(format!("1{:02}", validate_slot(last.slot_fiscal)?));
        }
    }

    // Mandatory IGTF closer
    let surcharge = config.force_surcharge
        || invoice
            .pagos
            .iter()
            .any(|p| config.surcharge_slots.contains(&p.slot_fiscal));
    if surcharge {
        commands.push("199".to_string());
    }

    Ok(commands)
}

/// One command per text line is the file contract; an embedded
/// newline in a free-text field would smuggle extra command lines
/// past the processed-count check. Control characters become spaces.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn validate_slot(slot: i64) -> ProtocolResult<i64> {
    if (1..=99).contains(&slot) {
        Ok(slot)
    } else {
        Err(ProtocolError::SlotOutOfRange(slot))
    }
}

/// Format a decimal with exactly `dp` fraction digits, strip the
/// point and left-pad with zeros to `width` digits.
fn fixed_point(value: Decimal, dp: u32, width: usize) -> ProtocolResult<String> {
    let overflow = || ProtocolError::FieldOverflow {
        width,
        value: value.to_string(),
    };

    // The format has no sign position
    if value.is_sign_negative() {
        return Err(overflow());
    }

    let rounded = value.round_dp(dp);
    let text = format!("{:.prec$}", rounded, prec = dp as usize);
    let digits: String = text.chars().filter(|c| *c != '.').collect();

    if digits.len() > width {
        return Err(overflow());
    }
    Ok(format!("{:0>width$}", digits, width = width))
}
