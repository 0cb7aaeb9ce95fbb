//! Wire payload posted to the ERP order endpoint.

use super::order::{LineItem, OrderState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order snapshot as the ERP API expects it.
///
/// Amounts go out as JSON numbers (f64). They keep cents exactly while the
/// value stays below 2^53 / 100 (about 9e13); larger totals are rounded on
/// the wire even though the draft itself stays exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub cliente_codigo: String,
    pub cliente_nombre: String,
    pub documento: String,
    pub fecha: String,
    pub direccion: String,
    pub total: Decimal,
    pub detalles: Vec<OrderLinePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLinePayload {
    pub itemcode: String,
    pub descripcion: String,
    pub precio: Decimal,
    pub cantidad: Decimal,
    pub subtotal: Decimal,
}

impl From<&LineItem> for OrderLinePayload {
    fn from(line: &LineItem) -> Self {
        Self {
            itemcode: line.code().to_string(),
            descripcion: line.description().to_string(),
            precio: line.unit_price(),
            cantidad: line.quantity(),
            subtotal: line.subtotal(),
        }
    }
}

/// Snapshot the draft into its wire form. The draft is only borrowed.
pub fn build_payload(state: &OrderState) -> OrderPayload {
    OrderPayload {
        cliente_codigo: state.client_code().to_string(),
        cliente_nombre: state.client_name().to_string(),
        documento: state.document().to_string(),
        fecha: state.date().to_string(),
        direccion: state.shipping_address().to_string(),
        total: state.total(),
        detalles: state.lines().iter().map(OrderLinePayload::from).collect(),
    }
}
