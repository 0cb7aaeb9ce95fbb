//! Sales order (OV) draft: header fields, line items and the derived total.
//!
//! The total is never stored. It is recomputed from the lines on every read,
//! and each line restores `subtotal == unit_price * quantity` after any edit.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound accepted for unit price and quantity.
pub const MAX_FIELD_VALUE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("line {index} does not exist (order has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::IndexOutOfRange { .. } => AppError::NotFound(err.into()),
            _ => AppError::InvalidInput(err.into()),
        }
    }
}

/// Editable order header attributes. The correlative id is generated and
/// has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    ClientCode,
    ClientName,
    Document,
    Date,
    ShippingAddress,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::ClientCode => "cliente_codigo",
            HeaderField::ClientName => "cliente_nombre",
            HeaderField::Document => "documento",
            HeaderField::Date => "fecha",
            HeaderField::ShippingAddress => "direccion",
        }
    }
}

impl FromStr for HeaderField {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cliente_codigo" => Ok(HeaderField::ClientCode),
            "cliente_nombre" => Ok(HeaderField::ClientName),
            "documento" => Ok(HeaderField::Document),
            "fecha" => Ok(HeaderField::Date),
            "direccion" => Ok(HeaderField::ShippingAddress),
            other => Err(OrderError::UnknownField(other.to_string())),
        }
    }
}

/// A single-field edit of a line item. The subtotal has no variant: it is
/// always derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    Code(String),
    Description(String),
    UnitPrice(Decimal),
    Quantity(Decimal),
}

impl LineEdit {
    /// Parse raw form input (`field`, `value`) into a typed edit.
    ///
    /// Numeric fields are trimmed and must parse as a decimal within
    /// `0..=MAX_FIELD_VALUE`.
    pub fn parse(field: &str, value: &str) -> Result<Self, OrderError> {
        match field {
            "code" => Ok(LineEdit::Code(value.to_string())),
            "description" => Ok(LineEdit::Description(value.to_string())),
            "unit_price" => parse_amount("unit_price", value).map(LineEdit::UnitPrice),
            "quantity" => parse_amount("quantity", value).map(LineEdit::Quantity),
            other => Err(OrderError::UnknownField(other.to_string())),
        }
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, OrderError> {
    let value = Decimal::from_str(raw.trim()).map_err(|_| OrderError::NotANumber {
        field,
        value: raw.to_string(),
    })?;

    if value < Decimal::ZERO || value > MAX_FIELD_VALUE {
        return Err(OrderError::OutOfRange {
            field,
            value,
            max: MAX_FIELD_VALUE,
        });
    }

    Ok(value)
}

/// One detail line of the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    code: String,
    description: String,
    unit_price: Decimal,
    quantity: Decimal,
    subtotal: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            code: String::new(),
            description: String::new(),
            unit_price: Decimal::ZERO,
            quantity: Decimal::ONE,
            subtotal: Decimal::ZERO,
        }
    }
}

impl LineItem {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    fn apply(&mut self, edit: LineEdit) {
        match edit {
            LineEdit::Code(code) => self.code = code,
            LineEdit::Description(description) => self.description = description,
            LineEdit::UnitPrice(price) => self.unit_price = price,
            LineEdit::Quantity(quantity) => self.quantity = quantity,
        }
        // Both operands are bounded by MAX_FIELD_VALUE, so this cannot overflow
        self.subtotal = self.unit_price * self.quantity;
    }
}

/// Draft sales order owned by one form session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderState {
    client_code: String,
    client_name: String,
    document: String,
    date: String,
    shipping_address: String,
    correlative_id: String,
    lines: Vec<LineItem>,
}

impl Default for OrderState {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderState {
    /// Empty order with a fresh correlative and today's date.
    pub fn new() -> Self {
        Self::with_identity(generate_correlative(), today())
    }

    pub fn with_identity(correlative_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            client_code: String::new(),
            client_name: String::new(),
            document: String::new(),
            date: date.into(),
            shipping_address: String::new(),
            correlative_id: correlative_id.into(),
            lines: Vec::new(),
        }
    }

    pub fn client_code(&self) -> &str {
        &self.client_code
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn correlative_id(&self) -> &str {
        &self.correlative_id
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn header_field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::ClientCode => &self.client_code,
            HeaderField::ClientName => &self.client_name,
            HeaderField::Document => &self.document,
            HeaderField::Date => &self.date,
            HeaderField::ShippingAddress => &self.shipping_address,
        }
    }

    pub fn set_header_field(&mut self, field: HeaderField, value: impl Into<String>) {
        let value = value.into();
        match field {
            HeaderField::ClientCode => self.client_code = value,
            HeaderField::ClientName => self.client_name = value,
            HeaderField::Document => self.document = value,
            HeaderField::Date => self.date = value,
            HeaderField::ShippingAddress => self.shipping_address = value,
        }
    }

    /// Append a default line and return its index.
    pub fn add_line(&mut self) -> usize {
        self.lines.push(LineItem::default());
        self.lines.len() - 1
    }

    pub fn update_line(&mut self, index: usize, edit: LineEdit) -> Result<&LineItem, OrderError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(OrderError::IndexOutOfRange { index, len })?;
        line.apply(edit);
        Ok(line)
    }

    pub fn remove_line(&mut self, index: usize) -> Result<LineItem, OrderError> {
        if index >= self.lines.len() {
            return Err(OrderError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(LineItem::subtotal).sum()
    }
}

fn generate_correlative() -> String {
    format!("OV-{}", rand::thread_rng().gen_range(1000..10000))
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
