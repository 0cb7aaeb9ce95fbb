pub mod customer;
pub mod form_session;
pub mod order;
pub mod payload;

pub use customer::{CustomerDraft, CustomerRecord};
pub use form_session::{FormSession, FormStateError, Notice, NoticeLevel, SubmissionPhase};
pub use order::{HeaderField, LineEdit, LineItem, OrderError, OrderState};
pub use payload::{build_payload, OrderLinePayload, OrderPayload};

pub type OrderSession = FormSession<OrderState, OrderPayload>;
pub type CustomerSession = FormSession<CustomerDraft, CustomerRecord>;
