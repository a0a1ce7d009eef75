pub mod history;
pub mod models;
pub mod validate;
pub mod workflow;

pub use history::{OrderHistoryGateway, OrderLine, OrderRecord, TrackTrace};
pub use models::{
    AddressChoice, AlternativeAddress, ContactInfo, OrderDraft, OrderGateway, OrderPayload,
    OrderReceipt, ZipLookupGateway,
};
pub use validate::PhonePolicy;
pub use workflow::{ConfirmationWorkflow, FrozenDraft, WorkflowError, WorkflowState};
