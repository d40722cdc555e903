pub mod comparison;
pub mod policy_workflow;
pub mod quote_board;
pub mod request_builder;

pub use comparison::{cheapest_index, compare, display_order, fastest_index, Comparison, RankedQuote};
pub use policy_workflow::{
    InstallmentChoice, InstallmentOption, PolicyDraft, PolicyState, PolicyWorkflow, WorkflowError,
    COMMISSION_RATE,
};
pub use quote_board::{BoardState, QuoteBoard, QuoteMode, Resolution, Ticket};
pub use request_builder::{generate_request_id, QuoteForm, RequestBuilder};
