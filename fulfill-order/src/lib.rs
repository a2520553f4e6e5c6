pub mod activities;
pub mod batch;
pub mod generator;
pub mod workflow;

pub use activities::{FulfillmentActivities, OrderFulfillActivities};
pub use batch::{BatchDriver, BatchReport, OrderOutcome, OrderReport};
pub use generator::OrderGenerator;
pub use workflow::OrderFulfillWorkflow;
