//! Business logic services for the LPG Safety Inspection Platform

pub mod agent;
pub mod allocation;
pub mod distributor;
pub mod inspection;
pub mod product;
pub mod report;

pub use agent::AgentService;
pub use allocation::AllocationService;
pub use distributor::DistributorService;
pub use inspection::InspectionService;
pub use product::ProductService;
pub use report::ReportService;
