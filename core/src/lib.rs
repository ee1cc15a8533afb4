//! Shift rota engine: derives staffing requirements from a production plan
//! and greedily assigns qualified staff, with a monthly rotation rule.

pub mod availability;
pub mod config;
pub mod engine;
pub mod error;
pub mod fairness;
pub mod plan;
pub mod qualification;
pub mod requirements;
pub mod rota;
pub mod service;
pub mod staff;
pub mod store;
pub mod types;

pub use availability::{AvailabilitySnapshot, StatusCode};
pub use config::{AreaCategory, FloorConfig, PositionRequirement, WorkAreaConfig};
pub use engine::{generate_rota, RotaPreview};
pub use error::{RotaError, RotaResult};
pub use fairness::AssignmentHistory;
pub use plan::{PlanBook, ProductionPlan};
pub use qualification::is_qualified;
pub use requirements::{derive_requirements, AreaRequirement, RequirementSet};
pub use rota::{Assignment, Rota, RotaTotals, RotaWarning};
pub use service::RotaService;
pub use staff::StaffMember;
pub use store::RotaStore;
pub use types::{month_key, MonthKey, ShiftType, StaffId};
