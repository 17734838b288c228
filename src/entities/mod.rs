pub mod campaign;
pub mod employee;
pub mod event;

pub use campaign::Entity as CampaignEntity;
pub use employee::Entity as EmployeeEntity;
pub use event::Entity as EventEntity;
