pub mod budget_service;
pub mod product_service;
pub mod set_aside_service;
pub mod settings_service;
pub mod summary_service;

pub use budget_service::{BudgetEvaluation, BudgetService};
pub use product_service::{AnticipationQuote, ProductService, ProductUpdate};
pub use set_aside_service::{SetAsideService, SetAsideSuggestion};
pub use settings_service::SettingsService;
pub use summary_service::{ActiveProduct, MonthSummary, SummaryService};
