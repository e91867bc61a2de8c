pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::budget::{BudgetRepo, BudgetRow, NewBudget};
pub use repos::item::{ItineraryItemRepo, ItineraryItemRow, NewItineraryItem};
pub use repos::itinerary::{ItineraryRepo, ItineraryRow, NewItinerary};
pub use repos::user::{NewUser, UserProfileUpdate, UserRepo, UserRow};
