pub mod calendar_manager;
pub mod clock;

pub use calendar_manager::CalendarManager;
pub use clock::{Clock, FixedClock, SystemClock};
