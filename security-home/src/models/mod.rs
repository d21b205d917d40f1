mod id;
pub mod location;
pub mod panic_alert;
pub mod report;
pub mod search;
pub mod user;

pub use location::{TeamLocation, DEFAULT_RADIUS_KM};
pub use panic_alert::Panic;
pub use report::{Report, ReportKind};
pub use search::{SearchRequest, UserRecord};
pub use user::{Role, UserMetadata, UserProfile};
