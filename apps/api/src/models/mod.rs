pub mod account;
pub mod download_log;
pub mod lead;
pub mod resume;
pub mod resume_data;

pub use account::{Account, AccountStatus, NewAccount, PublicAccount, Role, Subscription, SubscriptionType};
pub use download_log::DownloadLog;
pub use lead::Lead;
pub use resume::{Owner, Resume, ResumeView};
pub use resume_data::ResumeData;
