pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{NewStudentInput, RosterDocument, StudentRecord, StudentView, SubmitInput};
pub use repository::RosterRepository;
pub use service::{RosterService, SubmitOutcome};
