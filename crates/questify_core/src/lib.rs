pub mod contract;
pub mod domain;
pub mod export;
pub mod ports;
pub mod workflow;

pub use domain::{
    Domain, GenerationRequest, PaperRequest, Question, QuestionPaper, RequestValidationError,
    SavedPaper, Section, User, UserCredentials,
};
pub use ports::{PaperGenerator, PaperStore, PortError, PortResult};
pub use workflow::{Screen, Workflow};
