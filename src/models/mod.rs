pub mod grading;
pub mod loaders;
pub mod question;
pub mod schemas;
pub mod submission;

pub use grading::{Competence, CriterionRow, Feedback, GradingResponse, SolutionPathway, ValuePoints};
pub use loaders::{load_all_submissions, load_question_bank};
pub use question::{Complexity, GradingRequest, QuestionSpec, QuestionType, StudentAnswer};
pub use schemas::{GradingVariant, OutputSchema};
pub use submission::{QuestionBank, Submission};
