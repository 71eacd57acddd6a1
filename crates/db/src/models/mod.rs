pub mod solution;
pub mod solution_publishing;
pub mod solution_review;
pub mod solution_version;

pub use solution::{CreateSolution, Solution, UpdateSolutionContent};
pub use solution_publishing::{SolutionPublishing, UpsertSolutionPublishing};
pub use solution_review::{NewSolutionReview, ReviewStatRow, SolutionReview};
pub use solution_version::{NewSolutionVersion, SolutionVersion};
