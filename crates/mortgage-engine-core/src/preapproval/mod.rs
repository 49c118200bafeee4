pub mod engine;
pub mod guidelines;
pub mod letter;

pub use engine::{
    assess_preapproval, LoanProgram, PreapprovalAssessment, PreapprovalEngine, PreapprovalInput,
};
pub use guidelines::ProgramGuidelines;
pub use letter::{build_letter, LetterInput, PreapprovalLetter};
