pub mod alerts;
pub mod engagement;
pub mod progress;

pub use alerts::{engagement_spike, spike_alert, EngagementSpike, SpikeAlert};
pub use engagement::{engagement_score, score_engagement, DocumentEvent, EngagementInput};
pub use progress::{calculate_progress, progress_report, PipelineStage, ProgressReport};
