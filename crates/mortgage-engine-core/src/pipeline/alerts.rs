use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::engagement::DocumentEvent;

/// Activity window the spike rules look back over.
pub const SPIKE_WINDOW_MINUTES: i64 = 60;
pub const SPIKE_MIN_OPENS: usize = 3;
pub const SPIKE_MIN_DOWNLOADS: usize = 2;
pub const SPIKE_MIN_UPLOADS: usize = 1;
pub const SPIKE_MIN_PORTAL_EVENTS: usize = 4;

/// Which burst of portal activity a loan officer should hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngagementSpike {
    RepeatedOpens { opens: usize },
    RepeatedDownloads { downloads: usize },
    NewUploads { uploads: usize },
    PortalSurge { events: usize },
}

impl EngagementSpike {
    pub fn message(&self, borrower_name: &str) -> String {
        let name = match borrower_name.trim() {
            "" => "Borrower".to_string(),
            n => format!("Borrower {n}"),
        };
        match self {
            Self::RepeatedOpens { opens } => format!(
                "{name} opened the pre-approval email {opens} times within the last hour."
            ),
            Self::RepeatedDownloads { downloads } => {
                format!("{name} downloaded documents {downloads} times in the last hour.")
            }
            Self::NewUploads { .. } => format!("{name} uploaded new documents."),
            Self::PortalSurge { .. } => format!("{name} is very active in the portal."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeAlert {
    #[serde(flatten)]
    pub spike: EngagementSpike,
    pub message: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct WindowCounts {
    opens: usize,
    views: usize,
    downloads: usize,
    uploads: usize,
}

/// First matching spike rule over events since `now - 1h`, checked in
/// priority order: opens, downloads, uploads, then combined portal activity.
/// Events stamped after `now` fall inside the window.
pub fn engagement_spike(events: &[DocumentEvent], now: DateTime<Utc>) -> Option<EngagementSpike> {
    let since = now
        .checked_sub_signed(Duration::minutes(SPIKE_WINDOW_MINUTES))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let counts = events
        .iter()
        .filter(|e| e.timestamp >= since)
        .fold(WindowCounts::default(), |mut c, e| {
            match e.event_type.as_str() {
                "opened" => c.opens += 1,
                "viewed" => c.views += 1,
                "downloaded" => c.downloads += 1,
                "uploaded" => c.uploads += 1,
                _ => {}
            }
            c
        });

    let portal_events = counts.opens + counts.views + counts.downloads;
    if counts.opens >= SPIKE_MIN_OPENS {
        Some(EngagementSpike::RepeatedOpens { opens: counts.opens })
    } else if counts.downloads >= SPIKE_MIN_DOWNLOADS {
        Some(EngagementSpike::RepeatedDownloads {
            downloads: counts.downloads,
        })
    } else if counts.uploads >= SPIKE_MIN_UPLOADS {
        Some(EngagementSpike::NewUploads {
            uploads: counts.uploads,
        })
    } else if portal_events >= SPIKE_MIN_PORTAL_EVENTS {
        Some(EngagementSpike::PortalSurge {
            events: portal_events,
        })
    } else {
        None
    }
}

/// [`engagement_spike`] with its loan-officer notification text.
pub fn spike_alert(borrower_name: &str, events: &[DocumentEvent], now: DateTime<Utc>) -> Option<SpikeAlert> {
    let spike = engagement_spike(events, now)?;
    tracing::debug!(?spike, "engagement spike detected");
    Some(SpikeAlert {
        spike,
        message: spike.message(borrower_name),
    })
}
