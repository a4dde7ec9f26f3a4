//! One page evaluation: selection, then view composition, for one session.

use std::io::Write;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::{
    config::{DashboardConfig, MAX_POINTS_PER_GOVERNORATE, MAX_SESSION_IDLE_MINUTES},
    error::DashboardResult,
    points::JitterSettings,
    reference::{self, Governorate},
    selection::{resolve_selection, UrlState, GOV_KEY},
    session::{SessionId, SessionSettings, SessionStore},
    view::{self, BarChartSpec, MapSpec, PieChartSpec, Sidebar},
};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: Governorate,
    /// Query parameters after resolution, including any written-back default.
    pub url_state: UrlState,
    pub sidebar: Sidebar,
    pub bar_chart: BarChartSpec,
    pub pie_chart: PieChartSpec,
    pub map: MapSpec,
}

pub struct DashboardSettings {
    pub seed: Option<u64>,
    pub session: SessionSettings,
}

impl From<&DashboardConfig> for DashboardSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            seed: config.seed,
            session: SessionSettings {
                idle_timeout: Duration::minutes(
                    config
                        .session_idle_minutes
                        .clamp(1, MAX_SESSION_IDLE_MINUTES),
                ),
                max_sessions: config.max_sessions.max(1),
                jitter: JitterSettings {
                    points_per_governorate: config
                        .points_per_governorate
                        .min(MAX_POINTS_PER_GOVERNORATE),
                    jitter_degrees: config.jitter_degrees,
                },
            },
        }
    }
}

pub struct Dashboard {
    sessions: SessionStore,
}

impl Dashboard {
    pub fn new(settings: DashboardSettings) -> DashboardResult<Self> {
        reference::validate()?;
        Ok(Self {
            sessions: SessionStore::new(settings.session, settings.seed),
        })
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn evaluate(
        &self,
        session: SessionId,
        url_state: &mut UrlState,
    ) -> DashboardResult<DashboardView> {
        let selection = resolve_selection(url_state);
        let points = self.sessions.well_points(session)?;
        let breakdown = view::sector_breakdown(selection);

        Ok(DashboardView {
            selection,
            url_state: url_state.clone(),
            sidebar: view::sidebar(selection),
            bar_chart: BarChartSpec::from_series(&view::bar_series()),
            pie_chart: PieChartSpec::from_breakdown(selection, &breakdown),
            map: MapSpec::from_markers(view::markers(&points)),
        })
    }

    /// Evaluates a fresh session as if the page were opened with `gov` and
    /// writes the view to `out` as pretty JSON.
    pub fn snapshot(&self, gov: Option<&str>, out: &mut impl Write) -> DashboardResult<DashboardView> {
        let mut url_state = UrlState::new();
        if let Some(gov) = gov {
            url_state.set(GOV_KEY, gov);
        }
        let session = self.sessions.open(None, Utc::now())?;
        let view = self.evaluate(session, &mut url_state)?;
        self.sessions.end(session)?;

        serde_json::to_writer_pretty(&mut *out, &view)?;
        out.write_all(b"\n").map_err(serde_json::Error::io)?;
        Ok(view)
    }
}
