use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;

use crate::{
    dashboard::DashboardSnapshot,
    error::{Result, SurveyError},
    export::{self, ExportArtifact, ExportFormat},
    models::{RawSubmission, ResponseRecord, Session, SessionSummary},
    storage::{Region, RegionSet, StoragePort},
    store::{ResponseStore, SessionRegistry},
    validation,
};

use super::{
    clock::{Clock, IdGenerator, SystemClock, UuidIds},
    naming::session_id_for,
};

// Set to false to silence lifecycle logging from this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Persisted state as one update sees it, and the regions it changed.
struct Loaded {
    responses: ResponseStore,
    registry: SessionRegistry,
    active: Option<String>,
    touched: Vec<Region>,
    bootstrapped: Option<String>,
}

impl Loaded {
    fn decode(set: &RegionSet) -> Result<Self> {
        Ok(Self {
            responses: parse_document(Region::Responses, set.get(Region::Responses))?,
            registry: parse_document(Region::Sessions, set.get(Region::Sessions))?,
            active: parse_document(Region::CurrentSession, set.get(Region::CurrentSession))?,
            touched: Vec::new(),
            bootstrapped: None,
        })
    }

    fn touch(&mut self, regions: &[Region]) {
        for region in regions {
            if !self.touched.contains(region) {
                self.touched.push(*region);
            }
        }
    }

    /// Serializes every touched region into `set`, in the order touched.
    fn stage(&self, set: &mut RegionSet) -> Result<()> {
        for region in &self.touched {
            let document = match region {
                Region::Responses => serde_json::to_string(&self.responses)?,
                Region::Sessions => serde_json::to_string(&self.registry)?,
                Region::CurrentSession => serde_json::to_string(&self.active)?,
            };
            set.put(*region, document);
        }
        Ok(())
    }

    /// Returns the active session id, creating a session first when the
    /// pointer is unset or points at nothing.
    fn ensure_active(&mut self, now: DateTime<Utc>) -> Result<String> {
        if let Some(active) = self.active.as_deref() {
            if self.registry.contains(active) {
                return Ok(active.to_string());
            }
            log_warn!("active session {} is missing; starting a new one", active);
        }

        let (session_id, started_at) = next_session_id(&self.registry, now);
        self.registry.create(&session_id, started_at)?;
        self.active = Some(session_id.clone());
        self.bootstrapped = Some(session_id.clone());
        self.touch(&[Region::Sessions, Region::CurrentSession]);
        Ok(session_id)
    }
}

/// Time and id sources handed to each update.
struct Stamps {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

/// Owns the active-session pointer and keeps the flat response store and
/// the session registry in step on every write.
///
/// Nothing is cached. Every mutation runs as a single storage update over
/// all regions; plain reads load just the regions they need.
pub struct SessionManager<S> {
    storage: S,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S: StoragePort> SessionManager<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIds),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The active session, creating the first one if none exists yet.
    pub fn active_session(&self) -> Result<Session> {
        self.update(|loaded, stamps| {
            let active_id = loaded.ensure_active(stamps.clock.now())?;
            Ok(loaded.registry.get(&active_id)?.clone())
        })
    }

    /// Id of the active session without bootstrapping one.
    pub fn active_session_id(&self) -> Result<Option<String>> {
        self.load_region(Region::CurrentSession)
    }

    /// Archives the active session and makes a fresh one active.
    ///
    /// An active session with no responses is only replaced when `force` is
    /// set; otherwise the caller gets `ConfirmationRequired`.
    pub fn start_new_session(&self, force: bool) -> Result<Session> {
        // The confirmation error names the active session, so make sure one exists
        self.active_session()?;

        let (session, previous_id, previous_count) = self.update(move |loaded, stamps| {
            let now = stamps.clock.now();
            let previous_id = loaded.ensure_active(now)?;

            let previous_count = loaded.registry.get(&previous_id)?.response_count();
            if previous_count == 0 && !force {
                return Err(SurveyError::ConfirmationRequired {
                    action: "starting a new session",
                    session_id: previous_id,
                });
            }

            if !loaded.registry.archive(&previous_id, now)? {
                log_debug!("session {} was already archived", previous_id);
            }

            let (new_id, started_at) = next_session_id(&loaded.registry, now);
            loaded.registry.create(&new_id, started_at)?;
            loaded.active = Some(new_id.clone());
            loaded.touch(&[Region::Sessions, Region::CurrentSession]);

            Ok((loaded.registry.get(&new_id)?.clone(), previous_id, previous_count))
        })?;

        log_info!(
            "archived session {} ({} responses), started {}",
            previous_id,
            previous_count,
            session.id
        );
        Ok(session)
    }

    /// Points new responses at `target_id`. Archived flags are left alone.
    pub fn switch_session(&self, target_id: &str) -> Result<Session> {
        let target_id = target_id.to_string();
        let target = self.update(move |loaded, _| {
            let target = loaded.registry.get(&target_id)?.clone();
            loaded.active = Some(target.id.clone());
            loaded.touch(&[Region::CurrentSession]);
            Ok(target)
        })?;

        if target.archived {
            log_info!(
                "switched to archived session {}; new responses will still be recorded there",
                target.id
            );
        } else {
            log_info!("switched to session {}", target.id);
        }
        Ok(target)
    }

    /// Removes a non-active session and every response recorded into it.
    pub fn delete_session(&self, target_id: &str) -> Result<Session> {
        let target_id = target_id.to_string();
        let (removed, dropped) = self.update(move |loaded, _| {
            let removed = loaded
                .registry
                .delete(&target_id, loaded.active.as_deref())?;
            let dropped = loaded.responses.delete_by_session(&target_id);
            loaded.touch(&[Region::Sessions, Region::Responses]);
            Ok((removed, dropped))
        })?;

        log_info!("deleted session {} ({} responses)", removed.id, dropped);
        Ok(removed)
    }

    /// Validates a submission and records it into the active session.
    pub fn record_response(&self, raw: &RawSubmission) -> Result<ResponseRecord> {
        let answers = validation::validate(raw)?;

        let (record, archived) = self.update(move |loaded, stamps| {
            let session_id = loaded.ensure_active(stamps.clock.now())?;
            let archived = loaded.registry.get(&session_id)?.archived;

            let record = ResponseRecord {
                id: stamps.ids.next_id(),
                session_id: session_id.clone(),
                role: answers.role,
                familiarity: answers.familiarity,
                hope: answers.hope,
                timestamp: stamps.clock.now(),
            };

            loaded.responses.append(record.clone());
            loaded.registry.append_response(&session_id, record.clone())?;
            loaded.touch(&[Region::Responses, Region::Sessions]);
            Ok((record, archived))
        })?;

        if archived {
            log_warn!("recorded response into archived session {}", record.session_id);
        }
        log_debug!("recorded response {} in session {}", record.id, record.session_id);
        Ok(record)
    }

    /// Removes every response of a session while keeping the session.
    /// Defaults to the active session; needs `force` when there is anything
    /// to remove. Returns the number of responses removed.
    pub fn clear_session(&self, session_id: Option<&str>, force: bool) -> Result<usize> {
        let session_id = session_id.map(str::to_string);
        let (count, target) = self.update(move |loaded, stamps| {
            let now = stamps.clock.now();
            let target = match session_id {
                Some(id) => id,
                None => loaded.ensure_active(now)?,
            };

            let count = loaded.registry.get(&target)?.response_count();
            if count == 0 {
                return Ok((0, target));
            }
            if !force {
                return Err(SurveyError::ConfirmationRequired {
                    action: "clearing all responses",
                    session_id: target,
                });
            }

            loaded.registry.clear_responses(&target, now)?;
            loaded.responses.delete_by_session(&target);
            loaded.touch(&[Region::Responses, Region::Sessions]);
            Ok((count, target))
        })?;

        if count > 0 {
            log_info!("cleared {} responses from session {}", count, target);
        }
        Ok(count)
    }

    pub fn get_session(&self, session_id: &str) -> Result<Session> {
        let registry: SessionRegistry = self.load_region(Region::Sessions)?;
        Ok(registry.get(session_id)?.clone())
    }

    /// Every session, newest start time first.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let registry: SessionRegistry = self.load_region(Region::Sessions)?;
        let active: Option<String> = self.load_region(Region::CurrentSession)?;

        let mut summaries: Vec<SessionSummary> = registry
            .list_all()
            .map(|session| SessionSummary::from_session(session, active.as_deref()))
            .collect();
        summaries.sort_by(|a, b| {
            b.start_time
                .cmp(&a.start_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(summaries)
    }

    pub fn list_all_responses(&self) -> Result<Vec<ResponseRecord>> {
        let responses: ResponseStore = self.load_region(Region::Responses)?;
        Ok(responses.list_all().to_vec())
    }

    pub fn list_responses(&self, session_id: &str) -> Result<Vec<ResponseRecord>> {
        let responses: ResponseStore = self.load_region(Region::Responses)?;
        Ok(responses.list_by_session(session_id))
    }

    /// Current figures for the active session, recomputed from storage.
    pub fn dashboard(&self) -> Result<DashboardSnapshot> {
        let session = self.active_session()?;
        Ok(DashboardSnapshot::build(
            &session,
            Some(&session.id),
            self.clock.now(),
        ))
    }

    /// Renders a session (the active one by default) for download.
    pub fn export(&self, session_id: Option<&str>, format: ExportFormat) -> Result<ExportArtifact> {
        let session = match session_id {
            Some(id) => self.get_session(id)?,
            None => self.active_session()?,
        };
        export::render(&session, format, self.clock.now())
    }

    /// Runs `op` against every region as one storage update and persists
    /// the regions it touched.
    fn update<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Loaded, &Stamps) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let stamps = Stamps {
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
        };

        let (value, bootstrapped) = self.storage.update(move |set| {
            let mut loaded = Loaded::decode(set)?;
            let value = op(&mut loaded, &stamps)?;
            loaded.stage(set)?;
            Ok((value, loaded.bootstrapped))
        })?;

        if let Some(session_id) = bootstrapped {
            log_info!("started session {}", session_id);
        }
        Ok(value)
    }

    fn load_region<T: DeserializeOwned + Default>(&self, region: Region) -> Result<T> {
        let raw = self.storage.load(region).map_err(SurveyError::Storage)?;
        parse_document(region, raw.as_deref())
    }
}

fn parse_document<T: DeserializeOwned + Default>(region: Region, raw: Option<&str>) -> Result<T> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)
            .map_err(|source| SurveyError::CorruptRegion { region, source }),
        _ => Ok(T::default()),
    }
}

/// First free session id at or after `now`, with the instant it encodes.
fn next_session_id(registry: &SessionRegistry, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
    let mut at = now;
    loop {
        let id = session_id_for(at);
        if !registry.contains(&id) {
            return (id, at);
        }
        at += Duration::milliseconds(1);
    }
}
