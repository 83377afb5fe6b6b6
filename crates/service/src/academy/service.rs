use std::sync::Arc;

use configs::CorruptStatePolicy;
use models::{candidate::now_millis, AdminAccount, CandidateAccount, StoreDocument};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::domain::{
    AccountView, AdminView, AuthenticatedUser, CandidateView, LoginInput, RegisterInput, Registration,
    ResetPasswordInput, Role,
};
use super::errors::AcademyError;
use super::state::{Ledger, StoreState};
use crate::errors::ServiceError;
use crate::storage::StateStorage;

/// Record store service independent of web framework.
///
/// Owns the in-memory store and mirrors every mutation to `StateStorage`
/// before returning. Mutations hold the write lock across "change + persist",
/// so concurrent writers are serialized and the stored document always equals
/// the in-memory one. A failed persist rolls the change back.
pub struct AcademyService {
    storage: Arc<dyn StateStorage>,
    state: RwLock<StoreState>,
}

impl AcademyService {
    /// Load the store from `storage`, seeding it when nothing is stored yet.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use configs::CorruptStatePolicy;
    /// use service::academy::{AcademyService, domain::{LoginInput, Role}};
    /// use service::storage::MemoryStorage;
    ///
    /// let svc = tokio_test::block_on(AcademyService::bootstrap(
    ///     Arc::new(MemoryStorage::new()),
    ///     CorruptStatePolicy::Recover,
    /// ))
    /// .unwrap();
    /// let login = LoginInput { id: "admin".into(), password: "admin".into(), role: Role::Admin };
    /// let user = tokio_test::block_on(svc.authenticate(login)).unwrap();
    /// assert_eq!(user.role, Role::Admin);
    /// ```
    pub async fn bootstrap(
        storage: Arc<dyn StateStorage>,
        policy: CorruptStatePolicy,
    ) -> Result<Self, AcademyError> {
        let state = match storage.load().await {
            Ok(Some(doc)) => match StoreState::from_document(doc) {
                Ok(state) => {
                    let doc = state.document();
                    info!(admins = doc.admins.len(), users = doc.users.len(), "store loaded");
                    state
                }
                Err(e) => Self::recover(storage.as_ref(), policy, e.to_string()).await?,
            },
            Ok(None) => {
                info!("no persisted store found; seeding default admin");
                let state = StoreState::seeded();
                storage.save(state.document()).await?;
                state
            }
            Err(ServiceError::Malformed(reason)) => Self::recover(storage.as_ref(), policy, reason).await?,
            Err(e) => return Err(e.into()),
        };
        Ok(Self { storage, state: RwLock::new(state) })
    }

    async fn recover(
        storage: &dyn StateStorage,
        policy: CorruptStatePolicy,
        reason: String,
    ) -> Result<StoreState, AcademyError> {
        if policy == CorruptStatePolicy::Fail {
            error!(%reason, "persisted store is malformed; refusing to start");
            return Err(AcademyError::MalformedPersistedState(reason));
        }
        let moved_to = storage.quarantine().await?;
        warn!(
            %reason,
            moved_to = moved_to.as_deref().unwrap_or("-"),
            "persisted store is malformed; starting from seeded store"
        );
        let state = StoreState::seeded();
        storage.save(state.document()).await?;
        Ok(state)
    }

    async fn persist(&self, state: &StoreState) -> Result<(), AcademyError> {
        self.storage.save(state.document()).await.map_err(|e| {
            error!(error = %e, "failed to persist store; change rolled back");
            AcademyError::Persistence(e)
        })
    }

    /// Check credentials against the bucket selected by `role`.
    ///
    /// Candidates may log in with either their application number or their
    /// internal id.
    #[instrument(skip(self, input), fields(id = %input.id, role = input.role.as_str()))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<AuthenticatedUser, AcademyError> {
        info!("login attempt");
        let state = self.state.read().await;
        let account = match input.role {
            Role::Admin => state
                .admin(&input.id)
                .filter(|a| a.password == input.password)
                .map(|a| AccountView::Admin(AdminView::from(a))),
            Role::Candidate => state
                .candidates_by_key(&input.id)
                .into_iter()
                .map(|pos| state.candidate(pos))
                .find(|c| c.password == input.password)
                .map(|c| AccountView::Candidate(CandidateView::from(c))),
        };
        match account {
            Some(account) => Ok(AuthenticatedUser { account, role: input.role }),
            None => {
                debug!("credentials rejected");
                Err(AcademyError::InvalidCredentials(input.role))
            }
        }
    }

    /// Create an admin (id = `application_number`) or a candidate.
    #[instrument(skip(self, input), fields(application_number = %input.application_number, role = input.role.as_str()))]
    pub async fn register(&self, input: RegisterInput) -> Result<Registration, AcademyError> {
        let mut state = self.state.write().await;
        match input.role {
            Role::Admin => {
                if state.admin(&input.application_number).is_some() {
                    return Err(AcademyError::DuplicateKey(Role::Admin));
                }
                state.push_admin(AdminAccount::registered(&input.application_number, &input.password));
                if let Err(e) = self.persist(&state).await {
                    state.pop_admin();
                    return Err(e);
                }
                info!(admin_id = %input.application_number, "admin_registered");
                Ok(Registration { role: Role::Admin, user_id: None })
            }
            Role::Candidate => {
                if state.has_application_number(&input.application_number) {
                    return Err(AcademyError::DuplicateKey(Role::Candidate));
                }
                let joined_at = now_millis();
                let id = state.next_candidate_id(joined_at);
                state.push_candidate(CandidateAccount::new(
                    id.clone(),
                    &input.application_number,
                    &input.password,
                    joined_at,
                ));
                if let Err(e) = self.persist(&state).await {
                    state.pop_candidate();
                    return Err(e);
                }
                info!(user_id = %id, "candidate_registered");
                Ok(Registration { role: Role::Candidate, user_id: Some(id) })
            }
        }
    }

    /// Overwrite the password of an admin (by id) or a candidate (by
    /// application number or id).
    #[instrument(skip(self, input), fields(id = %input.id, role = input.role.as_str()))]
    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AcademyError> {
        let mut state = self.state.write().await;
        match input.role {
            Role::Admin => {
                let admin = state.admin_mut(&input.id).ok_or_else(AcademyError::admin_not_found)?;
                let previous = std::mem::replace(&mut admin.password, input.new_password);
                if let Err(e) = self.persist(&state).await {
                    if let Some(admin) = state.admin_mut(&input.id) {
                        admin.password = previous;
                    }
                    return Err(e);
                }
            }
            Role::Candidate => {
                let pos = *state
                    .candidates_by_key(&input.id)
                    .first()
                    .ok_or_else(AcademyError::candidate_not_found)?;
                let previous =
                    std::mem::replace(&mut state.candidate_mut(pos).password, input.new_password);
                if let Err(e) = self.persist(&state).await {
                    state.candidate_mut(pos).password = previous;
                    return Err(e);
                }
            }
        }
        info!("password_reset");
        Ok(())
    }

    /// All candidates in registration order, without passwords.
    pub async fn list_users(&self) -> Vec<CandidateView> {
        let state = self.state.read().await;
        state.candidates().iter().map(CandidateView::from).collect()
    }

    /// One candidate by internal id, without password.
    pub async fn get_user(&self, id: &str) -> Result<CandidateView, AcademyError> {
        let state = self.state.read().await;
        state
            .candidate_by_id(id)
            .map(|pos| CandidateView::from(state.candidate(pos)))
            .ok_or_else(AcademyError::user_not_found)
    }

    /// Append an opaque technique record to the candidate's log.
    pub async fn record_technique_completion(&self, user_id: &str, technique: Value) -> Result<(), AcademyError> {
        self.append(user_id, Ledger::Techniques, technique).await
    }

    /// Append an opaque customer session record to the candidate's log.
    pub async fn record_session_completion(&self, user_id: &str, session: Value) -> Result<(), AcademyError> {
        self.append(user_id, Ledger::Sessions, session).await
    }

    #[instrument(skip(self, ledger, record), fields(ledger = ledger.as_str()))]
    async fn append(&self, user_id: &str, ledger: Ledger, record: Value) -> Result<(), AcademyError> {
        let mut state = self.state.write().await;
        let pos = state.candidate_by_id(user_id).ok_or_else(AcademyError::user_not_found)?;
        state.ledger_mut(pos, ledger).push(record);
        if let Err(e) = self.persist(&state).await {
            state.ledger_mut(pos, ledger).pop();
            return Err(e);
        }
        let entries = state.ledger_mut(pos, ledger).len();
        info!(entries, "record_appended");
        Ok(())
    }

    /// Copy of the current document.
    pub async fn snapshot(&self) -> StoreDocument {
        self.state.read().await.document().clone()
    }
}
