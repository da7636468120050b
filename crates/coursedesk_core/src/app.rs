//! Application context: one store, one notice queue, the signed-in user and
//! UI preferences, built once at startup and passed to handlers.

use crate::auth::{self, Navigation, UserSession, LOGIN_PATH};
use crate::config::CoreConfig;
use crate::model::course::Course;
use crate::model::department::Department;
use crate::model::schema::Entity;
use crate::notify::{Notice, NoticeQueue, Notifier};
use crate::preferences::{Preferences, PreferencesError};
use crate::service::course_detail::CourseDetailService;
use crate::service::dashboard::DashboardService;
use crate::service::departments::SelectOption;
use crate::service::enrollments::EnrollmentService;
use crate::service::entity::EntityService;
use crate::service::ServiceResult;
use crate::store::{RecordStore, SqliteRecordStore, StoreResult};
use log::{info, warn};
use std::sync::Arc;

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please try again.";

pub struct AppContext<S> {
    store: S,
    notices: Arc<NoticeQueue>,
    session: Option<UserSession>,
    preferences: Preferences,
    config: CoreConfig,
}

impl AppContext<Arc<SqliteRecordStore>> {
    /// Opens the configured database and loads preferences.
    pub fn open(config: CoreConfig, system_prefers_dark: bool) -> StoreResult<Self> {
        let store = Arc::new(SqliteRecordStore::open(&config.db_path)?);
        Ok(Self::new(store, config, system_prefers_dark))
    }
}

impl<S: RecordStore + Clone> AppContext<S> {
    pub fn new(store: S, config: CoreConfig, system_prefers_dark: bool) -> Self {
        let preferences =
            Preferences::load_or_default(config.preferences_path.clone(), system_prefers_dark);
        Self {
            store,
            notices: Arc::new(NoticeQueue::new()),
            session: None,
            preferences,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notices.clone()
    }

    /// Service for any entity, sharing this context's store and notices.
    pub fn service<E: Entity>(&self) -> EntityService<S, E> {
        EntityService::new(self.store.clone(), self.notifier())
    }

    pub fn enrollments(&self) -> EnrollmentService<S> {
        EnrollmentService::new(self.store.clone(), self.notifier())
    }

    pub fn dashboard(&self) -> DashboardService<S> {
        DashboardService::new(self.store.clone(), self.notifier())
    }

    pub fn course_detail(&self) -> CourseDetailService<S> {
        CourseDetailService::new(self.store.clone(), self.notifier())
    }

    /// Most recently created courses, sized by config.
    pub fn recent_courses(&self) -> ServiceResult<Vec<Course>> {
        self.service::<Course>().recent(Some(self.config.recent_courses_limit))
    }

    /// Department filter options for the course list.
    pub fn department_options(&self) -> Vec<SelectOption> {
        self.service::<Department>().options()
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    /// Applies the outcome of an auth state check at `current`.
    pub fn handle_auth_state(&mut self, current: &str, user: Option<UserSession>) -> Navigation {
        let authenticated = user.is_some();
        if let Some(user) = &user {
            info!(
                "event=auth_state module=app status=ok user_id={}",
                user.user_id
            );
        }
        self.session = user;
        auth::route_after_auth(current, authenticated)
    }

    /// Records a completed sign-in at `current`.
    pub fn sign_in(&mut self, current: &str, user: UserSession) -> Navigation {
        self.handle_auth_state(current, Some(user))
    }

    /// Clears the session after an auth provider failure.
    pub fn handle_auth_failure(&mut self, current: &str, reason: &str) -> Navigation {
        warn!("event=auth_state module=app status=error reason={reason}");
        self.session = None;
        self.notices.notify(Notice::error(AUTH_FAILED_MESSAGE));
        auth::route_after_auth_failure(current)
    }

    /// Ends the session and routes to login.
    pub fn sign_out(&mut self) -> Navigation {
        if let Some(user) = self.session.take() {
            info!(
                "event=sign_out module=app status=ok user_id={}",
                user.user_id
            );
        }
        self.notices.notify(Notice::success("You have been signed out"));
        Navigation::Navigate(LOGIN_PATH.to_string())
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool, PreferencesError> {
        self.preferences.toggle_dark_mode()
    }
}
