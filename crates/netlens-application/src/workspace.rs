//! AnalysisWorkspace - everything scoped to the selected capture session.
//!
//! The workspace owns the [`SessionSelection`] and keeps every session-bound
//! component in step with it: the packet and anomaly browsers, the analytics
//! and session-detail loaders, and the chat controller's request scope.

use netlens_core::analytics::SessionAnalytics;
use netlens_core::api::CaptureApi;
use netlens_core::capture::DbFile;
use netlens_core::query::ResourceKey;
use netlens_core::session::{CaptureSession, SessionDetail, SessionSelection};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::browser::{ResourceBrowser, Staged};
use crate::chat_controller::ChatSessionController;
use crate::fetcher::{AnomalyResource, PacketResource};
use crate::loader::{LoadTicket, ResourceLoader};

pub const ANALYTICS_FAILED: &str = "Error al cargar los análisis.";
pub const SESSIONS_FAILED: &str =
    "Error al cargar las sesiones. Asegúrate de que el backend está funcionando.";
pub const DETAIL_FAILED: &str = "Error al cargar los detalles de la sesión.";
pub const DB_FILES_FAILED: &str = "Error al cargar los archivos de base de datos.";

/// Page sizes for the two tables.
#[derive(Debug, Clone, Copy)]
pub struct PageSizes {
    pub packets: u32,
    pub anomalies: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            packets: 20,
            anomalies: 10,
        }
    }
}

/// Session-scoped state of one client.
///
/// Selection changes are serialized only while they are published and the
/// components are rebound; the requests they trigger run after that, so a
/// newer selection never waits for an older one's fetches. Responses that
/// belong to a superseded selection are discarded.
pub struct AnalysisWorkspace {
    api: Arc<dyn CaptureApi>,
    selection: watch::Sender<SessionSelection>,
    transition: Mutex<()>,
    packets: Arc<ResourceBrowser<PacketResource>>,
    anomalies: Arc<ResourceBrowser<AnomalyResource>>,
    analytics: ResourceLoader<SessionAnalytics>,
    detail: ResourceLoader<SessionDetail>,
    sessions: ResourceLoader<Vec<CaptureSession>>,
    db_files: ResourceLoader<Vec<DbFile>>,
    chat: ChatSessionController,
}

impl AnalysisWorkspace {
    /// Creates a workspace with nothing selected.
    ///
    /// # Arguments
    ///
    /// * `api` - Remote service shared by every component
    /// * `page_sizes` - Initial limits of the packet and anomaly tables
    pub fn new(api: Arc<dyn CaptureApi>, page_sizes: PageSizes) -> Self {
        let (selection, _) = watch::channel(SessionSelection::default());
        Self {
            packets: Arc::new(ResourceBrowser::with_limit(
                api.clone(),
                PacketResource,
                page_sizes.packets,
            )),
            anomalies: Arc::new(ResourceBrowser::with_limit(
                api.clone(),
                AnomalyResource,
                page_sizes.anomalies,
            )),
            analytics: ResourceLoader::new("analytics"),
            detail: ResourceLoader::new("session_detail"),
            sessions: ResourceLoader::new("sessions"),
            db_files: ResourceLoader::new("db_files"),
            chat: ChatSessionController::new(api.clone(), SessionSelection::default()),
            api,
            selection,
            transition: Mutex::new(()),
        }
    }

    pub fn selection(&self) -> SessionSelection {
        self.selection.borrow().clone()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<SessionSelection> {
        self.selection.subscribe()
    }

    pub fn packets(&self) -> &Arc<ResourceBrowser<PacketResource>> {
        &self.packets
    }

    pub fn anomalies(&self) -> &Arc<ResourceBrowser<AnomalyResource>> {
        &self.anomalies
    }

    pub fn analytics(&self) -> &ResourceLoader<SessionAnalytics> {
        &self.analytics
    }

    pub fn detail(&self) -> &ResourceLoader<SessionDetail> {
        &self.detail
    }

    pub fn sessions(&self) -> &ResourceLoader<Vec<CaptureSession>> {
        &self.sessions
    }

    pub fn db_files(&self) -> &ResourceLoader<Vec<DbFile>> {
        &self.db_files
    }

    pub fn chat(&self) -> &ChatSessionController {
        &self.chat
    }

    /// Switches database file, dropping the selected session, and reloads
    /// the session list. Returns whether the file changed.
    pub async fn select_db_file(&self, db_file: Option<String>) -> bool {
        let (load, sessions) = {
            let _transition = self.transition.lock().await;
            let changed = self
                .selection
                .send_if_modified(|selection| selection.select_db_file(db_file.clone()));
            if !changed {
                return false;
            }
            tracing::info!(db_file = ?db_file, "Database file selected");
            (self.rescope().await, self.sessions.restart().await)
        };
        tokio::join!(
            self.run_session_load(load),
            self.finish_sessions(sessions, db_file),
        );
        true
    }

    /// Selects `session_id`, or clears the selection when it is already the
    /// selected one.
    pub async fn select_session(&self, session_id: &str) {
        let load = {
            let _transition = self.transition.lock().await;
            self.selection
                .send_modify(|selection| selection.toggle_session(session_id));
            tracing::info!(session_id = ?self.selection.borrow().session_id, "Session selection changed");
            self.rescope().await
        };
        self.run_session_load(load).await;
    }

    /// Sets the session without toggling.
    pub async fn set_session(&self, session_id: Option<String>) {
        let load = {
            let _transition = self.transition.lock().await;
            let changed = self.selection.send_if_modified(|selection| {
                if selection.session_id == session_id {
                    return false;
                }
                selection.set_session(session_id.clone());
                true
            });
            if !changed {
                return;
            }
            self.rescope().await
        };
        self.run_session_load(load).await;
    }

    /// Reloads the session list of the selected database file.
    pub async fn refresh_sessions(&self) {
        let (ticket, db_file) = {
            let _transition = self.transition.lock().await;
            let db_file = self.selection.borrow().db_file.clone();
            (self.sessions.start().await, db_file)
        };
        self.finish_sessions(ticket, db_file).await;
    }

    pub async fn refresh_db_files(&self) {
        self.db_files
            .load(self.api.list_db_files(), DB_FILES_FAILED)
            .await;
    }

    /// Reloads everything bound to the selected session.
    pub async fn refresh(&self) {
        let load = {
            let _transition = self.transition.lock().await;
            let key = self.selection.borrow().resource_key();
            let tickets = match key {
                Some(_) => Some(tokio::join!(self.analytics.start(), self.detail.start())),
                None => None,
            };
            SessionLoad {
                key,
                packets: None,
                anomalies: None,
                tickets,
            }
        };
        tokio::join!(
            self.packets.refresh(),
            self.anomalies.refresh(),
            self.run_session_load(load),
        );
    }

    /// Binds every session-scoped component to the current selection and
    /// tags the requests that follow, without sending them. Runs under the
    /// transition lock; anything still in flight for the previous selection
    /// is stale from here on.
    async fn rescope(&self) -> SessionLoad {
        let selection = self.selection();
        let key = selection.resource_key();
        self.chat.set_selection(selection).await;
        let (packets, anomalies) = tokio::join!(
            self.packets.stage_resource(key.clone()),
            self.anomalies.stage_resource(key.clone()),
        );
        let tickets = match key {
            Some(_) => Some(tokio::join!(self.analytics.restart(), self.detail.restart())),
            None => {
                tokio::join!(self.analytics.clear(), self.detail.clear());
                None
            }
        };
        SessionLoad {
            key,
            packets: packets.flatten(),
            anomalies: anomalies.flatten(),
            tickets,
        }
    }

    async fn run_session_load(&self, load: SessionLoad) {
        let SessionLoad {
            key,
            packets,
            anomalies,
            tickets,
        } = load;
        let session_data = async {
            if let (Some(key), Some((analytics, detail))) = (key.as_ref(), tickets) {
                tokio::join!(
                    self.analytics.finish(
                        analytics,
                        self.api.session_analytics(key),
                        ANALYTICS_FAILED
                    ),
                    self.detail
                        .finish(detail, self.api.session_detail(key), DETAIL_FAILED),
                );
            }
        };
        tokio::join!(
            self.packets.run(packets),
            self.anomalies.run(anomalies),
            session_data,
        );
    }

    async fn finish_sessions(&self, ticket: LoadTicket, db_file: Option<String>) {
        let api = &self.api;
        self.sessions
            .finish(
                ticket,
                async move {
                    let list = api.list_sessions(db_file.as_deref()).await?;
                    Ok(list.sessions)
                },
                SESSIONS_FAILED,
            )
            .await;
    }
}

/// Requests tagged under the transition lock, sent after it is released.
struct SessionLoad {
    key: Option<ResourceKey>,
    packets: Option<Staged>,
    anomalies: Option<Staged>,
    /// Analytics and detail tickets; `None` without a session.
    tickets: Option<(LoadTicket, LoadTicket)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GatedApi, MockCaptureApi, packet_page, session};
    use netlens_core::NetlensError;
    use std::time::Duration;

    fn workspace(api: &Arc<MockCaptureApi>) -> AnalysisWorkspace {
        AnalysisWorkspace::new(api.clone(), PageSizes::default())
    }

    #[tokio::test]
    async fn test_select_session_binds_everything() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1, 2], 2)));
        let ws = workspace(&api);
        ws.select_db_file(Some("database_1.db".into())).await;

        ws.select_session("5").await;

        let (key, params) = api.packet_calls()[0].clone();
        assert_eq!(key, ResourceKey::new(Some("database_1.db".into()), "5"));
        assert_eq!(params.limit, 20);
        assert_eq!(api.anomaly_calls()[0].1.limit, 10);
        assert_eq!(ws.packets().result().items.len(), 2);
        assert_eq!(ws.detail().data().map(|d| d.session.id), Some(5));
        assert!(ws.analytics().data().is_some());
        assert_eq!(
            ws.chat().selection().await.session_id.as_deref(),
            Some("5")
        );
    }

    #[tokio::test]
    async fn test_new_session_does_not_wait_for_old_fetches() {
        let api = Arc::new(GatedApi::new());
        let ws = Arc::new(AnalysisWorkspace::new(api.clone(), PageSizes::default()));

        let first = tokio::spawn({
            let ws = ws.clone();
            async move { ws.select_session("1").await }
        });
        api.wait_for_calls(1).await;

        let second = tokio::spawn({
            let ws = ws.clone();
            async move { ws.select_session("2").await }
        });
        api.wait_for_calls(2).await;
        // Session 1's packet call is still parked.
        assert_eq!(ws.selection().session_id.as_deref(), Some("2"));
        assert_eq!(ws.chat().selection().await.session_id.as_deref(), Some("2"));

        api.release(1, Ok(packet_page(&[20, 21], 2)));
        tokio::time::timeout(Duration::from_millis(500), second)
            .await
            .expect("second selection waited for the first one's fetches")
            .unwrap();

        api.release(0, Ok(packet_page(&[10], 1)));
        first.await.unwrap();

        let ids: Vec<i64> = ws.packets().result().items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![20, 21]);
        assert_eq!(
            ws.packets().resource_key().await,
            Some(ResourceKey::new(None, "2"))
        );
        assert!(!ws.packets().result().loading);
    }

    #[tokio::test]
    async fn test_selecting_same_session_deselects() {
        let api = Arc::new(MockCaptureApi::new());
        let ws = workspace(&api);

        ws.select_session("5").await;
        ws.select_session("5").await;

        assert_eq!(ws.selection().session_id, None);
        assert!(ws.packets().result().is_idle());
        assert_eq!(ws.analytics().state().data, None);
        assert_eq!(ws.chat().selection().await.session_id, None);
    }

    #[tokio::test]
    async fn test_db_file_change_clears_session_and_reloads_list() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_packets(Ok(packet_page(&[1], 1)));
        api.set_sessions(vec![session(1), session(2)]);
        let ws = workspace(&api);
        ws.select_session("1").await;
        assert!(!ws.packets().result().items.is_empty());

        assert!(ws.select_db_file(Some("database_2.db".into())).await);
        assert!(!ws.select_db_file(Some("database_2.db".into())).await);

        assert_eq!(ws.selection().session_id, None);
        assert!(ws.packets().result().is_idle());
        assert!(ws.anomalies().result().is_idle());
        assert_eq!(
            api.session_list_calls(),
            vec![Some("database_2.db".to_string())]
        );
        assert_eq!(ws.sessions().data().map(|s| s.len()), Some(2));
    }

    #[tokio::test]
    async fn test_analytics_failure_is_localized() {
        let api = Arc::new(MockCaptureApi::new());
        api.push_analytics(Err(NetlensError::network(Some(500), "boom")));
        let ws = workspace(&api);

        ws.set_session(Some("9".into())).await;

        assert_eq!(
            ws.analytics().state().error.as_deref(),
            Some(ANALYTICS_FAILED)
        );
    }

    #[tokio::test]
    async fn test_db_files_listing() {
        let api = Arc::new(MockCaptureApi::new());
        let ws = workspace(&api);
        ws.refresh_db_files().await;
        let files = ws.db_files().data().unwrap();
        assert_eq!(files[0].name, "database_1.db");
    }
}
