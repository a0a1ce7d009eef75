use async_trait::async_trait;
use rekvi_core::session::{SessionContext, SessionStore};
use rekvi_core::{CoreError, CoreResult};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Session kept only for the lifetime of the process.
#[derive(Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<SessionContext>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> CoreResult<Option<SessionContext>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn save(&self, ctx: &SessionContext) -> CoreResult<()> {
        *self.current.lock().unwrap() = Some(ctx.clone());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

/// Session persisted as a JSON file so the selected user survives restarts.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn session_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::SessionError(err.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> CoreResult<Option<SessionContext>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(session_error(err)),
        };
        let ctx = serde_json::from_slice(&bytes).map_err(session_error)?;
        Ok(Some(ctx))
    }

    async fn save(&self, ctx: &SessionContext) -> CoreResult<()> {
        let bytes = serde_json::to_vec_pretty(ctx).map_err(session_error)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(session_error)
    }

    async fn clear(&self) -> CoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(session_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rekvi_shared::UserNo;

    #[tokio::test]
    async fn memory_store_round_trips_the_session() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load().await.unwrap(), None);

        let ctx = SessionContext::new(UserNo::from("0000123"));
        store.save(&ctx).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(ctx));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_survives_reopening() {
        let path = std::env::temp_dir().join(format!("rekvi-session-{}.json", std::process::id()));
        let ctx = SessionContext::new(UserNo::from("0000123"));

        {
            let store = FileSessionStore::new(&path);
            store.save(&ctx).await.unwrap();
        }

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().await.unwrap(), Some(ctx));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        // Clearing a missing file is not an error.
        store.clear().await.unwrap();
    }
}
