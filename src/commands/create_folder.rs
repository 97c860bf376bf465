use tracing::error;

use crate::commands::{require_access_token, responses, RequestContext};
use crate::disk::{DiskApi, DiskError};
use crate::outbound::Messenger;
use crate::store::UserStore;

/// Statuses tolerated on any folder level ("already exists").
const ALLOWED_STATUSES: [u16; 1] = [409];

/// Handles `/create_folder <name>`.
pub async fn handle<M: Messenger, D: DiskApi>(
    m: &M,
    disk: &D,
    users: &UserStore,
    ctx: &RequestContext,
) {
    let Some(access_token) = require_access_token(m, users, ctx).await else {
        return;
    };

    match create_folder_levels(disk, &access_token, &ctx.argument).await {
        Ok(status) => {
            let text = match status {
                201 => "Created".to_string(),
                409 => "Already exists".to_string(),
                other => format!("Unknown status code: {other}"),
            };
            m.send_message(ctx.chat_id, &text, None, None).await;
        }
        Err(DiskError::Request(err)) => {
            error!("Yandex.Disk request failed: {err}");
            responses::cancel(m, ctx.chat_id, None, None).await;
        }
        Err(err @ DiskError::Api { .. }) => {
            m.send_message(ctx.chat_id, &err.to_string(), None, None).await;
        }
    }
}

/// Creates every `/`-separated level of `folder_name`, one request per level.
///
/// Yandex.Disk refuses to create a nested folder while an intermediate level
/// is missing, so each level is created explicitly and "already exists" is
/// tolerated along the way. The status of the last level is returned so the
/// caller can tell "created" from "already existed".
///
/// A response without an `error` field counts as success whatever its
/// status; intent upstream is ambiguous, behavior kept as-is.
pub async fn create_folder_levels<D: DiskApi + ?Sized>(
    disk: &D,
    access_token: &str,
    folder_name: &str,
) -> Result<u16, DiskError> {
    let mut folder_path = String::new();
    let mut last_status = 201; // root always created

    for folder in folder_name.split('/').filter(|s| !s.is_empty()) {
        folder_path.push('/');
        folder_path.push_str(folder);

        let response = disk.create_folder(access_token, &folder_path).await?;
        last_status = response.status;

        if last_status == 201
            || !response.is_error()
            || ALLOWED_STATUSES.contains(&last_status)
        {
            continue;
        }

        return Err(response.api_error());
    }

    Ok(last_status)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::disk::DiskResponse;

    /// Scripted Disk API: pops one prepared result per call and records
    /// the requested paths.
    #[derive(Default)]
    struct FakeDisk {
        results: Mutex<VecDeque<Result<DiskResponse, DiskError>>>,
        paths: Mutex<Vec<String>>,
    }

    impl FakeDisk {
        fn scripted(results: Vec<Result<DiskResponse, DiskError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                paths: Mutex::new(Vec::new()),
            }
        }

        fn paths(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DiskApi for FakeDisk {
        async fn create_folder(
            &self,
            _access_token: &str,
            path: &str,
        ) -> Result<DiskResponse, DiskError> {
            self.paths.lock().unwrap().push(path.to_string());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("more calls than scripted results")
        }
    }

    fn status(status: u16) -> Result<DiskResponse, DiskError> {
        Ok(DiskResponse {
            status,
            ..DiskResponse::default()
        })
    }

    fn error(status: u16, name: &str, description: &str) -> Result<DiskResponse, DiskError> {
        Ok(DiskResponse {
            status,
            error: Some(name.to_string()),
            message: None,
            description: Some(description.to_string()),
        })
    }

    #[tokio::test]
    async fn creates_every_level_and_returns_the_last_status() {
        let disk = FakeDisk::scripted(vec![
            error(409, "DiskPathPointsToExistentDirectoryError", "exists"),
            error(409, "DiskPathPointsToExistentDirectoryError", "exists"),
            status(201),
        ]);

        let result = create_folder_levels(&disk, "token", "a/b/c").await.unwrap();

        assert_eq!(result, 201);
        assert_eq!(disk.paths(), vec!["/a", "/a/b", "/a/b/c"]);
    }

    #[tokio::test]
    async fn empty_folder_name_makes_no_calls() {
        for name in ["", "///"] {
            let disk = FakeDisk::scripted(vec![]);
            let result = create_folder_levels(&disk, "token", name).await.unwrap();
            assert_eq!(result, 201);
            assert!(disk.paths().is_empty());
        }
    }

    #[tokio::test]
    async fn leading_and_trailing_slashes_are_ignored() {
        let disk = FakeDisk::scripted(vec![status(201), status(201)]);

        create_folder_levels(&disk, "token", "/music//rock/")
            .await
            .unwrap();

        assert_eq!(disk.paths(), vec!["/music", "/music/rock"]);
    }

    #[tokio::test]
    async fn last_level_already_existing_surfaces_409() {
        let disk = FakeDisk::scripted(vec![status(201), error(409, "ExistsError", "exists")]);

        let result = create_folder_levels(&disk, "token", "a/b").await.unwrap();

        assert_eq!(result, 409);
    }

    #[tokio::test]
    async fn transport_error_stops_the_traversal() {
        let disk = FakeDisk::scripted(vec![
            status(201),
            Err(DiskError::Request("connection reset".to_string())),
        ]);

        let result = create_folder_levels(&disk, "token", "a/b/c").await;

        assert!(matches!(result, Err(DiskError::Request(_))));
        // Segment 3 was never attempted
        assert_eq!(disk.paths(), vec!["/a", "/a/b"]);
    }

    #[tokio::test]
    async fn api_error_carries_name_and_description() {
        let disk = FakeDisk::scripted(vec![error(
            403,
            "DiskPathDoesNotExistsError",
            "no such path",
        )]);

        let err = create_folder_levels(&disk, "token", "a").await.unwrap_err();

        let text = err.to_string();
        assert!(text.contains("DiskPathDoesNotExistsError"));
        assert!(text.contains("no such path"));
    }

    #[tokio::test]
    async fn handler_maps_statuses_to_reply_text() {
        use crate::commands::testing::{context, Outbound, RecordingMessenger};
        use crate::store::UserStore;

        let cases = [(201, "Created"), (409, "Already exists"), (207, "Unknown status code: 207")];
        for (code, expected) in cases {
            let m = RecordingMessenger::default();
            let users = UserStore::open_in_memory().unwrap();
            users.set_access_token(1, "token").await.unwrap();
            let disk = FakeDisk::scripted(vec![status(code)]);

            handle(&m, &disk, &users, &context(100, true, "photos")).await;

            match &m.take()[0] {
                Outbound::Send { text, .. } => assert_eq!(text, expected),
                other => panic!("expected a send, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn handler_cancels_on_transport_failure() {
        use crate::commands::testing::{context, Outbound, RecordingMessenger};
        use crate::store::UserStore;

        let m = RecordingMessenger::default();
        let users = UserStore::open_in_memory().unwrap();
        users.set_access_token(1, "token").await.unwrap();
        let disk = FakeDisk::scripted(vec![
            status(201),
            Err(DiskError::Request("connection reset".to_string())),
        ]);

        handle(&m, &disk, &users, &context(100, true, "a/b/c")).await;

        // Traversal stopped at segment 2; the user got the fixed cancellation text.
        assert_eq!(disk.paths(), vec!["/a", "/a/b"]);
        match &m.take()[0] {
            Outbound::Send { text, .. } => assert!(text.contains("internal error")),
            other => panic!("expected a send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn handler_shows_api_errors_verbatim() {
        use crate::commands::testing::{context, Outbound, RecordingMessenger};
        use crate::store::UserStore;

        let m = RecordingMessenger::default();
        let users = UserStore::open_in_memory().unwrap();
        users.set_access_token(1, "token").await.unwrap();
        let disk = FakeDisk::scripted(vec![error(
            403,
            "DiskPathDoesNotExistsError",
            "no such path",
        )]);

        handle(&m, &disk, &users, &context(100, true, "a")).await;

        match &m.take()[0] {
            Outbound::Send { text, .. } => {
                assert_eq!(
                    text,
                    "Yandex.Disk Error: DiskPathDoesNotExistsError (no such path)"
                );
            }
            other => panic!("expected a send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_error_field_counts_as_success() {
        // An undocumented status without an error payload does not stop
        // the traversal and is surfaced verbatim as the last status.
        let disk = FakeDisk::scripted(vec![status(207), status(207)]);

        let result = create_folder_levels(&disk, "token", "a/b").await.unwrap();

        assert_eq!(result, 207);
        assert_eq!(disk.paths(), vec!["/a", "/a/b"]);
    }
}
