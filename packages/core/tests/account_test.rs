//! Account, Permission and Identity Tests
//!
//! Verifies status-to-error mapping and the two-step identity lookup.

#[cfg(test)]
mod account_tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use cloudnotes_core::backend::{
        BackendError, InMemoryBackend, Query, QueryEventStream, RecordBackend,
    };
    use cloudnotes_core::models::{
        AccountStatus, Permission, PermissionStatus, Record, RecordId, UserIdentity,
    };
    use cloudnotes_core::{RecordClient, RecordClientError};
    use std::sync::Arc;

    fn create_client() -> (RecordClient, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        (RecordClient::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_account_available() -> Result<()> {
        let (client, _backend) = create_client();
        assert!(client.account_status().await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_account_status_errors() -> Result<()> {
        let (client, backend) = create_client();

        let cases = [
            (AccountStatus::NoAccount, RecordClientError::AccountNotFound),
            (AccountStatus::Restricted, RecordClientError::AccountRestricted),
            (AccountStatus::CouldNotDetermine, RecordClientError::AccountUnknown),
            (
                AccountStatus::TemporarilyUnavailable,
                RecordClientError::AccountUnknown,
            ),
            (AccountStatus::Unknown, RecordClientError::AccountUnknown),
        ];

        for (status, expected) in cases {
            backend.set_account_status(status)?;
            let err = client.account_status().await.unwrap_err();
            assert_eq!(err, expected, "status {:?}", status);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_permission_granted() -> Result<()> {
        let (client, _backend) = create_client();
        assert!(client.request_permission().await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_permission_not_granted() -> Result<()> {
        let (client, backend) = create_client();

        for status in [
            PermissionStatus::Denied,
            PermissionStatus::CouldNotComplete,
            PermissionStatus::Initial,
            PermissionStatus::Unknown,
        ] {
            backend.set_permission_status(status)?;
            let err = client.request_permission().await.unwrap_err();
            assert_eq!(err, RecordClientError::PermissionNotGranted);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_discover_identity_returns_given_name() -> Result<()> {
        let (client, backend) = create_client();
        backend.set_current_user(
            RecordId::from_name("_user-1"),
            UserIdentity::new(Some("Alex"), Some("Doe")),
        )?;

        assert_eq!(client.discover_current_user_identity().await?, "Alex");
        assert_eq!(backend.identity_lookups(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_discover_identity_without_user_skips_lookup() -> Result<()> {
        let (client, backend) = create_client();

        let err = client.discover_current_user_identity().await.unwrap_err();
        assert_eq!(err, RecordClientError::CouldNotFetchUserRecordId);
        assert_eq!(backend.identity_lookups(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_discover_identity_without_given_name_fails() -> Result<()> {
        let (client, backend) = create_client();
        backend.set_current_user(
            RecordId::from_name("_user-2"),
            UserIdentity::new(None, Some("Doe")),
        )?;

        let err = client.discover_current_user_identity().await.unwrap_err();
        assert_eq!(err, RecordClientError::CouldNotDiscoverUser);
        assert_eq!(backend.identity_lookups(), 1);

        Ok(())
    }

    /// Backend that cannot be reached at all
    struct UnreachableBackend;

    #[async_trait]
    impl RecordBackend for UnreachableBackend {
        async fn account_status(&self) -> Result<AccountStatus, BackendError> {
            Err(BackendError::unavailable("offline"))
        }

        async fn request_permission(
            &self,
            _permission: Permission,
        ) -> Result<PermissionStatus, BackendError> {
            Err(BackendError::unavailable("offline"))
        }

        async fn fetch_user_record_id(&self) -> Result<RecordId, BackendError> {
            Ok(RecordId::from_name("_user-3"))
        }

        async fn discover_user_identity(
            &self,
            _user_record_id: &RecordId,
        ) -> Result<Option<UserIdentity>, BackendError> {
            Err(BackendError::unavailable("offline"))
        }

        async fn query(&self, _query: Query) -> Result<QueryEventStream, BackendError> {
            Err(BackendError::unavailable("offline"))
        }

        async fn save_record(&self, _record: Record) -> Result<Record, BackendError> {
            Err(BackendError::unavailable("offline"))
        }

        async fn delete_record(&self, _id: &RecordId) -> Result<RecordId, BackendError> {
            Err(BackendError::unavailable("offline"))
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend() -> Result<()> {
        let client = RecordClient::new(Arc::new(UnreachableBackend));

        assert_eq!(
            client.account_status().await.unwrap_err(),
            RecordClientError::Backend(BackendError::unavailable("offline"))
        );
        assert_eq!(
            client.request_permission().await.unwrap_err(),
            RecordClientError::PermissionNotGranted
        );
        assert_eq!(
            client.discover_current_user_identity().await.unwrap_err(),
            RecordClientError::CouldNotDiscoverUser
        );

        let fruits: Vec<cloudnotes_core::Fruit> =
            client.fetch_all(cloudnotes_core::Filter::all()).await;
        assert!(fruits.is_empty());

        Ok(())
    }
}
