#[cfg(test)]
mod test {

    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;
    use serial_test::serial;

    use crate::config::issuer::VaultConfig;
    use crate::error::IssuerError;
    use crate::secrets::identity::ManagedIdentity;
    use crate::secrets::vault::{KeyVaultStore, VAULT_RESOURCE};
    use crate::secrets::SecretStore;
    use crate::tests::common::build_reqwest_client;

    fn vault_config(server: &MockServer) -> VaultConfig {
        VaultConfig {
            url: server.base_url(),
            api_version: "7.4".to_string(),
            api_key_secret: "project-api-key".to_string(),
            client_secret_secret: "client-secret".to_string(),
        }
    }

    fn store(server: &MockServer) -> KeyVaultStore {
        let identity = ManagedIdentity::new(build_reqwest_client(), VAULT_RESOURCE);
        KeyVaultStore::new(build_reqwest_client(), identity, &vault_config(server))
    }

    fn mock_identity_endpoint(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/msi/token")
                .header("X-IDENTITY-HEADER", "hdr-1")
                .query_param("resource", VAULT_RESOURCE);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"access_token":"aad-tok","expires_on":"1767139200"}));
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial]
    async fn fetches_secret_with_identity_token() {
        let server = MockServer::start_async().await;
        mock_identity_endpoint(&server);

        let secret_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/secrets/project-api-key")
                .query_param("api-version", "7.4")
                .header("authorization", "Bearer aad-tok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "value": "kv-key",
                    "id": "https://unit-kv.vault.azure.net/secrets/project-api-key/abc"
                }));
        });

        std::env::set_var("IDENTITY_ENDPOINT", server.url("/msi/token"));
        std::env::set_var("IDENTITY_HEADER", "hdr-1");

        let value = store(&server).get_secret("project-api-key").await.unwrap();
        assert_eq!(value, "kv-key");
        secret_mock.assert_async().await;

        std::env::remove_var("IDENTITY_ENDPOINT");
        std::env::remove_var("IDENTITY_HEADER");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial]
    async fn absent_secret_is_not_found() {
        let server = MockServer::start_async().await;
        mock_identity_endpoint(&server);

        server.mock(|when, then| {
            when.method(GET).path("/secrets/client-secret");
            then.status(404)
                .json_body(json!({"error":{"code":"SecretNotFound"}}));
        });

        std::env::set_var("IDENTITY_ENDPOINT", server.url("/msi/token"));
        std::env::set_var("IDENTITY_HEADER", "hdr-1");

        let err = store(&server).get_secret("client-secret").await.unwrap_err();
        match err {
            IssuerError::SecretNotFound { name } => assert_eq!(name, "client-secret"),
            other => panic!("expected SecretNotFound, got {other}"),
        }

        std::env::remove_var("IDENTITY_ENDPOINT");
        std::env::remove_var("IDENTITY_HEADER");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial]
    async fn forbidden_vault_is_auth_failure() {
        let server = MockServer::start_async().await;
        mock_identity_endpoint(&server);

        server.mock(|when, then| {
            when.method(GET).path("/secrets/project-api-key");
            then.status(403).body("caller is not authorized");
        });

        std::env::set_var("IDENTITY_ENDPOINT", server.url("/msi/token"));
        std::env::set_var("IDENTITY_HEADER", "hdr-1");

        let err = store(&server).get_secret("project-api-key").await.unwrap_err();
        assert!(matches!(err, IssuerError::SecretStoreAuth(_)));

        std::env::remove_var("IDENTITY_ENDPOINT");
        std::env::remove_var("IDENTITY_HEADER");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial]
    async fn identity_endpoint_failure_is_auth_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/msi/token");
            then.status(400).body("identity not assigned");
        });

        std::env::set_var("IDENTITY_ENDPOINT", server.url("/msi/token"));
        std::env::set_var("IDENTITY_HEADER", "hdr-1");

        let err = store(&server).get_secret("project-api-key").await.unwrap_err();
        assert!(matches!(err, IssuerError::SecretStoreAuth(_)));

        std::env::remove_var("IDENTITY_ENDPOINT");
        std::env::remove_var("IDENTITY_HEADER");
    }
}
